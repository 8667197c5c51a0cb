//! Latency band and link status classification.
//!
//! The band scale drives colouring and the status scale drives health
//! labelling. They are separate on purpose and use different cut-offs.

use latencyscope_types::{LatencyBand, LinkStatus};

/// Links below this latency are in the low band.
pub const BAND_LOW_BELOW_MS: u32 = 90;
/// Links below this latency (and not low) are in the medium band.
pub const BAND_MEDIUM_BELOW_MS: u32 = 180;

/// Links below this latency are healthy.
pub const STATUS_HEALTHY_BELOW_MS: u32 = 120;
/// Links below this latency (and not healthy) are degraded.
pub const STATUS_DEGRADED_BELOW_MS: u32 = 220;

pub fn band_for(latency_ms: u32) -> LatencyBand {
    if latency_ms < BAND_LOW_BELOW_MS {
        LatencyBand::Low
    } else if latency_ms < BAND_MEDIUM_BELOW_MS {
        LatencyBand::Medium
    } else {
        LatencyBand::High
    }
}

pub fn status_for(latency_ms: u32) -> LinkStatus {
    if latency_ms < STATUS_HEALTHY_BELOW_MS {
        LinkStatus::Healthy
    } else if latency_ms < STATUS_DEGRADED_BELOW_MS {
        LinkStatus::Degraded
    } else {
        LinkStatus::Critical
    }
}
