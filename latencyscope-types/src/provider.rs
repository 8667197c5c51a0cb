//! Cloud provider tags.

use core::fmt;
use core::str::FromStr;

/// The cloud provider hosting an exchange, region or probe target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CloudProvider {
    #[cfg_attr(feature = "serde", serde(rename = "AWS"))]
    Aws,
    #[cfg_attr(feature = "serde", serde(rename = "GCP"))]
    Gcp,
    #[cfg_attr(feature = "serde", serde(rename = "Azure"))]
    Azure,
}

impl CloudProvider {
    /// All providers, in display order.
    pub const ALL: [CloudProvider; 3] =
        [CloudProvider::Aws, CloudProvider::Gcp, CloudProvider::Azure];

    /// Label used on the wire and in the UI.
    pub fn label(&self) -> &'static str {
        match self {
            CloudProvider::Aws => "AWS",
            CloudProvider::Gcp => "GCP",
            CloudProvider::Azure => "Azure",
        }
    }
}

impl fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a provider label is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownProvider(pub String);

impl fmt::Display for UnknownProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown cloud provider: {}", self.0)
    }
}

impl std::error::Error for UnknownProvider {}

impl FromStr for CloudProvider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aws" => Ok(CloudProvider::Aws),
            "gcp" => Ok(CloudProvider::Gcp),
            "azure" => Ok(CloudProvider::Azure),
            _ => Err(UnknownProvider(s.to_string())),
        }
    }
}
