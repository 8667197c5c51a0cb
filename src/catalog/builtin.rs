//! Built-in topology: exchanges, provider regions, curated trading links and
//! the default probe targets.

use latencyscope_types::{CloudProvider, Target};

use super::{Exchange, LinkBlueprint, Region};

use CloudProvider::{Aws, Azure, Gcp};

#[allow(clippy::too_many_arguments)]
fn exchange(
    id: &str,
    name: &str,
    city: &str,
    country: &str,
    lat: f64,
    lng: f64,
    provider: CloudProvider,
    region_code: &str,
    cloud_region_id: &str,
) -> Exchange {
    Exchange {
        id: id.to_string(),
        name: name.to_string(),
        city: city.to_string(),
        country: country.to_string(),
        latitude: lat,
        longitude: lng,
        provider,
        region_code: region_code.to_string(),
        cloud_region_id: cloud_region_id.to_string(),
    }
}

fn region(
    id: &str,
    provider: CloudProvider,
    region_code: &str,
    name: &str,
    lat: f64,
    lng: f64,
    server_count: u32,
) -> Region {
    Region {
        id: id.to_string(),
        provider,
        region_code: region_code.to_string(),
        name: name.to_string(),
        latitude: lat,
        longitude: lng,
        server_count,
    }
}

fn pair(id: &str, from_id: &str, to_id: &str, provider: CloudProvider) -> LinkBlueprint {
    LinkBlueprint {
        id: id.to_string(),
        from_id: from_id.to_string(),
        to_id: to_id.to_string(),
        provider,
    }
}

pub fn exchanges() -> Vec<Exchange> {
    vec![
        exchange(
            "binance-tokyo",
            "Binance",
            "Tokyo",
            "Japan",
            35.6762,
            139.6503,
            Aws,
            "ap-northeast-1",
            "aws-ap-northeast-1",
        ),
        exchange(
            "okx-singapore",
            "OKX",
            "Singapore",
            "Singapore",
            1.3521,
            103.8198,
            Gcp,
            "asia-southeast1",
            "gcp-asia-southeast1",
        ),
        exchange(
            "deribit-amsterdam",
            "Deribit",
            "Amsterdam",
            "Netherlands",
            52.3676,
            4.9041,
            Azure,
            "westeurope",
            "azure-westeurope",
        ),
        exchange(
            "bybit-frankfurt",
            "Bybit",
            "Frankfurt",
            "Germany",
            50.1109,
            8.6821,
            Aws,
            "eu-central-1",
            "aws-eu-central-1",
        ),
        exchange(
            "coinbase-london",
            "Coinbase",
            "London",
            "United Kingdom",
            51.5074,
            -0.1278,
            Azure,
            "uksouth",
            "azure-uksouth",
        ),
        exchange(
            "kraken-newark",
            "Kraken",
            "Newark",
            "United States",
            40.7357,
            -74.1724,
            Gcp,
            "us-east4",
            "gcp-us-east4",
        ),
        exchange(
            "bitfinex-hongkong",
            "Bitfinex",
            "Hong Kong",
            "China",
            22.3193,
            114.1694,
            Aws,
            "ap-east-1",
            "aws-ap-east-1",
        ),
        exchange(
            "bitmex-dublin",
            "BitMEX",
            "Dublin",
            "Ireland",
            53.3498,
            -6.2603,
            Azure,
            "northeurope",
            "azure-northeurope",
        ),
    ]
}

pub fn regions() -> Vec<Region> {
    vec![
        region("aws-ap-northeast-1", Aws, "ap-northeast-1", "AWS Tokyo", 35.6895, 139.6917, 1840),
        region("aws-eu-central-1", Aws, "eu-central-1", "AWS Frankfurt", 50.1213, 8.4964, 1620),
        region("aws-ap-east-1", Aws, "ap-east-1", "AWS Hong Kong", 22.2793, 114.1628, 960),
        region("aws-us-east-1", Aws, "us-east-1", "AWS N. Virginia", 38.9519, -77.4480, 3200),
        region(
            "gcp-asia-southeast1",
            Gcp,
            "asia-southeast1",
            "GCP Singapore",
            1.3404,
            103.7090,
            1280,
        ),
        region("gcp-us-east4", Gcp, "us-east4", "GCP N. Virginia", 39.0438, -77.4874, 1150),
        region("gcp-europe-west2", Gcp, "europe-west2", "GCP London", 51.5072, -0.1276, 870),
        region("azure-westeurope", Azure, "westeurope", "Azure West Europe", 52.3667, 4.9000, 1410),
        region("azure-uksouth", Azure, "uksouth", "Azure UK South", 51.5000, -0.1200, 990),
        region(
            "azure-northeurope",
            Azure,
            "northeurope",
            "Azure North Europe",
            53.3478,
            -6.2597,
            1060,
        ),
        region("azure-eastus", Azure, "eastus", "Azure East US", 37.3719, -79.8164, 2100),
    ]
}

/// Curated exchange-to-exchange trading links.
pub fn trading_links() -> Vec<LinkBlueprint> {
    vec![
        pair("binance-bybit", "binance-tokyo", "bybit-frankfurt", Aws),
        pair("okx-deribit", "okx-singapore", "deribit-amsterdam", Gcp),
        pair("kraken-coinbase", "kraken-newark", "coinbase-london", Azure),
        pair("bybit-deribit", "bybit-frankfurt", "deribit-amsterdam", Aws),
        pair("okx-binance", "okx-singapore", "binance-tokyo", Gcp),
        pair("bitfinex-okx", "bitfinex-hongkong", "okx-singapore", Aws),
        pair("bitmex-coinbase", "bitmex-dublin", "coinbase-london", Azure),
        pair("kraken-bybit", "kraken-newark", "bybit-frankfurt", Aws),
    ]
}

/// Public ping/time endpoints for each exchange.
pub fn default_targets() -> Vec<Target> {
    vec![
        Target::new("binance-tokyo", "Binance", Aws, "https://api.binance.com/api/v3/ping"),
        Target::new("okx-singapore", "OKX", Gcp, "https://www.okx.com/api/v5/public/time"),
        Target::new(
            "deribit-amsterdam",
            "Deribit",
            Azure,
            "https://www.deribit.com/api/v2/public/ping",
        ),
        Target::new("bybit-frankfurt", "Bybit", Aws, "https://api.bybit.com/v5/market/time"),
        Target::new("coinbase-london", "Coinbase", Azure, "https://api.exchange.coinbase.com/time"),
        Target::new("kraken-newark", "Kraken", Gcp, "https://api.kraken.com/0/public/Time"),
        Target::new(
            "bitfinex-hongkong",
            "Bitfinex",
            Aws,
            "https://api-pub.bitfinex.com/v2/platform/status",
        ),
        Target::new(
            "bitmex-dublin",
            "BitMEX",
            Azure,
            "https://www.bitmex.com/api/v1/announcement?columns=date",
        ),
    ]
}
