use crate::geo::GeoPoint;
use serde::Serialize;
use std::collections::BTreeMap;

/// One candidate endpoint from the provider's server list.
///
/// Coordinates and load are optional because the provider data is not
/// trusted: a record with a missing or out-of-range value is still
/// representable, it just never survives selection.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct ServerRecord {
    /// Unique identifier, the server's domain (e.g. `us1234.nordvpn.com`).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Country tag as published by the provider (e.g. `US`).
    pub country: String,
    /// Public address, when published.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    /// Latitude in degrees.
    pub latitude: Option<f64>,
    /// Longitude in degrees.
    pub longitude: Option<f64>,
    /// Reported load, percent.
    pub load: Option<u32>,
    /// Category names (e.g. `Standard VPN servers`, `P2P`).
    pub categories: Vec<String>,
    /// Feature flags (e.g. `openvpn_udp`).
    pub features: BTreeMap<String, bool>,
}

impl ServerRecord {
    /// The record's location, if both coordinates are present and valid.
    pub fn position(&self) -> Option<GeoPoint> {
        GeoPoint::new(self.latitude?, self.longitude?).ok()
    }

    /// The record's load, if present and within 0..=100.
    pub fn valid_load(&self) -> Option<u8> {
        self.load.filter(|l| *l <= 100).map(|l| l as u8)
    }

    /// True if the record is tagged with `category` (case-insensitive).
    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c.eq_ignore_ascii_case(category))
    }

    /// True if `feature` is present and enabled.
    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.get(feature).copied().unwrap_or(false)
    }
}

/// A surviving candidate together with its distance from the reference location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedServer {
    /// The candidate.
    #[serde(flatten)]
    pub server: ServerRecord,
    /// Great-circle distance in miles.
    pub distance: f64,
}

/// Ordered selection output, best candidate first.
pub type RankedResult = Vec<RankedServer>;
