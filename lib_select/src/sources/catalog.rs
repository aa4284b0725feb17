use crate::selector::ServerRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Per-server load statistics keyed by server domain.
///
/// Entries are kept as raw JSON so that one malformed entry only
/// invalidates that server's load, not the whole document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerStats(HashMap<String, Value>);

#[allow(clippy::len_without_is_empty)]
impl ServerStats {
    /// Builds stats from `(domain, percent)` pairs.
    pub fn from_loads<I, S>(loads: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        Self(
            loads
                .into_iter()
                .map(|(domain, percent)| (domain.into(), serde_json::json!({ "percent": percent })))
                .collect(),
        )
    }

    /// Reported load for `domain`, if present and a non-negative integer.
    pub fn load_for(&self, domain: &str) -> Option<u32> {
        self.0
            .get(domain)?
            .get("percent")?
            .as_u64()
            .and_then(|p| u32::try_from(p).ok())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// The provider's server listing together with its load statistics.
#[derive(Debug, Clone, Default)]
pub struct ServerCatalog {
    /// Raw server entries, one JSON object each.
    pub servers: Vec<Value>,
    /// Load statistics.
    pub stats: ServerStats,
}

#[derive(Deserialize)]
struct RawServer {
    domain: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    flag: String,
    ip_address: Option<String>,
    location: Option<RawLocation>,
    #[serde(default)]
    categories: Vec<RawCategory>,
    #[serde(default)]
    features: BTreeMap<String, Value>,
}

#[derive(Deserialize)]
struct RawLocation {
    lat: Option<Value>,
    long: Option<Value>,
}

#[derive(Deserialize)]
struct RawCategory {
    name: String,
}

impl ServerCatalog {
    /// Normalizes every listing entry into a [`ServerRecord`].
    ///
    /// Entries that cannot be decoded, or have no domain, are dropped. Values
    /// that are present but unusable (non-numeric coordinates, unknown load)
    /// are kept as `None` and left for the selector to exclude.
    pub fn into_records(self) -> Vec<ServerRecord> {
        let stats = self.stats;
        self.servers
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| normalize(index, entry, &stats))
            .collect()
    }
}

fn normalize(index: usize, entry: Value, stats: &ServerStats) -> Option<ServerRecord> {
    let raw: RawServer = match serde_json::from_value(entry) {
        Ok(raw) => raw,
        Err(e) => {
            log::debug!("Dropping server entry #{}: {}", index, e);
            return None;
        }
    };
    let id = match raw.domain {
        Some(domain) if !domain.trim().is_empty() => domain,
        _ => {
            log::debug!("Dropping server entry #{} ({}): no domain", index, raw.name);
            return None;
        }
    };

    let (latitude, longitude) = match raw.location {
        Some(loc) => (
            loc.lat.as_ref().and_then(Value::as_f64),
            loc.long.as_ref().and_then(Value::as_f64),
        ),
        None => (None, None),
    };

    Some(ServerRecord {
        load: stats.load_for(&id),
        id,
        name: raw.name,
        country: raw.flag,
        ip_address: raw.ip_address,
        latitude,
        longitude,
        categories: raw.categories.into_iter().map(|c| c.name).collect(),
        features: raw
            .features
            .into_iter()
            .filter_map(|(k, v)| v.as_bool().map(|b| (k, b)))
            .collect(),
    })
}
