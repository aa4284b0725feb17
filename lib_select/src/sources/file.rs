use super::{ServerCatalog, ServerSource, ServerStats, SourceError};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Reads the server list and server stats from local JSON files.
///
/// Both documents must be supplied; they are the same shape as the
/// provider's `api/server` and `api/server/stats` responses.
#[derive(Debug, Clone)]
pub struct FileSource {
    server_list: PathBuf,
    server_stats: PathBuf,
}

impl FileSource {
    /// Creates a source over the two files.
    pub fn new(server_list: impl Into<PathBuf>, server_stats: impl Into<PathBuf>) -> Self {
        Self {
            server_list: server_list.into(),
            server_stats: server_stats.into(),
        }
    }
}

async fn read(path: &Path) -> Result<String, SourceError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })
}

impl ServerSource for FileSource {
    fn describe(&self) -> String {
        format!(
            "files {} + {}",
            self.server_list.display(),
            self.server_stats.display()
        )
    }

    async fn fetch(&self) -> Result<ServerCatalog, SourceError> {
        let (list_text, stats_text) =
            tokio::try_join!(read(&self.server_list), read(&self.server_stats))?;

        let servers: Vec<Value> =
            serde_json::from_str(&list_text).map_err(|source| SourceError::Json {
                what: "server list",
                source,
            })?;
        let stats: ServerStats =
            serde_json::from_str(&stats_text).map_err(|source| SourceError::Json {
                what: "server stats",
                source,
            })?;

        Ok(ServerCatalog { servers, stats })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::load_candidates;
    use std::fs;
    use tempfile::tempdir;

    const LIST: &str = r#"[
        {"name": "United States #1", "domain": "us1.nordvpn.com", "flag": "US",
         "location": {"lat": 40.0, "long": -75.0}, "categories": [], "features": {}},
        {"name": "Canada #1", "domain": "ca1.nordvpn.com", "flag": "CA",
         "location": {"lat": 43.65, "long": -79.38}, "categories": [], "features": {}}
    ]"#;
    const STATS: &str = r#"{"us1.nordvpn.com": {"percent": 10}, "ca1.nordvpn.com": {"percent": 55}}"#;

    #[tokio::test]
    async fn test_fetch_reads_both_files() {
        let dir = tempdir().unwrap();
        let list = dir.path().join("servers.json");
        let stats = dir.path().join("stats.json");
        fs::write(&list, LIST).unwrap();
        fs::write(&stats, STATS).unwrap();

        let source = FileSource::new(&list, &stats);
        let records = load_candidates(&source).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].load, Some(10));
        assert_eq!(records[1].country, "CA");
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let list = dir.path().join("servers.json");
        fs::write(&list, LIST).unwrap();

        let source = FileSource::new(&list, dir.path().join("absent.json"));
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }

    #[tokio::test]
    async fn test_list_must_be_an_array() {
        let dir = tempdir().unwrap();
        let list = dir.path().join("servers.json");
        let stats = dir.path().join("stats.json");
        fs::write(&list, r#"{"servers": []}"#).unwrap();
        fs::write(&stats, STATS).unwrap();

        let err = FileSource::new(&list, &stats).fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::Json { what: "server list", .. }));
    }
}
