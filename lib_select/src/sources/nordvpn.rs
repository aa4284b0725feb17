use super::{ServerCatalog, ServerSource, ServerStats, SourceError};
use crate::retrieve::ky_http::{ApiClient, ApiResponse};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Public NordVPN API root.
pub const NORDVPN_API_URL: &str = "https://nordvpn.com/";

const SERVER_LIST_PATH: &str = "api/server";
const SERVER_STATS_PATH: &str = "api/server/stats";

/// Downloads the current server list and load statistics from the provider.
pub struct NordVpnSource {
    client: ApiClient,
}

impl NordVpnSource {
    /// Creates a source against `base_url` (usually [`NORDVPN_API_URL`]).
    pub fn new(base_url: &str) -> Result<Self, SourceError> {
        Ok(Self {
            client: ApiClient::new(base_url, None)?,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        what: &'static str,
    ) -> Result<T, SourceError> {
        let response: ApiResponse<T> =
            self.client
                .get(path)
                .await
                .map_err(|e| match e.downcast::<serde_json::Error>() {
                    Ok(source) => SourceError::Json { what, source },
                    Err(e) => SourceError::Network(e),
                })?;
        let url = self
            .client
            .base_url()
            .join(path)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| path.to_string());
        match response.data {
            Some(data) if response.success => Ok(data),
            _ => Err(SourceError::Http {
                url,
                status: response.status,
                body: response.error_body.unwrap_or_default(),
            }),
        }
    }
}

impl ServerSource for NordVpnSource {
    fn describe(&self) -> String {
        self.client.base_url().to_string()
    }

    async fn fetch(&self) -> Result<ServerCatalog, SourceError> {
        log::info!("Downloading server list/stats");
        let servers: Vec<Value> = self.get_json(SERVER_LIST_PATH, "server list").await?;
        let stats: ServerStats = self.get_json(SERVER_STATS_PATH, "server stats").await?;
        log::debug!("Received {} servers, {} stats entries", servers.len(), stats.len());
        Ok(ServerCatalog { servers, stats })
    }
}
