use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{RecordSource, SourceEndpoint};
use crate::{model::Record, UpstreamError};

/// HTTP-реализация [`RecordSource`] поверх `reqwest`.
///
/// `GET {url}?latitude=..&longitude=..&radiusInMiles=..`; ответ обязан быть
/// JSON-массивом записей. Не-2xx статус, сетевой сбой и неразборчивое тело
/// превращаются в [`UpstreamError`].
#[derive(Debug, Clone, Default)]
pub struct HttpRecordSource {
    client: Client,
}

impl HttpRecordSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Использует заранее настроенный клиент (пул соединений, прокси, TLS).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RecordSource for HttpRecordSource {
    async fn fetch_records(
        &self,
        endpoint: &SourceEndpoint,
        latitude: f64,
        longitude: f64,
        radius_in_miles: f64,
    ) -> Result<Vec<Record>, UpstreamError> {
        let name = endpoint.name();
        let transport = |e: reqwest::Error| UpstreamError::Transport {
            name: name.to_string(),
            reason: e.to_string(),
        };

        let mut url = endpoint.url().clone();
        url.query_pairs_mut()
            .append_pair("latitude", &latitude.to_string())
            .append_pair("longitude", &longitude.to_string())
            .append_pair("radiusInMiles", &radius_in_miles.to_string());

        debug!(source = %name, %url, "fetching records");

        let response = self.client.get(url).send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                name: name.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(transport)?;
        serde_json::from_slice::<Vec<Record>>(&body).map_err(|e| UpstreamError::Decode {
            name: name.to_string(),
            reason: e.to_string(),
        })
    }
}
