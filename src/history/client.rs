use {
    super::{HistoryClient, HistoryError, HistoryQuery},
    crate::record::{RawRecord, TransactionRecord},
    async_trait::async_trait,
    serde::Deserialize,
    serde_json::Value,
    std::time::Duration,
};

const HISTORY_PATH: &str = "/transaction/getHistory";

/// Response body: either a bare array of rows or `{ "data": [...] }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HistoryResponse {
    Rows(Vec<Value>),
    Wrapped { data: Vec<Value> },
}

impl HistoryResponse {
    fn into_rows(self) -> Vec<Value> {
        match self {
            HistoryResponse::Rows(rows) => rows,
            HistoryResponse::Wrapped { data } => data,
        }
    }
}

/// reqwest-backed client for the backend history endpoint
pub struct HttpHistoryClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpHistoryClient {
    pub fn new(server_url: &str, timeout: Duration) -> Result<Self, HistoryError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HistoryError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}{}", server_url.trim_end_matches('/'), HISTORY_PATH),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl HistoryClient for HttpHistoryClient {
    async fn query(&self, query: &HistoryQuery) -> Result<Vec<TransactionRecord>, HistoryError> {
        log::debug!("GET {} {:?}", self.endpoint, query.to_params());

        let response = self
            .client
            .get(&self.endpoint)
            .query(&query.to_params())
            .send()
            .await
            .map_err(|e| HistoryError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(HistoryError::Status(response.status().as_u16()));
        }

        let body: HistoryResponse = response
            .json()
            .await
            .map_err(|e| HistoryError::Decode(e.to_string()))?;

        // One bad row fails the page: dropping it would shorten the page and
        // fake the end-of-data signal.
        body.into_rows()
            .into_iter()
            .enumerate()
            .map(|(index, row)| {
                RawRecord::from_value(row)
                    .map_err(|e| HistoryError::Decode(format!("row {}: {}", index, e)))
            })
            .collect()
    }
}
