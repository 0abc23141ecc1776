use {
    crate::{
        history::{HistoryClient, HistoryError, HistoryQuery},
        record::TransactionRecord,
    },
    async_trait::async_trait,
    rust_decimal::Decimal,
    serde_json::json,
    std::{collections::VecDeque, sync::Mutex},
};

/// `count` records with hashes `0x{start:04x}` upwards
pub fn records(start: usize, count: usize) -> Vec<TransactionRecord> {
    (start..start + count)
        .map(|index| TransactionRecord {
            hash: format!("0x{:04x}", index),
            sender: "0xsender".to_string(),
            recipient: "0xrecipient".to_string(),
            amount0: Decimal::from(index as i64),
            amount1: Decimal::ONE,
            fee_eth: Decimal::new(21, 4),
            fee_usdt: Decimal::new(525, 2),
            price: json!("3400.12"),
            liquidity: json!("1000000"),
            tick: json!(201234),
        })
        .collect()
}

/// History client answering from a fixed script, recording every query
pub struct ScriptedHistory {
    responses: Mutex<VecDeque<Result<Vec<TransactionRecord>, HistoryError>>>,
    queries: Mutex<Vec<HistoryQuery>>,
}

impl ScriptedHistory {
    pub fn new(responses: Vec<Result<Vec<TransactionRecord>, HistoryError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    pub fn queries(&self) -> Vec<HistoryQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl HistoryClient for ScriptedHistory {
    async fn query(&self, query: &HistoryQuery) -> Result<Vec<TransactionRecord>, HistoryError> {
        self.queries.lock().unwrap().push(query.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(HistoryError::Transport("script exhausted".to_string())))
    }
}
