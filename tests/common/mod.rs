//! Shared fixtures for the integration tests

#![allow(dead_code)]

use {
    async_trait::async_trait,
    feewatch::{
        history::{HistoryClient, HistoryError, HistoryQuery},
        record::TransactionRecord,
        stream::{Channel, ChannelEventSource},
        App,
    },
    rust_decimal::Decimal,
    serde_json::{json, Value},
    std::{sync::Mutex, time::Duration},
};

pub fn record(index: usize) -> TransactionRecord {
    TransactionRecord {
        hash: format!("0x{:064x}", index),
        sender: "0x00000000000000000000000000000000000000aa".to_string(),
        recipient: "0x00000000000000000000000000000000000000bb".to_string(),
        amount0: Decimal::from(index as i64),
        amount1: Decimal::new(-5, 1),
        fee_eth: Decimal::new(42, 5),
        fee_usdt: Decimal::new(131, 2),
        price: json!("3120.55"),
        liquidity: json!("889000000000"),
        tick: json!(-195000),
    }
}

pub fn records(start: usize, count: usize) -> Vec<TransactionRecord> {
    (start..start + count).map(record).collect()
}

/// Wire form of a realtime swap/transfer message
pub fn event_payload(hash: &str, amount0: &str) -> Value {
    json!({
        "hash": hash,
        "sender": "0xabc",
        "recipient": "0xdef",
        "amount0": amount0,
        "amount1": "-2",
        "feeETH": "0.0004",
        "feeUSDT": "1.2",
        "price": "3120.55",
        "liquidity": "889000000000",
        "tick": -195000,
    })
}

/// Backend stand-in: pages an unfiltered table, and answers any filtered
/// query with its full search result
pub struct FakeBackend {
    table: Vec<TransactionRecord>,
    search_result: Vec<TransactionRecord>,
    queries: Mutex<Vec<HistoryQuery>>,
    failure: Mutex<Option<HistoryError>>,
}

impl FakeBackend {
    pub fn new(table: Vec<TransactionRecord>, search_result: Vec<TransactionRecord>) -> Self {
        Self {
            table,
            search_result,
            queries: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
        }
    }

    /// Fail the next query with `error`
    pub fn fail_next(&self, error: HistoryError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    pub fn queries(&self) -> Vec<HistoryQuery> {
        self.queries.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl HistoryClient for FakeBackend {
    async fn query(&self, query: &HistoryQuery) -> Result<Vec<TransactionRecord>, HistoryError> {
        self.queries.lock().unwrap().push(query.clone());
        if let Some(error) = self.failure.lock().unwrap().take() {
            return Err(error);
        }

        if query.is_filtered() {
            return Ok(self.search_result.clone());
        }
        Ok(self
            .table
            .iter()
            .skip((query.page - 1) * query.limit)
            .take(query.limit)
            .cloned()
            .collect())
    }
}

/// Wait until the aggregator for `channel` holds `expected` records
pub async fn wait_for_stream_len(app: &App, channel: Channel, expected: usize) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while app.aggregator(channel).len().await != expected {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("stream did not reach expected length");
}

/// Wait until nobody listens on `channel` any more
pub async fn wait_for_release(events: &ChannelEventSource, channel: Channel) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while events.subscriber_count(channel) != 0 {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("subscription was not released");
}
