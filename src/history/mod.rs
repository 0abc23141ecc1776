//! Historical transaction query
//!
//! The resolver only sees the `HistoryClient` trait. `HttpHistoryClient`
//! talks to the `/transaction/getHistory` endpoint of the backend.

pub mod client;

pub use client::HttpHistoryClient;

use {
    crate::record::{Filter, FilterError, TimeInterval, TransactionRecord},
    async_trait::async_trait,
    thiserror::Error,
};

/// One request against the historical endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    pub page: usize,
    pub limit: usize,
    pub txhash: Option<String>,
    pub interval: Option<TimeInterval>,
}

impl HistoryQuery {
    /// Plain page request, no filter fields
    pub fn page(page: usize, limit: usize) -> Self {
        Self {
            page,
            limit,
            txhash: None,
            interval: None,
        }
    }

    /// Filtered request; refuses a half-open interval
    pub fn search(page: usize, limit: usize, filter: &Filter) -> Result<Self, FilterError> {
        Ok(Self {
            page,
            limit,
            txhash: filter.hash_prefix().map(str::to_string),
            interval: filter.interval()?,
        })
    }

    pub fn is_filtered(&self) -> bool {
        self.txhash.is_some() || self.interval.is_some()
    }

    /// Query-string parameters in wire naming
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(txhash) = &self.txhash {
            params.push(("txhash", txhash.clone()));
        }
        if let Some(interval) = self.interval {
            params.push(("startTime", interval.start.to_string()));
            params.push(("endTime", interval.end.to_string()));
        }
        params
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HistoryError {
    #[error("history request failed: {0}")]
    Transport(String),

    #[error("history endpoint returned HTTP {0}")]
    Status(u16),

    #[error("history response could not be decoded: {0}")]
    Decode(String),
}

#[async_trait]
pub trait HistoryClient: Send + Sync {
    /// Fetch one page (or, with a filter, the full matching set)
    async fn query(&self, query: &HistoryQuery) -> Result<Vec<TransactionRecord>, HistoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_page_has_no_filter_params() {
        let params = HistoryQuery::page(2, 50).to_params();
        assert_eq!(
            params,
            vec![("page", "2".to_string()), ("limit", "50".to_string())]
        );
    }

    #[test]
    fn test_search_params_carry_both_bounds() {
        let filter = Filter {
            txhash: Some(" 0xabc ".to_string()),
            start_time: Some(1_700_000_000),
            end_time: Some(1_700_086_400),
        };
        let query = HistoryQuery::search(1, 25, &filter).unwrap();

        assert!(query.is_filtered());
        assert_eq!(
            query.to_params(),
            vec![
                ("page", "1".to_string()),
                ("limit", "25".to_string()),
                ("txhash", "0xabc".to_string()),
                ("startTime", "1700000000".to_string()),
                ("endTime", "1700086400".to_string()),
            ]
        );
    }

    #[test]
    fn test_search_refuses_half_interval() {
        let filter = Filter {
            end_time: Some(1_700_000_000),
            ..Filter::default()
        };
        assert_eq!(
            HistoryQuery::search(1, 25, &filter),
            Err(FilterError::HalfOpenInterval("end"))
        );
    }
}
