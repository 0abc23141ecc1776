//! List view-model for blockchain fee records
//!
//! Two realtime tabs (swaps, transfers) fed by push streams and one
//! historical tab that pages through a remote query endpoint, with an
//! optional hash-prefix / time-interval search.

#[cfg(test)]
mod tests;

pub mod app;
pub mod config;
pub mod error;
pub mod history;
pub mod list;
pub mod record;
pub mod stream;
pub mod ui;
pub mod view;

pub use {
    app::{App, AppSettings},
    config::Config,
    error::{FeeWatchError, FeeWatchResult},
    record::{Filter, TransactionRecord},
    view::{Action, Effect, Tab, ViewController, ViewSnapshot},
};
