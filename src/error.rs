use {
    crate::{config::ConfigError, history::HistoryError, list::ListError, stream::StreamError},
    thiserror::Error,
};

/// Errors that can end the application
///
/// Fetch and stream failures are recovered inside the view-model; they only
/// show up here while wiring things together at start-up.
#[derive(Debug, Error)]
pub enum FeeWatchError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error(transparent)]
    List(#[from] ListError),

    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

pub type FeeWatchResult<T> = Result<T, FeeWatchError>;
