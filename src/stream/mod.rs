//! Realtime swap/transfer streams
//!
//! An `EventSource` hands out one scoped `Subscription` per named event. A
//! `StreamAggregator` owns that subscription and prepends every well-formed
//! message to its `StreamBuffer`; dropping the aggregator releases the
//! subscription.

pub mod aggregator;
pub mod backoff;
pub mod source;

pub use aggregator::{StreamAggregator, StreamBuffer, StreamStats};
pub use source::{ChannelEventSource, EventSource, HttpEventSource, Subscription};

use {std::fmt, thiserror::Error};

/// Realtime event category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Swaps,
    Transfers,
}

impl Channel {
    /// Event name on the wire
    pub fn event_name(self) -> &'static str {
        match self {
            Channel::Swaps => "swapEvent",
            Channel::Transfers => "transferEvent",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Channel::Swaps => "swaps",
            Channel::Transfers => "transfers",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("event source connection failed: {0}")]
    Connection(String),

    #[error("event source returned HTTP {0}")]
    Status(u16),
}
