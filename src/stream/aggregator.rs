use {
    super::{source::Subscription, Channel, EventSource, StreamError},
    crate::record::{RawRecord, RecordError, TransactionRecord},
    serde_json::Value,
    std::{collections::VecDeque, sync::Arc},
    tokio::{sync::RwLock, task::JoinHandle},
};

/// Message counters for one channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub accepted: u64,
    pub rejected: u64,
}

/// Newest-first records received on one channel
///
/// With a non-zero capacity the oldest records are evicted once full;
/// capacity 0 keeps everything.
#[derive(Debug, Clone)]
pub struct StreamBuffer {
    records: VecDeque<TransactionRecord>,
    capacity: Option<usize>,
    stats: StreamStats,
}

impl StreamBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = (capacity > 0).then_some(capacity);
        Self {
            records: VecDeque::with_capacity(capacity.unwrap_or(0)),
            capacity,
            stats: StreamStats::default(),
        }
    }

    /// Prepend a record, evicting from the tail when bounded
    pub fn push(&mut self, record: TransactionRecord) {
        self.records.push_front(record);
        if let Some(capacity) = self.capacity {
            self.records.truncate(capacity);
        }
    }

    /// Parse one wire message and prepend it; malformed messages are counted
    /// and returned as errors without touching the records
    pub fn ingest(&mut self, payload: Value) -> Result<(), RecordError> {
        match RawRecord::from_value(payload) {
            Ok(record) => {
                self.stats.accepted += 1;
                self.push(record);
                Ok(())
            }
            Err(e) => {
                self.stats.rejected += 1;
                Err(e)
            }
        }
    }

    pub fn newest(&self) -> Option<&TransactionRecord> {
        self.records.front()
    }

    pub fn snapshot(&self) -> Vec<TransactionRecord> {
        self.records.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn stats(&self) -> StreamStats {
        self.stats
    }
}

/// Accumulates one realtime channel into a shared `StreamBuffer`
///
/// Owns the subscription through its background task; `close` or drop
/// aborts the task, which releases the subscription.
pub struct StreamAggregator {
    channel: Channel,
    buffer: Arc<RwLock<StreamBuffer>>,
    task: Option<JoinHandle<()>>,
}

impl StreamAggregator {
    pub async fn open(
        source: &dyn EventSource,
        channel: Channel,
        capacity: usize,
    ) -> Result<Self, StreamError> {
        let subscription = source.subscribe(channel).await?;
        let buffer = Arc::new(RwLock::new(StreamBuffer::new(capacity)));
        let task = tokio::spawn(aggregate(subscription, buffer.clone()));

        log::info!(
            "📡 {} aggregator started (capacity: {})",
            channel,
            if capacity == 0 {
                "unbounded".to_string()
            } else {
                capacity.to_string()
            }
        );

        Ok(Self {
            channel,
            buffer,
            task: Some(task),
        })
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn buffer(&self) -> Arc<RwLock<StreamBuffer>> {
        self.buffer.clone()
    }

    pub async fn snapshot(&self) -> Vec<TransactionRecord> {
        self.buffer.read().await.snapshot()
    }

    pub async fn len(&self) -> usize {
        self.buffer.read().await.len()
    }

    pub async fn stats(&self) -> StreamStats {
        self.buffer.read().await.stats()
    }

    /// Wait until the source ends the subscription
    pub async fn closed(&mut self) {
        if let Some(task) = self.task.as_mut() {
            if let Err(e) = task.await {
                log::warn!("{} aggregator task failed: {}", self.channel, e);
            }
            self.task = None;
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    pub fn close(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            log::info!("{} aggregator stopped", self.channel);
        }
    }
}

impl Drop for StreamAggregator {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn aggregate(mut subscription: Subscription, buffer: Arc<RwLock<StreamBuffer>>) {
    let channel = subscription.channel();

    while let Some(payload) = subscription.recv().await {
        let mut buffer = buffer.write().await;
        match buffer.ingest(payload) {
            Ok(()) => {
                if let Some(record) = buffer.newest() {
                    log::debug!(
                        "{} event: hash={} feeETH={} feeUSDT={}",
                        channel,
                        record.hash,
                        record.fee_eth,
                        record.fee_usdt
                    );
                }
            }
            Err(e) => log::warn!("Dropping malformed {} message: {}", channel, e),
        }
    }

    log::info!("{} subscription ended", channel);
}
