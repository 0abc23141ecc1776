use {
    super::{
        backoff::{BackoffPolicy, ExponentialBackoff},
        Channel, StreamError,
    },
    async_trait::async_trait,
    futures_util::StreamExt,
    serde_json::Value,
    std::{
        sync::{Mutex, PoisonError},
        time::Duration,
    },
    tokio::{sync::mpsc, task::JoinHandle},
};

/// Realtime collaborator: hands out one subscription per named event
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn subscribe(&self, channel: Channel) -> Result<Subscription, StreamError>;
}

/// Scoped handle on one event stream
///
/// Messages are delivered in arrival order. The connection behind the handle
/// (if any) is released by `close` or on drop, whichever comes first.
pub struct Subscription {
    channel: Channel,
    receiver: mpsc::UnboundedReceiver<Value>,
    reader: Option<JoinHandle<()>>,
}

impl Subscription {
    pub fn new(
        channel: Channel,
        receiver: mpsc::UnboundedReceiver<Value>,
        reader: Option<JoinHandle<()>>,
    ) -> Self {
        Self {
            channel,
            receiver,
            reader,
        }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Next payload, or `None` once the source has gone away
    pub async fn recv(&mut self) -> Option<Value> {
        self.receiver.recv().await
    }

    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        self.receiver.close();
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
        log::debug!("Released {} subscription", self.channel);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

/// In-process event source; publishers push payloads directly
#[derive(Default)]
pub struct ChannelEventSource {
    subscribers: Mutex<Vec<(Channel, mpsc::UnboundedSender<Value>)>>,
}

impl ChannelEventSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `payload` to every live subscriber of `channel`; returns how
    /// many received it
    pub fn publish(&self, channel: Channel, payload: Value) -> usize {
        let mut subscribers = self.subscribers.lock().unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|(_, sender)| !sender.is_closed());
        subscribers
            .iter()
            .filter(|(subscribed, _)| *subscribed == channel)
            .filter(|(_, sender)| sender.send(payload.clone()).is_ok())
            .count()
    }

    pub fn subscriber_count(&self, channel: Channel) -> usize {
        let mut subscribers = self.subscribers.lock().unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|(_, sender)| !sender.is_closed());
        subscribers
            .iter()
            .filter(|(subscribed, _)| *subscribed == channel)
            .count()
    }

    /// Drop every subscriber of `channel`, ending their streams
    pub fn disconnect(&self, channel: Channel) {
        let mut subscribers = self.subscribers.lock().unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|(subscribed, _)| *subscribed != channel);
    }
}

#[async_trait]
impl EventSource for ChannelEventSource {
    async fn subscribe(&self, channel: Channel) -> Result<Subscription, StreamError> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((channel, sender));
        Ok(Subscription::new(channel, receiver, None))
    }
}

/// Event source reading newline-delimited JSON from `GET {base}/events`
///
/// Each line is either the bare payload or `{"event": name, "data": payload}`.
/// Dropped connections are retried with exponential backoff; once retries are
/// exhausted the subscription ends.
pub struct HttpEventSource {
    client: reqwest::Client,
    base_url: String,
    backoff: BackoffPolicy,
}

impl HttpEventSource {
    pub fn new(base_url: &str) -> Result<Self, StreamError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| StreamError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            backoff: BackoffPolicy::default(),
        })
    }

    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    fn events_url(&self) -> String {
        format!("{}/events", self.base_url)
    }
}

#[async_trait]
impl EventSource for HttpEventSource {
    async fn subscribe(&self, channel: Channel) -> Result<Subscription, StreamError> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let reader = tokio::spawn(read_events(
            self.client.clone(),
            self.events_url(),
            channel,
            sender,
            self.backoff,
        ));
        log::info!("🔌 Subscribed to {} at {}", channel.event_name(), self.base_url);
        Ok(Subscription::new(channel, receiver, Some(reader)))
    }
}

async fn read_events(
    client: reqwest::Client,
    url: String,
    channel: Channel,
    sender: mpsc::UnboundedSender<Value>,
    policy: BackoffPolicy,
) {
    let mut backoff = ExponentialBackoff::new(policy);

    loop {
        match stream_once(&client, &url, channel, &sender, &mut backoff).await {
            Ok(()) => log::info!("{} stream ended by server", channel),
            Err(e) => log::warn!("❌ {} stream error: {}", channel, e),
        }

        if sender.is_closed() {
            return;
        }
        if let Err(e) = backoff.sleep().await {
            log::error!("Giving up on {} stream: {}", channel, e);
            return;
        }
    }
}

async fn stream_once(
    client: &reqwest::Client,
    url: &str,
    channel: Channel,
    sender: &mpsc::UnboundedSender<Value>,
    backoff: &mut ExponentialBackoff,
) -> Result<(), StreamError> {
    let response = client
        .get(url)
        .query(&[("event", channel.event_name())])
        .send()
        .await
        .map_err(|e| StreamError::Connection(e.to_string()))?;

    if !response.status().is_success() {
        return Err(StreamError::Status(response.status().as_u16()));
    }

    log::info!("✅ Connected to {} stream", channel);

    let mut body = response.bytes_stream();
    let mut pending: Vec<u8> = Vec::new();

    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|e| StreamError::Connection(e.to_string()))?;
        pending.extend_from_slice(&chunk);

        while let Some(newline) = pending.iter().position(|byte| *byte == b'\n') {
            let line: Vec<u8> = pending.drain(..=newline).collect();
            if !forward_line(&line, channel, sender, backoff) {
                return Ok(());
            }
        }
    }

    // Last line may come without a terminating newline
    if !pending.is_empty() {
        log::debug!("{} stream ended mid-line ({} bytes)", channel, pending.len());
        forward_line(&pending, channel, sender, backoff);
    }

    Ok(())
}

/// Send one decoded line; false once the subscription is closed on our side
///
/// Only a delivered payload resets the backoff; connecting alone does not.
fn forward_line(
    line: &[u8],
    channel: Channel,
    sender: &mpsc::UnboundedSender<Value>,
    backoff: &mut ExponentialBackoff,
) -> bool {
    match decode_event_line(line, channel) {
        Some(payload) => {
            backoff.reset();
            sender.send(payload).is_ok()
        }
        None => true,
    }
}

/// Extract the payload for `channel` from one line of the event stream
///
/// Blank lines, lines for other events and unparsable lines yield `None`.
pub fn decode_event_line(line: &[u8], channel: Channel) -> Option<Value> {
    let text = std::str::from_utf8(line).ok()?.trim();
    if text.is_empty() {
        return None;
    }

    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Dropping unparsable {} line: {}", channel, e);
            return None;
        }
    };

    match (value.get("event").and_then(Value::as_str), value.get("data")) {
        (Some(event), Some(data)) if event == channel.event_name() => Some(data.clone()),
        (Some(_), Some(_)) => None,
        _ => Some(value),
    }
}
