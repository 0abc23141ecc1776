//! Runtime driver
//!
//! Owns the view controller, the history client and both stream
//! aggregators. Actions go through `ViewController::apply`; the returned
//! effects are run here and their completions are fed back as actions, so
//! every state change passes through the same transition function.

use {
    crate::{
        config::Config,
        error::FeeWatchResult,
        history::HistoryClient,
        stream::{Channel, EventSource, StreamAggregator},
        view::{Action, Effect, Tab, ViewController, ViewSnapshot},
    },
    std::sync::Arc,
    tokio::sync::mpsc,
};

/// Sizes used when opening the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppSettings {
    pub page_size: usize,
    pub stream_buffer_capacity: usize,
}

impl From<&Config> for AppSettings {
    fn from(config: &Config) -> Self {
        Self {
            page_size: config.page_size,
            stream_buffer_capacity: config.stream_buffer_capacity,
        }
    }
}

pub struct App {
    view: ViewController,
    history: Arc<dyn HistoryClient>,
    swaps: StreamAggregator,
    transfers: StreamAggregator,
    completion_tx: mpsc::UnboundedSender<Action>,
    completion_rx: mpsc::UnboundedReceiver<Action>,
    pending: usize,
}

impl App {
    /// Subscribe both channels and issue the first history fetch
    ///
    /// If the second subscription fails the first one is released before
    /// the error is returned.
    pub async fn open(
        settings: AppSettings,
        history: Arc<dyn HistoryClient>,
        events: &dyn EventSource,
    ) -> FeeWatchResult<Self> {
        let view = ViewController::new(settings.page_size)?;
        let swaps =
            StreamAggregator::open(events, Channel::Swaps, settings.stream_buffer_capacity).await?;
        let transfers =
            StreamAggregator::open(events, Channel::Transfers, settings.stream_buffer_capacity)
                .await?;

        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let mut app = Self {
            view,
            history,
            swaps,
            transfers,
            completion_tx,
            completion_rx,
            pending: 0,
        };

        let effects = app.view.mount();
        app.run_effects(effects);
        log::info!("✅ View mounted (page size {})", settings.page_size);

        Ok(app)
    }

    pub fn dispatch(&mut self, action: Action) {
        let effects = self.view.apply(action);
        self.run_effects(effects);
    }

    /// Wait for the next fetch to come back and apply it
    ///
    /// Returns false when nothing is in flight.
    pub async fn process_next_completion(&mut self) -> bool {
        if self.pending == 0 {
            return false;
        }
        match self.completion_rx.recv().await {
            Some(action) => {
                self.apply_completion(action);
                true
            }
            None => false,
        }
    }

    /// Next finished fetch, for callers multiplexing with other input
    pub async fn next_completion(&mut self) -> Option<Action> {
        self.completion_rx.recv().await
    }

    pub fn apply_completion(&mut self, action: Action) {
        self.pending = self.pending.saturating_sub(1);
        self.dispatch(action);
    }

    /// Apply completions until no fetch is in flight
    pub async fn settle(&mut self) {
        while self.process_next_completion().await {}
    }

    pub fn pending_fetches(&self) -> usize {
        self.pending
    }

    pub fn view(&self) -> &ViewController {
        &self.view
    }

    pub fn aggregator(&self, channel: Channel) -> &StreamAggregator {
        match channel {
            Channel::Swaps => &self.swaps,
            Channel::Transfers => &self.transfers,
        }
    }

    pub async fn snapshot(&self) -> ViewSnapshot {
        let tab = self.view.tab();
        let list = self.view.list();

        let records = match tab.channel() {
            Some(channel) => self.aggregator(channel).snapshot().await,
            None => list.records().to_vec(),
        };

        ViewSnapshot {
            tab,
            records,
            page: list.page(),
            page_size: list.page_size(),
            page_count: list.page_count(),
            no_more_data: list.no_more_data(),
            loading: tab == Tab::Historical && list.loading(),
            last_error: list.last_error().map(str::to_string),
            filter: list.filter().clone(),
            swaps: self.swaps.stats().await,
            transfers: self.transfers.stats().await,
            swaps_len: self.swaps.len().await,
            transfers_len: self.transfers.len().await,
        }
    }

    /// Release both subscriptions; fetches still in flight are left to
    /// finish and their results dropped
    pub fn close(self) {
        log::info!("Closing view ({} fetches in flight)", self.pending);
        self.swaps.close();
        self.transfers.close();
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Fetch(request) => {
                    let history = self.history.clone();
                    let completions = self.completion_tx.clone();
                    self.pending += 1;

                    tokio::spawn(async move {
                        let outcome = history.query(&request.query).await;
                        // Receiver is gone once the app is closed
                        let _ = completions.send(Action::FetchCompleted { request, outcome });
                    });
                }
            }
        }
    }
}
