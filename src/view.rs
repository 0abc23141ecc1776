//! Tab state machine and the explicit action -> effect transition function

use crate::{
    history::HistoryError,
    list::{FetchRequest, ListError, QueryModeResolver, Resolution},
    record::{Filter, TransactionRecord},
    stream::{Channel, StreamStats},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Swaps,
    Transfers,
    Historical,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Swaps, Tab::Transfers, Tab::Historical];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Swaps => "Swaps",
            Tab::Transfers => "Transfers",
            Tab::Historical => "History",
        }
    }

    /// Realtime channel rendered by this tab
    pub fn channel(self) -> Option<Channel> {
        match self {
            Tab::Swaps => Some(Channel::Swaps),
            Tab::Transfers => Some(Channel::Transfers),
            Tab::Historical => None,
        }
    }
}

/// Operator intent, or a fetch coming back
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SelectTab(Tab),
    NextPage,
    PreviousPage,
    SetPageSize(usize),
    SubmitFilter(Filter),
    ClearFilter,
    Refresh,
    FetchCompleted {
        request: FetchRequest,
        outcome: Result<Vec<TransactionRecord>, HistoryError>,
    },
}

/// Work the caller must run after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch(FetchRequest),
}

/// Everything the presentation layer needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSnapshot {
    pub tab: Tab,
    pub records: Vec<TransactionRecord>,
    pub page: usize,
    pub page_size: usize,
    /// Known only while paging a search result in memory
    pub page_count: Option<usize>,
    pub no_more_data: bool,
    pub loading: bool,
    pub last_error: Option<String>,
    pub filter: Filter,
    pub swaps: StreamStats,
    pub transfers: StreamStats,
    pub swaps_len: usize,
    pub transfers_len: usize,
}

/// Selects which source is rendered and routes list actions to the resolver
///
/// Tab selection never touches the resolver or the streams; list actions
/// work whichever tab is visible, the UI only offers them on the history tab.
#[derive(Debug, Clone)]
pub struct ViewController {
    tab: Tab,
    list: QueryModeResolver,
}

impl ViewController {
    pub fn new(page_size: usize) -> Result<Self, ListError> {
        Ok(Self {
            tab: Tab::default(),
            list: QueryModeResolver::new(page_size)?,
        })
    }

    /// Effects to run when the view first appears: the first history page
    pub fn mount(&mut self) -> Vec<Effect> {
        self.plan(QueryModeResolver::refresh)
    }

    pub fn apply(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::SelectTab(tab) => {
                if tab != self.tab {
                    log::debug!("Tab {} -> {}", self.tab.title(), tab.title());
                    self.tab = tab;
                }
                Vec::new()
            }
            Action::NextPage => self.plan(QueryModeResolver::next_page),
            Action::PreviousPage => self.plan(QueryModeResolver::previous_page),
            Action::SetPageSize(page_size) => self.plan(|list| list.set_page_size(page_size)),
            Action::SubmitFilter(filter) => self.plan(|list| list.submit_filter(filter)),
            Action::ClearFilter => self.plan(|list| list.submit_filter(Filter::default())),
            Action::Refresh => self.plan(QueryModeResolver::refresh),
            Action::FetchCompleted { request, outcome } => {
                match self.list.complete(request, outcome) {
                    Ok(view) => log::debug!(
                        "Page {} ready ({} records, no_more_data={})",
                        self.list.page(),
                        view.records.len(),
                        view.no_more_data
                    ),
                    // Already logged by the resolver
                    Err(ListError::Superseded(_)) | Err(ListError::History(_)) => {}
                    Err(e) => log::warn!("Fetch completion rejected: {}", e),
                }
                Vec::new()
            }
        }
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn list(&self) -> &QueryModeResolver {
        &self.list
    }

    fn plan<F>(&mut self, step: F) -> Vec<Effect>
    where
        F: FnOnce(&mut QueryModeResolver) -> Result<Resolution, ListError>,
    {
        match step(&mut self.list) {
            Ok(Resolution::Remote(request)) => vec![Effect::Fetch(request)],
            Ok(Resolution::Ready(_)) => Vec::new(),
            Err(e) => {
                log::warn!("Ignoring list action: {}", e);
                self.list.report_error(&e);
                Vec::new()
            }
        }
    }
}
