use {
    super::{page_cache::PageCache, paginator::SearchResultPaginator},
    crate::{
        history::{HistoryClient, HistoryError, HistoryQuery},
        record::{Filter, FilterError, TransactionRecord},
    },
    thiserror::Error,
};

/// Records to render plus the exhaustion flag
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub records: Vec<TransactionRecord>,
    pub no_more_data: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Unfiltered page, cached by page number
    Page,
    /// Filtered query, whole response kept for in-memory paging
    Search,
}

/// Remote query planned by the resolver, tagged with the generation it
/// belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub generation: u64,
    pub mode: FetchMode,
    pub page: usize,
    pub page_size: usize,
    pub filter: Filter,
    pub query: HistoryQuery,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Answered from the page cache or the search result set
    Ready(PageView),
    /// Needs the history endpoint; feed the outcome to `complete`
    Remote(FetchRequest),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ListError {
    #[error("invalid filter: {0}")]
    InvalidFilter(#[from] FilterError),

    #[error("page size must be greater than zero")]
    InvalidPageSize,

    #[error("pages start at 1")]
    InvalidPage,

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error("response for generation {0} was superseded by a newer request")]
    Superseded(u64),
}

/// Decides, per request, between the page cache, the in-memory search
/// result set and a remote query
///
/// Planning (`resolve` and the navigation methods) is synchronous and either
/// answers immediately or hands back a `FetchRequest`. The caller runs the
/// request and passes the outcome to `complete`. Each plan bumps the
/// generation; responses from an older generation are discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryModeResolver {
    page_cache: PageCache,
    paginator: SearchResultPaginator,
    /// Filter whose full result set the paginator currently holds
    search: Option<Filter>,
    filter: Filter,
    page: usize,
    page_size: usize,
    records: Vec<TransactionRecord>,
    rendered_page: usize,
    no_more_data: bool,
    loading: bool,
    last_error: Option<String>,
    generation: u64,
}

impl QueryModeResolver {
    pub fn new(page_size: usize) -> Result<Self, ListError> {
        if page_size == 0 {
            return Err(ListError::InvalidPageSize);
        }
        Ok(Self {
            page_cache: PageCache::new(page_size),
            paginator: SearchResultPaginator::new(),
            search: None,
            filter: Filter::default(),
            page: 1,
            page_size,
            records: Vec::new(),
            rendered_page: 1,
            no_more_data: false,
            loading: false,
            last_error: None,
            generation: 0,
        })
    }

    /// Plan the request for `page` at `page_size` under `filter`
    pub fn resolve(
        &mut self,
        page: usize,
        page_size: usize,
        filter: &Filter,
    ) -> Result<Resolution, ListError> {
        filter.validate()?;
        if page_size == 0 {
            return Err(ListError::InvalidPageSize);
        }
        if page == 0 {
            return Err(ListError::InvalidPage);
        }

        let filter = filter.normalized();
        if page_size != self.page_cache.page_size() {
            self.page_cache.resize(page_size);
        }
        if filter.is_active() {
            // Cached pages only describe the unfiltered list
            self.page_cache.invalidate_all();
        }
        if self.search.as_ref().is_some_and(|held| *held != filter) {
            self.search = None;
            self.paginator.clear();
        }

        self.filter = filter;
        self.page_size = page_size;
        self.page = page;
        self.generation += 1;

        if self.filter.is_active() {
            if self.search.is_some() {
                return Ok(Resolution::Ready(self.show_search_page(page)));
            }
            let query = HistoryQuery::search(page, page_size, &self.filter)?;
            return Ok(Resolution::Remote(self.plan_remote(FetchMode::Search, query)));
        }

        if let Some(cached) = self.page_cache.get(page) {
            self.records = cached.records.clone();
            self.no_more_data = cached.no_more_data;
            self.rendered_page = page;
            self.loading = false;
            self.last_error = None;
            return Ok(Resolution::Ready(self.view()));
        }

        let query = HistoryQuery::page(page, page_size);
        Ok(Resolution::Remote(self.plan_remote(FetchMode::Page, query)))
    }

    /// Apply the outcome of a planned request
    ///
    /// On failure the cache and the rendered records are left as they were,
    /// `no_more_data` is raised and the error is returned for display.
    pub fn complete(
        &mut self,
        request: FetchRequest,
        outcome: Result<Vec<TransactionRecord>, HistoryError>,
    ) -> Result<PageView, ListError> {
        if request.generation != self.generation {
            log::debug!(
                "Discarding response for page {} (generation {}, current {})",
                request.page,
                request.generation,
                self.generation
            );
            return Err(ListError::Superseded(request.generation));
        }

        self.loading = false;

        let records = match outcome {
            Ok(records) => records,
            Err(e) => {
                log::warn!("History fetch for page {} failed: {}", request.page, e);
                self.no_more_data = true;
                self.last_error = Some(e.to_string());
                self.page = self.rendered_page;
                return Err(ListError::History(e));
            }
        };

        self.last_error = None;
        match request.mode {
            FetchMode::Page => {
                let cached = self.page_cache.put(request.page, records);
                self.records = cached.records.clone();
                self.no_more_data = cached.no_more_data;
                self.rendered_page = request.page;
                self.page = request.page;
            }
            FetchMode::Search => {
                log::info!(
                    "Search {:?} matched {} records",
                    request.filter,
                    records.len()
                );
                self.paginator.set_result_set(records);
                self.search = Some(request.filter);
                self.show_search_page(1);
            }
        }

        Ok(self.view())
    }

    /// Plan and run a request against `client`
    pub async fn fetch(
        &mut self,
        client: &dyn HistoryClient,
        page: usize,
        page_size: usize,
        filter: &Filter,
    ) -> Result<PageView, ListError> {
        match self.resolve(page, page_size, filter)? {
            Resolution::Ready(view) => Ok(view),
            Resolution::Remote(request) => {
                let outcome = client.query(&request.query).await;
                self.complete(request, outcome)
            }
        }
    }

    pub fn next_page(&mut self) -> Result<Resolution, ListError> {
        if self.filter.is_active() {
            if self.search.is_none() && self.loading {
                // Result set not in yet; nothing to page through
                return Ok(Resolution::Ready(self.view()));
            }
            let next = self.page + 1;
            if next > self.search_page_count() {
                self.no_more_data = true;
                return Ok(Resolution::Ready(self.view()));
            }
            let filter = self.filter.clone();
            return self.resolve(next, self.page_size, &filter);
        }

        // Unfiltered: the fetch outcome tells whether there was anything left
        let filter = self.filter.clone();
        self.resolve(self.page + 1, self.page_size, &filter)
    }

    pub fn previous_page(&mut self) -> Result<Resolution, ListError> {
        if self.page <= 1 {
            return Ok(Resolution::Ready(self.view()));
        }
        let filter = self.filter.clone();
        self.resolve(self.page - 1, self.page_size, &filter)
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Result<Resolution, ListError> {
        if page_size == 0 {
            return Err(ListError::InvalidPageSize);
        }
        if page_size == self.page_size {
            return Ok(Resolution::Ready(self.view()));
        }
        self.page_cache.resize(page_size);
        let filter = self.filter.clone();
        self.resolve(1, page_size, &filter)
    }

    /// Start a new search; always goes back to the endpoint, so resubmitting
    /// the same filter retries it
    pub fn submit_filter(&mut self, filter: Filter) -> Result<Resolution, ListError> {
        filter.validate()?;
        self.no_more_data = false;
        self.search = None;
        self.paginator.clear();
        self.resolve(1, self.page_size, &filter)
    }

    /// Re-run the current page (cache and search set still apply)
    pub fn refresh(&mut self) -> Result<Resolution, ListError> {
        let filter = self.filter.clone();
        self.resolve(self.page, self.page_size, &filter)
    }

    pub fn view(&self) -> PageView {
        PageView {
            records: self.records.clone(),
            no_more_data: self.no_more_data,
        }
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn no_more_data(&self) -> bool {
        self.no_more_data
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of in-memory pages while a search result set is held
    pub fn page_count(&self) -> Option<usize> {
        self.search
            .as_ref()
            .map(|_| self.paginator.page_count(self.page_size))
    }

    pub fn page_cache(&self) -> &PageCache {
        &self.page_cache
    }

    pub fn paginator(&self) -> &SearchResultPaginator {
        &self.paginator
    }

    /// Record a problem that never reached the endpoint (bad form input)
    pub fn report_error(&mut self, error: &ListError) {
        self.last_error = Some(error.to_string());
    }

    fn search_page_count(&self) -> usize {
        self.page_count().unwrap_or(0)
    }

    fn plan_remote(&mut self, mode: FetchMode, query: HistoryQuery) -> FetchRequest {
        self.loading = true;
        FetchRequest {
            generation: self.generation,
            mode,
            page: self.page,
            page_size: self.page_size,
            filter: self.filter.clone(),
            query,
        }
    }

    fn show_search_page(&mut self, page: usize) -> PageView {
        let page_count = self.paginator.page_count(self.page_size);
        self.loading = false;

        if page > 1 && page > page_count {
            // Past the end: keep what is on screen
            self.page = self.rendered_page;
            self.no_more_data = true;
            return self.view();
        }

        self.records = self.paginator.slice(page, self.page_size).to_vec();
        self.paginator.set_current_page(page);
        self.page = page;
        self.rendered_page = page;
        self.no_more_data = page >= page_count;
        self.last_error = None;
        self.view()
    }
}
