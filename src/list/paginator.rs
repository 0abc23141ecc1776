use crate::record::TransactionRecord;

/// Full result set of the active search, paginated in memory
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResultPaginator {
    records: Vec<TransactionRecord>,
    page: usize,
}

impl Default for SearchResultPaginator {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchResultPaginator {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            page: 1,
        }
    }

    /// Replace the held set and go back to the first page
    pub fn set_result_set(&mut self, records: Vec<TransactionRecord>) {
        self.records = records;
        self.page = 1;
    }

    pub fn clear(&mut self) {
        self.set_result_set(Vec::new());
    }

    /// Records of `page` (1-based); empty past the end
    pub fn slice(&self, page: usize, page_size: usize) -> &[TransactionRecord] {
        if page == 0 || page_size == 0 {
            return &[];
        }
        let start = (page - 1).saturating_mul(page_size);
        if start >= self.records.len() {
            return &[];
        }
        let end = start.saturating_add(page_size).min(self.records.len());
        &self.records[start..end]
    }

    pub fn page_count(&self, page_size: usize) -> usize {
        if page_size == 0 {
            return 0;
        }
        self.records.len().div_ceil(page_size)
    }

    pub fn current_page(&self) -> usize {
        self.page
    }

    pub fn set_current_page(&mut self, page: usize) {
        self.page = page;
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
