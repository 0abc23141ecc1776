use {crate::record::TransactionRecord, std::collections::HashMap};

/// Historical page as fetched, plus the exhaustion flag observed at fetch time
#[derive(Debug, Clone, PartialEq)]
pub struct CachedPage {
    pub records: Vec<TransactionRecord>,
    pub no_more_data: bool,
}

/// Unfiltered historical pages keyed by page number
///
/// Only valid for one page size. Changing the page size or activating a
/// filter clears the whole map; entries are never patched individually.
#[derive(Debug, Clone, PartialEq)]
pub struct PageCache {
    page_size: usize,
    pages: HashMap<usize, CachedPage>,
}

impl PageCache {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size,
            pages: HashMap::new(),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn get(&self, page: usize) -> Option<&CachedPage> {
        self.pages.get(&page)
    }

    /// Store a fetched page; a short page marks the end of the data
    pub fn put(&mut self, page: usize, records: Vec<TransactionRecord>) -> &CachedPage {
        let no_more_data = records.len() < self.page_size;
        log::debug!(
            "Caching page {} ({} records, size {})",
            page,
            records.len(),
            self.page_size
        );
        self.pages.insert(page, CachedPage { records, no_more_data });
        &self.pages[&page]
    }

    pub fn invalidate_all(&mut self) {
        if !self.pages.is_empty() {
            log::debug!("Invalidating {} cached pages", self.pages.len());
        }
        self.pages.clear();
    }

    /// Clear the cache and rebind it to a new page size
    pub fn resize(&mut self, page_size: usize) {
        self.invalidate_all();
        self.page_size = page_size;
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::list::test_support::records};

    #[test]
    fn test_put_marks_short_page_as_last() {
        let mut cache = PageCache::new(50);

        assert!(!cache.put(1, records(0, 50)).no_more_data);
        assert!(cache.put(2, records(50, 30)).no_more_data);
        assert_eq!(cache.get(2).map(|page| page.records.len()), Some(30));
        assert!(cache.get(3).is_none());
    }

    #[test]
    fn test_resize_drops_every_page() {
        let mut cache = PageCache::new(50);
        cache.put(1, records(0, 50));
        cache.put(2, records(50, 50));

        cache.resize(25);

        assert!(cache.is_empty());
        assert!(cache.get(1).is_none());
        assert!(cache.get(2).is_none());
        assert_eq!(cache.page_size(), 25);
    }
}
