#[cfg(test)]
mod tests {
    use crate::{
        history::HistoryQuery,
        list::{
            test_support::{records, ScriptedHistory},
            QueryModeResolver, SearchResultPaginator,
        },
        record::Filter,
    };

    /// Every record lands on exactly one page, in order, for any page size
    #[test]
    fn test_pages_partition_the_result_set() {
        for total in [0, 1, 49, 50, 51, 120] {
            let mut paginator = SearchResultPaginator::new();
            paginator.set_result_set(records(0, total));

            for page_size in [1, 7, 50, 100] {
                let page_count = paginator.page_count(page_size);
                let joined: Vec<_> = (1..=page_count)
                    .flat_map(|page| paginator.slice(page, page_size).to_vec())
                    .collect();

                assert_eq!(joined, records(0, total), "total {} size {}", total, page_size);
                assert!(paginator.slice(page_count + 1, page_size).is_empty());
            }
        }
    }

    /// Changing the page size forgets pages cut at the old size
    #[tokio::test]
    async fn test_page_size_change_refetches() {
        let history = ScriptedHistory::new(vec![Ok(records(0, 50)), Ok(records(0, 25))]);
        let mut resolver = QueryModeResolver::new(50).unwrap();
        let unfiltered = Filter::default();

        resolver.fetch(&history, 1, 50, &unfiltered).await.unwrap();
        let page = resolver.fetch(&history, 1, 25, &unfiltered).await.unwrap();

        assert_eq!(page.records.len(), 25);
        assert_eq!(
            history.queries(),
            vec![HistoryQuery::page(1, 50), HistoryQuery::page(1, 25)]
        );
        assert_eq!(resolver.page_cache().page_size(), 25);
        assert_eq!(resolver.page_cache().len(), 1);
    }

    /// A search with both bounds equal still goes out as a closed interval
    #[tokio::test]
    async fn test_point_interval_is_a_valid_search() {
        let history = ScriptedHistory::new(vec![Ok(records(0, 3))]);
        let mut resolver = QueryModeResolver::new(10).unwrap();

        let view = resolver
            .fetch(&history, 1, 10, &Filter::between(1_700_000_000, 1_700_000_000))
            .await
            .unwrap();

        assert_eq!(view.records.len(), 3);
        assert!(view.no_more_data);
        let query = &history.queries()[0];
        assert_eq!(query.interval.map(|i| (i.start, i.end)), Some((1_700_000_000, 1_700_000_000)));
        assert!(query.txhash.is_none());
    }
}
