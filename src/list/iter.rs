//! Lazy cursor-driven iteration over list endpoints
//!
//! [`ListIter`] turns a "fetch one page" closure into a single sequence of
//! items spanning every page the API is willing to return.
//!
//! # Contract
//!
//! - The first page is fetched inside [`ListIter::new`]. Construction never
//!   fails; a first-page error is recorded and handed back by the first call
//!   to `next`.
//! - Later pages are fetched only when the current one is exhausted, the last
//!   page reported `has_more`, and the caller did not ask for a single page.
//! - Errors are sticky: once a fetch fails, every call to `next` returns a
//!   clone of that error and no further requests are made.
//! - After the last item, `next` returns `None` on every call.
//! - A page with no items but `has_more` set keeps the previous cursor and is
//!   fetched again. After [`MAX_EMPTY_PAGES`] such pages in a row the
//!   iterator records an error, so `!stopped()` always means `next` yields.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::params::{ListParams, ENDING_BEFORE, STARTING_AFTER};
use super::query::Query;
use crate::error::{Error, Result};

/// Anything that can appear in a list response and serve as a cursor
pub trait ListObject {
    fn id(&self) -> &str;
}

/// Pagination metadata of a single page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMeta {
    #[serde(default)]
    pub has_more: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Decoded list envelope: `{"data": [...], "has_more": ..}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(flatten)]
    pub meta: ListMeta,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, meta: ListMeta) -> Self {
        Self { data, meta }
    }
}

/// Consecutive empty `has_more` pages tolerated before giving up
pub const MAX_EMPTY_PAGES: usize = 3;

type PageFetch<T> = Box<dyn FnMut(&Query) -> Result<Page<T>> + Send>;

/// Iterator over every item of a paginated list
pub struct ListIter<T> {
    buffer: VecDeque<T>,
    meta: ListMeta,
    err: Option<Error>,
    fetch: PageFetch<T>,
    query: Query,
    cursor: Option<String>,
    single: bool,
    backward: bool,
    empty_pages: usize,
}

impl<T: ListObject> ListIter<T> {
    /// Create the iterator and fetch the first page.
    ///
    /// `params == None` means the caller did not ask for traversal, so only
    /// one page is ever requested.
    pub fn new<F>(params: Option<&ListParams>, query: Query, fetch: F) -> Self
    where
        F: FnMut(&Query) -> Result<Page<T>> + Send + 'static,
    {
        let (single, backward) = match params {
            Some(p) => (p.single, p.is_backward()),
            None => (true, false),
        };

        let mut iter = Self {
            buffer: VecDeque::new(),
            meta: ListMeta::default(),
            err: None,
            fetch: Box::new(fetch),
            query,
            cursor: None,
            single,
            backward,
            empty_pages: 0,
        };
        iter.load_page();
        iter
    }

    /// True once nothing more can be yielded without an error being replayed.
    ///
    /// Pure query; poll it before each `next`.
    pub fn stopped(&self) -> bool {
        self.err.is_some() || (self.buffer.is_empty() && !self.can_advance())
    }

    /// Metadata of the most recently loaded page
    pub fn meta(&self) -> &ListMeta {
        &self.meta
    }

    /// The recorded error, if any
    pub fn err(&self) -> Option<&Error> {
        self.err.as_ref()
    }

    fn can_advance(&self) -> bool {
        self.meta.has_more && !self.single && self.cursor.is_some()
    }

    fn load_page(&mut self) {
        match (self.fetch)(&self.query) {
            Ok(page) => {
                let mut items = page.data;
                // pages arrive in list order; walk away from the ending_before cursor
                if self.backward {
                    items.reverse();
                }
                // an empty page leaves the cursor where it was
                match items.last() {
                    Some(item) => {
                        self.cursor = Some(item.id().to_string());
                        self.empty_pages = 0;
                    }
                    None => self.empty_pages += 1,
                }
                tracing::debug!(
                    "Loaded page: {} items, has_more={}",
                    items.len(),
                    page.meta.has_more
                );
                self.buffer = items.into();
                self.meta = page.meta;
            }
            Err(err) => {
                tracing::debug!("Page fetch failed: {}", err);
                self.buffer.clear();
                self.cursor = None;
                self.err = Some(err);
            }
        }
    }
}

impl<T: ListObject> Iterator for ListIter<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(err) = &self.err {
                return Some(Err(err.clone()));
            }

            if let Some(item) = self.buffer.pop_front() {
                return Some(Ok(item));
            }

            if !self.can_advance() {
                return None;
            }

            if self.empty_pages >= MAX_EMPTY_PAGES {
                self.err = Some(Error::decode(format!(
                    "{} consecutive empty pages reported has_more",
                    self.empty_pages
                )));
                continue;
            }

            let cursor = self.cursor.clone()?;
            let key = if self.backward {
                ENDING_BEFORE
            } else {
                STARTING_AFTER
            };
            self.query.set(key, cursor);
            self.load_page();
        }
    }
}

impl<T> fmt::Debug for ListIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListIter")
            .field("buffered", &self.buffer.len())
            .field("meta", &self.meta)
            .field("err", &self.err)
            .field("query", &self.query)
            .field("single", &self.single)
            .field("backward", &self.backward)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq)]
    struct Item(String);

    impl ListObject for Item {
        fn id(&self) -> &str {
            &self.0
        }
    }

    fn page(ids: &[&str], has_more: bool) -> Result<Page<Item>> {
        Ok(Page::new(
            ids.iter().map(|id| Item(id.to_string())).collect(),
            ListMeta {
                has_more,
                total_count: Some(5),
                url: None,
            },
        ))
    }

    /// Serves `pages` in order and records each query it was called with
    fn source(
        pages: Vec<Result<Page<Item>>>,
    ) -> (
        impl FnMut(&Query) -> Result<Page<Item>> + Send + 'static,
        Arc<Mutex<Vec<Query>>>,
    ) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        let mut pages = pages.into_iter();
        let fetch = move |q: &Query| {
            log.lock().unwrap().push(q.clone());
            pages.next().expect("fetched past the last fake page")
        };
        (fetch, seen)
    }

    fn three_pages() -> Vec<Result<Page<Item>>> {
        vec![
            page(&["a", "b"], true),
            page(&["c", "d"], true),
            page(&["e"], false),
        ]
    }

    #[test]
    fn test_flattens_pages_in_order() {
        let (fetch, seen) = source(three_pages());
        let params = ListParams::new().limit(2);
        let mut it = ListIter::new(Some(&params), Query::new(), fetch);

        let mut ids = Vec::new();
        while !it.stopped() {
            ids.push(it.next().unwrap().unwrap().0);
        }

        assert_eq!(ids, vec!["a", "b", "c", "d", "e"]);
        assert!(it.next().is_none());
        assert!(it.next().is_none());
        assert_eq!(seen.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_first_page_fetched_eagerly() {
        let (fetch, seen) = source(three_pages());
        let it = ListIter::new(Some(&ListParams::new()), Query::new(), fetch);
        assert_eq!(seen.lock().unwrap().len(), 1);
        assert!(!it.stopped());
    }

    #[test]
    fn test_cursor_is_last_item_of_previous_page() {
        let (fetch, seen) = source(three_pages());
        let mut q = Query::new();
        q.add("limit", "2");
        let it = ListIter::new(Some(&ListParams::new()), q, fetch);
        let _: Vec<_> = it.collect();

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].get(STARTING_AFTER), None);
        assert_eq!(seen[1].get(STARTING_AFTER), Some("b"));
        assert_eq!(seen[2].get(STARTING_AFTER), Some("d"));
        assert!(seen.iter().all(|q| q.get("limit") == Some("2")));
    }

    #[test]
    fn test_error_on_second_page_is_sticky() {
        let (fetch, seen) = source(vec![
            page(&["a", "b"], true),
            Err(Error::transport("connection reset")),
            page(&["e"], false),
        ]);
        let mut it = ListIter::new(Some(&ListParams::new()), Query::new(), fetch);

        assert_eq!(it.next(), Some(Ok(Item("a".into()))));
        assert_eq!(it.next(), Some(Ok(Item("b".into()))));

        let expected = Error::transport("connection reset");
        assert_eq!(it.next(), Some(Err(expected.clone())));
        assert!(it.stopped());
        assert_eq!(it.next(), Some(Err(expected.clone())));
        assert_eq!(it.next(), Some(Err(expected)));
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_first_page_error_is_terminal() {
        let (fetch, seen) = source(vec![Err(Error::decode("bad json"))]);
        let mut it = ListIter::new(Some(&ListParams::new()), Query::new(), fetch);

        assert!(it.stopped());
        assert_eq!(it.err(), Some(&Error::decode("bad json")));
        assert_eq!(it.next(), Some(Err(Error::decode("bad json"))));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_single_page_mode_ignores_has_more() {
        let (fetch, seen) = source(three_pages());
        let params = ListParams::new().single();
        let mut it = ListIter::new(Some(&params), Query::new(), fetch);

        assert_eq!(it.next(), Some(Ok(Item("a".into()))));
        assert!(!it.stopped());
        assert_eq!(it.next(), Some(Ok(Item("b".into()))));
        assert!(it.stopped());
        assert!(it.meta().has_more);
        assert_eq!(it.next(), None);
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_absent_params_fetch_one_page() {
        let (fetch, seen) = source(three_pages());
        let it = ListIter::new(None, Query::new(), fetch);
        let ids: Vec<_> = it.map(|r| r.unwrap().0).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_meta_reflects_latest_page() {
        let meta_one = ListMeta {
            has_more: true,
            total_count: Some(3),
            url: Some("/v1/one".into()),
        };
        let meta_two = ListMeta {
            has_more: false,
            total_count: Some(30),
            url: Some("/v1/two".into()),
        };
        let (fetch, _) = source(vec![
            Ok(Page::new(vec![Item("a".into())], meta_one.clone())),
            Ok(Page::new(vec![Item("b".into())], meta_two.clone())),
        ]);
        let mut it = ListIter::new(Some(&ListParams::new()), Query::new(), fetch);

        assert_eq!(it.meta(), &meta_one);
        it.next();
        assert_eq!(it.meta(), &meta_one);
        it.next();
        assert_eq!(it.meta(), &meta_two);
    }

    #[test]
    fn test_backward_paging_reverses_and_uses_ending_before() {
        let (fetch, seen) = source(vec![page(&["c", "d"], true), page(&["a", "b"], false)]);
        let params = ListParams::new().ending_before("e");
        let mut q = Query::new();
        params.append_to(&mut q);
        let it = ListIter::new(Some(&params), q, fetch);

        let ids: Vec<_> = it.map(|r| r.unwrap().0).collect();
        assert_eq!(ids, vec!["d", "c", "b", "a"]);

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].get(ENDING_BEFORE), Some("e"));
        assert_eq!(seen[1].get(ENDING_BEFORE), Some("c"));
        assert_eq!(seen[1].get(STARTING_AFTER), None);
    }

    #[test]
    fn test_empty_page_with_has_more_stops() {
        let (fetch, seen) = source(vec![page(&[], true)]);
        let mut it = ListIter::new(Some(&ListParams::new()), Query::new(), fetch);
        assert!(it.stopped());
        assert_eq!(it.next(), None);
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_empty_page_mid_list_is_refetched() {
        let (fetch, seen) = source(vec![
            page(&["a"], true),
            page(&[], true),
            page(&["z"], false),
        ]);
        let mut it = ListIter::new(Some(&ListParams::new()), Query::new(), fetch);

        let mut ids = Vec::new();
        while !it.stopped() {
            ids.push(it.next().expect("not stopped").unwrap().0);
        }

        assert_eq!(ids, vec!["a", "z"]);
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[1].get(STARTING_AFTER), Some("a"));
        assert_eq!(seen[2].get(STARTING_AFTER), Some("a"));
    }

    #[test]
    fn test_endless_empty_pages_become_an_error() {
        let mut pages = vec![page(&["a"], true)];
        pages.extend((0..MAX_EMPTY_PAGES).map(|_| page(&[], true)));
        let (fetch, seen) = source(pages);
        let mut it = ListIter::new(Some(&ListParams::new()), Query::new(), fetch);

        assert_eq!(it.next(), Some(Ok(Item("a".into()))));
        assert!(!it.stopped());
        assert!(matches!(it.next(), Some(Err(Error::Decode { .. }))));
        assert!(it.stopped());
        assert_eq!(seen.lock().unwrap().len(), 1 + MAX_EMPTY_PAGES);
    }

    #[test]
    fn test_page_decodes_wire_shape() {
        #[derive(Debug, Deserialize)]
        struct Obj {
            id: String,
        }
        let body = r#"{"object": "list", "url": "/v1/charges", "has_more": true, "total_count": 7, "data": [{"id": "ch_1"}]}"#;
        let page: Page<Obj> = serde_json::from_str(body).unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].id, "ch_1");
        assert!(page.meta.has_more);
        assert_eq!(page.meta.total_count, Some(7));
        assert_eq!(page.meta.url.as_deref(), Some("/v1/charges"));
    }
}
