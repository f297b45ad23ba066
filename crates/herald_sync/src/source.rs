//! Source abstraction for fetching candidate items.

use crate::error::SourceError;
use herald_protocol::{Item, ItemPage};
use parking_lot::Mutex;
use std::collections::VecDeque;

/// A source of candidate items.
///
/// Implementations issue one paginated query per call; the [`PagedItems`]
/// iterator follows cursors until the source reports no further page, so no
/// item is ever missed because it fell outside the first page.
pub trait ItemSource: Send + Sync {
    /// Fetches one page of items, starting from the given cursor.
    ///
    /// A `None` cursor requests the first page.
    fn fetch_page(&self, cursor: Option<&str>) -> Result<ItemPage, SourceError>;

    /// Returns a lazy iterator over every item the source has, across pages.
    fn items(&self) -> PagedItems<'_, Self>
    where
        Self: Sized,
    {
        PagedItems::new(self)
    }
}

/// A lazy, cursor-following iterator over a paginated source.
///
/// Pages are fetched on demand; iteration stops at the first error or when
/// the source reports no further cursor.
pub struct PagedItems<'a, S: ItemSource + ?Sized> {
    source: &'a S,
    cursor: Option<String>,
    buffer: VecDeque<Item>,
    started: bool,
    done: bool,
}

impl<'a, S: ItemSource + ?Sized> PagedItems<'a, S> {
    /// Creates an iterator positioned before the first page.
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            cursor: None,
            buffer: VecDeque::new(),
            started: false,
            done: false,
        }
    }
}

impl<S: ItemSource + ?Sized> Iterator for PagedItems<'_, S> {
    type Item = Result<Item, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Some(Ok(item));
            }
            if self.done {
                return None;
            }
            // No more buffered items: fetch the next page. After the first
            // page, a missing cursor means the source is exhausted.
            if self.started && self.cursor.is_none() {
                self.done = true;
                return None;
            }

            let page = match self.source.fetch_page(self.cursor.as_deref()) {
                Ok(page) => page,
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            };

            if self.started && page.next_cursor == self.cursor {
                // A cursor that never advances would loop forever.
                self.done = true;
                return Some(Err(SourceError::Malformed(
                    "pagination cursor did not advance".into(),
                )));
            }

            self.started = true;
            self.cursor = page.next_cursor;
            self.buffer = page.items.into();
        }
    }
}

/// A mock source for testing.
///
/// Serves a scripted sequence of pages and records the cursors requested.
#[derive(Debug, Default)]
pub struct MockSource {
    pages: Mutex<VecDeque<ItemPage>>,
    fail_with: Mutex<Option<SourceError>>,
    requested: Mutex<Vec<Option<String>>>,
}

impl MockSource {
    /// Creates a source with no pages.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source serving the given pages in order.
    pub fn with_pages(pages: Vec<ItemPage>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
            ..Self::default()
        }
    }

    /// Creates a source serving a single page of items.
    pub fn with_items(items: Vec<Item>) -> Self {
        Self::with_pages(vec![ItemPage::last(items)])
    }

    /// Makes the next fetch fail with the given error.
    pub fn set_error(&self, err: SourceError) {
        *self.fail_with.lock() = Some(err);
    }

    /// Returns the cursors requested so far.
    pub fn requested_cursors(&self) -> Vec<Option<String>> {
        self.requested.lock().clone()
    }

    /// Returns the number of fetch calls made.
    pub fn call_count(&self) -> usize {
        self.requested.lock().len()
    }
}

impl ItemSource for MockSource {
    fn fetch_page(&self, cursor: Option<&str>) -> Result<ItemPage, SourceError> {
        self.requested.lock().push(cursor.map(str::to_owned));

        if let Some(err) = self.fail_with.lock().take() {
            return Err(err);
        }

        Ok(self.pages.lock().pop_front().unwrap_or_default())
    }
}
