//! Lazy, paged iteration over a key range.

use std::collections::VecDeque;

use skv_types::PhysicalKey;
use tracing::trace;

use crate::error::StoreResult;
use crate::traits::OrderedStore;
use crate::types::{KeyRange, ListOptions, RawEntry};

/// A single-pass cursor over a [`KeyRange`].
///
/// Pages are fetched from the store on demand, `batch_size` entries at a
/// time, resuming after the last key seen. Entries committed behind the
/// cursor are not revisited; entries committed ahead of it may be seen.
/// Dropping the iterator abandons the scan. After an error the iterator is
/// fused and yields nothing further.
pub struct ListIterator<'a, S: OrderedStore + ?Sized> {
    store: &'a S,
    range: KeyRange,
    options: ListOptions,
    last_key: Option<PhysicalKey>,
    buffer: VecDeque<RawEntry>,
    yielded: usize,
    exhausted: bool,
}

impl<'a, S: OrderedStore + ?Sized> ListIterator<'a, S> {
    /// Create a cursor over `range` on `store`. No I/O happens until the
    /// first call to `next`.
    pub fn new(store: &'a S, range: KeyRange, options: ListOptions) -> Self {
        let exhausted = range.is_empty() || options.limit == Some(0);
        Self {
            store,
            range,
            options,
            last_key: None,
            buffer: VecDeque::new(),
            yielded: 0,
            exhausted,
        }
    }

    fn remaining(&self) -> Option<usize> {
        self.options.limit.map(|limit| limit.saturating_sub(self.yielded))
    }

    fn fill(&mut self) -> StoreResult<()> {
        let mut page_size = self.options.batch_size.max(1);
        if let Some(remaining) = self.remaining() {
            page_size = page_size.min(remaining);
        }

        let page = self.store.scan(
            &self.range,
            self.last_key.as_ref(),
            page_size,
            self.options.reverse,
        )?;
        trace!(
            fetched = page.entries.len(),
            has_more = page.has_more,
            "list page"
        );

        if let Some(last) = page.entries.last() {
            self.last_key = Some(last.key.clone());
        }
        if !page.has_more || page.entries.is_empty() {
            self.exhausted = true;
        }
        self.buffer.extend(page.entries);
        Ok(())
    }
}

impl<S: OrderedStore + ?Sized> Iterator for ListIterator<'_, S> {
    type Item = StoreResult<RawEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining() == Some(0) {
            return None;
        }
        if self.buffer.is_empty() && !self.exhausted {
            if let Err(e) = self.fill() {
                self.exhausted = true;
                self.buffer.clear();
                return Some(Err(e));
            }
        }
        let entry = self.buffer.pop_front()?;
        self.yielded += 1;
        Some(Ok(entry))
    }
}

impl<S: OrderedStore + ?Sized> std::iter::FusedIterator for ListIterator<'_, S> {}
