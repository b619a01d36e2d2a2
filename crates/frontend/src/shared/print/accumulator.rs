use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PrintError {
    #[error("Expected page {expected}, got page {got}")]
    OutOfOrder { expected: u32, got: u32 },

    #[error("All pages are already collected")]
    AlreadyDone,

    #[error("Print cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintState {
    Accumulating { page: u32 },
    Done,
}

/// Pages collected so far for a print view.
///
/// Pages must arrive in order starting at 1. Once the last page is appended
/// (or the collection is aborted) the accumulator is `active` and takes no
/// more pages.
#[derive(Debug, Clone, PartialEq)]
pub struct PrintAccumulator<T> {
    items: Vec<T>,
    page: u32,
    total_pages: u32,
    active: bool,
}

impl<T> PrintAccumulator<T> {
    /// Pages needed for `total_count` rows; an empty list still takes one page
    pub fn total_pages_for(total_count: u64, page_size: u32) -> u32 {
        let size = u64::from(page_size.max(1));
        total_count
            .div_ceil(size)
            .clamp(1, u64::from(u32::MAX)) as u32
    }

    pub fn new(total_count: u64, page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            total_pages: Self::total_pages_for(total_count, page_size),
            active: false,
        }
    }

    pub fn state(&self) -> PrintState {
        if self.active {
            PrintState::Done
        } else {
            PrintState::Accumulating { page: self.page }
        }
    }

    /// Page to request next, `None` once done
    pub fn next_page(&self) -> Option<u32> {
        (!self.active).then_some(self.page)
    }

    pub fn append(&mut self, page: u32, results: Vec<T>) -> Result<PrintState, PrintError> {
        if self.active {
            return Err(PrintError::AlreadyDone);
        }
        if page != self.page {
            return Err(PrintError::OutOfOrder {
                expected: self.page,
                got: page,
            });
        }

        self.items.extend(results);
        self.page += 1;
        if self.page > self.total_pages {
            self.active = true;
        }
        Ok(self.state())
    }

    /// Stop collecting and keep what was gathered
    pub fn abort(&mut self) {
        self.active = true;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}
