use std::cmp::Ordering;

use shared::domain::{Book, SortMode};

/// Name ordering for books. Ordinal and case sensitive; descending simply
/// reverses the ascending result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookOrder {
    descending: bool,
}

impl BookOrder {
    pub fn new(mode: SortMode) -> Self {
        Self {
            descending: mode.is_descending(),
        }
    }

    pub fn compare(&self, a: &Book, b: &Book) -> Ordering {
        let ordering = a.name.cmp(&b.name);
        if self.descending {
            ordering.reverse()
        } else {
            ordering
        }
    }

    /// Stable full sort; books with equal names keep their relative order.
    pub fn sort(&self, books: &mut [Book]) {
        books.sort_by(|a, b| self.compare(a, b));
    }

    /// Index at which `book` keeps `books` ordered. `books` must already be
    /// sorted by this order.
    pub fn insertion_point(&self, books: &[Book], book: &Book) -> usize {
        match books.binary_search_by(|probe| self.compare(probe, book)) {
            Ok(index) | Err(index) => index,
        }
    }

    pub fn is_sorted(&self, books: &[Book]) -> bool {
        books
            .windows(2)
            .all(|pair| self.compare(&pair[0], &pair[1]) != Ordering::Greater)
    }
}
