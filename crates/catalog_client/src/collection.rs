use std::collections::HashSet;

use shared::domain::{Book, BookId, SortMode};

use crate::{
    changes::{Change, Changes},
    ordering::BookOrder,
};

/// While a sort mode is active the books stay ordered by name under it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionState {
    books: Vec<Book>,
    sort_mode: Option<SortMode>,
    connected: bool,
    loaded: bool,
}

impl CollectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn sort_mode(&self) -> Option<SortMode> {
        self.sort_mode
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn find(&self, id: BookId) -> Option<&Book> {
        self.books.iter().find(|book| book.id == id)
    }

    pub fn position(&self, id: BookId) -> Option<usize> {
        self.books.iter().position(|book| book.id == id)
    }

    pub(crate) fn book_mut(&mut self, id: BookId) -> Option<&mut Book> {
        self.books.iter_mut().find(|book| book.id == id)
    }

    pub(crate) fn remove_at(&mut self, index: usize) -> Book {
        self.books.remove(index)
    }

    pub(crate) fn insert_at(&mut self, index: usize, book: Book) {
        self.books.insert(index, book);
    }

    /// Repeated ids keep their first occurrence.
    pub fn load_all(&mut self, mut books: Vec<Book>) -> Changes {
        let mut seen = HashSet::with_capacity(books.len());
        books.retain(|book| seen.insert(book.id));
        if let Some(mode) = self.sort_mode {
            BookOrder::new(mode).sort(&mut books);
        }
        self.books = books;
        self.loaded = true;
        Changes::of(Change::Books)
    }

    pub fn reset_sort(&mut self) -> Changes {
        if self.sort_mode.take().is_some() {
            Changes::of(Change::SortMode)
        } else {
            Changes::none()
        }
    }

    pub fn set_connected(&mut self, connected: bool) -> Changes {
        if self.connected == connected {
            return Changes::none();
        }
        self.connected = connected;
        Changes::of(Change::Connected)
    }

    /// Ignored until a collection has been loaded.
    pub fn set_sort_mode(&mut self, mode: Option<SortMode>) -> Changes {
        if !self.loaded {
            return Changes::none();
        }

        let mut changes = Changes::none();
        if let Some(mode) = mode {
            BookOrder::new(mode).sort(&mut self.books);
            changes.mark(Change::Books);
        }
        if self.sort_mode != mode {
            self.sort_mode = mode;
            changes.mark(Change::SortMode);
        }
        changes
    }

    pub fn toggle_selection(&mut self, id: BookId, value: bool) -> Changes {
        match self.book_mut(id) {
            Some(book) if book.is_selected != value => {
                book.is_selected = value;
                Changes::of(Change::Selection)
            }
            _ => Changes::none(),
        }
    }

    pub fn select_all(&mut self) -> Changes {
        self.set_all_selected(true)
    }

    pub fn unselect_all(&mut self) -> Changes {
        self.set_all_selected(false)
    }

    fn set_all_selected(&mut self, value: bool) -> Changes {
        let mut changes = Changes::none();
        for book in self.books.iter_mut().filter(|book| book.is_selected != value) {
            book.is_selected = value;
            changes.mark(Change::Selection);
        }
        changes
    }

    pub fn selected(&self) -> impl Iterator<Item = &Book> {
        self.books.iter().filter(|book| book.is_selected)
    }

    pub fn selected_count(&self) -> usize {
        self.selected().count()
    }

    pub fn selected_ids(&self) -> Vec<BookId> {
        self.selected().map(|book| book.id).collect()
    }

    pub fn remove_where_selected(&mut self) -> (usize, Changes) {
        self.remove_matching(|book| book.is_selected)
    }

    pub fn remove_ids(&mut self, ids: &HashSet<BookId>) -> (usize, Changes) {
        self.remove_matching(|book| ids.contains(&book.id))
    }

    fn remove_matching(&mut self, predicate: impl Fn(&Book) -> bool) -> (usize, Changes) {
        let before = self.books.len();
        self.books.retain(|book| !predicate(book));
        let removed = before - self.books.len();
        let changes = if removed > 0 {
            Changes::of(Change::Books)
        } else {
            Changes::none()
        };
        (removed, changes)
    }
}

#[cfg(test)]
#[path = "tests/collection_tests.rs"]
mod tests;
