use std::path::PathBuf;

use shared::domain::Book;

use crate::{
    changes::{Change, Changes},
    error::ValidationError,
};

/// The single in-progress create or edit workflow.
///
/// Holds a working copy, never a reference into the collection; nothing
/// reaches the collection until a save succeeds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSession {
    book: Option<Book>,
    error: Option<String>,
}

impl EditSession {
    pub fn book(&self) -> Option<&Book> {
        self.book.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.book.is_some()
    }

    /// Opens `book` for editing. An already open session is replaced and its
    /// unsaved changes are dropped.
    pub fn open(&mut self, book: Book) -> Changes {
        self.book = Some(book);
        let mut changes = Changes::of(Change::EditSession);
        changes.merge(self.set_error(None));
        changes
    }

    pub fn close(&mut self) -> Changes {
        let mut changes = Changes::none();
        if self.book.take().is_some() {
            changes.mark(Change::EditSession);
        }
        changes.merge(self.set_error(None));
        changes
    }

    pub fn set_error(&mut self, error: Option<String>) -> Changes {
        if self.error == error {
            return Changes::none();
        }
        self.error = error;
        Changes::of(Change::EditError)
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Changes {
        match self.book.as_mut() {
            Some(book) => {
                book.name = name.into();
                Changes::of(Change::EditSession)
            }
            None => Changes::none(),
        }
    }

    pub fn set_image(&mut self, path: PathBuf, name: String, blob: String) -> Changes {
        match self.book.as_mut() {
            Some(book) => {
                book.image_path = Some(path);
                book.image_name = Some(name);
                book.image_blob = Some(blob);
                Changes::of(Change::EditSession)
            }
            None => Changes::none(),
        }
    }

    /// Local checks run before anything is sent to the service.
    pub fn validate(book: &Book) -> Result<(), ValidationError> {
        if book.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        if book.is_draft() && book.image_path.is_none() {
            return Err(ValidationError::MissingImage);
        }
        Ok(())
    }
}
