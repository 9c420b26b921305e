use std::path::PathBuf;

use shared::domain::BookId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill book name.")]
    MissingName,
    #[error("Please select book image.")]
    MissingImage,
}

/// Unsuccessful outcome of a call to the catalog service.
///
/// `message` is whatever the collaborator reported; when it has nothing to
/// say the status line is shown instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", describe_remote(.message, .status))]
pub struct RemoteError {
    pub message: Option<String>,
    pub status: Option<String>,
}

impl RemoteError {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            status: None,
        }
    }

    pub fn status(status: impl Into<String>) -> Self {
        Self {
            message: None,
            status: Some(status.into()),
        }
    }
}

fn describe_remote(message: &Option<String>, status: &Option<String>) -> String {
    match message {
        Some(message) if !message.is_empty() => message.clone(),
        _ => format!("Server Error:\n{}", status.as_deref().unwrap_or_default()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Please select only one book.")]
    ExactlyOne { selected: usize },
    #[error("There are no selected books.\nPlease select at least one book to delete.")]
    AtLeastOne,
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("failed to read image {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("unsupported image format for {path}; expected JPG or PNG")]
    UnsupportedFormat { path: PathBuf },
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error("no book is open for editing")]
    NoEditSession,
    #[error("book {0} is not in the loaded collection")]
    BookNotLoaded(BookId),
}

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;
