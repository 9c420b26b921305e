use serde::{Deserialize, Serialize};

use crate::domain::{Book, BookId};

/// Book as it travels over the wire. Client-only fields never leave the
/// process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    pub id: BookId,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base64_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_name: Option<String>,
}

impl From<&Book> for BookRecord {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            name: book.name.clone(),
            base64_image: book.image_blob.clone(),
            image_name: book.display_image_name(),
        }
    }
}

impl From<BookRecord> for Book {
    fn from(record: BookRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            image_blob: record.base64_image,
            image_name: record.image_name,
            ..Book::default()
        }
    }
}
