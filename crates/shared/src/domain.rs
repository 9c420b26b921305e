use std::path::PathBuf;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);
    };
}

id_newtype!(BookId);

impl BookId {
    /// Identity of a book the service has not persisted yet.
    pub const DRAFT: BookId = BookId(0);

    pub fn is_draft(self) -> bool {
        self == Self::DRAFT
    }
}

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortMode {
    Ascending,
    Descending,
}

impl SortMode {
    pub fn is_descending(self) -> bool {
        matches!(self, SortMode::Descending)
    }
}

/// A catalog entry as held on the client.
///
/// `image_path` and `is_selected` exist only client side: the path is the
/// local file picked during an edit, the flag drives bulk actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Book {
    pub id: BookId,
    pub name: String,
    pub image_blob: Option<String>,
    pub image_name: Option<String>,
    pub image_path: Option<PathBuf>,
    pub is_selected: bool,
}

impl Default for BookId {
    fn default() -> Self {
        Self::DRAFT
    }
}

impl Book {
    pub fn draft() -> Self {
        Self::default()
    }

    pub fn new(id: BookId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_image(mut self, blob: impl Into<String>) -> Self {
        self.image_blob = Some(blob.into());
        self
    }

    pub fn is_draft(&self) -> bool {
        self.id.is_draft()
    }

    /// Working copy handed to an edit session. Only the persisted fields
    /// travel; selection and any local image path stay behind.
    pub fn edit_copy(&self) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            image_blob: self.image_blob.clone(),
            ..Self::default()
        }
    }

    /// Image file name shown next to the book. Persisted books without an
    /// explicit name fall back to `<name without spaces>.img`.
    pub fn display_image_name(&self) -> Option<String> {
        match self.image_name.as_deref() {
            Some(name) if !name.trim().is_empty() => Some(name.to_string()),
            _ if !self.is_draft() => Some(format!("{}.img", self.name.replace(' ', ""))),
            _ => None,
        }
    }
}
