use std::collections::HashSet;

use shared::domain::{Book, BookId, SortMode};
use tracing::debug;

use crate::{
    changes::{Change, Changes},
    collection::CollectionState,
    error::CatalogError,
    ordering::BookOrder,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePlan {
    InPlaceSameName,
    InPlaceUnsorted,
    Reposition(SortMode),
}

impl UpdatePlan {
    pub fn classify(original: &Book, updated: &Book, sort_mode: Option<SortMode>) -> Self {
        if updated.name == original.name {
            return Self::InPlaceSameName;
        }
        match sort_mode {
            None => Self::InPlaceUnsorted,
            Some(mode) => Self::Reposition(mode),
        }
    }
}

pub fn is_noop_edit(original: &Book, draft: &Book) -> bool {
    draft.name == original.name && draft.image_path.is_none()
}

/// A renamed book under an active sort is always removed and reinserted,
/// even when it would land on the same index.
pub fn apply_update(
    state: &mut CollectionState,
    original_id: BookId,
    updated: Book,
) -> Result<(UpdatePlan, Changes), CatalogError> {
    let index = state
        .position(original_id)
        .ok_or(CatalogError::BookNotLoaded(original_id))?;
    let plan = UpdatePlan::classify(&state.books()[index], &updated, state.sort_mode());
    debug!(book_id = original_id.0, ?plan, "reconcile: applying update");

    match plan {
        UpdatePlan::InPlaceSameName => {
            if let Some(book) = state.book_mut(original_id) {
                book.image_blob = updated.image_blob;
                book.image_name = updated.image_name;
            }
        }
        UpdatePlan::InPlaceUnsorted => {
            if let Some(book) = state.book_mut(original_id) {
                book.name = updated.name;
                book.image_blob = updated.image_blob;
                book.image_name = updated.image_name;
            }
        }
        UpdatePlan::Reposition(mode) => {
            state.remove_at(index);
            let target = BookOrder::new(mode).insertion_point(state.books(), &updated);
            state.insert_at(target, updated);
        }
    }

    Ok((plan, Changes::of(Change::Books)))
}

pub fn apply_delete(state: &mut CollectionState, ids: &[BookId]) -> (usize, Changes) {
    let ids: HashSet<BookId> = ids.iter().copied().collect();
    state.remove_ids(&ids)
}

#[cfg(test)]
#[path = "tests/reconcile_tests.rs"]
mod tests;
