use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use shared::domain::{Book, BookId, SortMode};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

pub mod changes;
pub mod collection;
pub mod config;
pub mod error;
pub mod image;
pub mod ordering;
pub mod reconcile;
pub mod session;
pub mod transport;

pub use changes::{Change, Changes};
pub use collection::CollectionState;
pub use error::{
    CatalogError, CatalogResult, ImageError, RemoteError, SelectionError, ValidationError,
};
pub use image::FsImageSource;
pub use reconcile::UpdatePlan;
pub use session::EditSession;
pub use transport::HttpBookService;

use reconcile::{apply_delete, apply_update, is_noop_edit};

const SAVED_NOTICE: &str = "The book was successfully saved.";
const DELETE_PREVIEW_LIMIT: usize = 10;
const EVENT_CAPACITY: usize = 256;

#[async_trait]
pub trait BookService: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<Book>, RemoteError>;
    async fn create(&self, book: &Book) -> Result<Book, RemoteError>;
    async fn update(&self, book: &Book) -> Result<Book, RemoteError>;
    async fn delete_by_ids(&self, ids: &[BookId]) -> Result<(), RemoteError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub file_name: String,
    pub base64: String,
}

#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn load_encoded(&self, path: &Path) -> Result<EncodedImage, ImageError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEvent {
    Changed(Changes),
    Notice(String),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSnapshot {
    pub books: Vec<Book>,
    pub connected: bool,
    pub sort_mode: Option<SortMode>,
    pub edit: Option<Book>,
    pub edit_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePreview {
    pub count: usize,
    pub names: Vec<String>,
    pub truncated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Not inserted locally; the next list fetch brings it in.
    Created(BookId),
    Updated(UpdatePlan),
    Unchanged,
}

#[derive(Debug, Default)]
struct CatalogState {
    collection: CollectionState,
    session: EditSession,
}

/// Commands hold the state lock across the remote call, so mutations never
/// overlap.
pub struct Catalog {
    service: Arc<dyn BookService>,
    images: Arc<dyn ImageSource>,
    inner: Mutex<CatalogState>,
    events: broadcast::Sender<CatalogEvent>,
}

impl Catalog {
    pub fn new(service: Arc<dyn BookService>) -> Self {
        Self::new_with_image_source(service, Arc::new(FsImageSource))
    }

    pub fn new_with_image_source(
        service: Arc<dyn BookService>,
        images: Arc<dyn ImageSource>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            service,
            images,
            inner: Mutex::new(CatalogState::default()),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> CatalogSnapshot {
        let guard = self.inner.lock().await;
        CatalogSnapshot {
            books: guard.collection.books().to_vec(),
            connected: guard.collection.is_connected(),
            sort_mode: guard.collection.sort_mode(),
            edit: guard.session.book().cloned(),
            edit_error: guard.session.error().map(str::to_string),
        }
    }

    fn publish(&self, changes: &Changes) {
        if !changes.is_empty() {
            let _ = self.events.send(CatalogEvent::Changed(changes.clone()));
        }
    }

    fn report(&self, message: impl Into<String>) {
        let _ = self.events.send(CatalogEvent::Error(message.into()));
    }

    /// A fresh list always arrives unsorted.
    pub async fn request_list(&self) -> CatalogResult<Changes> {
        let mut guard = self.inner.lock().await;
        let state = &mut *guard;

        match self.service.fetch_all().await {
            Ok(books) => {
                info!("catalog: loaded {} books", books.len());
                let mut changes = state.collection.reset_sort();
                changes.merge(state.collection.load_all(books));
                changes.merge(state.collection.set_connected(true));
                changes.merge(state.session.close());
                self.publish(&changes);
                Ok(changes)
            }
            Err(err) => {
                warn!("catalog: list fetch failed: {err}");
                let changes = state.collection.set_connected(false);
                self.publish(&changes);
                self.report(err.to_string());
                Err(err.into())
            }
        }
    }

    pub async fn set_sort(&self, mode: Option<SortMode>) -> Changes {
        let changes = self.inner.lock().await.collection.set_sort_mode(mode);
        debug!(?mode, "catalog: sort mode set");
        self.publish(&changes);
        changes
    }

    pub async fn toggle_select(&self, id: BookId, value: bool) -> Changes {
        let changes = self
            .inner
            .lock()
            .await
            .collection
            .toggle_selection(id, value);
        self.publish(&changes);
        changes
    }

    pub async fn select_all(&self) -> Changes {
        let changes = self.inner.lock().await.collection.select_all();
        self.publish(&changes);
        changes
    }

    pub async fn unselect_all(&self) -> Changes {
        let changes = self.inner.lock().await.collection.unselect_all();
        self.publish(&changes);
        changes
    }

    pub async fn open_new_edit(&self) -> Changes {
        let changes = self.inner.lock().await.session.open(Book::draft());
        self.publish(&changes);
        changes
    }

    pub async fn open_edit_existing(&self) -> CatalogResult<Changes> {
        let mut guard = self.inner.lock().await;
        let state = &mut *guard;

        let selected = state.collection.selected_count();
        if selected != 1 {
            let err = SelectionError::ExactlyOne { selected };
            self.report(err.to_string());
            return Err(err.into());
        }

        let Some(copy) = state.collection.selected().next().map(Book::edit_copy) else {
            return Err(SelectionError::ExactlyOne { selected }.into());
        };
        debug!(book_id = copy.id.0, "catalog: editing existing book");
        let changes = state.session.open(copy);
        self.publish(&changes);
        Ok(changes)
    }

    pub async fn set_edit_name(&self, name: impl Into<String>) -> CatalogResult<Changes> {
        let mut guard = self.inner.lock().await;
        if !guard.session.is_open() {
            return Err(CatalogError::NoEditSession);
        }
        let changes = guard.session.set_name(name);
        self.publish(&changes);
        Ok(changes)
    }

    pub async fn choose_image(&self, path: impl Into<PathBuf>) -> CatalogResult<Changes> {
        let path = path.into();
        let mut guard = self.inner.lock().await;
        if !guard.session.is_open() {
            return Err(CatalogError::NoEditSession);
        }

        let image = match self.images.load_encoded(&path).await {
            Ok(image) => image,
            Err(err) => {
                warn!("catalog: image selection failed: {err}");
                self.report(err.to_string());
                return Err(err.into());
            }
        };

        let changes = guard
            .session
            .set_image(path, image.file_name, image.base64);
        self.publish(&changes);
        Ok(changes)
    }

    pub async fn close_edit(&self) -> Changes {
        let changes = self.inner.lock().await.session.close();
        self.publish(&changes);
        changes
    }

    pub async fn save(&self) -> CatalogResult<SaveOutcome> {
        let mut guard = self.inner.lock().await;
        let state = &mut *guard;

        let draft = state
            .session
            .book()
            .cloned()
            .ok_or(CatalogError::NoEditSession)?;
        let mut changes = state.session.set_error(None);

        if let Err(err) = EditSession::validate(&draft) {
            changes.merge(state.session.set_error(Some(err.to_string())));
            self.publish(&changes);
            return Err(err.into());
        }

        if draft.is_draft() {
            return match self.service.create(&draft).await {
                Ok(created) => {
                    info!(book_id = created.id.0, "catalog: book created");
                    changes.merge(state.session.close());
                    self.publish(&changes);
                    let _ = self.events.send(CatalogEvent::Notice(SAVED_NOTICE.into()));
                    Ok(SaveOutcome::Created(created.id))
                }
                Err(err) => Err(self.save_failed(&mut state.session, changes, err)),
            };
        }

        let Some(original) = state.collection.find(draft.id) else {
            let err = CatalogError::BookNotLoaded(draft.id);
            changes.merge(state.session.set_error(Some(err.to_string())));
            self.publish(&changes);
            return Err(err);
        };
        if is_noop_edit(original, &draft) {
            debug!(book_id = draft.id.0, "catalog: edit changed nothing");
            changes.merge(state.session.close());
            self.publish(&changes);
            return Ok(SaveOutcome::Unchanged);
        }

        match self.service.update(&draft).await {
            Ok(updated) => {
                let (plan, applied) = apply_update(&mut state.collection, draft.id, updated)?;
                info!(book_id = draft.id.0, ?plan, "catalog: book updated");
                changes.merge(applied);
                changes.merge(state.session.close());
                self.publish(&changes);
                let _ = self.events.send(CatalogEvent::Notice(SAVED_NOTICE.into()));
                Ok(SaveOutcome::Updated(plan))
            }
            Err(err) => Err(self.save_failed(&mut state.session, changes, err)),
        }
    }

    fn save_failed(
        &self,
        session: &mut EditSession,
        mut changes: Changes,
        err: RemoteError,
    ) -> CatalogError {
        warn!("catalog: save failed: {err}");
        changes.merge(session.set_error(Some(err.to_string())));
        self.publish(&changes);
        err.into()
    }

    pub async fn delete_preview(&self) -> CatalogResult<DeletePreview> {
        let guard = self.inner.lock().await;
        let count = guard.collection.selected_count();
        if count == 0 {
            let err = SelectionError::AtLeastOne;
            self.report(err.to_string());
            return Err(err.into());
        }

        let names = guard
            .collection
            .selected()
            .take(DELETE_PREVIEW_LIMIT)
            .map(|book| book.name.clone())
            .collect();
        Ok(DeletePreview {
            count,
            names,
            truncated: count > DELETE_PREVIEW_LIMIT,
        })
    }

    pub async fn delete_selected(&self) -> CatalogResult<usize> {
        let mut guard = self.inner.lock().await;
        let ids = guard.collection.selected_ids();
        if ids.is_empty() {
            let err = SelectionError::AtLeastOne;
            self.report(err.to_string());
            return Err(err.into());
        }

        if let Err(err) = self.service.delete_by_ids(&ids).await {
            warn!("catalog: delete of {} books failed: {err}", ids.len());
            self.report(err.to_string());
            return Err(err.into());
        }

        let (removed, changes) = apply_delete(&mut guard.collection, &ids);
        info!("catalog: deleted {removed} books");
        self.publish(&changes);
        Ok(removed)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
