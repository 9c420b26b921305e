use async_trait::async_trait;
use reqwest::{Client, Response};
use shared::{
    domain::{Book, BookId},
    error::ApiError,
    protocol::BookRecord,
};
use tracing::{debug, warn};
use url::Url;

use crate::{config::ClientSettings, error::RemoteError, BookService};

/// `BookService` backed by the catalog's JSON-over-HTTP resource.
///
/// All four verbs share one resource URL: list is `GET`, create `POST`,
/// update `PUT`, and bulk delete `DELETE` with the id array as body.
#[derive(Debug, Clone)]
pub struct HttpBookService {
    http: Client,
    resource_url: Url,
}

impl HttpBookService {
    pub fn new(settings: &ClientSettings) -> Result<Self, RemoteError> {
        let resource_url = settings
            .resource_url()
            .map_err(|err| RemoteError::message(format!("invalid api url: {err}")))?;
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|err| RemoteError::message(err.to_string()))?;
        Ok(Self { http, resource_url })
    }

    pub fn resource_url(&self) -> &Url {
        &self.resource_url
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response, RemoteError> {
        let response = request.send().await.map_err(|err| {
            warn!("catalog: request to {} failed: {err}", self.resource_url);
            RemoteError::message(err.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!("catalog: {} responded {status}", self.resource_url);
        match serde_json::from_str::<ApiError>(&body) {
            Ok(api_error) => Err(RemoteError {
                message: Some(api_error.message),
                status: Some(status.to_string()),
            }),
            Err(_) => Err(RemoteError::status(
                status.canonical_reason().unwrap_or(status.as_str()),
            )),
        }
    }

    async fn read_book(response: Response) -> Result<Book, RemoteError> {
        let record: BookRecord = response
            .json()
            .await
            .map_err(|err| RemoteError::message(format!("malformed book response: {err}")))?;
        Ok(record.into())
    }
}

#[async_trait]
impl BookService for HttpBookService {
    async fn fetch_all(&self) -> Result<Vec<Book>, RemoteError> {
        let response = self.send(self.http.get(self.resource_url.clone())).await?;
        let records: Vec<BookRecord> = response
            .json()
            .await
            .map_err(|err| RemoteError::message(format!("malformed book list: {err}")))?;
        debug!("catalog: fetched {} books", records.len());
        Ok(records.into_iter().map(Book::from).collect())
    }

    async fn create(&self, book: &Book) -> Result<Book, RemoteError> {
        let response = self
            .send(
                self.http
                    .post(self.resource_url.clone())
                    .json(&BookRecord::from(book)),
            )
            .await?;
        Self::read_book(response).await
    }

    async fn update(&self, book: &Book) -> Result<Book, RemoteError> {
        let response = self
            .send(
                self.http
                    .put(self.resource_url.clone())
                    .json(&BookRecord::from(book)),
            )
            .await?;
        Self::read_book(response).await
    }

    async fn delete_by_ids(&self, ids: &[BookId]) -> Result<(), RemoteError> {
        self.send(self.http.delete(self.resource_url.clone()).json(ids))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
