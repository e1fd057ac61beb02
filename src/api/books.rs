//! Client for the book-management endpoints.
//!
//! Every call passes its request through [`SessionManager::decorate`] so the
//! bearer token rides along when one is held; the server decides which
//! operations actually require it.

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::api::error::{rejection, ClientError};
use crate::auth::SessionManager;
use crate::models::{Book, BookResponse, BooksResponse, NewBook};

const BOOKS_PATH: &str = "/api/v1/books";

const BOOKS_FALLBACK: &str = "book request failed";

pub struct BooksClient {
    http: Client,
    base_url: String,
}

impl BooksClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub async fn list(&self, session: &SessionManager) -> Result<Vec<Book>, ClientError> {
        let url = format!("{}{}", self.base_url, BOOKS_PATH);
        let response: BooksResponse = self.send(session.decorate(self.http.get(&url))).await?;
        debug!(count = response.books.len(), "fetched book list");
        Ok(response.books)
    }

    pub async fn get(&self, session: &SessionManager, id: i64) -> Result<Book, ClientError> {
        let url = format!("{}{}/{}", self.base_url, BOOKS_PATH, id);
        let response: BookResponse = self.send(session.decorate(self.http.get(&url))).await?;
        Ok(response.book)
    }

    pub async fn create(&self, session: &SessionManager, book: &NewBook) -> Result<Book, ClientError> {
        let url = format!("{}{}", self.base_url, BOOKS_PATH);
        let response: BookResponse = self
            .send(session.decorate(self.http.post(&url).json(book)))
            .await?;
        debug!(id = response.book.id, "created book");
        Ok(response.book)
    }

    pub async fn update(
        &self,
        session: &SessionManager,
        id: i64,
        book: &NewBook,
    ) -> Result<Book, ClientError> {
        let url = format!("{}{}/{}", self.base_url, BOOKS_PATH, id);
        let response: BookResponse = self
            .send(session.decorate(self.http.patch(&url).json(book)))
            .await?;
        Ok(response.book)
    }

    pub async fn delete(&self, session: &SessionManager, id: i64) -> Result<(), ClientError> {
        let url = format!("{}{}/{}", self.base_url, BOOKS_PATH, id);
        let response = session
            .decorate(self.http.delete(&url))
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, id, "delete book request failed");
                ClientError::Transport
            })?;

        if !response.status().is_success() {
            return Err(rejection(response, BOOKS_FALLBACK).await);
        }
        debug!(id, "deleted book");
        Ok(())
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "book request failed");
            ClientError::Transport
        })?;

        if !response.status().is_success() {
            return Err(rejection(response, BOOKS_FALLBACK).await);
        }

        response.json().await.map_err(|e| {
            warn!(error = %e, "failed to parse book response");
            ClientError::MalformedResponse
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::IntoResponse;
    use axum::routing::{delete, get, patch, post};
    use axum::{Json, Router};
    use serde_json::json;
    use tempfile::TempDir;

    use crate::api::build_client;
    use crate::auth::{FileTokenStore, TokenStore};

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn session_with_token(base_url: &str, dir: &TempDir, token: Option<&str>) -> SessionManager {
        let store = FileTokenStore::new(dir.path().to_path_buf());
        if let Some(token) = token {
            store.save(token).unwrap();
        }
        SessionManager::new(build_client().unwrap(), base_url, Box::new(store))
    }

    /// Serves the book list only to requests carrying the expected token.
    fn guarded_list_router() -> Router {
        Router::new().route(
            "/api/v1/books",
            get(|headers: HeaderMap| async move {
                let authorized = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(|v| v == "Bearer abc")
                    .unwrap_or(false);
                if authorized {
                    Json(json!({"books": [
                        {"id": 1, "title": "The Hobbit", "authors": "J.R.R. Tolkien",
                         "isbn": "9780547928227", "publication_date": "1937-09-21",
                         "genre": "Fantasy", "description": "", "average_rating": 4.7}
                    ]}))
                    .into_response()
                } else {
                    (
                        StatusCode::UNAUTHORIZED,
                        Json(json!({"error": "invalid or missing authentication token"})),
                    )
                        .into_response()
                }
            }),
        )
    }

    #[tokio::test]
    async fn test_list_sends_bearer_token() {
        let base = spawn(guarded_list_router()).await;
        let dir = TempDir::new().unwrap();
        let session = session_with_token(&base, &dir, Some("abc"));
        let books = BooksClient::new(build_client().unwrap(), &base);

        let list = books.list(&session).await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].title, "The Hobbit");
        assert_eq!(list[0].id, 1);
    }

    #[tokio::test]
    async fn test_list_without_session_is_rejected() {
        let base = spawn(guarded_list_router()).await;
        let dir = TempDir::new().unwrap();
        let session = session_with_token(&base, &dir, None);
        let books = BooksClient::new(build_client().unwrap(), &base);

        let err = books.list(&session).await.unwrap_err();
        assert_eq!(err.to_string(), "invalid or missing authentication token");
    }

    fn hobbit() -> NewBook {
        NewBook {
            title: "The Hobbit".to_string(),
            authors: "J.R.R. Tolkien".to_string(),
            isbn: "9780547928227".to_string(),
            publication_date: "1937-09-21".to_string(),
            genre: "Fantasy".to_string(),
            description: "There and back again.".to_string(),
        }
    }

    /// Echoes the submitted fields back inside a book envelope with the
    /// given id, the way the server responds to writes.
    fn echo_book(id: i64, body: &serde_json::Value) -> Json<serde_json::Value> {
        Json(json!({"book": {
            "id": id,
            "title": body["title"],
            "authors": body["authors"],
            "isbn": body["isbn"],
            "publication_date": body["publication_date"],
            "genre": body["genre"],
            "description": body["description"],
        }}))
    }

    #[tokio::test]
    async fn test_create_book_sends_payload_and_parses_envelope() {
        let base = spawn(Router::new().route(
            "/api/v1/books",
            post(|Json(body): Json<serde_json::Value>| async move {
                assert_eq!(body["title"], "The Hobbit");
                assert_eq!(body["isbn"], "9780547928227");
                assert_eq!(body["publication_date"], "1937-09-21");
                (StatusCode::CREATED, echo_book(42, &body))
            }),
        ))
        .await;
        let dir = TempDir::new().unwrap();
        let session = session_with_token(&base, &dir, Some("abc"));
        let books = BooksClient::new(build_client().unwrap(), &base);

        let created = books.create(&session, &hobbit()).await.unwrap();
        assert_eq!(created.id, 42);
        assert_eq!(created.title, "The Hobbit");
        assert_eq!(created.genre, "Fantasy");
        // The server computes the rating; absent on create.
        assert_eq!(created.average_rating, 0.0);
    }

    #[tokio::test]
    async fn test_update_book_patches_and_parses_envelope() {
        let base = spawn(Router::new().route(
            "/api/v1/books/:id",
            patch(|Json(body): Json<serde_json::Value>| async move {
                assert_eq!(body["title"], "The Hobbit");
                echo_book(7, &body)
            }),
        ))
        .await;
        let dir = TempDir::new().unwrap();
        let session = session_with_token(&base, &dir, Some("abc"));
        let books = BooksClient::new(build_client().unwrap(), &base);

        let updated = books.update(&session, 7, &hobbit()).await.unwrap();
        assert_eq!(updated.id, 7);
        assert_eq!(updated.authors, "J.R.R. Tolkien");
    }

    #[tokio::test]
    async fn test_delete_book() {
        let base = spawn(Router::new().route(
            "/api/v1/books/:id",
            delete(|| async { Json(json!({"message": "book successfully deleted"})) }),
        ))
        .await;
        let dir = TempDir::new().unwrap();
        let session = session_with_token(&base, &dir, Some("abc"));
        let books = BooksClient::new(build_client().unwrap(), &base);

        books.delete(&session, 7).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_with_malformed_envelope() {
        let base = spawn(Router::new().route(
            "/api/v1/books",
            get(|| async { Json(json!({"items": []})) }),
        ))
        .await;
        let dir = TempDir::new().unwrap();
        let session = session_with_token(&base, &dir, Some("abc"));
        let books = BooksClient::new(build_client().unwrap(), &base);

        let err = books.list(&session).await.unwrap_err();
        assert!(matches!(err, ClientError::MalformedResponse));
    }
}
