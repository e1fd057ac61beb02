use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub authors: String,
    pub isbn: String,
    #[serde(default)]
    pub publication_date: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub average_rating: f64,
}

/// Payload for creating or replacing a book. The server assigns `id` and
/// computes `average_rating`.
#[derive(Debug, Clone, Serialize)]
pub struct NewBook {
    pub title: String,
    pub authors: String,
    pub isbn: String,
    pub publication_date: String,
    pub genre: String,
    pub description: String,
}

// API response envelopes
#[derive(Debug, Deserialize)]
pub struct BooksResponse {
    pub books: Vec<Book>,
}

#[derive(Debug, Deserialize)]
pub struct BookResponse {
    pub book: Book,
}
