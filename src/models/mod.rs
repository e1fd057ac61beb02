//! Data models for the bookshelf API.

pub mod book;

pub use book::{Book, BookResponse, BooksResponse, NewBook};
