//! Client library for the bookshelf reading-list API.
//!
//! The library is built around two pieces:
//! - [`auth::SessionManager`], which owns the bearer-token session: login,
//!   logout, registration, account activation, persistence across restarts,
//!   and decoration of outbound requests with the token.
//! - [`api::BooksClient`], the authenticated CRUD client for the
//!   `/api/v1/books` endpoints.
//!
//! Every network operation is attempted exactly once and returns a
//! [`api::ClientError`] on failure; transport errors are reported with a
//! generic message and logged via `tracing`.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
