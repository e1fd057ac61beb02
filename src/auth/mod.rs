//! Authentication module for managing the user session.
//!
//! This module provides:
//! - `SessionManager`: bearer-token session lifecycle and request decoration
//! - `TokenStore` / `FileTokenStore`: swappable persistence for the token
//!
//! Sessions are persisted to disk and reloaded at startup.

pub mod session;
pub mod store;

pub use session::SessionManager;
pub use store::{FileTokenStore, TokenStore};
