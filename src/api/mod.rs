//! pixiv API module.
//!
//! This module provides:
//! - HTTP client with header injection and a shared cookie jar
//! - Cookie persistence between runs
//! - Session state checks, login and logout

pub mod client;
pub mod cookies;
pub mod session;

pub use client::PixivApi;
pub use cookies::CookieFile;
pub use session::{check_logged_in, check_session, login, logout, SessionState};
