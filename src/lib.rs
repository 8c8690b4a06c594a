//! Instipay Admin Client - Dioxus web application
//!
//! This crate contains the web/desktop client for the Instipay merchant
//! admin: login against the admin API, a user directory browser backed
//! by a cached public API, and optimistic post creation.

pub mod api;
pub mod api_client;
pub mod auth_session;
pub mod auth_sync;
pub mod endpoints;
pub mod error;
pub mod logging;
pub mod models;
pub mod optimistic;
pub mod query;
pub mod storage;
pub mod theme;

pub mod components;
pub mod hooks;
pub mod routes;
pub mod views;

pub use api_client::ApiClient;
pub use auth_session::{AuthContext, AuthProvider, Session, SessionState};
pub use error::ApiError;
pub use routes::Route;
