//! genie-api: Client for the DataGenie chat backend
//!
//! This crate wraps the two HTTP endpoints the client consumes (`/health`
//! and `/chat`) behind the [`ChatGateway`] trait, and defines the auth seam
//! ([`TokenSource`]) used to attach bearer tokens.

pub mod auth;
pub mod error;
pub mod gateway;
pub mod types;

pub use auth::{AuthSession, StaticSession, TokenSource};
pub use error::{Error, Result};
pub use gateway::{ChatGateway, HttpGateway};
pub use types::*;
