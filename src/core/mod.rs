//! Session, HTTP gateway, auth flow and shared types.

pub mod auth;
pub mod error;
pub mod gateway;
pub mod output;
pub mod session;
pub mod time;
pub mod types;
