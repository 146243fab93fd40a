pub mod auth;
pub mod error;
pub mod features;
pub mod middleware;
pub mod routes;
pub mod token;

pub use auth::{AppState, AppStateInner};
