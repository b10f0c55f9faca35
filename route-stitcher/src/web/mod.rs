//! Web layer for the route stitcher.
//!
//! Provides JSON endpoints for planning trips, quoting fares and managing
//! the route corpus cache.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, Composer};
