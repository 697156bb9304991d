//! Service layer for the studio endpoints.
//!
//! This module provides service types that wrap remote studio calls,
//! separating request shaping from transport concerns.

pub mod service_api;

pub use service_api::{ServiceApiService, SESSION_KEY, TASK_PAGE_SIZE};
