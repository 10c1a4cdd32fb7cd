//! Marquee server library: router, handlers and shared state.
//!
//! Exposed as a library so integration tests can build an in-process router
//! with mock remote sources.

pub mod api;
pub mod metrics;
pub mod state;
