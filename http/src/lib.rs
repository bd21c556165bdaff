//! The exposition endpoint of the exporter.

#[macro_use]
extern crate tracing;

pub mod error;
pub mod metrics;
pub mod router;

pub use router::{
    create_router,
    AppState,
};
