//! Multi-resolution sales decomposition and insight service.
//!
//! Raw `(timestamp, value)` sales records are aggregated at hourly, daily,
//! weekly and monthly resolution, each aggregation is decomposed into trend,
//! seasonal and residual components, and every resolution yields a plain-text
//! report of its low and high sales periods plus a narrative insight.
//!
//! ```text
//! ingest -> pipeline (aggregate -> gate -> decompose) -> insight -> report text
//!                                          \-> render (component series)
//! ```

pub mod analysis;
pub mod config;
pub mod dev_mode;
pub mod ingest;
pub mod insight;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod resolutions;
pub mod verify;
