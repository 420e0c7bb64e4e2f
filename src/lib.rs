//! Windowed GitHub activity collection and analytics.
//!
//! A run resolves a [`window::TimeWindow`], pages commits, pull requests and
//! issues out of an [`source::ActivitySource`] with early termination, folds
//! them into an [`model::AnalyticsSnapshot`] plus a contributor roll-up, and
//! emits a single [`model::RepositoryData`] document.

pub mod analytics;
pub mod cli;
pub mod collect;
pub mod error;
pub mod ext;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod source;
pub mod util;
pub mod window;

pub use error::{CollectError, CollectWarning, SourceError};
pub use pipeline::{run, RunConfig};
