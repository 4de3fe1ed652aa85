//! Multi-call operations built on top of the resource client
//!
//! These run inside commands, off the reducer's thread, and hand back a
//! single outcome value that the reducer turns into a status banner.

pub mod batch;
pub mod recreate;

pub use batch::{BatchError, BatchReport, run_batch};
pub use recreate::{RecreateError, RecreateOutcome, RecreateStep, recreate};
