//! Pipeline entry points for tracker operations.
//!
//! - `run_tracker`: One full fetch → notify → persist run
//! - `render_preview`: Fetch and render only
//! - `should_notify`: Set-equality change detection

pub mod diff;
pub mod track;

pub use diff::{TrendDiff, should_notify};
pub use track::{RunOptions, RunOutcome, Stage, render_preview, run_tracker};
