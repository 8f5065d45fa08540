//! Display formatting wrappers for charts and steps.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]);
//! views over a whole chart are newtype wrappers holding references.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   GanttChart    │    │ VisibleRows,    │    │    Markdown     │
//! │  Step, Config   │───▶│ TreeOutline,    │───▶│     output      │
//! │                 │    │ ChangeReport    │    │   (terminal)    │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`rows`]: visible row listing and hierarchical outline
//! - [`report`]: summary of the events emitted by a command
//! - [`results`]: create/update/delete confirmations
//! - [`datetime`]: timestamp and duration formatting
//! - [`models`]: Display implementations for domain models
//!
//! # Examples
//!
//! ```rust
//! use gantt_core::{display::VisibleRows, GanttChart, Step};
//! use jiff::Timestamp;
//!
//! # fn main() -> gantt_core::Result<()> {
//! let start = Timestamp::from_second(1_700_000_000).unwrap();
//! let end = Timestamp::from_second(1_700_086_400).unwrap();
//!
//! let mut chart = GanttChart::new();
//! let root = chart.add_step(Step::new("Release", start, end))?;
//! chart.add_child_step(&root, Step::new("Tag", start, end))?;
//!
//! let output = VisibleRows(&chart).to_string();
//! assert!(output.contains("▸ Release"));
//! assert!(!output.contains("Tag"));
//! # Ok(())
//! # }
//! ```

pub mod datetime;
pub mod models;
pub mod report;
pub mod results;
pub mod rows;

pub use datetime::{HumanDuration, LocalDateTime};
pub use report::ChangeReport;
pub use results::{CreateResult, DeleteResult, UpdateResult};
pub use rows::{TreeOutline, VisibleRows};
