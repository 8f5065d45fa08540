//! Core library for hierarchical Gantt charts.
//!
//! A chart is a forest of [`Step`]s. What a timeline or caption column shows
//! is not the tree itself but a flat list of visible rows derived from it:
//! roots are always listed, children only below an expanded parent.
//! [`GanttChart`] keeps the tree, the per-step expand state and that row
//! list consistent across every structural change, and tells observers about
//! each change as it happens.
//!
//! # Crate Layout
//!
//! - [`models`]: the step entity, identifiers and bar colors
//! - [`tree`]: the parent/child arena with acyclicity checks
//! - [`rows`]: the ordered visible-row projection
//! - [`chart`]: the mutation engine, events, configuration and snapshots
//! - [`hierarchy`]: read-only hierarchical access for renderers
//! - [`display`]: markdown views of charts and steps
//! - [`db`] and [`store`]: SQLite persistence behind an async facade
//!
//! # Quick Start
//!
//! ```rust
//! use gantt_core::{GanttChart, Step};
//! use jiff::{SignedDuration, Timestamp};
//!
//! # fn main() -> gantt_core::Result<()> {
//! let start = Timestamp::from_second(1_700_000_000).unwrap();
//! let end = start + SignedDuration::from_hours(72);
//!
//! let mut chart = GanttChart::new();
//! chart.on_add_step(|step| {
//!     println!("Tooltip for {}", step.caption);
//!     Ok(())
//! });
//!
//! let design = chart.add_step(Step::new("Design", start, end))?;
//! chart.add_child_step(&design, Step::new("Sketches", start, end))?;
//! chart.add_child_step(&design, Step::new("Review", start, end))?;
//!
//! assert_eq!(chart.visible_len(), 1);
//! chart.expand(&design)?;
//! assert_eq!(chart.visible_len(), 3);
//! assert_eq!(chart.step_at(1).map(|s| s.caption.as_str()), Some("Sketches"));
//! # Ok(())
//! # }
//! ```

pub mod chart;
pub mod db;
pub mod display;
pub mod error;
pub mod hierarchy;
pub mod models;
pub mod params;
pub mod rows;
pub mod store;
pub mod tree;

// Re-export commonly used types
pub use chart::{
    ChartConfig, ChartEvent, ChartSnapshot, ConfigUpdate, GanttChart, ListenerId, RemovalPolicy,
    StepRecord,
};
pub use db::Database;
pub use display::{ChangeReport, LocalDateTime, TreeOutline, VisibleRows};
pub use error::{GanttError, Result};
pub use hierarchy::HierarchicalData;
pub use models::{BackgroundColor, Step, StepId};
pub use params::{CreateStep, StepSpan};
pub use store::{ChartStore, ChartStoreBuilder};
