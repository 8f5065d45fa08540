//! Data models for steps.
//!
//! A [`Step`] is a pure data holder: caption, timeline dates, an optional bar
//! color and an optional predecessor. Its parent/child links are readable
//! from the model but are only ever changed by
//! [`StepTree`](crate::tree::StepTree), which enforces acyclicity.
//!
//! Display implementations live in [`crate::display::models`].
//!
//! # Examples
//!
//! ```rust
//! use gantt_core::models::{BackgroundColor, Step};
//! use jiff::Timestamp;
//!
//! let start = Timestamp::from_second(1_700_000_000).unwrap();
//! let end = Timestamp::from_second(1_700_086_400).unwrap();
//! let step = Step::new("Design review", start, end)
//!     .with_background_color("#9cfb84".parse::<BackgroundColor>().unwrap());
//!
//! assert!(step.is_root());
//! assert!(!step.has_children());
//! assert!(!step.uid().as_str().is_empty());
//! ```

pub mod color;
pub mod step;


pub use color::BackgroundColor;
pub use step::{Step, StepId};
