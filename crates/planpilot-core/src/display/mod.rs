//! Display formatting for the terminal.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]);
//! groups of them and operation outcomes go through small wrapper types.
//! Everything renders as markdown so the CLI can pass it to its renderer.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │ Wrappers &      │    │   Markdown      │
//! │ (Plan, Phase)   │───▶│ Result Types    │───▶│   Output        │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! - [`collections`]: search results, suggestions, the step list, quality
//!   reports
//! - [`results`]: session status, validation errors, generation and export
//!   outcomes
//! - [`status`]: one-line confirmations ([`OperationStatus`])
//! - [`datetime`]: local time formatting
//!
//! ```rust
//! use planpilot_core::display::OperationStatus;
//!
//! let done = OperationStatus::success("Entwurf gespeichert.");
//! assert_eq!(done.to_string(), "Success: Entwurf gespeichert.\n");
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

pub use collections::{Competencies, StepOverview, Suggestions};
pub use datetime::LocalDateTime;
pub use results::{LessonReports, SessionStatus, UpdateResult, ValidationErrors};
pub use status::{OperationStatus, StatusKind};
