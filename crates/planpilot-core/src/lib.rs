//! Core library for the PlanPilot lesson planning wizard.
//!
//! The wizard walks a teacher through nine steps, from class context to an
//! exported document. Two manual checkpoints (gate A after editing the short
//! version, gate B after approving it) guard the expensive detail planning.
//!
//! - **Workflow** ([`workflow`]): step access rules and validation
//! - **Session** ([`session`]): the mutable draft with undo/redo history
//! - **Engines** ([`differentiation`], [`quality`], [`compatibility`],
//!   [`curriculum`]): deterministic analysis of a plan
//! - **Generation** ([`generation`]): the content service client with
//!   retries, cancellation and template fallbacks
//! - **Export** ([`export`]): Markdown, LaTeX and JSON documents
//! - **Store** ([`store`]): the SQLite key-value slots holding the draft
//!
//! [`Planner`] ties these together for front ends.
//!
//! # Display Architecture
//!
//! Domain models implement [`std::fmt::Display`] and render markdown; the
//! [`display`] module adds wrappers for collections and operation results.
//! The CLI hands that markdown to its terminal renderer.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use planpilot_core::{
//!     generation::abort_pair,
//!     models::{LearningGoalType, Level, StructureModel},
//!     PlannerBuilder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let planner = PlannerBuilder::new()
//!     .with_database_path(Some("planpilot.db"))
//!     .offline(true)
//!     .build()
//!     .await?;
//!
//! let mut session = planner.load_session().await?;
//! session.set_subject("Mathematik");
//! session.set_level(Level::Primary);
//! session.set_learning_goal_type(LearningGoalType::Application);
//! session.add_goal("Die SuS können Brüche addieren.");
//! session.set_slot1(Some(StructureModel::Aviva));
//!
//! let (_handle, signal) = abort_pair();
//! let report = planner.generate(&mut session, &signal).await?;
//! if let Some(notice) = report.notice() {
//!     println!("{notice}");
//! }
//! planner.save_session(&session).await?;
//! # Ok(())
//! # }
//! ```

pub mod compatibility;
pub mod curriculum;
pub mod differentiation;
pub mod display;
pub mod error;
pub mod export;
pub mod generation;
pub mod models;
pub mod planner;
pub mod quality;
pub mod session;
pub mod store;
pub mod workflow;

// Re-export commonly used types
pub use display::{LocalDateTime, OperationStatus, SessionStatus};
pub use error::{PilotError, Result};
pub use export::ExportFormat;
pub use models::{Plan, PlanMode, PlanStatus};
pub use planner::{ExportResult, GenerationReport, Planner, PlannerBuilder};
pub use session::{ContextUpdate, Session, StepTransition};
pub use store::DraftStore;
