//! Command-line interface definitions using clap.
//!
//! Argument structs stay in this crate; each converts into the core type it
//! feeds (`ContextArgs` into [`ContextUpdate`], for example) so the core
//! library never sees clap.
//!
//! ```text
//! User Input → CLI Args (clap) → Core Types → Session / Planner
//! ```
//!
//! Option values use the short wire names of the core option sets, e.g.
//! `--level sek1 --language-level a2 --structure aviva`.

use std::{path::PathBuf, str::FromStr};

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use planpilot_core::{
    models::{
        Heterogeneity, LanguageLevel, LearningGoalType, LearningMode, Level, PlanMode,
        QualityLayer, StructureModel,
    },
    ContextUpdate, ExportFormat,
};

/// Guided lesson planning wizard
///
/// PlanPilot walks through nine steps from the class context to an exported
/// lesson plan: context, goals and curriculum, didactics, a generated short
/// version, editing (gate A), revision, approval (gate B), detail planning
/// and export. The draft is stored after every command, so each invocation
/// continues where the last one stopped.
#[derive(Parser)]
#[command(version, about, name = "planpilot")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/planpilot/planpilot.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Never contact the generation service; use the built-in templates
    #[arg(long, global = true)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands, roughly in wizard order.
#[derive(Subcommand)]
pub enum Commands {
    /// Show the current step and plan overview
    #[command(alias = "st")]
    Status(StatusArgs),
    /// List the wizard steps with their state
    Steps,
    /// Jump to an accessible step
    Goto {
        /// Step number (1-9)
        #[arg(value_parser = clap::value_parser!(u8).range(1..=9))]
        step: u8,
    },
    /// Complete the current step and move on
    #[command(alias = "n")]
    Next,
    /// Go back one step
    Prev,
    /// Show or change the lesson context (step 1)
    #[command(alias = "ctx")]
    Context(ContextArgs),
    /// Manage learning goals (step 2)
    Goal {
        #[command(subcommand)]
        command: GoalCommands,
    },
    /// Show or choose the didactic slots (step 3)
    Didactics(DidacticsArgs),
    /// Map curriculum competencies to the plan (step 2)
    #[command(alias = "cur")]
    Curriculum {
        #[command(subcommand)]
        command: CurriculumCommands,
    },
    /// Generate the short version, or the sequence in sequence mode (step 4)
    #[command(alias = "gen")]
    Generate,
    /// Edit the short version before approval (step 5)
    Edit(EditArgs),
    /// Approve a gate
    Approve {
        #[arg(value_enum)]
        gate: GateArg,
    },
    /// Withdraw both gate approvals
    ResetGates,
    /// Revise the edited short version (step 6)
    Revise(ReviseArgs),
    /// Generate the detail plan (step 8)
    Detail(DetailArgs),
    /// Adjust the detail plan with a short instruction
    Refine(RefineArgs),
    /// Run the quality and compatibility checks
    Check,
    /// Export the plan (step 9)
    Export(ExportArgs),
    /// Undo the last change
    Undo,
    /// Redo the last undone change
    Redo,
    /// Discard the draft and start over
    Reset(ResetArgs),
}

#[derive(ClapArgs, Default)]
pub struct StatusArgs {
    /// Also print the short version, sequence and detail plan
    #[arg(long)]
    pub full: bool,
    /// Print the stored draft as JSON
    #[arg(long, conflicts_with = "full")]
    pub json: bool,
}

/// Context fields collected in step 1.
///
/// Without any option the current context is printed.
#[derive(ClapArgs)]
pub struct ContextArgs {
    /// Planning mode: single, sequence
    #[arg(long)]
    pub mode: Option<PlanMode>,
    /// Optional plan title
    #[arg(long)]
    pub title: Option<String>,
    /// Subject or topic headline
    #[arg(short, long)]
    pub subject: Option<String>,
    /// Free description of the topic
    #[arg(short, long)]
    pub topic: Option<String>,
    /// School level: kg, primar, sek1, 10sj, gymnasium
    #[arg(short, long)]
    pub level: Option<Level>,
    /// Lesson length in minutes
    #[arg(short, long)]
    pub duration: Option<u32>,
    /// Number of lessons in sequence mode (3-12)
    #[arg(long)]
    pub lessons: Option<u32>,
    /// Learning goal type: knowledge, application, reflection, transfer
    #[arg(short, long)]
    pub goal_type: Option<LearningGoalType>,
    /// Number of students
    #[arg(long)]
    pub class_size: Option<u32>,
    /// Heterogeneity: low, medium, high
    #[arg(long)]
    pub heterogeneity: Option<Heterogeneity>,
    /// Language level: a1, a2, b1, b2, c1, c2
    #[arg(long)]
    pub language_level: Option<LanguageLevel>,
    /// Special needs or notes about the class
    #[arg(long)]
    pub special_needs: Option<String>,
    /// Free notes on the class profile
    #[arg(long)]
    pub notes: Option<String>,
}

impl ContextArgs {
    /// Human readable list of the requested changes.
    pub fn changes(&self) -> Vec<String> {
        let mut changes = Vec::new();
        let mut push = |label: &str, value: Option<String>| {
            if let Some(value) = value {
                changes.push(format!("{label}: {value}"));
            }
        };
        push("Modus", self.mode.map(|m| m.to_string()));
        push("Titel", self.title.clone());
        push("Fach", self.subject.clone());
        push("Thema", self.topic.clone());
        push("Stufe", self.level.map(|l| l.to_string()));
        push("Dauer", self.duration.map(|d| format!("{d} Min")));
        push("Lektionen", self.lessons.map(|n| n.to_string()));
        push("Lernzieltyp", self.goal_type.map(|g| g.to_string()));
        push("Klassengrösse", self.class_size.map(|n| n.to_string()));
        push("Heterogenität", self.heterogeneity.map(|h| h.to_string()));
        push("Sprachstand", self.language_level.map(|l| l.to_string()));
        push("Besondere Hinweise", self.special_needs.clone());
        push("Notizen", self.notes.clone());
        changes
    }
}

impl From<ContextArgs> for ContextUpdate {
    fn from(val: ContextArgs) -> Self {
        ContextUpdate {
            mode: val.mode,
            title: val.title,
            subject: val.subject,
            topic_description: val.topic,
            level: val.level,
            duration_minutes: val.duration,
            lesson_count: val.lessons,
            learning_goal_type: val.goal_type,
            class_size: val.class_size,
            heterogeneity: val.heterogeneity,
            language_level: val.language_level,
            special_needs: val.special_needs,
            class_notes: val.notes,
        }
    }
}

#[derive(Subcommand)]
pub enum GoalCommands {
    /// Append a learning goal
    #[command(alias = "a")]
    Add {
        /// Goal text, e.g. "Die SuS können ..."
        text: String,
    },
    /// Replace the goal at a position
    #[command(alias = "s")]
    Set {
        /// 1-based position
        position: usize,
        text: String,
    },
    /// Remove the goal at a position (the last goal always stays)
    #[command(aliases = ["rm", "d"])]
    Remove {
        /// 1-based position
        position: usize,
    },
    /// List the goals
    #[command(aliases = ["l", "ls"])]
    List,
    /// Let the generation service propose goals
    Suggest,
}

/// A didactic slot value, or `none` to clear the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotChoice<T>(pub Option<T>);

impl<T: FromStr<Err = String>> FromStr for SlotChoice<T> {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("none") {
            Ok(SlotChoice(None))
        } else {
            s.parse().map(|value| SlotChoice(Some(value)))
        }
    }
}

/// Didactic slots chosen in step 3.
///
/// Without any option the available choices are listed.
#[derive(ClapArgs)]
pub struct DidacticsArgs {
    /// Slot 1, structure model: aviva, direct_instruction, 5e, workshop,
    /// project_cycle, none
    #[arg(long)]
    pub structure: Option<SlotChoice<StructureModel>>,
    /// Slot 2, learning mode: cooperative, problem_based, inquiry,
    /// project_based, practice, discourse, none
    #[arg(long)]
    pub learning_mode: Option<SlotChoice<LearningMode>>,
    /// Slot 3, quality layer: four_k, deeper_learning, language_sensitive,
    /// formative_assessment, udl, self_regulated, gamification, none
    #[arg(long)]
    pub quality_layer: Option<SlotChoice<QualityLayer>>,
}

impl DidacticsArgs {
    pub fn is_empty(&self) -> bool {
        self.structure.is_none() && self.learning_mode.is_none() && self.quality_layer.is_none()
    }
}

#[derive(Subcommand)]
pub enum CurriculumCommands {
    /// Search the Lehrplan 21 catalog
    #[command(alias = "s")]
    Search {
        /// Search terms; empty lists the whole (filtered) catalog
        #[arg(default_value = "")]
        query: String,
        /// Restrict to a subject area, e.g. Mathematik
        #[arg(short, long)]
        area: Option<String>,
        /// Restrict to a cycle, e.g. "Zyklus 2"
        #[arg(short, long)]
        cycle: Option<String>,
    },
    /// Propose competencies that fit the plan
    Suggest {
        /// Map every proposal to the plan
        #[arg(long)]
        add: bool,
    },
    /// Map a catalog competency by id or code
    #[command(alias = "a")]
    Add { competency: String },
    /// Remove a mapped competency by id or code
    #[command(aliases = ["rm", "d"])]
    Remove { competency: String },
    /// Confirm a mapped competency by id or code
    Confirm { competency: String },
    /// List the mapped competencies
    #[command(aliases = ["l", "ls"])]
    List,
    /// Import competencies from a .csv or .txt file
    Upload { path: PathBuf },
}

/// Edits to the working copy of the short version.
///
/// Without any option the working copy is printed.
#[derive(ClapArgs)]
pub struct EditArgs {
    /// New title
    #[arg(long)]
    pub title: Option<String>,
    /// New overview text
    #[arg(long)]
    pub overview: Option<String>,
    /// 1-based phase to change with --name, --minutes or --description
    #[arg(long)]
    pub phase: Option<usize>,
    /// New phase name
    #[arg(long, requires = "phase")]
    pub name: Option<String>,
    /// New phase duration in minutes
    #[arg(long, requires = "phase")]
    pub minutes: Option<u32>,
    /// New phase description
    #[arg(long, requires = "phase")]
    pub description: Option<String>,
    /// Replace the working copy with a short version read from a JSON file
    #[arg(long, conflicts_with_all = ["title", "overview", "phase", "ask"])]
    pub from_file: Option<PathBuf>,
    /// Ask the generation service to rework the working copy
    #[arg(long, conflicts_with_all = ["title", "overview", "phase"])]
    pub ask: Option<String>,
}

impl EditArgs {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.overview.is_none()
            && self.phase.is_none()
            && self.from_file.is_none()
            && self.ask.is_none()
    }
}

/// Command-line representation of the two gates.
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum GateArg {
    /// Gate A: the edited short version is accepted
    A,
    /// Gate B: the short version is approved for detail planning
    B,
}

#[derive(ClapArgs)]
pub struct ReviseArgs {
    /// Custom revision instruction
    #[arg(short, long)]
    pub instruction: Option<String>,
}

#[derive(ClapArgs)]
pub struct DetailArgs {
    /// Plan only this lesson of the sequence (1-based)
    #[arg(long, conflicts_with = "all")]
    pub lesson: Option<usize>,
    /// Plan every lesson of the sequence that has no detail yet
    #[arg(long)]
    pub all: bool,
}

#[derive(ClapArgs)]
pub struct RefineArgs {
    /// What to change, e.g. "kürzen", "mehr Gruppenarbeit", "Quiz"
    pub instruction: String,
    /// Lesson of the sequence to refine (1-based)
    #[arg(long)]
    pub lesson: Option<usize>,
}

#[derive(ClapArgs)]
pub struct ExportArgs {
    /// Output format: markdown, latex, json
    #[arg(short, long, default_value_t = ExportFormat::Markdown)]
    pub format: ExportFormat,
    /// Target file or directory; prints to stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(ClapArgs)]
pub struct ResetArgs {
    /// Confirm discarding the draft (required to prevent accidental loss)
    #[arg(long)]
    pub confirm: bool,
}
