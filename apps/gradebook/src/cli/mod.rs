//! # Gradebook CLI Module
//!
//! This module implements the CLI interface for the gradebook.
//!
//! ## Available Commands
//!
//! - `init` - Create an empty data file
//! - `status` - Show record counts
//! - `list` - List students, teachers, accounts, disciplines or groups
//! - `find` - Search grades
//! - `add-student`, `add-teacher`, `add-discipline`, `add-group` - Register records
//! - `enroll` - Add a student to a group
//! - `add-grade`, `remove-grade`, `edit-grade` - Manage grades
//! - `rating` - Show a student's mean grade

mod commands;

use crate::config::{AppConfig, OutputFormat};
use crate::error::AppError;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Gradebook - student grade records
///
/// Keeps students, teachers, disciplines, groups and grades in one JSON file.
#[derive(Parser, Debug)]
#[command(name = "gradebook")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the data file (overrides config and GRADEBOOK_DATA)
    #[arg(short = 'D', long, global = true)]
    pub data: Option<PathBuf>,

    /// Path to a TOML config file (default: ./gradebook.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Load the layered configuration and apply this invocation's flags on top.
    pub fn resolve_config(&self) -> Result<AppConfig, AppError> {
        let mut config = AppConfig::load(self.config.as_deref())?;
        self.apply_overrides(&mut config);
        Ok(config)
    }

    /// Apply `--data` and `--json` to an already loaded configuration.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(data) = &self.data {
            config.data_file = data.clone();
        }
        if self.json {
            config.output = OutputFormat::Json;
        }
    }
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an empty data file
    Init {
        /// Overwrite an existing data file
        #[arg(short, long)]
        force: bool,
    },

    /// Show record counts
    Status,

    /// List records of one kind
    List {
        /// Which records to list
        #[arg(value_enum)]
        kind: ListKind,
    },

    /// Search grades (all filters optional, combined with AND)
    Find(FindArgs),

    /// Register a student
    AddStudent(StudentArgs),

    /// Register a teacher
    AddTeacher(TeacherArgs),

    /// Register a discipline
    AddDiscipline(DisciplineArgs),

    /// Register a study group
    AddGroup(GroupArgs),

    /// Add a student to a group
    Enroll {
        /// Group id
        #[arg(long)]
        group: u64,

        /// Student id
        #[arg(long)]
        student: u64,
    },

    /// Record a grade (id is allocated automatically)
    AddGrade(GradeArgs),

    /// Delete a grade
    RemoveGrade {
        /// Grade id
        #[arg(long)]
        id: u64,
    },

    /// Change a grade's value and comment
    EditGrade {
        /// Grade id
        #[arg(long)]
        id: u64,

        /// New value (2-5)
        #[arg(long)]
        value: u8,

        /// New comment (replaces the old one)
        #[arg(long, default_value = "")]
        comment: String,
    },

    /// Show a student's mean grade
    Rating {
        /// Student id
        #[arg(long)]
        student: u64,
    },
}

/// Record kinds accepted by `list`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Students,
    Teachers,
    Accounts,
    Disciplines,
    Groups,
}

/// Grade search filters.
#[derive(Args, Debug, Default)]
pub struct FindArgs {
    /// Substring of the student's full name (case-insensitive)
    #[arg(long)]
    pub student: Option<String>,

    /// Substring of the discipline name (case-insensitive)
    #[arg(long)]
    pub discipline: Option<String>,

    /// Semester of the discipline
    #[arg(long)]
    pub semester: Option<u32>,

    /// Assessment type (case-insensitive, exact)
    #[arg(long = "type")]
    pub assessment_type: Option<String>,
}

#[derive(Args, Debug)]
pub struct StudentArgs {
    #[arg(long)]
    pub id: u64,

    /// Full name
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,

    /// Already hashed password (stored verbatim)
    #[arg(long)]
    pub password_hash: String,

    /// Record-book number
    #[arg(long)]
    pub gradebook_number: String,

    /// Group name
    #[arg(long)]
    pub group: String,
}

#[derive(Args, Debug)]
pub struct TeacherArgs {
    #[arg(long)]
    pub id: u64,

    /// Full name
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,

    /// Already hashed password (stored verbatim)
    #[arg(long)]
    pub password_hash: String,

    #[arg(long)]
    pub department: String,

    #[arg(long)]
    pub position: String,
}

#[derive(Args, Debug)]
pub struct DisciplineArgs {
    #[arg(long)]
    pub id: u64,

    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub semester: u32,

    /// Default assessment type (exam, pass/fail, coursework, practicum)
    #[arg(long = "type")]
    pub assessment_type: String,
}

#[derive(Args, Debug)]
pub struct GroupArgs {
    #[arg(long)]
    pub id: u64,

    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub specialty: String,

    /// Enrollment year
    #[arg(long)]
    pub year: i32,
}

#[derive(Args, Debug)]
pub struct GradeArgs {
    /// Student id
    #[arg(long)]
    pub student: u64,

    /// Discipline id
    #[arg(long)]
    pub discipline: u64,

    /// Teacher id
    #[arg(long)]
    pub teacher: u64,

    /// Grade value (2-5)
    #[arg(long)]
    pub value: u8,

    /// Assessment type
    #[arg(long = "type")]
    pub assessment_type: String,

    /// Date as YYYY-MM-DD (default: today)
    #[arg(long)]
    pub date: Option<String>,

    #[arg(long, default_value = "")]
    pub comment: String,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments and resolved configuration.
pub fn execute(cli: Cli, config: &AppConfig) -> Result<(), AppError> {
    match cli.command {
        Some(Commands::Init { force }) => cmd_init(config, force),
        Some(Commands::Status) | None => cmd_status(config),
        Some(Commands::List { kind }) => cmd_list(config, kind),
        Some(Commands::Find(args)) => cmd_find(config, &args),
        Some(Commands::AddStudent(args)) => cmd_add_student(config, &args),
        Some(Commands::AddTeacher(args)) => cmd_add_teacher(config, &args),
        Some(Commands::AddDiscipline(args)) => cmd_add_discipline(config, &args),
        Some(Commands::AddGroup(args)) => cmd_add_group(config, &args),
        Some(Commands::Enroll { group, student }) => cmd_enroll(config, group, student),
        Some(Commands::AddGrade(args)) => cmd_add_grade(config, &args),
        Some(Commands::RemoveGrade { id }) => cmd_remove_grade(config, id),
        Some(Commands::EditGrade { id, value, comment }) => {
            cmd_edit_grade(config, id, value, &comment)
        }
        Some(Commands::Rating { student }) => cmd_rating(config, student),
    }
}
