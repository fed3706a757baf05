//! Command line interface.
//!
//! Every command reads its JSON input from `--input <file>` (stdin when
//! absent or `-`) and prints a JSON document on stdout. Commands outside
//! the pure AHP calculator need credentials (`--user`/`--password` or
//! `LOTUS_USER`/`LOTUS_PASSWORD`) for a role that may open the command's
//! [`Section`].

mod handlers;

pub use handlers::{read_json, run, run_standalone, AggregateRequest, WeightsRequest};

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::auth::Section;

/// LOTUS workshop engine.
#[derive(Debug, Parser)]
#[command(name = "lotus-ahp", version, about)]
pub struct Cli {
    /// Login credentials.
    #[command(flatten)]
    pub credentials: Credentials,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Credentials shared by all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct Credentials {
    /// Username.
    #[arg(long, global = true, env = "LOTUS_USER")]
    pub user: Option<String>,

    /// Password.
    #[arg(long, global = true, env = "LOTUS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Neighborhood the session works in.
    #[arg(long, global = true, default_value = "")]
    pub neighborhood: String,
}

/// Top-level commands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Compute AHP weights and consistency from pairwise answers or a matrix.
    Weights {
        /// JSON input file.
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Aggregate matrices into consensus weights.
    ///
    /// With `--input`, aggregates the matrices in the file; otherwise the
    /// stored submissions of `--round-table` (or everyone).
    Aggregate {
        /// JSON input file with matrices.
        #[arg(long)]
        input: Option<PathBuf>,
        /// Round table to aggregate.
        #[arg(long)]
        round_table: Option<String>,
    },
    /// Check credentials and print the session.
    Login {
        /// Round table recorded in the session.
        #[arg(long)]
        round_table: Option<String>,
    },
    /// Register a participant.
    Register {
        /// JSON input file.
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Manage registration questions.
    Questions {
        /// Question action.
        #[command(subcommand)]
        action: QuestionsCommand,
    },
    /// Submit an AHP questionnaire.
    Survey {
        /// JSON input file.
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Manage the park catalog.
    Parks {
        /// Park action.
        #[command(subcommand)]
        action: ParksCommand,
    },
    /// Submit park ratings.
    Evaluate {
        /// JSON input file.
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Print workshop statistics.
    Report {
        /// Report to print.
        #[arg(value_enum)]
        kind: ReportKind,
        /// Restrict to one round table.
        #[arg(long)]
        round_table: Option<String>,
    },
    /// Print the JSON schema of an input document.
    Schema {
        /// Input document.
        #[arg(value_enum)]
        document: SchemaDocument,
    },
}

/// Question actions.
#[derive(Debug, Clone, Subcommand)]
pub enum QuestionsCommand {
    /// Add a question.
    Add {
        /// JSON input file.
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// List the questions of a neighborhood.
    List {
        /// Neighborhood.
        neighborhood: String,
    },
}

/// Park catalog actions.
#[derive(Debug, Clone, Subcommand)]
pub enum ParksCommand {
    /// Add or replace a park.
    Add {
        /// JSON input file.
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// List the catalog.
    List,
}

/// Available reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    /// Mean AHP weights per round table.
    Tables,
    /// One-way ANOVA of each criterion across round tables.
    Anova,
    /// Park statistics and weighted ranking.
    Parks,
}

/// Documents with a published schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SchemaDocument {
    /// Input of `weights`.
    Weights,
    /// Input of `register`.
    Registration,
    /// Input of `questions add`.
    Question,
    /// Input of `survey`.
    Survey,
    /// Input of `parks add`.
    Park,
    /// Input of `evaluate`.
    Evaluation,
}

impl Command {
    /// Section a session must be allowed into, if the command needs login.
    #[must_use]
    pub const fn section(&self) -> Option<Section> {
        match self {
            Self::Weights { .. } | Self::Schema { .. } | Self::Login { .. } => None,
            Self::Aggregate { input: Some(_), .. } => None,
            Self::Register { .. }
            | Self::Survey { .. }
            | Self::Evaluate { .. }
            | Self::Questions {
                action: QuestionsCommand::List { .. },
            }
            | Self::Parks {
                action: ParksCommand::List,
            } => Some(Section::Registration),
            Self::Aggregate { input: None, .. } | Self::Report { .. } => {
                Some(Section::Administration)
            }
            Self::Questions {
                action: QuestionsCommand::Add { .. },
            }
            | Self::Parks {
                action: ParksCommand::Add { .. },
            } => Some(Section::Admin),
        }
    }

    /// Whether the command touches the database.
    #[must_use]
    pub const fn needs_storage(&self) -> bool {
        !matches!(
            self,
            Self::Weights { .. }
                | Self::Schema { .. }
                | Self::Login { .. }
                | Self::Aggregate { input: Some(_), .. }
        )
    }
}
