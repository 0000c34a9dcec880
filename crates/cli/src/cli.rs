//! Command-line interface definition

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "taskdeck",
    about = "Manage tasks against a remote server, with a local fallback when it is unreachable",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List tasks in display order
    List {
        /// Show only tasks with this status (all, pending, in-progress, completed)
        #[arg(long, default_value = "all")]
        status: String,

        /// Case-insensitive text to look for in titles and descriptions
        #[arg(long, default_value = "")]
        search: String,
    },

    /// Create a new task
    Add {
        title: String,

        #[arg(long)]
        description: Option<String>,

        /// Initial status (defaults to pending)
        #[arg(long)]
        status: Option<String>,

        /// Due date: RFC 3339 or YYYY-MM-DD
        #[arg(long)]
        due: Option<String>,
    },

    /// Change fields of an existing task
    Edit {
        id: i64,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        status: Option<String>,

        /// Due date: RFC 3339 or YYYY-MM-DD
        #[arg(long)]
        due: Option<String>,
    },

    /// Mark a task completed
    Done { id: i64 },

    /// Delete a task
    Rm { id: i64 },
}
