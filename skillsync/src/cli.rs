use clap::{Parser, Subcommand};

/// skillsync - manage and share Claude Code skills across projects
#[derive(Parser, Debug)]
#[command(name = "skillsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize skill configuration in the current project
    Init {
        /// Default source repository (e.g. 'owner/repo')
        #[arg(short, long, value_name = "SOURCE")]
        source: Option<String>,
    },

    /// Fetch a skill from a GitHub repository
    Fetch {
        /// Name of the skill to fetch
        #[arg(value_name = "SKILL")]
        skill_name: String,

        /// Source repository (e.g. 'owner/repo'); uses the default source if omitted
        #[arg(value_name = "SOURCE")]
        source: Option<String>,

        /// Branch to fetch from
        #[arg(short, long, default_value = "main")]
        branch: String,

        /// Overwrite if the skill already exists
        #[arg(short = 'f', long)]
        overwrite: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// List all installed skills with metadata
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update a skill, or all skills, to the latest remote content
    Update {
        /// Name of the skill to update; omit to update all
        #[arg(value_name = "SKILL")]
        skill_name: Option<String>,

        /// Update all installed skills
        #[arg(short, long)]
        all: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Remove an installed skill
    Remove {
        /// Name of the skill to remove
        #[arg(value_name = "SKILL")]
        skill_name: String,
    },

    /// Manage allowed skill sources
    Source {
        #[command(subcommand)]
        command: SourceCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum SourceCommands {
    /// Add a repository to the allowed sources list
    Add {
        /// Source repository to add (e.g. 'owner/repo')
        #[arg(value_name = "SOURCE")]
        source: String,
    },

    /// Remove a repository from the allowed sources list
    Remove {
        /// Source repository to remove
        #[arg(value_name = "SOURCE")]
        source: String,
    },

    /// List all allowed source repositories
    List,
}
