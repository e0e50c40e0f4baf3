mod cli;
mod commands;
mod observability;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands, SourceCommands};

fn main() -> Result<()> {
    observability::init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Init { source } => {
            commands::init::cmd_init(source.as_deref())?;
        }
        Commands::Fetch {
            skill_name,
            source,
            branch,
            overwrite,
            verbose,
        } => {
            commands::fetch::cmd_fetch(&skill_name, source.as_deref(), &branch, overwrite, verbose)?;
        }
        Commands::List { json } => {
            commands::list::cmd_list(json)?;
        }
        Commands::Update {
            skill_name,
            all,
            verbose,
        } => {
            commands::update::cmd_update(skill_name.as_deref(), all, verbose)?;
        }
        Commands::Remove { skill_name } => {
            commands::remove::cmd_remove(&skill_name)?;
        }
        Commands::Source { command } => match command {
            SourceCommands::Add { source } => commands::source::cmd_add(&source)?,
            SourceCommands::Remove { source } => commands::source::cmd_remove(&source)?,
            SourceCommands::List => commands::source::cmd_list()?,
        },
    }

    Ok(())
}
