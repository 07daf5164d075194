mod add_to_list;
mod config_cmd;
mod login;
mod select_cmd;
mod sync;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "leetcode-tools")]
#[command(about = "Curate practice problems from the LeetCode catalog", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Store session and CSRF tokens and verify them
    Login {
        #[arg(long)]
        session: String,
        #[arg(long)]
        csrf: String,
    },
    /// Fetch the problem catalog and refresh the local database
    Sync {
        /// Also save the raw catalog snapshot as JSON
        #[arg(long)]
        json_file: Option<PathBuf>,
    },
    /// Score the catalog and emit a ranked problem list
    Select {
        /// Maximum number of problems to return
        #[arg(short = 'n', long, default_value_t = 20)]
        count: usize,
        /// Write slugs one per line to this file
        #[arg(short, long, conflicts_with = "list_id")]
        output: Option<PathBuf>,
        /// Push the ranked slugs straight into a remote list
        #[arg(short, long)]
        list_id: Option<String>,
        /// Print the ranked table with score breakdowns
        #[arg(long)]
        display: bool,
        /// Path to a scoring-config JSON override
        #[arg(long)]
        scoring_config: Option<PathBuf>,
        /// Restrict candidates to a rating bracket, e.g. 1800-1900
        #[arg(long)]
        bracket: Option<String>,
        /// Keep problems you have already solved in the pool
        #[arg(long)]
        include_solved: bool,
        /// Seconds to wait between publish calls
        #[arg(long, default_value_t = 0.5)]
        delay: f64,
    },
    /// Add problem slugs from a file to a remote list
    AddToList {
        list_id: String,
        #[arg(long, default_value = "problems.txt")]
        problems_file: PathBuf,
        /// Seconds to wait between requests
        #[arg(long, default_value_t = 0.5)]
        delay: f64,
    },
    /// Show or update configuration
    Config {
        #[arg(long)]
        show: bool,
        /// Set a configuration value (repeatable)
        #[arg(long, num_args = 2, value_names = ["KEY", "VALUE"], action = clap::ArgAction::Append)]
        set: Vec<String>,
    },
}

pub fn run(cli: Cli) {
    match cli.command {
        Commands::Login { session, csrf } => login::handle_login(&session, &csrf),
        Commands::Sync { json_file } => sync::handle_sync(json_file.as_deref()),
        Commands::Select {
            count,
            output,
            list_id,
            display,
            scoring_config,
            bracket,
            include_solved,
            delay,
        } => select_cmd::handle_select(select_cmd::SelectArgs {
            count,
            output,
            list_id,
            display,
            scoring_config,
            bracket,
            include_solved,
            delay,
        }),
        Commands::AddToList {
            list_id,
            problems_file,
            delay,
        } => add_to_list::handle_add_to_list(&list_id, &problems_file, delay),
        Commands::Config { show, set } => config_cmd::handle_config(show, &set),
    }
}
