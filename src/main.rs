mod api;
mod cli;
mod config;
mod db;
mod display;
mod error;
mod file;
mod models;
mod publisher;
mod selector;

use clap::Parser;

use crate::cli::Cli;

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    cli::run(cli);
}
