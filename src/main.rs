mod cli;
mod config;
mod convert;
mod logging;
mod report;
mod session;
mod shell;

use std::io;
use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};
use crate::config::AitrendsConfig;
use crate::session::Session;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = AitrendsConfig::load(cli.config.as_deref())?;
    let session = Session::load(&config, cli.data)?;

    match cli.command {
        Command::Shell => {
            let stdin = io::stdin().lock();
            let mut stdout = io::stdout().lock();
            shell::run(&session, stdin, &mut stdout, cli.json)
        }
        command => {
            let report = session.execute(&command)?;
            println!("{}", report.render(cli.json)?.trim_end());
            Ok(())
        }
    }
}
