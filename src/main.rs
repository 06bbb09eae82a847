//! `dep-licenses` — audit the licenses and provenance of a module's dependencies.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]) and load config ([`config::load_config`]).
//! 2. Collect non-standard transitive dependencies ([`collector`]).
//! 3. Resolve each to its most specific licensed repository root, skipping ids
//!    an earlier root already covers ([`resolver`]).
//! 4. Attach revision and origin URL, best effort ([`vcs`]).
//! 5. Encode the report to stdout and optionally dump license files ([`report`]).
//!
//! Any fatal error exits `1` with a stage-prefixed message on stderr.

mod cli;
mod collector;
mod command;
mod config;
mod error;
mod license;
mod models;
mod pipeline;
mod report;
mod resolver;
mod vcs;

use std::io::IsTerminal;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use cli::Cli;
use collector::{collect, go::GoList};
use config::load_config;
use license::classifier::FileClassifier;
use resolver::Resolver;
use vcs::Git;

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "warn" })),
        )
        .with_writer(std::io::stderr)
        .init();

    if cli.targets.is_empty() {
        eprintln!("{}", Cli::command().render_help());
        eprintln!("{} no targets given", "error:".red().bold());
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("failed to load config")?;
    let config = load_config(&cwd, cli.config.as_deref()).context("failed to load config")?;

    let source_roots = if cli.source_roots.is_empty() {
        config.source_roots()
    } else {
        cli.source_roots.clone()
    };

    let graph = GoList::new(config.tools.build.as_str());
    let ids = collect(&graph, &cli.targets).context("failed to get import paths")?;

    let classifier = FileClassifier::new().context("failed to get licenses")?;
    let mut resolver = Resolver::new(source_roots, classifier).context("failed to get licenses")?;
    let git = Git::new(config.tools.vcs.as_str());

    let progress = progress_bar(ids.len() as u64, cli.quiet)?;
    let records = pipeline::audit(&ids, &mut resolver, &git, &progress);

    let mut stdout = std::io::stdout().lock();
    report::write(&records, cli.format, &mut stdout).context("failed to output")?;

    if let Some(dir) = &cli.licenses_dir {
        report::dump::dump(&records, dir).context("failed to output LICENSE files")?;
    }

    Ok(())
}

fn progress_bar(len: u64, quiet: bool) -> Result<ProgressBar> {
    if quiet || !std::io::stderr().is_terminal() {
        return Ok(ProgressBar::hidden());
    }

    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}
