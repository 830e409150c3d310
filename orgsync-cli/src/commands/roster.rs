//! `orgsync roster`: show, diff and publish the team roster databag.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use orgsync_core::{Config, GitHubClient, RosterSettings};
use orgsync_roster::{pipeline, AsanaClient, PublishResult, RosterSnapshot};

use super::{load_config, token, ASANA_TOKEN_ENV, GITHUB_TOKEN_ENV};

#[derive(Subcommand, Debug)]
pub enum RosterCommand {
    /// Print roster members and their project summaries.
    Show,

    /// Commit the rendered databag when it differs from the published one.
    Publish(PublishArgs),

    /// Show a unified diff of the published databag against a fresh build.
    Diff,
}

/// Arguments for `orgsync roster publish`.
#[derive(Args, Debug)]
pub struct PublishArgs {
    /// Report whether a commit would be made without making it.
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run(command: RosterCommand, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let settings = config
        .roster
        .as_ref()
        .context("config has no `roster` section")?;
    let source = asana(&config, settings)?;

    match command {
        RosterCommand::Show => {
            let snap = pipeline::snapshot(&source, settings).context("failed to build roster")?;
            print_roster(&snap);
        }
        RosterCommand::Publish(args) => {
            let store = GitHubClient::new(&config.github, &token(GITHUB_TOKEN_ENV)?);
            let (snap, result) = pipeline::publish_roster(&source, &store, settings, args.dry_run)
                .context("roster publish failed")?;
            print_publish(&snap, &result, settings);
        }
        RosterCommand::Diff => {
            let store = GitHubClient::new(&config.github, &token(GITHUB_TOKEN_ENV)?);
            let (_, diff) = pipeline::diff_roster(&source, &store, settings)
                .context("roster diff failed")?;
            match diff {
                Some(diff) => print!("{}", diff.unified_diff),
                None => println!("{} is up to date.", settings.target.path),
            }
        }
    }
    Ok(())
}

fn asana(config: &Config, settings: &RosterSettings) -> Result<AsanaClient> {
    Ok(AsanaClient::new(
        settings,
        &token(ASANA_TOKEN_ENV)?,
        Duration::from_secs(config.github.timeout_secs),
    ))
}

#[derive(Tabled)]
struct MemberRow {
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "role")]
    role: String,
    #[tabled(rename = "projects")]
    projects: String,
}

fn print_roster(snap: &RosterSnapshot) {
    if snap.entries.is_empty() {
        println!("No roster members found.");
        return;
    }

    let rows: Vec<MemberRow> = snap
        .entries
        .iter()
        .map(|e| MemberRow {
            name: e.name.clone(),
            role: e.role.clone().unwrap_or_else(|| "-".to_owned()),
            projects: {
                let lines = e.summaries();
                if lines.is_empty() {
                    "-".to_owned()
                } else {
                    lines.join("\n")
                }
            },
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    println!(
        "{} members across {} projects",
        snap.entries.len(),
        snap.databag.projects.len()
    );
}

fn print_publish(snap: &RosterSnapshot, result: &PublishResult, settings: &RosterSettings) {
    let target = format!("{}:{}", settings.target.repository, result.path());
    let projects = snap.databag.projects.len();
    match result {
        PublishResult::Written { commit, .. } => {
            println!("{} published {target} ({projects} projects)", "✓".green().bold());
            println!("  commit {}", commit.sha);
            if let Some(url) = &commit.html_url {
                println!("  {url}");
            }
        }
        PublishResult::WouldWrite { .. } => {
            println!("[dry-run] {} would publish {target} ({projects} projects)", "~".yellow());
        }
        PublishResult::Unchanged { .. } => {
            println!("{} {target} is up to date", "·".bright_black());
        }
    }
}
