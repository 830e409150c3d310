//! `orgsync labels`: reconcile, preview and list catalog labels.

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use orgsync_core::{GitHubClient, Label, RepoName};
use orgsync_labels::{
    driver, DriverOptions, FailurePolicy, LabelOp, ReconcileOptions, ReconcileReport, RepoScope,
};

use super::{load_config, token, GITHUB_TOKEN_ENV};

#[derive(Subcommand, Debug)]
pub enum LabelsCommand {
    /// Converge repository labels to the catalog.
    Sync(SyncArgs),

    /// Show the operations a sync would perform on one repository.
    Plan(PlanArgs),

    /// Print the configured label catalog. Makes no network calls.
    List,
}

/// Arguments for `orgsync labels sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Repositories to sync (default: every repository in the organisation).
    pub repos: Vec<String>,

    /// Also delete labels that are not in the catalog.
    #[arg(long)]
    pub destructive: bool,

    /// Show what would change without calling any mutating endpoint.
    #[arg(long)]
    pub dry_run: bool,

    /// Continue with the next repository when one fails.
    #[arg(long)]
    pub keep_going: bool,
}

/// Arguments for `orgsync labels plan`.
#[derive(Args, Debug)]
pub struct PlanArgs {
    pub repo: String,

    /// Include deletions of labels that are not in the catalog.
    #[arg(long)]
    pub destructive: bool,
}

pub fn run(command: LabelsCommand, config_path: Option<&Path>) -> Result<()> {
    match command {
        LabelsCommand::Sync(args) => sync(args, config_path),
        LabelsCommand::Plan(args) => plan(args, config_path),
        LabelsCommand::List => list(config_path),
    }
}

// ---------------------------------------------------------------------------
// sync
// ---------------------------------------------------------------------------

fn sync(args: SyncArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let client = GitHubClient::new(&config.github, &token(GITHUB_TOKEN_ENV)?);

    let scope = if args.repos.is_empty() {
        RepoScope::Organisation
    } else {
        RepoScope::Named(args.repos.iter().map(|r| RepoName::from(r.as_str())).collect())
    };
    let options = DriverOptions {
        reconcile: ReconcileOptions {
            destructive: args.destructive,
            dry_run: args.dry_run,
        },
        policy: if args.keep_going {
            FailurePolicy::Continue
        } else {
            FailurePolicy::Abort
        },
    };

    let summary = driver::run(
        &client,
        &config.github.org,
        &config.labels,
        &scope,
        options,
    )
    .context("label sync failed")?;

    let prefix = if args.dry_run { "[dry-run] " } else { "" };
    let reports: Vec<&ReconcileReport> = summary.reports().collect();
    if reports.is_empty() && !summary.has_failures() {
        println!("{prefix}No repositories to sync.");
        return Ok(());
    }

    if args.dry_run {
        for report in &reports {
            print_ops(report);
        }
    }
    print_summary(&reports, prefix);

    let failures: Vec<_> = summary.failures().collect();
    for (repo, error) in &failures {
        println!("{} {repo}: {error}", "✗".red().bold());
    }
    if !failures.is_empty() {
        bail!("{} repositories failed", failures.len());
    }
    Ok(())
}

#[derive(Tabled)]
struct SyncRow {
    #[tabled(rename = "repository")]
    repo: String,
    #[tabled(rename = "created")]
    created: usize,
    #[tabled(rename = "updated")]
    updated: usize,
    #[tabled(rename = "deleted")]
    deleted: usize,
    #[tabled(rename = "unchanged")]
    unchanged: usize,
}

fn print_summary(reports: &[&ReconcileReport], prefix: &str) {
    let rows: Vec<SyncRow> = reports
        .iter()
        .map(|r| SyncRow {
            repo: r.repo.to_string(),
            created: r.plan.count("create"),
            updated: r.plan.count("update"),
            deleted: r.plan.count("delete"),
            unchanged: r.plan.unchanged,
        })
        .collect();
    let changed = reports.iter().filter(|r| !r.plan.is_empty()).count();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    println!(
        "{prefix}{} {} repositories, {} with changes",
        "✓".green().bold(),
        reports.len(),
        changed
    );
}

// ---------------------------------------------------------------------------
// plan
// ---------------------------------------------------------------------------

fn plan(args: PlanArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let client = GitHubClient::new(&config.github, &token(GITHUB_TOKEN_ENV)?);

    let options = DriverOptions {
        reconcile: ReconcileOptions {
            destructive: args.destructive,
            dry_run: true,
        },
        policy: FailurePolicy::Abort,
    };
    let scope = RepoScope::Named(vec![RepoName::from(args.repo.as_str())]);
    let summary = driver::run(&client, &config.github.org, &config.labels, &scope, options)
        .with_context(|| format!("planning failed for '{}'", args.repo))?;

    match summary.reports().next() {
        Some(report) => print_ops(report),
        None => println!("'{}' is excluded or archived; nothing to plan.", args.repo),
    }
    Ok(())
}

fn print_ops(report: &ReconcileReport) {
    println!("{}", report.repo.to_string().bold());
    if report.plan.is_empty() {
        println!("  · up to date ({} labels)", report.plan.unchanged);
        return;
    }
    for op in &report.plan.ops {
        let line = op.to_string();
        let line = match op {
            LabelOp::Delete { .. } => line.red(),
            LabelOp::Create { .. } => line.green(),
            LabelOp::Update { .. } => line.yellow(),
        };
        println!("  {line}");
    }
    println!("  · {} unchanged", report.plan.unchanged);
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

#[derive(Tabled)]
struct LabelRow {
    #[tabled(rename = "scope")]
    scope: String,
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "color")]
    color: String,
    #[tabled(rename = "description")]
    description: String,
}

impl LabelRow {
    fn new(scope: &str, label: &Label) -> Self {
        Self {
            scope: scope.to_owned(),
            name: label.name.clone(),
            color: format!("#{}", label.color),
            description: label.description.clone(),
        }
    }
}

fn list(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let catalog = &config.labels;

    let mut rows: Vec<LabelRow> = catalog
        .standard_labels()
        .iter()
        .map(|l| LabelRow::new("standard", l))
        .collect();
    for (repo, defs) in &catalog.repositories {
        rows.extend(defs.iter().map(|d| LabelRow::new(repo, &d.to_label())));
    }

    if rows.is_empty() {
        println!("No labels configured.");
        return Ok(());
    }

    let count = rows.len();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    println!(
        "{count} labels for {} ({} repository overrides)",
        config.github.org,
        catalog.repositories.len()
    );
    Ok(())
}
