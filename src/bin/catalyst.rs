//! Command-line front end for catalyst packages.
//!
//! Subcommands validate a single catalyst, merge several and print the
//! rendered facets, and edit a plan's `plan.yaml`. Warnings from the loader
//! go to stderr through `tracing`; `CATALYST_LOG` overrides the filter.

use anyhow::{Context, Result, bail};
use catalyst_kit::{
    FACET_CATEGORIES, FacetCategory, LoadOptions, PlanManifest, add_catalyst_to_plan,
    load_plan_catalysts, merge_catalysts, read_plan_manifest, remove_catalyst_from_plan,
    render_document, render_facet, resolve_catalysts, split_list, summarize_merge,
    try_load_catalyst, write_plan_manifest,
};
use clap::{Args, Parser, Subcommand};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_ENV: &str = "CATALYST_LOG";
const BASE_ENV: &str = "CATALYST_BASE";

#[derive(Parser, Debug)]
#[command(
    name = "catalyst",
    version,
    about = "Load, validate, and merge catalyst guidance packages",
    subcommand_required = true,
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load one catalyst and print the load report as JSON
    Validate(ValidateArgs),
    /// Merge catalysts in order and print the rendered facets
    Merge(MergeArgs),
    /// Inspect or edit a plan manifest
    #[command(subcommand)]
    Plan(PlanCommand),
}

#[derive(Args, Debug, Clone)]
struct LoadFlags {
    /// Do not log facet warnings (they are still reported)
    #[arg(long)]
    strict: bool,

    /// Do not warn about facets declared true but missing on disk
    #[arg(long)]
    no_warn_missing: bool,

    /// Warn about facets declared false that have content on disk
    #[arg(long)]
    warn_undeclared: bool,
}

impl LoadFlags {
    fn options(&self) -> LoadOptions {
        LoadOptions {
            strict: self.strict,
            warn_on_missing_facets: !self.no_warn_missing,
            warn_on_undeclared_facets: self.warn_undeclared,
            base_path: None,
        }
    }
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Catalyst directory
    #[arg(value_name = "DIR")]
    dir: PathBuf,

    #[command(flatten)]
    load: LoadFlags,
}

#[derive(Args, Debug)]
struct MergeArgs {
    /// Catalyst paths, base layer first
    #[arg(value_name = "CATALYST", required = true)]
    catalysts: Vec<String>,

    /// Base directory for relative catalyst paths (defaults to $CATALYST_BASE or cwd)
    #[arg(long, value_name = "DIR")]
    base: Option<PathBuf>,

    /// Render a single facet (logical or directory name)
    #[arg(long, value_name = "FACET")]
    facet: Option<String>,

    /// Print the contribution summary instead of facet text
    #[arg(long)]
    summary: bool,

    /// Print the merged structure as JSON
    #[arg(long, conflicts_with_all = ["summary", "facet"])]
    json: bool,

    #[command(flatten)]
    load: LoadFlags,
}

#[derive(Subcommand, Debug)]
enum PlanCommand {
    /// Print the plan manifest as JSON
    Show {
        #[arg(value_name = "PLAN_DIR")]
        dir: PathBuf,
    },
    /// Create a plan manifest
    Init {
        #[arg(value_name = "PLAN_DIR")]
        dir: PathBuf,
        #[arg(long)]
        id: String,
        #[arg(long)]
        title: String,
        /// Comma- or space-separated catalyst identifiers
        #[arg(long, value_name = "LIST")]
        catalysts: Option<String>,
        /// Overwrite an existing manifest
        #[arg(long)]
        force: bool,
    },
    /// Append a catalyst identifier to the plan
    Add {
        #[arg(value_name = "PLAN_DIR")]
        dir: PathBuf,
        #[arg(value_name = "CATALYST")]
        catalyst: String,
    },
    /// Remove a catalyst identifier from the plan
    Remove {
        #[arg(value_name = "PLAN_DIR")]
        dir: PathBuf,
        #[arg(value_name = "CATALYST")]
        catalyst: String,
    },
    /// Load the plan's catalysts and print the merge summary
    Summary {
        #[arg(value_name = "PLAN_DIR")]
        dir: PathBuf,
        #[command(flatten)]
        load: LoadFlags,
    },
}

fn main() {
    init_logging();
    if let Err(err) = run(Cli::parse()) {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(filter)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Validate(args) => validate(args),
        Command::Merge(args) => merge(args),
        Command::Plan(command) => plan(command),
    }
}

fn validate(args: ValidateArgs) -> Result<()> {
    let report = try_load_catalyst(&args.dir, &args.load.options());
    println!("{}", serde_json::to_string_pretty(&report)?);
    if !report.success {
        std::process::exit(1);
    }
    Ok(())
}

fn merge(args: MergeArgs) -> Result<()> {
    let base = match args.base {
        Some(base) => base,
        None => match env::var_os(BASE_ENV) {
            Some(base) if !base.is_empty() => PathBuf::from(base),
            _ => env::current_dir().context("reading current directory")?,
        },
    };
    let resolved = resolve_catalysts(args.catalysts.as_slice(), &base, &args.load.options())?;
    let merged = merge_catalysts(&resolved.catalysts);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&merged)?);
    } else if args.summary {
        println!("{}", summarize_merge(&merged));
    } else if let Some(name) = args.facet {
        let Some(category) = FacetCategory::parse(&name) else {
            bail!(
                "unknown facet '{name}'; expected one of: {}",
                FACET_CATEGORIES
                    .iter()
                    .map(FacetCategory::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        };
        println!("{}", render_facet(&merged, category));
    } else {
        println!("{}", render_document(&merged));
    }
    Ok(())
}

fn plan(command: PlanCommand) -> Result<()> {
    match command {
        PlanCommand::Show { dir } => {
            let Some(manifest) = read_plan_manifest(&dir)? else {
                bail!("no plan manifest in {}", dir.display());
            };
            println!("{}", serde_json::to_string_pretty(&manifest)?);
        }
        PlanCommand::Init {
            dir,
            id,
            title,
            catalysts,
            force,
        } => {
            if !force && dir.is_dir() && read_plan_manifest(&dir)?.is_some() {
                bail!(
                    "plan manifest already exists in {}; pass --force to overwrite",
                    dir.display()
                );
            }
            let mut manifest = PlanManifest::new(id, title);
            if let Some(list) = catalysts {
                manifest.catalysts = Some(split_list(&list));
            }
            write_plan_manifest(&dir, &manifest)
                .with_context(|| format!("writing plan manifest in {}", dir.display()))?;
        }
        PlanCommand::Add { dir, catalyst } => {
            let manifest = add_catalyst_to_plan(&dir, &catalyst)?;
            println!("{}", manifest.catalyst_ids().join("\n"));
        }
        PlanCommand::Remove { dir, catalyst } => {
            let manifest = remove_catalyst_from_plan(&dir, &catalyst)?;
            println!("{}", manifest.catalyst_ids().join("\n"));
        }
        PlanCommand::Summary { dir, load } => {
            let resolved = load_plan_catalysts(&dir, &load.options())?;
            println!("{}", summarize_merge(&merge_catalysts(&resolved.catalysts)));
        }
    }
    Ok(())
}
