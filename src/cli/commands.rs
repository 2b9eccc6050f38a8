use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use crate::artifact::{expand_inputs, ArtifactListing, ABI_EXTENSIONS, BIN_EXTENSION};
use crate::config::{ProjectConfiguration, ProjectOptions, DEFAULT_ADDRESS_LENGTH};
use crate::error::RunFailure;
use crate::generator::{
    format_project, generate_with, inspect, load_dependencies_config, resolve_config_path,
    AssemblyReport, RunOptions, WriteOutcome,
};
use crate::model::ProjectModel;
use crate::naming::{crate_name_for, resolve};

/// Command-line interface for the contract API generator
#[derive(Parser)]
#[command(name = "contractapi-gen")]
#[command(about = "Generate OpenAPI-serving Rust projects from contract ABIs", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command that reads contracts
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ProjectArgs {
    /// Project name; also the default context path and crate name
    #[arg(short = 'n', long)]
    pub project_name: Option<String>,

    /// Dotted namespace of the generated sources (default: com.<crate name>)
    #[arg(short, long)]
    pub package_name: Option<String>,

    /// ABI files or directories containing *.abi / *.json files
    #[arg(short, long, required = true, num_args = 1..)]
    pub abi: Vec<PathBuf>,

    /// Bytecode files or directories containing *.bin files
    /// If not provided, `<name>.bin` is looked up next to each ABI
    #[arg(short, long, num_args = 1..)]
    pub bin: Vec<PathBuf>,

    /// Route prefix of every generated endpoint (default: project name)
    #[arg(long)]
    pub context_path: Option<String>,

    /// Byte width of contract addresses [default: 20]
    #[arg(long, env = "CONTRACTAPI_ADDRESS_LENGTH")]
    pub address_length: Option<u32>,

    /// Project options file (TOML); command-line flags take precedence
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Path to dependencies configuration file (contractapi-dependencies.toml)
    /// If not provided, will auto-detect alongside the first ABI
    #[arg(long)]
    pub dependencies_config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Generate a whole API project
    New {
        #[command(flatten)]
        project: ProjectArgs,

        /// Directory the project folder is created in
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Do not generate doc/openapi.yaml
        #[arg(long, default_value_t = false)]
        no_swagger: bool,

        /// Version for generated Cargo.toml [package].version
        #[arg(long)]
        version: Option<String>,

        /// Perform a dry run: show what would change without writing files
        #[arg(long, default_value_t = false)]
        dry_run: bool,

        /// Run `cargo fmt` on the generated project
        #[arg(long, default_value_t = false)]
        format: bool,

        /// Print the generation report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Load and model contracts, then print their routes without generating
    Inspect {
        #[command(flatten)]
        project: ProjectArgs,
    },
}

/// Process exit code for an error returned by [`run_cli`].
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<RunFailure>()
        .map(|failure| failure.kind().exit_code())
        .unwrap_or(1)
}

/// Execute the CLI command provided by the user
///
/// # Errors
///
/// Returns an error if option files cannot be read, or if the generation
/// run fails; in that case the error is a [`RunFailure`] carrying the stage.
pub fn run_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::New {
            project,
            output_dir,
            no_swagger,
            version,
            dry_run,
            format,
            json,
        } => {
            let mut overrides = project_overrides(&project);
            overrides.version = version;
            if no_swagger {
                overrides.generate_swagger = Some(false);
            }
            let mut options = load_options(&project, overrides)?;
            if options.output_dir.is_none() {
                options.output_dir = Some(output_dir.join(crate_name_for(&options.project_name)));
            }
            let config = resolve(&options);
            let listing = build_listing(&project)?;

            let run_options = RunOptions {
                dry_run,
                ..RunOptions::default()
            };
            let outcome = generate_with(&listing, &config, &run_options)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome.report)?);
            } else {
                print_report(&outcome.report, &config);
            }
            if format && !dry_run {
                format_project(&config.output_dir)?;
            }
            Ok(())
        }
        Commands::Inspect { project } => {
            let options = load_options(&project, project_overrides(&project))?;
            let config = resolve(&options);
            let listing = build_listing(&project)?;
            let model = inspect(&listing, &config)?;
            print_model(&model, &config);
            Ok(())
        }
    }
}

fn project_overrides(args: &ProjectArgs) -> ProjectOptions {
    ProjectOptions {
        project_name: args.project_name.clone().unwrap_or_default(),
        package_name: args.package_name.clone(),
        context_path: args.context_path.clone(),
        address_length: args.address_length,
        ..ProjectOptions::default()
    }
}

/// Layer: dependency file < options file < command-line flags < defaults.
fn load_options(args: &ProjectArgs, overrides: ProjectOptions) -> anyhow::Result<ProjectOptions> {
    let mut options = match &args.config {
        Some(path) => ProjectOptions::from_toml_file(path)?,
        None => ProjectOptions::default(),
    };

    let deps_path = resolve_config_path(
        args.dependencies_config.as_deref(),
        args.abi.first().map(PathBuf::as_path),
    );
    if let Some(path) = &deps_path {
        if let Some(deps) = load_dependencies_config(path)? {
            info!(path = %path.display(), count = deps.dependencies.len(), "loaded dependencies config");
            let mut merged = deps.dependencies;
            merged.extend(std::mem::take(&mut options.dependencies));
            options.dependencies = merged;
        }
    } else if let Some(explicit) = &args.dependencies_config {
        warn!(path = %explicit.display(), "dependencies config not found; ignoring");
    }

    let mut options = options.merged_with(overrides);
    if options.address_length.is_none() {
        options.address_length = Some(DEFAULT_ADDRESS_LENGTH);
    }
    Ok(options)
}

fn build_listing(args: &ProjectArgs) -> anyhow::Result<ArtifactListing> {
    let abis = expand_inputs(&args.abi, &ABI_EXTENSIONS).context("Failed to list ABI inputs")?;
    let bins = if args.bin.is_empty() {
        sibling_bins(&args.abi, &abis)
    } else {
        expand_inputs(&args.bin, &[BIN_EXTENSION]).context("Failed to list bytecode inputs")?
    };
    Ok(ArtifactListing::from_paths(abis, bins))
}

/// `<stem>.bin` next to each ABI file, plus every `*.bin` in ABI directories.
fn sibling_bins(inputs: &[PathBuf], abis: &[PathBuf]) -> Vec<PathBuf> {
    let dirs: Vec<PathBuf> = inputs.iter().filter(|p| p.is_dir()).cloned().collect();
    let mut bins = expand_inputs(&dirs, &[BIN_EXTENSION]).unwrap_or_default();
    for abi in abis {
        let candidate = abi.with_extension(BIN_EXTENSION);
        if !bins.contains(&candidate) {
            // a missing file surfaces as MissingArtifact when loading
            bins.push(candidate);
        }
    }
    bins
}

fn print_report(report: &AssemblyReport, config: &ProjectConfiguration) {
    let verb = if report.dry_run { "Would generate" } else { "Generated" };
    println!(
        "{verb} project '{}' in {}",
        config.project_name,
        report.output_dir.display()
    );
    for file in &report.files {
        let marker = match file.outcome {
            WriteOutcome::Created => "+",
            WriteOutcome::Updated => "~",
            WriteOutcome::Unchanged => "=",
        };
        println!("  {marker} {} ({} bytes)", file.path, file.bytes);
    }
    for path in &report.removed {
        println!("  - {path}");
    }
    println!(
        "{} created, {} updated, {} unchanged, {} removed",
        report.count(WriteOutcome::Created),
        report.count(WriteOutcome::Updated),
        report.count(WriteOutcome::Unchanged),
        report.removed.len()
    );
}

fn print_model(model: &ProjectModel, config: &ProjectConfiguration) {
    println!("Project: {} (package {})", config.project_name, model.package.dotted());
    println!("Address length: {} bytes", model.address_length);
    for contract in &model.contracts {
        println!("\n{} -> {}", contract.name, contract.source_path);
        if let Some(deploy) = &contract.deploy {
            println!("  POST {:<40} {}", deploy.route_path, deploy.handler_name);
        }
        for method in &contract.methods {
            println!(
                "  {:<4} {:<40} {}",
                method.http_method.to_string(),
                method.route_path,
                method.handler_name
            );
        }
    }
}
