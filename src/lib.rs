//! # contractapi
//!
//! **contractapi** turns smart-contract ABIs and their compiled bytecode into a complete,
//! buildable Rust service that exposes every contract over HTTP, documented by an
//! [OpenAPI 3.1.0](https://spec.openapis.org/oas/v3.1.0) document.
//!
//! ## Overview
//!
//! One run takes a set of contract artifacts plus a project configuration and writes a project
//! tree containing an axum service, a `Cargo.toml`, a runtime `config/config.yaml`, the contract
//! bytecode as resources, and (optionally) `doc/openapi.yaml`.
//!
//! ## Architecture
//!
//! - **[`artifact`]** - Locates, reads and pairs ABI documents with bytecode
//! - **[`model`]** - Builds the language-neutral project model (routes, handlers, schemas)
//! - **[`generator`]** - Emitters, the artifact set, the assembler and the run pipeline
//! - **[`naming`]** - Identifier, route and package-name rules
//! - **[`config`]** - Project options and the resolved configuration
//! - **[`error`]** - The generation error taxonomy and stage-tagged run failures
//! - **[`logging`]** - `tracing` subscriber setup for the binary
//! - **[`cli`]** - The `contractapi-gen` command line
//!
//! ### Generation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant User
//!     participant CLI as CLI<br/>(contractapi-gen)
//!     participant Load as artifact::load_artifacts
//!     participant Model as model::build_project_model
//!     participant Emit as generator::emit
//!     participant Asm as generator::assemble
//!     participant FS as File System
//!
//!     User->>CLI: contractapi-gen new -n Token --abi build/
//!     CLI->>Load: ArtifactListing
//!     Load->>Load: Pair *.abi with *.bin by name
//!     Load-->>CLI: ArtifactManifest
//!     CLI->>Model: manifest + ProjectConfiguration
//!     Model->>Model: Routes, handler names,<br/>address width, package path
//!     Model-->>CLI: ProjectModel
//!     CLI->>Emit: model + emitters
//!     par handler
//!         Emit->>Emit: contract sources, main.rs, routes.rs
//!     and build-descriptor
//!         Emit->>Emit: Cargo.toml, config/config.yaml
//!     and specification
//!         Emit->>Emit: doc/openapi.yaml
//!     end
//!     Emit-->>CLI: GeneratedArtifactSet
//!     CLI->>Asm: artifact set + output dir
//!     Asm->>FS: temp file + rename per file
//!     Asm-->>CLI: AssemblyReport
//! ```
//!
//! ### Key Properties
//!
//! 1. **Deterministic**: the same inputs give a byte-identical tree, regardless of input order
//! 2. **All or nothing per stage**: a failure names its stage and nothing is written before assembly
//! 3. **Collision-checked**: two emitters can never silently overwrite each other's file
//! 4. **Idempotent**: re-running over an existing tree leaves unchanged files untouched
//!
//! ## Quick Start
//!
//! ```no_run
//! use contractapi::artifact::ArtifactListing;
//! use contractapi::config::ProjectOptions;
//! use contractapi::generator::generate;
//! use contractapi::naming::resolve;
//!
//! let listing = ArtifactListing::from_paths(
//!     vec!["build/Token.abi".into()],
//!     vec!["build/Token.bin".into()],
//! );
//! let mut options = ProjectOptions::new("Token");
//! options.address_length = Some(20);
//! let config = resolve(&options);
//!
//! match generate(&listing, &config) {
//!     Ok(outcome) => println!("{} files", outcome.artifacts.len()),
//!     Err(failure) => eprintln!("{} failed: {}", failure.stage, failure.error),
//! }
//! ```
//!
//! ## Command Line
//!
//! ```bash
//! contractapi-gen new --project-name Token --package-name com.example.token \
//!     --abi build/Token.abi --bin build/Token.bin --output-dir out
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod artifact;
pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod model;
pub mod naming;

pub use error::{ErrorKind, GenerationError, RunFailure, Stage};
pub use generator::{generate, generate_with, GenerationOutcome, RunOptions};
