//! # Generator Module
//!
//! Renders a [`ProjectModel`](crate::model::ProjectModel) into the files of an
//! API-serving Rust project and writes them to disk.
//!
//! ## Architecture
//!
//! ```text
//! ABIs + bytecode → Loader → Model Builder → Emitters (parallel) → Assembler
//! ```
//!
//! Three emitters contribute files, each selected by an [`EmitterKind`]:
//!
//! - **Handler** - one axum handler module per contract, plus `main.rs`,
//!   `routes.rs`, `address.rs`, `error.rs`, `state.rs` and the `mod.rs` chain
//! - **BuildDescriptor** - `Cargo.toml` listing every source and resource, and
//!   `config/config.yaml`
//! - **Specification** - `doc/openapi.yaml`, only when `generate_swagger` is set
//!
//! ## Generated Structure
//!
//! ```text
//! token/
//! ├── Cargo.toml
//! ├── config/
//! │   └── config.yaml
//! ├── doc/
//! │   └── openapi.yaml
//! ├── resources/
//! │   └── token.bin
//! └── src/
//!     ├── main.rs
//!     ├── routes.rs
//!     ├── address.rs
//!     ├── error.rs
//!     ├── state.rs
//!     └── com/example/token/
//!         ├── mod.rs
//!         └── contracts/
//!             ├── mod.rs
//!             └── token.rs
//! ```
//!
//! ## Programmatic Usage
//!
//! ```rust,ignore
//! use contractapi::artifact::ArtifactListing;
//! use contractapi::config::ProjectOptions;
//! use contractapi::generator::generate;
//! use contractapi::naming::resolve;
//!
//! let listing = ArtifactListing::from_paths(
//!     vec!["build/Token.abi".into()],
//!     vec!["build/Token.bin".into()],
//! );
//! let config = resolve(&ProjectOptions {
//!     address_length: Some(20),
//!     ..ProjectOptions::new("Token")
//! });
//! let outcome = generate(&listing, &config)?;
//! println!("{} files", outcome.report.files.len());
//! ```
//!
//! ## Templates
//!
//! Rust sources and `Cargo.toml` are rendered with Askama templates from the
//! `templates/` directory; the OpenAPI document and `config.yaml` are
//! serialised from typed values.

mod artifacts;
mod assembler;
mod build_descriptor;
mod dependencies_config;
mod emitter;
mod format;
mod handler;
mod pipeline;
mod specification;
mod templates;
#[cfg(test)]
mod test_support;

pub use artifacts::GeneratedArtifactSet;
pub use assembler::{assemble, content_digest, plan, AssemblyReport, FileReport, WriteOutcome};
pub use build_descriptor::BuildDescriptorEmitter;
pub use dependencies_config::{
    load_dependencies_config, resolve_config_path, DependenciesConfig, DependencySpec,
    DEPENDENCIES_CONFIG_FILE,
};
pub use emitter::{EmittedFile, Emitter, EmitterKind, RenderUnit};
pub use format::{format_project, CARGO_BIN_ENV};
pub use handler::HandlerEmitter;
pub use pipeline::{
    emit, generate, generate_with, inspect, GenerationOutcome, GenerationRun, RunOptions, RunState,
};
pub use specification::{openapi_document, schema_for, SpecificationEmitter, OPENAPI_VERSION};
