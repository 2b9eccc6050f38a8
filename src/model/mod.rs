//! # Contract Model Builder
//!
//! Turns an [`ArtifactManifest`](crate::artifact::ArtifactManifest) into the
//! generation-ready [`ProjectModel`]: one [`ContractModel`] per contract with
//! routes, handler names, Rust types and canonical output paths resolved.
//!
//! Contracts are ordered by name and every generated name is de-duplicated
//! deterministically, so identical inputs always yield an identical model.

mod build;
mod layout;
mod types;

pub use build::{build_project_model, parse_package};
pub use layout::*;
pub use types::*;
