//! # Artifact Loader
//!
//! Resolves contract ABI documents and their compiled binary payloads into an
//! [`ArtifactManifest`], pairing them by contract name.
//!
//! ```rust,ignore
//! use contractapi::artifact::{load_artifacts, ArtifactListing};
//!
//! let listing = ArtifactListing::from_paths(
//!     vec!["build/Token.abi".into()],
//!     vec!["build/Token.bin".into()],
//! );
//! let manifest = load_artifacts(&listing)?;
//! assert!(manifest.contracts.contains_key("Token"));
//! ```

mod abi;
mod load;
mod types;

pub use abi::{abi_json_schema, parse_abi};
pub use load::{expand_inputs, load_artifacts, ABI_EXTENSIONS, BIN_EXTENSION};
pub use types::*;
