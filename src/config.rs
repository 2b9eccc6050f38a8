//! # Project Configuration
//!
//! Two layers describe a project:
//!
//! - [`ProjectOptions`]: what the user supplied, possibly partially. Options
//!   can come from a TOML file and be overridden field by field from the CLI.
//! - [`ProjectConfiguration`]: the fully resolved, immutable configuration a
//!   generation run works with. It is produced by [`crate::naming::resolve`].
//!
//! ## Example file
//!
//! ```toml
//! project_name = "Token"
//! package_name = "com.example.token"
//! context_path = "api/"
//! address_length = 20
//! generate_swagger = true
//!
//! [dependencies]
//! alloy = { version = "1.0", features = ["full"] }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::generator::DependencySpec;

/// Address width used when none is configured explicitly (Ethereum).
pub const DEFAULT_ADDRESS_LENGTH: u32 = 20;

/// Version written into the generated `Cargo.toml` by default.
pub const DEFAULT_PROJECT_VERSION: &str = "0.1.0";

/// User-supplied, possibly partial, project options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectOptions {
    /// Human project name; required (an empty name is rejected when modeling)
    pub project_name: String,
    /// Dotted namespace for generated sources, e.g. `com.example.token`
    pub package_name: Option<String>,
    /// Directory the project is written to
    pub output_dir: Option<PathBuf>,
    /// Route prefix for every generated handler
    pub context_path: Option<String>,
    /// Byte width of addresses in generated code
    pub address_length: Option<u32>,
    /// Emit `doc/openapi.yaml` (defaults to `true`)
    pub generate_swagger: Option<bool>,
    /// `[package].version` of the generated project
    pub version: Option<String>,
    /// Extra crates for the generated `Cargo.toml`
    pub dependencies: BTreeMap<String, DependencySpec>,
}

impl ProjectOptions {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            ..Self::default()
        }
    }

    /// Load options from a TOML file.
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read project config: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse project config: {}", path.display()))
    }

    /// Layer `overrides` on top of `self`: every field set in `overrides`
    /// wins, dependency maps are merged with `overrides` taking precedence.
    pub fn merged_with(mut self, overrides: ProjectOptions) -> Self {
        if !overrides.project_name.is_empty() {
            self.project_name = overrides.project_name;
        }
        self.package_name = overrides.package_name.or(self.package_name);
        self.output_dir = overrides.output_dir.or(self.output_dir);
        self.context_path = overrides.context_path.or(self.context_path);
        self.address_length = overrides.address_length.or(self.address_length);
        self.generate_swagger = overrides.generate_swagger.or(self.generate_swagger);
        self.version = overrides.version.or(self.version);
        self.dependencies.extend(overrides.dependencies);
        self
    }
}

/// Fully resolved configuration of one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfiguration {
    pub project_name: String,
    /// Cargo package name of the generated project
    pub crate_name: String,
    /// Dotted namespace (validated by the model builder)
    pub package_name: String,
    pub output_dir: PathBuf,
    /// Route prefix without leading or trailing `/`
    pub context_path: String,
    /// Validated by the model builder: must be present and positive
    pub address_length: Option<u32>,
    pub generate_swagger: bool,
    pub version: String,
    pub dependencies: BTreeMap<String, DependencySpec>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_toml_options() {
        let opts: ProjectOptions = toml::from_str(
            r#"
            project_name = "Token"
            context_path = "api/"
            address_length = 32
            generate_swagger = false

            [dependencies]
            hex = "0.4"
            "#,
        )
        .unwrap();
        assert_eq!(opts.project_name, "Token");
        assert_eq!(opts.context_path.as_deref(), Some("api/"));
        assert_eq!(opts.address_length, Some(32));
        assert_eq!(opts.generate_swagger, Some(false));
        assert!(opts.package_name.is_none());
        assert_eq!(opts.dependencies.len(), 1);
    }

    #[test]
    fn test_overrides_win() {
        let file = ProjectOptions {
            project_name: "FromFile".to_string(),
            context_path: Some("file".to_string()),
            address_length: Some(32),
            ..ProjectOptions::default()
        };
        let cli = ProjectOptions {
            context_path: Some("cli".to_string()),
            ..ProjectOptions::default()
        };
        let merged = file.merged_with(cli);
        assert_eq!(merged.project_name, "FromFile");
        assert_eq!(merged.context_path.as_deref(), Some("cli"));
        assert_eq!(merged.address_length, Some(32));
    }
}
