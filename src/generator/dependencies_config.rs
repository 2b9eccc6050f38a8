//! Dependency configuration for generated projects
//!
//! Lets a project add crates to the generated `Cargo.toml` via a TOML file
//! that sits alongside the contract ABIs.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// File name looked up next to the first ABI when no explicit path is given.
pub const DEPENDENCIES_CONFIG_FILE: &str = "contractapi-dependencies.toml";

/// Dependency specification for the generated Cargo.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum DependencySpec {
    /// Simple version string: "1.33"
    Version(String),
    /// Workspace dependency: { workspace = true }
    Workspace {
        workspace: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        features: Option<Vec<String>>,
    },
    /// Full specification: { version = "1.33", features = ["serde"] }
    Full {
        version: Option<String>,
        path: Option<String>,
        git: Option<String>,
        branch: Option<String>,
        features: Option<Vec<String>>,
    },
}

impl DependencySpec {
    /// Render as the right-hand side of a `[dependencies]` entry.
    pub fn to_inline_toml(&self) -> String {
        match self {
            DependencySpec::Version(v) => format!("{v:?}"),
            DependencySpec::Workspace { workspace, features } => {
                let mut parts = vec![format!("workspace = {workspace}")];
                if let Some(f) = features {
                    parts.push(format!("features = {}", string_array(f)));
                }
                format!("{{ {} }}", parts.join(", "))
            }
            DependencySpec::Full {
                version,
                path,
                git,
                branch,
                features,
            } => {
                let mut parts = Vec::new();
                for (key, value) in [
                    ("version", version),
                    ("path", path),
                    ("git", git),
                    ("branch", branch),
                ] {
                    if let Some(v) = value {
                        parts.push(format!("{key} = {v:?}"));
                    }
                }
                if let Some(f) = features {
                    parts.push(format!("features = {}", string_array(f)));
                }
                format!("{{ {} }}", parts.join(", "))
            }
        }
    }
}

fn string_array(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|s| format!("{s:?}")).collect();
    format!("[{}]", quoted.join(", "))
}

/// Dependency configuration loaded from contractapi-dependencies.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct DependenciesConfig {
    /// Dependencies to always include in the generated Cargo.toml
    #[serde(default)]
    pub dependencies: BTreeMap<String, DependencySpec>,
}

/// Load dependencies configuration from a TOML file
///
/// Returns `Ok(None)` if the file doesn't exist (not an error), and `Err` if
/// the file exists but fails to parse.
pub fn load_dependencies_config(config_path: &Path) -> anyhow::Result<Option<DependenciesConfig>> {
    if !config_path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(config_path).with_context(|| {
        format!(
            "Failed to read dependencies config: {}",
            config_path.display()
        )
    })?;

    let config: DependenciesConfig = toml::from_str(&contents).with_context(|| {
        format!(
            "Failed to parse dependencies config: {}",
            config_path.display()
        )
    })?;

    Ok(Some(config))
}

/// Resolve dependencies config path
///
/// Priority:
/// 1. Explicitly provided path (via CLI)
/// 2. Auto-detected next to the first ABI input
/// 3. None (no config)
pub fn resolve_config_path(explicit_path: Option<&Path>, first_abi: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }

    let dir = first_abi?;
    let dir = if dir.is_dir() { dir } else { dir.parent()? };
    let candidate = dir.join(DEPENDENCIES_CONFIG_FILE);
    candidate.exists().then_some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_specs() {
        let parsed: DependenciesConfig = toml::from_str(
            r#"
            [dependencies]
            alloy = { version = "1.0", features = ["full"] }
            hex = "0.4"
            shared = { workspace = true }
            "#,
        )
        .unwrap();
        assert_eq!(parsed.dependencies.len(), 3);
        assert_eq!(
            parsed.dependencies["hex"],
            DependencySpec::Version("0.4".to_string())
        );
        assert_eq!(
            parsed.dependencies["alloy"].to_inline_toml(),
            r#"{ version = "1.0", features = ["full"] }"#
        );
        assert_eq!(
            parsed.dependencies["shared"].to_inline_toml(),
            "{ workspace = true }"
        );
    }

    #[test]
    fn test_missing_file_is_none() {
        let res = load_dependencies_config(Path::new("/no/such/contractapi-dependencies.toml")).unwrap();
        assert!(res.is_none());
    }

    #[test]
    fn test_auto_detects_next_to_abi() {
        let dir = tempfile::tempdir().unwrap();
        let abi = dir.path().join("Token.abi");
        std::fs::write(&abi, "[]").unwrap();
        assert!(resolve_config_path(None, Some(&abi)).is_none());

        std::fs::write(dir.path().join(DEPENDENCIES_CONFIG_FILE), "[dependencies]\n").unwrap();
        assert_eq!(
            resolve_config_path(None, Some(&abi)),
            Some(dir.path().join(DEPENDENCIES_CONFIG_FILE))
        );
    }
}
