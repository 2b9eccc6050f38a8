//! Build descriptor emitter: `Cargo.toml` and `config/config.yaml`.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use super::dependencies_config::DependencySpec;
use super::emitter::{EmittedFile, Emitter, EmitterKind, RenderUnit};
use super::templates::{render, rust_str, CargoTomlTemplate};
use crate::config::ProjectConfiguration;
use crate::error::{GenerationError, Result};
use crate::model::{ProjectModel, CARGO_TOML, CONFIG_YAML};

/// Crates every generated service depends on.
fn base_dependencies() -> BTreeMap<String, DependencySpec> {
    let full = |version: &str, features: &[&str]| DependencySpec::Full {
        version: Some(version.to_string()),
        path: None,
        git: None,
        branch: None,
        features: Some(features.iter().map(|f| f.to_string()).collect()),
    };
    let plain = |version: &str| DependencySpec::Version(version.to_string());
    BTreeMap::from([
        ("anyhow".to_string(), plain("1.0")),
        ("axum".to_string(), plain("0.8")),
        ("serde".to_string(), full("1.0", &["derive"])),
        ("serde_json".to_string(), plain("1.0")),
        ("serde_yaml".to_string(), plain("0.9")),
        ("thiserror".to_string(), plain("2.0")),
        ("tokio".to_string(), full("1", &["full"])),
        ("tracing".to_string(), plain("0.1")),
        ("tracing-subscriber".to_string(), full("0.3", &["env-filter"])),
    ])
}

#[derive(Debug, Serialize)]
struct ServiceConfigFile<'a> {
    bind_address: &'a str,
    node_url: &'a str,
    context_path: String,
    address_length: u32,
    contracts: BTreeMap<&'a str, InstanceSlot>,
}

/// Instance address of a deployed contract, filled in by the operator.
#[derive(Debug, Serialize)]
struct InstanceSlot {
    address: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BuildDescriptorEmitter;

impl Emitter for BuildDescriptorEmitter {
    fn kind(&self) -> EmitterKind {
        EmitterKind::BuildDescriptor
    }

    fn render(
        &self,
        unit: RenderUnit<'_>,
        config: &ProjectConfiguration,
    ) -> Result<Vec<EmittedFile>> {
        let RenderUnit::Project(project) = unit else {
            return Ok(Vec::new());
        };
        Ok(vec![
            EmittedFile::text(CARGO_TOML, cargo_toml(project, config)?, EmitterKind::BuildDescriptor),
            EmittedFile::text(CONFIG_YAML, config_yaml(project, config)?, EmitterKind::BuildDescriptor),
        ])
    }
}

fn cargo_toml(project: &ProjectModel, config: &ProjectConfiguration) -> Result<String> {
    let mut dependencies = base_dependencies();
    // configured crates replace the defaults of the same name
    dependencies.extend(config.dependencies.clone());

    let template = CargoTomlTemplate {
        crate_name_lit: rust_str(&config.crate_name),
        version_lit: rust_str(&config.version),
        description_lit: rust_str(&format!("API service for the {} contracts", config.project_name)),
        dependencies: dependencies
            .iter()
            .map(|(name, spec)| (name.clone(), spec.to_inline_toml()))
            .collect(),
        package_lit: rust_str(&project.package.dotted()),
        context_path_lit: rust_str(&format!("/{}", config.context_path)),
        address_length: project.address_length,
        sources: project.layout.sources(),
        resources: project.layout.resources(config.generate_swagger),
    };
    let rendered = render(&template, "Cargo.toml.txt")?;
    debug!(dependencies = dependencies.len(), "rendered Cargo.toml");
    Ok(rendered)
}

fn config_yaml(project: &ProjectModel, config: &ProjectConfiguration) -> Result<String> {
    let file = ServiceConfigFile {
        bind_address: "0.0.0.0:8080",
        node_url: "http://localhost:8545",
        context_path: format!("/{}", config.context_path),
        address_length: project.address_length,
        contracts: project
            .contracts
            .iter()
            .map(|c| (c.name.as_str(), InstanceSlot { address: None }))
            .collect(),
    };
    let body = serde_yaml::to_string(&file)
        .map_err(|e| GenerationError::malformed(CONFIG_YAML, e.to_string()))?;
    Ok(format!("# {} service configuration\n{body}", config.project_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::test_support::{token_config, token_project};

    fn render_all(config: &ProjectConfiguration) -> Vec<EmittedFile> {
        BuildDescriptorEmitter
            .render(RenderUnit::Project(&token_project()), config)
            .unwrap()
    }

    #[test]
    fn test_cargo_toml_references_every_source() {
        let files = render_all(&token_config());
        let cargo = std::str::from_utf8(&files[0].contents).unwrap();
        let parsed: toml::Value = toml::from_str(cargo).unwrap();
        assert_eq!(parsed["package"]["name"].as_str(), Some("token"));
        let sources = parsed["package"]["metadata"]["contractapi"]["sources"]
            .as_array()
            .unwrap();
        assert!(sources
            .iter()
            .any(|s| s.as_str() == Some("src/com/example/token/contracts/token.rs")));
        assert!(sources.iter().any(|s| s.as_str() == Some("src/main.rs")));
        assert!(parsed["dependencies"]["axum"].is_str());
    }

    #[test]
    fn test_configured_dependencies_override_defaults() {
        let mut config = token_config();
        config
            .dependencies
            .insert("axum".to_string(), DependencySpec::Version("0.8.4".to_string()));
        config
            .dependencies
            .insert("hex".to_string(), DependencySpec::Version("0.4".to_string()));
        let files = render_all(&config);
        let parsed: toml::Value =
            toml::from_str(std::str::from_utf8(&files[0].contents).unwrap()).unwrap();
        assert_eq!(parsed["dependencies"]["axum"].as_str(), Some("0.8.4"));
        assert_eq!(parsed["dependencies"]["hex"].as_str(), Some("0.4"));
    }

    #[test]
    fn test_config_yaml_has_instance_slot_per_contract() {
        let files = render_all(&token_config());
        let yaml: serde_yaml::Value =
            serde_yaml::from_slice(&files[1].contents).unwrap();
        assert_eq!(yaml["context_path"].as_str(), Some("/Token"));
        assert!(yaml["contracts"]["Token"]["address"].is_null());
    }

    #[test]
    fn test_contract_units_produce_nothing() {
        let project = token_project();
        let files = BuildDescriptorEmitter
            .render(RenderUnit::Contract(&project.contracts[0]), &token_config())
            .unwrap();
        assert!(files.is_empty());
    }
}
