//! Canonical relative paths of a generated project.
//!
//! Both the handler emitter (which writes the sources) and the build
//! descriptor emitter (which lists them) read paths from here, so the two can
//! never disagree.

use super::types::{ContractModel, PackageNamespace};

pub const CARGO_TOML: &str = "Cargo.toml";
pub const CONFIG_YAML: &str = "config/config.yaml";
pub const OPENAPI_YAML: &str = "doc/openapi.yaml";
pub const MAIN_RS: &str = "src/main.rs";
pub const ROUTES_RS: &str = "src/routes.rs";
pub const ADDRESS_RS: &str = "src/address.rs";
pub const ERROR_RS: &str = "src/error.rs";
pub const STATE_RS: &str = "src/state.rs";

/// Top-level modules declared by the generated `main.rs`; the first package
/// segment must not shadow one of them.
pub const RESERVED_TOP_MODULES: [&str; 5] = ["main", "routes", "address", "error", "state"];

/// Fixed project-level sources, independent of the contracts.
pub const FIXED_SOURCES: [&str; 5] = [MAIN_RS, ROUTES_RS, ADDRESS_RS, ERROR_RS, STATE_RS];

/// Directory holding the per-contract handler sources, below the package dir.
pub const CONTRACTS_MODULE: &str = "contracts";

/// A `mod.rs` file and the child modules it declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleFile {
    pub path: String,
    pub modules: Vec<String>,
}

/// All relative paths of a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    /// `mod.rs` chain from `src/<first segment>` down to the contracts module
    pub module_files: Vec<ModuleFile>,
    /// Handler source per contract, sorted by contract name
    pub contract_sources: Vec<String>,
    /// Bytecode resource per contract, sorted by contract name
    pub contract_resources: Vec<String>,
}

impl ProjectLayout {
    pub fn new(package: &PackageNamespace, contracts: &[ContractModel]) -> Self {
        let mut module_files = Vec::new();
        let mut dir = String::from("src");
        for (i, segment) in package.segments.iter().enumerate() {
            dir = format!("{dir}/{segment}");
            let child = package
                .segments
                .get(i + 1)
                .cloned()
                .unwrap_or_else(|| CONTRACTS_MODULE.to_string());
            module_files.push(ModuleFile {
                path: format!("{dir}/mod.rs"),
                modules: vec![child],
            });
        }
        module_files.push(ModuleFile {
            path: format!("{dir}/{CONTRACTS_MODULE}/mod.rs"),
            modules: contracts.iter().map(|c| c.module_name.clone()).collect(),
        });

        Self {
            module_files,
            contract_sources: contracts.iter().map(|c| c.source_path.clone()).collect(),
            contract_resources: contracts.iter().map(|c| c.resource_path.clone()).collect(),
        }
    }

    /// Every Rust source of the project, sorted.
    pub fn sources(&self) -> Vec<String> {
        let mut all: Vec<String> = FIXED_SOURCES.iter().map(|s| s.to_string()).collect();
        all.extend(self.module_files.iter().map(|m| m.path.clone()));
        all.extend(self.contract_sources.iter().cloned());
        all.sort();
        all.dedup();
        all
    }

    /// Non-source files the project ships with, sorted.
    pub fn resources(&self, generate_swagger: bool) -> Vec<String> {
        let mut all = vec![CONFIG_YAML.to_string()];
        if generate_swagger {
            all.push(OPENAPI_YAML.to_string());
        }
        all.extend(self.contract_resources.iter().cloned());
        all.sort();
        all
    }
}

/// Handler source path of a contract module inside a package.
pub fn contract_source_path(package: &PackageNamespace, module_name: &str) -> String {
    format!("{}/{CONTRACTS_MODULE}/{module_name}.rs", package.source_dir())
}

/// Bytecode resource path of a contract module.
pub fn contract_resource_path(module_name: &str) -> String {
    format!("resources/{module_name}.bin")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_chain_for_package() {
        let pkg = PackageNamespace {
            segments: vec!["com".into(), "example".into()],
        };
        let layout = ProjectLayout::new(&pkg, &[]);
        let paths: Vec<_> = layout.module_files.iter().map(|m| m.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "src/com/mod.rs",
                "src/com/example/mod.rs",
                "src/com/example/contracts/mod.rs"
            ]
        );
        assert_eq!(layout.module_files[0].modules, vec!["example"]);
        assert_eq!(layout.module_files[1].modules, vec!["contracts"]);
    }

    #[test]
    fn test_resources_gated_by_swagger() {
        let pkg = PackageNamespace {
            segments: vec!["app".into()],
        };
        let layout = ProjectLayout::new(&pkg, &[]);
        assert!(!layout.resources(false).iter().any(|r| r == OPENAPI_YAML));
        assert!(layout.resources(true).iter().any(|r| r == OPENAPI_YAML));
    }
}
