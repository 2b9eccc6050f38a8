#![allow(dead_code)]

pub mod fixtures {
    use std::path::{Path, PathBuf};

    use contractapi::artifact::ArtifactListing;
    use contractapi::config::{ProjectConfiguration, ProjectOptions};
    use contractapi::naming::resolve;

    pub fn fixture_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
    }

    pub fn fixture(name: &str) -> PathBuf {
        fixture_dir().join(name)
    }

    /// Listing of the named fixture contracts, each paired with its `.bin`.
    pub fn listing(names: &[&str]) -> ArtifactListing {
        ArtifactListing::from_paths(
            names.iter().map(|n| fixture(&format!("{n}.abi"))).collect(),
            names.iter().map(|n| fixture(&format!("{n}.bin"))).collect(),
        )
    }

    /// Token project configuration writing below `output_dir`.
    pub fn token_config(output_dir: &Path) -> ProjectConfiguration {
        let mut options = ProjectOptions::new("Token");
        options.package_name = Some("com.example.token".to_string());
        options.address_length = Some(20);
        options.output_dir = Some(output_dir.to_path_buf());
        resolve(&options)
    }
}

pub mod tree {
    use std::collections::BTreeMap;
    use std::path::Path;

    use walkdir::WalkDir;

    /// Every file below `root`, keyed by `/`-separated relative path.
    pub fn snapshot(root: &Path) -> BTreeMap<String, Vec<u8>> {
        WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| {
                let relative = entry
                    .path()
                    .strip_prefix(root)
                    .unwrap()
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join("/");
                (relative, std::fs::read(entry.path()).unwrap())
            })
            .collect()
    }

    pub fn read_text(root: &Path, relative: &str) -> String {
        std::fs::read_to_string(root.join(relative)).unwrap()
    }
}
