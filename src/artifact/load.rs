use std::collections::BTreeMap;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::abi::parse_abi;
use super::types::{
    ArtifactInput, ArtifactListing, ArtifactManifest, BinaryPayload, ContractArtifact,
};
use crate::error::{GenerationError, Result};

/// File extensions recognised as ABI documents when expanding directories.
pub const ABI_EXTENSIONS: [&str; 2] = ["abi", "json"];
/// File extension recognised as a binary payload when expanding directories.
pub const BIN_EXTENSION: &str = "bin";

fn read_input(input: &ArtifactInput) -> Result<Vec<u8>> {
    match input {
        ArtifactInput::Inline { bytes, .. } => Ok(bytes.clone()),
        ArtifactInput::Path(path) => std::fs::read(path).map_err(|e| {
            if e.kind() == IoErrorKind::NotFound {
                GenerationError::MissingArtifact {
                    contract: input.contract_name(),
                    detail: format!("file {} does not exist", path.display()),
                }
            } else {
                GenerationError::malformed(
                    input.contract_name(),
                    format!("could not read {}: {e}", path.display()),
                )
            }
        }),
    }
}

/// Resolve a listing into a manifest pairing every interface description with
/// its binary payload.
///
/// # Errors
///
/// - [`GenerationError::MissingArtifact`] if an ABI has no binary with the
///   same contract name, or a listed file does not exist
/// - [`GenerationError::MalformedArtifact`] if an ABI cannot be parsed, or two
///   inputs claim the same contract name
pub fn load_artifacts(listing: &ArtifactListing) -> Result<ArtifactManifest> {
    let mut binaries: BTreeMap<String, &ArtifactInput> = BTreeMap::new();
    for bin in &listing.bins {
        let name = bin.contract_name();
        if binaries.insert(name.clone(), bin).is_some() {
            return Err(GenerationError::malformed(
                name,
                "more than one binary payload supplied",
            ));
        }
    }

    let mut contracts = BTreeMap::new();
    for abi in &listing.abis {
        let name = abi.contract_name();
        if name.is_empty() {
            return Err(GenerationError::malformed(
                abi.describe(),
                "cannot derive a contract name",
            ));
        }
        if contracts.contains_key(&name) {
            return Err(GenerationError::malformed(
                name,
                "more than one interface description supplied",
            ));
        }
        let Some(bin) = binaries.remove(&name) else {
            return Err(GenerationError::MissingArtifact {
                contract: name,
                detail: "no binary payload with a matching name".to_string(),
            });
        };

        let interface = parse_abi(&name, &read_input(abi)?)?;
        let binary = BinaryPayload {
            name: name.clone(),
            bytes: read_input(bin)?,
        };
        debug!(
            contract = %name,
            functions = interface.functions.len(),
            events = interface.events.len(),
            bytecode_len = binary.bytes.len(),
            "loaded contract artifact"
        );
        contracts.insert(name, ContractArtifact { interface, binary });
    }

    for orphan in binaries.keys() {
        warn!(contract = %orphan, "binary payload has no matching interface description; ignoring");
    }

    info!(contracts = contracts.len(), "artifacts loaded");
    Ok(ArtifactManifest { contracts })
}

/// Expand CLI inputs: files are kept, directories are replaced by their files
/// with one of `extensions`, sorted by path.
pub fn expand_inputs(inputs: &[PathBuf], extensions: &[&str]) -> std::io::Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found = Vec::new();
            for entry in std::fs::read_dir(input)? {
                let path = entry?.path();
                if path.is_file() && has_extension(&path, extensions) {
                    found.push(path);
                }
            }
            found.sort();
            out.extend(found);
        } else {
            out.push(input.clone());
        }
    }
    Ok(out)
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const COUNTER_ABI: &str = r#"[{"type":"function","name":"count","stateMutability":"view","inputs":[],"outputs":[{"name":"","type":"uint256"}]}]"#;

    #[test]
    fn test_pairs_by_name_and_sorts() {
        let listing = ArtifactListing::default()
            .with_contract("Zeta", COUNTER_ABI, "0x6080")
            .with_contract("Alpha", COUNTER_ABI, "0x6080");
        let manifest = load_artifacts(&listing).unwrap();
        let names: Vec<_> = manifest.contracts.keys().cloned().collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);
    }

    #[test]
    fn test_missing_binary_names_interface() {
        let listing = ArtifactListing::default()
            .with_contract("Alpha", COUNTER_ABI, "0x6080")
            .with_abi("Beta", COUNTER_ABI);
        match load_artifacts(&listing) {
            Err(GenerationError::MissingArtifact { contract, .. }) => assert_eq!(contract, "Beta"),
            other => panic!("expected MissingArtifact, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_is_missing_artifact() {
        let listing = ArtifactListing::from_paths(
            vec![PathBuf::from("/definitely/not/here/Ghost.abi")],
            vec![PathBuf::from("/definitely/not/here/Ghost.bin")],
        );
        assert!(matches!(
            load_artifacts(&listing),
            Err(GenerationError::MissingArtifact { ref contract, .. }) if contract == "Ghost"
        ));
    }

    #[test]
    fn test_orphan_binary_is_ignored() {
        let listing = ArtifactListing::default()
            .with_contract("Alpha", COUNTER_ABI, "0x6080")
            .with_bin("Orphan", "0x00");
        let manifest = load_artifacts(&listing).unwrap();
        assert_eq!(manifest.len(), 1);
    }

    #[test]
    fn test_duplicate_interface_is_malformed() {
        let listing = ArtifactListing::default()
            .with_contract("Alpha", COUNTER_ABI, "0x6080")
            .with_abi("Alpha", COUNTER_ABI);
        assert!(matches!(
            load_artifacts(&listing),
            Err(GenerationError::MalformedArtifact { .. })
        ));
    }

    #[test]
    fn test_expand_inputs_lists_directory_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.abi"), "[]").unwrap();
        std::fs::write(dir.path().join("a.abi"), "[]").unwrap();
        std::fs::write(dir.path().join("a.bin"), "0x").unwrap();
        let found = expand_inputs(&[dir.path().to_path_buf()], &ABI_EXTENSIONS).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.abi", "b.abi"]);
    }
}
