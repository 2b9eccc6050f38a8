//! Builds a generated project with real cargo.
//!
//! The compile check needs the generated project's dependencies from the
//! registry, so it is ignored by default:
//! `cargo test --test generated_build_tests -- --ignored`.

mod common;

use std::collections::HashSet;
use std::process::Command;

use common::fixtures::{fixture, fixture_dir, token_config};
use common::tree::read_text;
use contractapi::artifact::ArtifactListing;
use contractapi::generator::{generate, CARGO_BIN_ENV};

fn edge_listing() -> ArtifactListing {
    let edge = fixture_dir().join("edge");
    ArtifactListing::from_paths(
        vec![edge.join("EdgeCases.abi"), fixture("Token.abi")],
        vec![edge.join("EdgeCases.bin"), fixture("Token.bin")],
    )
}

fn struct_names(source: &str) -> Vec<&str> {
    source
        .lines()
        .filter_map(|line| line.strip_prefix("pub struct "))
        .filter_map(|rest| rest.split_whitespace().next())
        .collect()
}

#[test]
fn test_edge_case_names_stay_unique() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("token");
    let outcome = generate(&edge_listing(), &token_config(&out)).unwrap();

    let source = read_text(&out, "src/com/example/token/contracts/edge_cases.rs");
    let structs = struct_names(&source);
    let distinct: HashSet<_> = structs.iter().collect();
    assert_eq!(distinct.len(), structs.len(), "duplicate struct in {structs:?}");
    assert!(structs.contains(&"FooBar11Request"));
    assert!(structs.contains(&"FooBar1RequestEvent"));

    // One weiValue member per payable request.
    assert_eq!(source.matches("#[serde(rename = \"weiValue\", default)]").count(), 2);
    assert!(source.contains("#[serde(rename = \"weiValue_1\")]"));
    assert!(source.contains("pub r#type: u8,"));

    let routes: Vec<&str> = outcome
        .model
        .contracts
        .iter()
        .flat_map(|c| c.methods.iter().map(|m| m.route_path.as_str()))
        .collect();
    let distinct: HashSet<_> = routes.iter().collect();
    assert_eq!(distinct.len(), routes.len(), "duplicate route in {routes:?}");
    assert!(routes.contains(&"/Token/EdgeCases/a_"));
    assert!(routes.contains(&"/Token/EdgeCases/a__1"));
    assert!(routes.contains(&"/Token/Token/balanceOf"));
}

#[test]
#[ignore] // Runs `cargo check` on the generated project; needs registry access
fn test_generated_edge_case_project_compiles() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("token");
    generate(&edge_listing(), &token_config(&out)).unwrap();

    let cargo = std::env::var(CARGO_BIN_ENV).unwrap_or_else(|_| "cargo".to_string());
    let output = Command::new(&cargo)
        .args(["check", "--quiet"])
        .current_dir(&out)
        .env("CARGO_TARGET_DIR", dir.path().join("target"))
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "cargo check failed in {}:\n{}",
        out.display(),
        String::from_utf8_lossy(&output.stderr)
    );
}
