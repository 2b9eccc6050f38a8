//! Shared fixtures for generator unit tests.

use crate::artifact::{load_artifacts, ArtifactListing};
use crate::config::{ProjectConfiguration, ProjectOptions};
use crate::model::{build_project_model, ProjectModel};
use crate::naming::resolve;

pub(crate) const TOKEN_ABI: &str = include_str!("../../tests/fixtures/Token.abi");

pub(crate) fn token_config() -> ProjectConfiguration {
    resolve(&ProjectOptions {
        package_name: Some("com.example.token".to_string()),
        address_length: Some(20),
        generate_swagger: Some(true),
        ..ProjectOptions::new("Token")
    })
}

pub(crate) fn token_project() -> ProjectModel {
    let listing = ArtifactListing::default().with_contract("Token", TOKEN_ABI, "0x6080604052");
    let manifest = load_artifacts(&listing).unwrap();
    build_project_model(&manifest, &token_config()).unwrap()
}
