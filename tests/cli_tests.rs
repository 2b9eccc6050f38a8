mod common;

use clap::Parser;
use common::fixtures::{fixture, fixture_dir};
use common::tree::{read_text, snapshot};
use contractapi::cli::{exit_code_for, run_cli, Cli};

fn cli(args: &[&str]) -> Cli {
    let mut argv = vec!["contractapi-gen"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

#[test]
fn test_new_writes_project_under_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let abi = fixture("Token.abi");
    let out = dir.path().to_str().unwrap();

    run_cli(cli(&[
        "new",
        "-n",
        "Token",
        "-p",
        "com.example.token",
        "--abi",
        abi.to_str().unwrap(),
        "--output-dir",
        out,
    ]))
    .unwrap();

    let project = dir.path().join("token");
    assert!(project.join("Cargo.toml").is_file());
    assert!(project
        .join("src/com/example/token/contracts/token.rs")
        .is_file());
    assert_eq!(read_text(&project, "resources/token.bin"), "0x6080604052\n");
}

#[test]
fn test_new_accepts_abi_directory() {
    let dir = tempfile::tempdir().unwrap();
    let abis = fixture_dir();

    run_cli(cli(&[
        "new",
        "-n",
        "Wallet",
        "--abi",
        abis.to_str().unwrap(),
        "--output-dir",
        dir.path().to_str().unwrap(),
        "--no-swagger",
    ]))
    .unwrap();

    let project = dir.path().join("wallet");
    let files = snapshot(&project);
    assert!(files.contains_key("src/com/wallet/contracts/greeter.rs"));
    assert!(files.contains_key("src/com/wallet/contracts/token.rs"));
    assert!(files.contains_key("resources/i_ownable.bin"));
    assert!(!files.contains_key("doc/openapi.yaml"));
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let abi = fixture("Token.abi");

    run_cli(cli(&[
        "new",
        "-n",
        "Token",
        "--abi",
        abi.to_str().unwrap(),
        "--output-dir",
        dir.path().to_str().unwrap(),
        "--dry-run",
        "--json",
    ]))
    .unwrap();

    assert!(!dir.path().join("token").exists());
}

#[test]
fn test_missing_binary_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let abi = dir.path().join("Lonely.abi");
    std::fs::copy(fixture("Token.abi"), &abi).unwrap();

    let err = run_cli(cli(&[
        "new",
        "-n",
        "Lonely",
        "--abi",
        abi.to_str().unwrap(),
        "--output-dir",
        dir.path().to_str().unwrap(),
    ]))
    .unwrap_err();

    assert_eq!(exit_code_for(&err), 2);
    assert!(!dir.path().join("lonely").exists());
}

#[test]
fn test_inspect_without_project_name_is_invalid() {
    let abi = fixture("Token.abi");
    let err = run_cli(cli(&["inspect", "--abi", abi.to_str().unwrap()])).unwrap_err();
    assert_eq!(exit_code_for(&err), 4);
}

#[test]
fn test_options_file_is_layered_under_flags() {
    let dir = tempfile::tempdir().unwrap();
    let options = dir.path().join("project.toml");
    std::fs::write(
        &options,
        "project_name = \"Token\"\ncontext_path = \"api/\"\naddress_length = 32\n",
    )
    .unwrap();
    let abi = fixture("Token.abi");

    run_cli(cli(&[
        "new",
        "--abi",
        abi.to_str().unwrap(),
        "--config",
        options.to_str().unwrap(),
        "--address-length",
        "20",
        "--output-dir",
        dir.path().to_str().unwrap(),
    ]))
    .unwrap();

    let project = dir.path().join("token");
    assert!(read_text(&project, "src/routes.rs").contains("\"/api/balanceOf\""));
    assert!(read_text(&project, "src/address.rs").contains("ADDRESS_LENGTH: usize = 20;"));
}
