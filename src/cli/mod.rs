//! # CLI Module
//!
//! Command-line interface of the `contractapi-gen` binary.
//!
//! ## Commands
//!
//! ### `new`
//!
//! Generate a complete API project from contract ABIs and bytecode:
//!
//! ```bash
//! contractapi-gen new --project-name Token --abi build/Token.abi --bin build/Token.bin
//! ```
//!
//! Options:
//! - `--project-name, -n <NAME>` - Project name; default context path and crate name
//! - `--package-name, -p <PKG>` - Dotted namespace of the generated sources
//! - `--abi, -a <PATH>...` - ABI files or directories (required)
//! - `--bin, -b <PATH>...` - Bytecode files or directories (default: next to each ABI)
//! - `--output-dir, -o <DIR>` - Parent directory of the project folder (default: `.`)
//! - `--context-path <PATH>` - Route prefix (default: project name)
//! - `--address-length <BYTES>` - Address width (default: 20)
//! - `--no-swagger` - Skip `doc/openapi.yaml`
//! - `--config <FILE>` - Project options in TOML
//! - `--dependencies-config <FILE>` - Extra crates for the generated `Cargo.toml`
//! - `--dry-run` - Report what would change without writing
//! - `--format` - Run `cargo fmt` on the result
//! - `--json` - Print the report as JSON
//!
//! ### `inspect`
//!
//! Load and model the contracts, then print every route and handler:
//!
//! ```bash
//! contractapi-gen inspect --project-name Token --abi build/
//! ```
//!
//! ## Exit codes
//!
//! | Code | Failure |
//! |------|---------|
//! | 0 | success |
//! | 1 | other (I/O on option files, template rendering) |
//! | 2 | missing artifact |
//! | 3 | malformed artifact |
//! | 4 | invalid configuration |
//! | 5 | path collision |
//! | 6 | partial write |

mod commands;


pub use commands::{exit_code_for, run_cli, Cli, Commands, ProjectArgs};
