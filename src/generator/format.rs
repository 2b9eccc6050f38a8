use std::path::Path;
use std::process::Command;

use anyhow::Context;
use tracing::info;

/// Environment variable overriding the `cargo` binary used for formatting.
pub const CARGO_BIN_ENV: &str = "CONTRACTAPI_CARGO_BIN";

/// Run `cargo fmt` inside a generated project.
pub fn format_project(dir: &Path) -> anyhow::Result<()> {
    let cargo_bin = std::env::var(CARGO_BIN_ENV).unwrap_or_else(|_| "cargo".to_string());

    let status = Command::new(&cargo_bin)
        .arg("fmt")
        .current_dir(dir)
        .status()
        .with_context(|| format!("failed to run {cargo_bin} fmt in {}", dir.display()))?;
    if !status.success() {
        anyhow::bail!("cargo fmt failed in {} ({status})", dir.display());
    }
    info!(dir = %dir.display(), "formatted generated project");
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::env;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::sync::Mutex;

    // Serialize environment mutations to avoid test races
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn stub_cargo(dir: &Path, fmt_exit: i32) -> std::path::PathBuf {
        let stub = dir.join("cargo");
        fs::write(
            &stub,
            format!("#!/bin/sh\nif [ \"$1\" = \"fmt\" ]; then\n    exit {fmt_exit}\nfi\nexit 0\n"),
        )
        .unwrap();
        let mut perms = fs::metadata(&stub).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&stub, perms).unwrap();
        stub
    }

    fn with_cargo_bin<T>(stub: &Path, f: impl FnOnce() -> T) -> T {
        let _guard = ENV_LOCK.lock().unwrap();
        let old_bin = env::var(CARGO_BIN_ENV).ok();
        env::set_var(CARGO_BIN_ENV, stub);
        let res = f();
        match old_bin {
            Some(v) => env::set_var(CARGO_BIN_ENV, v),
            None => env::remove_var(CARGO_BIN_ENV),
        }
        res
    }

    #[test]
    fn test_format_project_succeeds_with_stub() {
        let dir = tempfile::tempdir().unwrap();
        let stub = stub_cargo(dir.path(), 0);
        assert!(with_cargo_bin(&stub, || format_project(dir.path())).is_ok());
    }

    #[test]
    fn test_format_project_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let stub = stub_cargo(dir.path(), 1);
        let err = with_cargo_bin(&stub, || format_project(dir.path())).unwrap_err();
        assert!(err.to_string().contains("cargo fmt failed"));
    }
}
