use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Output;
use tempfile::TempDir;

/// Run a git command and assert it succeeds. On failure, print stdout/stderr for diagnostics.
pub fn git_ok(dir: &Path, args: &[&str]) {
    git_ok_out(dir, args);
}

/// Like git_ok, but returns the Output for callers that need stdout/stderr.
pub fn git_ok_out(dir: &Path, args: &[&str]) -> Output {
    let out = std::process::Command::new("git")
        .current_dir(dir)
        .args(["-c", "user.name=Test", "-c", "user.email=test@example.com"])
        .args(args)
        .output()
        .expect("failed to spawn git");
    assert!(
        out.status.success(),
        "git {:?} in {} failed (status: {}):\nstdout:\n{}\nstderr:\n{}",
        args,
        dir.display(),
        out.status,
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr),
    );
    out
}

/// Convenience: return stdout (trimmed) from a successful git invocation.
pub fn git_stdout(dir: &Path, args: &[&str]) -> String {
    let out = git_ok_out(dir, args);
    String::from_utf8_lossy(&out.stdout).trim().to_string()
}

pub fn git_available() -> bool {
    std::process::Command::new("git")
        .arg("--version")
        .output()
        .is_ok_and(|o| o.status.success())
}

/// Isolated home, central root and project at `<tmp>/code/domains/acme/app`.
pub struct Env {
    pub temp: TempDir,
    pub project: PathBuf,
}

impl Env {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let project = temp.path().join("code/domains/acme/app");
        fs::create_dir_all(&project).unwrap();
        fs::write(project.join(".membank-root"), "").unwrap();
        Self { temp, project }
    }

    pub fn central(&self) -> PathBuf {
        self.temp.path().join("central")
    }

    pub fn central_bank(&self, branch: &str) -> PathBuf {
        self.central().join("acme").join("app").join(branch)
    }

    pub fn config_path(&self) -> PathBuf {
        self.temp.path().join("config.json")
    }

    /// `membank` run from the project with every location pointed into the temp dir.
    pub fn cmd(&self) -> Command {
        let home = self.temp.path();
        let mut cmd = cargo_bin_cmd!("membank");
        cmd.current_dir(&self.project)
            .env("HOME", home)
            .env("XDG_CONFIG_HOME", home.join(".config"))
            .env("GIT_CONFIG_NOSYSTEM", "1")
            .env("NO_COLOR", "1")
            .env("CLICOLOR", "0")
            .env("MEMBANK_CONFIG", self.config_path())
            .env("MEMBANK_CENTRAL_ROOT", self.central())
            .env("MEMBANK_DOMAINS_ROOT", home.join("code/domains"))
            .env("MEMBANK_LEGACY_ROOT", home.join("code"))
            .env("MEMBANK_HOOKS_DIR", home.join("hooks"))
            .env("MEMBANK_GLOBAL_GITIGNORE", home.join("gitignore_global"))
            .env_remove("RUST_LOG");
        cmd
    }
}
