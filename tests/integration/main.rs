//! Integration tests for devshell

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use tempfile::TempDir;

    /// Run from an empty directory with no global config, so nothing on the
    /// host leaks into the result
    fn devshell(dir: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("devshell");
        cmd.current_dir(dir.path())
            .env("DEVSHELL_CONFIG", dir.path().join("no-such-config.toml"))
            .env_remove("DEVSHELL_SYSTEM");
        cmd
    }

    #[test]
    fn help_displays() {
        let temp = TempDir::new().unwrap();
        devshell(&temp)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("reproducible native development shells"));
    }

    #[test]
    fn version_displays() {
        let temp = TempDir::new().unwrap();
        devshell(&temp)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("devshell"));
    }

    #[test]
    fn env_prints_linux_script() {
        let temp = TempDir::new().unwrap();
        devshell(&temp)
            .args(["env", "--shell", "bash", "--system", "x86_64-linux"])
            .assert()
            .success()
            .stdout(predicate::str::contains("export LD_LIBRARY_PATH="))
            .stdout(predicate::str::contains("/store/libX11-1.8.9/lib"))
            .stdout(predicate::str::contains("export PATH='/store/pkg-config-0.29.2/bin"));
    }

    #[test]
    fn env_json_uses_dyld_on_darwin() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("devshell.toml"),
            "[dependencies]\nbuild = [\"pkg-config\"]\nruntime = [\"vulkan-loader\"]\n",
        )
        .unwrap();

        devshell(&temp)
            .args(["--system", "aarch64-darwin", "env", "--json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("DYLD_LIBRARY_PATH"))
            .stdout(predicate::str::contains("/store/moltenvk-1.2.9/lib"));
    }

    #[test]
    fn env_fails_on_missing_package() {
        let temp = TempDir::new().unwrap();
        devshell(&temp)
            .args(["--system", "aarch64-darwin", "env", "--shell", "sh"])
            .assert()
            .failure()
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("libX11"))
            .stderr(predicate::str::contains("aarch64-darwin"));
    }

    #[test]
    fn no_local_ignores_descriptor() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("devshell.toml"),
            "[dependencies]\nruntime = [\"ghost\"]\n",
        )
        .unwrap();

        devshell(&temp)
            .args(["--system", "x86_64-linux", "env", "--shell", "bash"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("ghost"));

        devshell(&temp)
            .args(["--no-local", "--system", "x86_64-linux", "env", "--shell", "bash"])
            .assert()
            .success();
    }

    #[test]
    fn check_passes_on_linux() {
        let temp = TempDir::new().unwrap();
        devshell(&temp)
            .args(["check", "--system", "x86_64-linux"])
            .assert()
            .success()
            .stdout(predicate::str::contains("All dependencies resolve"));
    }

    #[test]
    fn check_fails_on_darwin() {
        let temp = TempDir::new().unwrap();
        devshell(&temp)
            .args(["check", "--system", "aarch64-darwin"])
            .assert()
            .failure()
            .stdout(predicate::str::contains("libX11"));
    }

    #[test]
    fn show_json() {
        let temp = TempDir::new().unwrap();
        devshell(&temp)
            .args(["show", "--format", "json", "--system", "x86_64-linux"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"channel\": \"stable-24.05\""))
            .stdout(predicate::str::contains("rust-toolchain"));
    }

    #[test]
    fn overlays_lists_builtin() {
        let temp = TempDir::new().unwrap();
        devshell(&temp)
            .arg("overlays")
            .assert()
            .success()
            .stdout(predicate::str::contains("rust-toolchain"));
    }

    #[test]
    fn overlays_accepts_builtin_alias() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("devshell.toml"),
            "[shell]\noverlays = [\"rust\"]\n",
        )
        .unwrap();

        devshell(&temp)
            .args(["check", "--system", "x86_64-linux"])
            .assert()
            .success();

        devshell(&temp)
            .arg("overlays")
            .assert()
            .success()
            .stdout(predicate::str::contains("(enabled)"))
            .stdout(predicate::str::contains("was not found").not());
    }

    #[test]
    fn config_path() {
        let temp = TempDir::new().unwrap();
        devshell(&temp)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("no-such-config.toml"));
    }

    #[test]
    fn config_show() {
        let temp = TempDir::new().unwrap();
        devshell(&temp)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[channel]"));
    }

    #[test]
    fn init_creates_descriptor() {
        let temp = TempDir::new().unwrap();
        devshell(&temp)
            .args(["init", "--path"])
            .arg(temp.path())
            .assert()
            .success();
        assert!(temp.path().join("devshell.toml").exists());

        devshell(&temp)
            .args(["init", "--path"])
            .arg(temp.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("already exists"));
    }

    #[test]
    fn invalid_subcommand_fails() {
        let temp = TempDir::new().unwrap();
        devshell(&temp).arg("nonexistent").assert().failure();
    }
}
