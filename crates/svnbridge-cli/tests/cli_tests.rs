//! CLI integration tests for svnbridge.
//!
//! Remote commands run against a shell script standing in for `svn`.

use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const ROOT: &str = "https://svn.example.com/repo";

/// Get the svnbridge binary command, isolated from the user's configuration.
fn svnbridge(home: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin!("svnbridge"));
    cmd.env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_CACHE_HOME", home.join("cache"))
        .env("HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    for var in [
        "SVNBRIDGE_REPOSITORY_URL",
        "SVNBRIDGE_USERNAME",
        "SVNBRIDGE_PASSWORD",
        "SVNBRIDGE_SVN_EXE",
        "SVNBRIDGE_WORKSPACE_ROOT",
        "SVNBRIDGE_ADDITIONAL_ARGUMENTS",
        "SVNBRIDGE_REPOSITORIES",
        "SVNBRIDGE_BRANCH",
        "SVNBRIDGE_TAG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

// ========== Help and Version Tests ==========

#[test]
fn test_help_output() {
    let home = TempDir::new().unwrap();
    svnbridge(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Subversion"))
        .stdout(predicate::str::contains("checkout"))
        .stdout(predicate::str::contains("get-latest"))
        .stdout(predicate::str::contains("validate-connection"));
}

#[test]
fn test_version_output() {
    let home = TempDir::new().unwrap();
    svnbridge(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("svnbridge"));
}

#[test]
fn test_invalid_command() {
    let home = TempDir::new().unwrap();
    svnbridge(home.path())
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

// ========== Configuration Tests ==========

#[test]
fn test_missing_repository_url() {
    let home = TempDir::new().unwrap();
    svnbridge(home.path())
        .args(["-d"])
        .arg(home.path())
        .arg("revision")
        .assert()
        .failure()
        .stderr(predicate::str::contains("repository-url"));
}

#[test]
fn test_config_show_hides_password() {
    let home = TempDir::new().unwrap();
    std::fs::write(
        home.path().join("svnbridge.json"),
        r#"{"repository-url": "https://svn.example.com/repo", "username": "ci", "password": "s3cret-value"}"#,
    )
    .unwrap();

    svnbridge(home.path())
        .arg("-d")
        .arg(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://svn.example.com/repo"))
        .stdout(predicate::str::contains("(hidden)"))
        .stdout(predicate::str::contains("s3cret-value").not());
}

#[test]
fn test_config_validate_reports_errors() {
    let home = TempDir::new().unwrap();
    std::fs::write(
        home.path().join("svnbridge.json"),
        r#"{"repository-url": "https://svn.example.com", "repositories": [{"name": "a/b", "remote-path": "/x"}]}"#,
    )
    .unwrap();

    svnbridge(home.path())
        .arg("-d")
        .arg(home.path())
        .args(["config", "validate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot contain '/'"));
}

#[test]
fn test_invalid_json_config() {
    let home = TempDir::new().unwrap();
    std::fs::write(home.path().join("svnbridge.json"), "{ invalid json }").unwrap();

    svnbridge(home.path())
        .arg("-d")
        .arg(home.path())
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid JSON"));
}

#[test]
fn test_environment_overrides_file() {
    let home = TempDir::new().unwrap();
    std::fs::write(
        home.path().join("svnbridge.json"),
        r#"{"repository-url": "https://file.example.com/repo"}"#,
    )
    .unwrap();

    svnbridge(home.path())
        .env("SVNBRIDGE_REPOSITORY_URL", "https://env.example.com/repo")
        .arg("-d")
        .arg(home.path())
        .args(["--format", "json", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://env.example.com/repo"))
        .stdout(predicate::str::contains("file.example.com").not());
}

// ========== Fake Client Tests ==========

#[cfg(unix)]
mod fake_client {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    /// A scripted `svn` that logs its argv and answers a handful of commands.
    struct FakeSvn {
        home: TempDir,
    }

    impl FakeSvn {
        fn new() -> Self {
            let home = TempDir::new().unwrap();
            let log = home.path().join("argv.log");
            let script = format!(
                r#"#!/bin/sh
printf '%s\n' "$@" >> '{log}'
echo "--" >> '{log}'
case "$1" in
  ls)
    if [ "$2" = "--xml" ]; then
      cat <<'XML'
<?xml version="1.0" encoding="UTF-8"?>
<lists>
<list path="{ROOT}">
<entry kind="dir"><name>trunk</name><commit revision="42"><author>alice</author><date>2024-03-01T10:00:00.000000Z</date></commit></entry>
<entry kind="dir"><name>tags</name><commit revision="30"><author>bob</author><date>2024-02-01T10:00:00.000000Z</date></commit></entry>
</list>
<list path="{ROOT}/branches">
<entry kind="dir"><name>rel-1</name><commit revision="40"><date>2024-02-20T10:00:00.000000Z</date></commit></entry>
</list>
</lists>
XML
    else
      echo "src/"
      echo "README.txt"
    fi
    ;;
  info)
    case "$3" in
      *://*)
        echo '<?xml version="1.0" encoding="UTF-8"?>'
        echo "<info><entry kind=\"dir\" path=\"repo\" revision=\"45\"><url>$3</url><commit revision=\"42\"><author>alice</author></commit></entry></info>"
        ;;
      *)
        if [ -f "$3/.fake-wc" ]; then
          echo '<?xml version="1.0" encoding="UTF-8"?>'
          echo "<info><entry kind=\"dir\" path=\".\" revision=\"42\"><url>$(cat "$3/.fake-wc")</url></entry></info>"
        else
          echo "svn: warning: W155007: '$3' is not a working copy" >&2
          exit 1
        fi
        ;;
    esac
    ;;
  checkout)
    mkdir -p "$3"
    printf '%s' "$2" > "$3/.fake-wc"
    echo "Checked out revision 42."
    ;;
  update)
    echo "At revision 42."
    ;;
  export)
    mkdir -p "$3"
    echo "exported" > "$3/README.txt"
    echo "Export complete."
    ;;
  help)
    echo "$2: usage line"
    ;;
  delete)
    echo "svn: E160013: path not found" >&2
    exit 1
    ;;
  *)
    echo "svn: E205000: unknown command" >&2
    exit 3
    ;;
esac
exit 0
"#,
                log = log.display()
            );
            let exe = home.path().join("svn");
            std::fs::write(&exe, script).unwrap();
            std::fs::set_permissions(&exe, std::fs::Permissions::from_mode(0o755)).unwrap();
            Self { home }
        }

        fn path(&self) -> &Path {
            self.home.path()
        }

        fn workspace_root(&self) -> PathBuf {
            self.home.path().join("workspaces")
        }

        fn logged(&self) -> String {
            std::fs::read_to_string(self.home.path().join("argv.log")).unwrap_or_default()
        }

        fn command(&self) -> Command {
            let mut cmd = svnbridge(self.path());
            cmd.arg("-d")
                .arg(self.path())
                .arg("--svn-exe")
                .arg(self.path().join("svn"))
                .arg("--repository-url")
                .arg(ROOT)
                .arg("--workspace-root")
                .arg(self.workspace_root());
            cmd
        }
    }

    #[test]
    fn test_ls_lists_entries() {
        let fake = FakeSvn::new();
        fake.command()
            .args(["ls", "trunk"])
            .assert()
            .success()
            .stdout(predicate::str::contains("src/"))
            .stdout(predicate::str::contains("trunk/README.txt"));
        assert!(fake.logged().contains("https://svn.example.com/repo/trunk"));
    }

    #[test]
    fn test_ls_json() {
        let fake = FakeSvn::new();
        fake.command()
            .args(["--format", "json", "ls", "trunk", "--dirs-only"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"kind\": \"directory\""))
            .stdout(predicate::str::contains("README.txt").not());
    }

    #[test]
    fn test_revision_prints_commit_revision() {
        let fake = FakeSvn::new();
        fake.command()
            .arg("revision")
            .assert()
            .success()
            .stdout(predicate::str::diff("42\n"));
    }

    #[test]
    fn test_branches_table() {
        let fake = FakeSvn::new();
        fake.command()
            .arg("branches")
            .assert()
            .success()
            .stdout(predicate::str::contains("trunk"))
            .stdout(predicate::str::contains("branches/rel-1"))
            .stdout(predicate::str::contains("tags").not());
    }

    #[test]
    fn test_changes_detects_new_commits() {
        let fake = FakeSvn::new();
        let snapshot = fake.path().join("snapshot.json");
        std::fs::write(&snapshot, r#"{"trunk": "41", "branches/rel-1": "40"}"#).unwrap();

        fake.command()
            .arg("changes")
            .arg("--snapshot")
            .arg(&snapshot)
            .assert()
            .success()
            .stdout(predicate::str::contains("trunk r42"))
            .stdout(predicate::str::contains("rel-1").not());

        fake.command()
            .arg("changes")
            .arg("--snapshot")
            .arg(&snapshot)
            .assert()
            .success()
            .stdout(predicate::str::contains("no new commits"));
    }

    #[test]
    fn test_get_latest_checks_out_then_updates() {
        let fake = FakeSvn::new();
        let dest = fake.path().join("out");

        fake.command()
            .arg("get-latest")
            .arg("trunk")
            .arg(&dest)
            .assert()
            .success()
            .stdout(predicate::str::contains("checked out"));
        assert!(dest.join("README.txt").exists());
        assert!(fake.workspace_root().join("default").join(".fake-wc").exists());

        fake.command()
            .arg("get-latest")
            .arg("trunk")
            .arg(&dest)
            .assert()
            .success()
            .stdout(predicate::str::contains("updated"));
    }

    #[test]
    fn test_delete_failure_surfaces_client_error() {
        let fake = FakeSvn::new();
        fake.command()
            .args(["delete", "trunk/gone.txt", "-m", "remove"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("E160013"));
    }

    #[test]
    fn test_copy_requires_message_text() {
        let fake = FakeSvn::new();
        fake.command()
            .args(["copy", "trunk", "branches/new", "-m", "  "])
            .assert()
            .failure()
            .stderr(predicate::str::contains("message"));
        assert!(!fake.logged().contains("copy"));
    }

    #[test]
    fn test_password_never_printed() {
        let fake = FakeSvn::new();
        fake.command()
            .env("SVNBRIDGE_USERNAME", "ci")
            .env("SVNBRIDGE_PASSWORD", "top-secret-pw")
            .args(["-vvv", "revision"])
            .assert()
            .success()
            .stdout(predicate::str::contains("top-secret-pw").not())
            .stderr(predicate::str::contains("top-secret-pw").not())
            .stderr(predicate::str::contains("(hidden)"));
        assert!(fake.logged().contains("top-secret-pw"));
    }

    #[test]
    fn test_exec_passes_through_exit_code() {
        let fake = FakeSvn::new();
        fake.command()
            .args(["exec", "propget", "svn:ignore"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("E205000"));
    }

    #[test]
    fn test_exec_dry_run_hides_password() {
        let fake = FakeSvn::new();
        fake.command()
            .env("SVNBRIDGE_USERNAME", "ci")
            .env("SVNBRIDGE_PASSWORD", "top-secret-pw")
            .args(["exec", "--dry-run", "log"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--password (hidden)"))
            .stdout(predicate::str::contains("top-secret-pw").not());
        assert!(fake.logged().is_empty());
    }

    #[test]
    fn test_svn_help() {
        let fake = FakeSvn::new();
        fake.command()
            .args(["svn-help", "commit"])
            .assert()
            .success()
            .stdout(predicate::str::contains("commit: usage line"));
    }

    #[test]
    fn test_validate_connection() {
        let fake = FakeSvn::new();
        fake.command()
            .arg("validate-connection")
            .assert()
            .success()
            .stdout(predicate::str::contains("connection ok"));
    }

    #[test]
    fn test_missing_client_executable() {
        let fake = FakeSvn::new();
        svnbridge(fake.path())
            .arg("-d")
            .arg(fake.path())
            .args(["--svn-exe", "/nonexistent/svn", "--repository-url", ROOT])
            .arg("revision")
            .assert()
            .failure()
            .stderr(predicate::str::contains("svn client not found"));
    }
}
