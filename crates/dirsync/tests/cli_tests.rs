use std::fs;
use std::path::Path;

use assert_cmd::Command;
use filetime::{FileTime, set_file_mtime};
use predicates::prelude::*;
use tempfile::TempDir;

fn dirsync() -> Command {
    Command::cargo_bin("dirsync").unwrap()
}

fn write(dir: &Path, name: &str, content: &str, mtime: i64) {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    set_file_mtime(&path, FileTime::from_unix_time(mtime, 0)).unwrap();
}

#[test]
fn test_help_output() {
    dirsync()
        .arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::contains("Bidirectional directory synchronization"))
        .stdout(predicate::str::contains("--verbose"))
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("<DIR1>"));
}

#[test]
fn test_version_output() {
    dirsync()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_missing_directories_exit_one() {
    dirsync()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage"));

    let dir = TempDir::new().unwrap();
    dirsync().arg(dir.path()).assert().code(1);
}

#[test]
fn test_unopenable_directory_exits_one() {
    let dir = TempDir::new().unwrap();
    dirsync()
        .arg("--no-config")
        .arg(dir.path())
        .arg(dir.path().join("missing"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("dirsync -h"));
}

#[test]
fn test_regular_file_argument_exits_one() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "file", "x", 100);
    dirsync()
        .arg("--no-config")
        .arg(dir.path())
        .arg(dir.path().join("file"))
        .assert()
        .code(1);
}

#[test]
fn test_sync_is_silent_by_default() {
    let x = TempDir::new().unwrap();
    let y = TempDir::new().unwrap();
    write(x.path(), "a.txt", "hello", 100);
    write(y.path(), "b.txt", "world", 100);

    dirsync()
        .arg("--no-config")
        .arg(x.path())
        .arg(y.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_eq!(fs::read_to_string(y.path().join("a.txt")).unwrap(), "hello");
    assert_eq!(fs::read_to_string(x.path().join("b.txt")).unwrap(), "world");
}

#[test]
fn test_verbose_narrates_and_summarizes() {
    let x = TempDir::new().unwrap();
    let y = TempDir::new().unwrap();
    write(x.path(), "a.txt", "hello", 100);

    dirsync()
        .args(["--no-config", "-o"])
        .arg(x.path())
        .arg(y.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Copying"))
        .stdout(predicate::str::contains("=== Sync Summary ==="))
        .stdout(predicate::str::contains("Created:  1"));
}

#[test]
fn test_redirected_log_has_no_color_codes() {
    let x = TempDir::new().unwrap();
    let y = TempDir::new().unwrap();
    write(x.path(), "a.txt", "hello", 100);

    dirsync()
        .args(["--no-config", "-o"])
        .arg(x.path())
        .arg(y.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("INFO"))
        .stdout(predicate::str::contains("\u{1b}[").not());
}

#[test]
fn test_dry_run_writes_nothing() {
    let x = TempDir::new().unwrap();
    let y = TempDir::new().unwrap();
    write(x.path(), "a.txt", "hello", 100);

    dirsync()
        .args(["--no-config", "--dry-run"])
        .arg(x.path())
        .arg(y.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Would copy"))
        .stdout(predicate::str::contains("Created:  1"));

    assert!(!y.path().join("a.txt").exists());
}

#[test]
fn test_conflict_still_exits_zero() {
    let x = TempDir::new().unwrap();
    let y = TempDir::new().unwrap();
    write(x.path(), "f", "short", 100);
    write(y.path(), "f", "much longer", 100);

    dirsync()
        .args(["--no-config", "-o"])
        .arg(x.path())
        .arg(y.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Conflict"));

    assert_eq!(fs::read_to_string(x.path().join("f")).unwrap(), "short");
}

#[test]
fn test_ignore_flag() {
    let x = TempDir::new().unwrap();
    let y = TempDir::new().unwrap();
    write(x.path(), "keep.txt", "k", 100);
    write(x.path(), "skip.log", "s", 100);

    dirsync()
        .args(["--no-config", "--ignore", "*.log"])
        .arg(x.path())
        .arg(y.path())
        .assert()
        .success();

    assert!(y.path().join("keep.txt").exists());
    assert!(!y.path().join("skip.log").exists());
}

#[test]
fn test_config_file_is_applied() {
    let x = TempDir::new().unwrap();
    let y = TempDir::new().unwrap();
    let conf = TempDir::new().unwrap();
    write(x.path(), "keep.txt", "k", 100);
    write(x.path(), "skip.tmp", "s", 100);
    let config_path = conf.path().join("dirsync.toml");
    fs::write(&config_path, "ignore = [\"*.tmp\"]\n").unwrap();

    dirsync()
        .arg("--config")
        .arg(&config_path)
        .arg(x.path())
        .arg(y.path())
        .assert()
        .success();

    assert!(y.path().join("keep.txt").exists());
    assert!(!y.path().join("skip.tmp").exists());
}

#[test]
fn test_invalid_config_file_exits_one() {
    let x = TempDir::new().unwrap();
    let y = TempDir::new().unwrap();
    let conf = TempDir::new().unwrap();
    let config_path = conf.path().join("dirsync.toml");
    fs::write(&config_path, "buffer_size = 0\n").unwrap();

    dirsync()
        .arg("--config")
        .arg(&config_path)
        .arg(x.path())
        .arg(y.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("configuration"));
}

#[test]
fn test_ctrl_c_mid_copy_leaves_no_partial_file() {
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;
    use std::time::{Duration, Instant};

    let x = TempDir::new().unwrap();
    let y = TempDir::new().unwrap();
    fs::File::create(x.path().join("huge.bin"))
        .unwrap()
        .set_len(4 << 30)
        .unwrap();

    let mut child = std::process::Command::new(assert_cmd::cargo::cargo_bin("dirsync"))
        .arg("--no-config")
        .arg(x.path())
        .arg(y.path())
        .spawn()
        .unwrap();

    // Wait until the copy is under way
    let deadline = Instant::now() + Duration::from_secs(30);
    while fs::read_dir(y.path()).unwrap().next().is_none() {
        assert!(Instant::now() < deadline, "copy never started");
        std::thread::sleep(Duration::from_millis(5));
    }
    kill(Pid::from_raw(i32::try_from(child.id()).unwrap()), Signal::SIGINT).unwrap();

    let status = child.wait().unwrap();
    assert_eq!(status.code(), Some(130));
    assert_eq!(fs::read_dir(y.path()).unwrap().count(), 0);
}
