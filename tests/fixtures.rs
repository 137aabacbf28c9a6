use std::path::PathBuf;
use std::process::Command;
use std::sync::OnceLock;

static HELLO_BINARY: OnceLock<PathBuf> = OnceLock::new();
static BREAKPOINT_BINARY: OnceLock<PathBuf> = OnceLock::new();
static SIGNAL_BINARY: OnceLock<PathBuf> = OnceLock::new();
static WATCH_BINARY: OnceLock<PathBuf> = OnceLock::new();

fn build_fixture_bin(bin_name: &str) -> PathBuf {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let manifest = root.join("tests/fixtures/Cargo.toml");
    let target_dir = root.join("target/fixtures");

    let status = Command::new("cargo")
        .args([
            "build",
            "--manifest-path",
            manifest
                .to_str()
                .expect("fixture manifest path should be valid UTF-8"),
            "--bin",
            bin_name,
        ])
        .env("CARGO_TARGET_DIR", &target_dir)
        .status()
        .expect("failed to run cargo to build fixture");

    assert!(
        status.success(),
        "building inferior fixture {bin_name:?} failed: {status:?}"
    );

    target_dir.join("debug").join(bin_name)
}

pub fn hello_fixture_path() -> PathBuf {
    HELLO_BINARY
        .get_or_init(|| build_fixture_bin("jdb-inferior-fixtures"))
        .clone()
}

pub fn breakpoint_fixture_path() -> PathBuf {
    BREAKPOINT_BINARY
        .get_or_init(|| build_fixture_bin("breakpoint_target"))
        .clone()
}

pub fn signal_fixture_path() -> PathBuf {
    SIGNAL_BINARY
        .get_or_init(|| build_fixture_bin("signal_target"))
        .clone()
}

pub fn watch_fixture_path() -> PathBuf {
    WATCH_BINARY
        .get_or_init(|| build_fixture_bin("watch_target"))
        .clone()
}
