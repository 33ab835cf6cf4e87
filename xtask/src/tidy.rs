use std::path::{Path, PathBuf};

use xshell::{cmd, Shell};

fn project_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).ancestors().nth(1).unwrap().to_path_buf()
}

#[test]
fn formatting() {
    let sh = Shell::new().unwrap();
    sh.change_dir(project_root());
    cmd!(sh, "cargo fmt --all -- --check").run().unwrap();
}

/// The version lives in three places: both packages and the exact
/// requirement of `flagparse` on `flagparse-macros`.
#[test]
fn versions_agree() {
    let root = project_root();
    let sh = Shell::new().unwrap();
    let runtime = sh.read_file(root.join("Cargo.toml")).unwrap();
    let macros = sh.read_file(root.join("flagparse-macros/Cargo.toml")).unwrap();

    let version = package_version(&runtime);
    assert_eq!(package_version(&macros), version, "flagparse-macros/Cargo.toml");

    let dep = runtime
        .lines()
        .find(|it| it.starts_with("flagparse-macros"))
        .expect("no flagparse-macros dependency");
    assert!(dep.contains(&format!("\"={version}\"")), "stale flagparse-macros requirement: {dep}");
}

fn package_version(manifest: &str) -> &str {
    manifest
        .lines()
        .skip_while(|it| *it != "[package]")
        .find_map(|it| it.strip_prefix("version = "))
        .map(|it| it.split('"').nth(1).unwrap_or_default())
        .expect("no package version")
}
