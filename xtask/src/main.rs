#[cfg(test)]
mod tidy;

use std::{
    thread,
    time::{Duration, Instant},
};

use xshell::{cmd, Shell};

/// Crates in publish order: the derive macro has to be on crates.io before
/// the runtime which depends on it.
const CRATES: [&str; 2] = ["flagparse-macros", "flagparse"];

fn main() -> xshell::Result<()> {
    let sh = Shell::new()?;

    cmd!(sh, "rustup toolchain install stable --no-self-update").run()?;
    let _e = sh.push_env("RUSTUP_TOOLCHAIN", "stable");
    cmd!(sh, "rustc --version").run()?;

    {
        let _s = section("BUILD");
        cmd!(sh, "cargo test --workspace --no-run").run()?;
        cmd!(sh, "cargo build --examples").run()?;
    }

    {
        let _s = section("TEST");
        cmd!(sh, "cargo test --workspace -- --nocapture").run()?;
    }

    {
        let _s = section("PUBLISH");
        publish(&sh)?;
    }

    Ok(())
}

fn publish(sh: &Shell) -> xshell::Result<()> {
    let version = version(sh)?;
    let tag = format!("v{version}");

    let current_branch = cmd!(sh, "git branch --show-current").read()?;
    let tag_exists = cmd!(sh, "git tag --list").read()?.split_ascii_whitespace().any(|it| it == tag);
    if current_branch != "master" || tag_exists {
        eprintln!("not publishing {tag} from `{current_branch}`");
        return Ok(());
    }

    cmd!(sh, "git tag {tag}").run()?;
    for krate in CRATES {
        cmd!(sh, "cargo publish -p {krate}").run()?;
        if krate != "flagparse" {
            wait_for_index(sh, krate, &version)?;
        }
    }
    cmd!(sh, "git push --tags").run()?;
    Ok(())
}

/// Version of the `flagparse` package, as cargo sees it.
fn version(sh: &Shell) -> xshell::Result<String> {
    let pkgid = cmd!(sh, "cargo pkgid -p flagparse").read()?;
    Ok(pkgid.rsplit(['#', '@']).next().unwrap_or_default().to_string())
}

fn wait_for_index(sh: &Shell, krate: &str, version: &str) -> xshell::Result<()> {
    for _ in 0..100 {
        thread::sleep(Duration::from_secs(3));
        let err_msg = cmd!(sh, "cargo install {krate} --version {version} --bin non-existing")
            .ignore_status()
            .read_stderr()?;

        let not_found = err_msg.contains("could not find ");
        let tried_installing = err_msg.contains("Installing");
        assert!(not_found ^ tried_installing);
        if tried_installing {
            break;
        }
    }
    Ok(())
}

fn section(name: &'static str) -> impl Drop {
    println!("::group::{name}");
    let start = Instant::now();
    defer(move || {
        let elapsed = start.elapsed();
        eprintln!("{name}: {elapsed:.2?}");
        println!("::endgroup::");
    })
}

fn defer<F: FnOnce()>(f: F) -> impl Drop {
    struct D<F: FnOnce()>(Option<F>);
    impl<F: FnOnce()> Drop for D<F> {
        fn drop(&mut self) {
            if let Some(f) = self.0.take() {
                f()
            }
        }
    }
    D(Some(f))
}
