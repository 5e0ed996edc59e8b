//! Provides workflows in the [cargo-xtask][cargo-xtask] pattern.
//!
//! [cargo-xtask]: https://github.com/matklad/cargo-xtask

use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};
use xshell::{cmd, Shell};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Runs the checks done in continuous integration.
    Ci {
        /// Only run this step
        #[arg(long, value_parser = parse_step)]
        step: Option<Step>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "kebab-case")]
enum Step {
    Fmt,
    Clippy,
    Test,
    TestAlloc,
    Doc,
}

fn parse_step(s: &str) -> Result<Step, String> {
    Step::iter()
        .find(|step| step.to_string() == s)
        .ok_or_else(|| {
            let names = Step::iter().map(|s| s.to_string()).collect::<Vec<_>>();
            format!("unknown step `{s}`, expected one of: {}", names.join(", "))
        })
}

impl Step {
    fn run(self, sh: &Shell) -> anyhow::Result<()> {
        match self {
            Step::Fmt => cmd!(sh, "cargo fmt --all -- --check").run()?,
            Step::Clippy => cmd!(sh, "cargo clippy --workspace --all-targets -- -D warnings").run()?,
            Step::Test => cmd!(sh, "cargo test --workspace").run()?,
            Step::TestAlloc => cmd!(
                sh,
                "cargo test -p cbor-tree --no-default-features --features alloc"
            )
            .run()?,
            Step::Doc => {
                let _env = sh.push_env("RUSTDOCFLAGS", "-D warnings");
                cmd!(sh, "cargo doc --workspace --no-deps").run()?;
            }
        }
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let sh = Shell::new()?;
    sh.change_dir(project_root()?);

    match args.command {
        Commands::Ci { step: Some(step) } => step.run(&sh),
        Commands::Ci { step: None } => {
            for step in Step::iter() {
                eprintln!("==> {step}");
                step.run(&sh).with_context(|| format!("ci step `{step}` failed"))?;
            }
            Ok(())
        }
    }
}

/// Returns the project root directory.
fn project_root() -> anyhow::Result<PathBuf> {
    let dir =
        env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| env!("CARGO_MANIFEST_DIR").to_owned());
    Path::new(&dir)
        .parent()
        .map(Path::to_path_buf)
        .context("xtask manifest directory has no parent")
}
