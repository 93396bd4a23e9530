use anyhow::Result;
use clap::{Args, Subcommand};
use xshell::{Shell, cmd};

/// Robots exercised by `cargo xtask demo`: shoulder, forearm, base radius,
/// effector radius, base to floor, steps per revolution.
const DEMO_ROBOTS: [[&str; 6]; 2] = [
    ["200", "530", "142", "46", "700", "8192"],
    ["130", "400", "63", "35", "500", "3200"],
];

#[derive(Subcommand)]
pub enum Command {
    /// Run fmt check, clippy and tests
    Ci,
    /// Run cargo clippy with warnings denied
    Clippy,
    /// Print calibrated envelopes for the demo robots
    Demo,
    /// Apply rustfmt to all files, or only check with --check
    Fmt(Fmt),
    /// Run tests
    Test(Test),
}

#[derive(Args)]
pub struct Fmt {
    /// Fail instead of rewriting files
    #[arg(long)]
    check: bool,
}

#[derive(Args, Default)]
pub struct Test {
    /// Additional arguments to pass to cargo test
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

impl Command {
    pub fn run(self, sh: &Shell) -> Result<()> {
        match self {
            Command::Ci => {
                Fmt { check: true }.run(sh)?;
                run_clippy(sh)?;
                Test::default().run(sh)?;
                eprintln!("CI checks passed!");
                Ok(())
            }
            Command::Clippy => run_clippy(sh),
            Command::Demo => run_demo(sh),
            Command::Fmt(cmd) => cmd.run(sh),
            Command::Test(cmd) => cmd.run(sh),
        }
    }
}

impl Fmt {
    fn run(&self, sh: &Shell) -> Result<()> {
        if self.check {
            eprintln!("Running cargo fmt check...");
            cmd!(sh, "cargo fmt --all -- --check").run()?;
        } else {
            eprintln!("Applying cargo fmt...");
            cmd!(sh, "cargo fmt --all").run()?;
        }
        Ok(())
    }
}

impl Test {
    fn run(&self, sh: &Shell) -> Result<()> {
        eprintln!("Running cargo test...");
        let args = &self.args;
        cmd!(sh, "cargo test --workspace {args...}").run()?;
        Ok(())
    }
}

fn run_clippy(sh: &Shell) -> Result<()> {
    eprintln!("Running cargo clippy...");
    cmd!(
        sh,
        "cargo clippy --all-features --all-targets --workspace -- -D warnings"
    )
    .run()?;
    Ok(())
}

fn run_demo(sh: &Shell) -> Result<()> {
    for [shoulder, forearm, base, effector, floor, steps] in DEMO_ROBOTS {
        cmd!(
            sh,
            "cargo run --quiet -p tripod -- envelope --shoulder {shoulder} --forearm {forearm} --base-radius {base} --effector-radius {effector} --base-to-floor {floor} --steps-per-rev {steps}"
        )
        .run()?;
        println!();
    }
    Ok(())
}
