use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::process::Command;

/// `arbor-core` feature sets that must build without std.
const NO_STD_FEATURES: &[&str] = &["", "debug-log", "diagram", "debug-log,diagram"];

const EMBEDDED_TARGETS: &[&str] = &["thumbv7m-none-eabi", "riscv32imac-unknown-none-elf"];

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Automation tasks for arbor")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run CI checks for a specific target
    Ci {
        /// Target triple to build for
        #[arg(long, default_value = "x86_64-unknown-linux-gnu")]
        target: String,
    },
    /// Run every test suite in the workspace
    Test,
    /// Run benchmarks in smoke mode
    Bench {
        /// Only make sure the benchmarks compile
        #[arg(long)]
        smoke: bool,
    },
    /// Check arbor-core with each no_std feature set on the host
    Features,
    /// Check all targets
    CheckAll,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ci { target } => run_ci(&target),
        Commands::Test => run_tests(),
        Commands::Bench { smoke } => run_benchmarks(smoke),
        Commands::Features => check_feature_matrix(None),
        Commands::CheckAll => check_all_targets(),
    }
}

fn run_ci(target: &str) -> Result<()> {
    println!("Running CI for target: {target}");

    if EMBEDDED_TARGETS.contains(&target) {
        // the engine is the only crate that has to build without std
        check_feature_matrix(Some(target))?;
        println!("✓ Embedded target {target} builds arbor-core");
    } else {
        run_command(&["cargo", "check", "--workspace", "--all-targets"])?;
        run_tests()?;
        run_command(&["cargo", "check", "-p", "arbor-bench", "--benches"])?;
        println!("✓ Host target {target} passes all checks");
    }

    Ok(())
}

fn run_tests() -> Result<()> {
    println!("Running all tests...");
    run_command(&["cargo", "test", "-p", "arbor-core", "--features", "std,diagram"])?;
    run_command(&["cargo", "test", "-p", "arbor-tests"])?;
    run_command(&["cargo", "test", "-p", "arbor", "--features", "cli"])?;
    println!("✓ All tests passed");
    Ok(())
}

fn run_benchmarks(smoke: bool) -> Result<()> {
    if smoke {
        println!("Running benchmarks in smoke mode...");
        run_command(&["cargo", "check", "-p", "arbor-bench", "--benches"])?;
        println!("✓ Benchmarks compile successfully");
    } else {
        println!("Running full benchmarks...");
        run_command(&["cargo", "bench", "-p", "arbor-bench"])?;
        println!("✓ Benchmarks completed");
    }
    Ok(())
}

fn check_feature_matrix(target: Option<&str>) -> Result<()> {
    for &features in NO_STD_FEATURES {
        let mut args = vec!["cargo", "check", "-p", "arbor-core", "--no-default-features"];
        if !features.is_empty() {
            args.extend(["--features", features]);
        }
        if let Some(target) = target {
            args.extend(["--target", target]);
        }
        run_command(&args)?;
        println!("✓ arbor-core [{features}]");
    }
    Ok(())
}

fn check_all_targets() -> Result<()> {
    let host = "x86_64-unknown-linux-gnu";
    for target in std::iter::once(&host).chain(EMBEDDED_TARGETS) {
        println!("Checking target: {target}");
        run_ci(target)?;
    }

    println!("✓ All targets check successfully");
    Ok(())
}

fn run_command(args: &[&str]) -> Result<()> {
    let (program, rest) = args.split_first().context("empty command")?;
    let output = Command::new(program)
        .args(rest)
        .output()
        .with_context(|| format!("spawning {program}"))?;

    if !output.status.success() {
        anyhow::bail!(
            "Command failed: {}\nstdout: {}\nstderr: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }

    Ok(())
}
