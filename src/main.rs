use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use minus::Pager;
use perf_bisect::ReportFormat;
use perf_bisect::areas::repository::Repository;
use perf_bisect::artifacts::bisect::config::DEFAULT_TIMEOUT_SECS;
use perf_bisect::artifacts::core::{PagerWriter, should_page};
use perf_bisect::artifacts::report::graph::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use perf_bisect::artifacts::report::reporter::Reporter;
use perf_bisect::commands::graph::GraphOptions;
use perf_bisect::commands::run::RunOptions;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Parser)]
#[command(
    name = "perf-bisect",
    version,
    author = "Sami Barbut-Dica",
    about = "Find performance regressions in git history using bisect",
    long_about = "Binary-searches a git revision range for the first commit whose benchmark \
    duration exceeds a threshold. The benchmark command is split with shell quoting rules \
    but never run through a shell.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[arg(short, long, global = true, help = "Enable verbose logging")]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "run",
        about = "Run bisect to find a performance regression",
        long_about = "This command checks out commits between the good and bad revisions, \
        runs the benchmark at each probed commit and reports the first commit whose duration \
        exceeds the threshold. The working tree is left at the bad revision afterwards."
    )]
    Run {
        #[arg(index = 1, help = "The benchmark command to run at each commit")]
        benchmark_cmd: String,
        #[arg(long, default_value = "HEAD~10", help = "Known good commit")]
        good: String,
        #[arg(long, default_value = "HEAD", help = "Known bad commit")]
        bad: String,
        #[arg(
            long,
            env = "PERF_BISECT_THRESHOLD",
            allow_negative_numbers = true,
            help = "Performance threshold in seconds"
        )]
        threshold: f64,
        #[arg(
            long,
            env = "PERF_BISECT_TIMEOUT",
            default_value_t = DEFAULT_TIMEOUT_SECS,
            help = "Benchmark timeout in seconds"
        )]
        timeout: u64,
        #[arg(short, long, help = "Save results to file (JSON/CSV)")]
        output: Option<PathBuf>,
        #[arg(long, help = "Preview commits without running benchmarks")]
        dry_run: bool,
    },
    #[command(
        name = "report",
        about = "Display a report from saved results",
        long_about = "This command loads a JSON results file written by `run --output` and \
        prints its summary table, its duration graph, or both."
    )]
    Report {
        #[arg(index = 1, help = "The JSON results file")]
        results_file: PathBuf,
        #[arg(long, value_enum, default_value_t = ReportFormat::Both, help = "Sections to display")]
        format: ReportFormat,
    },
    #[command(
        name = "graph",
        about = "Generate an ASCII graph from saved results",
        long_about = "This command draws the measured durations of a JSON results file, \
        one column per probe in the order the probes ran."
    )]
    Graph {
        #[arg(index = 1, help = "The JSON results file")]
        results_file: PathBuf,
        #[arg(long, default_value_t = DEFAULT_HEIGHT, help = "Graph height in lines")]
        height: usize,
        #[arg(long, default_value_t = DEFAULT_WIDTH, help = "Graph width in characters")]
        width: usize,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(err) = execute(cli.command) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn execute(command: Commands) -> Result<()> {
    let pwd = std::env::current_dir()?;

    match command {
        Commands::Run {
            benchmark_cmd,
            good,
            bad,
            threshold,
            timeout,
            output,
            dry_run,
        } => {
            let cancelled = Arc::new(AtomicBool::new(false));
            let flag = cancelled.clone();
            ctrlc::set_handler(move || {
                log::warn!("Interrupted, stopping after the current probe");
                flag.store(true, Ordering::SeqCst);
            })
            .context("failed to install the Ctrl-C handler")?;

            let mut repository = Repository::new(&pwd.to_string_lossy())?;
            let reporter = Reporter::new(&pwd, Box::new(std::io::stdout()))?;
            let opts = RunOptions {
                benchmark_cmd,
                good,
                bad,
                threshold,
                timeout,
                output,
                dry_run,
            };

            repository.run_bisect(&opts, &reporter, cancelled)?
        }
        Commands::Report {
            results_file,
            format,
        } => with_paged_reporter(&pwd, |reporter| {
            reporter
                .show_report(&results_file, format)
                .with_context(|| format!("failed to load report {}", results_file.display()))
        })?,
        Commands::Graph {
            results_file,
            height,
            width,
        } => {
            let reporter = Reporter::new(&pwd, Box::new(std::io::stdout()))?;
            reporter
                .show_graph(&results_file, GraphOptions { height, width })
                .with_context(|| format!("failed to graph {}", results_file.display()))?
        }
    }

    Ok(())
}

/// Run `f` against a reporter that writes through the pager when stdout is a terminal
fn with_paged_reporter(
    pwd: &std::path::Path,
    f: impl FnOnce(&Reporter) -> Result<()>,
) -> Result<()> {
    if !should_page() {
        let reporter = Reporter::new(pwd, Box::new(std::io::stdout()))?;
        return f(&reporter);
    }

    let pager = Pager::new();
    let reporter = Reporter::new(pwd, Box::new(PagerWriter::new(pager.clone())))?;
    f(&reporter)?;
    minus::page_all(pager)?;

    Ok(())
}
