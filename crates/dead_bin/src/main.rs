use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dead_finder::{
    scan, CancelToken, NoProgress, ProgressEvent, ScanConfig, ScanJSONConfig, ScanResult,
};
use logger::{Logger, NullLogger, StdioLogger};

#[derive(Parser, Debug)]
#[command(name = "dead-finder", about = "Find files no entry point can reach")]
struct CliArgs {
    /// Project root to scan
    #[arg(default_value = ".")]
    path: PathBuf,
    /// Optional JSON config file (skip globs, workers, knowledge dir)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Emit the raw scan result as JSON instead of the report
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Parser worker threads; 0 = auto
    #[arg(short, long, default_value_t = 0)]
    workers: usize,
    /// Knowledge directory overlaid over the embedded rule pools
    #[arg(short, long)]
    knowledge: Option<PathBuf>,
    /// Suppress progress output
    #[arg(short, long, default_value_t = false)]
    quiet: bool,
}

fn load_config(args: &CliArgs) -> Result<ScanConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            let proxy: ScanJSONConfig = serde_json::from_str(&raw)
                .with_context(|| format!("parsing config {}", path.display()))?;
            ScanConfig::try_from(proxy)?
        }
        None => ScanConfig::default(),
    };
    if args.workers > 0 {
        config.workers = args.workers;
    }
    if let Some(dir) = &args.knowledge {
        config.knowledge_dir = Some(dir.display().to_string());
    }
    Ok(config)
}

fn run_scan(args: &CliArgs, config: &ScanConfig) -> Result<ScanResult> {
    let cancel = CancelToken::new();
    let result = if args.quiet {
        scan(&args.path, config, NullLogger, NoProgress, &cancel)?
    } else {
        let stdio = StdioLogger::new();
        let progress_logger = StdioLogger::new();
        let on_progress = move |event: ProgressEvent| {
            let logger = &progress_logger;
            match (event.current, event.total, event.files_found) {
                (Some(current), Some(total), _) => {
                    logger.log(format!("{:?}: {current}/{total}", event.phase))
                }
                (_, _, Some(found)) => logger.log(format!("{:?}: {found} files", event.phase)),
                _ => logger.log(format!("{:?}", event.phase)),
            }
        };
        scan(&args.path, config, &stdio, on_progress, &cancel)?
    };
    Ok(result)
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    let config = load_config(&args)?;

    let start = std::time::Instant::now();
    let result = run_scan(&args, &config)?;
    let elapsed = start.elapsed();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{result}");
        eprintln!("scanned in {}ms", elapsed.as_millis());
    }

    // CI-friendly: a non-empty dead list fails the build
    if !result.dead_files.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}
