//! urlmon CLI - URL content change monitoring

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use urlmon::state::DEFAULT_STATE_FILE;
use urlmon::{
    run_batch, validate_input, CheckResult, CheckTarget, ContentChecker, Fingerprinter,
    HttpChecker, Monitor, StateStore, TargetConfig,
};

/// Output format for check results
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    /// Key-value lines
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// urlmon - watch URLs for content changes
#[derive(Parser, Debug)]
#[command(name = "urlmon")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one fetch-and-hash check and print the result
    Check {
        /// URL to check
        url: String,

        /// Request headers as key:value pairs separated by |
        #[arg(long)]
        headers: Option<String>,

        /// Per-fetch timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Interval to report in the result, in seconds
        #[arg(long)]
        interval: Option<u64>,

        /// Output format
        #[arg(long, short, default_value = "text")]
        output: OutputFormat,
    },
    /// Validate a URL and header string without fetching
    Validate {
        /// URL to validate
        url: String,

        /// Request headers as key:value pairs separated by |
        #[arg(long)]
        headers: Option<String>,
    },
    /// Run a batch pass over url;key:value entry lines and report changes
    Batch {
        /// Entry file, one entry per line; reads stdin when omitted
        file: Option<PathBuf>,

        /// Previous-state file
        #[arg(long, default_value = DEFAULT_STATE_FILE)]
        state_file: PathBuf,
    },
    /// Watch configured targets periodically until interrupted
    Watch {
        /// JSON file holding an array of target configs
        #[arg(long)]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    init_logging();

    let cli = Cli::parse();
    match cli.command {
        Commands::Check {
            url,
            headers,
            timeout,
            interval,
            output,
        } => {
            run_check(&url, headers.as_deref(), timeout, interval, output).await;
        }
        Commands::Validate { url, headers } => {
            run_validate(&url, headers.as_deref());
        }
        Commands::Batch { file, state_file } => {
            run_batch_pass(file.as_deref(), &state_file).await;
        }
        Commands::Watch { config } => {
            run_watch(&config).await;
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Validate input and exit nonzero when invalid, printing one line per field
fn validated_or_exit(url: &str, headers: &str) {
    let errors = validate_input(url, headers);
    if !errors.is_empty() {
        for (field, code) in &errors {
            eprintln!("{field}: {code}");
        }
        std::process::exit(1);
    }
}

async fn run_check(
    url: &str,
    headers: Option<&str>,
    timeout: Option<u64>,
    interval: Option<u64>,
    output: OutputFormat,
) {
    validated_or_exit(url, headers.unwrap_or(""));

    let target = match CheckTarget::from_input(url, headers.unwrap_or(""), interval, timeout) {
        Ok(target) => target,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let result = HttpChecker::new().check(&target).await;
    print_result(&result, output);

    if !result.is_available() {
        std::process::exit(1);
    }
}

fn run_validate(url: &str, headers: Option<&str>) {
    validated_or_exit(url, headers.unwrap_or(""));
    println!("ok");
}

async fn run_batch_pass(file: Option<&std::path::Path>, state_file: &std::path::Path) {
    let input = match file {
        Some(path) => std::fs::read_to_string(path).unwrap_or_else(|e| {
            eprintln!("Error reading {}: {e}", path.display());
            std::process::exit(1);
        }),
        None => {
            let mut buf = String::new();
            if let Err(e) = std::io::stdin().read_to_string(&mut buf) {
                eprintln!("Error reading stdin: {e}");
                std::process::exit(1);
            }
            buf
        }
    };

    let entries = match urlmon::parse_batch_lines(&input) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let checker = HttpChecker::new().with_fingerprinter(Fingerprinter::full());
    let store = StateStore::new(state_file);
    match run_batch(&checker, &store, &entries).await {
        Ok(report) => println!("{}", report.report_line()),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

async fn run_watch(config: &std::path::Path) {
    let contents = std::fs::read_to_string(config).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {e}", config.display());
        std::process::exit(1);
    });
    let configs: Vec<TargetConfig> = serde_json::from_str(&contents).unwrap_or_else(|e| {
        eprintln!("Error parsing {}: {e}", config.display());
        std::process::exit(1);
    });

    let mut monitor = Monitor::new(Arc::new(HttpChecker::new()));
    for target_config in configs {
        let target = match target_config.build() {
            Ok(target) => target,
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        };
        if let Err(e) = monitor.add_target(target) {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }

    monitor.start();
    if tokio::signal::ctrl_c().await.is_err() {
        eprintln!("Error: failed to listen for shutdown signal");
    }
    monitor.stop();
}

fn print_result(result: &CheckResult, output: OutputFormat) {
    match output {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(result).unwrap_or_else(|e| {
                eprintln!("Error serializing result: {e}");
                std::process::exit(1);
            });
            println!("{json}");
        }
        OutputFormat::Text => {
            println!("state: {}", result.state);
            println!("status_code: {}", result.status_code);
            println!("content_length: {}", result.content_length);
            println!("timeout: {}", result.timeout);
            println!("interval: {}", result.interval);
            if !result.error.is_empty() {
                println!("error: {}", result.error);
            }
            if !result.extract.is_empty() {
                println!("extract: {}", result.extract);
            }
        }
    }
}
