use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use pr_hub::config::Config;
use pr_hub::github::{FetchError, RankedPullRequest};
use pr_hub::output::OutputFormat;
use pr_hub::scoring::{Clock, FixedClock, SystemClock};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_AUTH: i32 = 1;
const EXIT_NETWORK: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Args, Debug, Default)]
struct IdentityArgs {
    /// Treat reviews by this login as yours (defaults to the token owner)
    #[arg(long)]
    login: Option<String>,

    /// Search review requests for this user instead of yourself
    #[arg(long)]
    reviewer: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List PRs awaiting your review, most urgent first (default if no subcommand)
    List {
        #[command(flatten)]
        identity: IdentityArgs,

        /// Output format (defaults to config, then table)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Rank PRs from a JSON file (or stdin) without contacting GitHub
    Rank {
        /// Path to a JSON file, or "-" for stdin
        #[arg(short, long, default_value = "-")]
        input: String,

        /// Treat reviews by this login as yours
        #[arg(long)]
        login: Option<String>,

        /// Score as of this RFC 3339 instant instead of the current time
        #[arg(long)]
        now: Option<DateTime<Utc>>,

        /// Output format (defaults to config, then table)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Open a PR in browser by its index number
    Open {
        /// Index number of the PR to open (1-based, as shown in list)
        index: usize,

        #[command(flatten)]
        identity: IdentityArgs,
    },
}

#[derive(Parser, Debug)]
#[command(name = "pr-hub")]
#[command(about = "Rank the pull requests waiting on your review", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/pr-hub/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "pr_hub=debug" } else { "pr_hub=warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let command = cli.command.unwrap_or(Commands::List {
        identity: IdentityArgs::default(),
        format: None,
    });

    let config_path = cli.config.map(PathBuf::from);
    let config = match pr_hub::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = pr_hub::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }
    debug!(?config, "loaded config");

    let code = match command {
        Commands::List { identity, format } => {
            run_list(&config, identity, format, cli.verbose).await
        }
        Commands::Rank {
            input,
            login,
            now,
            format,
        } => run_rank(&config, &input, login, now, format, cli.verbose),
        Commands::Open { index, identity } => run_open(&config, identity, index).await,
    };

    std::process::exit(code);
}

fn effective_format(config: &Config, flag: Option<OutputFormat>) -> OutputFormat {
    flag.or(config.format).unwrap_or_default()
}

fn connect() -> Result<octocrab::Octocrab, i32> {
    let token = pr_hub::credentials::resolve_token().map_err(|e| {
        eprintln!("Credential error: {:#}", e);
        EXIT_AUTH
    })?;

    pr_hub::github::create_client(&token).map_err(|e| {
        eprintln!("Failed to create GitHub client: {:#}", e);
        EXIT_NETWORK
    })
}

fn fetch_failure_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<FetchError>() {
        Some(fetch) if fetch.is_auth() => EXIT_AUTH,
        _ => EXIT_NETWORK,
    }
}

async fn fetch_queue(
    config: &Config,
    identity: IdentityArgs,
) -> Result<pr_hub::fetch::ReviewQueue, i32> {
    let client = connect()?;
    let options =
        pr_hub::fetch::FetchOptions::from_config(config, identity.login, identity.reviewer);

    pr_hub::fetch::fetch_and_rank(&client, &options, &SystemClock)
        .await
        .map_err(|e| {
            eprintln!("Failed to fetch pull requests: {:#}", e);
            fetch_failure_code(&e)
        })
}

async fn run_list(
    config: &Config,
    identity: IdentityArgs,
    format: Option<OutputFormat>,
    verbose: bool,
) -> i32 {
    let start_time = Instant::now();

    let queue = match fetch_queue(config, identity).await {
        Ok(q) => q,
        Err(code) => return code,
    };
    info!(
        caller = %queue.caller_login,
        reviewer = %queue.reviewer,
        "review queue ready"
    );

    let code = print_ranked(&queue.prs, effective_format(config, format), queue.now, verbose);
    info!(total = queue.prs.len(), elapsed = ?start_time.elapsed(), "done");
    code
}

fn run_rank(
    config: &Config,
    input: &str,
    login: Option<String>,
    now: Option<DateTime<Utc>>,
    format: Option<OutputFormat>,
    verbose: bool,
) -> i32 {
    let parsed = if input == "-" {
        pr_hub::input::read_pull_requests(std::io::stdin().lock())
    } else {
        match File::open(input) {
            Ok(file) => pr_hub::input::read_pull_requests(file),
            Err(e) => {
                eprintln!("Failed to open {}: {}", input, e);
                return EXIT_CONFIG;
            }
        }
    };

    let prs = match parsed {
        Ok(prs) => prs,
        Err(e) => {
            eprintln!("Invalid input: {}", e);
            return EXIT_CONFIG;
        }
    };
    debug!(count = prs.len(), source = %input, "loaded pull requests");

    let login = login.or_else(|| config.login.clone());
    let clock = FixedClock(now.unwrap_or_else(|| SystemClock.now()));
    let ranked = pr_hub::scoring::rank_with_clock(&prs, login.as_deref(), &clock);

    print_ranked(&ranked, effective_format(config, format), clock.now(), verbose)
}

async fn run_open(config: &Config, identity: IdentityArgs, index: usize) -> i32 {
    let queue = match fetch_queue(config, identity).await {
        Ok(q) => q,
        Err(code) => return code,
    };

    let selected = match pr_hub::browser::select_by_index(&queue.prs, index) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e);
            return EXIT_CONFIG;
        }
    };

    if let Err(e) = pr_hub::browser::open_pr(selected) {
        eprintln!("Failed to open browser: {:#}", e);
        return EXIT_NETWORK;
    }

    println!(
        "Opening {} ({}) in browser: {}",
        selected.pr.short_ref(),
        selected.reason,
        selected.pr.url
    );
    EXIT_SUCCESS
}

fn print_ranked(
    prs: &[RankedPullRequest],
    format: OutputFormat,
    now: DateTime<Utc>,
    verbose: bool,
) -> i32 {
    match format {
        OutputFormat::Table => {
            let use_colors = pr_hub::output::should_use_colors();
            if verbose && !prs.is_empty() {
                for ranked in prs {
                    println!(
                        "{}",
                        pr_hub::output::format_pr_detail(ranked, now, use_colors)
                    );
                    println!();
                }
            } else {
                println!("{}", pr_hub::output::format_ranked_table(prs, use_colors));
            }
        }
        OutputFormat::Tsv => {
            if !prs.is_empty() {
                println!("{}", pr_hub::output::format_tsv(prs));
            }
        }
        OutputFormat::Json => match pr_hub::output::format_json(prs) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize output: {}", e);
                return EXIT_CONFIG;
            }
        },
    }
    EXIT_SUCCESS
}
