use clap::{Parser, ValueEnum};
use console::{Term, set_colors_enabled, set_colors_enabled_stderr, style};
use std::fmt::Display;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process;
use tokio::signal;
use tracing_subscriber::util::SubscriberInitExt;

use stratumd::logging::{LogLevel, tracing_init};
use stratumd::{Listener, ServerConfig, StratumdError, fmt};

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "stratumd")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Minimal stratum-1 NTP responder serving the local system clock")]
#[command(long_about = Some(
    "Answer NTP client requests over UDP with stratum-1 timestamps taken from\n\
     the local system clock. Requests in any other mode are dropped.\n\
     \n\
     Examples:\n\
       stratumd\n\
       stratumd --listen 127.0.0.1:1123 --verbose\n\
       stratumd --config /etc/stratumd.toml --json"
))]
struct Args {
    /// Address to listen on: hostname, IP, [IPv6] or host:port (default 0.0.0.0)
    #[arg(short, long)]
    listen: Option<String>,

    /// UDP port, unless the listen address names one (default 123)
    #[arg(short, long)]
    port: Option<u16>,

    /// Use IPv6 resolution only
    #[arg(short = '6', long)]
    ipv6: bool,

    /// Resample the clock for the transmit timestamp right before sending
    #[arg(long)]
    resample_transmit: bool,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log verbosity
    #[arg(long, value_enum)]
    log_level: Option<LogLevel>,

    /// Log every request and response
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Shutdown summary format: text or json
    #[arg(short = 'f', long, default_value = "text", value_enum)]
    format: OutputFormat,

    /// Alias for JSON output
    #[arg(short = 'j', long)]
    json: bool,

    /// Pretty-print JSON
    #[arg(long)]
    pretty: bool,

    /// Disable colored output
    #[arg(long = "no-color", alias = "nocolor")]
    no_color: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn fail(term: &Term, msg: impl Display, code: i32) -> ! {
    term.write_line(&style(format!("Error: {msg}")).red().bold().to_string())
        .ok();
    process::exit(code);
}

/// Defaults, then the config file, then flags.
fn effective_config(args: &Args) -> Result<ServerConfig, StratumdError> {
    let mut cfg = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(listen) = &args.listen {
        cfg.listen = listen.clone();
    }
    if let Some(port) = args.port {
        cfg.port = port;
    }
    if args.ipv6 {
        cfg.ipv6_only = true;
    }
    if args.resample_transmit {
        cfg.resample_transmit = true;
    }
    if let Some(level) = args.log_level {
        cfg.log_level = level;
    }
    if args.verbose && cfg.log_level != LogLevel::Trace {
        cfg.log_level = LogLevel::Debug;
    }
    Ok(cfg)
}

#[tokio::main]
async fn main() {
    let mut args = Args::parse();

    // alias --json
    if args.json {
        args.format = OutputFormat::Json;
    }
    let want_color = io::stderr().is_terminal()
        && std::env::var_os("NO_COLOR").is_none()
        && !args.no_color;
    set_colors_enabled(want_color && io::stdout().is_terminal());
    set_colors_enabled_stderr(want_color);

    let err_term = Term::stderr();
    if args.pretty && !matches!(args.format, OutputFormat::Json) {
        fail(&err_term, "--pretty requires JSON output", 2);
    }

    let cfg = match effective_config(&args) {
        Ok(cfg) => cfg,
        Err(e) => fail(&err_term, e, 2),
    };

    if args.print_config {
        match toml::to_string_pretty(&toml::Value::from(&cfg)) {
            Ok(text) => {
                print!("{text}");
                return;
            }
            Err(e) => fail(&err_term, e, 1),
        }
    }

    tracing_init(cfg.log_level, want_color).init();

    let listener = match Listener::bind(&cfg).await {
        Ok(listener) => listener,
        Err(e) => fail(&err_term, e, 1),
    };

    let stats = listener
        .run_until(async {
            if let Err(e) = signal::ctrl_c().await {
                tracing::error!("cannot listen for shutdown signal: {e}");
                std::future::pending::<()>().await;
            }
        })
        .await;

    let term = Term::stdout();
    match args.format {
        OutputFormat::Text => {
            term.write_line(&fmt::text::render_stats(&stats)).ok();
        }
        OutputFormat::Json => match fmt::json::stats_to_json(&stats, args.pretty) {
            Ok(s) => println!("{}", s),
            Err(e) => fail(&err_term, e, 1),
        },
    }
}
