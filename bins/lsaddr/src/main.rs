//! lsaddr command - show the network addresses used by your applications.
//!
//! Lists the open connections of the processes matching a selector, as a CSV
//! table, JSON or a packet filter expression that can be given to `tcpdump`.

use std::io::{self, BufWriter, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{ArgAction, Parser, ValueEnum};
use lsaddr::{BpfOptions, Format, KeyColumn, Lookup, LookupConfig, OutputOptions};

#[derive(Parser)]
#[command(name = "lsaddr", version, about = "Show the network addresses used by your applications")]
#[command(long_about = "Show the network addresses used by your applications.\n\n\
    SELECTOR filters the connections: '*' (default) keeps all of them, an executable \
    name such as chrome.exe keeps the ones owned by its processes, anything else is a \
    regular expression matched against each line of the tool output \
    (e.g. 'Spotify', '(?i)chrome', '748|4').")]
struct Cli {
    /// Connection selector.
    #[arg(default_value = "*")]
    selector: String,

    /// Output format.
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputArg,

    /// First column of the CSV table.
    #[arg(long, value_enum, default_value = "pid")]
    key: KeyArg,

    /// Only emit host primitives (bpf).
    #[arg(long)]
    hosts_only: bool,

    /// Qualify local endpoints with src and remote ones with dst (bpf).
    #[arg(long)]
    directed: bool,

    /// Pretty print (json).
    #[arg(long)]
    pretty: bool,

    /// Limit on the tool run time (e.g. 5s, 500ms).
    #[arg(long, value_parser = parse_duration, default_value = "5s")]
    timeout: Duration,

    /// Decode a saved tool capture instead of running the tool ('-' for stdin).
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Tool output format [default: lsof, or netstat on Windows].
    #[arg(long, value_enum)]
    input_format: Option<InputArg>,

    /// Increase logging verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputArg {
    Csv,
    Bpf,
    Json,
}

impl From<OutputArg> for lsaddr::OutputFormat {
    fn from(arg: OutputArg) -> Self {
        match arg {
            OutputArg::Csv => Self::Csv,
            OutputArg::Bpf => Self::Bpf,
            OutputArg::Json => Self::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KeyArg {
    Pid,
    Command,
}

impl From<KeyArg> for KeyColumn {
    fn from(arg: KeyArg) -> Self {
        match arg {
            KeyArg::Pid => Self::Pid,
            KeyArg::Command => Self::Command,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum InputArg {
    Lsof,
    Netstat,
    Tasklist,
}

impl From<InputArg> for Format {
    fn from(arg: InputArg) -> Self {
        match arg {
            InputArg::Lsof => Self::Lsof,
            InputArg::Netstat => Self::Netstat,
            InputArg::Tasklist => Self::Tasklist,
        }
    }
}

fn parse_duration(s: &str) -> Result<Duration, String> {
    lsaddr::util::get_time(s).map_err(|e| e.to_string())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let format = cli.input_format.map(Format::from).unwrap_or_else(Format::platform_default);
    let config = LookupConfig::new().format(format).timeout(cli.timeout);
    let lookup = Lookup::new(config);

    let set = match &cli.input {
        Some(path) => {
            let raw = read_input(path)?;
            lookup.from_bytes(&raw, &cli.selector)?
        }
        None => lookup.run(&cli.selector).await?,
    };
    tracing::debug!(connections = set.len(), "open network files");

    let opts = OutputOptions {
        key: cli.key.into(),
        bpf: BpfOptions {
            hosts_only: cli.hosts_only,
            directed: cli.directed,
        },
        pretty: cli.pretty,
    };
    let stdout = io::stdout();
    lsaddr::encode_with(cli.format.into(), &set, BufWriter::new(stdout.lock()), &opts)?;
    Ok(())
}

fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut raw = Vec::new();
        io::stdin().read_to_end(&mut raw).context("unable to read stdin")?;
        return Ok(raw);
    }
    std::fs::read(path).with_context(|| format!("unable to read {}", path.display()))
}
