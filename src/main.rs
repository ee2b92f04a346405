use clap::{Args, Parser, Subcommand};
use std::env;
use std::io::{self, Read};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use sensei_engine::api::{self, ApiAnalyzeRequest, ApiEnvelope};
use sensei_engine::{server, AnalysisConfig, SenseiEngine};

#[derive(Parser)]
#[command(name = "sensei", about = "Ad creative scoring and recommendation engine")]
struct Cli {
    /// TOML file with scoring thresholds; defaults to $SENSEI_CONFIG_PATH or config/sensei.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a JSON request (`{mode, creatives, campaigns}`) from a file or stdin.
    Analyze(AnalyzeArgs),
    /// Run the HTTP service.
    Serve(ServeArgs),
}

#[derive(Args, Debug, Clone)]
struct AnalyzeArgs {
    #[arg(long)]
    input: Option<PathBuf>,
    /// Overrides the request's `mode` (creative, offer, hook, full).
    #[arg(long)]
    mode: Option<String>,
    #[arg(long)]
    pretty: bool,
}

#[derive(Args, Debug, Clone)]
struct ServeArgs {
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Defaults to $PORT, then 3000.
    #[arg(long)]
    port: Option<u16>,
}

impl Default for ServeArgs {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: None,
        }
    }
}

#[tokio::main]
async fn main() {
    load_dotenv();
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let (config, config_path) = AnalysisConfig::load(cli.config).map_err(|err| err.to_string())?;
    if let Some(path) = config_path.as_ref().filter(|path| path.exists()) {
        tracing::debug!(path = %path.display(), "loaded analysis config");
    }
    let engine = SenseiEngine::new(config);

    let command = cli.command.unwrap_or(Command::Serve(ServeArgs::default()));
    match command {
        Command::Analyze(args) => run_analyze(&engine, args),
        Command::Serve(args) => run_serve(engine, args).await,
    }
}

fn run_analyze(engine: &SenseiEngine, args: AnalyzeArgs) -> Result<(), String> {
    let payload = read_input(args.input.as_deref())?;
    let mut request: ApiAnalyzeRequest = serde_json::from_str(&payload)
        .map_err(|err| format!("invalid request JSON: {}", err))?;

    if let Some(mode) = args.mode {
        request.mode = Some(serde_json::Value::String(mode));
    } else if request.mode.is_none() {
        request.mode = Some(serde_json::Value::String("full".to_string()));
    }

    let response = api::analyze(engine, &request).map_err(|err| err.to_string())?;
    let envelope = ApiEnvelope::success(response);
    let output = if args.pretty {
        serde_json::to_string_pretty(&envelope)
    } else {
        serde_json::to_string(&envelope)
    }
    .map_err(|err| format!("failed to serialize result: {}", err))?;

    println!("{}", output);
    Ok(())
}

async fn run_serve(engine: SenseiEngine, args: ServeArgs) -> Result<(), String> {
    let port = match args.port {
        Some(port) => port,
        None => port_from_env()?,
    };
    let addr: SocketAddr = format!("{}:{}", args.host, port)
        .parse()
        .map_err(|err| format!("invalid bind address: {}", err))?;
    server::serve(addr, engine).await
}

fn port_from_env() -> Result<u16, String> {
    match env::var("PORT") {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<u16>()
            .map_err(|err| format!("invalid PORT '{}': {}", value, err)),
        _ => Ok(3000),
    }
}

fn read_input(path: Option<&Path>) -> Result<String, String> {
    if let Some(path) = path {
        return std::fs::read_to_string(path)
            .map_err(|err| format!("failed reading {}: {}", path.display(), err));
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|err| format!("failed reading stdin: {}", err))?;
    if buffer.trim().is_empty() {
        return Err("missing request: pass --input or pipe JSON on stdin".to_string());
    }
    Ok(buffer)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

fn load_dotenv() {
    let _ = dotenvy::dotenv();
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let manifest_path = Path::new(manifest_dir).join(".env");
    let _ = dotenvy::from_path(manifest_path);
}
