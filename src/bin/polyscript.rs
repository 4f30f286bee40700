use clap::Parser;
use polyscript::{
    data::data_map_from_json, CompositeProvider, ContextProvider, DataMap,
    Error, Evaluator, EvaluatorWithPrepare, ExecutionContext, PolyscriptConfig, Provider,
    RhaiEngine, ScriptEvaluator, ScriptSource, StaticProvider,
};
use std::{path::PathBuf, sync::Arc, time::Duration};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Evaluate a Rhai script against JSON data", long_about = None)]
struct Cli {
    /// Script file to evaluate
    #[arg(short, long)]
    script: PathBuf,

    /// JSON object file bound to the script at compile time
    #[arg(long)]
    static_data: Option<PathBuf>,

    /// JSON object file staged as request data; repeat to merge several
    #[arg(short, long)]
    data: Vec<PathBuf>,

    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Abort evaluation after this many milliseconds
    #[arg(short, long)]
    timeout_ms: Option<u64>,

    /// Enable debug mode
    #[arg(short, long)]
    verbose: bool,
}

fn read_data_map(path: &PathBuf) -> Result<DataMap, Error> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::internal(format!("Failed to read {}: {}", path.display(), e)))?;
    let json: serde_json::Value = serde_json::from_str(&content)
        .map_err(|e| Error::internal(format!("Failed to parse {}: {}", path.display(), e)))?;
    data_map_from_json(json)
        .ok_or_else(|| Error::internal(format!("{} must contain a JSON object", path.display())))
}

fn build_provider(cli: &Cli, config: &PolyscriptConfig) -> Result<CompositeProvider, Error> {
    let mut members: Vec<Arc<dyn Provider>> = Vec::new();
    if let Some(path) = &cli.static_data {
        members.push(Arc::new(StaticProvider::new(read_data_map(path)?)));
    }
    members.push(Arc::new(
        ContextProvider::new(config.data.context_key.clone())
            .with_nesting(config.data.nesting.clone()),
    ));
    Ok(CompositeProvider::from_providers(members))
}

fn run(cli: &Cli) -> Result<(), Error> {
    let config = match &cli.config {
        Some(path) => PolyscriptConfig::from_file(path)?,
        None => PolyscriptConfig::default(),
    };
    debug!("config: {:?}", config);

    let source = ScriptSource::from_file(&cli.script)?;
    let provider = build_provider(cli, &config)?;
    let engine = RhaiEngine::with_config(config.rhai.clone());
    let evaluator = ScriptEvaluator::compile(Arc::new(engine), &source, Arc::new(provider))?;
    info!(script_id = evaluator.script_id(), "script compiled");

    let data = cli
        .data
        .iter()
        .map(read_data_map)
        .collect::<Result<Vec<_>, _>>()?;

    let mut context = ExecutionContext::background();
    if let Some(ms) = cli.timeout_ms {
        context = context.with_timeout(Duration::from_millis(ms));
    }
    if !data.is_empty() {
        context = evaluator.prepare_context(&context, &data).into_result()?;
    }

    let response = evaluator.eval(&context)?;
    info!(eval_id = %response.eval_id(), "evaluation finished");

    let output = serde_json::to_string_pretty(&response)
        .map_err(|e| Error::internal(format!("Failed to serialize response: {}", e)))?;
    println!("{}", output);
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
