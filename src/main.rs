use anyhow::Context;
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;

use pk_graph::config::Config;
use pk_graph::interpreter::CommandInterpreter;
use pk_graph::output::{CompositeRenderer, ConsoleRenderer, FileRenderer};
use pk_graph::pipeline::Pipeline;
use pk_graph::repl;
use pk_graph::resolver::{ParameterResolver, ParameterTable};
use pk_graph::services::{
    ChatCompletionParser, CommandParsingService, DrugLookupService, HttpDrugLookup,
};
use pk_graph::simulation::Simulator;

#[derive(Parser)]
#[command(name = "pk_graph")]
#[command(about = "Plot pharmacokinetic curves from commands like 'show me metformin at 500 mg'")]
struct Cli {
    /// Configuration file path (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory to write Plotly JSON and CSV files into
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of time samples per curve
    #[arg(short, long)]
    samples: Option<usize>,

    /// Simulated time horizon in hours
    #[arg(long)]
    horizon: Option<f64>,

    /// Never call the remote parsing or lookup services
    #[arg(long)]
    offline: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Run a single command instead of the interactive loop
    command: Vec<String>,
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load configuration from {:?}", path))?,
        None => Config::default(),
    };

    if let Some(samples) = cli.samples {
        config.simulation.samples = samples;
    }
    if let Some(horizon) = cli.horizon {
        config.simulation.horizon_hours = horizon;
    }

    config = config.with_env_overrides();
    if cli.offline {
        config = config.offline();
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let config = load_config(&cli)?;

    let parser = if config.parser_service_active() {
        Some(ChatCompletionParser::new(config.parser_service.clone())?)
    } else {
        info!("Parsing service disabled, using the local command grammar only");
        None
    };
    let lookup = if config.lookup_service_active() {
        Some(HttpDrugLookup::new(&config.lookup_service)?)
    } else {
        info!("Drug lookup disabled, using the parameter table");
        None
    };

    let table = ParameterTable::with_overrides(&config.drugs);
    info!("Parameter table: {}", table.drug_names().join(", "));

    let pipeline = Pipeline::new(
        CommandInterpreter::new(parser.as_ref().map(|p| p as &dyn CommandParsingService)),
        ParameterResolver::new(lookup.as_ref().map(|l| l as &dyn DrugLookupService), table),
        Simulator::new(&config.simulation)?,
    );

    let mut renderer = CompositeRenderer::new().with(Box::new(ConsoleRenderer::stdout()));
    if let Some(dir) = &cli.output {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory {:?}", dir))?;
        renderer = renderer.with(Box::new(FileRenderer::new(dir)));
    }

    if !cli.command.is_empty() {
        let command = cli.command.join(" ");
        return repl::run_command(&pipeline, &renderer, &command)
            .map_err(|e| anyhow::anyhow!(repl::user_message(&e)));
    }

    let stdin = std::io::stdin();
    let stats = repl::run_loop(&pipeline, &renderer, stdin.lock(), std::io::stdout())?;
    if stats.failed > 0 {
        warn!("{} command(s) could not be processed", stats.failed);
    }
    info!("Rendered {} chart(s)", stats.rendered);

    Ok(())
}
