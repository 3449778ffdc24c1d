//! Swarm CLI binary entry point.

use clap::Parser;
use swarm::cli::repl::{language_demo_agent, run_demo_loop, DemoOptions};
use swarm::cli::{ChatArgs, Cli, Commands};
use swarm::config::SwarmConfig;
use swarm::context::ContextVariables;
use swarm::Swarm;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Chat(args) => {
            init_tracing(args.debug);
            handle_chat(cli.config, args).await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(debug: bool) {
    let filter = if debug { "swarm=info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn handle_chat(
    config_path: Option<std::path::PathBuf>,
    args: ChatArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = SwarmConfig::load(config_path.as_deref())?;
    let swarm = Swarm::from_config(&config)?;

    let options = DemoOptions {
        model_override: DemoOptions::resolve_model(args.model, &config),
        stream: args.stream,
        max_turns: args.max_turns,
        debug: args.debug,
    };

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    run_demo_loop(
        &swarm,
        language_demo_agent(),
        ContextVariables::new(),
        &options,
        stdin,
        &mut stdout,
    )
    .await?;
    Ok(())
}
