use std::process::ExitCode;

use clap::Parser;
use feeder_cli::{load_config, Cli, Commands};
use tracing::{error, info, warn};
use tracing_subscriber::FmtSubscriber;

mod commands;

use commands::{check, graph, query, roundtrip, transform};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    let configured_level = config.log_level();
    let level = cli
        .log_level
        .or_else(|| configured_level.as_ref().ok().copied())
        .unwrap_or(tracing::Level::INFO);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    if let Err(e) = &configured_level {
        warn!("{e}; using {level}");
    }

    let result = match &cli.command {
        Commands::Roundtrip { input, output } => {
            info!("Round-tripping {}", input.display());
            roundtrip::handle(input, output.as_deref(), &config)
        }
        Commands::Transform {
            input,
            output,
            transforms,
            no_sign,
            list,
        } => transform::handle(
            &transform::TransformArgs {
                input: input.as_deref(),
                output: output.as_deref(),
                transforms,
                no_sign: *no_sign,
                list: *list,
            },
            &config,
        ),
        Commands::Find {
            input,
            property,
            value,
            count,
            format,
        } => query::handle_find(input, property, value, *count, *format),
        Commands::Upstream {
            input,
            name,
            all,
            class,
            format,
        } => query::handle_upstream(input, name, *all, class.as_deref(), *format),
        Commands::Downstream {
            input,
            name,
            class,
            format,
        } => query::handle_downstream(input, name, class.as_deref(), *format),
        Commands::Check { input, format } => check::handle(input, *format),
        Commands::Graph { input, dot, format } => graph::handle(input, dot.as_deref(), *format),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
