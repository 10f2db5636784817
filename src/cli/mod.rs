// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments, loads the configuration once, hands it to the
// application layer and turns the outcome into user-visible
// output. All training logic lives in Layer 2.
//
// Exit behaviour:
//   no --conf                      → usage, success
//   unreadable conf / no input key → error, failure exit
//   unknown input format           → error, failure exit
//   invalid architecture JSON      → message, success
//   hadoop / spark runtime         → warning, success
//   failure while training/saving  → logged, success

pub mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{Commands, TrainArgs};
use tracing_subscriber::EnvFilter;

use crate::application::train_use_case::{TrainOutcome, TrainUseCase};
use crate::domain::config::TrainOptions;

#[derive(Parser, Debug)]
#[command(
    name = "dl4j",
    version,
    about = "Train a JSON-described neural network from a properties file."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args) => run_train(args),
        }
    }
}

/// Filter used when `RUST_LOG` is unset: info and above for this crate.
///
/// Event targets are module paths rooted at the crate name, which is
/// the binary's name (`dl4j`), not the package name.
pub fn default_log_directive() -> String {
    format!("{}=info", env!("CARGO_CRATE_NAME"))
}

/// `RUST_LOG` when it parses, otherwise `default_log_directive()`.
pub fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_log_directive()))
}

pub fn usage() -> &'static str {
    "DL4J: CLI Training System\n\
     \n\
     \tUsage:\n\
     \t\tdl4j train -conf <conf_file>\n\
     \n\
     \tConfiguration File:\n\
     \t\tContains a list of property entries that describe the training process\n\
     \n\
     \tExample:\n\
     \t\tdl4j train -conf /tmp/iris_conf.txt\n"
}

fn run_train(args: TrainArgs) -> Result<()> {
    if args.conf.trim().is_empty() {
        print!("{}", usage());
        return Ok(());
    }

    for flag in args.overridden_flags() {
        tracing::warn!("-{} is ignored; the configuration file decides this value", flag);
    }

    let options  = TrainOptions::from(&args);
    let use_case = TrainUseCase::from_config_file(&args.conf, options)
        .with_context(|| format!("Cannot load training configuration '{}'", args.conf))?;
    tracing::info!("Using training configuration: {}", args.conf);

    if options.verbose {
        print!("{}", use_case.config().debug_dump());
    }

    match use_case.execute() {
        Ok(TrainOutcome::Trained(report)) => {
            let summary = &report.summary;
            println!(
                "Fit {} examples in {} batches ({} iterations, final score {})",
                summary.examples,
                summary.batches,
                summary.iterations,
                summary
                    .last_score
                    .map_or_else(|| "n/a".to_string(), |s| format!("{s:.6}"))
            );
            println!(
                "Training complete ({:?} network). {} parameters saved as {:?} to {}",
                report.network_type,
                report.num_params,
                report.save_mode,
                report.artifact.display()
            );
            Ok(())
        }
        Ok(TrainOutcome::InvalidArchitecture { path }) => {
            println!(
                "Shutting down, no valid model JSON architecture file specified: {}",
                path.display()
            );
            Ok(())
        }
        Ok(TrainOutcome::RuntimeUnsupported(mode)) => {
            println!("No model trained: {mode} execution is not available from the CLI");
            Ok(())
        }
        Err(e) if e.is_fatal_setup() => Err(e.into()),
        Err(e) => {
            tracing::error!("Training failed: {:#}", anyhow::Error::from(e));
            Ok(())
        }
    }
}
