// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the `train` subcommand and its flags.
//
// Only `--conf` matters once a configuration file is given: the
// input, output, runtime and properties flags are kept for old
// scripts, but the file wins. `--type`, `--savemode` and
// `--verbose` are not covered by the file and stay in effect.
//
// Old scripts pass args4j-style single-dash long flags
// (`-conf x.properties`); `normalize_legacy_flags` rewrites them
// into the `--conf` form clap expects.

use clap::{Args, Subcommand};

use crate::domain::config::{NetworkType, SaveMode, TrainOptions};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train a network described by a properties file
    Train(TrainArgs),
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Configuration file for training
    #[arg(long, default_value = "")]
    pub conf: String,

    /// Input data (overridden by dl4j.input.directory)
    #[arg(short = 'i', long)]
    pub input: Option<String>,

    /// Location for saving the model (overridden by dl4j.output.directory)
    #[arg(short = 'o', long)]
    pub output: Option<String>,

    /// Type of network: multi, or anything else for a single layer
    #[arg(long = "type", default_value = "multi")]
    pub network_type: String,

    /// Runtime: local, hadoop, spark (overridden by dl4j.execution.runtime)
    #[arg(short = 'r', long)]
    pub runtime: Option<String>,

    /// Configuration for distributed systems
    #[arg(short = 'p', long)]
    pub properties: Option<String>,

    /// Output encoding: binary | txt
    #[arg(long, default_value = "txt")]
    pub savemode: String,

    /// Log the score of every iteration and dump the loaded configuration
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl TrainArgs {
    /// Flags that were given but will be ignored in favour of the file.
    pub fn overridden_flags(&self) -> Vec<&'static str> {
        [
            ("input", self.input.is_some()),
            ("output", self.output.is_some()),
            ("runtime", self.runtime.is_some()),
            ("properties", self.properties.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect()
    }
}

impl From<&TrainArgs> for TrainOptions {
    fn from(a: &TrainArgs) -> Self {
        TrainOptions {
            network_type: NetworkType::from_flag(&a.network_type),
            save_mode:    SaveMode::from_flag(&a.savemode),
            verbose:      a.verbose,
        }
    }
}

const LEGACY_FLAGS: &[&str] = &[
    "conf", "input", "output", "type", "runtime", "properties", "savemode", "verbose",
];

/// Rewrite `-conf` style flags to `--conf`; everything else passes through.
pub fn normalize_legacy_flags<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    args.into_iter()
        .map(|arg| match arg.strip_prefix('-') {
            Some(name) if LEGACY_FLAGS.contains(&name) => format!("--{name}"),
            _ => arg,
        })
        .collect()
}
