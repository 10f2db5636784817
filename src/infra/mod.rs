// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// File formats at the edges of a run:
//
//   config_loader.rs — .properties → TrainingConfig
//   model_config.rs  — architecture JSON validation and loading
//   param_writer.rs  — binary / text parameter files

pub mod config_loader;

pub mod model_config;

pub mod param_writer;
