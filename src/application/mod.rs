// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Workflow coordination only: load → validate → dispatch → train.
// No parsing, tensor code or printing lives here.

// Validation and runtime dispatch for one `train` invocation
pub mod train_use_case;

// The local training pipeline
pub mod local_trainer;
