// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types and traits shared by every other layer.
//
// Rules for this layer:
//   - NO burn types
//   - NO file I/O
//   - Only structs, enums, traits and the error type

// Resolved training configuration and run options
pub mod config;

// JSON architecture schema
pub mod architecture;

// A parsed input record
pub mod record;

// Structured errors
pub mod error;

// Reader / format / listener / sink abstractions
pub mod traits;
