// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// From the configured input path to training batches:
//
//   input path
//       │
//       ▼
//   FileSplit                      → files to read, in order
//       │
//       ▼
//   InputFormatRegistry            → svmlight | csv strategy
//       │
//       ▼
//   RecordReader                   → one Record per line or row
//       │
//       ▼
//   RecordReaderDataSetIterator    → checked chunks of batch_size
//       │
//       ▼
//   DataSetBatcher (burn Batcher)  → DataSetBatch tensors

pub mod split;

pub mod lines;

/// SVMLight sparse text format
pub mod svmlight;

/// Dense CSV with a trailing label column
pub mod csv;

pub mod input_format;

pub mod iterator;
