// ============================================================
// Layer 4 — Input Format Registry
// ============================================================
// Maps a configured format identifier to a constructor. Both the
// fully qualified Canova class names used by existing configuration
// files and short aliases are accepted:
//
//   org.canova.api.formats.input.impl.SVMLightInputFormat | svmlight
//   org.canova.api.formats.input.impl.CSVInputFormat      | csv
//
// An unknown identifier is an error; there is no fallback format.

use crate::data::{csv::CsvInputFormat, svmlight::SvmLightInputFormat};
use crate::domain::error::{Result, TrainError};
use crate::domain::traits::InputFormat;

type Constructor = fn() -> Box<dyn InputFormat>;

struct Entry {
    identifiers: &'static [&'static str],
    construct:   Constructor,
}

/// Identifier → input format lookup.
///
/// Entries are checked in registration order; identifiers are
/// compared exactly after trimming surrounding whitespace.
pub struct InputFormatRegistry {
    entries: Vec<Entry>,
}

impl InputFormatRegistry {
    /// Registry holding every built-in format.
    pub fn builtin() -> Self {
        Self {
            entries: vec![
                Entry {
                    identifiers: &[
                        "org.canova.api.formats.input.impl.SVMLightInputFormat",
                        "svmlight",
                    ],
                    construct: || Box::new(SvmLightInputFormat) as Box<dyn InputFormat>,
                },
                Entry {
                    identifiers: &["org.canova.api.formats.input.impl.CSVInputFormat", "csv"],
                    construct: || Box::new(CsvInputFormat) as Box<dyn InputFormat>,
                },
            ],
        }
    }

    /// A fresh format instance for `identifier`, or `UnknownInputFormat`.
    pub fn resolve(&self, identifier: &str) -> Result<Box<dyn InputFormat>> {
        let identifier = identifier.trim();
        self.entries
            .iter()
            .find(|entry| entry.identifiers.contains(&identifier))
            .map(|entry| (entry.construct)())
            .ok_or_else(|| {
                let known: Vec<_> = self.identifiers().collect();
                tracing::error!("Known input formats: {}", known.join(", "));
                TrainError::UnknownInputFormat(identifier.to_string())
            })
    }

    /// Every accepted identifier, for error messages and help text.
    pub fn identifiers(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().flat_map(|entry| entry.identifiers.iter().copied())
    }
}
