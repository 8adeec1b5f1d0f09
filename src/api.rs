use crate::dataset::Dataset;
use crate::error::RegistryError;
use crate::loader::{load_path, load_str};
use crate::validator::{validate_document, ValidationMode};
use log::info;
use std::path::Path;

/// Settings for one load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    pub mode: ValidationMode,
}

impl LoadOptions {
    #[must_use]
    pub fn report() -> Self {
        LoadOptions {
            mode: ValidationMode::Report,
        }
    }
}

/// Loads, validates and indexes the registry file at `path`.
///
/// This is the primary entry point. Each call builds a brand new
/// [`Dataset`]; nothing is cached between calls.
///
/// # Errors
///
/// Returns `RegistryError::Io` if the file cannot be read,
/// `RegistryError::MalformedSource` if it cannot be parsed, and a validation
/// variant if any entry breaks the registry invariants.
pub fn load_dataset(
    path: impl AsRef<Path>,
    options: LoadOptions,
) -> Result<Dataset, RegistryError> {
    let path = path.as_ref();
    let document = load_path(path)?;
    let records = validate_document(document, options.mode)?;
    let dataset = Dataset::build(path.to_string_lossy(), records);
    info!("{dataset}");
    Ok(dataset)
}

/// Same as [`load_dataset`] for registry XML already in memory.
/// `file_name` labels the source in diagnostics and generated output.
///
/// # Errors
///
/// Returns `RegistryError::MalformedSource` or a validation variant.
pub fn parse_dataset(
    source: &str,
    file_name: &str,
    options: LoadOptions,
) -> Result<Dataset, RegistryError> {
    let document = load_str(source, file_name)?;
    let records = validate_document(document, options.mode)?;
    Ok(Dataset::build(file_name, records))
}
