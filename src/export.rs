use crate::dataset::Dataset;
use crate::error::ExportError;
use crate::record::{LanguageRecord, RegistryEnum};
use log::{debug, info, warn};
use std::fmt::{self, Write as _};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const GENERATOR: &str = concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"));

/// Output formats the exporter knows how to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// A Rust source table a host crate can `include!`.
    Rust,
    /// JSON array of records.
    Json,
    /// YAML sequence of records.
    Yaml,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Rust, ExportFormat::Json, ExportFormat::Yaml];

    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Rust => "rs",
            ExportFormat::Json => "json",
            ExportFormat::Yaml => "yaml",
        }
    }

    #[must_use]
    pub fn emitter(self) -> Box<dyn TableEmitter> {
        match self {
            ExportFormat::Rust => Box::new(RustTableEmitter),
            ExportFormat::Json => Box::new(JsonEmitter),
            ExportFormat::Yaml => Box::new(YamlEmitter),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::Rust => "rust",
            ExportFormat::Json => "json",
            ExportFormat::Yaml => "yaml",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rust" | "rs" => Ok(ExportFormat::Rust),
            "json" => Ok(ExportFormat::Json),
            "yaml" | "yml" => Ok(ExportFormat::Yaml),
            _ => Err(ExportError::UnsupportedFormat {
                format: s.to_string(),
            }),
        }
    }
}

/// One output representation of a dataset.
///
/// Implementations must walk records in canonical order and must not embed
/// anything that varies between runs, so the same dataset always renders to
/// the same bytes.
pub trait TableEmitter {
    fn format(&self) -> ExportFormat;

    /// Renders the whole dataset.
    ///
    /// # Errors
    /// Returns `ExportError::Serialize` if the dataset cannot be encoded.
    fn render(&self, dataset: &Dataset) -> Result<String, ExportError>;
}

pub struct JsonEmitter;

impl TableEmitter for JsonEmitter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Json
    }

    fn render(&self, dataset: &Dataset) -> Result<String, ExportError> {
        let mut json =
            serde_json::to_string_pretty(dataset.records()).map_err(|e| ExportError::Serialize {
                format: self.format().to_string(),
                message: e.to_string(),
            })?;
        json.push('\n');
        Ok(json)
    }
}

pub struct YamlEmitter;

impl TableEmitter for YamlEmitter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Yaml
    }

    fn render(&self, dataset: &Dataset) -> Result<String, ExportError> {
        serde_yaml::to_string(dataset.records()).map_err(|e| ExportError::Serialize {
            format: self.format().to_string(),
            message: e.to_string(),
        })
    }
}

/// Emits a self-contained Rust module: the record table in canonical order,
/// plus `BY_CODE` and `BY_NAME` arrays sorted for binary search.
pub struct RustTableEmitter;

impl RustTableEmitter {
    fn write_record(out: &mut String, record: &LanguageRecord) -> fmt::Result {
        writeln!(out, "    LanguageEntry {{")?;
        writeln!(out, "        code: {:?},", record.code)?;
        writeln!(out, "        reference_name: {:?},", record.reference_name)?;
        writeln!(out, "        language_type: {:?},", record.language_type.letter())?;
        writeln!(out, "        scope: {:?},", record.scope.letter())?;
        writeln!(out, "        name: {:?},", record.name)?;
        writeln!(out, "        inverted_name: {},", option_literal(&record.inverted_name))?;
        writeln!(out, "        common_name: {},", option_literal(&record.common_name))?;
        writeln!(out, "        part1_code: {},", option_literal(&record.part1_code))?;
        writeln!(out, "        part2_code: {},", option_literal(&record.part2_code))?;
        writeln!(out, "    }},")
    }

    fn write_table(out: &mut String, dataset: &Dataset) -> fmt::Result {
        // Only the file name, so the output does not depend on where the source lives.
        let source = Path::new(dataset.source_name())
            .file_name()
            .map_or_else(|| dataset.source_name().into(), |n| n.to_string_lossy());
        writeln!(out, "// Automatically generated by {GENERATOR} from {source}.")?;
        writeln!(out, "// {} language records. Do not edit by hand.", dataset.len())?;
        writeln!(out)?;
        writeln!(out, "#[derive(Debug, Clone, Copy, PartialEq, Eq)]")?;
        writeln!(out, "pub struct LanguageEntry {{")?;
        for field in ["code", "reference_name", "language_type", "scope", "name"] {
            writeln!(out, "    pub {field}: &'static str,")?;
        }
        for field in ["inverted_name", "common_name", "part1_code", "part2_code"] {
            writeln!(out, "    pub {field}: Option<&'static str>,")?;
        }
        writeln!(out, "}}")?;
        writeln!(out)?;

        writeln!(out, "/// Records in registry order.")?;
        writeln!(out, "pub static LANGUAGES: [LanguageEntry; {}] = [", dataset.len())?;
        for record in dataset {
            Self::write_record(out, record)?;
        }
        writeln!(out, "];")?;
        writeln!(out)?;

        let indexes = dataset.indexes();

        let mut by_code: Vec<(&str, usize)> = indexes.by_code.iter().collect();
        by_code.sort_unstable();
        writeln!(out, "/// Code to position in `LANGUAGES`, sorted by code.")?;
        writeln!(out, "pub static BY_CODE: [(&str, usize); {}] = [", by_code.len())?;
        for (code, position) in by_code {
            writeln!(out, "    ({code:?}, {position}),")?;
        }
        writeln!(out, "];")?;
        writeln!(out)?;

        let mut by_name: Vec<(&str, &[usize])> = indexes.by_name.iter().collect();
        by_name.sort_unstable();
        writeln!(out, "/// Reference name to positions in `LANGUAGES`, sorted by name.")?;
        writeln!(out, "pub static BY_NAME: [(&str, &[usize]); {}] = [", by_name.len())?;
        for (name, positions) in by_name {
            let list = positions
                .iter()
                .map(usize::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(out, "    ({name:?}, &[{list}]),")?;
        }
        writeln!(out, "];")
    }
}

impl TableEmitter for RustTableEmitter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Rust
    }

    fn render(&self, dataset: &Dataset) -> Result<String, ExportError> {
        let mut out = String::new();
        Self::write_table(&mut out, dataset).map_err(|e| ExportError::Serialize {
            format: self.format().to_string(),
            message: e.to_string(),
        })?;
        Ok(out)
    }
}

fn option_literal(value: &Option<String>) -> String {
    match value {
        Some(v) => format!("Some({v:?})"),
        None => "None".to_string(),
    }
}

/// Renders `dataset` in the format named by `format`.
///
/// # Errors
/// `ExportError::UnsupportedFormat` for an unknown format name.
pub fn render(dataset: &Dataset, format: &str) -> Result<String, ExportError> {
    format.parse::<ExportFormat>()?.emitter().render(dataset)
}

/// Where and what to export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub out_dir: PathBuf,
    /// File name without extension, e.g. `iso_639_3_tables`.
    pub stem: String,
    pub formats: Vec<ExportFormat>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            out_dir: PathBuf::from("."),
            stem: "iso_639_3_tables".to_string(),
            formats: ExportFormat::ALL.to_vec(),
        }
    }
}

impl ExportOptions {
    #[must_use]
    pub fn path_for(&self, format: ExportFormat) -> PathBuf {
        self.out_dir
            .join(format!("{}.{}", self.stem, format.extension()))
    }
}

/// Renders every requested format, then writes each file atomically.
///
/// Nothing is written unless every format rendered successfully.
///
/// # Errors
/// Returns the first rendering or write failure.
pub fn export_all(dataset: &Dataset, options: &ExportOptions) -> Result<Vec<PathBuf>, ExportError> {
    let rendered = options
        .formats
        .iter()
        .map(|&format| {
            let contents = format.emitter().render(dataset)?;
            Ok::<_, ExportError>((options.path_for(format), contents))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut written = Vec::with_capacity(rendered.len());
    for (path, contents) in rendered {
        if path.exists() {
            warn!("overwriting {}", path.display());
        }
        write_atomic(&path, contents.as_bytes())?;
        info!("wrote {} ({} bytes)", path.display(), contents.len());
        written.push(path);
    }
    Ok(written)
}

/// Writes `contents` to `path` through a temporary file in the same
/// directory that is renamed into place once fully written.
///
/// # Errors
/// Returns `ExportError::Io` naming `path`. On error `path` is left as it was.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), ExportError> {
    let io_err = |source: std::io::Error| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
    file.write_all(contents).map_err(io_err)?;
    file.as_file().sync_all().map_err(io_err)?;
    debug!("renaming {} into {}", file.path().display(), path.display());
    file.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}
