pub mod api;
pub mod dataset;
pub mod error;
pub mod export;
pub mod index;
pub mod loader;
pub mod record;
pub mod utils;
pub mod validator;

pub use api::{load_dataset, parse_dataset, LoadOptions};
pub use dataset::Dataset;
pub use error::{ExportError, ParserError, RegistryError, ValidationError};
pub use export::{export_all, ExportFormat, ExportOptions, TableEmitter};
pub use record::{LanguageRecord, LanguageScope, LanguageType};
pub use validator::ValidationMode;
