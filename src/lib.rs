pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use core::{
    cleaning::{clean_csv, clean_table, CleanOptions},
    etl::{EtlEngine, EtlOutcome},
    pipeline::SalesPipeline,
};
pub use domain::cleaner::{clean, RowFilter};
pub use domain::model::{CleanRecord, CleaningSummary, RawRecord, RejectReason};
pub use utils::error::{EtlError, Result};
