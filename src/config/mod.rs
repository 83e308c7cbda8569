pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::domain::cleaner::RowFilter;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_INPUT_PATH: &str = "data/sales_data.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "output/cleaned_sales_report.csv";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "sales-cleaner")]
#[command(about = "Clean an e-commerce sales export into a report-ready CSV")]
pub struct CliConfig {
    /// Raw sales file to clean
    #[arg(short, long, default_value = DEFAULT_INPUT_PATH)]
    pub input: String,

    /// Where the cleaned CSV is written
    #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output: String,

    /// Field separator of the input file
    #[arg(short, long, default_value_t = ',')]
    pub delimiter: char,

    /// Keep only rows from this region
    #[arg(long)]
    pub region: Option<String>,

    /// Drop rows whose Quantity * UnitPrice is below this amount
    #[arg(long)]
    pub min_amount: Option<f64>,

    /// Drop rows whose Quantity * UnitPrice is above this amount
    #[arg(long)]
    pub max_amount: Option<f64>,

    /// Also write a JSON summary of kept and dropped rows
    #[arg(long)]
    pub summary: Option<String>,

    /// Load settings from a TOML file instead of the flags above
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log process CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON lines on stderr")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        &self.output
    }

    fn delimiter(&self) -> Result<u8> {
        validation::validate_delimiter("delimiter", self.delimiter)
    }

    fn summary_path(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    fn row_filter(&self) -> RowFilter {
        RowFilter {
            region: self.region.clone(),
            min_amount: self.min_amount,
            max_amount: self.max_amount,
        }
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input", &self.input)?;
        validation::validate_path("output", &self.output)?;
        if let Some(summary) = &self.summary {
            validation::validate_path("summary", summary)?;
        }
        validation::validate_distinct_paths(&self.input, &self.output, self.summary.as_deref())?;
        validation::validate_delimiter("delimiter", self.delimiter)?;
        if let Some(region) = &self.region {
            validation::validate_non_empty_string("region", region)?;
        }
        validation::validate_amount_bounds(self.min_amount, self.max_amount)?;
        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CliConfig::parse_from(["sales-cleaner"]);
        assert_eq!(config.input_path(), DEFAULT_INPUT_PATH);
        assert_eq!(config.output_path(), DEFAULT_OUTPUT_PATH);
        assert_eq!(config.delimiter().unwrap(), b',');
        assert!(config.row_filter().is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_flags_map_to_filter() {
        let config = CliConfig::parse_from([
            "sales-cleaner",
            "--input",
            "data/sales.txt",
            "--delimiter",
            "|",
            "--region",
            "North",
            "--min-amount",
            "100",
        ]);
        assert_eq!(config.delimiter().unwrap(), b'|');
        assert_eq!(
            config.row_filter(),
            RowFilter {
                region: Some("North".to_string()),
                min_amount: Some(100.0),
                max_amount: None,
            }
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_flags_rejected() {
        let same_paths = CliConfig::parse_from(["sales-cleaner", "-i", "a.csv", "-o", "a.csv"]);
        assert!(same_paths.validate().is_err());

        let bad_bounds =
            CliConfig::parse_from(["sales-cleaner", "--min-amount", "50", "--max-amount", "5"]);
        assert!(bad_bounds.validate().is_err());

        let bad_delimiter = CliConfig::parse_from(["sales-cleaner", "--delimiter", "\""]);
        assert!(bad_delimiter.validate().is_err());
        assert!(bad_delimiter.delimiter().is_err());
    }

    #[test]
    fn test_summary_cannot_overwrite_input_or_report() {
        let over_input = CliConfig::parse_from([
            "sales-cleaner",
            "-i",
            "in.csv",
            "-o",
            "out.csv",
            "--summary",
            "in.csv",
        ]);
        assert!(over_input.validate().is_err());

        let over_report = CliConfig::parse_from([
            "sales-cleaner",
            "-i",
            "in.csv",
            "-o",
            "out.csv",
            "--summary",
            "out.csv",
        ]);
        assert!(over_report.validate().is_err());

        let separate = CliConfig::parse_from([
            "sales-cleaner",
            "-i",
            "in.csv",
            "-o",
            "out.csv",
            "--summary",
            "summary.json",
        ]);
        assert!(separate.validate().is_ok());
    }

    #[test]
    fn test_non_ascii_delimiter_is_not_truncated() {
        let config = CliConfig::parse_from(["sales-cleaner", "--delimiter", "¦"]);
        assert!(config.delimiter().is_err());
    }
}
