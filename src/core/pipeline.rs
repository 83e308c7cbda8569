use crate::core::cleaning::clean_table;
use crate::core::csv_codec::{read_table, write_table};
use crate::core::{ConfigProvider, Pipeline, SourceTable, Storage, TransformResult};
use crate::utils::error::Result;

/// Sales report pipeline: read the raw export, clean it, write the report.
pub struct SalesPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> SalesPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

impl<S: Storage, C: ConfigProvider> Pipeline for SalesPipeline<S, C> {
    fn extract(&self) -> Result<SourceTable> {
        let input = self.config.input_path();
        tracing::debug!("Reading sales data from: {}", input);

        let bytes = self.storage.read_file(input)?;
        tracing::debug!("Read {} bytes", bytes.len());

        read_table(bytes.as_slice(), self.config.delimiter()?)
    }

    fn transform(&self, table: SourceTable) -> Result<TransformResult> {
        let filter = self.config.row_filter();
        if !filter.is_empty() {
            tracing::info!("🔎 Applying filters: {:?}", filter);
        }

        let (cleaned, summary) = clean_table(table, &filter);

        let mut csv_output = Vec::new();
        write_table(&mut csv_output, &cleaned.headers, &cleaned.rows)?;

        Ok(TransformResult {
            csv_output,
            summary,
        })
    }

    fn load(&self, result: &TransformResult) -> Result<String> {
        let output_path = self.config.output_path();

        tracing::debug!(
            "Writing cleaned report ({} bytes) to storage",
            result.csv_output.len()
        );
        self.storage.write_file(output_path, &result.csv_output)?;

        // 有設定才輸出摘要 JSON
        if let Some(summary_path) = self.config.summary_path() {
            let json_data = serde_json::to_vec_pretty(&result.summary)?;
            self.storage.write_file(summary_path, &json_data)?;
            tracing::info!("📝 Summary saved to: {}", summary_path);
        }

        Ok(output_path.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cleaner::RowFilter;
    use crate::utils::error::EtlError;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MockStorage {
        files: RefCell<HashMap<String, Vec<u8>>>,
    }

    impl MockStorage {
        fn with_file(path: &str, data: &str) -> Self {
            let storage = Self::default();
            storage
                .files
                .borrow_mut()
                .insert(path.to_string(), data.as_bytes().to_vec());
            storage
        }

        fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            self.files.borrow().get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            self.files.borrow().get(path).cloned().ok_or_else(|| {
                EtlError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            self.files
                .borrow_mut()
                .insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        delimiter: u8,
        summary: Option<String>,
        filter: RowFilter,
    }

    impl Default for MockConfig {
        fn default() -> Self {
            Self {
                delimiter: b',',
                summary: None,
                filter: RowFilter::default(),
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn input_path(&self) -> &str {
            "in.csv"
        }

        fn output_path(&self) -> &str {
            "out/report.csv"
        }

        fn delimiter(&self) -> Result<u8> {
            Ok(self.delimiter)
        }

        fn summary_path(&self) -> Option<&str> {
            self.summary.as_deref()
        }

        fn row_filter(&self) -> RowFilter {
            self.filter.clone()
        }
    }

    const INPUT: &str = "\
TransactionID,CustomerID,Region,ProductName,Quantity,UnitPrice
T1,C1,US,Keyboard,5,\"1,200\"
X2,C2,US,Mouse,2,50
";

    #[test]
    fn test_extract_reads_from_storage() {
        let pipeline = SalesPipeline::new(
            MockStorage::with_file("in.csv", INPUT),
            MockConfig::default(),
        );
        let table = pipeline.extract().unwrap();
        assert_eq!(table.headers.len(), 6);
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn test_extract_missing_input_fails() {
        let pipeline = SalesPipeline::new(MockStorage::default(), MockConfig::default());
        let err = pipeline.extract().unwrap_err();
        assert!(matches!(err, EtlError::IoError(_)));
    }

    #[test]
    fn test_full_run_writes_report_and_summary() {
        let config = MockConfig {
            summary: Some("out/summary.json".to_string()),
            ..Default::default()
        };
        let pipeline = SalesPipeline::new(MockStorage::with_file("in.csv", INPUT), config);

        let table = pipeline.extract().unwrap();
        let result = pipeline.transform(table).unwrap();
        let path = pipeline.load(&result).unwrap();

        assert_eq!(path, "out/report.csv");
        let report = pipeline.storage.get_file("out/report.csv").unwrap();
        assert_eq!(
            String::from_utf8(report).unwrap(),
            "TransactionID,CustomerID,Region,ProductName,Quantity,UnitPrice\n\
             T1,C1,US,Keyboard,5,1200.0\n"
        );

        let summary = pipeline.storage.get_file("out/summary.json").unwrap();
        let json: serde_json::Value = serde_json::from_slice(&summary).unwrap();
        assert_eq!(json["total_input"], 2);
        assert_eq!(json["final_count"], 1);
        assert_eq!(json["invalid_by_reason"]["invalid_transaction_id"], 1);
    }

    #[test]
    fn test_transform_applies_configured_filter() {
        let config = MockConfig {
            filter: RowFilter {
                region: Some("EU".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let pipeline = SalesPipeline::new(MockStorage::with_file("in.csv", INPUT), config);

        let table = pipeline.extract().unwrap();
        let result = pipeline.transform(table).unwrap();

        assert_eq!(result.summary.final_count, 0);
        assert_eq!(result.summary.filtered_by_region, 1);
        assert!(pipeline.storage.get_file("out/summary.json").is_none());
    }
}
