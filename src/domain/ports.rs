use crate::domain::cleaner::RowFilter;
use crate::domain::model::{SourceTable, TransformResult};
use crate::utils::error::Result;

pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

pub trait ConfigProvider {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn delimiter(&self) -> Result<u8>;
    fn summary_path(&self) -> Option<&str>;
    fn row_filter(&self) -> RowFilter;
}

pub trait Pipeline {
    fn extract(&self) -> Result<SourceTable>;
    fn transform(&self, table: SourceTable) -> Result<TransformResult>;
    fn load(&self, result: &TransformResult) -> Result<String>;
}
