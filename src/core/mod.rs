pub mod cleaning;
pub mod csv_codec;
pub mod etl;
pub mod pipeline;

pub use crate::domain::model::{CleaningSummary, SourceTable, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
