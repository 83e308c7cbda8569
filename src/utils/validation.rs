use crate::utils::error::{EtlError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_distinct_paths(input: &str, output: &str, summary: Option<&str>) -> Result<()> {
    if input == output {
        return Err(EtlError::InvalidConfigValueError {
            field: "output".to_string(),
            value: output.to_string(),
            reason: "Output path must differ from the input path".to_string(),
        });
    }

    if let Some(summary) = summary {
        if summary == input || summary == output {
            return Err(EtlError::InvalidConfigValueError {
                field: "summary".to_string(),
                value: summary.to_string(),
                reason: "Summary path must differ from the input and output paths".to_string(),
            });
        }
    }
    Ok(())
}

/// The csv reader only accepts a single ASCII byte as field separator.
pub fn validate_delimiter(field_name: &str, delimiter: char) -> Result<u8> {
    if !delimiter.is_ascii() || delimiter == '"' || delimiter == '\n' || delimiter == '\r' {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: delimiter.to_string(),
            reason: "Delimiter must be a single ASCII character other than quote or newline"
                .to_string(),
        });
    }
    Ok(delimiter as u8)
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_non_negative(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be a finite number >= 0".to_string(),
        });
    }
    Ok(())
}

pub fn validate_amount_bounds(min: Option<f64>, max: Option<f64>) -> Result<()> {
    if let Some(min) = min {
        validate_non_negative("min_amount", min)?;
    }
    if let Some(max) = max {
        validate_non_negative("max_amount", max)?;
    }
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(EtlError::InvalidConfigValueError {
                field: "min_amount".to_string(),
                value: min.to_string(),
                reason: format!("Value must not exceed max_amount ({})", max),
            });
        }
    }
    Ok(())
}
