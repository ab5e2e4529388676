use crate::core::ingest::{ColumnMapping, Encoding};
use crate::error::{CinderDepositError, Result};
use serde::Deserialize;

fn default_encoding() -> String {
    "utf-8".to_string()
}

fn default_table() -> String {
    "forestfires".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct DepositConfig {
    #[serde(rename = "dataset.path")]
    pub dataset_path: String,

    #[serde(rename = "dataset.encoding", default = "default_encoding")]
    pub dataset_encoding: String,

    #[serde(rename = "column.group")]
    pub group_column: String,

    #[serde(rename = "column.measure")]
    pub measure_column: String,

    #[serde(rename = "database.path")]
    pub database_path: String,

    #[serde(rename = "database.table", default = "default_table")]
    pub database_table: String,
}

impl DepositConfig {
    pub fn from_xml_file(file_path: &str) -> Result<Self> {
        let xml_str = std::fs::read_to_string(file_path)
            .map_err(|err| CinderDepositError::ConfigError(format!("{}: {}", file_path, err)))?;
        Self::from_xml_str(&xml_str)
    }

    pub fn from_xml_str(xml_str: &str) -> Result<Self> {
        let config: DepositConfig = serde_xml_rs::from_str(xml_str)?;
        config.column_mapping().validate()?;
        config.encoding()?;
        Ok(config)
    }

    pub fn column_mapping(&self) -> ColumnMapping {
        ColumnMapping::new(&self.group_column, &self.measure_column)
    }

    pub fn encoding(&self) -> Result<Encoding> {
        self.dataset_encoding.parse()
    }
}
