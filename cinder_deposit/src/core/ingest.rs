use crate::core::table::{Cell, Record, Table};
use crate::error::{CinderDepositError, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Names the source columns that play the group key and measure roles.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMapping {
    pub group_column: String,
    pub measure_column: String,
}

impl ColumnMapping {
    pub fn new(group_column: &str, measure_column: &str) -> Self {
        ColumnMapping {
            group_column: group_column.to_string(),
            measure_column: measure_column.to_string(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.group_column.trim().is_empty() {
            return Err(CinderDepositError::ColumnMappingError(
                "group column name is empty".to_string(),
            ));
        }
        if self.measure_column.trim().is_empty() {
            return Err(CinderDepositError::ColumnMappingError(
                "measure column name is empty".to_string(),
            ));
        }
        if self.group_column.trim() == self.measure_column.trim() {
            return Err(CinderDepositError::ColumnMappingError(format!(
                "'{}' cannot be both the group column and the measure column",
                self.group_column
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Utf8,
    Latin1,
}

impl Encoding {
    pub fn decode(&self, bytes: Vec<u8>) -> Result<String> {
        match self {
            Encoding::Utf8 => {
                let mut text = String::from_utf8(bytes)
                    .map_err(|err| CinderDepositError::EncodingError(err.to_string()))?;
                if text.starts_with('\u{feff}') {
                    text.remove(0);
                }
                Ok(text)
            }
            // every byte is the code point of the same value
            Encoding::Latin1 => Ok(bytes.into_iter().map(char::from).collect()),
        }
    }
}

impl FromStr for Encoding {
    type Err = CinderDepositError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(Encoding::Utf8),
            "latin1" | "latin-1" | "iso-8859-1" => Ok(Encoding::Latin1),
            other => Err(CinderDepositError::ConfigError(format!(
                "unsupported encoding: {}",
                other
            ))),
        }
    }
}

/// Loads a delimited file from disk into a [`Table`].
pub fn load_table(
    path: impl AsRef<Path>,
    mapping: &ColumnMapping,
    encoding: Encoding,
) -> Result<Table> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| {
        CinderDepositError::DatasetLoadError(format!("{}: {}", path.display(), err))
    })?;
    let table = read_table(file, mapping, encoding)?;
    info!(
        "Loaded dataset with {} rows and {} columns.",
        table.len(),
        table.column_count()
    );
    Ok(table)
}

pub fn read_table<R: Read>(
    mut reader: R,
    mapping: &ColumnMapping,
    encoding: Encoding,
) -> Result<Table> {
    mapping.validate()?;

    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|err| CinderDepositError::DatasetLoadError(err.to_string()))?;
    let text = encoding.decode(bytes)?;

    let mut csv_reader = csv::ReaderBuilder::new().from_reader(text.as_bytes());
    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|header| header.trim().to_string())
        .collect();

    let position = |column: &str| {
        headers
            .iter()
            .position(|header| header == column.trim())
            .ok_or_else(|| CinderDepositError::MissingColumn(column.to_string()))
    };
    let group_index = position(&mapping.group_column)?;
    let measure_index = position(&mapping.measure_column)?;

    let attribute_indexes: Vec<usize> = (0..headers.len())
        .filter(|index| *index != group_index && *index != measure_index)
        .collect();
    let attribute_columns = attribute_indexes
        .iter()
        .map(|index| headers[*index].clone())
        .collect();

    let mut table = Table::new(&headers[group_index], &headers[measure_index])
        .with_attribute_columns(attribute_columns);

    for row in csv_reader.records() {
        let row = row?;
        let group_key = row
            .get(group_index)
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string);
        let measure = Cell::parse(row.get(measure_index).unwrap_or(""));
        let attributes = attribute_indexes
            .iter()
            .map(|index| Cell::parse(row.get(*index).unwrap_or("")))
            .collect();

        table.push(Record {
            group_key,
            measure,
            attributes,
        });
    }

    debug!(
        "Mapped '{}' as group key and '{}' as measure",
        table.group_column, table.measure_column
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const AMAZON_SAMPLE: &str = "year,state,month,number,date\n\
        1998,Acre,Janeiro,0,1998-01-01\n\
        1999,Acre,Janeiro,10,1999-01-01\n\
        1998,Acre,Fevereiro,4.5,1998-01-01\n";

    fn amazon_mapping() -> ColumnMapping {
        ColumnMapping::new("month", "number")
    }

    #[test]
    fn read_table_maps_columns() {
        let table = read_table(AMAZON_SAMPLE.as_bytes(), &amazon_mapping(), Encoding::Utf8)
            .unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.column_count(), 5);
        assert_eq!(table.attribute_columns, vec!["year", "state", "date"]);
        assert_eq!(table.records()[1].group_key.as_deref(), Some("Janeiro"));
        assert_eq!(table.records()[1].measure, Cell::Number(10.0));
        assert_eq!(table.records()[2].attributes[1], Cell::Text("Acre".to_string()));
    }

    #[test]
    fn read_table_rejects_missing_column() {
        let mapping = ColumnMapping::new("Month", "number");
        let result = read_table(AMAZON_SAMPLE.as_bytes(), &mapping, Encoding::Utf8);

        let err = result.unwrap_err();
        assert_eq!(err, CinderDepositError::MissingColumn("Month".to_string()));
        assert!(err.is_dataset_load_error());
    }

    #[test]
    fn read_table_keeps_malformed_measures_for_the_refinery() {
        let data = "month,number\nJan,\nFeb,many\n,3\n";
        let table = read_table(data.as_bytes(), &amazon_mapping(), Encoding::Utf8).unwrap();

        assert_eq!(table.records()[0].measure, Cell::Missing);
        assert_eq!(table.records()[1].measure, Cell::Text("many".to_string()));
        assert_eq!(table.records()[2].group_key, None);
    }

    #[test]
    fn latin1_decodes_accented_months() {
        // "Março" with a latin-1 encoded c-cedilla
        let mut data = b"month,number\nMar".to_vec();
        data.push(0xe7);
        data.extend_from_slice(b"o,7\n");

        let utf8 = read_table(data.as_slice(), &amazon_mapping(), Encoding::Utf8);
        assert!(matches!(utf8, Err(CinderDepositError::EncodingError(_))));

        let table = read_table(data.as_slice(), &amazon_mapping(), Encoding::Latin1).unwrap();
        assert_eq!(table.records()[0].group_key.as_deref(), Some("Março"));
    }

    #[test]
    fn mapping_validation() {
        assert!(ColumnMapping::new("month", "number").validate().is_ok());
        assert!(ColumnMapping::new("", "number").validate().is_err());
        assert!(ColumnMapping::new("month", "month").validate().is_err());
    }

    #[test]
    fn encoding_from_str() {
        assert_eq!("latin1".parse::<Encoding>().unwrap(), Encoding::Latin1);
        assert_eq!("UTF-8".parse::<Encoding>().unwrap(), Encoding::Utf8);
        assert!("ebcdic".parse::<Encoding>().is_err());
    }

    #[test]
    fn load_table_reports_unreadable_source() {
        let result = load_table("/nonexistent/amazon.csv", &amazon_mapping(), Encoding::Utf8);
        assert!(matches!(result, Err(CinderDepositError::DatasetLoadError(_))));
    }

    #[test]
    fn load_table_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(AMAZON_SAMPLE.as_bytes()).unwrap();

        let table = load_table(file.path(), &amazon_mapping(), Encoding::Latin1).unwrap();
        assert_eq!(table.group_column, "month");
        assert_eq!(table.measure_column, "number");
        assert_eq!(table.len(), 3);
    }
}
