//! In-memory representation of a loaded dataset.
//!
//! A [`Table`] is built once by the ingestion side and then handed to the
//! refinery behind an `Arc`; nothing downstream mutates it.

/// A single raw cell value, classified but not validated.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Missing,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Classifies a raw field. Surrounding whitespace is ignored and an empty
    /// field is `Missing`. Anything `f64` accepts (including `NaN` and `inf`)
    /// becomes a `Number`; finiteness is checked by whoever consumes the cell.
    pub fn parse(raw: &str) -> Cell {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(number) => Cell::Number(number),
            Err(_) => Cell::Text(trimmed.to_string()),
        }
    }

    pub fn as_finite(&self) -> Option<f64> {
        match self {
            Cell::Number(number) if number.is_finite() => Some(*number),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub group_key: Option<String>,
    pub measure: Cell,
    /// Remaining source columns, in `Table::attribute_columns` order.
    pub attributes: Vec<Cell>,
}

impl Record {
    pub fn new(group_key: impl Into<String>, measure: f64) -> Self {
        Record {
            group_key: Some(group_key.into()),
            measure: Cell::Number(measure),
            attributes: Vec::new(),
        }
    }

    pub fn with_measure(group_key: Option<String>, measure: Cell) -> Self {
        Record {
            group_key,
            measure,
            attributes: Vec::new(),
        }
    }

    /// True when the record carries a group key and a finite measure.
    pub fn is_valid(&self) -> bool {
        self.group_key.is_some() && self.measure.as_finite().is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub group_column: String,
    pub measure_column: String,
    pub attribute_columns: Vec<String>,
    records: Vec<Record>,
}

impl Table {
    pub fn new(group_column: &str, measure_column: &str) -> Self {
        Table {
            group_column: group_column.to_string(),
            measure_column: measure_column.to_string(),
            attribute_columns: Vec::new(),
            records: Vec::new(),
        }
    }

    pub fn from_records(group_column: &str, measure_column: &str, records: Vec<Record>) -> Self {
        Table {
            records,
            ..Table::new(group_column, measure_column)
        }
    }

    pub fn with_attribute_columns(mut self, attribute_columns: Vec<String>) -> Self {
        self.attribute_columns = attribute_columns;
        self
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of source columns this table was loaded from.
    pub fn column_count(&self) -> usize {
        self.attribute_columns.len() + 2
    }

    /// Drops every record that would be rejected by the refinery, returning the
    /// filtered table and how many records were removed.
    pub fn retain_valid(mut self) -> (Table, usize) {
        let before = self.records.len();
        self.records.retain(Record::is_valid);
        let dropped = before - self.records.len();
        (self, dropped)
    }
}
