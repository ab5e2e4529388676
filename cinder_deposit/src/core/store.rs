use crate::core::table::{Cell, Table};
use crate::error::{CinderDepositError, Result};
use rusqlite::types::{ToSqlOutput, Value};
use rusqlite::{Connection, ToSql};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

impl ToSql for Cell {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Cell::Missing => ToSqlOutput::Owned(Value::Null),
            Cell::Number(number) => ToSqlOutput::Owned(Value::Real(*number)),
            Cell::Text(text) => ToSqlOutput::from(text.as_str()),
        })
    }
}

/// SQLite-backed store for loaded tables, queried declaratively.
pub struct TableStore {
    conn: Connection,
}

impl TableStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        debug!("Opened table store at {}", path.as_ref().display());
        Ok(TableStore { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(TableStore {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Stores `table` under `table_name`, replacing any previous table of that
    /// name. Returns the number of rows written.
    pub fn persist(&mut self, table: &Table, table_name: &str) -> Result<usize> {
        validate_table_name(table_name)?;
        check_distinct_columns(table)?;

        let mut columns = vec![
            format!("{} TEXT", quote_identifier(&table.group_column)),
            format!("{} REAL", quote_identifier(&table.measure_column)),
        ];
        columns.extend(table.attribute_columns.iter().map(|c| quote_identifier(c)));

        let placeholders = vec!["?"; table.column_count()].join(", ");
        let insert = format!(
            "INSERT INTO {} VALUES ({})",
            quote_identifier(table_name),
            placeholders
        );

        let tx = self.conn.transaction()?;
        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {name}; CREATE TABLE {name} ({columns});",
            name = quote_identifier(table_name),
            columns = columns.join(", ")
        ))?;
        {
            let mut statement = tx.prepare(&insert)?;
            for record in table.records() {
                let mut values: Vec<&dyn ToSql> = Vec::with_capacity(table.column_count());
                values.push(&record.group_key);
                values.push(&record.measure);
                values.extend(record.attributes.iter().map(|cell| cell as &dyn ToSql));
                statement.execute(values.as_slice())?;
            }
        }
        tx.commit()?;

        info!("Data saved to table '{}' ({} rows).", table_name, table.len());
        Ok(table.len())
    }

    pub fn row_count(&self, table_name: &str) -> Result<usize> {
        validate_table_name(table_name)?;
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", quote_identifier(table_name)),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Mean of `measure_column` per `group_column`, highest mean first.
    pub fn average_by_group(
        &self,
        table_name: &str,
        group_column: &str,
        measure_column: &str,
    ) -> Result<Vec<(String, f64)>> {
        validate_table_name(table_name)?;
        let group = quote_identifier(group_column);
        let query = format!(
            "SELECT {group}, AVG({measure}) AS avg_measure \
             FROM {table} \
             WHERE {group} IS NOT NULL \
             GROUP BY {group} \
             ORDER BY avg_measure DESC",
            group = group,
            measure = quote_identifier(measure_column),
            table = quote_identifier(table_name),
        );
        debug!("Running grouped average query: {}", query);

        let mut statement = self.conn.prepare(&query)?;
        let rows = statement.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, Option<f64>>(1)?))
        })?;

        let mut averages = Vec::new();
        for row in rows {
            if let (key, Some(average)) = row? {
                averages.push((key, average));
            }
        }
        Ok(averages)
    }
}

fn validate_table_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(CinderDepositError::InvalidTableName(name.to_string()))
    }
}

/// SQLite column names are case-insensitive.
fn check_distinct_columns(table: &Table) -> Result<()> {
    let mut seen = HashSet::new();
    let names = [&table.group_column, &table.measure_column]
        .into_iter()
        .chain(table.attribute_columns.iter());
    for name in names {
        if !seen.insert(name.to_lowercase()) {
            return Err(CinderDepositError::ColumnMappingError(format!(
                "column '{}' is defined more than once (column names are case-insensitive)",
                name
            )));
        }
    }
    Ok(())
}

fn quote_identifier(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}
