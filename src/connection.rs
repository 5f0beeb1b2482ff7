//! DuckDB connection wrapper holding the comparable-sales table.
//!
//! Sales are appended to a staging table and copied into an in-memory table
//! with a fixed schema, so every query sees typed `DOUBLE` prices and `DATE`
//! sale dates regardless of what the input looked like.

use crate::error::{MarketError, Result};
use crate::models::Sale;
use crate::parse;
use chrono::NaiveDate;
use duckdb::{params, types::ValueRef, Connection as DuckDbConnection};
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Name of the table holding loaded sales.
pub const SALES_TABLE: &str = "sales";

const SALES_SCHEMA: &str = "title VARCHAR, price DOUBLE, date DATE, image_url VARCHAR, \
                            variation VARCHAR, grade VARCHAR, is_graded BOOLEAN";

const STAGING_TABLE: &str = "sales_staging";
const STAGING_SCHEMA: &str = "title VARCHAR, price DOUBLE, date VARCHAR, image_url VARCHAR, \
                              variation VARCHAR, grade VARCHAR, is_graded BOOLEAN";

/// One row of the `sales` table, with title-derived columns filled in.
#[derive(Debug)]
struct SaleRow<'a> {
    title: &'a str,
    price: f64,
    date: NaiveDate,
    image_url: Option<&'a str>,
    variation: String,
    grade: String,
    is_graded: bool,
}

impl<'a> SaleRow<'a> {
    fn from_sale(sale: &'a Sale, base_variation: &str) -> Self {
        Self {
            title: &sale.title,
            price: sale.price,
            date: sale.date,
            image_url: sale.image_url.as_deref(),
            variation: parse::detect_variation(&sale.title)
                .unwrap_or(base_variation)
                .to_string(),
            grade: parse::grade_label(&sale.title),
            is_graded: parse::is_graded(&sale.title),
        }
    }
}

/// Wraps an in-memory DuckDB database and tracks which tables are loaded.
#[derive(Debug)]
pub struct Connection {
    conn: DuckDbConnection,
    loaded_tables: RefCell<HashSet<String>>,
}

impl Connection {
    /// Open an empty in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = DuckDbConnection::open_in_memory()?;
        Ok(Self {
            conn,
            loaded_tables: RefCell::new(HashSet::new()),
        })
    }

    /// Replace the `sales` table with the given sales.
    ///
    /// Titles are parsed once here; the derived `variation`, `grade` and
    /// `is_graded` columns are what the aggregation queries group on.
    /// Sales with a non-finite price are skipped. Returns the number of rows loaded.
    pub fn load_sales(&self, sales: &[Sale], base_variation: &str) -> Result<usize> {
        self.conn.execute_batch(&format!(
            "CREATE OR REPLACE TABLE {} ({})",
            SALES_TABLE, SALES_SCHEMA
        ))?;
        self.loaded_tables
            .borrow_mut()
            .insert(SALES_TABLE.to_string());

        let rows: Vec<SaleRow<'_>> = sales
            .iter()
            .filter(|s| s.price.is_finite())
            .map(|s| SaleRow::from_sale(s, base_variation))
            .collect();

        let skipped = sales.len() - rows.len();
        if skipped > 0 {
            debug!("Skipped {} sales with non-finite prices", skipped);
        }
        if rows.is_empty() {
            info!("Loaded 0 sales into {}", SALES_TABLE);
            return Ok(0);
        }

        // Dates go in as ISO text and are cast once, on the way into the typed table.
        self.conn.execute_batch(&format!(
            "CREATE OR REPLACE TABLE {} ({})",
            STAGING_TABLE, STAGING_SCHEMA
        ))?;
        {
            let mut appender = self.conn.appender(STAGING_TABLE)?;
            for row in &rows {
                appender.append_row(params![
                    row.title,
                    row.price,
                    row.date.format("%Y-%m-%d").to_string(),
                    row.image_url,
                    row.variation,
                    row.grade,
                    row.is_graded,
                ])?;
            }
            appender.flush()?;
        }
        self.conn.execute_batch(&format!(
            "INSERT INTO {} SELECT title, price, CAST(date AS DATE), image_url, variation, grade, is_graded \
             FROM {}; DROP TABLE {}",
            SALES_TABLE, STAGING_TABLE, STAGING_TABLE
        ))?;
        info!("Loaded {} sales into {}", rows.len(), SALES_TABLE);

        Ok(rows.len())
    }

    /// Fail with `NotFound` unless the named table has been loaded.
    pub fn require_table(&self, name: &str) -> Result<()> {
        if self.has_table(name) {
            Ok(())
        } else {
            Err(MarketError::NotFound(format!(
                "table '{}' has not been loaded",
                name
            )))
        }
    }

    /// Execute SQL and return results as a `Vec` of `HashMap`s.
    ///
    /// Each row is represented as a `HashMap<String, serde_json::Value>`.
    pub fn execute(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        let mut stmt = self.conn.prepare(sql)?;

        let param_values: Vec<&dyn duckdb::ToSql> = params
            .iter()
            .map(|p| p as &dyn duckdb::ToSql)
            .collect();

        let mut rows = stmt.query(param_values.as_slice())?;

        // Column metadata is only available once the query has run.
        let (column_names, column_count) = {
            let meta = rows.as_ref().ok_or_else(|| {
                MarketError::NotFound("statement metadata for executed query".to_string())
            })?;
            let names: Vec<String> = meta
                .column_names()
                .into_iter()
                .map(|s| s.to_string())
                .collect();
            (names, meta.column_count())
        };

        let mut out: Vec<HashMap<String, serde_json::Value>> = Vec::new();

        while let Some(row) = rows.next()? {
            let mut map = HashMap::with_capacity(column_count);
            for (i, name) in column_names.iter().enumerate().take(column_count) {
                map.insert(name.clone(), convert_value_ref(row.get_ref(i)?));
            }
            out.push(map);
        }

        Ok(out)
    }

    /// Execute SQL and deserialize each row into type `T`.
    pub fn execute_into<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<T>> {
        let rows = self.execute(sql, params)?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let value = serde_json::Value::Object(row.into_iter().collect());
            results.push(serde_json::from_value(value)?);
        }
        Ok(results)
    }

    /// Execute SQL and return the first column of the first row.
    ///
    /// Returns `None` if the result set is empty.
    pub fn execute_scalar(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Option<serde_json::Value>> {
        let mut stmt = self.conn.prepare(sql)?;
        let param_values: Vec<&dyn duckdb::ToSql> = params
            .iter()
            .map(|p| p as &dyn duckdb::ToSql)
            .collect();

        let mut rows = stmt.query(param_values.as_slice())?;

        if let Some(row) = rows.next()? {
            Ok(Some(convert_value_ref(row.get_ref(0)?)))
        } else {
            Ok(None)
        }
    }

    /// Check whether a table has been loaded.
    pub fn has_table(&self, name: &str) -> bool {
        self.loaded_tables.borrow().contains(name)
    }

    /// Names of all loaded tables, sorted.
    pub fn tables(&self) -> Vec<String> {
        let mut names: Vec<String> = self.loaded_tables.borrow().iter().cloned().collect();
        names.sort();
        names
    }
}

/// Convert a DuckDB `ValueRef` to a `serde_json::Value`.
///
/// `DATE` values become `YYYY-MM-DD` strings so they deserialize straight
/// into `chrono::NaiveDate`.
fn convert_value_ref(val: ValueRef<'_>) -> serde_json::Value {
    match val {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Boolean(b) => serde_json::Value::Bool(b),
        ValueRef::TinyInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::SmallInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::Int(n) => serde_json::Value::Number(n.into()),
        ValueRef::BigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::UBigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::HugeInt(n) => match i64::try_from(n) {
            Ok(i) => serde_json::Value::Number(i.into()),
            Err(_) => serde_json::Value::String(n.to_string()),
        },
        ValueRef::Float(f) => float_value(f as f64),
        ValueRef::Double(f) => float_value(f),
        ValueRef::Text(bytes) => serde_json::Value::String(String::from_utf8_lossy(bytes).to_string()),
        ValueRef::Date32(days) => NaiveDate::from_ymd_opt(1970, 1, 1)
            .and_then(|epoch| epoch.checked_add_signed(chrono::Duration::days(days as i64)))
            .map(|d| serde_json::Value::String(d.format("%Y-%m-%d").to_string()))
            .unwrap_or(serde_json::Value::Null),
        _ => serde_json::Value::Null,
    }
}

fn float_value(f: f64) -> serde_json::Value {
    serde_json::Number::from_f64(f)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}
