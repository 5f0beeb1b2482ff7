//! Comparable-sales queries against the DuckDB `sales` table.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::connection::{Connection, SALES_TABLE};
use crate::error::Result;
use crate::models::{PriceSegment, PriceSummary, Sale};

// ---------------------------------------------------------------------------
// SalesFilter
// ---------------------------------------------------------------------------

/// Filters for sales queries.
///
/// All fields are optional. When `None`, the corresponding filter is skipped.
/// Every value is bound as a `?` parameter, never interpolated.
#[derive(Debug, Clone, Default)]
pub struct SalesFilter {
    pub variation: Option<String>,
    /// Grade label as stored, e.g. `"PSA 10"` or `"Raw"`.
    pub grade: Option<String>,
    pub graded: Option<bool>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub limit: Option<usize>,
}

impl SalesFilter {
    /// Filter to a single variation.
    pub fn variation(name: &str) -> Self {
        Self {
            variation: Some(name.to_string()),
            ..Self::default()
        }
    }

    /// Build the `WHERE` clause (empty when no filter is set) and its params.
    pub fn where_sql(&self) -> (String, Vec<String>) {
        let mut clauses: Vec<&str> = Vec::new();
        let mut params: Vec<String> = Vec::new();

        if let Some(ref v) = self.variation {
            clauses.push("variation = ?");
            params.push(v.clone());
        }
        if let Some(ref g) = self.grade {
            clauses.push("grade = ?");
            params.push(g.clone());
        }
        if let Some(graded) = self.graded {
            clauses.push("is_graded = CAST(? AS BOOLEAN)");
            params.push(graded.to_string());
        }
        if let Some(from) = self.date_from {
            clauses.push("date >= CAST(? AS DATE)");
            params.push(from.to_string());
        }
        if let Some(to) = self.date_to {
            clauses.push("date <= CAST(? AS DATE)");
            params.push(to.to_string());
        }
        if let Some(min) = self.min_price {
            clauses.push("price >= CAST(? AS DOUBLE)");
            params.push(min.to_string());
        }
        if let Some(max) = self.max_price {
            clauses.push("price <= CAST(? AS DOUBLE)");
            params.push(max.to_string());
        }

        if clauses.is_empty() {
            (String::new(), params)
        } else {
            (format!("WHERE {}", clauses.join(" AND ")), params)
        }
    }
}

// ---------------------------------------------------------------------------
// SalesQuery
// ---------------------------------------------------------------------------

/// Query interface over loaded comparable sales.
pub struct SalesQuery<'a> {
    conn: &'a Connection,
}

impl<'a> SalesQuery<'a> {
    /// Create a new `SalesQuery` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Number of sales matching the filter.
    pub fn count(&self, filter: &SalesFilter) -> Result<u64> {
        self.conn.require_table(SALES_TABLE)?;
        let (where_sql, params) = filter.where_sql();
        let sql = format!("SELECT COUNT(*) FROM {} {}", SALES_TABLE, where_sql);
        let value = self.conn.execute_scalar(&sql, &params)?;
        Ok(value.and_then(|v| v.as_u64()).unwrap_or(0))
    }

    /// Sales matching the filter, oldest first.
    pub fn history(&self, filter: &SalesFilter) -> Result<Vec<Sale>> {
        self.conn.require_table(SALES_TABLE)?;
        let (where_sql, params) = filter.where_sql();
        let mut sql = format!(
            "SELECT title, price, CAST(date AS VARCHAR) AS date, image_url \
             FROM {} {} ORDER BY date ASC, title ASC",
            SALES_TABLE, where_sql
        );
        if let Some(n) = filter.limit {
            sql.push_str(&format!(" LIMIT {}", n));
        }
        self.conn.execute_into(&sql, &params)
    }

    /// The most recent sale matching the filter.
    pub fn latest(&self, filter: &SalesFilter) -> Result<Option<Sale>> {
        self.conn.require_table(SALES_TABLE)?;
        let (where_sql, params) = filter.where_sql();
        let sql = format!(
            "SELECT title, price, CAST(date AS VARCHAR) AS date, image_url \
             FROM {} {} ORDER BY date DESC, title ASC LIMIT 1",
            SALES_TABLE, where_sql
        );
        let rows: Vec<Sale> = self.conn.execute_into(&sql, &params)?;
        Ok(rows.into_iter().next())
    }

    /// Variation labels with their sale counts, most common first.
    ///
    /// Ties are ordered by label so the first entry is deterministic.
    pub fn variations(&self) -> Result<Vec<(String, u64)>> {
        self.conn.require_table(SALES_TABLE)?;
        let sql = format!(
            "SELECT variation, COUNT(*) AS sales FROM {} \
             GROUP BY variation ORDER BY sales DESC, variation ASC",
            SALES_TABLE
        );
        let rows = self.conn.execute(&sql, &[])?;
        Ok(rows
            .into_iter()
            .filter_map(|r| {
                let name = r.get("variation").and_then(|v| v.as_str())?.to_string();
                let count = r.get("sales").and_then(|v| v.as_u64()).unwrap_or(0);
                Some((name, count))
            })
            .collect())
    }

    /// Aggregate statistics over every matching sale.
    pub fn price_summary(&self, filter: &SalesFilter) -> Result<PriceSummary> {
        self.conn.require_table(SALES_TABLE)?;
        let (where_sql, params) = filter.where_sql();
        let sql = format!(
            "WITH clean AS (SELECT * FROM {} {}) {}",
            SALES_TABLE,
            where_sql,
            SUMMARY_SELECT
        );
        self.first_summary(&sql, &params)
    }

    /// Aggregate statistics after dropping prices outside the IQR fences.
    ///
    /// Fences are `Q1 - fence * IQR` and `Q3 + fence * IQR`, with quartiles
    /// interpolated linearly between sales.
    pub fn clean_summary(&self, filter: &SalesFilter, fence: f64) -> Result<PriceSummary> {
        self.conn.require_table(SALES_TABLE)?;
        let (cte, params) = clean_cte(filter, fence);
        let sql = format!("{} {}", cte, SUMMARY_SELECT);
        self.first_summary(&sql, &params)
    }

    /// Over the outlier-free set: how many sales fall on or after `cutoff`,
    /// and the average price of the sales before it.
    pub fn recent_split(
        &self,
        filter: &SalesFilter,
        fence: f64,
        cutoff: NaiveDate,
    ) -> Result<(u64, Option<f64>)> {
        self.conn.require_table(SALES_TABLE)?;
        let (cte, mut params) = clean_cte(filter, fence);
        let sql = format!(
            "{} SELECT \
               COUNT(*) FILTER (WHERE date >= CAST(? AS DATE)) AS recent_count, \
               AVG(price) FILTER (WHERE date < CAST(? AS DATE)) AS older_avg \
             FROM clean",
            cte
        );
        params.push(cutoff.to_string());
        params.push(cutoff.to_string());

        let rows = self.conn.execute(&sql, &params)?;
        let row = rows.into_iter().next();
        let recent = row
            .as_ref()
            .and_then(|r| r.get("recent_count"))
            .and_then(|v| v.as_u64())
            .unwrap_or(0);
        let older_avg = row
            .as_ref()
            .and_then(|r| r.get("older_avg"))
            .and_then(|v| v.as_f64());
        Ok((recent, older_avg))
    }

    /// Over the outlier-free set: sale count and average price on or after `since`.
    pub fn window(
        &self,
        filter: &SalesFilter,
        fence: f64,
        since: NaiveDate,
    ) -> Result<(u64, Option<f64>)> {
        self.conn.require_table(SALES_TABLE)?;
        let (cte, mut params) = clean_cte(filter, fence);
        let sql = format!(
            "{} SELECT COUNT(*) AS sales_volume, AVG(price) AS avg_price \
             FROM clean WHERE date >= CAST(? AS DATE)",
            cte
        );
        params.push(since.to_string());

        let rows = self.conn.execute(&sql, &params)?;
        let row = rows.into_iter().next();
        let volume = row
            .as_ref()
            .and_then(|r| r.get("sales_volume"))
            .and_then(|v| v.as_u64())
            .unwrap_or(0);
        let avg = row
            .as_ref()
            .and_then(|r| r.get("avg_price"))
            .and_then(|v| v.as_f64());
        Ok((volume, avg))
    }

    /// Split the outlier-free set into `labels.len()` equal-count price buckets.
    ///
    /// Buckets are filled cheapest first and sized as evenly as possible, with
    /// earlier buckets taking the remainder. Returns nothing when there are
    /// fewer sales than buckets.
    pub fn segments(
        &self,
        filter: &SalesFilter,
        fence: f64,
        labels: &[&str],
    ) -> Result<Vec<PriceSegment>> {
        self.conn.require_table(SALES_TABLE)?;
        if labels.is_empty() {
            return Ok(Vec::new());
        }
        let (cte, params) = clean_cte(filter, fence);
        let sql = format!(
            "{}, seg AS (SELECT price, NTILE({}) OVER (ORDER BY price, date, title) AS bucket FROM clean) \
             SELECT bucket, MIN(price) AS low_price, MAX(price) AS high_price, \
                    AVG(price) AS avg_price, COUNT(*) AS sales_volume \
             FROM seg GROUP BY bucket ORDER BY bucket",
            cte,
            labels.len()
        );
        let rows = self.conn.execute(&sql, &params)?;

        let total: u64 = rows
            .iter()
            .filter_map(|r| r.get("sales_volume").and_then(|v| v.as_u64()))
            .sum();
        if total < labels.len() as u64 {
            return Ok(Vec::new());
        }

        Ok(rows
            .into_iter()
            .filter_map(|r| {
                let bucket = r.get("bucket").and_then(|v| v.as_u64())?;
                let label = labels.get(usize::try_from(bucket).ok()?.checked_sub(1)?)?;
                let volume = r.get("sales_volume").and_then(|v| v.as_u64())?;
                Some(PriceSegment {
                    label: label.to_string(),
                    low_price: r.get("low_price").and_then(|v| v.as_f64())?,
                    high_price: r.get("high_price").and_then(|v| v.as_f64())?,
                    avg_price: r.get("avg_price").and_then(|v| v.as_f64())?,
                    sales_volume: volume,
                    market_share: volume as f64 / total as f64 * 100.0,
                })
            })
            .collect())
    }

    /// Median price per grade label (outliers included).
    pub fn grade_medians(&self, filter: &SalesFilter) -> Result<BTreeMap<String, f64>> {
        self.conn.require_table(SALES_TABLE)?;
        let (where_sql, params) = filter.where_sql();
        let sql = format!(
            "SELECT grade, MEDIAN(price) AS median_price FROM {} {} \
             GROUP BY grade ORDER BY grade",
            SALES_TABLE, where_sql
        );
        let rows = self.conn.execute(&sql, &params)?;
        Ok(rows
            .into_iter()
            .filter_map(|r| {
                let grade = r.get("grade").and_then(|v| v.as_str())?.to_string();
                let median = r.get("median_price").and_then(|v| v.as_f64())?;
                Some((grade, median))
            })
            .collect())
    }

    /// Whether any matching sale mentions a grading company.
    pub fn has_graded(&self, filter: &SalesFilter) -> Result<bool> {
        self.conn.require_table(SALES_TABLE)?;
        let (where_sql, params) = filter.where_sql();
        let sql = format!(
            "SELECT COALESCE(BOOL_OR(is_graded), FALSE) FROM {} {}",
            SALES_TABLE, where_sql
        );
        let value = self.conn.execute_scalar(&sql, &params)?;
        Ok(value.and_then(|v| v.as_bool()).unwrap_or(false))
    }

    fn first_summary(&self, sql: &str, params: &[String]) -> Result<PriceSummary> {
        let rows: Vec<PriceSummary> = self.conn.execute_into(sql, params)?;
        Ok(rows.into_iter().next().unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const SUMMARY_SELECT: &str = "SELECT \
    COUNT(*) AS total_sales, \
    MEDIAN(price) AS median_price, \
    AVG(price) AS avg_price, \
    STDDEV_SAMP(price) AS std_price, \
    MIN(price) AS low_price, \
    MAX(price) AS high_price, \
    CAST(MIN(date) AS VARCHAR) AS first_date, \
    CAST(MAX(date) AS VARCHAR) AS last_date \
    FROM clean";

/// `WITH grp, fence, clean` prefix selecting the outlier-free sales.
fn clean_cte(filter: &SalesFilter, fence: f64) -> (String, Vec<String>) {
    let (where_sql, mut params) = filter.where_sql();
    let sql = format!(
        "WITH grp AS (SELECT * FROM {} {}), \
         fence AS (SELECT QUANTILE_CONT(price, 0.25) AS q1, QUANTILE_CONT(price, 0.75) AS q3 FROM grp), \
         clean AS (SELECT grp.* FROM grp, fence \
                   WHERE grp.price >= fence.q1 - CAST(? AS DOUBLE) * (fence.q3 - fence.q1) \
                     AND grp.price <= fence.q3 + CAST(? AS DOUBLE) * (fence.q3 - fence.q1))",
        SALES_TABLE, where_sql
    );
    params.push(fence.to_string());
    params.push(fence.to_string());
    (sql, params)
}
