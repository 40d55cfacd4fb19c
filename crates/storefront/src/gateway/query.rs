//! Read query descriptor.
//!
//! A query names a table and carries equality / is-null filters, an optional
//! ordering and an optional limit. [`Query::to_pairs`] encodes it the way
//! `PostgREST` expects; [`Query::matches`] and [`Query::apply`] evaluate it in
//! memory.

use std::cmp::Ordering;

use super::Row;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// A row filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Column equals the value (compared in its textual form).
    Eq { column: String, value: String },
    /// Column is null or absent.
    IsNull { column: String },
}

/// Ordering key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub direction: Direction,
}

/// A table read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    table: String,
    filters: Vec<Filter>,
    order: Option<Order>,
    limit: Option<usize>,
}

impl Query {
    /// Select every column of `table`.
    #[must_use]
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    /// Keep rows where `column` equals `value`.
    #[must_use]
    pub fn eq(mut self, column: impl Into<String>, value: impl ToString) -> Self {
        self.filters.push(Filter::Eq {
            column: column.into(),
            value: value.to_string(),
        });
        self
    }

    /// Keep rows where `column` is null.
    #[must_use]
    pub fn is_null(mut self, column: impl Into<String>) -> Self {
        self.filters.push(Filter::IsNull {
            column: column.into(),
        });
        self
    }

    /// Sort by `column`.
    #[must_use]
    pub fn order(mut self, column: impl Into<String>, direction: Direction) -> Self {
        self.order = Some(Order {
            column: column.into(),
            direction,
        });
        self
    }

    /// Return at most `limit` rows.
    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The table name.
    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// The filters, in the order they were added.
    #[must_use]
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Encode as `PostgREST` query-string pairs.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_string(), "*".to_string())];
        for filter in &self.filters {
            match filter {
                Filter::Eq { column, value } => {
                    pairs.push((column.clone(), format!("eq.{value}")));
                }
                Filter::IsNull { column } => {
                    pairs.push((column.clone(), "is.null".to_string()));
                }
            }
        }
        if let Some(order) = &self.order {
            pairs.push((
                "order".to_string(),
                format!("{}.{}", order.column, order.direction.as_str()),
            ));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }

    /// Whether `row` passes every filter.
    #[must_use]
    pub fn matches(&self, row: &Row) -> bool {
        self.filters.iter().all(|filter| match filter {
            Filter::Eq { column, value } => {
                row.get(column).and_then(scalar_text).as_deref() == Some(value.as_str())
            }
            Filter::IsNull { column } => row.get(column).is_none_or(Row::is_null),
        })
    }

    /// Filter, sort and truncate `rows` the way the backend would.
    #[must_use]
    pub fn apply<'a>(&self, rows: impl IntoIterator<Item = &'a Row>) -> Vec<Row> {
        let mut selected: Vec<Row> = rows
            .into_iter()
            .filter(|row| self.matches(row))
            .cloned()
            .collect();

        if let Some(order) = &self.order {
            // Stable sort keeps insertion order among equal keys.
            selected.sort_by(|a, b| {
                let ordering = compare_values(a.get(&order.column), b.get(&order.column));
                match order.direction {
                    Direction::Ascending => ordering,
                    Direction::Descending => ordering.reverse(),
                }
            });
        }

        if let Some(limit) = self.limit {
            selected.truncate(limit);
        }
        selected
    }
}

/// Textual form of a scalar JSON value; `None` for null, arrays and objects.
fn scalar_text(value: &Row) -> Option<String> {
    match value {
        Row::String(s) => Some(s.clone()),
        Row::Number(n) => Some(n.to_string()),
        Row::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Nulls sort first, numbers numerically, everything else by text.
fn compare_values(a: Option<&Row>, b: Option<&Row>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Row::Number(x)), Some(Row::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(x), Some(y)) => scalar_text(x).cmp(&scalar_text(y)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_pairs() {
        let query = Query::table("reviews")
            .is_null("product_id")
            .eq("user_id", "u-1")
            .order("created_at", Direction::Descending)
            .limit(10);

        assert_eq!(
            query.to_pairs(),
            vec![
                ("select".to_string(), "*".to_string()),
                ("product_id".to_string(), "is.null".to_string()),
                ("user_id".to_string(), "eq.u-1".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
                ("limit".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn test_matches_eq_compares_text() {
        let row = json!({"sort_order": 2, "section": "hero"});
        assert!(Query::table("t").eq("sort_order", 2).matches(&row));
        assert!(Query::table("t").eq("section", "hero").matches(&row));
        assert!(!Query::table("t").eq("section", "about").matches(&row));
    }

    #[test]
    fn test_matches_is_null_accepts_missing() {
        assert!(Query::table("t").is_null("product_id").matches(&json!({})));
        assert!(
            Query::table("t")
                .is_null("product_id")
                .matches(&json!({"product_id": null}))
        );
        assert!(
            !Query::table("t")
                .is_null("product_id")
                .matches(&json!({"product_id": "p-1"}))
        );
    }

    #[test]
    fn test_apply_orders_and_limits() {
        let rows = [
            json!({"name": "b", "sort_order": 2}),
            json!({"name": "c", "sort_order": 10}),
            json!({"name": "a", "sort_order": 1}),
        ];

        let asc = Query::table("t")
            .order("sort_order", Direction::Ascending)
            .apply(&rows);
        let names: Vec<_> = asc.iter().map(|r| r["name"].as_str().unwrap()).collect();
        assert_eq!(names, ["a", "b", "c"]);

        let desc = Query::table("t")
            .order("sort_order", Direction::Descending)
            .limit(2)
            .apply(&rows);
        let names: Vec<_> = desc.iter().map(|r| r["name"].as_str().unwrap()).collect();
        assert_eq!(names, ["c", "b"]);
    }
}
