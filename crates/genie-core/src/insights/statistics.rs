//! Descriptive statistics for numeric columns

use serde::Serialize;

use crate::schema::Schema;
use crate::table::{Table, Value};

/// Aggregate summary of one numeric column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStat {
    pub name: String,
    /// Number of present values
    pub count: usize,
    pub sum: f64,
    pub mean: f64,
    pub max: f64,
    pub min: f64,
}

impl ColumnStat {
    fn from_values(name: &str, values: impl Iterator<Item = f64>) -> Option<Self> {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut max = f64::NEG_INFINITY;
        let mut min = f64::INFINITY;

        for v in values {
            count += 1;
            sum += v;
            max = max.max(v);
            min = min.min(v);
        }

        (count > 0).then(|| ColumnStat {
            name: name.to_string(),
            count,
            sum,
            mean: sum / count as f64,
            max,
            min,
        })
    }
}

/// Column name → statistics, in table column order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Statistics {
    columns: Vec<ColumnStat>,
}

impl Statistics {
    pub fn get(&self, column: &str) -> Option<&ColumnStat> {
        self.columns.iter().find(|c| c.name == column)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColumnStat> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(|c| c.name.as_str())
    }
}

impl<'a> IntoIterator for &'a Statistics {
    type Item = &'a ColumnStat;
    type IntoIter = std::slice::Iter<'a, ColumnStat>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

/// Compute statistics for every numeric column.
///
/// A table without numeric columns yields an empty result.
pub fn compute_statistics(table: &Table) -> Statistics {
    compute_with_schema(table, &Schema::resolve(table))
}

pub(crate) fn compute_with_schema(table: &Table, schema: &Schema) -> Statistics {
    let columns = schema
        .numeric_columns()
        .filter_map(|col| {
            ColumnStat::from_values(
                &col.name,
                table.column_values(col.index).filter_map(Value::as_number),
            )
        })
        .collect();
    Statistics { columns }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_statistics() {
        let table = Table::from_rows(
            vec!["Region", "Sales", "Units"],
            vec![
                vec!["A".into(), 100.0.into(), 3.0.into()],
                vec!["B".into(), 200.0.into(), Value::Missing],
                vec!["C".into(), (-50.0).into(), 1.0.into()],
            ],
        )
        .unwrap();

        let stats = compute_statistics(&table);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats.column_names().collect::<Vec<_>>(), vec!["Sales", "Units"]);

        let sales = stats.get("Sales").unwrap();
        assert_eq!(sales.count, 3);
        assert_eq!(sales.sum, 250.0);
        assert_eq!(sales.max, 200.0);
        assert_eq!(sales.min, -50.0);

        // Missing values are not counted
        let units = stats.get("Units").unwrap();
        assert_eq!(units.count, 2);
        assert_eq!(units.mean, 2.0);
    }

    #[test]
    fn test_no_numeric_columns_is_empty() {
        let table = Table::from_rows(vec!["Name"], vec![vec!["x".into()]]).unwrap();
        let stats = compute_statistics(&table);
        assert!(stats.is_empty());
        assert!(stats.get("Name").is_none());
    }

    #[test]
    fn test_mean_matches_definition() {
        let values = [0.1, 0.2, 0.3, 1e6, -3.75, 42.0, 7.125];
        let rows = values.iter().map(|v| vec![Value::Number(*v)]).collect();
        let table = Table::from_rows(vec!["v"], rows).unwrap();

        let expected = values.iter().sum::<f64>() / values.len() as f64;
        let mean = compute_statistics(&table).get("v").unwrap().mean;
        assert!(((mean - expected) / expected).abs() < 1e-9);
    }

    #[test]
    fn test_serializes_in_column_order() {
        let table = Table::from_rows(
            vec!["b", "a"],
            vec![vec![1.0.into(), 2.0.into()]],
        )
        .unwrap();
        let json = serde_json::to_value(compute_statistics(&table)).unwrap();
        assert_eq!(json[0]["name"], "b");
        assert_eq!(json[1]["name"], "a");
    }
}
