use polars::prelude::*;

use crate::core::table::{Table, TableKey};
use crate::core::value::Value;

/// Conversion of query results into Polars DataFrames.
pub trait ToDataFrame {
    /// Converts the object into a Polars DataFrame.
    fn to_dataframe(&self) -> PolarsResult<DataFrame>;
}

/// Index columns come first, then one column per field in sorted order.
///
/// A column is `Int64` when every present cell is an integer, `Float64` when every present
/// cell is numeric, `Boolean` when every present cell is a flag, and `String` otherwise.
/// Missing and null cells are nulls.
impl<K: TableKey> ToDataFrame for Table<K> {
    fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let mut columns = Vec::new();

        for (i, name) in K::index_names().iter().enumerate() {
            let cells: Vec<Option<Value>> = self
                .rows()
                .iter()
                .map(|r| r.key.index_values().into_iter().nth(i))
                .collect();
            columns.push(build_column(name, cells.iter().map(Option::as_ref)));
        }

        for name in self.columns() {
            let cells = self.rows().iter().map(|r| r.get(name));
            columns.push(build_column(name, cells));
        }

        DataFrame::new(columns)
    }
}

fn build_column<'a>(name: &str, cells: impl Iterator<Item = Option<&'a Value>>) -> Column {
    let cells: Vec<Option<&Value>> = cells.map(|c| c.filter(|v| !v.is_null())).collect();
    let present = || cells.iter().flatten();

    if present().all(|v| matches!(v, Value::Int(_))) {
        let data: Vec<Option<i64>> = cells.iter().map(|c| c.and_then(Value::as_i64)).collect();
        Column::new(name.into(), data)
    } else if present().all(|v| v.as_f64().is_some()) {
        let data: Vec<Option<f64>> = cells.iter().map(|c| c.and_then(Value::as_f64)).collect();
        Column::new(name.into(), data)
    } else if present().all(|v| matches!(v, Value::Bool(_))) {
        let data: Vec<Option<bool>> = cells.iter().map(|c| c.and_then(Value::as_bool)).collect();
        Column::new(name.into(), data)
    } else {
        let data: Vec<Option<String>> = cells.iter().map(|c| c.map(ToString::to_string)).collect();
        Column::new(name.into(), data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_first_then_sorted_fields() {
        let mut t: Table<String> = Table::new();
        t.upsert(
            "IBM US Equity".into(),
            [
                ("PX_LAST".to_string(), Value::Float(143.73)),
                ("NAME".to_string(), Value::from("IBM")),
            ],
        );
        t.upsert(
            "MSFT US Equity".into(),
            [("PX_LAST".to_string(), Value::Int(170))],
        );

        let df = t.to_dataframe().unwrap();
        let names: Vec<&str> = df.get_column_names().iter().map(|s| s.as_str()).collect();
        assert_eq!(names, ["security", "NAME", "PX_LAST"]);
        assert_eq!(df.height(), 2);
        assert_eq!(df.column("PX_LAST").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("NAME").unwrap().null_count(), 1);
    }
}
