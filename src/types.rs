//! Schema-less result rows.
//!
//! Query text is arbitrary, so result shape is determined entirely at query
//! time from the executed statement's projection. Rows are ordered mappings
//! from column name to value; column order follows the projection order.

use std::any::type_name;

use arrow_array::{
    Array, ArrayRef, BinaryArray, BooleanArray, Date32Array, Float32Array, Float64Array,
    Int16Array, Int32Array, Int64Array, Int8Array, LargeBinaryArray, LargeStringArray,
    StringArray, Time64MicrosecondArray, TimestampMicrosecondArray, TimestampMillisecondArray,
    TimestampNanosecondArray, TimestampSecondArray, UInt16Array, UInt32Array, UInt64Array,
    UInt8Array,
};
use arrow_cast::display::{ArrayFormatter, FormatOptions};
use arrow_schema::{DataType, TimeUnit};
use duckdb::types::{TimeUnit as DuckTimeUnit, Value};

use crate::engine::QueryResult;
use crate::error::WorkbenchError;

/// One result row: column name → value, in projection order.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    cells: Vec<(String, Value)>,
}

impl Row {
    pub fn new(cells: Vec<(String, Value)>) -> Self {
        Self { cells }
    }

    /// Look up a cell by column name.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Iterate cells in projection order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.cells.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Result of one query execution. Produced fresh per call; superseded
/// wholesale by the next query's result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl ResultSet {
    /// Flatten an arrow query result into ordered row mappings.
    pub fn from_query_result(result: &QueryResult) -> Result<Self, WorkbenchError> {
        let columns: Vec<String> = result
            .schema
            .fields()
            .iter()
            .map(|field| field.name().clone())
            .collect();

        let mut rows = Vec::with_capacity(result.total_rows);
        for batch in &result.batches {
            let batch_columns: Vec<Vec<Value>> = batch
                .columns()
                .iter()
                .map(arrow_column_to_values)
                .collect::<Result<_, _>>()?;

            for row_idx in 0..batch.num_rows() {
                let cells = columns
                    .iter()
                    .zip(batch_columns.iter())
                    .map(|(name, values)| (name.clone(), values[row_idx].clone()))
                    .collect();
                rows.push(Row::new(cells));
            }
        }

        Ok(Self { columns, rows })
    }

    pub fn total_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Convert one arrow column to DuckDB values.
///
/// Covers the types DuckDB commonly produces for Parquet-backed tables; any
/// other type falls back to arrow's display formatting as text, so arbitrary
/// projections never fail conversion outright.
pub fn arrow_column_to_values(array: &ArrayRef) -> Result<Vec<Value>, WorkbenchError> {
    let mut values = Vec::with_capacity(array.len());

    macro_rules! push_values {
        ($arr_type:ty, $variant:path) => {{
            let arr = downcast_array::<$arr_type>(array)?;
            for idx in 0..arr.len() {
                if arr.is_null(idx) {
                    values.push(Value::Null);
                } else {
                    values.push($variant(arr.value(idx)));
                }
            }
        }};
        ($arr_type:ty, $variant:path, $conv:ident) => {{
            let arr = downcast_array::<$arr_type>(array)?;
            for idx in 0..arr.len() {
                if arr.is_null(idx) {
                    values.push(Value::Null);
                } else {
                    values.push($variant(arr.value(idx).$conv()));
                }
            }
        }};
    }
    macro_rules! push_timestamp_values {
        ($arr_type:ty, $duck_unit:expr) => {{
            let arr = downcast_array::<$arr_type>(array)?;
            for idx in 0..arr.len() {
                if arr.is_null(idx) {
                    values.push(Value::Null);
                } else {
                    values.push(Value::Timestamp($duck_unit, arr.value(idx)));
                }
            }
        }};
    }

    match array.data_type() {
        DataType::Null => {
            for _ in 0..array.len() {
                values.push(Value::Null);
            }
        }
        DataType::Boolean => push_values!(BooleanArray, Value::Boolean),
        DataType::Int8 => push_values!(Int8Array, Value::TinyInt),
        DataType::Int16 => push_values!(Int16Array, Value::SmallInt),
        DataType::Int32 => push_values!(Int32Array, Value::Int),
        DataType::Int64 => push_values!(Int64Array, Value::BigInt),
        DataType::UInt8 => push_values!(UInt8Array, Value::UTinyInt),
        DataType::UInt16 => push_values!(UInt16Array, Value::USmallInt),
        DataType::UInt32 => push_values!(UInt32Array, Value::UInt),
        DataType::UInt64 => push_values!(UInt64Array, Value::UBigInt),
        DataType::Float32 => push_values!(Float32Array, Value::Float),
        DataType::Float64 => push_values!(Float64Array, Value::Double),
        DataType::Utf8 => push_values!(StringArray, Value::Text, to_string),
        DataType::LargeUtf8 => push_values!(LargeStringArray, Value::Text, to_string),
        DataType::Binary => push_values!(BinaryArray, Value::Blob, to_vec),
        DataType::LargeBinary => push_values!(LargeBinaryArray, Value::Blob, to_vec),
        DataType::Date32 => push_values!(Date32Array, Value::Date32),
        DataType::Time64(TimeUnit::Microsecond) => {
            let arr = downcast_array::<Time64MicrosecondArray>(array)?;
            for idx in 0..arr.len() {
                if arr.is_null(idx) {
                    values.push(Value::Null);
                } else {
                    values.push(Value::Time64(DuckTimeUnit::Microsecond, arr.value(idx)));
                }
            }
        }
        DataType::Timestamp(unit, _tz) => match unit {
            TimeUnit::Second => {
                push_timestamp_values!(TimestampSecondArray, DuckTimeUnit::Second)
            }
            TimeUnit::Millisecond => {
                push_timestamp_values!(TimestampMillisecondArray, DuckTimeUnit::Millisecond)
            }
            TimeUnit::Microsecond => {
                push_timestamp_values!(TimestampMicrosecondArray, DuckTimeUnit::Microsecond)
            }
            TimeUnit::Nanosecond => {
                push_timestamp_values!(TimestampNanosecondArray, DuckTimeUnit::Nanosecond)
            }
        },
        _ => return fallback_display_values(array),
    }

    Ok(values)
}

/// Format every cell through arrow's display path. Used for types with no
/// direct DuckDB value mapping (lists, structs, decimals, ...).
fn fallback_display_values(array: &ArrayRef) -> Result<Vec<Value>, WorkbenchError> {
    let options = FormatOptions::default();
    let formatter = ArrayFormatter::try_new(array.as_ref(), &options)?;

    let mut values = Vec::with_capacity(array.len());
    for idx in 0..array.len() {
        if array.is_null(idx) {
            values.push(Value::Null);
        } else {
            values.push(Value::Text(formatter.value(idx).to_string()));
        }
    }
    Ok(values)
}

fn downcast_array<T: 'static>(array: &ArrayRef) -> Result<&T, WorkbenchError> {
    array.as_any().downcast_ref::<T>().ok_or_else(|| {
        WorkbenchError::UnsupportedType(format!(
            "expected {} but found {}",
            type_name::<T>(),
            array.data_type()
        ))
    })
}

/// Render a value for tabular display.
pub fn value_to_display(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Boolean(v) => v.to_string(),
        Value::TinyInt(v) => v.to_string(),
        Value::SmallInt(v) => v.to_string(),
        Value::Int(v) => v.to_string(),
        Value::BigInt(v) => v.to_string(),
        Value::HugeInt(v) => v.to_string(),
        Value::UTinyInt(v) => v.to_string(),
        Value::USmallInt(v) => v.to_string(),
        Value::UInt(v) => v.to_string(),
        Value::UBigInt(v) => v.to_string(),
        Value::Float(v) => v.to_string(),
        Value::Double(v) => v.to_string(),
        Value::Text(v) => v.clone(),
        Value::Blob(v) => format!("<{} bytes>", v.len()),
        other => format!("{:?}", other),
    }
}

/// Extract a non-negative count from a value, for `count(*)` projections.
pub fn value_as_count(value: &Value) -> Option<u64> {
    match value {
        Value::TinyInt(v) => u64::try_from(*v).ok(),
        Value::SmallInt(v) => u64::try_from(*v).ok(),
        Value::Int(v) => u64::try_from(*v).ok(),
        Value::BigInt(v) => u64::try_from(*v).ok(),
        Value::HugeInt(v) => u64::try_from(*v).ok(),
        Value::UTinyInt(v) => Some(u64::from(*v)),
        Value::USmallInt(v) => Some(u64::from(*v)),
        Value::UInt(v) => Some(u64::from(*v)),
        Value::UBigInt(v) => Some(*v),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn row_lookup_preserves_projection_order() {
        let row = Row::new(vec![
            ("b".to_string(), Value::Int(2)),
            ("a".to_string(), Value::Int(1)),
        ]);
        let names: Vec<&str> = row.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(row.get("a"), Some(&Value::Int(1)));
        assert_eq!(row.get("missing"), None);
    }

    #[test]
    fn int64_column_converts_with_nulls() {
        let array: ArrayRef = Arc::new(Int64Array::from(vec![Some(7), None]));
        let values = arrow_column_to_values(&array).expect("should convert");
        assert_eq!(values, vec![Value::BigInt(7), Value::Null]);
    }

    #[test]
    fn utf8_column_converts_to_text() {
        let array: ArrayRef = Arc::new(StringArray::from(vec![Some("hi"), None]));
        let values = arrow_column_to_values(&array).expect("should convert");
        assert_eq!(
            values,
            vec![Value::Text("hi".to_string()), Value::Null]
        );
    }

    #[test]
    fn display_renders_null_and_scalars() {
        assert_eq!(value_to_display(&Value::Null), "NULL");
        assert_eq!(value_to_display(&Value::BigInt(42)), "42");
        assert_eq!(value_to_display(&Value::Text("x".to_string())), "x");
    }

    #[test]
    fn counts_extract_from_integer_widths() {
        assert_eq!(value_as_count(&Value::BigInt(42)), Some(42));
        assert_eq!(value_as_count(&Value::UBigInt(1)), Some(1));
        assert_eq!(value_as_count(&Value::BigInt(-1)), None);
        assert_eq!(value_as_count(&Value::Text("42".to_string())), None);
    }
}
