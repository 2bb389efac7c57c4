//! Categorical size labels such as `10x100`.

use crate::errors::*;
use crate::table::{MetricTable, Value};
use itertools::Itertools;

/// Name of the column added by `derive_size_label`.
pub const SIZE_LABEL: &str = "SizeLabel";

/// Separator between dimension values in a label.
pub const SEPARATOR: &str = "x";

/// Joins dimension values in the order given: `[3, 7]` becomes `"3x7"`.
pub fn size_label(dimensions: &[&Value]) -> String {
    dimensions.iter().join(SEPARATOR)
}

/// Returns a copy of `table` with a `SizeLabel` column built from
/// `dimensions`, one label per row. Field order is significant; `S, T` and
/// `T, S` give different labels.
pub fn derive_size_label(table: &MetricTable, dimensions: &[&str]) -> Result<MetricTable> {
    let indices = dimensions
        .iter()
        .map(|d| table.column_index(d))
        .collect::<Result<Vec<usize>>>()?;

    let labels = table
        .records()
        .iter()
        .map(|r| {
            let dims = indices.iter().map(|&i| r.get(i)).collect::<Vec<&Value>>();
            Value::Text(size_label(&dims))
        })
        .collect::<Vec<Value>>();
    debug!("derived {} size labels for {}", labels.len(), table.source());

    Ok(table.with_column(SIZE_LABEL, labels))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(data: &str) -> MetricTable {
        MetricTable::from_reader(data.as_bytes(), "test.csv").unwrap()
    }

    #[test]
    fn order_of_dimensions_matters() {
        let t = table("S,T,Time\n3,7,1.0\n");
        let st = derive_size_label(&t, &["S", "T"]).unwrap();
        let ts = derive_size_label(&t, &["T", "S"]).unwrap();
        assert_eq!(st.text_column(SIZE_LABEL).unwrap(), vec!["3x7"]);
        assert_eq!(ts.text_column(SIZE_LABEL).unwrap(), vec!["7x3"]);
    }

    #[test]
    fn one_label_per_row() {
        let t = table("rows,cols,time_ms,memory_MB\n10,10,0.1,1\n100,10,0.9,2\n10,10,0.2,1\n");
        let labelled = derive_size_label(&t, &["rows", "cols"]).unwrap();
        assert_eq!(labelled.len(), t.len());
        assert_eq!(
            labelled.text_column(SIZE_LABEL).unwrap(),
            vec!["10x10", "100x10", "10x10"]
        );
    }

    #[test]
    fn labelling_is_deterministic() {
        let t = table("S,T\n10,1000\n100,1000\n");
        let first = derive_size_label(&t, &["S", "T"]).unwrap();
        let second = derive_size_label(&first, &["S", "T"]).unwrap();
        // relabelling replaces the column rather than adding another one
        assert_eq!(first, second);
    }

    #[test]
    fn missing_dimension() {
        let t = table("rows,cols\n1,2\n");
        let err = derive_size_label(&t, &["S", "T"]).unwrap_err();
        assert!(err.to_string().contains("'S'"));
    }

    #[test]
    fn three_dimensions() {
        let dims = [Value::Int(4), Value::Int(2), Value::Int(9)];
        let refs = dims.iter().collect::<Vec<&Value>>();
        assert_eq!(size_label(&refs), "4x2x9");
    }
}
