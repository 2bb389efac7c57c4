//! Grouping rows by key fields and averaging metrics within each group.

use crate::errors::*;
use crate::table::{MetricRecord, MetricTable, Value};
use average::Mean;
use itertools::{Itertools, MinMaxResult};
use std::collections::HashMap;

/// Column name given to the mean of `metric`, e.g. `AvgTime`.
pub fn mean_column_name(metric: &str) -> String {
    format!("Avg{}", metric)
}

/// One group of rows collapsed to the means of its metrics.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregatedRecord {
    /// Group field names and the values shared by every member.
    pub key: Vec<(String, Value)>,

    /// Metric names and their arithmetic mean over the members.
    pub means: Vec<(String, f64)>,

    /// How many rows fell into this group.
    pub count: usize,
}

impl AggregatedRecord {
    /// Value of a group field.
    pub fn key_value(&self, field: &str) -> Option<&Value> {
        self.key.iter().find(|k| k.0 == field).map(|k| &k.1)
    }

    /// Mean of a metric field.
    pub fn mean(&self, metric: &str) -> Option<f64> {
        self.means.iter().find(|m| m.0 == metric).map(|m| m.1)
    }
}

/// Partitions rows by identical values of `group_fields` and averages each of
/// `metric_fields` over the members of every group. One record comes out per
/// distinct key, in order of first appearance; sort afterwards if a
/// particular order matters.
///
/// Groups of unequal size are accepted. A warning is logged when member
/// counts differ, and `AggregatedRecord::count` carries each size.
pub fn aggregate_by_group(
    table: &MetricTable,
    group_fields: &[&str],
    metric_fields: &[&str],
) -> Result<Vec<AggregatedRecord>> {
    let group_idx = group_fields
        .iter()
        .map(|f| table.column_index(f))
        .collect::<Result<Vec<usize>>>()?;
    let metric_idx = metric_fields
        .iter()
        .map(|f| table.column_index(f))
        .collect::<Result<Vec<usize>>>()?;

    // key -> position in `groups`, so output follows first appearance
    let mut index: HashMap<Vec<Value>, usize> = HashMap::new();
    let mut groups: Vec<(Vec<Value>, Vec<usize>)> = Vec::new();
    for (row, record) in table.records().iter().enumerate() {
        let key = group_idx
            .iter()
            .map(|&i| record.get(i).clone())
            .collect::<Vec<Value>>();
        let slot = match index.get(&key) {
            Some(&slot) => slot,
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, Vec::new()));
                groups.len() - 1
            }
        };
        groups[slot].1.push(row);
    }

    if let MinMaxResult::MinMax(min, max) = groups.iter().map(|g| g.1.len()).minmax() {
        if min != max {
            warn!(
                "{}: groups by {:?} have between {} and {} members",
                table.source(),
                group_fields,
                min,
                max
            );
        }
    }

    let mut aggregated = Vec::with_capacity(groups.len());
    for (key, members) in groups {
        let mut means = Vec::with_capacity(metric_fields.len());
        for (name, &i) in metric_fields.iter().zip(metric_idx.iter()) {
            let samples = members
                .iter()
                .map(|&row| {
                    table.records()[row]
                        .get(i)
                        .as_f64()
                        .ok_or_else(|| Error::from(ErrorKind::NonNumeric(name.to_string(), row)))
                })
                .collect::<Result<Vec<f64>>>()?;
            let mean = samples.into_iter().collect::<Mean>();
            means.push((name.to_string(), mean.mean()));
        }

        trace!("group {:?}: {} members, means {:?}", key, members.len(), means);
        aggregated.push(AggregatedRecord {
            key: group_fields
                .iter()
                .map(|f| f.to_string())
                .zip(key.into_iter())
                .collect(),
            means: means,
            count: members.len(),
        });
    }
    debug!(
        "aggregated {} rows of {} into {} groups",
        table.len(),
        table.source(),
        aggregated.len()
    );

    Ok(aggregated)
}

/// Lays aggregates out as a table: `group_fields` followed by one
/// `Avg<metric>` column per entry of `metric_fields`. Pass the same fields
/// given to `aggregate_by_group`; the header comes from them, so an empty
/// aggregate still yields a table with the full schema. Rows keep the order
/// of `records`.
pub fn to_table<S: Into<String>>(
    records: &[AggregatedRecord],
    group_fields: &[&str],
    metric_fields: &[&str],
    source: S,
) -> MetricTable {
    let headers = group_fields
        .iter()
        .map(|f| f.to_string())
        .chain(metric_fields.iter().map(|m| mean_column_name(m)))
        .collect();

    let rows = records
        .iter()
        .map(|r| {
            let cells = r.key
                .iter()
                .map(|k| k.1.clone())
                .chain(r.means.iter().map(|m| Value::Float(m.1)))
                .collect();
            MetricRecord::new(cells)
        })
        .collect();

    MetricTable::new(source, headers, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(data: &str) -> MetricTable {
        MetricTable::from_reader(data.as_bytes(), "scenario2.csv").unwrap()
    }

    #[test]
    fn two_deltas_average_to_one_record() {
        let t = table("S,T,Delta,Time,Memory\n2,2,1,10,5\n2,2,2,20,7\n");
        let agg = aggregate_by_group(&t, &["S", "T"], &["Time", "Memory"]).unwrap();
        assert_eq!(agg.len(), 1);
        assert_eq!(agg[0].key_value("S"), Some(&Value::Int(2)));
        assert_eq!(agg[0].key_value("T"), Some(&Value::Int(2)));
        assert_eq!(agg[0].mean("Time"), Some(15.0));
        assert_eq!(agg[0].mean("Memory"), Some(6.0));

        let out = to_table(&agg, &["S", "T"], &["Time", "Memory"], "agg");
        assert_eq!(out.headers(), &["S", "T", "AvgTime", "AvgMemory"]);
        assert_eq!(out.numeric_column("AvgTime").unwrap(), vec![15.0]);
        assert_eq!(out.numeric_column("AvgMemory").unwrap(), vec![6.0]);
    }

    #[test]
    fn one_record_per_distinct_key() {
        // 3 groups with 1, 2 and 3 members
        let t = table(
            "S,T,Time
1,1,4
2,2,1
2,2,3
3,3,3
3,3,6
3,3,9
",
        );
        let agg = aggregate_by_group(&t, &["S", "T"], &["Time"]).unwrap();
        assert_eq!(agg.len(), 3);
        let counts = agg.iter().map(|a| a.count).collect::<Vec<_>>();
        assert_eq!(counts, vec![1, 2, 3]);
        let means = agg.iter().map(|a| a.mean("Time").unwrap()).collect::<Vec<_>>();
        assert_eq!(means, vec![4.0, 2.0, 6.0]);
    }

    #[test]
    fn mean_of_one_is_unchanged() {
        let t = table("S,T,Time,Memory\n7,9,0.125,3.5\n");
        let agg = aggregate_by_group(&t, &["S", "T"], &["Time", "Memory"]).unwrap();
        assert_eq!(agg[0].count, 1);
        assert_eq!(agg[0].mean("Time"), Some(0.125));
        assert_eq!(agg[0].mean("Memory"), Some(3.5));
    }

    #[test]
    fn interleaved_keys_group_together() {
        let t = table("S,T,Time\n1,2,1\n2,1,10\n1,2,3\n2,1,20\n");
        let agg = aggregate_by_group(&t, &["S", "T"], &["Time"]).unwrap();
        assert_eq!(agg.len(), 2);
        // first appearance order, and 1x2 is not the same group as 2x1
        assert_eq!(agg[0].mean("Time"), Some(2.0));
        assert_eq!(agg[1].mean("Time"), Some(15.0));
    }

    #[test]
    fn aggregate_then_sort() {
        let t = table("S,T,Time\n100,10,5\n10,10,1\n100,10,7\n10,10,3\n");
        let agg = aggregate_by_group(&t, &["S", "T"], &["Time"]).unwrap();
        let sorted = to_table(&agg, &["S", "T"], &["Time"], "agg").sort_by(&["S", "T"]).unwrap();
        assert_eq!(sorted.numeric_column("S").unwrap(), vec![10.0, 100.0]);
        assert_eq!(sorted.numeric_column("AvgTime").unwrap(), vec![2.0, 6.0]);
    }

    #[test]
    fn integral_floats_join_integer_groups() {
        let t = table("S,T,Time\n2,2,1\n2.0,2,3\n");
        let agg = aggregate_by_group(&t, &["S", "T"], &["Time"]).unwrap();
        assert_eq!(agg.len(), 1);
        assert_eq!(agg[0].count, 2);
        assert_eq!(agg[0].mean("Time"), Some(2.0));
    }

    #[test]
    fn missing_metric_column() {
        let t = table("rows,cols,time_ms\n1,1,1\n");
        let err = aggregate_by_group(&t, &["rows", "cols"], &["Delta"]).unwrap_err();
        match *err.kind() {
            ErrorKind::MissingColumn(ref column, _) => assert_eq!(column, "Delta"),
            ref other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn empty_table_has_no_groups() {
        let t = table("S,T,Time\n");
        let agg = aggregate_by_group(&t, &["S", "T"], &["Time"]).unwrap();
        assert!(agg.is_empty());

        let out = to_table(&agg, &["S", "T"], &["Time"], "agg");
        assert!(out.is_empty());
        assert_eq!(out.headers(), &["S", "T", "AvgTime"]);
        assert!(out.sort_by(&["S", "T"]).unwrap().is_empty());
    }
}
