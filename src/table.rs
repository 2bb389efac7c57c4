//! Tabular measurement data loaded from CSV.
//!
//! Columns are referenced by name. Nothing about the schema is checked at load
//! time; a column that is missing only fails once something asks for it.

use crate::errors::*;
use csv;
use std::cmp::Ordering;
use std::fmt;
use std::fs::File;
use std::hash::{Hash, Hasher};
use std::io::Read;
use std::path::Path;

/// A single parsed CSV cell.
#[derive(Clone, Debug)]
pub enum Value {
    /// Cell that parses as a signed integer.
    Int(i64),

    /// Cell that parses as a float but not as an integer.
    Float(f64),

    /// Anything else, including the empty cell.
    Text(String),
}

impl Value {
    /// Parses a raw cell, preferring integer over float over text.
    pub fn parse(cell: &str) -> Value {
        let cell = cell.trim();
        if let Ok(i) = cell.parse::<i64>() {
            Value::Int(i)
        } else if let Ok(f) = cell.parse::<f64>() {
            Value::Float(f)
        } else {
            Value::Text(cell.to_string())
        }
    }

    /// Numeric view of the cell; integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Int(i) => Some(i as f64),
            Value::Float(f) => Some(f),
            Value::Text(_) => None,
        }
    }

    /// Total order used for sorting: numbers before text, numbers compared
    /// numerically, text lexicographically.
    pub fn compare(&self, other: &Value) -> Ordering {
        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.to_string().cmp(&other.to_string()),
        }
    }
}

// Key used for equality and hashing. An integral float such as `2.0` keys
// the same as the integer `2`; other floats key by bit pattern.
#[derive(PartialEq, Eq, Hash)]
enum Key<'a> {
    Int(i64),
    Float(u64),
    Text(&'a str),
}

impl Value {
    fn key(&self) -> Key {
        match *self {
            Value::Int(i) => Key::Int(i),
            Value::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Key::Int(f as i64),
            Value::Float(f) => Key::Float(f.to_bits()),
            Value::Text(ref s) => Key::Text(s),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(ref s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// One row of a table, positionally aligned with the table's headers.
#[derive(Clone, Debug, PartialEq)]
pub struct MetricRecord {
    values: Vec<Value>,
}

impl MetricRecord {
    /// Creates a record from its cells.
    pub fn new(values: Vec<Value>) -> Self {
        MetricRecord { values: values }
    }

    /// Cell at column index `i`.
    #[inline]
    pub fn get(&self, i: usize) -> &Value {
        &self.values[i]
    }

    /// All cells in column order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

/// Ordered rows sharing one header.
#[derive(Clone, Debug, PartialEq)]
pub struct MetricTable {
    /// Where the rows came from; used in error messages.
    source: String,
    headers: Vec<String>,
    records: Vec<MetricRecord>,
}

impl MetricTable {
    /// Assembles a table. Every record must have one cell per header.
    pub fn new<S: Into<String>>(
        source: S,
        headers: Vec<String>,
        records: Vec<MetricRecord>,
    ) -> Self {
        debug_assert!(records.iter().all(|r| r.values.len() == headers.len()));
        MetricTable {
            source: source.into(),
            headers: headers,
            records: records,
        }
    }

    /// Loads a CSV file with a header row. Rows keep file order.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<MetricTable> {
        let path = path.as_ref();
        let source = path.display().to_string();
        if !path.exists() {
            bail!(ErrorKind::FileNotFound(source));
        }

        let file = File::open(path).chain_err(|| ErrorKind::FileNotFound(source.clone()))?;
        let table = MetricTable::from_reader(file, source)?;
        info!(
            "loaded {} rows x {} columns from {}",
            table.len(),
            table.headers.len(),
            table.source
        );
        Ok(table)
    }

    /// Reads CSV text from any reader; `source` names it in errors.
    pub fn from_reader<R: Read, S: Into<String>>(rdr: R, source: S) -> Result<MetricTable> {
        let source = source.into();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(rdr);

        let headers = reader
            .headers()
            .chain_err(|| ErrorKind::Parse(source.clone()))?
            .iter()
            .map(String::from)
            .collect::<Vec<String>>();
        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            bail!(ErrorKind::Parse(source));
        }

        let mut records = Vec::new();
        for record in reader.records() {
            let record = record.chain_err(|| ErrorKind::Parse(source.clone()))?;
            let values = record.iter().map(Value::parse).collect::<Vec<Value>>();
            trace!("{}: {:?}", source, values);
            records.push(MetricRecord::new(values));
        }

        Ok(MetricTable::new(source, headers, records))
    }

    /// Name of the file (or other origin) this table was read from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Column names in file order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Rows in table order.
    pub fn records(&self) -> &[MetricRecord] {
        &self.records
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when there are no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Position of the named column, or `MissingColumn`.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| Error::from(ErrorKind::MissingColumn(name.to_string(), self.source.clone())))
    }

    /// Cells of the named column in row order.
    pub fn column(&self, name: &str) -> Result<Vec<&Value>> {
        let i = self.column_index(name)?;
        Ok(self.records.iter().map(|r| r.get(i)).collect())
    }

    /// The named column as numbers. Text cells fail with `NonNumeric`.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>> {
        let i = self.column_index(name)?;
        self.records
            .iter()
            .enumerate()
            .map(|(row, r)| {
                r.get(i)
                    .as_f64()
                    .ok_or_else(|| Error::from(ErrorKind::NonNumeric(name.to_string(), row)))
            })
            .collect()
    }

    /// The named column rendered as strings.
    pub fn text_column(&self, name: &str) -> Result<Vec<String>> {
        Ok(self.column(name)?.iter().map(|v| v.to_string()).collect())
    }

    /// Returns a copy with `name` set to `values`, appended as the last column
    /// or replacing an existing column of the same name.
    pub fn with_column(&self, name: &str, values: Vec<Value>) -> MetricTable {
        assert_eq!(values.len(), self.records.len(), "one value per row");
        let mut headers = self.headers.clone();
        let position = headers.iter().position(|h| h == name);
        if position.is_none() {
            headers.push(name.to_string());
        }

        let records = self.records
            .iter()
            .zip(values.into_iter())
            .map(|(r, v)| {
                let mut cells = r.values.clone();
                match position {
                    Some(i) => cells[i] = v,
                    None => cells.push(v),
                }
                MetricRecord::new(cells)
            })
            .collect();

        MetricTable::new(self.source.clone(), headers, records)
    }

    /// Returns the rows sorted ascending by `keys`, first key most
    /// significant. The sort is stable: rows equal on every key keep their
    /// relative order.
    pub fn sort_by(&self, keys: &[&str]) -> Result<MetricTable> {
        let indices = keys.iter()
            .map(|k| self.column_index(k))
            .collect::<Result<Vec<usize>>>()?;

        let mut records = self.records.clone();
        records.sort_by(|a, b| {
            indices
                .iter()
                .map(|&i| a.get(i).compare(b.get(i)))
                .find(|o| *o != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });
        debug!("sorted {} rows of {} by {:?}", records.len(), self.source, keys);

        Ok(MetricTable::new(self.source.clone(), self.headers.clone(), records))
    }
}
