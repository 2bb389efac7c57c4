//! Library for turning benchmark measurement CSVs into line charts.
//!
//! The pipeline is load, label, sort, aggregate, then chart. Every step but the
//! last takes a `MetricTable` and returns a new one; only `emit_line_chart`
//! touches the filesystem on the way out.

#![recursion_limit = "1024"]
#![deny(missing_docs)]

extern crate average;
extern crate chrono;
extern crate csv;
extern crate env_logger;
#[macro_use]
extern crate error_chain;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate plotters;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate toml;

#[allow(missing_docs)]
pub mod errors;

mod table;
pub use table::{MetricRecord, MetricTable, Value};

mod label;
pub use label::{derive_size_label, size_label, SIZE_LABEL};

mod aggregate;
pub use aggregate::{aggregate_by_group, mean_column_name, to_table, AggregatedRecord};

mod chart;
pub use chart::{emit_line_chart, padded_range, LineChart, XAxis};

mod setting;
pub use setting::Setting;

pub mod report;

use std::env;
use std::io::Write;

/// Sets up `env_logger` with a UTC timestamp on every line. The filter comes
/// from `RUST_LOG` and defaults to `info`.
pub fn init_logger() {
    let mut builder = env_logger::Builder::new();
    builder.format(|buf, record| {
        let t = chrono::Utc::now();
        writeln!(
            buf,
            "{} {:<5} {}",
            t.format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.args()
        )
    });

    match env::var("RUST_LOG") {
        Ok(filter) => builder.parse_filters(&filter),
        Err(_) => builder.filter_level(log::LevelFilter::Info),
    };

    builder.init();
}
