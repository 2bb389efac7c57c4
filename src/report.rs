//! The fixed chart sets for the substring scenarios and the DP experiment.

use crate::aggregate::{aggregate_by_group, mean_column_name, to_table};
use crate::chart::{emit_line_chart, LineChart, XAxis, GREEN, PURPLE, RED};
use crate::errors::*;
use crate::label::{derive_size_label, SIZE_LABEL};
use crate::setting::Setting;
use crate::table::MetricTable;
use std::fs;
use std::path::PathBuf;

/// Scenario charts: a 10x6 inch figure at 300 dpi.
pub const SCENARIO_RESOLUTION: (u32, u32) = (3000, 1800);

/// DP charts: an 8x5 inch figure at 100 dpi.
pub const DP_RESOLUTION: (u32, u32) = (800, 500);

const MATRIX_SIZE: &str = "Matrix Size (S × T)";
const DP_MATRIX_SIZE: &str = "Matrix Size (m × n)";

/// Writes charts into the output directory and remembers what it wrote.
struct Emitter<'a> {
    setting: &'a Setting,
    written: Vec<PathBuf>,
}

impl<'a> Emitter<'a> {
    fn new(setting: &'a Setting) -> Result<Self> {
        let dir = &setting.output_dir;
        fs::create_dir_all(dir).chain_err(|| ErrorKind::Write(dir.display().to_string()))?;
        Ok(Emitter {
            setting: setting,
            written: Vec::new(),
        })
    }

    fn emit(&mut self, file: &str, chart: LineChart) -> Result<()> {
        let path = self.setting.output(file);
        emit_line_chart(&chart, &path)?;
        self.written.push(path);
        Ok(())
    }
}

fn size_axis(table: &MetricTable) -> Result<XAxis> {
    Ok(XAxis::Categorical(table.text_column(SIZE_LABEL)?))
}

/// Labels scenario 2 rows by size, averages `Time`, `Memory` and `Length`
/// over every `Delta` measured at that size, and sorts by `(S, T)`.
pub fn average_by_size(scenario2: &MetricTable) -> Result<MetricTable> {
    let labelled = derive_size_label(scenario2, &["S", "T"])?;
    let group = ["S", "T", SIZE_LABEL];
    let metrics = ["Time", "Memory", "Length"];
    let aggregated = aggregate_by_group(&labelled, &group, &metrics)?;
    to_table(&aggregated, &group, &metrics, labelled.source()).sort_by(&["S", "T"])
}

/// Renders the six scenario charts and returns their paths:
///
/// * scenario 1 runtime and memory per `SxT` size, sorted by `(S, T)`;
/// * scenario 2 length and runtime against `Delta`, sorted by `Delta`;
/// * scenario 2 runtime and memory per size, averaged over `Delta`.
pub fn scenario_report(setting: &Setting) -> Result<Vec<PathBuf>> {
    let mut out = Emitter::new(setting)?;

    let scenario1 = MetricTable::load(setting.input(&setting.scenario1))?.sort_by(&["S", "T"])?;
    let scenario1 = derive_size_label(&scenario1, &["S", "T"])?;
    out.emit(
        "scenario1_runtime.png",
        LineChart::new(
            "Scenario 1: Runtime vs Input Size",
            size_axis(&scenario1)?,
            scenario1.numeric_column("Time")?,
        )
        .axes(MATRIX_SIZE, "Time (ms)")
        .rotate_x_labels()
        .resolution(SCENARIO_RESOLUTION.0, SCENARIO_RESOLUTION.1),
    )?;
    out.emit(
        "scenario1_memory.png",
        LineChart::new(
            "Scenario 1: Memory Usage vs Input Size",
            size_axis(&scenario1)?,
            scenario1.numeric_column("Memory")?,
        )
        .axes(MATRIX_SIZE, "Memory (MB)")
        .rotate_x_labels()
        .color(RED)
        .resolution(SCENARIO_RESOLUTION.0, SCENARIO_RESOLUTION.1),
    )?;

    let raw = MetricTable::load(setting.input(&setting.scenario2))?;
    let by_delta = raw.sort_by(&["Delta"])?;
    let delta = XAxis::Numeric(by_delta.numeric_column("Delta")?);
    out.emit(
        "scenario2_length_vs_delta.png",
        LineChart::new(
            "Scenario 2: Substring Length vs Delta",
            delta.clone(),
            by_delta.numeric_column("Length")?,
        )
        .axes("Delta (Mismatch Penalty)", "Optimal Substring Length")
        .color(GREEN)
        .resolution(SCENARIO_RESOLUTION.0, SCENARIO_RESOLUTION.1),
    )?;
    out.emit(
        "scenario2_time_vs_delta.png",
        LineChart::new(
            "Scenario 2: Runtime vs Delta",
            delta,
            by_delta.numeric_column("Time")?,
        )
        .axes("Delta", "Time (ms)")
        .color(PURPLE)
        .resolution(SCENARIO_RESOLUTION.0, SCENARIO_RESOLUTION.1),
    )?;

    let by_size = average_by_size(&raw)?;
    out.emit(
        "scenario2_runtime_vs_size.png",
        LineChart::new(
            "Scenario 2: Average Runtime vs Matrix Size",
            size_axis(&by_size)?,
            by_size.numeric_column(&mean_column_name("Time"))?,
        )
        .axes(MATRIX_SIZE, "Time (ms)")
        .rotate_x_labels()
        .resolution(SCENARIO_RESOLUTION.0, SCENARIO_RESOLUTION.1),
    )?;
    out.emit(
        "scenario2_memory_vs_size.png",
        LineChart::new(
            "Scenario 2: Average Memory vs Matrix Size",
            size_axis(&by_size)?,
            by_size.numeric_column(&mean_column_name("Memory"))?,
        )
        .axes(MATRIX_SIZE, "Memory (MB)")
        .rotate_x_labels()
        .color(RED)
        .resolution(SCENARIO_RESOLUTION.0, SCENARIO_RESOLUTION.1),
    )?;

    Ok(out.written)
}

/// Renders the DP runtime and memory charts. Rows are plotted in file order.
pub fn dp_report(setting: &Setting) -> Result<Vec<PathBuf>> {
    let mut out = Emitter::new(setting)?;

    let results = MetricTable::load(setting.input(&setting.dp_results))?;
    let results = derive_size_label(&results, &["rows", "cols"])?;
    out.emit(
        "runtime_plot.png",
        LineChart::new(
            "DP Runtime vs Matrix Size",
            size_axis(&results)?,
            results.numeric_column("time_ms")?,
        )
        .axes(DP_MATRIX_SIZE, "Runtime (ms)")
        .resolution(DP_RESOLUTION.0, DP_RESOLUTION.1),
    )?;
    out.emit(
        "memory_plot.png",
        LineChart::new(
            "Memory Usage vs Matrix Size",
            size_axis(&results)?,
            results.numeric_column("memory_MB")?,
        )
        .axes(DP_MATRIX_SIZE, "Memory Usage (MB)")
        .resolution(DP_RESOLUTION.0, DP_RESOLUTION.1),
    )?;

    Ok(out.written)
}
