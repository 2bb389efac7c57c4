//! Plots the substring experiment measurements (`scenario1.csv`,
//! `scenario2.csv`): runtime and memory against matrix size, and length and
//! runtime against the mismatch penalty `Delta`.

extern crate bench_report;
#[macro_use]
extern crate log;
extern crate structopt;

use bench_report::errors::*;
use bench_report::{report, Setting};
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(name = "scenario_report")]
#[structopt(about = "Render runtime, memory and length charts for scenarios 1 and 2")]
struct Opt {
    /// A TOML setting naming the input files and output directory.
    #[structopt(short = "s", long = "setting")]
    setting: Option<String>,

    /// Directory containing scenario1.csv and scenario2.csv.
    #[structopt(short = "i", long = "input")]
    input_dir: Option<String>,

    /// Output directory for the PNG charts, current directory if empty.
    #[structopt(short = "o", long = "out")]
    output_dir: Option<String>,
}

fn run() -> Result<()> {
    let opt = Opt::from_args();
    debug!("{:?}", opt);

    let mut setting = match opt.setting {
        Some(ref path) => Setting::init(path)?,
        None => Setting::default(),
    };
    if let Some(dir) = opt.input_dir {
        setting.input_dir = dir.into();
    }
    if let Some(dir) = opt.output_dir {
        setting.output_dir = dir.into();
    }

    let written = report::scenario_report(&setting)?;
    info!("wrote {} charts to {}", written.len(), setting.output_dir.display());
    Ok(())
}

fn main() {
    bench_report::init_logger();

    if let Err(ref e) = run() {
        eprintln!("error: {}", e);
        for cause in e.iter().skip(1) {
            eprintln!("caused by: {}", cause);
        }
        ::std::process::exit(1);
    }
}
