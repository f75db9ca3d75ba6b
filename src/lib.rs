use chrono::prelude::*;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
pub mod chart;
pub mod cli;
pub mod error;
pub mod records;
pub mod resource;
pub mod select;

use chart::ChartSink;
use cli::GraphConfig;
pub use error::{GraphError, Result};
pub use resource::Resource;
pub use select::{select, Query};

pub const VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");

pub const CHECK_NAME: &str = "PFA_JES2_Resource_Exhaustion";

/// width of the blank-padded name columns in both input files
pub const COLUMN_CHAR_LEN: usize = 8;

/// `Date_Time` layout in the data file
pub const DATA_DT_FORMAT: &str = "%Y%m%d%H%M%S";
pub const DT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One sample of the selected series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesPoint {
    pub task_id: String,
    pub start_time: String,
    pub stck_time: u64,
    pub date_time: NaiveDateTime,
    pub current_usage: i64,
    pub capacity: i64,
}

/// The usage time series of one job for one resource,
/// restricted to a single start-time cohort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedSeries {
    pub job_name: String,
    pub resource: Resource,
    pub points: Vec<SeriesPoint>,
}

impl SelectedSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// largest capacity in the series, every point shares it after selection
    pub fn capacity(&self) -> Option<i64> {
        self.points.iter().map(|p| p.capacity).max()
    }

    pub fn start_time(&self) -> Option<&str> {
        self.points.first().map(|p| p.start_time.as_str())
    }

    /// Table of the first `rows` points.
    pub fn preview(&self, rows: usize) -> String {
        let mut s = format!(
            "{:>3} {:<8} {:<8} {:>14} {:>20} {:>13} {:>19} {:>8}\n",
            "Key", "JobName", "TaskId", "Start_Time", "STCK_Time", "Current_Usage", "Date_Time", "Capacity"
        );
        for p in self.points.iter().take(rows) {
            s.push_str(&format!(
                "{:>3} {:<8} {:<8} {:>14} {:>20} {:>13} {:>19} {:>8}\n",
                self.resource.code(),
                self.job_name,
                p.task_id,
                p.start_time,
                p.stck_time,
                p.current_usage,
                p.date_time.format(DT_FORMAT).to_string(),
                p.capacity
            ));
        }
        s
    }

    /// writes the datetime, usage and capacity columns as a csv at the given path
    pub fn to_csv(&self, fout: &Path) -> Result<()> {
        let file = File::create(fout)?;
        let mut buf = BufWriter::new(file);
        write!(buf, "{}", self)?;
        buf.flush()?;
        info!("wrote {} rows to {}", self.len(), fout.display());
        Ok(())
    }
}

impl std::fmt::Display for SelectedSeries {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "datetime,current_usage,capacity\n")?;
        for p in self.points.iter() {
            write!(
                f,
                "{},{},{}\n",
                p.date_time.format(DT_FORMAT),
                p.current_usage,
                p.capacity
            )?
        }
        Ok(())
    }
}

/// Loads both files, selects the configured series and writes the graph.
/// Nothing is written unless the selection succeeds.
pub fn run(config: &GraphConfig) -> Result<SelectedSeries> {
    records::ensure_exists(&config.data_file, "data")?;
    records::ensure_exists(&config.capacity_file, "capacity")?;
    let observations = records::read_observations(&config.data_file)?;
    let capacities = records::read_capacities(&config.capacity_file)?;
    let series = select(&observations, &capacities, &config.query)?;
    if config.verbose {
        // keep stdout clean when it carries the svg document
        match config.sink {
            ChartSink::Stdout => eprint!("{}", details(config, &series)),
            ChartSink::File(_) => print!("{}", details(config, &series)),
        }
    }
    if let Some(fout) = &config.csv_out {
        series.to_csv(fout)?;
    }
    chart::write_chart(&series, &config.sink)?;
    if let ChartSink::File(fout) = &config.sink {
        println!(
            "{} has been created and is ready to be viewed.",
            fout.display()
        );
    }
    Ok(series)
}

/// Verbose banner and preview table.
pub fn details(config: &GraphConfig, series: &SelectedSeries) -> String {
    format!(
        "Now graphing {} data on a {} system.\n\
         The job_name is: {}\n\
         The JES2 resource is: {}\n\
         The data_filepath entered: {}\n\
         The capacity_filepath entered was: {}\n\
         \nPreview of the data being graphed:\n{}",
        CHECK_NAME,
        std::env::consts::OS,
        config.query.job_name(),
        config.query.resource,
        config.data_file.display(),
        config.capacity_file.display(),
        series.preview(config.preview_rows)
    )
}

pub fn min_and_max<T: std::cmp::PartialOrd + Copy>(s: &[T]) -> Option<(T, T)> {
    let mut self_iter = s.iter();
    let (mut min, mut max) = match self_iter.next() {
        Some(v) => (*v, *v),
        None => return None,
    };
    for es in self_iter {
        if *es > max {
            max = *es
        }
        if *es < min {
            min = *es
        }
    }
    Some((min, max))
}
