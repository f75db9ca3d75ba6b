//! Readers for the two PFA_JES2_RESOURCE_EXHAUSTION files.
//!
//! Both files have no header row and separate fields with either `/` or `,`.
//! Text fields are kept exactly as written, including the blank padding of the
//! fixed-width name columns; integer fields are parsed.

use crate::error::{GraphError, Result};
use crate::resource::Resource;
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

pub const OBSERVATION_FIELDS: [&str; 7] = [
    "Key",
    "JobName",
    "TaskId",
    "Start_Time",
    "STCK_Time",
    "Current_Usage",
    "Date_Time",
];
pub const CAPACITY_FIELDS: [&str; 2] = ["Resource", "Capacity"];

/// One row of the data file, an address space sample for one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub key: String,
    pub job_name: String,
    pub task_id: String,
    pub start_time: String,
    pub stck_time: u64,
    pub current_usage: i64,
    /// `YYYYMMDDHHMMSS`, converted only for the selected rows
    pub date_time: String,
}

impl Observation {
    pub fn from_fields(fields: &[&str]) -> std::result::Result<Observation, String> {
        check_field_count(fields, OBSERVATION_FIELDS.len())?;
        Ok(Observation {
            key: fields[0].to_string(),
            job_name: fields[1].to_string(),
            task_id: fields[2].to_string(),
            start_time: fields[3].to_string(),
            stck_time: parse_int(fields[4], OBSERVATION_FIELDS[4])?,
            current_usage: parse_int(fields[5], OBSERVATION_FIELDS[5])?,
            date_time: fields[6].to_string(),
        })
    }
}

/// One row of the capacity file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityRecord {
    pub resource: String,
    pub capacity: i64,
}

impl CapacityRecord {
    pub fn from_fields(fields: &[&str]) -> std::result::Result<CapacityRecord, String> {
        check_field_count(fields, CAPACITY_FIELDS.len())?;
        Ok(CapacityRecord {
            resource: fields[0].to_string(),
            capacity: parse_int(fields[1], CAPACITY_FIELDS[1])?,
        })
    }
}

fn check_field_count(fields: &[&str], expected: usize) -> std::result::Result<(), String> {
    if fields.len() != expected {
        return Err(format!(
            "expected {} fields, found {}",
            expected,
            fields.len()
        ));
    }
    Ok(())
}

fn parse_int<T: std::str::FromStr>(s: &str, name: &str) -> std::result::Result<T, String> {
    s.trim()
        .parse::<T>()
        .map_err(|_| format!("{} '{}' is not an integer", name, s))
}

pub fn split_fields(line: &str) -> Vec<&str> {
    line.split(&['/', ','][..]).collect()
}

/// Reads every non-blank line of `buf` with `parse_row`.
/// `origin` names the source in error messages.
fn read_rows<R, T, F>(buf: R, origin: &str, parse_row: F) -> Result<Vec<T>>
where
    R: BufRead,
    F: Fn(&[&str]) -> std::result::Result<T, String>,
{
    let mut rows = Vec::new();
    for (i, l) in buf.lines().enumerate() {
        let l = match l {
            Ok(l) => l,
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                return Err(GraphError::Parse {
                    origin: origin.to_string(),
                    line: i + 1,
                    reason: e.to_string(),
                })
            }
            Err(e) => return Err(e.into()),
        };
        let l = l.trim_end_matches('\r');
        if l.trim().is_empty() {
            continue;
        }
        let row = parse_row(split_fields(l).as_slice()).map_err(|reason| GraphError::Parse {
            origin: origin.to_string(),
            line: i + 1,
            reason,
        })?;
        rows.push(row);
    }
    Ok(rows)
}

pub fn parse_observations<R: BufRead>(buf: R, origin: &str) -> Result<Vec<Observation>> {
    read_rows(buf, origin, Observation::from_fields)
}

pub fn parse_capacities<R: BufRead>(buf: R, origin: &str) -> Result<Vec<CapacityRecord>> {
    read_rows(buf, origin, CapacityRecord::from_fields)
}

pub fn read_observations(fin: &Path) -> Result<Vec<Observation>> {
    let file = File::open(fin)?;
    let observations = parse_observations(BufReader::new(file), &fin.display().to_string())?;
    debug!(
        "read {} observations from {}, {} with an unknown key",
        observations.len(),
        fin.display(),
        unknown_keys(&observations)
    );
    Ok(observations)
}

pub fn read_capacities(fin: &Path) -> Result<Vec<CapacityRecord>> {
    let file = File::open(fin)?;
    let capacities = parse_capacities(BufReader::new(file), &fin.display().to_string())?;
    debug!("read {} capacity rows from {}", capacities.len(), fin.display());
    Ok(capacities)
}

/// Rows whose key is not a JES2 resource code; they never match a query.
pub fn unknown_keys(observations: &[Observation]) -> usize {
    observations
        .iter()
        .filter(|o| Resource::from_code(&o.key).is_none())
        .count()
}

/// Fails with `InputNotFound` unless `path` exists; `kind` is "data" or "capacity".
pub fn ensure_exists(path: &Path, kind: &'static str) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(GraphError::InputNotFound {
            kind,
            path: path.to_path_buf(),
        })
    }
}
