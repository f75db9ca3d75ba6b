//! Selection of one job's series for one JES2 resource.

use crate::error::{GraphError, Result};
use crate::records::{CapacityRecord, Observation};
use crate::resource::{pad_field, Resource};
use crate::{SelectedSeries, SeriesPoint, DATA_DT_FORMAT};
use chrono::NaiveDateTime;
use log::debug;
use std::str::FromStr;

/// What to select: a resource and a job name normalized to the data file layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub resource: Resource,
    job_name: String,
}

impl Query {
    pub fn new(resource: Resource, job_name: &str) -> Query {
        Query {
            resource,
            job_name: normalize_job_name(job_name),
        }
    }

    /// Builds a query from user input, rejecting unknown resource mnemonics.
    pub fn parse(resource: &str, job_name: &str) -> Result<Query> {
        Ok(Query::new(Resource::from_str(resource)?, job_name))
    }

    /// job name as it appears in the data file, upper-cased and blank-padded
    pub fn padded_job_name(&self) -> &str {
        &self.job_name
    }

    pub fn job_name(&self) -> &str {
        self.job_name.trim_end()
    }
}

/// Upper-case and left-justify to the fixed column width.
pub fn normalize_job_name(job_name: &str) -> String {
    pad_field(&job_name.trim().to_uppercase())
}

/// First capacity row whose resource column matches the padded mnemonic.
pub fn resolve_capacity(capacities: &[CapacityRecord], resource: Resource) -> Result<i64> {
    let padded = resource.padded();
    capacities
        .iter()
        .find(|c| c.resource.eq_ignore_ascii_case(&padded))
        .map(|c| c.capacity)
        .ok_or_else(|| GraphError::CapacityNotFound(resource.mnemonic().to_string()))
}

pub fn parse_date_time(s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), DATA_DT_FORMAT).map_err(|source| {
        GraphError::Timestamp {
            value: s.to_string(),
            source,
        }
    })
}

/// Keeps only the rows of the latest task instance.
///
/// Rows are grouped by their raw `start_time` token and the greatest token wins,
/// compared as plain strings. Tokens of equal width compare chronologically,
/// tokens of different width may not. Every row of the winning cohort is kept
/// in its original order.
pub fn latest_cohort(points: Vec<SeriesPoint>) -> Vec<SeriesPoint> {
    let latest = match points.iter().map(|p| p.start_time.as_str()).max() {
        Some(t) => t.to_string(),
        None => return points,
    };
    let before = points.len();
    let kept: Vec<SeriesPoint> = points
        .into_iter()
        .filter(|p| p.start_time == latest)
        .collect();
    if kept.len() != before {
        debug!(
            "kept {} of {} rows from the cohort started at {}",
            kept.len(),
            before,
            latest
        );
    }
    kept
}

/// Selects the series of `query` from the loaded records.
///
/// The job must appear somewhere in the data, the resource must have a capacity,
/// and the job must have rows for that resource. Only the latest cohort is kept
/// and every point carries the resolved capacity.
pub fn select(
    observations: &[Observation],
    capacities: &[CapacityRecord],
    query: &Query,
) -> Result<SelectedSeries> {
    let job = query.padded_job_name();
    if !observations.iter().any(|o| o.job_name.eq_ignore_ascii_case(job)) {
        return Err(GraphError::JobNotFound(query.job_name().to_string()));
    }

    let capacity = resolve_capacity(capacities, query.resource)?;
    let code = query.resource.code();
    let mut points = Vec::new();
    for o in observations
        .iter()
        .filter(|o| o.key == code && o.job_name.eq_ignore_ascii_case(job))
    {
        points.push(SeriesPoint {
            task_id: o.task_id.clone(),
            start_time: o.start_time.clone(),
            stck_time: o.stck_time,
            date_time: parse_date_time(&o.date_time)?,
            current_usage: o.current_usage,
            capacity,
        });
    }
    if points.is_empty() {
        return Err(GraphError::NoResourceData {
            job: query.job_name().to_string(),
            resource: query.resource.mnemonic().to_string(),
        });
    }
    debug!(
        "matched {} rows for job {} and resource {} with capacity {}",
        points.len(),
        query.job_name(),
        query.resource,
        capacity
    );

    Ok(SelectedSeries {
        job_name: query.job_name().to_string(),
        resource: query.resource,
        points: latest_cohort(points),
    })
}
