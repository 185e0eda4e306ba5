//! Delivery scheduling - compare estimated part dates with a reference date
//!
//! Straight-line date comparison only: a date on or before the reference is
//! on time, anything after it is late.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::core::error::RoutingError;
use crate::entities::job::Job;

/// Derived delivery status, never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    OnTime,
    Late,
}

impl DeliveryStatus {
    pub fn from_offset(day_offset: i64) -> Self {
        if day_offset <= 0 {
            DeliveryStatus::OnTime
        } else {
            DeliveryStatus::Late
        }
    }
}

impl std::fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryStatus::OnTime => write!(f, "on time"),
            DeliveryStatus::Late => write!(f, "late"),
        }
    }
}

/// A date classified against the reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScheduledDelivery {
    pub date: NaiveDate,
    /// `date - reference` in whole days
    pub day_offset: i64,
    pub status: DeliveryStatus,
}

impl ScheduledDelivery {
    pub fn new(date: NaiveDate, reference: NaiveDate) -> Self {
        let day_offset = (date - reference).num_days();
        Self {
            date,
            day_offset,
            status: DeliveryStatus::from_offset(day_offset),
        }
    }
}

/// Classify every part date against the reference
pub fn classify(
    part_dates: &BTreeMap<String, NaiveDate>,
    reference: NaiveDate,
) -> BTreeMap<String, ScheduledDelivery> {
    part_dates
        .iter()
        .map(|(part, date)| (part.clone(), ScheduledDelivery::new(*date, reference)))
        .collect()
}

/// The project is delivered when its last part is
pub fn project_status(
    part_dates: &BTreeMap<String, NaiveDate>,
    reference: NaiveDate,
) -> Result<ScheduledDelivery, RoutingError> {
    part_dates
        .values()
        .max()
        .map(|last| ScheduledDelivery::new(*last, reference))
        .ok_or(RoutingError::NoPartsScheduled)
}

/// One row of a job's delivery schedule, in part display order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleRow {
    pub part_number: String,
    /// `None` for parts without an estimated date
    pub delivery: Option<ScheduledDelivery>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobSchedule {
    pub reference: NaiveDate,
    pub rows: Vec<ScheduleRow>,
    pub project: ScheduledDelivery,
}

impl JobSchedule {
    pub fn late_parts(&self) -> impl Iterator<Item = &ScheduleRow> {
        self.rows
            .iter()
            .filter(|r| matches!(r.delivery, Some(d) if d.status == DeliveryStatus::Late))
    }
}

/// Full schedule for a job, using its target delivery as the reference
pub fn job_schedule(job: &Job) -> Result<JobSchedule, RoutingError> {
    let reference = job
        .target_delivery
        .ok_or_else(|| RoutingError::MissingTargetDate(job.job_number.clone()))?;

    let project = project_status(&job.part_delivery_dates(), reference)?;
    let rows = job
        .parts()
        .iter()
        .map(|p| ScheduleRow {
            part_number: p.part_number.clone(),
            delivery: p
                .estimated_delivery
                .map(|d| ScheduledDelivery::new(d, reference)),
        })
        .collect();

    tracing::debug!(job = %job.job_number, %reference, "delivery schedule computed");
    Ok(JobSchedule {
        reference,
        rows,
        project,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2018, m, d).unwrap()
    }

    fn six_parts() -> BTreeMap<String, NaiveDate> {
        [(4, 18), (4, 17), (4, 22), (4, 28), (4, 17), (4, 21)]
            .iter()
            .enumerate()
            .map(|(i, (m, d))| (format!("Part-{:02}", i + 1), date(*m, *d)))
            .collect()
    }

    #[test]
    fn test_classify_boundaries() {
        let reference = date(4, 21);
        let dates: BTreeMap<_, _> = [
            ("same".to_string(), date(4, 21)),
            ("after".to_string(), date(4, 22)),
            ("before".to_string(), date(4, 17)),
        ]
        .into_iter()
        .collect();
        let out = classify(&dates, reference);

        assert_eq!(out["same"].day_offset, 0);
        assert_eq!(out["same"].status, DeliveryStatus::OnTime);
        assert_eq!(out["after"].day_offset, 1);
        assert_eq!(out["after"].status, DeliveryStatus::Late);
        assert_eq!(out["before"].day_offset, -4);
        assert_eq!(out["before"].status, DeliveryStatus::OnTime);
    }

    #[test]
    fn test_project_status_requires_parts() {
        assert_eq!(
            project_status(&BTreeMap::new(), date(4, 21)).unwrap_err(),
            RoutingError::NoPartsScheduled
        );
    }

    #[test]
    fn test_six_part_scenario() {
        let reference = date(4, 21);
        let out = classify(&six_parts(), reference);
        let late: Vec<_> = out
            .iter()
            .filter(|(_, s)| s.status == DeliveryStatus::Late)
            .map(|(p, _)| p.as_str())
            .collect();
        assert_eq!(late, ["Part-03", "Part-04"]);

        let project = project_status(&six_parts(), reference).unwrap();
        assert_eq!(project.date, date(4, 28));
        assert_eq!(project.day_offset, 7);
        assert_eq!(project.status, DeliveryStatus::Late);
    }

    #[test]
    fn test_job_schedule_lists_unscheduled_parts() {
        let mut job = Job::new("J-1", "test").unwrap();
        job.create_part("A").unwrap().estimated_delivery = Some(date(4, 20));
        job.create_part("B").unwrap();
        job.create_part("C").unwrap().estimated_delivery = Some(date(4, 23));

        assert_eq!(
            job_schedule(&job).unwrap_err(),
            RoutingError::MissingTargetDate("J-1".to_string())
        );

        job.target_delivery = Some(date(4, 21));
        let schedule = job_schedule(&job).unwrap();
        assert_eq!(schedule.rows.len(), 3);
        assert_eq!(schedule.rows[1].delivery, None);
        assert_eq!(schedule.project.day_offset, 2);
        let late: Vec<_> = schedule.late_parts().map(|r| r.part_number.as_str()).collect();
        assert_eq!(late, ["C"]);
    }
}
