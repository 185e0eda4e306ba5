//! Job summary record - what documents and the summary printout are built from

use chrono::NaiveDate;
use serde::Serialize;

use crate::entities::job::Job;

/// Checklist state as shown on documents
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChecklistLine {
    pub item: String,
    pub done: bool,
    pub completed_on: Option<NaiveDate>,
    pub assignee: String,
}

/// Flattened, read-only view of a job
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobSummary {
    pub job_number: String,
    pub description: String,
    pub client: String,
    pub client_address: String,
    pub client_phone: String,
    pub drawing: String,
    pub quantity: u32,
    pub cost: Option<f64>,
    pub unit_price: Option<f64>,
    pub total: Option<f64>,
    pub delivery_date: Option<NaiveDate>,
    pub status: String,
    pub part_count: usize,
    pub routing_hours: f64,
    pub checklist: Vec<ChecklistLine>,
}

impl JobSummary {
    pub fn from_job(job: &Job) -> Self {
        Self {
            job_number: job.job_number.clone(),
            description: job.description.clone(),
            client: job.client.clone(),
            client_address: job.client_address.clone(),
            client_phone: job.client_phone.clone(),
            drawing: job.drawing.clone(),
            quantity: job.quantity,
            cost: job.cost,
            unit_price: job.unit_price,
            total: job.total_price(),
            delivery_date: job.target_delivery,
            status: job.status.clone(),
            part_count: job.parts().len(),
            routing_hours: job.routing_hours(),
            checklist: job
                .checklist
                .items()
                .iter()
                .map(|i| ChecklistLine {
                    item: i.milestone.to_string(),
                    done: i.is_done(),
                    completed_on: i.completed_on(),
                    assignee: i.assignee.clone(),
                })
                .collect(),
        }
    }

    /// The labelled summary fields, in printout order
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let money = |v: Option<f64>| v.map(|v| format!("{:.2}", v)).unwrap_or_default();
        vec![
            ("Job Number", self.job_number.clone()),
            ("Description", self.description.clone()),
            ("Client", self.client.clone()),
            ("Quantity", self.quantity.to_string()),
            ("Cost", money(self.cost)),
            ("Unit Price", money(self.unit_price)),
            ("Total", money(self.total)),
            (
                "Delivery Date",
                self.delivery_date.map(|d| d.to_string()).unwrap_or_default(),
            ),
            ("Status", self.status.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_from_job() {
        let mut job = Job::new("123431", "test").unwrap();
        job.client = "MachinMachine".to_string();
        job.quantity = 1000;
        job.unit_price = Some(1000.0);
        job.target_delivery = NaiveDate::from_ymd_opt(2018, 4, 21);
        job.create_part("P-1").unwrap();
        job.checklist
            .toggle("purchase", NaiveDate::from_ymd_opt(2018, 4, 1).unwrap())
            .unwrap();

        let summary = JobSummary::from_job(&job);
        assert_eq!(summary.total, Some(1_000_000.0));
        assert_eq!(summary.part_count, 1);
        assert_eq!(summary.checklist.len(), 4);
        assert!(summary.checklist[2].done);

        let fields = summary.fields();
        assert_eq!(fields[0], ("Job Number", "123431".to_string()));
        assert_eq!(fields[6], ("Total", "1000000.00".to_string()));
        assert_eq!(fields[7], ("Delivery Date", "2018-04-21".to_string()));
        assert_eq!(fields[4], ("Cost", String::new()));
    }
}
