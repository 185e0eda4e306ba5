//! Per-part profitability series for charting

use serde::Serialize;

use crate::entities::job::Job;
use crate::entities::part::PartRouter;

/// One bar of the profit chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfitPoint {
    pub label: String,
    pub revenue: f64,
    pub cost: f64,
    /// `(revenue - cost) / cost * 100`
    pub percent: f64,
}

/// Batch cost of a part: material/unit cost for the quantity plus routed labour
pub fn part_cost(part: &PartRouter, hourly_rate: f64) -> f64 {
    part.cost.unwrap_or(0.0) * f64::from(part.quantity) + part.routing_hours() * hourly_rate
}

fn profit_point(part: &PartRouter, hourly_rate: f64) -> Option<ProfitPoint> {
    let revenue = part.price? * f64::from(part.quantity);
    let cost = part_cost(part, hourly_rate);
    if cost <= 0.0 {
        return None;
    }
    Some(ProfitPoint {
        label: part.part_number.clone(),
        revenue,
        cost,
        percent: (revenue - cost) / cost * 100.0,
    })
}

/// Profit percentage per part, in display order.
///
/// Parts without a price, or whose total cost is zero, have no meaningful
/// percentage and are left out.
pub fn profit_series(job: &Job, hourly_rate: f64) -> Vec<ProfitPoint> {
    job.parts()
        .iter()
        .filter_map(|p| profit_point(p, hourly_rate))
        .collect()
}
