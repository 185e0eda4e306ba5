//! Derived planning data: delivery schedule, bulk part generation, profitability

pub mod bulk;
pub mod delivery;
pub mod profit;

pub use bulk::{demonstration, generate, parse_quantity, read_records, PartRecord};
pub use delivery::{
    classify, job_schedule, project_status, DeliveryStatus, JobSchedule, ScheduleRow,
    ScheduledDelivery,
};
pub use profit::{profit_series, ProfitPoint};
