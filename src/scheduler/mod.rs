mod greedy;
mod overlap;
mod priority;
mod report;

pub use greedy::{ordered_scheduler, sort_by_priority};
pub use overlap::overlaps;
pub use priority::classify;
pub use report::{efficiency, print_schedule_summary, report_efficiency, Efficiency};
