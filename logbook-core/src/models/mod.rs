pub mod entry;
pub mod exercise;
pub mod overview;
pub mod week;

pub use entry::{Entry, ResourceLink};
pub use exercise::Exercise;
pub use overview::{DayConflict, DayRecord, Overview, RangeWarning, WeekSummary};
pub use week::{week_of_day, WeekLog, DAYS_PER_WEEK};
