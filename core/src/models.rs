mod month;
mod note;

pub use month::{MonthRef, WeekStart, MONTH_NAMES};
pub use note::{Note, NoteId};

use chrono::NaiveDate;

/// Format used for day keys (`YYYY-MM-DD`)
pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Day-granularity key used to group notes by date
pub fn day_key(date: NaiveDate) -> String {
    date.format(DAY_KEY_FORMAT).to_string()
}
