use calnotes_core::models::{MonthRef, WeekStart};
use chrono::{Datelike, Duration, NaiveDate};

/// Local state of the month grid: the visible month, the keyboard day cursor
/// and the month selector popup.
#[derive(Debug, Clone)]
pub struct MonthGrid {
    pub month: MonthRef,
    pub cursor: NaiveDate,
    pub week_start: WeekStart,
    pub selector_open: bool,
    /// Highlighted month (0-based) in the selector
    pub selector_index: usize,
}

impl MonthGrid {
    pub fn new(today: NaiveDate, week_start: WeekStart) -> Self {
        Self {
            month: MonthRef::containing(today),
            cursor: today,
            week_start,
            selector_open: false,
            selector_index: today.month0() as usize,
        }
    }

    pub fn cells(&self) -> Vec<Option<NaiveDate>> {
        self.month.cells(self.week_start)
    }

    /// Number of week rows the visible month needs
    pub fn row_count(&self) -> usize {
        self.cells().len().div_ceil(7)
    }

    pub fn prev_month(&mut self) {
        self.set_month(self.month.prev());
    }

    pub fn next_month(&mut self) {
        self.set_month(self.month.next());
    }

    /// Jump to a 1-based month in the visible year and hide the selector
    pub fn select_month(&mut self, month: u32) -> calnotes_core::Result<()> {
        let target = self.month.with_month(month)?;
        self.set_month(target);
        self.selector_open = false;
        Ok(())
    }

    pub fn toggle_selector(&mut self) {
        self.selector_open = !self.selector_open;
        if self.selector_open {
            self.selector_index = self.month.first_day().month0() as usize;
        }
    }

    pub fn close_selector(&mut self) {
        self.selector_open = false;
    }

    pub fn selector_up(&mut self) {
        self.selector_index = self.selector_index.saturating_sub(1);
    }

    pub fn selector_down(&mut self) {
        self.selector_index = (self.selector_index + 1).min(11);
    }

    pub fn selector_confirm(&mut self) -> calnotes_core::Result<()> {
        self.select_month(self.selector_index as u32 + 1)
    }

    /// Move the day cursor; the visible month follows it
    pub fn move_cursor(&mut self, delta_days: i64) {
        if let Some(date) = self.cursor.checked_add_signed(Duration::days(delta_days)) {
            self.goto(date);
        }
    }

    pub fn goto(&mut self, date: NaiveDate) {
        self.cursor = date;
        self.month = MonthRef::containing(date);
    }

    /// Show `month`, keeping the cursor on the same day number where possible
    fn set_month(&mut self, month: MonthRef) {
        self.month = month;
        if !month.contains(self.cursor) {
            let day = self.cursor.day().min(month.days_in_month());
            self.cursor = month.day(day).unwrap_or(month.first_day());
        }
    }
}
