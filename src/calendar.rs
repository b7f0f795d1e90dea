//! Month grid construction and navigation state.

use chrono::{Datelike, Duration, Local, NaiveDate};

use crate::core::task::Task;

/// The grid always covers 6 weeks; short months are padded with next-month
/// filler so every month renders with the same shape.
pub const GRID_CELLS: usize = 42;

/// At most this many tasks are shown inside a day cell; the rest collapse
/// into an overflow count.
pub const VISIBLE_TASKS_PER_DAY: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub in_current_month: bool,
}

/// Build the 42-cell grid for the month containing `reference`.
///
/// Weeks start on Sunday. The grid opens with trailing days of the previous
/// month up to the month's first weekday, runs through the whole target
/// month, and tops up with leading days of the next month.
pub fn month_grid(reference: NaiveDate) -> Vec<CalendarDay> {
    let first = reference.with_day(1).unwrap_or(reference);
    let offset = first.weekday().num_days_from_sunday() as i64;
    let grid_start = first - Duration::days(offset);

    (0..GRID_CELLS as i64)
        .map(|i| {
            let date = grid_start + Duration::days(i);
            CalendarDay {
                date,
                in_current_month: date.month() == first.month() && date.year() == first.year(),
            }
        })
        .collect()
}

/// Whether `date` is today's real-world date. Evaluated against the clock at
/// call time, never cached.
pub fn is_today(date: NaiveDate) -> bool {
    date == Local::now().date_naive()
}

/// All tasks falling on `date` in local calendar terms, in collection order.
/// Time-of-day is ignored: tasks due at different hours of the same day land
/// in the same cell.
pub fn day_tasks<'a>(tasks: &'a [Task], date: NaiveDate) -> Vec<&'a Task> {
    tasks.iter().filter(|t| t.due_day_local() == date).collect()
}

/// The display bucket for one cell: up to [`VISIBLE_TASKS_PER_DAY`] tasks
/// plus a count of the hidden remainder.
#[derive(Debug)]
pub struct DayBucket<'a> {
    pub visible: Vec<&'a Task>,
    pub hidden: usize,
}

pub fn day_bucket<'a>(tasks: &'a [Task], date: NaiveDate) -> DayBucket<'a> {
    let mut visible = day_tasks(tasks, date);
    let hidden = visible.len().saturating_sub(VISIBLE_TASKS_PER_DAY);
    visible.truncate(VISIBLE_TASKS_PER_DAY);
    DayBucket { visible, hidden }
}

#[derive(Debug, Clone)]
pub struct MonthView {
    /// First day of the displayed month.
    pub displayed_month: NaiveDate,
    /// Currently selected day (shows the detail panel).
    pub selected_day: Option<NaiveDate>,
}

impl Default for MonthView {
    fn default() -> Self {
        let today = Local::now().date_naive();
        Self {
            displayed_month: today.with_day(1).unwrap_or(today),
            selected_day: None,
        }
    }
}

impl MonthView {
    pub fn prev_month(&mut self) {
        self.displayed_month = self
            .displayed_month
            .checked_sub_months(chrono::Months::new(1))
            .unwrap_or(self.displayed_month);
        self.selected_day = None;
    }

    pub fn next_month(&mut self) {
        self.displayed_month = self
            .displayed_month
            .checked_add_months(chrono::Months::new(1))
            .unwrap_or(self.displayed_month);
        self.selected_day = None;
    }

    /// Select a day; selecting the same day again clears the selection.
    pub fn select_day(&mut self, date: NaiveDate) {
        if self.selected_day == Some(date) {
            self.selected_day = None;
        } else {
            self.selected_day = Some(date);
        }
    }

    /// Header label, e.g. "September 2026".
    pub fn month_label(&self) -> String {
        self.displayed_month.format("%B %Y").to_string()
    }

    pub fn grid(&self) -> Vec<CalendarDay> {
        month_grid(self.displayed_month)
    }
}
