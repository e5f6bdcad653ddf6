// Month view for the date picker: one cell per day with its nightly price
// and whether it can be picked.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::pricing::nightly_rate;
use crate::tables::TableSet;

pub const MONTH_NAMES: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub price: f64,
    pub reserved: bool,
    pub past: bool,
    pub today: bool,
}

impl CalendarDay {
    pub fn selectable(&self) -> bool {
        !self.reserved && !self.past
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    /// Sunday-first grid; `None` pads the days before the 1st.
    pub cells: Vec<Option<CalendarDay>>,
}

impl MonthView {
    pub fn title(&self) -> String {
        match self
            .month
            .checked_sub(1)
            .and_then(|index| MONTH_NAMES.get(index as usize))
        {
            Some(name) => format!("{} {}", name, self.year),
            None => format!("{:02}/{}", self.month, self.year),
        }
    }

    pub fn day(&self, day: u32) -> Option<&CalendarDay> {
        self.cells
            .iter()
            .flatten()
            .find(|cell| cell.date.day() == day)
    }
}

/// Build the month grid for `room_id`. `None` for an invalid year/month.
pub fn month_view(
    tables: &TableSet,
    room_id: &str,
    year: i32,
    month: u32,
    today: NaiveDate,
) -> Option<MonthView> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let offset = first.weekday().num_days_from_sunday() as usize;

    let mut cells: Vec<Option<CalendarDay>> = vec![None; offset];
    cells.extend(first.iter_days().take_while(|date| date.month() == month).map(|date| {
        Some(CalendarDay {
            date,
            price: nightly_rate(tables, room_id, date),
            reserved: tables.is_room_blocked(room_id, date),
            past: date < today,
            today: date == today,
        })
    }));

    Some(MonthView { year, month, cells })
}

pub fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month <= 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}
