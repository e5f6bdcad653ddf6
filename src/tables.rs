// Spreadsheet tables: raw CSV records and the typed rows built from them.
// Every cell stays a string; numbers and dates are converted where they are used.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// One spreadsheet row, keyed by header name.
pub type Record = BTreeMap<String, String>;

// Calendar statuses that take the whole room out of sale for a night
pub const BLOCKING_STATUSES: [&str; 2] = ["reserved", "blocked"];
pub const BOOKED_STATUS: &str = "booked";

// The six tabs of the booking spreadsheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TableId {
    Calendar,
    Pricing,
    Rooms,
    Beds,
    Suites,
    Extras,
}

impl TableId {
    pub const ALL: [TableId; 6] = [
        TableId::Calendar,
        TableId::Pricing,
        TableId::Rooms,
        TableId::Beds,
        TableId::Suites,
        TableId::Extras,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TableId::Calendar => "calendar",
            TableId::Pricing => "pricing",
            TableId::Rooms => "rooms",
            TableId::Beds => "beds",
            TableId::Suites => "suites",
            TableId::Extras => "extras",
        }
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parse CSV text into records. The first line names the columns; short
/// rows get `""` for their missing trailing cells.
pub fn parse_csv(text: &str) -> Result<Vec<Record>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.trim().as_bytes());

    let headers = reader.headers()?.clone();
    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let record = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.to_string(), row.get(i).unwrap_or("").to_string()))
            .collect();
        records.push(record);
    }
    Ok(records)
}

fn cell(record: &Record, column: &str) -> String {
    record.get(column).cloned().unwrap_or_default()
}

/// Format a date the way the spreadsheet stores it.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a price cell. Blank or malformed cells count as absent.
pub fn parse_price(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub room_id: String,
    pub date: String,
    pub status: String,
}

impl CalendarEntry {
    pub fn is_blocking(&self) -> bool {
        BLOCKING_STATUSES.contains(&self.status.as_str())
    }
}

impl From<&Record> for CalendarEntry {
    fn from(record: &Record) -> Self {
        Self {
            room_id: cell(record, "room_id"),
            date: cell(record, "date"),
            status: cell(record, "status"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceOverride {
    pub room_id: String,
    pub date: String,
    pub price: String,
}

impl From<&Record> for PriceOverride {
    fn from(record: &Record) -> Self {
        Self {
            room_id: cell(record, "room_id"),
            date: cell(record, "date"),
            price: cell(record, "price"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomDefinition {
    pub room_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub room_type: String,
    pub max_guests: String,
}

impl From<&Record> for RoomDefinition {
    fn from(record: &Record) -> Self {
        Self {
            room_id: cell(record, "room_id"),
            name: cell(record, "name"),
            room_type: cell(record, "type"),
            max_guests: cell(record, "max_guests"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BedBooking {
    pub room_id: String,
    pub date: String,
    pub bed_id: String,
    pub status: String,
}

impl From<&Record> for BedBooking {
    fn from(record: &Record) -> Self {
        Self {
            room_id: cell(record, "room_id"),
            date: cell(record, "date"),
            bed_id: cell(record, "bed_id"),
            status: cell(record, "status"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuiteBooking {
    pub date: String,
    pub suite_id: String,
    pub status: String,
}

impl From<&Record> for SuiteBooking {
    fn from(record: &Record) -> Self {
        Self {
            date: cell(record, "date"),
            suite_id: cell(record, "suite_id"),
            status: cell(record, "status"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtraCharge {
    pub key: String,
    pub price: String,
}

impl From<&Record> for ExtraCharge {
    fn from(record: &Record) -> Self {
        Self {
            key: cell(record, "key"),
            price: cell(record, "price"),
        }
    }
}

// Immutable snapshot of all six tables for one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableSet {
    pub calendar: Vec<CalendarEntry>,
    pub pricing: Vec<PriceOverride>,
    pub rooms: Vec<RoomDefinition>,
    pub beds: Vec<BedBooking>,
    pub suites: Vec<SuiteBooking>,
    pub extras: Vec<ExtraCharge>,
}

impl TableSet {
    /// Build a snapshot from raw records, one batch per table.
    pub fn from_records<I>(tables: I) -> Self
    where
        I: IntoIterator<Item = (TableId, Vec<Record>)>,
    {
        let mut set = TableSet::default();
        for (table, records) in tables {
            match table {
                TableId::Calendar => set.calendar = records.iter().map(Into::into).collect(),
                TableId::Pricing => set.pricing = records.iter().map(Into::into).collect(),
                TableId::Rooms => set.rooms = records.iter().map(Into::into).collect(),
                TableId::Beds => set.beds = records.iter().map(Into::into).collect(),
                TableId::Suites => set.suites = records.iter().map(Into::into).collect(),
                TableId::Extras => set.extras = records.iter().map(Into::into).collect(),
            }
        }
        set
    }

    /// First parseable price for `key` in the extras table.
    pub fn extra_price(&self, key: &str) -> Option<f64> {
        self.extras
            .iter()
            .find(|extra| extra.key == key)
            .and_then(|extra| parse_price(&extra.price))
    }

    pub fn price_override(&self, room_id: &str, date: NaiveDate) -> Option<f64> {
        let day = date_key(date);
        self.pricing
            .iter()
            .find(|row| row.room_id == room_id && row.date == day)
            .and_then(|row| parse_price(&row.price))
    }

    pub fn is_room_blocked(&self, room_id: &str, date: NaiveDate) -> bool {
        let day = date_key(date);
        self.calendar
            .iter()
            .any(|row| row.room_id == room_id && row.date == day && row.is_blocking())
    }

    pub fn room(&self, room_id: &str) -> Option<&RoomDefinition> {
        self.rooms.iter().find(|room| room.room_id == room_id)
    }

    pub fn is_bed_booked(&self, room_id: &str, bed_id: &str, date: NaiveDate) -> bool {
        let day = date_key(date);
        self.beds.iter().any(|bed| {
            bed.room_id == room_id
                && bed.bed_id == bed_id
                && bed.date == day
                && bed.status == BOOKED_STATUS
        })
    }

    // Suite rows carry no room id: there is a single suite room.
    pub fn is_suite_booked(&self, suite_id: &str, date: NaiveDate) -> bool {
        let day = date_key(date);
        self.suites.iter().any(|suite| {
            suite.suite_id == suite_id && suite.date == day && suite.status == BOOKED_STATUS
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_parse_csv_maps_headers_to_values() {
        let text = "room_id,date,status\njb,2025-03-10,reserved\nar,2025-03-11,blocked\n";
        let records = parse_csv(text).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["room_id"], "jb");
        assert_eq!(records[0]["date"], "2025-03-10");
        assert_eq!(records[1]["status"], "blocked");
    }

    #[test]
    fn test_parse_csv_short_rows_yield_empty_cells() {
        let text = "room_id,date,bed_id,status\nq007,2025-03-11\n";
        let records = parse_csv(text).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["date"], "2025-03-11");
        assert_eq!(records[0]["bed_id"], "");
        assert_eq!(records[0]["status"], "");
    }

    #[test]
    fn test_parse_csv_trims_cells() {
        let records = parse_csv(" key , price \n early_checkin , 30 \n").unwrap();
        assert_eq!(records[0]["key"], "early_checkin");
        assert_eq!(records[0]["price"], "30");
    }

    #[test]
    fn test_parse_csv_header_only_or_empty_is_empty() {
        assert!(parse_csv("key,price\n").unwrap().is_empty());
        assert!(parse_csv("").unwrap().is_empty());
    }

    #[test]
    fn test_table_set_from_records() {
        let calendar = parse_csv("room_id,date,status\njb,2025-03-10,reserved").unwrap();
        let extras = parse_csv("key,price\nearly_checkin,30\nlate_checkout,abc").unwrap();
        let set = TableSet::from_records(vec![
            (TableId::Calendar, calendar),
            (TableId::Extras, extras),
        ]);

        assert_eq!(set.calendar.len(), 1);
        assert!(set.is_room_blocked("jb", day("2025-03-10")));
        assert!(!set.is_room_blocked("jb", day("2025-03-11")));
        assert_eq!(set.extra_price("early_checkin"), Some(30.0));
        assert_eq!(set.extra_price("late_checkout"), None);
        assert_eq!(set.extra_price("missing"), None);
    }

    #[test]
    fn test_non_blocking_status_does_not_block() {
        let set = TableSet {
            calendar: vec![CalendarEntry {
                room_id: "ar".to_string(),
                date: "2025-03-10".to_string(),
                status: "available".to_string(),
            }],
            ..Default::default()
        };
        assert!(!set.is_room_blocked("ar", day("2025-03-10")));
    }
}
