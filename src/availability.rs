// Availability of a room and its beds or suites over a stay

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::rooms::{room_kind, RoomKind};
use crate::stay::Stay;
use crate::tables::TableSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    pub available_beds: Vec<String>,
    pub available_suites: Vec<String>,
    pub room_available: bool,
}

impl Availability {
    // Dates not chosen yet: nothing is claimed either way
    pub fn undetermined() -> Self {
        Self {
            available_beds: Vec::new(),
            available_suites: Vec::new(),
            room_available: true,
        }
    }

    pub fn room_blocked() -> Self {
        Self {
            available_beds: Vec::new(),
            available_suites: Vec::new(),
            room_available: false,
        }
    }

    /// Free units for the room kind the result was computed for.
    pub fn units(&self, kind: RoomKind) -> &[String] {
        match kind {
            RoomKind::Dorm => &self.available_beds,
            RoomKind::Suite => &self.available_suites,
        }
    }

    pub fn is_unit_available(&self, kind: RoomKind, unit_id: &str) -> bool {
        self.units(kind).iter().any(|id| id == unit_id)
    }
}

/// Compute which units of `room_id` are free on every night of the stay.
///
/// Missing or inverted dates give [`Availability::undetermined`]. A
/// blocking calendar row on any night empties both unit lists.
pub fn compute_availability(
    tables: &TableSet,
    room_id: &str,
    checkin: Option<NaiveDate>,
    checkout: Option<NaiveDate>,
) -> Availability {
    match Stay::from_optional(checkin, checkout) {
        Some(stay) => availability_for_stay(tables, room_id, &stay),
        None => Availability::undetermined(),
    }
}

pub fn availability_for_stay(tables: &TableSet, room_id: &str, stay: &Stay) -> Availability {
    let nights = stay.nights();

    if nights
        .iter()
        .any(|night| tables.is_room_blocked(room_id, *night))
    {
        return Availability::room_blocked();
    }

    let kind = room_kind(tables, room_id);
    let free_units: Vec<String> = kind
        .layout()
        .unit_ids()
        .into_iter()
        .filter(|unit_id| {
            !nights.iter().any(|night| match kind {
                RoomKind::Dorm => tables.is_bed_booked(room_id, unit_id, *night),
                RoomKind::Suite => tables.is_suite_booked(unit_id, *night),
            })
        })
        .collect();

    match kind {
        RoomKind::Dorm => Availability {
            available_beds: free_units,
            available_suites: Vec::new(),
            room_available: true,
        },
        RoomKind::Suite => Availability {
            available_beds: Vec::new(),
            available_suites: free_units,
            room_available: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stay::parse_date;
    use crate::tables::{BedBooking, CalendarEntry, SuiteBooking};

    fn bed(room_id: &str, date: &str, bed_id: &str, status: &str) -> BedBooking {
        BedBooking {
            room_id: room_id.to_string(),
            date: date.to_string(),
            bed_id: bed_id.to_string(),
            status: status.to_string(),
        }
    }

    fn suite(date: &str, suite_id: &str) -> SuiteBooking {
        SuiteBooking {
            date: date.to_string(),
            suite_id: suite_id.to_string(),
            status: "booked".to_string(),
        }
    }

    #[test]
    fn test_missing_dates_are_undetermined() {
        let tables = TableSet::default();
        let result = compute_availability(&tables, "q007", parse_date("2025-03-10"), None);
        assert_eq!(result, Availability::undetermined());
        assert!(result.room_available);
        assert!(result.available_beds.is_empty());
    }

    #[test]
    fn test_bed_booked_on_one_night_is_excluded_for_whole_stay() {
        let tables = TableSet {
            beds: vec![bed("q007", "2025-03-11", "C3-T", "booked")],
            ..Default::default()
        };

        let result = compute_availability(
            &tables,
            "q007",
            parse_date("2025-03-10"),
            parse_date("2025-03-12"),
        );

        assert!(result.room_available);
        assert_eq!(result.available_beds.len(), 13);
        assert!(!result.available_beds.contains(&"C3-T".to_string()));
        assert!(result.available_beds.contains(&"C3-B".to_string()));
        assert!(result.available_suites.is_empty());
    }

    #[test]
    fn test_booking_outside_stay_or_other_room_is_ignored() {
        let tables = TableSet {
            beds: vec![
                bed("q007", "2025-03-12", "C1-T", "booked"),
                bed("jb", "2025-03-10", "C2-T", "booked"),
                bed("q007", "2025-03-10", "C4-B", "cancelled"),
            ],
            ..Default::default()
        };

        let result = compute_availability(
            &tables,
            "q007",
            parse_date("2025-03-10"),
            parse_date("2025-03-12"),
        );
        assert_eq!(result.available_beds.len(), 14);
    }

    #[test]
    fn test_room_block_empties_everything() {
        let tables = TableSet {
            calendar: vec![CalendarEntry {
                room_id: "q777".to_string(),
                date: "2025-03-11".to_string(),
                status: "blocked".to_string(),
            }],
            ..Default::default()
        };

        let result = compute_availability(
            &tables,
            "q777",
            parse_date("2025-03-10"),
            parse_date("2025-03-13"),
        );
        assert_eq!(result, Availability::room_blocked());
    }

    #[test]
    fn test_suites_are_not_scoped_by_room() {
        let tables = TableSet {
            suites: vec![suite("2025-03-10", "S2")],
            ..Default::default()
        };

        let result = compute_availability(
            &tables,
            "q777",
            parse_date("2025-03-10"),
            parse_date("2025-03-11"),
        );
        assert_eq!(result.available_suites, vec!["S1", "S3"]);
        assert!(result.available_beds.is_empty());
        assert!(result.is_unit_available(RoomKind::Suite, "S1"));
        assert!(!result.is_unit_available(RoomKind::Suite, "S2"));
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let tables = TableSet {
            beds: vec![bed("ar", "2025-03-10", "C5-B", "booked")],
            ..Default::default()
        };
        let checkin = parse_date("2025-03-09");
        let checkout = parse_date("2025-03-12");

        let first = compute_availability(&tables, "ar", checkin, checkout);
        let second = compute_availability(&tables, "ar", checkin, checkout);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
