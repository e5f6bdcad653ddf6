// Built-in dataset used when no spreadsheet is configured

use crate::rooms::{RoomKind, CATALOGUE};
use crate::tables::{ExtraCharge, RoomDefinition, TableSet};

const DEFAULT_EXTRAS: [(&str, &str); 8] = [
    ("early_checkin", "30"),
    ("late_checkout", "30"),
    ("transfer_arrival", "150"),
    ("transfer_departure", "150"),
    ("base_price_nice_place", "100"),
    ("base_price_quarto_feminino", "120"),
    ("base_price_quarto_misto", "100"),
    ("base_price_suites", "300"),
];

pub fn default_tables() -> TableSet {
    let rooms = CATALOGUE
        .iter()
        .map(|room| {
            let (room_type, max_guests) = match room.kind {
                RoomKind::Dorm => ("dorm", "14"),
                RoomKind::Suite => ("suite", "3"),
            };
            RoomDefinition {
                room_id: room.room_id.to_string(),
                name: room.name.to_string(),
                room_type: room_type.to_string(),
                max_guests: max_guests.to_string(),
            }
        })
        .collect();

    let extras = DEFAULT_EXTRAS
        .iter()
        .map(|(key, price)| ExtraCharge {
            key: key.to_string(),
            price: price.to_string(),
        })
        .collect();

    TableSet {
        rooms,
        extras,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rooms::base_rate;

    #[test]
    fn test_default_tables_cover_catalogue() {
        let tables = default_tables();
        assert_eq!(tables.rooms.len(), 4);
        assert!(tables.calendar.is_empty());
        assert!(tables.beds.is_empty());
        assert_eq!(base_rate(&tables, "ar"), 120.0);
        assert_eq!(base_rate(&tables, "q777"), 300.0);
        assert_eq!(tables.extra_price("transfer_departure"), Some(150.0));
        assert_eq!(tables.room("q777").map(|r| r.room_type.as_str()), Some("suite"));
    }
}
