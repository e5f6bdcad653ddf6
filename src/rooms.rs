// Room catalogue and the fixed unit layout of each room kind

use serde::{Deserialize, Serialize};

use crate::tables::TableSet;

pub const MAX_GUESTS: u32 = 14;
pub const DEFAULT_BASE_PRICE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomKind {
    Dorm,
    Suite,
}

impl RoomKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "dorm" => Some(RoomKind::Dorm),
            "suite" => Some(RoomKind::Suite),
            _ => None,
        }
    }

    pub fn layout(&self) -> &'static UnitLayout {
        match self {
            RoomKind::Dorm => &DORM_LAYOUT,
            RoomKind::Suite => &SUITE_LAYOUT,
        }
    }
}

// Bookable slots of a room kind: `groups` × `positions`, or a plain
// numbered list when there are no positions.
#[derive(Debug)]
pub struct UnitLayout {
    pub prefix: &'static str,
    pub groups: u32,
    pub positions: &'static [&'static str],
    pub max_selection: usize,
}

impl UnitLayout {
    /// Unit ids in display order.
    pub fn unit_ids(&self) -> Vec<String> {
        let mut ids = Vec::with_capacity(self.capacity());
        for group in 1..=self.groups {
            if self.positions.is_empty() {
                ids.push(format!("{}{}", self.prefix, group));
            } else {
                for position in self.positions {
                    ids.push(format!("{}{}-{}", self.prefix, group, position));
                }
            }
        }
        ids
    }

    pub fn capacity(&self) -> usize {
        self.groups as usize * self.positions.len().max(1)
    }

    pub fn contains(&self, unit_id: &str) -> bool {
        self.unit_ids().iter().any(|id| id == unit_id)
    }
}

// 7 bunks, top and bottom
pub static DORM_LAYOUT: UnitLayout = UnitLayout {
    prefix: "C",
    groups: 7,
    positions: &["T", "B"],
    max_selection: 14,
};

pub static SUITE_LAYOUT: UnitLayout = UnitLayout {
    prefix: "S",
    groups: 3,
    positions: &[],
    max_selection: 3,
};

#[derive(Debug, Clone, PartialEq)]
pub struct RoomSpec {
    pub room_id: &'static str,
    pub name: &'static str,
    pub kind: RoomKind,
    pub base_price_key: &'static str,
}

pub static CATALOGUE: [RoomSpec; 4] = [
    RoomSpec {
        room_id: "jb",
        name: "Nice Place",
        kind: RoomKind::Dorm,
        base_price_key: "base_price_nice_place",
    },
    RoomSpec {
        room_id: "ar",
        name: "Quarto Feminino FreiSa",
        kind: RoomKind::Dorm,
        base_price_key: "base_price_quarto_feminino",
    },
    RoomSpec {
        room_id: "q007",
        name: "Quarto Misto",
        kind: RoomKind::Dorm,
        base_price_key: "base_price_quarto_misto",
    },
    RoomSpec {
        room_id: "q777",
        name: "Suítes",
        kind: RoomKind::Suite,
        base_price_key: "base_price_suites",
    },
];

pub fn catalogue_room(room_id: &str) -> Option<&'static RoomSpec> {
    CATALOGUE.iter().find(|room| room.room_id == room_id)
}

/// Kind of a room: the rooms table wins, then the catalogue, then dorm.
pub fn room_kind(tables: &TableSet, room_id: &str) -> RoomKind {
    tables
        .room(room_id)
        .and_then(|room| RoomKind::parse(&room.room_type))
        .or_else(|| catalogue_room(room_id).map(|room| room.kind))
        .unwrap_or(RoomKind::Dorm)
}

/// Display name of a room, falling back to its id.
pub fn room_name(tables: &TableSet, room_id: &str) -> String {
    tables
        .room(room_id)
        .map(|room| room.name.clone())
        .filter(|name| !name.is_empty())
        .or_else(|| catalogue_room(room_id).map(|room| room.name.to_string()))
        .unwrap_or_else(|| room_id.to_string())
}

/// Nightly base rate from the extras table.
pub fn base_rate(tables: &TableSet, room_id: &str) -> f64 {
    catalogue_room(room_id)
        .and_then(|room| tables.extra_price(room.base_price_key))
        .unwrap_or(DEFAULT_BASE_PRICE)
}
