// Nightly rates, stay totals and fixed-price extras

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::rooms::base_rate;
use crate::stay::Stay;
use crate::tables::TableSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NightlyRate {
    pub date: NaiveDate,
    pub unit_price: f64,
    pub night_total: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceQuote {
    pub nightly_breakdown: Vec<NightlyRate>,
    pub total: f64,
}

/// Rate for one night: a per-date override, else the room's base rate.
pub fn nightly_rate(tables: &TableSet, room_id: &str, date: NaiveDate) -> f64 {
    tables
        .price_override(room_id, date)
        .unwrap_or_else(|| base_rate(tables, room_id))
}

/// Price a stay. `occupancy` is the guest count for dorms and the number
/// of selected suites for the suite room.
pub fn compute_pricing(tables: &TableSet, room_id: &str, stay: &Stay, occupancy: u32) -> PriceQuote {
    let nightly_breakdown: Vec<NightlyRate> = stay
        .nights()
        .into_iter()
        .map(|date| {
            let unit_price = nightly_rate(tables, room_id, date);
            NightlyRate {
                date,
                unit_price,
                night_total: unit_price * occupancy as f64,
            }
        })
        .collect();

    let total = nightly_breakdown.iter().map(|night| night.night_total).sum();

    PriceQuote {
        nightly_breakdown,
        total,
    }
}

// Optional add-ons sold at a fixed price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Extra {
    EarlyCheckin,
    LateCheckout,
    TransferArrival,
    TransferDeparture,
}

impl Extra {
    // Summary order
    pub const ALL: [Extra; 4] = [
        Extra::EarlyCheckin,
        Extra::LateCheckout,
        Extra::TransferArrival,
        Extra::TransferDeparture,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Extra::EarlyCheckin => "early_checkin",
            Extra::LateCheckout => "late_checkout",
            Extra::TransferArrival => "transfer_arrival",
            Extra::TransferDeparture => "transfer_departure",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Extra::EarlyCheckin => "Check-in antecipado",
            Extra::LateCheckout => "Check-out estendido",
            Extra::TransferArrival => "Transfer ida",
            Extra::TransferDeparture => "Transfer volta",
        }
    }

    /// Price from the extras table; a missing key costs nothing.
    pub fn price(&self, tables: &TableSet) -> f64 {
        tables.extra_price(self.key()).unwrap_or(0.0)
    }
}

// Which extras a guest ticked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExtrasSelection {
    pub early_checkin: bool,
    pub late_checkout: bool,
    pub transfer_arrival: bool,
    pub transfer_departure: bool,
}

impl ExtrasSelection {
    pub fn is_selected(&self, extra: Extra) -> bool {
        match extra {
            Extra::EarlyCheckin => self.early_checkin,
            Extra::LateCheckout => self.late_checkout,
            Extra::TransferArrival => self.transfer_arrival,
            Extra::TransferDeparture => self.transfer_departure,
        }
    }

    pub fn selected(&self) -> impl Iterator<Item = Extra> + '_ {
        Extra::ALL
            .into_iter()
            .filter(move |extra| self.is_selected(*extra))
    }

    pub fn any(&self) -> bool {
        self.selected().next().is_some()
    }

    /// Priced line items in summary order.
    pub fn line_items(&self, tables: &TableSet) -> Vec<(Extra, f64)> {
        self.selected()
            .map(|extra| (extra, extra.price(tables)))
            .collect()
    }

    pub fn total(&self, tables: &TableSet) -> f64 {
        self.line_items(tables).iter().map(|(_, price)| price).sum()
    }
}
