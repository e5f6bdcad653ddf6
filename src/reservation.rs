// Reservation composer: validates a booking selection, totals it and
// renders the request message sent to the hostel.

use std::fmt::Write;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::availability::availability_for_stay;
use crate::format::{format_br_date, format_brl};
use crate::pricing::{compute_pricing, Extra, ExtrasSelection, PriceQuote};
use crate::rooms::{catalogue_room, room_kind, room_name, RoomKind, MAX_GUESTS};
use crate::stay::Stay;
use crate::tables::TableSet;

pub const CHECKIN_TIME: &str = "14:00";
pub const CHECKOUT_TIME: &str = "12:00";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Check-in and check-out dates are required")]
    MissingDates,

    #[error("Check-out must be after check-in")]
    CheckoutNotAfterCheckin,

    #[error("Guest count must be between 1 and {max}, got {guests}")]
    InvalidGuestCount { guests: u32, max: u32 },

    #[error("Unknown room: {0}")]
    UnknownRoom(String),

    #[error("Select at least one bed")]
    NoBedsSelected,

    #[error("{selected} beds selected for {guests} guests")]
    TooManyBeds { selected: usize, guests: u32 },

    #[error("Select at least one suite")]
    NoSuitesSelected,

    #[error("{selected} suites selected, at most {max} available")]
    TooManySuites { selected: usize, max: usize },

    #[error("Room is not available for the chosen dates")]
    RoomUnavailable,

    #[error("Unit {0} is not available for the chosen dates")]
    UnitUnavailable(String),
}

// Everything a guest picked in the booking form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub room_id: String,
    pub checkin: Option<NaiveDate>,
    pub checkout: Option<NaiveDate>,
    pub guests: u32,
    pub beds: Vec<String>,
    pub suites: Vec<String>,
    pub extras: ExtrasSelection,
}

impl Selection {
    pub fn new(room_id: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            checkin: None,
            checkout: None,
            guests: 1,
            beds: Vec::new(),
            suites: Vec::new(),
            extras: ExtrasSelection::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub room_id: String,
    pub title: String,
    pub stay: Stay,
    pub guests: u32,
    pub units: Vec<String>,
    pub pricing: PriceQuote,
    pub extras: Vec<(Extra, f64)>,
    pub extras_total: f64,
    pub total: f64,
    pub summary: String,
}

/// Check a selection against the tables. On success returns the stay.
pub fn validate(tables: &TableSet, selection: &Selection) -> Result<Stay, ValidationError> {
    let (checkin, checkout) = match (selection.checkin, selection.checkout) {
        (Some(checkin), Some(checkout)) => (checkin, checkout),
        _ => return Err(ValidationError::MissingDates),
    };
    let stay = Stay::new(checkin, checkout).ok_or(ValidationError::CheckoutNotAfterCheckin)?;

    if selection.guests == 0 || selection.guests > MAX_GUESTS {
        return Err(ValidationError::InvalidGuestCount {
            guests: selection.guests,
            max: MAX_GUESTS,
        });
    }

    if tables.room(&selection.room_id).is_none() && catalogue_room(&selection.room_id).is_none() {
        return Err(ValidationError::UnknownRoom(selection.room_id.clone()));
    }

    let kind = room_kind(tables, &selection.room_id);
    let units = match kind {
        RoomKind::Dorm => {
            if selection.beds.is_empty() {
                return Err(ValidationError::NoBedsSelected);
            }
            let limit = (selection.guests as usize).min(kind.layout().max_selection);
            if selection.beds.len() > limit {
                return Err(ValidationError::TooManyBeds {
                    selected: selection.beds.len(),
                    guests: selection.guests,
                });
            }
            &selection.beds
        }
        RoomKind::Suite => {
            if selection.suites.is_empty() {
                return Err(ValidationError::NoSuitesSelected);
            }
            let max = kind.layout().max_selection;
            if selection.suites.len() > max {
                return Err(ValidationError::TooManySuites {
                    selected: selection.suites.len(),
                    max,
                });
            }
            &selection.suites
        }
    };

    let availability = availability_for_stay(tables, &selection.room_id, &stay);
    if !availability.room_available {
        return Err(ValidationError::RoomUnavailable);
    }
    for (index, unit) in units.iter().enumerate() {
        if !availability.is_unit_available(kind, unit) || units[..index].contains(unit) {
            return Err(ValidationError::UnitUnavailable(unit.clone()));
        }
    }

    Ok(stay)
}

pub fn is_valid(tables: &TableSet, selection: &Selection) -> bool {
    validate(tables, selection).is_ok()
}

/// Validate, price and summarise a selection.
pub fn compose_reservation(
    tables: &TableSet,
    selection: &Selection,
) -> Result<Reservation, ValidationError> {
    let stay = validate(tables, selection)?;
    let kind = room_kind(tables, &selection.room_id);

    let units = match kind {
        RoomKind::Dorm => selection.beds.clone(),
        RoomKind::Suite => selection.suites.clone(),
    };
    let occupancy = match kind {
        RoomKind::Dorm => selection.guests,
        RoomKind::Suite => units.len() as u32,
    };

    let pricing = compute_pricing(tables, &selection.room_id, &stay, occupancy);
    let extras = selection.extras.line_items(tables);
    let extras_total: f64 = extras.iter().map(|(_, price)| price).sum();
    let total = pricing.total + extras_total;
    let title = room_name(tables, &selection.room_id);

    let summary = render_summary(&title, kind, &stay, selection.guests, &units, pricing.total, &extras, total);

    debug!(
        "Composed reservation for {} {}-{}: {} unit(s), total {:.2}",
        selection.room_id,
        stay.checkin(),
        stay.checkout(),
        units.len(),
        total
    );

    Ok(Reservation {
        room_id: selection.room_id.clone(),
        title,
        stay,
        guests: selection.guests,
        units,
        pricing,
        extras,
        extras_total,
        total,
        summary,
    })
}

#[allow(clippy::too_many_arguments)]
fn render_summary(
    title: &str,
    kind: RoomKind,
    stay: &Stay,
    guests: u32,
    units: &[String],
    base_total: f64,
    extras: &[(Extra, f64)],
    total: f64,
) -> String {
    let (icon, units_label) = match kind {
        RoomKind::Dorm => ("🛏️", "Camas"),
        RoomKind::Suite => ("🏠", "Suítes"),
    };

    let mut message = String::new();
    // Writing to a String cannot fail
    let _ = write!(
        message,
        "Olá! Gostaria de solicitar reserva para {title}.\n\n\
         📅 Check-in: {} (entrada às {CHECKIN_TIME})\n\
         📅 Check-out: {} (saída até {CHECKOUT_TIME})\n\
         🌙 Noites: {}\n\
         👥 Hóspedes: {guests}\n\
         {icon} {units_label} escolhidas: {}\n\n\
         💰 Resumo de valores:\n\
         - Valor base: {}",
        format_br_date(stay.checkin()),
        format_br_date(stay.checkout()),
        stay.night_count(),
        units.join(", "),
        format_brl(base_total),
    );
    for (extra, price) in extras {
        let _ = write!(message, "\n- {}: {}", extra.label(), format_brl(*price));
    }
    let _ = write!(message, "\n\n💵 Total: {}\n\nObrigado!", format_brl(total));
    message
}
