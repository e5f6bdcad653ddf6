// Booking widget: drives one reservation form from empty to submitted.
//
// Idle -> DatesChosen -> UnitsSelected -> ExtrasConfigured -> Submitted
//
// The state is derived from what has been filled in, so going back (new
// dates that free no units, fewer guests) moves it back as well.
// Submitted only changes on reset.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::availability::{availability_for_stay, Availability};
use crate::handoff::{Dispatch, HandoffError, MessageChannel};
use crate::pricing::{compute_pricing, ExtrasSelection};
use crate::reservation::{compose_reservation, is_valid, Reservation, Selection, ValidationError};
use crate::rooms::{room_kind, RoomKind, MAX_GUESTS};
use crate::selection::UnitSelection;
use crate::stay::Stay;
use crate::tables::TableSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingState {
    Idle,
    DatesChosen,
    UnitsSelected,
    ExtrasConfigured,
    Submitted,
}

impl fmt::Display for BookingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BookingState::Idle => "idle",
            BookingState::DatesChosen => "dates chosen",
            BookingState::UnitsSelected => "units selected",
            BookingState::ExtrasConfigured => "extras configured",
            BookingState::Submitted => "submitted",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BookingError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Hand-off error: {0}")]
    Handoff(#[from] HandoffError),

    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        state: BookingState,
        action: &'static str,
    },
}

// Live price shown while the form is filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub nights: u32,
    pub lodging: f64,
    pub extras: f64,
    pub total: f64,
}

#[derive(Debug, Clone)]
pub struct Submission {
    pub reservation: Reservation,
    pub dispatch: Dispatch,
}

#[derive(Debug, Clone)]
pub struct BookingWidget {
    room_id: String,
    kind: RoomKind,
    checkin: Option<NaiveDate>,
    checkout: Option<NaiveDate>,
    guests: u32,
    units: UnitSelection,
    extras: ExtrasSelection,
    extras_configured: bool,
    submitted: bool,
}

impl BookingWidget {
    pub fn new(tables: &TableSet, room_id: impl Into<String>) -> Self {
        let room_id = room_id.into();
        let kind = room_kind(tables, &room_id);
        Self {
            room_id,
            kind,
            checkin: None,
            checkout: None,
            guests: 1,
            units: UnitSelection::new(kind, 1),
            extras: ExtrasSelection::default(),
            extras_configured: false,
            submitted: false,
        }
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn kind(&self) -> RoomKind {
        self.kind
    }

    pub fn guests(&self) -> u32 {
        self.guests
    }

    pub fn units(&self) -> &UnitSelection {
        &self.units
    }

    pub fn extras(&self) -> ExtrasSelection {
        self.extras
    }

    pub fn stay(&self) -> Option<Stay> {
        Stay::from_optional(self.checkin, self.checkout)
    }

    pub fn state(&self) -> BookingState {
        if self.submitted {
            BookingState::Submitted
        } else if self.stay().is_none() {
            BookingState::Idle
        } else if self.units.is_empty() {
            BookingState::DatesChosen
        } else if self.extras_configured {
            BookingState::ExtrasConfigured
        } else {
            BookingState::UnitsSelected
        }
    }

    /// The form contents as a composer selection.
    pub fn selection(&self) -> Selection {
        let units = self.units.units().to_vec();
        let (beds, suites) = match self.kind {
            RoomKind::Dorm => (units, Vec::new()),
            RoomKind::Suite => (Vec::new(), units),
        };
        Selection {
            room_id: self.room_id.clone(),
            checkin: self.checkin,
            checkout: self.checkout,
            guests: self.guests,
            beds,
            suites,
            extras: self.extras,
        }
    }

    // Extras are picked per selection; an empty selection forgets them.
    fn settle(&mut self) -> BookingState {
        if self.units.is_empty() {
            self.extras_configured = false;
        }
        self.state()
    }

    fn ensure_open(&self, action: &'static str) -> Result<(), BookingError> {
        if self.submitted {
            return Err(BookingError::InvalidTransition {
                state: BookingState::Submitted,
                action,
            });
        }
        Ok(())
    }

    /// Units free for the current dates.
    pub fn availability(&self, tables: &TableSet) -> Availability {
        match self.stay() {
            Some(stay) => availability_for_stay(tables, &self.room_id, &stay),
            None => Availability::undetermined(),
        }
    }

    /// Set the dates. Picked units no longer free over the new stay are
    /// dropped.
    pub fn choose_dates(
        &mut self,
        tables: &TableSet,
        checkin: Option<NaiveDate>,
        checkout: Option<NaiveDate>,
    ) -> Result<BookingState, BookingError> {
        self.ensure_open("choose dates")?;
        self.checkin = checkin;
        self.checkout = checkout;

        if self.stay().is_some() {
            let availability = self.availability(tables);
            self.units
                .retain_available(availability.units(self.kind));
        }
        Ok(self.settle())
    }

    pub fn set_guests(&mut self, guests: u32) -> Result<BookingState, BookingError> {
        self.ensure_open("change guests")?;
        if guests == 0 || guests > MAX_GUESTS {
            return Err(ValidationError::InvalidGuestCount {
                guests,
                max: MAX_GUESTS,
            }
            .into());
        }
        self.guests = guests;
        self.units.set_guests(guests);
        Ok(self.settle())
    }

    /// Pick or unpick a bed/suite. Needs dates first.
    pub fn toggle_unit(&mut self, tables: &TableSet, unit_id: &str) -> Result<bool, BookingError> {
        self.ensure_open("select units")?;
        if self.stay().is_none() {
            return Err(BookingError::InvalidTransition {
                state: self.state(),
                action: "select units",
            });
        }
        let availability = self.availability(tables);
        let changed = self.units.toggle(unit_id, availability.units(self.kind));
        self.settle();
        Ok(changed)
    }

    pub fn clear_units(&mut self) -> Result<BookingState, BookingError> {
        self.ensure_open("clear units")?;
        self.units.clear();
        Ok(self.settle())
    }

    pub fn configure_extras(&mut self, extras: ExtrasSelection) -> Result<BookingState, BookingError> {
        self.ensure_open("configure extras")?;
        if self.units.is_empty() {
            return Err(BookingError::InvalidTransition {
                state: self.state(),
                action: "configure extras",
            });
        }
        self.extras = extras;
        self.extras_configured = true;
        Ok(self.state())
    }

    pub fn is_valid(&self, tables: &TableSet) -> bool {
        is_valid(tables, &self.selection())
    }

    /// Running total; `None` until the dates form a stay.
    pub fn quote(&self, tables: &TableSet) -> Option<Quote> {
        let stay = self.stay()?;
        let occupancy = match self.kind {
            RoomKind::Dorm => self.guests,
            RoomKind::Suite => self.units.len() as u32,
        };
        let lodging = compute_pricing(tables, &self.room_id, &stay, occupancy).total;
        let extras = self.extras.total(tables);
        Some(Quote {
            nights: stay.night_count(),
            lodging,
            extras,
            total: lodging + extras,
        })
    }

    /// Compose the reservation and hand it to `channel`. Nothing changes
    /// if validation or the hand-off fails.
    pub fn submit(
        &mut self,
        tables: &TableSet,
        channel: &dyn MessageChannel,
    ) -> Result<Submission, BookingError> {
        self.ensure_open("submit")?;
        let reservation = compose_reservation(tables, &self.selection())?;
        let dispatch = channel.dispatch(&reservation.summary)?;
        self.submitted = true;
        info!(
            "Reservation request for {} submitted, total {:.2}",
            self.room_id, reservation.total
        );
        Ok(Submission {
            reservation,
            dispatch,
        })
    }

    pub fn reset(&mut self) {
        self.checkin = None;
        self.checkout = None;
        self.guests = 1;
        self.units = UnitSelection::new(self.kind, 1);
        self.extras = ExtrasSelection::default();
        self.extras_configured = false;
        self.submitted = false;
    }
}
