use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

// A stay over the half-open night range [checkin, checkout).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stay {
    checkin: NaiveDate,
    checkout: NaiveDate,
}

impl Stay {
    /// `None` unless checkout is strictly after checkin.
    pub fn new(checkin: NaiveDate, checkout: NaiveDate) -> Option<Self> {
        (checkout > checkin).then_some(Self { checkin, checkout })
    }

    /// Same as [`Stay::new`] but for dates that may not be chosen yet.
    pub fn from_optional(checkin: Option<NaiveDate>, checkout: Option<NaiveDate>) -> Option<Self> {
        Self::new(checkin?, checkout?)
    }

    pub fn checkin(&self) -> NaiveDate {
        self.checkin
    }

    pub fn checkout(&self) -> NaiveDate {
        self.checkout
    }

    pub fn night_count(&self) -> u32 {
        (self.checkout - self.checkin).num_days() as u32
    }

    /// Every night of the stay, checkin included, checkout excluded.
    pub fn nights(&self) -> Vec<NaiveDate> {
        let mut nights = Vec::with_capacity(self.night_count() as usize);
        let mut night = self.checkin;
        while night < self.checkout {
            nights.push(night);
            match night.checked_add_days(Days::new(1)) {
                Some(next) => night = next,
                None => break,
            }
        }
        nights
    }
}

/// Parse an ISO `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}
