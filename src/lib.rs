// Booking engine for the hostel site: spreadsheet tables in, availability,
// prices and a reservation request message out.

pub mod availability;
pub mod booking;
pub mod cache;
pub mod calendar;
pub mod defaults;
pub mod format;
pub mod handoff;
pub mod loader;
pub mod pricing;
pub mod reservation;
pub mod rooms;
pub mod selection;
pub mod sheets;
pub mod stay;
pub mod tables;

// Re-export key types for convenience
pub use availability::{compute_availability, Availability};
pub use booking::{BookingError, BookingState, BookingWidget, Quote, Submission};
pub use cache::{CacheConfig, CacheStatsReport, FileStore, MemoryStore, SnapshotCache};
pub use calendar::{month_view, CalendarDay, MonthView};
pub use handoff::{HandoffConfig, HandoffError, MessageChannel, WhatsAppHandoff};
pub use loader::{LoadOutcome, LoadStatus, TableLoader};
pub use pricing::{compute_pricing, Extra, ExtrasSelection, NightlyRate, PriceQuote};
pub use reservation::{compose_reservation, Reservation, Selection, ValidationError};
pub use rooms::{RoomKind, UnitLayout};
pub use sheets::{fetch_all, GoogleSheetsSource, RetryConfig, SheetsConfig, SourceError, TableSource};
pub use stay::Stay;
pub use tables::{Record, TableId, TableSet};
