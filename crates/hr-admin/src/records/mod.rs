//! Loosely typed records as returned by the REST collaborators.
//!
//! Every field the core reads is tolerant of absence: numbers default to zero, timestamps and
//! references to `None`, so one malformed document never aborts a report pass.

mod entity;
mod fleet;
mod inventory;
pub(crate) mod lenient;
mod talent;

pub use entity::{EntityRef, PopulatedEntity};
pub use fleet::{LogBookEntry, MaintenanceRecord, Vehicle};
pub use inventory::{GroceryItem, TimestampField};
pub use lenient::parse_timestamp;
pub use talent::{Application, Candidate, JobPosting};
