//! gradebook-core — Student records, roster views, and statistics.
//!
//! This crate holds the data model, validation and grade derivation, the
//! local record store, view and rollup computation, the CSV codec, and the
//! [`session::RosterSession`] that drives them against a
//! [`traits::RosterService`].

pub mod csv_codec;
pub mod error;
pub mod grade;
pub mod model;
pub mod session;
pub mod statistics;
pub mod store;
pub mod traits;
pub mod validate;
pub mod view;

pub use error::RosterError;
pub use model::{EntryForm, Grade, StudentRecord};
pub use session::{Action, ActionOutcome, Notification, NotificationLevel, Notifier, RosterSession};
pub use traits::RosterService;
