//! `complaintdesk` - Local complaint tracking
//!
//! This library keeps a collection of complaint records in a single persisted
//! key-value slot and provides create, read, status update, delete, bulk
//! export/import, and statistics over it.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod clock;
pub mod complaint;
pub mod config;
pub mod error;
pub mod ids;
pub mod logging;
pub mod storage;
pub mod store;

pub use clock::{Clock, SystemClock};
pub use complaint::{Complaint, ComplaintFilter, ComplaintStatus, NewComplaint};
pub use config::Config;
pub use error::{Error, Result};
pub use ids::{IdGenerator, RandomIds};
pub use logging::init_logging;
pub use storage::{KeyValueStore, MemoryStore, SqliteStore};
pub use store::{export_file_name, ComplaintStats, ComplaintStore, DEFAULT_SLOT_KEY};
