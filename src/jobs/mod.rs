//! Background jobs

pub mod spam_scan;
pub mod status;

pub use spam_scan::{ScanAlreadyRunning, SpamScanner};
pub use status::{JobSnapshot, JobStatusStore};
