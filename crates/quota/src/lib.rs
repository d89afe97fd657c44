//! Daily request quota for paid backend calls.
//!
//! The counter lives in process memory only and starts from zero on every
//! restart. Days are UTC calendar dates taken from an injected [`Clock`].

pub mod clock;
pub mod governor;

pub use clock::{Clock, ManualClock, SystemClock};
pub use governor::{QuotaCheck, QuotaGovernor, QuotaStatus, DEFAULT_DAILY_LIMIT};
