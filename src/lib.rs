//! District-level Aadhaar update intelligence: loads the monthly and
//! forecast tables, checks administrative consistency, and answers the
//! per-location queries behind the planning console.
pub mod config;
pub mod dashboard;
pub mod error;
pub mod loader;
pub mod logging;
pub mod output;
pub mod planning;
pub mod privacy;
pub mod quality;
pub mod ranking;
pub mod store;
pub mod types;
pub mod util;

pub use error::{DashboardError, Result};
pub use store::DataStore;
