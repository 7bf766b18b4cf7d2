//! Domain models for INR and anticoagulant tracking.

mod dose;
mod measurement;
mod preferences;
mod record;

pub use dose::*;
pub use measurement::*;
pub use preferences::*;
pub use record::*;
