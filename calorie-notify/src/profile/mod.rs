//! Profile normalization.
//!
//! ```text
//! ProfileFields (raw, sanitized text) → CanonicalProfile (localized, display-ready)
//! ```

pub mod canonical;
pub mod labels;

pub use canonical::CanonicalProfile;
pub use labels::{localize, Activity, Gender, Goal, Labelled, UnitSystem};
