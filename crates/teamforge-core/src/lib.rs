pub mod category;
pub mod config;
pub mod error;
pub mod presets;
pub mod types;

pub use category::{ExpertiseLevel, TimeZoneBucket, UNKNOWN_TRACK, is_affirmative};
pub use config::{Attribute, CohortProfile, EventProfile, PassSpec, Predicate, SizingStrategy};
pub use error::{ConfigError, ConfigResult, ProfileError};
pub use presets::EventKind;
pub use types::*;
