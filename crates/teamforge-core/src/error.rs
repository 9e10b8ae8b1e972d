//! Profile and config error types.

use thiserror::Error;

/// A malformed event profile. Raised when a profile is built or loaded,
/// never during allocation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("profile {0:?} defines no cohorts")]
    NoCohorts(String),

    #[error("cohort name must not be blank")]
    BlankCohortName,

    #[error("duplicate cohort name: {0}")]
    DuplicateCohort(String),

    #[error("base cohort {0:?} is not defined by the profile")]
    UnknownBaseCohort(String),

    #[error("cohort {0:?} has a target team size of 0")]
    ZeroTargetSize(String),

    #[error("cohort {cohort:?}: cap for track {track} must allow at least one member per team")]
    ZeroTrackCap { cohort: String, track: String },

    #[error("cohort {cohort:?}: proportional split needs two distinct tracks, got {track} twice")]
    SameSplitTracks { cohort: String, track: String },

    #[error("unknown event type: {0}")]
    UnknownEvent(String),
}

/// Errors loading or writing a profile config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read profile: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse profile: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize profile: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid profile: {0}")]
    Invalid(#[from] ProfileError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
