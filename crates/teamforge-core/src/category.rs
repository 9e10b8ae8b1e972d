//! Categorical classifiers for free-text participant attributes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Label reported for participants without a track code.
pub const UNKNOWN_TRACK: &str = "Unknown";

/// Free-text form answers count as affirmative when they contain "yes".
pub fn is_affirmative(answer: &str) -> bool {
    answer.to_lowercase().contains("yes")
}

/// Canonical time-zone bucket a free-text label is normalized into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeZoneBucket {
    Est,
    Cst,
    Pst,
    Other,
}

const EST_ALIASES: &[&str] = &["EST", "EDT", "EASTERN", "ET", "GMT-5", "GMT-4", "UTC-5", "UTC-4"];
const CST_ALIASES: &[&str] = &["CST", "CDT", "CENTRAL", "CT", "GMT-6", "UTC-6"];
const PST_ALIASES: &[&str] = &["PST", "PDT", "PACIFIC", "PT", "GMT-8", "GMT-7", "UTC-8", "UTC-7"];

impl TimeZoneBucket {
    /// Buckets in the order the affinity pass visits them.
    pub const ALL: [TimeZoneBucket; 4] = [
        TimeZoneBucket::Est,
        TimeZoneBucket::Cst,
        TimeZoneBucket::Pst,
        TimeZoneBucket::Other,
    ];

    /// Classify a free-text time zone. Aliases are matched as
    /// case-insensitive substrings, EST first, then CST, then PST.
    pub fn from_label(label: Option<&str>) -> Self {
        let Some(label) = label else {
            return TimeZoneBucket::Other;
        };
        let upper = label.to_uppercase();
        let hit = |aliases: &[&str]| aliases.iter().any(|a| upper.contains(a));

        if hit(EST_ALIASES) {
            TimeZoneBucket::Est
        } else if hit(CST_ALIASES) {
            TimeZoneBucket::Cst
        } else if hit(PST_ALIASES) {
            TimeZoneBucket::Pst
        } else {
            TimeZoneBucket::Other
        }
    }

    /// Buckets compatible with this one, most compatible first.
    pub fn compatible(self) -> &'static [TimeZoneBucket] {
        match self {
            TimeZoneBucket::Est => &[TimeZoneBucket::Cst],
            TimeZoneBucket::Cst => &[TimeZoneBucket::Est, TimeZoneBucket::Pst],
            TimeZoneBucket::Pst => &[TimeZoneBucket::Cst],
            TimeZoneBucket::Other => &[TimeZoneBucket::Est, TimeZoneBucket::Cst, TimeZoneBucket::Pst],
        }
    }

    /// Whether two buckets may share a team without a scheduling conflict.
    pub fn is_compatible_with(self, other: TimeZoneBucket) -> bool {
        self == other || self.compatible().contains(&other) || other.compatible().contains(&self)
    }

    pub fn index(self) -> usize {
        match self {
            TimeZoneBucket::Est => 0,
            TimeZoneBucket::Cst => 1,
            TimeZoneBucket::Pst => 2,
            TimeZoneBucket::Other => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeZoneBucket::Est => "EST",
            TimeZoneBucket::Cst => "CST",
            TimeZoneBucket::Pst => "PST",
            TimeZoneBucket::Other => "OTHER",
        }
    }
}

impl fmt::Display for TimeZoneBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Track-specific expertise, classified from free text. Absent or
/// unrecognized answers are treated as beginners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpertiseLevel {
    Advanced,
    Intermediate,
    Beginner,
}

impl ExpertiseLevel {
    pub fn from_label(label: Option<&str>) -> Self {
        let lower = label.map(str::to_lowercase).unwrap_or_default();
        if lower.contains("advanced") {
            ExpertiseLevel::Advanced
        } else if lower.contains("intermediate") {
            ExpertiseLevel::Intermediate
        } else {
            ExpertiseLevel::Beginner
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExpertiseLevel::Advanced => "Advanced",
            ExpertiseLevel::Intermediate => "Intermediate",
            ExpertiseLevel::Beginner => "Beginner",
        }
    }
}

impl fmt::Display for ExpertiseLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_common_labels() {
        assert_eq!(TimeZoneBucket::from_label(Some("EST")), TimeZoneBucket::Est);
        assert_eq!(TimeZoneBucket::from_label(Some("Eastern Time")), TimeZoneBucket::Est);
        assert_eq!(TimeZoneBucket::from_label(Some("utc-4")), TimeZoneBucket::Est);
        assert_eq!(TimeZoneBucket::from_label(Some("Central")), TimeZoneBucket::Cst);
        assert_eq!(TimeZoneBucket::from_label(Some("CST (UTC-6)")), TimeZoneBucket::Cst);
        assert_eq!(TimeZoneBucket::from_label(Some("pacific")), TimeZoneBucket::Pst);
        assert_eq!(TimeZoneBucket::from_label(Some("GMT-8")), TimeZoneBucket::Pst);
    }

    #[test]
    fn unmatched_and_absent_labels_are_other() {
        assert_eq!(TimeZoneBucket::from_label(Some("IST")), TimeZoneBucket::Other);
        assert_eq!(TimeZoneBucket::from_label(Some("")), TimeZoneBucket::Other);
        assert_eq!(TimeZoneBucket::from_label(None), TimeZoneBucket::Other);
    }

    #[test]
    fn utc_minus_five_prefers_eastern() {
        // Overlapping offsets resolve to the first bucket checked.
        assert_eq!(TimeZoneBucket::from_label(Some("UTC-5")), TimeZoneBucket::Est);
    }

    #[test]
    fn compatibility_is_symmetric_for_named_zones() {
        use TimeZoneBucket::*;
        assert!(Est.is_compatible_with(Cst));
        assert!(Cst.is_compatible_with(Est));
        assert!(Cst.is_compatible_with(Pst));
        assert!(Pst.is_compatible_with(Cst));
        assert!(!Est.is_compatible_with(Pst));
        assert!(!Pst.is_compatible_with(Est));
        assert!(Other.is_compatible_with(Pst));
    }

    #[test]
    fn expertise_defaults_to_beginner() {
        assert_eq!(ExpertiseLevel::from_label(Some("Advanced SQL")), ExpertiseLevel::Advanced);
        assert_eq!(ExpertiseLevel::from_label(Some("intermediate")), ExpertiseLevel::Intermediate);
        assert_eq!(ExpertiseLevel::from_label(Some("Some exposure")), ExpertiseLevel::Beginner);
        assert_eq!(ExpertiseLevel::from_label(None), ExpertiseLevel::Beginner);
    }

    #[test]
    fn affirmative_answers() {
        assert!(is_affirmative("Yes"));
        assert!(is_affirmative("yes, part time"));
        assert!(!is_affirmative("No"));
        assert!(!is_affirmative(""));
    }
}
