//! Rank classification
//!
//! Threshold bands are inclusive minimums checked from the highest band
//! down; the first match wins. `F` is the floor and also absorbs negative
//! and NaN input, so the mapping is total.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter,
    Default,
)]
pub enum Rank {
    #[serde(rename = "A+")]
    #[strum(serialize = "A+")]
    APlus,
    A,
    B,
    C,
    D,
    E,
    #[default]
    F,
}

/// Band table, highest first
pub const BANDS: [(f64, Rank); 6] = [
    (80.0, Rank::APlus),
    (60.0, Rank::A),
    (40.0, Rank::B),
    (20.0, Rank::C),
    (10.0, Rank::D),
    (5.0, Rank::E),
];

impl Rank {
    /// Map a combined score to its band
    pub fn from_score(score: f64) -> Rank {
        BANDS
            .iter()
            .find(|(minimum, _)| score >= *minimum)
            .map(|(_, rank)| *rank)
            .unwrap_or(Rank::F)
    }

    /// Inclusive lower bound of this band (`None` for the floor band)
    pub fn minimum(self) -> Option<f64> {
        BANDS
            .iter()
            .find(|(_, rank)| *rank == self)
            .map(|(minimum, _)| *minimum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_boundaries_belong_to_the_upper_band() {
        assert_eq!(Rank::from_score(80.0), Rank::APlus);
        assert_eq!(Rank::from_score(79.999), Rank::A);
        assert_eq!(Rank::from_score(60.0), Rank::A);
        assert_eq!(Rank::from_score(59.999), Rank::B);
        assert_eq!(Rank::from_score(5.0), Rank::E);
        assert_eq!(Rank::from_score(4.999), Rank::F);
    }

    #[test]
    fn test_extremes_and_nan() {
        assert_eq!(Rank::from_score(100.0), Rank::APlus);
        assert_eq!(Rank::from_score(0.0), Rank::F);
        assert_eq!(Rank::from_score(-12.0), Rank::F);
        assert_eq!(Rank::from_score(f64::NAN), Rank::F);
    }

    #[test]
    fn test_mapping_is_monotonic() {
        let mut previous = Rank::F;
        for step in 0..=1000 {
            let rank = Rank::from_score(step as f64 / 10.0);
            // Better ranks sort first
            assert!(rank <= previous, "rank dropped at {}", step);
            previous = rank;
        }
    }

    #[test]
    fn test_labels_and_serialisation() {
        assert_eq!(Rank::APlus.to_string(), "A+");
        assert_eq!(serde_json::to_string(&Rank::APlus).unwrap(), "\"A+\"");
        assert_eq!(serde_json::from_str::<Rank>("\"C\"").unwrap(), Rank::C);
        assert_eq!(Rank::iter().count(), BANDS.len() + 1);
        assert_eq!(Rank::F.minimum(), None);
        assert_eq!(Rank::B.minimum(), Some(40.0));
    }
}
