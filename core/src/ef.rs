//! Enhanced Fujita classification used by every tornado in the simulation.
//!
//! The table extends the real EF0–EF5 scale with a fictional EF6 tier. A
//! user-selected [`EfCap`] bounds the highest tier a classification may
//! report; wind speeds above the cap are clamped down to the cap's tier.

use serde::{Deserialize, Serialize};

use crate::Rgb;

/// Wind speed (mph) at which each tier from EF0 to EF6 begins.
pub const EF_THRESHOLDS: [f32; 7] = [65.0, 86.0, 111.0, 136.0, 166.0, 201.0, 320.0];

/// Severity tier reported for a tornado's current wind speed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EfRating {
    /// Winds below the EF0 threshold.
    SubEf0,
    /// 65–85 mph.
    Ef0,
    /// 86–110 mph.
    Ef1,
    /// 111–135 mph.
    Ef2,
    /// 136–165 mph.
    Ef3,
    /// 166–200 mph.
    Ef4,
    /// 201–319 mph.
    Ef5,
    /// 320 mph and above.
    Ef6,
}

impl EfRating {
    const TIERS: [Self; 7] = [
        Self::Ef0,
        Self::Ef1,
        Self::Ef2,
        Self::Ef3,
        Self::Ef4,
        Self::Ef5,
        Self::Ef6,
    ];

    /// Classifies the wind speed without applying any cap.
    #[must_use]
    pub fn from_wind_speed(wind_speed: f32) -> Self {
        EF_THRESHOLDS
            .iter()
            .zip(Self::TIERS)
            .rev()
            .find(|(threshold, _)| wind_speed >= **threshold)
            .map_or(Self::SubEf0, |(_, rating)| rating)
    }

    /// Numeric EF tier, or `None` for sub-EF0 winds.
    #[must_use]
    pub const fn tier(self) -> Option<u8> {
        match self {
            Self::SubEf0 => None,
            Self::Ef0 => Some(0),
            Self::Ef1 => Some(1),
            Self::Ef2 => Some(2),
            Self::Ef3 => Some(3),
            Self::Ef4 => Some(4),
            Self::Ef5 => Some(5),
            Self::Ef6 => Some(6),
        }
    }

    /// Short scale label such as `EF3`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SubEf0 => "Sub-EF0",
            Self::Ef0 => "EF0",
            Self::Ef1 => "EF1",
            Self::Ef2 => "EF2",
            Self::Ef3 => "EF3",
            Self::Ef4 => "EF4",
            Self::Ef5 => "EF5",
            Self::Ef6 => "EF6",
        }
    }

    /// Damage description shown next to the label.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::SubEf0 => "Weak",
            Self::Ef0 => "Light",
            Self::Ef1 => "Moderate",
            Self::Ef2 => "Significant",
            Self::Ef3 => "Severe",
            Self::Ef4 => "Devastating",
            Self::Ef5 => "Incredible",
            Self::Ef6 => "Cataclysmic",
        }
    }

    /// Display color associated with the tier.
    #[must_use]
    pub const fn color(self) -> Rgb {
        match self {
            Self::SubEf0 => Rgb::from_rgb(0xcc, 0xcc, 0xcc),
            Self::Ef0 => Rgb::from_rgb(0x00, 0xff, 0xff),
            Self::Ef1 => Rgb::from_rgb(0x00, 0x80, 0x00),
            Self::Ef2 => Rgb::from_rgb(0xff, 0xff, 0x00),
            Self::Ef3 => Rgb::from_rgb(0xff, 0xa5, 0x00),
            Self::Ef4 => Rgb::from_rgb(0xff, 0x00, 0x00),
            Self::Ef5 => Rgb::from_rgb(0x80, 0x00, 0x80),
            Self::Ef6 => Rgb::from_rgb(0x4b, 0x00, 0x82),
        }
    }
}

/// Highest EF tier the user allows tornadoes to reach.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct EfCap(u8);

impl EfCap {
    /// The most permissive cap, allowing EF6.
    pub const MAX: Self = Self(6);

    /// Creates a cap for the provided level, rejecting values above six.
    #[must_use]
    pub const fn new(level: u8) -> Option<Self> {
        if level <= 6 {
            Some(Self(level))
        } else {
            None
        }
    }

    /// Interprets an arbitrary level, falling back to [`EfCap::MAX`] when out of range.
    #[must_use]
    pub fn from_level_or_max(level: i64) -> Self {
        u8::try_from(level)
            .ok()
            .and_then(Self::new)
            .unwrap_or(Self::MAX)
    }

    /// Numeric level of the cap.
    #[must_use]
    pub const fn level(self) -> u8 {
        self.0
    }

    /// Reports whether a rating is permitted under this cap.
    #[must_use]
    pub const fn allows(self, rating: EfRating) -> bool {
        match rating.tier() {
            Some(tier) => tier <= self.0,
            None => true,
        }
    }

    /// Approximate wind ceiling implied by the cap when drawing spawn winds.
    ///
    /// EF6 is bounded only by the configured `max_speed`.
    #[must_use]
    pub fn wind_ceiling(self, max_speed: f32) -> f32 {
        match self.0 {
            0 => 86.0,
            1 => 111.0,
            2 => 136.0,
            3 => 166.0,
            4 => 200.0,
            5 => 450.0,
            _ => max_speed,
        }
    }
}

impl Default for EfCap {
    fn default() -> Self {
        Self::MAX
    }
}

impl TryFrom<i64> for EfCap {
    type Error = std::convert::Infallible;

    fn try_from(level: i64) -> Result<Self, Self::Error> {
        Ok(Self::from_level_or_max(level))
    }
}

impl From<EfCap> for u8 {
    fn from(cap: EfCap) -> Self {
        cap.0
    }
}

/// Classifies a wind speed and clamps the result to the provided cap.
#[must_use]
pub fn classify(wind_speed: f32, cap: EfCap) -> EfRating {
    let rating = EfRating::from_wind_speed(wind_speed);
    if cap.allows(rating) {
        return rating;
    }

    EfRating::TIERS
        .get(usize::from(cap.level()))
        .copied()
        .unwrap_or(EfRating::Ef6)
}

#[cfg(test)]
mod tests {
    use super::{classify, EfCap, EfRating};

    #[test]
    fn thresholds_map_to_expected_tiers() {
        assert_eq!(EfRating::from_wind_speed(64.9), EfRating::SubEf0);
        assert_eq!(EfRating::from_wind_speed(65.0), EfRating::Ef0);
        assert_eq!(EfRating::from_wind_speed(86.0), EfRating::Ef1);
        assert_eq!(EfRating::from_wind_speed(111.0), EfRating::Ef2);
        assert_eq!(EfRating::from_wind_speed(136.0), EfRating::Ef3);
        assert_eq!(EfRating::from_wind_speed(165.9), EfRating::Ef3);
        assert_eq!(EfRating::from_wind_speed(166.0), EfRating::Ef4);
        assert_eq!(EfRating::from_wind_speed(201.0), EfRating::Ef5);
        assert_eq!(EfRating::from_wind_speed(319.0), EfRating::Ef5);
        assert_eq!(EfRating::from_wind_speed(320.0), EfRating::Ef6);
        assert_eq!(EfRating::from_wind_speed(0.0), EfRating::SubEf0);
    }

    #[test]
    fn classification_respects_cap() {
        assert_eq!(classify(150.0, EfCap::MAX), EfRating::Ef3);
        let cap = EfCap::new(2).expect("valid cap");
        assert_eq!(classify(150.0, cap), EfRating::Ef2);
        assert_eq!(classify(50.0, cap), EfRating::SubEf0);
        let zero = EfCap::new(0).expect("valid cap");
        assert_eq!(classify(900.0, zero), EfRating::Ef0);
    }

    #[test]
    fn classification_never_exceeds_cap_and_is_monotone() {
        for level in 0..=6 {
            let cap = EfCap::new(level).expect("valid cap");
            let mut previous = EfRating::SubEf0;
            let mut wind = 0.0_f32;
            while wind <= 1_000.0 {
                let rating = classify(wind, cap);
                assert!(cap.allows(rating), "{rating:?} exceeds cap {level}");
                assert!(rating >= previous, "classification decreased at {wind}");
                previous = rating;
                wind += 0.5;
            }
        }
    }

    #[test]
    fn out_of_range_cap_defaults_to_most_permissive() {
        assert_eq!(EfCap::from_level_or_max(9), EfCap::MAX);
        assert_eq!(EfCap::from_level_or_max(-1), EfCap::MAX);
        assert_eq!(EfCap::from_level_or_max(3).level(), 3);
        assert!(EfCap::new(7).is_none());
    }

    #[test]
    fn wind_ceiling_tracks_cap_level() {
        assert_eq!(EfCap::new(4).expect("valid").wind_ceiling(1_000.0), 200.0);
        assert_eq!(EfCap::MAX.wind_ceiling(1_000.0), 1_000.0);
    }

    #[test]
    fn labels_and_colors_are_stable() {
        assert_eq!(EfRating::Ef3.label(), "EF3");
        assert_eq!(EfRating::Ef3.description(), "Severe");
        assert_eq!(EfRating::Ef6.color().red(), 0x4b);
        assert_eq!(EfRating::SubEf0.label(), "Sub-EF0");
    }
}
