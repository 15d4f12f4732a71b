#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Casualty model applied when a tornado passes over a city.
//!
//! A strike is evaluated against every city whose casualty area contains the
//! tornado centre. Each city is re-evaluated at most once per cooldown window;
//! the casualty count grows with wind speed, EF severity, population and the
//! fraction of the city covered by the tornado's footprint.

use std::f32::consts::PI;

use rand::Rng;
use tornado_alley_core::{CasualtyTuning, City, CityId, EfRating, TornadoId, Vec2};

const IMPACT_FLOOR: f32 = 0.05;
const VARIANCE_LOW: f32 = 0.8;
const VARIANCE_HIGH: f32 = 1.6;

/// Snapshot of a tornado at the moment its footprint is tested against cities.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Strike {
    /// Tornado responsible for the strike.
    pub tornado: TornadoId,
    /// Tornado centre.
    pub position: Vec2,
    /// Current wind speed (mph).
    pub wind_speed: f32,
    /// Current EF rating.
    pub rating: EfRating,
    /// Track width in pixels, used as the footprint radius.
    pub render_width: f32,
}

/// Casualties inflicted on a single city.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CityStrike {
    /// City that was struck.
    pub city: CityId,
    /// Casualties caused by this strike.
    pub casualties: u32,
    /// Casualties accumulated by the city after this strike.
    pub cumulative: u64,
    /// Fraction of the city's area covered by the footprint.
    pub coverage: f32,
}

/// Cooldown-gated casualty computation.
#[derive(Clone, Copy, Debug, Default)]
pub struct CasualtyModel {
    tuning: CasualtyTuning,
}

impl CasualtyModel {
    /// Creates a model using the provided constants.
    #[must_use]
    pub const fn new(tuning: CasualtyTuning) -> Self {
        Self { tuning }
    }

    /// Constants in effect.
    #[must_use]
    pub const fn tuning(&self) -> &CasualtyTuning {
        &self.tuning
    }

    /// Tests a strike against every city, recording casualties where due.
    ///
    /// Cities inside the strike radius are flagged as hit even while their
    /// cooldown is running; only cities whose cooldown elapsed receive new
    /// casualties and a fresh cooldown stamp.
    pub fn assess<R>(
        &self,
        strike: &Strike,
        cities: &mut [City],
        tick: u64,
        rng: &mut R,
        out: &mut Vec<CityStrike>,
    ) where
        R: Rng + ?Sized,
    {
        if strike.wind_speed < self.tuning.damage_threshold {
            return;
        }

        for city in cities.iter_mut() {
            let distance = strike.position.distance(city.position());
            if distance >= city.area_radius() {
                continue;
            }

            city.mark_hit();
            if !city.cooldown_elapsed(tick, self.tuning.cooldown_ticks) {
                continue;
            }

            let footprint = strike.render_width.max(1.0);
            let overlap = circle_overlap_area(city.area_radius(), footprint, distance);
            let coverage = coverage_factor(overlap, city.area_radius());
            let casualties = self.casualties(strike, city.population(), coverage, rng);
            let cumulative = city.record_casualties(tick, casualties);

            out.push(CityStrike {
                city: city.id(),
                casualties,
                cumulative,
                coverage,
            });
        }
    }

    /// Casualties caused by a single strike on a city of `population`.
    ///
    /// Always at least one and never above the soft clamp of the tuning.
    pub fn casualties<R>(&self, strike: &Strike, population: u32, coverage: f32, rng: &mut R) -> u32
    where
        R: Rng + ?Sized,
    {
        let population_factor = (population as f32).sqrt() * self.tuning.population_scale;
        let variance = rng.gen_range(VARIANCE_LOW..VARIANCE_HIGH);
        let coverage_boost = 1.0 + (1.0 + 4.0 * coverage) * coverage * 0.5;
        let base = wind_impact(strike.wind_speed, &self.tuning)
            * severity_multiplier(strike.rating)
            * population_factor
            * variance
            * coverage_boost;

        let spread = if self.tuning.soft_clamp_spread > 0.0 {
            rng.gen_range(0.0..self.tuning.soft_clamp_spread)
        } else {
            0.0
        };
        let clamped = base.min(self.tuning.soft_clamp_base + spread);
        clamped.max(1.0).floor() as u32
    }
}

/// Area shared by two circles whose centres are `distance` apart.
///
/// Full containment in either direction yields the area of the smaller
/// circle, which also covers coincident centres.
#[must_use]
pub fn circle_overlap_area(r1: f32, r2: f32, distance: f32) -> f32 {
    if distance + r2 <= r1 {
        return PI * r2 * r2;
    }
    if distance + r1 <= r2 {
        return PI * r1 * r1;
    }
    if distance >= r1 + r2 {
        return 0.0;
    }

    let d2 = distance * distance;
    let phi = ((d2 + r1 * r1 - r2 * r2) / (2.0 * distance * r1))
        .clamp(-1.0, 1.0)
        .acos()
        * 2.0;
    let theta = ((d2 + r2 * r2 - r1 * r1) / (2.0 * distance * r2))
        .clamp(-1.0, 1.0)
        .acos()
        * 2.0;
    0.5 * r1 * r1 * (phi - phi.sin()) + 0.5 * r2 * r2 * (theta - theta.sin())
}

/// Fraction of a circle of radius `area_radius` covered by `overlap`.
#[must_use]
pub fn coverage_factor(overlap: f32, area_radius: f32) -> f32 {
    let area = PI * area_radius * area_radius;
    if area <= 0.0 {
        return 0.0;
    }
    (overlap / area).clamp(0.0, 1.0)
}

/// Normalised destructive potential of a wind speed.
#[must_use]
pub fn wind_impact(wind_speed: f32, tuning: &CasualtyTuning) -> f32 {
    let span = tuning.impact_saturation - tuning.damage_threshold;
    if span <= 0.0 {
        return 1.0;
    }
    let fraction = (wind_speed - tuning.damage_threshold) / span;
    (IMPACT_FLOOR + (1.0 - IMPACT_FLOOR) * fraction).clamp(0.0, 1.0)
}

/// Non-linear weight of an EF tier.
#[must_use]
pub const fn severity_multiplier(rating: EfRating) -> f32 {
    match rating {
        EfRating::SubEf0 => 0.2,
        EfRating::Ef0 => 0.3,
        EfRating::Ef1 => 0.6,
        EfRating::Ef2 => 1.0,
        EfRating::Ef3 => 1.6,
        EfRating::Ef4 => 2.6,
        EfRating::Ef5 => 4.5,
        EfRating::Ef6 => 6.0,
    }
}
