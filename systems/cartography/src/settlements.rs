//! City placement honouring the spacing rule.

use rand::Rng;
use tornado_alley_core::{
    City, CityId, CityPlacementError, MapBounds, MapTuning, NoiseField, Vec2,
};

use crate::terrain::is_habitable;

/// Names assigned to generated cities, drawn without replacement.
pub const CITY_NAMES: [&str; 55] = [
    "Springfield",
    "Shelbyville",
    "Greenville",
    "Pleasantville",
    "Centerville",
    "Riverside",
    "Oakdale",
    "Maple Creek",
    "Fairview",
    "Liberty",
    "New Hope",
    "Old Town",
    "Westwood",
    "Eastwood",
    "Northwood",
    "Phoenix",
    "Denver",
    "Jacksonville",
    "Chicago",
    "Indianapolis",
    "Wichita",
    "Louisville",
    "New Orleans",
    "Baltimore",
    "Boston",
    "Detroit",
    "Minneapolis",
    "Kansas City",
    "St. Louis",
    "Omaha",
    "Albuquerque",
    "Charlotte",
    "Columbus",
    "Oklahoma City",
    "Portland",
    "Philadelphia",
    "Memphis",
    "Nashville",
    "Austin",
    "Dallas",
    "Houston",
    "San Antonio",
    "Salt Lake City",
    "Richmond",
    "Seattle",
    "Milwaukee",
    "Atlanta",
    "Boise",
    "Des Moines",
    "Little Rock",
    "Cheyenne",
    "Fargo",
    "Sioux Falls",
    "Billings",
    "Casper",
];

const GENERATED_POPULATION: (u32, u32) = (1_000, 1_000_001);
const CUSTOM_POPULATION: (u32, u32) = (1_000, 500_000);

/// Scatters cities over habitable land.
///
/// Candidates are drawn inside the placement margin and kept when the noise
/// sample marks them as land below the mountain line and the spacing rule
/// holds. Placement stops at the target count or when attempts run out.
pub fn place_cities<N, R>(bounds: MapBounds, tuning: &MapTuning, noise: &N, rng: &mut R) -> Vec<City>
where
    N: NoiseField + ?Sized,
    R: Rng + ?Sized,
{
    let mut cities: Vec<City> = Vec::with_capacity(tuning.city_count);
    let mut names: Vec<&str> = CITY_NAMES.to_vec();
    let area_radius = tuning.area_radius();

    let mut attempts = 0;
    while cities.len() < tuning.city_count && attempts < tuning.placement_attempts {
        attempts += 1;
        let candidate = Vec2::new(
            span(rng, tuning.placement_margin, bounds.width() - tuning.placement_margin),
            span(rng, tuning.placement_margin, bounds.height() - tuning.placement_margin),
        );

        let sample = noise.sample_2d(
            candidate.x * tuning.noise_scale,
            candidate.y * tuning.noise_scale,
        );
        if !is_habitable(sample, tuning) {
            continue;
        }
        if cities
            .iter()
            .any(|city| city.crowds(candidate, area_radius, tuning.spacing_buffer))
        {
            continue;
        }

        let name = if names.is_empty() {
            format!("City {}", cities.len() + 1)
        } else {
            names.swap_remove(rng.gen_range(0..names.len())).to_owned()
        };
        let population = rng.gen_range(GENERATED_POPULATION.0..GENERATED_POPULATION.1);
        cities.push(City::new(
            next_city_id(&cities),
            name,
            candidate,
            population,
            tuning.display_radius,
        ));
    }
    cities
}

/// Builds a user-placed city, ignoring terrain but honouring the spacing rule.
///
/// Blank or missing names fall back to `Custom N`.
pub fn place_custom_city<R>(
    cities: &[City],
    position: Vec2,
    name: Option<&str>,
    bounds: MapBounds,
    tuning: &MapTuning,
    rng: &mut R,
) -> Result<City, CityPlacementError>
where
    R: Rng + ?Sized,
{
    if !bounds.contains(position) {
        return Err(CityPlacementError::OutOfBounds);
    }
    if cities
        .iter()
        .any(|city| city.crowds(position, tuning.area_radius(), tuning.spacing_buffer))
    {
        return Err(CityPlacementError::Overlaps);
    }

    let name = name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map_or_else(|| format!("Custom {}", cities.len() + 1), str::to_owned);
    let population = rng.gen_range(CUSTOM_POPULATION.0..CUSTOM_POPULATION.1);
    Ok(City::new(
        next_city_id(cities),
        name,
        position,
        population,
        tuning.display_radius,
    ))
}

/// Closest city strictly within `radius` of `point`.
#[must_use]
pub fn nearest_city(cities: &[City], point: Vec2, radius: f32) -> Option<&City> {
    cities
        .iter()
        .map(|city| (city, city.position().distance(point)))
        .filter(|(_, distance)| *distance < radius)
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(city, _)| city)
}

fn next_city_id(cities: &[City]) -> CityId {
    let next = u32::try_from(cities.len()).map_or(u32::MAX, |len| len.saturating_add(1));
    CityId::new(next)
}

fn span<R>(rng: &mut R, low: f32, high: f32) -> f32
where
    R: Rng + ?Sized,
{
    if high > low {
        rng.gen_range(low..high)
    } else {
        low
    }
}
