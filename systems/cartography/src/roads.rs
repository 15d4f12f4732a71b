//! Road network over city centres.

use tornado_alley_core::{City, CityId, Road};

/// Connects every city with the shortest total road length (Prim's algorithm).
///
/// Growth starts at the first city; ties resolve to the earliest pair found.
#[must_use]
pub fn minimum_spanning_roads(cities: &[City]) -> Vec<Road> {
    if cities.len() < 2 {
        return Vec::new();
    }

    let mut connected = vec![false; cities.len()];
    // Cheapest known link into the tree for each city: (distance, tree endpoint).
    let mut best: Vec<Option<(f32, usize)>> = vec![None; cities.len()];
    let mut roads = Vec::with_capacity(cities.len() - 1);

    connected[0] = true;
    relax(cities, 0, &connected, &mut best);

    for _ in 1..cities.len() {
        let next = best
            .iter()
            .enumerate()
            .filter(|(index, _)| !connected[*index])
            .filter_map(|(index, link)| link.map(|(distance, from)| (index, distance, from)))
            .min_by(|a, b| a.1.total_cmp(&b.1));
        let Some((to, _, from)) = next else {
            break;
        };

        connected[to] = true;
        roads.push(Road::new(cities[from].id(), cities[to].id()));
        relax(cities, to, &connected, &mut best);
    }
    roads
}

fn relax(cities: &[City], added: usize, connected: &[bool], best: &mut [Option<(f32, usize)>]) {
    let origin = cities[added].position();
    for (index, city) in cities.iter().enumerate() {
        if connected[index] {
            continue;
        }
        let distance = origin.distance(city.position());
        if best[index].map_or(true, |(current, _)| distance < current) {
            best[index] = Some((distance, added));
        }
    }
}

/// Validates a user-requested road.
///
/// Rejects self-loops, unknown endpoints and roads that already exist.
#[must_use]
pub fn road_between(cities: &[City], roads: &[Road], from: CityId, to: CityId) -> Option<Road> {
    if from == to {
        return None;
    }
    let known = |id: CityId| cities.iter().any(|city| city.id() == id);
    if !known(from) || !known(to) {
        return None;
    }
    if roads.iter().any(|road| road.connects(from, to)) {
        return None;
    }
    Some(Road::new(from, to))
}
