#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the Tornado Alley simulation.
//!
//! All mutation flows through [`apply`]. Adapters either call it directly or
//! queue commands and hand the queue to [`run_frame`], which drains it and
//! then advances the simulation by one tick.

mod clock;
mod ledger;

use std::{collections::VecDeque, time::Duration};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tornado_alley_core::{
    City, CityPlacementError, Command, ControlSettings, DissipationCause, Event, MotionTuning,
    PerlinField, Road, SimulationConfig, SpawnKind, TornadoId, Vec2,
};
use tornado_alley_system_cartography::{place_custom_city, road_between, MapLayout, TerrainMap};
use tornado_alley_system_casualties::{CasualtyModel, CityStrike, Strike};
use tornado_alley_system_dynamics::{Advance, SpawnContext, StepContext, Tornado};
use tracing::{debug, info, warn};

pub use clock::SimulationClock;
pub use ledger::{HitLedger, LedgerEntry};

/// ChaCha stream used for map generation; simulation draws use stream 0.
const MAP_STREAM: u64 = 1;

/// Represents the authoritative simulation state.
#[derive(Debug)]
pub struct World {
    config: SimulationConfig,
    motion: MotionTuning,
    controls: ControlSettings,
    casualty_model: CasualtyModel,
    seed: u64,
    noise: PerlinField,
    rng: ChaCha8Rng,
    terrain: Option<TerrainMap>,
    cities: Vec<City>,
    roads: Vec<Road>,
    tornadoes: Vec<Tornado>,
    path: Vec<Vec2>,
    total_casualties: u64,
    running: bool,
    tick_index: u64,
    ledger: HitLedger,
    clock: SimulationClock,
    strikes: Vec<CityStrike>,
}

impl World {
    /// Creates a world with map data generated from `seed` and no tornadoes.
    #[must_use]
    pub fn new(config: SimulationConfig, seed: u64) -> Self {
        let mut world = Self {
            motion: config.motion(),
            controls: config.controls.sanitized(),
            casualty_model: CasualtyModel::new(config.casualties),
            config,
            seed,
            noise: PerlinField::new(seed),
            rng: ChaCha8Rng::seed_from_u64(seed),
            terrain: None,
            cities: Vec::new(),
            roads: Vec::new(),
            tornadoes: Vec::new(),
            path: Vec::new(),
            total_casualties: 0,
            running: false,
            tick_index: 0,
            ledger: HitLedger::default(),
            clock: SimulationClock::default(),
            strikes: Vec::new(),
        };
        world.generate_map();
        world
    }

    fn generate_map(&mut self) {
        // Map data draws from its own stream so regenerating reproduces it exactly.
        let mut map_rng = ChaCha8Rng::seed_from_u64(self.seed);
        map_rng.set_stream(MAP_STREAM);
        let layout = MapLayout::generate(
            self.config.map_mode,
            self.config.bounds,
            &self.config.map,
            &self.noise,
            &mut map_rng,
        );
        self.terrain = layout.terrain;
        self.cities = layout.cities;
        self.roads = layout.roads;
    }

    fn announce_map(&self, out_events: &mut Vec<Event>) {
        info!(
            seed = self.seed,
            mode = ?self.config.map_mode,
            cities = self.cities.len(),
            roads = self.roads.len(),
            "map generated"
        );
        out_events.push(Event::MapGenerated {
            mode: self.config.map_mode,
            cities: self.cities.len(),
            roads: self.roads.len(),
        });
    }

    fn reset(&mut self, out_events: &mut Vec<Event>) {
        self.tornadoes.clear();
        self.ledger.clear();
        self.total_casualties = 0;
        for city in &mut self.cities {
            city.clear_damage();
        }
        out_events.push(Event::SimulationReset);
        self.running = true;

        if !self.controls.manual_mode {
            self.spawn(SpawnKind::Autonomous, out_events);
            if self.rng.gen::<f64>() < self.config.spawn.dual_tornado_chance {
                self.spawn(SpawnKind::Autonomous, out_events);
            }
        }

        let outbreak = self.config.outbreak;
        if self.rng.gen::<f64>() < outbreak.chance_per_reset {
            let count = if outbreak.max_count > outbreak.min_count {
                self.rng.gen_range(outbreak.min_count..=outbreak.max_count)
            } else {
                outbreak.min_count
            };
            let interval = Duration::from_millis(outbreak.spawn_interval_ms);
            info!(count, ?interval, "outbreak scheduled");
            out_events.push(Event::OutbreakScheduled { count, interval });
        }

        self.clock
            .restart(self.rng.gen_range(0..SimulationClock::minutes_per_day()));
        out_events.push(Event::ClockAdvanced {
            minute_of_day: self.clock.minute_of_day(),
        });
        info!(
            tornadoes = self.tornadoes.len(),
            minute_of_day = self.clock.minute_of_day(),
            "simulation reset"
        );
    }

    fn spawn_context(&self) -> SpawnContext {
        SpawnContext {
            spawn: self.config.spawn,
            motion: self.motion,
            bounds: self.config.bounds,
            ef_cap: self.controls.ef_cap,
        }
    }

    fn step_context(&self) -> StepContext {
        StepContext {
            motion: self.motion,
            min_speed: self.config.spawn.min_speed,
            wobble: self.controls.wobble,
            ef_cap: self.controls.ef_cap,
        }
    }

    fn next_tornado_id(&self) -> TornadoId {
        let next = u32::try_from(self.tornadoes.len()).map_or(u32::MAX, |len| len.saturating_add(1));
        TornadoId::new(next)
    }

    fn spawn(&mut self, kind: SpawnKind, out_events: &mut Vec<Event>) {
        let id = self.next_tornado_id();
        let ctx = self.spawn_context();
        let tornado = match kind {
            SpawnKind::Autonomous => Tornado::autonomous(id, &ctx, &mut self.rng),
            SpawnKind::Manual { position } => {
                let position = position.unwrap_or_else(|| self.config.bounds.center());
                let mut tornado = Tornado::manual(
                    id,
                    position,
                    self.controls.custom_wind,
                    self.controls.custom_width_miles,
                    &ctx,
                    &mut self.rng,
                );
                let _ = tornado.assign_path(&self.path);
                tornado
            }
        };

        debug!(
            tornado = id.get(),
            x = tornado.position().x,
            y = tornado.position().y,
            potential_max_wind = tornado.potential_max_wind(),
            extreme = tornado.is_extreme(),
            "tornado spawned"
        );
        out_events.push(Event::TornadoSpawned {
            tornado: id,
            position: tornado.position(),
            potential_max_wind: tornado.potential_max_wind(),
            follows_path: tornado.follows_path(),
        });
        self.tornadoes.push(tornado);
        self.running = true;
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced { dt });
        if !self.running {
            return;
        }

        if self.clock.advance(dt) {
            out_events.push(Event::ClockAdvanced {
                minute_of_day: self.clock.minute_of_day(),
            });
        }

        let ctx = self.step_context();
        let bounds = self.config.bounds;
        for tornado in &mut self.tornadoes {
            let motion = match tornado.advance(&ctx, &self.noise) {
                Advance::Idle => continue,
                Advance::Dissipated(cause) => {
                    announce_dissipation(tornado.id(), cause, out_events);
                    continue;
                }
                Advance::Moved(motion) => motion,
            };

            out_events.push(Event::TornadoMoved {
                tornado: tornado.id(),
                from: motion.from,
                to: motion.to,
                wind_speed: motion.wind_speed,
                rating: motion.rating,
            });
            if let Some(track) = motion.track {
                out_events.push(Event::TrackDrawn {
                    tornado: tornado.id(),
                    from: track.from,
                    to: track.to,
                    width: track.width,
                    color: track.color,
                });
            }

            let strike = Strike {
                tornado: tornado.id(),
                position: motion.to,
                wind_speed: motion.wind_speed,
                rating: motion.rating,
                render_width: tornado.render_width(),
            };
            self.strikes.clear();
            self.casualty_model.assess(
                &strike,
                &mut self.cities,
                self.tick_index,
                &mut self.rng,
                &mut self.strikes,
            );
            for hit in &self.strikes {
                self.total_casualties = self.total_casualties.saturating_add(u64::from(hit.casualties));
                let name = self
                    .cities
                    .iter()
                    .find(|city| city.id() == hit.city)
                    .map_or("", City::name);
                self.ledger
                    .record(tornado.id(), hit.city, name, motion.rating, hit.cumulative);
                info!(
                    tornado = tornado.id().get(),
                    city = name,
                    casualties = hit.casualties,
                    cumulative = hit.cumulative,
                    rating = motion.rating.label(),
                    "city struck"
                );
                out_events.push(Event::CityStruck {
                    tornado: tornado.id(),
                    city: hit.city,
                    casualties: hit.casualties,
                    cumulative: hit.cumulative,
                    rating: motion.rating,
                });
            }

            if let Some(cause) = tornado.enforce_bounds(bounds) {
                announce_dissipation(tornado.id(), cause, out_events);
            }
        }

        if !self.tornadoes.iter().any(Tornado::is_alive) {
            self.running = false;
            info!(total_casualties = self.total_casualties, "simulation ended");
            out_events.push(Event::SimulationEnded {
                total_casualties: self.total_casualties,
            });
        }
    }

    fn place_city(
        &mut self,
        position: Vec2,
        name: Option<String>,
        out_events: &mut Vec<Event>,
    ) {
        let placed = if self.config.map_mode.has_cities() {
            place_custom_city(
                &self.cities,
                position,
                name.as_deref(),
                self.config.bounds,
                &self.config.map,
                &mut self.rng,
            )
        } else {
            Err(CityPlacementError::NoCityLayer)
        };

        match placed {
            Ok(city) => {
                debug!(city = city.name(), x = position.x, y = position.y, "city placed");
                out_events.push(Event::CityPlaced {
                    city: city.id(),
                    position,
                });
                self.cities.push(city);
            }
            Err(reason) => {
                debug!(?reason, x = position.x, y = position.y, "city placement rejected");
                out_events.push(Event::CityPlacementRejected { position, reason });
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(SimulationConfig::default(), 0)
    }
}

fn announce_dissipation(tornado: TornadoId, cause: DissipationCause, out_events: &mut Vec<Event>) {
    debug!(tornado = tornado.get(), ?cause, "tornado dissipated");
    out_events.push(Event::TornadoDissipated { tornado, cause });
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::NewMap { seed } => {
            world.seed = seed;
            world.noise.reseed(seed);
            world.rng = ChaCha8Rng::seed_from_u64(seed);
            world.generate_map();
            world.announce_map(out_events);
            world.reset(out_events);
        }
        Command::RestoreGeneratedMap => {
            world.generate_map();
            world.announce_map(out_events);
        }
        Command::ResetSimulation => world.reset(out_events),
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::SpawnTornado { kind } => world.spawn(kind, out_events),
        Command::AddWaypoint { point } => {
            world.path.push(point);
            out_events.push(Event::WaypointAdded {
                index: world.path.len() - 1,
                point,
            });
        }
        Command::ClearPath => {
            world.path.clear();
            out_events.push(Event::PathCleared);
        }
        Command::SetControls { controls } => {
            world.controls = controls.sanitized();
            debug!(controls = ?world.controls, "controls changed");
            out_events.push(Event::ControlsChanged {
                controls: world.controls,
            });
        }
        Command::PlaceCity { position, name } => world.place_city(position, name, out_events),
        Command::PaintTerrain { center, terrain } => {
            let radius = world.config.map.brush_radius;
            match world.terrain.as_mut() {
                Some(map) => {
                    let changed = map.paint(center, radius, terrain);
                    debug!(?terrain, changed, "terrain painted");
                    out_events.push(Event::TerrainPainted { center, terrain });
                }
                None => warn!(mode = ?world.config.map_mode, "map has no terrain layer to paint"),
            }
        }
        Command::BuildRoad { from, to } => match road_between(&world.cities, &world.roads, from, to) {
            Some(road) => {
                world.roads.push(road);
                out_events.push(Event::RoadBuilt { from, to });
            }
            None => out_events.push(Event::RoadRejected { from, to }),
        },
    }
}

/// Drains queued commands and then advances the simulation by `dt`.
pub fn run_frame(
    world: &mut World,
    queue: &mut VecDeque<Command>,
    dt: Duration,
    out_events: &mut Vec<Event>,
) {
    while let Some(command) = queue.pop_front() {
        apply(world, command, out_events);
    }
    apply(world, Command::Tick { dt }, out_events);
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use tornado_alley_core::{City, ControlSettings, MapBounds, MapMode, Road, SimulationConfig, Vec2};
    use tornado_alley_system_cartography::{nearest_city, TerrainMap};
    use tornado_alley_system_dynamics::Tornado;

    use super::{HitLedger, SimulationClock, World};

    /// Configuration the world was created with.
    #[must_use]
    pub fn config(world: &World) -> &SimulationConfig {
        &world.config
    }

    /// Dimensions of the simulated map.
    #[must_use]
    pub fn bounds(world: &World) -> MapBounds {
        world.config.bounds
    }

    /// Source of the map data.
    #[must_use]
    pub fn map_mode(world: &World) -> MapMode {
        world.config.map_mode
    }

    /// Seed shared by the noise field and the random source.
    #[must_use]
    pub fn seed(world: &World) -> u64 {
        world.seed
    }

    /// Runtime controls currently in effect.
    #[must_use]
    pub fn controls(world: &World) -> ControlSettings {
        world.controls
    }

    /// Number of ticks processed since the world was created.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Whether at least one tornado was alive after the last tick.
    #[must_use]
    pub fn is_running(world: &World) -> bool {
        world.running
    }

    /// Casualties accumulated since the last reset.
    #[must_use]
    pub fn total_casualties(world: &World) -> u64 {
        world.total_casualties
    }

    /// Tornadoes in spawn order, dead ones included.
    #[must_use]
    pub fn tornadoes(world: &World) -> &[Tornado] {
        &world.tornadoes
    }

    /// Cities in placement order.
    #[must_use]
    pub fn cities(world: &World) -> &[City] {
        &world.cities
    }

    /// Road network.
    #[must_use]
    pub fn roads(world: &World) -> &[Road] {
        &world.roads
    }

    /// Terrain raster, present only for procedural maps.
    #[must_use]
    pub fn terrain(world: &World) -> Option<&TerrainMap> {
        world.terrain.as_ref()
    }

    /// User-authored waypoint path.
    #[must_use]
    pub fn path(world: &World) -> &[Vec2] {
        &world.path
    }

    /// Per-city strike ledger.
    #[must_use]
    pub fn ledger(world: &World) -> &HitLedger {
        &world.ledger
    }

    /// Simulated time of day.
    #[must_use]
    pub fn clock(world: &World) -> SimulationClock {
        world.clock
    }

    /// City selected by a click at `point`, if any lies within the selection radius.
    #[must_use]
    pub fn city_near(world: &World, point: Vec2) -> Option<&City> {
        nearest_city(&world.cities, point, world.config.map.selection_radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tornado_alley_core::{CityId, MapMode, Terrain};

    fn blank_world() -> World {
        World::new(
            SimulationConfig {
                map_mode: MapMode::Blank,
                ..SimulationConfig::default()
            },
            7,
        )
    }

    #[test]
    fn new_world_is_idle_with_generated_map() {
        let world = World::new(SimulationConfig::default(), 11);
        assert!(!query::is_running(&world));
        assert!(query::tornadoes(&world).is_empty());
        assert!(query::terrain(&world).is_some());
        assert!(!query::cities(&world).is_empty());
        assert_eq!(query::roads(&world).len(), query::cities(&world).len() - 1);
    }

    #[test]
    fn waypoints_accumulate_until_cleared() {
        let mut world = blank_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::AddWaypoint {
                point: Vec2::new(10.0, 20.0),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::AddWaypoint {
                point: Vec2::new(30.0, 40.0),
            },
            &mut events,
        );
        assert_eq!(query::path(&world).len(), 2);
        assert_eq!(
            events[1],
            Event::WaypointAdded {
                index: 1,
                point: Vec2::new(30.0, 40.0)
            }
        );

        apply(&mut world, Command::ClearPath, &mut events);
        assert!(query::path(&world).is_empty());
        assert_eq!(events.last(), Some(&Event::PathCleared));
    }

    #[test]
    fn controls_are_sanitized_before_use() {
        let mut world = blank_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SetControls {
                controls: ControlSettings {
                    wobble: -1.0,
                    custom_wind: f32::NAN,
                    ..ControlSettings::default()
                },
            },
            &mut events,
        );
        let controls = query::controls(&world);
        assert_eq!(controls.wobble, 0.0);
        assert_eq!(controls.custom_wind, 120.0);
        assert_eq!(events, vec![Event::ControlsChanged { controls }]);
    }

    #[test]
    fn blank_maps_reject_cities_and_terrain() {
        let mut world = blank_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::PlaceCity {
                position: Vec2::new(100.0, 100.0),
                name: None,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::PaintTerrain {
                center: Vec2::new(100.0, 100.0),
                terrain: Terrain::Mountain,
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::CityPlacementRejected {
                position: Vec2::new(100.0, 100.0),
                reason: CityPlacementError::NoCityLayer,
            }]
        );
    }

    #[test]
    fn editor_commands_mutate_map_layers() {
        let mut world = World::new(SimulationConfig::default(), 5);
        let mut events = Vec::new();
        let first = query::cities(&world)[0].id();
        let second = query::cities(&world)[1].id();

        apply(&mut world, Command::BuildRoad { from: first, to: second }, &mut events);
        apply(
            &mut world,
            Command::BuildRoad {
                from: first,
                to: CityId::new(999),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::PaintTerrain {
                center: Vec2::new(400.0, 300.0),
                terrain: Terrain::Water,
            },
            &mut events,
        );

        assert!(matches!(
            events[0],
            Event::RoadBuilt { .. } | Event::RoadRejected { .. }
        ));
        assert_eq!(
            events[1],
            Event::RoadRejected {
                from: first,
                to: CityId::new(999)
            }
        );
        let terrain = query::terrain(&world).expect("procedural terrain");
        assert_eq!(terrain.terrain_at(Vec2::new(400.0, 300.0)), Some(Terrain::Water));
    }
}
