#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tornado Alley simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems and
//! renderers to react to deterministically.

pub mod ef;
pub mod noise;
pub mod settings;

use std::time::Duration;

pub use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use ef::{classify, EfCap, EfRating};
pub use noise::{ConstantField, NoiseField, PerlinField};
pub use settings::{
    CasualtyTuning, ControlSettings, MapTuning, MotionPreset, MotionTuning, OutbreakTuning,
    SimulationConfig, SpawnTuning,
};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Reseeds the noise field and random source, regenerates the map and resets the simulation.
    NewMap {
        /// Seed shared by the noise field and the random source.
        seed: u64,
    },
    /// Discards editor changes by regenerating the map from the current seed.
    ///
    /// The simulation keeps running; only map data is replaced.
    RestoreGeneratedMap,
    /// Clears every tornado and casualty record and spawns a fresh set.
    ResetSimulation,
    /// Advances the simulation by one frame.
    Tick {
        /// Wall-clock time represented by the frame.
        dt: Duration,
    },
    /// Requests a new tornado.
    SpawnTornado {
        /// How the tornado's initial state is chosen.
        kind: SpawnKind,
    },
    /// Appends a waypoint to the user-authored path.
    AddWaypoint {
        /// Waypoint location in map pixels.
        point: Vec2,
    },
    /// Removes every waypoint from the user-authored path.
    ClearPath,
    /// Replaces the runtime controls.
    SetControls {
        /// New control values; invalid numbers are defaulted.
        controls: ControlSettings,
    },
    /// Places a user-authored city, honouring the spacing rule.
    PlaceCity {
        /// Centre of the new city in map pixels.
        position: Vec2,
        /// Optional name; a generated name is used when absent or blank.
        name: Option<String>,
    },
    /// Paints a disc of terrain onto the procedural map.
    PaintTerrain {
        /// Centre of the painted disc in map pixels.
        center: Vec2,
        /// Terrain written into the disc.
        terrain: Terrain,
    },
    /// Connects two cities with a road.
    BuildRoad {
        /// First endpoint.
        from: CityId,
        /// Second endpoint.
        to: CityId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Announces that map data was (re)generated.
    MapGenerated {
        /// Mode used to source the map.
        mode: MapMode,
        /// Number of cities placed.
        cities: usize,
        /// Number of roads laid out.
        roads: usize,
    },
    /// Announces that the tornado list, casualty totals and ledger were cleared.
    SimulationReset,
    /// Announces that the reset rolled an outbreak.
    OutbreakScheduled {
        /// Number of additional tornadoes the outbreak will spawn.
        count: u32,
        /// Interval between successive outbreak spawns.
        interval: Duration,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of wall-clock time represented by the frame.
        dt: Duration,
    },
    /// Reports the simulated time of day after the clock moved.
    ClockAdvanced {
        /// Minutes since midnight.
        minute_of_day: u32,
    },
    /// Confirms that a tornado joined the simulation.
    TornadoSpawned {
        /// Identifier of the new tornado.
        tornado: TornadoId,
        /// Spawn location.
        position: Vec2,
        /// Ceiling of the tornado's wind evolution (mph).
        potential_max_wind: f32,
        /// Whether the tornado follows the user-authored path.
        follows_path: bool,
    },
    /// Reports a tornado's motion during a frame.
    TornadoMoved {
        /// Identifier of the tornado that moved.
        tornado: TornadoId,
        /// Position before the move.
        from: Vec2,
        /// Position after the move.
        to: Vec2,
        /// Wind speed after the frame's update (mph).
        wind_speed: f32,
        /// Classification of the updated wind speed.
        rating: EfRating,
    },
    /// Rendering instruction for a persistent track segment.
    TrackDrawn {
        /// Identifier of the tornado that left the track.
        tornado: TornadoId,
        /// Segment start.
        from: Vec2,
        /// Segment end.
        to: Vec2,
        /// Stroke width in pixels.
        width: f32,
        /// Stroke color derived from the EF rating.
        color: Rgb,
    },
    /// Reports casualties inflicted on a city.
    CityStruck {
        /// Identifier of the tornado responsible.
        tornado: TornadoId,
        /// Identifier of the struck city.
        city: CityId,
        /// Casualties inflicted by this strike.
        casualties: u32,
        /// Casualties accumulated by the city during the simulation.
        cumulative: u64,
        /// Rating of the tornado at the time of the strike.
        rating: EfRating,
    },
    /// Reports that a tornado stopped updating.
    TornadoDissipated {
        /// Identifier of the tornado.
        tornado: TornadoId,
        /// Reason the tornado ended.
        cause: DissipationCause,
    },
    /// Announces that no tornado remains alive.
    SimulationEnded {
        /// Casualties accumulated during the run.
        total_casualties: u64,
    },
    /// Confirms that a waypoint joined the user-authored path.
    WaypointAdded {
        /// Zero-based position of the waypoint in the path.
        index: usize,
        /// Waypoint location.
        point: Vec2,
    },
    /// Confirms that the user-authored path was cleared.
    PathCleared,
    /// Confirms that new runtime controls took effect.
    ControlsChanged {
        /// Sanitized control values now in effect.
        controls: ControlSettings,
    },
    /// Confirms that a user-authored city was placed.
    CityPlaced {
        /// Identifier assigned to the city.
        city: CityId,
        /// Centre of the city.
        position: Vec2,
    },
    /// Reports that a city placement request was rejected.
    CityPlacementRejected {
        /// Requested centre.
        position: Vec2,
        /// Reason the placement failed.
        reason: CityPlacementError,
    },
    /// Confirms that terrain was painted.
    TerrainPainted {
        /// Centre of the painted disc.
        center: Vec2,
        /// Terrain written into the disc.
        terrain: Terrain,
    },
    /// Confirms that a road was added.
    RoadBuilt {
        /// First endpoint.
        from: CityId,
        /// Second endpoint.
        to: CityId,
    },
    /// Reports that a road request referenced unknown or identical cities.
    RoadRejected {
        /// First requested endpoint.
        from: CityId,
        /// Second requested endpoint.
        to: CityId,
    },
}

/// Selects how a requested tornado is initialised.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpawnKind {
    /// Random position, lifespan, width and wind ceiling.
    Autonomous,
    /// Custom wind and width taken from the runtime controls, following the
    /// user-authored path when one exists.
    Manual {
        /// Spawn location; the map centre is used when absent.
        position: Option<Vec2>,
    },
}

/// Reasons a tornado stops updating.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DissipationCause {
    /// The lifespan counter reached zero.
    LifespanExpired,
    /// The tornado moved outside the map.
    LeftMap,
    /// The tornado reached the final waypoint of its path.
    PathCompleted,
}

/// Source of the map background and city data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapMode {
    /// Noise-generated terrain with land-constrained cities and MST roads.
    #[default]
    Procedural,
    /// Host-supplied background image; cities and roads are still generated.
    StaticBackground,
    /// No map data at all.
    Blank,
}

impl MapMode {
    /// Reports whether the mode renders a terrain raster.
    #[must_use]
    pub const fn has_terrain(self) -> bool {
        matches!(self, Self::Procedural)
    }

    /// Reports whether the mode generates cities and roads.
    #[must_use]
    pub const fn has_cities(self) -> bool {
        !matches!(self, Self::Blank)
    }
}

/// Pixel dimensions of the simulated map.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapBounds {
    width: f32,
    height: f32,
}

impl MapBounds {
    /// Creates map bounds with the provided dimensions.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Map width in pixels.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Map height in pixels.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Centre of the map.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Reports whether the point lies on the map, edges included.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }
}

impl Default for MapBounds {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// Byte RGB color shared by simulation outputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    red: u8,
    green: u8,
    blue: u8,
}

impl Rgb {
    /// Creates a new color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Unique identifier assigned to a tornado; equals its spawn index plus one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TornadoId(u32);

impl TornadoId {
    /// Creates a new tornado identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a city.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CityId(u32);

impl CityId {
    /// Creates a new city identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Terrain classes painted onto the procedural map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Terrain {
    /// Lakes and sea.
    Water,
    /// Grassland where cities may be generated.
    Land,
    /// High ground unsuitable for generated cities.
    Mountain,
}

impl Terrain {
    /// Display color of the terrain class.
    #[must_use]
    pub const fn color(self) -> Rgb {
        match self {
            Self::Water => Rgb::from_rgb(100, 150, 255),
            Self::Land => Rgb::from_rgb(100, 200, 50),
            Self::Mountain => Rgb::from_rgb(139, 137, 137),
        }
    }
}

/// Reasons a city placement request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CityPlacementError {
    /// The requested centre lies outside the map.
    OutOfBounds,
    /// The city's area would overlap an existing city's area.
    Overlaps,
    /// The active map mode does not carry cities.
    NoCityLayer,
}

/// Settlement that tornadoes can strike.
///
/// Identity, position, population and radii are fixed at placement; the hit
/// flag, cooldown marker and casualty counter evolve during a simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct City {
    id: CityId,
    name: String,
    position: Vec2,
    population: u32,
    display_radius: f32,
    area_radius: f32,
    hit: bool,
    last_hit_tick: Option<u64>,
    casualties: u64,
}

impl City {
    /// Creates a city whose casualty area is three times its display radius.
    #[must_use]
    pub fn new(
        id: CityId,
        name: impl Into<String>,
        position: Vec2,
        population: u32,
        display_radius: f32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            population,
            display_radius,
            area_radius: display_radius * 3.0,
            hit: false,
            last_hit_tick: None,
            casualties: 0,
        }
    }

    /// Identifier of the city.
    #[must_use]
    pub const fn id(&self) -> CityId {
        self.id
    }

    /// Display name of the city.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Centre of the city in map pixels.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Resident population.
    #[must_use]
    pub const fn population(&self) -> u32 {
        self.population
    }

    /// Radius of the visual dot.
    #[must_use]
    pub const fn display_radius(&self) -> f32 {
        self.display_radius
    }

    /// Radius used for casualty detection.
    #[must_use]
    pub const fn area_radius(&self) -> f32 {
        self.area_radius
    }

    /// Whether any tornado struck the city during the simulation.
    #[must_use]
    pub const fn is_hit(&self) -> bool {
        self.hit
    }

    /// Tick of the most recent casualty computation, if any.
    #[must_use]
    pub const fn last_hit_tick(&self) -> Option<u64> {
        self.last_hit_tick
    }

    /// Casualties accumulated during the simulation.
    #[must_use]
    pub const fn casualties(&self) -> u64 {
        self.casualties
    }

    /// Reports whether the city's area circle overlaps another city's.
    #[must_use]
    pub fn crowds(&self, position: Vec2, area_radius: f32, buffer: f32) -> bool {
        self.position.distance(position) < self.area_radius + area_radius + buffer
    }

    /// Flags the city as struck.
    pub fn mark_hit(&mut self) {
        self.hit = true;
    }

    /// Reports whether at least `cooldown` ticks passed since the last computation.
    #[must_use]
    pub fn cooldown_elapsed(&self, tick: u64, cooldown: u64) -> bool {
        self.last_hit_tick
            .map_or(true, |last| tick.saturating_sub(last) >= cooldown)
    }

    /// Adds casualties and stamps the cooldown marker, returning the new total.
    pub fn record_casualties(&mut self, tick: u64, casualties: u32) -> u64 {
        self.casualties = self.casualties.saturating_add(u64::from(casualties));
        self.last_hit_tick = Some(tick);
        self.casualties
    }

    /// Clears the per-simulation state, keeping the placement data.
    pub fn clear_damage(&mut self) {
        self.hit = false;
        self.last_hit_tick = None;
        self.casualties = 0;
    }
}

/// Road connecting two cities; used only for rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Road {
    from: CityId,
    to: CityId,
}

impl Road {
    /// Creates a road between the provided cities.
    #[must_use]
    pub const fn new(from: CityId, to: CityId) -> Self {
        Self { from, to }
    }

    /// First endpoint.
    #[must_use]
    pub const fn from(&self) -> CityId {
        self.from
    }

    /// Second endpoint.
    #[must_use]
    pub const fn to(&self) -> CityId {
        self.to
    }

    /// Reports whether the road joins the two cities in either direction.
    #[must_use]
    pub fn connects(&self, a: CityId, b: CityId) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }
}
