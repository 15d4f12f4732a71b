//! Tuning tables and runtime controls for the simulation.
//!
//! Every struct deserializes with defaults for missing fields so scenario
//! files only need to mention the values they override.

use serde::{Deserialize, Serialize};

use crate::{ef::EfCap, MapBounds, MapMode};

/// Wind speed assigned to manual spawns when the custom value is unusable.
pub const DEFAULT_CUSTOM_WIND: f32 = 120.0;
/// Width in miles assigned to manual spawns when the custom value is unusable.
pub const DEFAULT_CUSTOM_WIDTH_MILES: f32 = 0.8;
/// Pixels per mile on the simulation map (1 px = 0.1 mile).
pub const PIXELS_PER_MILE: f32 = 10.0;

/// Runtime controls adjusted by the user while the simulation runs.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlSettings {
    /// Heading jitter multiplier; zero disables wobble.
    pub wobble: f32,
    /// Highest EF tier tornadoes may reach.
    pub ef_cap: EfCap,
    /// Suppresses autonomous spawns on reset when enabled.
    pub manual_mode: bool,
    /// Starting wind speed (mph) for manual spawns.
    pub custom_wind: f32,
    /// Track width in miles for manual spawns.
    pub custom_width_miles: f32,
}

impl ControlSettings {
    /// Returns a copy with every numeric field forced into its valid range.
    #[must_use]
    pub fn sanitized(self) -> Self {
        Self {
            wobble: if self.wobble.is_finite() {
                self.wobble.max(0.0)
            } else {
                0.0
            },
            ef_cap: self.ef_cap,
            manual_mode: self.manual_mode,
            custom_wind: positive_or(self.custom_wind, DEFAULT_CUSTOM_WIND),
            custom_width_miles: positive_or(self.custom_width_miles, DEFAULT_CUSTOM_WIDTH_MILES),
        }
    }

    /// Parses a user-entered wind speed, defaulting when it is not a positive number.
    #[must_use]
    pub fn parse_custom_wind(input: &str) -> f32 {
        parse_positive(input).unwrap_or(DEFAULT_CUSTOM_WIND)
    }

    /// Parses a user-entered width in miles, defaulting when it is not a positive number.
    #[must_use]
    pub fn parse_custom_width(input: &str) -> f32 {
        parse_positive(input).unwrap_or(DEFAULT_CUSTOM_WIDTH_MILES)
    }
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            wobble: 0.5,
            ef_cap: EfCap::MAX,
            manual_mode: false,
            custom_wind: DEFAULT_CUSTOM_WIND,
            custom_width_miles: DEFAULT_CUSTOM_WIDTH_MILES,
        }
    }
}

fn parse_positive(input: &str) -> Option<f32> {
    input
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|value| value.is_finite() && *value > 0.0)
}

fn positive_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

/// Named parameter sets reconciling the motion constants of the map variants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionPreset {
    /// Half-speed motion with track widths between 2 and 27 px.
    #[default]
    Standard,
    /// Full-speed motion with track widths between 2 and 50 px.
    Classic,
}

impl MotionPreset {
    /// Motion tuning associated with the preset.
    #[must_use]
    pub fn motion(self) -> MotionTuning {
        match self {
            Self::Standard => MotionTuning::default(),
            Self::Classic => MotionTuning {
                speed_scale: 1.0,
                max_render_width: 50.0,
                ..MotionTuning::default()
            },
        }
    }
}

/// Spawn-time randomisation constants.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    /// Floor of the wind mapping (mph).
    pub min_speed: f32,
    /// Baseline ceiling of the wind mapping (mph).
    pub max_speed: f32,
    /// Lower bound of the potential-max-wind draw (mph).
    pub potential_floor: f32,
    /// Ceiling applied to regular spawns (mph).
    pub max_spawn_wind: f32,
    /// Probability of an extreme (EF6-class) spawn when the cap allows it.
    pub ef6_chance: f64,
    /// Wind floor of extreme spawns (mph).
    pub extreme_floor: f32,
    /// Probability of a second autonomous tornado on reset.
    pub dual_tornado_chance: f64,
    /// Shortest autonomous lifespan in ticks.
    pub min_lifespan: u32,
    /// Longest autonomous lifespan in ticks.
    pub max_lifespan: u32,
    /// Lifespan of manual spawns in ticks.
    pub manual_lifespan: u32,
    /// Distance from an edge (px) that biases the initial heading inward.
    pub edge_buffer: f32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            min_speed: 40.0,
            max_speed: 1_000.0,
            potential_floor: 80.0,
            max_spawn_wind: 200.0,
            ef6_chance: 0.01,
            extreme_floor: 320.0,
            dual_tornado_chance: 0.05,
            min_lifespan: 800,
            max_lifespan: 1_500,
            manual_lifespan: 2_000,
            edge_buffer: 150.0,
        }
    }
}

/// Per-tick motion and wind evolution constants.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionTuning {
    /// Age clock increment per tick.
    pub age_rate: f32,
    /// Wind clock increment per tick.
    pub wind_rate: f32,
    /// Offset added to the age clock when sampling speed.
    pub speed_noise_offset: f32,
    /// Slowest per-tick displacement before scaling (px).
    pub min_step: f32,
    /// Fastest per-tick displacement before scaling (px).
    pub max_step: f32,
    /// Multiplier applied to the sampled displacement.
    pub speed_scale: f32,
    /// Exponent biasing the wind sample toward strong winds.
    pub wind_bias_exponent: f32,
    /// Number of final ticks over which wind fades to zero.
    pub fade_ticks: f32,
    /// Distance (px) at which a waypoint counts as reached.
    pub waypoint_threshold: f32,
    /// Minimum wind (mph) for a track segment to be drawn.
    pub track_threshold: f32,
    /// Narrowest track width (px).
    pub min_render_width: f32,
    /// Widest track width (px).
    pub max_render_width: f32,
}

impl Default for MotionTuning {
    fn default() -> Self {
        Self {
            age_rate: 0.008,
            wind_rate: 0.02,
            speed_noise_offset: 1_000.0,
            min_step: 1.0,
            max_step: 3.0,
            speed_scale: 0.5,
            wind_bias_exponent: 0.5,
            fade_ticks: 200.0,
            waypoint_threshold: 8.0,
            track_threshold: 10.0,
            min_render_width: 2.0,
            max_render_width: 27.0,
        }
    }
}

/// Constants of the casualty formula.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CasualtyTuning {
    /// Minimum wind (mph) that can cause damage.
    pub damage_threshold: f32,
    /// Wind (mph) at which the wind impact saturates.
    pub impact_saturation: f32,
    /// Ticks that must pass before a city can be struck again.
    pub cooldown_ticks: u64,
    /// Multiplier applied to the square root of the population.
    pub population_scale: f32,
    /// Base of the per-hit soft clamp.
    pub soft_clamp_base: f32,
    /// Random spread added on top of the soft clamp base.
    pub soft_clamp_spread: f32,
}

impl Default for CasualtyTuning {
    fn default() -> Self {
        Self {
            damage_threshold: 40.0,
            impact_saturation: 300.0,
            cooldown_ticks: 30,
            population_scale: 0.0007,
            soft_clamp_base: 80.0,
            soft_clamp_spread: 20.0,
        }
    }
}

/// Constants of the rare multi-tornado outbreak mode.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutbreakTuning {
    /// Probability that a reset schedules an outbreak.
    pub chance_per_reset: f64,
    /// Wall-clock milliseconds between outbreak spawns.
    pub spawn_interval_ms: u64,
    /// Fewest tornadoes an outbreak spawns.
    pub min_count: u32,
    /// Most tornadoes an outbreak spawns.
    pub max_count: u32,
}

impl Default for OutbreakTuning {
    fn default() -> Self {
        Self {
            chance_per_reset: 0.01,
            spawn_interval_ms: 1_000,
            min_count: 30,
            max_count: 100,
        }
    }
}

/// Constants used when generating terrain and placing cities.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapTuning {
    /// Coordinate multiplier applied before sampling terrain noise.
    pub noise_scale: f32,
    /// Noise value above which terrain is land.
    pub land_threshold: f32,
    /// Noise value above which land is mountain.
    pub mountain_threshold: f32,
    /// Target number of generated cities.
    pub city_count: usize,
    /// Placement attempts before giving up on the target count.
    pub placement_attempts: u32,
    /// Margin (px) kept between generated cities and the map edge.
    pub placement_margin: f32,
    /// Radius of a city's visual dot (px).
    pub display_radius: f32,
    /// Extra gap (px) required between neighbouring city areas.
    pub spacing_buffer: f32,
    /// Radius (px) of the disc painted by the terrain brush.
    pub brush_radius: f32,
    /// Largest distance (px) at which a click selects a city.
    pub selection_radius: f32,
}

impl MapTuning {
    /// Radius used for casualty detection around each city.
    #[must_use]
    pub fn area_radius(&self) -> f32 {
        self.display_radius * 3.0
    }
}

impl Default for MapTuning {
    fn default() -> Self {
        Self {
            noise_scale: 0.015,
            land_threshold: 0.35,
            mountain_threshold: 0.65,
            city_count: 15,
            placement_attempts: 2_000,
            placement_margin: 20.0,
            display_radius: 8.0,
            spacing_buffer: 2.0,
            brush_radius: 30.0,
            selection_radius: 80.0,
        }
    }
}

/// Complete configuration of a simulation session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Dimensions of the simulated map in pixels.
    pub bounds: MapBounds,
    /// Source of background and city data.
    pub map_mode: MapMode,
    /// Motion constants preset.
    pub preset: MotionPreset,
    /// Optional motion overrides; the preset's table is used when absent.
    pub motion: Option<MotionTuning>,
    /// Spawn randomisation constants.
    pub spawn: SpawnTuning,
    /// Casualty formula constants.
    pub casualties: CasualtyTuning,
    /// Outbreak constants.
    pub outbreak: OutbreakTuning,
    /// Terrain and city placement constants.
    pub map: MapTuning,
    /// Initial runtime controls.
    pub controls: ControlSettings,
}

impl SimulationConfig {
    /// Motion constants in effect, honouring explicit overrides.
    #[must_use]
    pub fn motion(&self) -> MotionTuning {
        self.motion.unwrap_or_else(|| self.preset.motion())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            bounds: MapBounds::default(),
            map_mode: MapMode::Procedural,
            preset: MotionPreset::Standard,
            motion: None,
            spawn: SpawnTuning::default(),
            casualties: CasualtyTuning::default(),
            outbreak: OutbreakTuning::default(),
            map: MapTuning::default(),
            controls: ControlSettings::default(),
        }
    }
}
