//! TOML scenario files describing a headless run.

use std::{fs, io, path::{Path, PathBuf}};

use glam::Vec2;
use serde::Deserialize;
use thiserror::Error;
use tornado_alley_core::SimulationConfig;

/// Errors raised while loading or validating a scenario.
#[derive(Debug, Error)]
pub(crate) enum ScenarioError {
    #[error("failed to read scenario {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse scenario toml")]
    Parse(#[from] toml::de::Error),
    #[error("map bounds must be positive (got {width}x{height})")]
    InvalidBounds { width: f32, height: f32 },
    #[error("outbreak minimum {min} exceeds maximum {max}")]
    OutbreakRange { min: u32, max: u32 },
    #[error("lifespan minimum {min} exceeds maximum {max}")]
    LifespanRange { min: u32, max: u32 },
}

/// Manual spawn requested at a given frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct ScriptedSpawn {
    pub(crate) frame: u32,
    pub(crate) position: Option<[f32; 2]>,
}

impl ScriptedSpawn {
    pub(crate) fn position(&self) -> Option<Vec2> {
        self.position.map(Vec2::from_array)
    }
}

/// Headless run description; every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct Scenario {
    pub(crate) seed: Option<u64>,
    pub(crate) frames: Option<u32>,
    pub(crate) frame_ms: Option<u64>,
    pub(crate) simulation: SimulationConfig,
    pub(crate) waypoints: Vec<[f32; 2]>,
    pub(crate) spawns: Vec<ScriptedSpawn>,
}

impl Scenario {
    pub(crate) fn load(path: &Path) -> Result<Self, ScenarioError> {
        let contents = fs::read_to_string(path).map_err(|source| ScenarioError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub(crate) fn from_toml_str(contents: &str) -> Result<Self, ScenarioError> {
        let scenario: Self = toml::from_str(contents)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub(crate) fn validate(&self) -> Result<(), ScenarioError> {
        let bounds = self.simulation.bounds;
        if !(bounds.width() > 0.0 && bounds.height() > 0.0) {
            return Err(ScenarioError::InvalidBounds {
                width: bounds.width(),
                height: bounds.height(),
            });
        }

        let outbreak = self.simulation.outbreak;
        if outbreak.min_count > outbreak.max_count {
            return Err(ScenarioError::OutbreakRange {
                min: outbreak.min_count,
                max: outbreak.max_count,
            });
        }

        let spawn = self.simulation.spawn;
        if spawn.min_lifespan > spawn.max_lifespan {
            return Err(ScenarioError::LifespanRange {
                min: spawn.min_lifespan,
                max: spawn.max_lifespan,
            });
        }
        Ok(())
    }

    pub(crate) fn waypoints(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.waypoints.iter().copied().map(Vec2::from_array)
    }
}

/// Parses an `x,y` pair such as `400,300`.
pub(crate) fn parse_point(input: &str) -> Result<Vec2, String> {
    let (x, y) = input
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got `{input}`"))?;
    let coordinate = |value: &str| {
        value
            .trim()
            .parse::<f32>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| format!("invalid coordinate `{}` in `{input}`", value.trim()))
    };
    Ok(Vec2::new(coordinate(x)?, coordinate(y)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tornado_alley_core::MapMode;

    #[test]
    fn empty_scenario_uses_defaults() {
        let scenario = Scenario::from_toml_str("").expect("empty scenario is valid");
        assert_eq!(scenario, Scenario::default());
    }

    #[test]
    fn scenario_overrides_nested_tables() {
        let scenario = Scenario::from_toml_str(
            r#"
            seed = 42
            frames = 900
            waypoints = [[100.0, 100.0], [300.0, 250.0]]

            [[spawns]]
            frame = 30
            position = [120.0, 90.0]

            [[spawns]]
            frame = 60

            [simulation]
            map_mode = "static_background"

            [simulation.outbreak]
            chance_per_reset = 1.0
            min_count = 2
            max_count = 4
            "#,
        )
        .expect("scenario parses");

        assert_eq!(scenario.seed, Some(42));
        assert_eq!(scenario.frames, Some(900));
        assert_eq!(scenario.frame_ms, None);
        assert_eq!(scenario.simulation.map_mode, MapMode::StaticBackground);
        assert_eq!(scenario.simulation.outbreak.max_count, 4);
        assert_eq!(scenario.simulation.outbreak.spawn_interval_ms, 1_000);
        assert_eq!(scenario.waypoints().count(), 2);
        assert_eq!(scenario.spawns[0].position(), Some(Vec2::new(120.0, 90.0)));
        assert_eq!(scenario.spawns[1].position(), None);
    }

    #[test]
    fn inconsistent_ranges_are_rejected() {
        let error = Scenario::from_toml_str(
            r#"
            [simulation.outbreak]
            min_count = 10
            max_count = 3
            "#,
        )
        .expect_err("inverted outbreak range");
        assert!(matches!(error, ScenarioError::OutbreakRange { min: 10, max: 3 }));

        let error = Scenario::from_toml_str(
            r#"
            [simulation.bounds]
            width = 0.0
            height = 600.0
            "#,
        )
        .expect_err("zero width");
        assert_eq!(error.to_string(), "map bounds must be positive (got 0x600)");
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let error = Scenario::from_toml_str("seed = ").expect_err("truncated value");
        assert!(matches!(error, ScenarioError::Parse(_)));
    }

    #[test]
    fn points_parse_from_comma_pairs() {
        assert_eq!(parse_point("400,300"), Ok(Vec2::new(400.0, 300.0)));
        assert_eq!(parse_point(" 1.5 , -2 "), Ok(Vec2::new(1.5, -2.0)));
        assert!(parse_point("400").is_err());
        assert!(parse_point("a,3").is_err());
    }
}
