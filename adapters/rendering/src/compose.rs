//! Translates world snapshots into ordered draw commands.

use anyhow::Result as AnyResult;
use glam::Vec2;
use tornado_alley_core::{City, CityId, Event};
use tornado_alley_world::{query, World};

use crate::{format_thousands, Color, DrawCommand, RenderSink, TerrainLayer, TrackLayer};

const ROAD_COLOR: Color = Color::from_rgba_u8(60, 60, 60, 200);
const ROAD_WIDTH: f32 = 1.5;
const PATH_COLOR: Color = Color::from_rgb_u8(0, 150, 200);
const PATH_WIDTH: f32 = 2.0;
const WAYPOINT_RADIUS: f32 = 4.0;
const CITY_AREA_COLOR: Color = Color::from_rgba_u8(255, 200, 200, 90);
const CITY_HIT_COLOR: Color = Color::from_rgb_u8(255, 0, 0);
const CITY_COLOR: Color = Color::from_rgb_u8(255, 255, 0);
const LABEL_COLOR: Color = Color::from_rgb_u8(0, 0, 0);
const LABEL_SIZE: f32 = 12.0;
const LABEL_OFFSET: f32 = 5.0;
const FUNNEL_OUTER_COLOR: Color = Color::from_rgba_u8(100, 100, 100, 100);
const FUNNEL_CORE_COLOR: Color = Color::from_rgba_u8(50, 50, 50, 200);
const FUNNEL_MIN_SIZE: f32 = 10.0;
const FUNNEL_MAX_SIZE: f32 = 25.0;

/// Composes frames from the world plus the persistent layers.
///
/// Layers are drawn bottom to top: terrain, roads, damage tracks, the user
/// path, cities and finally the funnels of live tornadoes.
#[derive(Clone, Debug, Default)]
pub struct FrameComposer {
    tracks: TrackLayer,
    terrain: TerrainLayer,
}

impl FrameComposer {
    /// Feeds world events to the persistent layers.
    pub fn observe(&mut self, events: &[Event]) {
        self.tracks.handle(events);
        self.terrain.handle(events);
    }

    /// Accumulated damage tracks.
    #[must_use]
    pub fn tracks(&self) -> &TrackLayer {
        &self.tracks
    }

    /// Draws one frame of `world` into `sink`.
    pub fn compose<S>(&mut self, world: &World, sink: &mut S) -> AnyResult<()>
    where
        S: RenderSink + ?Sized,
    {
        if let Some(raster) = self.terrain.draw_command(world) {
            sink.draw(raster)?;
        }

        let cities = query::cities(world);
        for road in query::roads(world) {
            let (Some(from), Some(to)) = (
                city_position(cities, road.from()),
                city_position(cities, road.to()),
            ) else {
                continue;
            };
            sink.draw(DrawCommand::Segment {
                from,
                to,
                width: ROAD_WIDTH,
                color: ROAD_COLOR,
            })?;
        }

        sink.draw(self.tracks.flush())?;

        let path = query::path(world);
        if path.len() > 1 {
            sink.draw(DrawCommand::Polyline {
                points: path.to_vec(),
                width: PATH_WIDTH,
                color: PATH_COLOR,
            })?;
        }
        for point in path {
            sink.draw(DrawCommand::FilledCircle {
                center: *point,
                radius: WAYPOINT_RADIUS,
                color: PATH_COLOR,
            })?;
        }

        for city in cities {
            draw_city(city, sink)?;
        }

        let spawn = query::config(world).spawn;
        for tornado in query::tornadoes(world).iter().filter(|tornado| tornado.is_alive()) {
            let size = funnel_size(tornado.wind_speed(), spawn.min_speed, spawn.max_speed);
            sink.draw(DrawCommand::FilledCircle {
                center: tornado.position(),
                radius: size / 2.0,
                color: FUNNEL_OUTER_COLOR,
            })?;
            sink.draw(DrawCommand::FilledCircle {
                center: tornado.position(),
                radius: size / 4.0,
                color: FUNNEL_CORE_COLOR,
            })?;
        }

        sink.finish_frame()
    }
}

fn city_position(cities: &[City], id: CityId) -> Option<Vec2> {
    cities.iter().find(|city| city.id() == id).map(City::position)
}

fn draw_city<S>(city: &City, sink: &mut S) -> AnyResult<()>
where
    S: RenderSink + ?Sized,
{
    sink.draw(DrawCommand::FilledCircle {
        center: city.position(),
        radius: city.area_radius(),
        color: CITY_AREA_COLOR,
    })?;
    sink.draw(DrawCommand::FilledCircle {
        center: city.position(),
        radius: city.display_radius() / 2.0,
        color: if city.is_hit() {
            CITY_HIT_COLOR
        } else {
            CITY_COLOR
        },
    })?;
    sink.draw(DrawCommand::Label {
        anchor: city.position() - Vec2::new(0.0, LABEL_OFFSET),
        text: format!(
            "{} ({})",
            city.name(),
            format_thousands(u64::from(city.population()))
        ),
        size: LABEL_SIZE,
        color: LABEL_COLOR,
    })
}

/// Linear map of wind speed onto funnel diameter; not clamped.
fn funnel_size(wind_speed: f32, min_speed: f32, max_speed: f32) -> f32 {
    let span = max_speed - min_speed;
    if span <= f32::EPSILON {
        return FUNNEL_MIN_SIZE;
    }
    FUNNEL_MIN_SIZE + (wind_speed - min_speed) / span * (FUNNEL_MAX_SIZE - FUNNEL_MIN_SIZE)
}
