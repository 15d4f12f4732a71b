//! Persistent layers that survive between frames.

use std::sync::Arc;

use glam::Vec2;
use tornado_alley_core::{Event, Terrain};
use tornado_alley_world::{query, World};

use crate::{Color, DrawCommand};

const TRACK_ALPHA: u8 = 180;

/// Single damage-track stroke left behind by a tornado.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackStroke {
    /// Start of the stroke.
    pub from: Vec2,
    /// End of the stroke.
    pub to: Vec2,
    /// Stroke width in pixels.
    pub width: f32,
    /// Semi-transparent rating color.
    pub color: Color,
}

/// Accumulated damage tracks, cleared whenever the simulation resets.
///
/// Each stroke is handed to the sink once; sinks keep the strokes in a
/// persistent buffer and composite it at the track layer every frame.
#[derive(Clone, Debug)]
pub struct TrackLayer {
    strokes: Vec<TrackStroke>,
    flushed: usize,
    cleared: bool,
}

impl Default for TrackLayer {
    fn default() -> Self {
        Self {
            strokes: Vec::new(),
            flushed: 0,
            cleared: true,
        }
    }
}

impl TrackLayer {
    /// Records new track segments and drops the layer on reset.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::TrackDrawn {
                    from,
                    to,
                    width,
                    color,
                    ..
                } => self.strokes.push(TrackStroke {
                    from: *from,
                    to: *to,
                    width: *width,
                    color: Color::from(*color).with_alpha_u8(TRACK_ALPHA),
                }),
                Event::SimulationReset => {
                    self.strokes.clear();
                    self.flushed = 0;
                    self.cleared = true;
                }
                _ => {}
            }
        }
    }

    /// Strokes in the order they were drawn.
    #[must_use]
    pub fn strokes(&self) -> &[TrackStroke] {
        &self.strokes
    }

    /// Strokes recorded since the last flush.
    #[must_use]
    pub fn pending(&self) -> &[TrackStroke] {
        &self.strokes[self.flushed..]
    }

    pub(crate) fn flush(&mut self) -> DrawCommand {
        let strokes = self.pending().to_vec();
        self.flushed = self.strokes.len();
        DrawCommand::TrackBuffer {
            reset: std::mem::take(&mut self.cleared),
            strokes,
        }
    }
}

/// Cached terrain raster, rebuilt only after the map changes.
#[derive(Clone, Debug)]
pub struct TerrainLayer {
    cells: Option<Arc<[Terrain]>>,
    width: u32,
    height: u32,
    stale: bool,
}

impl Default for TerrainLayer {
    fn default() -> Self {
        Self {
            cells: None,
            width: 0,
            height: 0,
            stale: true,
        }
    }
}

impl TerrainLayer {
    /// Invalidates the cache when the map is regenerated or painted.
    pub fn handle(&mut self, events: &[Event]) {
        if events
            .iter()
            .any(|event| matches!(event, Event::MapGenerated { .. } | Event::TerrainPainted { .. }))
        {
            self.stale = true;
        }
    }

    /// Whether the next frame rebuilds the raster.
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        self.stale
    }

    pub(crate) fn draw_command(&mut self, world: &World) -> Option<DrawCommand> {
        if self.stale {
            self.stale = false;
            match query::terrain(world) {
                Some(terrain) => {
                    self.cells = Some(Arc::from(terrain.cells()));
                    self.width = terrain.width();
                    self.height = terrain.height();
                }
                None => self.cells = None,
            }
        }

        self.cells.as_ref().map(|cells| DrawCommand::TerrainRaster {
            width: self.width,
            height: self.height,
            cells: Arc::clone(cells),
        })
    }
}
