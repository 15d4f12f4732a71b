#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Tornado Alley adapters.
//!
//! The simulation never draws anything itself. Adapters feed world events to
//! a [`FrameComposer`], which keeps the persistent layers up to date and
//! translates each frame into backend-agnostic [`DrawCommand`]s delivered to a
//! [`RenderSink`].

mod compose;
mod layers;
mod telemetry;

use std::sync::Arc;

use anyhow::Result as AnyResult;
use glam::Vec2;
use tornado_alley_core::{Rgb, Terrain};

pub use compose::FrameComposer;
pub use layers::{TerrainLayer, TrackLayer, TrackStroke};
pub use telemetry::{format_thousands, TelemetryPanel, TornadoReadout};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self::from_rgba_u8(red, green, blue, 255)
    }

    /// Creates a color from byte RGBA values.
    #[must_use]
    pub const fn from_rgba_u8(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: alpha as f32 / 255.0,
        }
    }

    /// Returns the same color with a byte alpha channel.
    #[must_use]
    pub const fn with_alpha_u8(self, alpha: u8) -> Self {
        Self {
            alpha: alpha as f32 / 255.0,
            ..self
        }
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Self::from_rgb_u8(rgb.red(), rgb.green(), rgb.blue())
    }
}

/// Backend-agnostic drawing primitive emitted for every frame.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Per-pixel terrain classes laid out row-major from the top-left corner.
    TerrainRaster {
        /// Number of columns.
        width: u32,
        /// Number of rows.
        height: u32,
        /// Shared terrain cells; one per pixel.
        cells: Arc<[Terrain]>,
    },
    /// Solid disc.
    FilledCircle {
        /// Centre of the disc.
        center: Vec2,
        /// Radius in pixels.
        radius: f32,
        /// Fill color.
        color: Color,
    },
    /// Straight stroked line.
    Segment {
        /// Start point.
        from: Vec2,
        /// End point.
        to: Vec2,
        /// Stroke width in pixels.
        width: f32,
        /// Stroke color.
        color: Color,
    },
    /// Appends strokes to the sink's persistent track buffer and composites
    /// the buffer at this position.
    TrackBuffer {
        /// Empty the buffer before appending.
        reset: bool,
        /// Strokes recorded since the previous frame, oldest first.
        strokes: Vec<TrackStroke>,
    },
    /// Open polyline through the listed points.
    Polyline {
        /// Vertices in drawing order.
        points: Vec<Vec2>,
        /// Stroke width in pixels.
        width: f32,
        /// Stroke color.
        color: Color,
    },
    /// Text anchored by its bottom centre.
    Label {
        /// Anchor point.
        anchor: Vec2,
        /// Text content.
        text: String,
        /// Font size in pixels.
        size: f32,
        /// Text color.
        color: Color,
    },
}

/// Destination for composed frames.
pub trait RenderSink {
    /// Draws a single primitive on top of everything drawn so far this frame.
    fn draw(&mut self, command: DrawCommand) -> AnyResult<()>;

    /// Marks the end of the current frame.
    fn finish_frame(&mut self) -> AnyResult<()> {
        Ok(())
    }
}

/// Sink that keeps the commands of the most recent frame in memory.
///
/// Useful for headless runs and for asserting on composed output.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    pending: Vec<DrawCommand>,
    last_frame: Vec<DrawCommand>,
    tracks: Vec<TrackStroke>,
    frames: u64,
}

impl RecordingSink {
    /// Commands of the most recently finished frame.
    #[must_use]
    pub fn last_frame(&self) -> &[DrawCommand] {
        &self.last_frame
    }

    /// Contents of the persistent track buffer.
    #[must_use]
    pub fn tracks(&self) -> &[TrackStroke] {
        &self.tracks
    }

    /// Number of frames finished so far.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }
}

impl RenderSink for RecordingSink {
    fn draw(&mut self, command: DrawCommand) -> AnyResult<()> {
        if let DrawCommand::TrackBuffer { reset, strokes } = &command {
            if *reset {
                self.tracks.clear();
            }
            self.tracks.extend_from_slice(strokes);
        }
        self.pending.push(command);
        Ok(())
    }

    fn finish_frame(&mut self) -> AnyResult<()> {
        self.last_frame = std::mem::take(&mut self.pending);
        self.frames += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tornado_alley_core::EfRating;

    #[test]
    fn byte_channels_map_onto_unit_range() {
        let color = Color::from_rgba_u8(255, 0, 51, 180);
        assert_eq!(color.red, 1.0);
        assert_eq!(color.green, 0.0);
        assert!((color.blue - 0.2).abs() < 1e-6);
        assert!((color.alpha - 180.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn rating_colors_convert_to_opaque_colors() {
        let color = Color::from(EfRating::Ef4.color());
        assert_eq!(color, Color::from_rgb_u8(255, 0, 0));
        assert_eq!(color.with_alpha_u8(0).alpha, 0.0);
    }

    #[test]
    fn recording_sink_keeps_only_the_last_finished_frame() {
        let mut sink = RecordingSink::default();
        let dot = DrawCommand::FilledCircle {
            center: Vec2::ZERO,
            radius: 1.0,
            color: Color::from_rgb_u8(0, 0, 0),
        };
        sink.draw(dot.clone()).expect("recording never fails");
        sink.finish_frame().expect("recording never fails");
        sink.finish_frame().expect("recording never fails");

        assert_eq!(sink.frames(), 2);
        assert!(sink.last_frame().is_empty());

        sink.draw(dot.clone()).expect("recording never fails");
        sink.finish_frame().expect("recording never fails");
        assert_eq!(sink.last_frame(), &[dot]);
    }
}
