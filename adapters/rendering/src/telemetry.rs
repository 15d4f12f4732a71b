//! Text read-outs shown next to the map.

use tornado_alley_core::{settings::PIXELS_PER_MILE, EfRating, TornadoId};
use tornado_alley_world::{query, World};

use crate::Color;

const DISSIPATED_COLOR: Color = Color::from_rgb_u8(0x88, 0x88, 0x88);

/// Formats an integer with comma thousands separators, e.g. `1,234,567`.
#[must_use]
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(digit);
    }
    formatted
}

/// Live and lifetime statistics of a single tornado.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TornadoReadout {
    /// Tornado described by the read-out.
    pub tornado: TornadoId,
    /// Whether the tornado is still updating.
    pub alive: bool,
    /// Current wind speed in mph.
    pub wind_speed: f32,
    /// Current rating.
    pub rating: EfRating,
    /// Highest wind speed reached so far.
    pub max_wind_speed: f32,
    /// Widest track drawn so far, in pixels.
    pub max_track_width: f32,
}

impl TornadoReadout {
    /// Current wind speed rounded to whole mph; `0` once dissipated.
    #[must_use]
    pub fn wind_text(&self) -> String {
        if self.alive {
            format!("{:.0}", self.wind_speed)
        } else {
            "0".to_owned()
        }
    }

    /// Rating with its description, e.g. `EF3 (Severe)`, or `Dissipated`.
    #[must_use]
    pub fn scale_text(&self) -> String {
        if self.alive {
            format!("{} ({})", self.rating.label(), self.rating.description())
        } else {
            "Dissipated".to_owned()
        }
    }

    /// Accent color of [`Self::scale_text`].
    #[must_use]
    pub fn scale_color(&self) -> Color {
        if self.alive {
            Color::from(self.rating.color())
        } else {
            DISSIPATED_COLOR
        }
    }

    /// Lifetime maximum wind speed in whole mph.
    #[must_use]
    pub fn max_wind_text(&self) -> String {
        format!("{:.0}", self.max_wind_speed)
    }

    /// Lifetime maximum track width in miles with two decimals.
    #[must_use]
    pub fn max_width_text(&self) -> String {
        format!("{:.2}", self.max_track_width / PIXELS_PER_MILE)
    }
}

/// Snapshot of everything the information panel displays.
#[derive(Clone, Debug, PartialEq)]
pub struct TelemetryPanel {
    /// One read-out per spawned tornado.
    pub tornadoes: Vec<TornadoReadout>,
    /// Casualties accumulated since the last reset.
    pub total_casualties: u64,
    /// Simulated time as hours and minutes.
    pub clock: (u32, u32),
    /// Per-city strike summaries.
    pub ledger: Vec<String>,
}

impl TelemetryPanel {
    /// Captures the panel contents from the current world state.
    #[must_use]
    pub fn from_world(world: &World) -> Self {
        let tornadoes = query::tornadoes(world)
            .iter()
            .map(|tornado| TornadoReadout {
                tornado: tornado.id(),
                alive: tornado.is_alive(),
                wind_speed: tornado.wind_speed(),
                rating: tornado.rating(),
                max_wind_speed: tornado.max_wind_speed(),
                max_track_width: tornado.max_track_width(),
            })
            .collect();

        Self {
            tornadoes,
            total_casualties: query::total_casualties(world),
            clock: query::clock(world).hours_minutes(),
            ledger: query::ledger(world)
                .entries()
                .iter()
                .map(|entry| entry.summary())
                .collect(),
        }
    }

    /// Total casualties with thousands separators.
    #[must_use]
    pub fn total_text(&self) -> String {
        format_thousands(self.total_casualties)
    }

    /// Clock as zero-padded `HH:MM`.
    #[must_use]
    pub fn clock_text(&self) -> String {
        format!("{:02}:{:02}", self.clock.0, self.clock.1)
    }

    /// Full panel rendered as plain text lines.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.tornadoes.len() + self.ledger.len() + 2);
        lines.push(format!("Time {}", self.clock_text()));
        for readout in &self.tornadoes {
            lines.push(format!(
                "Tornado {}: {} mph {} | max {} mph, {} mi wide",
                readout.tornado.get(),
                readout.wind_text(),
                readout.scale_text(),
                readout.max_wind_text(),
                readout.max_width_text()
            ));
        }
        lines.push(format!("Total casualties: {}", self.total_text()));
        lines.extend(self.ledger.iter().cloned());
        lines
    }
}
