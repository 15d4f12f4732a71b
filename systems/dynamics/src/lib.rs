#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tornado entity and its per-tick motion and wind state machine.
//!
//! A [`Tornado`] is created either autonomously, with every parameter drawn
//! from the injected random source, or manually with user-chosen wind and
//! width. Each call to [`Tornado::advance`] performs one simulation step and
//! reports what happened through an [`Advance`] value; the caller is
//! responsible for casualty checks and the final bounds check.

pub mod spawn;

use std::f32::consts::PI;

use rand::Rng;
use tornado_alley_core::{
    classify, settings::PIXELS_PER_MILE, DissipationCause, EfCap, EfRating, MapBounds,
    MotionTuning, NoiseField, Rgb, TornadoId, Vec2,
};

pub use spawn::{draw_wind_ceiling, initial_heading, SpawnContext, WindCeiling};

use spawn::uniform;

/// Per-tick parameters read by the motion state machine.
#[derive(Clone, Copy, Debug)]
pub struct StepContext {
    /// Motion constants of the active preset.
    pub motion: MotionTuning,
    /// Floor of the wind mapping (mph).
    pub min_speed: f32,
    /// Heading jitter multiplier.
    pub wobble: f32,
    /// EF cap applied to the rating.
    pub ef_cap: EfCap,
}

/// Persistent track segment left behind by a moving tornado.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackSegment {
    /// Segment start.
    pub from: Vec2,
    /// Segment end.
    pub to: Vec2,
    /// Stroke width in pixels.
    pub width: f32,
    /// Stroke color of the current EF rating.
    pub color: Rgb,
}

/// Outcome of a step in which the tornado survived the motion phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion {
    /// Position before the step.
    pub from: Vec2,
    /// Position after the step.
    pub to: Vec2,
    /// Updated wind speed (mph).
    pub wind_speed: f32,
    /// Rating of the updated wind speed.
    pub rating: EfRating,
    /// Track segment to draw, present when the wind reached the track threshold.
    pub track: Option<TrackSegment>,
}

/// Result of advancing a tornado by one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Advance {
    /// The tornado was already dead; nothing changed.
    Idle,
    /// The tornado moved and updated its wind.
    Moved(Motion),
    /// The tornado died during the step.
    Dissipated(DissipationCause),
}

#[derive(Clone, Debug, PartialEq)]
struct Route {
    waypoints: Vec<Vec2>,
    index: usize,
}

impl Route {
    fn current(&self) -> Option<Vec2> {
        self.waypoints.get(self.index).copied()
    }

    /// Moves to the next waypoint, returning `false` once the route is exhausted.
    fn advance(&mut self) -> bool {
        self.index += 1;
        self.index < self.waypoints.len()
    }
}

/// Simulated tornado.
#[derive(Clone, Debug, PartialEq)]
pub struct Tornado {
    id: TornadoId,
    position: Vec2,
    previous_position: Vec2,
    age_clock: f32,
    wind_clock: f32,
    lifespan_remaining: u32,
    wind_speed: f32,
    max_wind_speed: f32,
    potential_max_wind: f32,
    extreme: bool,
    render_width: f32,
    max_track_width: f32,
    base_angle: f32,
    rating: EfRating,
    route: Option<Route>,
    alive: bool,
}

impl Tornado {
    /// Spawns a tornado whose every parameter is drawn from `rng`.
    pub fn autonomous<R>(id: TornadoId, ctx: &SpawnContext, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let position = Vec2::new(
            uniform(rng, 0.0, ctx.bounds.width()),
            uniform(rng, 0.0, ctx.bounds.height()),
        );
        let age_clock = uniform(rng, 0.0, 1_000.0);
        let wind_clock = uniform(rng, 0.0, 2_000.0);
        let lifespan_remaining = if ctx.spawn.max_lifespan > ctx.spawn.min_lifespan {
            rng.gen_range(ctx.spawn.min_lifespan..=ctx.spawn.max_lifespan)
        } else {
            ctx.spawn.min_lifespan
        };
        let ceiling = draw_wind_ceiling(&ctx.spawn, ctx.ef_cap, rng);
        let render_width = uniform(rng, ctx.motion.min_render_width, ctx.motion.max_render_width);

        Self {
            id,
            position,
            previous_position: position,
            age_clock,
            wind_clock,
            lifespan_remaining,
            wind_speed: 0.0,
            max_wind_speed: 0.0,
            potential_max_wind: ceiling.potential_max_wind,
            extreme: ceiling.extreme,
            render_width,
            max_track_width: 0.0,
            base_angle: initial_heading(position, ctx.bounds, ctx.spawn.edge_buffer),
            rating: EfRating::SubEf0,
            route: None,
            alive: true,
        }
    }

    /// Spawns a user-requested tornado at `position`.
    ///
    /// Clocks and the wind ceiling are still drawn from `rng`; the starting
    /// wind, track width and lifespan come from the request.
    pub fn manual<R>(
        id: TornadoId,
        position: Vec2,
        wind_speed: f32,
        width_miles: f32,
        ctx: &SpawnContext,
        rng: &mut R,
    ) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut tornado = Self::autonomous(id, ctx, rng);
        let width = (width_miles * PIXELS_PER_MILE)
            .max(ctx.motion.min_render_width)
            .min(ctx.motion.max_render_width);

        tornado.position = position;
        tornado.previous_position = position;
        tornado.base_angle = initial_heading(position, ctx.bounds, ctx.spawn.edge_buffer);
        tornado.wind_speed = wind_speed;
        tornado.max_wind_speed = wind_speed;
        tornado.rating = classify(wind_speed, ctx.ef_cap);
        tornado.render_width = width;
        tornado.lifespan_remaining = ctx.spawn.manual_lifespan;
        tornado
    }

    /// Assigns a waypoint path, aiming the base heading at the first point.
    ///
    /// Empty paths are ignored and `false` is returned.
    pub fn assign_path(&mut self, waypoints: &[Vec2]) -> bool {
        let Some(first) = waypoints.first() else {
            return false;
        };
        self.base_angle = angle_between(self.position, *first);
        self.route = Some(Route {
            waypoints: waypoints.to_vec(),
            index: 0,
        });
        true
    }

    /// Advances the tornado by one tick.
    ///
    /// Covers lifespan accounting, motion, path following, clock advance and
    /// wind evolution. Casualty checks and [`Tornado::enforce_bounds`] are
    /// left to the caller, in that order.
    pub fn advance<N>(&mut self, ctx: &StepContext, noise: &N) -> Advance
    where
        N: NoiseField + ?Sized,
    {
        if !self.alive {
            return Advance::Idle;
        }

        self.lifespan_remaining = self.lifespan_remaining.saturating_sub(1);
        if self.lifespan_remaining == 0 {
            self.dissipate();
            return Advance::Dissipated(DissipationCause::LifespanExpired);
        }

        let motion = ctx.motion;
        let start = self.position;
        self.previous_position = start;

        let target = self.route.as_ref().and_then(Route::current);
        let heading = target.map_or(self.base_angle, |point| angle_between(start, point));
        let wobble = (noise.sample_1d(self.age_clock) - 0.5) * PI * ctx.wobble;
        let speed = remap(
            noise.sample_1d(self.age_clock + motion.speed_noise_offset),
            motion.min_step,
            motion.max_step,
        ) * motion.speed_scale;
        self.position = start + Vec2::from_angle(heading + wobble) * speed;

        if let (Some(point), Some(route)) = (target, self.route.as_mut()) {
            if start.distance(point) < motion.waypoint_threshold && !route.advance() {
                self.dissipate();
                return Advance::Dissipated(DissipationCause::PathCompleted);
            }
        }

        self.age_clock += motion.age_rate;
        self.wind_clock += motion.wind_rate;

        let fade = if motion.fade_ticks > 0.0 {
            (self.lifespan_remaining as f32 / motion.fade_ticks).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let biased = noise
            .sample_1d(self.wind_clock)
            .powf(motion.wind_bias_exponent);
        self.wind_speed = remap(biased, ctx.min_speed, self.potential_max_wind) * fade;
        self.max_wind_speed = self.max_wind_speed.max(self.wind_speed);
        self.rating = classify(self.wind_speed, ctx.ef_cap);

        let track = (self.wind_speed >= motion.track_threshold).then(|| {
            self.max_track_width = self.max_track_width.max(self.render_width);
            TrackSegment {
                from: self.previous_position,
                to: self.position,
                width: self.render_width,
                color: self.rating.color(),
            }
        });

        Advance::Moved(Motion {
            from: self.previous_position,
            to: self.position,
            wind_speed: self.wind_speed,
            rating: self.rating,
            track,
        })
    }

    /// Kills the tornado if it left the map, reporting the cause when it did.
    pub fn enforce_bounds(&mut self, bounds: MapBounds) -> Option<DissipationCause> {
        if !self.alive || bounds.contains(self.position) {
            return None;
        }
        self.dissipate();
        Some(DissipationCause::LeftMap)
    }

    fn dissipate(&mut self) {
        self.alive = false;
        self.wind_speed = 0.0;
        self.rating = EfRating::SubEf0;
    }

    /// Identifier of the tornado.
    #[must_use]
    pub const fn id(&self) -> TornadoId {
        self.id
    }

    /// Current centre.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Centre at the start of the most recent step.
    #[must_use]
    pub const fn previous_position(&self) -> Vec2 {
        self.previous_position
    }

    /// Phase of the clock driving heading and speed jitter.
    #[must_use]
    pub const fn age_clock(&self) -> f32 {
        self.age_clock
    }

    /// Phase of the clock driving wind evolution.
    #[must_use]
    pub const fn wind_clock(&self) -> f32 {
        self.wind_clock
    }

    /// Ticks left before the tornado dissipates.
    #[must_use]
    pub const fn lifespan_remaining(&self) -> u32 {
        self.lifespan_remaining
    }

    /// Current wind speed (mph); zero once dead.
    #[must_use]
    pub const fn wind_speed(&self) -> f32 {
        self.wind_speed
    }

    /// Highest wind speed observed so far (mph).
    #[must_use]
    pub const fn max_wind_speed(&self) -> f32 {
        self.max_wind_speed
    }

    /// Ceiling of the wind evolution (mph).
    #[must_use]
    pub const fn potential_max_wind(&self) -> f32 {
        self.potential_max_wind
    }

    /// Whether the tornado rolled an extreme EF6-class ceiling.
    #[must_use]
    pub const fn is_extreme(&self) -> bool {
        self.extreme
    }

    /// Track width in pixels.
    #[must_use]
    pub const fn render_width(&self) -> f32 {
        self.render_width
    }

    /// Widest track segment drawn so far, in pixels.
    #[must_use]
    pub const fn max_track_width(&self) -> f32 {
        self.max_track_width
    }

    /// Heading used while roaming freely (radians).
    #[must_use]
    pub const fn base_angle(&self) -> f32 {
        self.base_angle
    }

    /// Rating of the current wind speed.
    #[must_use]
    pub const fn rating(&self) -> EfRating {
        self.rating
    }

    /// Whether the tornado is still updating.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Whether a waypoint path was assigned.
    #[must_use]
    pub const fn follows_path(&self) -> bool {
        self.route.is_some()
    }

    /// Waypoints of the assigned path, empty when roaming freely.
    #[must_use]
    pub fn waypoints(&self) -> &[Vec2] {
        self.route
            .as_ref()
            .map_or(&[], |route| route.waypoints.as_slice())
    }

    /// Index of the waypoint currently steered toward.
    #[must_use]
    pub fn waypoint_index(&self) -> usize {
        self.route.as_ref().map_or(0, |route| route.index)
    }
}

/// Pure form of [`Tornado::advance`]: returns the next state without touching `tornado`.
#[must_use]
pub fn step<N>(tornado: &Tornado, ctx: &StepContext, noise: &N) -> (Tornado, Advance)
where
    N: NoiseField + ?Sized,
{
    let mut next = tornado.clone();
    let advance = next.advance(ctx, noise);
    (next, advance)
}

fn remap(sample: f32, low: f32, high: f32) -> f32 {
    low + (high - low) * sample
}

fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let delta = to - from;
    delta.y.atan2(delta.x)
}
