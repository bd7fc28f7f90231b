use iced::Point;
use std::time::{Duration, Instant};

/// Slides the agent marker from its last drawn position to a new target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glide {
    from: Point,
    to: Point,
    started: Instant,
    duration: Duration,
}

impl Glide {
    pub fn settled(at: Point, duration: Duration, now: Instant) -> Self {
        Self {
            from: at,
            to: at,
            started: now,
            duration,
        }
    }

    /// Starts moving towards `to` from wherever the marker is at `now`.
    pub fn retarget(&mut self, to: Point, now: Instant) {
        self.from = self.position(now);
        self.to = to;
        self.started = now;
    }

    pub fn position(&self, now: Instant) -> Point {
        let t = ease(self.progress(now));

        Point::new(
            self.from.x + (self.to.x - self.from.x) * t,
            self.from.y + (self.to.y - self.from.y) * t,
        )
    }

    pub fn is_moving(&self, now: Instant) -> bool {
        self.from != self.to && self.progress(now) < 1.
    }

    fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.;
        }

        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.)
    }
}

fn ease(t: f32) -> f32 {
    t * t * (3. - 2. * t)
}
