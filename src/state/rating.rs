/// Rating reveal: a column of digits that spins to the point's rating
///
/// The column holds `(rounds + 1) * 11` cells labelled 0..=10 repeating.
/// Revealing snaps the column back to 0, then eases it up so the rating's
/// cell sits in the window. Half ratings stop between two cells.

use std::time::{Duration, Instant};

use crate::state::point::format_rating;

/// Cells per turn: digits 0 through 10
pub const DIGITS_PER_ROUND: usize = 11;

/// CSS-style cubic Bézier timing function with endpoints (0,0) and (1,1)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
}

impl CubicBezier {
    /// The spinner's curve: cubic-bezier(0.25, 0.1, 0.25, 1)
    pub const EASE: CubicBezier = CubicBezier::new(0.25, 0.1, 0.25, 1.0);

    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    fn sample(a1: f32, a2: f32, t: f32) -> f32 {
        // Bernstein form with P0 = 0 and P3 = 1
        let u = 1.0 - t;
        3.0 * u * u * t * a1 + 3.0 * u * t * t * a2 + t * t * t
    }

    fn sample_derivative(a1: f32, a2: f32, t: f32) -> f32 {
        let u = 1.0 - t;
        3.0 * u * u * a1 + 6.0 * u * t * (a2 - a1) + 3.0 * t * t * (1.0 - a2)
    }

    /// Curve parameter whose x equals `x`
    fn solve_t(&self, x: f32) -> f32 {
        // Newton first, it converges in a few steps for sane curves
        let mut t = x;
        for _ in 0..8 {
            let error = Self::sample(self.x1, self.x2, t) - x;
            if error.abs() < 1e-6 {
                return t;
            }
            let slope = Self::sample_derivative(self.x1, self.x2, t);
            if slope.abs() < 1e-6 {
                break;
            }
            t -= error / slope;
        }

        // Bisection fallback
        let (mut low, mut high) = (0.0_f32, 1.0_f32);
        t = x;
        for _ in 0..32 {
            let value = Self::sample(self.x1, self.x2, t);
            if (value - x).abs() < 1e-6 {
                break;
            }
            if value < x {
                low = t;
            } else {
                high = t;
            }
            t = (low + high) / 2.0;
        }
        t
    }

    /// Eased progress for linear progress `x` in [0, 1]
    pub fn ease(&self, x: f32) -> f32 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        Self::sample(self.y1, self.y2, self.solve_t(x))
    }
}

/// Geometry of the digit column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinnerSpec {
    /// Extra full turns before landing
    pub rounds: u32,
    pub digit_height: f32,
    pub base_duration: Duration,
}

impl SpinnerSpec {
    pub fn digit_count(&self) -> usize {
        (self.rounds as usize + 1) * DIGITS_PER_ROUND
    }

    /// Label of cell `index`
    pub fn digit_label(index: usize) -> String {
        (index % DIGITS_PER_ROUND).to_string()
    }

    /// Final translation of the column for `rating` (negative = moved up)
    pub fn target_offset(&self, rating: f32) -> f32 {
        let rounds = self.rounds as f32 * DIGITS_PER_ROUND as f32 * self.digit_height;
        -(rounds + rating * self.digit_height)
    }

    /// Spin duration: base plus one second per extra round
    pub fn duration(&self) -> Duration {
        self.base_duration + Duration::from_secs(self.rounds as u64)
    }
}

/// A running or finished spin
#[derive(Debug, Clone, Copy, PartialEq)]
struct Spin {
    started: Instant,
    target: f32,
    duration: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RatingReveal {
    spec: SpinnerSpec,
    spin: Option<Spin>,
}

impl RatingReveal {
    pub fn new(spec: SpinnerSpec) -> Self {
        Self { spec, spin: None }
    }

    pub fn spec(&self) -> &SpinnerSpec {
        &self.spec
    }

    pub fn is_visible(&self) -> bool {
        self.spin.is_some()
    }

    /// Reset the column to 0 and spin to `rating`
    pub fn show(&mut self, rating: f32, now: Instant) {
        tracing::debug!(rating, "🎰 Spinning rating");
        self.spin = Some(Spin {
            started: now,
            target: self.spec.target_offset(rating),
            duration: self.spec.duration(),
        });
    }

    pub fn hide(&mut self) {
        self.spin = None;
    }

    /// Show when hidden, hide when shown. Returns the new visibility.
    pub fn toggle(&mut self, rating: f32, now: Instant) -> bool {
        if self.is_visible() {
            self.hide();
        } else {
            self.show(rating, now);
        }
        self.is_visible()
    }

    /// Label for the reveal button
    pub fn button_label(&self, rating: f32) -> String {
        if self.is_visible() {
            "HIDE".to_string()
        } else {
            format!("SHOW({})", format_rating(rating))
        }
    }

    /// Column translation at `now`
    pub fn offset_at(&self, now: Instant) -> f32 {
        let Some(spin) = self.spin else {
            return 0.0;
        };
        if spin.duration.is_zero() {
            return spin.target;
        }
        let elapsed = now.saturating_duration_since(spin.started);
        let progress = elapsed.as_secs_f32() / spin.duration.as_secs_f32();
        spin.target * CubicBezier::EASE.ease(progress)
    }

    /// The spin is still moving
    pub fn is_animating(&self, now: Instant) -> bool {
        self.spin
            .map(|spin| now.saturating_duration_since(spin.started) < spin.duration)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(rounds: u32) -> SpinnerSpec {
        SpinnerSpec {
            rounds,
            digit_height: 70.0,
            base_duration: Duration::from_secs(2),
        }
    }

    #[test]
    fn test_ease_endpoints_and_monotonic() {
        let curve = CubicBezier::EASE;
        assert_eq!(curve.ease(0.0), 0.0);
        assert_eq!(curve.ease(1.0), 1.0);

        let mut last = 0.0;
        for i in 1..100 {
            let y = curve.ease(i as f32 / 100.0);
            assert!(y >= last, "not monotonic at {i}");
            last = y;
        }
    }

    #[test]
    fn test_ease_matches_reference_points() {
        // cubic-bezier(0.25, 0.1, 0.25, 1) is CSS `ease`: ~0.8024 at x = 0.5
        let y = CubicBezier::EASE.ease(0.5);
        assert!((y - 0.8024).abs() < 1e-3, "got {y}");

        let linear = CubicBezier::new(0.0, 0.0, 1.0, 1.0);
        assert!((linear.ease(0.3) - 0.3).abs() < 1e-4);
    }

    #[test]
    fn test_digit_column() {
        assert_eq!(spec(0).digit_count(), 11);
        assert_eq!(spec(2).digit_count(), 33);
        assert_eq!(SpinnerSpec::digit_label(10), "10");
        assert_eq!(SpinnerSpec::digit_label(11), "0");
    }

    #[test]
    fn test_target_offset() {
        assert_eq!(spec(0).target_offset(7.0), -490.0);
        assert_eq!(spec(0).target_offset(7.5), -525.0);
        assert_eq!(spec(1).target_offset(3.0), -(770.0 + 210.0));
        assert_eq!(spec(1).duration(), Duration::from_secs(3));
    }

    #[test]
    fn test_show_spins_from_zero() {
        let mut reveal = RatingReveal::new(spec(0));
        let start = Instant::now();
        assert_eq!(reveal.button_label(8.5), "SHOW(8.5)");

        reveal.show(8.0, start);
        assert_eq!(reveal.button_label(8.0), "HIDE");
        assert_eq!(reveal.offset_at(start), 0.0);
        assert!(reveal.is_animating(start + Duration::from_secs(1)));

        let mid = reveal.offset_at(start + Duration::from_secs(1));
        assert!(mid < 0.0 && mid > -560.0);

        let end = start + Duration::from_secs(3);
        assert_eq!(reveal.offset_at(end), -560.0);
        assert!(!reveal.is_animating(end));
    }

    #[test]
    fn test_toggle() {
        let mut reveal = RatingReveal::new(spec(0));
        let now = Instant::now();
        assert!(reveal.toggle(4.0, now));
        assert!(!reveal.toggle(4.0, now));
        assert_eq!(reveal.offset_at(now), 0.0);
        assert_eq!(reveal.button_label(4.0), "SHOW(4)");
    }
}
