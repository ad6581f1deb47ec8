/// Carousel index, transitions and render bookkeeping
///
/// Navigation runs in three steps driven by timers in the app:
/// 1. `navigate` moves the index and hides the stage (`Phase::Hidden`)
/// 2. after the hide delay `swap_content` renders the new point and starts
///    the entrance (`Phase::Entering`)
/// 3. after the settle delay `settle` accepts navigation again
///
/// While `transitioning` is set every navigation request is dropped.

use iced::Size;
use std::time::{Duration, Instant};

use crate::config::CarouselConfig;
use crate::state::layout::fit_contain;
use crate::state::next_strip::NextStrip;
use crate::state::point::ImagePoint;
use crate::state::rating::{RatingReveal, SpinnerSpec};
use crate::state::transition::{self, Appearance, Direction, TransitionKind};
use crate::state::zoom::Zoom;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    /// Fully shown
    Idle,
    /// Content hidden, waiting for the swap
    Hidden,
    /// New content animating in
    Entering { started: Instant },
}

#[derive(Debug)]
pub struct CarouselState {
    points: Vec<ImagePoint>,
    current: usize,
    transitioning: bool,
    phase: Phase,
    direction: Direction,
    /// Window size the stage is fitted against
    viewport: Size,
    /// Size of the focal image container
    stage_size: Size,

    pub zoom: Zoom,
    pub next_strip: NextStrip,
    pub rating: RatingReveal,

    transition: TransitionKind,
    enter_duration: Duration,
    max_width_fraction: f32,
    max_height_fraction: f32,
}

impl CarouselState {
    pub fn new(config: &CarouselConfig, viewport: Size) -> Self {
        let spinner = SpinnerSpec {
            rounds: config.animation_rounds,
            digit_height: config.digit_height,
            base_duration: Duration::from_secs_f32(config.spin_base_secs),
        };

        Self {
            points: Vec::new(),
            current: 0,
            transitioning: false,
            phase: Phase::Idle,
            direction: Direction::Forward,
            viewport,
            stage_size: Size::ZERO,
            zoom: Zoom::default(),
            next_strip: NextStrip::new(),
            rating: RatingReveal::new(spinner),
            transition: config.transition,
            enter_duration: config.enter_duration(),
            max_width_fraction: config.max_width_fraction,
            max_height_fraction: config.max_height_fraction,
        }
    }

    /// Replace all points and show the first one
    pub fn load(&mut self, points: Vec<ImagePoint>) {
        tracing::info!("🖼️  Carousel loaded with {} points", points.len());
        self.points = points;
        self.current = 0;
        self.transitioning = false;
        self.phase = Phase::Idle;
        self.rating.hide();
        self.next_strip.reset();
        self.render();
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn current_point(&self) -> Option<&ImagePoint> {
        self.points.get(self.current)
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn stage_size(&self) -> Size {
        self.stage_size
    }

    /// Move the main index one step. The index does not wrap.
    /// Returns the direction when a transition was started.
    pub fn navigate(&mut self, direction: Direction) -> Option<Direction> {
        if self.points.is_empty() || self.transitioning {
            return None;
        }

        match direction {
            Direction::Forward if self.current + 1 < self.points.len() => self.current += 1,
            Direction::Backward if self.current > 0 => self.current -= 1,
            _ => return None,
        }

        tracing::debug!(current = self.current, ?direction, "➡️  Navigating");

        self.rating.hide();
        self.transitioning = true;
        self.phase = Phase::Hidden;
        self.direction = direction;
        self.zoom.reset();
        Some(direction)
    }

    /// Render the new point and start its entrance
    pub fn swap_content(&mut self, now: Instant) -> bool {
        if self.phase != Phase::Hidden {
            return false;
        }
        self.render();
        self.phase = Phase::Entering { started: now };
        true
    }

    /// Accept navigation again
    pub fn settle(&mut self) {
        self.transitioning = false;
    }

    /// Finish the entrance once its time is up
    pub fn tick(&mut self, now: Instant) {
        if let Phase::Entering { started } = self.phase {
            if now.saturating_duration_since(started) >= self.enter_duration {
                self.phase = Phase::Idle;
            }
        }
    }

    /// Something on screen is moving and needs frames
    pub fn is_animating(&self, now: Instant) -> bool {
        matches!(self.phase, Phase::Entering { .. }) || self.rating.is_animating(now)
    }

    /// How the stage looks at `now`
    pub fn appearance(&self, now: Instant) -> Appearance {
        match self.phase {
            Phase::Idle => Appearance::IDENTITY,
            Phase::Hidden => Appearance::HIDDEN,
            Phase::Entering { started } => {
                let progress = if self.enter_duration.is_zero() {
                    1.0
                } else {
                    now.saturating_duration_since(started).as_secs_f32()
                        / self.enter_duration.as_secs_f32()
                };
                transition::entering(self.transition, progress, self.direction)
            }
        }
    }

    /// Window resized (already debounced)
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
        if !self.points.is_empty() {
            self.render();
        }
    }

    /// Strip is shown when it has cards and the stage is not mid-swap
    pub fn next_strip_visible(&self) -> bool {
        self.phase != Phase::Hidden && self.next_strip.is_visible(self.points.len())
    }

    /// Points shown on the two strip cards
    pub fn next_cards(&self) -> Option<[&ImagePoint; 2]> {
        let [first, second] = self.next_strip.cards(self.points.len())?;
        Some([&self.points[first], &self.points[second]])
    }

    /// Timer tick for the strip
    pub fn advance_next_strip(&mut self) -> Option<[usize; 2]> {
        let cards = self.next_strip.advance(self.points.len())?;
        tracing::debug!(
            "📱 Next strip now [{}] [{}]",
            self.points[cards[0]].caption,
            self.points[cards[1]].caption
        );
        Some(cards)
    }

    /// Show another image of the current point
    pub fn select_alternate(&mut self, index: usize) -> bool {
        let Some(point) = self.points.get_mut(self.current) else {
            return false;
        };
        if !point.select(index) {
            return false;
        }
        self.render();
        true
    }

    pub fn cycle_alternate(&mut self) -> bool {
        let Some(point) = self.points.get_mut(self.current) else {
            return false;
        };
        if !point.cycle() {
            return false;
        }
        self.render();
        true
    }

    /// Toggle the rating spinner for the current point
    pub fn toggle_rating(&mut self, now: Instant) -> Option<bool> {
        let rating = self.current_point()?.rating;
        Some(self.rating.toggle(rating, now))
    }

    /// Label for the rating button
    pub fn rating_button_label(&self) -> String {
        self.current_point()
            .map(|point| self.rating.button_label(point.rating))
            .unwrap_or_default()
    }

    /// Bring derived state in line with the current point
    fn render(&mut self) {
        let Some(point) = self.points.get(self.current) else {
            return;
        };

        self.stage_size = fit_contain(
            point.current_source().natural_size(),
            self.viewport,
            self.max_width_fraction,
            self.max_height_fraction,
        );

        if self.next_strip.initialize(self.current, self.points.len()) {
            tracing::debug!(start = ?self.next_strip.start(), "📱 Next strip initialised");
        }

        self.zoom.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::point::sample_point;

    fn carousel(count: usize) -> CarouselState {
        let mut state = CarouselState::new(&CarouselConfig::default(), Size::new(1000.0, 800.0));
        let points = (0..count)
            .map(|i| sample_point(&format!("p{i}"), i as f32, 1))
            .collect();
        state.load(points);
        state
    }

    /// Run a navigation to completion
    fn finish(state: &mut CarouselState, now: Instant) {
        assert!(state.swap_content(now));
        state.settle();
        state.tick(now + Duration::from_secs(1));
    }

    #[test]
    fn test_load_renders_first_point() {
        let state = carousel(4);
        assert_eq!(state.current(), 0);
        assert_eq!(state.phase(), Phase::Idle);
        // 400 x 300 into 800 x 520: height bound
        assert!((state.stage_size().height - 520.0).abs() < 1e-3);
        assert!((state.stage_size().width - 693.333).abs() < 1e-2);
        assert_eq!(state.next_strip.cards(4), Some([1, 2]));
        assert!(state.next_strip_visible());
    }

    #[test]
    fn test_navigation_does_not_wrap() {
        let mut state = carousel(2);
        let now = Instant::now();

        assert_eq!(state.navigate(Direction::Backward), None);
        assert_eq!(state.navigate(Direction::Forward), Some(Direction::Forward));
        finish(&mut state, now);
        assert_eq!(state.current(), 1);
        assert_eq!(state.navigate(Direction::Forward), None);
        assert_eq!(state.current(), 1);
    }

    #[test]
    fn test_navigation_locked_while_transitioning() {
        let mut state = carousel(5);
        let now = Instant::now();

        assert!(state.navigate(Direction::Forward).is_some());
        assert!(state.is_transitioning());
        assert_eq!(state.phase(), Phase::Hidden);
        assert_eq!(state.appearance(now).opacity, 0.0);
        assert!(!state.next_strip_visible());

        assert_eq!(state.navigate(Direction::Forward), None);
        assert_eq!(state.current(), 1);

        assert!(state.swap_content(now));
        assert!(state.is_transitioning());
        assert!(state.is_animating(now));
        state.settle();
        assert_eq!(state.navigate(Direction::Backward), Some(Direction::Backward));
        assert_eq!(state.current(), 0);
    }

    #[test]
    fn test_swap_only_from_hidden() {
        let mut state = carousel(3);
        assert!(!state.swap_content(Instant::now()));
    }

    #[test]
    fn test_entrance_finishes() {
        let mut state = carousel(3);
        let now = Instant::now();
        state.navigate(Direction::Forward);
        state.swap_content(now);
        let start = state.appearance(now);
        assert_eq!(start.offset_x, 1.0);

        state.tick(now + Duration::from_millis(100));
        assert!(matches!(state.phase(), Phase::Entering { .. }));
        state.tick(now + Duration::from_millis(400));
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.appearance(now), Appearance::IDENTITY);
    }

    #[test]
    fn test_navigation_resets_zoom_and_rating() {
        let mut state = carousel(3);
        let now = Instant::now();
        let nowhere = iced::Rectangle::new(iced::Point::ORIGIN, Size::ZERO);
        state.zoom.zoom_at(1.0, iced::Point::ORIGIN, nowhere, 5.0);
        assert!(state.zoom.is_zoomed());
        assert_eq!(state.toggle_rating(now), Some(true));
        assert_eq!(state.rating_button_label(), "HIDE");

        state.navigate(Direction::Forward);
        assert!(!state.zoom.is_zoomed());
        assert!(!state.rating.is_visible());
        assert_eq!(state.rating_button_label(), "SHOW(1)");
    }

    #[test]
    fn test_next_strip_is_independent_of_main_index() {
        let mut state = carousel(5);
        let now = Instant::now();
        assert_eq!(state.advance_next_strip(), Some([2, 3]));

        state.navigate(Direction::Forward);
        finish(&mut state, now);
        state.navigate(Direction::Forward);
        finish(&mut state, now);

        assert_eq!(state.current(), 2);
        assert_eq!(state.next_strip.cards(5), Some([2, 3]));
        let [first, second] = state.next_cards().unwrap();
        assert_eq!(first.caption, "p2");
        assert_eq!(second.caption, "p3");
    }

    #[test]
    fn test_small_manifests_hide_the_strip() {
        let mut state = carousel(2);
        assert!(!state.next_strip_visible());
        assert_eq!(state.advance_next_strip(), None);
        assert!(state.next_cards().is_none());
    }

    #[test]
    fn test_alternates() {
        let mut state = CarouselState::new(&CarouselConfig::default(), Size::new(1000.0, 800.0));
        state.load(vec![sample_point("multi", 5.0, 3), sample_point("single", 2.0, 1)]);

        assert!(state.select_alternate(2));
        assert_eq!(state.current_point().unwrap().current_index(), 2);
        assert!(state.cycle_alternate());
        assert_eq!(state.current_point().unwrap().current_index(), 0);
        assert!(!state.select_alternate(9));

        state.navigate(Direction::Forward);
        assert!(!state.cycle_alternate());
    }

    #[test]
    fn test_empty_carousel_ignores_everything() {
        let mut state = carousel(0);
        assert_eq!(state.navigate(Direction::Forward), None);
        assert_eq!(state.toggle_rating(Instant::now()), None);
        assert_eq!(state.rating_button_label(), "");
        assert!(!state.next_strip_visible());
        state.set_viewport(Size::new(10.0, 10.0));
        assert_eq!(state.stage_size(), Size::ZERO);
    }

    #[test]
    fn test_resize_refits_stage() {
        let mut state = carousel(3);
        state.set_viewport(Size::new(500.0, 400.0));
        // 400 x 300 into 400 x 260: height bound
        assert!((state.stage_size().height - 260.0).abs() < 1e-3);
    }
}
