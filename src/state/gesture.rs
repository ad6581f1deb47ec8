/// Touch and mouse gesture recognition
///
/// Turns raw finger / button events into swipes and pinch phases.
/// A gesture that ever had two fingers down is a pinch and never a swipe.

use iced::Point;
use std::collections::BTreeMap;

/// Navigation requested by a swipe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    /// Finger moved left: content comes in from the right
    Next,
    /// Finger moved right
    Previous,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Swipe(Swipe),
    PinchStart { a: Point, b: Point },
    PinchMove { distance: f32 },
    PinchEnd,
}

/// Horizontal swipe from `start` to `end`, if the movement qualifies
pub fn classify_swipe(start: Point, end: Point, threshold: f32) -> Option<Swipe> {
    let dx = start.x - end.x;
    let dy = start.y - end.y;

    if dx.abs() > dy.abs() && dx.abs() > threshold {
        if dx > 0.0 {
            Some(Swipe::Next)
        } else {
            Some(Swipe::Previous)
        }
    } else {
        None
    }
}

#[derive(Debug, Clone, Default)]
pub struct GestureTracker {
    /// Active fingers by id
    fingers: BTreeMap<u64, Point>,
    /// Where a single-finger gesture began
    start: Option<Point>,
    /// Two fingers have been down during this gesture
    pinching: bool,
    /// PinchEnd not yet reported
    pinch_open: bool,
    /// Left button press position for mouse swipes
    mouse_start: Option<Point>,
}

impl GestureTracker {
    pub fn finger_pressed(&mut self, id: u64, position: Point) -> Option<Gesture> {
        self.fingers.insert(id, position);

        match self.fingers.len() {
            1 if !self.pinching => {
                self.start = Some(position);
                None
            }
            2 => {
                self.pinching = true;
                self.pinch_open = true;
                self.start = None;
                let (a, b) = self.first_two()?;
                Some(Gesture::PinchStart { a, b })
            }
            _ => None,
        }
    }

    pub fn finger_moved(&mut self, id: u64, position: Point) -> Option<Gesture> {
        let finger = self.fingers.get_mut(&id)?;
        *finger = position;

        if self.fingers.len() >= 2 && self.pinch_open {
            let (a, b) = self.first_two()?;
            return Some(Gesture::PinchMove {
                distance: a.distance(b),
            });
        }
        None
    }

    /// `threshold` is the minimum horizontal travel of a swipe
    pub fn finger_lifted(&mut self, id: u64, position: Point, threshold: f32) -> Option<Gesture> {
        self.fingers.remove(&id);

        if self.pinching {
            let gesture = if self.pinch_open && self.fingers.len() < 2 {
                self.pinch_open = false;
                Some(Gesture::PinchEnd)
            } else {
                None
            };
            if self.fingers.is_empty() {
                self.pinching = false;
                self.start = None;
            }
            return gesture;
        }

        let start = self.start.take()?;
        classify_swipe(start, position, threshold).map(Gesture::Swipe)
    }

    /// The platform dropped a finger; never counts as a swipe
    pub fn finger_lost(&mut self, id: u64) -> Option<Gesture> {
        self.fingers.remove(&id);
        self.start = None;

        let gesture = if self.pinch_open && self.fingers.len() < 2 {
            self.pinch_open = false;
            Some(Gesture::PinchEnd)
        } else {
            None
        };
        if self.fingers.is_empty() {
            self.pinching = false;
        }
        gesture
    }

    pub fn mouse_pressed(&mut self, position: Point) {
        self.mouse_start = Some(position);
    }

    pub fn mouse_released(&mut self, position: Point, threshold: f32) -> Option<Swipe> {
        let start = self.mouse_start.take()?;
        classify_swipe(start, position, threshold)
    }

    /// Forget a pending mouse swipe, e.g. once the drag turned into a pan
    pub fn cancel_mouse(&mut self) {
        self.mouse_start = None;
    }

    fn first_two(&self) -> Option<(Point, Point)> {
        let mut points = self.fingers.values().copied();
        Some((points.next()?, points.next()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: f32 = 30.0;

    #[test]
    fn test_classify_swipe() {
        let start = Point::new(200.0, 100.0);
        assert_eq!(classify_swipe(start, Point::new(100.0, 110.0), THRESHOLD), Some(Swipe::Next));
        assert_eq!(classify_swipe(start, Point::new(300.0, 90.0), THRESHOLD), Some(Swipe::Previous));
        // Too short
        assert_eq!(classify_swipe(start, Point::new(180.0, 100.0), THRESHOLD), None);
        // Mostly vertical
        assert_eq!(classify_swipe(start, Point::new(150.0, 300.0), THRESHOLD), None);
        // Exactly at the threshold does not count
        assert_eq!(classify_swipe(start, Point::new(170.0, 100.0), THRESHOLD), None);
    }

    #[test]
    fn test_single_finger_swipe() {
        let mut tracker = GestureTracker::default();
        assert_eq!(tracker.finger_pressed(1, Point::new(300.0, 200.0)), None);
        assert_eq!(tracker.finger_moved(1, Point::new(250.0, 200.0)), None);
        assert_eq!(
            tracker.finger_lifted(1, Point::new(200.0, 205.0), THRESHOLD),
            Some(Gesture::Swipe(Swipe::Next))
        );
    }

    #[test]
    fn test_pinch_is_never_a_swipe() {
        let mut tracker = GestureTracker::default();
        tracker.finger_pressed(1, Point::new(100.0, 100.0));
        let start = tracker.finger_pressed(2, Point::new(200.0, 100.0));
        assert_eq!(
            start,
            Some(Gesture::PinchStart {
                a: Point::new(100.0, 100.0),
                b: Point::new(200.0, 100.0),
            })
        );
        assert!(tracker.pinching);

        assert_eq!(
            tracker.finger_moved(2, Point::new(300.0, 100.0)),
            Some(Gesture::PinchMove { distance: 200.0 })
        );

        assert_eq!(
            tracker.finger_lifted(2, Point::new(300.0, 100.0), THRESHOLD),
            Some(Gesture::PinchEnd)
        );
        // The remaining finger sweeps far left but this is still the pinch
        tracker.finger_moved(1, Point::new(0.0, 100.0));
        assert_eq!(tracker.finger_lifted(1, Point::new(0.0, 100.0), THRESHOLD), None);
        assert!(!tracker.pinching);

        // Next gesture is a fresh swipe
        tracker.finger_pressed(3, Point::new(0.0, 100.0));
        assert_eq!(
            tracker.finger_lifted(3, Point::new(100.0, 100.0), THRESHOLD),
            Some(Gesture::Swipe(Swipe::Previous))
        );
    }

    #[test]
    fn test_lost_finger_ends_pinch() {
        let mut tracker = GestureTracker::default();
        tracker.finger_pressed(1, Point::new(100.0, 100.0));
        tracker.finger_pressed(2, Point::new(200.0, 100.0));
        assert_eq!(tracker.finger_lost(1), Some(Gesture::PinchEnd));
        assert_eq!(tracker.finger_lost(2), None);
        assert!(!tracker.pinching);
    }

    #[test]
    fn test_mouse_swipe() {
        let mut tracker = GestureTracker::default();
        tracker.mouse_pressed(Point::new(400.0, 300.0));
        assert_eq!(tracker.mouse_released(Point::new(320.0, 310.0), THRESHOLD), Some(Swipe::Next));
        // Release without press
        assert_eq!(tracker.mouse_released(Point::new(0.0, 0.0), THRESHOLD), None);

        tracker.mouse_pressed(Point::new(400.0, 300.0));
        tracker.cancel_mouse();
        assert_eq!(tracker.mouse_released(Point::new(100.0, 300.0), THRESHOLD), None);
    }
}
