/// Zoom and pan of the focal image
///
/// Pinch zoom scales around the pinch point (kept as a percentage of the
/// image, like a CSS transform origin). The image never shrinks below its
/// fitted size. Wheel zoom and drag panning work the same way for mice.

use cgmath::Vector2;
use iced::{Point, Rectangle};

/// Transform origin at the image centre, in percent
const CENTER: Vector2<f32> = Vector2 { x: 50.0, y: 50.0 };

/// Values captured when a pinch begins
#[derive(Debug, Clone, Copy, PartialEq)]
struct Pinch {
    initial_distance: f32,
    initial_scale: f32,
    /// Pinch point in percent of the image
    origin: Vector2<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Zoom {
    /// 1.0 = fitted size
    scale: f32,
    /// Transform origin in percent of the image
    origin: Vector2<f32>,
    /// Pan offset in pixels, applied after scaling
    offset: Vector2<f32>,
    pinch: Option<Pinch>,
}

impl Default for Zoom {
    fn default() -> Self {
        Self {
            scale: 1.0,
            origin: CENTER,
            offset: Vector2::new(0.0, 0.0),
            pinch: None,
        }
    }
}

impl Zoom {
    pub fn is_zoomed(&self) -> bool {
        self.scale > 1.0
    }

    pub fn is_pinching(&self) -> bool {
        self.pinch.is_some()
    }

    /// The image may overflow its container
    pub fn breaks_out(&self) -> bool {
        self.is_zoomed() || self.is_pinching()
    }

    /// Idle pulse is suspended while fingers are on the image
    pub fn pulse_enabled(&self) -> bool {
        !self.is_pinching()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Two fingers touched down at `a` and `b`
    pub fn begin_pinch(&mut self, a: Point, b: Point, image: Rectangle) {
        let center = Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
        let origin = relative_percent(center, image);

        self.origin = origin;
        self.pinch = Some(Pinch {
            initial_distance: a.distance(b),
            initial_scale: self.scale,
            origin,
        });
    }

    /// Fingers moved; `distance` is the current distance between them
    pub fn update_pinch(&mut self, distance: f32) -> bool {
        let Some(pinch) = self.pinch else {
            return false;
        };
        if pinch.initial_distance <= 0.0 {
            return false;
        }

        let scale = (pinch.initial_scale * distance / pinch.initial_distance).max(1.0);
        self.scale = scale;
        self.origin = if scale > 1.0 { pinch.origin } else { CENTER };
        if scale <= 1.0 {
            self.offset = Vector2::new(0.0, 0.0);
        }
        true
    }

    /// Fewer than two fingers remain. The scale is kept.
    pub fn end_pinch(&mut self) {
        self.pinch = None;
    }

    /// Wheel zoom about `at`. `delta` is a relative change (0.1 = +10%).
    pub fn zoom_at(&mut self, delta: f32, at: Point, image: Rectangle, max_scale: f32) -> bool {
        let scale = (self.scale * (1.0 + delta)).clamp(1.0, max_scale.max(1.0));
        if scale == self.scale {
            return false;
        }

        if !self.is_zoomed() {
            self.origin = relative_percent(at, image);
        }
        self.scale = scale;

        if !self.is_zoomed() {
            self.origin = CENTER;
            self.offset = Vector2::new(0.0, 0.0);
        }
        true
    }

    /// Drag the zoomed image. Ignored at fitted size.
    pub fn pan(&mut self, delta: Vector2<f32>) -> bool {
        if !self.is_zoomed() {
            return false;
        }
        self.offset += delta;
        true
    }

    /// Where the image is drawn after scaling about the origin and panning
    pub fn transform(&self, image: Rectangle) -> Rectangle {
        let origin = Point::new(
            image.x + image.width * self.origin.x / 100.0,
            image.y + image.height * self.origin.y / 100.0,
        );

        Rectangle {
            x: origin.x - (origin.x - image.x) * self.scale + self.offset.x,
            y: origin.y - (origin.y - image.y) * self.scale + self.offset.y,
            width: image.width * self.scale,
            height: image.height * self.scale,
        }
    }
}

/// Position of `point` inside `rect` in percent, clamped to the rect
fn relative_percent(point: Point, rect: Rectangle) -> Vector2<f32> {
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return CENTER;
    }
    let x = ((point.x - rect.x) / rect.width).clamp(0.0, 1.0);
    let y = ((point.y - rect.y) / rect.height).clamp(0.0, 1.0);
    Vector2::new(x * 100.0, y * 100.0)
}
