use iced::mouse::{self, Cursor};
use iced::touch;
use iced::widget::canvas::{self, Program};
use iced::widget::image::Handle;
use iced::{Point, Rectangle, Renderer, Size, Theme};
use std::f32::consts::TAU;
use std::time::Duration;

use crate::state::gesture::{Gesture, GestureTracker, Swipe};
use crate::state::transition::Appearance;
use crate::state::zoom::Zoom;
use crate::Message;

/// What the stage asks the app to do
#[derive(Debug, Clone)]
pub enum StageEvent {
    Swipe(Swipe),
    PinchStart { a: Point, b: Point, image: Rectangle },
    PinchMove(f32),
    PinchEnd,
    /// Drag delta in pixels while zoomed
    Pan(cgmath::Vector2<f32>),
    /// Wheel zoom about a point
    Zoom { delta: f32, at: Point, image: Rectangle },
}

/// Canvas for the focal image
/// Draws the image with zoom, transition and pulse, and turns pointer
/// input into `StageEvent`s.
pub struct Stage<'a> {
    pub image: Option<Handle>,
    /// Fitted container size
    pub size: Size,
    pub zoom: &'a Zoom,
    pub appearance: Appearance,
    /// Idle pulse multiplier (1.0 = none)
    pub pulse: f32,
    pub swipe_threshold: f32,
}

impl Stage<'_> {
    /// Container rect centred in `bounds` (local coordinates)
    /// Shrinks uniformly when the canvas is smaller than the fitted stage.
    fn container(&self, bounds: Size) -> Rectangle {
        let shrink = if self.size.width > 0.0 && self.size.height > 0.0 {
            (bounds.width / self.size.width)
                .min(bounds.height / self.size.height)
                .clamp(0.0, 1.0)
        } else {
            1.0
        };
        let width = self.size.width * shrink;
        let height = self.size.height * shrink;
        Rectangle {
            x: (bounds.width - width) / 2.0,
            y: (bounds.height - height) / 2.0,
            width,
            height,
        }
    }

    /// Container after transition and pulse are applied
    fn animated_container(&self, bounds: Size) -> Rectangle {
        let base = self.container(bounds);
        let scale = self.appearance.scale * self.pulse;
        let width = base.width * scale * self.appearance.scale_x;
        let height = base.height * scale;
        let center = base.center();

        Rectangle {
            x: center.x - width / 2.0 + self.appearance.offset_x * bounds.width,
            y: center.y - height / 2.0,
            width,
            height,
        }
    }

    /// Where the image currently is on screen (window coordinates)
    fn displayed_image(&self, bounds: Rectangle) -> Rectangle {
        let local = self.zoom.transform(self.container(bounds.size()));
        Rectangle {
            x: local.x + bounds.x,
            y: local.y + bounds.y,
            ..local
        }
    }
}

impl Program<Message> for Stage<'_> {
    type State = StageState;

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        let Some(handle) = &self.image else {
            return vec![frame.into_geometry()];
        };
        if self.appearance.opacity <= 0.0 {
            return vec![frame.into_geometry()];
        }

        let container = self.animated_container(bounds.size());
        let drawn = self.zoom.transform(container);
        let image = canvas::Image::new(handle.clone()).opacity(self.appearance.opacity);

        if self.zoom.breaks_out() {
            frame.draw_image(drawn, image);
        } else {
            // Clipped frames are positioned at the clip region's origin
            frame.with_clip(container, |clipped| {
                let local = Rectangle {
                    x: drawn.x - container.x,
                    y: drawn.y - container.y,
                    ..drawn
                };
                clipped.draw_image(local, image);
            });
        }

        vec![frame.into_geometry()]
    }

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        let threshold = self.swipe_threshold;

        match event {
            // Mouse wheel for zooming
            canvas::Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
                let Some(at) = cursor.position_over(bounds) else {
                    return (canvas::event::Status::Ignored, None);
                };
                let zoom_delta = match delta {
                    mouse::ScrollDelta::Lines { y, .. } => y * 0.1,
                    mouse::ScrollDelta::Pixels { y, .. } => y * 0.01,
                };
                let event = StageEvent::Zoom {
                    delta: zoom_delta,
                    at,
                    image: self.displayed_image(bounds),
                };
                return (canvas::event::Status::Captured, Some(Message::Stage(event)));
            }

            // Left press: either a pan (zoomed) or the start of a swipe
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if let Some(pos) = cursor.position_over(bounds) {
                    state.is_dragging = true;
                    state.last_position = Some(pos);
                    state.gestures.mouse_pressed(pos);
                    return (canvas::event::Status::Captured, None);
                }
            }

            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                if !state.is_dragging {
                    return (canvas::event::Status::Ignored, None);
                }
                state.is_dragging = false;
                state.last_position = None;

                let swipe = cursor
                    .position()
                    .and_then(|pos| state.gestures.mouse_released(pos, threshold));
                state.gestures.cancel_mouse();

                let message = swipe
                    .filter(|_| !self.zoom.is_zoomed())
                    .map(|swipe| Message::Stage(StageEvent::Swipe(swipe)));
                return (canvas::event::Status::Captured, message);
            }

            // Mouse move - pan if dragging a zoomed image
            canvas::Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                if state.is_dragging && self.zoom.is_zoomed() {
                    if let (Some(current_pos), Some(last_pos)) =
                        (cursor.position(), state.last_position)
                    {
                        let delta = cgmath::Vector2::new(
                            current_pos.x - last_pos.x,
                            current_pos.y - last_pos.y,
                        );
                        state.last_position = Some(current_pos);
                        state.gestures.cancel_mouse();
                        return (
                            canvas::event::Status::Captured,
                            Some(Message::Stage(StageEvent::Pan(delta))),
                        );
                    }
                }
            }

            canvas::Event::Touch(finger) => {
                let gesture = match finger {
                    touch::Event::FingerPressed { id, position } => {
                        state.gestures.finger_pressed(id.0, position)
                    }
                    touch::Event::FingerMoved { id, position } => {
                        state.gestures.finger_moved(id.0, position)
                    }
                    touch::Event::FingerLifted { id, position } => {
                        state.gestures.finger_lifted(id.0, position, threshold)
                    }
                    touch::Event::FingerLost { id, .. } => state.gestures.finger_lost(id.0),
                };

                let event = gesture.map(|gesture| match gesture {
                    Gesture::Swipe(swipe) => StageEvent::Swipe(swipe),
                    Gesture::PinchStart { a, b } => StageEvent::PinchStart {
                        a,
                        b,
                        image: self.displayed_image(bounds),
                    },
                    Gesture::PinchMove { distance } => StageEvent::PinchMove(distance),
                    Gesture::PinchEnd => StageEvent::PinchEnd,
                });

                return (canvas::event::Status::Captured, event.map(Message::Stage));
            }

            _ => {}
        }

        (canvas::event::Status::Ignored, None)
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> mouse::Interaction {
        if !self.zoom.is_zoomed() || !cursor.is_over(bounds) {
            return mouse::Interaction::default();
        }
        if state.is_dragging {
            mouse::Interaction::Grabbing
        } else {
            mouse::Interaction::Grab
        }
    }
}

/// Pointer state kept by the canvas between events
#[derive(Debug, Clone, Default)]
pub struct StageState {
    pub is_dragging: bool,
    pub last_position: Option<Point>,
    pub gestures: GestureTracker,
}

/// Breathing scale of the idle image: 1 at rest, `1 + amplitude` mid-period
pub fn pulse_scale(elapsed: Duration, period: Duration, amplitude: f32) -> f32 {
    if period.is_zero() {
        return 1.0;
    }
    let phase = elapsed.as_secs_f32() % period.as_secs_f32() / period.as_secs_f32();
    1.0 + amplitude * (1.0 - (phase * TAU).cos()) / 2.0
}
