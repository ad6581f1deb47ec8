/// Rating digit spinner
/// Draws the digit column shifted by the current spin offset; only the
/// cell inside the one-digit window is visible.
use iced::alignment::{Horizontal, Vertical};
use iced::widget::canvas::{self, Path, Text};
use iced::{Color, Pixels, Point, Rectangle};

use crate::state::rating::SpinnerSpec;
use crate::Message;

#[derive(Debug, Clone)]
pub struct RatingSpinner {
    pub spec: SpinnerSpec,
    /// Column translation (negative = moved up)
    pub offset: f32,
}

impl canvas::Program<Message> for RatingSpinner {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &iced::Renderer,
        _theme: &iced::Theme,
        bounds: Rectangle,
        _cursor: iced::mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        let cell = self.spec.digit_height;

        frame.fill(
            &Path::rectangle(Point::ORIGIN, bounds.size()),
            Color::from_rgba(0.0, 0.0, 0.0, 0.6),
        );

        frame.with_clip(Rectangle::with_size(bounds.size()), |window| {
            for index in 0..self.spec.digit_count() {
                let top = index as f32 * cell + self.offset;

                // Skip cells fully outside the window
                if top + cell < 0.0 || top > bounds.height {
                    continue;
                }

                window.fill_text(Text {
                    content: SpinnerSpec::digit_label(index),
                    position: Point::new(bounds.width / 2.0, top + cell / 2.0),
                    color: Color::WHITE,
                    size: Pixels(cell * 0.7),
                    horizontal_alignment: Horizontal::Center,
                    vertical_alignment: Vertical::Center,
                    ..Text::default()
                });
            }
        });

        vec![frame.into_geometry()]
    }
}
