/// Stage sizing
///
/// The stage (the box around the focal image) is sized to exactly what the
/// image occupies when contain-fitted into a fraction of the window.

use iced::Size;

/// Size an image of `natural` size renders at when contain-fitted into
/// `viewport` scaled by the two fractions.
pub fn fit_contain(
    natural: Size,
    viewport: Size,
    max_width_fraction: f32,
    max_height_fraction: f32,
) -> Size {
    let max_width = viewport.width * max_width_fraction;
    let max_height = viewport.height * max_height_fraction;

    if natural.width <= 0.0 || natural.height <= 0.0 || max_height <= 0.0 {
        return Size::new(max_width.max(0.0), max_height.max(0.0));
    }

    let image_ratio = natural.width / natural.height;
    let max_ratio = max_width / max_height;

    if image_ratio > max_ratio {
        // Wider than the box: width bound
        Size::new(max_width, max_width / image_ratio)
    } else {
        Size::new(max_height * image_ratio, max_height)
    }
}
