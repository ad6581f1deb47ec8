/// Slide transitions between points
///
/// Navigation hides the stage, swaps the content, then plays an entrance.
/// This module only describes how the stage looks at a given moment; the
/// timing lives in `carousel.rs`.

use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    /// Gentle fade in
    Fade,
    /// Enters from the side the user navigated towards
    #[default]
    Slide,
    /// Scales up while fading in
    Vanish,
    /// Turns around the vertical axis
    Flip,
    /// Overshooting scale
    Bounce,
}

/// Which way the user navigated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// To the next point: new content comes in from the right
    Forward,
    /// To the previous point: new content comes in from the left
    Backward,
}

impl Direction {
    fn sign(self) -> f32 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
        }
    }
}

/// How the stage should be drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Appearance {
    pub opacity: f32,
    /// Horizontal shift as a fraction of the stage width
    pub offset_x: f32,
    /// Uniform scale around the stage centre
    pub scale: f32,
    /// Extra horizontal squash, used by `Flip`
    pub scale_x: f32,
}

impl Appearance {
    pub const IDENTITY: Appearance = Appearance {
        opacity: 1.0,
        offset_x: 0.0,
        scale: 1.0,
        scale_x: 1.0,
    };

    pub const HIDDEN: Appearance = Appearance {
        opacity: 0.0,
        ..Appearance::IDENTITY
    };
}

/// Appearance `progress` of the way through an entrance (0 = start, 1 = done)
pub fn entering(kind: TransitionKind, progress: f32, direction: Direction) -> Appearance {
    let t = progress.clamp(0.0, 1.0);
    let eased = ease_out_cubic(t);

    match kind {
        TransitionKind::Fade => Appearance {
            opacity: eased,
            ..Appearance::IDENTITY
        },
        TransitionKind::Slide => Appearance {
            offset_x: (1.0 - eased) * direction.sign(),
            ..Appearance::IDENTITY
        },
        TransitionKind::Vanish => Appearance {
            opacity: eased,
            scale: 0.5 + 0.5 * eased,
            ..Appearance::IDENTITY
        },
        TransitionKind::Flip => Appearance {
            // Projected width of a card turning from 90 degrees to 0
            scale_x: (eased * FRAC_PI_2).sin(),
            ..Appearance::IDENTITY
        },
        TransitionKind::Bounce => Appearance {
            opacity: (t * 3.0).min(1.0),
            scale: ease_out_back(t),
            ..Appearance::IDENTITY
        },
    }
}

fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

fn ease_out_back(t: f32) -> f32 {
    const C1: f32 = 1.70158;
    const C3: f32 = C1 + 1.0;
    1.0 + C3 * (t - 1.0).powi(3) + C1 * (t - 1.0).powi(2)
}
