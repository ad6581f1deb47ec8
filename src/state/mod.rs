/// State management module
/// 
/// This module holds everything the carousel knows, independent of drawing:
/// - Image points loaded from the manifest (point.rs)
/// - Main index, transitions and render bookkeeping (carousel.rs)
/// - The independently rotating next strip (next_strip.rs)
/// - Touch and mouse gesture recognition (gesture.rs)
/// - Pinch / wheel zoom and panning (zoom.rs)
/// - The rating digit spinner (rating.rs)
/// - Stage sizing (layout.rs) and transition curves (transition.rs)

pub mod carousel;
pub mod gesture;
pub mod layout;
pub mod next_strip;
pub mod point;
pub mod rating;
pub mod transition;
pub mod zoom;
