/// Manifest loading
///
/// This module handles:
/// - Parsing the JSON manifest into entries (loader.rs)
/// - Resolving each image name to a file that actually decodes (probe.rs)
/// - Turning entries into `ImagePoint`s for the carousel

pub mod loader;
pub mod probe;

pub use loader::load_points;
