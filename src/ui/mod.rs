/// Drawing and input
///
/// - `stage.rs` - focal image canvas with zoom, transitions and gestures
/// - `spinner.rs` - rating digit column
/// - `next_strip.rs` - the two preview cards

pub mod next_strip;
pub mod spinner;
pub mod stage;
