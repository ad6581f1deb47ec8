/// The next strip: two preview cards rotating on their own timer
///
/// With the main image at index x-1 the strip first shows x and x+1.
/// After that first render it is decoupled from the main index and only
/// moves when the rotation timer fires.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NextStrip {
    /// Index shown on the first card; None until the first render
    start: Option<usize>,
}

impl NextStrip {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self) -> Option<usize> {
        self.start
    }

    /// Seed the strip from the main index. Only the first call has an effect.
    pub fn initialize(&mut self, current: usize, len: usize) -> bool {
        if self.start.is_some() || len == 0 {
            return false;
        }
        self.start = Some((current + 1) % len);
        true
    }

    /// One rotation step. Returns the new card indices when the strip moved.
    pub fn advance(&mut self, len: usize) -> Option<[usize; 2]> {
        if len <= 2 {
            return None;
        }
        let start = self.start.as_mut()?;
        *start = (*start + 1) % len;
        self.cards(len)
    }

    /// Indices shown on the two cards, with wraparound
    pub fn cards(&self, len: usize) -> Option<[usize; 2]> {
        if len <= 2 {
            return None;
        }
        let start = self.start?;
        Some([start % len, (start + 1) % len])
    }

    pub fn is_visible(&self, len: usize) -> bool {
        self.cards(len).is_some()
    }

    /// Forget the position, e.g. after a new manifest was loaded
    pub fn reset(&mut self) {
        self.start = None;
    }
}
