/// Display context - output surface dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayContext {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl DisplayContext {
    /// Create new display context
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height, as used for the camera projection
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// True when either dimension is zero (e.g. a minimised window)
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
