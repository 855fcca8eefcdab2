//! Parallax background scrolling. Three layers pan left at different speeds
//! to fake depth; each layer is drawn twice end-to-end and its offset wraps
//! back to zero once a full tile span (texture width at draw scale) has
//! scrolled past. Purely cosmetic -- nothing in the simulation reads these
//! offsets.

/// One scrolling layer: a signed offset walking left, wrapping at `-span`.
#[derive(Debug, Clone, Copy)]
pub struct ScrollLayer {
    offset: f32,
    speed: f32,
    span: f32,
}

impl ScrollLayer {
    /// `span` is the on-screen width of one tile (texture width × draw scale).
    pub fn new(span: f32, speed: f32) -> Self {
        Self {
            offset: 0.0,
            speed,
            span,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.offset -= self.speed * dt;
        if self.offset <= -self.span {
            // Reposition to keep scrolling seamlessly.
            self.offset = 0.0;
        }
    }

    /// The two x positions to draw the tile at this frame; the second copy
    /// slides in from the right as the first scrolls out.
    pub fn tile_positions(&self) -> [f32; 2] {
        [self.offset, self.offset + self.span]
    }
}
