//! Sprite-sheet frame animation state and its deterministic advance rule.
//!
//! Every animated entity is a horizontal strip (or grid) of equally sized
//! frames inside one texture. Animation is just moving the source rectangle's
//! `x` across the strip on a fixed per-entity time budget; position and
//! animation are independent, so the same state drives both the player and
//! the obstacles with different parameters.
//!
//! Timing uses float seconds fed from the frame clock. When the accumulator
//! reaches the frame budget it is reset to exactly zero (the remainder is
//! dropped, matching the presented cadence rather than an idealized one), the
//! source rectangle is repositioned using the *current* frame index, and only
//! then is the index incremented and wrapped. The visible rectangle therefore
//! lags the counter by one frame; swapping those two writes shifts every
//! sprite by one frame and must not be done.

use glam::Vec2;

/// Sub-rectangle of a sprite-sheet texture, in texel coordinates.
/// `x` selects the current frame; `y`, `width` and `height` are fixed at
/// construction from the sheet layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Layout of one sprite sheet: per-frame size, last frame index, and the
/// time budget each frame is shown for.
#[derive(Debug, Clone, Copy)]
pub struct SpriteSheet {
    pub frame_width: f32,
    pub frame_height: f32,
    pub max_frame: u32,
    pub frame_duration: f32,
}

impl SpriteSheet {
    /// Derive a sheet layout from texture dimensions and a frame grid.
    ///
    /// Preconditions: `columns`, `rows` and both texture dimensions are
    /// non-zero. Textures are validated at load time, so this divides
    /// unchecked.
    pub fn from_grid(
        texture_width: u32,
        texture_height: u32,
        columns: u32,
        rows: u32,
        frame_duration: f32,
    ) -> Self {
        Self {
            frame_width: (texture_width / columns) as f32,
            frame_height: (texture_height / rows) as f32,
            max_frame: columns - 1,
            frame_duration,
        }
    }
}

/// Runtime state for one animated sprite: where it is in the world, which
/// sub-rectangle of its sheet is showing, and how far into the current frame
/// budget it is.
#[derive(Debug, Clone, Copy)]
pub struct AnimationState {
    pub source_rect: SourceRect,
    pub position: Vec2,
    pub frame_index: u32,
    pub frame_duration: f32,
    pub frame_elapsed: f32,
}

impl AnimationState {
    pub fn new(sheet: &SpriteSheet, position: Vec2) -> Self {
        Self {
            source_rect: SourceRect {
                x: 0.0,
                y: 0.0,
                width: sheet.frame_width,
                height: sheet.frame_height,
            },
            position,
            frame_index: 0,
            frame_duration: sheet.frame_duration,
            frame_elapsed: 0.0,
        }
    }

    /// Advance the animation by `dt` seconds, wrapping past `max_frame`.
    ///
    /// Order inside the budget check is load-bearing: the rectangle is
    /// repositioned from the pre-increment index, then the index advances.
    pub fn advance(&mut self, dt: f32, max_frame: u32) {
        self.frame_elapsed += dt;
        if self.frame_elapsed >= self.frame_duration {
            self.frame_elapsed = 0.0;
            self.source_rect.x = self.frame_index as f32 * self.source_rect.width;
            self.frame_index += 1;
            if self.frame_index > max_frame {
                self.frame_index = 0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet() -> SpriteSheet {
        SpriteSheet {
            frame_width: 32.0,
            frame_height: 48.0,
            max_frame: 5,
            frame_duration: 1.0 / 12.0,
        }
    }

    #[test]
    fn from_grid_divides_texture_into_frames() {
        let s = SpriteSheet::from_grid(192, 48, 6, 1, 1.0 / 12.0);
        assert_eq!(s.frame_width, 32.0);
        assert_eq!(s.frame_height, 48.0);
        assert_eq!(s.max_frame, 5);
    }

    #[test]
    fn new_state_starts_on_frame_zero() {
        let state = AnimationState::new(&sheet(), Vec2::new(10.0, 20.0));
        assert_eq!(state.frame_index, 0);
        assert_eq!(state.frame_elapsed, 0.0);
        assert_eq!(state.source_rect.x, 0.0);
        assert_eq!(state.source_rect.width, 32.0);
        assert_eq!(state.position, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn advance_below_budget_only_accumulates() {
        let mut state = AnimationState::new(&sheet(), Vec2::ZERO);
        state.advance(0.05, 5);
        assert_eq!(state.frame_index, 0);
        assert_eq!(state.source_rect.x, 0.0);
        assert!((state.frame_elapsed - 0.05).abs() < 1e-6);
    }

    #[test]
    fn advance_at_budget_resets_accumulator_to_zero() {
        let mut state = AnimationState::new(&sheet(), Vec2::ZERO);
        // Two partial ticks crossing the budget: the remainder is dropped.
        state.advance(0.05, 5);
        state.advance(0.05, 5);
        assert_eq!(state.frame_index, 1);
        assert_eq!(state.frame_elapsed, 0.0);
    }

    #[test]
    fn rect_lags_frame_index_by_one() {
        let mut state = AnimationState::new(&sheet(), Vec2::ZERO);
        let dt = 1.0 / 12.0;

        // First advance: rect still shows frame 0, counter moves to 1.
        state.advance(dt, 5);
        assert_eq!(state.frame_index, 1);
        assert_eq!(state.source_rect.x, 0.0);

        // Second advance: rect now shows frame 1, counter moves to 2.
        state.advance(dt, 5);
        assert_eq!(state.frame_index, 2);
        assert_eq!(state.source_rect.x, 32.0);
    }

    #[test]
    fn frame_index_wraps_past_max_frame() {
        let mut state = AnimationState::new(&sheet(), Vec2::ZERO);
        let dt = 1.0 / 12.0;
        for _ in 0..6 {
            state.advance(dt, 5);
        }
        // Sixth advance pushed the counter past max_frame 5 and wrapped it;
        // the rect shows the last frame it was set from.
        assert_eq!(state.frame_index, 0);
        assert_eq!(state.source_rect.x, 5.0 * 32.0);

        state.advance(dt, 5);
        assert_eq!(state.frame_index, 1);
        assert_eq!(state.source_rect.x, 0.0);
    }

    #[test]
    fn zero_dt_changes_nothing() {
        let mut state = AnimationState::new(&sheet(), Vec2::new(3.0, 4.0));
        state.advance(0.0, 5);
        assert_eq!(state.frame_index, 0);
        assert_eq!(state.frame_elapsed, 0.0);
        assert_eq!(state.source_rect.x, 0.0);
        assert_eq!(state.position, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn identical_sequences_are_deterministic() {
        let dts = [0.016, 0.02, 0.041, 0.009, 0.033, 0.07];
        let mut a = AnimationState::new(&sheet(), Vec2::ZERO);
        let mut b = AnimationState::new(&sheet(), Vec2::ZERO);
        for _ in 0..50 {
            for &dt in &dts {
                a.advance(dt, 5);
                b.advance(dt, 5);
            }
        }
        assert_eq!(a.frame_index, b.frame_index);
        assert_eq!(a.frame_elapsed, b.frame_elapsed);
        assert_eq!(a.source_rect, b.source_rect);
    }
}
