//! RNG module - deterministic color draws for new pieces
//!
//! Each falling piece gets three independently drawn colors from the first
//! `colors` entries of the palette. A seeded LCG keeps games reproducible for
//! tests and the headless simulator.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::{Color, PIECE_LEN};

/// 32-bit linear congruential generator for piece colors
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Seeded generator; seed 0 is treated as 1
    pub fn new(seed: u32) -> Self {
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Seed from the wall clock (non-reproducible games)
    pub fn from_clock() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos() ^ (d.as_secs() as u32))
            .unwrap_or(1);
        Self::new(nanos)
    }

    pub fn next_u32(&mut self) -> u32 {
        // state = 1664525 * state + 1013904223 (mod 2^32)
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Value in `0..max` (`max` of 0 is treated as 1)
    ///
    /// Uses the high half of the state; the low bits of a power-of-two LCG
    /// have very short periods.
    pub fn next_range(&mut self, max: u32) -> u32 {
        (self.next_u32() >> 16) % max.max(1)
    }

    /// Draw one of the first `colors` palette entries
    pub fn next_color(&mut self, colors: u8) -> Color {
        let idx = self.next_range(colors as u32) as usize;
        Color::from_index(idx).unwrap_or(Color::Red)
    }

    /// Draw colors for a whole piece, bottom to top
    pub fn next_piece_colors(&mut self, colors: u8) -> [Color; PIECE_LEN] {
        let bottom = self.next_color(colors);
        let middle = self.next_color(colors);
        let top = self.next_color(colors);
        [bottom, middle, top]
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_pieces() {
        let mut a = SimpleRng::new(12345);
        let mut b = SimpleRng::new(12345);
        for _ in 0..50 {
            assert_eq!(a.next_piece_colors(5), b.next_piece_colors(5));
        }
    }

    #[test]
    fn test_zero_seed_is_remapped() {
        let mut zero = SimpleRng::new(0);
        let mut one = SimpleRng::new(1);
        assert_eq!(zero.next_u32(), one.next_u32());
    }

    #[test]
    fn test_colors_stay_within_palette_size() {
        let mut rng = SimpleRng::new(7);
        for colors in 2..=10u8 {
            for _ in 0..200 {
                assert!(rng.next_color(colors).index() < colors as usize);
            }
        }
    }

    #[test]
    fn test_two_color_draws_are_not_alternating() {
        // A plain `% 2` on an LCG alternates 0,1,0,1; draws must not.
        let mut rng = SimpleRng::new(99);
        let draws: Vec<Color> = (0..32).map(|_| rng.next_color(2)).collect();
        let alternating = draws.windows(2).all(|w| w[0] != w[1]);
        assert!(!alternating);
        assert!(draws.contains(&Color::Red));
        assert!(draws.contains(&Color::Green));
    }
}
