//! 8-neighbor offsets and direction masks
//!
//! Transition art is authored per shape: a bitmask of the neighbors that hold
//! a foreign terrain. Masks use screen coordinates (+Y is down).

/// Neighbor direction flags
pub const N: u8 = 0b0000_0001;
pub const NE: u8 = 0b0000_0010;
pub const E: u8 = 0b0000_0100;
pub const SE: u8 = 0b0000_1000;
pub const S: u8 = 0b0001_0000;
pub const SW: u8 = 0b0010_0000;
pub const W: u8 = 0b0100_0000;
pub const NW: u8 = 0b1000_0000;

/// Offsets of the 8 neighbors, clockwise from north, paired with their flag
pub const OFFSETS: [(i32, i32, u8); 8] = [
    (0, -1, N),
    (1, -1, NE),
    (1, 0, E),
    (1, 1, SE),
    (0, 1, S),
    (-1, 1, SW),
    (-1, 0, W),
    (-1, -1, NW),
];

/// Drop corner flags that are already covered by an adjacent edge.
///
/// A foreign corner only changes the shape when both edges around it are
/// not foreign; otherwise the edge transition already depicts it.
pub fn optimize_foreign_mask(mask: u8) -> u8 {
    let mut result = mask;

    if mask & (N | W) != 0 {
        result &= !NW;
    }
    if mask & (N | E) != 0 {
        result &= !NE;
    }
    if mask & (S | E) != 0 {
        result &= !SE;
    }
    if mask & (S | W) != 0 {
        result &= !SW;
    }

    result
}

/// Calculate the foreign-neighbor bitmask for a tile
pub fn calculate_foreign_mask<F>(x: i32, y: i32, is_foreign: F) -> u8
where
    F: Fn(i32, i32) -> bool,
{
    OFFSETS
        .iter()
        .filter(|(dx, dy, _)| is_foreign(x + dx, y + dy))
        .fold(0u8, |mask, (_, _, flag)| mask | flag)
}
