//! # Game Mathematics
//!
//! Line drawing and weighted random selection.

use crate::Position;
use rand::Rng;

/// Cells on the Bresenham line from `from` to `to`, both ends included.
///
/// # Examples
///
/// ```
/// use delver::{line, Position};
///
/// let cells = line(Position::new(0, 0), Position::new(3, 1));
/// assert_eq!(cells.first(), Some(&Position::new(0, 0)));
/// assert_eq!(cells.last(), Some(&Position::new(3, 1)));
/// assert_eq!(cells.len(), 4);
/// ```
pub fn line(from: Position, to: Position) -> Vec<Position> {
    let dx = (to.x - from.x).abs();
    let dy = -(to.y - from.y).abs();
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };

    let mut cells = Vec::with_capacity((dx.max(-dy) + 1) as usize);
    let mut err = dx + dy;
    let mut current = from;

    loop {
        cells.push(current);
        if current == to {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            current.x += sx;
        }
        if e2 <= dx {
            err += dx;
            current.y += sy;
        }
    }

    cells
}

/// Picks an index with probability proportional to its weight.
///
/// Returns `None` when every weight is zero.
pub fn random_choice_index<R: Rng + ?Sized>(weights: &[u32], rng: &mut R) -> Option<usize> {
    let total: u32 = weights.iter().sum();
    if total == 0 {
        return None;
    }

    let roll = rng.gen_range(1..=total);
    let mut running = 0;
    for (index, weight) in weights.iter().enumerate() {
        running += weight;
        if roll <= running {
            return Some(index);
        }
    }
    None
}
