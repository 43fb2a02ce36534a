use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Flat,
}

/// Month-over-month movement of one value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Trend {
    pub direction: Direction,
    /// `|current - previous|`
    pub magnitude: f64,
}

/// Compare `current` against `previous`.
pub fn compare(current: f64, previous: f64) -> Trend {
    let direction = match current.partial_cmp(&previous) {
        Some(Ordering::Greater) => Direction::Up,
        Some(Ordering::Less) => Direction::Down,
        Some(Ordering::Equal) | None => Direction::Flat,
    };
    Trend {
        direction,
        magnitude: (current - previous).abs(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn up_down_flat() {
        assert_eq!(
            compare(10.0, 8.0),
            Trend {
                direction: Direction::Up,
                magnitude: 2.0
            }
        );
        assert_eq!(
            compare(8.0, 10.0),
            Trend {
                direction: Direction::Down,
                magnitude: 2.0
            }
        );
        assert_eq!(
            compare(5.0, 5.0),
            Trend {
                direction: Direction::Flat,
                magnitude: 0.0
            }
        );
    }

    #[test]
    fn magnitude_is_never_negative() {
        for (c, p) in [(-3.0, 4.0), (4.0, -3.0), (-1.5, -1.5), (0.0, -0.0)] {
            assert!(compare(c, p).magnitude >= 0.0);
        }
        assert_eq!(compare(0.0, -0.0).direction, Direction::Flat);
    }
}
