//! Content-addressed maze identity: two mazes with the same entrance,
//! dimension and wall set hash identically regardless of the order
//! their walls were submitted in.

use sha2::{Digest, Sha256};

use crate::coord::{Coordinate, Dimension};

/// Hex-encoded SHA-256 of `entrance_label || dimension_label ||
/// sorted(wall_labels)`. Wall labels are sorted before hashing so
/// submission order never affects the fingerprint.
pub fn maze_fingerprint(entrance: Coordinate, dimension: Dimension, walls: &[Coordinate]) -> String {
    let mut labels: Vec<String> = walls.iter().map(Coordinate::label).collect();
    labels.sort();

    let mut hasher = Sha256::new();
    hasher.update(entrance.label().as_bytes());
    hasher.update(dimension.label().as_bytes());
    for label in labels {
        hasher.update(label.as_bytes());
    }

    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wall_order_does_not_affect_fingerprint() {
        let entrance = Coordinate::new(0, 0);
        let dimension = Dimension::new(3, 3);
        let a = [Coordinate::new(1, 0), Coordinate::new(2, 1)];
        let b = [Coordinate::new(2, 1), Coordinate::new(1, 0)];

        assert_eq!(
            maze_fingerprint(entrance, dimension, &a),
            maze_fingerprint(entrance, dimension, &b)
        );
    }

    #[test]
    fn different_geometry_changes_fingerprint() {
        let entrance = Coordinate::new(0, 0);
        let dimension = Dimension::new(3, 3);
        let fp_a = maze_fingerprint(entrance, dimension, &[]);
        let fp_b = maze_fingerprint(entrance, Dimension::new(4, 3), &[]);
        assert_ne!(fp_a, fp_b);
    }

    #[test]
    fn fingerprint_is_64_hex_chars() {
        let fp = maze_fingerprint(Coordinate::new(0, 0), Dimension::new(3, 3), &[]);
        assert_eq!(fp.len(), 64);
        assert!(fp.bytes().all(|b| b.is_ascii_hexdigit()));
    }
}
