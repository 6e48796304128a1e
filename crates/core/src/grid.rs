use crate::{timed, AxialPoint, AxialPointMap};
use derive_more::Display;
use fnv::FnvBuildHasher;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::cmp;

/// The mutable state of one hex cell. Tiles are created by seeding and never
/// destroyed during a session; they only get toggled (or cleared by a reset).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Has the player claimed this tile?
    pub owned: bool,
}

/// A closed box of axial coordinates, inclusive on all four bounds. This is
/// how the renderer asks the grid for tiles near the viewport. A box in axial
/// space is a parallelogram on screen, so it's always a superset of what's
/// actually visible (as long as it was computed from all the screen corners).
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
#[display(fmt = "q∈[{}, {}] r∈[{}, {}]", min_q, max_q, min_r, max_r)]
pub struct AxialRange {
    pub min_q: i32,
    pub max_q: i32,
    pub min_r: i32,
    pub max_r: i32,
}

impl AxialRange {
    pub const fn new(min_q: i32, max_q: i32, min_r: i32, max_r: i32) -> Self {
        Self {
            min_q,
            max_q,
            min_r,
            max_r,
        }
    }

    /// Build the smallest box containing all the given points. Returns `None`
    /// if there are no points.
    pub fn bounding(
        points: impl IntoIterator<Item = AxialPoint>,
    ) -> Option<Self> {
        points.into_iter().fold(None, |range, point| {
            Some(match range {
                None => Self::new(point.q(), point.q(), point.r(), point.r()),
                Some(range) => Self::new(
                    cmp::min(range.min_q, point.q()),
                    cmp::max(range.max_q, point.q()),
                    cmp::min(range.min_r, point.r()),
                    cmp::max(range.max_r, point.r()),
                ),
            })
        })
    }

    /// Grow the box by `pad` tiles in every direction
    pub fn padded(self, pad: i32) -> Self {
        Self::new(
            self.min_q.saturating_sub(pad),
            self.max_q.saturating_add(pad),
            self.min_r.saturating_sub(pad),
            self.max_r.saturating_add(pad),
        )
    }

    pub fn contains(&self, point: AxialPoint) -> bool {
        self.min_q <= point.q()
            && point.q() <= self.max_q
            && self.min_r <= point.r()
            && point.r() <= self.max_r
    }

    /// Number of coordinates in the box. 0 if the box is inverted. A box
    /// spanning the entire `i32` plane doesn't fit in a `u64`, so the area
    /// saturates at `u64::MAX`.
    pub fn area(&self) -> u64 {
        let width = i64::from(self.max_q) - i64::from(self.min_q) + 1;
        let height = i64::from(self.max_r) - i64::from(self.min_r) + 1;
        if width <= 0 || height <= 0 {
            0
        } else {
            (width as u64).checked_mul(height as u64).unwrap_or(u64::MAX)
        }
    }
}

/// The sparse set of tiles that make up a board, keyed by position. The grid
/// is logically infinite, but only seeded positions hold a [Tile]; lookups
/// anywhere else just come back empty.
///
/// ## Serialization
/// The grid serializes as `{"hex_radius": 25.0, "tiles": {"q,r": {"owned":
/// false}, ...}}`. Use [Grid::ownership] for the flat `{"q,r": bool}`
/// snapshot that persistence layers care about.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Grid {
    /// World-space size of a hexagon (center to vertex). Fixed at creation.
    hex_radius: f64,
    /// Each tile, keyed by its position
    tiles: AxialPointMap<Tile>,
}

impl Grid {
    /// Create a new empty grid. `hex_radius` must be greater than zero; that's
    /// checked by [BoardConfig](crate::BoardConfig) validation, not here.
    pub fn new(hex_radius: f64) -> Self {
        Self {
            hex_radius,
            tiles: AxialPointMap::default(),
        }
    }

    pub fn hex_radius(&self) -> f64 {
        self.hex_radius
    }

    /// Populate every position within `ring_radius` steps of the origin with
    /// an unowned tile. This walks `q, r ∈ [-ring_radius, ring_radius]` and
    /// keeps the points with `|q + r| <= ring_radius`, which is exactly a
    /// hexagon of `3r²+3r+1` tiles.
    ///
    /// Does nothing if the grid already has tiles, so it's safe to call on
    /// every startup. Returns whether any tiles were created.
    pub fn seed(&mut self, ring_radius: u16) -> bool {
        if !self.tiles.is_empty() {
            debug!("Grid already has {} tiles, skipping seed", self.len());
            return false;
        }

        let r = i32::from(ring_radius);
        let capacity = crate::hex_count(ring_radius);
        self.tiles = timed!("Grid seeding", {
            let mut tiles = AxialPointMap::with_capacity_and_hasher(
                capacity,
                FnvBuildHasher::default(),
            );
            for r_coord in -r..=r {
                for q in -r..=r {
                    if (q + r_coord).abs() <= r {
                        tiles.insert(AxialPoint::new(q, r_coord), Tile::default());
                    }
                }
            }
            tiles
        });
        debug_assert_eq!(self.tiles.len(), capacity, "expected 3r²+3r+1 tiles");

        info!("Seeded grid with {} tiles", self.tiles.len());
        true
    }

    pub fn get(&self, point: AxialPoint) -> Option<&Tile> {
        self.tiles.get(&point)
    }

    pub fn contains(&self, point: AxialPoint) -> bool {
        self.tiles.contains_key(&point)
    }

    /// Flip a tile's owned flag. Returns the new state, or `None` if there's
    /// no tile at that position. Tapping outside the seeded area is normal, so
    /// a missing tile isn't an error.
    pub fn toggle_owned(&mut self, point: AxialPoint) -> Option<bool> {
        let tile = self.tiles.get_mut(&point)?;
        tile.owned = !tile.owned;
        Some(tile.owned)
    }

    /// Set a tile's owned flag. Like [Self::toggle_owned], missing tiles are
    /// ignored. Returns whether the tile exists.
    pub fn set_owned(&mut self, point: AxialPoint, owned: bool) -> bool {
        match self.tiles.get_mut(&point) {
            Some(tile) => {
                tile.owned = owned;
                true
            }
            None => false,
        }
    }

    /// Mark every tile as unowned. The set of tiles doesn't change.
    pub fn reset_all(&mut self) {
        for tile in self.tiles.values_mut() {
            tile.owned = false;
        }
        info!("Reset all {} tiles", self.tiles.len());
    }

    /// Visit every tile whose position falls in the given box. Visit order is
    /// unspecified.
    pub fn for_each_in_range(
        &self,
        range: AxialRange,
        mut visit: impl FnMut(AxialPoint, &Tile),
    ) {
        // Pick whichever side is smaller: walking the box and doing lookups,
        // or scanning every tile and filtering
        if range.area() < self.tiles.len() as u64 {
            for r in range.min_r..=range.max_r {
                for q in range.min_q..=range.max_q {
                    let point = AxialPoint::new(q, r);
                    if let Some(tile) = self.tiles.get(&point) {
                        visit(point, tile);
                    }
                }
            }
        } else {
            for (point, tile) in &self.tiles {
                if range.contains(*point) {
                    visit(*point, tile);
                }
            }
        }
    }

    /// Iterate over every tile, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (AxialPoint, &Tile)> {
        self.tiles.iter().map(|(point, tile)| (*point, tile))
    }

    /// Get the number of tiles in the grid
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Number of tiles currently owned
    pub fn owned_count(&self) -> usize {
        self.tiles.values().filter(|tile| tile.owned).count()
    }

    /// Snapshot every tile's owned flag, keyed by position. This is the format
    /// persistence collaborators store.
    pub fn ownership(&self) -> AxialPointMap<bool> {
        self.iter().map(|(point, tile)| (point, tile.owned)).collect()
    }

    /// Apply an ownership snapshot from [Self::ownership]. Only tiles that
    /// already exist are updated; unknown positions are skipped, never
    /// inserted. Returns how many tiles were updated.
    pub fn load_ownership(
        &mut self,
        ownership: impl IntoIterator<Item = (AxialPoint, bool)>,
    ) -> usize {
        let mut updated = 0;
        for (point, owned) in ownership {
            if self.set_owned(point, owned) {
                updated += 1;
            } else {
                debug!("Ignoring ownership for unknown tile {}", point);
            }
        }
        updated
    }

    /// Serialize the ownership snapshot into JSON, as `{"q,r": bool}`. This is
    /// a recoverable format, which can be loaded back in with
    /// [Grid::load_ownership_json].
    #[cfg(feature = "json")]
    pub fn ownership_to_json(&self) -> String {
        // Panic here indicates an internal bug in the data format
        serde_json::to_string(&self.ownership())
            .expect("error serializing ownership")
    }

    /// Load an ownership snapshot from JSON. Will fail if the input is
    /// malformed. Returns how many tiles were updated.
    #[cfg(feature = "json")]
    pub fn load_ownership_json(&mut self, json: &str) -> anyhow::Result<usize> {
        use anyhow::Context;

        let ownership: AxialPointMap<bool> = serde_json::from_str(json)
            .context("error deserializing ownership")?;
        Ok(self.load_ownership(ownership))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AxialPointSet;

    fn seeded(radius: u16) -> Grid {
        let mut grid = Grid::new(25.0);
        assert!(grid.seed(radius));
        grid
    }

    #[test]
    fn test_seed_shape() {
        let grid = seeded(8);
        assert_eq!(grid.len(), 217);
        for r in -8..=8 {
            for q in -8..=8 {
                let point = AxialPoint::new(q, r);
                assert_eq!(
                    grid.contains(point),
                    (q + r).abs() <= 8,
                    "wrong membership for {}",
                    point
                );
            }
        }
        // Nothing outside the box
        assert!(!grid.contains(AxialPoint::new(9, -1)));
        assert!(!grid.contains(AxialPoint::new(0, -9)));
        assert!(grid.iter().all(|(_, tile)| !tile.owned));
    }

    #[test]
    fn test_seed_is_idempotent() {
        let mut grid = seeded(2);
        grid.toggle_owned(AxialPoint::ORIGIN);
        assert!(!grid.seed(8));
        assert_eq!(grid.len(), 19);
        assert_eq!(grid.get(AxialPoint::ORIGIN), Some(&Tile { owned: true }));
    }

    #[test]
    fn test_toggle_owned() {
        let mut grid = seeded(1);
        let point = AxialPoint::new(1, -1);
        assert_eq!(grid.toggle_owned(point), Some(true));
        assert_eq!(grid.get(point), Some(&Tile { owned: true }));
        assert_eq!(grid.toggle_owned(point), Some(false));
        assert_eq!(grid.get(point), Some(&Tile { owned: false }));

        // Missing tiles are a no-op
        assert_eq!(grid.toggle_owned(AxialPoint::new(5, 5)), None);
        assert_eq!(grid.get(AxialPoint::new(5, 5)), None);
        assert_eq!(grid.len(), 7);
    }

    #[test]
    fn test_reset_all() {
        let mut grid = seeded(3);
        let owned = [
            AxialPoint::ORIGIN,
            AxialPoint::new(3, -3),
            AxialPoint::new(-1, 2),
        ];
        for point in owned.iter() {
            grid.toggle_owned(*point);
        }
        assert_eq!(grid.owned_count(), 3);

        grid.reset_all();
        assert_eq!(grid.owned_count(), 0);
        assert_eq!(grid.len(), 37);
        for point in owned.iter() {
            assert_eq!(grid.get(*point), Some(&Tile { owned: false }));
        }
    }

    #[test]
    fn test_for_each_in_range() {
        let grid = seeded(8);

        // Small box, walked directly
        let mut visited = AxialPointSet::default();
        grid.for_each_in_range(AxialRange::new(-1, 1, 0, 1), |point, _| {
            assert!(visited.insert(point), "visited {} twice", point);
        });
        let expected: AxialPointSet = vec![
            AxialPoint::new(-1, 0),
            AxialPoint::new(-1, 1),
            AxialPoint::new(0, 0),
            AxialPoint::new(0, 1),
            AxialPoint::new(1, 0),
            AxialPoint::new(1, 1),
        ]
        .into_iter()
        .collect();
        assert_eq!(visited, expected);

        // Huge box, scanned. Corners of the box aren't in the hexagon, so we
        // get exactly the seeded tiles
        let mut count = 0;
        grid.for_each_in_range(AxialRange::new(-50, 50, -50, 50), |_, _| {
            count += 1
        });
        assert_eq!(count, 217);

        // Box partially off the seeded area
        let mut count = 0;
        grid.for_each_in_range(AxialRange::new(7, 12, -12, -7), |point, _| {
            assert!(point.q() >= 7 && point.r() <= -7);
            count += 1
        });
        // (7,-7), (7,-8), (8,-8)
        assert_eq!(count, 3);
    }

    #[test]
    fn test_axial_range() {
        let range = AxialRange::bounding(vec![
            AxialPoint::new(3, -1),
            AxialPoint::new(-2, 4),
            AxialPoint::new(0, 0),
        ])
        .unwrap();
        assert_eq!(range, AxialRange::new(-2, 3, -1, 4));
        assert_eq!(range.area(), 36);
        assert_eq!(range.padded(2), AxialRange::new(-4, 5, -3, 6));
        assert!(range.contains(AxialPoint::new(3, 4)));
        assert!(!range.contains(AxialPoint::new(4, 0)));
        assert_eq!(AxialRange::bounding(Vec::new()), None);
        assert_eq!(AxialRange::new(1, 0, 0, 0).area(), 0);
    }

    #[test]
    fn test_axial_range_saturated() {
        // Each axis spans 2^32 coordinates, so the true area is 2^64
        let everything =
            AxialRange::new(i32::MIN, i32::MAX, i32::MIN, i32::MAX);
        assert_eq!(everything.area(), u64::MAX);
        assert_eq!(everything.padded(5), everything);

        // Falls back to scanning, and still finds every tile
        let grid = seeded(8);
        let mut count = 0;
        grid.for_each_in_range(everything, |_, _| count += 1);
        assert_eq!(count, 217);
    }

    #[test]
    fn test_ownership_snapshot() {
        let mut grid = seeded(1);
        grid.toggle_owned(AxialPoint::new(0, 1));
        let snapshot = grid.ownership();
        assert_eq!(snapshot.len(), 7);
        assert_eq!(snapshot.get(&AxialPoint::new(0, 1)), Some(&true));
        assert_eq!(snapshot.get(&AxialPoint::ORIGIN), Some(&false));

        let mut other = seeded(1);
        let updated = other.load_ownership(vec![
            (AxialPoint::new(0, 1), true),
            // Not on the grid, ignored
            (AxialPoint::new(9, 9), true),
        ]);
        assert_eq!(updated, 1);
        assert_eq!(other.owned_count(), 1);
        assert_eq!(other.len(), 7);
    }

    #[test]
    fn test_ownership_json() {
        let mut grid = seeded(1);
        grid.toggle_owned(AxialPoint::new(-1, 0));
        let json = serde_json::to_string(&grid.ownership()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["-1,0"], serde_json::Value::Bool(true));
        assert_eq!(parsed["0,0"], serde_json::Value::Bool(false));
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_load_ownership_json() {
        let mut grid = seeded(1);
        let updated = grid
            .load_ownership_json(r#"{"1,-1": true, "0,0": false, "4,4": true}"#)
            .unwrap();
        assert_eq!(updated, 2);
        assert_eq!(grid.get(AxialPoint::new(1, -1)), Some(&Tile { owned: true }));
        assert!(grid.load_ownership_json("[1, 2]").is_err());
        assert!(grid.load_ownership_json(r#"{"bad": true}"#).is_err());
    }
}
