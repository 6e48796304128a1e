//! This sub-module contains the tile coordinate type. See the parent module
//! documentation for more info on the coordinate system.

use anyhow::{anyhow, Context};
use derive_more::Display;
use fnv::FnvBuildHasher;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::{
    collections::{HashMap, HashSet},
    str::FromStr,
};

/// A point in the hex coordinate system that refers to a whole tile (via its
/// center point). Tiles are addressed in axial coordinates: two of the three
/// cube components, `q` and `r`, are stored and the third is derived as
/// `s = -q - r`.
///
/// Two points are equal iff both components match. Points are used as map
/// keys everywhere, and their string form (`"q,r"`, see [Display] and
/// [FromStr]) is the stable key used in serialized snapshots.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Display)]
#[display(fmt = "{},{}", q, r)]
pub struct AxialPoint {
    q: i32,
    r: i32,
}

impl AxialPoint {
    pub const ORIGIN: Self = Self::new(0, 0);

    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    pub fn q(self) -> i32 {
        self.q
    }

    pub fn r(self) -> i32 {
        self.r
    }

    /// The derived third cube component. Since q+r+s=0 for all points, this
    /// never needs to be stored.
    pub fn s(self) -> i32 {
        -self.q - self.r
    }

    /// Calculate the path distance between two tiles, meaning the number of
    /// hops it takes to get from one to the other. 0 if the points are equal,
    /// 1 if the tiles are adjacent, 2 if there is 1 tile between them, etc.
    pub fn distance_to(self, other: AxialPoint) -> u32 {
        // https://www.redblobgames.com/grids/hexagons/#distances
        ((self.q - other.q).unsigned_abs()
            + (self.r - other.r).unsigned_abs()
            + (self.s() - other.s()).unsigned_abs())
            / 2
    }
}

impl FromStr for AxialPoint {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (q, r) = s
            .split_once(',')
            .ok_or_else(|| anyhow!("invalid tile key {:?}, expected q,r", s))?;
        let q = q
            .trim()
            .parse()
            .with_context(|| format!("invalid q component in {:?}", s))?;
        let r = r
            .trim()
            .parse()
            .with_context(|| format!("invalid r component in {:?}", s))?;
        Ok(Self::new(q, r))
    }
}

// Points are (de)serialized as their "q,r" key, so maps keyed by point can be
// written to formats that only support string keys, e.g. JSON.
impl Serialize for AxialPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AxialPoint {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        key.parse().map_err(de::Error::custom)
    }
}

/// A set of tile points
pub type AxialPointSet = HashSet<AxialPoint, FnvBuildHasher>;
/// A map of tile points to some `T`
pub type AxialPointMap<T> = HashMap<AxialPoint, T, FnvBuildHasher>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_test::{assert_de_tokens_error, assert_tokens, Token};

    #[test]
    fn test_distance_to() {
        let p0 = AxialPoint::ORIGIN;
        let p1 = AxialPoint::new(-1, 1);
        let p2 = AxialPoint::new(2, -1);
        let p3 = AxialPoint::new(2, -3);

        assert_eq!(p0.distance_to(p0), 0);
        assert_eq!(p3.distance_to(p3), 0);

        assert_eq!(p0.distance_to(p1), 1);
        assert_eq!(p0.distance_to(p2), 2);
        assert_eq!(p0.distance_to(p3), 3);

        assert_eq!(p1.distance_to(p2), 3);
        assert_eq!(p1.distance_to(p3), 4);
        assert_eq!(p2.distance_to(p3), 2);
    }

    #[test]
    fn test_key_parse() {
        assert_eq!("3,-2".parse::<AxialPoint>().unwrap(), AxialPoint::new(3, -2));
        assert_eq!(" 0 , 7 ".parse::<AxialPoint>().unwrap(), AxialPoint::new(0, 7));
        assert!("3".parse::<AxialPoint>().is_err());
        assert!("a,1".parse::<AxialPoint>().is_err());
        assert!("1,2,3".parse::<AxialPoint>().is_err());
        assert_eq!(AxialPoint::new(-4, 9).to_string(), "-4,9");
    }

    #[test]
    fn test_serde_as_key() {
        assert_tokens(&AxialPoint::new(3, -2), &[Token::Str("3,-2")]);
        assert_de_tokens_error::<AxialPoint>(
            &[Token::Str("nope")],
            "invalid tile key \"nope\", expected q,r",
        );
    }
}
