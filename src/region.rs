/// A signed rectangle describing where a sprite is drawn relative to its pivot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    pub fn bottom(&self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Smallest rectangle containing both regions
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "union extents are bounded by sprite dimensions"
    )]
    pub fn union(&self, other: &Region) -> Region {
        let left = self.x.min(other.x);
        let top = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());

        Region {
            x: left,
            y: top,
            width: (right - i64::from(left)) as u32,
            height: (bottom - i64::from(top)) as u32,
        }
    }
}

/// Accumulates a bounding box; the first merge seeds it.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegionMerger {
    region: Option<Region>,
}

impl RegionMerger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge(&mut self, region: Region) {
        self.region = Some(match self.region {
            Some(current) => current.union(&region),
            None => region,
        });
    }

    /// Merged region, or the empty region if nothing was merged
    pub fn region(&self) -> Region {
        self.region.unwrap_or_default()
    }
}

impl FromIterator<Region> for RegionMerger {
    fn from_iter<I: IntoIterator<Item = Region>>(iter: I) -> Self {
        let mut merger = RegionMerger::new();
        for region in iter {
            merger.merge(region);
        }
        merger
    }
}
