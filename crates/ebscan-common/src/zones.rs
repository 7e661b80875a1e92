//! Flattened zone sets.
//!
//! A zone is an ordered set of 0-based location ids forming one candidate
//! spatial cluster. A zone set stores every zone back to back in one id
//! buffer plus an offset table, so zone `i` is `ids[offsets[i]..offsets[i + 1]]`.

/// A sequence of zones stored as concatenated ids plus offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneSet {
    ids: Vec<usize>,
    offsets: Vec<usize>,
}

impl ZoneSet {
    /// Build from the concatenated id sequence and a per-zone length table.
    ///
    /// Returns `None` if the lengths do not sum to `ids.len()`.
    pub fn from_flat(ids: Vec<usize>, lengths: &[usize]) -> Option<Self> {
        let mut offsets = Vec::with_capacity(lengths.len() + 1);
        let mut end = 0usize;
        offsets.push(0);
        for &len in lengths {
            end = end.checked_add(len)?;
            offsets.push(end);
        }
        if end != ids.len() {
            return None;
        }
        Some(Self { ids, offsets })
    }

    /// Build from one id list per zone.
    pub fn from_nested<I, Z>(zones: I) -> Self
    where
        I: IntoIterator<Item = Z>,
        Z: AsRef<[usize]>,
    {
        let mut ids = Vec::new();
        let mut offsets = vec![0];
        for zone in zones {
            ids.extend_from_slice(zone.as_ref());
            offsets.push(ids.len());
        }
        Self { ids, offsets }
    }

    /// Number of zones.
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Location ids of zone `index` (0-based ordinal).
    pub fn zone(&self, index: usize) -> &[usize] {
        &self.ids[self.offsets[index]..self.offsets[index + 1]]
    }

    /// Zones in input order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[usize]> + '_ {
        self.offsets.windows(2).map(move |w| &self.ids[w[0]..w[1]])
    }

    /// The concatenated id sequence.
    pub fn ids(&self) -> &[usize] {
        &self.ids
    }

    /// Per-zone length table.
    pub fn lengths(&self) -> Vec<usize> {
        self.offsets.windows(2).map(|w| w[1] - w[0]).collect()
    }

    /// Largest location id referenced by any zone.
    pub fn max_location(&self) -> Option<usize> {
        self.ids.iter().copied().max()
    }

    /// True if zones `a` and `b` share at least one location.
    pub fn overlaps(&self, a: usize, b: usize) -> bool {
        let zb = self.zone(b);
        self.zone(a).iter().any(|loc| zb.contains(loc))
    }
}
