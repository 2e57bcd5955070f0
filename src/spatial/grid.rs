//! Uniform grid (spatial hash) for threshold-radius neighbor search.
//!
//! # Algorithm
//!
//! 1. Divide the plane into square cells of side `cell_size` (the edge
//!    threshold)
//! 2. Assign each finite point to the cell `(floor(x / s), floor(y / s))`
//! 3. A query for point `i` scans the 3x3 block of cells around its own
//!
//! Two points closer than `s` differ by less than `s` on each axis, so their
//! cells differ by at most one step per axis and the 3x3 block finds them.
//!
//! # Layout
//!
//! Occupied cells get dense ids through a hash map, then members are
//! counting-sorted into one CSR array (`offsets` + `members`). Building is
//! O(n) expected and a query is O(k) in the local point density. `rebuild`
//! reuses every buffer, so a long-lived index does not allocate per scan
//! once it has grown to the scan size.

use std::collections::hash_map::Entry;

use log::trace;
use rustc_hash::FxHashMap;

use super::CandidateIndex;
use crate::scan::Projection;

/// Cell ids for points that are not in any cell.
const INVALID_CELL: u32 = u32::MAX;

/// Cell keys are clamped to this magnitude so `key ± 1` never overflows and
/// the nine keys of a neighborhood are always distinct.
const KEY_LIMIT: f64 = (1u64 << 62) as f64;

/// Integer coordinate of a grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellKey {
    /// Column, `floor(x / cell_size)`.
    pub x: i64,
    /// Row, `floor(y / cell_size)`.
    pub y: i64,
}

impl CellKey {
    #[inline]
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Cell containing `(x, y)`, or `None` for non-finite coordinates.
    #[inline]
    pub fn containing(x: f64, y: f64, cell_size: f64) -> Option<Self> {
        if !(x.is_finite() && y.is_finite()) {
            return None;
        }
        Some(Self::new(axis_key(x, cell_size), axis_key(y, cell_size)))
    }

    /// This cell and its eight neighbors.
    #[inline]
    pub fn neighborhood(self) -> impl Iterator<Item = CellKey> {
        (-1..=1).flat_map(move |dx| (-1..=1).map(move |dy| CellKey::new(self.x + dx, self.y + dy)))
    }
}

/// Quotient overflow (tiny cells, huge coordinates) saturates at the clamp.
#[inline]
fn axis_key(v: f64, cell_size: f64) -> i64 {
    (v / cell_size).floor().clamp(-KEY_LIMIT, KEY_LIMIT) as i64
}

/// Uniform grid over a projected scan.
#[derive(Clone, Debug, Default)]
pub struct GridIndex {
    /// Dense cell id per point (`INVALID_CELL` for unlinkable points)
    cell_of: Vec<u32>,
    /// Key of each dense cell id
    keys: Vec<CellKey>,
    lookup: FxHashMap<CellKey, u32>,
    /// CSR: members of cell `c` are `members[offsets[c]..offsets[c + 1]]`
    offsets: Vec<u32>,
    members: Vec<u32>,
    invalid: usize,
}

impl GridIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty index with room for `capacity` points.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cell_of: Vec::with_capacity(capacity),
            keys: Vec::with_capacity(capacity),
            lookup: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            offsets: Vec::with_capacity(capacity + 1),
            members: Vec::with_capacity(capacity),
            invalid: 0,
        }
    }

    /// Build an index over the linkable points of a projection with the
    /// given cell side.
    pub fn build(points: &Projection, cell_size: f64) -> Self {
        let mut index = Self::with_capacity(points.len());
        index.rebuild(points, cell_size);
        index
    }

    /// Replace the contents with a new point set.
    ///
    /// All state from the previous build is discarded first.
    ///
    /// `cell_size` must be positive and finite.
    pub fn rebuild(&mut self, points: &Projection, cell_size: f64) {
        debug_assert!(cell_size > 0.0 && cell_size.is_finite());

        self.clear();

        // Pass 1: dense cell id per point, and member counts in `offsets`
        for i in 0..points.len() {
            let key = if points.is_linkable(i) {
                CellKey::containing(points.xs[i], points.ys[i], cell_size)
            } else {
                None
            };
            let Some(key) = key else {
                self.cell_of.push(INVALID_CELL);
                self.invalid += 1;
                continue;
            };
            let id = match self.lookup.entry(key) {
                Entry::Occupied(entry) => *entry.get(),
                Entry::Vacant(entry) => {
                    let id = self.keys.len() as u32;
                    entry.insert(id);
                    self.keys.push(key);
                    self.offsets.push(0);
                    id
                }
            };
            self.offsets[id as usize] += 1;
            self.cell_of.push(id);
        }

        // Inclusive prefix sum: offsets[c] becomes the end of cell c
        let mut total = 0u32;
        for slot in &mut self.offsets {
            total += *slot;
            *slot = total;
        }

        // Pass 2: scatter in reverse so each end slides back to its start and
        // members stay ascending within a cell
        self.members.resize(total as usize, 0);
        for (i, &id) in self.cell_of.iter().enumerate().rev() {
            if id == INVALID_CELL {
                continue;
            }
            let slot = &mut self.offsets[id as usize];
            *slot -= 1;
            self.members[*slot as usize] = i as u32;
        }
        self.offsets.push(total);

        trace!(
            "[GridIndex] {} points in {} cells (cell_size={}, invalid={})",
            points.len(),
            self.keys.len(),
            cell_size,
            self.invalid
        );
    }

    /// Remove all points, keeping allocations.
    pub fn clear(&mut self) {
        self.cell_of.clear();
        self.keys.clear();
        self.lookup.clear();
        self.offsets.clear();
        self.members.clear();
        self.invalid = 0;
    }

    /// Number of indexed points, including invalid ones.
    #[inline]
    pub fn len(&self) -> usize {
        self.cell_of.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cell_of.is_empty()
    }

    /// Number of occupied cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.keys.len()
    }

    /// Number of points kept out of every cell.
    #[inline]
    pub fn invalid_count(&self) -> usize {
        self.invalid
    }

    /// Cell holding point `i`, or `None` if the point is not linkable.
    pub fn cell_of(&self, i: usize) -> Option<CellKey> {
        match self.cell_of.get(i) {
            Some(&id) if id != INVALID_CELL => Some(self.keys[id as usize]),
            _ => None,
        }
    }

    /// Points stored in the cell `key`.
    pub fn cell_members(&self, key: CellKey) -> &[u32] {
        match self.lookup.get(&key) {
            Some(&id) => {
                let id = id as usize;
                &self.members[self.offsets[id] as usize..self.offsets[id + 1] as usize]
            }
            None => &[],
        }
    }
}

impl CandidateIndex for GridIndex {
    fn for_each_candidate(&self, i: usize, visit: &mut dyn FnMut(usize)) {
        let Some(home) = self.cell_of(i) else {
            return;
        };
        for key in home.neighborhood() {
            for &j in self.cell_members(key) {
                let j = j as usize;
                if j != i {
                    visit(j);
                }
            }
        }
    }
}
