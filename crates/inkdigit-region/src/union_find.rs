//! Disjoint-set (union-find) over an index space
//!
//! Parents and ranks live in flat arrays indexed by element. `find` uses
//! iterative two-pass path compression (locate the root, then re-point
//! every node on the walked path) so deep chains over large pixel grids
//! never recurse.

use crate::error::{RegionError, RegionResult};

/// Union-find with path compression and union by rank
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
    sets: usize,
}

impl DisjointSet {
    /// Create `n` singleton sets indexed `0..n`
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
            sets: n,
        }
    }

    /// Number of elements
    #[inline]
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Number of disjoint sets
    #[inline]
    pub fn set_count(&self) -> usize {
        self.sets
    }

    /// Representative of `x`'s set
    ///
    /// # Errors
    ///
    /// Returns `RegionError::IndexOutOfRange` if `x >= len()`.
    pub fn find(&mut self, x: usize) -> RegionResult<usize> {
        self.check(x)?;
        Ok(self.find_root(x))
    }

    /// Merge the sets containing `x` and `y`
    ///
    /// The root of lower rank is attached under the root of higher rank.
    /// On a tie `x`'s root becomes the root and its rank grows by one.
    /// Returns `true` if two distinct sets were merged.
    ///
    /// # Errors
    ///
    /// Returns `RegionError::IndexOutOfRange` if either index is out of range.
    pub fn union(&mut self, x: usize, y: usize) -> RegionResult<bool> {
        self.check(x)?;
        self.check(y)?;
        let rx = self.find_root(x);
        let ry = self.find_root(y);
        if rx == ry {
            return Ok(false);
        }
        match self.rank[rx].cmp(&self.rank[ry]) {
            std::cmp::Ordering::Less => self.parent[rx] = ry,
            std::cmp::Ordering::Greater => self.parent[ry] = rx,
            std::cmp::Ordering::Equal => {
                self.parent[ry] = rx;
                self.rank[rx] = self.rank[rx].saturating_add(1);
            }
        }
        self.sets -= 1;
        Ok(true)
    }

    /// Whether `x` and `y` are in the same set
    pub fn connected(&mut self, x: usize, y: usize) -> RegionResult<bool> {
        Ok(self.find(x)? == self.find(y)?)
    }

    fn find_root(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    #[inline]
    fn check(&self, x: usize) -> RegionResult<()> {
        if x >= self.parent.len() {
            return Err(RegionError::IndexOutOfRange {
                index: x,
                len: self.parent.len(),
            });
        }
        Ok(())
    }
}
