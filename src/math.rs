/// Type alias for sets, we use this to hide which type of `HashSet` we are actually using.
pub type Set<S> = fxhash::FxHashSet<S>;
/// Type alias for maps, we use this to hide which type of `HashMap` we are actually using.
pub type Map<K, V> = fxhash::FxHashMap<K, V>;

/// Disjoint-set structure over the integers `0..n` with union by rank and path halving.
/// The minimizers use this to canonicalize never-distinguished state pairs into a single
/// representative per equivalence class.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<u32>,
    rank: Vec<u8>,
}

impl UnionFind {
    /// Creates a disjoint-set structure in which each of the `n` elements forms its own
    /// singleton class.
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n as u32).collect(),
            rank: vec![0; n],
        }
    }

    /// Number of elements the structure was created with.
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// True if the structure contains no elements.
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Returns the representative of the class containing `x`.
    pub fn find(&mut self, x: usize) -> usize {
        let mut x = x as u32;
        while self.parent[x as usize] != x {
            // path halving
            self.parent[x as usize] = self.parent[self.parent[x as usize] as usize];
            x = self.parent[x as usize];
        }
        x as usize
    }

    /// Merges the classes containing `x` and `y`. Returns `false` if they already were in
    /// the same class.
    pub fn union(&mut self, x: usize, y: usize) -> bool {
        let (rx, ry) = (self.find(x), self.find(y));
        if rx == ry {
            return false;
        }
        match self.rank[rx].cmp(&self.rank[ry]) {
            std::cmp::Ordering::Less => self.parent[rx] = ry as u32,
            std::cmp::Ordering::Greater => self.parent[ry] = rx as u32,
            std::cmp::Ordering::Equal => {
                self.parent[ry] = rx as u32;
                self.rank[rx] += 1;
            }
        }
        true
    }
}
