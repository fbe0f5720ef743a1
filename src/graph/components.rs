//! Union-find over node positions

use std::collections::HashMap;

/// Union-Find data structure for connected component analysis
pub struct DisjointSets {
    /// Parent pointers (parent[i] = parent of node i)
    parent: Vec<u32>,

    /// Size of each set (for union by size)
    rank: Vec<u32>,
}

impl DisjointSets {
    /// Create a new DisjointSets data structure
    pub fn new(size: usize) -> Self {
        Self {
            parent: (0..size as u32).collect(),
            rank: vec![1; size],
        }
    }

    /// Find the root of the set containing x with path compression
    pub fn find(&mut self, x: u32) -> u32 {
        let px = self.parent[x as usize];
        if px != x {
            self.parent[x as usize] = self.find(px);
        }
        self.parent[x as usize]
    }

    /// Union the sets containing x and y
    pub fn union(&mut self, x: u32, y: u32) {
        let root_x = self.find(x);
        let root_y = self.find(y);

        if root_x == root_y {
            return;
        }

        // Attach smaller tree under root of larger tree
        let rank_x = self.rank[root_x as usize];
        let rank_y = self.rank[root_y as usize];

        if rank_x > rank_y {
            self.parent[root_y as usize] = root_x;
            self.rank[root_x as usize] += rank_y;
        } else {
            self.parent[root_x as usize] = root_y;
            self.rank[root_y as usize] += rank_x;
        }
    }

    /// All sets as ascending member lists, ordered by their smallest member
    pub fn groups(&mut self) -> Vec<Vec<u32>> {
        let mut slot_of_root: HashMap<u32, usize> = HashMap::new();
        let mut groups: Vec<Vec<u32>> = Vec::new();

        for x in 0..self.parent.len() as u32 {
            let root = self.find(x);
            let slot = *slot_of_root.entry(root).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[slot].push(x);
        }

        groups
    }
}
