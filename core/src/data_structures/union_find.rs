//! Disjoint-set forest with path halving and union by size
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    size: Vec<usize>,
    components: usize,
}

impl UnionFind {
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
            components: n,
        }
    }

    pub fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Merges the sets of `a` and `b`; `false` if they were already joined
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let (mut ra, mut rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        if self.size[ra] < self.size[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra;
        self.size[ra] += self.size[rb];
        self.components -= 1;
        true
    }

    #[inline]
    pub fn component_count(&self) -> usize {
        self.components
    }

    /// Members grouped by component, components ordered by smallest member
    pub fn groups(&mut self) -> Vec<Vec<usize>> {
        let mut by_root: Vec<Option<usize>> = vec![None; self.parent.len()];
        let mut groups: Vec<Vec<usize>> = Vec::with_capacity(self.components);
        for x in 0..self.parent.len() {
            let root = self.find(x);
            let slot = *by_root[root].get_or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[slot].push(x);
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_and_find() {
        let mut uf = UnionFind::new(5);
        assert_eq!(uf.component_count(), 5);

        assert!(uf.union(0, 1));
        assert!(uf.union(3, 4));
        assert!(!uf.union(1, 0));

        assert_eq!(uf.find(0), uf.find(1));
        assert_ne!(uf.find(1), uf.find(3));
        assert_eq!(uf.component_count(), 3);
    }

    #[test]
    fn test_groups_are_ordered_by_first_member() {
        let mut uf = UnionFind::new(6);
        uf.union(5, 2);
        uf.union(0, 4);

        assert_eq!(uf.groups(), vec![vec![0, 4], vec![1], vec![2, 5], vec![3]]);
    }
}
