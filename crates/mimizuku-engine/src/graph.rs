//! 包含グラフ (subsumer graph)
//!
//! クラス用とロール用の二つのインスタンスが使われる。グラフは明示的に
//! 挿入された辺だけを保持し、閉包の維持は呼び出し側 (完備化規則または
//! 事前飽和) の仕事。

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Directed subsumption graph over one id space. An edge x → a means
/// "a subsumes x". Both directions are indexed so ancestor and descendant
/// queries are set lookups over already-materialized edges.
#[derive(Debug, Clone)]
pub struct SubsumerGraph<T> {
    ancestors: HashMap<T, HashSet<T>>,
    descendants: HashMap<T, HashSet<T>>,
    top: T,
}

impl<T: Copy + Eq + Hash> SubsumerGraph<T> {
    pub fn new(top: T) -> Self {
        Self {
            ancestors: HashMap::new(),
            descendants: HashMap::new(),
            top,
        }
    }

    /// Registers `x` as a graph element without any edges. Returns whether
    /// the element was new; the caller decides which seed edges to insert.
    pub fn ensure_node(&mut self, x: T) -> bool {
        let new = !self.ancestors.contains_key(&x);
        if new {
            self.ancestors.insert(x, HashSet::new());
            self.descendants.entry(x).or_default();
        }
        new
    }

    pub fn contains(&self, x: T) -> bool {
        self.ancestors.contains_key(&x)
    }

    /// Inserts the edge x → a if absent. Returns whether it was new.
    /// Unseen endpoints are registered on the way.
    pub fn add_edge(&mut self, x: T, a: T) -> bool {
        self.ensure_node(x);
        self.ensure_node(a);
        let new = self.ancestors.get_mut(&x).map(|s| s.insert(a)).unwrap_or(false);
        if new {
            self.descendants.entry(a).or_default().insert(x);
        }
        new
    }

    pub fn has_edge(&self, x: T, a: T) -> bool {
        self.ancestors.get(&x).map(|s| s.contains(&a)).unwrap_or(false)
    }

    /// All a with a materialized edge x → a.
    pub fn ancestors(&self, x: T) -> impl Iterator<Item = T> + '_ {
        self.ancestors.get(&x).into_iter().flatten().copied()
    }

    pub fn ancestor_set(&self, x: T) -> Option<&HashSet<T>> {
        self.ancestors.get(&x)
    }

    /// All y with a materialized edge y → x.
    pub fn descendants(&self, x: T) -> impl Iterator<Item = T> + '_ {
        self.descendants.get(&x).into_iter().flatten().copied()
    }

    pub fn nodes(&self) -> impl Iterator<Item = T> + '_ {
        self.ancestors.keys().copied()
    }

    pub fn node_count(&self) -> usize {
        self.ancestors.len()
    }

    pub fn top(&self) -> T {
        self.top
    }

    /// Iterative transitive closure over the materialized edges. Used once
    /// on the role graph before class saturation starts; the role
    /// hierarchy is static from then on.
    pub fn saturate(&mut self) {
        let mut changed = true;
        while changed {
            changed = false;
            let current: Vec<(T, Vec<T>)> = self
                .ancestors
                .iter()
                .map(|(x, supers)| (*x, supers.iter().copied().collect()))
                .collect();
            for (x, supers) in &current {
                for a in supers {
                    let indirect: Vec<T> = self.ancestors(*a).collect();
                    for b in indirect {
                        changed |= self.add_edge(*x, b);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> SubsumerGraph<u32> {
        SubsumerGraph::new(1)
    }

    #[test]
    fn test_add_edge_reports_novelty() {
        let mut g = graph();
        assert!(g.add_edge(5, 6));
        assert!(!g.add_edge(5, 6));
        assert!(g.has_edge(5, 6));
        assert!(!g.has_edge(6, 5));
    }

    #[test]
    fn test_both_directions_are_indexed() {
        let mut g = graph();
        g.add_edge(5, 6);
        g.add_edge(7, 6);

        let descendants: Vec<u32> = {
            let mut v: Vec<u32> = g.descendants(6).collect();
            v.sort_unstable();
            v
        };
        assert_eq!(descendants, vec![5, 7]);
    }

    #[test]
    fn test_ensure_node_registers_without_edges() {
        let mut g = graph();
        assert!(g.ensure_node(9));
        assert!(!g.ensure_node(9));
        assert!(g.contains(9));
        assert_eq!(g.ancestors(9).count(), 0);
    }

    #[test]
    fn test_saturate_computes_transitive_closure() {
        let mut g = graph();
        // chain 2 -> 3 -> 4 -> 5 with reflexive edges
        for x in 2..=5u32 {
            g.add_edge(x, x);
        }
        g.add_edge(2, 3);
        g.add_edge(3, 4);
        g.add_edge(4, 5);

        g.saturate();

        assert!(g.has_edge(2, 4));
        assert!(g.has_edge(2, 5));
        assert!(g.has_edge(3, 5));
        assert!(!g.has_edge(5, 2));
    }

    #[test]
    fn test_saturate_handles_cycles() {
        let mut g = graph();
        g.add_edge(2, 3);
        g.add_edge(3, 2);
        g.saturate();
        assert!(g.has_edge(2, 2));
        assert!(g.has_edge(3, 3));
    }
}
