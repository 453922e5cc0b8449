//! 証人ノード表 (witness table)
//!
//! 匿名の存在量化後続を表す合成ノードを構造的に正準化する。構造が同じ
//! 証人は必ず同じ id に intern される。これが合成ノード空間を有限に
//! 保ち、飽和の停止性を保証する。

use mimizuku_core::{ClassId, EntityPool, RoleId};
use std::collections::{BTreeSet, HashMap};

/// One existential marker (t, A): the node carries a ⊑-justified
/// existential edge along role t to something subsumed by A. Markers are
/// pattern-matching material only, never real successors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExistentialMarker {
    pub role: RoleId,
    pub filler: ClassId,
}

/// Structural identity of a synthetic witness node: a base class plus a
/// finite marker set. Equality is structural and order-irrelevant (the
/// marker set is ordered).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WitnessNode {
    pub base: ClassId,
    pub markers: BTreeSet<ExistentialMarker>,
}

impl WitnessNode {
    /// The canonical witness for an existential filler: base class, no
    /// markers.
    pub fn existential(filler: ClassId) -> Self {
        Self { base: filler, markers: BTreeSet::new() }
    }

    /// A Top-rooted node, as created for functional-role successors.
    pub fn top_rooted(markers: BTreeSet<ExistentialMarker>) -> Self {
        Self { base: ClassId::TOP, markers }
    }

    pub fn with_marker(&self, marker: ExistentialMarker) -> Self {
        let mut markers = self.markers.clone();
        markers.insert(marker);
        Self { base: self.base, markers }
    }

    pub fn is_top_rooted(&self) -> bool {
        self.base.is_top()
    }
}

/// Interning table for witness nodes: an arena of records plus a hash map
/// from structural key to id. Ids are minted from the class-id synthetic
/// range, so witnesses participate in the subsumer graph directly. Raw
/// arena indexes never leave this module.
#[derive(Debug, Clone, Default)]
pub struct WitnessTable {
    records: Vec<WitnessNode>,
    by_id: HashMap<ClassId, usize>,
    by_structure: HashMap<WitnessNode, ClassId>,
}

impl WitnessTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id for a structurally equal witness, minting a fresh
    /// one on first request. The bool reports whether the node is new.
    /// Ids are stable for the lifetime of the run.
    pub fn intern(&mut self, pool: &mut EntityPool, node: WitnessNode) -> (ClassId, bool) {
        if let Some(id) = self.by_structure.get(&node) {
            return (*id, false);
        }
        let id = pool.fresh_class();
        self.by_id.insert(id, self.records.len());
        self.by_structure.insert(node.clone(), id);
        self.records.push(node);
        (id, true)
    }

    pub fn contains(&self, node: &WitnessNode) -> bool {
        self.by_structure.contains_key(node)
    }

    pub fn is_witness(&self, id: ClassId) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn get(&self, id: ClassId) -> Option<&WitnessNode> {
        self.by_id.get(&id).map(|ix| &self.records[*ix])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
