//! 分類ステータス
//!
//! 飽和中の可変状態をひとまとめに所有する: クラス/ロール包含グラフ、
//! ロール後続関係 R、証人ノード表 V、識別子プール。変更はすべて
//! ワークリストドライバ経由 (single writer)。

use crate::graph::SubsumerGraph;
use crate::nodes::{ExistentialMarker, WitnessNode, WitnessTable};
use crate::relation::RoleSuccessorRelation;
use mimizuku_core::{ClassId, EntityPool, RoleId};
use std::collections::BTreeSet;

/// The mutable reasoning state of one classification run. After the
/// worklist drains it is frozen and only queried.
#[derive(Debug, Clone)]
pub struct ClassifierStatus {
    classes: SubsumerGraph<ClassId>,
    roles: SubsumerGraph<RoleId>,
    successors: RoleSuccessorRelation,
    witnesses: WitnessTable,
    pool: EntityPool,
}

impl ClassifierStatus {
    /// Takes ownership of the pre-saturated role graph; the role
    /// hierarchy is static from here on, except for synthetic inverses
    /// joining with only themselves and Top as ancestors.
    pub fn new(pool: EntityPool, roles: SubsumerGraph<RoleId>) -> Self {
        Self {
            classes: SubsumerGraph::new(ClassId::TOP),
            roles,
            successors: RoleSuccessorRelation::new(),
            witnesses: WitnessTable::new(),
            pool,
        }
    }

    /// Registers x as a class-graph element without seed edges; the
    /// driver inserts (x,x) and (x,Top) as ordinary facts so the rules
    /// see them. Returns whether x was new.
    pub fn ensure_node(&mut self, x: ClassId) -> bool {
        self.classes.ensure_node(x)
    }

    pub fn is_known_node(&self, x: ClassId) -> bool {
        self.classes.contains(x)
    }

    /// Inserts the subsumption edge x → a if absent; returns whether it
    /// was new. Unseen endpoints are registered on the way.
    pub fn add_subsumer(&mut self, x: ClassId, a: ClassId) -> bool {
        self.classes.add_edge(x, a)
    }

    pub fn has_subsumer(&self, x: ClassId, a: ClassId) -> bool {
        self.classes.has_edge(x, a)
    }

    /// The maintained subsumer set of x (explicit edges, not a transitive
    /// re-derivation).
    pub fn subsumers(&self, x: ClassId) -> impl Iterator<Item = ClassId> + '_ {
        self.classes.ancestors(x)
    }

    pub fn subsumees(&self, a: ClassId) -> impl Iterator<Item = ClassId> + '_ {
        self.classes.descendants(a)
    }

    /// Inserts (r, x, y) if absent; returns whether it was new.
    pub fn add_role_successor(&mut self, role: RoleId, source: ClassId, target: ClassId) -> bool {
        self.successors.add(role, source, target)
    }

    pub fn successors_by_role(&self, role: RoleId, source: ClassId) -> &[ClassId] {
        self.successors.successors(role, source)
    }

    pub fn predecessors_by_role(&self, role: RoleId, target: ClassId) -> &[ClassId] {
        self.successors.predecessors(role, target)
    }

    /// (role, predecessor) pairs over every role; the bottom propagator's
    /// traversal index.
    pub fn predecessors_of(&self, target: ClassId) -> &[(RoleId, ClassId)] {
        self.successors.incoming(target)
    }

    pub fn roles_from(&self, source: ClassId) -> impl Iterator<Item = RoleId> + '_ {
        self.successors.roles_from(source)
    }

    pub fn has_role_successor(&self, role: RoleId, source: ClassId, target: ClassId) -> bool {
        self.successors.contains(role, source, target)
    }

    /// Canonicalizes a witness node; structurally equal nodes intern to
    /// the same id, stable for the run. The bool reports novelty.
    pub fn intern_node(&mut self, node: WitnessNode) -> (ClassId, bool) {
        self.witnesses.intern(&mut self.pool, node)
    }

    pub fn contains_node(&self, node: &WitnessNode) -> bool {
        self.witnesses.contains(node)
    }

    pub fn is_witness(&self, id: ClassId) -> bool {
        self.witnesses.is_witness(id)
    }

    pub fn witness(&self, id: ClassId) -> Option<&WitnessNode> {
        self.witnesses.get(id)
    }

    /// The base class of a node: a witness's base, or the id itself for a
    /// named class.
    pub fn base_of(&self, id: ClassId) -> ClassId {
        self.witnesses.get(id).map(|w| w.base).unwrap_or(id)
    }

    /// The marker set of a node; empty for named classes.
    pub fn markers_of(&self, id: ClassId) -> BTreeSet<ExistentialMarker> {
        self.witnesses.get(id).map(|w| w.markers.clone()).unwrap_or_default()
    }

    pub fn is_top_rooted_witness(&self, id: ClassId) -> bool {
        self.witnesses.get(id).map(|w| w.is_top_rooted()).unwrap_or(false)
    }

    /// The declared inverse of `role`, if any. Never allocates.
    pub fn known_inverse(&self, role: RoleId) -> Option<RoleId> {
        self.pool.known_inverse(role)
    }

    /// The inverse of `role`, lazily allocating a synthetic role on first
    /// request. The synthetic role joins the already-closed role graph
    /// with only itself and the top role as ancestors; the role closure is
    /// deliberately not recomputed (see DESIGN.md).
    pub fn inverse_of(&mut self, role: RoleId) -> RoleId {
        if let Some(inverse) = self.pool.known_inverse(role) {
            return inverse;
        }
        let inverse = self.pool.inverse_of(role);
        self.roles.add_edge(inverse, inverse);
        self.roles.add_edge(inverse, RoleId::TOP);
        inverse
    }

    /// All s with r ⊑ s in the pre-saturated role hierarchy (reflexive).
    pub fn super_roles(&self, role: RoleId) -> impl Iterator<Item = RoleId> + '_ {
        self.roles.ancestors(role)
    }

    pub fn sub_roles(&self, role: RoleId) -> impl Iterator<Item = RoleId> + '_ {
        self.roles.descendants(role)
    }

    pub fn is_sub_role_of(&self, sub: RoleId, sup: RoleId) -> bool {
        self.roles.has_edge(sub, sup)
    }

    pub fn role_graph(&self) -> &SubsumerGraph<RoleId> {
        &self.roles
    }

    pub fn class_graph(&self) -> &SubsumerGraph<ClassId> {
        &self.classes
    }

    pub fn pool(&self) -> &EntityPool {
        &self.pool
    }

    pub fn witness_count(&self) -> usize {
        self.witnesses.len()
    }

    pub fn link_count(&self) -> usize {
        self.successors.len()
    }

    pub fn node_count(&self) -> usize {
        self.classes.node_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(n: u32) -> ClassId {
        ClassId(n)
    }

    fn r(n: u32) -> RoleId {
        RoleId(n)
    }

    fn status() -> ClassifierStatus {
        let mut roles = SubsumerGraph::new(RoleId::TOP);
        for id in 0..4u32 {
            roles.add_edge(RoleId(id), RoleId(id));
            roles.add_edge(RoleId(id), RoleId::TOP);
        }
        roles.add_edge(r(2), r(3));
        roles.saturate();
        ClassifierStatus::new(EntityPool::new(10, 4), roles)
    }

    #[test]
    fn test_add_subsumer_registers_unseen_nodes() {
        let mut status = status();
        assert!(!status.is_known_node(c(5)));
        assert!(status.add_subsumer(c(5), c(6)));
        assert!(status.is_known_node(c(5)));
        assert!(status.has_subsumer(c(5), c(6)));
        assert!(!status.add_subsumer(c(5), c(6)));
    }

    #[test]
    fn test_role_hierarchy_queries() {
        let status = status();
        let supers: Vec<RoleId> = {
            let mut v: Vec<RoleId> = status.super_roles(r(2)).collect();
            v.sort_unstable();
            v
        };
        assert_eq!(supers, vec![RoleId::TOP, r(2), r(3)]);
        assert!(status.is_sub_role_of(r(2), r(3)));
        assert!(!status.is_sub_role_of(r(3), r(2)));
    }

    #[test]
    fn test_lazy_inverse_joins_role_graph_under_top_only() {
        let mut status = status();
        let inv = status.inverse_of(r(2));
        assert!(status.pool().is_synthetic_role(inv));

        // only itself and Top, even though r2 ⊑ r3: the role graph was
        // closed before the inverse existed
        let supers: Vec<RoleId> = {
            let mut v: Vec<RoleId> = status.super_roles(inv).collect();
            v.sort_unstable();
            v
        };
        assert_eq!(supers, vec![RoleId::TOP, inv]);
        assert_eq!(status.known_inverse(r(2)), Some(inv));
        assert_eq!(status.inverse_of(inv), r(2));
    }

    #[test]
    fn test_base_and_markers_of_named_class() {
        let status = status();
        assert_eq!(status.base_of(c(3)), c(3));
        assert!(status.markers_of(c(3)).is_empty());
        assert!(!status.is_top_rooted_witness(c(3)));
    }

    #[test]
    fn test_intern_node_via_status() {
        let mut status = status();
        let (id, new) = status.intern_node(WitnessNode::existential(c(4)));
        assert!(new);
        assert!(status.is_witness(id));
        assert_eq!(status.base_of(id), c(4));

        let (again, new) = status.intern_node(WitnessNode::existential(c(4)));
        assert!(!new);
        assert_eq!(id, again);
    }
}
