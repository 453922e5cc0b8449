//! ロール後続関係 R
//!
//! 三項関係 (role, source, target)。規則が必要とする四つの索引を持つ:
//! (role, source) 順引き、(role, target) 逆引き、target 単独の逆引き
//! (Bottom 伝播用)、source が使うロール集合。

use mimizuku_core::{ClassId, RoleId};
use smallvec::SmallVec;
use std::collections::{BTreeSet, HashMap};

type NodeList = SmallVec<[ClassId; 4]>;

/// The ternary role-successor relation. Grows monotonically; there is no
/// removal.
#[derive(Debug, Clone, Default)]
pub struct RoleSuccessorRelation {
    by_source: HashMap<(RoleId, ClassId), NodeList>,
    by_target: HashMap<(RoleId, ClassId), NodeList>,
    incoming: HashMap<ClassId, Vec<(RoleId, ClassId)>>,
    roles_by_source: HashMap<ClassId, BTreeSet<RoleId>>,
    len: usize,
}

impl RoleSuccessorRelation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts (role, source, target) if absent; returns whether it was
    /// new. All indexes are updated together.
    pub fn add(&mut self, role: RoleId, source: ClassId, target: ClassId) -> bool {
        let forward = self.by_source.entry((role, source)).or_default();
        if forward.contains(&target) {
            return false;
        }
        forward.push(target);
        self.by_target.entry((role, target)).or_default().push(source);
        self.incoming.entry(target).or_default().push((role, source));
        self.roles_by_source.entry(source).or_default().insert(role);
        self.len += 1;
        true
    }

    pub fn contains(&self, role: RoleId, source: ClassId, target: ClassId) -> bool {
        self.by_source
            .get(&(role, source))
            .map(|targets| targets.contains(&target))
            .unwrap_or(false)
    }

    /// All y with (role, source, y) in the relation.
    pub fn successors(&self, role: RoleId, source: ClassId) -> &[ClassId] {
        self.by_source.get(&(role, source)).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// All x with (role, x, target) in the relation.
    pub fn predecessors(&self, role: RoleId, target: ClassId) -> &[ClassId] {
        self.by_target.get(&(role, target)).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// All (role, x) with (role, x, target) in the relation, over every
    /// role. This is the bottom propagator's traversal index.
    pub fn incoming(&self, target: ClassId) -> &[(RoleId, ClassId)] {
        self.incoming.get(&target).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Roles along which `source` has at least one successor.
    pub fn roles_from(&self, source: ClassId) -> impl Iterator<Item = RoleId> + '_ {
        self.roles_by_source.get(&source).into_iter().flatten().copied()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(n: u32) -> RoleId {
        RoleId(n)
    }

    fn c(n: u32) -> ClassId {
        ClassId(n)
    }

    #[test]
    fn test_add_reports_novelty() {
        let mut rel = RoleSuccessorRelation::new();
        assert!(rel.add(r(2), c(10), c(11)));
        assert!(!rel.add(r(2), c(10), c(11)));
        assert_eq!(rel.len(), 1);
    }

    #[test]
    fn test_forward_and_backward_lookup() {
        let mut rel = RoleSuccessorRelation::new();
        rel.add(r(2), c(10), c(11));
        rel.add(r(2), c(10), c(12));
        rel.add(r(3), c(13), c(11));

        assert_eq!(rel.successors(r(2), c(10)), &[c(11), c(12)]);
        assert_eq!(rel.predecessors(r(2), c(11)), &[c(10)]);
        assert_eq!(rel.predecessors(r(3), c(11)), &[c(13)]);
        assert!(rel.successors(r(9), c(10)).is_empty());
    }

    #[test]
    fn test_incoming_spans_all_roles() {
        let mut rel = RoleSuccessorRelation::new();
        rel.add(r(2), c(10), c(11));
        rel.add(r(3), c(13), c(11));

        let mut incoming = rel.incoming(c(11)).to_vec();
        incoming.sort_unstable();
        assert_eq!(incoming, vec![(r(2), c(10)), (r(3), c(13))]);
    }

    #[test]
    fn test_roles_from_tracks_sources() {
        let mut rel = RoleSuccessorRelation::new();
        rel.add(r(3), c(10), c(11));
        rel.add(r(2), c(10), c(12));
        rel.add(r(2), c(10), c(13));

        let roles: Vec<RoleId> = rel.roles_from(c(10)).collect();
        assert_eq!(roles, vec![r(2), r(3)]);
        assert_eq!(rel.roles_from(c(11)).count(), 0);
    }
}
