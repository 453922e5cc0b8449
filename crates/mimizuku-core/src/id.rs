//! クラス/ロール識別子空間

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of a class (concept). The space is dense and non-negative;
/// ids above the declared range are synthetic witness nodes minted by the
/// engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClassId(pub u32);

impl ClassId {
    /// owl:Nothing (⊥)
    pub const BOTTOM: ClassId = ClassId(0);
    /// owl:Thing (⊤)
    pub const TOP: ClassId = ClassId(1);

    /// First id available to declared (named) classes.
    pub const FIRST_NAMED: u32 = 2;

    pub fn is_bottom(self) -> bool {
        self == Self::BOTTOM
    }

    pub fn is_top(self) -> bool {
        self == Self::TOP
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

/// Identifier of a role (object property). Ids above the declared range
/// are synthetic inverse placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoleId(pub u32);

impl RoleId {
    /// owl:bottomObjectProperty
    pub const BOTTOM: RoleId = RoleId(0);
    /// owl:topObjectProperty
    pub const TOP: RoleId = RoleId(1);

    /// First id available to declared roles.
    pub const FIRST_NAMED: u32 = 2;

    pub fn is_bottom(self) -> bool {
        self == Self::BOTTOM
    }

    pub fn is_top(self) -> bool {
        self == Self::TOP
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}

/// Generator of fresh synthetic identifiers for one classification run.
///
/// Synthetic class ids name witness nodes; synthetic role ids name inverse
/// placeholders allocated when a rule asks for the inverse of a role that
/// has none declared. The pool also owns the symmetric inverse map, seeded
/// from the declarations and extended by lazy allocation.
#[derive(Debug, Clone)]
pub struct EntityPool {
    declared_class_limit: u32,
    declared_role_limit: u32,
    next_class: u32,
    next_role: u32,
    inverse: BTreeMap<RoleId, RoleId>,
}

impl EntityPool {
    /// Creates a pool whose synthetic ranges start right above the highest
    /// declared id in each space.
    pub fn new(declared_class_limit: u32, declared_role_limit: u32) -> Self {
        Self {
            declared_class_limit,
            declared_role_limit,
            next_class: declared_class_limit,
            next_role: declared_role_limit,
            inverse: BTreeMap::new(),
        }
    }

    /// Records a declared inverse pair, both directions.
    pub fn declare_inverse(&mut self, role: RoleId, inverse: RoleId) {
        self.inverse.insert(role, inverse);
        self.inverse.insert(inverse, role);
    }

    /// Mints a fresh synthetic class id (witness node).
    pub fn fresh_class(&mut self) -> ClassId {
        let id = ClassId(self.next_class);
        self.next_class += 1;
        id
    }

    /// Mints a fresh synthetic role id.
    pub fn fresh_role(&mut self) -> RoleId {
        let id = RoleId(self.next_role);
        self.next_role += 1;
        id
    }

    /// The declared inverse of `role`, if one is already known. Never
    /// allocates; rules that only match existing axioms use this.
    pub fn known_inverse(&self, role: RoleId) -> Option<RoleId> {
        self.inverse.get(&role).copied()
    }

    /// The inverse of `role`, allocating and remembering a fresh synthetic
    /// role the first time none is known. The result is symmetric:
    /// `inverse_of(inverse_of(r)) == r`.
    pub fn inverse_of(&mut self, role: RoleId) -> RoleId {
        if let Some(inv) = self.inverse.get(&role) {
            return *inv;
        }
        let inv = self.fresh_role();
        self.declare_inverse(role, inv);
        inv
    }

    /// True for ids below the synthetic range, i.e. ids the caller
    /// declared and may see in query results.
    pub fn is_declared_class(&self, id: ClassId) -> bool {
        id.0 < self.declared_class_limit
    }

    pub fn is_declared_role(&self, id: RoleId) -> bool {
        id.0 < self.declared_role_limit
    }

    /// True for witness-node ids minted by `fresh_class`.
    pub fn is_synthetic_class(&self, id: ClassId) -> bool {
        !self.is_declared_class(id)
    }

    pub fn is_synthetic_role(&self, id: RoleId) -> bool {
        !self.is_declared_role(id)
    }

    /// Ids minted so far, synthetic range only.
    pub fn synthetic_class_count(&self) -> u32 {
        self.next_class - self.declared_class_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_ids() {
        assert!(ClassId::BOTTOM.is_bottom());
        assert!(ClassId::TOP.is_top());
        assert!(!ClassId(5).is_bottom());
        assert!(RoleId::BOTTOM.is_bottom());
        assert!(RoleId::TOP.is_top());
    }

    #[test]
    fn test_fresh_ids_start_above_declared_range() {
        let mut pool = EntityPool::new(10, 4);
        assert_eq!(pool.fresh_class(), ClassId(10));
        assert_eq!(pool.fresh_class(), ClassId(11));
        assert_eq!(pool.fresh_role(), RoleId(4));
        assert!(pool.is_synthetic_class(ClassId(10)));
        assert!(pool.is_declared_class(ClassId(9)));
        assert_eq!(pool.synthetic_class_count(), 2);
    }

    #[test]
    fn test_declared_inverse_is_symmetric() {
        let mut pool = EntityPool::new(2, 6);
        pool.declare_inverse(RoleId(2), RoleId(3));
        assert_eq!(pool.known_inverse(RoleId(2)), Some(RoleId(3)));
        assert_eq!(pool.known_inverse(RoleId(3)), Some(RoleId(2)));
    }

    #[test]
    fn test_lazy_inverse_allocation() {
        let mut pool = EntityPool::new(2, 6);
        assert_eq!(pool.known_inverse(RoleId(4)), None);

        let inv = pool.inverse_of(RoleId(4));
        assert!(pool.is_synthetic_role(inv));
        // symmetric and stable
        assert_eq!(pool.inverse_of(inv), RoleId(4));
        assert_eq!(pool.inverse_of(RoleId(4)), inv);
    }
}
