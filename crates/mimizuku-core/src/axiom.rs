//! 正規化公理モデル
//!
//! 上流の正規化器が任意の公理をここで定義する七種類の正規形に
//! 書き換えてから投入する。分類実行中、公理集合は不変。

use crate::id::{ClassId, RoleId};
use crate::ClassifierError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A normalized axiom. The enum is closed: the upstream normalizer can
/// only produce these seven kinds, so an unsupported construct is
/// unrepresentable here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormalizedAxiom {
    /// A ⊑ B
    SubClassOf(ClassId, ClassId),

    /// A₁ ⊓ … ⊓ Aₙ ⊑ B
    SubClassOfIntersection(Vec<ClassId>, ClassId),

    /// A ⊑ ∃r.B
    SubClassOfExistential(ClassId, RoleId, ClassId),

    /// ∃r.A ⊑ B
    ExistentialSubClassOf(RoleId, ClassId, ClassId),

    /// reflexive(r)
    ReflexiveRole(RoleId),

    /// r ⊑ s
    SubRoleOf(RoleId, RoleId),

    /// r₁ ∘ r₂ ⊑ s; s = r₁ = r₂ encodes transitivity of r₁
    SubRoleOfComposition(RoleId, RoleId, RoleId),
}

/// Finite axiom set plus the declarations that travel with it: ids that
/// must exist even when no axiom mentions them, declared inverse pairs,
/// and the declared functional-role set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ontology {
    /// All normalized axioms.
    pub axioms: Vec<NormalizedAxiom>,

    /// All declared class ids, Top and Bottom included.
    pub classes: BTreeSet<ClassId>,

    /// All declared role ids, Top and Bottom included.
    pub roles: BTreeSet<RoleId>,

    /// Roles declared functional (at most one successor per source).
    pub functional_roles: BTreeSet<RoleId>,

    /// Symmetric inverse pairs; both directions are stored.
    inverses: Vec<(RoleId, RoleId)>,
}

impl Ontology {
    pub fn new() -> Self {
        let mut classes = BTreeSet::new();
        classes.insert(ClassId::BOTTOM);
        classes.insert(ClassId::TOP);
        let mut roles = BTreeSet::new();
        roles.insert(RoleId::BOTTOM);
        roles.insert(RoleId::TOP);
        Self {
            axioms: Vec::new(),
            classes,
            roles,
            functional_roles: BTreeSet::new(),
            inverses: Vec::new(),
        }
    }

    pub fn declare_class(&mut self, class: ClassId) {
        self.classes.insert(class);
    }

    pub fn declare_role(&mut self, role: RoleId) {
        self.roles.insert(role);
    }

    /// Declares `role` and `inverse` to be inverses of each other.
    pub fn declare_inverse(&mut self, role: RoleId, inverse: RoleId) {
        self.declare_role(role);
        self.declare_role(inverse);
        if !self.inverses.contains(&(role, inverse)) {
            self.inverses.push((role, inverse));
        }
        if !self.inverses.contains(&(inverse, role)) {
            self.inverses.push((inverse, role));
        }
    }

    /// Declares `role` functional.
    pub fn declare_functional(&mut self, role: RoleId) {
        self.declare_role(role);
        self.functional_roles.insert(role);
    }

    /// Adds an axiom, declaring every id it mentions.
    pub fn add_axiom(&mut self, axiom: NormalizedAxiom) {
        match &axiom {
            NormalizedAxiom::SubClassOf(a, b) => {
                self.classes.insert(*a);
                self.classes.insert(*b);
            }
            NormalizedAxiom::SubClassOfIntersection(operands, b) => {
                self.classes.extend(operands.iter().copied());
                self.classes.insert(*b);
            }
            NormalizedAxiom::SubClassOfExistential(a, r, b) => {
                self.classes.insert(*a);
                self.classes.insert(*b);
                self.roles.insert(*r);
            }
            NormalizedAxiom::ExistentialSubClassOf(r, a, b) => {
                self.roles.insert(*r);
                self.classes.insert(*a);
                self.classes.insert(*b);
            }
            NormalizedAxiom::ReflexiveRole(r) => {
                self.roles.insert(*r);
            }
            NormalizedAxiom::SubRoleOf(r, s) => {
                self.roles.insert(*r);
                self.roles.insert(*s);
            }
            NormalizedAxiom::SubRoleOfComposition(r1, r2, s) => {
                self.roles.insert(*r1);
                self.roles.insert(*r2);
                self.roles.insert(*s);
            }
        }
        self.axioms.push(axiom);
    }

    /// Declared inverse of `role`, if any.
    pub fn inverse_of(&self, role: RoleId) -> Option<RoleId> {
        self.inverses.iter().find(|(r, _)| *r == role).map(|(_, s)| *s)
    }

    pub fn inverse_pairs(&self) -> impl Iterator<Item = (RoleId, RoleId)> + '_ {
        self.inverses.iter().copied()
    }

    /// Exclusive upper bound of the declared class-id range; synthetic
    /// witness ids are minted at or above this.
    pub fn class_limit(&self) -> u32 {
        self.classes.iter().next_back().map(|c| c.0 + 1).unwrap_or(ClassId::FIRST_NAMED)
    }

    pub fn role_limit(&self) -> u32 {
        self.roles.iter().next_back().map(|r| r.0 + 1).unwrap_or(RoleId::FIRST_NAMED)
    }

    /// Fails fast on malformed declarations. The public fields make it
    /// possible to assemble an inconsistent container by hand; every id a
    /// lookup could name must be inside the declared sets.
    pub fn validate(&self) -> Result<(), ClassifierError> {
        for role in &self.functional_roles {
            if !self.roles.contains(role) {
                return Err(ClassifierError::Configuration(format!(
                    "functional declaration names undeclared role {role}"
                )));
            }
        }
        for (role, inverse) in &self.inverses {
            if !self.roles.contains(role) || !self.roles.contains(inverse) {
                return Err(ClassifierError::Configuration(format!(
                    "inverse declaration ({role}, {inverse}) names an undeclared role"
                )));
            }
            if self.inverse_of(*inverse) != Some(*role) || self.inverse_of(*role) != Some(*inverse)
            {
                return Err(ClassifierError::Configuration(format!(
                    "inverse declaration for {role} is not symmetric"
                )));
            }
        }
        for axiom in &self.axioms {
            self.validate_axiom(axiom)?;
        }
        Ok(())
    }

    fn validate_axiom(&self, axiom: &NormalizedAxiom) -> Result<(), ClassifierError> {
        let check_class = |c: &ClassId| -> Result<(), ClassifierError> {
            if self.classes.contains(c) {
                Ok(())
            } else {
                Err(ClassifierError::Configuration(format!(
                    "axiom references undeclared class {c}"
                )))
            }
        };
        let check_role = |r: &RoleId| -> Result<(), ClassifierError> {
            if self.roles.contains(r) {
                Ok(())
            } else {
                Err(ClassifierError::Configuration(format!(
                    "axiom references undeclared role {r}"
                )))
            }
        };
        match axiom {
            NormalizedAxiom::SubClassOf(a, b) => {
                check_class(a)?;
                check_class(b)
            }
            NormalizedAxiom::SubClassOfIntersection(operands, b) => {
                if operands.is_empty() {
                    return Err(ClassifierError::Configuration(
                        "intersection axiom with no operands".to_string(),
                    ));
                }
                for op in operands {
                    check_class(op)?;
                }
                check_class(b)
            }
            NormalizedAxiom::SubClassOfExistential(a, r, b) => {
                check_class(a)?;
                check_role(r)?;
                check_class(b)
            }
            NormalizedAxiom::ExistentialSubClassOf(r, a, b) => {
                check_role(r)?;
                check_class(a)?;
                check_class(b)
            }
            NormalizedAxiom::ReflexiveRole(r) => check_role(r),
            NormalizedAxiom::SubRoleOf(r, s) => {
                check_role(r)?;
                check_role(s)
            }
            NormalizedAxiom::SubRoleOfComposition(r1, r2, s) => {
                check_role(r1)?;
                check_role(r2)?;
                check_role(s)
            }
        }
    }
}

impl Default for Ontology {
    fn default() -> Self {
        Self::new()
    }
}

/// Features actually present in an axiom set. Computed once, up front;
/// the engine picks its rule list from these flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expressivity {
    pub has_bottom: bool,
    pub has_inverse_roles: bool,
    pub has_functional_roles: bool,
    pub has_reflexive_roles: bool,
    pub has_compositions: bool,
}

impl Expressivity {
    pub fn of(ontology: &Ontology) -> Self {
        let mut flags = Expressivity {
            has_inverse_roles: !ontology.inverses.is_empty(),
            has_functional_roles: !ontology.functional_roles.is_empty(),
            ..Default::default()
        };
        for axiom in &ontology.axioms {
            match axiom {
                NormalizedAxiom::SubClassOf(a, b) => {
                    flags.has_bottom |= a.is_bottom() || b.is_bottom();
                }
                NormalizedAxiom::SubClassOfIntersection(operands, b) => {
                    flags.has_bottom |=
                        b.is_bottom() || operands.iter().any(|c| c.is_bottom());
                }
                NormalizedAxiom::SubClassOfExistential(a, _, b)
                | NormalizedAxiom::ExistentialSubClassOf(_, a, b) => {
                    flags.has_bottom |= a.is_bottom() || b.is_bottom();
                }
                NormalizedAxiom::ReflexiveRole(_) => flags.has_reflexive_roles = true,
                NormalizedAxiom::SubRoleOf(_, _) => {}
                NormalizedAxiom::SubRoleOfComposition(_, _, _) => {
                    flags.has_compositions = true;
                }
            }
        }
        flags
    }

    /// True when the basic rule list suffices (no inverse, functional or
    /// reflexive machinery needed).
    pub fn is_basic(&self) -> bool {
        !self.has_inverse_roles && !self.has_functional_roles && !self.has_reflexive_roles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(n: u32) -> ClassId {
        ClassId(n)
    }

    fn role(n: u32) -> RoleId {
        RoleId(n)
    }

    #[test]
    fn test_new_ontology_reserves_top_and_bottom() {
        let ontology = Ontology::new();
        assert!(ontology.classes.contains(&ClassId::BOTTOM));
        assert!(ontology.classes.contains(&ClassId::TOP));
        assert!(ontology.roles.contains(&RoleId::BOTTOM));
        assert!(ontology.roles.contains(&RoleId::TOP));
    }

    #[test]
    fn test_add_axiom_declares_mentioned_ids() {
        let mut ontology = Ontology::new();
        ontology.add_axiom(NormalizedAxiom::SubClassOfExistential(class(2), role(3), class(4)));

        assert!(ontology.classes.contains(&class(2)));
        assert!(ontology.classes.contains(&class(4)));
        assert!(ontology.roles.contains(&role(3)));
        assert!(ontology.validate().is_ok());
    }

    #[test]
    fn test_class_limit_covers_declared_range() {
        let mut ontology = Ontology::new();
        ontology.declare_class(class(7));
        assert_eq!(ontology.class_limit(), 8);
        assert_eq!(ontology.role_limit(), 2);
    }

    #[test]
    fn test_validate_rejects_undeclared_functional_role() {
        let mut ontology = Ontology::new();
        ontology.functional_roles.insert(role(9));
        let err = ontology.validate().unwrap_err();
        assert!(err.to_string().contains("undeclared role"));
    }

    #[test]
    fn test_validate_rejects_hand_built_axiom_with_undeclared_ids() {
        let mut ontology = Ontology::new();
        // bypass add_axiom on purpose
        ontology.axioms.push(NormalizedAxiom::SubClassOf(class(40), class(41)));
        assert!(ontology.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_intersection() {
        let mut ontology = Ontology::new();
        ontology.axioms.push(NormalizedAxiom::SubClassOfIntersection(vec![], ClassId::TOP));
        assert!(ontology.validate().is_err());
    }

    #[test]
    fn test_expressivity_flags() {
        let mut ontology = Ontology::new();
        ontology.add_axiom(NormalizedAxiom::SubClassOf(class(2), class(3)));
        let flags = Expressivity::of(&ontology);
        assert!(flags.is_basic());
        assert!(!flags.has_bottom);

        ontology.add_axiom(NormalizedAxiom::SubClassOf(class(3), ClassId::BOTTOM));
        ontology.add_axiom(NormalizedAxiom::SubRoleOfComposition(role(2), role(2), role(2)));
        ontology.declare_inverse(role(2), role(3));
        ontology.declare_functional(role(4));
        let flags = Expressivity::of(&ontology);
        assert!(flags.has_bottom);
        assert!(flags.has_compositions);
        assert!(flags.has_inverse_roles);
        assert!(flags.has_functional_roles);
        assert!(!flags.is_basic());
    }

    #[test]
    fn test_axiom_round_trips_through_serde() {
        let axiom = NormalizedAxiom::SubRoleOfComposition(role(2), role(3), role(4));
        let json = serde_json::to_string(&axiom).unwrap();
        let back: NormalizedAxiom = serde_json::from_str(&json).unwrap();
        assert_eq!(axiom, back);
    }
}
