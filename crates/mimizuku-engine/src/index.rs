//! 正規化公理索引
//!
//! 公理集合を「規則が発火するために現れなければならない識別子」で
//! 索引付けする。飽和中は読み取り専用。

use mimizuku_core::{ClassId, ClassifierError, NormalizedAxiom, Ontology, RoleId};
use std::collections::{BTreeSet, HashMap};

/// The indexed, read-only axiom store. `load` is the only constructor, so
/// an unusable (not-yet-loaded) store cannot be observed; a malformed
/// ontology fails the load instead.
#[derive(Debug, Clone, Default)]
pub struct AxiomIndex {
    gci0_by_subclass: HashMap<ClassId, Vec<ClassId>>,
    gci1: Vec<(Vec<ClassId>, ClassId)>,
    gci1_by_operand: HashMap<ClassId, Vec<usize>>,
    gci2_by_subclass: HashMap<ClassId, Vec<(RoleId, ClassId)>>,
    gci3_by_role_filler: HashMap<(RoleId, ClassId), Vec<ClassId>>,
    gci3_by_role: HashMap<RoleId, Vec<(ClassId, ClassId)>>,
    gci3_by_filler: HashMap<ClassId, Vec<(RoleId, ClassId)>>,
    compositions_by_left: HashMap<RoleId, Vec<(RoleId, RoleId)>>,
    compositions_by_right: HashMap<RoleId, Vec<(RoleId, RoleId)>>,
    role_inclusions: Vec<(RoleId, RoleId)>,
    reflexive: BTreeSet<RoleId>,
    transitive: BTreeSet<RoleId>,
    functional: BTreeSet<RoleId>,
}

impl AxiomIndex {
    /// Validates and indexes the axiom set. The load is total over the
    /// closed axiom-kind set; only malformed declarations can fail it.
    pub fn load(ontology: &Ontology) -> Result<Self, ClassifierError> {
        ontology.validate()?;

        let mut index = AxiomIndex {
            functional: ontology.functional_roles.clone(),
            ..Default::default()
        };

        for axiom in &ontology.axioms {
            match axiom {
                NormalizedAxiom::SubClassOf(a, b) => {
                    index.gci0_by_subclass.entry(*a).or_default().push(*b);
                }
                NormalizedAxiom::SubClassOfIntersection(operands, b) => {
                    let ix = index.gci1.len();
                    for operand in operands {
                        index.gci1_by_operand.entry(*operand).or_default().push(ix);
                    }
                    index.gci1.push((operands.clone(), *b));
                }
                NormalizedAxiom::SubClassOfExistential(a, r, b) => {
                    index.gci2_by_subclass.entry(*a).or_default().push((*r, *b));
                }
                NormalizedAxiom::ExistentialSubClassOf(r, a, b) => {
                    index.gci3_by_role_filler.entry((*r, *a)).or_default().push(*b);
                    index.gci3_by_role.entry(*r).or_default().push((*a, *b));
                    index.gci3_by_filler.entry(*a).or_default().push((*r, *b));
                }
                NormalizedAxiom::ReflexiveRole(r) => {
                    index.reflexive.insert(*r);
                }
                NormalizedAxiom::SubRoleOf(r, s) => {
                    index.role_inclusions.push((*r, *s));
                }
                NormalizedAxiom::SubRoleOfComposition(r1, r2, s) => {
                    if r1 == r2 && r2 == s {
                        index.transitive.insert(*s);
                    }
                    index.compositions_by_left.entry(*r1).or_default().push((*r2, *s));
                    index.compositions_by_right.entry(*r2).or_default().push((*r1, *s));
                }
            }
        }
        Ok(index)
    }

    /// All B with A ⊑ B.
    pub fn gci0_by_subclass(&self, a: ClassId) -> &[ClassId] {
        self.gci0_by_subclass.get(&a).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// All (operands, B) of intersection axioms mentioning `a` as an
    /// operand.
    pub fn gci1_by_operand(&self, a: ClassId) -> impl Iterator<Item = (&[ClassId], ClassId)> {
        self.gci1_by_operand
            .get(&a)
            .into_iter()
            .flatten()
            .map(|ix| (self.gci1[*ix].0.as_slice(), self.gci1[*ix].1))
    }

    /// All (r, B) with A ⊑ ∃r.B.
    pub fn gci2_by_subclass(&self, a: ClassId) -> &[(RoleId, ClassId)] {
        self.gci2_by_subclass.get(&a).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// All B with ∃r.A ⊑ B.
    pub fn gci3_by_role_filler(&self, role: RoleId, filler: ClassId) -> &[ClassId] {
        self.gci3_by_role_filler
            .get(&(role, filler))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// All (A, B) with ∃r.A ⊑ B, keyed by the left role alone. Used by the
    /// inverse-matching rules.
    pub fn gci3_by_role(&self, role: RoleId) -> &[(ClassId, ClassId)] {
        self.gci3_by_role.get(&role).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// All (r, B) with ∃r.A ⊑ B, keyed by the filler A.
    pub fn gci3_by_filler(&self, filler: ClassId) -> &[(RoleId, ClassId)] {
        self.gci3_by_filler.get(&filler).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// All (r2, s) with r1 ∘ r2 ⊑ s, keyed by r1.
    pub fn compositions_by_left(&self, r1: RoleId) -> &[(RoleId, RoleId)] {
        self.compositions_by_left.get(&r1).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// All (r1, s) with r1 ∘ r2 ⊑ s, keyed by r2.
    pub fn compositions_by_right(&self, r2: RoleId) -> &[(RoleId, RoleId)] {
        self.compositions_by_right.get(&r2).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Declared role inclusions r ⊑ s, for building the role graph.
    pub fn role_inclusions(&self) -> &[(RoleId, RoleId)] {
        &self.role_inclusions
    }

    pub fn is_functional(&self, role: RoleId) -> bool {
        self.functional.contains(&role)
    }

    /// Transitivity is the s = r1 = r2 composition.
    pub fn is_transitive(&self, role: RoleId) -> bool {
        self.transitive.contains(&role)
    }

    pub fn is_reflexive(&self, role: RoleId) -> bool {
        self.reflexive.contains(&role)
    }

    pub fn reflexive_roles(&self) -> impl Iterator<Item = RoleId> + '_ {
        self.reflexive.iter().copied()
    }
}
