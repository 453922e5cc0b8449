//! 完備化規則
//!
//! 規則は状態を直接変更しない。新しく処理された一つのファクトに対して
//! 提案 (Proposal) のリストを返すだけで、新規性判定・証人の intern・
//! 逆ロールの割り当て・実際の挿入はすべてワークリストドライバが行う。
//!
//! 規則は二群に分かれる:
//! - S 規則: 新しい包含ファクト (x, A) で発火
//! - R 規則: 新しいロール後続ファクト (r, x, y) で発火

use crate::index::AxiomIndex;
use crate::status::ClassifierStatus;
use mimizuku_core::{ClassId, Expressivity, RoleId};

/// One newly-derived fact, as handed to the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fact {
    /// (x, A): node x is subsumed by class A.
    Subsumption { node: ClassId, class: ClassId },
    /// (r, x, y): node x has an r-successor y.
    Link { role: RoleId, source: ClassId, target: ClassId },
}

/// How a merge proposal names the marker role to record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerRole {
    /// The inverse of a link role; the driver resolves it, allocating a
    /// synthetic inverse if none is declared.
    InverseOf(RoleId),
    /// An already-resolved role id (markers propagated along transitive
    /// chains reuse the existing inverse).
    Role(RoleId),
}

/// A candidate deduction. Plain facts insert directly; the witness
/// variants tell the driver which canonical node to intern first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Proposal {
    Subsumption {
        node: ClassId,
        class: ClassId,
    },
    Link {
        role: RoleId,
        source: ClassId,
        target: ClassId,
    },
    /// Intern the canonical witness for `filler`, add (role, source, w)
    /// and (w, filler).
    ExistentialWitness {
        source: ClassId,
        role: RoleId,
        filler: ClassId,
    },
    /// Fold `filler` into the unique Top-rooted successor of `source`
    /// under functional `role`, reusing `existing` if present.
    FunctionalWitness {
        source: ClassId,
        role: RoleId,
        filler: ClassId,
        existing: Option<ClassId>,
    },
    /// Merge `target` into a witness carrying its markers plus one more,
    /// copy its subsumers, add `subsumer`, and relink (role, source, ·).
    MergeWitness {
        source: ClassId,
        role: RoleId,
        target: ClassId,
        marker_role: MarkerRole,
        marker_filler: ClassId,
        subsumer: ClassId,
    },
    /// Unify several Top-rooted witnesses of one source under a common
    /// functional super-role: union of marker sets, subsumers copied,
    /// every listed link redirected to the unified node.
    UnifyWitnesses {
        source: ClassId,
        links: Vec<(RoleId, ClassId)>,
    },
}

/// One completion rule: a pure function of (status, fact) into proposals.
pub trait CompletionRule {
    fn name(&self) -> &'static str;
    fn apply(&self, status: &ClassifierStatus, index: &AxiomIndex, fact: &Fact) -> Vec<Proposal>;
}

/// A ⊑ B: every node subsumed by A is subsumed by B.
pub struct SubClassRule;

impl CompletionRule for SubClassRule {
    fn name(&self) -> &'static str {
        "subclass"
    }

    fn apply(&self, _status: &ClassifierStatus, index: &AxiomIndex, fact: &Fact) -> Vec<Proposal> {
        let Fact::Subsumption { node, class } = fact else {
            return Vec::new();
        };
        index
            .gci0_by_subclass(*class)
            .iter()
            .map(|b| Proposal::Subsumption { node: *node, class: *b })
            .collect()
    }
}

/// A₁ ⊓ … ⊓ Aₙ ⊑ B: fires once every operand is among x's subsumers.
pub struct IntersectionRule;

impl CompletionRule for IntersectionRule {
    fn name(&self) -> &'static str {
        "intersection"
    }

    fn apply(&self, status: &ClassifierStatus, index: &AxiomIndex, fact: &Fact) -> Vec<Proposal> {
        let Fact::Subsumption { node, class } = fact else {
            return Vec::new();
        };
        let mut proposals = Vec::new();
        for (operands, b) in index.gci1_by_operand(*class) {
            if operands.iter().all(|op| status.has_subsumer(*node, *op)) {
                proposals.push(Proposal::Subsumption { node: *node, class: b });
            }
        }
        proposals
    }
}

/// A ⊑ ∃r.B: materialize the existential through a canonical witness.
/// For functional r the successor is unique, so the filler is folded into
/// the one Top-rooted witness instead of minting a parallel node.
pub struct ExistentialRule;

impl CompletionRule for ExistentialRule {
    fn name(&self) -> &'static str {
        "existential"
    }

    fn apply(&self, status: &ClassifierStatus, index: &AxiomIndex, fact: &Fact) -> Vec<Proposal> {
        let Fact::Subsumption { node, class } = fact else {
            return Vec::new();
        };
        let mut proposals = Vec::new();
        for (role, filler) in index.gci2_by_subclass(*class) {
            if index.is_functional(*role) {
                let existing = status
                    .successors_by_role(*role, *node)
                    .iter()
                    .copied()
                    .find(|y| status.is_top_rooted_witness(*y));
                proposals.push(Proposal::FunctionalWitness {
                    source: *node,
                    role: *role,
                    filler: *filler,
                    existing,
                });
            } else {
                proposals.push(Proposal::ExistentialWitness {
                    source: *node,
                    role: *role,
                    filler: *filler,
                });
            }
        }
        proposals
    }
}

/// ∃s.B ⊑ C, fired from the subsumption side: a new (y, B) completes the
/// pattern for every r-predecessor of y with r ⊑ s.
pub struct PropagationSubRule;

impl CompletionRule for PropagationSubRule {
    fn name(&self) -> &'static str {
        "propagation-sub"
    }

    fn apply(&self, status: &ClassifierStatus, index: &AxiomIndex, fact: &Fact) -> Vec<Proposal> {
        let Fact::Subsumption { node, class } = fact else {
            return Vec::new();
        };
        let mut proposals = Vec::new();
        for (s, c) in index.gci3_by_filler(*class) {
            for r in status.sub_roles(*s) {
                for x in status.predecessors_by_role(r, *node) {
                    proposals.push(Proposal::Subsumption { node: *x, class: *c });
                }
            }
        }
        proposals
    }
}

/// ∃s.B ⊑ C, fired from the link side: a new (r, x, y) completes the
/// pattern for every B already among y's subsumers.
pub struct PropagationLinkRule;

impl CompletionRule for PropagationLinkRule {
    fn name(&self) -> &'static str {
        "propagation-link"
    }

    fn apply(&self, status: &ClassifierStatus, index: &AxiomIndex, fact: &Fact) -> Vec<Proposal> {
        let Fact::Link { role, source, target } = fact else {
            return Vec::new();
        };
        let mut proposals = Vec::new();
        for s in status.super_roles(*role) {
            for b in status.subsumers(*target) {
                for c in index.gci3_by_role_filler(s, b) {
                    proposals.push(Proposal::Subsumption { node: *source, class: *c });
                }
            }
        }
        proposals
    }
}

/// r₁ ∘ r₂ ⊑ s, matched through the role hierarchy; transitivity is the
/// s = r₁ = r₂ case. Fired from either side of the chain.
pub struct CompositionRule;

impl CompletionRule for CompositionRule {
    fn name(&self) -> &'static str {
        "composition"
    }

    fn apply(&self, status: &ClassifierStatus, index: &AxiomIndex, fact: &Fact) -> Vec<Proposal> {
        let Fact::Link { role, source, target } = fact else {
            return Vec::new();
        };
        let mut proposals = Vec::new();
        // this link is the left leg
        for s1 in status.super_roles(*role) {
            for (r2, sup) in index.compositions_by_left(s1) {
                for t2 in status.sub_roles(*r2) {
                    for z in status.successors_by_role(t2, *target) {
                        proposals.push(Proposal::Link { role: *sup, source: *source, target: *z });
                    }
                }
            }
        }
        // this link is the right leg
        for s2 in status.super_roles(*role) {
            for (r1, sup) in index.compositions_by_right(s2) {
                for t1 in status.sub_roles(*r1) {
                    for w in status.predecessors_by_role(t1, *source) {
                        proposals.push(Proposal::Link { role: *sup, source: *w, target: *target });
                    }
                }
            }
        }
        proposals
    }
}

/// ∃s⁻.A ⊑ B, fired from the link side: a new (r, x, y) with r ⊑ s and
/// A among x's subsumers forces B onto y, through a merged witness that
/// records the back-edge marker.
pub struct InverseMergeLinkRule;

impl CompletionRule for InverseMergeLinkRule {
    fn name(&self) -> &'static str {
        "inverse-merge-link"
    }

    fn apply(&self, status: &ClassifierStatus, index: &AxiomIndex, fact: &Fact) -> Vec<Proposal> {
        let Fact::Link { role, source, target } = fact else {
            return Vec::new();
        };
        let mut proposals = Vec::new();
        for s in status.super_roles(*role) {
            let Some(t) = status.known_inverse(s) else { continue };
            for (a, b) in index.gci3_by_role(t) {
                if status.has_subsumer(*source, *a) && !status.has_subsumer(*target, *b) {
                    proposals.push(Proposal::MergeWitness {
                        source: *source,
                        role: *role,
                        target: *target,
                        marker_role: MarkerRole::InverseOf(*role),
                        marker_filler: *a,
                        subsumer: *b,
                    });
                }
            }
        }
        proposals
    }
}

/// ∃s⁻.A ⊑ B, fired from the subsumption side: a new (x, A) completes the
/// pattern for every existing link (r, x, y) with r ⊑ s.
pub struct InverseMergeSubRule;

impl CompletionRule for InverseMergeSubRule {
    fn name(&self) -> &'static str {
        "inverse-merge-sub"
    }

    fn apply(&self, status: &ClassifierStatus, index: &AxiomIndex, fact: &Fact) -> Vec<Proposal> {
        let Fact::Subsumption { node, class } = fact else {
            return Vec::new();
        };
        let mut proposals = Vec::new();
        for (t, b) in index.gci3_by_filler(*class) {
            let Some(s) = status.known_inverse(*t) else { continue };
            for r in status.sub_roles(s) {
                for y in status.successors_by_role(r, *node) {
                    if !status.has_subsumer(*y, *b) {
                        proposals.push(Proposal::MergeWitness {
                            source: *node,
                            role: r,
                            target: *y,
                            marker_role: MarkerRole::InverseOf(r),
                            marker_filler: *class,
                            subsumer: *b,
                        });
                    }
                }
            }
        }
        proposals
    }
}

/// Marker propagation across a transitive super-role: the inverse
/// pattern recorded on x also reaches x's successors along roles below
/// the transitive s.
pub struct TransitiveInverseRule;

impl CompletionRule for TransitiveInverseRule {
    fn name(&self) -> &'static str {
        "transitive-inverse"
    }

    fn apply(&self, status: &ClassifierStatus, index: &AxiomIndex, fact: &Fact) -> Vec<Proposal> {
        let Fact::Link { role, source, target } = fact else {
            return Vec::new();
        };
        let markers = status.markers_of(*source);
        if markers.is_empty() {
            return Vec::new();
        }
        let mut proposals = Vec::new();
        for s in status.super_roles(*role) {
            if !index.is_transitive(s) {
                continue;
            }
            let Some(t) = status.known_inverse(s) else { continue };
            for marker in markers.iter().filter(|m| m.role == t) {
                for b in index.gci3_by_role_filler(t, marker.filler) {
                    if !status.has_subsumer(*target, *b) {
                        proposals.push(Proposal::MergeWitness {
                            source: *source,
                            role: *role,
                            target: *target,
                            marker_role: MarkerRole::Role(t),
                            marker_filler: marker.filler,
                            subsumer: *b,
                        });
                    }
                }
            }
        }
        proposals
    }
}

/// A ⊑ ∃r₂⁻.B with a functional inverse in the middle of the hierarchy:
/// the existential resolves on x itself, no witness needed.
pub struct FunctionalInverseRule;

impl CompletionRule for FunctionalInverseRule {
    fn name(&self) -> &'static str {
        "functional-inverse"
    }

    fn apply(&self, status: &ClassifierStatus, index: &AxiomIndex, fact: &Fact) -> Vec<Proposal> {
        let Fact::Subsumption { node, class } = fact else {
            return Vec::new();
        };
        let mut proposals = Vec::new();
        for (t, b) in index.gci2_by_subclass(*class) {
            let Some(r2) = status.known_inverse(*t) else { continue };
            let resolved = status.roles_from(*node).any(|r1| {
                status.super_roles(r1).any(|s| {
                    status.is_sub_role_of(s, r2)
                        && status
                            .known_inverse(s)
                            .map(|s_inv| index.is_functional(s_inv))
                            .unwrap_or(false)
                })
            });
            if resolved {
                proposals.push(Proposal::Subsumption { node: *node, class: *b });
            }
        }
        proposals
    }
}

/// Functionality forces all of a source's successors below one functional
/// super-role to denote the same individual: unify their Top-rooted
/// witnesses. The n-ary batched form; the binary case is n = 2.
pub struct FunctionalMergeRule;

impl CompletionRule for FunctionalMergeRule {
    fn name(&self) -> &'static str {
        "functional-merge"
    }

    fn apply(&self, status: &ClassifierStatus, index: &AxiomIndex, fact: &Fact) -> Vec<Proposal> {
        let Fact::Link { role, source, target: _ } = fact else {
            return Vec::new();
        };
        let mut proposals = Vec::new();
        for s in status.super_roles(*role) {
            if !index.is_functional(s) {
                continue;
            }
            let mut links: Vec<(RoleId, ClassId)> = Vec::new();
            for r2 in status.sub_roles(s) {
                for z in status.successors_by_role(r2, *source) {
                    if status.is_top_rooted_witness(*z) && !links.contains(&(r2, *z)) {
                        links.push((r2, *z));
                    }
                }
            }
            let mut targets: Vec<ClassId> = links.iter().map(|(_, z)| *z).collect();
            targets.sort_unstable();
            targets.dedup();
            if targets.len() >= 2 {
                proposals.push(Proposal::UnifyWitnesses { source: *source, links });
            }
        }
        proposals
    }
}

/// The fixed rule lists, selected once from the detected expressivity:
/// the basic list suffices without inverse/functional/reflexive
/// machinery, the extended battery otherwise.
pub fn subsumption_rules(expressivity: &Expressivity) -> Vec<Box<dyn CompletionRule>> {
    let mut rules: Vec<Box<dyn CompletionRule>> = vec![
        Box::new(SubClassRule),
        Box::new(IntersectionRule),
        Box::new(ExistentialRule),
        Box::new(PropagationSubRule),
    ];
    if !expressivity.is_basic() {
        rules.push(Box::new(InverseMergeSubRule));
        rules.push(Box::new(FunctionalInverseRule));
    }
    rules
}

pub fn link_rules(expressivity: &Expressivity) -> Vec<Box<dyn CompletionRule>> {
    let mut rules: Vec<Box<dyn CompletionRule>> = vec![
        Box::new(PropagationLinkRule),
        Box::new(CompositionRule),
    ];
    if !expressivity.is_basic() {
        rules.push(Box::new(InverseMergeLinkRule));
        rules.push(Box::new(TransitiveInverseRule));
        rules.push(Box::new(FunctionalMergeRule));
    }
    rules
}
