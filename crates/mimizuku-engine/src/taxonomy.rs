//! 分類結果の問い合わせ面
//!
//! 飽和完了後の凍結ステータスに対する読み取り専用 API。合成証人ノードと
//! 合成逆ロールはここで必ず濾過され、宣言済み id だけが外に出る。

use crate::saturation::SaturationStats;
use crate::status::ClassifierStatus;
use itertools::Itertools;
use mimizuku_core::{ClassId, RoleId};
use std::collections::BTreeSet;

/// The result of one classification run: the frozen status plus the
/// declared id sets that bound what is reportable.
#[derive(Debug, Clone)]
pub struct Classification {
    status: ClassifierStatus,
    classes: BTreeSet<ClassId>,
    roles: BTreeSet<RoleId>,
    stats: SaturationStats,
}

impl Classification {
    pub fn new(
        status: ClassifierStatus,
        classes: BTreeSet<ClassId>,
        roles: BTreeSet<RoleId>,
        stats: SaturationStats,
    ) -> Self {
        Self { status, classes, roles, stats }
    }

    /// False iff Bottom is among the class's subsumers. Bottom itself is
    /// unsatisfiable by reflexivity.
    pub fn is_satisfiable(&self, class: ClassId) -> bool {
        !self.status.has_subsumer(class, ClassId::BOTTOM)
    }

    fn subsumed_by(&self, sub: ClassId, sup: ClassId) -> bool {
        // an unsatisfiable class is below everything: sub ⊑ ⊥ ⊑ sup
        !self.is_satisfiable(sub) || self.status.has_subsumer(sub, sup)
    }

    /// All declared classes subsuming `class`, itself included.
    pub fn ancestors(&self, class: ClassId) -> BTreeSet<ClassId> {
        if !self.classes.contains(&class) {
            return BTreeSet::new();
        }
        if !self.is_satisfiable(class) {
            return self.classes.clone();
        }
        self.status
            .subsumers(class)
            .filter(|a| self.classes.contains(a))
            .collect()
    }

    /// All declared classes subsumed by `class`, itself included.
    pub fn descendants(&self, class: ClassId) -> BTreeSet<ClassId> {
        if !self.classes.contains(&class) {
            return BTreeSet::new();
        }
        self.classes
            .iter()
            .copied()
            .filter(|x| self.subsumed_by(*x, class))
            .collect()
    }

    /// Mutually subsuming declared classes, `class` included.
    pub fn equivalents(&self, class: ClassId) -> BTreeSet<ClassId> {
        if !self.classes.contains(&class) {
            return BTreeSet::new();
        }
        self.classes
            .iter()
            .copied()
            .filter(|x| self.subsumed_by(class, *x) && self.subsumed_by(*x, class))
            .collect()
    }

    /// Minimal strict ancestors: no other strict ancestor lies between.
    pub fn direct_ancestors(&self, class: ClassId) -> BTreeSet<ClassId> {
        let equivalents = self.equivalents(class);
        let candidates: Vec<ClassId> = self
            .ancestors(class)
            .into_iter()
            .filter(|a| !equivalents.contains(a))
            .collect();
        candidates
            .iter()
            .copied()
            .filter(|a| {
                !candidates.iter().any(|other| {
                    other != a
                        && !self.equivalents(*a).contains(other)
                        && self.subsumed_by(*other, *a)
                })
            })
            .collect()
    }

    /// Maximal strict descendants: no other strict descendant lies
    /// between.
    pub fn direct_descendants(&self, class: ClassId) -> BTreeSet<ClassId> {
        let equivalents = self.equivalents(class);
        let candidates: Vec<ClassId> = self
            .descendants(class)
            .into_iter()
            .filter(|d| !equivalents.contains(d))
            .collect();
        candidates
            .iter()
            .copied()
            .filter(|d| {
                !candidates.iter().any(|other| {
                    other != d
                        && !self.equivalents(*d).contains(other)
                        && self.subsumed_by(*d, *other)
                })
            })
            .collect()
    }

    /// Declared classes grouped into equivalence groups, each group
    /// sorted, groups ordered by their smallest member.
    pub fn equivalence_classes(&self) -> Vec<Vec<ClassId>> {
        self.classes
            .iter()
            .copied()
            .map(|c| {
                let representative =
                    self.equivalents(c).into_iter().next().unwrap_or(c);
                (representative, c)
            })
            .into_group_map()
            .into_iter()
            .sorted()
            .map(|(_, group)| group)
            .collect()
    }

    /// All declared roles subsuming `role`, itself included. Synthetic
    /// inverse placeholders never appear here.
    pub fn role_ancestors(&self, role: RoleId) -> BTreeSet<RoleId> {
        if !self.roles.contains(&role) {
            return BTreeSet::new();
        }
        self.status
            .super_roles(role)
            .filter(|s| self.roles.contains(s))
            .collect()
    }

    pub fn role_descendants(&self, role: RoleId) -> BTreeSet<RoleId> {
        if !self.roles.contains(&role) {
            return BTreeSet::new();
        }
        self.status
            .sub_roles(role)
            .filter(|s| self.roles.contains(s))
            .collect()
    }

    pub fn role_equivalents(&self, role: RoleId) -> BTreeSet<RoleId> {
        if !self.roles.contains(&role) {
            return BTreeSet::new();
        }
        self.role_ancestors(role)
            .into_iter()
            .filter(|s| self.status.is_sub_role_of(*s, role))
            .collect()
    }

    pub fn declared_classes(&self) -> &BTreeSet<ClassId> {
        &self.classes
    }

    pub fn declared_roles(&self) -> &BTreeSet<RoleId> {
        &self.roles
    }

    pub fn stats(&self) -> &SaturationStats {
        &self.stats
    }
}
