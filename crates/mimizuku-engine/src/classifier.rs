//! 分類器
//!
//! 一回の分類実行を組み立てる: 公理索引の構築、ロール階層の事前飽和、
//! ステータスの初期化、ワークリスト駆動、そして凍結結果の返却。

use crate::graph::SubsumerGraph;
use crate::index::AxiomIndex;
use crate::saturation::{ClassifierConfig, Saturator};
use crate::status::ClassifierStatus;
use crate::taxonomy::Classification;
use mimizuku_core::{ClassId, ClassifierError, EntityPool, Expressivity, Ontology, RoleId};
use tracing::{debug, info};

/// One-shot classifier over a fixed axiom set. Re-classification after
/// axiom edits means building a new run; nothing is incremental.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: ClassifierConfig,
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Classifies the ontology: validates, indexes, pre-saturates the
    /// role hierarchy, runs the completion rules to fixpoint and freezes
    /// the result.
    pub fn classify(&self, ontology: &Ontology) -> Result<Classification, ClassifierError> {
        let index = AxiomIndex::load(ontology)?;
        let expressivity = Expressivity::of(ontology);
        info!(
            classes = ontology.classes.len(),
            roles = ontology.roles.len(),
            axioms = ontology.axioms.len(),
            basic = expressivity.is_basic(),
            "classification started"
        );

        // the role hierarchy is static: close it once, before any class
        // saturation
        let mut roles = SubsumerGraph::new(RoleId::TOP);
        for role in &ontology.roles {
            roles.add_edge(*role, *role);
            roles.add_edge(*role, RoleId::TOP);
        }
        for (sub, sup) in index.role_inclusions() {
            roles.add_edge(*sub, *sup);
        }
        roles.saturate();
        debug!(roles = roles.node_count(), "role hierarchy closed");

        let mut pool = EntityPool::new(ontology.class_limit(), ontology.role_limit());
        for (role, inverse) in ontology.inverse_pairs() {
            pool.declare_inverse(role, inverse);
        }

        let status = ClassifierStatus::new(pool, roles);
        let seeds: Vec<ClassId> = ontology.classes.iter().copied().collect();
        let saturator = Saturator::new(&index, status, &expressivity, &self.config);
        let (status, stats) = saturator.run(&seeds)?;

        info!(
            subsumptions = stats.subsumption_facts,
            links = stats.link_facts,
            witnesses = stats.witnesses,
            "classification finished"
        );
        Ok(Classification::new(
            status,
            ontology.classes.clone(),
            ontology.roles.clone(),
            stats,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mimizuku_core::NormalizedAxiom;

    fn c(n: u32) -> ClassId {
        ClassId(n)
    }

    #[test]
    fn test_classify_empty_ontology() {
        let classification = Classifier::new().classify(&Ontology::new()).unwrap();
        let top_ancestors = classification.ancestors(ClassId::TOP);
        assert!(top_ancestors.contains(&ClassId::TOP));
        assert!(classification.is_satisfiable(ClassId::TOP));
        assert!(!classification.is_satisfiable(ClassId::BOTTOM));
    }

    #[test]
    fn test_classify_rejects_malformed_input() {
        let mut ontology = Ontology::new();
        ontology.functional_roles.insert(RoleId(9));
        let err = Classifier::new().classify(&ontology).unwrap_err();
        assert!(matches!(err, ClassifierError::Configuration(_)));
    }

    #[test]
    fn test_classify_is_repeatable() {
        let mut ontology = Ontology::new();
        ontology.add_axiom(NormalizedAxiom::SubClassOf(c(2), c(3)));
        ontology.add_axiom(NormalizedAxiom::SubClassOfExistential(c(3), RoleId(2), c(4)));

        let first = Classifier::new().classify(&ontology).unwrap();
        let second = Classifier::new().classify(&ontology).unwrap();
        for class in &ontology.classes {
            assert_eq!(first.ancestors(*class), second.ancestors(*class));
            assert_eq!(first.descendants(*class), second.descendants(*class));
        }
    }
}
