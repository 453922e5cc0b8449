//! Mimizuku 飽和エンジン
//!
//! このクレートはオントロジー分類の中核を実装します:
//! - 正規化公理索引
//! - クラス/ロール包含グラフとロール後続関係
//! - 証人ノードの正準化 (hash-consing)
//! - 完備化規則のワークリスト駆動と Bottom 逆伝播
//! - 凍結された分類結果の問い合わせ面
//!
//! ```
//! use mimizuku_engine::{Classifier, ClassId, NormalizedAxiom, Ontology, RoleId};
//!
//! let mut ontology = Ontology::new();
//! let (a, b, c) = (ClassId(2), ClassId(3), ClassId(4));
//! ontology.add_axiom(NormalizedAxiom::SubClassOf(a, b));
//! ontology.add_axiom(NormalizedAxiom::SubClassOf(b, c));
//!
//! let classification = Classifier::new().classify(&ontology).unwrap();
//! assert!(classification.ancestors(a).contains(&c));
//! # let _ = RoleId::TOP;
//! ```

pub mod classifier;
pub mod graph;
pub mod index;
pub mod nodes;
pub mod relation;
pub mod rules;
pub mod saturation;
pub mod status;
pub mod taxonomy;

pub use classifier::Classifier;
pub use index::AxiomIndex;
pub use nodes::{ExistentialMarker, WitnessNode, WitnessTable};
pub use rules::{CompletionRule, Fact, Proposal};
pub use saturation::{ClassifierConfig, Interrupt, RuleStats, SaturationStats, Saturator};
pub use status::ClassifierStatus;
pub use taxonomy::Classification;

// Re-export the core model so engine users need a single import
pub use mimizuku_core::{
    ClassId, ClassifierError, EntityPool, Expressivity, NormalizedAxiom, Ontology, RoleId,
};
