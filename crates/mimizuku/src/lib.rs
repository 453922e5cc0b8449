//! # 🦉 Mimizuku - Ontology Classification Engine
//!
//! Mimizuku computes the subsumption hierarchy of an ontology given as a
//! finite set of normalized axioms over integer-coded class and role
//! identifiers: equivalence groups, unsatisfiable classes, the role
//! hierarchy, and everything existential restrictions, role composition,
//! transitivity, functionality and inverses imply about them.
//!
//! ## Quick Start
//!
//! ```rust
//! use mimizuku::prelude::*;
//!
//! let mut ontology = Ontology::new();
//! let (person, animal) = (ClassId(2), ClassId(3));
//! ontology.add_axiom(NormalizedAxiom::SubClassOf(person, animal));
//!
//! let classification = mimizuku::classify(&ontology).unwrap();
//! assert!(classification.ancestors(person).contains(&animal));
//! assert!(classification.is_satisfiable(person));
//! ```
//!
//! ## Architecture
//!
//! Mimizuku consists of two specialized crates:
//!
//! - **`mimizuku-core`**: identifier spaces, normalized axiom model,
//!   expressivity detection, shared error taxonomy
//! - **`mimizuku-engine`**: the saturation engine (axiom index, subsumer
//!   graphs, role-successor relation, witness canonicalization,
//!   completion rules, worklist driver) and the frozen query surface
//!
//! ## Feature Flags
//!
//! - `full` (default): all crates included
//! - `core`: only the data model
//! - `engine`: the saturation engine (implies `core`)

// Re-export public APIs from sub-crates (feature-gated)

#[cfg(feature = "mimizuku-core")]
pub use mimizuku_core as core;

#[cfg(feature = "mimizuku-engine")]
pub use mimizuku_engine as engine;

// Convenience re-exports for common types
#[cfg(feature = "mimizuku-core")]
pub use mimizuku_core::{
    ClassId, ClassifierError, Expressivity, NormalizedAxiom, Ontology, RoleId,
};

#[cfg(feature = "mimizuku-engine")]
pub use mimizuku_engine::{
    Classification, Classifier, ClassifierConfig, Interrupt, SaturationStats,
};

// Commonly used external dependencies
pub use anyhow;
pub use serde;
pub use serde_json;

/// Classifies an ontology with the default configuration.
#[cfg(feature = "mimizuku-engine")]
pub fn classify(ontology: &Ontology) -> Result<Classification, ClassifierError> {
    Classifier::new().classify(ontology)
}

/// Prelude module for convenient imports
///
/// ```rust
/// use mimizuku::prelude::*;
/// ```
pub mod prelude {
    #[cfg(feature = "mimizuku-core")]
    pub use crate::{ClassId, ClassifierError, Expressivity, NormalizedAxiom, Ontology, RoleId};

    #[cfg(feature = "mimizuku-engine")]
    pub use crate::{Classification, Classifier, ClassifierConfig, Interrupt};

    // Common external types
    pub use anyhow::Result;
    pub use serde::{Deserialize, Serialize};
}

/// Current version of Mimizuku
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
