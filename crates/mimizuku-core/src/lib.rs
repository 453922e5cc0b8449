//! Mimizuku コアデータモデル
//!
//! このクレートは分類エンジンの土台を提供します:
//! - クラス/ロール識別子空間 (Top/Bottom 予約付き)
//! - 正規化公理の閉じた七種類
//! - オントロジーコンテナと表現力検出
//! - 共有エラー分類

pub mod axiom;
pub mod id;

pub use axiom::{Expressivity, NormalizedAxiom, Ontology};
pub use id::{ClassId, EntityPool, RoleId};

// Error types
use thiserror::Error;

/// Errors shared across the classifier stack.
///
/// Ontology inconsistency (a class subsumed by Bottom) is a normal
/// classification result and is never reported through this type.
#[derive(Error, Debug)]
pub enum ClassifierError {
    /// Malformed input detected before the run starts.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A broken internal invariant; the run aborts rather than continue
    /// with corrupted state.
    #[error("internal invariant violated: {0}")]
    Internal(String),

    /// Cooperative cancellation before the fixpoint was reached.
    /// Partial results are unreliable and are not reported.
    #[error("classification interrupted before reaching the fixpoint")]
    Interrupted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClassifierError::Configuration("role 7 not declared".to_string());
        assert_eq!(err.to_string(), "configuration error: role 7 not declared");

        let err = ClassifierError::Interrupted;
        assert!(err.to_string().contains("interrupted"));
    }
}
