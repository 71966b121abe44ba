//! Errors surfaced by the catalog services.

use core::fmt;

use thiserror::Error;

use catalog_core::{DomainError, ProductId};
use catalog_products::SkuError;

use crate::document_store::StoreError;

/// What a cascade step was doing when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeAction {
    Create,
    Update,
    Delete,
}

impl fmt::Display for CascadeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        })
    }
}

/// One write in a multi-record product operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeStep {
    pub action: CascadeAction,
    pub collection: &'static str,
}

impl fmt::Display for CascadeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.action, self.collection)
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Input rejected before anything was written.
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// A write inside a cascade failed. Earlier steps stay committed.
    #[error("failed to {step} {payload}: {source}")]
    Cascade {
        step: CascadeStep,
        payload: String,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Sku(#[from] SkuError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cascade_error_names_step_and_payload() {
        let err = CatalogError::Cascade {
            step: CascadeStep {
                action: CascadeAction::Create,
                collection: "materials",
            },
            payload: r#"{"name":"Wood"}"#.to_string(),
            source: StoreError::backend("insert", "connection reset"),
        };

        assert_eq!(
            err.to_string(),
            r#"failed to create materials {"name":"Wood"}: insert failed: connection reset"#
        );
    }
}
