//! API response models for the share-link server.
//!
//! These are Data Transfer Objects (DTOs) that define the shape of
//! JSON responses sent to the browser.

use serde::Serialize;

use pedigree_core::{TreeLayout, TreeNode};

// =============================================================================
// Lineage Model (for `/api/lineage/{id}`)
// =============================================================================

/// Ancestry of one horse, plus its positioned layout.
#[derive(Debug, Serialize)]
pub struct LineageResponse {
    /// Materialized tree, father branch first.
    pub tree: TreeNode,
    /// Card positions in pixels, computed with the `[tree]` settings.
    pub layout: TreeLayout,
}

// =============================================================================
// Errors
// =============================================================================

/// Body of every non-success API response.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
