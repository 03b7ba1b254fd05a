use thiserror::Error;

use crate::form::FormError;
use crate::store::StoreError;

/// Why registering a horse failed.
///
/// A photo uploaded before an insert failure is not removed again.
#[derive(Debug, Error)]
pub enum AddError {
    #[error("{0}")]
    Invalid(#[from] FormError),

    #[error("Photo upload failed: {0}")]
    Upload(#[source] StoreError),

    #[error("Photo was uploaded to '{0}' but no public URL is available")]
    MissingPublicUrl(String),

    #[error("Saving the horse failed: {0}")]
    Insert(#[source] StoreError),

    #[error("Nothing to submit outside the registration form")]
    NotEditing,
}
