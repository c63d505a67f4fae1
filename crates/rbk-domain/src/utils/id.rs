//! Id generation, masking, and content hashing.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Generates a new random UUID v4.
#[must_use]
pub fn generate() -> Uuid {
    Uuid::new_v4()
}

/// Generates a deterministic UUID v5 from a namespace string and key.
#[must_use]
pub fn deterministic(namespace: &str, key: &str) -> Uuid {
    let ns = Uuid::new_v5(&Uuid::NAMESPACE_OID, namespace.as_bytes());
    Uuid::new_v5(&ns, key.as_bytes())
}

/// SHA-256 hex digest of content for deduplication.
#[must_use]
pub fn compute_content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Mask sensitive ID for logging — shows first 8 chars + "...".
#[must_use]
pub fn mask_id(id: &str) -> String {
    if id.len() <= 8 {
        id.to_owned()
    } else {
        format!("{}...", &id[..8])
    }
}
