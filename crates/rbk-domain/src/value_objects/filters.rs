//! Retrieval filter value object.

use serde::{Deserialize, Serialize};

use crate::entities::memory::{MemoryCategory, MemoryRecord};

/// Filters applied during similarity retrieval.
///
/// `min_success_rate` admits records whose rate meets the threshold *or*
/// whose rate is still unknown (`None`) — new records are not punished.
/// An absent categories set means no category filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetrievalFilters {
    /// Minimum success rate; `None`-rated records always pass
    pub min_success_rate: Option<f64>,
    /// Inclusion set of categories; absent = no filter
    pub categories: Option<Vec<MemoryCategory>>,
}

impl RetrievalFilters {
    /// Whether the record satisfies every configured filter.
    #[must_use]
    pub fn matches(&self, record: &MemoryRecord) -> bool {
        if let Some(threshold) = self.min_success_rate {
            match record.success_rate {
                Some(rate) if rate < threshold => return false,
                Some(_) | None => {}
            }
        }
        if let Some(categories) = &self.categories {
            if !categories.contains(&record.category) {
                return false;
            }
        }
        true
    }
}
