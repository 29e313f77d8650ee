//! Ordered, attribution-preserving merge of facet content.
//!
//! Each category is concatenated across catalysts in input order: every item
//! from the first catalyst precedes every item from the second, and each item
//! keeps its catalyst's internal file order. Nothing is deduplicated or
//! re-sorted. Alongside the merged facets, a contribution record tracks which
//! categories each catalyst touched and how many items it supplied.

use crate::catalyst::{Catalyst, CatalystId, FACET_CATEGORIES, FacetCategory};
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
/// One merged item tagged with the catalyst that supplied it.
pub struct AttributedContent {
    pub content: String,
    pub source_id: CatalystId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
/// What one catalyst contributed to a merge.
pub struct Contribution {
    pub facet_types: BTreeSet<FacetCategory>,
    pub content_count: usize,
}

/// Contribution records keyed by catalyst id, in first-seen order.
///
/// Repeated ids share one record. Serializes as a map in that order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Contributions {
    entries: Vec<(CatalystId, Contribution)>,
}

impl Contributions {
    pub fn get(&self, id: &CatalystId) -> Option<&Contribution> {
        self.entries
            .iter()
            .find(|(entry_id, _)| entry_id == id)
            .map(|(_, contribution)| contribution)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CatalystId, &Contribution)> {
        self.entries.iter().map(|(id, contribution)| (id, contribution))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&mut self, id: &CatalystId) -> &mut Contribution {
        let position = match self.entries.iter().position(|(entry_id, _)| entry_id == id) {
            Some(position) => position,
            None => {
                self.entries.push((id.clone(), Contribution::default()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[position].1
    }
}

impl Serialize for Contributions {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, contribution) in &self.entries {
            map.serialize_entry(id, contribution)?;
        }
        map.end()
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
/// Result of merging an ordered list of catalysts.
pub struct MergedCatalyst {
    /// Input ids in input order, duplicates preserved.
    pub catalyst_ids: Vec<CatalystId>,
    /// Only categories with at least one item are present.
    pub facets: BTreeMap<FacetCategory, Vec<AttributedContent>>,
    pub contributions: Contributions,
}

impl MergedCatalyst {
    /// Items for `category`, empty when nothing was contributed.
    pub fn facet(&self, category: FacetCategory) -> &[AttributedContent] {
        self.facets
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.catalyst_ids.is_empty()
    }
}

/// Merge `catalysts` in order. Pure; an empty slice yields an empty merge.
pub fn merge_catalysts(catalysts: &[Catalyst]) -> MergedCatalyst {
    let mut merged = MergedCatalyst {
        catalyst_ids: catalysts.iter().map(|c| c.id().clone()).collect(),
        ..Default::default()
    };
    for catalyst in catalysts {
        merged.contributions.entry(catalyst.id());
    }

    for category in FACET_CATEGORIES {
        let mut items = Vec::new();
        for catalyst in catalysts {
            let files = catalyst.facet(category);
            if files.is_empty() {
                continue;
            }
            items.extend(files.iter().map(|file| AttributedContent {
                content: file.content.clone(),
                source_id: catalyst.id().clone(),
                filename: Some(file.filename.clone()),
            }));

            let contribution = merged.contributions.entry(catalyst.id());
            contribution.facet_types.insert(category);
            contribution.content_count += files.len();
        }
        if !items.is_empty() {
            merged.facets.insert(category, items);
        }
    }

    tracing::debug!(
        catalysts = merged.catalyst_ids.len(),
        facets = merged.facets.len(),
        "merged catalysts"
    );
    merged
}
