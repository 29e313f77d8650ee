//! Text rendering of merged facets.
//!
//! Output is plain markdown-ish text meant for people and for prompt
//! assembly. Items are grouped under a `From `<id>`:` header that is repeated
//! only when the source catalyst changes.

use crate::catalyst::{CatalystId, FACET_CATEGORIES, FacetCategory};
use crate::merge::MergedCatalyst;
use std::collections::BTreeMap;

pub const EMPTY_MERGE_SUMMARY: &str = "No catalysts merged";

/// Render one category; empty when nothing was merged for it.
pub fn render_facet(merged: &MergedCatalyst, category: FacetCategory) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current: Option<&CatalystId> = None;
    for item in merged.facet(category) {
        if current != Some(&item.source_id) {
            if current.is_some() {
                lines.push(String::new());
            }
            lines.push(format!("From `{}`:", item.source_id));
            current = Some(&item.source_id);
        }
        lines.push(item.content.clone());
    }
    lines.join("\n")
}

/// Render every category. Categories without content map to an empty string.
pub fn render_all_facets(merged: &MergedCatalyst) -> BTreeMap<FacetCategory, String> {
    FACET_CATEGORIES
        .into_iter()
        .map(|category| (category, render_facet(merged, category)))
        .collect()
}

/// Non-empty categories under `## <Display Name>` headings, in canonical order.
pub fn render_document(merged: &MergedCatalyst) -> String {
    render_all_facets(merged)
        .into_iter()
        .filter(|(_, body)| !body.is_empty())
        .map(|(category, body)| format!("## {}\n\n{body}", category.display_name()))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Human summary of who contributed what.
pub fn summarize_merge(merged: &MergedCatalyst) -> String {
    if merged.catalyst_ids.is_empty() {
        return EMPTY_MERGE_SUMMARY.to_string();
    }

    let mut lines = vec![format!(
        "Merged {} catalyst(s):",
        merged.catalyst_ids.len()
    )];
    for (id, contribution) in merged.contributions.iter() {
        let facets = if contribution.facet_types.is_empty() {
            "none".to_string()
        } else {
            contribution
                .facet_types
                .iter()
                .map(FacetCategory::display_name)
                .collect::<Vec<_>>()
                .join(", ")
        };
        lines.push(String::new());
        lines.push(format!("- {id}"));
        lines.push(format!("  Facets: {facets}"));
        lines.push(format!("  Content items: {}", contribution.content_count));
    }
    lines.join("\n")
}
