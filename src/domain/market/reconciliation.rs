//! Diffing a computed ranking against a reference ordering.

use crate::domain::market::ranking::RankedMarketList;
use crate::domain::market::types::ResolvedMarketRow;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// A name present in both lists at different (1-based) ranks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderMismatch {
    pub name: String,
    pub reference_rank: usize,
    pub computed_rank: usize,
}

impl OrderMismatch {
    pub fn delta(&self) -> usize {
        self.reference_rank.abs_diff(self.computed_rank)
    }
}

/// Side-by-side pairing of the two lists at one position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlignmentEntry {
    /// 1-based position
    pub position: usize,
    pub reference: String,
    pub computed: Option<String>,
    pub matches: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationReport {
    pub reference_len: usize,
    pub computed_len: usize,
    /// Reference entries absent from the computed list, in reference order.
    pub missing: Vec<String>,
    /// Computed entries absent from the reference, in computed order.
    pub extra: Vec<String>,
    /// Sorted by descending rank delta; equal deltas keep reference order.
    pub order_mismatches: Vec<OrderMismatch>,
    pub alignment: Vec<AlignmentEntry>,
}

impl ReconciliationReport {
    pub fn is_aligned(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty() && self.order_mismatches.is_empty()
    }
}

/// Compares `computed` against `reference`.
///
/// `computed` may contain duplicates (later ones are dropped); `reference` is
/// assumed deduplicated. `alignment_bound` caps the side-by-side section.
pub fn reconcile(
    computed: &[String],
    reference: &[String],
    alignment_bound: usize,
) -> ReconciliationReport {
    let computed = first_occurrences(computed);

    let computed_pos: HashMap<&str, usize> = computed
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();
    let reference_set: HashSet<&str> = reference.iter().map(String::as_str).collect();

    let missing = reference
        .iter()
        .filter(|name| !computed_pos.contains_key(name.as_str()))
        .cloned()
        .collect();

    let extra = computed
        .iter()
        .filter(|name| !reference_set.contains(name.as_str()))
        .cloned()
        .collect();

    let mut order_mismatches: Vec<OrderMismatch> = reference
        .iter()
        .enumerate()
        .filter_map(|(ref_idx, name)| {
            let comp_idx = *computed_pos.get(name.as_str())?;
            (comp_idx != ref_idx).then(|| OrderMismatch {
                name: name.clone(),
                reference_rank: ref_idx + 1,
                computed_rank: comp_idx + 1,
            })
        })
        .collect();
    order_mismatches.sort_by(|a, b| b.delta().cmp(&a.delta()));

    let alignment = reference
        .iter()
        .take(alignment_bound)
        .enumerate()
        .map(|(i, reference_name)| {
            let computed_name = computed.get(i).cloned();
            AlignmentEntry {
                position: i + 1,
                matches: !reference_name.is_empty()
                    && computed_name.as_deref() == Some(reference_name.as_str()),
                reference: reference_name.clone(),
                computed: computed_name,
            }
        })
        .collect();

    ReconciliationReport {
        reference_len: reference.len(),
        computed_len: computed.len(),
        missing,
        extra,
        order_mismatches,
        alignment,
    }
}

fn first_occurrences(names: &[String]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(names.len());
    names
        .iter()
        .filter(|&name| seen.insert(name.as_str()))
        .cloned()
        .collect()
}

/// The ranking laid out in reference order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceView<'a> {
    /// One slot per reference entry, holding the first ranked row with that name.
    pub entries: Vec<(String, Option<&'a ResolvedMarketRow>)>,
    pub missing: Vec<String>,
}

pub fn reference_view<'a>(ranked: &'a RankedMarketList, reference: &[String]) -> ReferenceView<'a> {
    let mut by_pair: HashMap<&str, &ResolvedMarketRow> = HashMap::new();
    for row in ranked.rows() {
        by_pair.entry(row.pair_name.as_str()).or_insert(row);
    }

    let entries: Vec<(String, Option<&ResolvedMarketRow>)> = reference
        .iter()
        .map(|name| (name.clone(), by_pair.get(name.as_str()).copied()))
        .collect();

    let missing = entries
        .iter()
        .filter(|(_, row)| row.is_none())
        .map(|(name, _)| name.clone())
        .collect();

    ReferenceView { entries, missing }
}
