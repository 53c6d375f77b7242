use std::collections::BTreeSet;

use serde::Serialize;

use super::model::{Facet, InventoryTable, Record};

// ---------------------------------------------------------------------------
// Filter predicate: which facet values are selected
// ---------------------------------------------------------------------------

/// Selected values per facet.
///
/// A record passes when its region, category and store are each in the
/// corresponding set. An empty set admits nothing: deselecting every value
/// of a facet empties the dashboard rather than lifting the filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacetSelection {
    regions: BTreeSet<String>,
    categories: BTreeSet<String>,
    stores: BTreeSet<String>,
}

impl FacetSelection {
    /// Every discovered value selected (equivalent to no filtering).
    pub fn all(table: &InventoryTable) -> Self {
        let mut selection = FacetSelection::default();
        for facet in Facet::ALL {
            *selection.selected_mut(facet) = table.facet_values(facet).clone();
        }
        selection
    }

    pub fn selected(&self, facet: Facet) -> &BTreeSet<String> {
        match facet {
            Facet::Region => &self.regions,
            Facet::Category => &self.categories,
            Facet::Store => &self.stores,
        }
    }

    pub fn selected_mut(&mut self, facet: Facet) -> &mut BTreeSet<String> {
        match facet {
            Facet::Region => &mut self.regions,
            Facet::Category => &mut self.categories,
            Facet::Store => &mut self.stores,
        }
    }

    pub fn set<I, S>(&mut self, facet: Facet, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.selected_mut(facet) = values.into_iter().map(Into::into).collect();
    }

    /// Select `value` if it is deselected and vice versa.
    pub fn toggle(&mut self, facet: Facet, value: &str) {
        let selected = self.selected_mut(facet);
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
    }

    pub fn admits(&self, record: &Record) -> bool {
        Facet::ALL
            .iter()
            .all(|&facet| self.selected(facet).contains(facet.value_of(record)))
    }
}

/// Indices of records that pass the selection, in table order.
pub fn filtered_indices(table: &InventoryTable, selection: &FacetSelection) -> Vec<usize> {
    table
        .records()
        .iter()
        .enumerate()
        .filter(|(_, rec)| selection.admits(rec))
        .map(|(i, _)| i)
        .collect()
}

/// The records that pass the selection, in table order.
pub fn filter_records<'a>(table: &'a InventoryTable, selection: &FacetSelection) -> Vec<&'a Record> {
    filtered_indices(table, selection)
        .into_iter()
        .filter_map(|i| table.get(i))
        .collect()
}
