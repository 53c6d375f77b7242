use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::dashboard::{DashboardSnapshot, DashboardView};
use crate::data::cache::TableCache;
use crate::data::error::DataSourceError;
use crate::data::filter::FacetSelection;
use crate::data::model::{Facet, InventoryTable};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// The dashboard state is the pair (`filters`, `view`); every change to
/// either goes through a method here and recomputes `snapshot`.
pub struct AppState {
    cache: TableCache,

    /// Where `table` was loaded from.
    pub source_path: PathBuf,

    /// Immutable base table, shared with the cache.
    pub table: Arc<InventoryTable>,

    /// Per-facet selections.
    pub filters: FacetSelection,

    pub view: DashboardView,

    /// KPIs and charts for the current (`filters`, `view`).
    pub snapshot: DashboardSnapshot,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Initial state: every facet value selected, first view.
    pub fn new(cache: TableCache, source_path: PathBuf, table: Arc<InventoryTable>) -> Self {
        let filters = FacetSelection::all(&table);
        let view = DashboardView::default();
        let snapshot = DashboardSnapshot::compute(&table, &filters, view);
        Self {
            cache,
            source_path,
            table,
            filters,
            view,
            snapshot,
            status_message: None,
        }
    }

    /// Switch to the table at `path`. On failure the current table stays.
    pub fn open(&mut self, path: &Path) -> Result<(), DataSourceError> {
        let table = self.cache.load(path)?;
        if !Arc::ptr_eq(&table, &self.table) {
            self.filters = FacetSelection::all(&table);
            self.table = table;
        }
        self.source_path = path.to_path_buf();
        self.status_message = None;
        self.refresh();
        Ok(())
    }

    /// Re-read the current source, bypassing the cache.
    pub fn reload(&mut self) -> Result<(), DataSourceError> {
        self.cache.invalidate(&self.source_path);
        let path = self.source_path.clone();
        self.open(&path)
    }

    /// Recompute the snapshot from the base table.
    pub fn refresh(&mut self) {
        self.snapshot = DashboardSnapshot::compute(&self.table, &self.filters, self.view);
    }

    pub fn set_view(&mut self, view: DashboardView) {
        self.view = view;
        self.refresh();
    }

    /// Toggle a single value in a facet's selection.
    pub fn toggle_filter_value(&mut self, facet: Facet, value: &str) {
        self.filters.toggle(facet, value);
        self.refresh();
    }

    /// Select all values of a facet.
    pub fn select_all(&mut self, facet: Facet) {
        let all = self.table.facet_values(facet).clone();
        *self.filters.selected_mut(facet) = all;
        self.refresh();
    }

    /// Deselect all values of a facet.
    pub fn select_none(&mut self, facet: Facet) {
        self.filters.selected_mut(facet).clear();
        self.refresh();
    }

    pub fn export_snapshot(&self, path: &Path) -> anyhow::Result<()> {
        crate::export::write_snapshot(path, &self.snapshot)
    }
}
