use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::dashboard::DashboardSnapshot;

/// Write the snapshot as pretty-printed JSON.
pub fn write_snapshot(path: &Path, snapshot: &DashboardSnapshot) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot).context("serializing dashboard snapshot")?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    log::info!(
        "Exported {} view ({} rows) to {}",
        snapshot.view.label(),
        snapshot.kpis.row_count,
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::DashboardView;
    use crate::data::filter::FacetSelection;
    use crate::data::model::tests::record;
    use crate::data::model::InventoryTable;
    use tempfile::tempdir;

    #[test]
    fn writes_readable_json() {
        let table = InventoryTable::from_records(
            vec![record("A", "Toys", "S1", 80, 10, 10.0)],
            Vec::new(),
        );
        let snap = DashboardSnapshot::compute(&table, &FacetSelection::all(&table), DashboardView::SalesOverview);

        let dir = tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        write_snapshot(&path, &snap).unwrap();

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["kpis"]["total_revenue"], 100.0);
        assert_eq!(value["charts"]["revenue_by_region"]["points"][0]["key"], "A");
        assert_eq!(value["selection"]["regions"][0], "A");
    }

    #[test]
    fn unwritable_target_is_an_error() {
        let table = InventoryTable::from_records(Vec::new(), Vec::new());
        let snap = DashboardSnapshot::compute(&table, &FacetSelection::default(), DashboardView::SalesOverview);
        let dir = tempdir().unwrap();
        let err = write_snapshot(&dir.path().join("missing").join("out.json"), &snap).unwrap_err();
        assert!(format!("{err:#}").contains("writing"));
    }
}
