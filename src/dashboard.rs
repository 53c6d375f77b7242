use serde::Serialize;

use crate::data::aggregate::{
    self, Aggregation, GroupKey, Histogram, Kpis, Measure, Pivot, Series, SeriesOrder,
    StockCounts, INVENTORY_HISTOGRAM_BINS,
};
use crate::data::filter::{filter_records, FacetSelection};
use crate::data::model::{InventoryTable, Record};

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardView {
    #[default]
    SalesOverview,
    InventoryStatus,
    TrendsPatterns,
}

impl DashboardView {
    pub const ALL: [DashboardView; 3] = [
        DashboardView::SalesOverview,
        DashboardView::InventoryStatus,
        DashboardView::TrendsPatterns,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DashboardView::SalesOverview => "Sales Overview",
            DashboardView::InventoryStatus => "Inventory Status",
            DashboardView::TrendsPatterns => "Trends & Patterns",
        }
    }
}

// ---------------------------------------------------------------------------
// Per-view chart data
// ---------------------------------------------------------------------------

/// Chart data for exactly one view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewCharts {
    SalesOverview {
        revenue_by_region: Series,
        revenue_by_category: Series,
        top_stores: Series,
    },
    InventoryStatus {
        inventory_distribution: Histogram,
        avg_inventory_by_region: Series,
        stock_status: StockCounts,
        inventory_by_category: Series,
    },
    TrendsPatterns {
        monthly_revenue: Series,
        units_by_season: Series,
        revenue_heatmap: Pivot,
    },
}

impl ViewCharts {
    pub fn compute(view: DashboardView, rows: &[&Record]) -> Self {
        use Aggregation::{Mean, Sum};
        use SeriesOrder::{Domain, ValueAscending, ValueDescending};

        match view {
            DashboardView::SalesOverview => ViewCharts::SalesOverview {
                revenue_by_region: aggregate::group(rows, GroupKey::Region, Measure::Revenue, Sum, ValueDescending),
                revenue_by_category: aggregate::group(rows, GroupKey::Category, Measure::Revenue, Sum, ValueDescending),
                top_stores: aggregate::group(rows, GroupKey::Store, Measure::Revenue, Sum, ValueDescending),
            },
            DashboardView::InventoryStatus => ViewCharts::InventoryStatus {
                inventory_distribution: aggregate::histogram(
                    rows.iter().map(|r| r.inventory_level() as f64),
                    INVENTORY_HISTOGRAM_BINS,
                ),
                avg_inventory_by_region: aggregate::group(rows, GroupKey::Region, Measure::InventoryLevel, Mean, ValueAscending),
                stock_status: aggregate::stock_classification(rows),
                inventory_by_category: aggregate::group(rows, GroupKey::Category, Measure::InventoryLevel, Sum, Domain),
            },
            DashboardView::TrendsPatterns => ViewCharts::TrendsPatterns {
                monthly_revenue: aggregate::group(rows, GroupKey::Month, Measure::Revenue, Sum, Domain),
                units_by_season: aggregate::group(rows, GroupKey::Seasonality, Measure::UnitsSold, Sum, Domain),
                revenue_heatmap: aggregate::pivot_sum(rows, GroupKey::Category, GroupKey::Region, Measure::Revenue),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot – everything one render pass shows
// ---------------------------------------------------------------------------

/// KPIs plus the selected view's charts for one filter selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub view: DashboardView,
    pub selection: FacetSelection,
    pub kpis: Kpis,
    pub charts: ViewCharts,
}

impl DashboardSnapshot {
    pub fn compute(table: &InventoryTable, selection: &FacetSelection, view: DashboardView) -> Self {
        let rows = filter_records(table, selection);
        DashboardSnapshot {
            view,
            selection: selection.clone(),
            kpis: aggregate::kpis(&rows),
            charts: ViewCharts::compute(view, &rows),
        }
    }
}
