use std::ffi::OsString;
use std::path::PathBuf;

/// Environment variable naming the source table when no argument is given.
pub const DATA_PATH_ENV: &str = "INVENTORY_DASHBOARD_DATA";
pub const DEFAULT_DATA_PATH: &str = "data/retail_store_inventory.csv";

/// Startup configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub source_path: PathBuf,
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
}

impl DashboardConfig {
    /// First positional argument, else `$INVENTORY_DASHBOARD_DATA`, else the default path.
    pub fn from_env() -> Self {
        Self::resolve(std::env::args_os().nth(1), std::env::var_os(DATA_PATH_ENV))
    }

    fn resolve(arg: Option<OsString>, env: Option<OsString>) -> Self {
        let source_path = arg
            .filter(|a| !a.is_empty())
            .or(env.filter(|e| !e.is_empty()))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));

        DashboardConfig {
            source_path,
            window_size: [1400.0, 900.0],
            min_window_size: [800.0, 500.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_wins_over_environment() {
        let cfg = DashboardConfig::resolve(Some("a.csv".into()), Some("b.csv".into()));
        assert_eq!(cfg.source_path, PathBuf::from("a.csv"));
    }

    #[test]
    fn environment_then_default() {
        let cfg = DashboardConfig::resolve(None, Some("b.parquet".into()));
        assert_eq!(cfg.source_path, PathBuf::from("b.parquet"));

        let cfg = DashboardConfig::resolve(Some("".into()), Some("".into()));
        assert_eq!(cfg.source_path, PathBuf::from(DEFAULT_DATA_PATH));
    }

    #[test]
    fn default_dataset_matches_the_sample_generator() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_DATA_PATH);
        let table = crate::data::loader::load_file(&path).unwrap();

        // 122 sampled days x 5 stores x 5 categories, plus two malformed dates.
        assert_eq!(table.len(), 3052);
        let raw: Vec<&str> = table.date_warnings().iter().map(|w| w.raw.as_str()).collect();
        assert_eq!(raw, ["13/45/24", "n/a"]);
    }
}
