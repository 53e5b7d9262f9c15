use std::path::PathBuf;

/// Where "Download forecast CSV" writes files
#[derive(Debug, Clone)]
pub struct ExportEnvConfig {
    pub dir: PathBuf,
}

impl Default for ExportEnvConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
        }
    }
}

impl ExportEnvConfig {
    pub fn from_lookup(var: &dyn Fn(&str) -> Option<String>) -> Self {
        Self {
            dir: var("FORECAST_EXPORT_DIR")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}
