use std::path::PathBuf;

/// Configuration for the flat-file backend.
#[derive(Debug, Clone)]
pub struct FlatFileConfig {
    /// Path of the delimited data file.
    pub data_path: PathBuf,

    /// Directory where rotating backups are written.
    pub backup_dir: PathBuf,

    /// How many backups to retain; the oldest beyond this count are
    /// deleted after each save.
    pub backup_retention: usize,
}

impl Default for FlatFileConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("encuestas_reportes.csv"),
            backup_dir: PathBuf::from("backups"),
            backup_retention: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let cfg = FlatFileConfig::default();
        assert_eq!(cfg.data_path, PathBuf::from("encuestas_reportes.csv"));
        assert_eq!(cfg.backup_retention, 10);
    }
}
