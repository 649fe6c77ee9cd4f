//! Rotating backups of the data file.
//!
//! A copy is taken before every write and at most `backup_retention` copies
//! are kept, oldest deleted first. Recency is derived from the timestamped
//! filename, which sorts lexicographically; a nanosecond suffix keeps names
//! unique within one second. Every error here is logged and swallowed:
//! backups are best effort and never block a save.

use std::fs;
use std::path::Path;

use chrono::Utc;
use tracing::warn;

const BACKUP_PREFIX: &str = "encuestas_backup_";

/// Copy the data file into the backup directory, then prune old backups.
pub(crate) fn create_backup(data_path: &Path, backup_dir: &Path, retention: usize) {
    if !data_path.exists() {
        return;
    }

    if let Err(err) = fs::create_dir_all(backup_dir) {
        warn!(error = %err, dir = %backup_dir.display(), "no se pudo crear el directorio de backups");
        return;
    }

    let now = Utc::now();
    let name = format!(
        "{BACKUP_PREFIX}{}_{:09}.csv",
        now.format("%Y%m%d_%H%M%S"),
        now.timestamp_subsec_nanos()
    );
    let target = backup_dir.join(name);

    if let Err(err) = fs::copy(data_path, &target) {
        warn!(error = %err, target = %target.display(), "no se pudo crear backup");
        return;
    }

    prune(backup_dir, retention);
}

/// Delete all but the `retention` most recent backups.
fn prune(backup_dir: &Path, retention: usize) {
    let entries = match fs::read_dir(backup_dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(error = %err, "no se pudo listar el directorio de backups");
            return;
        }
    };

    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .filter_map(|e| e.file_name().into_string().ok())
        .filter(|name| name.starts_with(BACKUP_PREFIX))
        .collect();

    // Newest first by filename; timestamps are fixed-width so this is
    // chronological.
    names.sort_unstable_by(|a, b| b.cmp(a));

    for name in names.into_iter().skip(retention) {
        let path = backup_dir.join(&name);
        if let Err(err) = fs::remove_file(&path) {
            warn!(error = %err, path = %path.display(), "no se pudo eliminar backup antiguo");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_data_file_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        create_backup(&dir.path().join("nope.csv"), &dir.path().join("backups"), 10);
        assert!(!dir.path().join("backups").exists());
    }

    #[test]
    fn prune_keeps_the_most_recent() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..5 {
            fs::write(
                dir.path()
                    .join(format!("{BACKUP_PREFIX}20240101_00000{i}_000000000.csv")),
                "x",
            )
            .unwrap();
        }
        // A stray file must never be pruned.
        fs::write(dir.path().join("notes.txt"), "x").unwrap();

        prune(dir.path(), 2);

        let mut remaining: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .map(|e| e.file_name().into_string().unwrap())
            .collect();
        remaining.sort();
        assert_eq!(
            remaining,
            vec![
                format!("{BACKUP_PREFIX}20240101_000003_000000000.csv"),
                format!("{BACKUP_PREFIX}20240101_000004_000000000.csv"),
                "notes.txt".to_owned(),
            ]
        );
    }
}
