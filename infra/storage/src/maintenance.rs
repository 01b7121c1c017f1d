use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing::{error, info, warn};
use walkdir::WalkDir;

pub(crate) const TMP_MARKER: &str = ".autoanitmp.";

/// Temporaries younger than this may belong to an upload still in flight.
const STALE_AFTER: Duration = Duration::from_secs(300);

pub(crate) async fn purge_tmp(root: &Path) {
    let root = root.to_path_buf();
    let now = SystemTime::now();

    match tokio::task::spawn_blocking(move || remove_stale(&root, now)).await {
        Ok((removed, failed)) if removed > 0 || failed > 0 => {
            info!(removed, failed, "Purged stale temporary uploads");
        },
        Ok(_) => {},
        Err(err) => error!(error = %err, "Temporary upload cleanup task panicked"),
    }
}

fn remove_stale(root: &Path, now: SystemTime) -> (usize, usize) {
    let mut removed = 0;
    let mut failed = 0;

    let candidates = WalkDir::new(root)
        .into_iter()
        .flatten()
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.file_name().to_str().is_some_and(|name| name.contains(TMP_MARKER)));

    for entry in candidates {
        let fresh = entry
            .metadata()
            .ok()
            .and_then(|meta| meta.modified().ok())
            .is_some_and(|modified| {
                now.duration_since(modified).map_or(true, |age| age <= STALE_AFTER)
            });
        if fresh {
            continue;
        }

        match std::fs::remove_file(entry.path()) {
            Ok(()) => removed += 1,
            Err(err) => {
                warn!(path = %entry.path().display(), error = %err, "Failed to remove temporary upload");
                failed += 1;
            },
        }
    }

    (removed, failed)
}
