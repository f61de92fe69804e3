//! Run-group discovery over `<root>/<modality>/<run-group>/`

use crate::error::PassError;
use std::fs;
use std::path::{Path, PathBuf};

/// One candidate run-group directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunGroupLocation {
    pub modality: String,
    /// Directory name, e.g. `glm_rf2_trial3`
    pub name: String,
    pub path: PathBuf,
}

/// Enumerate modality and run-group directories two levels below `root`
///
/// Non-directory entries at either level are skipped. Both levels are
/// sorted by name so repeated passes over an unchanged tree yield the same
/// order.
pub fn locate_run_groups(root: &Path) -> Result<Vec<RunGroupLocation>, PassError> {
    let modalities = sorted_subdirectories(root).map_err(|source| PassError::UnreadableRoot {
        path: root.to_path_buf(),
        source,
    })?;

    let mut locations = Vec::new();
    for (modality, modality_dir) in modalities {
        // An unreadable modality behaves like an empty one
        let Ok(run_groups) = sorted_subdirectories(&modality_dir) else {
            tracing::warn!(modality = %modality, "cannot list modality directory");
            continue;
        };
        for (name, path) in run_groups {
            locations.push(RunGroupLocation {
                modality: modality.clone(),
                name,
                path,
            });
        }
    }
    Ok(locations)
}

fn sorted_subdirectories(dir: &Path) -> std::io::Result<Vec<(String, PathBuf)>> {
    let mut dirs: Vec<(String, PathBuf)> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .filter_map(|path| {
            let name = path.file_name()?.to_str()?.to_string();
            Some((name, path))
        })
        .collect();
    dirs.sort();
    Ok(dirs)
}
