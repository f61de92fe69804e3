// Sweep-tree fixtures shared by the integration tests
//
// Builds <root>/<modality>/<run-group>/ directories holding JSON or
// MessagePack score bundles.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Ten runs rising linearly from `start`
pub fn runs(start: f64, step: f64) -> Vec<f64> {
    (0..10).map(|i| start + i as f64 * step).collect()
}

pub struct SweepTree {
    pub dir: TempDir,
}

impl SweepTree {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    fn group_dir(&self, modality: &str, run_group: &str) -> PathBuf {
        let dir = self.root().join(modality).join(run_group);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Write `scores_<run_group>.npy` as JSON
    pub fn json_group(&self, modality: &str, run_group: &str, doc: Value) -> &Self {
        let dir = self.group_dir(modality, run_group);
        let path = dir.join(format!("scores_{}.npy", run_group));
        fs::write(path, serde_json::to_vec(&doc).unwrap()).unwrap();
        self
    }

    /// Write `scores_<run_group>.msgpack` as MessagePack
    pub fn msgpack_group(&self, modality: &str, run_group: &str, doc: Value) -> &Self {
        let dir = self.group_dir(modality, run_group);
        let path = dir.join(format!("scores_{}.msgpack", run_group));
        fs::write(path, rmp_serde::to_vec_named(&doc).unwrap()).unwrap();
        self
    }

    /// Write a separate `params_<run_group>.npy`
    pub fn params(&self, modality: &str, run_group: &str, doc: Value) -> &Self {
        let dir = self.group_dir(modality, run_group);
        let path = dir.join(format!("params_{}.npy", run_group));
        fs::write(path, serde_json::to_vec(&doc).unwrap()).unwrap();
        self
    }

    /// Two kernel widths of the `glm` family under `CT`
    pub fn two_kernel_widths() -> Self {
        let tree = Self::new();
        tree.json_group("CT", "glm_rf0_k1_0", json!({"test_roc_auc": runs(0.80, 0.013)}))
            .json_group("CT", "glm_rf0_k2_0", json!({"test_roc_auc": runs(0.70, 0.005)}));
        tree
    }
}
