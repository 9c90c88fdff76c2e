// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::sync::{Arc, LazyLock};
use tokio::sync::{Mutex, OwnedMutexGuard};

// Only one analysis may own the working directory at any time
static WORKING_DIR_LOCK: LazyLock<Arc<Mutex<()>>> = LazyLock::new(|| Arc::new(Mutex::new(())));

/// Exclusive handle over the static-analysis working directory.
///
/// The directory is created fresh on acquisition and removed when the handle
/// is dropped, whatever happened in between.
#[derive(Debug)]
pub struct AnalysisWorkspace {
    path: Utf8PathBuf,
    _guard: OwnedMutexGuard<()>,
}

impl AnalysisWorkspace {
    pub async fn acquire(path: &Utf8Path) -> anyhow::Result<Self> {
        let guard = WORKING_DIR_LOCK.clone().lock_owned().await;

        remove_working_dir(path);
        fs::create_dir_all(path).with_context(|| format!("[pkgscan.analysis] cannot create {}", path))?;
        log::info!("[pkgscan.analysis] acquired working directory at {}", path);

        Ok(Self {
            path: path.to_path_buf(),
            _guard: guard,
        })
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub fn cleanup(self) {
        drop(self)
    }
}

impl Drop for AnalysisWorkspace {
    fn drop(&mut self) {
        remove_working_dir(&self.path);
    }
}

fn remove_working_dir(path: &Utf8Path) {
    if !path.exists() {
        return;
    }

    match fs::remove_dir_all(path) {
        Ok(_) => log::info!("[pkgscan.analysis] removed working directory at {}", path),
        Err(incoming) => log::warn!("[pkgscan.analysis] cannot remove {} : {}", path, incoming),
    }
}

#[cfg(test)]
mod tests {
    use crate::infra::analysis::workspace::AnalysisWorkspace;
    use assertor::{BooleanAssertion, ResultAssertion};
    use camino::Utf8PathBuf;
    use std::fs;
    use std::time::Duration;
    use temp_dir::TempDir;

    fn working_dir(temp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::try_from(temp.path().join("pkg-source")).unwrap()
    }

    #[tokio::test]
    async fn should_start_from_fresh_directory() {
        let temp = TempDir::new().expect("Cant create temp dir");
        let path = working_dir(&temp);
        fs::create_dir_all(&path).unwrap();
        fs::write(path.join("leftover.whl"), "stale").unwrap();

        let workspace = AnalysisWorkspace::acquire(&path).await.unwrap();

        assertor::assert_that!(workspace.path().exists()).is_true();
        assertor::assert_that!(workspace.path().join("leftover.whl").exists()).is_false();
        workspace.cleanup();
    }

    #[tokio::test]
    async fn should_remove_directory_on_cleanup() {
        let temp = TempDir::new().expect("Cant create temp dir");
        let path = working_dir(&temp);

        let workspace = AnalysisWorkspace::acquire(&path).await.unwrap();
        fs::write(workspace.path().join("bandit.csv"), "filename,issue_severity").unwrap();
        workspace.cleanup();

        assertor::assert_that!(path.exists()).is_false()
    }

    #[tokio::test]
    async fn should_remove_directory_when_handle_goes_out_of_scope() {
        let temp = TempDir::new().expect("Cant create temp dir");
        let path = working_dir(&temp);

        {
            let _workspace = AnalysisWorkspace::acquire(&path).await.unwrap();
        }

        assertor::assert_that!(path.exists()).is_false()
    }

    #[tokio::test]
    async fn should_not_hand_out_working_directory_twice() {
        let temp = TempDir::new().expect("Cant create temp dir");
        let first_path = working_dir(&temp);
        let second_path = Utf8PathBuf::try_from(temp.path().join("other")).unwrap();

        let holder = AnalysisWorkspace::acquire(&first_path).await.unwrap();

        let contender = tokio::time::timeout(Duration::from_millis(200), AnalysisWorkspace::acquire(&second_path)).await;

        assertor::assert_that!(contender).is_err();
        holder.cleanup();
    }
}
