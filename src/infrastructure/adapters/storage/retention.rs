//! File Retention - 生成文件与临时变调文件的文件系统清理
//!
//! 实现 RetentionPort trait

use async_trait::async_trait;
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use walkdir::WalkDir;

use crate::application::leases::TransientLeases;
use crate::application::ports::{RetentionPort, SweepReport};
use crate::domain::naming;

/// 文件系统清理器
///
/// - 输出目录下的 `voice_*.wav` 超龄删除
/// - 基础音频同目录下的 `<基础音频>_shifted_<n>.wav` 无论新旧都删除，但跳过正被请求占用的
///
/// 两类目录都只扫描一层，不进入子目录
#[derive(Clone)]
pub struct FileRetentionManager {
    output_dir: PathBuf,
    base_clips: Vec<PathBuf>,
    leases: Option<Arc<TransientLeases>>,
}

impl FileRetentionManager {
    pub fn new(output_dir: impl Into<PathBuf>, base_clips: Vec<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            base_clips,
            leases: None,
        }
    }

    /// 关联请求的临时文件租约表
    pub fn with_leases(mut self, leases: Arc<TransientLeases>) -> Self {
        self.leases = Some(leases);
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// 以给定的当前时间执行一次清理（阻塞）
    pub fn sweep_at(&self, now: SystemTime, max_age: Duration) -> SweepReport {
        let mut report = SweepReport::default();
        let mut seen: HashSet<PathBuf> = HashSet::new();

        for path in list_files(&self.output_dir) {
            if !naming::is_artifact_file(&path) || !seen.insert(path.clone()) {
                continue;
            }
            if is_expired(&path, now, max_age) {
                if remove(&path) {
                    report.deleted_artifacts += 1;
                } else {
                    report.failed += 1;
                }
            }
        }

        for base_clip in &self.base_clips {
            for path in list_files(&naming::transient_dir(base_clip)) {
                if !naming::is_transient_of(base_clip, &path) || !seen.insert(path.clone()) {
                    continue;
                }

                // 删除期间持有占用，请求无法在此期间写入同一路径
                let _claim = match &self.leases {
                    Some(leases) => match leases.try_acquire(&path) {
                        Some(lease) => Some(lease),
                        None => {
                            tracing::debug!(path = %path.display(), "Transient in use, skipped");
                            continue;
                        }
                    },
                    None => None,
                };

                if remove(&path) {
                    report.deleted_transients += 1;
                } else {
                    report.failed += 1;
                }
            }
        }

        report
    }
}

/// 目录下的普通文件（一层）
fn list_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        tracing::debug!(root = %dir.display(), "Sweep root missing, skipped");
        return Vec::new();
    }

    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(root = %dir.display(), error = %e, "Failed to walk directory");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect()
}

fn is_expired(path: &Path, now: SystemTime, max_age: Duration) -> bool {
    match std::fs::metadata(path).and_then(|m| m.modified()) {
        Ok(mtime) => now.duration_since(mtime).map_or(false, |age| age > max_age),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read mtime");
            false
        }
    }
}

/// 删除文件，已不存在视为成功
fn remove(path: &Path) -> bool {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "Deleted");
            true
        }
        Err(e) if e.kind() == ErrorKind::NotFound => true,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to delete file");
            false
        }
    }
}

#[async_trait]
impl RetentionPort for FileRetentionManager {
    async fn sweep(&self, max_age: Duration) -> SweepReport {
        let manager = self.clone();
        match tokio::task::spawn_blocking(move || manager.sweep_at(SystemTime::now(), max_age)).await {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!(error = %e, "Sweep task failed");
                SweepReport::default()
            }
        }
    }
}
