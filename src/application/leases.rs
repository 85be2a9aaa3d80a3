//! Transient Leases - 临时变调文件的互斥占用
//!
//! 同一临时路径（同一基础音频 + 同一半音数）同一时刻只允许一个请求写入/使用/删除

use dashmap::DashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// 临时文件占用表
#[derive(Debug, Default)]
pub struct TransientLeases {
    locks: DashMap<PathBuf, Arc<Mutex<()>>>,
}

/// 临时文件占用凭证，drop 时释放
#[derive(Debug)]
pub struct TransientLease {
    _guard: OwnedMutexGuard<()>,
}

impl TransientLeases {
    pub fn new() -> Self {
        Self::default()
    }

    /// 等待并获取路径的占用
    pub async fn acquire(&self, path: &Path) -> TransientLease {
        let lock = self
            .locks
            .entry(lease_key(path))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        TransientLease {
            _guard: lock.lock_owned().await,
        }
    }

    /// 立即尝试获取占用，已被占用时返回 None
    ///
    /// 返回的凭证在 drop 前阻止请求写入该路径
    pub fn try_acquire(&self, path: &Path) -> Option<TransientLease> {
        let lock = self
            .locks
            .entry(lease_key(path))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        lock.try_lock_owned()
            .ok()
            .map(|guard| TransientLease { _guard: guard })
    }

    /// 路径当前是否被某个请求占用
    pub fn is_held(&self, path: &Path) -> bool {
        self.locks
            .get(&lease_key(path))
            .map_or(false, |lock| lock.try_lock().is_err())
    }
}

/// `./a.wav` 与 `a.wav` 视为同一路径
fn lease_key(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_lease_is_exclusive() {
        let leases = Arc::new(TransientLeases::new());
        let path = PathBuf::from("base_shifted_4.wav");

        let first = leases.acquire(&path).await;
        assert!(leases.is_held(&path));

        let contender = {
            let leases = leases.clone();
            let path = path.clone();
            tokio::spawn(async move {
                let _lease = leases.acquire(&path).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!contender.is_finished());

        drop(first);
        contender.await.unwrap();
        assert!(!leases.is_held(&path));
    }

    #[tokio::test]
    async fn test_distinct_paths_do_not_block() {
        let leases = TransientLeases::new();
        let _a = leases.acquire(Path::new("base_shifted_4.wav")).await;
        let _b = leases.acquire(Path::new("base_shifted_-2.wav")).await;
        assert!(leases.is_held(Path::new("base_shifted_4.wav")));
        assert!(leases.is_held(Path::new("base_shifted_-2.wav")));
        assert!(!leases.is_held(Path::new("base_shifted_5.wav")));
    }

    #[tokio::test]
    async fn test_try_acquire_excludes_waiters() {
        let leases = Arc::new(TransientLeases::new());
        let path = PathBuf::from("./kenny_shifted_2.wav");

        let claim = leases.try_acquire(&path).unwrap();
        assert!(leases.try_acquire(Path::new("kenny_shifted_2.wav")).is_none());

        let waiter = {
            let leases = leases.clone();
            let path = path.clone();
            tokio::spawn(async move {
                let _lease = leases.acquire(&path).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!waiter.is_finished());

        drop(claim);
        waiter.await.unwrap();
        assert!(leases.try_acquire(&path).is_some());
    }

    #[tokio::test]
    async fn test_current_dir_prefix_is_ignored() {
        let leases = TransientLeases::new();
        let _lease = leases.acquire(Path::new("./voices/kenny_shifted_4.wav")).await;
        assert!(leases.is_held(Path::new("voices/kenny_shifted_4.wav")));
    }
}
