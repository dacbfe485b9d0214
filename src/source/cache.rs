use crate::error::PipelineError;
use crate::models::RawTable;
use crate::source::csv_loader::load_table;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

struct CachedTable {
    table: Arc<RawTable>,
    loaded_at: Instant,
}

/// 进程级原始表缓存
///
/// 表加载后只读，过期或手动失效后整体重新加载，从不局部更新。
pub struct DatasetCache {
    path: PathBuf,
    ttl: Duration,
    slot: RwLock<Option<CachedTable>>,
}

impl DatasetCache {
    pub fn new(path: PathBuf, ttl: Duration) -> Self {
        Self {
            path,
            ttl,
            slot: RwLock::new(None),
        }
    }

    fn fresh(&self, cached: &Option<CachedTable>) -> Option<Arc<RawTable>> {
        cached
            .as_ref()
            .filter(|c| c.loaded_at.elapsed() < self.ttl)
            .map(|c| c.table.clone())
    }

    /// 获取原始表，缓存失效时从文件重新加载
    pub async fn get(&self) -> Result<Arc<RawTable>, PipelineError> {
        let cached = self.fresh(&*self.slot.read().await);
        if let Some(table) = cached {
            return Ok(table);
        }

        let mut guard = self.slot.write().await;
        // 等待写锁期间可能已被其他请求加载
        if let Some(table) = self.fresh(&guard) {
            return Ok(table);
        }

        tracing::info!("Dataset cache miss, loading {}", self.path.display());
        let path = self.path.clone();
        let table = tokio::task::spawn_blocking(move || load_table(&path))
            .await
            .map_err(|e| PipelineError::Io(io::Error::new(io::ErrorKind::Other, e)))??;

        let table = Arc::new(table);
        *guard = Some(CachedTable {
            table: table.clone(),
            loaded_at: Instant::now(),
        });
        Ok(table)
    }

    /// 手动失效
    pub async fn invalidate(&self) {
        let mut guard = self.slot.write().await;
        if guard.take().is_some() {
            tracing::info!("Dataset cache invalidated");
        }
    }
}
