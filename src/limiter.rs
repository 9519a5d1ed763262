//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块实现了并发限制器，限制同时在途的上游生成调用数量。

use crate::error::{CacheError, Result};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::debug;

/// 默认并发上限
pub const DEFAULT_MAX_CONCURRENT: usize = 3;

/// 并发限制器
///
/// 基于公平（FIFO）信号量；所有共享同一实例的调用方合计最多 `max` 个任务同时执行。
/// 克隆得到的实例共享同一组许可
#[derive(Debug, Clone)]
pub struct ConcurrencyLimiter {
    permits: Arc<Semaphore>,
    in_flight: Arc<AtomicUsize>,
    max: usize,
}

impl Default for ConcurrencyLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONCURRENT)
    }
}

/// 任务结束（包括被取消）时归还在途计数
struct InFlightGuard<'a>(&'a AtomicUsize);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ConcurrencyLimiter {
    /// 创建新的并发限制器，`max` 至少为1
    pub fn new(max: usize) -> Self {
        let max = max.max(1);
        Self {
            permits: Arc::new(Semaphore::new(max)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max,
        }
    }

    /// 在限制下执行任务
    ///
    /// 已有 `max` 个任务在执行时排队等待；任务的返回值原样返回。
    /// 限制器关闭后返回 `ShuttingDown`
    pub async fn schedule<F, T>(&self, task: F) -> Result<T>
    where
        F: Future<Output = T>,
    {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| CacheError::ShuttingDown)?;
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = InFlightGuard(&self.in_flight);
        debug!(in_flight = current, max = self.max, "generation slot acquired");
        Ok(task.await)
    }

    /// 关闭限制器，排队中和之后的调用都会被拒绝
    pub fn close(&self) {
        self.permits.close();
    }

    pub fn is_closed(&self) -> bool {
        self.permits.is_closed()
    }

    /// 当前在途任务数
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// 当前可用许可数
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// 并发上限
    pub fn max(&self) -> usize {
        self.max
    }
}
