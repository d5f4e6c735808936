//! 以整数编号寻址多个线程池的注册表

use crossbeam_skiplist::SkipMap;

use crate::error::{PoolError, Result};
use crate::pool::{BatchHandle, WorkerPool};

/// 未显式指定编号时使用的默认线程池编号
pub const DEFAULT_POOL_ID: u32 = 1;

/// 线程池注册表
///
/// 编号到池的映射,由调用方持有,可跨线程共享引用使用。
/// 各池的大小相互独立,查询未注册的编号返回错误而不是崩溃。
pub struct PoolRegistry {
    pools: SkipMap<u32, WorkerPool>,
}

impl PoolRegistry {
    /// 创建空注册表
    pub fn new() -> PoolRegistry {
        PoolRegistry {
            pools: SkipMap::new(),
        }
    }

    /// 以给定编号注册一个默认大小的线程池
    ///
    /// 不会替换既有线程池;注册发生在启动阶段,
    /// 同一编号的并发注册不在约定范围内。
    ///
    /// # Errors
    ///
    /// 编号已被占用时返回`PoolError::PoolExists`
    pub fn create_pool(&self, id: u32) -> Result<()> {
        if self.pools.contains_key(&id) {
            return Err(PoolError::PoolExists(id));
        }
        self.pools.insert(id, WorkerPool::with_default_size()?);
        Ok(())
    }

    /// 向默认线程池提交任务
    ///
    /// # Errors
    ///
    /// 默认线程池未注册时返回`PoolError::UnknownPool`
    pub fn submit<F>(&self, action: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.submit_to(DEFAULT_POOL_ID, action)
    }

    /// 向给定编号的线程池提交任务
    ///
    /// # Errors
    ///
    /// 编号未注册时返回`PoolError::UnknownPool`
    pub fn submit_to<F>(&self, id: u32, action: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let entry = self.pools.get(&id).ok_or(PoolError::UnknownPool(id))?;
        entry.value().submit(action)
    }

    /// 向给定编号的线程池提交一批任务,返回联合完成句柄
    ///
    /// # Errors
    ///
    /// 编号未注册时返回`PoolError::UnknownPool`
    pub fn submit_batch<I>(&self, id: u32, actions: I) -> Result<BatchHandle>
    where
        I: IntoIterator,
        I::Item: FnOnce() + Send + 'static,
    {
        let entry = self.pools.get(&id).ok_or(PoolError::UnknownPool(id))?;
        entry.value().submit_batch(actions)
    }

    /// 关闭并移除给定编号的线程池
    ///
    /// 阻塞直到该池的全部工作线程退出。移除后编号可再次注册。
    ///
    /// # Errors
    ///
    /// 编号未注册时返回`PoolError::UnknownPool`
    pub fn dispose(&self, id: u32) -> Result<()> {
        let entry = self.pools.remove(&id).ok_or(PoolError::UnknownPool(id))?;
        entry.value().shutdown()
    }

    /// 给定编号的线程池是否已注册
    pub fn contains(&self, id: u32) -> bool {
        self.pools.contains_key(&id)
    }
}

impl Default for PoolRegistry {
    fn default() -> PoolRegistry {
        PoolRegistry::new()
    }
}
