use failure::Fail;
use std::io;

/// workpool 错误类型.
#[derive(Debug, Fail)]
pub enum PoolError {
    /// IO 错误.
    #[fail(display = "{}", _0)]
    Io(#[cause] io::Error),
    /// 向已关闭的线程池提交任务或重复关闭.
    #[fail(display = "Pool has been shut down")]
    PoolShutDown,
    /// 未注册的线程池编号.
    #[fail(display = "Unknown pool id: {}", _0)]
    UnknownPool(u32),
    /// 线程池编号已被占用.
    #[fail(display = "Pool id {} already exists", _0)]
    PoolExists(u32),
    /// 批任务尚未完成,线程池已被销毁.
    #[fail(display = "Batch was abandoned before completion")]
    BatchAbandoned,
    /// 带错误信息的字符串.
    #[fail(display = "{}", _0)]
    StringError(String),
}

impl From<io::Error> for PoolError {
    fn from(err: io::Error) -> PoolError {
        PoolError::Io(err)
    }
}

/// workpool中的Result类型
pub type Result<T> = std::result::Result<T, PoolError>;
