/*!
 * 错误处理模块
 *
 * 应用层（运行时、CLI）统一使用 anyhow，模块内部错误使用各自的 thiserror 枚举，
 * 通过 `?` 与 `.context(...)` 汇入 AppError。
 */

use anyhow::anyhow;

/// 统一的应用程序结果类型
pub type AppResult<T> = anyhow::Result<T>;

/// 统一的应用程序错误类型
pub type AppError = anyhow::Error;

/// 创建简单的应用程序错误
pub fn app_error(msg: impl Into<String>) -> AppError {
    anyhow!(msg.into())
}

/// 创建带上下文的错误转换函数
///
/// 返回一个闭包，将任何实现了 Display 的错误转换为带有指定上下文信息的 AppError。
pub fn app_error_with_context<T>(msg: &str) -> impl FnOnce(T) -> AppError + '_
where
    T: std::fmt::Display + std::fmt::Debug + Send + Sync + 'static,
{
    move |err| anyhow!("{}: {}", msg, err)
}

/// 快速创建错误并返回
#[macro_export]
macro_rules! app_bail {
    ($msg:literal $(,)?) => {
        return Err(anyhow::anyhow!($msg))
    };
    ($err:expr $(,)?) => {
        return Err(anyhow::anyhow!($err))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err(anyhow::anyhow!($fmt, $($arg)*))
    };
}

/// 序列化为 JSON 文本，失败时附带上下文
pub fn serialize_to_json<T: serde::Serialize>(value: &T, context: &str) -> AppResult<String> {
    serde_json::to_string(value).map_err(app_error_with_context(context))
}
