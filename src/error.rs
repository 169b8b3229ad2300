//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义 crate 级统一的 `AppError` 枚举，汇总各模块错误，供命令行入口统一处理。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `ImageError`、`std::io::Error` 提供 `From` 转换，配合 `?` 使用。
//! - 实现 `Serialize` 将错误序列化为字符串，便于以 JSON 形式输出。

use serde::Serialize;

use crate::image_handler::ImageError;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 图片处理流水线错误（加载 / 解码 / 转换）
    #[error("{0}")]
    Image(#[from] ImageError),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),

    /// 配置文件无法解析或取值非法
    #[error("配置错误: {0}")]
    Config(String),
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_error_converts_and_serializes_as_string() {
        let err: AppError = ImageError::ResourceLimit("too big".to_string()).into();
        let json = serde_json::to_string(&err).expect("serialize should succeed");

        assert_eq!(json, "\"资源限制：too big\"");
    }
}
