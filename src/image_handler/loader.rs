//! # 加载与校验模块
//!
//! ## 设计思路
//!
//! 统一处理不同来源（内存字节 / Base64 / 本地文件）的原始字节加载，并在"尽可能早"的阶段执行输入校验。
//! 目标是尽快失败，减少不必要内存与 CPU 消耗。本模块不做任何网络访问。
//!
//! ## 实现思路
//!
//! - 内存字节：体积限制 + 签名校验。
//! - Base64：先估算解码后体积，再解码，再签名校验。
//! - 文件：存在性 + metadata 体积限制 + 读取 + 签名校验。

use base64::{Engine as _, engine::general_purpose};
use std::path::Path;

use super::source::RawImageData;
use super::{ImageConfig, ImageError, ImageHandler};

impl ImageHandler {
    /// 接收调用方已加载好的字节。
    pub(super) fn load_from_bytes(
        &self,
        bytes: Vec<u8>,
        config: &ImageConfig,
    ) -> Result<RawImageData, ImageError> {
        log::debug!("📦 接收内存图片 - {} 字节", bytes.len());

        Self::ensure_within_file_limit(bytes.len() as u64, config.max_file_size, "内存数据")?;
        Self::validate_image_signature(&bytes)?;

        Ok(RawImageData {
            bytes,
            source_hint: "bytes",
        })
    }

    /// 从 Base64 字符串加载图片原始字节。
    pub(super) fn load_from_base64(
        &self,
        data: &str,
        config: &ImageConfig,
    ) -> Result<RawImageData, ImageError> {
        log::info!("📝 开始处理 base64 图片");

        let bytes = Self::parse_base64_with_limit(data, config.max_file_size)?;
        Self::ensure_within_file_limit(bytes.len() as u64, config.max_file_size, "Base64 解码结果")?;
        Self::validate_image_signature(&bytes)?;

        Ok(RawImageData {
            bytes,
            source_hint: "base64",
        })
    }

    /// 从本地路径加载图片原始字节。
    pub(super) fn load_from_file(
        &self,
        path: &str,
        config: &ImageConfig,
    ) -> Result<RawImageData, ImageError> {
        log::info!("📁 开始读取本地图片 - 路径: {}", path);

        let file_path = Path::new(path);
        if !file_path.exists() {
            return Err(ImageError::FileSystem(format!("文件不存在：{}", path)));
        }

        let metadata = std::fs::metadata(file_path)
            .map_err(|e| ImageError::FileSystem(format!("无法读取文件信息：{}", e)))?;
        Self::ensure_within_file_limit(metadata.len(), config.max_file_size, "文件")?;

        let bytes = std::fs::read(file_path)
            .map_err(|e| ImageError::FileSystem(format!("无法读取图片文件：{}", e)))?;
        Self::validate_image_signature(&bytes)?;

        Ok(RawImageData {
            bytes,
            source_hint: "file",
        })
    }

    fn ensure_within_file_limit(len: u64, limit: u64, what: &str) -> Result<(), ImageError> {
        if len > limit {
            return Err(ImageError::ResourceLimit(format!(
                "{}过大：{:.2} MB（限制：{:.2} MB）",
                what,
                len as f64 / 1024.0 / 1024.0,
                limit as f64 / 1024.0 / 1024.0
            )));
        }
        Ok(())
    }

    /// Base64 解码后长度的上界（每 4 个字符至多 3 字节）。
    fn estimate_base64_decoded_upper_bound_len(base64_data: &str) -> Result<u64, ImageError> {
        let len = base64_data.trim().len() as u64;
        let groups = len
            .checked_add(3)
            .ok_or_else(|| ImageError::ResourceLimit("Base64 输入长度溢出".to_string()))?
            / 4;

        groups
            .checked_mul(3)
            .ok_or_else(|| ImageError::ResourceLimit("Base64 解码体积估算溢出".to_string()))
    }

    fn parse_base64_with_limit(data: &str, max_file_size: u64) -> Result<Vec<u8>, ImageError> {
        let normalized = data.trim();

        let payload = if normalized.starts_with("data:image/") {
            let marker = normalized
                .find(";base64,")
                .ok_or_else(|| ImageError::InvalidFormat("缺少 base64 标记".to_string()))?;
            &normalized[marker + ";base64,".len()..]
        } else {
            normalized
        };

        let estimated_len = Self::estimate_base64_decoded_upper_bound_len(payload)?;
        if estimated_len > max_file_size {
            return Err(ImageError::ResourceLimit(format!(
                "Base64 预计解码体积过大：{:.2} MB（限制：{:.2} MB）",
                estimated_len as f64 / 1024.0 / 1024.0,
                max_file_size as f64 / 1024.0 / 1024.0
            )));
        }

        general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| ImageError::Decode(format!("Base64 解码失败：{}", e)))
    }

    /// 按文件头签名确认是图片，拒绝伪装扩展名或空内容。
    pub(super) fn validate_image_signature(bytes: &[u8]) -> Result<(), ImageError> {
        if bytes.is_empty() {
            return Err(ImageError::InvalidFormat("图片内容为空".to_string()));
        }

        let kind = infer::get(bytes)
            .ok_or_else(|| ImageError::InvalidFormat("无法识别图片类型".to_string()))?;

        if kind.matcher_type() != infer::MatcherType::Image {
            return Err(ImageError::InvalidFormat(format!(
                "文件签名不是图片类型：{}",
                kind.mime_type()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PNG_SIGNATURE: [u8; 16] = [
        137, 80, 78, 71, 13, 10, 26, 10, 0, 0, 0, 13, 73, 72, 68, 82,
    ];

    #[test]
    fn load_from_base64_rejects_non_image_payload() {
        let handler = ImageHandler::new(ImageConfig::default()).expect("handler init failed");
        let config = ImageConfig::default();

        let result = handler.load_from_base64("SGVsbG8=", &config);

        assert!(matches!(result, Err(ImageError::InvalidFormat(_))));
    }

    #[test]
    fn load_from_base64_accepts_data_url() {
        let handler = ImageHandler::new(ImageConfig::default()).expect("handler init failed");
        let config = ImageConfig::default();
        let encoded = general_purpose::STANDARD.encode(PNG_SIGNATURE);

        let raw = handler
            .load_from_base64(&format!("data:image/png;base64,{}", encoded), &config)
            .expect("data url should load");

        assert_eq!(raw.bytes, PNG_SIGNATURE);
        assert_eq!(raw.source_hint, "base64");
    }

    #[test]
    fn parse_base64_with_limit_rejects_large_payload_before_decode() {
        let huge = "A".repeat(1024 * 1024);
        let result = ImageHandler::parse_base64_with_limit(&huge, 32);

        assert!(matches!(result, Err(ImageError::ResourceLimit(_))));
    }

    #[test]
    fn data_url_without_marker_is_rejected() {
        let result = ImageHandler::parse_base64_with_limit("data:image/png,abcd", 1024);

        assert!(matches!(result, Err(ImageError::InvalidFormat(_))));
    }

    #[test]
    fn load_from_file_reports_missing_file() {
        let handler = ImageHandler::new(ImageConfig::default()).expect("handler init failed");
        let config = ImageConfig::default();

        let result = handler.load_from_file("/definitely/not/here.gif", &config);

        assert!(matches!(result, Err(ImageError::FileSystem(_))));
    }

    #[test]
    fn load_from_file_enforces_size_limit() {
        let handler = ImageHandler::new(ImageConfig::default()).expect("handler init failed");
        let mut config = ImageConfig::default();
        config.max_file_size = 8;

        let mut file = tempfile::NamedTempFile::new().expect("create temp file failed");
        file.write_all(&PNG_SIGNATURE).expect("write temp file failed");
        let path = file.path().to_string_lossy().to_string();

        let result = handler.load_from_file(&path, &config);

        assert!(matches!(result, Err(ImageError::ResourceLimit(_))));
    }

    #[test]
    fn load_from_bytes_rejects_html() {
        let handler = ImageHandler::new(ImageConfig::default()).expect("handler init failed");
        let config = ImageConfig::default();

        let result = handler.load_from_bytes(b"<html><body>nope</body></html>".to_vec(), &config);

        assert!(matches!(result, Err(ImageError::InvalidFormat(_))));
    }
}
