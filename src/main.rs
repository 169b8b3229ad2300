//! # chat-media：命令行入口
//!
//! 本文件仅负责日志初始化、参数解析与配置装载。
//! 业务逻辑分布在各子模块中，详见 `lib.rs` 架构文档。

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chat_media::error::AppError;
use chat_media::image_handler::{
    ImageConfig, ImageHandler, ImagePerformanceProfile, ImageSource, LoadedImage,
};
use clap::{Parser, Subcommand};
use image::ImageFormat;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "chat-media", version, about = "聊天图片解码与发送前处理")]
struct Cli {
    /// JSON 配置文件（缺省字段使用默认值）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 性能档位：quality / balanced / speed
    #[arg(long, global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 解码图片并输出静态/动画信息
    Inspect {
        file: PathBuf,
        /// 以 JSON 输出
        #[arg(long)]
        json: bool,
    },
    /// 转换为待发送的 JPEG 数据
    Convert { file: PathBuf, output: PathBuf },
    /// 生成 PNG 缩略图
    Thumbnail { file: PathBuf, output: PathBuf },
}

#[derive(Serialize)]
struct InspectReport {
    kind: &'static str,
    width: u32,
    height: u32,
    frames: usize,
    ticks: usize,
    tick_ms: u128,
    total_seconds: f64,
    timing_fallback: bool,
}

impl From<&LoadedImage> for InspectReport {
    fn from(loaded: &LoadedImage) -> Self {
        let (width, height) = loaded.dimensions();
        match loaded {
            LoadedImage::Static(_) => Self {
                kind: "static",
                width,
                height,
                frames: 1,
                ticks: 1,
                tick_ms: 0,
                total_seconds: 0.0,
                timing_fallback: false,
            },
            LoadedImage::Animated(timeline) => Self {
                kind: "animated",
                width,
                height,
                frames: timeline.frame_count(),
                ticks: timeline.tick_count(),
                tick_ms: timeline.tick_duration().as_millis(),
                total_seconds: timeline.total_seconds(),
                timing_fallback: timeline.is_timing_fallback(),
            },
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let json_output = matches!(cli.command, Command::Inspect { json: true, .. });

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if json_output {
                let payload = serde_json::json!({ "error": err });
                println!("{}", payload);
            } else {
                log::error!("❌ {}", err);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let handler = ImageHandler::new(load_config(cli.config.as_deref())?)?;

    if let Some(profile) = cli.profile.as_deref() {
        handler.set_performance_profile(ImagePerformanceProfile::from_str(profile)?)?;
    }

    match cli.command {
        Command::Inspect { file, json } => {
            let loaded = handler.load(file_source(&file))?;
            let report = InspectReport::from(&loaded);

            if json {
                let text = serde_json::to_string_pretty(&report)
                    .map_err(|e| AppError::Config(format!("序列化结果失败: {}", e)))?;
                println!("{}", text);
            } else {
                println!(
                    "{} {}x{} frames={} ticks={} tick={}ms total={:.3}s{}",
                    report.kind,
                    report.width,
                    report.height,
                    report.frames,
                    report.ticks,
                    report.tick_ms,
                    report.total_seconds,
                    if report.timing_fallback { " (timing fallback)" } else { "" }
                );
            }
        }
        Command::Convert { file, output } => {
            let loaded = handler.load(file_source(&file))?;
            let data = handler.convert_to_data(&loaded)?;
            fs::write(&output, &data)?;
            log::info!("📤 已写入 {}（{} KB）", output.display(), data.len() / 1024);
        }
        Command::Thumbnail { file, output } => {
            let loaded = handler.load(file_source(&file))?;
            let thumb = handler.thumbnail(&loaded)?;
            thumb
                .save_with_format(&output, ImageFormat::Png)
                .map_err(|e| AppError::Io(std::io::Error::other(e)))?;
            log::info!("🖼️ 缩略图 {}x{} 已写入 {}", thumb.width(), thumb.height(), output.display());
        }
    }

    Ok(())
}

fn file_source(path: &Path) -> ImageSource {
    ImageSource::FilePath(path.to_string_lossy().to_string())
}

fn load_config(path: Option<&Path>) -> Result<ImageConfig, AppError> {
    let Some(path) = path else {
        return Ok(ImageConfig::default());
    };

    let content = fs::read_to_string(path)?;
    serde_json::from_str::<ImageConfig>(&content)
        .map_err(|e| AppError::Config(format!("解析配置文件失败: {}", e)))
}
