//! # Config 模块
//!
//! 宿主运行配置。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (config.json)
//! 3. 默认值（最低）

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::Level;

/// 合法的日志级别名
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// 应用配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// 帧率（每秒推进调度器的次数）
    #[serde(default = "default_fps")]
    pub fps: u32,

    /// 日志级别（trace/debug/info/warn/error）
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// 未指定 `--scene` 时回放的场景
    #[serde(default)]
    pub default_scene: Option<PathBuf>,

    /// 场景没有声明帧数时的回放帧数
    #[serde(default = "default_max_frames")]
    pub max_frames: u32,
}

fn default_fps() -> u32 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_frames() -> u32 {
    600
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            log_level: default_log_level(),
            default_scene: None,
            max_frames: default_max_frames(),
        }
    }
}

impl AppConfig {
    /// 读取并解析配置文件
    ///
    /// 日志订阅者要等配置解析后才安装，所以这里不记录日志，
    /// 由调用方决定是否回退到默认配置。
    pub fn try_load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fps == 0 || self.fps > 1000 {
            return Err(ConfigError::ValidationFailed(format!(
                "帧率必须在 1 - 1000 之间: {}",
                self.fps
            )));
        }

        if self.max_frames == 0 {
            return Err(ConfigError::ValidationFailed(
                "max_frames 必须大于 0".to_string(),
            ));
        }

        self.level()?;

        if let Some(scene) = &self.default_scene
            && !scene.exists()
        {
            return Err(ConfigError::ValidationFailed(format!(
                "默认场景不存在: {}",
                scene.display()
            )));
        }

        Ok(())
    }

    /// 解析日志级别
    pub fn level(&self) -> Result<Level, ConfigError> {
        parse_level(&self.log_level)
    }

    /// 每帧时长（秒）
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.fps.max(1) as f32
    }
}

/// 解析日志级别名（不区分大小写）
pub fn parse_level(name: &str) -> Result<Level, ConfigError> {
    let lower = name.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&lower.as_str()) {
        return Err(ConfigError::ValidationFailed(format!(
            "未知的日志级别: {name}"
        )));
    }
    lower
        .parse()
        .map_err(|_| ConfigError::ValidationFailed(format!("未知的日志级别: {name}")))
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("配置文件不存在: {}", .0.display())]
    NotFound(PathBuf),

    #[error("配置 IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("配置解析失败: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("配置验证失败: {0}")]
    ValidationFailed(String),
}
