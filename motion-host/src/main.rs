//! # motion-host
//!
//! 无界面回放 `ui-motion` 场景，输出每个组件的最终布局、完成回调次数与效果状态。
//!
//! ## 用法
//!
//! ```bash
//! cargo run -p motion-host -- --scene motion-host/scenes/demo.json
//! cargo run -p motion-host -- --scene motion-host/scenes/demo.json --frames 30 --fps 30
//! cargo run -p motion-host -- --scene motion-host/scenes/demo.json --json
//! cargo run -p motion-host -- --init-config
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use motion_host::{AppConfig, Scene, SceneRunner};
use tracing::{Level, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "motion-host")]
#[command(about = "无界面回放 UI 过渡场景")]
#[command(version)]
struct Cli {
    /// 配置文件（默认：config.json）
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// 场景文件，未指定时使用配置中的 default_scene
    #[arg(short, long)]
    scene: Option<PathBuf>,

    /// 回放帧数
    #[arg(short, long)]
    frames: Option<u32>,

    /// 帧率
    #[arg(long)]
    fps: Option<u32>,

    /// 日志级别（trace/debug/info/warn/error）
    #[arg(long)]
    log_level: Option<String>,

    /// 以 JSON 输出报告
    #[arg(long)]
    json: bool,

    /// 把默认配置写入 --config 指定的路径后退出
    #[arg(long)]
    init_config: bool,
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("motion-host error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn real_main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.init_config {
        AppConfig::default().save(&cli.config)?;
        eprintln!("已写入默认配置: {}", cli.config.display());
        return Ok(());
    }

    // 配置缺失或无效时回退到默认值，警告在订阅者安装后补记
    let loaded = AppConfig::try_load(&cli.config);
    let mut config = loaded.as_ref().cloned().unwrap_or_default();
    if let Some(fps) = cli.fps {
        config.fps = fps;
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }

    init_tracing(config.level()?);
    match &loaded {
        Ok(_) => info!(path = %cli.config.display(), "配置文件加载成功"),
        Err(e) => warn!(error = %e, "使用默认配置"),
    }
    config.validate()?;

    let scene_path = cli
        .scene
        .or_else(|| config.default_scene.clone())
        .context("未指定场景：使用 --scene 或在配置中设置 default_scene")?;
    let scene = Scene::load(&scene_path)
        .with_context(|| format!("加载场景失败: {}", scene_path.display()))?;

    // 命令行 > 场景 > 配置
    let fps = cli.fps.or(scene.fps).unwrap_or(config.fps);
    let frames = cli.frames.or(scene.frames).unwrap_or(config.max_frames);

    let mut runner = SceneRunner::new(&scene, fps)?;
    let report = runner.run(frames);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.summary());
    }
    Ok(())
}

/// 安装 fmt 订阅者；设置了 `RUST_LOG` 时以它为准
fn init_tracing(level: Level) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
