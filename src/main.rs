// ==========================================
// 孵化场生产管理系统 - 命令行入口
// ==========================================
// 用法: hatchery-ops [snapshot.json]
// 载入配置与可选的数据快照，输出驾驶舱总览 JSON
// ==========================================

use std::path::PathBuf;

use anyhow::Context;

use hatchery_ops::app::{get_default_config_path, load_snapshot, AppState};
use hatchery_ops::config::ConfigManager;
use hatchery_ops::logging;

fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", hatchery_ops::APP_NAME);
    tracing::info!("系统版本: {}", hatchery_ops::VERSION);
    tracing::info!("==================================================");

    let config_path = get_default_config_path();
    tracing::info!("使用配置: {}", config_path.display());
    let config = ConfigManager::load(Some(config_path.as_path())).context("无法加载配置")?;

    let state = AppState::new(&config).context("无法初始化AppState")?;

    if let Some(snapshot_path) = std::env::args().nth(1).map(PathBuf::from) {
        load_snapshot(&state, &snapshot_path)
            .with_context(|| format!("无法载入数据快照: {}", snapshot_path.display()))?;
    }

    let overview = state.report_api.dashboard_overview()?;
    println!("{}", serde_json::to_string_pretty(&overview)?);

    Ok(())
}
