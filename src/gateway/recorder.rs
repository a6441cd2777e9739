//! Prometheus 指标导出

use anyhow::{Context, Result};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// 直方图等指标的定期维护间隔
const UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

/// 安装全局指标记录器并返回渲染句柄
///
/// 每个进程只能调用一次
pub fn install_recorder() -> Result<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")
}

/// 后台定期执行记录器维护
pub fn spawn_upkeep(handle: PrometheusHandle) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(UPKEEP_INTERVAL);
        loop {
            interval.tick().await;
            handle.run_upkeep();
        }
    });
}
