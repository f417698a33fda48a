// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::MetricsSettings;
use metrics::{describe_counter, describe_histogram, Unit};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

/// 初始化指标系统
///
/// 安装 Prometheus 导出器并注册改写流程的各项指标。
/// 导出器安装失败（如端口被占用）只记录警告，不影响服务启动
pub fn init_metrics(settings: &MetricsSettings) {
    if !settings.enabled {
        info!("Metrics exporter disabled");
        return;
    }

    let addr: SocketAddr = match settings.listen_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!(
                "Invalid metrics listen address {}: {}",
                settings.listen_addr, e
            );
            return;
        }
    };

    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!("Failed to install Prometheus recorder: {}. This might happen if the port is already in use.", e);
        return;
    }

    describe_metrics();
    info!("Metrics exporter listening on {}", addr);
}

fn describe_metrics() {
    describe_counter!("rewrite_runs_total", "Total number of rewrite runs started");
    describe_counter!(
        "rewrite_runs_completed_total",
        "Total number of rewrite runs that persisted a result"
    );
    describe_counter!(
        "rewrite_runs_failed_total",
        "Total number of rewrite runs that ended in an error, by category"
    );
    describe_counter!(
        "rewrite_extraction_strategy_total",
        "Final extractions by the strategy that produced them"
    );
    describe_counter!(
        "rewrite_source_cache_total",
        "Original source lookups by cache outcome"
    );
    describe_histogram!(
        "rewrite_run_duration_seconds",
        Unit::Seconds,
        "Duration of rewrite runs in seconds"
    );
}
