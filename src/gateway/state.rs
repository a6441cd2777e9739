//! Gateway 应用状态

use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

use crate::providers::ModelClient;

/// Gateway 应用状态
///
/// 模型客户端在启动时注入一次，之后只读；`None` 表示降级模式
#[derive(Clone)]
pub struct AppState {
    model: Option<Arc<dyn ModelClient>>,
    metrics: PrometheusHandle,
}

impl AppState {
    pub fn new(model: Option<Arc<dyn ModelClient>>, metrics: PrometheusHandle) -> Self {
        Self { model, metrics }
    }

    pub fn model(&self) -> Option<&Arc<dyn ModelClient>> {
        self.model.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.model.is_some()
    }

    pub fn metrics(&self) -> &PrometheusHandle {
        &self.metrics
    }
}
