//! 性能统计
//!
//! 每个指标只保留最近 [`MAX_SAMPLES`] 个样本

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Instant;
use tracing::info;

/// 每个指标保留的样本数
pub const MAX_SAMPLES: usize = 1000;

/// 指标统计
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MetricStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub count: usize,
}

/// 线程安全的性能记录器
#[derive(Debug, Default)]
pub struct PerformanceMonitor {
    metrics: Mutex<HashMap<String, VecDeque<f64>>>,
}

impl PerformanceMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_metrics<T>(&self, f: impl FnOnce(&mut HashMap<String, VecDeque<f64>>) -> T) -> T {
        // 记录方 panic 不应让统计失效
        let mut metrics = self.metrics.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut metrics)
    }

    /// 记录一个样本
    pub fn record(&self, name: &str, value: f64) {
        self.with_metrics(|metrics| {
            let samples = metrics.entry(name.to_string()).or_default();
            samples.push_back(value);
            while samples.len() > MAX_SAMPLES {
                samples.pop_front();
            }
        });
    }

    /// 最近 `last_n` 个样本的平均值，没有样本时为 0
    pub fn average(&self, name: &str, last_n: usize) -> f64 {
        self.stats(name, last_n).avg
    }

    /// 最近 `last_n` 个样本的统计
    pub fn stats(&self, name: &str, last_n: usize) -> MetricStats {
        self.with_metrics(|metrics| {
            let Some(samples) = metrics.get(name).filter(|s| !s.is_empty()) else {
                return MetricStats::default();
            };

            let skip = samples.len().saturating_sub(last_n);
            let recent: Vec<f64> = samples.iter().skip(skip).copied().collect();
            if recent.is_empty() {
                return MetricStats::default();
            }

            let sum: f64 = recent.iter().sum();
            MetricStats {
                min: recent.iter().copied().fold(f64::INFINITY, f64::min),
                max: recent.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                avg: sum / recent.len() as f64,
                count: recent.len(),
            }
        })
    }

    /// 计时执行 `f`，耗时以毫秒记入 `name`
    pub fn measure<T>(&self, name: &str, f: impl FnOnce() -> T) -> T {
        let started = Instant::now();
        let result = f();
        self.record(name, started.elapsed().as_secs_f64() * 1000.0);
        result
    }

    /// 已有样本的指标名，按字母序
    pub fn metric_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.with_metrics(|metrics| metrics.keys().cloned().collect());
        names.sort();
        names
    }

    /// 输出所有指标的统计
    pub fn log_summary(&self) {
        let names = self.metric_names();
        if names.is_empty() {
            return;
        }

        info!("⏱️ 性能统计:");
        for name in names {
            let stats = self.stats(&name, MAX_SAMPLES);
            info!(
                "  {}: 平均 {:.2}ms | 最小 {:.2}ms | 最大 {:.2}ms | 样本 {}",
                name, stats.avg, stats.min, stats.max, stats.count
            );
        }
    }
}
