//! 批量文档处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量文档的处理和题库管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：初始化日志文件、打开题库、加载外部答案表
//! 2. **扫描文档**：列出输入目录下所有支持的文件，按文件名排序
//! 3. **并发抽取**：使用 Semaphore 限制并发数量，分批抽取
//! 4. **顺序入库**：抽取结果按文档顺序写入题库
//! 5. **批次落盘**：每批完成后写盘（指数退避重试 + 熔断）
//! 6. **全局统计**：汇总所有文档的处理结果
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单个文档的细节
//! - **资源所有者**：唯一持有题库的模块
//! - **向下委托**：委托 document_processor 处理单个文档

use crate::config::Config;
use crate::extractor::ExtractionStats;
use crate::models::answer_key::AnswerKey;
use crate::models::loaders::{list_documents, load_answer_key};
use crate::orchestrator::document_processor::{self, DocumentOutcome, ImportStats};
use crate::services::{write_atomic, JsonFileSink, RecordSink};
use crate::utils::logging::{
    append_log_line, init_log_file, log_batch_complete, log_batch_start, log_documents_found,
    log_startup,
};
use crate::utils::metrics::PerformanceMonitor;
use crate::utils::retry::{retry_with_backoff, CircuitBreaker};
use crate::workflow::QuestionFlow;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// 熔断阈值：连续落盘失败次数
const FLUSH_FAILURE_THRESHOLD: u32 = 3;
/// 熔断后多久再尝试落盘
const FLUSH_RESET_TIMEOUT: Duration = Duration::from_secs(30);

/// 一次运行的统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// 文档总数
    pub documents: usize,
    /// 加载或抽取失败的文档数
    pub failed_documents: usize,
    pub extraction: ExtractionStats,
    pub import: ImportStats,
}

/// 应用主结构
pub struct App {
    config: Config,
    sink: JsonFileSink,
    answer_key: Option<Arc<AnswerKey>>,
    flow: QuestionFlow,
    monitor: Arc<PerformanceMonitor>,
    breaker: CircuitBreaker,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        init_log_file(&config.output_log_file)?;

        log_startup(config.max_concurrent_documents, &config.input_folder);

        // 打开题库
        let mut sink = JsonFileSink::open(&config.store_path)
            .await
            .with_context(|| format!("无法打开题库: {}", config.store_path.display()))?;
        if config.reset_store {
            sink.reset();
        }

        // 外部答案表
        let answer_key = match &config.answer_key_file {
            Some(path) => Some(Arc::new(load_answer_key(path).await.with_context(|| {
                format!("无法加载答案表: {}", path.display())
            })?)),
            None => None,
        };

        Ok(Self {
            flow: QuestionFlow::new(&config),
            config,
            sink,
            answer_key,
            monitor: Arc::new(PerformanceMonitor::new()),
            breaker: CircuitBreaker::new(FLUSH_FAILURE_THRESHOLD, FLUSH_RESET_TIMEOUT),
        })
    }

    /// 题库
    pub fn sink(&self) -> &JsonFileSink {
        &self.sink
    }

    /// 运行应用主逻辑
    pub async fn run(&mut self) -> Result<RunSummary> {
        info!("\n📁 正在扫描待处理的文档...");
        let documents = list_documents(&self.config.input_folder)
            .await
            .with_context(|| format!("无法扫描输入目录: {}", self.config.input_folder))?;

        let mut summary = RunSummary {
            documents: documents.len(),
            ..Default::default()
        };

        if documents.is_empty() {
            warn!("⚠️ 没有找到待处理的文档，程序结束");
            self.persist(true).await?;
            return Ok(summary);
        }

        log_documents_found(documents.len(), self.config.max_concurrent_documents);

        self.process_all_documents(&documents, &mut summary).await?;

        // 最后一次落盘不受熔断限制
        self.persist(true).await?;

        print_final_stats(&summary, self.sink.len(), &self.config);
        self.monitor.log_summary();

        Ok(summary)
    }

    /// 分批处理所有文档
    async fn process_all_documents(
        &mut self,
        documents: &[PathBuf],
        summary: &mut RunSummary,
    ) -> Result<()> {
        let batch_size = self.config.max_concurrent_documents;
        let semaphore = Arc::new(Semaphore::new(batch_size));
        let total = documents.len();
        let total_batches = total.div_ceil(batch_size);

        for batch_start in (0..total).step_by(batch_size) {
            let batch_end = (batch_start + batch_size).min(total);
            let batch_num = batch_start / batch_size + 1;

            log_batch_start(batch_num, total_batches, batch_start + 1, batch_end, total);

            let outcomes = self
                .extract_batch(&documents[batch_start..batch_end], batch_start, semaphore.clone())
                .await?;

            // 按文档顺序入库
            let mut success = 0;
            for outcome in &outcomes {
                match outcome {
                    Some(outcome) => {
                        let import =
                            document_processor::import_document(&self.flow, &mut self.sink, outcome)
                                .await;
                        summary.extraction.absorb(&outcome.stats);
                        summary.import.absorb(&import);
                        success += 1;
                        self.log_document(outcome, &import);
                    }
                    None => summary.failed_documents += 1,
                }
            }

            self.persist(false).await?;
            log_batch_complete(batch_num, success, outcomes.len());
        }

        Ok(())
    }

    /// 并发抽取一批文档，结果顺序与输入一致；失败的文档为 `None`
    async fn extract_batch(
        &self,
        batch: &[PathBuf],
        batch_start: usize,
        semaphore: Arc<Semaphore>,
    ) -> Result<Vec<Option<DocumentOutcome>>> {
        let mut handles = Vec::with_capacity(batch.len());

        for (idx, path) in batch.iter().enumerate() {
            let document_index = batch_start + idx + 1;
            let permit = semaphore.clone().acquire_owned().await?;

            let path = path.clone();
            let config = self.config.clone();
            let answer_key = self.answer_key.clone();
            let monitor = self.monitor.clone();

            let handle = tokio::spawn(async move {
                let _permit = permit;
                let started = Instant::now();
                let result = document_processor::process_document(
                    &path,
                    document_index,
                    &config,
                    answer_key.as_deref(),
                    &monitor,
                )
                .await;
                monitor.record("document_ms", started.elapsed().as_secs_f64() * 1000.0);
                result
            });
            handles.push((document_index, handle));
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        for (document_index, handle) in handles {
            match handle.await {
                Ok(Ok(outcome)) => outcomes.push(Some(outcome)),
                Ok(Err(e)) => {
                    error!("[文档 {}] ❌ 处理过程中发生错误: {:#}", document_index, e);
                    outcomes.push(None);
                }
                Err(e) => {
                    error!("[文档 {}] 任务执行失败: {}", document_index, e);
                    outcomes.push(None);
                }
            }
        }

        Ok(outcomes)
    }

    /// 题库落盘
    ///
    /// `force` 为 false 时受熔断器限制，失败只告警；为 true 时失败返回错误
    async fn persist(&mut self, force: bool) -> Result<()> {
        if !self.sink.is_dirty() {
            return Ok(());
        }
        if !force && !self.breaker.can_execute() {
            warn!("⚠️ 落盘熔断中，本批结果暂存内存");
            return Ok(());
        }

        let path = self.sink.path().to_path_buf();
        let contents = self.sink.to_json()?;
        let started = Instant::now();

        let result = retry_with_backoff(
            self.config.flush_max_retries,
            Duration::from_millis(self.config.flush_retry_delay_ms),
            || write_atomic(path.clone(), contents.clone()),
        )
        .await;
        self.monitor
            .record("flush_ms", started.elapsed().as_secs_f64() * 1000.0);

        match result {
            Ok(()) => {
                self.breaker.record_success();
                self.sink.mark_clean();
                info!("💾 题库已保存: {} ({} 道题)", path.display(), self.sink.len());
                Ok(())
            }
            Err(e) => {
                self.breaker.record_failure();
                if force {
                    Err(e).with_context(|| format!("题库保存失败: {}", path.display()))
                } else {
                    error!("❌ 题库保存失败，下批完成后重试: {}", e);
                    Ok(())
                }
            }
        }
    }

    fn log_document(&self, outcome: &DocumentOutcome, import: &ImportStats) {
        let line = format!(
            "{} | 题块 {} | 抽取 {} | 跳过 {} | 新增 {} | 重复 {} | 失败 {}",
            outcome.name,
            outcome.stats.blocks,
            outcome.stats.emitted,
            outcome.stats.rejected(),
            import.imported,
            import.duplicates,
            import.failed
        );
        if let Err(e) = append_log_line(&self.config.output_log_file, &line) {
            warn!("⚠️ 写入日志文件失败: {}", e);
        }
    }
}

// ========== 日志辅助函数 ==========

fn print_final_stats(summary: &RunSummary, store_total: usize, config: &Config) {
    let extraction = &summary.extraction;
    let import = &summary.import;

    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!(
        "📄 文档: 成功 {}/{} | 失败 {}",
        summary.documents - summary.failed_documents,
        summary.documents,
        summary.failed_documents
    );
    info!(
        "🔎 题块: {} | 抽取 {} | 跳过 {} | 需复核 {}",
        extraction.blocks,
        extraction.emitted,
        extraction.rejected(),
        extraction.flagged
    );
    info!("✅ 新增: {}", import.imported);
    info!("🔁 重复: {}", import.duplicates);
    info!("❌ 失败: {}", import.failed);
    info!("📦 题库总数: {}", store_total);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", config.output_log_file);
}
