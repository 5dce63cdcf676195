//! 单个文档处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块负责单个文档的加载、抽取和入库，是文档级别的编排器。
//!
//! ## 核心功能
//!
//! 1. **加载文档**：按扩展名读取文本或题目导出
//! 2. **答案表合并**：文档内嵌答案表 + 外部答案表（外部优先）
//! 3. **题目抽取**：委托 `QuestionExtractor`，可并发执行
//! 4. **逐题入库**：创建并复用 `QuestionFlow`，必须串行执行
//! 5. **统计输出**：记录导入/重复/失败数量

use crate::config::Config;
use crate::extractor::{ExtractionStats, QuestionExtractor};
use crate::models::answer_key::AnswerKey;
use crate::models::loaders::{load_document, Document};
use crate::models::question::{ExtractedQuestion, OPTION_LABELS};
use crate::services::RecordSink;
use crate::utils::logging::truncate_text;
use crate::utils::metrics::PerformanceMonitor;
use crate::workflow::{ProcessResult, QuestionCtx, QuestionFlow};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info, warn};

/// 详细日志中展示的样例题数
const SAMPLE_COUNT: usize = 3;

/// 单个文档的抽取结果
#[derive(Debug, Clone)]
pub struct DocumentOutcome {
    /// 文档名
    pub name: String,
    /// 文档索引（从1开始）
    pub index: usize,
    /// 按原文顺序排列的题目
    pub questions: Vec<ExtractedQuestion>,
    pub stats: ExtractionStats,
}

/// 入库统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub imported: usize,
    pub duplicates: usize,
    pub failed: usize,
}

impl ImportStats {
    pub fn absorb(&mut self, other: &ImportStats) {
        self.imported += other.imported;
        self.duplicates += other.duplicates;
        self.failed += other.failed;
    }
}

/// 加载并抽取单个文档
///
/// # 参数
/// - `path`: 文档路径
/// - `index`: 文档索引（用于日志）
/// - `config`: 配置
/// - `external_key`: 外部答案表
/// - `monitor`: 性能记录器
pub async fn process_document(
    path: &Path,
    index: usize,
    config: &Config,
    external_key: Option<&AnswerKey>,
    monitor: &PerformanceMonitor,
) -> Result<DocumentOutcome> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    let document = load_document(path)
        .await
        .with_context(|| format!("无法加载文档: {}", path.display()))?;
    info!("[文档 {}] 📄 {} ({} 段)", index, name, document.len());

    let (questions, stats) = match document {
        Document::Lines(lines) => {
            let mut key = AnswerKey::parse_lines(&lines);
            if !key.is_empty() {
                debug!("[文档 {}] 文档内嵌答案表 {} 条", index, key.len());
            }
            if let Some(external) = external_key {
                key.merge(external);
            }

            let extractor = QuestionExtractor::new(config.extractor_config());
            monitor.measure("extract_ms", || {
                let mut extraction = extractor.extract(&lines, Some(&key));
                let questions: Vec<_> = extraction.by_ref().collect();
                debug!("[文档 {}] 切分策略: {:?}", index, extraction.strategy());
                (questions, extraction.stats().clone())
            })
        }
        Document::Records(records) => {
            info!("[文档 {}] 题目导出文件，跳过抽取", index);
            let questions: Vec<_> = records
                .into_iter()
                .zip(1u32..)
                .map(|(record, ordinal)| ExtractedQuestion {
                    ordinal,
                    record,
                    needs_review: false,
                })
                .collect();
            let stats = ExtractionStats {
                blocks: questions.len(),
                emitted: questions.len(),
                ..Default::default()
            };
            (questions, stats)
        }
    };

    log_extraction(index, &stats);
    if config.verbose_logging {
        log_samples(index, &questions);
    }

    Ok(DocumentOutcome {
        name,
        index,
        questions,
        stats,
    })
}

/// 按原文顺序逐题入库
pub async fn import_document<S: RecordSink + ?Sized>(
    flow: &QuestionFlow,
    sink: &mut S,
    outcome: &DocumentOutcome,
) -> ImportStats {
    let mut stats = ImportStats::default();

    for question in &outcome.questions {
        let ctx = QuestionCtx::new(outcome.name.clone(), outcome.index, question.ordinal);
        match flow.run(sink, question, &ctx).await {
            ProcessResult::Imported { .. } => stats.imported += 1,
            ProcessResult::Duplicate { .. } => stats.duplicates += 1,
            ProcessResult::Failed => stats.failed += 1,
        }
    }

    log_import(outcome.index, &stats);
    stats
}

// ========== 日志辅助函数 ==========

fn log_extraction(index: usize, stats: &ExtractionStats) {
    info!(
        "[文档 {}] ✓ 抽取完成: {} 题 / {} 个题块",
        index, stats.emitted, stats.blocks
    );
    if stats.rejected() > 0 {
        warn!(
            "[文档 {}] ⚠️ 跳过 {} 个题块 (格式错误 {}, 题干过短 {}, 答案缺失 {})",
            index,
            stats.rejected(),
            stats.malformed,
            stats.too_short,
            stats.unresolved
        );
    }
    if stats.defaulted > 0 {
        warn!("[文档 {}] ⚠️ {} 题答案缺失，已默认为 A", index, stats.defaulted);
    }
    if stats.flagged > 0 {
        info!("[文档 {}] 📝 {} 题需要人工复核", index, stats.flagged);
    }
}

fn log_samples(index: usize, questions: &[ExtractedQuestion]) {
    for question in questions.iter().take(SAMPLE_COUNT) {
        let record = &question.record;
        info!(
            "[文档 {}]   {}. {}",
            index,
            question.ordinal,
            truncate_text(record.text(), 60)
        );
        for (label, option) in OPTION_LABELS.iter().zip(record.options()) {
            info!("[文档 {}]      {}) {}", index, label, truncate_text(option, 40));
        }
        info!("[文档 {}]      答案: {}", index, record.correct_letter());
    }
}

fn log_import(index: usize, stats: &ImportStats) {
    info!(
        "[文档 {}] ✓ 入库: 新增 {} | 重复 {} | 失败 {}",
        index, stats.imported, stats.duplicates, stats.failed
    );
}
