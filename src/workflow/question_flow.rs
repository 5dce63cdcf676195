//! 题目入库流程 - 流程层
//!
//! 核心职责：定义"一道题"的完整入库流程
//!
//! 流程顺序：
//! 1. 需要复核的题目写入复核文件（不影响入库）
//! 2. 写入题库
//! 3. 重复计数，存储错误记为失败，都不中断后续题目

use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::models::question::ExtractedQuestion;
use crate::services::{InsertOutcome, RecordSink, ReviewWriter};
use crate::utils::logging::truncate_text;
use crate::workflow::question_ctx::QuestionCtx;

/// 题目处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessResult {
    /// 已入库
    Imported { id: u64 },
    /// 题干重复，跳过
    Duplicate { existing_id: u64 },
    /// 写入失败
    Failed,
}

/// 题目入库流程
///
/// - 编排单道题的入库步骤
/// - 不持有题库，由调用方传入
/// - 只依赖业务能力（services）
pub struct QuestionFlow {
    review_writer: Option<ReviewWriter>,
    verbose_logging: bool,
}

impl QuestionFlow {
    /// 创建新的题目入库流程
    pub fn new(config: &Config) -> Self {
        Self {
            review_writer: config.review_file.as_ref().map(ReviewWriter::with_path),
            verbose_logging: config.verbose_logging,
        }
    }

    pub async fn run<S: RecordSink + ?Sized>(
        &self,
        sink: &mut S,
        question: &ExtractedQuestion,
        ctx: &QuestionCtx,
    ) -> ProcessResult {
        if self.verbose_logging {
            self.log_stem(ctx, question);
        }

        if question.needs_review {
            self.write_review(ctx, question).await;
        }

        match sink.insert(&question.record) {
            Ok(InsertOutcome::Inserted { id }) => {
                debug!("{} ✓ 入库成功, 编号 {}", ctx, id);
                ProcessResult::Imported { id }
            }
            Ok(InsertOutcome::Duplicate { existing_id }) => {
                debug!("{} 题干重复 (已有编号 {}), 跳过", ctx, existing_id);
                ProcessResult::Duplicate { existing_id }
            }
            Err(e) => {
                error!("{} ❌ 入库失败: {}", ctx, e);
                ProcessResult::Failed
            }
        }
    }

    /// 写入复核记录，失败只告警
    async fn write_review(&self, ctx: &QuestionCtx, question: &ExtractedQuestion) {
        let Some(writer) = &self.review_writer else {
            return;
        };
        if let Err(e) = writer.write(&ctx.document, question).await {
            warn!("{} ⚠️ 写入复核文件失败: {}", ctx, e);
        }
    }

    // ========== 日志辅助方法 ==========

    /// 显示题干预览
    fn log_stem(&self, ctx: &QuestionCtx, question: &ExtractedQuestion) {
        info!(
            "[文档 {}] 第 {} 题: {} [答案: {}]",
            ctx.document_index,
            ctx.ordinal,
            truncate_text(question.record.text(), 80),
            question.record.correct_letter()
        );
    }
}
