//! 复核记录写入服务 - 业务能力层
//!
//! 只负责"写复核文件"能力，不关心流程

use crate::models::question::ExtractedQuestion;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// 复核记录写入服务
///
/// 职责：
/// - 将需要人工复核的题目追加写入复核文件
/// - 只处理单个题目
/// - 不关心流程顺序
pub struct ReviewWriter {
    review_file_path: PathBuf,
}

impl ReviewWriter {
    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            review_file_path: path.into(),
        }
    }

    /// 写入一条复核记录
    ///
    /// # 参数
    /// - `document`: 文档名
    /// - `question`: 抽取结果
    pub async fn write(&self, document: &str, question: &ExtractedQuestion) -> Result<()> {
        debug!(
            "写入复核: 文档 {} | 第 {} 题 | 题干长度: {}",
            document,
            question.ordinal,
            question.record.text().chars().count()
        );

        let record = &question.record;
        let line = format!(
            "文档 {} | 第 {} 题 | 题干: {} | 选项: {} | 答案: {}\n",
            document,
            question.ordinal,
            record.text(),
            record.options().join(" / "),
            record.correct_letter()
        );

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.review_file_path)
            .await
            .with_context(|| format!("无法打开复核文件: {}", self.review_file_path.display()))?;
        file.write_all(line.as_bytes()).await?;

        Ok(())
    }
}
