//! 抽取策略配置

use crate::error::ConfigError;
use crate::models::question::MIN_STEM_CHARS;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 题块切分策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentationStrategy {
    /// 按文档特征自动选择：有题号用题号，否则有行内答案用答案，否则按选项行
    #[default]
    Auto,
    /// 以题号标记切分
    QuestionNumbers,
    /// 以行内答案标记作为题块结束
    AnswerMarkers,
    /// 凑满 4 个选项即结束题块
    OptionRuns,
}

/// 答案无法确定时的处理
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedAnswerPolicy {
    /// 丢弃该题
    #[default]
    Skip,
    /// 默认为 A。会凭空制造一个正确答案，慎用
    DefaultToFirst,
}

/// 候选选项超过 4 个时的处理
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExcessOptionPolicy {
    /// 只保留最后 4 个，前面多出的并入题干
    #[default]
    FoldIntoStem,
    /// 丢弃该题
    Reject,
}

/// 抽取器配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractorConfig {
    pub segmentation: SegmentationStrategy,
    pub unresolved_answer: UnresolvedAnswerPolicy,
    pub excess_options: ExcessOptionPolicy,
    /// 题干最少字符数，低于 [`MIN_STEM_CHARS`] 时按 [`MIN_STEM_CHARS`] 计
    pub min_stem_chars: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            segmentation: SegmentationStrategy::default(),
            unresolved_answer: UnresolvedAnswerPolicy::default(),
            excess_options: ExcessOptionPolicy::default(),
            min_stem_chars: MIN_STEM_CHARS,
        }
    }
}

impl ExtractorConfig {
    pub fn effective_min_stem_chars(&self) -> usize {
        self.min_stem_chars.max(MIN_STEM_CHARS)
    }
}

fn invalid(field: &str, value: &str, expected: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: format!("可选值: {}", expected),
    }
}

impl FromStr for SegmentationStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "auto" => Ok(Self::Auto),
            "question_numbers" => Ok(Self::QuestionNumbers),
            "answer_markers" => Ok(Self::AnswerMarkers),
            "option_runs" => Ok(Self::OptionRuns),
            _ => Err(invalid(
                "segmentation",
                s,
                "auto / question_numbers / answer_markers / option_runs",
            )),
        }
    }
}

impl FromStr for UnresolvedAnswerPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "skip" => Ok(Self::Skip),
            "default_to_first" => Ok(Self::DefaultToFirst),
            _ => Err(invalid("unresolved_answer", s, "skip / default_to_first")),
        }
    }
}

impl FromStr for ExcessOptionPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "fold_into_stem" => Ok(Self::FoldIntoStem),
            "reject" => Ok(Self::Reject),
            _ => Err(invalid("excess_options", s, "fold_into_stem / reject")),
        }
    }
}
