//! 题目抽取器
//!
//! 输入：按原文顺序排列的段落文本，可选的外部答案表
//! 输出：惰性产出的 [`ExtractedQuestion`] / [`QuestionRecord`]
//!
//! 处理流程：
//! 1. `line` - 单行分类（题号 / 选项 / 行内答案 / 答案表 / 正文）
//! 2. `segment` - 按 [`SegmentationStrategy`] 切分题块
//! 3. `layout` - 题块内划分题干与选项（选项标记优先，否则固定窗口）
//! 4. 答案解析：行内答案优先，其次按题号查答案表
//! 5. 校验后立即产出；不合格的题块跳过并计数，不中断扫描
//!
//! 抽取器不做 I/O，不持有跨调用的状态。

mod layout;
mod line;
pub mod normalize;
pub mod patterns;
pub mod policy;
mod segment;

pub use policy::{
    ExcessOptionPolicy, ExtractorConfig, SegmentationStrategy, UnresolvedAnswerPolicy,
};

use crate::error::RecordError;
use crate::models::answer_key::AnswerKey;
use crate::models::question::{letter_to_index, ExtractedQuestion, QuestionRecord};
use segment::{Block, Segmenter};
use thiserror::Error;
use tracing::debug;

/// 需要人工复核的题干长度阈值
const REVIEW_STEM_CHARS: usize = 20;

/// 题块被跳过的原因
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    /// 无法划分出题干加 4 个选项
    #[error("题块格式错误: 只识别出 {found} 个选项")]
    MalformedBlock { found: usize },
    /// 候选选项多于 4 个且策略为拒绝
    #[error("候选选项过多: {found} 个")]
    ExcessOptions { found: usize },
    /// 归一化后选项为空
    #[error("第 {index} 个选项为空")]
    EmptyOption { index: usize },
    /// 题干过短
    #[error("题干过短: {len} 个字符 (至少 {min} 个)")]
    StemTooShort { len: usize, min: usize },
    /// 答案缺失或无法对应到 A-D
    #[error("第 {ordinal} 题答案无法确定")]
    UnresolvedAnswer { ordinal: u32 },
    /// 组装后的题目未通过校验
    #[error(transparent)]
    Invalid(#[from] RecordError),
}

/// 一次抽取的统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    /// 切分出的题块数
    pub blocks: usize,
    /// 产出的题目数
    pub emitted: usize,
    /// 格式错误（选项不足 / 过多 / 为空）
    pub malformed: usize,
    /// 题干过短
    pub too_short: usize,
    /// 答案无法确定而被丢弃
    pub unresolved: usize,
    /// 答案无法确定而被默认为 A
    pub defaulted: usize,
    /// 标记为需要复核
    pub flagged: usize,
}

impl ExtractionStats {
    /// 被跳过的题块总数
    pub fn rejected(&self) -> usize {
        self.malformed + self.too_short + self.unresolved
    }

    fn record_rejection(&mut self, reason: &RejectReason) {
        match reason {
            RejectReason::MalformedBlock { .. }
            | RejectReason::ExcessOptions { .. }
            | RejectReason::EmptyOption { .. }
            | RejectReason::Invalid(_) => self.malformed += 1,
            RejectReason::StemTooShort { .. } => self.too_short += 1,
            RejectReason::UnresolvedAnswer { .. } => self.unresolved += 1,
        }
    }

    /// 合并另一份统计
    pub fn absorb(&mut self, other: &ExtractionStats) {
        self.blocks += other.blocks;
        self.emitted += other.emitted;
        self.malformed += other.malformed;
        self.too_short += other.too_short;
        self.unresolved += other.unresolved;
        self.defaulted += other.defaulted;
        self.flagged += other.flagged;
    }
}

/// 题目抽取器
#[derive(Debug, Clone, Copy, Default)]
pub struct QuestionExtractor {
    config: ExtractorConfig,
}

impl QuestionExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// 抽取题目（含题号和复核标记）
    pub fn extract<'a, S: AsRef<str>>(
        &self,
        lines: &'a [S],
        answer_key: Option<&'a AnswerKey>,
    ) -> Extraction<'a, S> {
        Extraction {
            segmenter: Segmenter::new(lines, self.config.segmentation),
            answer_key,
            config: self.config,
            sequence: 0,
            stats: ExtractionStats::default(),
        }
    }

    /// 只要题目本身
    pub fn records<'a, S: AsRef<str> + 'a>(
        &self,
        lines: &'a [S],
        answer_key: Option<&'a AnswerKey>,
    ) -> impl Iterator<Item = QuestionRecord> + 'a {
        self.extract(lines, answer_key).map(|q| q.record)
    }
}

/// 一次抽取过程，惰性迭代
///
/// 迭代结束后可通过 [`Extraction::stats`] 查看跳过情况
pub struct Extraction<'a, S> {
    segmenter: Segmenter<'a, S>,
    answer_key: Option<&'a AnswerKey>,
    config: ExtractorConfig,
    /// 已成功划分的题块数，作为无题号题块的顺序编号
    sequence: u32,
    stats: ExtractionStats,
}

impl<'a, S: AsRef<str>> Extraction<'a, S> {
    pub fn stats(&self) -> &ExtractionStats {
        &self.stats
    }

    /// 实际使用的切分策略（`Auto` 已被解析）
    pub fn strategy(&self) -> SegmentationStrategy {
        self.segmenter.strategy()
    }

    fn build(&mut self, block: &Block<'_>) -> Result<ExtractedQuestion, RejectReason> {
        let layout = layout::lay_out(block, self.config.excess_options)?;

        // 题块结构完整就占一个顺序号，答案缺失也不影响后续题目的对号
        self.sequence += 1;
        let ordinal = block.number.unwrap_or(self.sequence);

        let min = self.config.effective_min_stem_chars();
        let len = layout.stem.chars().count();
        if len < min {
            return Err(RejectReason::StemTooShort { len, min });
        }

        let correct_index = match self.resolve_answer(block, ordinal) {
            Some(index) => index,
            None => match self.config.unresolved_answer {
                UnresolvedAnswerPolicy::Skip => {
                    return Err(RejectReason::UnresolvedAnswer { ordinal })
                }
                UnresolvedAnswerPolicy::DefaultToFirst => {
                    self.stats.defaulted += 1;
                    0
                }
            },
        };

        let needs_review = layout.folded || len < REVIEW_STEM_CHARS;
        let record = QuestionRecord::new(layout.stem, layout.options, correct_index)?;

        Ok(ExtractedQuestion {
            ordinal,
            record,
            needs_review,
        })
    }

    /// 行内答案优先，其次查答案表
    fn resolve_answer(&self, block: &Block<'_>, ordinal: u32) -> Option<usize> {
        match block.answer {
            Some(letter) => letter_to_index(letter),
            None => self.answer_key.and_then(|key| key.get(ordinal)),
        }
    }
}

impl<'a, S: AsRef<str>> Iterator for Extraction<'a, S> {
    type Item = ExtractedQuestion;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let block = self.segmenter.next()?;
            self.stats.blocks += 1;

            match self.build(&block) {
                Ok(question) => {
                    self.stats.emitted += 1;
                    if question.needs_review {
                        self.stats.flagged += 1;
                    }
                    return Some(question);
                }
                Err(reason) => {
                    debug!("跳过第 {} 行开始的题块: {}", block.first_line + 1, reason);
                    self.stats.record_rejection(&reason);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract_all(
        lines: &[&str],
        key: Option<&AnswerKey>,
        config: ExtractorConfig,
    ) -> (Vec<ExtractedQuestion>, ExtractionStats) {
        let mut extraction = QuestionExtractor::new(config).extract(lines, key);
        let questions: Vec<_> = extraction.by_ref().collect();
        (questions, extraction.stats().clone())
    }

    #[test]
    fn test_inline_answer_scenario() {
        let lines = ["1. What is 2+2?", "a) 3", "b) 4", "c) 5", "d) 22", "Answer: b"];
        let records: Vec<_> = QuestionExtractor::default()
            .records(&lines[..], None)
            .collect();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text(), "What is 2+2?");
        assert_eq!(records[0].options(), &["3", "4", "5", "22"].map(String::from));
        assert_eq!(records[0].correct_index(), 1);
    }

    #[test]
    fn test_three_options_yield_nothing() {
        let lines = ["a) X", "b) Y", "c) Z", "Answer: a"];
        let (questions, stats) = extract_all(&lines, None, ExtractorConfig::default());

        assert!(questions.is_empty());
        assert_eq!(stats.blocks, 1);
        assert_eq!(stats.malformed, 1);
    }

    #[test]
    fn test_external_answer_key_scenario() {
        let mut key = AnswerKey::new();
        key.insert_letter(1, 'C').unwrap();
        let lines = ["1. Capital of France?", "Paris", "London", "Berlin", "Madrid"];

        let (questions, _) = extract_all(&lines, Some(&key), ExtractorConfig::default());

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].ordinal, 1);
        assert_eq!(questions[0].record.correct_index(), 2);
        assert_eq!(questions[0].record.correct_option(), "Berlin");
        assert!(questions[0].needs_review);
    }

    #[test]
    fn test_duplicate_stems_are_both_emitted() {
        let lines = [
            "1. What is 2+2?", "a) 3", "b) 4", "c) 5", "d) 22", "Answer: b",
            "2. What is  2+2?", "a) 3", "b) 4", "c) 5", "d) 22", "Answer: b",
        ];
        let (questions, _) = extract_all(&lines, None, ExtractorConfig::default());

        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].record, questions[1].record);
        assert_eq!(questions[1].ordinal, 2);
    }

    #[test]
    fn test_unresolved_answer_policies() {
        let lines = ["1. Capital of France?", "Paris", "London", "Berlin", "Madrid"];

        let (questions, stats) = extract_all(&lines, None, ExtractorConfig::default());
        assert!(questions.is_empty());
        assert_eq!(stats.unresolved, 1);

        let config = ExtractorConfig {
            unresolved_answer: UnresolvedAnswerPolicy::DefaultToFirst,
            ..Default::default()
        };
        let (questions, stats) = extract_all(&lines, None, config);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].record.correct_index(), 0);
        assert_eq!(stats.defaulted, 1);
    }

    #[test]
    fn test_answer_letter_outside_range_is_unresolved() {
        let lines = ["1. Capital of France?", "a) Paris", "b) London", "c) Berlin", "d) Madrid", "Answer: e"];
        let (questions, stats) = extract_all(&lines, None, ExtractorConfig::default());
        assert!(questions.is_empty());
        assert_eq!(stats.unresolved, 1);
    }

    #[test]
    fn test_inline_answer_wins_over_answer_key() {
        let mut key = AnswerKey::new();
        key.insert_letter(1, 'A').unwrap();
        let lines = ["1. What is 2+2?", "a) 3", "b) 4", "c) 5", "d) 22", "Answer: b"];

        let (questions, _) = extract_all(&lines, Some(&key), ExtractorConfig::default());
        assert_eq!(questions[0].record.correct_index(), 1);
    }

    #[test]
    fn test_embedded_answer_key_with_parenthesized_options() {
        let lines = [
            "151. Who was the first Governor-General of free India?",
            "(A) Lord Mountbatten",
            "(B) C. Rajagopalachari",
            "(C) Rajendra Prasad",
            "(D) Jawaharlal Nehru",
            "Discussion",
            "152. Which body adopted the Constitution of India?",
            "(A) Parliament",
            "(B) Constituent Assembly",
            "(C) Cabinet",
            "(D) Supreme Court",
            "Answers :",
            "151.(A) 152.(B)",
        ];
        let key = AnswerKey::parse_lines(&lines);
        let (questions, _) = extract_all(&lines, Some(&key), ExtractorConfig::default());

        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].ordinal, 151);
        assert_eq!(questions[0].record.options()[0], "Lord Mountbatten");
        assert_eq!(questions[0].record.correct_index(), 0);
        assert_eq!(questions[1].record.correct_option(), "Constituent Assembly");
    }

    #[test]
    fn test_option_runs_use_sequential_ordinals() {
        let lines = [
            "Who founded the Maurya",
            "empire in ancient India?",
            "a) Chandragupta b) Ashoka c) Bindusara d) Bimbisara",
            "Which battle did Ashoka fight ……",
            "a) Kalinga b) Plassey c) Panipat d) Haldighati",
            "Which script did Ashoka use?",
            "a) Brahmi b) Kharosthi",
            "Answers",
            "1.a 2.a",
        ];
        let key = AnswerKey::parse_lines(&lines);
        let (questions, stats) = extract_all(&lines, Some(&key), ExtractorConfig::default());

        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].record.text(), "Who founded the Maurya empire in ancient India?");
        assert_eq!(questions[1].ordinal, 2);
        assert_eq!(questions[1].record.text(), "Which battle did Ashoka fight");
        assert_eq!(stats.malformed, 1);
    }

    #[test]
    fn test_answer_delimited_stream_without_numbers() {
        let lines = [
            "Who is known as the father of the Constitution?",
            "(a) Nehru",
            "(b) Ambedkar",
            "(c) Gandhi",
            "(d) Patel",
            "Answer: b",
            "The Preamble was borrowed from which country's idea?",
            "(a) USA",
            "(b) UK",
            "(c) Ireland",
            "(d) Canada Correct answer: (a)",
        ];
        let (questions, _) = extract_all(&lines, None, ExtractorConfig::default());

        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].record.correct_option(), "Ambedkar");
        assert_eq!(questions[1].record.options()[3], "Canada");
        assert_eq!(questions[1].record.correct_index(), 0);
    }

    #[test]
    fn test_short_stems_are_rejected() {
        let lines = ["1. Why?", "a) w", "b) x", "c) y", "d) z", "Answer: a"];
        let (questions, stats) = extract_all(&lines, None, ExtractorConfig::default());
        assert!(questions.is_empty());
        assert_eq!(stats.too_short, 1);

        let config = ExtractorConfig {
            min_stem_chars: 30,
            ..Default::default()
        };
        let lines = ["1. What is 2+2?", "a) 3", "b) 4", "c) 5", "d) 22", "Answer: b"];
        let (questions, _) = extract_all(&lines, None, config);
        assert!(questions.is_empty());
    }

    #[test]
    fn test_malformed_block_does_not_stop_scan() {
        let lines = [
            "1. Broken question with options?",
            "a) only one",
            "Answer: a",
            "2. What is the value of 3+3?",
            "a) 5", "b) 6", "c) 7", "d) 8",
            "Answer: b",
        ];
        let (questions, stats) = extract_all(&lines, None, ExtractorConfig::default());

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].ordinal, 2);
        assert_eq!(stats.blocks, 2);
        assert_eq!(stats.rejected(), 1);
    }

    #[test]
    fn test_option_text_with_letter_references() {
        let lines = [
            "1. Which of these are fundamental rights?",
            "(a) Right to equality",
            "(b) Right to freedom",
            "(c) Right to property",
            "(d) Both (a) and (b)",
            "Answer: d",
            "2. Which statements about the Preamble are correct?",
            "a) It is enforceable b) It is amendable c) It is not part d) Both (a) and (c)",
            "Answer: b",
        ];
        let (questions, stats) = extract_all(&lines, None, ExtractorConfig::default());

        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].record.correct_option(), "Both (a) and (b)");
        assert!(!questions[0].needs_review);
        assert_eq!(questions[1].record.options()[3], "Both (a) and (c)");
        assert_eq!(questions[1].record.correct_option(), "It is amendable");
        assert_eq!(stats.rejected(), 0);
    }

    #[test]
    fn test_option_runs_with_inline_answers() {
        let config = ExtractorConfig {
            segmentation: SegmentationStrategy::OptionRuns,
            ..Default::default()
        };

        let lines = ["What is two plus two?", "a) 3 b) 4 c) 5 d) 22", "Answer: b"];
        let (questions, stats) = extract_all(&lines, None, config);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].record.correct_index(), 1);
        assert_eq!(stats.unresolved, 0);

        let lines = [
            "Which river flows through Cairo?",
            "a) Nile",
            "b) Amazon",
            "c) Danube",
            "d) Volga",
            "Answer: a",
            "Which ocean is the largest one?",
            "a) Atlantic",
            "b) Indian",
            "c) Pacific",
            "d) Arctic",
            "Correct answer: (c)",
        ];
        let (questions, _) = extract_all(&lines, None, config);
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].record.correct_option(), "Nile");
        assert_eq!(questions[1].record.correct_option(), "Pacific");
        assert_eq!(questions[1].ordinal, 2);
    }

    #[test]
    fn test_extraction_is_lazy_and_reports_strategy() {
        let lines = ["What is 2+2?", "a) 3 b) 4 c) 5 d) 22", "Answer: b"];
        let mut extraction = QuestionExtractor::default().extract(&lines[..], None);
        assert_eq!(extraction.strategy(), SegmentationStrategy::AnswerMarkers);
        assert_eq!(extraction.stats().blocks, 0);
        assert!(extraction.next().is_some());
        assert!(extraction.next().is_none());
    }
}
