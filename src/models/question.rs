use crate::error::RecordError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 每道题的选项数量
pub const OPTION_COUNT: usize = 4;

/// 题干最少字符数，过短的多半是解析残片
pub const MIN_STEM_CHARS: usize = 10;

/// 选项标签，下标与选项位置一一对应
pub const OPTION_LABELS: [char; OPTION_COUNT] = ['A', 'B', 'C', 'D'];

/// 一道完整的单选题
///
/// 只能通过 [`QuestionRecord::new`] 或反序列化构造，两者都会校验：
/// - 恰好 4 个非空选项
/// - 题干不少于 [`MIN_STEM_CHARS`] 个字符
/// - 答案索引在 0..=3 之间
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawQuestionRecord")]
pub struct QuestionRecord {
    #[serde(rename = "question")]
    text: String,
    options: [String; OPTION_COUNT],
    #[serde(rename = "correct_answer")]
    correct_index: usize,
}

impl QuestionRecord {
    /// 创建并校验题目
    pub fn new(
        text: impl Into<String>,
        options: [String; OPTION_COUNT],
        correct_index: usize,
    ) -> Result<Self, RecordError> {
        let text = text.into();

        let len = text.chars().count();
        if len < MIN_STEM_CHARS {
            return Err(RecordError::StemTooShort {
                len,
                min: MIN_STEM_CHARS,
            });
        }

        if let Some(index) = options.iter().position(|o| o.trim().is_empty()) {
            return Err(RecordError::EmptyOption { index });
        }

        if correct_index >= OPTION_COUNT {
            return Err(RecordError::AnswerOutOfRange {
                index: correct_index as i64,
            });
        }

        Ok(Self {
            text,
            options,
            correct_index,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    /// 正确选项的内容
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_index]
    }

    /// 正确选项的字母 (A-D)
    pub fn correct_letter(&self) -> char {
        OPTION_LABELS[self.correct_index]
    }

    /// 去重用的自然键
    pub fn natural_key(&self) -> String {
        natural_key(&self.text)
    }
}

impl std::fmt::Display for QuestionRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // 截断题干以便显示（最多60个字符）
        let preview = if self.text.chars().count() > 60 {
            self.text.chars().take(60).collect::<String>() + "..."
        } else {
            self.text.clone()
        };
        write!(f, "{} [答案: {}]", preview, self.correct_letter())
    }
}

/// 反序列化时的原始结构，校验后转换为 [`QuestionRecord`]
#[derive(Debug, Deserialize)]
struct RawQuestionRecord {
    question: String,
    options: Vec<String>,
    correct_answer: i64,
}

impl TryFrom<RawQuestionRecord> for QuestionRecord {
    type Error = RecordError;

    fn try_from(raw: RawQuestionRecord) -> Result<Self, Self::Error> {
        let found = raw.options.len();
        let options: [String; OPTION_COUNT] = raw
            .options
            .try_into()
            .map_err(|_| RecordError::OptionCount { found })?;

        let correct_index = usize::try_from(raw.correct_answer)
            .ok()
            .filter(|index| *index < OPTION_COUNT)
            .ok_or(RecordError::AnswerOutOfRange {
                index: raw.correct_answer,
            })?;

        Self::new(raw.question, options, correct_index)
    }
}

/// 抽取结果：题目本身加上定位和复核信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedQuestion {
    /// 题号：题块带显式题号时取题号，否则为顺序编号（从1开始）
    pub ordinal: u32,
    pub record: QuestionRecord,
    /// 题干偏短或多余选项被并入题干时需要人工复核
    pub needs_review: bool,
}

/// 题库中保存的一行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredQuestion {
    pub id: u64,
    pub question: String,
    pub options: [String; OPTION_COUNT],
    pub correct_answer: usize,
    pub imported_at: DateTime<Utc>,
}

impl StoredQuestion {
    pub fn from_record(id: u64, record: &QuestionRecord) -> Self {
        Self {
            id,
            question: record.text().to_string(),
            options: record.options().clone(),
            correct_answer: record.correct_index(),
            imported_at: Utc::now(),
        }
    }

    pub fn natural_key(&self) -> String {
        natural_key(&self.question)
    }
}

/// 题干自然键：合并空白、去首尾空白、转小写
pub fn natural_key(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// 选项字母转下标，仅接受 A-D（不区分大小写）
pub fn letter_to_index(letter: char) -> Option<usize> {
    match letter.to_ascii_uppercase() {
        'A' => Some(0),
        'B' => Some(1),
        'C' => Some(2),
        'D' => Some(3),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> [String; 4] {
        ["3".into(), "4".into(), "5".into(), "22".into()]
    }

    #[test]
    fn test_new_validates_invariants() {
        let record = QuestionRecord::new("What is 2+2?", options(), 1).unwrap();
        assert_eq!(record.correct_option(), "4");
        assert_eq!(record.correct_letter(), 'B');

        assert_eq!(
            QuestionRecord::new("Too short", options(), 0),
            Err(RecordError::StemTooShort { len: 9, min: 10 })
        );
        assert_eq!(
            QuestionRecord::new("What is 2+2?", options(), 4),
            Err(RecordError::AnswerOutOfRange { index: 4 })
        );

        let mut blank = options();
        blank[2] = "  ".into();
        assert_eq!(
            QuestionRecord::new("What is 2+2?", blank, 0),
            Err(RecordError::EmptyOption { index: 2 })
        );
    }

    #[test]
    fn test_stem_length_counts_characters_not_bytes() {
        // 10 个汉字 = 30 字节，按字符计数刚好达标
        let stem = "中国的首都是哪座城市";
        assert!(QuestionRecord::new(stem, options(), 0).is_ok());
    }

    #[test]
    fn test_json_shape_and_validation() {
        let json = r#"{"question":"Capital of France?","options":["Paris","London","Berlin","Madrid"],"correct_answer":0}"#;
        let record: QuestionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.text(), "Capital of France?");
        assert_eq!(serde_json::to_string(&record).unwrap(), json);

        let three = r#"{"question":"Capital of France?","options":["Paris","London","Berlin"],"correct_answer":0}"#;
        let err = serde_json::from_str::<QuestionRecord>(three).unwrap_err();
        assert!(err.to_string().contains("选项数量"));

        let negative = r#"{"question":"Capital of France?","options":["a","b","c","d"],"correct_answer":-1}"#;
        assert!(serde_json::from_str::<QuestionRecord>(negative).is_err());
    }

    #[test]
    fn test_natural_key_ignores_case_and_spacing() {
        assert_eq!(natural_key("  What   IS 2+2? "), "what is 2+2?");
        assert_eq!(natural_key("What is 2+2?"), natural_key("what  is 2+2?"));
    }

    #[test]
    fn test_letter_to_index() {
        assert_eq!(letter_to_index('a'), Some(0));
        assert_eq!(letter_to_index('D'), Some(3));
        assert_eq!(letter_to_index('e'), None);
    }
}
