//! 答案表：题号 → 正确选项下标

use crate::error::RecordError;
use crate::extractor::patterns::{is_answer_key_line, is_footer, ANSWER_KEY_ENTRY, ANSWER_KEY_HEADING};
use crate::models::question::letter_to_index;
use std::collections::BTreeMap;

/// 外部或文档内嵌的答案表
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerKey {
    entries: BTreeMap<u32, usize>,
}

impl AnswerKey {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按字母登记答案，只接受 A-D
    pub fn insert_letter(&mut self, number: u32, letter: char) -> Result<(), RecordError> {
        let index = letter_to_index(letter).ok_or_else(|| RecordError::InvalidAnswerLetter {
            letter: letter.to_string(),
        })?;
        self.entries.insert(number, index);
        Ok(())
    }

    pub fn insert_index(&mut self, number: u32, index: usize) -> Result<(), RecordError> {
        if index >= crate::models::question::OPTION_COUNT {
            return Err(RecordError::AnswerOutOfRange {
                index: index as i64,
            });
        }
        self.entries.insert(number, index);
        Ok(())
    }

    pub fn get(&self, number: u32) -> Option<usize> {
        self.entries.get(&number).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, usize)> + '_ {
        self.entries.iter().map(|(number, index)| (*number, *index))
    }

    /// 合并另一份答案表，冲突时以 `other` 为准
    pub fn merge(&mut self, other: &AnswerKey) {
        self.entries.extend(other.iter());
    }

    /// 从文档行中提取答案表
    ///
    /// 答案区（`Answers` 标题之后、版权页脚之前）内每行的条目都收集；
    /// 答案区之外只收集整行都是条目的行。同一题号后出现的覆盖先出现的。
    pub fn parse_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let mut key = Self::new();
        let mut in_section = false;

        for line in lines {
            let line = line.as_ref().trim();
            if line.is_empty() {
                continue;
            }
            if is_footer(line) {
                in_section = false;
                continue;
            }
            if ANSWER_KEY_HEADING.is_match(line) {
                in_section = true;
                continue;
            }
            if in_section || is_answer_key_line(line) {
                key.collect_entries(line);
            }
        }

        key
    }

    fn collect_entries(&mut self, line: &str) {
        for caps in ANSWER_KEY_ENTRY.captures_iter(line) {
            let Some(number) = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok()) else {
                continue;
            };
            let index = caps
                .get(2)
                .or_else(|| caps.get(3))
                .and_then(|m| m.as_str().chars().next())
                .and_then(letter_to_index);
            if let Some(index) = index {
                self.entries.insert(number, index);
            }
        }
    }
}

impl FromIterator<(u32, usize)> for AnswerKey {
    fn from_iter<I: IntoIterator<Item = (u32, usize)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .filter(|(_, index)| *index < crate::models::question::OPTION_COUNT)
                .collect(),
        }
    }
}
