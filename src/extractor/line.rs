//! 单行分类

use super::patterns::{
    is_answer_key_line, is_footer, ANSWER_KEY_HEADING, INLINE_ANSWER, NOISE_LABEL,
    OPTION_MARKER, QUESTION_MARKER,
};

/// 一行文本的类别
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LineKind<'a> {
    /// 页脚、答案表、解析标签等，不参与题块
    Ignored,
    /// 行内答案；`content` 为答案标记之前的正文
    Answer { content: &'a str, letter: char },
    /// 题号行；`rest` 为题号之后的正文
    Question { number: u32, rest: &'a str },
    /// 选项行
    Options(OptionLine<'a>),
    /// 普通文本
    Text(&'a str),
}

/// 选项行拆分结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OptionLine<'a> {
    /// 第一个选项标记之前的文字
    pub prefix: &'a str,
    /// 各选项的原始文字（已去掉标记）
    pub options: Vec<&'a str>,
}

/// 对一行完整分类，包括行内答案
pub(crate) fn classify(line: &str) -> LineKind<'_> {
    let line = line.trim();
    if line.is_empty() || is_ignored(line) {
        return LineKind::Ignored;
    }

    if let Some(caps) = INLINE_ANSWER.captures(line) {
        if let (Some(whole), Some(letter)) = (caps.get(0), caps.get(1)) {
            if let Some(letter) = letter.as_str().chars().next() {
                return LineKind::Answer {
                    content: line[..whole.start()].trim(),
                    letter,
                };
            }
        }
    }

    classify_content(line)
}

/// 对正文分类，不再识别行内答案
pub(crate) fn classify_content(line: &str) -> LineKind<'_> {
    let line = line.trim();
    if line.is_empty() {
        return LineKind::Ignored;
    }

    if let Some((number, rest)) = question_marker(line) {
        return LineKind::Question { number, rest };
    }

    if let Some(options) = option_line(line) {
        return LineKind::Options(options);
    }

    LineKind::Text(line)
}

fn is_ignored(line: &str) -> bool {
    is_footer(line)
        || ANSWER_KEY_HEADING.is_match(line)
        || is_answer_key_line(line)
        || NOISE_LABEL.is_match(line)
}

fn question_marker(line: &str) -> Option<(u32, &str)> {
    let caps = QUESTION_MARKER.captures(line)?;
    let number = caps
        .get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))?
        .as_str()
        .parse::<u32>()
        .ok()?;
    let rest = caps.get(4).map(|m| m.as_str().trim()).unwrap_or("");
    Some((number, rest))
}

/// 行首有选项标记，或行内有至少 3 个选项标记时视为选项行
///
/// 第一个标记之后，只有字母紧接上一个标记（a→b→c→d）的标记才开启新选项，
/// 其余标记留在选项文字里，例如 `(d) Both (a) and (b)`
fn option_line(line: &str) -> Option<OptionLine<'_>> {
    let mut spans: Vec<(usize, usize)> = Vec::new();
    let mut previous: Option<char> = None;
    for caps in OPTION_MARKER.captures_iter(line) {
        let (Some(marker), Some(letter)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let letter = letter.as_str().chars().next()?.to_ascii_lowercase();
        let in_sequence = previous.map_or(true, |prev| next_letter(prev) == Some(letter));
        if in_sequence {
            spans.push((marker.start(), marker.end()));
            previous = Some(letter);
        }
    }

    let starts_with_marker = spans.first().is_some_and(|(start, _)| *start == 0);
    if !starts_with_marker && spans.len() < 3 {
        return None;
    }

    let prefix = line[..spans[0].0].trim();
    let options = spans
        .iter()
        .enumerate()
        .map(|(i, (_, end))| {
            let next = spans.get(i + 1).map(|(start, _)| *start).unwrap_or(line.len());
            line[*end..next].trim()
        })
        .collect();

    Some(OptionLine { prefix, options })
}

fn next_letter(letter: char) -> Option<char> {
    match letter {
        'a' => Some('b'),
        'b' => Some('c'),
        'c' => Some('d'),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_question_and_text() {
        assert_eq!(
            classify("1. What is 2+2?"),
            LineKind::Question {
                number: 1,
                rest: "What is 2+2?"
            }
        );
        assert_eq!(classify("Paris"), LineKind::Text("Paris"));
        assert_eq!(classify("   "), LineKind::Ignored);
    }

    #[test]
    fn test_classify_answer_keeps_leading_content() {
        assert_eq!(
            classify("Answer: b"),
            LineKind::Answer {
                content: "",
                letter: 'b'
            }
        );
        assert_eq!(
            classify("(d) Madrid Correct answer: d"),
            LineKind::Answer {
                content: "(d) Madrid",
                letter: 'd'
            }
        );
    }

    #[test]
    fn test_classify_single_option_line() {
        assert_eq!(
            classify("(A) Lord Mountbatten"),
            LineKind::Options(OptionLine {
                prefix: "",
                options: vec!["Lord Mountbatten"],
            })
        );
    }

    #[test]
    fn test_classify_inline_option_run() {
        assert_eq!(
            classify("Who wrote it? a) Nehru b) Gandhi c) Patel d) Bose"),
            LineKind::Options(OptionLine {
                prefix: "Who wrote it?",
                options: vec!["Nehru", "Gandhi", "Patel", "Bose"],
            })
        );
        // 只有两个行内标记且不在行首时按普通文本处理
        assert_eq!(
            classify("Both (a) and (b) are correct"),
            LineKind::Text("Both (a) and (b) are correct")
        );
    }

    #[test]
    fn test_out_of_sequence_markers_stay_in_option_text() {
        assert_eq!(
            classify("(d) Both (a) and (b)"),
            LineKind::Options(OptionLine {
                prefix: "",
                options: vec!["Both (a) and (b)"],
            })
        );
        assert_eq!(
            classify("a) Only 1 b) Only 2 c) Neither d) Both (a) and (b)"),
            LineKind::Options(OptionLine {
                prefix: "",
                options: vec!["Only 1", "Only 2", "Neither", "Both (a) and (b)"],
            })
        );
    }

    #[test]
    fn test_classify_ignored_lines() {
        assert_eq!(classify("Answers"), LineKind::Ignored);
        assert_eq!(classify("1.d 2.a 3.c"), LineKind::Ignored);
        assert_eq!(classify("151.(C) 152.(B)"), LineKind::Ignored);
        assert_eq!(classify("Discussion"), LineKind::Ignored);
        assert_eq!(classify("© All Rights Reserved"), LineKind::Ignored);
        assert_eq!(
            classify("Which seats are Reserved for SC/ST?"),
            LineKind::Text("Which seats are Reserved for SC/ST?")
        );
    }
}
