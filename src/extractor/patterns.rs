//! 题目抽取用到的正则表达式，统一预编译

use once_cell::sync::Lazy;
use regex::Regex;

/// 题号标记：`12.` / `12)` / `Q.No. 12:` / `Question 12.`
///
/// 捕获组 1-3 为题号，4 为标记之后的正文
pub static QUESTION_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:(?i:q\.?\s*no\.?)\s*(\d+)\s*[:.)]?\s*|(?i:question)\s+(\d+)\s*[:.)]\s*|(\d+)[.)](?:\s+|$))(.*)$",
    )
    .expect("Invalid regex pattern")
});

/// 行首题号，归一化时剥离
pub static LEADING_NUMBERING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?i:q\.?\s*no\.?)\s*\d+\s*[:.)]?|(?i:question)\s+\d+\s*[:.)]|\d+[.)](?:\s+|$))\s*")
        .expect("Invalid regex pattern")
});

/// 选项标记：`a)` / `A)` / `(a)` / `(A)`，要求位于行首或空白之后
///
/// 捕获组 1 为标记本体（含可选的左括号），2 为字母
pub static OPTION_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|\s)(\(?([A-Da-d])\s?\))").expect("Invalid regex pattern")
});

/// 行首选项标签，归一化时剥离
pub static LEADING_OPTION_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\(?[A-Da-d]\s?\)\s*").expect("Invalid regex pattern"));

/// 行内答案：`Answer: b` / `Correct answer: (C)`
///
/// 捕获组 1 为字母；字母之后必须是右括号或单词边界，`Answer: both` 不算
pub static INLINE_ANSWER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:correct\s+)?answer\s*[:：]\s*\(?([a-z])(?:\)|\b)")
        .expect("Invalid regex pattern")
});

/// 答案表条目：`151.(C)` / `1.d`
///
/// 捕获组 1 为题号，2 或 3 为字母
pub static ANSWER_KEY_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d+)\.(?:\(([A-Da-d])\)|([A-Da-d])\b)").expect("Invalid regex pattern")
});

/// 答案表标题：`Answers` / `Answers :` / `Answer Key`
pub static ANSWER_KEY_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i)answers?(?:\s+key)?\s*[:：]?$").expect("Invalid regex pattern")
});

/// 题块中的解析类标签行
pub static NOISE_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i)(?:discussion|explanation)\s*[:：]?$").expect("Invalid regex pattern")
});

/// 省略号填充
pub static ELLIPSIS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"…+|\.{3,}").expect("Invalid regex pattern"));

/// 版权页脚：含 `©` 或 `Rights Reserved`
pub fn is_footer(line: &str) -> bool {
    line.contains('©') || line.contains("Rights Reserved")
}

/// 只由答案表条目（和标点空白）组成的行
pub fn is_answer_key_line(line: &str) -> bool {
    if !ANSWER_KEY_ENTRY.is_match(line) {
        return false;
    }
    let rest = ANSWER_KEY_ENTRY.replace_all(line, "");
    !rest.chars().any(|c| c.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_marker_forms() {
        let caps = QUESTION_MARKER.captures("12. What is 2+2?").unwrap();
        assert_eq!(&caps[3], "12");
        assert_eq!(&caps[4], "What is 2+2?");

        let caps = QUESTION_MARKER.captures("Q.No. 7: Who drafted it?").unwrap();
        assert_eq!(&caps[1], "7");
        assert_eq!(&caps[4], "Who drafted it?");

        let caps = QUESTION_MARKER.captures("Question 3) Pick one").unwrap();
        assert_eq!(&caps[2], "3");
        assert_eq!(&caps[4], "Pick one");

        // 小数、无空白的题号都不算
        assert!(QUESTION_MARKER.captures("2.5 million people").is_none());
        assert!(QUESTION_MARKER.captures("Paris").is_none());
    }

    #[test]
    fn test_option_markers() {
        let letters: Vec<&str> = OPTION_MARKER
            .captures_iter("a) Delhi b) Mumbai (c) Pune d ) Goa")
            .map(|c| c.get(2).unwrap().as_str())
            .collect();
        assert_eq!(letters, vec!["a", "b", "c", "d"]);

        // 单词结尾的 "d)" 不是选项标记
        assert!(!OPTION_MARKER.is_match("the second (and)"));
    }

    #[test]
    fn test_inline_answer() {
        let caps = INLINE_ANSWER.captures("Answer: b").unwrap();
        assert_eq!(&caps[1], "b");
        let caps = INLINE_ANSWER.captures("Correct Answer : (C)").unwrap();
        assert_eq!(&caps[1], "C");
        assert!(INLINE_ANSWER.captures("Answer: both of these").is_none());
        assert!(INLINE_ANSWER.captures("Answers :").is_none());
    }

    #[test]
    fn test_answer_key_lines() {
        assert!(is_answer_key_line("151.(C) 152.(B) 153.(D)"));
        assert!(is_answer_key_line("1.d 2.a 3.a 4.a"));
        assert!(!is_answer_key_line("1. a bird in hand"));
        assert!(!is_answer_key_line("1. What is 2+2?"));
    }

    #[test]
    fn test_headings_and_noise() {
        assert!(ANSWER_KEY_HEADING.is_match("Answers"));
        assert!(ANSWER_KEY_HEADING.is_match("answers :"));
        assert!(ANSWER_KEY_HEADING.is_match("Answer Key"));
        assert!(!ANSWER_KEY_HEADING.is_match("Answer: b"));
        assert!(NOISE_LABEL.is_match("Explanation"));
        assert!(is_footer("© 2020 All Rights Reserved"));
        assert!(is_footer("All Rights Reserved"));
        assert!(!is_footer("Which seats are Reserved for SC/ST?"));
    }
}
