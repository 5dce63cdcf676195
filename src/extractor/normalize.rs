//! 题干与选项文本归一化

use super::patterns::{ELLIPSIS, LEADING_NUMBERING, LEADING_OPTION_LABEL};

/// 合并连续空白为单个空格并去掉首尾空白
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 去掉行首题号（`12.` / `Q.No. 12:` 等）
pub fn strip_numbering(text: &str) -> &str {
    match LEADING_NUMBERING.find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    }
}

/// 去掉行首选项标签（`a)` / `(B)` 等）
pub fn strip_option_label(text: &str) -> &str {
    match LEADING_OPTION_LABEL.find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    }
}

/// 归一化题干
pub fn normalize_stem(raw: &str) -> String {
    let text = collapse_whitespace(&ELLIPSIS.replace_all(raw, " "));
    strip_numbering(&text).trim().to_string()
}

/// 归一化选项
pub fn normalize_option(raw: &str) -> String {
    let text = collapse_whitespace(&ELLIPSIS.replace_all(raw, " "));
    strip_option_label(&text).trim().to_string()
}
