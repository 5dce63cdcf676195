use crate::error::{AppError, AppResult};
use std::path::Path;
use tokio::fs;

/// 把文本拆成段落：每行一段，去首尾空白，丢弃空行
pub fn split_paragraphs(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// 从纯文本文件加载段落
pub async fn load_text_lines(path: &Path) -> AppResult<Vec<String>> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;
    Ok(split_paragraphs(&content))
}
