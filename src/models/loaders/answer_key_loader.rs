use crate::error::{AppError, AppResult, FileError, RecordError};
use crate::models::answer_key::AnswerKey;
use std::collections::BTreeMap;
use std::path::Path;
use tokio::fs;

/// 加载外部答案表
///
/// `.toml` 文件按 `"题号" = "字母"` 解析，其他文件按答案表文本解析
pub async fn load_answer_key(path: &Path) -> AppResult<AnswerKey> {
    let display = path.display().to_string();
    if !path.exists() {
        return Err(FileError::NotFound { path: display }.into());
    }

    let content = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(display.clone(), e))?;

    let key = if path.extension().and_then(|s| s.to_str()) == Some("toml") {
        parse_answer_key_toml(&content, &display)?
    } else {
        AnswerKey::parse_lines(&content.lines().collect::<Vec<_>>())
    };

    tracing::info!("✓ 加载答案表 {}: {} 条", path.display(), key.len());
    Ok(key)
}

/// 解析 TOML 答案表
pub fn parse_answer_key_toml(content: &str, path: &str) -> AppResult<AnswerKey> {
    let table: BTreeMap<String, String> =
        toml::from_str(content).map_err(|source| FileError::TomlParseFailed {
            path: path.to_string(),
            source,
        })?;

    let mut key = AnswerKey::new();
    for (position, (number, letter)) in table.iter().enumerate() {
        let invalid = |reason: String| RecordError::InvalidEntry { position, reason };

        let number: u32 = number
            .trim()
            .parse()
            .map_err(|_| invalid(format!("题号 '{}' 不是数字", number)))?;
        let mut chars = letter.trim().chars();
        let letter = match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            _ => return Err(invalid(format!("答案 '{}' 不是单个字母", letter)).into()),
        };
        key.insert_letter(number, letter)?;
    }

    Ok(key)
}
