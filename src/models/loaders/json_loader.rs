use super::text_loader::split_paragraphs;
use crate::error::{AppResult, FileError, RecordError};
use crate::models::question::QuestionRecord;
use serde_json::{Map, Value};

/// JSON 文件的两种内容
#[derive(Debug, Clone, PartialEq)]
pub enum JsonSource {
    /// 待抽取的文本段落
    Text(Vec<String>),
    /// 已结构化的题目，跳过抽取
    Records(Vec<QuestionRecord>),
}

/// 解析 JSON 文件内容
///
/// 支持的形状：
/// - 字符串：整段文本
/// - 字符串数组：每个元素一段或多段
/// - 对象数组：题目导出 `{question, options, correct_answer}`，任一条无效则整个文件作废
/// - 对象：取 `text` / `content` 字段；都没有时取最长的键或字符串值作为正文
pub fn parse_json_source(content: &str, path: &str) -> AppResult<JsonSource> {
    let value: Value = serde_json::from_str(content).map_err(|source| FileError::JsonParseFailed {
        path: path.to_string(),
        source,
    })?;

    match value {
        Value::String(text) => Ok(JsonSource::Text(split_paragraphs(&text))),
        Value::Array(items) if items.iter().all(Value::is_string) => Ok(JsonSource::Text(
            items
                .iter()
                .filter_map(Value::as_str)
                .flat_map(split_paragraphs)
                .collect(),
        )),
        Value::Array(items) if items.iter().all(Value::is_object) => {
            Ok(JsonSource::Records(parse_records(items)?))
        }
        Value::Object(map) => match object_text(&map) {
            Some(text) => Ok(JsonSource::Text(split_paragraphs(text))),
            None => Err(unsupported(path)),
        },
        _ => Err(unsupported(path)),
    }
}

fn unsupported(path: &str) -> crate::error::AppError {
    FileError::UnsupportedFormat {
        path: path.to_string(),
    }
    .into()
}

fn parse_records(items: Vec<Value>) -> Result<Vec<QuestionRecord>, RecordError> {
    items
        .into_iter()
        .enumerate()
        .map(|(position, item)| {
            serde_json::from_value::<QuestionRecord>(item).map_err(|e| RecordError::InvalidEntry {
                position,
                reason: e.to_string(),
            })
        })
        .collect()
}

fn object_text(map: &Map<String, Value>) -> Option<&str> {
    for field in ["text", "content"] {
        if let Some(text) = map.get(field).and_then(Value::as_str) {
            return Some(text);
        }
    }

    // 有的导出把整段文本存成了对象的键
    map.iter()
        .flat_map(|(key, value)| [Some(key.as_str()), value.as_str()])
        .flatten()
        .filter(|text| !text.trim().is_empty())
        .max_by_key(|text| text.chars().count())
}
