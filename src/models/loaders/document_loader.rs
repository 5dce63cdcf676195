use super::json_loader::{parse_json_source, JsonSource};
use super::text_loader::load_text_lines;
use crate::error::{AppError, AppResult, FileError};
use crate::models::question::QuestionRecord;
use std::path::{Path, PathBuf};
use tokio::fs;

/// 支持的输入文件扩展名
const SUPPORTED_EXTENSIONS: [&str; 2] = ["txt", "json"];

/// 一份已加载的输入文档
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    /// 段落文本，需要抽取
    Lines(Vec<String>),
    /// 题目导出，直接入库
    Records(Vec<QuestionRecord>),
}

impl Document {
    pub fn len(&self) -> usize {
        match self {
            Document::Lines(lines) => lines.len(),
            Document::Records(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
}

/// 按扩展名加载文档
pub async fn load_document(path: &Path) -> AppResult<Document> {
    let display = path.display().to_string();
    match extension(path).as_deref() {
        Some("txt") => Ok(Document::Lines(load_text_lines(path).await?)),
        Some("json") => {
            let content = fs::read_to_string(path)
                .await
                .map_err(|e| AppError::file_read_failed(display.clone(), e))?;
            match parse_json_source(&content, &display)? {
                JsonSource::Text(lines) => Ok(Document::Lines(lines)),
                JsonSource::Records(records) => Ok(Document::Records(records)),
            }
        }
        _ => Err(FileError::UnsupportedFormat { path: display }.into()),
    }
}

/// 列出文件夹中所有支持的输入文件，按文件名排序
pub async fn list_documents(folder_path: &str) -> AppResult<Vec<PathBuf>> {
    let folder = PathBuf::from(folder_path);

    if !folder.is_dir() {
        return Err(FileError::DirectoryNotFound {
            path: folder_path.to_string(),
        }
        .into());
    }

    let mut documents = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .map_err(|e| AppError::file_read_failed(folder_path, e))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| AppError::file_read_failed(folder_path, e))?
    {
        let path = entry.path();
        let supported = extension(&path)
            .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
            .unwrap_or(false);
        if supported && path.is_file() {
            documents.push(path);
        }
    }

    documents.sort();
    Ok(documents)
}
