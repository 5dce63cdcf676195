//! JSON 文件题库 - 业务能力层
//!
//! 只负责"存题"能力：去重、分配编号、落盘，不关心抽取流程

use super::memory_sink::MemorySink;
use super::record_sink::{InsertOutcome, RecordSink};
use crate::error::SinkError;
use crate::models::question::{QuestionRecord, StoredQuestion};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// JSON 文件题库
///
/// 文件内容为 [`StoredQuestion`] 数组。写入先进内存，[`JsonFileSink::flush`] 时整体落盘
#[derive(Debug)]
pub struct JsonFileSink {
    path: PathBuf,
    rows: MemorySink,
    dirty: bool,
}

impl JsonFileSink {
    /// 打开题库文件，不存在时视为空题库
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, SinkError> {
        let path = path.into();
        let display = path.display().to_string();

        let rows: Vec<StoredQuestion> = if fs::try_exists(&path).await.unwrap_or(false) {
            let content = fs::read_to_string(&path)
                .await
                .map_err(|e| SinkError::io(display.clone(), e))?;
            if content.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&content).map_err(|source| SinkError::Corrupted {
                    path: display.clone(),
                    source,
                })?
            }
        } else {
            Vec::new()
        };

        info!("📂 打开题库 {}: 已有 {} 道题", path.display(), rows.len());
        Ok(Self {
            path,
            rows: MemorySink::from_rows(rows),
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rows(&self) -> &[StoredQuestion] {
        self.rows.rows()
    }

    /// 是否有未落盘的修改
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// 清空已有题目，编号重新从 1 开始
    pub fn reset(&mut self) {
        let removed = self.rows.len();
        self.rows.clear();
        self.dirty = true;
        info!("🗑️ 已清空题库中的 {} 道题", removed);
    }

    /// 当前内容的 JSON 快照
    pub fn to_json(&self) -> Result<String, SinkError> {
        Ok(serde_json::to_string_pretty(self.rows.rows())?)
    }

    /// 落盘
    pub async fn flush(&mut self) -> Result<(), SinkError> {
        if !self.dirty {
            return Ok(());
        }
        write_atomic(self.path.clone(), self.to_json()?).await?;
        self.dirty = false;
        Ok(())
    }

    /// 外部落盘成功后调用
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }
}

impl RecordSink for JsonFileSink {
    fn insert(&mut self, record: &QuestionRecord) -> Result<InsertOutcome, SinkError> {
        let outcome = self.rows.insert(record)?;
        if matches!(outcome, InsertOutcome::Inserted { .. }) {
            self.dirty = true;
        }
        Ok(outcome)
    }

    fn len(&self) -> usize {
        self.rows.len()
    }
}

/// 先写临时文件再改名，避免写到一半的文件覆盖旧数据
pub async fn write_atomic(path: PathBuf, contents: String) -> Result<(), SinkError> {
    let display = path.display().to_string();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| SinkError::io(display.clone(), e))?;
    }

    let mut tmp = path.clone().into_os_string();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, contents.as_bytes())
        .await
        .map_err(|e| SinkError::io(tmp.display().to_string(), e))?;
    fs::rename(&tmp, &path)
        .await
        .map_err(|e| SinkError::io(display.clone(), e))?;

    debug!("题库已写入 {} ({} 字节)", path.display(), contents.len());
    Ok(())
}
