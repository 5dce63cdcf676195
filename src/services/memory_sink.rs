//! 内存题库

use super::record_sink::{InsertOutcome, RecordSink};
use crate::error::SinkError;
use crate::models::question::{QuestionRecord, StoredQuestion};
use std::collections::HashMap;

/// 内存题库
///
/// 编号从 1 开始顺序分配，按题干自然键去重
#[derive(Debug)]
pub struct MemorySink {
    rows: Vec<StoredQuestion>,
    index: HashMap<String, u64>,
    next_id: u64,
}

impl MemorySink {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            index: HashMap::new(),
            next_id: 1,
        }
    }

    /// 从已有数据恢复，编号接着最大值往后分配
    pub fn from_rows(rows: Vec<StoredQuestion>) -> Self {
        let mut sink = Self::new();
        for row in rows {
            sink.next_id = sink.next_id.max(row.id + 1);
            sink.index.entry(row.natural_key()).or_insert(row.id);
            sink.rows.push(row);
        }
        sink
    }

    pub fn rows(&self) -> &[StoredQuestion] {
        &self.rows
    }

    /// 清空题库，编号重新从 1 开始
    pub fn clear(&mut self) {
        self.rows.clear();
        self.index.clear();
        self.next_id = 1;
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordSink for MemorySink {
    fn insert(&mut self, record: &QuestionRecord) -> Result<InsertOutcome, SinkError> {
        let key = record.natural_key();
        if let Some(&existing_id) = self.index.get(&key) {
            return Ok(InsertOutcome::Duplicate { existing_id });
        }

        let id = self.next_id;
        self.next_id += 1;
        self.index.insert(key, id);
        self.rows.push(StoredQuestion::from_record(id, record));
        Ok(InsertOutcome::Inserted { id })
    }

    fn len(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(text: &str) -> QuestionRecord {
        QuestionRecord::new(
            text,
            ["3".into(), "4".into(), "5".into(), "22".into()],
            1,
        )
        .unwrap()
    }

    #[test]
    fn test_insert_and_dedup_by_natural_key() {
        let mut sink = MemorySink::new();
        assert_eq!(
            sink.insert(&record("What is 2+2?")).unwrap(),
            InsertOutcome::Inserted { id: 1 }
        );
        assert_eq!(
            sink.insert(&record("what  IS 2+2?")).unwrap(),
            InsertOutcome::Duplicate { existing_id: 1 }
        );
        assert_eq!(
            sink.insert(&record("What is 3+3?")).unwrap(),
            InsertOutcome::Inserted { id: 2 }
        );
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn test_from_rows_continues_ids_and_clear_resets() {
        let rows = vec![
            StoredQuestion::from_record(7, &record("What is 2+2?")),
            StoredQuestion::from_record(3, &record("What is 3+3?")),
        ];
        let mut sink = MemorySink::from_rows(rows);
        assert_eq!(
            sink.insert(&record("What is 4+4?")).unwrap(),
            InsertOutcome::Inserted { id: 8 }
        );

        sink.clear();
        assert!(sink.is_empty());
        assert_eq!(
            sink.insert(&record("What is 2+2?")).unwrap(),
            InsertOutcome::Inserted { id: 1 }
        );
    }
}
