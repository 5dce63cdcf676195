//! 题库写入能力的抽象

use crate::error::SinkError;
use crate::models::question::QuestionRecord;

/// 单条写入结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// 新写入，`id` 为题库分配的编号
    Inserted { id: u64 },
    /// 题干与已有题目重复，未写入
    Duplicate { existing_id: u64 },
}

/// 题库
///
/// 按题干自然键去重；重复不是错误，通过 [`InsertOutcome::Duplicate`] 报告
pub trait RecordSink {
    fn insert(&mut self, record: &QuestionRecord) -> Result<InsertOutcome, SinkError>;

    /// 当前题目总数
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
