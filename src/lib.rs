//! # MCQ Import
//!
//! 从格式不统一的段落文本中抽取单选题（题干 + 4 个选项 + 正确答案），
//! 去重后写入题库
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 抽取核心（Extractor）
//! - `extractor/` - 纯函数式，无 I/O，无全局状态
//! - `QuestionExtractor` - 行分类 → 题块切分 → 题干/选项划分 → 答案解析 → 校验
//! - `models/` - 题目模型、答案表、各类文档加载
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单道题
//! - `RecordSink` - 题库抽象（`MemorySink` / `JsonFileSink`）
//! - `ReviewWriter` - 写复核文件能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一道题"的完整入库流程
//! - `QuestionCtx` - 上下文封装（文档 + 题号）
//! - `QuestionFlow` - 流程编排（复核 → 入库 → 计数）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量文档处理器，管理题库和并发
//! - `orchestrator/document_processor` - 单个文档处理器，抽取并逐题入库
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod extractor;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use extractor::{ExtractionStats, ExtractorConfig, QuestionExtractor, RejectReason};
pub use models::{AnswerKey, ExtractedQuestion, QuestionRecord, StoredQuestion};
pub use orchestrator::{process_document, App, RunSummary};
pub use services::{InsertOutcome, JsonFileSink, MemorySink, RecordSink};
pub use workflow::{ProcessResult, QuestionCtx, QuestionFlow};
