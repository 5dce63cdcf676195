//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量文档处理器
//! - 管理应用生命周期（初始化、运行、落盘）
//! - 扫描输入目录（Vec<PathBuf>）
//! - 控制并发数量（Semaphore）
//! - 持有题库（JsonFileSink）
//! - 输出全局统计信息
//!
//! ### `document_processor` - 单个文档处理器
//! - 加载单个文档并抽取题目（Vec<ExtractedQuestion>）
//! - 创建并复用 QuestionFlow 逐题入库
//! - 输出单个文档的统计信息
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<Document>)
//!     ↓
//! document_processor (处理 Vec<ExtractedQuestion>)
//!     ↓
//! workflow::QuestionFlow (处理单个题目)
//!     ↓
//! services (能力层：题库 / 复核文件)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：batch_processor 管批量，document_processor 管单个
//! 2. **资源隔离**：只有编排层持有题库
//! 3. **向下依赖**：编排层 → workflow → services
//! 4. **无业务逻辑**：只做调度和统计，抽取规则全部在 extractor

pub mod batch_processor;
pub mod document_processor;

// 重新导出主要类型
pub use batch_processor::{App, RunSummary};
pub use document_processor::{import_document, process_document, DocumentOutcome, ImportStats};
