use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 题目数据错误
    #[error("题目数据错误: {0}")]
    Record(#[from] RecordError),
    /// 题库存储错误
    #[error("存储错误: {0}")]
    Sink(#[from] SinkError),
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// JSON 解析失败
    #[error("JSON解析失败 ({path}): {source}")]
    JsonParseFailed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 不支持的文件格式
    #[error("不支持的文件格式: {path}")]
    UnsupportedFormat { path: String },
    /// 目录不存在
    #[error("目录不存在: {path}")]
    DirectoryNotFound { path: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置项取值非法
    #[error("配置项 {field} 取值非法 ('{value}'): {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// 题目数据错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// 选项数量不是 4
    #[error("选项数量必须为 4，实际为 {found}")]
    OptionCount { found: usize },
    /// 题干过短
    #[error("题干过短: {len} 个字符 (至少 {min} 个)")]
    StemTooShort { len: usize, min: usize },
    /// 选项内容为空
    #[error("第 {index} 个选项为空")]
    EmptyOption { index: usize },
    /// 答案索引越界
    #[error("答案索引 {index} 超出范围 [0, 3]")]
    AnswerOutOfRange { index: i64 },
    /// 答案字母无法识别
    #[error("无法识别的答案字母: {letter}")]
    InvalidAnswerLetter { letter: String },
    /// 批量数据中的某一条无效
    #[error("第 {position} 条题目无效: {reason}")]
    InvalidEntry { position: usize, reason: String },
}

/// 题库存储错误
#[derive(Debug, Error)]
pub enum SinkError {
    /// 读写题库文件失败
    #[error("读写题库文件失败 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 题库文件内容损坏
    #[error("题库文件内容无法解析 ({path}): {source}")]
    Corrupted {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    /// 序列化失败
    #[error("题库序列化失败: {0}")]
    Serialize(#[from] serde_json::Error),
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建环境变量解析错误
    pub fn env_parse_failed(
        var_name: impl Into<String>,
        value: impl Into<String>,
        expected_type: impl Into<String>,
    ) -> Self {
        AppError::Config(ConfigError::EnvVarParseFailed {
            var_name: var_name.into(),
            value: value.into(),
            expected_type: expected_type.into(),
        })
    }
}

impl SinkError {
    /// 创建题库文件读写错误
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        SinkError::Io {
            path: path.into(),
            source,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
