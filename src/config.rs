use crate::error::{AppError, AppResult, ConfigError, FileError};
use crate::extractor::{
    ExcessOptionPolicy, ExtractorConfig, SegmentationStrategy, UnresolvedAnswerPolicy,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// 指定配置文件路径的环境变量
pub const CONFIG_FILE_ENV: &str = "IMPORT_CONFIG";

/// 程序配置文件
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 待导入文档所在目录
    pub input_folder: String,
    /// 题库文件
    pub store_path: PathBuf,
    /// 外部答案表文件（可选）
    pub answer_key_file: Option<PathBuf>,
    /// 导入前清空题库
    pub reset_store: bool,
    /// 同时处理的文档数量
    pub max_concurrent_documents: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
    /// 需要复核的题目写入此文件（可选）
    pub review_file: Option<PathBuf>,
    // --- 抽取配置 ---
    pub segmentation: SegmentationStrategy,
    pub unresolved_answer: UnresolvedAnswerPolicy,
    pub excess_options: ExcessOptionPolicy,
    pub min_stem_chars: usize,
    // --- 落盘重试 ---
    pub flush_max_retries: u32,
    pub flush_retry_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        let extractor = ExtractorConfig::default();
        Self {
            input_folder: "input".to_string(),
            store_path: PathBuf::from("questions.json"),
            answer_key_file: None,
            reset_store: false,
            max_concurrent_documents: 8,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
            review_file: None,
            segmentation: extractor.segmentation,
            unresolved_answer: extractor.unresolved_answer,
            excess_options: extractor.excess_options,
            min_stem_chars: extractor.min_stem_chars,
            flush_max_retries: 3,
            flush_retry_delay_ms: 200,
        }
    }
}

impl Config {
    /// 默认配置叠加环境变量
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// 解析 TOML 配置，缺省字段取默认值
    pub fn from_toml_str(content: &str, path: &str) -> AppResult<Self> {
        let config: Self = toml::from_str(content).map_err(|source| FileError::TomlParseFailed {
            path: path.to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// 从 TOML 文件加载
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::file_read_failed(display.clone(), e))?;
        Self::from_toml_str(&content, &display)
    }

    /// 加载配置：`IMPORT_CONFIG` 指定的文件（如有），再叠加环境变量
    pub fn load() -> AppResult<Self> {
        let mut config = match std::env::var(CONFIG_FILE_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(Path::new(path.trim()))?,
            _ => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// 按变量名逐项覆盖；取值无法解析时报错，不静默回退
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> AppResult<()> {
        if let Some(v) = lookup("INPUT_FOLDER") {
            self.input_folder = v;
        }
        if let Some(v) = lookup("STORE_PATH") {
            self.store_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("ANSWER_KEY_FILE") {
            self.answer_key_file = non_empty(v).map(PathBuf::from);
        }
        if let Some(v) = lookup("RESET_STORE") {
            self.reset_store = parse_var("RESET_STORE", &v, "bool")?;
        }
        if let Some(v) = lookup("MAX_CONCURRENT_DOCUMENTS") {
            self.max_concurrent_documents = parse_var("MAX_CONCURRENT_DOCUMENTS", &v, "usize")?;
        }
        if let Some(v) = lookup("VERBOSE_LOGGING") {
            self.verbose_logging = parse_var("VERBOSE_LOGGING", &v, "bool")?;
        }
        if let Some(v) = lookup("OUTPUT_LOG_FILE") {
            self.output_log_file = v;
        }
        if let Some(v) = lookup("REVIEW_FILE") {
            self.review_file = non_empty(v).map(PathBuf::from);
        }
        if let Some(v) = lookup("SEGMENTATION") {
            self.segmentation = v.parse()?;
        }
        if let Some(v) = lookup("UNRESOLVED_ANSWER") {
            self.unresolved_answer = v.parse()?;
        }
        if let Some(v) = lookup("EXCESS_OPTIONS") {
            self.excess_options = v.parse()?;
        }
        if let Some(v) = lookup("MIN_STEM_CHARS") {
            self.min_stem_chars = parse_var("MIN_STEM_CHARS", &v, "usize")?;
        }
        if let Some(v) = lookup("FLUSH_MAX_RETRIES") {
            self.flush_max_retries = parse_var("FLUSH_MAX_RETRIES", &v, "u32")?;
        }
        if let Some(v) = lookup("FLUSH_RETRY_DELAY_MS") {
            self.flush_retry_delay_ms = parse_var("FLUSH_RETRY_DELAY_MS", &v, "u64")?;
        }

        self.validate()?;
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent_documents == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_concurrent_documents".to_string(),
                value: "0".to_string(),
                reason: "至少为 1".to_string(),
            });
        }
        Ok(())
    }

    /// 抽取器配置
    pub fn extractor_config(&self) -> ExtractorConfig {
        ExtractorConfig {
            segmentation: self.segmentation,
            unresolved_answer: self.unresolved_answer,
            excess_options: self.excess_options,
            min_stem_chars: self.min_stem_chars,
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn parse_var<T: FromStr>(name: &str, value: &str, expected_type: &str) -> AppResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::env_parse_failed(name, value, expected_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.max_concurrent_documents, 8);
        assert_eq!(config.extractor_config(), ExtractorConfig::default());
        assert!(config.answer_key_file.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(lookup_from(&[
                ("INPUT_FOLDER", "papers"),
                ("MAX_CONCURRENT_DOCUMENTS", "2"),
                ("UNRESOLVED_ANSWER", "default_to_first"),
                ("SEGMENTATION", "option-runs"),
                ("ANSWER_KEY_FILE", ""),
            ]))
            .unwrap();

        assert_eq!(config.input_folder, "papers");
        assert_eq!(config.max_concurrent_documents, 2);
        assert_eq!(
            config.unresolved_answer,
            UnresolvedAnswerPolicy::DefaultToFirst
        );
        assert_eq!(config.segmentation, SegmentationStrategy::OptionRuns);
        assert!(config.answer_key_file.is_none());
    }

    #[test]
    fn test_bad_env_value_is_an_error() {
        let mut config = Config::default();
        let err = config
            .apply_overrides(lookup_from(&[("MAX_CONCURRENT_DOCUMENTS", "many")]))
            .unwrap_err();
        assert!(err.to_string().contains("MAX_CONCURRENT_DOCUMENTS"));

        let err = config
            .apply_overrides(lookup_from(&[("MAX_CONCURRENT_DOCUMENTS", "0")]))
            .unwrap_err();
        assert!(matches!(err, AppError::Config(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_toml_config() {
        let toml = r#"
            input_folder = "papers"
            store_path = "out/questions.json"
            excess_options = "reject"
            min_stem_chars = 15
        "#;
        let config = Config::from_toml_str(toml, "import.toml").unwrap();

        assert_eq!(config.store_path, PathBuf::from("out/questions.json"));
        assert_eq!(config.excess_options, ExcessOptionPolicy::Reject);
        assert_eq!(config.extractor_config().min_stem_chars, 15);
        // 未写的字段取默认值
        assert_eq!(config.flush_max_retries, 3);

        assert!(Config::from_toml_str("excess_options = \"maybe\"", "import.toml").is_err());
    }
}
