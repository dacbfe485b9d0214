use std::io;
use thiserror::Error;

/// 数据加工流程错误
///
/// 单条记录上的问题 (日期/金额无法解析、分类未命中) 不在此列，
/// 它们在记录内以 None / 标记 / 兜底标签体现。
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("malformed date at row {row}, column '{column}': '{value}'")]
    MalformedDate {
        row: usize,
        column: String,
        value: String,
    },
    #[error("invalid filter value for '{field}': '{value}'")]
    InvalidFilter { field: &'static str, value: String },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
