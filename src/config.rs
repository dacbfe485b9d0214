use crate::error::PipelineError;
use crate::models::{AgingReference, DateMode, DegradationStatus, RegionalGroup};
use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub dataset: DatasetConfig,
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// 报表 CSV 路径
    pub path: PathBuf,
    /// 业务规则 TOML 路径
    pub rules_path: PathBuf,
    /// 原始表缓存有效期 (秒)
    pub cache_ttl_secs: u64,
}

impl DatasetConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub aging_reference: AgingReference,
    pub date_mode: DateMode,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            dataset: DatasetConfig {
                path: PathBuf::from("dados/relatorio.csv"),
                rules_path: PathBuf::from("config/business_rules.toml"),
                cache_ttl_secs: 3600,
            },
            pipeline: PipelineConfig {
                aging_reference: AgingReference::LastOccurrence,
                date_mode: DateMode::Lenient,
            },
        }
    }
}

impl AppConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server: ServerConfig {
                host: std::env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: std::env::var("SERVER_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(defaults.server.port),
            },
            dataset: DatasetConfig {
                path: std::env::var("DATASET_PATH")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.dataset.path),
                rules_path: std::env::var("RULES_PATH")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.dataset.rules_path),
                cache_ttl_secs: std::env::var("CACHE_TTL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.dataset.cache_ttl_secs),
            },
            pipeline: PipelineConfig {
                aging_reference: match std::env::var("AGING_REFERENCE").as_deref() {
                    Ok("freight_date") => AgingReference::FreightDate,
                    _ => AgingReference::LastOccurrence,
                },
                date_mode: match std::env::var("DATE_MODE").as_deref() {
                    Ok("strict") => DateMode::Strict,
                    _ => DateMode::Lenient,
                },
            },
        }
    }
}

/// 客户规则：付款方证件号 (CNPJ) 根前缀 -> 客户名
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRule {
    pub root_id: String,
    pub name: String,
}

/// 区域分组：各区域的收货代理集合
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionalRules {
    #[serde(default)]
    pub gru: HashSet<String>,
    #[serde(default)]
    pub rjo: HashSet<String>,
    #[serde(default)]
    pub bhz: HashSet<String>,
    #[serde(default)]
    pub br: HashSet<String>,
}

impl RegionalRules {
    /// 按判定顺序返回
    pub fn ordered(&self) -> [(RegionalGroup, &HashSet<String>); 4] {
        [
            (RegionalGroup::Gru, &self.gru),
            (RegionalGroup::Rjo, &self.rjo),
            (RegionalGroup::Bhz, &self.bhz),
            (RegionalGroup::Br, &self.br),
        ]
    }
}

/// 运营状态：各状态对应的事件代码集合
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegradationRules {
    #[serde(default)]
    pub open_scheduling: HashSet<String>,
    #[serde(default)]
    pub awaiting_checklist: HashSet<String>,
    #[serde(default)]
    pub cancelled_finalized: HashSet<String>,
    #[serde(default)]
    pub open_collection: HashSet<String>,
    #[serde(default)]
    pub open_return: HashSet<String>,
    #[serde(default)]
    pub returned: HashSet<String>,
    #[serde(default)]
    pub open_delivery: HashSet<String>,
    #[serde(default)]
    pub scheduling_failure: HashSet<String>,
    #[serde(default)]
    pub return_failure: HashSet<String>,
    #[serde(default)]
    pub other: HashSet<String>,
    #[serde(default)]
    pub pending: HashSet<String>,
    #[serde(default)]
    pub collection_failure: HashSet<String>,
}

impl DegradationRules {
    /// 按判定优先级返回
    pub fn ordered(&self) -> [(DegradationStatus, &HashSet<String>); 12] {
        [
            (DegradationStatus::OpenScheduling, &self.open_scheduling),
            (DegradationStatus::AwaitingChecklist, &self.awaiting_checklist),
            (DegradationStatus::CancelledFinalized, &self.cancelled_finalized),
            (DegradationStatus::OpenCollection, &self.open_collection),
            (DegradationStatus::OpenReturn, &self.open_return),
            (DegradationStatus::Returned, &self.returned),
            (DegradationStatus::OpenDelivery, &self.open_delivery),
            (DegradationStatus::SchedulingFailure, &self.scheduling_failure),
            (DegradationStatus::ReturnFailure, &self.return_failure),
            (DegradationStatus::Other, &self.other),
            (DegradationStatus::Pending, &self.pending),
            (DegradationStatus::CollectionFailure, &self.collection_failure),
        ]
    }

    /// 出现在多个集合中的事件代码 (按优先级只会命中第一个)
    pub fn overlapping_codes(&self) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut overlaps: Vec<String> = Vec::new();
        for (_, codes) in self.ordered() {
            for code in codes {
                if !seen.insert(code.as_str()) && !overlaps.contains(code) {
                    overlaps.push(code.clone());
                }
            }
        }
        overlaps.sort();
        overlaps
    }
}

/// 业务规则 (客户表、区域集合、状态集合)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessRules {
    #[serde(default)]
    pub clients: Vec<ClientRule>,
    #[serde(default)]
    pub regional: RegionalRules,
    #[serde(default)]
    pub degradation: DegradationRules,
}

impl BusinessRules {
    /// 从 TOML/JSON 文件加载 (按扩展名识别格式)
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let rules: BusinessRules = Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize()?;
        rules.warn_on_overlaps();
        Ok(rules)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, PipelineError> {
        let rules: BusinessRules = Config::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        rules.warn_on_overlaps();
        Ok(rules)
    }

    fn warn_on_overlaps(&self) {
        let overlaps = self.degradation.overlapping_codes();
        if !overlaps.is_empty() {
            tracing::warn!(
                "事件代码出现在多个状态集合中, 按优先级取第一个: {:?}",
                overlaps
            );
        }
        tracing::info!(
            "业务规则已加载: {} 个客户, {} 个区域代理, {} 个事件代码",
            self.clients.len(),
            self.regional.ordered().iter().map(|(_, s)| s.len()).sum::<usize>(),
            self.degradation.ordered().iter().map(|(_, s)| s.len()).sum::<usize>(),
        );
    }
}
