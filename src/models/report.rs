use super::labels::{AgingBucket, DegradationStatus, RegionalGroup};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// 视图汇总：行数、发票金额合计、金额无法解析的行数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewSummary {
    pub count: usize,
    pub total_invoice_value: BigDecimal,
    pub malformed_invoice_count: usize,
}

/// Aging 分布中的一项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgingCount {
    pub aging: AgingBucket,
    pub count: usize,
}

/// 单个状态的面板数据 (指标 + Aging 分布)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusPanel {
    pub status: DegradationStatus,
    pub summary: ViewSummary,
    pub aging: Vec<AgingCount>,
}

/// "Em Aberto"：待预约 / 待收货 / 待退回
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenOverview {
    pub scheduling: StatusPanel,
    pub collection: StatusPanel,
    #[serde(rename = "return")]
    pub return_: StatusPanel,
}

/// "Insucesso"：预约失败 / 收货失败 / 退回失败
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureOverview {
    pub scheduling: StatusPanel,
    pub collection: StatusPanel,
    #[serde(rename = "return")]
    pub return_: StatusPanel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: DegradationStatus,
    pub count: usize,
}

/// "Por Agente" 表中的一行
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentRow {
    pub collection_agent: String,
    pub minuta_number: Option<String>,
    pub aging: AgingBucket,
}

/// 侧边栏下拉选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub clients: Vec<String>,
    pub years: Vec<i32>,
    pub months: Vec<String>,
    pub aging: Vec<AgingBucket>,
    pub regional: Vec<RegionalGroup>,
    pub degradation: Vec<DegradationStatus>,
}
