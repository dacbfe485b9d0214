use super::labels::{AgingBucket, DegradationStatus, RegionalGroup};
use super::shipment::ShipmentRecord;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Aging 计算所用的参考日期
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgingReference {
    /// Data Última Ocorrência (Degradação 视图)
    #[default]
    LastOccurrence,
    /// Data do frete (生成到开票监控视图)
    FreightDate,
}

impl AgingReference {
    pub fn pick(&self, record: &ShipmentRecord) -> Option<chrono::NaiveDate> {
        match self {
            AgingReference::LastOccurrence => record.last_occurrence_date,
            AgingReference::FreightDate => record.freight_date,
        }
    }
}

/// 日期解析模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateMode {
    /// 无法解析的日期置为 None
    #[default]
    Lenient,
    /// 遇到第一个无法解析的日期即中止
    Strict,
}

/// 带派生字段的货运记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedShipment {
    #[serde(flatten)]
    pub record: ShipmentRecord,
    pub client: String,
    pub aging_bucket: AgingBucket,
    pub regional_group: Option<RegionalGroup>,
    pub degradation_status: DegradationStatus,
}

/// 单次加工的统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichStats {
    pub rows: usize,
    pub malformed_dates: usize,
    pub malformed_currency: usize,
    pub unknown_degradation: usize,
    pub unset_regional: usize,
}

/// 加工后的数据集；加载后只读
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnrichedDataset {
    records: Vec<EnrichedShipment>,
    pub stats: EnrichStats,
    pub aging_reference: AgingReference,
    pub computed_at: Option<NaiveDateTime>,
}

impl EnrichedDataset {
    pub fn new(
        records: Vec<EnrichedShipment>,
        stats: EnrichStats,
        aging_reference: AgingReference,
        computed_at: NaiveDateTime,
    ) -> Self {
        Self {
            records,
            stats,
            aging_reference,
            computed_at: Some(computed_at),
        }
    }

    pub fn records(&self) -> &[EnrichedShipment] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
