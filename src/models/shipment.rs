use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 报表列名
pub mod columns {
    pub const PAYER_DOCUMENT: &str = "Pagador do frete/Documento";
    pub const REFERENCE_NUMBER: &str = "Frete/N° Referência";
    pub const LAST_OCCURRENCE: &str = "Última Ocorrência";
    pub const COLLECTION_AGENT: &str = "Agente de Coleta";
    pub const INVOICE_VALUE: &str = "Nota Fiscal/Valor NF";

    pub const FREIGHT_DATE: &str = "Data do frete";
    pub const COLLECTION_FORECAST_DATE: &str = "Previsão Coleta";
    pub const PERFORMANCE_FINALIZATION_DATE: &str = "Data Finalização Performance";
    pub const COLLECTION_DATE: &str = "Data Coleta";
    pub const LAST_TREATMENT_DATE: &str = "Data Última Tratativa";
    pub const LAST_OCCURRENCE_DATE: &str = "Data Última Ocorrência";
    pub const DELIVERY_FORECAST_DATE: &str = "Previsão de Entrega";

    // 可选列
    pub const CHECKLIST_DATE: &str = "Data Checklist";
    pub const MINUTA_NUMBER: &str = "N° Minuta";

    // 派生列
    pub const CLIENT: &str = "Cliente";
    pub const AGING: &str = "Aging";
    pub const REGIONAL: &str = "Regional";
    pub const DEGRADATION: &str = "Degradação";

    /// 必须存在的输入列，缺任何一列即拒绝整个数据集
    pub const REQUIRED: [&str; 12] = [
        PAYER_DOCUMENT,
        REFERENCE_NUMBER,
        LAST_OCCURRENCE,
        COLLECTION_AGENT,
        INVOICE_VALUE,
        FREIGHT_DATE,
        COLLECTION_FORECAST_DATE,
        PERFORMANCE_FINALIZATION_DATE,
        COLLECTION_DATE,
        LAST_TREATMENT_DATE,
        LAST_OCCURRENCE_DATE,
        DELIVERY_FORECAST_DATE,
    ];
}

/// 原始表格：表头 + 文本单元格，由外部加载器提供
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// 列名 -> 下标
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// 货运记录 (一行报表，已完成类型转换)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShipmentRecord {
    pub freight_date: Option<NaiveDate>,
    pub collection_date: Option<NaiveDate>,
    pub last_occurrence_date: Option<NaiveDate>,
    pub checklist_date: Option<NaiveDate>,
    pub last_treatment_date: Option<NaiveDate>,
    pub performance_finalization_date: Option<NaiveDate>,
    pub collection_forecast_date: Option<NaiveDate>,
    pub delivery_forecast_date: Option<NaiveDate>,
    pub payer_document: String,
    pub reference_number: String,
    pub last_occurrence: String,
    pub collection_agent: String,
    pub minuta_number: Option<String>,
    pub invoice_value: Option<BigDecimal>,      // 解析失败或为空时为 None
    pub invoice_value_malformed: bool,          // 非空但无法解析
}
