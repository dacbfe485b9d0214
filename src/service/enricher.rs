use crate::config::BusinessRules;
use crate::error::PipelineError;
use crate::models::{
    columns, AgingReference, DateMode, DegradationStatus, EnrichStats, EnrichedDataset,
    EnrichedShipment, RawTable, ShipmentRecord,
};
use crate::service::classifier::RowClassifier;
use bigdecimal::{BigDecimal, ParseBigDecimalError};
use chrono::{NaiveDate, NaiveDateTime};
use std::str::FromStr;
use thiserror::Error;

const DATE_FORMAT: &str = "%d/%m/%Y";
const DATETIME_FORMATS: [&str; 2] = ["%d/%m/%Y %H:%M:%S", "%d/%m/%Y %H:%M"];

/// 必需列 + 可选列的下标
#[derive(Debug, Clone)]
pub struct ColumnMap {
    payer_document: usize,
    reference_number: usize,
    last_occurrence: usize,
    collection_agent: usize,
    invoice_value: usize,
    freight_date: usize,
    collection_forecast_date: usize,
    performance_finalization_date: usize,
    collection_date: usize,
    last_treatment_date: usize,
    last_occurrence_date: usize,
    delivery_forecast_date: usize,
    checklist_date: Option<usize>,
    minuta_number: Option<usize>,
}

/// 校验输入表结构，一次性列出所有缺失的必需列
pub fn validate_schema(table: &RawTable) -> Result<ColumnMap, PipelineError> {
    let missing: Vec<String> = columns::REQUIRED
        .iter()
        .filter(|c| table.column_index(c).is_none())
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(PipelineError::MissingColumns(missing));
    }

    // 上面已保证必需列存在
    let idx = |name: &str| table.column_index(name).unwrap_or_default();
    Ok(ColumnMap {
        payer_document: idx(columns::PAYER_DOCUMENT),
        reference_number: idx(columns::REFERENCE_NUMBER),
        last_occurrence: idx(columns::LAST_OCCURRENCE),
        collection_agent: idx(columns::COLLECTION_AGENT),
        invoice_value: idx(columns::INVOICE_VALUE),
        freight_date: idx(columns::FREIGHT_DATE),
        collection_forecast_date: idx(columns::COLLECTION_FORECAST_DATE),
        performance_finalization_date: idx(columns::PERFORMANCE_FINALIZATION_DATE),
        collection_date: idx(columns::COLLECTION_DATE),
        last_treatment_date: idx(columns::LAST_TREATMENT_DATE),
        last_occurrence_date: idx(columns::LAST_OCCURRENCE_DATE),
        delivery_forecast_date: idx(columns::DELIVERY_FORECAST_DATE),
        checklist_date: table.column_index(columns::CHECKLIST_DATE),
        minuta_number: table.column_index(columns::MINUTA_NUMBER),
    })
}

/// 日期文本无法解析
#[derive(Debug, Error)]
pub enum DateParseError {
    #[error(transparent)]
    Format(#[from] chrono::ParseError),
    #[error("year must have exactly 4 digits")]
    YearDigits,
}

/// 年份必须恰好 4 位数字 (chrono 的 %Y 也接受 "24")
fn has_four_digit_year(text: &str) -> bool {
    let date_part = text.split_whitespace().next().unwrap_or_default();
    match date_part.rsplit('/').next() {
        Some(year) => year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

/// 解析 DD/MM/YYYY (可带时间，时间部分丢弃)；空值返回 Ok(None)
pub fn parse_date(text: &str) -> Result<Option<NaiveDate>, DateParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    let date = match NaiveDate::parse_from_str(text, DATE_FORMAT) {
        Ok(date) => date,
        Err(date_err) => DATETIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
            .map(|dt| dt.date())
            .ok_or(date_err)?,
    };
    if !has_four_digit_year(text) {
        return Err(DateParseError::YearDigits);
    }
    Ok(Some(date))
}

/// 规范化后只允许 [+-]数字[.数字]，拒绝科学计数法等
fn is_plain_decimal(text: &str) -> bool {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    let (int_part, frac) = match unsigned.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (unsigned, None),
    };
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    digits(int_part) && frac.map_or(true, digits)
}

/// 解析发票金额文本；空值返回 Ok(None)
///
/// 去掉 R$ / $ / 空白后：
/// - 同时有 '.' 和 ','：最后出现的是小数点 ("1.234,56" / "1,234.56")
/// - 只有一个 ',' 且其后恰好两位：小数逗号 ("10,50")
/// - 其余 ',' 以及多个 '.' 视为千分位
/// - 单个 '.' 一律是小数点："1.234" 得 1.234 而不是 1234 (报表金额为 "$1,250.00" 格式)
/// - 规范化结果不是纯十进制数 (如 "1e5") → 错误
pub fn parse_currency(text: &str) -> Result<Option<BigDecimal>, ParseBigDecimalError> {
    let cleaned: String = text
        .trim()
        .replace("R$", "")
        .replace('$', "")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return Ok(None);
    }

    let normalized = match (cleaned.rfind('.'), cleaned.rfind(',')) {
        (Some(dot), Some(comma)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (None, Some(comma)) => {
            let single = cleaned.matches(',').count() == 1;
            if single && cleaned.len() - comma - 1 == 2 {
                cleaned.replace(',', ".")
            } else {
                cleaned.replace(',', "")
            }
        }
        (Some(_), None) if cleaned.matches('.').count() > 1 => cleaned.replace('.', ""),
        _ => cleaned,
    };

    if !is_plain_decimal(&normalized) {
        return Err(ParseBigDecimalError::Other(format!(
            "not a plain decimal: {}",
            normalized
        )));
    }
    BigDecimal::from_str(&normalized).map(Some)
}

/// 运单号规范化："12345.0" / "12,345" → "12345"
pub fn normalize_minuta(text: &str) -> Option<String> {
    let text = text.trim().replace(',', "");
    if text.is_empty() {
        return None;
    }
    match text.split_once('.') {
        Some((int_part, frac)) if !int_part.is_empty() && frac.chars().all(|c| c == '0') => {
            Some(int_part.to_string())
        }
        _ => Some(text),
    }
}

/// 数据集加工：日期解析、金额解析、四项分类
pub struct DatasetEnricher<'a> {
    classifier: RowClassifier<'a>,
    date_mode: DateMode,
}

impl<'a> DatasetEnricher<'a> {
    pub fn new(rules: &'a BusinessRules, date_mode: DateMode) -> Self {
        Self {
            classifier: RowClassifier::new(rules),
            date_mode,
        }
    }

    /// 加工整张表；原始表不被修改
    pub fn enrich(
        &self,
        table: &RawTable,
        aging_reference: AgingReference,
        now: NaiveDateTime,
    ) -> Result<EnrichedDataset, PipelineError> {
        let cols = validate_schema(table)?;
        let mut stats = EnrichStats {
            rows: table.len(),
            ..Default::default()
        };
        let mut records = Vec::with_capacity(table.len());

        for (row_idx, row) in table.rows.iter().enumerate() {
            let cell = |idx: usize| row.get(idx).map(String::as_str).unwrap_or("");
            let mut date = |idx: usize, column: &str| -> Result<Option<NaiveDate>, PipelineError> {
                let text = cell(idx);
                match parse_date(text) {
                    Ok(d) => Ok(d),
                    Err(_) if self.date_mode == DateMode::Strict => {
                        Err(PipelineError::MalformedDate {
                            row: row_idx + 1,
                            column: column.to_string(),
                            value: text.to_string(),
                        })
                    }
                    Err(e) => {
                        tracing::debug!(
                            "第 {} 行 '{}' 日期无法解析 '{}': {}, 置为空",
                            row_idx + 1, column, text, e
                        );
                        stats.malformed_dates += 1;
                        Ok(None)
                    }
                }
            };

            let freight_date = date(cols.freight_date, columns::FREIGHT_DATE)?;
            let collection_forecast_date =
                date(cols.collection_forecast_date, columns::COLLECTION_FORECAST_DATE)?;
            let performance_finalization_date = date(
                cols.performance_finalization_date,
                columns::PERFORMANCE_FINALIZATION_DATE,
            )?;
            let collection_date = date(cols.collection_date, columns::COLLECTION_DATE)?;
            let last_treatment_date = date(cols.last_treatment_date, columns::LAST_TREATMENT_DATE)?;
            let last_occurrence_date =
                date(cols.last_occurrence_date, columns::LAST_OCCURRENCE_DATE)?;
            let delivery_forecast_date =
                date(cols.delivery_forecast_date, columns::DELIVERY_FORECAST_DATE)?;
            let checklist_date = match cols.checklist_date {
                Some(idx) => date(idx, columns::CHECKLIST_DATE)?,
                None => None,
            };

            let raw_value = cell(cols.invoice_value);
            let (invoice_value, invoice_value_malformed) = match parse_currency(raw_value) {
                Ok(v) => (v, false),
                Err(e) => {
                    tracing::debug!(
                        "第 {} 行发票金额无法解析 '{}': {}",
                        row_idx + 1, raw_value, e
                    );
                    stats.malformed_currency += 1;
                    (None, true)
                }
            };

            let record = ShipmentRecord {
                freight_date,
                collection_date,
                last_occurrence_date,
                checklist_date,
                last_treatment_date,
                performance_finalization_date,
                collection_forecast_date,
                delivery_forecast_date,
                payer_document: cell(cols.payer_document).trim().to_string(),
                reference_number: cell(cols.reference_number).to_string(),
                last_occurrence: cell(cols.last_occurrence).trim().to_string(),
                collection_agent: cell(cols.collection_agent).trim().to_string(),
                minuta_number: cols.minuta_number.and_then(|idx| normalize_minuta(cell(idx))),
                invoice_value,
                invoice_value_malformed,
            };

            let (client, aging_bucket, regional_group, degradation_status) =
                self.classifier
                    .classify(&record, aging_reference.pick(&record), now);

            if regional_group.is_none() {
                stats.unset_regional += 1;
            }
            if degradation_status == DegradationStatus::Unknown {
                stats.unknown_degradation += 1;
            }

            records.push(EnrichedShipment {
                record,
                client,
                aging_bucket,
                regional_group,
                degradation_status,
            });
        }

        tracing::info!(
            "数据加工完成: {} 行, 日期无法解析 {} 个, 金额无法解析 {} 个, 未知状态 {} 行, 无区域 {} 行",
            stats.rows,
            stats.malformed_dates,
            stats.malformed_currency,
            stats.unknown_degradation,
            stats.unset_regional
        );

        Ok(EnrichedDataset::new(records, stats, aging_reference, now))
    }
}
