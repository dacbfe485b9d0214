use crate::error::PipelineError;
use crate::models::{columns, EnrichedShipment};
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use csv::Writer;
use std::io;

const HEADER: [&str; 19] = [
    columns::PAYER_DOCUMENT,
    columns::REFERENCE_NUMBER,
    columns::LAST_OCCURRENCE,
    columns::COLLECTION_AGENT,
    columns::MINUTA_NUMBER,
    columns::INVOICE_VALUE,
    columns::FREIGHT_DATE,
    columns::COLLECTION_FORECAST_DATE,
    columns::PERFORMANCE_FINALIZATION_DATE,
    columns::COLLECTION_DATE,
    columns::LAST_TREATMENT_DATE,
    columns::LAST_OCCURRENCE_DATE,
    columns::DELIVERY_FORECAST_DATE,
    columns::CHECKLIST_DATE,
    columns::CLIENT,
    columns::AGING,
    columns::REGIONAL,
    columns::DEGRADATION,
    "Valor NF Inválido",
];

/// 日期转回 DD/MM/YYYY
fn date_to_csv(val: &Option<NaiveDate>) -> String {
    val.map(|d| d.format("%d/%m/%Y").to_string()).unwrap_or_default()
}

/// 将 Option<BigDecimal> 转换为 CSV 字符串
fn option_to_csv(val: &Option<BigDecimal>) -> String {
    val.as_ref().map(|v| v.to_string()).unwrap_or_default()
}

/// 导出视图到 CSV：原始列 + 派生列
pub fn write_view_csv<W: io::Write>(
    view: &[&EnrichedShipment],
    output: W,
) -> Result<(), PipelineError> {
    let mut writer = Writer::from_writer(output);
    writer.write_record(HEADER)?;

    for row in view {
        let r = &row.record;
        writer.write_record(&[
            r.payer_document.clone(),
            r.reference_number.clone(),
            r.last_occurrence.clone(),
            r.collection_agent.clone(),
            r.minuta_number.clone().unwrap_or_default(),
            option_to_csv(&r.invoice_value),
            date_to_csv(&r.freight_date),
            date_to_csv(&r.collection_forecast_date),
            date_to_csv(&r.performance_finalization_date),
            date_to_csv(&r.collection_date),
            date_to_csv(&r.last_treatment_date),
            date_to_csv(&r.last_occurrence_date),
            date_to_csv(&r.delivery_forecast_date),
            date_to_csv(&r.checklist_date),
            row.client.clone(),
            row.aging_bucket.label().to_string(),
            row.regional_group.map(|g| g.label().to_string()).unwrap_or_default(),
            row.degradation_status.label().to_string(),
            if r.invoice_value_malformed { "1" } else { "" }.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
