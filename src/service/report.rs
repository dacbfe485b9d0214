use crate::models::{
    AgentRow, AgingBucket, AgingCount, DegradationStatus, EnrichedShipment, FailureOverview,
    FilterOptions, OpenOverview, RegionalGroup, StatusCount, StatusPanel, ViewSummary,
    MONTH_NAMES,
};
use bigdecimal::{BigDecimal, Zero};
use chrono::{Datelike, NaiveDate};
use indexmap::{IndexMap, IndexSet};
use std::collections::BTreeSet;

/// 视图汇总：行数、发票金额合计、金额无法解析的行数
pub fn summarize(view: &[&EnrichedShipment]) -> ViewSummary {
    let mut total = BigDecimal::zero();
    let mut malformed = 0usize;
    for r in view {
        if let Some(value) = &r.record.invoice_value {
            total += value;
        }
        if r.record.invoice_value_malformed {
            malformed += 1;
        }
    }
    ViewSummary {
        count: view.len(),
        total_invoice_value: total,
        malformed_invoice_count: malformed,
    }
}

/// Aging 分布：按数量降序，数量相同按区间顺序
pub fn aging_distribution(view: &[&EnrichedShipment]) -> Vec<AgingCount> {
    let mut counts: IndexMap<AgingBucket, usize> = IndexMap::new();
    for r in view {
        *counts.entry(r.aging_bucket).or_insert(0) += 1;
    }
    let mut result: Vec<AgingCount> = counts
        .into_iter()
        .map(|(aging, count)| AgingCount { aging, count })
        .collect();
    result.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.aging.cmp(&b.aging)));
    result
}

fn by_status<'a>(view: &[&'a EnrichedShipment], status: DegradationStatus) -> Vec<&'a EnrichedShipment> {
    view.iter()
        .copied()
        .filter(|r| r.degradation_status == status)
        .collect()
}

/// 单个状态的面板
pub fn status_panel(view: &[&EnrichedShipment], status: DegradationStatus) -> StatusPanel {
    let subset = by_status(view, status);
    StatusPanel {
        status,
        summary: summarize(&subset),
        aging: aging_distribution(&subset),
    }
}

/// "Em Aberto"
pub fn open_overview(view: &[&EnrichedShipment]) -> OpenOverview {
    OpenOverview {
        scheduling: status_panel(view, DegradationStatus::OpenScheduling),
        collection: status_panel(view, DegradationStatus::OpenCollection),
        return_: status_panel(view, DegradationStatus::OpenReturn),
    }
}

/// "Insucesso"
pub fn failure_overview(view: &[&EnrichedShipment]) -> FailureOverview {
    FailureOverview {
        scheduling: status_panel(view, DegradationStatus::SchedulingFailure),
        collection: status_panel(view, DegradationStatus::CollectionFailure),
        return_: status_panel(view, DegradationStatus::ReturnFailure),
    }
}

/// "Relatório"：每个状态的数量，按固定顺序 (含 Desconhecido)
pub fn status_report(view: &[&EnrichedShipment]) -> Vec<StatusCount> {
    DegradationStatus::PRIORITY
        .iter()
        .copied()
        .chain(std::iter::once(DegradationStatus::Unknown))
        .map(|status| StatusCount {
            status,
            count: view.iter().filter(|r| r.degradation_status == status).count(),
        })
        .collect()
}

/// "Por Agente"：去重后的 (代理, 运单号, Aging)，保持首次出现顺序
pub fn agent_table(view: &[&EnrichedShipment]) -> Vec<AgentRow> {
    let rows: IndexSet<AgentRow> = view
        .iter()
        .map(|r| AgentRow {
            collection_agent: r.record.collection_agent.clone(),
            minuta_number: r.record.minuta_number.clone(),
            aging: r.aging_bucket,
        })
        .collect();
    rows.into_iter().collect()
}

/// "Data Coleta"：去重后的收货日期，保持首次出现顺序，空值不列出
pub fn collection_dates(view: &[&EnrichedShipment]) -> Vec<NaiveDate> {
    let dates: IndexSet<NaiveDate> = view
        .iter()
        .filter_map(|r| r.record.collection_date)
        .collect();
    dates.into_iter().collect()
}

/// 侧边栏下拉选项
pub fn filter_options(records: &[EnrichedShipment]) -> FilterOptions {
    let mut clients: IndexSet<String> = IndexSet::new();
    let mut aging: IndexSet<AgingBucket> = IndexSet::new();
    let mut regional: IndexSet<RegionalGroup> = IndexSet::new();
    let mut years: BTreeSet<i32> = BTreeSet::new();

    for r in records {
        if !clients.contains(&r.client) {
            clients.insert(r.client.clone());
        }
        aging.insert(r.aging_bucket);
        if let Some(group) = r.regional_group {
            regional.insert(group);
        }
        if let Some(date) = r.record.freight_date {
            years.insert(date.year());
        }
    }

    FilterOptions {
        clients: clients.into_iter().collect(),
        years: years.into_iter().collect(),
        months: MONTH_NAMES.iter().map(|m| m.to_string()).collect(),
        aging: aging.into_iter().collect(),
        regional: regional.into_iter().collect(),
        degradation: DegradationStatus::PRIORITY.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ShipmentRecord;
    use std::str::FromStr;

    fn shipment(
        client: &str,
        status: DegradationStatus,
        aging: AgingBucket,
        value: Option<&str>,
        malformed: bool,
    ) -> EnrichedShipment {
        EnrichedShipment {
            record: ShipmentRecord {
                freight_date: NaiveDate::from_ymd_opt(2024, 5, 2),
                collection_agent: "AG-1".to_string(),
                invoice_value: value.map(|v| BigDecimal::from_str(v).unwrap()),
                invoice_value_malformed: malformed,
                ..Default::default()
            },
            client: client.to_string(),
            aging_bucket: aging,
            regional_group: None,
            degradation_status: status,
        }
    }

    fn sample() -> Vec<EnrichedShipment> {
        vec![
            shipment("ACME", DegradationStatus::OpenScheduling, AgingBucket::Days3To5, Some("100.25"), false),
            shipment("ACME", DegradationStatus::OpenScheduling, AgingBucket::Over60, Some("50"), false),
            shipment("OUTROS", DegradationStatus::OpenScheduling, AgingBucket::Over60, None, true),
            shipment("OUTROS", DegradationStatus::CollectionFailure, AgingBucket::Within24h, Some("10"), false),
        ]
    }

    #[test]
    fn test_summarize() {
        let data = sample();
        let view: Vec<&EnrichedShipment> = data.iter().collect();
        let summary = summarize(&view);
        assert_eq!(summary.count, 4);
        assert_eq!(summary.total_invoice_value, BigDecimal::from_str("160.25").unwrap());
        assert_eq!(summary.malformed_invoice_count, 1);

        let empty = summarize(&[]);
        assert_eq!(empty.count, 0);
        assert_eq!(empty.total_invoice_value, BigDecimal::zero());
    }

    #[test]
    fn test_aging_distribution_order() {
        let data = sample();
        let view: Vec<&EnrichedShipment> = data.iter().collect();
        let dist = aging_distribution(&view);
        assert_eq!(dist[0], AgingCount { aging: AgingBucket::Over60, count: 2 });
        // 数量相同按区间顺序
        assert_eq!(dist[1].aging, AgingBucket::Within24h);
        assert_eq!(dist[2].aging, AgingBucket::Days3To5);
    }

    #[test]
    fn test_overviews() {
        let data = sample();
        let view: Vec<&EnrichedShipment> = data.iter().collect();

        let open = open_overview(&view);
        assert_eq!(open.scheduling.summary.count, 3);
        assert_eq!(open.collection.summary.count, 0);
        assert!(open.collection.aging.is_empty());

        let failure = failure_overview(&view);
        assert_eq!(failure.collection.summary.count, 1);
        assert_eq!(failure.scheduling.summary.count, 0);
    }

    #[test]
    fn test_status_report_covers_every_status() {
        let data = sample();
        let view: Vec<&EnrichedShipment> = data.iter().collect();
        let report = status_report(&view);
        assert_eq!(report.len(), 13);
        assert_eq!(report[0], StatusCount { status: DegradationStatus::OpenScheduling, count: 3 });
        assert_eq!(report.iter().map(|s| s.count).sum::<usize>(), 4);
        assert_eq!(report[12].status, DegradationStatus::Unknown);
    }

    #[test]
    fn test_agent_table_dedup() {
        let data = sample();
        let view: Vec<&EnrichedShipment> = data.iter().collect();
        let table = agent_table(&view);
        assert_eq!(table.len(), 3);
        assert_eq!(table[0].aging, AgingBucket::Days3To5);
    }

    #[test]
    fn test_collection_dates_dedup() {
        let mut data = sample();
        data[0].record.collection_date = NaiveDate::from_ymd_opt(2024, 5, 10);
        data[1].record.collection_date = NaiveDate::from_ymd_opt(2024, 5, 3);
        data[2].record.collection_date = NaiveDate::from_ymd_opt(2024, 5, 10);
        let view: Vec<&EnrichedShipment> = data.iter().collect();

        assert_eq!(
            collection_dates(&view),
            vec![
                NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
                NaiveDate::from_ymd_opt(2024, 5, 3).unwrap(),
            ]
        );
        assert!(collection_dates(&[]).is_empty());
    }

    #[test]
    fn test_overview_serializes_return_key() {
        let data = sample();
        let view: Vec<&EnrichedShipment> = data.iter().collect();
        let json = serde_json::to_value(open_overview(&view)).unwrap();
        assert!(json.get("return").is_some());
        assert!(json.get("return_").is_none());
    }

    #[test]
    fn test_filter_options() {
        let data = sample();
        let options = filter_options(&data);
        assert_eq!(options.clients, vec!["ACME".to_string(), "OUTROS".to_string()]);
        assert_eq!(options.years, vec![2024]);
        assert_eq!(options.months.len(), 12);
        assert_eq!(options.aging[0], AgingBucket::Days3To5);
        assert!(options.regional.is_empty());
        assert_eq!(options.degradation.len(), 12);
    }
}
