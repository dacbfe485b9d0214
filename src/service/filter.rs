use crate::models::{EnrichedShipment, FilterSpec};
use chrono::Datelike;

/// 判断单条记录是否满足全部筛选条件
///
/// 年/月按 Data do frete 判断，日期缺失的记录不满足任何年/月条件；
/// 区域未设置的记录不满足任何区域条件。
pub fn matches(record: &EnrichedShipment, spec: &FilterSpec) -> bool {
    if let Some(client) = &spec.client {
        if record.client != *client {
            return false;
        }
    }

    if spec.year.is_some() || spec.month.is_some() {
        let Some(freight_date) = record.record.freight_date else {
            return false;
        };
        if spec.year.is_some_and(|y| freight_date.year() != y) {
            return false;
        }
        if spec.month.is_some_and(|m| freight_date.month() != m) {
            return false;
        }
    }

    if spec.aging_bucket.is_some_and(|a| record.aging_bucket != a) {
        return false;
    }

    if let Some(regional) = spec.regional_group {
        if record.regional_group != Some(regional) {
            return false;
        }
    }

    if spec
        .degradation_status
        .is_some_and(|d| record.degradation_status != d)
    {
        return false;
    }

    true
}

/// 按条件筛选，返回新的视图，不修改输入
///
/// 输入可以是数据集的全部记录，也可以是已筛选过的视图。
pub fn apply<'a, I>(records: I, spec: &FilterSpec) -> Vec<&'a EnrichedShipment>
where
    I: IntoIterator<Item = &'a EnrichedShipment>,
{
    records.into_iter().filter(|r| matches(r, spec)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AgingBucket, DegradationStatus, RegionalGroup, ShipmentRecord};
    use chrono::NaiveDate;

    fn shipment(client: &str, freight: Option<(i32, u32, u32)>, regional: Option<RegionalGroup>) -> EnrichedShipment {
        EnrichedShipment {
            record: ShipmentRecord {
                freight_date: freight.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
                ..Default::default()
            },
            client: client.to_string(),
            aging_bucket: AgingBucket::Days3To5,
            regional_group: regional,
            degradation_status: DegradationStatus::OpenCollection,
        }
    }

    fn sample() -> Vec<EnrichedShipment> {
        vec![
            shipment("ACME", Some((2023, 3, 1)), Some(RegionalGroup::Gru)),
            shipment("ACME", Some((2024, 3, 1)), None),
            shipment("OUTROS", Some((2023, 7, 9)), Some(RegionalGroup::Gru)),
            shipment("ACME", None, Some(RegionalGroup::Br)),
        ]
    }

    #[test]
    fn test_unconstrained_keeps_everything() {
        let data = sample();
        assert_eq!(apply(&data, &FilterSpec::default()).len(), 4);
    }

    #[test]
    fn test_filter_client_year_month() {
        let data = sample();
        let spec = FilterSpec {
            client: Some("ACME".to_string()),
            year: Some(2023),
            ..Default::default()
        };
        let view = apply(&data, &spec);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].record.freight_date, NaiveDate::from_ymd_opt(2023, 3, 1));

        // 月份：日期缺失的记录被排除
        let spec = FilterSpec { month: Some(3), ..Default::default() };
        assert_eq!(apply(&data, &spec).len(), 2);
    }

    #[test]
    fn test_filter_regional_excludes_unset() {
        let data = sample();
        let spec = FilterSpec {
            regional_group: Some(RegionalGroup::Gru),
            ..Default::default()
        };
        assert_eq!(apply(&data, &spec).len(), 2);
    }

    #[test]
    fn test_filter_labels() {
        let data = sample();
        let spec = FilterSpec {
            aging_bucket: Some(AgingBucket::Days3To5),
            degradation_status: Some(DegradationStatus::OpenCollection),
            ..Default::default()
        };
        assert_eq!(apply(&data, &spec).len(), 4);

        let spec = FilterSpec {
            degradation_status: Some(DegradationStatus::Returned),
            ..Default::default()
        };
        assert!(apply(&data, &spec).is_empty());
    }

    #[test]
    fn test_filter_idempotent_and_commutative() {
        let data = sample();
        let client = FilterSpec { client: Some("ACME".to_string()), ..Default::default() };
        let year = FilterSpec { year: Some(2023), ..Default::default() };
        let both = FilterSpec { client: Some("ACME".to_string()), year: Some(2023), ..Default::default() };

        let once = apply(&data, &both);
        let twice = apply(once.iter().copied(), &both);
        assert_eq!(once, twice);

        let a = apply(apply(&data, &client), &year);
        let b = apply(apply(&data, &year), &client);
        assert_eq!(a, b);
        assert_eq!(a, once);
    }

    #[test]
    fn test_filter_does_not_mutate_input() {
        let data = sample();
        let before = data.clone();
        let _ = apply(&data, &FilterSpec { client: Some("X".to_string()), ..Default::default() });
        assert_eq!(data, before);
    }
}
