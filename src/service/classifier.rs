use crate::config::{BusinessRules, ClientRule};
use crate::models::{AgingBucket, DegradationStatus, RegionalGroup, ShipmentRecord};
use chrono::{NaiveDate, NaiveDateTime};

pub const FALLBACK_CLIENT: &str = "OUTROS";
const MULTI_B2C_PREFIX: &str = "MULTI B2C";
const MULTI_B2B: &str = "MULTI B2B";
const B2B_MARKER: &str = "B2B";

/// 行分类器：只依赖记录本身和业务规则，不读其他行
pub struct RowClassifier<'a> {
    rules: &'a BusinessRules,
}

impl<'a> RowClassifier<'a> {
    pub fn new(rules: &'a BusinessRules) -> Self {
        Self { rules }
    }

    /// 客户识别
    ///
    /// 1. 在客户表中找 root_id 为证件号前缀的项，最长前缀优先，等长取配置中靠前的
    /// 2. 命中名称以 "MULTI B2C" 开头且参考号含 "B2B" → "MULTI B2B"
    /// 3. 未命中 → "OUTROS"
    pub fn resolve_client(&self, payer_document: &str, reference_number: &str) -> String {
        let document = payer_document.trim();
        if document.is_empty() {
            return FALLBACK_CLIENT.to_string();
        }

        let mut best: Option<&ClientRule> = None;
        for rule in &self.rules.clients {
            if rule.root_id.is_empty() || !document.starts_with(rule.root_id.as_str()) {
                continue;
            }
            let is_better = match best {
                None => true,
                Some(current) => rule.root_id.len() > current.root_id.len(),
            };
            if is_better {
                best = Some(rule);
            }
        }

        match best {
            Some(rule) if rule.name.starts_with(MULTI_B2C_PREFIX)
                && reference_number.contains(B2B_MARKER) =>
            {
                MULTI_B2B.to_string()
            }
            Some(rule) => rule.name.clone(),
            None => FALLBACK_CLIENT.to_string(),
        }
    }

    /// 区域识别：GRU → RJO → BHZ → BR，未命中返回 None
    pub fn resolve_regional(&self, collection_agent: &str) -> Option<RegionalGroup> {
        let agent = collection_agent.trim();
        self.rules
            .regional
            .ordered()
            .into_iter()
            .find(|(_, agents)| agents.contains(agent))
            .map(|(group, _)| group)
    }

    /// 运营状态识别：按固定优先级，未命中为 Desconhecido
    pub fn resolve_degradation(&self, last_occurrence: &str) -> DegradationStatus {
        let code = last_occurrence.trim();
        self.rules
            .degradation
            .ordered()
            .into_iter()
            .find(|(_, codes)| codes.contains(code))
            .map(|(status, _)| status)
            .unwrap_or(DegradationStatus::Unknown)
    }

    /// 一次计算记录的全部派生字段
    pub fn classify(
        &self,
        record: &ShipmentRecord,
        aging_reference: Option<NaiveDate>,
        now: NaiveDateTime,
    ) -> (String, AgingBucket, Option<RegionalGroup>, DegradationStatus) {
        (
            self.resolve_client(&record.payer_document, &record.reference_number),
            classify_aging(aging_reference, now),
            self.resolve_regional(&record.collection_agent),
            self.resolve_degradation(&record.last_occurrence),
        )
    }
}

/// 距参考日期的整天数 (向下取整)
///
/// 参考日期视为当天 0 点，因此 floor(now - reference) 等于两者日期之差。
pub fn age_days(reference: NaiveDate, now: NaiveDateTime) -> i64 {
    (now.date() - reference).num_days()
}

/// Aging 分桶
///
/// # 规则
/// - 参考日期缺失 → Unclassified
/// - 天数 < 0 (参考日期在未来) → FutureDated
/// - 0 → 24h, [1,2], [3,5], [6,10], [11,15], [16,20], [21,24], [25,30], [31,60], > 60
pub fn classify_aging(reference: Option<NaiveDate>, now: NaiveDateTime) -> AgingBucket {
    let Some(reference) = reference else {
        return AgingBucket::Unclassified;
    };
    bucket_for_days(age_days(reference, now))
}

pub fn bucket_for_days(days: i64) -> AgingBucket {
    match days {
        i64::MIN..=-1 => AgingBucket::FutureDated,
        0 => AgingBucket::Within24h,
        1..=2 => AgingBucket::Days1To2,
        3..=5 => AgingBucket::Days3To5,
        6..=10 => AgingBucket::Days6To10,
        11..=15 => AgingBucket::Days11To15,
        16..=20 => AgingBucket::Days16To20,
        21..=24 => AgingBucket::Days21To24,
        25..=30 => AgingBucket::Days25To30,
        31..=60 => AgingBucket::Days31To60,
        _ => AgingBucket::Over60,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DegradationRules, RegionalRules};

    fn rules() -> BusinessRules {
        let mut regional = RegionalRules::default();
        regional.gru.insert("AG-GRU".to_string());
        regional.rjo.insert("AG-RJO".to_string());
        regional.br.insert("AG-GRU".to_string()); // GRU 优先

        let mut degradation = DegradationRules::default();
        degradation.open_scheduling.insert("AGENDAR".to_string());
        degradation.awaiting_checklist.insert("CHECKLIST_PENDING".to_string());
        degradation.collection_failure.insert("COLETA_FALHOU".to_string());
        degradation.pending.insert("AGENDAR".to_string()); // 低优先级重复

        BusinessRules {
            clients: vec![
                ClientRule { root_id: "12345678".to_string(), name: "ACME".to_string() },
                ClientRule { root_id: "1234".to_string(), name: "ACME HOLDING".to_string() },
                ClientRule { root_id: "87654321".to_string(), name: "MULTI B2C SUL".to_string() },
            ],
            regional,
            degradation,
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 30, 0).unwrap()
    }

    #[test]
    fn test_resolve_client_prefix() {
        let rules = rules();
        let classifier = RowClassifier::new(&rules);

        assert_eq!(classifier.resolve_client("12345678000199", ""), "ACME");
        // 最长前缀优先
        assert_eq!(classifier.resolve_client("12349999000199", ""), "ACME HOLDING");
        // 空证件号 / 未命中
        assert_eq!(classifier.resolve_client("", "B2B"), FALLBACK_CLIENT);
        assert_eq!(classifier.resolve_client("99999999000100", ""), FALLBACK_CLIENT);
    }

    #[test]
    fn test_resolve_client_b2b_override() {
        let rules = rules();
        let classifier = RowClassifier::new(&rules);

        assert_eq!(classifier.resolve_client("87654321000155", "PED-B2B-001"), "MULTI B2B");
        assert_eq!(classifier.resolve_client("87654321000155", "PED-001"), "MULTI B2C SUL");
        // 非 MULTI B2C 客户不受影响
        assert_eq!(classifier.resolve_client("12345678000199", "B2B"), "ACME");
        // OUTROS 不受影响
        assert_eq!(classifier.resolve_client("55555555000155", "B2B"), FALLBACK_CLIENT);
    }

    #[test]
    fn test_resolve_regional() {
        let rules = rules();
        let classifier = RowClassifier::new(&rules);

        assert_eq!(classifier.resolve_regional("AG-GRU"), Some(RegionalGroup::Gru));
        assert_eq!(classifier.resolve_regional("AG-RJO"), Some(RegionalGroup::Rjo));
        assert_eq!(classifier.resolve_regional("AG-XXX"), None);
        assert_eq!(classifier.resolve_regional(""), None);
    }

    #[test]
    fn test_resolve_degradation() {
        let rules = rules();
        let classifier = RowClassifier::new(&rules);

        assert_eq!(
            classifier.resolve_degradation("CHECKLIST_PENDING"),
            DegradationStatus::AwaitingChecklist
        );
        // 重复代码按优先级命中靠前的状态
        assert_eq!(classifier.resolve_degradation("AGENDAR"), DegradationStatus::OpenScheduling);
        assert_eq!(
            classifier.resolve_degradation("COLETA_FALHOU"),
            DegradationStatus::CollectionFailure
        );
        assert_eq!(classifier.resolve_degradation("???"), DegradationStatus::Unknown);
    }

    #[test]
    fn test_bucket_boundaries() {
        let cases = [
            (0, AgingBucket::Within24h),
            (1, AgingBucket::Days1To2),
            (2, AgingBucket::Days1To2),
            (3, AgingBucket::Days3To5),
            (5, AgingBucket::Days3To5),
            (6, AgingBucket::Days6To10),
            (10, AgingBucket::Days6To10),
            (11, AgingBucket::Days11To15),
            (15, AgingBucket::Days11To15),
            (16, AgingBucket::Days16To20),
            (20, AgingBucket::Days16To20),
            (21, AgingBucket::Days21To24),
            (24, AgingBucket::Days21To24),
            (25, AgingBucket::Days25To30),
            (30, AgingBucket::Days25To30),
            (31, AgingBucket::Days31To60),
            (60, AgingBucket::Days31To60),
            (61, AgingBucket::Over60),
            (4000, AgingBucket::Over60),
            (-1, AgingBucket::FutureDated),
        ];
        for (days, expected) in cases {
            assert_eq!(bucket_for_days(days), expected, "days = {}", days);
        }
    }

    #[test]
    fn test_classify_aging_uses_whole_days() {
        let reference = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();

        // 同一天任何时刻 → 24h
        assert_eq!(classify_aging(Some(reference), at(2024, 3, 10, 23)), AgingBucket::Within24h);
        // 跨月
        assert_eq!(classify_aging(Some(reference), at(2024, 4, 9, 0)), AgingBucket::Days25To30);
        // 参考日期在未来
        assert_eq!(classify_aging(Some(reference), at(2024, 3, 9, 12)), AgingBucket::FutureDated);
        // 参考日期缺失
        assert_eq!(classify_aging(None, at(2024, 3, 9, 12)), AgingBucket::Unclassified);
    }
}
