use serde::{Deserialize, Serialize};
use std::fmt;

/// Aging 区间 (按天数分桶)
///
/// 前 10 个为固定区间；`FutureDated` 和 `Unclassified` 为显式的异常桶，
/// 分别对应参考日期在未来、参考日期缺失。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgingBucket {
    #[serde(rename = "24h")]
    Within24h,
    #[serde(rename = "1 a 2 dias")]
    Days1To2,
    #[serde(rename = "3 a 5 dias")]
    Days3To5,
    #[serde(rename = "6 a 10 dias")]
    Days6To10,
    #[serde(rename = "11 a 15 dias")]
    Days11To15,
    #[serde(rename = "16 a 20 dias")]
    Days16To20,
    #[serde(rename = "21 a 24 dias")]
    Days21To24,
    #[serde(rename = "25 a 30 dias")]
    Days25To30,
    #[serde(rename = "31 a 60 dias")]
    Days31To60,
    #[serde(rename = "> 60 dias")]
    Over60,
    #[serde(rename = "Data futura")]
    FutureDated,
    #[serde(rename = "Sem data")]
    Unclassified,
}

impl AgingBucket {
    pub const ALL: [AgingBucket; 12] = [
        AgingBucket::Within24h,
        AgingBucket::Days1To2,
        AgingBucket::Days3To5,
        AgingBucket::Days6To10,
        AgingBucket::Days11To15,
        AgingBucket::Days16To20,
        AgingBucket::Days21To24,
        AgingBucket::Days25To30,
        AgingBucket::Days31To60,
        AgingBucket::Over60,
        AgingBucket::FutureDated,
        AgingBucket::Unclassified,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AgingBucket::Within24h => "24h",
            AgingBucket::Days1To2 => "1 a 2 dias",
            AgingBucket::Days3To5 => "3 a 5 dias",
            AgingBucket::Days6To10 => "6 a 10 dias",
            AgingBucket::Days11To15 => "11 a 15 dias",
            AgingBucket::Days16To20 => "16 a 20 dias",
            AgingBucket::Days21To24 => "21 a 24 dias",
            AgingBucket::Days25To30 => "25 a 30 dias",
            AgingBucket::Days31To60 => "31 a 60 dias",
            AgingBucket::Over60 => "> 60 dias",
            AgingBucket::FutureDated => "Data futura",
            AgingBucket::Unclassified => "Sem data",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|b| b.label() == label)
    }
}

impl fmt::Display for AgingBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 区域分组 (按收货代理归类)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionalGroup {
    #[serde(rename = "Regional GRU")]
    Gru,
    #[serde(rename = "Regional RJO")]
    Rjo,
    #[serde(rename = "Regional BHZ")]
    Bhz,
    #[serde(rename = "Regional BR")]
    Br,
}

impl RegionalGroup {
    /// 判定顺序固定：GRU → RJO → BHZ → BR
    pub const ALL: [RegionalGroup; 4] = [
        RegionalGroup::Gru,
        RegionalGroup::Rjo,
        RegionalGroup::Bhz,
        RegionalGroup::Br,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RegionalGroup::Gru => "Regional GRU",
            RegionalGroup::Rjo => "Regional RJO",
            RegionalGroup::Bhz => "Regional BHZ",
            RegionalGroup::Br => "Regional BR",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|r| r.label() == label)
    }
}

impl fmt::Display for RegionalGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 运营状态 (Degradação)，由最后一次事件代码决定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DegradationStatus {
    #[serde(rename = "Agendamento em Aberto")]
    OpenScheduling,
    #[serde(rename = "Aguardando Check List")]
    AwaitingChecklist,
    #[serde(rename = "Cancelado/ Finalizado")]
    CancelledFinalized,
    #[serde(rename = "Coleta em Aberto")]
    OpenCollection,
    #[serde(rename = "Devolução em Aberto")]
    OpenReturn,
    #[serde(rename = "Devolvido")]
    Returned,
    #[serde(rename = "Entrega em Aberto")]
    OpenDelivery,
    #[serde(rename = "Insucesso de Agendamento")]
    SchedulingFailure,
    #[serde(rename = "Insucesso de Devolução")]
    ReturnFailure,
    #[serde(rename = "Outros")]
    Other,
    #[serde(rename = "Pendência")]
    Pending,
    #[serde(rename = "Insucesso de Coleta")]
    CollectionFailure,
    #[serde(rename = "Desconhecido")]
    Unknown,
}

impl DegradationStatus {
    /// 判定优先级顺序 (不含 Unknown)
    pub const PRIORITY: [DegradationStatus; 12] = [
        DegradationStatus::OpenScheduling,
        DegradationStatus::AwaitingChecklist,
        DegradationStatus::CancelledFinalized,
        DegradationStatus::OpenCollection,
        DegradationStatus::OpenReturn,
        DegradationStatus::Returned,
        DegradationStatus::OpenDelivery,
        DegradationStatus::SchedulingFailure,
        DegradationStatus::ReturnFailure,
        DegradationStatus::Other,
        DegradationStatus::Pending,
        DegradationStatus::CollectionFailure,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DegradationStatus::OpenScheduling => "Agendamento em Aberto",
            DegradationStatus::AwaitingChecklist => "Aguardando Check List",
            DegradationStatus::CancelledFinalized => "Cancelado/ Finalizado",
            DegradationStatus::OpenCollection => "Coleta em Aberto",
            DegradationStatus::OpenReturn => "Devolução em Aberto",
            DegradationStatus::Returned => "Devolvido",
            DegradationStatus::OpenDelivery => "Entrega em Aberto",
            DegradationStatus::SchedulingFailure => "Insucesso de Agendamento",
            DegradationStatus::ReturnFailure => "Insucesso de Devolução",
            DegradationStatus::Other => "Outros",
            DegradationStatus::Pending => "Pendência",
            DegradationStatus::CollectionFailure => "Insucesso de Coleta",
            DegradationStatus::Unknown => "Desconhecido",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::PRIORITY
            .iter()
            .copied()
            .chain(std::iter::once(DegradationStatus::Unknown))
            .find(|d| d.label() == label)
    }
}

impl fmt::Display for DegradationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_roundtrip_matches_serde() {
        for bucket in AgingBucket::ALL {
            let json = serde_json::to_string(&bucket).unwrap();
            assert_eq!(json, format!("\"{}\"", bucket.label()));
            assert_eq!(AgingBucket::from_label(bucket.label()), Some(bucket));
        }

        let json = serde_json::to_string(&DegradationStatus::Pending).unwrap();
        assert_eq!(json, "\"Pendência\"");
        assert_eq!(
            DegradationStatus::from_label("Desconhecido"),
            Some(DegradationStatus::Unknown)
        );
        assert_eq!(RegionalGroup::from_label("Regional XYZ"), None);
    }
}
