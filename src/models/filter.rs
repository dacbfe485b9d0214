use super::labels::{AgingBucket, DegradationStatus, RegionalGroup};
use crate::error::PipelineError;
use serde::{Deserialize, Serialize};

/// 月份名称 (下标 + 1 即月份数字)，与运行环境的 locale 无关
pub const MONTH_NAMES: [&str; 12] = [
    "Janeiro", "Fevereiro", "Março", "Abril", "Maio", "Junho",
    "Julho", "Agosto", "Setembro", "Outubro", "Novembro", "Dezembro",
];

/// 表示“不限”的下拉选项
const ALL_SENTINELS: [&str; 3] = ["Todos", "Todos os Clientes", "Todos os Meses"];

/// 月份名称 -> 1..=12
pub fn month_from_name(name: &str) -> Option<u32> {
    let wanted = name.trim().to_lowercase();
    MONTH_NAMES
        .iter()
        .position(|m| m.to_lowercase() == wanted)
        .map(|idx| idx as u32 + 1)
}

/// 1..=12 -> 月份名称
pub fn month_name(month: u32) -> Option<&'static str> {
    if (1..=12).contains(&month) {
        Some(MONTH_NAMES[month as usize - 1])
    } else {
        None
    }
}

/// 筛选条件，None 表示不限；各条件之间为 AND
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub client: Option<String>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub aging_bucket: Option<AgingBucket>,
    pub regional_group: Option<RegionalGroup>,
    pub degradation_status: Option<DegradationStatus>,
}

impl FilterSpec {
    pub fn is_unconstrained(&self) -> bool {
        *self == FilterSpec::default()
    }
}

/// 侧边栏原始选择值
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterSelection {
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    /// 月份名称 (Janeiro..Dezembro) 或数字
    #[serde(default)]
    pub month: Option<String>,
    #[serde(default)]
    pub aging: Option<String>,
    #[serde(default)]
    pub regional: Option<String>,
    #[serde(default)]
    pub degradation: Option<String>,
}

/// 空串或“不限”选项视为未选择
fn active(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !ALL_SENTINELS.contains(v))
}

fn invalid(field: &'static str, value: &str) -> PipelineError {
    PipelineError::InvalidFilter {
        field,
        value: value.to_string(),
    }
}

impl FilterSelection {
    /// 转换为筛选条件，未知的月份或标签返回 InvalidFilter
    pub fn into_spec(self) -> Result<FilterSpec, PipelineError> {
        let month = match active(&self.month) {
            None => None,
            Some(m) => {
                let number = match m.parse::<u32>() {
                    Ok(n) if (1..=12).contains(&n) => Some(n),
                    Ok(_) => None,
                    Err(_) => month_from_name(m),
                };
                Some(number.ok_or_else(|| invalid("month", m))?)
            }
        };

        let aging_bucket = match active(&self.aging) {
            None => None,
            Some(a) => Some(AgingBucket::from_label(a).ok_or_else(|| invalid("aging", a))?),
        };

        let regional_group = match active(&self.regional) {
            None => None,
            Some(r) => Some(RegionalGroup::from_label(r).ok_or_else(|| invalid("regional", r))?),
        };

        let degradation_status = match active(&self.degradation) {
            None => None,
            Some(d) => Some(
                DegradationStatus::from_label(d).ok_or_else(|| invalid("degradation", d))?,
            ),
        };

        Ok(FilterSpec {
            client: active(&self.client).map(str::to_string),
            year: self.year,
            month,
            aging_bucket,
            regional_group,
            degradation_status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_mapping() {
        assert_eq!(month_from_name("Janeiro"), Some(1));
        assert_eq!(month_from_name("março"), Some(3));
        assert_eq!(month_from_name("DEZEMBRO"), Some(12));
        assert_eq!(month_from_name("January"), None);
        assert_eq!(month_name(3), Some("Março"));
        assert_eq!(month_name(13), None);
    }

    #[test]
    fn test_selection_sentinels_are_unconstrained() {
        let selection = FilterSelection {
            client: Some("Todos os Clientes".to_string()),
            year: None,
            month: Some("Todos os Meses".to_string()),
            aging: Some("Todos".to_string()),
            regional: Some("".to_string()),
            degradation: Some("Todos".to_string()),
        };
        assert!(selection.into_spec().unwrap().is_unconstrained());
    }

    #[test]
    fn test_selection_into_spec() {
        let selection = FilterSelection {
            client: Some("ACME".to_string()),
            year: Some(2023),
            month: Some("Fevereiro".to_string()),
            aging: Some("3 a 5 dias".to_string()),
            regional: Some("Regional RJO".to_string()),
            degradation: Some("Aguardando Check List".to_string()),
        };
        let spec = selection.into_spec().unwrap();
        assert_eq!(spec.client.as_deref(), Some("ACME"));
        assert_eq!(spec.year, Some(2023));
        assert_eq!(spec.month, Some(2));
        assert_eq!(spec.aging_bucket, Some(AgingBucket::Days3To5));
        assert_eq!(spec.regional_group, Some(RegionalGroup::Rjo));
        assert_eq!(spec.degradation_status, Some(DegradationStatus::AwaitingChecklist));

        // 数字月份
        let spec = FilterSelection {
            month: Some("11".to_string()),
            ..Default::default()
        }
        .into_spec()
        .unwrap();
        assert_eq!(spec.month, Some(11));
    }

    #[test]
    fn test_selection_rejects_unknown_values() {
        let err = FilterSelection {
            month: Some("Smarch".to_string()),
            ..Default::default()
        }
        .into_spec()
        .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidFilter { field: "month", .. }));

        let err = FilterSelection {
            month: Some("13".to_string()),
            ..Default::default()
        }
        .into_spec()
        .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidFilter { field: "month", .. }));

        let err = FilterSelection {
            degradation: Some("Perdido".to_string()),
            ..Default::default()
        }
        .into_spec()
        .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidFilter { field: "degradation", .. }));
    }
}
