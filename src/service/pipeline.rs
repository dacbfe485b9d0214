use crate::config::{BusinessRules, PipelineConfig};
use crate::error::PipelineError;
use crate::models::{
    AgingReference, EnrichedDataset, EnrichedShipment, FailureOverview, FilterOptions,
    FilterSelection, OpenOverview, StatusCount, AgentRow, ViewSummary,
};
use crate::service::{enricher::DatasetEnricher, filter, report};
use crate::source::{write_view_csv, DatasetCache};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::sync::Arc;

/// 筛选后的视图
#[derive(Debug, Clone, Serialize)]
pub struct ViewResult {
    pub summary: ViewSummary,
    pub records: Vec<EnrichedShipment>,
}

/// 看板各页签所需的数据
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub summary: ViewSummary,
    pub open: OpenOverview,
    pub failure: FailureOverview,
    pub status: Vec<StatusCount>,
    pub agents: Vec<AgentRow>,
    pub collection_dates: Vec<NaiveDate>,
}

/// 看板服务：缓存取原始表 → 全量加工 → 筛选 → 汇总
///
/// 每次请求都重新加工整张表，加工结果只属于本次请求。
pub struct DashboardService {
    cache: Arc<DatasetCache>,
    rules: Arc<BusinessRules>,
    pipeline: PipelineConfig,
}

impl DashboardService {
    pub fn new(cache: Arc<DatasetCache>, rules: Arc<BusinessRules>, pipeline: PipelineConfig) -> Self {
        Self { cache, rules, pipeline }
    }

    /// 加载并加工数据集
    pub async fn load(&self, aging_reference: Option<AgingReference>) -> Result<EnrichedDataset, PipelineError> {
        let table = self.cache.get().await?;
        let enricher = DatasetEnricher::new(&self.rules, self.pipeline.date_mode);
        let reference = aging_reference.unwrap_or(self.pipeline.aging_reference);
        enricher.enrich(&table, reference, Local::now().naive_local())
    }

    pub async fn options(&self, aging_reference: Option<AgingReference>) -> Result<FilterOptions, PipelineError> {
        let dataset = self.load(aging_reference).await?;
        Ok(report::filter_options(dataset.records()))
    }

    pub async fn view(
        &self,
        selection: FilterSelection,
        aging_reference: Option<AgingReference>,
    ) -> Result<ViewResult, PipelineError> {
        let spec = selection.into_spec()?;
        let dataset = self.load(aging_reference).await?;
        let view = filter::apply(dataset.records(), &spec);

        tracing::info!("筛选条件 {:?}: {}/{} 行", spec, view.len(), dataset.len());
        if view.is_empty() {
            tracing::warn!("筛选结果为空: {:?}", spec);
        }

        Ok(ViewResult {
            summary: report::summarize(&view),
            records: view.into_iter().cloned().collect(),
        })
    }

    pub async fn report(
        &self,
        selection: FilterSelection,
        aging_reference: Option<AgingReference>,
    ) -> Result<DashboardReport, PipelineError> {
        let spec = selection.into_spec()?;
        let dataset = self.load(aging_reference).await?;
        let view = filter::apply(dataset.records(), &spec);

        Ok(DashboardReport {
            summary: report::summarize(&view),
            open: report::open_overview(&view),
            failure: report::failure_overview(&view),
            status: report::status_report(&view),
            agents: report::agent_table(&view),
            collection_dates: report::collection_dates(&view),
        })
    }

    /// 导出筛选后的视图为 CSV 字节
    pub async fn export(
        &self,
        selection: FilterSelection,
        aging_reference: Option<AgingReference>,
    ) -> Result<Vec<u8>, PipelineError> {
        let spec = selection.into_spec()?;
        let dataset = self.load(aging_reference).await?;
        let view = filter::apply(dataset.records(), &spec);

        let mut out = Vec::new();
        write_view_csv(&view, &mut out)?;
        tracing::info!("导出 {} 行 CSV, {} 字节", view.len(), out.len());
        Ok(out)
    }

    pub async fn invalidate(&self) {
        self.cache.invalidate().await;
    }
}
