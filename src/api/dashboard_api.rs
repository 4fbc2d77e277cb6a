// ==========================================
// 生产 OEE 驾驶舱 - 驾驶舱 API
// ==========================================
// 职责: 每次筛选变更执行一次完整重算，输出驾驶舱快照
// 架构: API 层 → 筛选层 (FilterEngine) → 指标引擎 (MetricEngine)
// 红线: 数据集只读；不保存"当前筛选"，筛选条件每次显式传入
// ==========================================

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::api::dto::{
    DashboardSnapshot, DrilldownView, KpiCard, RecordKpiPoint, EMPTY_STATE_MESSAGE,
};
use crate::api::error::{ApiError, ApiResult};
use crate::domain::dataset::LoadedDataset;
use crate::domain::filter::FilterCriteria;
use crate::domain::record::ProductionRecord;
use crate::domain::types::{Granularity, GroupBy, GroupKey};
use crate::engine::{FilterEngine, MetricEngine};
use crate::perf::PerfGuard;

// ==========================================
// DashboardApi - 驾驶舱 API
// ==========================================
pub struct DashboardApi {
    /// 导入后的不可变数据集
    dataset: Arc<LoadedDataset>,
    filter_engine: FilterEngine,
    metric_engine: MetricEngine,
    /// 排名表行数上限
    ranking_limit: Option<usize>,
}

impl DashboardApi {
    /// 创建新的 DashboardApi 实例
    pub fn new(dataset: Arc<LoadedDataset>) -> Self {
        Self {
            dataset,
            filter_engine: FilterEngine::new(),
            metric_engine: MetricEngine::new(),
            ranking_limit: None,
        }
    }

    pub fn with_ranking_limit(mut self, limit: Option<usize>) -> Self {
        self.ranking_limit = limit;
        self
    }

    pub fn dataset(&self) -> &LoadedDataset {
        &self.dataset
    }

    // ==========================================
    // 驾驶舱快照
    // ==========================================

    /// 按筛选条件重算整个驾驶舱
    ///
    /// # 返回
    /// - Ok(DashboardSnapshot): 筛选结果为空时也返回快照（带 empty_state）
    /// - Err(ApiError::InvalidCriteria): 筛选条件无效
    pub fn snapshot(&self, criteria: &FilterCriteria) -> ApiResult<DashboardSnapshot> {
        criteria.validate()?;

        let mut perf = PerfGuard::new("dashboard_snapshot", self.dataset.len());
        let filtered = self.filter_engine.apply_filters(&self.dataset.records, criteria);
        perf.set_output(filtered.len());

        let filter_options = self
            .filter_engine
            .filter_options(&self.dataset.records, criteria);

        let overall = self.metric_engine.compute_oee(&filtered);
        let empty_state = if filtered.is_empty() {
            warn!(batch_id = %self.dataset.batch_id, "筛选后无数据");
            Some(EMPTY_STATE_MESSAGE.to_string())
        } else {
            if !overall.warnings.is_empty() {
                warn!(warnings = ?overall.warnings, "总体 KPI 存在除零告警");
            }
            None
        };

        let mut machine_ranking = self.metric_engine.ranking(&filtered, GroupBy::Machine);
        let mut product_ranking = self.metric_engine.ranking(&filtered, GroupBy::Product);
        if let Some(limit) = self.ranking_limit {
            machine_ranking.truncate(limit);
            product_ranking.truncate(limit);
        }

        let daily_trend = self.trend(&filtered, criteria, Granularity::Day);
        let monthly_trend = self.trend(&filtered, criteria, Granularity::Month);
        let records = self.record_points(&filtered);

        info!(
            records = filtered.len(),
            machines = machine_ranking.len(),
            products = product_ranking.len(),
            oee = overall.kpi.oee,
            "驾驶舱重算完成"
        );

        Ok(DashboardSnapshot {
            batch_id: self.dataset.batch_id.clone(),
            criteria: criteria.clone(),
            record_count: filtered.len(),
            overall: KpiCard::from(overall),
            machine_ranking,
            product_ranking,
            daily_trend,
            monthly_trend,
            filter_options,
            records,
            empty_state,
        })
    }

    /// 总体 KPI（仅卡片）
    pub fn overall(&self, criteria: &FilterCriteria) -> ApiResult<KpiCard> {
        criteria.validate()?;
        let filtered = self.filter_engine.apply_filters(&self.dataset.records, criteria);
        Ok(KpiCard::from(self.metric_engine.compute_oee(&filtered)))
    }

    // ==========================================
    // 下钻
    // ==========================================

    /// 单机台下钻
    pub fn machine_drilldown(
        &self,
        criteria: &FilterCriteria,
        machine_id: &str,
    ) -> ApiResult<DrilldownView> {
        let machine_id = machine_id.trim();
        if machine_id.is_empty() {
            return Err(ApiError::InvalidInput("机台编号不能为空".to_string()));
        }
        self.drilldown(criteria, GroupKey::Machine(machine_id.to_string()), |r| {
            r.machine_id == machine_id
        })
    }

    /// 单产品/模具下钻
    pub fn product_drilldown(
        &self,
        criteria: &FilterCriteria,
        product_id: &str,
    ) -> ApiResult<DrilldownView> {
        let product_id = product_id.trim();
        if product_id.is_empty() {
            return Err(ApiError::InvalidInput("产品/模具编号不能为空".to_string()));
        }
        self.drilldown(criteria, GroupKey::Product(product_id.to_string()), |r| {
            r.product_id == product_id
        })
    }

    fn drilldown<F>(&self, criteria: &FilterCriteria, key: GroupKey, select: F) -> ApiResult<DrilldownView>
    where
        F: Fn(&ProductionRecord) -> bool,
    {
        criteria.validate()?;

        let mut selected: Vec<ProductionRecord> = self
            .filter_engine
            .apply_filters(&self.dataset.records, criteria)
            .into_iter()
            .filter(|r| select(r))
            .collect();
        // 稳定排序：同日记录保持文件顺序
        selected.sort_by_key(|r| r.date);

        let summary = KpiCard::from(self.metric_engine.compute_oee(&selected));
        let series = self.record_points(&selected);

        let empty_state = selected.is_empty().then(|| {
            warn!(key = %key, "下钻对象在当前筛选下无数据");
            EMPTY_STATE_MESSAGE.to_string()
        });

        Ok(DrilldownView {
            key,
            summary,
            series,
            empty_state,
        })
    }

    /// 逐条记录 KPI（保持传入顺序）
    fn record_points(&self, records: &[ProductionRecord]) -> Vec<RecordKpiPoint> {
        records
            .iter()
            .map(|r| RecordKpiPoint {
                date: r.date,
                machine_id: r.machine_id.clone(),
                product_id: r.product_id.clone(),
                row_number: r.row_number,
                kpi: self.metric_engine.compute_record(r).kpi,
                units_produced: r.units_produced,
            })
            .collect()
    }

    // ==========================================
    // 趋势
    // ==========================================

    /// 趋势范围: 筛选条件给出的边界优先，否则取筛选结果的首末日期；
    /// 两端都不超出数据集的日期范围
    fn trend(
        &self,
        filtered: &[ProductionRecord],
        criteria: &FilterCriteria,
        granularity: Granularity,
    ) -> Vec<crate::domain::kpi::TrendPoint> {
        let from: Option<NaiveDate> = criteria
            .date_from
            .or_else(|| filtered.iter().map(|r| r.date).min());
        let to: Option<NaiveDate> = criteria
            .date_to
            .or_else(|| filtered.iter().map(|r| r.date).max());

        let Some((first, last)) = self.dataset.date_bounds() else {
            return Vec::new();
        };

        match (from, to) {
            (Some(from), Some(to)) => {
                let from = from.max(first);
                let to = to.min(last);
                if from > to {
                    return Vec::new();
                }
                self.metric_engine
                    .trend_in_range(filtered, granularity, from, to)
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::filter::CriteriaError;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn record(d: u32, machine: &str, product: &str, downtime: f64, good: f64) -> ProductionRecord {
        ProductionRecord {
            date: day(d),
            machine_id: machine.to_string(),
            product_id: product.to_string(),
            planned_minutes: 480.0,
            downtime_minutes: downtime,
            cycle_time_actual: 12.0,
            cycle_time_ideal: 10.0,
            units_produced: 100.0,
            units_good: good,
            working_days: None,
            performance_ratio: None,
            row_number: d as usize + 1,
        }
    }

    fn api() -> DashboardApi {
        let records = vec![
            record(1, "M1", "P1", 60.0, 95.0),
            record(1, "M2", "P2", 0.0, 100.0),
            record(3, "M1", "P2", 120.0, 90.0),
        ];
        DashboardApi::new(Arc::new(LoadedDataset::from_records("unit.csv", records)))
    }

    #[test]
    fn test_snapshot_full_dataset() {
        let snapshot = api().snapshot(&FilterCriteria::default()).unwrap();

        assert_eq!(snapshot.record_count, 3);
        assert!(snapshot.empty_state.is_none());
        assert_eq!(snapshot.machine_ranking.len(), 2);
        assert_eq!(snapshot.product_ranking.len(), 2);
        // 1/1 ~ 1/3 共三天，中间一天为空缺
        assert_eq!(snapshot.daily_trend.len(), 3);
        assert!(snapshot.daily_trend[1].is_gap());
        assert_eq!(snapshot.monthly_trend.len(), 1);
        assert_eq!(snapshot.filter_options.machines, vec!["M1", "M2"]);
    }

    #[test]
    fn test_snapshot_empty_filter_result() {
        let criteria = FilterCriteria::new().machines(["M9"]);
        let snapshot = api().snapshot(&criteria).unwrap();

        assert!(snapshot.is_empty());
        assert_eq!(snapshot.empty_state.as_deref(), Some(EMPTY_STATE_MESSAGE));
        assert!(snapshot.machine_ranking.is_empty());
        assert!(snapshot.daily_trend.is_empty());
    }

    #[test]
    fn test_snapshot_rejects_inverted_range() {
        let criteria = FilterCriteria::new().date_range(Some(day(5)), Some(day(1)));
        let err = api().snapshot(&criteria).unwrap_err();
        assert!(matches!(
            err,
            ApiError::InvalidCriteria(CriteriaError::InvertedDateRange { .. })
        ));
    }

    #[test]
    fn test_ranking_limit() {
        let api = api().with_ranking_limit(Some(1));
        let snapshot = api.snapshot(&FilterCriteria::default()).unwrap();
        assert_eq!(snapshot.machine_ranking.len(), 1);
        // M2 无停机、无不良，排第一
        assert_eq!(
            snapshot.machine_ranking.rows[0].key,
            GroupKey::Machine("M2".to_string())
        );
    }

    #[test]
    fn test_machine_drilldown_series_sorted() {
        let view = api()
            .machine_drilldown(&FilterCriteria::default(), " M1 ")
            .unwrap();

        assert_eq!(view.key, GroupKey::Machine("M1".to_string()));
        assert_eq!(view.series.len(), 2);
        assert!(view.series[0].date <= view.series[1].date);
        assert_eq!(view.summary.totals.record_count, 2);
        assert!(view.empty_state.is_none());
    }

    #[test]
    fn test_drilldown_blank_id_is_invalid_input() {
        let err = api()
            .product_drilldown(&FilterCriteria::default(), "  ")
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    #[test]
    fn test_drilldown_unknown_product_is_empty_state() {
        let view = api()
            .product_drilldown(&FilterCriteria::default(), "P404")
            .unwrap();
        assert!(view.series.is_empty());
        assert!(view.empty_state.is_some());
    }
}
