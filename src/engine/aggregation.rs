// ==========================================
// 生产 OEE 驾驶舱 - 分组聚合
// ==========================================
// 职责: 按机台 / 产品 / 日 / 月分区，逐分区计算 KPI
// 排序: 默认按键首次出现顺序；排名模式按 OEE 降序，同值按键升序
// ==========================================

use crate::domain::kpi::{AggregateRow, AggregateView};
use crate::domain::record::ProductionRecord;
use crate::domain::types::{GroupBy, GroupKey, PartitionOrder, YearMonth};
use crate::engine::metrics::MetricEngine;
use std::collections::HashMap;

/// 记录在指定维度下的分组键
pub fn group_key(group_by: GroupBy, record: &ProductionRecord) -> GroupKey {
    match group_by {
        GroupBy::Machine => GroupKey::Machine(record.machine_id.clone()),
        GroupBy::Product => GroupKey::Product(record.product_id.clone()),
        GroupBy::Day => GroupKey::Day(record.date),
        GroupBy::Month => GroupKey::Month(YearMonth::of(record.date)),
    }
}

/// 按首次出现顺序分区（分区内保持输入顺序）
pub fn partition<F>(records: &[ProductionRecord], key_fn: F) -> Vec<(GroupKey, Vec<ProductionRecord>)>
where
    F: Fn(&ProductionRecord) -> GroupKey,
{
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut partitions: Vec<(GroupKey, Vec<ProductionRecord>)> = Vec::new();

    for record in records {
        let key = key_fn(record);
        match index.get(&key) {
            Some(&pos) => partitions[pos].1.push(record.clone()),
            None => {
                index.insert(key.clone(), partitions.len());
                partitions.push((key, vec![record.clone()]));
            }
        }
    }

    partitions
}

impl MetricEngine {
    /// 按维度分组计算 KPI
    pub fn aggregate_by(
        &self,
        records: &[ProductionRecord],
        group_by: GroupBy,
        order: PartitionOrder,
    ) -> AggregateView {
        let mut rows: Vec<AggregateRow> = partition(records, |r| group_key(group_by, r))
            .into_iter()
            .map(|(key, members)| {
                let eval = self.compute_oee(&members);
                AggregateRow {
                    key,
                    kpi: eval.kpi,
                    totals: eval.totals,
                    warnings: eval.warnings,
                }
            })
            .collect();

        if order == PartitionOrder::RankedByOee {
            rank_rows(&mut rows);
        }

        AggregateView {
            group_by,
            order,
            rows,
        }
    }

    /// 排名视图（OEE 降序）
    pub fn ranking(&self, records: &[ProductionRecord], group_by: GroupBy) -> AggregateView {
        self.aggregate_by(records, group_by, PartitionOrder::RankedByOee)
    }
}

/// OEE 降序，同值按键升序
fn rank_rows(rows: &mut [AggregateRow]) {
    rows.sort_by(|a, b| {
        b.kpi
            .oee
            .total_cmp(&a.kpi.oee)
            .then_with(|| a.key.cmp(&b.key))
    });
}
