// ==========================================
// 生产 OEE 驾驶舱 - 文本报表
// ==========================================
// 职责: 将快照/下钻视图渲染为终端可读的文本
// ==========================================

use std::fmt::Write;

use crate::api::dto::{DashboardSnapshot, DrilldownView, KpiCard, RecordKpiPoint};
use crate::domain::kpi::{AggregateView, KpiResult, TrendPoint};

/// 百分比格式化，保留一位小数；None（空缺周期）显示为 "-"
pub fn format_pct(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.1}%", v * 100.0),
        _ => "-".to_string(),
    }
}

fn kpi_cells(kpi: Option<&KpiResult>) -> [String; 4] {
    [
        format_pct(kpi.map(|k| k.availability)),
        format_pct(kpi.map(|k| k.performance)),
        format_pct(kpi.map(|k| k.quality)),
        format_pct(kpi.map(|k| k.oee)),
    ]
}

fn write_card(out: &mut String, title: &str, card: &KpiCard) {
    let [a, p, q, oee] = kpi_cells(Some(&card.kpi));
    let _ = writeln!(out, "== {} ==", title);
    let _ = writeln!(
        out,
        "  可用率 {:>7}  性能率 {:>7}  质量率 {:>7}  OEE {:>7}",
        a, p, q, oee
    );
    let _ = writeln!(
        out,
        "  记录 {}  产出 {:.0}  良品 {:.0}  不良 {:.0}  停机 {:.1} h",
        card.totals.record_count,
        card.totals.units_produced,
        card.totals.units_good,
        card.totals.units_rejected,
        card.downtime_hours
    );
    for warning in &card.warnings {
        let _ = writeln!(out, "  ! {}", warning);
    }
}

fn write_ranking(out: &mut String, title: &str, view: &AggregateView) {
    let _ = writeln!(out, "== {} ==", title);
    for (idx, row) in view.rows.iter().enumerate() {
        let [a, p, q, oee] = kpi_cells(Some(&row.kpi));
        let _ = writeln!(
            out,
            "  {:>3}. {:<16} OEE {:>7}  A {:>7}  P {:>7}  Q {:>7}",
            idx + 1,
            row.key.label(),
            oee,
            a,
            p,
            q
        );
    }
}

fn write_trend(out: &mut String, title: &str, points: &[TrendPoint]) {
    let _ = writeln!(out, "== {} ==", title);
    for point in points {
        let [a, p, q, oee] = kpi_cells(point.kpi.as_ref());
        let _ = writeln!(
            out,
            "  {:<10} OEE {:>7}  A {:>7}  P {:>7}  Q {:>7}",
            point.period.label(),
            oee,
            a,
            p,
            q
        );
    }
}

fn write_points(out: &mut String, title: &str, points: &[RecordKpiPoint]) {
    let _ = writeln!(out, "== {} ==", title);
    for point in points {
        let [a, p, q, oee] = kpi_cells(Some(&point.kpi));
        let _ = writeln!(
            out,
            "  {} 行{:<5} {:<10} {:<10} OEE {:>7}  A {:>7}  P {:>7}  Q {:>7}",
            point.date, point.row_number, point.machine_id, point.product_id, oee, a, p, q
        );
    }
}

/// 渲染驾驶舱快照
pub fn render_snapshot(snapshot: &DashboardSnapshot) -> String {
    let mut out = String::new();

    if let Some(message) = &snapshot.empty_state {
        let _ = writeln!(out, "{}", message);
        return out;
    }

    write_card(&mut out, "总体 KPI", &snapshot.overall);
    write_ranking(&mut out, "机台排名", &snapshot.machine_ranking);
    write_ranking(&mut out, "产品/模具排名", &snapshot.product_ranking);
    write_trend(&mut out, "月趋势", &snapshot.monthly_trend);
    write_trend(&mut out, "日趋势", &snapshot.daily_trend);
    out
}

/// 渲染下钻视图
pub fn render_drilldown(view: &DrilldownView) -> String {
    let mut out = String::new();

    if let Some(message) = &view.empty_state {
        let _ = writeln!(out, "{}: {}", view.key, message);
        return out;
    }

    write_card(&mut out, &view.key.to_string(), &view.summary);
    write_points(&mut out, "明细", &view.series);
    out
}

/// 渲染原始数据明细（筛选后逐条记录）
pub fn render_records(snapshot: &DashboardSnapshot) -> String {
    let mut out = String::new();

    if let Some(message) = &snapshot.empty_state {
        let _ = writeln!(out, "{}", message);
        return out;
    }

    write_points(&mut out, "原始数据", &snapshot.records);
    out
}
