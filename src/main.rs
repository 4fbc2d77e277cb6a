// ==========================================
// 生产 OEE 驾驶舱 - 命令行入口
// ==========================================
// 流程: 加载配置 → 导入生产记录 → 按筛选条件重算 → 输出 JSON/文本
// ==========================================

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};

use oee_dashboard::api::{render_drilldown, render_records, render_snapshot, ApiError, DashboardApi};
use oee_dashboard::config::ConfigManager;
use oee_dashboard::domain::FilterCriteria;
use oee_dashboard::importer::{ImportError, RecordLoader};
use oee_dashboard::logging::{self, LogFormat};

/// 由生产记录表计算可用率、性能率、质量率与 OEE
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// 生产记录文件（.xlsx / .xls / .csv），缺省时使用配置中的默认文件
    file: Option<PathBuf>,

    /// 起始日期（含），格式 YYYY-MM-DD
    #[arg(long)]
    from: Option<NaiveDate>,

    /// 截止日期（含），格式 YYYY-MM-DD
    #[arg(long)]
    to: Option<NaiveDate>,

    /// 机台筛选，可重复
    #[arg(long = "machine")]
    machines: Vec<String>,

    /// 产品/模具筛选，可重复
    #[arg(long = "product")]
    products: Vec<String>,

    /// 每个工作日的计划小时数（1-24），覆盖配置
    #[arg(long)]
    hours_per_day: Option<f64>,

    /// 输出格式
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// 单机台下钻
    #[arg(long, conflicts_with = "drilldown_product")]
    drilldown_machine: Option<String>,

    /// 单产品/模具下钻
    #[arg(long)]
    drilldown_product: Option<String>,

    /// 仅输出原始数据明细（逐条记录 KPI）
    #[arg(long, conflicts_with_all = ["drilldown_machine", "drilldown_product"])]
    raw: bool,

    /// 配置文件路径（JSON）
    #[arg(long)]
    config: Option<PathBuf>,

    /// 以 JSON 行格式输出日志
    #[arg(long)]
    json_log: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    logging::init_with(if cli.json_log {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    });

    tracing::info!("{} v{}", oee_dashboard::APP_NAME, oee_dashboard::VERSION);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // 缺列是源文件问题，单独给出退出码
            let missing_column = e
                .downcast_ref::<ImportError>()
                .map(ImportError::is_missing_column)
                .or_else(|| e.downcast_ref::<ApiError>().map(ApiError::is_missing_column))
                .unwrap_or(false);
            tracing::error!("{:#}", e);
            eprintln!("错误: {:#}", e);
            if missing_column {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ConfigManager::load(cli.config.as_deref()).context("加载配置失败")?;

    let file = cli
        .file
        .clone()
        .unwrap_or_else(|| PathBuf::from(config.default_file()));

    let dataset = RecordLoader::default().load(&file)?;
    tracing::info!(
        batch_id = %dataset.batch_id,
        records = dataset.len(),
        blocked = dataset.dq_report.summary.blocked,
        "数据集已加载"
    );

    let criteria = FilterCriteria::new()
        .date_range(cli.from, cli.to)
        .machines(cli.machines.iter().cloned())
        .products(cli.products.iter().cloned())
        .hours_per_day(cli.hours_per_day.unwrap_or_else(|| config.hours_per_day()));

    let api = DashboardApi::new(Arc::new(dataset)).with_ranking_limit(config.ranking_limit());

    let output = if let Some(machine) = cli.drilldown_machine.as_deref() {
        let view = api.machine_drilldown(&criteria, machine)?;
        match cli.format {
            OutputFormat::Json => serde_json::to_string_pretty(&view)?,
            OutputFormat::Text => render_drilldown(&view),
        }
    } else if let Some(product) = cli.drilldown_product.as_deref() {
        let view = api.product_drilldown(&criteria, product)?;
        match cli.format {
            OutputFormat::Json => serde_json::to_string_pretty(&view)?,
            OutputFormat::Text => render_drilldown(&view),
        }
    } else {
        let snapshot = api.snapshot(&criteria)?;
        match (cli.format, cli.raw) {
            (OutputFormat::Json, false) => serde_json::to_string_pretty(&snapshot)?,
            (OutputFormat::Json, true) => serde_json::to_string_pretty(&snapshot.records)?,
            (OutputFormat::Text, false) => render_snapshot(&snapshot),
            (OutputFormat::Text, true) => render_records(&snapshot),
        }
    };

    println!("{}", output);
    Ok(())
}
