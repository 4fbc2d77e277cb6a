// ==========================================
// 测试数据生成器
// ==========================================
// 用途: 生成驾驶舱演示/测试用的生产记录 CSV
// 输出: tests/fixtures/datasets/*.csv
// ==========================================

use chrono::{Duration, NaiveDate};
use csv::Writer;
use std::error::Error;
use std::fs::{self, File};

// CSV 表头（标准列名）
const CSV_HEADER: &[&str] = &[
    "date",
    "machine_id",
    "product_id",
    "planned_minutes",
    "downtime_minutes",
    "cycle_time_actual",
    "cycle_time_ideal",
    "units_produced",
    "units_good",
];

// 以工作天数给出计划时间、以不良数给出良品的表头（别名列）
const CSV_HEADER_ALIAS: &[&str] = &[
    "Date",
    "Machine",
    "Mold",
    "Working Days",
    "Downtime Hours",
    "Actual Cycle Time",
    "Ideal Cycle Time",
    "Production per Unit",
    "Reject per Unit",
];

const MACHINES: &[&str] = &["M01", "M02", "M03", "M04"];
const PRODUCTS: &[&str] = &["P-100", "P-200", "P-300"];

// 生产记录结构
#[derive(Clone)]
struct ProductionRow {
    date: NaiveDate,
    machine_id: String,
    product_id: String,
    planned_minutes: f64,
    downtime_minutes: f64,
    cycle_time_actual: f64,
    cycle_time_ideal: f64,
    units_produced: f64,
    units_good: f64,
}

impl ProductionRow {
    fn to_row(&self) -> Vec<String> {
        vec![
            self.date.format("%Y-%m-%d").to_string(),
            self.machine_id.clone(),
            self.product_id.clone(),
            format!("{:.0}", self.planned_minutes),
            format!("{:.0}", self.downtime_minutes),
            format!("{:.1}", self.cycle_time_actual),
            format!("{:.1}", self.cycle_time_ideal),
            format!("{:.0}", self.units_produced),
            format!("{:.0}", self.units_good),
        ]
    }

    fn to_alias_row(&self) -> Vec<String> {
        vec![
            self.date.format("%Y/%m/%d").to_string(),
            self.machine_id.clone(),
            self.product_id.clone(),
            "1".to_string(),
            format!("{:.2}", self.downtime_minutes / 60.0),
            format!("{:.1}", self.cycle_time_actual),
            format!("{:.1}", self.cycle_time_ideal),
            format!("{:.0}", self.units_produced),
            format!("{:.0}", self.units_produced - self.units_good),
        ]
    }
}

// 确定性伪随机序列（不依赖 rand）
fn jitter(index: usize, modulo: usize) -> f64 {
    ((index * 7919 + 13) % modulo) as f64
}

fn generate_normal_record(index: usize, start: NaiveDate) -> ProductionRow {
    let machine = MACHINES[index % MACHINES.len()];
    let product = PRODUCTS[(index / MACHINES.len()) % PRODUCTS.len()];
    let date = start + Duration::days((index / MACHINES.len()) as i64);

    let cycle_time_ideal = 10.0 + (index % PRODUCTS.len()) as f64 * 2.0;
    let cycle_time_actual = cycle_time_ideal + jitter(index, 5) * 0.5;
    let units_produced = 1_500.0 + jitter(index, 800);
    let units_good = units_produced - jitter(index, 60);

    ProductionRow {
        date,
        machine_id: machine.to_string(),
        product_id: product.to_string(),
        planned_minutes: 480.0,
        downtime_minutes: jitter(index, 120),
        cycle_time_actual,
        cycle_time_ideal,
        units_produced,
        units_good,
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    println!("==================================================");
    println!("生产记录测试数据生成器");
    println!("==================================================");

    fs::create_dir_all("tests/fixtures/datasets")?;

    generate_normal_data()?;
    generate_large_dataset()?;
    generate_alias_columns()?;
    generate_missing_column()?;
    generate_dq_violations()?;

    println!("全部数据集已生成");
    Ok(())
}

fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// 01: 正常数据，4 台机台 × 60 天
fn generate_normal_data() -> Result<(), Box<dyn Error>> {
    let path = "tests/fixtures/datasets/01_normal_data.csv";
    let file = File::create(path)?;
    let mut wtr = Writer::from_writer(file);

    wtr.write_record(CSV_HEADER)?;
    for i in 0..240 {
        wtr.write_record(generate_normal_record(i, start_date()).to_row())?;
    }
    wtr.flush()?;

    println!("✓ {} (240 行)", path);
    Ok(())
}

/// 02: 大数据集（一年）
fn generate_large_dataset() -> Result<(), Box<dyn Error>> {
    let path = "tests/fixtures/datasets/02_large_dataset.csv";
    let file = File::create(path)?;
    let mut wtr = Writer::from_writer(file);

    let rows = 365 * MACHINES.len();
    wtr.write_record(CSV_HEADER)?;
    for i in 0..rows {
        wtr.write_record(generate_normal_record(i, start_date()).to_row())?;
    }
    wtr.flush()?;

    println!("✓ {} ({} 行)", path, rows);
    Ok(())
}

/// 03: 别名列（工作天数、停机小时、不良数）
fn generate_alias_columns() -> Result<(), Box<dyn Error>> {
    let path = "tests/fixtures/datasets/03_alias_columns.csv";
    let file = File::create(path)?;
    let mut wtr = Writer::from_writer(file);

    wtr.write_record(CSV_HEADER_ALIAS)?;
    for i in 0..40 {
        wtr.write_record(generate_normal_record(i, start_date()).to_alias_row())?;
    }
    wtr.flush()?;

    println!("✓ {} (40 行)", path);
    Ok(())
}

/// 04: 缺少 units_good 列
fn generate_missing_column() -> Result<(), Box<dyn Error>> {
    let path = "tests/fixtures/datasets/04_missing_column.csv";
    let file = File::create(path)?;
    let mut wtr = Writer::from_writer(file);

    wtr.write_record(&CSV_HEADER[..CSV_HEADER.len() - 1])?;
    for i in 0..10 {
        let mut row = generate_normal_record(i, start_date()).to_row();
        row.pop();
        wtr.write_record(&row)?;
    }
    wtr.flush()?;

    println!("✓ {} (10 行)", path);
    Ok(())
}

/// 05: 数据质量问题（负值、良品超产出、停机超计划、实际节拍为 0）
fn generate_dq_violations() -> Result<(), Box<dyn Error>> {
    let path = "tests/fixtures/datasets/05_dq_violations.csv";
    let file = File::create(path)?;
    let mut wtr = Writer::from_writer(file);

    wtr.write_record(CSV_HEADER)?;
    for i in 0..20 {
        let mut record = generate_normal_record(i, start_date());
        match i % 5 {
            1 => record.downtime_minutes = -10.0,
            2 => record.units_good = record.units_produced + 5.0,
            3 => record.downtime_minutes = record.planned_minutes + 30.0,
            4 => record.cycle_time_actual = 0.0,
            _ => {}
        }
        wtr.write_record(record.to_row())?;
    }
    wtr.flush()?;

    println!("✓ {} (20 行)", path);
    Ok(())
}
