//! 急诊分诊控制台
//!
//! 加载患者和床位记录，构建分诊队列并输出，可在命令行中收治患者或调整分诊级别。

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::{Parser, ValueEnum};
use hospital_admin::{init_logging, ConfigManager, PolicyKind, TriageMetrics};
use hospital_records::{
    load_all, AppointmentRegistry, BedRegistry, DepartmentSummary, HospitalSummary,
    JsonFileSource, PatientRegistry, StaffRegistry,
};
use hospital_triage::{
    EmergencyAdmission, EmergencyBoard, RecordedPolicy, SimulatedPolicy, TriagePriority,
};
use tracing::{info, warn};

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "ed-console")]
#[command(about = "急诊科分诊队列控制台")]
struct Args {
    /// 配置文件路径
    #[arg(short, long)]
    config: Option<String>,

    /// 患者记录JSON文件（覆盖配置）
    #[arg(long)]
    patients: Option<String>,

    /// 床位记录JSON文件（覆盖配置）
    #[arg(long)]
    beds: Option<String>,

    /// 人员名册JSON文件（覆盖配置）
    #[arg(long)]
    staff: Option<String>,

    /// 预约记录JSON文件（覆盖配置）
    #[arg(long)]
    appointments: Option<String>,

    /// 输出全院概览和科室统计
    #[arg(long)]
    summary: bool,

    /// 分诊分配策略（覆盖配置）
    #[arg(short, long, value_enum)]
    policy: Option<PolicyArg>,

    /// 模拟策略的随机种子（覆盖配置）
    #[arg(long)]
    seed: Option<u64>,

    /// 急诊收治，格式 `姓名=级别`，可重复
    #[arg(short, long = "admit")]
    admit: Vec<String>,

    /// 调整分诊级别，格式 `患者编号=级别`，可重复
    #[arg(short, long = "set")]
    set: Vec<String>,

    /// 以JSON输出队列和概览
    #[arg(long)]
    json: bool,

    /// 日志级别（覆盖配置）
    #[arg(short, long)]
    log_level: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    Recorded,
    Simulated,
}

impl From<PolicyArg> for PolicyKind {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Recorded => PolicyKind::Recorded,
            PolicyArg::Simulated => PolicyKind::Simulated,
        }
    }
}

/// 解析 `键=级别` 形式的参数
fn parse_assignment(raw: &str) -> Result<(String, TriagePriority)> {
    let (key, priority) = raw
        .rsplit_once('=')
        .with_context(|| format!("Expected KEY=PRIORITY, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        anyhow::bail!("Missing key in '{}'", raw);
    }
    let priority: TriagePriority = priority.parse()?;
    Ok((key.to_string(), priority))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_manager = ConfigManager::new(args.config.as_deref())?;
    let mut config = config_manager.config().clone();
    if let Some(path) = args.patients {
        config.data.patients_path = path;
    }
    if let Some(path) = args.beds {
        config.data.beds_path = path;
    }
    if let Some(path) = args.staff {
        config.data.staff_path = Some(path);
    }
    if let Some(path) = args.appointments {
        config.data.appointments_path = Some(path);
    }
    if let Some(policy) = args.policy {
        config.triage.policy = policy.into();
    }
    if let Some(seed) = args.seed {
        config.triage.seed = seed;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }

    // 初始化日志
    init_logging(&config.logging)?;

    info!("启动急诊分诊控制台...");
    info!("  患者记录: {}", config.data.patients_path);
    info!("  床位记录: {}", config.data.beds_path);
    info!("  分诊策略: {:?}", config.triage.policy);

    let mut source = JsonFileSource::new(&config.data.patients_path, &config.data.beds_path);
    if let Some(path) = &config.data.staff_path {
        source = source.with_staff(path);
    }
    if let Some(path) = &config.data.appointments_path {
        source = source.with_appointments(path);
    }
    let records = load_all(&source).await?;
    let patients = PatientRegistry::from_records(records.patients);
    let beds = BedRegistry::from_records(records.beds);
    let staff = StaffRegistry::from_records(records.staff);
    let appointments = AppointmentRegistry::from_records(records.appointments);

    let now = Utc::now();
    let mut board = match config.triage.policy {
        PolicyKind::Recorded => EmergencyBoard::new(
            patients,
            beds,
            RecordedPolicy::new(
                now,
                config.triage.default_priority,
                config.triage.arrival_interval_minutes,
            ),
        ),
        PolicyKind::Simulated => {
            EmergencyBoard::new(patients, beds, SimulatedPolicy::new(now, config.triage.seed))
        }
    };

    let metrics = TriageMetrics::new()?;

    for raw in &args.admit {
        let (name, priority) = parse_assignment(raw)?;
        let outcome = board.admit(EmergencyAdmission::new(name, priority))?;
        match &outcome.bed {
            Some(bed) => info!("收治 {} 至床位 {}", outcome.patient.id, bed.number),
            None => warn!("收治 {}，暂无空闲急诊床位", outcome.patient.id),
        }
    }

    for raw in &args.set {
        let (patient_id, priority) = parse_assignment(raw)?;
        if board.set_priority(&patient_id, priority) {
            metrics.record_override();
        } else {
            warn!("患者 {} 不在分诊队列中，忽略", patient_id);
        }
    }

    let overview = board.overview();
    metrics.observe(&overview);

    let hospital = HospitalSummary::compute(
        board.patients(),
        board.beds(),
        &appointments,
        Local::now().date_naive(),
    );
    let departments = DepartmentSummary::compute_all(&staff, board.beds());

    if args.json {
        let mut output = serde_json::json!({
            "queue": board.queue(),
            "overview": overview,
        });
        if args.summary {
            output["summary"] = serde_json::json!(hospital);
            output["departments"] = serde_json::json!(departments);
        }
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_board(&board);
        if args.summary {
            print_summary(&hospital, &departments);
        }
    }

    if config.metrics.enabled {
        println!("\n{}", metrics.render()?);
    }

    Ok(())
}

fn print_board(board: &EmergencyBoard) {
    let overview = board.overview();
    let stats = &overview.stats;

    println!("急诊分诊队列");
    println!(
        "  危急: {}  平均等待: {}m  空闲床位: {}  排队: {}",
        stats.critical_patients, stats.average_wait_minutes, overview.available_beds, stats.queue_length
    );

    if board.queue().is_empty() {
        println!("  (队列为空)");
        return;
    }

    for (index, entry) in board.queue().iter().enumerate() {
        let flag = if entry.is_overdue() { " !" } else { "" };
        println!(
            "  #{:<3} {:<6} {:<24} {:<8} 等待 {:>3}m  到达 {}{}",
            index + 1,
            entry.id,
            entry.name,
            entry.priority,
            entry.wait_time_minutes,
            entry.arrival_time.format("%H:%M"),
            flag
        );
    }

    println!("\n分诊级别:");
    for priority in TriagePriority::ALL {
        println!("  {:<8} {}", priority, priority.description());
    }
}

fn print_summary(hospital: &HospitalSummary, departments: &[DepartmentSummary]) {
    println!("\n全院概览");
    println!(
        "  患者: {}  危重: {}  床位: {}/{} ({}%)  空闲: {}  今日预约: {}",
        hospital.total_patients,
        hospital.critical_patients,
        hospital.occupied_beds,
        hospital.total_beds,
        hospital.bed_occupancy_percent,
        hospital.available_beds,
        hospital.todays_appointments
    );

    println!("\n科室");
    for department in departments {
        println!(
            "  {:<18} 人员 {:>2} (医生 {} 护士 {} 白班 {})  床位 {}/{} ({}%)",
            department.department,
            department.total_staff,
            department.doctors,
            department.nurses,
            department.on_duty,
            department.occupied_beds,
            department.total_beds,
            department.occupancy_percent
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        let (id, priority) = parse_assignment("P003=critical").unwrap();
        assert_eq!(id, "P003");
        assert_eq!(priority, TriagePriority::Critical);

        let (name, priority) = parse_assignment(" Jane Roe = High").unwrap();
        assert_eq!(name, "Jane Roe");
        assert_eq!(priority, TriagePriority::High);
    }

    #[test]
    fn test_parse_assignment_errors() {
        assert!(parse_assignment("P003").is_err());
        assert!(parse_assignment("=Low").is_err());
        assert!(parse_assignment("P003=urgent").is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from([
            "ed-console",
            "--policy",
            "simulated",
            "--seed",
            "9",
            "--set",
            "P001=Low",
            "--set",
            "P002=High",
            "--json",
            "--summary",
            "--staff",
            "roster.json",
        ]);
        assert!(matches!(args.policy, Some(PolicyArg::Simulated)));
        assert_eq!(args.seed, Some(9));
        assert_eq!(args.set.len(), 2);
        assert!(args.json);
        assert!(args.summary);
        assert_eq!(args.staff.as_deref(), Some("roster.json"));
    }
}
