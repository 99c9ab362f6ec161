//! 急诊分诊演示程序
//!
//! 展示分诊队列的核心功能，包括队列构建、急诊收治、分诊级别调整和队列统计

use chrono::Utc;
use hospital::{
    build_queue, set_priority, Bed, BedRegistry, BedStatus, Department, DepartmentSummary,
    EmergencyAdmission, EmergencyBoard, NewPatient, NewStaff, PatientRegistry, PatientStatus,
    RecordedPolicy, Shift, SimulatedPolicy, StaffRegistry, StaffRole, TriagePriority, TriageQueue,
    Ward,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志
    tracing_subscriber::fmt::init();

    println!("🚑 急诊分诊队列演示\n");

    // 1. 登记患者
    let patients = create_sample_patients()?;
    println!("✅ 登记了 {} 名患者", patients.len());

    // 2. 登记床位
    let beds = create_sample_beds();
    println!("✅ 登记了 {} 张床位", beds.get_all().len());

    // 3. 使用纯函数构建队列
    demo_pure_queue(&patients);

    // 4. 急诊看板
    let mut board = EmergencyBoard::new(
        patients,
        beds,
        RecordedPolicy::new(Utc::now(), TriagePriority::Medium, 30),
    );
    println!("\n📋 初始队列:");
    print_queue(board.queue());

    // 5. 急诊收治
    let outcome = board.admit(EmergencyAdmission::new("Grace Hopper", TriagePriority::High))?;
    match &outcome.bed {
        Some(bed) => println!(
            "\n🛏️  收治 {} ({}) 至床位 {}",
            outcome.patient.name, outcome.patient.id, bed.number
        ),
        None => println!(
            "\n⚠️  收治 {} ({})，暂无空闲急诊床位",
            outcome.patient.name, outcome.patient.id
        ),
    }
    let outcome = board.admit(EmergencyAdmission::new("Alan Turing", TriagePriority::Medium))?;
    if outcome.bed.is_none() {
        println!("⚠️  {} 已收治但无空闲急诊床位", outcome.patient.name);
    }

    // 6. 调整分诊级别
    if board.set_priority("P003", TriagePriority::Critical) {
        println!("🔺 P003 调整为 Critical");
    }
    if !board.set_priority("P999", TriagePriority::Low) {
        println!("ℹ️  P999 不在队列中，忽略");
    }

    println!("\n📋 调整后队列:");
    print_queue(board.queue());

    // 7. 显示概览
    let overview = board.overview();
    println!("\n📊 急诊概览:");
    println!("   排队人数: {}", overview.stats.queue_length);
    println!("   危急患者: {}", overview.stats.critical_patients);
    println!("   平均等待: {} 分钟", overview.stats.average_wait_minutes);
    println!("   超时患者: {}", overview.stats.overdue_patients);
    println!("   空闲急诊床位: {}", overview.available_beds);
    println!("   占用急诊床位: {}", overview.occupied_beds);

    println!("\n🏥 病区占用:");
    for occupancy in board.beds().ward_occupancy() {
        println!(
            "   {:<10} {}/{} ({}%)",
            occupancy.ward, occupancy.occupied, occupancy.total, occupancy.occupancy_percent
        );
    }

    // 8. 重新加载会丢弃手动调整
    board.reload();
    println!("\n🔄 重新加载后队列:");
    print_queue(board.queue());

    // 9. 科室统计
    let staff = create_sample_staff()?;
    println!("\n👩‍⚕️ 科室统计:");
    for summary in DepartmentSummary::compute_all(&staff, board.beds()) {
        if summary.total_staff == 0 && summary.total_beds == 0 {
            continue;
        }
        println!(
            "   {:<18} 医生 {} 护士 {} 白班 {}  床位 {}/{}",
            summary.department,
            summary.doctors,
            summary.nurses,
            summary.on_duty,
            summary.occupied_beds,
            summary.total_beds
        );
    }

    println!("\n🎉 演示完成!");
    Ok(())
}

/// 展示不依赖看板的队列函数和模拟策略
fn demo_pure_queue(patients: &PatientRegistry) {
    let mut policy = SimulatedPolicy::new(Utc::now(), 7);
    let queue = build_queue(patients.get_all(), &mut policy);
    println!("\n🎲 模拟策略队列 (种子 7):");
    print_queue(&queue);

    let adjusted = set_priority(&queue, "P001", TriagePriority::Low);
    println!("   P001 调整为 Low 后: {:?}", adjusted.ids());
    println!("   原队列保持不变: {:?}", queue.ids());
}

fn print_queue(queue: &TriageQueue) {
    if queue.is_empty() {
        println!("   (队列为空)");
        return;
    }
    for (index, entry) in queue.iter().enumerate() {
        println!(
            "   {}. {} {:<16} {:<8} 等待 {} 分钟",
            index + 1,
            entry.id,
            entry.name,
            entry.priority,
            entry.wait_time_minutes
        );
    }
}

fn create_sample_patients() -> Result<PatientRegistry, Box<dyn std::error::Error>> {
    let mut registry = PatientRegistry::new();

    let samples = [
        ("Ada Lovelace", Some(Ward::Emergency), PatientStatus::Stable, Some(TriagePriority::Medium)),
        ("Charles Babbage", Some(Ward::Emergency), PatientStatus::Critical, Some(TriagePriority::Critical)),
        ("Mary Somerville", Some(Ward::General), PatientStatus::Critical, None),
        ("John Herschel", Some(Ward::Cardiology), PatientStatus::Stable, None),
        ("Caroline Herschel", Some(Ward::Emergency), PatientStatus::Stable, Some(TriagePriority::Low)),
    ];

    for (name, ward, status, priority) in samples {
        let mut request = NewPatient::new(name, status);
        request.current_ward = ward;
        request.triage_priority = priority;
        registry.create(request)?;
    }

    Ok(registry)
}

fn create_sample_beds() -> BedRegistry {
    let beds = [
        ("B001", "E01", Ward::Emergency, BedStatus::Occupied),
        ("B002", "E02", Ward::Emergency, BedStatus::Available),
        ("B003", "E03", Ward::Emergency, BedStatus::Maintenance),
        ("B004", "I01", Ward::Icu, BedStatus::Available),
        ("B005", "G01", Ward::General, BedStatus::Occupied),
    ]
    .into_iter()
    .map(|(id, number, ward, status)| Bed {
        id: id.to_string(),
        number: number.to_string(),
        ward,
        status,
        patient_id: None,
        last_cleaned: None,
    })
    .collect();

    BedRegistry::from_records(beds)
}

fn create_sample_staff() -> Result<StaffRegistry, Box<dyn std::error::Error>> {
    let mut registry = StaffRegistry::new();

    let samples = [
        ("Dr. Helen Park", StaffRole::Doctor, Department::Emergency, Shift::Day),
        ("Marcus Reed", StaffRole::Nurse, Department::Emergency, Shift::Night),
        ("Lucia Romano", StaffRole::Nurse, Department::Icu, Shift::Day),
    ];

    for (name, role, department, shift) in samples {
        registry.create(NewStaff {
            name: name.to_string(),
            role,
            department,
            specialization: None,
            shift,
            contact: String::new(),
            email: None,
        })?;
    }

    Ok(registry)
}
