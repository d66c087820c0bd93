/// aqua-telemetry 基本使用示例
///
/// 演示设备注册表、读数生成和状态分类的基本流程

use aqua_telemetry::{
    assess_reading, DashboardSession, DeviceRegistry, Metric,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志
    tracing_subscriber::fmt::init();

    println!("=== 水质遥测引擎示例 ===\n");

    // 1. 创建设备注册表（内置三站设备表）
    let registry = Arc::new(DeviceRegistry::builtin());
    println!("✓ 设备注册表已创建，共 {} 台设备\n", registry.len());

    // 2. 列出设备
    println!("--- 设备列表 ---");
    for device in registry.list_devices().await {
        println!(
            "  {} | {} | {} | {}",
            device.id,
            device.name,
            device.location,
            device.status.as_str()
        );
    }

    // 3. 连续读数与分类
    println!("\n--- device-001 读数 ---");
    let previous = registry.get_reading("device-001").await?;
    let current = registry.get_reading("device-001").await?;
    let (metrics, overall) = assess_reading(&current, &previous);
    for m in &metrics {
        println!(
            "  {:<18} {:>7.2} {:<5} {:?} {:?}",
            m.title, m.value, m.unit, m.status, m.trend
        );
    }
    println!("  总体状态: {:?}", overall);

    // 4. 未知设备
    if let Err(e) = registry.get_reading("device-999").await {
        println!("\n✗ {}", e);
    }

    // 5. 仪表盘会话
    println!("\n--- 仪表盘会话 ---");
    let mut session = DashboardSession::open(registry.clone(), "device-002").await?;
    session.refresh().await?;
    let series = session.series(Metric::Temperature);
    println!(
        "✓ 温度历史 {} 点，范围 {:.2} ~ {:.2} {}",
        series.points.len(),
        series.min,
        series.max,
        series.unit
    );

    Ok(())
}
