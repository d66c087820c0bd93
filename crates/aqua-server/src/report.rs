use aqua_telemetry::{DashboardSnapshot, MetricStatus, OverallStatus, Trend};
use tracing::{debug, info};

fn status_label(status: MetricStatus) -> &'static str {
    match status {
        MetricStatus::Normal => "normal",
        MetricStatus::Warning => "warning",
        MetricStatus::Critical => "critical",
    }
}

fn trend_arrow(trend: Trend) -> &'static str {
    match trend {
        Trend::Up => "↑",
        Trend::Down => "↓",
        Trend::Stable => "→",
    }
}

fn overall_label(status: OverallStatus) -> &'static str {
    match status {
        OverallStatus::Excellent => "Excellent",
        OverallStatus::Good => "Good",
        OverallStatus::Warning => "Warning",
        OverallStatus::Critical => "Critical",
    }
}

/// 单行摘要
pub fn format_summary(snapshot: &DashboardSnapshot) -> String {
    let metrics: Vec<String> = snapshot
        .metrics
        .iter()
        .map(|m| {
            format!(
                "{} {:.2} {} {} ({})",
                m.metric,
                m.value,
                m.unit,
                trend_arrow(m.trend),
                status_label(m.status)
            )
        })
        .collect();

    format!(
        "[{}] {} | {}",
        snapshot.device_id,
        overall_label(snapshot.overall_status),
        metrics.join(" | ")
    )
}

/// 输出快照
pub fn report(snapshot: &DashboardSnapshot) {
    let station = snapshot
        .device
        .as_ref()
        .map(|d| d.name.as_str())
        .unwrap_or("unknown");

    info!(
        device_id = %snapshot.device_id,
        station = %station,
        overall = overall_label(snapshot.overall_status),
        last_update = %snapshot.last_update.format("%H:%M:%S"),
        "{}",
        snapshot.overall_status.description()
    );
    info!("{}", format_summary(snapshot));

    for device in &snapshot.devices {
        debug!(
            device_id = %device.id,
            name = %device.name,
            location = %device.location,
            status = device.status.as_str(),
            last_seen = %device.last_seen,
            "Fleet status"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aqua_telemetry::{assess_reading, MetricMap, Reading};
    use chrono::Utc;

    #[test]
    fn test_format_summary() {
        let previous = Reading::from_values(&MetricMap::new([7.0, 2.0, 32.0, 8.0, 24.0]), Utc::now());
        let current = Reading::from_values(&MetricMap::new([7.2, 2.0, 32.0, 5.0, 24.0]), Utc::now());
        let (metrics, overall_status) = assess_reading(&current, &previous);

        let snapshot = DashboardSnapshot {
            device_id: "device-001".to_string(),
            device: None,
            reading: current,
            metrics,
            overall_status,
            devices: Vec::new(),
            last_update: Utc::now(),
        };

        let summary = format_summary(&snapshot);
        assert!(summary.starts_with("[device-001] Warning | "));
        assert!(summary.contains("pH 7.20 pH ↑ (normal)"));
        assert!(summary.contains("dissolvedOxygen 5.00 mg/L ↓ (warning)"));
        assert!(summary.contains("turbidity 2.00 NTU → (normal)"));
    }
}
