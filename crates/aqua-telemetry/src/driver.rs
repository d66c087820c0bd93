use crate::{DashboardSession, DashboardSnapshot, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{info, warn};

/// 默认刷新周期（30 秒）
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(30_000);

/// 仪表盘刷新驱动
///
/// 后台任务按固定周期刷新会话并广播快照；设备切换在两次刷新之间串行执行
pub struct DashboardDriver {
    session: Arc<Mutex<DashboardSession>>,
    refresh_interval: Duration,
    snapshots: broadcast::Sender<DashboardSnapshot>,
    task: Mutex<Option<(oneshot::Sender<()>, JoinHandle<()>)>>,
}

impl DashboardDriver {
    /// 创建刷新驱动
    ///
    /// # 参数
    /// * `session` - 仪表盘会话
    /// * `refresh_interval` - 刷新周期
    pub fn new(session: DashboardSession, refresh_interval: Duration) -> Self {
        let (snapshots, _) = broadcast::channel(16);
        Self {
            session: Arc::new(Mutex::new(session)),
            refresh_interval,
            snapshots,
            task: Mutex::new(None),
        }
    }

    /// 订阅快照
    pub fn subscribe(&self) -> broadcast::Receiver<DashboardSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    /// 启动定时刷新
    pub async fn start(&self) {
        let mut task = self.task.lock().await;
        if task.is_some() {
            warn!("Dashboard driver is already running");
            return;
        }

        let period = self.refresh_interval;
        let Some(first_tick) = Instant::now()
            .checked_add(period)
            .filter(|_| !period.is_zero())
        else {
            warn!(refresh_interval = ?period, "Refresh interval is not usable, driver not started");
            return;
        };

        let (stop_tx, mut stop_rx) = oneshot::channel();
        let session = self.session.clone();
        let snapshots = self.snapshots.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(first_tick, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = refresh_and_publish(&session, &snapshots).await {
                            warn!(error = %e, "Dashboard refresh failed");
                        }
                    }
                    _ = &mut stop_rx => break,
                }
            }

            info!("Dashboard driver stopped");
        });

        *task = Some((stop_tx, handle));
        info!(refresh_interval = ?period, "Dashboard driver started");
    }

    /// 停止定时刷新，等待后台任务退出
    pub async fn stop(&self) {
        let task = self.task.lock().await.take();
        if let Some((stop_tx, handle)) = task {
            let _ = stop_tx.send(());
            if let Err(e) = handle.await {
                warn!(error = %e, "Dashboard driver task failed");
            }
        }
    }

    pub async fn is_running(&self) -> bool {
        self.task.lock().await.is_some()
    }

    /// 立即刷新一次
    pub async fn refresh(&self) -> Result<DashboardSnapshot> {
        refresh_and_publish(&self.session, &self.snapshots).await
    }

    /// 切换设备并广播新快照
    pub async fn select_device(&self, device_id: &str) -> Result<DashboardSnapshot> {
        let mut session = self.session.lock().await;
        session.select_device(device_id).await?;
        let snapshot = session.snapshot();
        let _ = self.snapshots.send(snapshot.clone());
        Ok(snapshot)
    }

    /// 当前快照
    pub async fn snapshot(&self) -> DashboardSnapshot {
        self.session.lock().await.snapshot()
    }
}

async fn refresh_and_publish(
    session: &Mutex<DashboardSession>,
    snapshots: &broadcast::Sender<DashboardSnapshot>,
) -> Result<DashboardSnapshot> {
    let mut session = session.lock().await;
    session.refresh().await?;
    let snapshot = session.snapshot();
    // 没有订阅者时发送失败，忽略
    let _ = snapshots.send(snapshot.clone());
    Ok(snapshot)
}
