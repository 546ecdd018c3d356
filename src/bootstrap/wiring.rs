//! # Dependency Injection / 依赖注入模块
//!
//! ## Responsibilities / 职责
//!
//! - ✅ Create infra implementations (clock, ticker, JSON stores) / 创建 infra 层具体实现
//! - ✅ Accept device services from the host shell / 接收宿主提供的设备服务
//! - ✅ Inject all dependencies into AppDeps / 将所有依赖注入到 AppDeps
//!
//! ## Prohibited / 禁止事项
//!
//! ❌ **No business logic / 禁止包含任何业务逻辑**
//!
//! > **This is the only place allowed to depend on ch-infra + ch-app simultaneously.**
//! > **这是唯一允许同时依赖 ch-infra 和 ch-app 的地方。**

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use ch_app::{AppDeps, RegistrationOrchestrator};
use ch_core::attendance::{AttendanceGeofenceRule, RuleError};
use ch_core::config::AppConfig;
use ch_core::ports::*;
use ch_core::registration::RegistrationWizardController;
use ch_infra::fs::app_data_dir::resolve_data_dir;
use ch_infra::{FileApplicationRepository, FileAttendanceRepository, IntervalResendTicker, SystemClock};

/// Capacity of the resend tick channel; ticks arrive once a second.
const TICK_CHANNEL_CAPACITY: usize = 64;

pub type WiringResult<T> = Result<T, WiringError>;

#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("Attendance policy invalid: {0}")]
    AttendancePolicy(#[from] RuleError),

    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Device services the host shell provides (GPS, camera, SMS gateway).
/// 宿主提供的设备服务（定位、相机、短信网关）。
pub struct DevicePorts {
    pub location: Arc<dyn LocationPort>,
    pub selfie: Arc<dyn SelfieCapturePort>,
    pub otp: Arc<dyn OtpServicePort>,
}

/// Wired dependencies plus the receiving end of the resend ticker.
pub struct WiredApp {
    pub deps: AppDeps,
    pub data_dir: PathBuf,
    pub resend_ticks: mpsc::Receiver<ResendTick>,
}

/// Wire all dependencies together.
/// 将所有依赖连接在一起。
///
/// # Errors / 错误
///
/// Returns `WiringError` if the attendance section is out of range or the
/// data directory cannot be resolved or created.
/// 考勤配置越界或数据目录不可用时返回 `WiringError`。
pub fn wire_dependencies(config: &AppConfig, device: DevicePorts) -> WiringResult<WiredApp> {
    // Step 1: Policy / 步骤 1：策略
    let geofence_rule = AttendanceGeofenceRule::try_from(&config.attendance)?;
    let wizard = RegistrationWizardController::from_config(&config.registration);

    // Step 2: Storage / 步骤 2：存储
    let data_dir =
        resolve_data_dir(&config.data_dir).map_err(|e| WiringError::DataDir(e.to_string()))?;
    std::fs::create_dir_all(&data_dir).map_err(|e| {
        WiringError::DataDir(format!("Failed to create {}: {e}", data_dir.display()))
    })?;
    let applications: Arc<dyn ApplicationRepositoryPort> =
        Arc::new(FileApplicationRepository::with_defaults(data_dir.clone()));
    let attendance: Arc<dyn AttendanceRepositoryPort> =
        Arc::new(FileAttendanceRepository::with_defaults(data_dir.clone()));

    // Step 3: System / 步骤 3：系统
    let (tick_tx, resend_ticks) = mpsc::channel(TICK_CHANNEL_CAPACITY);
    let resend_ticker: Arc<dyn ResendTickerPort> = Arc::new(IntervalResendTicker::new(tick_tx));
    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock);

    tracing::info!(
        data_dir = %data_dir.display(),
        max_distance_km = geofence_rule.max_distance_km(),
        resend_cooldown_secs = wizard.resend_cooldown_secs(),
        "dependencies wired"
    );

    let deps = AppDeps {
        // Device services / 设备服务
        clock,
        location: device.location,
        selfie: device.selfie,

        // Registration / 注册
        otp: device.otp,
        resend_ticker,

        // Storage / 存储
        applications,
        attendance,

        // Policy / 策略
        geofence_rule,
        wizard,
    };

    Ok(WiredApp {
        deps,
        data_dir,
        resend_ticks,
    })
}

/// Build a registration flow and spawn the pump that feeds it resend ticks.
///
/// The pump ends when the ticker's sender side is dropped with `deps`.
pub fn start_registration_flow(
    deps: &AppDeps,
    resend_ticks: mpsc::Receiver<ResendTick>,
) -> (Arc<RegistrationOrchestrator>, JoinHandle<()>) {
    let flow = Arc::new(deps.registration_orchestrator());
    let pump = tokio::spawn(flow.clone().run_event_pump(resend_ticks));
    (flow, pump)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wiring_error_display() {
        let err = WiringError::DataDir("permission denied".to_string());
        assert!(err.to_string().contains("Data directory unavailable"));
        assert!(err.to_string().contains("permission denied"));
    }

    #[test]
    fn test_policy_error_converts() {
        let err: WiringError = RuleError::NonPositiveDistance(0.0).into();
        assert!(matches!(err, WiringError::AttendancePolicy(_)));
    }
}
