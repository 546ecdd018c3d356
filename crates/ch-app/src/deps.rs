//! # Application Dependencies / 应用依赖
//!
//! Dependency grouping for use-case construction.
//! 用例构造所需的依赖分组。
//!
//! **Note / 注意**: This is NOT a Builder pattern. No defaults, no hidden logic,
//! just parameter grouping.

use std::sync::Arc;

use ch_core::attendance::AttendanceGeofenceRule;
use ch_core::ports::*;
use ch_core::registration::RegistrationWizardController;

use crate::usecases::{MarkAttendance, RegistrationOrchestrator, ReviewApplication, SubmitApplication};

/// Application dependency grouping (non-Builder, just parameter grouping)
/// 应用依赖分组（非 Builder，仅参数打包）
pub struct AppDeps {
    // Device services / 设备服务
    pub clock: Arc<dyn ClockPort>,
    pub location: Arc<dyn LocationPort>,
    pub selfie: Arc<dyn SelfieCapturePort>,

    // Registration / 注册
    pub otp: Arc<dyn OtpServicePort>,
    pub resend_ticker: Arc<dyn ResendTickerPort>,

    // Storage / 存储
    pub applications: Arc<dyn ApplicationRepositoryPort>,
    pub attendance: Arc<dyn AttendanceRepositoryPort>,

    // Policy / 策略
    pub geofence_rule: AttendanceGeofenceRule,
    pub wizard: RegistrationWizardController,
}

impl AppDeps {
    pub fn submit_application(&self) -> SubmitApplication {
        SubmitApplication::new(self.applications.clone(), self.clock.clone())
    }

    pub fn review_application(&self) -> ReviewApplication {
        ReviewApplication::new(self.applications.clone(), self.clock.clone())
    }

    pub fn mark_attendance(&self) -> MarkAttendance {
        MarkAttendance::new(
            self.clock.clone(),
            self.location.clone(),
            self.selfie.clone(),
            self.attendance.clone(),
            self.geofence_rule,
        )
    }

    /// A new wizard instance. Each mounted sign-up screen owns one.
    pub fn registration_orchestrator(&self) -> RegistrationOrchestrator {
        RegistrationOrchestrator::new(
            self.wizard.clone(),
            self.otp.clone(),
            self.resend_ticker.clone(),
            Arc::new(self.submit_application()),
        )
    }
}
