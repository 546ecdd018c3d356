//! End-to-end: wiring → registration → admin review → attendance.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};

use ch_app::MarkAttendanceOutcome;
use ch_core::attendance::{
    AttendanceClassification, Meeting, MeetingLocation, SelfieRef, UserLocationReading,
};
use ch_core::config::AppConfig;
use ch_core::ids::{MeetingId, MemberId};
use ch_core::ports::{LocationPort, OtpServicePort, SelfieCapturePort};
use ch_core::registration::{BusinessInfo, PersonalInfo, PhoneNumber, StepPayload, WizardStep};
use communityhub_lib::bootstrap::{start_registration_flow, wire_dependencies, DevicePorts, WiringError};

const VENUE: (f64, f64) = (18.5204, 73.8567);
const ACCEPTED_CODE: &str = "246810";

#[derive(Default)]
struct FakeSms {
    sent: Mutex<Vec<String>>,
}

#[async_trait]
impl OtpServicePort for FakeSms {
    async fn send_otp(&self, phone: &PhoneNumber) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(phone.e164());
        Ok(())
    }

    async fn verify_otp(&self, _phone: &PhoneNumber, code: &str) -> anyhow::Result<bool> {
        Ok(code == ACCEPTED_CODE)
    }
}

struct AtVenue;

#[async_trait]
impl LocationPort for AtVenue {
    async fn current_reading(&self) -> anyhow::Result<UserLocationReading> {
        Ok(UserLocationReading {
            latitude: VENUE.0 + 0.001,
            longitude: VENUE.1,
            captured_at: Utc::now(),
        })
    }
}

struct FrontCamera;

#[async_trait]
impl SelfieCapturePort for FrontCamera {
    async fn capture(
        &self,
        meeting_id: &MeetingId,
        member_id: &MemberId,
    ) -> anyhow::Result<Option<SelfieRef>> {
        Ok(Some(SelfieRef {
            uri: format!("selfies/{meeting_id}/{member_id}.jpg"),
            captured_at: Utc::now(),
        }))
    }
}

fn device(sms: Arc<FakeSms>) -> DevicePorts {
    DevicePorts {
        location: Arc::new(AtVenue),
        selfie: Arc::new(FrontCamera),
        otp: sms,
    }
}

fn config(data_dir: &Path) -> AppConfig {
    AppConfig::with_data_dir(data_dir.to_path_buf())
}

#[tokio::test]
async fn member_registers_gets_approved_and_checks_in() {
    let data_dir = tempfile::tempdir().unwrap();
    let sms = Arc::new(FakeSms::default());
    let app = wire_dependencies(&config(data_dir.path()), device(sms.clone())).unwrap();
    let (flow, _pump) = start_registration_flow(&app.deps, app.resend_ticks);

    // Registration
    flow.advance(StepPayload::PersonalInfo(PersonalInfo {
        name: "Asha Rao".into(),
        country_code: "+91".into(),
        phone_number: "98765 43210".into(),
        email: Some("asha@example.com".into()),
        group: "Pune Central".into(),
    }))
    .await
    .unwrap();
    let view = flow
        .advance(StepPayload::BusinessInfo(BusinessInfo {
            business_name: "Rao Textiles".into(),
            business_category: "Retail".into(),
            business_location: "FC Road, Pune".into(),
            ..BusinessInfo::default()
        }))
        .await
        .unwrap();
    assert_eq!(view.state.step(), WizardStep::OtpVerification);
    assert_eq!(sms.sent.lock().unwrap().as_slice(), ["+919876543210"]);

    flow.otp_digit_changed(0, "111111").await.unwrap();
    let view = flow.advance(StepPayload::Otp).await.unwrap();
    assert_eq!(view.state.step(), WizardStep::OtpVerification);
    assert!(view.rejection.is_some());

    flow.otp_digit_changed(0, ACCEPTED_CODE).await.unwrap();
    let view = flow.advance(StepPayload::Otp).await.unwrap();
    assert_eq!(view.state.step(), WizardStep::PendingApproval);
    let application_id = view.application_id.expect("application submitted");
    flow.teardown().await.unwrap();

    // Admin review
    let review = app.deps.review_application();
    let pending = review.list_pending().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, application_id);
    let member_id = review.approve(&application_id).await.unwrap();
    assert!(review.list_pending().await.unwrap().is_empty());

    // Attendance
    let meeting = Meeting {
        id: MeetingId::from("weekly-42"),
        title: "Weekly chapter meeting".into(),
        location: MeetingLocation {
            latitude: VENUE.0,
            longitude: VENUE.1,
            start_time: Utc::now() - Duration::minutes(5),
        },
    };
    let outcome = app
        .deps
        .mark_attendance()
        .execute(&meeting, &member_id)
        .await
        .unwrap();
    let MarkAttendanceOutcome::Recorded(record) = outcome else {
        panic!("expected attendance to be recorded, got {outcome:?}");
    };
    assert_eq!(record.classification, AttendanceClassification::OnTime);
    assert!(data_dir.path().join("attendance.json").exists());
    assert!(data_dir.path().join("applications.json").exists());
}

#[tokio::test]
async fn second_application_for_same_phone_is_refused_while_pending() {
    let data_dir = tempfile::tempdir().unwrap();
    let app = wire_dependencies(&config(data_dir.path()), device(Arc::new(FakeSms::default())))
        .unwrap();
    let form = ch_core::registration::RegisterFormData {
        personal: PersonalInfo {
            name: "Asha Rao".into(),
            country_code: "+91".into(),
            phone_number: "9876543210".into(),
            email: None,
            group: "Pune Central".into(),
        },
        ..Default::default()
    };

    let submit = app.deps.submit_application();
    submit.execute(form.clone()).await.unwrap();

    assert!(submit.execute(form).await.is_err());
}

#[test]
fn wiring_rejects_out_of_range_policy() {
    let data_dir = tempfile::tempdir().unwrap();
    let mut config = config(data_dir.path());
    config.attendance.max_distance_km = 0.0;

    let result = wire_dependencies(&config, device(Arc::new(FakeSms::default())));

    assert!(matches!(result, Err(WiringError::AttendancePolicy(_))));
}
