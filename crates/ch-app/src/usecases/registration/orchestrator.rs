//! Registration orchestrator.
//!
//! Holds one wizard state, feeds events through the pure controller and runs
//! the resulting [`WizardAction`]s against the OTP service, the resend ticker
//! and the membership backend.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, info_span, warn, Instrument};

use ch_core::ids::ApplicationId;
use ch_core::ports::{OtpServicePort, ResendTick, ResendTickerPort};
use ch_core::registration::{
    RegistrationWizardController, RegistrationWizardState, StepPayload, WizardAction,
    WizardContractError, WizardEvent, WizardRejection,
};

use crate::usecases::applications::{SubmitApplication, SubmitApplicationError};

#[derive(Debug, thiserror::Error)]
pub enum RegistrationFlowError {
    #[error(transparent)]
    Contract(#[from] WizardContractError),
    #[error("otp delivery failed: {0}")]
    OtpDelivery(#[source] anyhow::Error),
    #[error("otp verification failed: {0}")]
    OtpVerification(#[source] anyhow::Error),
    #[error("resend ticker failed: {0}")]
    Ticker(#[source] anyhow::Error),
    #[error("registration submission failed: {0}")]
    Submit(#[from] SubmitApplicationError),
    #[error("registration flow already torn down")]
    TornDown,
}

/// Snapshot returned to the screen after each dispatch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistrationView {
    pub state: RegistrationWizardState,
    /// Last expected refusal produced while handling the event, if any.
    pub rejection: Option<WizardRejection>,
    /// OTP box that should receive focus.
    pub focus_otp: Option<usize>,
    /// Set once the form has been handed off for approval.
    pub application_id: Option<ApplicationId>,
}

#[derive(Default)]
struct Session {
    state: RegistrationWizardState,
    application_id: Option<ApplicationId>,
    /// Generation of the ticker run this flow started, if it is still wanted.
    active_ticker: Option<u64>,
}

/// Orchestrator that drives wizard state and side effects.
pub struct RegistrationOrchestrator {
    controller: RegistrationWizardController,
    otp: Arc<dyn OtpServicePort>,
    ticker: Arc<dyn ResendTickerPort>,
    submit_application: Arc<SubmitApplication>,

    session: Mutex<Session>,
    dispatch_lock: Mutex<()>,
    torn_down: AtomicBool,
}

impl RegistrationOrchestrator {
    pub fn new(
        controller: RegistrationWizardController,
        otp: Arc<dyn OtpServicePort>,
        ticker: Arc<dyn ResendTickerPort>,
        submit_application: Arc<SubmitApplication>,
    ) -> Self {
        Self {
            controller,
            otp,
            ticker,
            submit_application,
            session: Mutex::new(Session::default()),
            dispatch_lock: Mutex::new(()),
            torn_down: AtomicBool::new(false),
        }
    }

    /// Resume a flow persisted by the screen (e.g. after the app was backgrounded).
    pub async fn restore(&self, state: RegistrationWizardState) {
        let _dispatch_guard = self.dispatch_lock.lock().await;
        self.session.lock().await.state = state;
    }

    pub async fn state(&self) -> RegistrationWizardState {
        self.session.lock().await.state.clone()
    }

    pub async fn advance(&self, payload: StepPayload) -> Result<RegistrationView, RegistrationFlowError> {
        self.dispatch(WizardEvent::Advance { payload }).await
    }

    pub async fn back(&self) -> Result<RegistrationView, RegistrationFlowError> {
        self.dispatch(WizardEvent::Back).await
    }

    pub async fn otp_digit_changed(
        &self,
        index: usize,
        value: impl Into<String>,
    ) -> Result<RegistrationView, RegistrationFlowError> {
        self.dispatch(WizardEvent::OtpDigitChanged {
            index,
            value: value.into(),
        })
        .await
    }

    pub async fn resend(&self) -> Result<RegistrationView, RegistrationFlowError> {
        self.dispatch(WizardEvent::ResendRequested).await
    }

    /// Stop the resend ticker and refuse further events.
    pub async fn teardown(&self) -> Result<(), RegistrationFlowError> {
        let _dispatch_guard = self.dispatch_lock.lock().await;
        if self.torn_down.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.session.lock().await.active_ticker = None;
        self.ticker.stop().await.map_err(RegistrationFlowError::Ticker)?;
        info!("registration flow torn down");
        Ok(())
    }

    /// Feed resend ticks into the wizard until the sender side closes.
    pub async fn run_event_pump(self: Arc<Self>, mut ticks: mpsc::Receiver<ResendTick>) {
        while let Some(tick) = ticks.recv().await {
            if let Err(err) = self.on_resend_tick(tick).await {
                warn!(error = %err, "resend tick dropped");
            }
        }
        debug!("registration event pump stopped");
    }

    /// Apply a tick from the ticker run this flow started. Ticks from a run
    /// that was stopped or replaced are ignored.
    pub async fn on_resend_tick(
        &self,
        tick: ResendTick,
    ) -> Result<RegistrationView, RegistrationFlowError> {
        let _dispatch_guard = self.dispatch_lock.lock().await;

        let active = self.session.lock().await.active_ticker;
        if active != Some(tick.generation) {
            debug!(generation = tick.generation, ?active, "stale resend tick ignored");
            return Ok(self.view(None, None).await);
        }
        self.dispatch_locked(WizardEvent::ResendTick).await
    }

    pub async fn dispatch(&self, event: WizardEvent) -> Result<RegistrationView, RegistrationFlowError> {
        // Serialize dispatches so two events never act on the same snapshot.
        let _dispatch_guard = self.dispatch_lock.lock().await;
        self.dispatch_locked(event).await
    }

    async fn dispatch_locked(
        &self,
        event: WizardEvent,
    ) -> Result<RegistrationView, RegistrationFlowError> {
        if self.torn_down.load(Ordering::SeqCst) {
            if matches!(event, WizardEvent::ResendTick) {
                debug!("resend tick after teardown ignored");
                return Ok(self.view(None, None).await);
            }
            return Err(RegistrationFlowError::TornDown);
        }

        let span = info_span!("usecase.registration_orchestrator.dispatch", event = ?event);
        async {
            let mut current = self.state().await;
            let mut pending_events = VecDeque::from([event]);
            let mut rejection = None;
            let mut focus_otp = None;

            while let Some(event) = pending_events.pop_front() {
                let is_tick = matches!(event, WizardEvent::ResendTick);
                let transition = self.controller.transition(&current, event)?;
                if !is_tick || transition.state.step() != current.step() {
                    info!(
                        from = ?current.step(),
                        to = ?transition.state.step(),
                        rejected = transition.is_rejected(),
                        "registration state transition"
                    );
                }

                let follow_up_events = self
                    .execute_actions(transition.actions, &mut focus_otp)
                    .await?;
                self.session.lock().await.state = transition.state.clone();
                current = transition.state;
                if transition.rejection.is_some() {
                    rejection = transition.rejection;
                }
                pending_events.extend(follow_up_events);
            }

            Ok(self.view(rejection, focus_otp).await)
        }
        .instrument(span)
        .await
    }

    async fn execute_actions(
        &self,
        actions: Vec<WizardAction>,
        focus_otp: &mut Option<usize>,
    ) -> Result<Vec<WizardEvent>, RegistrationFlowError> {
        let mut follow_up_events = Vec::new();
        for action in actions {
            debug!(?action, "registration executing action");
            match action {
                WizardAction::SendOtp { phone } => {
                    self.otp
                        .send_otp(&phone)
                        .await
                        .map_err(RegistrationFlowError::OtpDelivery)?;
                    info!(phone = %phone.masked(), "otp sent");
                }
                WizardAction::VerifyOtp { phone, code } => {
                    let verified = self
                        .otp
                        .verify_otp(&phone, &code)
                        .await
                        .map_err(RegistrationFlowError::OtpVerification)?;
                    follow_up_events.push(WizardEvent::VerificationResolved { verified });
                }
                WizardAction::StartResendTicker { seconds } => {
                    let generation = self
                        .ticker
                        .start(seconds)
                        .await
                        .map_err(RegistrationFlowError::Ticker)?;
                    self.session.lock().await.active_ticker = Some(generation);
                }
                WizardAction::StopResendTicker => {
                    // The wizard already zeroed its timer and ticks of this run
                    // are ignored from here on, so a failed stop is only logged.
                    self.session.lock().await.active_ticker = None;
                    if let Err(err) = self.ticker.stop().await {
                        warn!(error = %err, "resend ticker stop failed");
                    }
                }
                WizardAction::FocusOtpInput { index } => {
                    *focus_otp = Some(index);
                }
                WizardAction::SubmitRegistration { form } => {
                    let application = self.submit_application.execute(form).await?;
                    self.session.lock().await.application_id = Some(application.id);
                }
            }
        }
        Ok(follow_up_events)
    }

    async fn view(
        &self,
        rejection: Option<WizardRejection>,
        focus_otp: Option<usize>,
    ) -> RegistrationView {
        let session = self.session.lock().await;
        RegistrationView {
            state: session.state.clone(),
            rejection,
            focus_otp,
            application_id: session.application_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mockall::mock;
    use mockall::predicate::eq;

    use ch_core::ports::ApplicationRepositoryPort;
    use ch_core::registration::{BusinessInfo, PhoneNumber, WizardStep};

    use crate::usecases::applications::test_support::{
        fixed_now, form, FixedClock, InMemoryApplications,
    };

    mock! {
        pub Otp {}

        #[async_trait]
        impl OtpServicePort for Otp {
            async fn send_otp(&self, phone: &PhoneNumber) -> anyhow::Result<()>;
            async fn verify_otp(&self, phone: &PhoneNumber, code: &str) -> anyhow::Result<bool>;
        }
    }

    mock! {
        pub Ticker {}

        #[async_trait]
        impl ResendTickerPort for Ticker {
            async fn start(&self, ticks: u32) -> anyhow::Result<u64>;
            async fn stop(&self) -> anyhow::Result<()>;
        }
    }

    fn business() -> BusinessInfo {
        BusinessInfo {
            business_name: "Rao Textiles".into(),
            business_category: "Retail".into(),
            business_location: "FC Road, Pune".into(),
            ..BusinessInfo::default()
        }
    }

    fn orchestrator(
        otp: MockOtp,
        ticker: MockTicker,
        repo: Arc<InMemoryApplications>,
    ) -> RegistrationOrchestrator {
        let submit = SubmitApplication::new(repo, Arc::new(FixedClock(fixed_now())));
        RegistrationOrchestrator::new(
            RegistrationWizardController::new(30),
            Arc::new(otp),
            Arc::new(ticker),
            Arc::new(submit),
        )
    }

    async fn reach_otp_step(flow: &RegistrationOrchestrator) -> RegistrationView {
        flow.advance(StepPayload::PersonalInfo(form("9876543210").personal))
            .await
            .unwrap();
        flow.advance(StepPayload::BusinessInfo(business())).await.unwrap()
    }

    fn lenient_ticker() -> MockTicker {
        let mut ticker = MockTicker::new();
        ticker.expect_start().returning(|_| Ok(1));
        ticker.expect_stop().returning(|| Ok(()));
        ticker
    }

    #[tokio::test]
    async fn entering_otp_step_sends_code_and_starts_cooldown() {
        let mut otp = MockOtp::new();
        otp.expect_send_otp()
            .withf(|phone| phone.e164() == "+919876543210")
            .times(1)
            .returning(|_| Ok(()));
        let mut ticker = MockTicker::new();
        ticker.expect_start().with(eq(30)).times(1).returning(|_| Ok(1));

        let flow = orchestrator(otp, ticker, Arc::new(InMemoryApplications::default()));
        let view = reach_otp_step(&flow).await;

        assert_eq!(view.state.step(), WizardStep::OtpVerification);
        assert_eq!(view.state.resend_timer_seconds(), 30);
        assert!(view.state.is_resend_disabled());
        assert_eq!(view.focus_otp, Some(0));
        assert_eq!(view.rejection, None);
    }

    #[tokio::test]
    async fn invalid_personal_info_stays_and_has_no_side_effects() {
        let mut otp = MockOtp::new();
        otp.expect_send_otp().never();
        let flow = orchestrator(otp, MockTicker::new(), Arc::new(InMemoryApplications::default()));

        let view = flow
            .advance(StepPayload::PersonalInfo(form("").personal))
            .await
            .unwrap();

        assert_eq!(view.state.step(), WizardStep::PersonalInfo);
        assert!(!view.state.errors().is_empty());
        assert!(matches!(view.rejection, Some(WizardRejection::Validation { .. })));
    }

    #[tokio::test]
    async fn verified_code_submits_application_and_stops_ticker() {
        let mut otp = MockOtp::new();
        otp.expect_send_otp().returning(|_| Ok(()));
        otp.expect_verify_otp()
            .withf(|_, code| code == "123456")
            .times(1)
            .returning(|_, _| Ok(true));
        let mut ticker = MockTicker::new();
        ticker.expect_start().returning(|_| Ok(1));
        ticker.expect_stop().times(1).returning(|| Ok(()));
        let repo = Arc::new(InMemoryApplications::default());

        let flow = orchestrator(otp, ticker, repo.clone());
        reach_otp_step(&flow).await;
        flow.otp_digit_changed(0, "123456").await.unwrap();
        let view = flow.advance(StepPayload::Otp).await.unwrap();

        assert_eq!(view.state.step(), WizardStep::PendingApproval);
        assert_eq!(view.state.resend_timer_seconds(), 0);
        let id = view.application_id.expect("application submitted");
        let stored = repo.get(&id).await.unwrap().unwrap();
        assert!(stored.is_pending());
        assert_eq!(stored.phone.e164(), "+919876543210");
    }

    #[tokio::test]
    async fn rejected_code_stays_on_otp_step_with_error() {
        let mut otp = MockOtp::new();
        otp.expect_send_otp().returning(|_| Ok(()));
        otp.expect_verify_otp().returning(|_, _| Ok(false));
        let repo = Arc::new(InMemoryApplications::default());

        let flow = orchestrator(otp, lenient_ticker(), repo.clone());
        reach_otp_step(&flow).await;
        flow.otp_digit_changed(0, "000000").await.unwrap();
        let view = flow.advance(StepPayload::Otp).await.unwrap();

        assert_eq!(view.state.step(), WizardStep::OtpVerification);
        assert_eq!(view.rejection, Some(WizardRejection::VerificationFailed));
        assert_eq!(view.state.otp_digits().filled_count(), 0);
        assert_eq!(view.focus_otp, Some(0));
        assert!(view.application_id.is_none());
        assert!(repo.items.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn resend_within_cooldown_does_not_send_again() {
        let mut otp = MockOtp::new();
        otp.expect_send_otp().times(1).returning(|_| Ok(()));

        let flow = orchestrator(otp, lenient_ticker(), Arc::new(InMemoryApplications::default()));
        reach_otp_step(&flow).await;
        let view = flow.resend().await.unwrap();

        assert_eq!(
            view.rejection,
            Some(WizardRejection::ResendCooldownActive { remaining_secs: 30 })
        );
    }

    #[tokio::test]
    async fn ticks_re_enable_resend() {
        let mut otp = MockOtp::new();
        otp.expect_send_otp().times(2).returning(|_| Ok(()));

        let flow = orchestrator(otp, lenient_ticker(), Arc::new(InMemoryApplications::default()));
        reach_otp_step(&flow).await;
        for _ in 0..29 {
            flow.dispatch(WizardEvent::ResendTick).await.unwrap();
        }
        assert!(flow.state().await.is_resend_disabled());
        let view = flow.dispatch(WizardEvent::ResendTick).await.unwrap();
        assert!(!view.state.is_resend_disabled());

        let view = flow.resend().await.unwrap();
        assert_eq!(view.rejection, None);
        assert_eq!(view.state.resend_timer_seconds(), 30);
    }

    #[tokio::test]
    async fn going_back_from_otp_step_stops_ticker() {
        let mut otp = MockOtp::new();
        otp.expect_send_otp().returning(|_| Ok(()));
        let mut ticker = MockTicker::new();
        ticker.expect_start().returning(|_| Ok(1));
        ticker.expect_stop().times(1).returning(|| Ok(()));

        let flow = orchestrator(otp, ticker, Arc::new(InMemoryApplications::default()));
        reach_otp_step(&flow).await;
        let view = flow.back().await.unwrap();

        assert_eq!(view.state.step(), WizardStep::BusinessInfo);
        assert!(!view.state.is_resend_disabled());
    }

    #[tokio::test]
    async fn failed_delivery_keeps_previous_state() {
        let mut otp = MockOtp::new();
        otp.expect_send_otp()
            .returning(|_| Err(anyhow::anyhow!("sms gateway down")));

        let flow = orchestrator(otp, MockTicker::new(), Arc::new(InMemoryApplications::default()));
        flow.advance(StepPayload::PersonalInfo(form("9876543210").personal))
            .await
            .unwrap();
        let err = flow
            .advance(StepPayload::BusinessInfo(business()))
            .await
            .unwrap_err();

        assert!(matches!(err, RegistrationFlowError::OtpDelivery(_)));
        assert_eq!(flow.state().await.step(), WizardStep::BusinessInfo);
    }

    #[tokio::test]
    async fn mismatched_payload_is_contract_error() {
        let flow = orchestrator(
            MockOtp::new(),
            MockTicker::new(),
            Arc::new(InMemoryApplications::default()),
        );

        let err = flow.advance(StepPayload::Otp).await.unwrap_err();

        assert!(matches!(
            err,
            RegistrationFlowError::Contract(WizardContractError::PayloadMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn teardown_stops_ticker_and_ignores_late_ticks() {
        let mut otp = MockOtp::new();
        otp.expect_send_otp().returning(|_| Ok(()));
        let mut ticker = MockTicker::new();
        ticker.expect_start().returning(|_| Ok(1));
        ticker.expect_stop().times(1).returning(|| Ok(()));

        let flow = orchestrator(otp, ticker, Arc::new(InMemoryApplications::default()));
        reach_otp_step(&flow).await;
        flow.teardown().await.unwrap();
        flow.teardown().await.unwrap();

        let view = flow.dispatch(WizardEvent::ResendTick).await.unwrap();
        assert_eq!(view.state.resend_timer_seconds(), 30);
        assert!(matches!(
            flow.resend().await.unwrap_err(),
            RegistrationFlowError::TornDown
        ));
    }

    #[tokio::test]
    async fn event_pump_applies_ticks_until_channel_closes() {
        let mut otp = MockOtp::new();
        otp.expect_send_otp().returning(|_| Ok(()));

        let flow = Arc::new(orchestrator(
            otp,
            lenient_ticker(),
            Arc::new(InMemoryApplications::default()),
        ));
        reach_otp_step(&flow).await;

        let (tx, rx) = mpsc::channel(8);
        let pump = tokio::spawn(flow.clone().run_event_pump(rx));
        for _ in 0..3 {
            tx.send(ResendTick { generation: 1 }).await.unwrap();
        }
        drop(tx);
        pump.await.unwrap();

        assert_eq!(flow.state().await.resend_timer_seconds(), 27);
    }

    #[tokio::test]
    async fn failed_ticker_stop_still_reaches_pending_approval() {
        let mut otp = MockOtp::new();
        otp.expect_send_otp().returning(|_| Ok(()));
        otp.expect_verify_otp().times(1).returning(|_, _| Ok(true));
        let mut ticker = MockTicker::new();
        ticker.expect_start().returning(|_| Ok(1));
        ticker
            .expect_stop()
            .returning(|| Err(anyhow::anyhow!("ticker gone")));
        let repo = Arc::new(InMemoryApplications::default());

        let flow = orchestrator(otp, ticker, repo.clone());
        reach_otp_step(&flow).await;
        flow.otp_digit_changed(0, "123456").await.unwrap();
        let view = flow.advance(StepPayload::Otp).await.unwrap();

        assert_eq!(view.state.step(), WizardStep::PendingApproval);
        assert!(view.application_id.is_some());
        assert_eq!(repo.items.lock().unwrap().len(), 1);
        assert_eq!(flow.state().await.step(), WizardStep::PendingApproval);
    }

    #[tokio::test]
    async fn ticks_from_a_replaced_ticker_run_do_not_shorten_cooldown() {
        let mut otp = MockOtp::new();
        otp.expect_send_otp().times(2).returning(|_| Ok(()));
        let mut ticker = MockTicker::new();
        let mut generation = 0;
        ticker.expect_start().returning(move |_| {
            generation += 1;
            Ok(generation)
        });
        ticker.expect_stop().returning(|| Ok(()));

        let flow = orchestrator(otp, ticker, Arc::new(InMemoryApplications::default()));
        reach_otp_step(&flow).await;
        flow.on_resend_tick(ResendTick { generation: 1 }).await.unwrap();
        flow.back().await.unwrap();
        let view = flow.advance(StepPayload::BusinessInfo(business())).await.unwrap();
        assert_eq!(view.state.resend_timer_seconds(), 30);

        // Ticks the first run queued before it was stopped.
        for _ in 0..3 {
            flow.on_resend_tick(ResendTick { generation: 1 }).await.unwrap();
        }
        assert_eq!(flow.state().await.resend_timer_seconds(), 30);

        let view = flow.on_resend_tick(ResendTick { generation: 2 }).await.unwrap();
        assert_eq!(view.state.resend_timer_seconds(), 29);
    }
}
