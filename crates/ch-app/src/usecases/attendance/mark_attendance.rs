//! Geofenced, selfie-confirmed check-in.
//!
//! ```text
//! clock ──► check-in window ──► location fix ──► GeofenceAttendanceEvaluator
//!                                                     │ allowed
//!                                                     ▼
//!                                  duplicate check ──► selfie ──► persist
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, info_span, warn, Instrument};

use ch_core::attendance::{
    AttendanceDecision, AttendanceError, AttendanceGeofenceRule, AttendanceRecord,
    GeofenceAttendanceEvaluator, Meeting,
};
use ch_core::ids::MemberId;
use ch_core::ports::{AttendanceRepositoryPort, ClockPort, LocationPort, SelfieCapturePort};

#[derive(Debug, thiserror::Error)]
pub enum MarkAttendanceError {
    #[error("check-in opens at {opens_at}")]
    CheckInNotOpen { opens_at: DateTime<Utc> },
    #[error("attendance already marked for this meeting")]
    AlreadyMarked(Box<AttendanceRecord>),
    #[error(transparent)]
    InvalidInput(#[from] AttendanceError),
    #[error("location unavailable: {0}")]
    Location(#[source] anyhow::Error),
    #[error("selfie capture failed: {0}")]
    Selfie(#[source] anyhow::Error),
    #[error("attendance storage failed: {0}")]
    Repository(#[source] anyhow::Error),
}

/// What happened to an attendance attempt that did not fail outright.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkAttendanceOutcome {
    Recorded(AttendanceRecord),
    /// Geofence said no; the decision carries distance and reason.
    Refused(AttendanceDecision),
    /// Geofence said yes but the member closed the camera.
    SelfieCancelled(AttendanceDecision),
}

pub struct MarkAttendance {
    clock: Arc<dyn ClockPort>,
    location: Arc<dyn LocationPort>,
    selfie: Arc<dyn SelfieCapturePort>,
    records: Arc<dyn AttendanceRepositoryPort>,
    rule: AttendanceGeofenceRule,
}

impl MarkAttendance {
    pub fn new(
        clock: Arc<dyn ClockPort>,
        location: Arc<dyn LocationPort>,
        selfie: Arc<dyn SelfieCapturePort>,
        records: Arc<dyn AttendanceRepositoryPort>,
        rule: AttendanceGeofenceRule,
    ) -> Self {
        Self {
            clock,
            location,
            selfie,
            records,
            rule,
        }
    }

    /// Evaluate the current position without recording anything.
    ///
    /// Backs the distance banner on the meeting screen.
    pub async fn preview(&self, meeting: &Meeting) -> Result<AttendanceDecision, MarkAttendanceError> {
        let reading = self
            .location
            .current_reading()
            .await
            .map_err(MarkAttendanceError::Location)?;
        let decision = GeofenceAttendanceEvaluator::evaluate(
            &meeting.location,
            &reading,
            &self.rule,
            self.clock.now(),
        )?;
        Ok(decision)
    }

    pub async fn execute(
        &self,
        meeting: &Meeting,
        member_id: &MemberId,
    ) -> Result<MarkAttendanceOutcome, MarkAttendanceError> {
        let span = info_span!(
            "usecase.mark_attendance.execute",
            meeting_id = %meeting.id,
            member_id = %member_id
        );
        async {
            let opens_at = meeting
                .location
                .start_time
                .checked_sub_signed(self.rule.early_window())
                .unwrap_or(DateTime::<Utc>::MIN_UTC);
            if self.clock.now() < opens_at {
                debug!(%opens_at, "check-in not open yet");
                return Err(MarkAttendanceError::CheckInNotOpen { opens_at });
            }

            if let Some(existing) = self
                .records
                .find(&meeting.id, member_id)
                .await
                .map_err(MarkAttendanceError::Repository)?
            {
                return Err(MarkAttendanceError::AlreadyMarked(Box::new(existing)));
            }

            let decision = self.preview(meeting).await?;
            let Some(classification) = decision.classification.filter(|_| decision.allowed) else {
                warn!(
                    distance_km = decision.distance_km,
                    reason = decision.reason.map(|r| r.as_str()),
                    "attendance refused"
                );
                return Ok(MarkAttendanceOutcome::Refused(decision));
            };

            let Some(selfie) = self
                .selfie
                .capture(&meeting.id, member_id)
                .await
                .map_err(MarkAttendanceError::Selfie)?
            else {
                info!("selfie dismissed, attendance not recorded");
                return Ok(MarkAttendanceOutcome::SelfieCancelled(decision));
            };

            let record = AttendanceRecord {
                meeting_id: meeting.id.clone(),
                member_id: member_id.clone(),
                classification,
                distance_km: decision.distance_km,
                marked_at: self.clock.now(),
                selfie,
            };
            self.records
                .save(&record)
                .await
                .map_err(MarkAttendanceError::Repository)?;

            info!(
                classification = ?record.classification,
                distance_km = record.distance_km,
                "attendance recorded"
            );
            Ok(MarkAttendanceOutcome::Recorded(record))
        }
        .instrument(span)
        .await
    }
}
