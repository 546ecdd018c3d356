use async_trait::async_trait;

use crate::attendance::AttendanceRecord;
use crate::ids::{MeetingId, MemberId};

#[async_trait]
pub trait AttendanceRepositoryPort: Send + Sync {
    async fn save(&self, record: &AttendanceRecord) -> anyhow::Result<()>;

    async fn find(
        &self,
        meeting_id: &MeetingId,
        member_id: &MemberId,
    ) -> anyhow::Result<Option<AttendanceRecord>>;

    async fn list_for_meeting(&self, meeting_id: &MeetingId)
        -> anyhow::Result<Vec<AttendanceRecord>>;
}
