//! DropGroupClosedMessageHandler - Command handler acknowledging a closed-group notice.

use std::sync::Arc;

use crate::domain::family::FamilyGroupError;
use crate::domain::foundation::UserId;
use crate::ports::ClosedNoticeStore;

/// Command to acknowledge (and so delete) the member's closed-group notice.
#[derive(Debug, Clone)]
pub struct DropGroupClosedMessageCommand {
    pub member_id: UserId,
}

/// Handler deleting the member's closed-group notice.
///
/// Acknowledging twice is fine; deleting an absent notice succeeds.
pub struct DropGroupClosedMessageHandler {
    notices: Arc<dyn ClosedNoticeStore>,
}

impl DropGroupClosedMessageHandler {
    pub fn new(notices: Arc<dyn ClosedNoticeStore>) -> Self {
        Self { notices }
    }

    pub async fn handle(
        &self,
        cmd: DropGroupClosedMessageCommand,
    ) -> Result<(), FamilyGroupError> {
        Ok(self.notices.delete(&cmd.member_id).await?)
    }
}
