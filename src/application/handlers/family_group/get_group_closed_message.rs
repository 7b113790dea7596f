//! GetGroupClosedMessageHandler - Query handler for a member's closed-group notice.

use std::sync::Arc;

use crate::domain::family::{FamilyGroupError, GroupClosedNotice};
use crate::domain::foundation::UserId;
use crate::ports::ClosedNoticeStore;

/// Query for the notice left when a member's group was closed.
#[derive(Debug, Clone)]
pub struct GetGroupClosedMessageQuery {
    pub member_id: UserId,
}

/// Result of a closed-notice query.
pub type GetGroupClosedMessageResult = Option<GroupClosedNotice>;

/// Handler for reading the member's unacknowledged closed-group notice.
///
/// Returns `None` when no group of theirs has closed since they last
/// acknowledged one.
pub struct GetGroupClosedMessageHandler {
    notices: Arc<dyn ClosedNoticeStore>,
}

impl GetGroupClosedMessageHandler {
    pub fn new(notices: Arc<dyn ClosedNoticeStore>) -> Self {
        Self { notices }
    }

    pub async fn handle(
        &self,
        query: GetGroupClosedMessageQuery,
    ) -> Result<GetGroupClosedMessageResult, FamilyGroupError> {
        Ok(self.notices.get(&query.member_id).await?)
    }
}
