use std::sync::Arc;

use crate::domain::{models::MessageStatus, repositories::MessageRepository};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageStats {
    pub total: u64,
    pub pending: u64,
    pub sent: u64,
    pub failed: u64,
}

pub struct MessageStatsUseCase {
    message_repo: Arc<dyn MessageRepository>,
}

impl MessageStatsUseCase {
    pub fn new(message_repo: Arc<dyn MessageRepository>) -> Self {
        Self { message_repo }
    }

    pub async fn execute(&self) -> anyhow::Result<MessageStats> {
        let pending = self.message_repo.count_by_status(MessageStatus::Pending).await?;
        let sent = self.message_repo.count_by_status(MessageStatus::Sent).await?;
        let failed = self.message_repo.count_by_status(MessageStatus::Failed).await?;

        Ok(MessageStats {
            total: pending + sent + failed,
            pending,
            sent,
            failed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::models::Message, infrastructure::repositories::in_memory::InMemoryMessageRepository,
    };

    #[tokio::test]
    async fn counts_each_status() {
        let repo = Arc::new(InMemoryMessageRepository::new());
        repo.create(&Message::new("a", "+1")).await.unwrap();
        let mut sent = Message::new("b", "+2");
        sent.mark_sent("ext_b");
        repo.create(&sent).await.unwrap();
        let mut failed = Message::new("c", "+3");
        failed.mark_failed("boom");
        repo.create(&failed).await.unwrap();
        repo.create(&Message::new("d", "+4")).await.unwrap();

        let stats = MessageStatsUseCase::new(repo).execute().await.unwrap();

        assert_eq!(
            stats,
            MessageStats {
                total: 4,
                pending: 2,
                sent: 1,
                failed: 1,
            }
        );
    }
}
