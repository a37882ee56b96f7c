use std::sync::Arc;

use crate::domain::{
    errors::DomainError,
    models::{Message, MessageStatus},
    repositories::MessageRepository,
};

pub const MAX_PAGE_SIZE: usize = 100;

pub struct ListSentMessagesRequest {
    pub page: usize,
    pub limit: usize,
}

impl Default for ListSentMessagesRequest {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

#[derive(Debug)]
pub struct SentMessagesPage {
    pub messages: Vec<Message>,
    pub total_count: u64,
    pub page: usize,
    pub limit: usize,
    pub total_pages: u64,
}

pub struct ListSentMessagesUseCase {
    message_repo: Arc<dyn MessageRepository>,
}

impl ListSentMessagesUseCase {
    pub fn new(message_repo: Arc<dyn MessageRepository>) -> Self {
        Self { message_repo }
    }

    pub async fn execute(&self, request: ListSentMessagesRequest) -> anyhow::Result<SentMessagesPage> {
        let ListSentMessagesRequest { page, limit } = request;
        if page == 0 || limit == 0 || limit > MAX_PAGE_SIZE {
            return Err(DomainError::InvalidPagination(MAX_PAGE_SIZE).into());
        }
        let offset = (page - 1) * limit;

        let messages = self.message_repo.get_sent(offset, limit).await?;
        let total_count = self.message_repo.count_by_status(MessageStatus::Sent).await?;

        Ok(SentMessagesPage {
            messages,
            total_count,
            page,
            limit,
            total_pages: total_count.div_ceil(limit as u64),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::infrastructure::repositories::in_memory::InMemoryMessageRepository;

    #[tokio::test]
    async fn pages_sent_messages_newest_first() {
        let repo = Arc::new(InMemoryMessageRepository::new());
        let base = Utc::now() - Duration::hours(1);
        for i in 0..5 {
            let mut message = Message::new(format!("message {i}"), "+1234567890");
            message.mark_sent(format!("ext_{i}"));
            message.sent_at = Some(base + Duration::minutes(i));
            repo.create(&message).await.unwrap();
        }
        repo.create(&Message::new("still pending", "+1234567890")).await.unwrap();

        let use_case = ListSentMessagesUseCase::new(repo);
        let first = use_case
            .execute(ListSentMessagesRequest { page: 1, limit: 2 })
            .await
            .unwrap();

        assert_eq!(first.total_count, 5);
        assert_eq!(first.total_pages, 3);
        let ids: Vec<_> = first.messages.iter().map(|m| m.external_id.clone().unwrap()).collect();
        assert_eq!(ids, vec!["ext_4", "ext_3"]);

        let last = use_case
            .execute(ListSentMessagesRequest { page: 3, limit: 2 })
            .await
            .unwrap();
        assert_eq!(last.messages.len(), 1);
        assert_eq!(last.messages[0].external_id.as_deref(), Some("ext_0"));
    }

    #[tokio::test]
    async fn out_of_range_paging_is_rejected() {
        let repo = Arc::new(InMemoryMessageRepository::new());
        let use_case = ListSentMessagesUseCase::new(repo);

        for (page, limit) in [(0, 10), (1, 0), (1, MAX_PAGE_SIZE + 1)] {
            let err = use_case
                .execute(ListSentMessagesRequest { page, limit })
                .await
                .unwrap_err();
            assert!(matches!(
                err.downcast_ref::<DomainError>(),
                Some(DomainError::InvalidPagination(MAX_PAGE_SIZE))
            ));
        }

        let full_page = use_case
            .execute(ListSentMessagesRequest {
                page: 1,
                limit: MAX_PAGE_SIZE,
            })
            .await
            .unwrap();
        assert_eq!(full_page.total_pages, 0);
    }
}
