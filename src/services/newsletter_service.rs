use std::sync::Arc;

use tracing::info;

use crate::errors::{AffilinkError, Result};
use crate::storage::{SeaOrmStorage, Subscriber, SubscriberStatus};
use crate::utils::is_valid_email;

/// 订阅结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscribeOutcome {
    /// 新订阅者
    Created(Subscriber),
    /// 之前退订过，重新订阅
    Resubscribed(Subscriber),
}

impl SubscribeOutcome {
    pub fn subscriber(&self) -> &Subscriber {
        match self {
            SubscribeOutcome::Created(s) | SubscribeOutcome::Resubscribed(s) => s,
        }
    }
}

/// 邮箱统一去空白并转小写后再比较
pub fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(AffilinkError::validation("Invalid email format"));
    }
    Ok(email)
}

pub struct NewsletterService {
    storage: Arc<SeaOrmStorage>,
}

impl NewsletterService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub async fn subscribe(
        &self,
        email: &str,
        full_name: Option<String>,
    ) -> Result<SubscribeOutcome> {
        let email = normalize_email(email)?;
        let full_name = full_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        match self.storage.find_subscriber(&email).await? {
            Some(existing) if existing.status == SubscriberStatus::Subscribed => Err(
                AffilinkError::conflict("This email is already subscribed"),
            ),
            Some(_) => {
                let subscriber = self
                    .storage
                    .resubscribe(&email, full_name)
                    .await?;
                info!("NewsletterService: {} resubscribed", subscriber.id);
                Ok(SubscribeOutcome::Resubscribed(subscriber))
            }
            None => {
                let subscriber = self.storage.insert_subscriber(&email, full_name).await?;
                info!("NewsletterService: new subscriber {}", subscriber.id);
                Ok(SubscribeOutcome::Created(subscriber))
            }
        }
    }

    pub async fn unsubscribe(&self, email: &str) -> Result<Subscriber> {
        let email = normalize_email(email)?;
        let subscriber = self
            .storage
            .set_subscriber_status(&email, SubscriberStatus::Unsubscribed)
            .await?;
        info!("NewsletterService: {} unsubscribed", subscriber.id);
        Ok(subscriber)
    }

    pub async fn list_subscribers(&self) -> Result<Vec<Subscriber>> {
        self.storage.list_subscribers().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(
            normalize_email("  Jane.Doe@Example.COM ").unwrap(),
            "jane.doe@example.com"
        );
    }

    #[test]
    fn test_normalize_rejects_invalid() {
        for bad in ["", "jane", "jane@example", "jane doe@example.com", "@example.com"] {
            let err = normalize_email(bad).unwrap_err();
            assert!(matches!(err, AffilinkError::Validation(_)), "{}", bad);
        }
    }
}
