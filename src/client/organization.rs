//! Organization resource client.

use std::sync::Arc;

use crate::client::Transport;
use crate::models::{ClientConfig, OrganizationBalance, Result};

/// Client for organization-level reads.
#[derive(Clone)]
pub struct OrganizationClient {
    transport: Arc<dyn Transport>,
    #[allow(dead_code)]
    config: ClientConfig,
}

impl OrganizationClient {
    pub fn new(transport: Arc<dyn Transport>, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    /// Current credit balance, in USD. Read-only snapshot.
    pub async fn get_credit_balance(&self) -> Result<OrganizationBalance> {
        let resp = self.transport.get("credits", &[]).await?;
        if !resp.is_success() {
            return Err(resp.into_request_failed());
        }
        resp.decode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockTransport;
    use crate::models::MeridianError;

    fn client(transport: Arc<MockTransport>) -> OrganizationClient {
        let config = ClientConfig::new("https://api.example.test", "org-1");
        OrganizationClient::new(transport, config)
    }

    #[tokio::test]
    async fn test_get_credit_balance() {
        let transport = Arc::new(MockTransport::new());
        transport.push_response(200, serde_json::json!({"credits": "12.50"}));

        let balance = client(transport.clone()).get_credit_balance().await.unwrap();
        assert_eq!(balance.credits.to_string(), "12.50");
        assert_eq!(transport.calls()[0].path, "credits");
    }

    #[tokio::test]
    async fn test_non_2xx_is_request_failed() {
        let transport = Arc::new(MockTransport::new());
        transport.push_response(500, serde_json::json!({"error": "boom"}));

        let err = client(transport).get_credit_balance().await.unwrap_err();
        assert!(matches!(err, MeridianError::RequestFailed { status: 500, .. }));
    }
}
