use crate::auditor::{AuditorClient, AuditorError};
use async_trait::async_trait;
use serde_json::Value;

/// Read access to the six auditor collections.
///
/// Records come back raw; the orchestrator classifies them. Implementations
/// must be safe to call concurrently, since a cycle issues all six fetches at
/// once.
#[async_trait]
pub trait AuditDataSource: Send + Sync {
	async fn audited_mints(&self) -> Result<Vec<Value>, AuditorError>;

	async fn audited_burns(&self) -> Result<Vec<Value>, AuditorError>;

	async fn unaudited_mints(&self) -> Result<Vec<Value>, AuditorError>;

	async fn unaudited_burns(&self) -> Result<Vec<Value>, AuditorError>;

	async fn unaudited_deposits(&self) -> Result<Vec<Value>, AuditorError>;

	async fn unaudited_withdrawals(&self) -> Result<Vec<Value>, AuditorError>;

	/// Get the name of this source for logging
	fn name(&self) -> &'static str;
}

#[async_trait]
impl AuditDataSource for AuditorClient {
	async fn audited_mints(&self) -> Result<Vec<Value>, AuditorError> {
		AuditorClient::audited_mints(self).await
	}

	async fn audited_burns(&self) -> Result<Vec<Value>, AuditorError> {
		AuditorClient::audited_burns(self).await
	}

	async fn unaudited_mints(&self) -> Result<Vec<Value>, AuditorError> {
		AuditorClient::unaudited_mints(self).await
	}

	async fn unaudited_burns(&self) -> Result<Vec<Value>, AuditorError> {
		AuditorClient::unaudited_burns(self).await
	}

	async fn unaudited_deposits(&self) -> Result<Vec<Value>, AuditorError> {
		AuditorClient::unaudited_deposits(self).await
	}

	async fn unaudited_withdrawals(&self) -> Result<Vec<Value>, AuditorError> {
		AuditorClient::unaudited_withdrawals(self).await
	}

	fn name(&self) -> &'static str {
		"AuditorClient"
	}
}
