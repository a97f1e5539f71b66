//! Reasoning Service Trait

use crate::request::ReasoningRequest;
use crate::RemoteError;
use async_trait::async_trait;
use diagnostic_report::AnalysisResult;
use std::time::Duration;

/// An external service able to diagnose a snapshot
///
/// Implementations return only fully validated results; anything that
/// fails the shape check is reported as [`RemoteError::Malformed`].
#[async_trait]
pub trait ReasoningService: Send + Sync {
    /// Diagnose one snapshot within `deadline`
    async fn query(
        &self,
        request: &ReasoningRequest<'_>,
        deadline: Duration,
    ) -> Result<AnalysisResult, RemoteError>;

    /// Service name for status reporting
    fn name(&self) -> &str;
}
