//! Response parsing and shape validation

use crate::request::ReasoningRequest;
use crate::RemoteError;
use diagnostic_report::AnalysisResult;
use std::collections::HashSet;
use tracing::debug;

/// Parse a remote response body into a validated result
///
/// The body is tried as plain JSON first. Services that wrap the JSON in
/// prose get a second chance: the outermost `{ ... }` span is parsed on its
/// own. The result must pass [`AnalysisResult::validate_for`] against the
/// number of registered readings in the request, and every issue must name
/// a distinct registered reading from the request that is out of range.
pub fn parse_analysis(body: &str, request: &ReasoningRequest<'_>) -> Result<AnalysisResult, RemoteError> {
    let result = match serde_json::from_str::<AnalysisResult>(body) {
        Ok(result) => result,
        Err(direct) => {
            let inner = outermost_object(body)
                .ok_or_else(|| RemoteError::Malformed(format!("no JSON object in response: {direct}")))?;
            debug!("Remote body is not bare JSON, parsing embedded object ({} bytes)", inner.len());
            serde_json::from_str(inner).map_err(|e| RemoteError::Malformed(e.to_string()))?
        }
    };

    result
        .validate_for(request.expected_count())
        .map_err(|e| RemoteError::Malformed(e.to_string()))?;
    check_issues(&result, request)?;
    Ok(result)
}

/// Each issue maps to exactly one measured, registered, out-of-range reading
fn check_issues(result: &AnalysisResult, request: &ReasoningRequest<'_>) -> Result<(), RemoteError> {
    let mut seen = HashSet::new();
    for issue in result.reported_issues() {
        let key = issue.key.as_str();
        if key.is_empty() {
            return Err(RemoteError::Malformed(format!("issue {} has no parameter key", issue.id)));
        }
        let spec = request
            .catalog
            .get(key)
            .ok_or_else(|| RemoteError::Malformed(format!("issue for unregistered parameter {key}")))?;
        let value = request
            .snapshot
            .get(key)
            .ok_or_else(|| RemoteError::Malformed(format!("issue for unmeasured parameter {key}")))?;
        if !spec.status_of(value).is_abnormal() {
            return Err(RemoteError::Malformed(format!("{key} = {value} is within its normal band")));
        }
        if !seen.insert(key) {
            return Err(RemoteError::Malformed(format!("more than one issue for {key}")));
        }
    }
    Ok(())
}

fn outermost_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
