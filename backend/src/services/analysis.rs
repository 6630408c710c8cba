//! Snapshot analysis service
//!
//! Thin wrapper over the pure analyzer: validates the snapshot, runs the
//! rules, persists nothing.

use tracing::debug;
use vitalguard_shared::errors::ServiceError;
use vitalguard_shared::models::{AnalysisResult, VitalsSnapshot};
use vitalguard_shared::{analyzer, validation};

/// Vitals analysis service
pub struct AnalysisService;

impl AnalysisService {
    /// Validate and analyze one snapshot
    pub fn analyze(snapshot: &VitalsSnapshot) -> Result<AnalysisResult, ServiceError> {
        validation::validate_snapshot(snapshot).map_err(ServiceError::Validation)?;

        let result = analyzer::analyze(snapshot);
        debug!(
            user_id = %snapshot.user_id,
            health_score = result.health_score,
            status = ?result.status,
            alerts = result.alerts.len(),
            "snapshot analyzed"
        );
        Ok(result)
    }
}
