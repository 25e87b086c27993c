//! Reporting gateway: turns a run outcome into at most one status page update.

use async_trait::async_trait;
use serde::Serialize;

use crate::codes::CanonicalCode;
use crate::config::ComponentId;
use crate::error::GatewayError;
use crate::mapping::{reportable_status, ComponentStatus};
use crate::obs;
use crate::runner::RunOutcome;

/// The status page collaborator.
#[async_trait]
pub trait StatusPage: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Set the status of a single component.
    async fn update_component(
        &self,
        component: ComponentId,
        status: ComponentStatus,
    ) -> Result<(), Self::Error>;
}

/// What the gateway did with an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Report {
    Updated {
        component: ComponentId,
        status: ComponentStatus,
    },
    Withheld {
        code: CanonicalCode,
    },
}

/// Report an outcome to the status page.
///
/// Issues exactly one update when the outcome maps to a reportable status and
/// none otherwise. Status page failures propagate unchanged; this layer does
/// not retry.
pub async fn report<S>(
    outcome: &RunOutcome,
    component: ComponentId,
    status_page: &S,
) -> Result<Report, GatewayError>
where
    S: StatusPage + ?Sized,
{
    let Some(status) = reportable_status(outcome.code) else {
        obs::emit_update_withheld(component, outcome.code);
        return Ok(Report::Withheld { code: outcome.code });
    };

    status_page
        .update_component(component, status)
        .await
        .map_err(|source| GatewayError::StatusPage {
            component,
            source: Box::new(source),
        })?;

    obs::emit_component_updated(component, status);
    Ok(Report::Updated { component, status })
}
