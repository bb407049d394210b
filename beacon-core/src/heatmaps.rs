//! Heatmap and session-recording initialization

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use crate::hooks::{CLARITY, HOTJAR, HookRegistry};

/// Visitor attributes reported to the session recorders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitorProfile {
    pub user_id: String,
    pub plan: String,
    pub signup_date: DateTime<Utc>,
    pub page_type: String,
    pub user_type: String,
}

impl VisitorProfile {
    /// Anonymous landing-page visitor on the free plan.
    pub fn anonymous() -> Self {
        Self {
            user_id: Uuid::new_v4().to_string(),
            plan: "free".to_string(),
            signup_date: Utc::now(),
            page_type: "landing_page".to_string(),
            user_type: "visitor".to_string(),
        }
    }
}

/// Identify the visitor with Hotjar and tag the session in Clarity.
///
/// Recorders that are not present are skipped; failures are logged.
pub fn initialize_heatmaps(hooks: &HookRegistry, profile: &VisitorProfile) {
    let identify = [
        json!("identify"),
        json!(profile.user_id),
        json!({
            "plan": profile.plan,
            "signup_date": profile.signup_date.to_rfc3339_opts(SecondsFormat::Millis, true),
        }),
    ];
    if let Err(e) = hooks.call_if_present(HOTJAR, &identify) {
        warn!(error = %e, "Hotjar identify failed");
    }

    for (key, value) in [
        ("page_type", &profile.page_type),
        ("user_type", &profile.user_type),
    ] {
        if let Err(e) = hooks.call_if_present(CLARITY, &[json!("set"), json!(key), json!(value)]) {
            warn!(error = %e, key, "Clarity tag failed");
        }
    }
}
