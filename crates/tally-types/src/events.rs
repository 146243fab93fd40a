use serde::{Deserialize, Serialize};

use crate::models::FeatureView;

/// Events sent over the WebSocket gateway. The payload is the same JSON
/// shape as the corresponding REST read view.
///
/// There is no replay: clients that connect after an event was sent must
/// rely on the `GET /features` snapshot taken at connect time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum GatewayEvent {
    /// A new feature was registered.
    FeatureCreated(FeatureView),

    /// A feature received an upvote. `has_voted` is always `false` here:
    /// recipients must not inherit the acting voter's relative state.
    FeatureUpvoted(FeatureView),
}
