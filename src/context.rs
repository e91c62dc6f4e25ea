use serde::{Deserialize, Serialize};

use crate::facility::domain::BuildingId;

/// Identifies the session performing a mutating call.
///
/// Audit rows record `actor`; services that operate within one building carry
/// the scope explicitly instead of relying on process-wide state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationContext {
    pub actor: String,
    pub building_id: Option<BuildingId>,
}

impl OperationContext {
    pub fn new(actor: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            building_id: None,
        }
    }

    pub fn scoped_to(mut self, building_id: BuildingId) -> Self {
        self.building_id = Some(building_id);
        self
    }
}
