use serde::{Deserialize, Serialize};

use arbitra_core::PartyId;

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub party_id: PartyId,
    pub display_name: String,
}

impl Identity {
    pub fn new(party_id: PartyId, display_name: impl Into<String>) -> Self {
        Self {
            party_id,
            display_name: display_name.into(),
        }
    }
}
