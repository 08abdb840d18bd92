use arbitra_auth::Identity;
use arbitra_hearing::PartyRef;

/// Caller context for a request (the authenticated party).
///
/// Inserted by the auth middleware and present for every route except
/// `/health`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerContext {
    party: PartyRef,
}

impl CallerContext {
    pub fn new(party: PartyRef) -> Self {
        Self { party }
    }

    pub fn party(&self) -> &PartyRef {
        &self.party
    }
}

impl From<Identity> for CallerContext {
    fn from(identity: Identity) -> Self {
        Self::new(PartyRef::new(identity.party_id, identity.display_name))
    }
}
