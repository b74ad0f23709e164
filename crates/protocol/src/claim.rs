use serde::{Deserialize, Serialize};

/// A scan code bound to exactly one shipment, globally unique.
///
/// Stored keyed by the code value itself, so the body carries only the
/// owning shipment id. Created the instant a claim succeeds and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimedCode {
    /// The scanned string value; the document key, not part of the body.
    #[serde(skip)]
    pub code: String,
    /// Id of the shipment that owns this code (non-owning reference).
    #[serde(rename = "usadoEnEnvio")]
    pub claimed_by: String,
}

impl ClaimedCode {
    /// Creates a claim record for `code` owned by `shipment_id`.
    pub fn new(code: impl Into<String>, shipment_id: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            claimed_by: shipment_id.into(),
        }
    }
}

/// Outcome of a claim attempt against the code registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimResult {
    /// The code was unclaimed and now belongs to the requesting shipment.
    Claimed,
    /// The code already belongs to another shipment; nothing was mutated.
    AlreadyClaimed {
        /// Id of the shipment that holds the claim.
        existing_owner: String,
    },
}

impl ClaimResult {
    /// Returns `true` for the successful-claim outcome.
    pub fn is_claimed(&self) -> bool {
        matches!(self, ClaimResult::Claimed)
    }
}
