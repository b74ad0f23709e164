use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current state of a shipment order.
///
/// The serialized labels are the Spanish display strings the original data
/// set uses; they double as the stored value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShipmentStatus {
    #[default]
    #[serde(rename = "Pendiente")]
    Pending,
    #[serde(rename = "En proceso")]
    InProgress,
    #[serde(rename = "Finalizado")]
    Completed,
}

impl ShipmentStatus {
    /// Returns the stored (and displayed) label for this status.
    pub fn label(&self) -> &'static str {
        match self {
            ShipmentStatus::Pending => "Pendiente",
            ShipmentStatus::InProgress => "En proceso",
            ShipmentStatus::Completed => "Finalizado",
        }
    }
}

/// A shipment order in the production workflow.
///
/// Serializes to the document **body** only: the id is the document key and
/// is filled in by the store when a document is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shipment {
    /// Unique identifier, assigned at creation, immutable thereafter.
    #[serde(skip)]
    pub id: String,
    #[serde(rename = "numeroOrden")]
    pub order_number: String,
    #[serde(rename = "cliente")]
    pub client: String,
    /// Committed delivery date, stored as a millisecond timestamp.
    #[serde(rename = "fechaCompromiso", with = "chrono::serde::ts_milliseconds")]
    pub due_date: DateTime<Utc>,
    /// Codes attached to this shipment, in scan order. Append-only from the
    /// workflow's perspective; never contains duplicates.
    #[serde(rename = "codigosQR", default)]
    pub scanned_codes: Vec<String>,
    #[serde(rename = "estado", default)]
    pub status: ShipmentStatus,
}

/// Required-field violations caught before any store call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("order number must not be empty")]
    EmptyOrderNumber,

    #[error("client must not be empty")]
    EmptyClient,
}

impl Shipment {
    /// Creates a new pending shipment with a freshly generated id.
    pub fn new(
        order_number: impl Into<String>,
        client: impl Into<String>,
        due_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            order_number: order_number.into(),
            client: client.into(),
            due_date,
            scanned_codes: Vec::new(),
            status: ShipmentStatus::default(),
        }
    }

    /// Checks the required fields. Store operations must never be invoked
    /// with a shipment that fails this check.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.order_number.trim().is_empty() {
            return Err(ValidationError::EmptyOrderNumber);
        }
        if self.client.trim().is_empty() {
            return Err(ValidationError::EmptyClient);
        }
        Ok(())
    }

    /// Returns whether the given code is already attached to this shipment.
    pub fn has_code(&self, code: &str) -> bool {
        self.scanned_codes.iter().any(|c| c == code)
    }
}
