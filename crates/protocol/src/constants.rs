//! Collection names in the backing document database.

/// Collection holding shipment records, keyed by shipment id.
pub const SHIPMENTS_COLLECTION: &str = "envios";

/// Collection holding claimed codes, keyed by the code value itself.
pub const CODES_COLLECTION: &str = "codigosQRGlobales";
