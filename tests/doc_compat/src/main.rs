fn main() {
    println!("Run `cargo test -p doc-compat` to execute document compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use shiptrack_protocol::claim::ClaimedCode;
    use shiptrack_protocol::shipment::{Shipment, ShipmentStatus};

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Loads a fixture JSON file and returns it as a `serde_json::Value`.
    fn load_fixture(name: &str) -> serde_json::Value {
        let path = fixtures_dir().join(name);
        let data = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()));
        serde_json::from_str(&data)
            .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", path.display()))
    }

    /// Deserializes a fixture into a Rust type, re-serializes it, and
    /// compares the JSON values. A mismatch means the crate would corrupt
    /// documents the production database already holds.
    fn roundtrip_test<T>(name: &str)
    where
        T: serde::de::DeserializeOwned + serde::Serialize,
    {
        let fixture = load_fixture(name);
        let parsed: T = serde_json::from_value(fixture.clone())
            .unwrap_or_else(|e| panic!("failed to deserialize {name}: {e}"));
        let reserialized = serde_json::to_value(&parsed)
            .unwrap_or_else(|e| panic!("failed to re-serialize {name}: {e}"));

        assert_eq!(
            fixture, reserialized,
            "roundtrip mismatch for {name}:\n  stored: {fixture}\n  ours:   {reserialized}"
        );
    }

    // --- Shipment documents ---

    #[test]
    fn fixture_envio_roundtrip() {
        roundtrip_test::<Shipment>("envio.json");
    }

    #[test]
    fn fixture_envio_fields() {
        let fixture = load_fixture("envio.json");
        let shipment: Shipment = serde_json::from_value(fixture).unwrap();

        assert_eq!(shipment.order_number, "PO-2026-041");
        assert_eq!(shipment.client, "Electrónica Norte");
        assert_eq!(shipment.status, ShipmentStatus::InProgress);
        assert_eq!(shipment.scanned_codes.len(), 3);
        assert_eq!(shipment.due_date.timestamp_millis(), 1_767_139_200_000);
        // The body carries no id; the document key does.
        assert!(shipment.id.is_empty());
    }

    #[test]
    fn fixture_envio_legacy_defaults() {
        // Documents written before code scanning existed carry neither
        // codigosQR nor estado. They must still decode.
        let fixture = load_fixture("envio_legacy.json");
        let shipment: Shipment = serde_json::from_value(fixture).unwrap();

        assert_eq!(shipment.order_number, "PO-2024-007");
        assert!(shipment.scanned_codes.is_empty());
        assert_eq!(shipment.status, ShipmentStatus::Pending);
    }

    #[test]
    fn estado_labels_match_stored_values() {
        let labels = [
            (ShipmentStatus::Pending, "Pendiente"),
            (ShipmentStatus::InProgress, "En proceso"),
            (ShipmentStatus::Completed, "Finalizado"),
        ];
        for (status, label) in labels {
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(json, serde_json::json!(label));
        }
    }

    // --- Claimed-code documents ---

    #[test]
    fn fixture_codigo_global_roundtrip() {
        roundtrip_test::<ClaimedCode>("codigo_global.json");
    }

    #[test]
    fn fixture_codigo_global_fields() {
        let fixture = load_fixture("codigo_global.json");
        let claim: ClaimedCode = serde_json::from_value(fixture).unwrap();
        assert_eq!(claim.claimed_by, "8b3d9a4e-2f61-4c0a-9d5b-7c1e0f6a2d43");
    }

    #[test]
    fn claim_body_is_single_field() {
        let claim = ClaimedCode::new("QR-0001", "envio-1");
        let json = serde_json::to_value(&claim).unwrap();
        let body = json.as_object().unwrap();
        assert_eq!(body.len(), 1);
        assert!(body.contains_key("usadoEnEnvio"));
    }
}
