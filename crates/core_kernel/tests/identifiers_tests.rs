//! Unit tests for the Identifiers module
//!
//! Tests cover creation, parsing, conversion, ordering and display
//! formatting of the identifier newtypes.

use core_kernel::{ClaimId, VenueId, UserId, AdminId, RelationshipId, ReconciliationId};
use uuid::Uuid;

mod claim_id_tests {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        let id1 = ClaimId::new();
        let id2 = ClaimId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_new_v7_generates_time_ordered_ids() {
        let id1 = ClaimId::new_v7();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = ClaimId::new_v7();
        assert!(id1 < id2);
    }

    #[test]
    fn test_prefix() {
        assert_eq!(ClaimId::prefix(), "CLM");
    }

    #[test]
    fn test_roundtrip() {
        let original = ClaimId::new();
        let parsed: ClaimId = original.to_string().parse().unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_json_serialization_is_bare_uuid() {
        let id = ClaimId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_uuid()));
        let deserialized: ClaimId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}

mod venue_and_actor_ids {
    use super::*;

    #[test]
    fn test_prefixes() {
        assert_eq!(VenueId::prefix(), "VEN");
        assert_eq!(UserId::prefix(), "USR");
        assert_eq!(AdminId::prefix(), "ADM");
        assert_eq!(RelationshipId::prefix(), "REL");
        assert_eq!(ReconciliationId::prefix(), "RCN");
    }

    #[test]
    fn test_display_format() {
        assert!(VenueId::new().to_string().starts_with("VEN-"));
        assert!(AdminId::new().to_string().starts_with("ADM-"));
    }

    #[test]
    fn test_same_uuid_different_types() {
        let uuid = Uuid::new_v4();
        let user = UserId::from_uuid(uuid);
        let admin = AdminId::from_uuid(uuid);
        assert_eq!(user.as_uuid(), admin.as_uuid());
        assert_ne!(user.to_string(), admin.to_string());
    }

    #[test]
    fn test_invalid_string_rejected() {
        assert!("VEN-not-a-uuid".parse::<VenueId>().is_err());
        assert!("".parse::<UserId>().is_err());
    }
}

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn uuid_strategy() -> impl Strategy<Value = Uuid> {
        any::<u128>().prop_map(Uuid::from_u128)
    }

    proptest! {
        #[test]
        fn prop_display_parses_back(uuid in uuid_strategy()) {
            let id = ClaimId::from_uuid(uuid);
            let parsed: ClaimId = id.to_string().parse().unwrap();
            prop_assert_eq!(parsed, id);
        }

        #[test]
        fn prop_bare_uuid_parses(uuid in uuid_strategy()) {
            let parsed: VenueId = uuid.to_string().parse().unwrap();
            prop_assert_eq!(parsed.as_uuid(), &uuid);
        }

        #[test]
        fn prop_json_is_transparent(uuid in uuid_strategy()) {
            let id = ReconciliationId::from_uuid(uuid);
            let json = serde_json::to_value(id).unwrap();
            prop_assert_eq!(json, serde_json::Value::String(uuid.to_string()));
        }

        #[test]
        fn prop_prefix_matches_type(uuid in uuid_strategy()) {
            prop_assert!(UserId::from_uuid(uuid).to_string().starts_with("USR-"));
            prop_assert!(AdminId::from_uuid(uuid).to_string().starts_with("ADM-"));
            prop_assert!(RelationshipId::from_uuid(uuid).to_string().starts_with("REL-"));
        }
    }
}
