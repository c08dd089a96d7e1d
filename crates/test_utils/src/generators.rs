//! Property-Based Test Generators
//!
//! Provides proptest strategies for claim form data and evidence files.

use domain_claims::{BusinessRole, ClaimDetails, EvidenceFile};
use proptest::prelude::*;

/// Strategy for business roles
pub fn business_role_strategy() -> impl Strategy<Value = BusinessRole> {
    prop_oneof![
        Just(BusinessRole::Owner),
        Just(BusinessRole::Manager),
        Just(BusinessRole::AuthorizedRepresentative),
    ]
}

/// Strategy for non-blank single-line text
pub fn non_blank_text_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 ,.'-]{0,40}"
}

/// Strategy for plausible email addresses
pub fn email_strategy() -> impl Strategy<Value = String> {
    ("[a-z]{1,12}", "[a-z]{1,12}").prop_map(|(user, host)| format!("{}@{}.test", user, host))
}

/// Strategy for claim details that pass submission validation
pub fn claim_details_strategy() -> impl Strategy<Value = ClaimDetails> {
    (
        non_blank_text_strategy(),
        email_strategy(),
        "[0-9+ -]{3,16}",
        business_role_strategy(),
        non_blank_text_strategy(),
        proptest::option::of(non_blank_text_strategy()),
    )
        .prop_map(
            |(business_name, business_email, business_phone, business_role, claim_reason, additional_info)| {
                ClaimDetails {
                    business_name,
                    business_email,
                    business_phone: format!("5{}", business_phone),
                    business_role,
                    claim_reason,
                    additional_info,
                }
            },
        )
}

/// Strategy for upload file names, including hostile ones
pub fn upload_name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{1,20}\\.(pdf|png|jpg)",
        "(\\.\\./){1,3}[a-z]{1,10}\\.pdf",
        "[a-z ]{1,10}/[a-z]{1,10}\\.pdf",
        "\\.{1,3}[a-z]{0,5}",
        ".{0,150}",
    ]
}

/// Strategy for evidence lists within the given limits
pub fn evidence_files_strategy(max_files: usize, max_bytes: usize) -> impl Strategy<Value = Vec<EvidenceFile>> {
    proptest::collection::vec(
        ("[a-z]{1,12}\\.pdf", proptest::collection::vec(any::<u8>(), 1..=max_bytes.max(1))),
        1..=max_files.max(1),
    )
    .prop_map(|files| {
        files
            .into_iter()
            .map(|(name, bytes)| EvidenceFile::new(name, bytes))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_claims::adapters::local_evidence::sanitize_file_name;

    proptest! {
        #[test]
        fn test_generated_details_are_complete(details in claim_details_strategy()) {
            prop_assert!(!details.business_name.trim().is_empty());
            prop_assert!(details.business_email.contains('@'));
            prop_assert!(!details.business_phone.trim().is_empty());
            prop_assert!(!details.claim_reason.trim().is_empty());
        }

        #[test]
        fn test_evidence_respects_limits(files in evidence_files_strategy(3, 16)) {
            prop_assert!(!files.is_empty() && files.len() <= 3);
            prop_assert!(files.iter().all(|f| !f.bytes.is_empty() && f.bytes.len() <= 16));
        }

        #[test]
        fn test_sanitized_upload_names_stay_in_claim_dir(name in upload_name_strategy()) {
            let cleaned = sanitize_file_name(&name);
            prop_assert!(!cleaned.is_empty());
            prop_assert!(!cleaned.contains('/') && !cleaned.contains('\\'));
            prop_assert!(!cleaned.starts_with('.'));
            prop_assert!(cleaned.len() <= 100);
        }
    }
}
