//! Shared test utilities for domain and app tests
//!
//! - `TestDataBuilder`: deterministic identities, names and store rows
//! - `assertions`: assertion helpers with contextual messages
//!
//! ```rust
//! use test_utils::TestDataBuilder;
//!
//! let builder = TestDataBuilder::from_test_name("test_save_scholarship");
//! let user_id = builder.user_id();
//! let row = builder.scholarship_row(1, "Merit", "$1,000");
//! assert_eq!(row["id"], 1);
//! ```

use serde_json::{Value, json};
use uuid::Uuid;

/// Builder for test data seeded from a number or a test name.
///
/// The same seed always yields the same data, so failures reproduce.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed from a hash of the test name.
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// UUID-formatted user id, as issued by the hosted auth service.
    pub fn user_id(&self) -> String {
        let bytes = self.seed.to_le_bytes();
        let mut uuid_bytes = [0u8; 16];
        uuid_bytes[..8].copy_from_slice(&bytes);
        uuid_bytes[8..16].copy_from_slice(&bytes);
        Uuid::from_bytes(uuid_bytes).to_string()
    }

    /// Opaque bearer token for request headers.
    pub fn bearer_token(&self) -> String {
        format!("test-token-{}", self.seed)
    }

    /// e.g. `test-award-12345-nursing`
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// A `scholarships` row as the store returns it.
    pub fn scholarship_row(&self, id: i64, award_type: &str, funds: &str) -> Value {
        json!({
            "id": id,
            "award_name": self.name("award", &id.to_string()),
            "organization": "Test Foundation",
            "level_of_study": ["Undergraduate"],
            "award_type": award_type,
            "purpose": "Support students in financial need",
            "focus": null,
            "qualifications": "Full-time enrolment",
            "criteria": "Academic standing",
            "funds": funds,
            "deadline": "2026-03-31",
            "website": "https://example.org/awards",
        })
    }
}

/// Test assertion helpers
pub mod assertions {
    use std::fmt::Debug;

    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert every item satisfies `predicate`, naming the first offender.
    pub fn assert_all<T: Debug>(items: &[T], predicate: impl Fn(&T) -> bool, context: &str) {
        if let Some(bad) = items.iter().find(|item| !predicate(item)) {
            panic!("{}: item does not satisfy predicate: {:?}", context, bad);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_builder_deterministic() {
        let builder1 = TestDataBuilder::new(42);
        let builder2 = TestDataBuilder::new(42);

        assert_eq!(builder1.user_id(), builder2.user_id());
        assert_eq!(
            builder1.name("award", "main"),
            builder2.name("award", "main")
        );
    }

    #[test]
    fn test_data_builder_different_names() {
        let builder1 = TestDataBuilder::from_test_name("test1");
        let builder2 = TestDataBuilder::from_test_name("test2");

        assert_ne!(builder1.user_id(), builder2.user_id());
        assert_ne!(builder1.bearer_token(), builder2.bearer_token());
    }

    #[test]
    fn test_scholarship_row_shape() {
        let row = TestDataBuilder::new(7).scholarship_row(3, "Bursary", "$500 - $1,500");
        assert_eq!(row["id"], 3);
        assert_eq!(row["award_type"], "Bursary");
        assert_eq!(row["level_of_study"][0], "Undergraduate");
        assert_eq!(row["award_name"], "test-award-7-3");
    }

    #[test]
    #[should_panic(expected = "odd ids")]
    fn test_assert_all_reports_offender() {
        assertions::assert_all(&[2, 4, 5], |n| n % 2 == 0, "odd ids");
    }
}
