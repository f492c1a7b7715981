//! Organizer configuration.
//!
//! Mirrors the JSON shape editors pass in: a `memberOrdering` array of
//! kebab-case category names plus two camelCase boolean switches. The
//! ordering must list every category exactly once so that classification
//! output always has a destination slot.

use serde::Deserialize;
use thiserror::Error;

/// One slot of the configured member ordering.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum MemberCategory {
    PublicConstructor,
    NamedConstructors,
    PublicStaticVariables,
    PublicInstanceVariables,
    PublicOverrideVariables,
    PrivateStaticVariables,
    PrivateInstanceVariables,
    PublicOverrideMethods,
    PublicOtherMethods,
    BuildMethod,
}

impl MemberCategory {
    /// Every category, in the canonical default order.
    pub const ALL: [MemberCategory; 10] = [
        MemberCategory::PublicConstructor,
        MemberCategory::NamedConstructors,
        MemberCategory::PublicStaticVariables,
        MemberCategory::PublicInstanceVariables,
        MemberCategory::PublicOverrideVariables,
        MemberCategory::PrivateStaticVariables,
        MemberCategory::PrivateInstanceVariables,
        MemberCategory::PublicOverrideMethods,
        MemberCategory::PublicOtherMethods,
        MemberCategory::BuildMethod,
    ];
}

/// Invalid configuration.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("invalid options JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("memberOrdering lists {0:?} more than once")]
    DuplicateCategory(MemberCategory),

    #[error("memberOrdering is missing {0:?}")]
    MissingCategory(MemberCategory),
}

/// All organizer switches.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    /// Emission order of the member categories.
    pub member_ordering: Vec<MemberCategory>,
    /// Classify getters into their own category, sorted by name and placed
    /// ahead of the other public methods.
    pub group_and_sort_getter_methods: bool,
    /// Sort the public other-methods category by name instead of keeping
    /// source order.
    pub sort_other_methods: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            member_ordering: MemberCategory::ALL.to_vec(),
            group_and_sort_getter_methods: false,
            sort_other_methods: false,
        }
    }
}

impl Options {
    /// Parse and validate options from their JSON form.
    pub fn from_json(text: &str) -> Result<Self, OptionsError> {
        let options: Options = serde_json::from_str(text)?;
        options.validate()?;
        Ok(options)
    }

    fn validate(&self) -> Result<(), OptionsError> {
        for category in MemberCategory::ALL {
            match self
                .member_ordering
                .iter()
                .filter(|&&c| c == category)
                .count()
            {
                0 => return Err(OptionsError::MissingCategory(category)),
                1 => {}
                _ => return Err(OptionsError::DuplicateCategory(category)),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "test assertions use unwrap for clarity"
)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_the_canonical_order() {
        let options = Options::default();
        assert_eq!(options.member_ordering, MemberCategory::ALL.to_vec());
        assert!(!options.group_and_sort_getter_methods);
        assert!(!options.sort_other_methods);
    }

    #[test]
    fn json_round_trip_with_partial_fields() {
        let options = Options::from_json(r#"{"groupAndSortGetterMethods": true}"#).unwrap();
        assert!(options.group_and_sort_getter_methods);
        assert_eq!(options.member_ordering, MemberCategory::ALL.to_vec());
    }

    #[test]
    fn a_reordered_complete_list_is_accepted() {
        let json = r#"{
            "memberOrdering": [
                "build-method",
                "public-other-methods",
                "public-override-methods",
                "private-instance-variables",
                "private-static-variables",
                "public-override-variables",
                "public-instance-variables",
                "public-static-variables",
                "named-constructors",
                "public-constructor"
            ]
        }"#;
        let options = Options::from_json(json).unwrap();
        assert_eq!(options.member_ordering[0], MemberCategory::BuildMethod);
    }

    #[test]
    fn missing_and_duplicate_categories_are_rejected() {
        let missing = Options::from_json(r#"{"memberOrdering": ["public-constructor"]}"#);
        assert!(matches!(missing, Err(OptionsError::MissingCategory(_))));

        let mut ordering: Vec<&str> = vec![
            "public-constructor",
            "named-constructors",
            "public-static-variables",
            "public-instance-variables",
            "public-override-variables",
            "private-static-variables",
            "private-instance-variables",
            "public-override-methods",
            "public-other-methods",
            "build-method",
        ];
        ordering.push("public-constructor");
        let json = serde_json::json!({ "memberOrdering": ordering }).to_string();
        assert!(matches!(
            Options::from_json(&json),
            Err(OptionsError::DuplicateCategory(MemberCategory::PublicConstructor))
        ));
    }

    #[test]
    fn unknown_category_names_are_a_json_error() {
        let bad = Options::from_json(r#"{"memberOrdering": ["public-cnstructor"]}"#);
        assert!(matches!(bad, Err(OptionsError::Json(_))));
    }
}
