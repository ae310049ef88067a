//! Conversion between prompt schema versions.
//!
//! All cross-version rules live here as free functions over [`QuipPrompt`].

use crate::entity::{
    default_safety_quips, includes_player_name, PromptV1, PromptV3, QuipPrompt, SchemaVersion,
    COMPACT_PLACEHOLDER, SPACED_PLACEHOLDER,
};
use crate::error::{QuipError, Result};

/// Rewrite `<ANY PLAYER>` as `<ANYPLAYER>`.
pub fn to_compact_placeholder(text: &str) -> String {
    text.replace(SPACED_PLACEHOLDER, COMPACT_PLACEHOLDER)
}

/// Rewrite `<ANYPLAYER>` as `<ANY PLAYER>`.
pub fn to_spaced_placeholder(text: &str) -> String {
    text.replace(COMPACT_PLACEHOLDER, SPACED_PLACEHOLDER)
}

/// Convert to a version 1 prompt.
///
/// Fails with `UnsupportedConversion` when a version 3 id is not an integer.
pub fn to_v1(prompt: &QuipPrompt) -> Result<PromptV1> {
    match prompt {
        QuipPrompt::V1(p) => Ok(p.clone()),
        QuipPrompt::V3(p) => {
            let id = p
                .id
                .trim()
                .parse()
                .map_err(|_| QuipError::UnsupportedConversion {
                    id: p.id.clone(),
                    target: SchemaVersion::V1.number(),
                    reason: "version 1 ids must be integers".to_string(),
                })?;
            Ok(PromptV1 {
                id,
                prompt: to_spaced_placeholder(&p.prompt),
                is_audience_choice: p.is_audience_choice,
            })
        }
    }
}

/// Convert a version 1 prompt to version 3, filling in the new fields.
pub fn to_v3(prompt: &PromptV1) -> PromptV3 {
    let text = to_compact_placeholder(&prompt.prompt);
    PromptV3 {
        id: prompt.id.to_string(),
        includes_player_name: includes_player_name(&text),
        prompt: text,
        is_audience_choice: prompt.is_audience_choice,
        is_us_region: false,
        safety_quips: default_safety_quips(),
    }
}

/// Convert a prompt of either version to version 3.
///
/// A version 3 input is copied verbatim, without recomputing anything.
pub fn to_v3_any(prompt: &QuipPrompt) -> PromptV3 {
    match prompt {
        QuipPrompt::V1(p) => to_v3(p),
        QuipPrompt::V3(p) => p.clone(),
    }
}

/// Convert to `target`, or return the prompt unchanged when `target` is `None`.
pub fn to_version(prompt: &QuipPrompt, target: Option<SchemaVersion>) -> Result<QuipPrompt> {
    match target {
        None => Ok(prompt.clone()),
        Some(SchemaVersion::V1) => to_v1(prompt).map(QuipPrompt::V1),
        Some(SchemaVersion::V3) => Ok(QuipPrompt::V3(to_v3_any(prompt))),
    }
}

/// Like [`to_version`], for a target given as a raw version number.
pub fn to_version_number(prompt: &QuipPrompt, target: Option<u32>) -> Result<QuipPrompt> {
    let target = target.map(SchemaVersion::try_from).transpose()?;
    to_version(prompt, target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_substitution_round_trip() {
        let spaced = "Tell <ANY PLAYER> and <ANY PLAYER> a secret";
        let compact = to_compact_placeholder(spaced);
        assert_eq!(compact, "Tell <ANYPLAYER> and <ANYPLAYER> a secret");
        assert_eq!(to_spaced_placeholder(&compact), spaced);
        assert_eq!(to_compact_placeholder(&compact), compact);
    }

    #[test]
    fn test_placeholder_absent_is_untouched() {
        let text = "Name a <ANY> player";
        assert_eq!(to_compact_placeholder(text), text);
        assert_eq!(to_spaced_placeholder(text), text);
    }

    #[test]
    fn test_to_v3_from_v1() {
        let v1 = PromptV1::new(1, "Name a food <ANY PLAYER> hates", true);
        let v3 = to_v3(&v1);
        assert_eq!(v3.id, "1");
        assert_eq!(v3.prompt, "Name a food <ANYPLAYER> hates");
        assert!(v3.includes_player_name);
        assert!(v3.is_audience_choice);
        assert!(!v3.is_us_region);
        assert_eq!(v3.safety_quips, default_safety_quips());
    }

    #[test]
    fn test_to_v3_without_placeholder() {
        let v3 = to_v3(&PromptV1::new(2, "Name a food", false));
        assert!(!v3.includes_player_name);
    }

    #[test]
    fn test_to_v3_any_copies_v3_verbatim() {
        let mut original = PromptV3::new("abc", "Hi", false);
        original.includes_player_name = true;
        original.is_us_region = true;
        let copy = to_v3_any(&QuipPrompt::V3(original.clone()));
        assert_eq!(copy, original);
    }

    #[test]
    fn test_to_v1_from_v3() {
        let v3 = PromptV3::new("15", "Rename <ANYPLAYER>", true);
        let v1 = to_v1(&QuipPrompt::V3(v3)).unwrap();
        assert_eq!(v1, PromptV1::new(15, "Rename <ANY PLAYER>", true));
    }

    #[test]
    fn test_to_v1_identity_on_v1() {
        let v1 = PromptV1::new(3, "Hello <ANY PLAYER>", false);
        assert_eq!(to_v1(&QuipPrompt::V1(v1.clone())).unwrap(), v1);
    }

    #[test]
    fn test_to_v1_rejects_non_integer_id() {
        let v3 = PromptV3::new("QX-1", "Hi", false);
        let result = to_v1(&QuipPrompt::V3(v3));
        assert!(matches!(result, Err(QuipError::UnsupportedConversion { target: 1, .. })));
    }

    #[test]
    fn test_round_trip_v3_v1_v3_is_lossy_on_quips() {
        let mut original = PromptV3::new("21", "Describe <ANYPLAYER>", true);
        original.safety_quips = ["a", "b", "c"].map(String::from);

        let v1 = to_v1(&QuipPrompt::V3(original.clone())).unwrap();
        let back = to_v3(&v1);
        assert_eq!(back.id, original.id);
        assert_eq!(back.prompt, original.prompt);
        assert_eq!(back.includes_player_name, original.includes_player_name);
        assert_eq!(back.safety_quips, default_safety_quips());
    }

    #[test]
    fn test_to_version_dispatch() {
        let prompt = QuipPrompt::V1(PromptV1::new(1, "p", false));
        assert_eq!(to_version(&prompt, None).unwrap(), prompt);
        assert_eq!(
            to_version(&prompt, Some(SchemaVersion::V3)).unwrap().version(),
            SchemaVersion::V3
        );
        assert_eq!(
            to_version_number(&prompt, Some(1)).unwrap().version(),
            SchemaVersion::V1
        );
        assert!(matches!(
            to_version_number(&prompt, Some(2)),
            Err(QuipError::UnknownSchemaVersion(_))
        ));
    }
}
