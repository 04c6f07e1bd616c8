//! Named instruction templates
//!
//! A closed enumeration of assistant roles the user can pick from instead of
//! writing a custom instruction. Lookup is total: an unrecognized name clears
//! the instruction to empty text rather than erroring.

use strum::{AsRefStr, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum InstructionTemplate {
    StyleEditor,
    GrammarEditor,
    StoryEditor,
    DialogueEditor,
    DescriptionEditor,
    AcademicEditor,
}

impl InstructionTemplate {
    pub fn instruction(&self) -> &'static str {
        match self {
            Self::StyleEditor => {
                "Focus on improving writing style, word choice, and flow. Suggest ways to \
                 make the prose more engaging while maintaining the author's voice."
            }
            Self::GrammarEditor => {
                "Focus on grammar, punctuation, and technical writing accuracy. Ensure \
                 clarity and correctness while preserving meaning."
            }
            Self::StoryEditor => {
                "Focus on narrative elements like plot, pacing, character development, and \
                 story structure. Suggest improvements while maintaining the story's core themes."
            }
            Self::DialogueEditor => {
                "Focus on making dialogue more natural and effective. Check for authenticity, \
                 character voice, and dramatic impact."
            }
            Self::DescriptionEditor => {
                "Focus on descriptive language, sensory details, and scene-setting. Help make \
                 descriptions more vivid and immersive."
            }
            Self::AcademicEditor => {
                "Focus on academic writing conventions, argument structure, and scholarly \
                 tone. Ensure clarity and rigor in academic prose."
            }
        }
    }
}

/// Total template lookup; unknown names map to the empty instruction.
pub fn instruction_for(name: &str) -> &'static str {
    name.parse::<InstructionTemplate>()
        .map(|template| template.instruction())
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_known_template_keys_resolve() {
        assert_eq!(
            instruction_for("grammarEditor"),
            InstructionTemplate::GrammarEditor.instruction()
        );
        assert_eq!(
            instruction_for("styleEditor"),
            InstructionTemplate::StyleEditor.instruction()
        );
    }

    #[test]
    fn test_unknown_template_clears_instruction() {
        assert_eq!(instruction_for("poetryEditor"), "");
        assert_eq!(instruction_for(""), "");
    }

    #[test]
    fn test_keys_are_camel_case() {
        assert_eq!(InstructionTemplate::StyleEditor.as_ref(), "styleEditor");
        assert_eq!(
            InstructionTemplate::DescriptionEditor.as_ref(),
            "descriptionEditor"
        );
    }

    #[test]
    fn test_every_template_has_instruction_text() {
        for template in InstructionTemplate::iter() {
            assert!(!template.instruction().is_empty());
        }
    }
}
