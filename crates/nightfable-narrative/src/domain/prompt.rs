//! Prompt composition for generation requests.

use nightfable_core::generation::{GenerationRequest, SafetySetting};
use nightfable_core::profile::Profile;
use nightfable_core::transcript::{Role, TranscriptEntry, trailing};
use serde_json::json;

use super::phase::PhaseRule;

/// Transcript entries replayed to the model as context.
pub const CONTEXT_WINDOW: usize = 6;

/// Sampling temperature for primary attempts.
pub const PRIMARY_TEMPERATURE: f32 = 0.85;

/// Default narration language.
pub const DEFAULT_LANGUAGE: &str = "Rioplatense Spanish (Argentina)";

/// Tunables that shape every prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct NarrativeSettings {
    /// Language (and dialect) the story is narrated in.
    pub language: String,
    /// Temperature for primary attempts. Soft retries use the provider default.
    pub temperature: f32,
}

impl Default for NarrativeSettings {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_owned(),
            temperature: PRIMARY_TEMPERATURE,
        }
    }
}

/// Fixed persona, style, and safety posture.
#[must_use]
pub fn system_instruction(settings: &NarrativeSettings) -> String {
    format!(
        "ROLE: You are an expert author of interactive romantic fiction for adults. \
         Narrate in {language}.\n\
         \n\
         STYLE:\n\
         - Passionate, realistic and suggestive language.\n\
         - Use natural idioms of {language} for closeness and context.\n\
         - Focus on sensation: breathing, touch, temperature, the electric tension between bodies.\n\
         - Avoid gratuitous crudeness; build heat through vivid sensory description.\n\
         \n\
         PACING (CRITICAL):\n\
         - Slow burn. The characters should want each other long before anything happens.\n\
         - Anticipation is key.\n\
         \n\
         SAFETY RULES:\n\
         - Consensual fiction between adults only.\n\
         - No violence, no lack of consent, nothing illegal.\n\
         - If a scene grows too explicit, focus on emotion and mutual pleasure.",
        language = settings.language,
    )
}

/// Overriding instruction for the soft retry.
#[must_use]
pub fn soft_system_instruction(settings: &NarrativeSettings) -> String {
    format!(
        "Write adult romantic fiction in {language}. Keep it suggestive but never explicit; \
         use metaphor instead of direct description wherever needed. Reply with JSON.",
        language = settings.language,
    )
}

/// Note appended to the original prompt on the soft retry.
pub const SOFT_RETRY_NOTE: &str = "NOTE: The previous content was blocked. REWRITE the scene \
    focusing purely on ROMANCE, emotion and subtle sensation. AVOID explicit words. Make it \
    suggestive but safe.";

/// Schema for the structured reply.
#[must_use]
pub fn response_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "content": {
                "type": "STRING",
                "description": "Narration of the scene, between 80 and 120 words."
            },
            "choices": {
                "type": "ARRAY",
                "description": "Exactly 3 options to continue the action.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "text": {
                            "type": "STRING",
                            "description": "A suggestive or romantic action for the reader."
                        },
                        "tone": {
                            "type": "STRING",
                            "description": "Tone tag, e.g. romantic, passionate, investigative."
                        }
                    },
                    "required": ["text", "tone"]
                }
            },
            "isEnding": {
                "type": "BOOLEAN",
                "description": "True ONLY if the story has reached a definitive ending."
            }
        },
        "required": ["content", "choices", "isEnding"]
    })
}

/// Keeps generated characters consistent with the reader's pairing.
#[must_use]
pub fn identity_reminder(profile: &Profile) -> String {
    format!(
        "IDENTITY REMINDER:\n\
         - Reader: the protagonist is a {identity}.\n\
         - Interested in: {orientation}. The love interest must match this preference.\n\
         - Keep every character's body and description consistent with this pairing.",
        identity = profile.identity,
        orientation = profile.orientation,
    )
}

fn request(system_instruction: String, prompt: String, temperature: Option<f32>) -> GenerationRequest {
    GenerationRequest {
        system_instruction,
        prompt,
        response_schema: response_schema(),
        temperature,
        safety: SafetySetting::least_restrictive(),
    }
}

/// Request that opens a new story.
#[must_use]
pub fn introduction_request(profile: &Profile, settings: &NarrativeSettings) -> GenerationRequest {
    let prompt = format!(
        "STORY START.\n\
         Protagonist: {name} ({identity}).\n\
         Interested in: {orientation}.\n\
         Setting: {theme}.\n\
         \n\
         {reminder}\n\
         \n\
         Write an introduction of 80-100 words.\n\
         PHASE: INTRODUCTION / TENSION.\n\
         GOAL: Establish the premise and the desire. Glances, near-touches, a charged \
         atmosphere. Do not escalate yet.\n\
         \n\
         End with 3 choices that invite the reader to raise the stakes little by little.\n\
         'isEnding' must be false.",
        name = profile.name.trim(),
        identity = profile.identity,
        orientation = profile.orientation,
        theme = profile.theme,
        reminder = identity_reminder(profile),
    );

    request(
        system_instruction(settings),
        prompt,
        Some(settings.temperature),
    )
}

/// Renders the trailing transcript window, one `Speaker: text` line each.
#[must_use]
pub fn render_context(transcript: &[TranscriptEntry]) -> String {
    trailing(transcript, CONTEXT_WINDOW)
        .iter()
        .map(|entry| {
            let speaker = match entry.role {
                Role::Author => "Author",
                Role::Reader => "Reader",
            };
            format!("{speaker}: {}", entry.text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Request that continues the story after the reader picks an action.
#[must_use]
pub fn continuation_request(
    transcript: &[TranscriptEntry],
    chosen_action: &str,
    profile: &Profile,
    rule: &PhaseRule,
    settings: &NarrativeSettings,
) -> GenerationRequest {
    let ending_rule = if rule.forces_non_ending {
        "false"
    } else {
        "true or false, as the narrative requires"
    };

    let prompt = format!(
        "STORY SO FAR:\n\
         {context}\n\
         \n\
         {reminder}\n\
         \n\
         CHOSEN ACTION:\n\
         \"{chosen_action}\"\n\
         \n\
         CURRENT PHASE INSTRUCTIONS (turn {turn}):\n\
         PHASE: {heading}.\n\
         INSTRUCTION: {directive}\n\
         \n\
         JSON RULE:\n\
         \"isEnding\": {ending_rule} (IMPORTANT!)",
        context = render_context(transcript),
        reminder = identity_reminder(profile),
        turn = transcript.len(),
        heading = rule.phase.heading(),
        directive = rule.directive,
    );

    request(
        system_instruction(settings),
        prompt,
        Some(settings.temperature),
    )
}

/// Softened variant of a failed request: same prompt plus a rewrite note,
/// overriding system instruction, provider-default temperature.
#[must_use]
pub fn soft_retry_request(
    original: &GenerationRequest,
    settings: &NarrativeSettings,
) -> GenerationRequest {
    request(
        soft_system_instruction(settings),
        format!("{}\n{SOFT_RETRY_NOTE}", original.prompt),
        None,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::phase::rule_for_turn;
    use nightfable_core::profile::{Identity, Orientation};

    fn profile() -> Profile {
        Profile {
            name: "  Valentina ".to_owned(),
            identity: Identity::NonBinary,
            orientation: Orientation::All,
            theme: "Encounter at a Bar".to_owned(),
        }
    }

    fn transcript(len: usize) -> Vec<TranscriptEntry> {
        (0..len)
            .map(|i| {
                if i % 2 == 0 {
                    TranscriptEntry::author(format!("narration {i}"))
                } else {
                    TranscriptEntry::reader(format!("action {i}"))
                }
            })
            .collect()
    }

    #[test]
    fn test_introduction_request_interpolates_profile() {
        let settings = NarrativeSettings::default();

        let request = introduction_request(&profile(), &settings);

        assert!(request.prompt.contains("Protagonist: Valentina (non-binary person)"));
        assert!(request.prompt.contains("Setting: Encounter at a Bar"));
        assert!(request.prompt.contains("IDENTITY REMINDER"));
        assert!(request.prompt.contains("'isEnding' must be false"));
        assert!(request.system_instruction.contains(DEFAULT_LANGUAGE));
        assert_eq!(request.temperature, Some(PRIMARY_TEMPERATURE));
        assert_eq!(request.safety.len(), 4);
    }

    #[test]
    fn test_render_context_sends_only_last_six_entries() {
        let context = render_context(&transcript(9));

        assert_eq!(context.lines().count(), CONTEXT_WINDOW);
        assert!(!context.contains("narration 2"));
        assert!(context.starts_with("Reader: action 3"));
        assert!(context.ends_with("Author: narration 8"));
    }

    #[test]
    fn test_continuation_request_forces_non_ending_before_resolution() {
        let entries = transcript(3);
        let rule = rule_for_turn(entries.len());

        let request = continuation_request(
            &entries,
            "Take their hand",
            &profile(),
            rule,
            &NarrativeSettings::default(),
        );

        assert!(request.prompt.contains("\"Take their hand\""));
        assert!(request.prompt.contains("(turn 3)"));
        assert!(request.prompt.contains("PHASE: BUILDUP."));
        assert!(request.prompt.contains("\"isEnding\": false (IMPORTANT!)"));
        assert!(request.prompt.contains("IDENTITY REMINDER"));
        assert!(request.prompt.contains("the protagonist is a non-binary person"));
        assert!(request.prompt.contains("Interested in: anyone"));
        assert_eq!(request.safety, SafetySetting::least_restrictive());
    }

    #[test]
    fn test_continuation_request_frees_ending_in_resolution() {
        let entries = transcript(27);
        let rule = rule_for_turn(entries.len());

        let request = continuation_request(
            &entries,
            "Stay until sunrise",
            &profile(),
            rule,
            &NarrativeSettings::default(),
        );

        assert!(request.prompt.contains("PHASE: RESOLUTION."));
        assert!(request.prompt.contains("true or false"));
    }

    #[test]
    fn test_soft_retry_request_overrides_instruction_and_keeps_prompt() {
        let settings = NarrativeSettings::default();
        let original = introduction_request(&profile(), &settings);

        let retry = soft_retry_request(&original, &settings);

        assert!(retry.prompt.starts_with(&original.prompt));
        assert!(retry.prompt.ends_with(SOFT_RETRY_NOTE));
        assert!(retry.system_instruction.contains("metaphor"));
        assert_ne!(retry.system_instruction, original.system_instruction);
        assert_eq!(retry.temperature, None);
        assert_eq!(retry.response_schema, original.response_schema);
        assert_eq!(retry.safety, SafetySetting::least_restrictive());
    }

    #[test]
    fn test_soft_retry_of_continuation_keeps_identity_reminder() {
        let settings = NarrativeSettings::default();
        let entries = transcript(8);
        let original = continuation_request(
            &entries,
            "Kiss them",
            &profile(),
            rule_for_turn(entries.len()),
            &settings,
        );

        let retry = soft_retry_request(&original, &settings);

        assert!(retry.prompt.contains(&identity_reminder(&profile())));
        assert_eq!(retry.safety, SafetySetting::least_restrictive());
    }
}
