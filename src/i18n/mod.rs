//! Localized string tables.
//!
//! The conversation core treats these as opaque display strings — no logic
//! lives here beyond language selection.  Placeholder and failure texts are
//! what the pipeline writes into the transcript; everything else labels the
//! UI shell.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// Supported interface languages, identified by their BCP-47 codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "nl-BE")]
    NlBe,
    #[serde(rename = "fr-FR")]
    FrFr,
}

impl Language {
    /// The BCP-47 code sent to the transcribe backend.
    pub fn code(&self) -> &'static str {
        match self {
            Language::EnUs => "en-US",
            Language::NlBe => "nl-BE",
            Language::FrFr => "fr-FR",
        }
    }

    /// Parse a BCP-47 code; `None` for unsupported languages.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en-US" => Some(Language::EnUs),
            "nl-BE" => Some(Language::NlBe),
            "fr-FR" => Some(Language::FrFr),
            _ => None,
        }
    }

    /// All supported languages, for the UI language selector.
    pub fn all() -> &'static [Language] {
        &[Language::EnUs, Language::NlBe, Language::FrFr]
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::NlBe
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

// ---------------------------------------------------------------------------
// Strings
// ---------------------------------------------------------------------------

/// The full string table for one language.
#[derive(Debug)]
pub struct Strings {
    pub select_user: &'static str,
    pub title: &'static str,
    pub greeting: &'static str,
    /// Template with a `{name}` placeholder; render via [`Strings::welcome_back`].
    welcome_back_template: &'static str,
    pub welcome: &'static str,
    pub footer: &'static str,

    // Buttons
    pub start_button: &'static str,
    pub stop_button: &'static str,
    pub send_button: &'static str,
    pub listening: &'static str,

    // Pipeline placeholders
    pub transcribing_placeholder: &'static str,
    pub thinking_placeholder: &'static str,

    // Failure texts written into the transcript
    pub transcribe_failed: &'static str,
    pub answer_failed: &'static str,
    pub microphone_failed: &'static str,
}

impl Strings {
    /// Personalized welcome line for a selected customer.
    pub fn welcome_back(&self, name: &str) -> String {
        self.welcome_back_template.replace("{name}", name)
    }
}

static EN_US: Strings = Strings {
    select_user: "Select your name (optional)",
    title: "Voice Assistant",
    greeting: "Hello",
    welcome_back_template: "Welcome back, {name}! Tap below to speak with your assistant.",
    welcome: "Tap the button below to start speaking with your digital assistant.",
    footer: "© 2025 Voice Assistant Prototype",
    start_button: "Start Recording",
    stop_button: "Stop & Send",
    send_button: "Send",
    listening: "Listening...",
    transcribing_placeholder: "🎤 Transcribing...",
    thinking_placeholder: "💭 Assistant is thinking ...",
    transcribe_failed: "❌ Transcription failed.",
    answer_failed: "❌ Failed to get assistant response.",
    microphone_failed: "❌ Could not access microphone.",
};

static NL_BE: Strings = Strings {
    select_user: "Selecteer je naam (optioneel)",
    title: "Spraakassistent",
    greeting: "Hallo",
    welcome_back_template: "Welkom terug, {name}! Tik hieronder om met je assistent te praten.",
    welcome: "Tik op de knop hieronder om met je digitale assistent te praten.",
    footer: "© 2025 Spraakassistent Prototype",
    start_button: "Start opname",
    stop_button: "Stop & verstuur",
    send_button: "Versturen",
    listening: "Luisteren...",
    transcribing_placeholder: "🎤 Transcriberen...",
    thinking_placeholder: "💭 Assistent is aan het nadenken ...",
    transcribe_failed: "❌ Transcriptie mislukt.",
    answer_failed: "❌ Geen antwoord van de assistent gekregen.",
    microphone_failed: "❌ Geen toegang tot de microfoon.",
};

static FR_FR: Strings = Strings {
    select_user: "Sélectionnez votre nom (facultatif)",
    title: "Assistant Vocal",
    greeting: "Bonjour",
    welcome_back_template:
        "Bon retour, {name} ! Appuyez ci-dessous pour parler à votre assistant.",
    welcome: "Appuyez sur le bouton ci-dessous pour parler à votre assistant numérique.",
    footer: "© 2025 Prototype de l’Assistant Vocal",
    start_button: "Commencer l’enregistrement",
    stop_button: "Arrêter et envoyer",
    send_button: "Envoyer",
    listening: "Écoute...",
    transcribing_placeholder: "🎤 Transcription en cours...",
    thinking_placeholder: "💭 L’assistant réfléchit ...",
    transcribe_failed: "❌ Échec de la transcription.",
    answer_failed: "❌ Impossible d’obtenir la réponse de l’assistant.",
    microphone_failed: "❌ Impossible d’accéder au microphone.",
};

/// The string table for `language`.
pub fn strings(language: Language) -> &'static Strings {
    match language {
        Language::EnUs => &EN_US,
        Language::NlBe => &NL_BE,
        Language::FrFr => &FR_FR,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for &lang in Language::all() {
            assert_eq!(Language::from_code(lang.code()), Some(lang));
        }
    }

    #[test]
    fn unknown_code_is_none() {
        assert_eq!(Language::from_code("de-DE"), None);
        assert_eq!(Language::from_code(""), None);
    }

    #[test]
    fn default_language_is_flemish() {
        assert_eq!(Language::default(), Language::NlBe);
    }

    #[test]
    fn welcome_back_substitutes_name() {
        let s = strings(Language::EnUs);
        assert_eq!(
            s.welcome_back("Ada"),
            "Welcome back, Ada! Tap below to speak with your assistant."
        );
    }

    #[test]
    fn every_language_has_distinct_placeholders() {
        for &lang in Language::all() {
            let s = strings(lang);
            assert!(!s.transcribing_placeholder.is_empty());
            assert!(!s.thinking_placeholder.is_empty());
            assert_ne!(s.transcribing_placeholder, s.thinking_placeholder);
        }
    }

    #[test]
    fn failure_texts_are_marked() {
        for &lang in Language::all() {
            let s = strings(lang);
            assert!(s.transcribe_failed.starts_with('❌'));
            assert!(s.answer_failed.starts_with('❌'));
            assert!(s.microphone_failed.starts_with('❌'));
        }
    }

    #[test]
    fn language_serde_uses_codes() {
        let json = serde_json::to_string(&Language::NlBe).unwrap();
        assert_eq!(json, "\"nl-BE\"");
        let lang: Language = serde_json::from_str("\"fr-FR\"").unwrap();
        assert_eq!(lang, Language::FrFr);
    }
}
