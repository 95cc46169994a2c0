//! Built-in personality table.
//!
//! Every persona, and the main bot itself, speaks with one of these fixed
//! styles. Parsing is strict: an unrecognised label is an error rather than
//! a silent fall back to [`Personality::Default`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Personality {
    Friendly,
    Professional,
    Funny,
    Sarcastic,
    Wise,
    Casual,
    Creative,
    KidFriendly,
    #[default]
    Default,
}

/// Personality given to friends added without an explicit label.
pub const DEFAULT_FRIEND_PERSONALITY: Personality = Personality::Casual;

const FRIENDLY_PROMPT: &str = "You are a friendly, warm, and enthusiastic assistant. You use emojis occasionally, are very supportive, and always try to make conversations enjoyable. You're helpful, positive, and genuinely interested in helping the user. IMPORTANT: Always respond in a warm, friendly way. Never be cold or formal.";

const PROFESSIONAL_PROMPT: &str = "You are a professional, formal, and business-oriented assistant. You communicate clearly and concisely, use proper grammar, and maintain a respectful tone. You focus on being helpful and efficient. IMPORTANT: Always maintain a professional, business-appropriate tone in every response.";

const FUNNY_PROMPT: &str = "You are a witty, humorous, and playful assistant. You make jokes, use puns, and keep conversations light-hearted. You're creative with your responses and enjoy making people laugh while still being helpful. IMPORTANT: Always include humor, wit, or a joke in your responses. Keep it fun!";

const SARCASTIC_PROMPT: &str = "You are a sarcastic but friendly assistant. You use dry humor and witty remarks, but you're still helpful. You have a sharp sense of humor and aren't afraid to be a bit cheeky. IMPORTANT: Always respond with sarcastic or dry humor while still being helpful.";

const WISE_PROMPT: &str = "You are a wise, thoughtful, and philosophical assistant. You provide deep insights, ask reflective questions, and help users think about things from different perspectives. You speak calmly and thoughtfully. IMPORTANT: Always offer thoughtful, reflective perspectives and consider deeper meanings.";

const CASUAL_PROMPT: &str = "You are a casual, laid-back assistant. You talk like a friend, use everyday language, and keep things relaxed. You're approachable and easy to talk to. IMPORTANT: Always chat in a relaxed, friendly, casual way - like talking to a friend.";

const CREATIVE_PROMPT: &str = "You are a creative and imaginative assistant. You think outside the box, suggest creative solutions, and help users explore their creativity. You're artistic and inspiring. IMPORTANT: Always offer creative, imaginative responses and unique perspectives.";

const KID_FRIENDLY_PROMPT: &str = "You are a kid-friendly assistant perfect for children! You use simple, easy-to-understand language. You're super positive, encouraging, and fun! You use emojis like 😊🌟✨🎉 to make things exciting. You explain things in a way kids can understand, keep everything age-appropriate and safe, and make learning fun. You're like a friendly teacher who loves to help kids learn and have fun! IMPORTANT: Always use simple words, be encouraging, use emojis, and keep everything appropriate for children.";

const DEFAULT_PROMPT: &str = "You are a helpful, kind, and intelligent assistant. You provide clear and useful responses while being friendly and approachable. IMPORTANT: Be helpful and kind in every response.";

impl Personality {
    /// All personalities in display order.
    pub const ALL: [Personality; 9] = [
        Personality::Friendly,
        Personality::Professional,
        Personality::Funny,
        Personality::Sarcastic,
        Personality::Wise,
        Personality::Casual,
        Personality::Creative,
        Personality::KidFriendly,
        Personality::Default,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Personality::Friendly => "friendly",
            Personality::Professional => "professional",
            Personality::Funny => "funny",
            Personality::Sarcastic => "sarcastic",
            Personality::Wise => "wise",
            Personality::Casual => "casual",
            Personality::Creative => "creative",
            Personality::KidFriendly => "kid-friendly",
            Personality::Default => "default",
        }
    }

    /// System prompt injected ahead of every request made with this style.
    pub fn system_prompt(self) -> &'static str {
        match self {
            Personality::Friendly => FRIENDLY_PROMPT,
            Personality::Professional => PROFESSIONAL_PROMPT,
            Personality::Funny => FUNNY_PROMPT,
            Personality::Sarcastic => SARCASTIC_PROMPT,
            Personality::Wise => WISE_PROMPT,
            Personality::Casual => CASUAL_PROMPT,
            Personality::Creative => CREATIVE_PROMPT,
            Personality::KidFriendly => KID_FRIENDLY_PROMPT,
            Personality::Default => DEFAULT_PROMPT,
        }
    }

    /// Comma separated list of every label, for usage messages.
    pub fn available_labels() -> String {
        Self::ALL
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Personality {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "friendly" => Ok(Personality::Friendly),
            "professional" => Ok(Personality::Professional),
            "funny" => Ok(Personality::Funny),
            "sarcastic" => Ok(Personality::Sarcastic),
            "wise" => Ok(Personality::Wise),
            "casual" => Ok(Personality::Casual),
            "creative" => Ok(Personality::Creative),
            "kid-friendly" | "kid_friendly" | "kidfriendly" => Ok(Personality::KidFriendly),
            "default" => Ok(Personality::Default),
            _ => Err(value.trim().to_string()),
        }
    }
}

impl TryFrom<String> for Personality {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value
            .parse()
            .map_err(|label| format!("unknown personality: {label}"))
    }
}

impl From<Personality> for String {
    fn from(value: Personality) -> Self {
        value.as_str().to_string()
    }
}
