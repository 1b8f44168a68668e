use anyhow::{Context, Result};
use ninni_models::GenerationConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Persona and rules given to the model at the start of every conversation
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = r#"
You are "Ninni", a gentle, caring sleep assistant AI. Your name means "Sleep" in Hindi.

PERSONALITY:
- You are warm, soothing, and maternal like a caring friend
- You speak softly, calmly, and lovingly
- You use sleep-related emojis like 😴🌙✨💤🌟🛏️☁️
- You care deeply about the user's well-being and rest

RULES:
1. ONLY discuss topics related to sleep, rest, relaxation, and bedtime
2. If someone asks about anything unrelated to sleep, gently redirect them to sleep topics
3. Give practical sleep tips, bedtime routines, and relaxation techniques
4. Encourage healthy sleep habits and good sleep hygiene
5. If someone seems stressed or anxious, help them calm down for better sleep
6. Keep responses short and soothing (2-3 sentences max)
7. Always end with a gentle sleep-related suggestion, tip, or wish
8. Use "sweetheart", "dear", or "love" occasionally to be more caring
9. If they mention music, relate it to sleep (like lullabies, calming music before bed)

EXAMPLE RESPONSES:
- "It's getting late, sweetheart 🌙 Have you started winding down for bed yet?"
- "Blue light from phones can disturb your sleep 💤 Try reading a book instead!"
- "A warm cup of chamomile tea works wonders before bed ☕✨"
- "That sounds stressful, dear 😴 Let's focus on some deep breathing to help you relax"
- "Listening to soft music is perfect for bedtime 🎵🌙 It helps your mind unwind!"
"#;

/// Persona name and generation parameters
///
/// Every field is optional in a persona file; missing ones keep the built-in
/// Ninni defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaConfig {
    pub name: String,
    pub system_instruction: String,
    pub temperature: f32,
    pub top_k: Option<u32>,
    pub top_p: Option<f32>,
    pub max_output_tokens: u32,
}

impl Default for PersonaConfig {
    fn default() -> Self {
        let generation = GenerationConfig::default();
        Self {
            name: "Ninni".to_string(),
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.trim().to_string(),
            temperature: generation.temperature,
            top_k: generation.top_k,
            top_p: generation.top_p,
            max_output_tokens: generation.max_output_tokens,
        }
    }
}

impl PersonaConfig {
    /// Load a persona from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read persona file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse persona file {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let persona: PersonaConfig = toml::from_str(content)?;
        persona.validate()?;
        Ok(persona)
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(!self.name.trim().is_empty(), "persona name must not be empty");
        anyhow::ensure!(
            (0.0..=2.0).contains(&self.temperature),
            "temperature must be between 0.0 and 2.0, got {}",
            self.temperature
        );
        anyhow::ensure!(self.max_output_tokens > 0, "max_output_tokens must be positive");
        Ok(())
    }

    pub fn generation_config(&self) -> GenerationConfig {
        GenerationConfig {
            temperature: self.temperature,
            top_k: self.top_k,
            top_p: self.top_p,
            max_output_tokens: self.max_output_tokens,
        }
    }

    /// Apology returned to clients when generation fails
    pub fn apology(&self) -> String {
        format!("Sorry, {} is feeling sleepy right now. Please try again! 😴", self.name)
    }

    /// Message of the health endpoint
    pub fn health_message(&self) -> String {
        format!("{} is awake and ready to help with sleep! 🌙", self.name)
    }
}
