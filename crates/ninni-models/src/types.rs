use serde::{Deserialize, Serialize};

/// Author of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

/// One turn of a conversation, in the order it happened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

/// Sampling parameters sent with every generation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub top_p: Option<f32>,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: Some(1),
            top_p: Some(1.0),
            max_output_tokens: 200,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn generation_config_uses_camel_case_keys() {
        let json = serde_json::to_value(GenerationConfig::default()).unwrap();
        assert_eq!(json["maxOutputTokens"], 200);
        assert_eq!(json["topK"], 1);
        assert_eq!(json["topP"], 1.0);
        assert!(json["temperature"].is_number());
        assert!(json.get("max_output_tokens").is_none());
    }

    #[test]
    fn generation_config_omits_unset_sampling_limits() {
        let config = GenerationConfig {
            top_k: None,
            top_p: None,
            ..GenerationConfig::default()
        };
        let json = serde_json::to_value(config).unwrap();
        assert!(json.get("topK").is_none());
        assert!(json.get("topP").is_none());
    }

    #[test]
    fn roles_serialize_lowercase() {
        let turn = Turn::model("Sweet dreams");
        let json = serde_json::to_string(&turn).unwrap();
        assert_eq!(json, r#"{"role":"model","text":"Sweet dreams"}"#);
    }
}
