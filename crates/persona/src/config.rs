//! Persona configuration

use crate::knowledge::KnowledgeSources;
use crate::notifier::SmtpConfig;

pub const DEFAULT_PERSONA_NAME: &str = "Sefia Oghenerume";

/// Everything the persona needs at startup
#[derive(Clone, Debug)]
pub struct PersonaConfig {
    /// Who the agent speaks as
    pub name: String,
    pub sources: KnowledgeSources,
    pub smtp: SmtpConfig,
}

impl PersonaConfig {
    /// Read `PERSONA_NAME` plus the knowledge and SMTP variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            name: lookup("PERSONA_NAME")
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| DEFAULT_PERSONA_NAME.into()),
            sources: KnowledgeSources::from_lookup(&lookup),
            smtp: SmtpConfig::from_lookup(&lookup),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_override_and_default() {
        let named = PersonaConfig::from_lookup(|key| {
            (key == "PERSONA_NAME").then(|| " Ada Lovelace ".to_string())
        });
        assert_eq!(named.name, "Ada Lovelace");

        let unnamed = PersonaConfig::from_lookup(|_| None);
        assert_eq!(unnamed.name, DEFAULT_PERSONA_NAME);
        assert!(unnamed.smtp.sender.is_none());
    }
}
