use serde::{Deserialize, Serialize};

use crate::core::conversation::OwnerKey;
use crate::core::error::ChatError;
use crate::core::personality::Personality;

/// A named friend the user can talk to, alone or in a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    /// Display name exactly as the user typed it.
    pub name: String,
    pub personality: Personality,
}

impl Persona {
    pub fn system_prompt(&self) -> &'static str {
        self.personality.system_prompt()
    }

    /// Key of this persona's history in the conversation store.
    pub fn owner_key(&self) -> OwnerKey {
        OwnerKey::persona(&self.name)
    }

    pub fn matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// Validate a friend name: non-empty, no whitespace, no leading `/`.
pub fn validate_name(name: &str) -> Result<(), ChatError> {
    if name.is_empty() || name.starts_with('/') || name.chars().any(char::is_whitespace) {
        return Err(ChatError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Owns the set of friends, in the order they were added.
#[derive(Debug, Clone, Default)]
pub struct PersonaRegistry {
    personas: Vec<Persona>,
}

impl PersonaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a friend from a raw personality label.
    ///
    /// Fails without touching the registry when the name is invalid or
    /// taken, or when the label is not one of the built-in personalities.
    pub fn add(&mut self, name: &str, personality: &str) -> Result<&Persona, ChatError> {
        validate_name(name)?;
        if self.contains(name) {
            return Err(ChatError::DuplicateName(name.to_string()));
        }
        let personality = personality
            .parse::<Personality>()
            .map_err(ChatError::invalid_personality)?;
        Ok(self.push(name, personality))
    }

    /// Register a friend with an already-typed personality.
    pub fn add_with(
        &mut self,
        name: &str,
        personality: Personality,
    ) -> Result<&Persona, ChatError> {
        validate_name(name)?;
        if self.contains(name) {
            return Err(ChatError::DuplicateName(name.to_string()));
        }
        Ok(self.push(name, personality))
    }

    fn push(&mut self, name: &str, personality: Personality) -> &Persona {
        self.personas.push(Persona {
            name: name.to_string(),
            personality,
        });
        let index = self.personas.len() - 1;
        &self.personas[index]
    }

    /// Remove a friend and return its definition.
    pub fn remove(&mut self, name: &str) -> Result<Persona, ChatError> {
        let index = self
            .personas
            .iter()
            .position(|p| p.matches(name))
            .ok_or_else(|| ChatError::NotFound(name.to_string()))?;
        Ok(self.personas.remove(index))
    }

    pub fn get(&self, name: &str) -> Result<&Persona, ChatError> {
        self.find(name)
            .ok_or_else(|| ChatError::NotFound(name.to_string()))
    }

    pub fn find(&self, name: &str) -> Option<&Persona> {
        self.personas.iter().find(|p| p.matches(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Friends in insertion order.
    pub fn list(&self) -> &[Persona] {
        &self.personas
    }

    pub fn len(&self) -> usize {
        self.personas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_then_get_returns_the_same_fields() {
        let mut registry = PersonaRegistry::new();
        for (name, label, expected) in [
            ("Alex", "funny", Personality::Funny),
            ("Sam", "Wise", Personality::Wise),
            ("Jordan", "kid-friendly", Personality::KidFriendly),
        ] {
            registry.add(name, label).expect("add should succeed");
            let persona = registry.get(name).expect("persona should exist");
            assert_eq!(persona.name, name);
            assert_eq!(persona.personality, expected);
        }
    }

    #[test]
    fn duplicate_names_are_rejected_case_insensitively() {
        let mut registry = PersonaRegistry::new();
        registry.add("Alex", "funny").unwrap();

        let err = registry.add("alex", "wise").unwrap_err();
        assert_eq!(err, ChatError::DuplicateName("alex".to_string()));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("ALEX").unwrap().personality, Personality::Funny);
    }

    #[test]
    fn unknown_personality_fails_without_mutation() {
        let mut registry = PersonaRegistry::new();
        let err = registry.add("Alex", "grumpy").unwrap_err();
        assert!(matches!(
            err,
            ChatError::InvalidPersonality { ref label, .. } if label == "grumpy"
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn invalid_names_are_rejected() {
        let mut registry = PersonaRegistry::new();
        for bad in ["", "/alex", "two words"] {
            assert_eq!(
                registry.add(bad, "casual").unwrap_err(),
                ChatError::InvalidName(bad.to_string())
            );
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn list_preserves_insertion_order() {
        let mut registry = PersonaRegistry::new();
        registry.add("Zed", "casual").unwrap();
        registry.add("Amy", "wise").unwrap();
        registry.add("Max", "funny").unwrap();

        let names: Vec<_> = registry.list().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Zed", "Amy", "Max"]);
    }

    #[test]
    fn remove_returns_definition_and_reports_missing() {
        let mut registry = PersonaRegistry::new();
        registry.add("Alex", "funny").unwrap();

        let removed = registry.remove("ALEX").unwrap();
        assert_eq!(removed.name, "Alex");
        assert!(registry.get("Alex").is_err());
        assert_eq!(
            registry.remove("Alex").unwrap_err(),
            ChatError::NotFound("Alex".to_string())
        );
    }

    #[test]
    fn owner_key_is_case_folded() {
        let mut registry = PersonaRegistry::new();
        let persona = registry.add_with("Alex", Personality::Casual).unwrap();
        assert_eq!(persona.owner_key(), OwnerKey::persona("alex"));
        assert_eq!(persona.system_prompt(), Personality::Casual.system_prompt());
    }
}
