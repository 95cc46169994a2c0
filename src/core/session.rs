//! Session context shared by every command and chat round.
//!
//! [`ChatSession`] is the single owner of the friend registry, the
//! per-owner histories, the current [`Mode`] and the main bot's
//! personality. It is passed explicitly to the router and the command
//! handlers; nothing here is global.

use tracing::debug;

use crate::core::conversation::{ConversationStore, OwnerKey};
use crate::core::error::ChatError;
use crate::core::message::Turn;
use crate::core::mode::Mode;
use crate::core::persona::{Persona, PersonaRegistry};
use crate::core::personality::Personality;

/// Speaker label used for main-bot replies.
pub const MAIN_BOT_SPEAKER: &str = "AI";

/// One history a round must answer into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyTarget {
    pub speaker: String,
    pub owner: OwnerKey,
    pub system_prompt: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupStart {
    pub members: Vec<String>,
    /// Names that were given but are not registered friends.
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FriendRemoval {
    pub persona: Persona,
    /// The removal emptied the active context, so the session fell back to
    /// the main bot.
    pub returned_to_main: bool,
}

#[derive(Debug, Clone)]
pub struct ChatSession {
    registry: PersonaRegistry,
    store: ConversationStore,
    mode: Mode,
    personality: Personality,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new(Personality::Default)
    }
}

impl ChatSession {
    pub fn new(personality: Personality) -> Self {
        Self {
            registry: PersonaRegistry::new(),
            store: ConversationStore::new(),
            mode: Mode::MainBot,
            personality,
        }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn registry(&self) -> &PersonaRegistry {
        &self.registry
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    pub(crate) fn store_mut(&mut self) -> &mut ConversationStore {
        &mut self.store
    }

    pub fn personality(&self) -> Personality {
        self.personality
    }

    /// Change the main bot's style. The main-bot history is cleared so the
    /// old tone is not replayed as context.
    pub fn set_personality(&mut self, personality: Personality) {
        self.personality = personality;
        self.store.drop_history(&OwnerKey::MainBot);
    }

    /// Change the main bot's style while keeping its history.
    pub fn set_personality_keep_history(&mut self, personality: Personality) {
        self.personality = personality;
    }

    pub fn add_friend(&mut self, name: &str, personality: &str) -> Result<Persona, ChatError> {
        let persona = self.registry.add(name, personality)?.clone();
        self.store.init(persona.owner_key());
        debug!(name = %persona.name, personality = %persona.personality, "friend added");
        Ok(persona)
    }

    pub fn add_friend_with(
        &mut self,
        name: &str,
        personality: Personality,
    ) -> Result<Persona, ChatError> {
        let persona = self.registry.add_with(name, personality)?.clone();
        self.store.init(persona.owner_key());
        Ok(persona)
    }

    /// Remove a friend together with its history.
    ///
    /// Removing the active friend returns to the main bot. Removing a group
    /// member drops it from the group, and an emptied group also returns to
    /// the main bot.
    pub fn remove_friend(&mut self, name: &str) -> Result<FriendRemoval, ChatError> {
        let persona = self.registry.remove(name)?;
        self.store.drop_history(&persona.owner_key());

        let returned_to_main = match &mut self.mode {
            Mode::ActiveFriend(active) => persona.matches(active),
            Mode::GroupChat(members) => {
                members.retain(|member| !persona.matches(member));
                members.is_empty()
            }
            Mode::MainBot => false,
        };
        if returned_to_main {
            self.mode = Mode::MainBot;
        }

        debug!(name = %persona.name, returned_to_main, "friend removed");
        Ok(FriendRemoval {
            persona,
            returned_to_main,
        })
    }

    /// Talk to one friend from now on.
    pub fn switch_to_friend(&mut self, name: &str) -> Result<&Persona, ChatError> {
        let persona = self.registry.get(name)?;
        self.mode = Mode::ActiveFriend(persona.name.clone());
        Ok(persona)
    }

    /// Return to the main bot. Returns `false` if already there.
    pub fn back_to_main(&mut self) -> bool {
        if self.mode == Mode::MainBot {
            return false;
        }
        self.mode = Mode::MainBot;
        true
    }

    /// Enter group chat with the registered friends among `names`.
    ///
    /// Duplicates collapse to their first occurrence and unknown names are
    /// reported back as skipped. The mode is unchanged on error.
    pub fn start_group_chat<S: AsRef<str>>(&mut self, names: &[S]) -> Result<GroupStart, ChatError> {
        if names.is_empty() {
            return Err(ChatError::EmptyGroupList);
        }

        let mut members: Vec<String> = Vec::new();
        let mut skipped = Vec::new();
        for name in names {
            let name = name.as_ref();
            match self.registry.find(name) {
                Some(persona) => {
                    if !members.iter().any(|m| persona.matches(m)) {
                        members.push(persona.name.clone());
                    }
                }
                None => skipped.push(name.to_string()),
            }
        }

        if members.is_empty() {
            return Err(ChatError::NotFound(skipped.join(", ")));
        }

        self.mode = Mode::GroupChat(members.clone());
        Ok(GroupStart { members, skipped })
    }

    /// Leave group chat. Returns `false` if no group chat was running.
    pub fn end_group_chat(&mut self) -> bool {
        if !self.mode.is_group_chat() {
            return false;
        }
        self.mode = Mode::MainBot;
        true
    }

    /// Histories addressed by `/clear` or `/history`: the named friend, or
    /// every owner of the current mode.
    pub fn resolve_owners(&self, name: Option<&str>) -> Result<Vec<(String, OwnerKey)>, ChatError> {
        if let Some(name) = name {
            let persona = self.registry.get(name)?;
            return Ok(vec![(persona.name.clone(), persona.owner_key())]);
        }
        Ok(self
            .mode
            .owners()
            .into_iter()
            .map(|owner| (self.speaker_for(&owner), owner))
            .collect())
    }

    /// Empty the histories addressed by `name` (see [`Self::resolve_owners`])
    /// and return their speaker labels.
    pub fn clear_history(&mut self, name: Option<&str>) -> Result<Vec<String>, ChatError> {
        let owners = self.resolve_owners(name)?;
        for (_, owner) in &owners {
            self.store.clear(owner)?;
        }
        Ok(owners.into_iter().map(|(label, _)| label).collect())
    }

    pub fn history(&self, owner: &OwnerKey) -> Result<&[Turn], ChatError> {
        self.store.get(owner)
    }

    pub fn speaker_for(&self, owner: &OwnerKey) -> String {
        match owner {
            OwnerKey::MainBot => MAIN_BOT_SPEAKER.to_string(),
            OwnerKey::Persona(key) => self
                .registry
                .find(key)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| key.clone()),
        }
    }

    /// Who must answer the next plain message, in reply order.
    pub fn reply_targets(&self) -> Result<Vec<ReplyTarget>, ChatError> {
        match &self.mode {
            Mode::MainBot => Ok(vec![ReplyTarget {
                speaker: MAIN_BOT_SPEAKER.to_string(),
                owner: OwnerKey::MainBot,
                system_prompt: self.personality.system_prompt(),
            }]),
            Mode::ActiveFriend(name) => {
                let persona = self.registry.get(name)?;
                Ok(vec![Self::target_for(persona)])
            }
            Mode::GroupChat(names) => names
                .iter()
                .map(|name| self.registry.get(name).map(Self::target_for))
                .collect(),
        }
    }

    fn target_for(persona: &Persona) -> ReplyTarget {
        ReplyTarget {
            speaker: persona.name.clone(),
            owner: persona.owner_key(),
            system_prompt: persona.system_prompt(),
        }
    }
}
