//! Party roster types
//!
//! The roster itself lives in an external session service; these are the
//! shapes the engine consumes from it.

use crate::core::error::DomainError;
use crate::core::ids::CharacterId;
use serde::{Deserialize, Serialize};

/// Kind of character in the party
///
/// Only player characters vote; NPC companions travel with the party but
/// have no say in where it goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CharacterType {
    #[default]
    Pc,
    Npc,
}

impl CharacterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterType::Pc => "pc",
            CharacterType::Npc => "npc",
        }
    }
}

impl std::fmt::Display for CharacterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CharacterType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pc" => Ok(CharacterType::Pc),
            "npc" => Ok(CharacterType::Npc),
            other => Err(DomainError::unknown("character type", other)),
        }
    }
}

/// Who cast a vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoterType {
    Human,
    AiAgent,
}

impl VoterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoterType::Human => "human",
            VoterType::AiAgent => "ai_agent",
        }
    }
}

impl std::fmt::Display for VoterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VoterType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "human" => Ok(VoterType::Human),
            "ai_agent" => Ok(VoterType::AiAgent),
            other => Err(DomainError::unknown("voter type", other)),
        }
    }
}

/// A member of the travelling party
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyMember {
    pub character_id: CharacterId,
    pub character_name: String,
    pub character_type: CharacterType,
    pub is_leader: bool,
    /// No human player is bound to this character; the AI voter scheduler
    /// casts its votes.
    pub is_ai_controlled: bool,
}

impl PartyMember {
    pub fn new(
        character_id: impl Into<CharacterId>,
        character_name: impl Into<String>,
        character_type: CharacterType,
    ) -> Self {
        Self {
            character_id: character_id.into(),
            character_name: character_name.into(),
            character_type,
            is_leader: false,
            is_ai_controlled: false,
        }
    }

    /// Human-controlled player character
    pub fn player(id: impl Into<CharacterId>, name: impl Into<String>) -> Self {
        Self::new(id, name, CharacterType::Pc)
    }

    /// AI-controlled player character
    pub fn ai_player(id: impl Into<CharacterId>, name: impl Into<String>) -> Self {
        Self::new(id, name, CharacterType::Pc).ai_controlled()
    }

    /// Non-voting companion
    pub fn npc(id: impl Into<CharacterId>, name: impl Into<String>) -> Self {
        Self::new(id, name, CharacterType::Npc)
    }

    pub fn leader(mut self) -> Self {
        self.is_leader = true;
        self
    }

    pub fn ai_controlled(mut self) -> Self {
        self.is_ai_controlled = true;
        self
    }

    /// Whether this member has voting rights
    pub fn is_eligible_voter(&self) -> bool {
        self.character_type == CharacterType::Pc
    }

    pub fn voter_type(&self) -> VoterType {
        if self.is_ai_controlled {
            VoterType::AiAgent
        } else {
            VoterType::Human
        }
    }
}

/// Read-only character narration data used by the AI decision heuristic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterProfile {
    pub character_id: CharacterId,
    pub name: String,
    pub description: Option<String>,
}

/// Eligible voters of a roster, in roster order
pub fn eligible_voters(members: &[PartyMember]) -> impl Iterator<Item = &PartyMember> {
    members.iter().filter(|m| m.is_eligible_voter())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_pcs_are_eligible() {
        let members = vec![
            PartyMember::player("pc-1", "Aria"),
            PartyMember::npc("npc-1", "Mule"),
            PartyMember::ai_player("pc-2", "Bram"),
        ];
        let eligible: Vec<_> = eligible_voters(&members)
            .map(|m| m.character_id.as_str())
            .collect();
        assert_eq!(eligible, vec!["pc-1", "pc-2"]);
    }

    #[test]
    fn test_voter_type_follows_control() {
        assert_eq!(PartyMember::player("a", "A").voter_type(), VoterType::Human);
        assert_eq!(
            PartyMember::ai_player("b", "B").voter_type(),
            VoterType::AiAgent
        );
    }

    #[test]
    fn test_parse_character_type() {
        assert_eq!("PC".parse::<CharacterType>().unwrap(), CharacterType::Pc);
        assert_eq!("npc".parse::<CharacterType>().unwrap(), CharacterType::Npc);
        assert!("monster".parse::<CharacterType>().is_err());
    }

    #[test]
    fn test_voter_type_round_trips_through_str() {
        for voter_type in [VoterType::Human, VoterType::AiAgent] {
            assert_eq!(voter_type.as_str().parse::<VoterType>().unwrap(), voter_type);
        }
    }
}
