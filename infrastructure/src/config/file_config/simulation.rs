//! Demo party configuration from TOML (`[simulation]` section)
//!
//! Only the bundled binary uses this: it drives the engine against
//! simulated roster, location and clock collaborators.

use consensus_domain::{
    CharacterProfile, CharacterType, ConfigIssue, ConfigIssueCode, PartyMember,
};
use serde::{Deserialize, Serialize};

/// One party member of the demo roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMemberConfig {
    pub id: String,
    pub name: String,
    /// "pc" or "npc"
    #[serde(default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub leader: bool,
    /// Voted by the AI voter scheduler
    #[serde(default)]
    pub ai: bool,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_kind() -> String {
    "pc".to_string()
}

impl FileMemberConfig {
    fn new(id: &str, name: &str, kind: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind: kind.to_string(),
            leader: false,
            ai: false,
            description: None,
        }
    }
}

/// Raw simulation configuration from TOML
///
/// # Example
///
/// ```toml
/// [simulation]
/// campaign_id = "campaign-1"
/// starting_location = "crossroads-inn"
/// unreachable = ["pip"]             # these members fail to move
///
/// [[simulation.members]]
/// id = "aria"
/// name = "Aria"
/// leader = true
///
/// [[simulation.members]]
/// id = "borin"
/// name = "Borin"
/// ai = true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSimulationConfig {
    pub campaign_id: String,
    pub starting_location: String,
    pub members: Vec<FileMemberConfig>,
    pub unreachable: Vec<String>,
}

impl Default for FileSimulationConfig {
    fn default() -> Self {
        let mut aria = FileMemberConfig::new("aria", "Aria", "pc");
        aria.leader = true;
        let mut borin = FileMemberConfig::new("borin", "Borin", "pc");
        borin.ai = true;
        borin.description = Some("A cautious dwarven smith".to_string());
        let mut cass = FileMemberConfig::new("cass", "Cass", "pc");
        cass.ai = true;
        cass.description = Some("A restless elven scout".to_string());
        let pip = FileMemberConfig::new("pip", "Pip", "npc");

        Self {
            campaign_id: "campaign-1".to_string(),
            starting_location: "crossroads-inn".to_string(),
            members: vec![aria, borin, cass, pip],
            unreachable: Vec::new(),
        }
    }
}

impl FileSimulationConfig {
    /// Build the roster and character profiles, skipping unusable members.
    pub fn parse_members(&self) -> (Vec<PartyMember>, Vec<CharacterProfile>, Vec<ConfigIssue>) {
        let mut members = Vec::new();
        let mut profiles = Vec::new();
        let mut issues = Vec::new();

        for member in &self.members {
            let kind = match member.kind.parse::<CharacterType>() {
                Ok(kind) => kind,
                Err(_) => {
                    issues.push(ConfigIssue::warning(
                        ConfigIssueCode::InvalidEnumValue {
                            field: format!("simulation.members.{}.kind", member.id),
                            value: member.kind.clone(),
                            valid_values: vec!["pc".to_string(), "npc".to_string()],
                        },
                        format!(
                            "simulation member '{}': unknown kind '{}', skipping",
                            member.id, member.kind
                        ),
                    ));
                    continue;
                }
            };

            let mut party_member =
                PartyMember::new(member.id.as_str(), member.name.as_str(), kind);
            party_member.is_leader = member.leader;
            party_member.is_ai_controlled = member.ai;
            members.push(party_member);
            profiles.push(CharacterProfile {
                character_id: member.id.as_str().into(),
                name: member.name.clone(),
                description: member.description.clone(),
            });
        }

        if !members.iter().any(|m| m.is_eligible_voter()) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::MissingValue {
                    field: "simulation.members".to_string(),
                },
                "simulation.members: the party has no player characters to vote",
            ));
        }

        (members, profiles, issues)
    }
}
