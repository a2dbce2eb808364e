//! Match settings
//!
//! Chosen by the menu layer before a match starts. Storage is the caller's
//! business; this module only (de)serializes.

use serde::{Deserialize, Serialize};

use crate::consts::{AUTONOMOUS_COLOR, CONTROLLED_COLOR, PURSUIT_COLOR};
use crate::sim::actor::ColorTag;
use crate::sim::policy::{Policy, PursuitConfig, PursuitPolicy, SurvivalConfig, SurvivalPolicy};

/// Opponent difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Cruise speed of the autonomous actor
    pub fn opponent_cruise_speed(&self) -> f32 {
        match self {
            Difficulty::Easy => 18.0,
            Difficulty::Medium => 22.0,
            Difficulty::Hard => 26.0,
        }
    }

    /// Agent used when the settings don't name one
    pub fn default_agent(&self) -> AgentKind {
        match self {
            Difficulty::Easy | Difficulty::Medium => AgentKind::Survival,
            Difficulty::Hard => AgentKind::Pursuit,
        }
    }
}

/// Which decision policy drives the autonomous actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Survival,
    Pursuit,
}

impl AgentKind {
    /// Trail and explosion color of the actor this agent drives
    pub fn color(&self) -> ColorTag {
        match self {
            AgentKind::Survival => ColorTag(AUTONOMOUS_COLOR),
            AgentKind::Pursuit => ColorTag(PURSUIT_COLOR),
        }
    }
}

/// Match settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,
    /// Overrides the difficulty's default agent
    pub agent: Option<AgentKind>,
    /// Seed for agent decisions and particle bursts
    pub seed: u64,
    /// Spawn explosion particles on death
    pub particles: bool,
    /// Trail and explosion color of the controlled actor (0xRRGGBB)
    pub controlled_color: u32,
    pub survival: SurvivalConfig,
    pub pursuit: PursuitConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            agent: None,
            seed: 0x5EED,
            particles: true,
            controlled_color: CONTROLLED_COLOR,
            survival: SurvivalConfig::default(),
            pursuit: PursuitConfig::default(),
        }
    }
}

impl Settings {
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    pub fn agent_kind(&self) -> AgentKind {
        self.agent.unwrap_or_else(|| self.difficulty.default_agent())
    }

    /// Policy for the autonomous actor
    pub fn opponent_policy(&self) -> Policy {
        match self.agent_kind() {
            AgentKind::Survival => Policy::Survival(SurvivalPolicy::new(self.survival)),
            AgentKind::Pursuit => Policy::Pursuit(PursuitPolicy::new(self.pursuit)),
        }
    }

    /// Policy that drives the controlled actor in idle/demo mode
    pub fn demo_policy(&self) -> Policy {
        Policy::Survival(SurvivalPolicy::new(self.survival))
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
