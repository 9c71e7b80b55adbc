use serde::{Deserialize, Serialize};

/// A single record produced for live/step-polling consumers.
///
/// Serialised as a flat JSON object whose `EventType` field names the variant;
/// consumers switch on it before reading kind-specific fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "EventType", rename_all = "snake_case")]
pub enum BattleEvent {
    /// An attack or skill began.
    AttackStarted {
        event_time: f64,
        attacker_name: String,
        target_name: String,
        message: String,
    },

    /// The character landed damage on an enemy.
    DamageApplied {
        event_time: f64,
        source_skill_id: String,
        damage: u32,
        is_crit: bool,
        target_current_hp: u32,
        target_max_hp: u32,
        attacker_name: String,
        target_name: String,
        message: String,
    },

    /// An enemy landed damage on the character.
    DamageReceived {
        event_time: f64,
        source_skill_id: String,
        damage: u32,
        is_crit: bool,
        target_current_hp: u32,
        target_max_hp: u32,
        attacker_name: String,
        target_name: String,
        message: String,
    },

    /// A basic attack swing resolved and the next one was scheduled.
    AttackTick {
        event_time: f64,
        next_trigger_time: f64,
        interval: f64,
    },
}

impl BattleEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            BattleEvent::AttackStarted { .. } => "attack_started",
            BattleEvent::DamageApplied { .. } => "damage_applied",
            BattleEvent::DamageReceived { .. } => "damage_received",
            BattleEvent::AttackTick { .. } => "attack_tick",
        }
    }

    pub fn event_time(&self) -> f64 {
        match self {
            BattleEvent::AttackStarted { event_time, .. }
            | BattleEvent::DamageApplied { event_time, .. }
            | BattleEvent::DamageReceived { event_time, .. }
            | BattleEvent::AttackTick { event_time, .. } => *event_time,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_carries_event_type_discriminator() {
        let event = BattleEvent::AttackTick {
            event_time: 1.5,
            next_trigger_time: 3.0,
            interval: 1.5,
        };
        let value: serde_json::Value = serde_json::from_str(&event.to_json().unwrap()).unwrap();
        assert_eq!(value["EventType"], "attack_tick");
        assert_eq!(value["next_trigger_time"], 3.0);
        assert_eq!(value["event_time"], 1.5);
    }

    #[test]
    fn test_damage_applied_is_flat() {
        let event = BattleEvent::DamageApplied {
            event_time: 2.0,
            source_skill_id: "cleave".to_string(),
            damage: 60,
            is_crit: true,
            target_current_hp: 40,
            target_max_hp: 100,
            attacker_name: "Hero".to_string(),
            target_name: "Wolf".to_string(),
            message: "Hero hits Wolf for 60".to_string(),
        };
        let json = event.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["EventType"], event.event_type());
        assert_eq!(value["damage"], 60);
        assert_eq!(value["is_crit"], true);

        let parsed: BattleEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
        assert_eq!(parsed.event_time(), 2.0);
    }
}
