//! Live enemy set for one battle.
//!
//! Enemies live in an arena addressed by [`CombatantId`]. Handles are never reused
//! within a battle. Dead enemies stay in the arena and are skipped by every
//! enumeration, so the relative order of survivors never changes when something
//! dies. A cleared group is dropped when the next group spawns, which keeps the arena
//! bounded by one group however long an endless encounter runs.

use super::types::{CombatantId, DamageOutcome, Enemy};
use crate::core::timeline::EncounterTransition;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// How an encounter is composed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EncounterSpec {
    /// One enemy.
    Single(Enemy),
    /// Several enemies fought at once.
    Group(Vec<Enemy>),
    /// Groups fought one after another.
    Waves(Vec<Vec<Enemy>>),
    /// A group that respawns every time it is cleared.
    Endless(Vec<Enemy>),
}

impl EncounterSpec {
    pub fn enemy_count(&self) -> usize {
        match self {
            EncounterSpec::Single(_) => 1,
            EncounterSpec::Group(group) | EncounterSpec::Endless(group) => group.len(),
            EncounterSpec::Waves(waves) => waves.iter().map(Vec::len).sum(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Encounter {
    arena: Vec<Enemy>,
    next_id: u32,
    pending_waves: VecDeque<Vec<Enemy>>,
    respawn_group: Option<Vec<Enemy>>,
    primary_override: Option<CombatantId>,
    wave: u32,
}

impl Encounter {
    pub fn new(spec: EncounterSpec) -> Self {
        let mut encounter = Self {
            arena: Vec::new(),
            next_id: 0,
            pending_waves: VecDeque::new(),
            respawn_group: None,
            primary_override: None,
            wave: 0,
        };
        match spec {
            EncounterSpec::Single(enemy) => {
                encounter.spawn_group(vec![enemy]);
            }
            EncounterSpec::Group(group) => {
                encounter.spawn_group(group);
            }
            EncounterSpec::Waves(waves) => {
                encounter.pending_waves = waves.into();
                if let Some(first) = encounter.pending_waves.pop_front() {
                    encounter.spawn_group(first);
                }
            }
            EncounterSpec::Endless(group) => {
                encounter.respawn_group = Some(group.clone());
                encounter.spawn_group(group);
            }
        }
        encounter
    }

    /// Appends `group` to the arena, assigning fresh handles.
    pub fn spawn_group(&mut self, group: Vec<Enemy>) -> Vec<CombatantId> {
        let mut ids = Vec::with_capacity(group.len());
        for mut enemy in group {
            let id = CombatantId(self.next_id);
            self.next_id += 1;
            enemy.id = id;
            self.arena.push(enemy);
            ids.push(id);
        }
        self.wave += 1;
        ids
    }

    // Handles are handed out in ascending order, so the arena stays sorted by id.
    fn position(&self, id: CombatantId) -> Option<usize> {
        self.arena.binary_search_by_key(&id, |e| e.id).ok()
    }

    pub fn get(&self, id: CombatantId) -> Option<&Enemy> {
        self.position(id).map(|i| &self.arena[i])
    }

    pub fn get_mut(&mut self, id: CombatantId) -> Option<&mut Enemy> {
        self.position(id).map(move |i| &mut self.arena[i])
    }

    pub fn is_alive(&self, id: CombatantId) -> bool {
        self.get(id).is_some_and(Enemy::is_alive)
    }

    /// Enemies of the current group, dead ones included.
    pub fn enemies(&self) -> &[Enemy] {
        &self.arena
    }

    pub fn living(&self) -> impl Iterator<Item = &Enemy> {
        self.arena.iter().filter(|e| e.is_alive())
    }

    pub fn living_ids(&self) -> Vec<CombatantId> {
        self.living().map(|e| e.id).collect()
    }

    pub fn living_count(&self) -> usize {
        self.living().count()
    }

    pub fn is_cleared(&self) -> bool {
        self.living().next().is_none()
    }

    /// Number of groups spawned so far (first wave is 1).
    pub fn wave(&self) -> u32 {
        self.wave
    }

    /// Forces target selection onto `id` while it lives.
    pub fn set_primary_override(&mut self, id: Option<CombatantId>) {
        self.primary_override = id;
    }

    /// The current primary target: the override if alive, else the first living enemy.
    pub fn primary_target(&self) -> Option<CombatantId> {
        if let Some(id) = self.primary_override {
            if self.is_alive(id) {
                return Some(id);
            }
        }
        self.living().next().map(|e| e.id)
    }

    /// Up to `max_targets` living enemies in enumeration order.
    ///
    /// With `include_primary` the primary target comes first; without it the primary
    /// is left out entirely.
    pub fn select_aoe_targets(&self, max_targets: usize, include_primary: bool) -> Vec<CombatantId> {
        let primary = self.primary_target();
        let mut targets = Vec::with_capacity(max_targets);
        if max_targets == 0 {
            return targets;
        }
        if include_primary {
            if let Some(p) = primary {
                targets.push(p);
            }
        }
        for enemy in self.living() {
            if targets.len() >= max_targets {
                break;
            }
            if Some(enemy.id) == primary {
                continue;
            }
            targets.push(enemy.id);
        }
        targets
    }

    /// Lands `amount` of already-mitigated damage on `id`.
    ///
    /// Hitting a dead or unknown target is a no-op.
    pub fn apply_damage(&mut self, id: CombatantId, amount: u32) -> DamageOutcome {
        let Some(enemy) = self.get_mut(id) else {
            return DamageOutcome::default();
        };
        if !enemy.is_alive() {
            return DamageOutcome::default();
        }
        let overkill = amount.saturating_sub(enemy.current_hp);
        enemy.current_hp = enemy.current_hp.saturating_sub(amount);
        DamageOutcome {
            amount,
            overkill,
            killed: enemy.current_hp == 0,
        }
    }

    /// The transition that follows once the current group is cleared, if any.
    pub fn next_transition(&self) -> Option<EncounterTransition> {
        if !self.pending_waves.is_empty() {
            Some(EncounterTransition::NextWave)
        } else if self.respawn_group.is_some() {
            Some(EncounterTransition::Respawn)
        } else {
            None
        }
    }

    /// Brings in the next group. Returns the new handles.
    ///
    /// Dead enemies of the previous group are dropped first; their handles stay
    /// retired so stale references resolve to nothing.
    pub fn advance(&mut self, transition: EncounterTransition) -> Vec<CombatantId> {
        self.arena.retain(Enemy::is_alive);
        match transition {
            EncounterTransition::NextWave => match self.pending_waves.pop_front() {
                Some(group) => self.spawn_group(group),
                None => Vec::new(),
            },
            EncounterTransition::Respawn => match &self.respawn_group {
                Some(group) => {
                    let fresh = group.iter().map(Enemy::revived).collect();
                    self.spawn_group(fresh)
                }
                None => Vec::new(),
            },
        }
    }

    /// A copy holding only living enemies plus future content, handles renumbered.
    ///
    /// Used when persisting a battle; handles are only meaningful within one run.
    pub fn compacted(&self) -> Encounter {
        let mut compact = Encounter {
            arena: Vec::new(),
            next_id: 0,
            pending_waves: self.pending_waves.clone(),
            respawn_group: self.respawn_group.clone(),
            primary_override: None,
            wave: self.wave.saturating_sub(1),
        };
        let living: Vec<Enemy> = self.living().cloned().collect();
        compact.spawn_group(living);
        compact
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_wolves() -> Encounter {
        Encounter::new(EncounterSpec::Group(vec![
            Enemy::new("Wolf A", 10, 1),
            Enemy::new("Wolf B", 10, 1),
            Enemy::new("Wolf C", 10, 1),
        ]))
    }

    #[test]
    fn test_handles_follow_registration_order() {
        let encounter = three_wolves();
        assert_eq!(
            encounter.living_ids(),
            vec![CombatantId(0), CombatantId(1), CombatantId(2)]
        );
        assert_eq!(encounter.primary_target(), Some(CombatantId(0)));
    }

    #[test]
    fn test_dead_enemy_skipped_without_reordering() {
        let mut encounter = three_wolves();
        let outcome = encounter.apply_damage(CombatantId(1), 25);
        assert!(outcome.killed);
        assert_eq!(outcome.overkill, 15);
        assert_eq!(encounter.living_ids(), vec![CombatantId(0), CombatantId(2)]);

        encounter.apply_damage(CombatantId(0), 10);
        assert_eq!(encounter.primary_target(), Some(CombatantId(2)));
    }

    #[test]
    fn test_aoe_selection_primary_first_and_capped() {
        let mut encounter = three_wolves();
        encounter.set_primary_override(Some(CombatantId(2)));
        assert_eq!(
            encounter.select_aoe_targets(2, true),
            vec![CombatantId(2), CombatantId(0)]
        );
        assert_eq!(
            encounter.select_aoe_targets(5, false),
            vec![CombatantId(0), CombatantId(1)]
        );
        assert!(encounter.select_aoe_targets(0, true).is_empty());
    }

    #[test]
    fn test_override_falls_back_when_dead() {
        let mut encounter = three_wolves();
        encounter.set_primary_override(Some(CombatantId(1)));
        encounter.apply_damage(CombatantId(1), 10);
        assert_eq!(encounter.primary_target(), Some(CombatantId(0)));
    }

    #[test]
    fn test_damage_to_dead_target_is_noop() {
        let mut encounter = three_wolves();
        encounter.apply_damage(CombatantId(0), 10);
        let again = encounter.apply_damage(CombatantId(0), 10);
        assert_eq!(again, DamageOutcome::default());
        assert_eq!(encounter.apply_damage(CombatantId(42), 10), DamageOutcome::default());
    }

    #[test]
    fn test_cleared_encounter_has_no_targets() {
        let mut encounter = Encounter::new(EncounterSpec::Single(Enemy::new("Rat", 5, 1)));
        encounter.apply_damage(CombatantId(0), 5);
        assert!(encounter.is_cleared());
        assert_eq!(encounter.primary_target(), None);
        assert!(encounter.select_aoe_targets(3, true).is_empty());
        assert_eq!(encounter.next_transition(), None);
    }

    #[test]
    fn test_waves_advance_in_order() {
        let mut encounter = Encounter::new(EncounterSpec::Waves(vec![
            vec![Enemy::new("Scout", 5, 1)],
            vec![Enemy::new("Brute", 20, 3), Enemy::new("Shaman", 10, 2)],
        ]));
        assert_eq!(encounter.wave(), 1);
        encounter.apply_damage(CombatantId(0), 5);
        assert_eq!(encounter.next_transition(), Some(EncounterTransition::NextWave));

        let spawned = encounter.advance(EncounterTransition::NextWave);
        assert_eq!(spawned, vec![CombatantId(1), CombatantId(2)]);
        assert_eq!(encounter.wave(), 2);
        assert_eq!(encounter.get(CombatantId(1)).unwrap().name, "Brute");
        assert_eq!(encounter.next_transition(), None);
    }

    #[test]
    fn test_endless_respawns_fresh_copies() {
        let mut encounter = Encounter::new(EncounterSpec::Endless(vec![Enemy::new("Slime", 8, 1)]));
        encounter.apply_damage(CombatantId(0), 8);
        assert_eq!(encounter.next_transition(), Some(EncounterTransition::Respawn));
        let spawned = encounter.advance(EncounterTransition::Respawn);
        assert_eq!(spawned, vec![CombatantId(1)]);
        assert_eq!(encounter.get(CombatantId(1)).unwrap().current_hp, 8);
    }

    #[test]
    fn test_compacted_keeps_living_and_future_waves() {
        let mut encounter = Encounter::new(EncounterSpec::Waves(vec![
            vec![Enemy::new("A", 5, 1), Enemy::new("B", 5, 1)],
            vec![Enemy::new("C", 5, 1)],
        ]));
        encounter.apply_damage(CombatantId(0), 5);
        let compact = encounter.compacted();
        assert_eq!(compact.enemies().len(), 1);
        assert_eq!(compact.enemies()[0].name, "B");
        assert_eq!(compact.enemies()[0].id, CombatantId(0));
        assert_eq!(compact.wave(), 1);
        assert_eq!(compact.next_transition(), Some(EncounterTransition::NextWave));
    }

    #[test]
    fn test_endless_arena_stays_bounded() {
        let mut encounter = Encounter::new(EncounterSpec::Endless(vec![
            Enemy::new("Slime", 8, 1),
            Enemy::new("Ooze", 8, 1),
        ]));
        for _ in 0..500 {
            for id in encounter.living_ids() {
                encounter.apply_damage(id, 8);
            }
            assert!(encounter.is_cleared());
            encounter.advance(EncounterTransition::Respawn);
            assert_eq!(encounter.enemies().len(), 2);
        }
        // Handles keep counting up and retired ones resolve to nothing.
        assert_eq!(encounter.living_ids(), vec![CombatantId(1000), CombatantId(1001)]);
        assert!(encounter.get(CombatantId(0)).is_none());
        assert_eq!(encounter.apply_damage(CombatantId(1), 8), DamageOutcome::default());
        assert_eq!(encounter.wave(), 501);
    }
}
