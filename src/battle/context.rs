//! The per-battle aggregate and its event handlers.
//!
//! A `BattleContext` owns every piece of mutable battle state: clock, random
//! stream, resources, buff/proc/skill engines, encounter and segment collector.
//! It is driven one [`ScheduledEvent`] at a time by the runner and is never
//! shared between battles.

use super::types::{BattleConfig, Termination};
use crate::activity::snapshot::BattleSnapshot;
use crate::buffs::types::{ApplyOutcome, BuffInstanceId, PeriodicKind};
use crate::buffs::{BuffEngine, BuffTarget};
use crate::character::CharacterStats;
use crate::combat::aoe::{plan_hits, AoeParams};
use crate::combat::encounter::Encounter;
use crate::combat::events::BattleEvent;
use crate::combat::segment::{self, Segment, SegmentCollector};
use crate::combat::types::{CombatantId, DamageOutcome, DamageType};
use crate::core::combat_math::{apply_damage, hasted_interval, is_alive, mitigate, roll_attack};
use crate::core::constants::*;
use crate::core::error::ConfigError;
use crate::core::rng::RandomStream;
use crate::core::timeline::{EncounterTransition, EventKind, ScheduledEvent, Timeline};
use crate::procs::{DamageSource, ProcAction, ProcBuffTarget, ProcContext, ProcEngine, ProcTrigger};
use crate::profession::{Profession, ProfessionModule};
use crate::skills::{AutoCastEngine, ResourcePools};
use tracing::{debug, trace};

pub struct BattleContext {
    timeline: Timeline,
    rng: RandomStream,
    stats: CharacterStats,
    resources: ResourcePools,
    buffs: BuffEngine,
    procs: ProcEngine,
    skills: AutoCastEngine,
    encounter: Encounter,
    segments: SegmentCollector,
    character_name: String,
    character_hp: u32,
    character_max_hp: u32,
    revives_left: u32,
    revives_used: u32,
    attack_interval: f64,
    special_interval: f64,
    kills: u32,
    kill_time: Option<f64>,
    overkill: u64,
    attack_deferred: bool,
    awaiting_transition: bool,
    termination: Option<Termination>,
    events: Option<Vec<BattleEvent>>,
}

impl BattleContext {
    /// Builds the context and registers every rule `module` declares.
    ///
    /// Fails before any event runs if a definition is invalid or references an
    /// unknown resource or buff.
    pub fn new(config: &BattleConfig, module: &dyn ProfessionModule) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut resources = ResourcePools::new();
        for pool in module.resources() {
            resources.insert(pool)?;
        }

        let mut buffs = BuffEngine::new();
        module.register_buff_definitions(&mut buffs)?;
        for def in buffs.definitions() {
            if let Some(resource) = &def.periodic_resource_id {
                if def.periodic_kind == PeriodicKind::Resource && !resources.has(resource) {
                    return Err(ConfigError::UnknownResource {
                        owner: def.id.clone(),
                        resource: resource.clone(),
                    });
                }
            }
        }

        let mut procs = ProcEngine::new();
        module.register_proc_definitions(&mut procs)?;
        procs.validate_buff_refs(&buffs)?;

        let mut skills = AutoCastEngine::new();
        for skill in module.build_skills() {
            skills.register(skill)?;
        }
        skills.validate_resources(&resources)?;

        let max_hp = config.stats.max_hp();
        Ok(Self {
            timeline: Timeline::new(),
            rng: RandomStream::new(config.seed),
            stats: config.stats,
            resources,
            buffs,
            procs,
            skills,
            encounter: Encounter::new(config.encounter.clone()),
            segments: SegmentCollector::new(0.0, config.segment_seconds),
            character_name: config.character_name.clone(),
            character_hp: max_hp,
            character_max_hp: max_hp,
            revives_left: config.revives,
            revives_used: 0,
            attack_interval: config.attack_interval,
            special_interval: config.special_interval,
            kills: 0,
            kill_time: None,
            overkill: 0,
            attack_deferred: false,
            awaiting_transition: false,
            termination: None,
            events: config.record_events.then(Vec::new),
        })
    }

    /// Continues from a persisted snapshot instead of a fresh encounter.
    ///
    /// Must be called before [`BattleContext::start`].
    pub fn restore(&mut self, snapshot: &BattleSnapshot) {
        self.rng = snapshot.rng.clone();
        self.encounter = snapshot.encounter.clone();
        self.kills = snapshot.kills;
        self.character_hp = match snapshot.character_hp {
            0 => self.character_max_hp,
            hp => hp.min(self.character_max_hp),
        };
    }

    /// Captures what a later run needs to continue this battle.
    pub fn snapshot(&self, profession: &Profession, simulated_seconds: f64) -> BattleSnapshot {
        BattleSnapshot::new(
            profession.clone(),
            self.rng.clone(),
            self.encounter.compacted(),
            self.character_hp,
            self.kills,
            simulated_seconds,
        )
    }

    pub fn enable_event_recording(&mut self) {
        if self.events.is_none() {
            self.events = Some(Vec::new());
        }
    }

    /// Schedules the opening events and runs the start hook.
    pub fn start(&mut self, module: &dyn ProfessionModule) {
        let now = self.timeline.now();
        self.timeline.schedule_at(now, EventKind::SpecialPulse);
        self.timeline.schedule_at(now, EventKind::AttackTick);
        self.refresh_primary(module);
        module.on_battle_start(self);
        let ids = self.encounter.living_ids();
        self.schedule_enemy_attacks(&ids);
        if self.encounter.is_cleared() {
            self.on_group_cleared();
        }
    }

    pub fn now(&self) -> f64 {
        self.timeline.now()
    }

    pub fn stats(&self) -> &CharacterStats {
        &self.stats
    }

    pub fn encounter(&self) -> &Encounter {
        &self.encounter
    }

    pub fn buffs(&self) -> &BuffEngine {
        &self.buffs
    }

    pub fn procs(&self) -> &ProcEngine {
        &self.procs
    }

    pub fn skills(&self) -> &AutoCastEngine {
        &self.skills
    }

    pub fn resources(&self) -> &ResourcePools {
        &self.resources
    }

    pub fn resource(&self, id: &str) -> f64 {
        self.resources.current(id)
    }

    pub fn character_hp(&self) -> u32 {
        self.character_hp
    }

    pub fn character_max_hp(&self) -> u32 {
        self.character_max_hp
    }

    pub fn revives_used(&self) -> u32 {
        self.revives_used
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    pub fn kill_time(&self) -> Option<f64> {
        self.kill_time
    }

    pub fn overkill(&self) -> u64 {
        self.overkill
    }

    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn running_damage(&self) -> u64 {
        self.segments.running_damage()
    }

    pub fn segments_so_far(&self) -> Vec<Segment> {
        self.segments.segments_so_far()
    }

    pub fn has_buff(&self, buff_id: &str, target: BuffTarget) -> bool {
        self.buffs.has_active(buff_id, target, self.now())
    }

    /// Drains the event records collected since the last call.
    pub fn take_events(&mut self) -> Vec<BattleEvent> {
        self.events.as_mut().map(std::mem::take).unwrap_or_default()
    }

    pub(crate) fn pop_before(&mut self, horizon: f64) -> Option<ScheduledEvent> {
        self.timeline.pop_before(horizon)
    }

    pub(crate) fn finish_segments(self, end_time: f64) -> Vec<Segment> {
        self.segments.finish(end_time)
    }

    pub fn tag(&mut self, tag: impl Into<String>) {
        self.segments.tag(tag);
    }

    pub fn add_resource(&mut self, id: &str, amount: f64) -> f64 {
        self.resources.gain(id, amount)
    }

    /// Applies `buff_id` to `target` now and schedules its first tick.
    ///
    /// Returns `None` for an unknown buff or a dead target.
    pub fn apply_buff(&mut self, buff_id: &str, target: BuffTarget) -> Option<ApplyOutcome> {
        if let BuffTarget::Enemy(id) = target {
            if !self.encounter.is_alive(id) {
                return None;
            }
        }
        let now = self.now();
        let outcome = self
            .buffs
            .apply(buff_id, now, target, self.stats.haste_factor())?;
        self.segments.tag(segment::buff_apply_tag(buff_id));
        if let Some(at) = outcome.schedule_tick_at {
            self.timeline.schedule_at(
                at,
                EventKind::BuffTick {
                    instance: outcome.instance,
                },
            );
        }
        Some(outcome)
    }

    /// Deals `raw` damage from `source` with a single crit roll and proc
    /// evaluation, distributed according to `aoe`. Returns the damage dealt.
    pub fn deal_damage(
        &mut self,
        source: DamageSource,
        raw: f64,
        damage_type: DamageType,
        aoe: &AoeParams,
    ) -> u64 {
        if matches!(source, DamageSource::Proc(_)) {
            return self.resolve_hits(&source, raw, damage_type, aoe, false);
        }
        self.strike(source, raw, damage_type, aoe)
    }

    pub fn handle(&mut self, event: ScheduledEvent, module: &dyn ProfessionModule) {
        let now = event.time;
        trace!(time = now, seq = event.seq, kind = event.kind.name(), "event");
        self.segments.advance_to(now);
        for expired in self.buffs.purge_expired(now) {
            self.segments.tag(segment::buff_expire_tag(&expired.buff_id));
        }
        self.refresh_primary(module);

        match event.kind {
            EventKind::AttackTick => self.on_attack_tick(module),
            EventKind::SpecialPulse => self.on_special_pulse(module),
            EventKind::BuffTick { instance } => self.on_buff_tick(instance),
            EventKind::SkillCooldownReady { .. } => self.decide(module),
            EventKind::CastComplete { skill } => self.on_cast_complete(skill, module),
            EventKind::EnemyAttack { enemy } => self.on_enemy_attack(enemy),
            EventKind::EncounterTransition(transition) => self.on_transition(transition, module),
        }
    }

    fn refresh_primary(&mut self, module: &dyn ProfessionModule) {
        let primary = module.select_primary_target(&self.encounter);
        self.encounter.set_primary_override(primary);
    }

    fn on_attack_tick(&mut self, module: &dyn ProfessionModule) {
        if self.skills.attack_locked() {
            self.attack_deferred = true;
            return;
        }
        if let Some(target) = self.encounter.primary_target() {
            self.record_attack_started(target, "attacks");
            self.segments.tag(segment::TAG_BASIC_ATTACK);
            let raw = self.stats.basic_attack_damage();
            self.strike(
                DamageSource::BasicAttack,
                raw,
                DamageType::Physical,
                &AoeParams::single(),
            );
            module.on_attack_tick(self);
        }

        let interval = hasted_interval(self.attack_interval, self.stats.haste_percent);
        let now = self.now();
        self.timeline.schedule_at(now + interval, EventKind::AttackTick);
        self.record(BattleEvent::AttackTick {
            event_time: now,
            next_trigger_time: now + interval,
            interval,
        });
        self.decide(module);
    }

    fn on_special_pulse(&mut self, module: &dyn ProfessionModule) {
        self.resources.regen_all();
        module.on_special_pulse(self);
        self.decide(module);
        let next = self.now() + self.special_interval;
        self.timeline.schedule_at(next, EventKind::SpecialPulse);
    }

    /// Casts skills in priority order until nothing qualifies.
    fn decide(&mut self, module: &dyn ProfessionModule) {
        for _ in 0..MAX_CASTS_PER_DECISION {
            if self.termination.is_some() || self.encounter.is_cleared() {
                return;
            }
            let now = self.now();
            let Some(index) = self.skills.select(now, &self.resources) else {
                return;
            };
            let Some(start) = self.skills.begin_cast(index, now, &mut self.resources) else {
                return;
            };
            let Some(skill_id) = self.skills.skill(index).map(|s| s.id.clone()) else {
                return;
            };

            self.segments.tag(segment::skill_cast_tag(&skill_id));
            if let Some(target) = self.encounter.primary_target() {
                self.record_attack_started(target, &format!("begins {skill_id} on"));
            }
            for ready in [start.cooldown_ready_at, start.gcd_ready_at].into_iter().flatten() {
                self.timeline
                    .schedule_at(ready, EventKind::SkillCooldownReady { skill: index });
            }
            match start.completes_at {
                Some(at) => {
                    self.timeline
                        .schedule_at(at, EventKind::CastComplete { skill: index });
                }
                None => self.resolve_skill(index, module),
            }
        }
    }

    fn on_cast_complete(&mut self, index: usize, module: &dyn ProfessionModule) {
        if self.skills.complete_cast(index).is_none() {
            return;
        }
        self.resolve_skill(index, module);
        if std::mem::take(&mut self.attack_deferred) {
            self.on_attack_tick(module);
        } else {
            self.decide(module);
        }
    }

    fn resolve_skill(&mut self, index: usize, module: &dyn ProfessionModule) {
        let Some(skill) = self.skills.skill(index).cloned() else {
            return;
        };
        let source = DamageSource::Skill(skill.id.clone());
        let raw = skill.raw_damage(self.stats.attack_power, self.stats.spell_power);
        if raw > 0.0 {
            self.strike(source.clone(), raw, skill.damage_type, &skill.aoe);
        }
        module.on_skill_cast(self, &skill.id);
        let target = self.encounter.primary_target();
        self.fire_procs(ProcContext {
            trigger: ProcTrigger::OnSkillCast,
            now: self.now(),
            source,
            damage_type: Some(skill.damage_type),
            target,
        });
    }

    fn on_buff_tick(&mut self, instance: BuffInstanceId) {
        let now = self.now();
        let Some(tick) = self.buffs.tick(
            instance,
            now,
            self.stats.haste_factor(),
            self.stats.attack_power,
            self.stats.spell_power,
        ) else {
            return;
        };
        if let Some(next) = tick.next_tick_at {
            self.timeline.schedule_at(next, EventKind::BuffTick { instance });
        }
        self.segments.tag(segment::buff_tick_tag(&tick.buff_id));

        match tick.kind {
            PeriodicKind::Damage => {
                let BuffTarget::Enemy(target) = tick.target else {
                    return;
                };
                let source = DamageSource::Dot(tick.buff_id.clone());
                if self.hit_enemy(target, &source, tick.value, tick.damage_type, false).is_none() {
                    return;
                }
                for trigger in [ProcTrigger::OnDotTick, ProcTrigger::OnHit] {
                    self.fire_procs(ProcContext {
                        trigger,
                        now,
                        source: source.clone(),
                        damage_type: Some(tick.damage_type),
                        target: Some(target),
                    });
                }
            }
            PeriodicKind::Heal => {
                let heal = tick.value.round().max(0.0) as u32;
                self.character_hp = self.character_hp.saturating_add(heal).min(self.character_max_hp);
            }
            PeriodicKind::Resource => {
                if let Some(resource) = &tick.resource_id {
                    self.resources.gain(resource, tick.value);
                }
            }
            PeriodicKind::None => {}
        }
    }

    fn on_enemy_attack(&mut self, enemy: CombatantId) {
        let Some(attacker) = self.encounter.get(enemy) else {
            return;
        };
        if !attacker.is_alive() || self.termination.is_some() {
            return;
        }
        let damage = attacker.damage;
        let interval = attacker.attack_interval;
        let attacker_name = attacker.name.clone();

        self.character_hp = apply_damage(self.character_hp, damage);
        let now = self.now();
        self.record(BattleEvent::DamageReceived {
            event_time: now,
            source_skill_id: "enemy_attack".to_string(),
            damage,
            is_crit: false,
            target_current_hp: self.character_hp,
            target_max_hp: self.character_max_hp,
            attacker_name: attacker_name.clone(),
            target_name: self.character_name.clone(),
            message: format!("{attacker_name} hits {} for {damage}", self.character_name),
        });
        self.timeline
            .schedule_at(now + interval, EventKind::EnemyAttack { enemy });

        if !is_alive(self.character_hp) {
            self.on_character_death();
        }
    }

    fn on_character_death(&mut self) {
        if self.revives_left > 0 {
            self.revives_left -= 1;
            self.revives_used += 1;
            self.character_hp = self.character_max_hp;
            self.segments.tag(segment::TAG_REVIVE);
            debug!(time = self.now(), "character revived");
        } else {
            debug!(time = self.now(), "character died");
            self.termination = Some(Termination::CharacterDied);
        }
    }

    fn on_transition(&mut self, transition: EncounterTransition, module: &dyn ProfessionModule) {
        self.awaiting_transition = false;
        let ids = self.encounter.advance(transition);
        // The character recovers fully while the next group closes in.
        self.character_hp = self.character_max_hp;
        self.segments.tag(segment::TAG_WAVE);
        debug!(time = self.now(), wave = self.encounter.wave(), ?transition, "next group");
        self.schedule_enemy_attacks(&ids);
        self.refresh_primary(module);
        self.decide(module);
    }

    fn schedule_enemy_attacks(&mut self, ids: &[CombatantId]) {
        let now = self.now();
        for &id in ids {
            if let Some(enemy) = self.encounter.get(id) {
                if enemy.damage > 0 && enemy.attack_interval > 0.0 {
                    let at = now + enemy.attack_interval;
                    self.timeline.schedule_at(at, EventKind::EnemyAttack { enemy: id });
                }
            }
        }
    }

    /// One crit roll shared by every hit, then OnHit per landed hit and OnCrit once.
    fn strike(
        &mut self,
        source: DamageSource,
        raw: f64,
        damage_type: DamageType,
        aoe: &AoeParams,
    ) -> u64 {
        if self.encounter.is_cleared() {
            return 0;
        }
        let roll = roll_attack(
            raw,
            self.stats.crit_chance,
            self.stats.crit_multiplier,
            &mut self.rng,
        );
        let (raw, is_crit) = (roll.damage, roll.is_crit);
        if is_crit {
            self.segments.tag(segment::crit_tag(source.label()));
        }

        let hits = plan_hits(&self.encounter, raw, aoe);
        let mut dealt = 0;
        let mut landed = Vec::with_capacity(hits.len());
        for hit in hits {
            if let Some(outcome) = self.hit_enemy(hit.target, &source, hit.raw, damage_type, is_crit) {
                dealt += u64::from(outcome.amount);
                landed.push(hit.target);
            }
        }

        let now = self.now();
        for &target in &landed {
            self.fire_procs(ProcContext {
                trigger: ProcTrigger::OnHit,
                now,
                source: source.clone(),
                damage_type: Some(damage_type),
                target: Some(target),
            });
        }
        if is_crit {
            if let Some(&target) = landed.first() {
                self.fire_procs(ProcContext {
                    trigger: ProcTrigger::OnCrit,
                    now,
                    source,
                    damage_type: Some(damage_type),
                    target: Some(target),
                });
            }
        }
        dealt
    }

    /// Distributes `raw` without crits or proc evaluation.
    fn resolve_hits(
        &mut self,
        source: &DamageSource,
        raw: f64,
        damage_type: DamageType,
        aoe: &AoeParams,
        is_crit: bool,
    ) -> u64 {
        let hits = plan_hits(&self.encounter, raw, aoe);
        hits.into_iter()
            .filter_map(|hit| self.hit_enemy(hit.target, source, hit.raw, damage_type, is_crit))
            .map(|outcome| u64::from(outcome.amount))
            .sum()
    }

    /// Mitigates and lands one hit. `None` if the target was already dead.
    fn hit_enemy(
        &mut self,
        target: CombatantId,
        source: &DamageSource,
        raw: f64,
        damage_type: DamageType,
        is_crit: bool,
    ) -> Option<DamageOutcome> {
        let enemy = self.encounter.get(target).filter(|e| e.is_alive())?;
        let amount = mitigate(raw, damage_type, &enemy.mitigation);
        let outcome = self.encounter.apply_damage(target, amount);

        self.segments.add_damage(u64::from(outcome.amount));
        self.overkill += u64::from(outcome.overkill);

        if self.events.is_some() {
            if let Some(enemy) = self.encounter.get(target) {
                let event = BattleEvent::DamageApplied {
                    event_time: self.now(),
                    source_skill_id: source.label().to_string(),
                    damage: outcome.amount,
                    is_crit,
                    target_current_hp: enemy.current_hp,
                    target_max_hp: enemy.max_hp,
                    attacker_name: self.character_name.clone(),
                    target_name: enemy.name.clone(),
                    message: format!(
                        "{} hits {} for {}{}",
                        self.character_name,
                        enemy.name,
                        outcome.amount,
                        if is_crit { " (critical)" } else { "" }
                    ),
                };
                self.record(event);
            }
        }

        if outcome.killed {
            self.on_enemy_killed(target, source);
        }
        Some(outcome)
    }

    fn on_enemy_killed(&mut self, target: CombatantId, source: &DamageSource) {
        self.kills += 1;
        self.segments.tag(segment::TAG_KILL);
        self.buffs.remove_target(BuffTarget::Enemy(target));
        debug!(time = self.now(), %target, source = source.label(), "enemy killed");

        if !matches!(source, DamageSource::Proc(_)) {
            self.fire_procs(ProcContext {
                trigger: ProcTrigger::OnKill,
                now: self.now(),
                source: source.clone(),
                damage_type: None,
                target: Some(target),
            });
        }
        if self.encounter.is_cleared() {
            self.on_group_cleared();
        }
    }

    fn on_group_cleared(&mut self) {
        if self.awaiting_transition || self.termination.is_some() {
            return;
        }
        if self.kill_time.is_none() && self.kills > 0 {
            self.kill_time = Some(self.now());
        }
        match self.encounter.next_transition() {
            Some(transition) => {
                let delay = match transition {
                    EncounterTransition::NextWave => WAVE_TRANSITION_DELAY_SECONDS,
                    EncounterTransition::Respawn => ENEMY_RESPAWN_SECONDS,
                };
                self.awaiting_transition = true;
                self.timeline
                    .schedule_in(delay, EventKind::EncounterTransition(transition));
            }
            None => {
                debug!(time = self.now(), "encounter cleared");
                self.termination = Some(Termination::EncounterCleared);
            }
        }
    }

    fn fire_procs(&mut self, ctx: ProcContext) {
        let fired = self.procs.on_event(&ctx, &mut self.rng, &mut self.segments);
        for proc in fired {
            match proc.action {
                ProcAction::ApplyBuff { buff_id, target } => {
                    let target = match target {
                        ProcBuffTarget::Caster => Some(BuffTarget::Caster),
                        ProcBuffTarget::EventTarget => proc
                            .target
                            .filter(|&id| self.encounter.is_alive(id))
                            .or_else(|| self.encounter.primary_target())
                            .map(BuffTarget::Enemy),
                    };
                    if let Some(target) = target {
                        self.apply_buff(&buff_id, target);
                    }
                }
                ProcAction::DealDamage { value, damage_type } => {
                    let source = DamageSource::Proc(proc.proc_id);
                    self.resolve_hits(&source, value, damage_type, &proc.aoe, false);
                }
            }
        }
    }

    fn record(&mut self, event: BattleEvent) {
        if let Some(events) = self.events.as_mut() {
            events.push(event);
        }
    }

    fn record_attack_started(&mut self, target: CombatantId, verb: &str) {
        if self.events.is_none() {
            return;
        }
        let target_name = self
            .encounter
            .get(target)
            .map(|e| e.name.clone())
            .unwrap_or_default();
        let event = BattleEvent::AttackStarted {
            event_time: self.now(),
            attacker_name: self.character_name.clone(),
            target_name: target_name.clone(),
            message: format!("{} {verb} {target_name}", self.character_name),
        };
        self.record(event);
    }
}
