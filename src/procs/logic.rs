//! Reactive effects evaluated at hit, crit, cast and kill points.

use super::types::*;
use crate::buffs::BuffEngine;
use crate::combat::segment::{proc_tag, SegmentCollector};
use crate::core::constants::TIME_EPSILON;
use crate::core::error::ConfigError;
use crate::core::rng::RandomStream;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Default)]
pub struct ProcEngine {
    definitions: Vec<ProcDefinition>,
    last_trigger: BTreeMap<String, f64>,
}

impl ProcEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_definition(&mut self, def: ProcDefinition) -> Result<(), ConfigError> {
        def.validate()?;
        if let Some(existing) = self.definitions.iter().find(|d| d.id == def.id) {
            if *existing == def {
                return Ok(());
            }
            return Err(ConfigError::DuplicateId(def.id));
        }
        self.definitions.push(def);
        Ok(())
    }

    /// Every `ApplyBuff` action must name a registered buff.
    pub fn validate_buff_refs(&self, buffs: &BuffEngine) -> Result<(), ConfigError> {
        for def in &self.definitions {
            if let ProcAction::ApplyBuff { buff_id, .. } = &def.action {
                if buffs.definition(buff_id).is_none() {
                    return Err(ConfigError::UnknownBuff {
                        proc_id: def.id.clone(),
                        buff_id: buff_id.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn definitions(&self) -> &[ProcDefinition] {
        &self.definitions
    }

    pub fn last_trigger_time(&self, proc_id: &str) -> Option<f64> {
        self.last_trigger.get(proc_id).copied()
    }

    /// Evaluates every matching proc in registration order.
    ///
    /// A proc still on internal cooldown is skipped without consuming a roll.
    /// Successful procs are tagged in `segments` and returned for execution.
    pub fn on_event(
        &mut self,
        ctx: &ProcContext,
        rng: &mut RandomStream,
        segments: &mut SegmentCollector,
    ) -> Vec<FiredProc> {
        let mut fired = Vec::new();
        for def in &self.definitions {
            if !def.matches(ctx) {
                continue;
            }
            if let Some(last) = self.last_trigger.get(&def.id) {
                if ctx.now - last < def.icd_seconds - TIME_EPSILON {
                    continue;
                }
            }
            if !rng.roll(def.chance) {
                continue;
            }
            self.last_trigger.insert(def.id.clone(), ctx.now);
            segments.tag(proc_tag(&def.id));
            debug!(proc = %def.id, time = ctx.now, source = ctx.source.label(), "proc fired");
            fired.push(FiredProc {
                proc_id: def.id.clone(),
                action: def.action.clone(),
                aoe: def.aoe,
                target: ctx.target,
            });
        }
        fired
    }
}
