//! Gate links: name resolution, teleporting and the fade choreography
//! around it.

use glam::Vec2;

use crate::api::error::GameError;
use crate::api::types::{EntityId, WorldEvent};
use crate::core::world::World;

/// The gate `gate` links to. Targets match by exact name among live gates;
/// anything other than exactly one match resolves to nothing.
pub fn resolve_target(world: &World, gate: EntityId) -> Option<EntityId> {
    let target = world.get(gate)?.gate.as_ref()?.target.as_deref()?;
    let mut matches = world
        .live()
        .filter(|e| e.id != gate && e.gate.is_some() && e.name_is(target))
        .map(|e| e.id);
    match (matches.next(), matches.next()) {
        (Some(id), None) => Some(id),
        (None, _) => {
            log::warn!("gate {:?}: target {:?} matches no gate", gate, target);
            None
        }
        (Some(_), Some(_)) => {
            log::warn!("gate {:?}: target {:?} matches several gates", gate, target);
            None
        }
    }
}

/// Where a traveller stands after coming out of `gate`: its feet anchor.
pub fn exit_anchor(world: &World, gate: EntityId) -> Option<Vec2> {
    world.get(gate).filter(|e| e.gate.is_some()).map(|e| e.pos)
}

/// Move `traveller` from gate `from` to the gate it links to. Returns the
/// destination, or `None` (and leaves the traveller alone) when the link
/// does not resolve.
pub fn teleport(world: &mut World, traveller: EntityId, from: EntityId) -> Option<EntityId> {
    let to = resolve_target(world, from)?;
    let anchor = exit_anchor(world, to)?;
    let entity = world.get_mut(traveller)?;
    entity.pos = anchor;
    if let Some(body) = entity.body.as_mut() {
        body.velocity = Vec2::ZERO;
        body.ground = None;
        body.on_ground = false;
        body.jumping_down = false;
    }
    log::info!("entity {:?} teleported from gate {:?} to {:?}", traveller, from, to);
    world.emit(WorldEvent::Teleported {
        entity: traveller,
        from,
        to,
    });
    Some(to)
}

/// Check at level build time that every targeted gate resolves to exactly
/// one other gate in the current campaign.
pub fn validate_gates(world: &World) -> Result<(), GameError> {
    for entity in world.live() {
        let Some(target) = entity.gate.as_ref().and_then(|g| g.target.as_deref()) else {
            continue;
        };
        let count = world
            .live()
            .filter(|e| e.id != entity.id && e.gate.is_some() && e.name_is(target))
            .count();
        if count != 1 {
            return Err(GameError::UnresolvedGate {
                gate: entity.name.clone().unwrap_or_else(|| format!("{:?}", entity.id)),
                target: target.to_string(),
            });
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitStep {
    Continue,
    /// The screen is fully covered: move the traveller now.
    Arrive,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransitPhase {
    Closing,
    Opening,
}

/// A trip through a gate: fade to black, move, fade back in.
#[derive(Debug, Clone, PartialEq)]
pub struct GateTransit {
    pub traveller: EntityId,
    pub from: EntityId,
    /// Seconds per half.
    pub duration: f32,
    elapsed: f32,
    phase: TransitPhase,
}

impl GateTransit {
    pub fn new(traveller: EntityId, from: EntityId, duration: f32) -> Self {
        Self {
            traveller,
            from,
            duration: duration.max(0.0),
            elapsed: 0.0,
            phase: TransitPhase::Closing,
        }
    }

    pub fn advance(&mut self, dt: f32) -> TransitStep {
        self.elapsed += dt;
        if self.elapsed < self.duration {
            return TransitStep::Continue;
        }
        match self.phase {
            TransitPhase::Closing => {
                self.phase = TransitPhase::Opening;
                self.elapsed = 0.0;
                TransitStep::Arrive
            }
            TransitPhase::Opening => TransitStep::Done,
        }
    }

    /// Screen coverage: 0 clear, 1 fully black.
    pub fn cover(&self) -> f32 {
        let t = if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        };
        match self.phase {
            TransitPhase::Closing => t,
            TransitPhase::Opening => 1.0 - t,
        }
    }
}
