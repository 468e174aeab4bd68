//! Queue what the world looks like this frame into a [`Renderer`].

use std::collections::HashMap;

use crate::api::types::{Color, EntityId};
use crate::components::aseprite::AsepriteSheet;
use crate::components::entity::{Appearance, Entity, EntityKind};
use crate::components::layer::RenderingLayer;
use crate::core::bounds::Bounds;
use crate::core::world::World;
use crate::renderer::context::TextStyle;
use crate::renderer::item::{DrawCommand, ParticleSprite, RenderingItem};
use crate::renderer::queue::{Renderer, SpriteOptions};

/// Within a layer, scenery first and the player last.
fn draw_priority(kind: EntityKind) -> u8 {
    match kind {
        EntityKind::Player => 3,
        EntityKind::Npc => 2,
        EntityKind::Particles => 1,
        _ => 0,
    }
}

/// Pick the sheet tag for a body's state, falling back to `base` when the
/// sheet lacks the state's tag.
fn animation_tag<'a>(entity: &Entity, base: &'a str, sheet: &AsepriteSheet) -> &'a str {
    let state = match entity.body {
        Some(body) if !body.floating && !body.on_ground => "jump",
        Some(body) if body.velocity.x != 0.0 => "walk",
        _ => return base,
    };
    if sheet.has_tag(state) {
        state
    } else {
        base
    }
}

/// Queue every live entity's appearance and particles. `time` drives sprite
/// animation.
pub fn queue_entities(
    world: &World,
    sheets: &HashMap<String, AsepriteSheet>,
    time: f32,
    renderer: &mut Renderer,
) {
    let mut entities: Vec<&Entity> = world.live().collect();
    entities.sort_by_key(|e| draw_priority(e.kind));

    for entity in entities {
        match &entity.appearance {
            Appearance::Hidden => {}
            Appearance::Rect { color, layer } => {
                let rect = Bounds::new(-entity.size.x / 2.0, -entity.size.y, entity.size.x, entity.size.y);
                renderer.add(RenderingItem::rect(*layer, rect, *color).at(entity.pos));
            }
            Appearance::Sprite { sheet, tag, layer } => {
                let Some(sheet) = sheets.get(sheet) else {
                    log::debug!("entity {:?}: sheet {:?} not loaded", entity.id, sheet);
                    continue;
                };
                let options = SpriteOptions {
                    facing: entity.facing,
                    time,
                    ..SpriteOptions::default()
                };
                let tag = animation_tag(entity, tag, sheet);
                renderer.add_aseprite(sheet, tag, entity.pos, *layer, options);
            }
        }

        if let Some(emitter) = &entity.emitter {
            if emitter.particles.is_empty() {
                continue;
            }
            let particles = emitter
                .particles
                .iter()
                .map(|p| ParticleSprite {
                    pos: p.pos,
                    size: p.size,
                    alpha: p.fade(),
                })
                .collect();
            renderer.add(RenderingItem::new(
                RenderingLayer::Particles,
                DrawCommand::Particles {
                    particles,
                    color: emitter.color,
                },
            ));
        }
    }
}

/// Speech bubbles over NPCs the `listener` is standing close to.
pub fn queue_speech(world: &World, listener: EntityId, style: &TextStyle, renderer: &mut Renderer) {
    let Some(area) = world.bounds_of(listener) else {
        return;
    };
    for entity in world.live() {
        let Some(speech) = entity.npc.as_ref().and_then(|npc| {
            let near = entity.bounds().expand(npc.talk_margin).intersects(&area);
            npc.speech.as_deref().filter(|_| near)
        }) else {
            continue;
        };
        let anchor = entity.pos + glam::Vec2::new(0.0, entity.size.y + 4.0);
        renderer.add(
            RenderingItem::new(
                RenderingLayer::Dialog,
                DrawCommand::SpeechBubble {
                    text: speech.to_string(),
                    style: style.clone(),
                    background: Color::rgba(0, 0, 0, 200),
                    padding: 3.0,
                },
            )
            .at(anchor),
        );
    }
}

/// Outline every live entity's box on the debug layer.
pub fn queue_debug(world: &World, renderer: &mut Renderer) {
    for entity in world.live() {
        let color = match entity.kind {
            EntityKind::Player => Color::rgba(0, 255, 0, 96),
            EntityKind::Gate => Color::rgba(255, 0, 255, 96),
            EntityKind::Trigger => Color::rgba(255, 255, 0, 64),
            EntityKind::CameraBounds => Color::rgba(0, 255, 255, 32),
            _ => Color::rgba(255, 0, 0, 96),
        };
        let rect = Bounds::new(-entity.size.x / 2.0, -entity.size.y, entity.size.x, entity.size.y);
        renderer.add(RenderingItem::rect(RenderingLayer::Debug, rect, color).at(entity.pos));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::PhysicsConfig;
    use crate::api::types::ImageId;
    use crate::components::emitter::{EmissionMode, EmitterComponent};
    use crate::components::npc::NpcBehavior;
    use crate::core::collision_map::CollisionMap;
    use crate::core::physics::PhysicsBody;
    use crate::renderer::recording::{DrawCall, RecordingContext};
    use glam::Vec2;

    fn world() -> World {
        World::new(CollisionMap::new(200, 100), PhysicsConfig::default())
    }

    fn add(w: &mut World, kind: EntityKind, x: f32, appearance: Appearance) -> EntityId {
        let id = w.next_id();
        w.insert(
            Entity::new(id, kind)
                .with_pos(Vec2::new(x, 10.0))
                .with_size(Vec2::new(10.0, 20.0))
                .with_appearance(appearance),
        );
        id
    }

    fn rect(color: Color) -> Appearance {
        Appearance::Rect {
            color,
            layer: RenderingLayer::Entities,
        }
    }

    #[test]
    fn rects_anchor_at_feet_and_player_draws_last() {
        let mut w = world();
        add(&mut w, EntityKind::Player, 50.0, rect(Color::WHITE));
        add(&mut w, EntityKind::Prop, 20.0, rect(Color::BLACK));
        add(&mut w, EntityKind::Gate, 80.0, Appearance::Hidden);

        let mut renderer = Renderer::new();
        queue_entities(&w, &HashMap::new(), 0.0, &mut renderer);
        assert_eq!(renderer.len(), 2);

        let mut ctx = RecordingContext::new();
        renderer.draw_visible_layers(&mut ctx, 0);
        let rects = ctx.rects();
        assert_eq!(rects[0].1, Color::BLACK);
        assert_eq!(rects[1].1, Color::WHITE);
        assert_eq!(rects[1].0, Bounds::new(-5.0, -20.0, 10.0, 20.0));
        assert!(ctx.calls.contains(&DrawCall::Translate(50.0, -10.0)));
    }

    #[test]
    fn sprites_follow_body_state() {
        let json = r#"{
            "frames": [
                { "frame": { "x": 0, "y": 0, "w": 16, "h": 16 }, "duration": 100 },
                { "frame": { "x": 16, "y": 0, "w": 16, "h": 16 }, "duration": 100 }
            ],
            "meta": { "frameTags": [
                { "name": "idle", "from": 0, "to": 0 },
                { "name": "walk", "from": 1, "to": 1 }
            ] }
        }"#;
        let mut sheets = HashMap::new();
        sheets.insert("hero".to_string(), AsepriteSheet::from_json(json, ImageId(3)).unwrap());

        let mut w = world();
        let hero = add(
            &mut w,
            EntityKind::Player,
            50.0,
            Appearance::Sprite {
                sheet: "hero".into(),
                tag: "idle".into(),
                layer: RenderingLayer::Player,
            },
        );
        let mut body = PhysicsBody::new().with_velocity(Vec2::new(2.0, 0.0));
        body.on_ground = true;
        w.get_mut(hero).unwrap().body = Some(body);

        let mut renderer = Renderer::new();
        queue_entities(&w, &sheets, 0.0, &mut renderer);
        let mut ctx = RecordingContext::new();
        renderer.draw_visible_layers(&mut ctx, 0);
        assert!(ctx.calls.iter().any(|c| matches!(
            c,
            DrawCall::Image { image: ImageId(3), source: Some(src), .. } if src.x == 16.0
        )));
    }

    #[test]
    fn missing_sheet_queues_nothing() {
        let mut w = world();
        add(
            &mut w,
            EntityKind::Prop,
            50.0,
            Appearance::Sprite {
                sheet: "nope".into(),
                tag: "idle".into(),
                layer: RenderingLayer::Entities,
            },
        );
        let mut renderer = Renderer::new();
        queue_entities(&w, &HashMap::new(), 0.0, &mut renderer);
        assert!(renderer.is_empty());
    }

    #[test]
    fn particles_draw_in_world_space() {
        let mut w = world();
        let id = add(&mut w, EntityKind::Particles, 40.0, Appearance::Hidden);
        let mut emitter = EmitterComponent::new()
            .with_mode(EmissionMode::Burst)
            .with_burst_count(3);
        emitter.tick(Vec2::new(40.0, 10.0), 0.0);
        w.get_mut(id).unwrap().emitter = Some(emitter);

        let mut renderer = Renderer::new();
        queue_entities(&w, &HashMap::new(), 0.0, &mut renderer);
        assert_eq!(renderer.layers(), RenderingLayer::Particles.bit());

        let mut ctx = RecordingContext::new();
        renderer.draw_visible_layers(&mut ctx, 0);
        assert_eq!(ctx.rects().len(), 3);
    }

    #[test]
    fn speech_needs_a_listener_nearby() {
        let mut w = world();
        let npc = add(&mut w, EntityKind::Npc, 100.0, Appearance::Hidden);
        w.get_mut(npc).unwrap().npc = Some(NpcBehavior::default().with_speech("Hi"));
        let hero = add(&mut w, EntityKind::Player, 20.0, Appearance::Hidden);
        let style = TextStyle::default();

        let mut renderer = Renderer::new();
        queue_speech(&w, hero, &style, &mut renderer);
        assert!(renderer.is_empty());

        w.get_mut(hero).unwrap().pos.x = 85.0;
        queue_speech(&w, hero, &style, &mut renderer);
        assert_eq!(renderer.layers(), RenderingLayer::Dialog.bit());
        let mut ctx = RecordingContext::new();
        renderer.draw_visible_layers(&mut ctx, 0);
        assert_eq!(ctx.texts(), vec!["Hi"]);
    }

    #[test]
    fn debug_boxes_cover_every_live_entity() {
        let mut w = world();
        add(&mut w, EntityKind::Player, 20.0, Appearance::Hidden);
        let gone = add(&mut w, EntityKind::Prop, 40.0, Appearance::Hidden);
        w.get_mut(gone).unwrap().active = false;
        add(&mut w, EntityKind::Gate, 60.0, Appearance::Hidden);

        let mut renderer = Renderer::new();
        queue_debug(&w, &mut renderer);
        assert_eq!(renderer.len(), 2);
        assert_eq!(renderer.layers(), RenderingLayer::Debug.bit());
    }
}
