//! Entity model
//!
//! Every on-screen object is a flat [`Entity`] record: a moving rectangle
//! ([`Body`]) plus a kind tag. Kind-specific movement, firing and expiry rules
//! are selected by matching on [`EntityKind`].

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::InputState;
use crate::consts::*;
use crate::spans_overlap;

/// Play-field bounds (origin top-left, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

/// Axis-aligned moving rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Displacement applied per frame
    pub vel: Vec2,
}

impl Body {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
            vel: Vec2::ZERO,
        }
    }

    pub fn with_velocity(mut self, vx: f32, vy: f32) -> Self {
        self.vel = Vec2::new(vx, vy);
        self
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Apply one frame of velocity
    #[inline]
    pub fn advance(&mut self) {
        self.pos += self.vel;
    }

    /// Strict overlap on both axes; touching edges do not collide
    pub fn overlaps(&self, other: &Body) -> bool {
        spans_overlap(self.pos.x, self.size.x, other.pos.x, other.size.x)
            && spans_overlap(self.pos.y, self.size.y, other.pos.y, other.size.y)
    }

    /// Keep the body horizontally inside the field
    pub fn clamp_x(&mut self, field_width: f32) {
        let max_x = (field_width - self.size.x).max(0.0);
        self.pos.x = self.pos.x.clamp(0.0, max_x);
    }

    /// Steer back toward the field when at or past a side edge
    fn bounce_x(&mut self, field_width: f32) {
        if self.pos.x < 0.0 {
            self.vel.x = self.vel.x.abs();
        } else if self.pos.x > field_width - self.size.x {
            self.vel.x = -self.vel.x.abs();
        }
    }
}

/// Who fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shooter {
    Player,
    Enemy,
}

/// Regular enemy classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyClass {
    /// Small arrowhead
    Light,
    /// Wide bar
    Heavy,
}

impl EnemyClass {
    pub fn size(&self) -> f32 {
        match self {
            EnemyClass::Light => LIGHT_ENEMY_SIZE,
            EnemyClass::Heavy => HEAVY_ENEMY_SIZE,
        }
    }
}

/// Entity kind tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Projectile(Shooter),
    Enemy(EnemyClass),
    /// Boss for the given 1-based level
    Boss { level: u8 },
    Meteor,
    EnergyCapsule,
}

/// Per-frame inputs to [`Entity::update`]
#[derive(Debug, Clone, Copy)]
pub struct UpdateCtx<'a> {
    pub field: Field,
    /// Difficulty multiplier of the current level
    pub multiplier: f32,
    pub input: &'a InputState,
    pub player_speed: f32,
}

/// Result of one entity update
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UpdateOutcome {
    /// Entity left the play field and should be removed
    pub expired: bool,
    /// Top-left position of a downward projectile fired this frame
    pub fired: Option<Vec2>,
}

/// A game entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub body: Body,
    pub health: u8,
    pub max_health: u8,
    /// Frames until the entity may fire again
    pub shoot_cooldown: i32,
}

impl Entity {
    fn with_body(id: u32, kind: EntityKind, body: Body, health: u8) -> Self {
        Self {
            id,
            kind,
            body,
            health,
            max_health: health,
            shoot_cooldown: 0,
        }
    }

    /// Player ship, horizontally centred near the bottom edge
    pub fn player(id: u32, field: Field) -> Self {
        let body = Body::new(
            field.width / 2.0 - PLAYER_SIZE / 2.0,
            field.height - PLAYER_BOTTOM_OFFSET,
            PLAYER_SIZE,
            PLAYER_SIZE,
        );
        Self::with_body(id, EntityKind::Player, body, 1)
    }

    /// Projectile with its top-left at `pos`, moving vertically at `vy`
    pub fn projectile(id: u32, shooter: Shooter, pos: Vec2, vy: f32) -> Self {
        let body = Body::new(pos.x, pos.y, PROJECTILE_WIDTH, PROJECTILE_HEIGHT).with_velocity(0.0, vy);
        Self::with_body(id, EntityKind::Projectile(shooter), body, 1)
    }

    /// Regular enemy falling at `fall_speed`; armored (2 hp) from level 3 on
    pub fn enemy<R: Rng + ?Sized>(
        id: u32,
        class: EnemyClass,
        x: f32,
        level: u8,
        fall_speed: f32,
        rng: &mut R,
    ) -> Self {
        let size = class.size();
        let body = Body::new(x, -size, size, size).with_velocity(0.0, fall_speed);
        let health = if level > 2 { 2 } else { 1 };
        let mut enemy = Self::with_body(id, EntityKind::Enemy(class), body, health);
        enemy.shoot_cooldown = rng.random_range(ENEMY_COOLDOWN_MIN..ENEMY_COOLDOWN_MAX);
        enemy
    }

    /// Boss for a level, centred near the top of the field
    pub fn boss<R: Rng + ?Sized>(id: u32, level: u8, field: Field, multiplier: f32, rng: &mut R) -> Self {
        let width = BOSS_BASE_WIDTH + level as f32 * BOSS_WIDTH_PER_LEVEL;
        let height = BOSS_BASE_HEIGHT + level as f32 * BOSS_HEIGHT_PER_LEVEL;
        let body = Body::new(field.width / 2.0 - width / 2.0, BOSS_SPAWN_Y, width, height)
            .with_velocity(BOSS_SPEED * multiplier, 0.0);
        let health = BOSS_HEALTH_PER_LEVEL.saturating_mul(level.max(1));
        let mut boss = Self::with_body(id, EntityKind::Boss { level }, body, health);
        boss.shoot_cooldown = rng.random_range(ENEMY_COOLDOWN_MIN..ENEMY_COOLDOWN_MAX);
        boss
    }

    /// Meteor of random size entering from above with a slight drift
    pub fn meteor<R: Rng + ?Sized>(id: u32, field: Field, fall_speed: f32, rng: &mut R) -> Self {
        let size = rng.random_range(METEOR_MIN_SIZE..METEOR_MAX_SIZE);
        let x = rng.random::<f32>() * (field.width - size).max(0.0);
        let drift = (rng.random::<f32>() - 0.5) * METEOR_DRIFT_RANGE;
        let body = Body::new(x, -size, size, size).with_velocity(drift, fall_speed);
        Self::with_body(id, EntityKind::Meteor, body, 1)
    }

    /// Energy capsule centred on `center`
    pub fn capsule(id: u32, center: Vec2, fall_speed: f32) -> Self {
        let half = CAPSULE_SIZE / 2.0;
        let body = Body::new(center.x - half, center.y - half, CAPSULE_SIZE, CAPSULE_SIZE)
            .with_velocity(0.0, fall_speed);
        Self::with_body(id, EntityKind::EnergyCapsule, body, 1)
    }

    #[inline]
    pub fn collides_with(&self, other: &Entity) -> bool {
        self.body.overlaps(&other.body)
    }

    /// Apply one point of damage; returns true once health is gone
    pub fn hit(&mut self) -> bool {
        self.health = self.health.saturating_sub(1);
        self.health == 0
    }

    /// Fire from the player ship if the cooldown has elapsed
    ///
    /// Returns the top-left of the new projectile.
    pub fn try_shoot(&mut self, cooldown: u32) -> Option<Vec2> {
        if self.shoot_cooldown > 0 {
            return None;
        }
        self.shoot_cooldown = cooldown as i32;
        Some(Vec2::new(
            self.body.pos.x + self.body.size.x / 2.0 - PROJECTILE_WIDTH / 2.0,
            self.body.pos.y,
        ))
    }

    /// Muzzle position for a downward shot
    fn muzzle_below(&self) -> Vec2 {
        Vec2::new(
            self.body.pos.x + self.body.size.x / 2.0 - PROJECTILE_WIDTH / 2.0,
            self.body.bottom(),
        )
    }

    /// Advance one frame according to this entity's kind
    pub fn update<R: Rng + ?Sized>(&mut self, ctx: &UpdateCtx<'_>, rng: &mut R) -> UpdateOutcome {
        let field = ctx.field;
        match self.kind {
            EntityKind::Player => {
                if ctx.input.left {
                    self.body.pos.x -= ctx.player_speed;
                }
                if ctx.input.right {
                    self.body.pos.x += ctx.player_speed;
                }
                self.body.clamp_x(field.width);
                if self.shoot_cooldown > 0 {
                    self.shoot_cooldown -= 1;
                }
                UpdateOutcome::default()
            }
            EntityKind::Projectile(shooter) => {
                self.body.advance();
                let above = self.body.bottom() < 0.0;
                let expired = match shooter {
                    Shooter::Player => above,
                    Shooter::Enemy => above || self.body.pos.y > field.height,
                };
                UpdateOutcome {
                    expired,
                    fired: None,
                }
            }
            EntityKind::Enemy(_) => {
                if rng.random_bool(ENEMY_WANDER_CHANCE) {
                    self.body.vel.x = (rng.random::<f32>() - 0.5) * ENEMY_WANDER_RANGE * ctx.multiplier;
                }
                self.body.bounce_x(field.width);
                self.body.advance();

                self.shoot_cooldown -= 1;
                let mut fired = None;
                if self.shoot_cooldown <= 0 && rng.random_bool(ENEMY_FIRE_CHANCE) {
                    fired = Some(self.muzzle_below());
                    self.shoot_cooldown = rng.random_range(ENEMY_COOLDOWN_MIN..ENEMY_COOLDOWN_MAX);
                }
                UpdateOutcome {
                    expired: self.body.pos.y > field.height,
                    fired,
                }
            }
            EntityKind::Boss { .. } => {
                self.body.pos.x += self.body.vel.x;
                self.body.bounce_x(field.width);

                self.shoot_cooldown -= 1;
                let mut fired = None;
                if self.shoot_cooldown <= 0 {
                    fired = Some(self.muzzle_below());
                    self.shoot_cooldown = rng.random_range(BOSS_COOLDOWN_MIN..BOSS_COOLDOWN_MAX);
                }
                // Bosses leave only by losing all health
                UpdateOutcome {
                    expired: false,
                    fired,
                }
            }
            // Meteors drift past the side edges; only the bottom edge removes them
            EntityKind::Meteor | EntityKind::EnergyCapsule => {
                self.body.advance();
                UpdateOutcome {
                    expired: self.body.pos.y > field.height,
                    fired: None,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const FIELD: Field = Field {
        width: 800.0,
        height: 600.0,
    };

    fn ctx(input: &InputState) -> UpdateCtx<'_> {
        UpdateCtx {
            field: FIELD,
            multiplier: 1.0,
            input,
            player_speed: 8.0,
        }
    }

    #[test]
    fn test_touching_bodies_do_not_collide() {
        let a = Body::new(0.0, 0.0, 10.0, 10.0);
        let b = Body::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        let c = Body::new(9.5, 9.5, 10.0, 10.0);
        assert!(a.overlaps(&c));
    }

    #[test]
    fn test_hit_reports_destruction() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut enemy = Entity::enemy(1, EnemyClass::Light, 0.0, 3, 3.0, &mut rng);
        assert_eq!(enemy.health, 2);
        assert!(!enemy.hit());
        assert!(enemy.hit());
        // Saturates instead of wrapping
        assert!(enemy.hit());
        assert_eq!(enemy.health, 0);
    }

    #[test]
    fn test_player_cooldown_gates_shooting() {
        let mut player = Entity::player(1, FIELD);
        let muzzle = player.try_shoot(10).unwrap();
        assert_eq!(muzzle.x, player.body.pos.x + 22.0);
        assert_eq!(muzzle.y, player.body.pos.y);
        assert!(player.try_shoot(10).is_none());

        let input = InputState::default();
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..10 {
            player.update(&ctx(&input), &mut rng);
        }
        assert_eq!(player.shoot_cooldown, 0);
        assert!(player.try_shoot(10).is_some());
    }

    #[test]
    fn test_player_projectile_expires_above_top() {
        let mut rng = Pcg32::seed_from_u64(1);
        let input = InputState::default();
        let mut shot = Entity::projectile(1, Shooter::Player, Vec2::new(100.0, -5.0), -10.0);
        assert!(!shot.update(&ctx(&input), &mut rng).expired);
        assert!(shot.update(&ctx(&input), &mut rng).expired);
    }

    #[test]
    fn test_enemy_projectile_expires_below_bottom() {
        let mut rng = Pcg32::seed_from_u64(1);
        let input = InputState::default();
        let mut shot = Entity::projectile(1, Shooter::Enemy, Vec2::new(100.0, 595.0), 7.0);
        assert!(shot.update(&ctx(&input), &mut rng).expired);
    }

    #[test]
    fn test_enemy_expires_below_bottom() {
        let mut rng = Pcg32::seed_from_u64(3);
        let input = InputState::default();
        let mut enemy = Entity::enemy(1, EnemyClass::Heavy, 100.0, 1, 3.0, &mut rng);
        enemy.body.pos.y = 598.0;
        assert!(enemy.update(&ctx(&input), &mut rng).expired);
    }

    #[test]
    fn test_enemy_holds_fire_during_cooldown() {
        let mut rng = Pcg32::seed_from_u64(9);
        let input = InputState::default();
        let mut enemy = Entity::enemy(1, EnemyClass::Light, 300.0, 1, 3.0, &mut rng);
        enemy.shoot_cooldown = 5;
        for _ in 0..4 {
            assert!(enemy.update(&ctx(&input), &mut rng).fired.is_none());
        }
        assert_eq!(enemy.shoot_cooldown, 1);
    }

    #[test]
    fn test_enemy_fires_from_muzzle_once_ready() {
        let mut rng = Pcg32::seed_from_u64(21);
        let input = InputState::default();
        let mut enemy = Entity::enemy(1, EnemyClass::Heavy, 300.0, 1, 3.0, &mut rng);
        enemy.body.vel.y = 0.0;
        enemy.shoot_cooldown = 0;

        // 5% a frame, so a ready enemy fires well within 500 frames
        let muzzle = (0..500)
            .find_map(|_| enemy.update(&ctx(&input), &mut rng).fired)
            .unwrap();
        let expected_x = enemy.body.pos.x + enemy.body.size.x / 2.0 - PROJECTILE_WIDTH / 2.0;
        assert_eq!(muzzle, Vec2::new(expected_x, enemy.body.bottom()));
        assert!((ENEMY_COOLDOWN_MIN..ENEMY_COOLDOWN_MAX).contains(&enemy.shoot_cooldown));
    }

    #[test]
    fn test_enemy_wander_bounded_by_multiplier() {
        let mut rng = Pcg32::seed_from_u64(13);
        let input = InputState::default();
        let ctx = UpdateCtx {
            multiplier: 1.3,
            ..ctx(&input)
        };
        let limit = ENEMY_WANDER_RANGE / 2.0 * 1.3;
        let mut enemy = Entity::enemy(1, EnemyClass::Light, 380.0, 1, 3.0, &mut rng);
        enemy.body.vel.y = 0.0;
        assert_eq!(enemy.body.vel.x, 0.0);

        let mut resamples = 0;
        let mut speed = 0.0f32;
        for _ in 0..1000 {
            enemy.update(&ctx, &mut rng);
            assert!(enemy.body.vel.x.abs() <= limit, "vel.x = {}", enemy.body.vel.x);
            // Bounces flip the sign only
            if enemy.body.vel.x.abs() != speed {
                speed = enemy.body.vel.x.abs();
                resamples += 1;
            }
        }
        // Roughly 2% of frames pick a new drift
        assert!((5..=60).contains(&resamples), "resamples = {resamples}");
    }

    #[test]
    fn test_meteor_only_expires_below_bottom() {
        let mut rng = Pcg32::seed_from_u64(4);
        let input = InputState::default();
        let mut meteor = Entity::meteor(1, FIELD, 4.0, &mut rng);
        meteor.body.pos = Vec2::new(-100.0, 300.0);
        meteor.body.vel = Vec2::new(-1.0, 4.0);
        assert!(!meteor.update(&ctx(&input), &mut rng).expired);
        meteor.body.pos.x = FIELD.width + 50.0;
        assert!(!meteor.update(&ctx(&input), &mut rng).expired);

        meteor.body.pos.y = FIELD.height - 2.0;
        assert!(meteor.update(&ctx(&input), &mut rng).expired);
    }

    #[test]
    fn test_bounce_points_back_into_field() {
        let mut body = Body::new(-2.0, 0.0, 40.0, 40.0).with_velocity(-1.5, 3.0);
        body.bounce_x(FIELD.width);
        assert_eq!(body.vel.x, 1.5);

        let mut body = Body::new(FIELD.width - 39.0, 0.0, 40.0, 40.0).with_velocity(1.5, 3.0);
        body.bounce_x(FIELD.width);
        assert_eq!(body.vel.x, -1.5);

        // Inside the field nothing changes
        let mut body = Body::new(100.0, 0.0, 40.0, 40.0).with_velocity(-1.5, 3.0);
        body.bounce_x(FIELD.width);
        assert_eq!(body.vel.x, -1.5);
    }

    #[test]
    fn test_boss_fires_when_ready_and_never_expires() {
        let mut rng = Pcg32::seed_from_u64(5);
        let input = InputState::default();
        let mut boss = Entity::boss(1, 2, FIELD, 1.3, &mut rng);
        assert_eq!(boss.health, 6);
        assert_eq!(boss.body.size, Vec2::new(140.0, 110.0));
        boss.shoot_cooldown = 1;
        let outcome = boss.update(&ctx(&input), &mut rng);
        assert!(!outcome.expired);
        let muzzle = outcome.fired.unwrap();
        assert_eq!(muzzle.y, boss.body.bottom());
        assert!((BOSS_COOLDOWN_MIN..BOSS_COOLDOWN_MAX).contains(&boss.shoot_cooldown));

        // Pushed far below the field it still doesn't expire, and never moves vertically
        boss.body.pos.y = 5000.0;
        let y = boss.body.pos.y;
        assert!(!boss.update(&ctx(&input), &mut rng).expired);
        assert_eq!(boss.body.pos.y, y);
    }

    #[test]
    fn test_boss_bounces_at_right_edge() {
        let mut rng = Pcg32::seed_from_u64(5);
        let input = InputState::default();
        let mut boss = Entity::boss(1, 1, FIELD, 1.0, &mut rng);
        boss.body.pos.x = FIELD.width - boss.body.size.x + 1.0;
        boss.update(&ctx(&input), &mut rng);
        assert!(boss.body.vel.x < 0.0);
    }

    #[test]
    fn test_capsule_centred_and_expires() {
        let mut rng = Pcg32::seed_from_u64(1);
        let input = InputState::default();
        let mut capsule = Entity::capsule(1, Vec2::new(100.0, 610.0), 3.0);
        assert_eq!(capsule.body.center(), Vec2::new(100.0, 610.0));
        assert!(capsule.update(&ctx(&input), &mut rng).expired);
    }

    #[test]
    fn test_meteor_spawn_ranges() {
        let mut rng = Pcg32::seed_from_u64(11);
        for id in 0..200 {
            let m = Entity::meteor(id, FIELD, 4.0, &mut rng);
            assert!(m.body.size.x >= METEOR_MIN_SIZE && m.body.size.x < METEOR_MAX_SIZE);
            assert_eq!(m.body.pos.y, -m.body.size.y);
            assert!(m.body.pos.x >= 0.0 && m.body.right() <= FIELD.width);
            assert!(m.body.vel.x.abs() <= 1.0);
        }
    }

    fn arb_body() -> impl Strategy<Value = Body> {
        (-100.0f32..900.0, -100.0f32..700.0, 1.0f32..200.0, 1.0f32..200.0)
            .prop_map(|(x, y, w, h)| Body::new(x, y, w, h))
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(a in arb_body(), b in arb_body()) {
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn prop_player_stays_in_field(moves in proptest::collection::vec((any::<bool>(), any::<bool>()), 0..300)) {
            let mut rng = Pcg32::seed_from_u64(0);
            let mut player = Entity::player(1, FIELD);
            for (left, right) in moves {
                let input = InputState { left, right };
                player.update(&ctx(&input), &mut rng);
                prop_assert!(player.body.pos.x >= 0.0);
                prop_assert!(player.body.pos.x <= FIELD.width - player.body.size.x);
            }
        }
    }
}
