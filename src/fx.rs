use std::f32::consts::FRAC_PI_2;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// Attack animations simulate in the battle's virtual canvas space and are
// projected onto terminal cells at render time (see ui::draw_battle_canvas).
// One advance() call per frame; advance() returning false means the
// animation is finished and the owner should drop it.

pub const TACKLE_ONE_WAY_FRAMES: u16 = 10;
pub const QUICK_ATTACK_FRAMES: u16 = 20;
pub const FLAMETHROWER_FRAMES: u16 = 40;
pub const WATER_GUN_FRAMES: u16 = 45;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn lerp(a: Vec2, b: Vec2, t: f32) -> Vec2 {
        Vec2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }

    pub fn sub(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x - other.x, self.y - other.y)
    }

    pub fn add(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x + other.x, self.y + other.y)
    }

    /// Unit direction from `a` to `b` plus the distance between them.
    /// Distance is clamped to at least 1.0 so callers never divide by zero.
    pub fn dir(a: Vec2, b: Vec2) -> (Vec2, f32) {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let d = dx.hypot(dy).max(1.0);
        (Vec2::new(dx / d, dy / d), d)
    }
}

/// Small deterministic generator owned by each animation, so a battle replay
/// with the same seeds reproduces the same particle motion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FxRng(pub u64);

impl FxRng {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u32(&mut self) -> u32 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 32) as u32
    }

    pub fn range_f32(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (self.next_u32() as f32 / u32::MAX as f32) * (hi - lo)
    }

    /// Uniform integer in `lo..=hi`.
    pub fn range_i32(&mut self, lo: i32, hi: i32) -> i32 {
        let span = (hi - lo + 1) as u32;
        lo + (self.next_u32() % span) as i32
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub life: i16,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum AttackFx {
    Tackle(TackleFx),
    QuickAttack(QuickAttackFx),
    Flamethrower(FlamethrowerFx),
    WaterGun(WaterGunFx),
}

impl AttackFx {
    pub fn advance(&mut self) -> bool {
        match self {
            AttackFx::Tackle(fx) => fx.advance(),
            AttackFx::QuickAttack(fx) => fx.advance(),
            AttackFx::Flamethrower(fx) => fx.advance(),
            AttackFx::WaterGun(fx) => fx.advance(),
        }
    }

    /// Displacement the renderer applies to the attacker's body while a
    /// tackle is in flight. The effect never touches the body's own state.
    pub fn body_offset(&self) -> Option<Vec2> {
        match self {
            AttackFx::Tackle(fx) => Some(fx.offset),
            _ => None,
        }
    }
}

/// Lunge toward the defender and back. Out leg is sine-eased, return leg is
/// linear; the offset snaps back to zero on the final step so interpolation
/// rounding never leaves the body displaced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TackleFx {
    start: Vec2,
    target: Vec2,
    frame: u16,
    one_way: u16,
    pub offset: Vec2,
}

impl TackleFx {
    pub fn new(start: Vec2, target: Vec2) -> Self {
        Self {
            start,
            target,
            frame: 0,
            one_way: TACKLE_ONE_WAY_FRAMES.max(1),
            offset: Vec2::ZERO,
        }
    }

    pub fn advance(&mut self) -> bool {
        self.frame += 1;
        if self.frame <= self.one_way {
            let t = ((self.frame as f32 / self.one_way as f32) * FRAC_PI_2).sin();
            self.offset = Vec2::lerp(self.start, self.target, t).sub(self.start);
            true
        } else if self.frame <= self.one_way * 2 {
            let t = (self.frame - self.one_way) as f32 / self.one_way as f32;
            self.offset = Vec2::lerp(self.target, self.start, t).sub(self.start);
            true
        } else {
            self.offset = Vec2::ZERO;
            false
        }
    }
}

/// Flickering zigzag bolts. The paths are rebuilt from scratch every step,
/// which is what makes the strike look jittery.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QuickAttackFx {
    pub src: Vec2,
    pub dst: Vec2,
    frame: u16,
    frames: u16,
    pub paths: Vec<Vec<Vec2>>,
    rng: FxRng,
}

impl QuickAttackFx {
    pub fn new(src: Vec2, dst: Vec2, seed: u64) -> Self {
        Self {
            src,
            dst,
            frame: 0,
            frames: QUICK_ATTACK_FRAMES,
            paths: Vec::new(),
            rng: FxRng::new(seed),
        }
    }

    pub fn advance(&mut self) -> bool {
        self.frame += 1;
        if self.frame > self.frames {
            self.paths.clear();
            return false;
        }
        self.paths.clear();
        for _ in 0..3 {
            let mut points = Vec::with_capacity(6);
            for i in 0..6 {
                let t = i as f32 / 5.0;
                let x = self.src.x + (self.dst.x - self.src.x) * t;
                let y = self.src.y
                    + (self.dst.y - self.src.y) * t
                    + self.rng.range_i32(-10, 10) as f32;
                points.push(Vec2::new(x, y));
            }
            self.paths.push(points);
        }
        true
    }
}

/// Cone of flame particles that decay into drifting smoke. Spawning stops
/// when the duration window closes, but the effect stays alive until every
/// flame AND every smoke particle has burned out.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FlamethrowerFx {
    pub src: Vec2,
    pub dst: Vec2,
    frame: u16,
    frames: u16,
    pub flames: Vec<Particle>,
    pub smoke: Vec<Particle>,
    rng: FxRng,
}

impl FlamethrowerFx {
    pub fn new(src: Vec2, dst: Vec2, seed: u64) -> Self {
        let mut fx = Self {
            src,
            dst,
            frame: 0,
            frames: FLAMETHROWER_FRAMES,
            flames: Vec::new(),
            smoke: Vec::new(),
            rng: FxRng::new(seed),
        };
        fx.spawn_flames(25);
        fx
    }

    fn spawn_flames(&mut self, count: usize) {
        let (unit, _) = Vec2::dir(self.src, self.dst);
        let base = unit.y.atan2(unit.x);
        for _ in 0..count {
            let angle = base + self.rng.range_f32(-0.4, 0.4);
            let speed = self.rng.range_f32(4.0, 8.0);
            let life = self.rng.range_i32(20, 35) as i16;
            self.flames.push(Particle {
                x: self.src.x,
                y: self.src.y,
                vx: angle.cos() * speed,
                vy: angle.sin() * speed,
                life,
            });
        }
    }

    pub fn advance(&mut self) -> bool {
        self.frame += 1;
        if self.frame <= self.frames && self.frame % 2 == 0 {
            self.spawn_flames(5);
        }

        let mut expired = Vec::new();
        for p in &mut self.flames {
            p.x += p.vx;
            p.y += p.vy;
            p.vy += 0.05;
            p.life -= 1;
            if p.life <= 0 {
                expired.push((p.x, p.y));
            }
        }
        self.flames.retain(|p| p.life > 0);
        for (x, y) in expired {
            let vx = self.rng.range_f32(-0.5, 0.5);
            self.smoke.push(Particle {
                x,
                y,
                vx,
                vy: -1.0,
                life: 40,
            });
        }
        self.smoke.retain_mut(|p| {
            p.x += p.vx;
            p.y += p.vy;
            p.life -= 1;
            p.life > 0
        });

        !(self.frame > self.frames && self.flames.is_empty() && self.smoke.is_empty())
    }
}

/// Solid stream from source to target with droplet spray along its length.
/// Same death rule as the flamethrower: duration over AND droplets drained.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WaterGunFx {
    pub src: Vec2,
    pub dst: Vec2,
    frame: u16,
    frames: u16,
    pub drops: Vec<Particle>,
    rng: FxRng,
}

impl WaterGunFx {
    pub fn new(src: Vec2, dst: Vec2, seed: u64) -> Self {
        Self {
            src,
            dst,
            frame: 0,
            frames: WATER_GUN_FRAMES,
            drops: Vec::new(),
            rng: FxRng::new(seed),
        }
    }

    pub fn advance(&mut self) -> bool {
        self.frame += 1;
        let (unit, dist) = Vec2::dir(self.src, self.dst);
        if self.frame <= self.frames {
            for _ in 0..8 {
                let along = self.rng.range_f32(0.0, dist);
                let x = self.src.x + unit.x * along;
                let y = self.src.y + unit.y * along;
                let vx = unit.x * self.rng.range_f32(3.0, 5.0) + self.rng.range_f32(-0.8, 0.8);
                let vy = unit.y * self.rng.range_f32(3.0, 5.0) + self.rng.range_f32(-0.8, 0.8);
                let life = self.rng.range_i32(10, 25) as i16;
                self.drops.push(Particle { x, y, vx, vy, life });
            }
        }
        self.drops.retain_mut(|p| {
            p.x += p.vx;
            p.y += p.vy;
            p.life -= 1;
            p.life > 0
        });

        !(self.frame > self.frames && self.drops.is_empty())
    }
}

/// Damage label that drifts upward and fades out over its last 20 ticks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FloatingNumber {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub vy: f32,
    pub ttl: u16,
    pub alpha: u8,
}

impl FloatingNumber {
    pub fn new(text: impl Into<String>, pos: Vec2) -> Self {
        Self {
            text: text.into(),
            x: pos.x,
            y: pos.y,
            vy: -1.0,
            ttl: 60,
            alpha: 255,
        }
    }

    pub fn advance(&mut self) -> bool {
        self.y += self.vy;
        self.ttl = self.ttl.saturating_sub(1);
        if self.ttl < 20 {
            self.alpha = (255 * self.ttl / 20) as u8;
        }
        self.ttl > 0
    }
}

/// Transient jitter applied to the whole composed battle frame. The offset
/// is a pure salted hash draw so rendering can sample it without mutating
/// state, while still seeing fresh jitter every frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScreenShake {
    pub remaining: u16,
    pub magnitude: i16,
}

impl ScreenShake {
    pub fn start(&mut self, ticks: u16, magnitude: i16) {
        self.remaining = ticks;
        self.magnitude = magnitude.max(0);
    }

    pub fn tick(&mut self) {
        if self.remaining > 0 {
            self.remaining -= 1;
            if self.remaining == 0 {
                self.magnitude = 0;
            }
        }
    }

    pub fn offset(&self, salt: u64) -> (i16, i16) {
        if self.remaining == 0 || self.magnitude <= 0 {
            return (0, 0);
        }
        let span = self.magnitude as u64 * 2 + 1;
        let h = mix(salt ^ ((self.remaining as u64) << 32));
        let dx = (h % span) as i16 - self.magnitude;
        let dy = ((h >> 16) % span) as i16 - self.magnitude;
        (dx, dy)
    }
}

fn mix(n: u64) -> u64 {
    let mut n = n
        .wrapping_mul(374761393)
        .wrapping_add(668265263);
    n ^= n >> 13;
    n = n.wrapping_mul(1274126177);
    n ^= n >> 16;
    n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fx_rng_is_deterministic() {
        let mut a = FxRng::new(42);
        let mut b = FxRng::new(42);
        for _ in 0..32 {
            assert_eq!(a.range_i32(0, 1000), b.range_i32(0, 1000));
        }
    }

    #[test]
    fn fx_rng_range_is_inclusive_and_bounded() {
        let mut rng = FxRng::new(7);
        for _ in 0..200 {
            let v = rng.range_i32(-10, 10);
            assert!((-10..=10).contains(&v));
            let f = rng.range_f32(4.0, 8.0);
            assert!((4.0..=8.0).contains(&f));
        }
    }

    #[test]
    fn floating_number_fades_over_final_20_ticks() {
        let mut num = FloatingNumber::new("12", Vec2::new(100.0, 100.0));
        assert_eq!(num.ttl, 60);
        for _ in 0..40 {
            assert!(num.advance());
        }
        // ttl is 20, the fade window has not opened yet.
        assert_eq!(num.alpha, 255);
        for _ in 0..19 {
            assert!(num.advance());
        }
        assert_eq!(num.ttl, 1);
        assert_eq!(num.alpha, 255 * 1 / 20);
        assert!(!num.advance());
        assert_eq!(num.ttl, 0);
    }

    #[test]
    fn floating_number_drifts_upward() {
        let mut num = FloatingNumber::new("5", Vec2::new(0.0, 50.0));
        num.advance();
        assert!(num.y < 50.0);
    }

    #[test]
    fn tackle_runs_out_and_back_then_snaps_home() {
        let mut fx = TackleFx::new(Vec2::new(200.0, 350.0), Vec2::new(500.0, 120.0));
        let mut peak = 0.0f32;
        for _ in 0..TACKLE_ONE_WAY_FRAMES * 2 {
            assert!(fx.advance());
            peak = peak.max(fx.offset.x.abs());
        }
        assert!(peak > 0.0);
        // Step after the full round trip reports death with a zero offset.
        assert!(!fx.advance());
        assert_eq!(fx.offset, Vec2::ZERO);
    }

    #[test]
    fn tackle_reaches_target_at_end_of_out_leg() {
        let start = Vec2::new(0.0, 0.0);
        let target = Vec2::new(100.0, -50.0);
        let mut fx = TackleFx::new(start, target);
        for _ in 0..TACKLE_ONE_WAY_FRAMES {
            fx.advance();
        }
        assert!((fx.offset.x - 100.0).abs() < 1e-3);
        assert!((fx.offset.y + 50.0).abs() < 1e-3);
    }

    #[test]
    fn quick_attack_regenerates_paths_every_step() {
        let mut fx = QuickAttackFx::new(Vec2::new(380.0, 390.0), Vec2::new(520.0, 160.0), 99);
        assert!(fx.advance());
        let first = fx.paths.clone();
        assert_eq!(first.len(), 3);
        assert!(first.iter().all(|path| path.len() == 6));
        assert!(fx.advance());
        assert_ne!(fx.paths, first);
    }

    #[test]
    fn quick_attack_dies_after_its_window() {
        let mut fx = QuickAttackFx::new(Vec2::ZERO, Vec2::new(100.0, 0.0), 5);
        for _ in 0..QUICK_ATTACK_FRAMES {
            assert!(fx.advance());
        }
        assert!(!fx.advance());
        assert!(fx.paths.is_empty());
    }

    #[test]
    fn flamethrower_death_is_population_gated() {
        let mut fx = FlamethrowerFx::new(Vec2::new(380.0, 390.0), Vec2::new(520.0, 160.0), 3);
        assert_eq!(fx.flames.len(), 25);
        let mut steps: u16 = 0;
        loop {
            let alive = fx.advance();
            steps += 1;
            if !alive {
                break;
            }
            // An effect that claims to be alive past its spawn window must
            // still be holding particles.
            if steps > FLAMETHROWER_FRAMES {
                assert!(!fx.flames.is_empty() || !fx.smoke.is_empty());
            }
            assert!(steps < 1000, "flamethrower never terminated");
        }
        assert!(steps > FLAMETHROWER_FRAMES);
        assert!(fx.flames.is_empty());
        assert!(fx.smoke.is_empty());
    }

    #[test]
    fn water_gun_death_is_population_gated() {
        let mut fx = WaterGunFx::new(Vec2::new(380.0, 390.0), Vec2::new(520.0, 160.0), 11);
        let mut steps: u16 = 0;
        loop {
            let alive = fx.advance();
            steps += 1;
            if !alive {
                break;
            }
            if steps > WATER_GUN_FRAMES {
                assert!(!fx.drops.is_empty());
            }
            assert!(steps < 1000, "water gun never terminated");
        }
        assert!(steps > WATER_GUN_FRAMES);
        assert!(fx.drops.is_empty());
    }

    #[test]
    fn screen_shake_offsets_stay_in_bounds_then_go_quiet() {
        let mut shake = ScreenShake::default();
        shake.start(10, 4);
        for salt in 0..100u64 {
            let (dx, dy) = shake.offset(salt);
            assert!((-4..=4).contains(&dx));
            assert!((-4..=4).contains(&dy));
        }
        for _ in 0..10 {
            shake.tick();
        }
        assert_eq!(shake.magnitude, 0);
        assert_eq!(shake.offset(1234), (0, 0));
    }

    #[test]
    fn screen_shake_offset_is_pure() {
        let mut shake = ScreenShake::default();
        shake.start(5, 3);
        assert_eq!(shake.offset(77), shake.offset(77));
    }
}
