use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::fx::{
    AttackFx, FlamethrowerFx, FloatingNumber, QuickAttackFx, ScreenShake, TackleFx, Vec2,
    WaterGunFx,
};

// The battle plays out in the same virtual canvas the effects simulate in;
// the renderer projects it onto whatever terminal area is available.
pub const CANVAS_W: f32 = 800.0;
pub const CANVAS_H: f32 = 600.0;

pub const PLAYER_BODY_POS: Vec2 = Vec2::new(200.0, 350.0);
pub const PLAYER_BODY_SIZE: Vec2 = Vec2::new(200.0, 200.0);
pub const ENEMY_BODY_POS: Vec2 = Vec2::new(500.0, 120.0);
pub const ENEMY_BODY_SIZE: Vec2 = Vec2::new(200.0, 200.0);

pub const STARTING_HP: i32 = 100;

pub fn beam_src() -> Vec2 {
    Vec2::new(
        PLAYER_BODY_POS.x + PLAYER_BODY_SIZE.x - 20.0,
        PLAYER_BODY_POS.y + 40.0,
    )
}

pub fn beam_dst() -> Vec2 {
    Vec2::new(ENEMY_BODY_POS.x + 20.0, ENEMY_BODY_POS.y + 40.0)
}

pub fn enemy_center() -> Vec2 {
    Vec2::new(
        ENEMY_BODY_POS.x + ENEMY_BODY_SIZE.x / 2.0,
        ENEMY_BODY_POS.y + ENEMY_BODY_SIZE.y / 2.0,
    )
}

pub fn enemy_midtop() -> Vec2 {
    Vec2::new(ENEMY_BODY_POS.x + ENEMY_BODY_SIZE.x / 2.0, ENEMY_BODY_POS.y)
}

pub fn player_midtop() -> Vec2 {
    Vec2::new(
        PLAYER_BODY_POS.x + PLAYER_BODY_SIZE.x / 2.0,
        PLAYER_BODY_POS.y,
    )
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Element {
    Normal,
    Fire,
    Water,
    Electric,
    Grass,
}

impl Element {
    pub const ALL: [Element; 5] = [
        Element::Normal,
        Element::Fire,
        Element::Water,
        Element::Electric,
        Element::Grass,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Element::Normal => "Normal",
            Element::Fire => "Fire",
            Element::Water => "Water",
            Element::Electric => "Electric",
            Element::Grass => "Grass",
        }
    }
}

/// Damage multiplier for an attack element against a defender element.
/// The table is hand-authored and deliberately asymmetric; anything not
/// listed is neutral, which also makes the function total.
pub fn type_multiplier(attack: Element, defend: Element) -> f32 {
    use Element::*;
    match (attack, defend) {
        (Fire, Water) => 0.5,
        (Fire, Grass) => 2.0,
        (Water, Fire) => 2.0,
        (Water, Electric) => 0.5,
        (Water, Grass) => 0.5,
        (Electric, Water) => 2.0,
        (Grass, Water) => 2.0,
        (Grass, Fire) => 0.5,
        _ => 1.0,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FxKind {
    Tackle,
    QuickAttack,
    Flamethrower,
    WaterGun,
}

#[derive(Clone, Copy, Debug)]
pub struct Move {
    pub name: &'static str,
    pub power: i32,
    pub element: Element,
    pub fx: FxKind,
}

pub const MOVES: [Move; 4] = [
    Move {
        name: "Tackle",
        power: 10,
        element: Element::Normal,
        fx: FxKind::Tackle,
    },
    Move {
        name: "Flamethrower",
        power: 25,
        element: Element::Fire,
        fx: FxKind::Flamethrower,
    },
    Move {
        name: "Quick Attack",
        power: 18,
        element: Element::Electric,
        fx: FxKind::QuickAttack,
    },
    Move {
        name: "Water Gun",
        power: 20,
        element: Element::Water,
        fx: FxKind::WaterGun,
    },
];

pub fn move_damage(mv: &Move, defender: Element) -> i32 {
    (mv.power as f32 * type_multiplier(mv.element, defender)).floor() as i32
}

pub fn spawn_fx(kind: FxKind, seed: u64) -> AttackFx {
    match kind {
        FxKind::Tackle => {
            // Lunge from the resting corner to where the body would be
            // centered on the defender.
            let target = Vec2::new(
                enemy_center().x - PLAYER_BODY_SIZE.x / 2.0,
                enemy_center().y - PLAYER_BODY_SIZE.y / 2.0,
            );
            AttackFx::Tackle(TackleFx::new(PLAYER_BODY_POS, target))
        }
        FxKind::QuickAttack => AttackFx::QuickAttack(QuickAttackFx::new(beam_src(), beam_dst(), seed)),
        FxKind::Flamethrower => {
            AttackFx::Flamethrower(FlamethrowerFx::new(beam_src(), beam_dst(), seed))
        }
        FxKind::WaterGun => AttackFx::WaterGun(WaterGunFx::new(beam_src(), beam_dst(), seed)),
    }
}

/// HP is signed on purpose: a killing blow can push it below zero for the
/// frame it lands, and every death check is `hp <= 0`, never `== 0`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Combatant {
    pub name: String,
    pub element: Element,
    pub hp: i32,
    pub max_hp: i32,
}

impl Combatant {
    pub fn new(name: impl Into<String>, element: Element, hp: i32) -> Self {
        Self {
            name: name.into(),
            element,
            hp,
            max_hp: hp,
        }
    }

    pub fn is_down(&self) -> bool {
        self.hp <= 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum BattleStage {
    /// Player's turn: move selection is live.
    Menu,
    /// Counted delay before the enemy strikes back; animations keep running.
    EnemyTurn,
    Victory,
    Defeat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum BattleOutcome {
    Win,
    Lose,
}

impl BattleOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            BattleOutcome::Win => "win",
            BattleOutcome::Lose => "lose",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum BannerKind {
    SuperEffective,
    NotVeryEffective,
}

impl BannerKind {
    pub fn text(self) -> &'static str {
        match self {
            BannerKind::SuperEffective => "It's super effective!",
            BannerKind::NotVeryEffective => "It's not very effective...",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BattleState {
    pub stage: BattleStage,
    pub player: Combatant,
    pub enemy: Combatant,
    pub move_index: usize,
    pub message: String,
    pub banner: Option<BannerKind>,
    pub banner_ticks: u16,
    pub enemy_wait: u16,
    pub fx: Vec<AttackFx>,
    pub floats: Vec<FloatingNumber>,
    pub shake: ScreenShake,
}

impl BattleState {
    pub fn new(player_name: &str, enemy_name: &str, enemy_element: Element) -> Self {
        Self {
            stage: BattleStage::Menu,
            player: Combatant::new(player_name, Element::Normal, STARTING_HP),
            enemy: Combatant::new(enemy_name, enemy_element, STARTING_HP),
            move_index: 0,
            message: format!("{} ({}) blocks your path!", enemy_name, enemy_element.label()),
            banner: None,
            banner_ticks: 0,
            enemy_wait: 0,
            fx: Vec::new(),
            floats: Vec::new(),
            shake: ScreenShake::default(),
        }
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        match self.stage {
            BattleStage::Victory => Some(BattleOutcome::Win),
            BattleStage::Defeat => Some(BattleOutcome::Lose),
            _ => None,
        }
    }

    /// Current tackle displacement of the player's body, if one is in flight.
    pub fn player_body_offset(&self) -> Vec2 {
        self.fx
            .iter()
            .find_map(|fx| fx.body_offset())
            .unwrap_or(Vec2::ZERO)
    }
}
