use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::battle::{BattleOutcome, BattleState, Element};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum GameMode {
    Title,
    Hatch,
    Overworld,
    Battle,
    Result,
    Clear,
    Pet,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Tile {
    Grass,
    Path,
    Sand,
    Wall,
    Water,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MapState {
    pub name: String,
    pub width: u16,
    pub height: u16,
    pub tiles: Vec<Tile>,
}

impl MapState {
    pub fn new() -> Self {
        Self::from_str(
            "VERDANT HOLLOW",
            r#"
############################################
#gggggggggggggggggggggggggggggggggggggggggg#
#gggggggggggggggggggggggggggggggggggggggggg#
#gggggggggggggggggggggggggggggggggggggggggg#
#gggggggggggggggggggggggggggggggggggggggggg#
#ggggggssssssssssssssssssssssssssgggggggggg#
#gggggsswwwwwwwwwwwwwwwwwwwwwwssggggggggggg#
#gggggsswwwwwwwwwwwwwwwwwwwwwwssggggggggggg#
#ggggggssssssssssssssssssssssssssgggggggggg#
#rrrrrrrrrrrrrrrrrrrrrrrrrrrrrrrrrrrrrrrrrr#
#ggggggggggggggggggggrggggggggggggggggggggg#
#ggggggggggggggggggggrggggggggggggggggggggg#
#ggggggggggggggggggggrggggggggggggggggggggg#
#ggggggggggggggggggggrggggggggggggggggggggg#
#ggggggggggggggggggggrggggggggggggggggggggg#
#gggggggggggggggggggggggggggggggggggggggggg#
############################################
"#,
        )
    }

    pub fn from_str(name: &str, map_str: &str) -> Self {
        let lines: Vec<&str> = map_str
            .lines()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect();

        let height = lines.len();
        let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);

        let mut tiles = Vec::with_capacity(width * height);
        for line in &lines {
            let chars: Vec<char> = line.chars().collect();
            for x in 0..width {
                let ch = chars.get(x).copied().unwrap_or('g');
                tiles.push(Self::char_to_tile(ch));
            }
        }

        Self {
            name: name.to_string(),
            width: width as u16,
            height: height as u16,
            tiles,
        }
    }

    fn char_to_tile(ch: char) -> Tile {
        match ch {
            'g' | 'G' => Tile::Grass,
            'r' | 'R' | 'p' | 'P' => Tile::Path,
            's' | 'S' => Tile::Sand,
            'w' | 'W' => Tile::Water,
            '#' | 'x' | 'X' => Tile::Wall,
            _ => Tile::Grass,
        }
    }

    pub fn tile(&self, x: u16, y: u16) -> Tile {
        if x >= self.width || y >= self.height {
            return Tile::Wall;
        }
        let idx = self.index(x, y);
        self.tiles.get(idx).copied().unwrap_or(Tile::Wall)
    }

    pub fn is_walkable(&self, x: u16, y: u16) -> bool {
        !matches!(self.tile(x, y), Tile::Wall | Tile::Water)
    }

    fn index(&self, x: u16, y: u16) -> usize {
        (y as usize * self.width as usize) + x as usize
    }
}

impl Default for MapState {
    fn default() -> Self {
        Self::new()
    }
}

pub const START_POS: (u16, u16) = (21, 13);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PlayerState {
    pub x: u16,
    pub y: u16,
    pub steps: u64,
    pub facing: Direction,
}

impl PlayerState {
    pub fn new(x: u16, y: u16) -> Self {
        Self {
            x,
            y,
            steps: 0,
            facing: Direction::Down,
        }
    }
}

/// Stationary overworld boss. Walking into its tile starts a battle; a
/// defeated boss leaves the map for the rest of the run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BossState {
    pub name: String,
    pub element: Element,
    pub x: u16,
    pub y: u16,
    pub defeated: bool,
}

impl BossState {
    pub fn new(name: &str, element: Element, x: u16, y: u16) -> Self {
        Self {
            name: name.to_string(),
            element,
            x,
            y,
            defeated: false,
        }
    }
}

fn default_bosses() -> Vec<BossState> {
    vec![
        BossState::new("Volt Warden", Element::Electric, 10, 3),
        BossState::new("Ember Warden", Element::Fire, 21, 3),
        BossState::new("Tide Warden", Element::Water, 33, 3),
    ]
}

/// Movement limits injected at construction instead of being flipped through
/// global constants. `top_limit` forbids walking above the given row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OverworldConfig {
    pub top_limit: Option<u16>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum PetPose {
    #[default]
    Normal,
    Pat,
    Bonk,
    BonkStrong,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PetState {
    pub pose: PetPose,
    pub pose_ticks: u16,
    pub last_bonk_tick: Option<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum HatchPhase {
    Egg,
    Hatched,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ResultState {
    pub outcome: BattleOutcome,
    /// Win screens dismiss themselves after this many ticks; the lose screen
    /// waits for a confirm.
    pub auto_ticks: Option<u16>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AppState {
    pub mode: GameMode,
    pub map: MapState,
    pub player: PlayerState,
    pub partner: String,
    pub bosses: Vec<BossState>,
    pub active_boss: Option<usize>,
    pub battle: Option<BattleState>,
    pub result: Option<ResultState>,
    pub hatch: HatchPhase,
    pub pet: PetState,
    pub config: OverworldConfig,
    pub message: Option<String>,
    pub tick: u64,
    pub rng_seed: u64,
}

impl AppState {
    pub fn new(seed: u64, config: OverworldConfig) -> Self {
        Self {
            mode: GameMode::Title,
            map: MapState::new(),
            player: PlayerState::new(START_POS.0, START_POS.1),
            partner: "Pip".to_string(),
            bosses: default_bosses(),
            active_boss: None,
            battle: None,
            result: None,
            hatch: HatchPhase::Egg,
            pet: PetState::default(),
            config,
            message: None,
            tick: 0,
            rng_seed: seed,
        }
    }

    /// Index of the live boss occupying the given tile, if any.
    pub fn boss_at(&self, x: u16, y: u16) -> Option<usize> {
        self.bosses
            .iter()
            .position(|boss| !boss.defeated && boss.x == x && boss.y == y)
    }

    pub fn all_bosses_defeated(&self) -> bool {
        self.bosses.iter().all(|boss| boss.defeated)
    }

    pub fn reset_player_to_start(&mut self) {
        self.player.x = START_POS.0;
        self.player.y = START_POS.1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_parses_to_a_bordered_grid() {
        let map = MapState::new();
        assert_eq!(map.width, 44);
        assert_eq!(map.height, 17);
        assert_eq!(map.tile(0, 0), Tile::Wall);
        assert_eq!(map.tile(21, 13), Tile::Path);
        assert!(map.is_walkable(START_POS.0, START_POS.1));
    }

    #[test]
    fn water_and_walls_block_movement() {
        let map = MapState::new();
        assert!(!map.is_walkable(10, 6));
        assert!(!map.is_walkable(0, 5));
    }

    #[test]
    fn out_of_bounds_is_wall() {
        let map = MapState::new();
        assert_eq!(map.tile(999, 999), Tile::Wall);
    }

    #[test]
    fn bosses_sit_on_walkable_tiles() {
        let state = AppState::new(1, OverworldConfig::default());
        for boss in &state.bosses {
            assert!(state.map.is_walkable(boss.x, boss.y), "{}", boss.name);
        }
    }

    #[test]
    fn boss_lookup_skips_defeated_bosses() {
        let mut state = AppState::new(1, OverworldConfig::default());
        let (x, y) = (state.bosses[0].x, state.bosses[0].y);
        assert_eq!(state.boss_at(x, y), Some(0));
        state.bosses[0].defeated = true;
        assert_eq!(state.boss_at(x, y), None);
        assert!(!state.all_bosses_defeated());
    }
}
