use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::battle::{
    enemy_midtop, move_damage, player_midtop, spawn_fx, type_multiplier, BannerKind, BattleOutcome,
    BattleStage, BattleState, MOVES,
};
use crate::effect::Effect;
use crate::fx::FloatingNumber;
use crate::state::{
    AppState, Direction, GameMode, HatchPhase, PetPose, ResultState,
};

// Battle pacing, in frames at the ~60 ms tick cadence:
// - ENEMY_TURN_DELAY_TICKS: counted pause before the enemy strikes (~600 ms).
// - BANNER_TICKS: lifetime of the effectiveness banner.
// - RESULT_WIN_TICKS: how long the win screen lingers before dismissing itself.
const ENEMY_TURN_DELAY_TICKS: u16 = 10;
const BANNER_TICKS: u16 = 60;
const SHAKE_TICKS: u16 = 8;
const SHAKE_MAGNITUDE: i16 = 4;
const ENEMY_DAMAGE_MIN: u32 = 8;
const ENEMY_DAMAGE_MAX: u32 = 22;
const RESULT_WIN_TICKS: u16 = 33;
const PET_POSE_TICKS: u16 = 50;
const PET_DOUBLE_BONK_TICKS: u64 = 7;

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            *state = AppState::new(state.rng_seed, state.config);
            DispatchResult::changed()
        }
        Action::Tick => tick(state),
        Action::TitleConfirm => {
            if state.mode != GameMode::Title {
                return DispatchResult::unchanged();
            }
            state.mode = GameMode::Hatch;
            state.hatch = HatchPhase::Egg;
            DispatchResult::changed()
        }
        Action::HatchConfirm => hatch_confirm(state),
        Action::Move(direction) => move_player(state, direction),
        Action::BattleMenuPrev => battle_menu_change(state, -1),
        Action::BattleMenuNext => battle_menu_change(state, 1),
        Action::BattleConfirm => battle_confirm(state),
        Action::ResultConfirm => result_confirm(state),
        Action::PetToggle => pet_toggle(state),
        Action::PetPat => {
            if state.mode != GameMode::Pet {
                return DispatchResult::unchanged();
            }
            state.pet.pose = PetPose::Pat;
            state.pet.pose_ticks = PET_POSE_TICKS;
            DispatchResult::changed()
        }
        Action::PetBonk => pet_bonk(state),
        Action::Quit => DispatchResult::unchanged(),
    }
}

fn hatch_confirm(state: &mut AppState) -> DispatchResult<Effect> {
    if state.mode != GameMode::Hatch {
        return DispatchResult::unchanged();
    }
    match state.hatch {
        HatchPhase::Egg => {
            state.hatch = HatchPhase::Hatched;
        }
        HatchPhase::Hatched => {
            state.mode = GameMode::Overworld;
            state.message = Some(format!(
                "{} joins you. Three wardens guard this hollow.",
                state.partner
            ));
        }
    }
    DispatchResult::changed()
}

fn move_player(state: &mut AppState, direction: Direction) -> DispatchResult<Effect> {
    if state.mode != GameMode::Overworld {
        return DispatchResult::unchanged();
    }

    state.player.facing = direction;

    let (mut next_x, mut next_y) = (state.player.x, state.player.y);
    match direction {
        Direction::Up => next_y = next_y.saturating_sub(1),
        Direction::Down => next_y = next_y.saturating_add(1),
        Direction::Left => next_x = next_x.saturating_sub(1),
        Direction::Right => next_x = next_x.saturating_add(1),
    }
    if next_x == state.player.x && next_y == state.player.y {
        return DispatchResult::changed();
    }
    if next_x >= state.map.width || next_y >= state.map.height {
        return DispatchResult::changed();
    }
    if let Some(limit) = state.config.top_limit {
        if next_y < limit {
            state.message = Some("An unseen force holds you back.".to_string());
            return DispatchResult::changed();
        }
    }
    if !state.map.is_walkable(next_x, next_y) {
        return DispatchResult::changed();
    }
    if let Some(index) = state.boss_at(next_x, next_y) {
        return start_battle(state, index);
    }

    state.player.x = next_x;
    state.player.y = next_y;
    state.player.steps = state.player.steps.wrapping_add(1);
    DispatchResult::changed()
}

fn start_battle(state: &mut AppState, index: usize) -> DispatchResult<Effect> {
    let (enemy_name, enemy_element) = match state.bosses.get(index) {
        Some(boss) => (boss.name.clone(), boss.element),
        None => return DispatchResult::unchanged(),
    };
    let partner = state.partner.clone();
    state.battle = Some(BattleState::new(&partner, &enemy_name, enemy_element));
    state.active_boss = Some(index);
    state.mode = GameMode::Battle;
    DispatchResult::changed()
}

fn battle_menu_change(state: &mut AppState, delta: i32) -> DispatchResult<Effect> {
    let Some(battle) = state.battle.as_mut() else {
        return DispatchResult::unchanged();
    };
    if battle.stage != BattleStage::Menu {
        return DispatchResult::unchanged();
    }
    let len = MOVES.len() as i32;
    battle.move_index = (battle.move_index as i32 + delta).rem_euclid(len) as usize;
    DispatchResult::changed()
}

fn battle_confirm(state: &mut AppState) -> DispatchResult<Effect> {
    let Some(stage) = state.battle.as_ref().map(|battle| battle.stage) else {
        return DispatchResult::unchanged();
    };
    match stage {
        BattleStage::Menu => resolve_player_move(state),
        BattleStage::Victory | BattleStage::Defeat => finish_battle(state),
        // Input racing a turn transition is not an error; drop it.
        BattleStage::EnemyTurn => DispatchResult::unchanged(),
    }
}

fn resolve_player_move(state: &mut AppState) -> DispatchResult<Effect> {
    let fx_seed = next_rand(state) as u64 | ((next_rand(state) as u64) << 32);
    let Some(battle) = state.battle.as_mut() else {
        return DispatchResult::unchanged();
    };

    let mv = &MOVES[battle.move_index % MOVES.len()];
    let multiplier = type_multiplier(mv.element, battle.enemy.element);
    let damage = move_damage(mv, battle.enemy.element);

    battle.enemy.hp -= damage;
    battle.fx.push(spawn_fx(mv.fx, fx_seed));
    battle
        .floats
        .push(FloatingNumber::new(damage.to_string(), enemy_midtop()));
    battle.shake.start(SHAKE_TICKS, SHAKE_MAGNITUDE);
    battle.banner = if multiplier > 1.0 {
        Some(BannerKind::SuperEffective)
    } else if multiplier < 1.0 {
        Some(BannerKind::NotVeryEffective)
    } else {
        None
    };
    battle.banner_ticks = if battle.banner.is_some() {
        BANNER_TICKS
    } else {
        0
    };
    battle.message = format!("{} ({})! {} damage!", mv.name, mv.element.label(), damage);

    if battle.enemy.is_down() {
        // Same-frame termination: no enemy turn once the threshold is crossed.
        battle.stage = BattleStage::Victory;
        battle.message = format!("{} is defeated!", battle.enemy.name);
    } else {
        battle.stage = BattleStage::EnemyTurn;
        battle.enemy_wait = ENEMY_TURN_DELAY_TICKS;
    }

    DispatchResult::changed_with(Effect::PlayAttackSound)
}

fn finish_battle(state: &mut AppState) -> DispatchResult<Effect> {
    let Some(battle) = state.battle.take() else {
        return DispatchResult::unchanged();
    };
    let Some(outcome) = battle.outcome() else {
        state.battle = Some(battle);
        return DispatchResult::unchanged();
    };

    if outcome == BattleOutcome::Win {
        if let Some(index) = state.active_boss.take() {
            if let Some(boss) = state.bosses.get_mut(index) {
                boss.defeated = true;
            }
        }
    } else {
        state.active_boss = None;
    }

    state.result = Some(ResultState {
        outcome,
        auto_ticks: (outcome == BattleOutcome::Win).then_some(RESULT_WIN_TICKS),
    });
    state.mode = GameMode::Result;
    DispatchResult::changed()
}

fn result_confirm(state: &mut AppState) -> DispatchResult<Effect> {
    if state.mode != GameMode::Result {
        return DispatchResult::unchanged();
    }
    let Some(result) = state.result.take() else {
        return DispatchResult::unchanged();
    };
    match result.outcome {
        BattleOutcome::Win => {
            if state.all_bosses_defeated() {
                state.mode = GameMode::Clear;
            } else {
                state.mode = GameMode::Overworld;
                state.message = Some("The hollow grows a little quieter.".to_string());
            }
        }
        BattleOutcome::Lose => {
            state.mode = GameMode::Overworld;
            state.reset_player_to_start();
            state.message = Some(format!(
                "{} drags you back to the trailhead.",
                state.partner
            ));
        }
    }
    DispatchResult::changed()
}

fn pet_toggle(state: &mut AppState) -> DispatchResult<Effect> {
    match state.mode {
        GameMode::Overworld => {
            state.mode = GameMode::Pet;
            state.pet.pose = PetPose::Normal;
            state.pet.pose_ticks = 0;
            DispatchResult::changed()
        }
        GameMode::Pet => {
            state.mode = GameMode::Overworld;
            DispatchResult::changed()
        }
        _ => DispatchResult::unchanged(),
    }
}

fn pet_bonk(state: &mut AppState) -> DispatchResult<Effect> {
    if state.mode != GameMode::Pet {
        return DispatchResult::unchanged();
    }
    let strong = state
        .pet
        .last_bonk_tick
        .is_some_and(|t| state.tick.saturating_sub(t) <= PET_DOUBLE_BONK_TICKS);
    state.pet.pose = if strong {
        PetPose::BonkStrong
    } else {
        PetPose::Bonk
    };
    state.pet.last_bonk_tick = Some(state.tick);
    state.pet.pose_ticks = PET_POSE_TICKS;
    DispatchResult::changed()
}

fn tick(state: &mut AppState) -> DispatchResult<Effect> {
    state.tick = state.tick.wrapping_add(1);
    match state.mode {
        GameMode::Battle => advance_battle(state),
        GameMode::Pet => {
            if state.pet.pose != PetPose::Normal {
                state.pet.pose_ticks = state.pet.pose_ticks.saturating_sub(1);
                if state.pet.pose_ticks == 0 {
                    state.pet.pose = PetPose::Normal;
                }
                return DispatchResult::changed();
            }
            DispatchResult::unchanged()
        }
        GameMode::Result => {
            let due = match state.result.as_mut() {
                Some(ResultState {
                    auto_ticks: Some(ticks),
                    ..
                }) => {
                    *ticks = ticks.saturating_sub(1);
                    *ticks == 0
                }
                _ => false,
            };
            if due {
                result_confirm(state)
            } else {
                DispatchResult::unchanged()
            }
        }
        _ => DispatchResult::unchanged(),
    }
}

/// One battle frame. Turn logic resolves first, then every live animation
/// advances; rendering happens after dispatch and only reads.
fn advance_battle(state: &mut AppState) -> DispatchResult<Effect> {
    let Some(stage) = state.battle.as_ref().map(|battle| battle.stage) else {
        return DispatchResult::unchanged();
    };
    let mut sound = None;

    if stage == BattleStage::EnemyTurn {
        let due = match state.battle.as_mut() {
            Some(battle) => {
                battle.enemy_wait = battle.enemy_wait.saturating_sub(1);
                battle.enemy_wait == 0
            }
            None => false,
        };
        if due {
            let span = ENEMY_DAMAGE_MAX - ENEMY_DAMAGE_MIN + 1;
            let damage = (ENEMY_DAMAGE_MIN + next_rand(state) % span) as i32;
            if let Some(battle) = state.battle.as_mut() {
                battle.player.hp -= damage;
                battle
                    .floats
                    .push(FloatingNumber::new(damage.to_string(), player_midtop()));
                battle.shake.start(SHAKE_TICKS, SHAKE_MAGNITUDE);
                if battle.player.is_down() {
                    battle.stage = BattleStage::Defeat;
                    battle.message = format!(
                        "{}'s attack! {} is out cold!",
                        battle.enemy.name, battle.player.name
                    );
                } else {
                    battle.stage = BattleStage::Menu;
                    battle.message =
                        format!("{}'s attack! {} damage!", battle.enemy.name, damage);
                }
                sound = Some(Effect::PlayHitSound);
            }
        }
    }

    if let Some(battle) = state.battle.as_mut() {
        battle.fx.retain_mut(|fx| fx.advance());
        battle.floats.retain_mut(|float| float.advance());
        battle.shake.tick();
        if battle.banner_ticks > 0 {
            battle.banner_ticks -= 1;
            if battle.banner_ticks == 0 {
                battle.banner = None;
            }
        }
    }

    match sound {
        Some(effect) => DispatchResult::changed_with(effect),
        None => DispatchResult::changed(),
    }
}

fn next_rand(state: &mut AppState) -> u32 {
    state.rng_seed = state
        .rng_seed
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1);
    (state.rng_seed >> 32) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::Element;
    use crate::fx::AttackFx;
    use crate::state::{OverworldConfig, START_POS};

    fn overworld_state() -> AppState {
        let mut state = AppState::new(12345, OverworldConfig::default());
        state.mode = GameMode::Overworld;
        state
    }

    fn battle_vs(element: Element) -> AppState {
        let mut state = overworld_state();
        state.battle = Some(BattleState::new("Pip", "Test Warden", element));
        state.active_boss = Some(0);
        state.mode = GameMode::Battle;
        state
    }

    fn battle(state: &mut AppState) -> &mut BattleState {
        state.battle.as_mut().expect("battle in progress")
    }

    fn battle_ref(state: &AppState) -> &BattleState {
        state.battle.as_ref().expect("battle in progress")
    }

    fn tick_n(state: &mut AppState, n: u32) {
        for _ in 0..n {
            let _ = reducer(state, Action::Tick);
        }
    }

    #[test]
    fn walking_into_a_boss_starts_its_battle() {
        let mut state = overworld_state();
        let (bx, by) = (state.bosses[0].x, state.bosses[0].y);
        state.player.x = bx;
        state.player.y = by + 1;

        let _ = reducer(&mut state, Action::Move(Direction::Up));

        assert_eq!(state.mode, GameMode::Battle);
        assert_eq!(state.active_boss, Some(0));
        assert_eq!(battle_ref(&state).enemy.element, Element::Electric);
        // The collision itself does not move the player.
        assert_eq!((state.player.x, state.player.y), (bx, by + 1));
    }

    #[test]
    fn killing_blow_wins_in_the_same_frame_with_no_enemy_turn() {
        let mut state = battle_vs(Element::Water);
        battle(&mut state).enemy.hp = 5;
        battle(&mut state).move_index = 0; // Tackle, 10 neutral damage

        let _ = reducer(&mut state, Action::BattleConfirm);

        let b = battle_ref(&state);
        assert_eq!(b.stage, BattleStage::Victory);
        assert_eq!(b.enemy.hp, -5);
        assert_eq!(b.enemy_wait, 0);
        assert_eq!(b.outcome(), Some(BattleOutcome::Win));
    }

    #[test]
    fn ten_tackles_fell_a_full_health_enemy() {
        let mut state = battle_vs(Element::Water);
        // Keep the player alive through every counterattack.
        battle(&mut state).player.hp = 100_000;
        battle(&mut state).player.max_hp = 100_000;
        battle(&mut state).move_index = 0;

        for turn in 0..10 {
            assert_eq!(battle_ref(&state).stage, BattleStage::Menu, "turn {turn}");
            let _ = reducer(&mut state, Action::BattleConfirm);
            if battle_ref(&state).stage == BattleStage::EnemyTurn {
                tick_n(&mut state, ENEMY_TURN_DELAY_TICKS as u32);
            }
        }

        assert_eq!(battle_ref(&state).stage, BattleStage::Victory);
        assert!(battle_ref(&state).enemy.hp <= 0);
    }

    #[test]
    fn flamethrower_against_water_is_resisted() {
        let mut state = battle_vs(Element::Water);
        battle(&mut state).move_index = 1; // Flamethrower

        let result = reducer(&mut state, Action::BattleConfirm);
        assert_eq!(result.effects, vec![Effect::PlayAttackSound]);

        let b = battle_ref(&state);
        assert_eq!(b.enemy.hp, 88);
        assert_eq!(b.banner, Some(BannerKind::NotVeryEffective));
        assert_eq!(b.banner_ticks, BANNER_TICKS);
        assert_eq!(b.stage, BattleStage::EnemyTurn);
        assert_eq!(b.floats.len(), 1);
        assert_eq!(b.floats[0].text, "12");
        assert!(matches!(b.fx[0], AttackFx::Flamethrower(_)));
        assert!(b.shake.remaining > 0);
    }

    #[test]
    fn super_effective_hit_raises_the_banner() {
        let mut state = battle_vs(Element::Grass);
        battle(&mut state).move_index = 1; // Flamethrower, 2x vs Grass

        let _ = reducer(&mut state, Action::BattleConfirm);

        let b = battle_ref(&state);
        assert_eq!(b.enemy.hp, 50);
        assert_eq!(b.banner, Some(BannerKind::SuperEffective));
    }

    #[test]
    fn neutral_hit_raises_no_banner() {
        let mut state = battle_vs(Element::Electric);
        battle(&mut state).move_index = 0; // Tackle

        let _ = reducer(&mut state, Action::BattleConfirm);

        assert_eq!(battle_ref(&state).banner, None);
        assert_eq!(battle_ref(&state).banner_ticks, 0);
    }

    #[test]
    fn battle_input_is_ignored_while_the_enemy_winds_up() {
        let mut state = battle_vs(Element::Water);
        battle(&mut state).move_index = 1;
        let _ = reducer(&mut state, Action::BattleConfirm);
        assert_eq!(battle_ref(&state).stage, BattleStage::EnemyTurn);

        let _ = reducer(&mut state, Action::BattleConfirm);
        let _ = reducer(&mut state, Action::BattleMenuNext);

        let b = battle_ref(&state);
        assert_eq!(b.enemy.hp, 88);
        assert_eq!(b.stage, BattleStage::EnemyTurn);
        assert_eq!(b.move_index, 1);
    }

    #[test]
    fn enemy_strikes_only_after_the_counted_delay() {
        let mut state = battle_vs(Element::Water);
        battle(&mut state).move_index = 1;
        let _ = reducer(&mut state, Action::BattleConfirm);

        tick_n(&mut state, ENEMY_TURN_DELAY_TICKS as u32 - 1);
        assert_eq!(battle_ref(&state).player.hp, 100);
        assert_eq!(battle_ref(&state).stage, BattleStage::EnemyTurn);

        tick_n(&mut state, 1);
        let b = battle_ref(&state);
        let dealt = 100 - b.player.hp;
        assert!((ENEMY_DAMAGE_MIN as i32..=ENEMY_DAMAGE_MAX as i32).contains(&dealt));
        assert_eq!(b.stage, BattleStage::Menu);
        // A second floating number now hangs over the player.
        assert_eq!(b.floats.len(), 2);
    }

    #[test]
    fn animations_keep_running_through_the_enemy_wait() {
        let mut state = battle_vs(Element::Water);
        battle(&mut state).move_index = 1;
        let _ = reducer(&mut state, Action::BattleConfirm);
        let y_before = battle_ref(&state).floats[0].y;

        tick_n(&mut state, 3);

        let b = battle_ref(&state);
        assert!(b.floats[0].y < y_before);
        assert!(!b.fx.is_empty());
    }

    #[test]
    fn banner_expires_after_its_sixty_ticks() {
        let mut state = battle_vs(Element::Water);
        battle(&mut state).move_index = 1;
        let _ = reducer(&mut state, Action::BattleConfirm);

        tick_n(&mut state, BANNER_TICKS as u32 - 1);
        assert!(battle_ref(&state).banner.is_some());
        tick_n(&mut state, 1);
        assert_eq!(battle_ref(&state).banner, None);
    }

    #[test]
    fn defeat_sends_the_player_back_to_the_trailhead() {
        let mut state = battle_vs(Element::Water);
        state.player.x = 5;
        state.player.y = 10;
        battle(&mut state).player.hp = 1;
        battle(&mut state).move_index = 0;

        let _ = reducer(&mut state, Action::BattleConfirm);
        tick_n(&mut state, ENEMY_TURN_DELAY_TICKS as u32);
        assert_eq!(battle_ref(&state).stage, BattleStage::Defeat);
        assert_eq!(battle_ref(&state).outcome(), Some(BattleOutcome::Lose));

        let _ = reducer(&mut state, Action::BattleConfirm);
        assert_eq!(state.mode, GameMode::Result);
        assert_eq!(
            state.result.map(|r| r.outcome),
            Some(BattleOutcome::Lose)
        );

        let _ = reducer(&mut state, Action::ResultConfirm);
        assert_eq!(state.mode, GameMode::Overworld);
        assert_eq!((state.player.x, state.player.y), START_POS);
        assert!(!state.bosses[0].defeated);
    }

    #[test]
    fn final_victory_leads_to_the_clear_screen() {
        let mut state = battle_vs(Element::Electric);
        state.bosses[1].defeated = true;
        state.bosses[2].defeated = true;
        battle(&mut state).enemy.hp = 1;
        battle(&mut state).move_index = 0;

        let _ = reducer(&mut state, Action::BattleConfirm);
        assert_eq!(battle_ref(&state).stage, BattleStage::Victory);

        let _ = reducer(&mut state, Action::BattleConfirm);
        assert_eq!(state.mode, GameMode::Result);
        assert!(state.bosses[0].defeated);

        let _ = reducer(&mut state, Action::ResultConfirm);
        assert_eq!(state.mode, GameMode::Clear);
    }

    #[test]
    fn early_victory_returns_to_the_overworld() {
        let mut state = battle_vs(Element::Electric);
        battle(&mut state).enemy.hp = 1;
        battle(&mut state).move_index = 0;

        let _ = reducer(&mut state, Action::BattleConfirm);
        let _ = reducer(&mut state, Action::BattleConfirm);
        let _ = reducer(&mut state, Action::ResultConfirm);

        assert_eq!(state.mode, GameMode::Overworld);
        assert!(state.bosses[0].defeated);
        assert!(!state.all_bosses_defeated());
    }

    #[test]
    fn win_screen_dismisses_itself() {
        let mut state = overworld_state();
        state.mode = GameMode::Result;
        state.result = Some(ResultState {
            outcome: BattleOutcome::Win,
            auto_ticks: Some(2),
        });

        tick_n(&mut state, 2);
        assert_eq!(state.mode, GameMode::Overworld);
    }

    #[test]
    fn lose_screen_waits_for_confirm() {
        let mut state = overworld_state();
        state.mode = GameMode::Result;
        state.result = Some(ResultState {
            outcome: BattleOutcome::Lose,
            auto_ticks: None,
        });

        tick_n(&mut state, 100);
        assert_eq!(state.mode, GameMode::Result);
    }

    #[test]
    fn menu_selection_wraps_both_ways() {
        let mut state = battle_vs(Element::Water);
        let _ = reducer(&mut state, Action::BattleMenuPrev);
        assert_eq!(battle_ref(&state).move_index, MOVES.len() - 1);
        let _ = reducer(&mut state, Action::BattleMenuNext);
        assert_eq!(battle_ref(&state).move_index, 0);
    }

    #[test]
    fn top_limit_config_blocks_northward_movement() {
        let mut state = AppState::new(9, OverworldConfig {
            top_limit: Some(START_POS.1),
        });
        state.mode = GameMode::Overworld;

        let _ = reducer(&mut state, Action::Move(Direction::Up));
        assert_eq!((state.player.x, state.player.y), START_POS);

        let _ = reducer(&mut state, Action::Move(Direction::Down));
        assert_eq!(state.player.y, START_POS.1 + 1);
    }

    #[test]
    fn water_tiles_block_the_player() {
        let mut state = overworld_state();
        // Sand fringe just below the pond.
        state.player.x = 10;
        state.player.y = 8;
        let _ = reducer(&mut state, Action::Move(Direction::Up));
        assert_eq!((state.player.x, state.player.y), (10, 8));
    }

    #[test]
    fn double_bonk_within_the_window_is_strong() {
        let mut state = overworld_state();
        let _ = reducer(&mut state, Action::PetToggle);
        assert_eq!(state.mode, GameMode::Pet);

        let _ = reducer(&mut state, Action::PetBonk);
        assert_eq!(state.pet.pose, PetPose::Bonk);
        tick_n(&mut state, 2);
        let _ = reducer(&mut state, Action::PetBonk);
        assert_eq!(state.pet.pose, PetPose::BonkStrong);

        // Outside the window the bonk downgrades again.
        tick_n(&mut state, PET_DOUBLE_BONK_TICKS as u32 + 1);
        let _ = reducer(&mut state, Action::PetBonk);
        assert_eq!(state.pet.pose, PetPose::Bonk);
    }

    #[test]
    fn pet_pose_decays_back_to_normal() {
        let mut state = overworld_state();
        let _ = reducer(&mut state, Action::PetToggle);
        let _ = reducer(&mut state, Action::PetPat);
        assert_eq!(state.pet.pose, PetPose::Pat);

        tick_n(&mut state, PET_POSE_TICKS as u32);
        assert_eq!(state.pet.pose, PetPose::Normal);
    }

    #[test]
    fn title_and_hatch_flow_into_the_overworld() {
        let mut state = AppState::new(1, OverworldConfig::default());
        assert_eq!(state.mode, GameMode::Title);
        let _ = reducer(&mut state, Action::TitleConfirm);
        assert_eq!(state.mode, GameMode::Hatch);
        let _ = reducer(&mut state, Action::HatchConfirm);
        assert_eq!(state.hatch, HatchPhase::Hatched);
        let _ = reducer(&mut state, Action::HatchConfirm);
        assert_eq!(state.mode, GameMode::Overworld);
    }
}
