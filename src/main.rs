mod action;
mod battle;
mod effect;
mod fx;
mod reducer;
mod state;
mod ui;

use std::io;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use rodio::{source::SineWave, OutputStream, Sink, Source};
use tui_dispatch::EffectStore;

use crate::action::Action;
use crate::effect::Effect;
use crate::state::{AppState, Direction, GameMode, OverworldConfig};

#[derive(Parser, Debug)]
#[command(name = "bosstui")]
#[command(about = "Top-down boss-battle adventure for the terminal")]
struct Args {
    #[arg(long, default_value_t = 0xB0551_u64)]
    seed: u64,

    /// Forbid walking above this map row.
    #[arg(long)]
    top_limit: Option<u16>,
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, args);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, args: Args) -> io::Result<()> {
    let config = OverworldConfig {
        top_limit: args.top_limit,
    };
    let mut store = EffectStore::new(AppState::new(args.seed, config), reducer::reducer);
    dispatch_action(&mut store, Action::Init);

    loop {
        terminal.draw(|frame| ui::render(frame, frame.area(), store.state()))?;

        if event::poll(Duration::from_millis(60))? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if handle_key(key.code, &mut store) {
                        break;
                    }
                }
                _ => {}
            }
        }

        dispatch_action(&mut store, Action::Tick);
    }

    Ok(())
}

fn handle_key(code: KeyCode, store: &mut EffectStore<AppState, Action, Effect>) -> bool {
    let mode = store.state().mode;

    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') => return true,
        KeyCode::Enter | KeyCode::Char('z') | KeyCode::Char('Z') => match mode {
            GameMode::Title => dispatch_action(store, Action::TitleConfirm),
            GameMode::Hatch => dispatch_action(store, Action::HatchConfirm),
            GameMode::Battle => dispatch_action(store, Action::BattleConfirm),
            GameMode::Result => dispatch_action(store, Action::ResultConfirm),
            GameMode::Clear => return true,
            _ => {}
        },
        KeyCode::Char('f') | KeyCode::Char('F')
            if mode == GameMode::Overworld || mode == GameMode::Pet =>
        {
            dispatch_action(store, Action::PetToggle);
        }
        KeyCode::Char('a') | KeyCode::Char('A') if mode == GameMode::Pet => {
            dispatch_action(store, Action::PetPat);
        }
        KeyCode::Char('s') | KeyCode::Char('S') if mode == GameMode::Pet => {
            dispatch_action(store, Action::PetBonk);
        }
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') if mode == GameMode::Overworld => {
            dispatch_action(store, Action::Move(Direction::Up));
        }
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S')
            if mode == GameMode::Overworld =>
        {
            dispatch_action(store, Action::Move(Direction::Down));
        }
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A')
            if mode == GameMode::Overworld =>
        {
            dispatch_action(store, Action::Move(Direction::Left));
        }
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D')
            if mode == GameMode::Overworld =>
        {
            dispatch_action(store, Action::Move(Direction::Right));
        }
        KeyCode::Up | KeyCode::Left if mode == GameMode::Battle => {
            dispatch_action(store, Action::BattleMenuPrev);
        }
        KeyCode::Down | KeyCode::Right if mode == GameMode::Battle => {
            dispatch_action(store, Action::BattleMenuNext);
        }
        _ => {}
    }
    false
}

fn dispatch_action(store: &mut EffectStore<AppState, Action, Effect>, action: Action) {
    let result = store.dispatch(action);
    for effect in result.effects {
        handle_effect(effect);
    }
}

fn handle_effect(effect: Effect) {
    match effect {
        Effect::PlayAttackSound => play_tone(640.0, 140),
        Effect::PlayHitSound => play_tone(196.0, 180),
    }
}

/// Fire-and-forget sine blip; audio failure is never worth interrupting a
/// battle over.
fn play_tone(freq: f32, millis: u64) {
    std::thread::spawn(move || {
        let Ok((stream, handle)) = OutputStream::try_default() else {
            return;
        };
        let Ok(sink) = Sink::try_new(&handle) else {
            return;
        };
        let source = SineWave::new(freq)
            .take_duration(Duration::from_millis(millis))
            .amplify(0.18);
        sink.append(source);
        sink.sleep_until_end();
        drop(stream);
    });
}
