use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction as LayoutDir, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

use crate::battle::{
    BannerKind, BattleOutcome, BattleStage, BattleState, Element, CANVAS_H, CANVAS_W,
    ENEMY_BODY_POS, ENEMY_BODY_SIZE, MOVES, PLAYER_BODY_POS, PLAYER_BODY_SIZE,
};
use crate::fx::{AttackFx, Vec2};
use crate::state::{AppState, GameMode, HatchPhase, PetPose, Tile};

const BG_BASE: Color = Color::Rgb(18, 22, 34);
const BG_PANEL: Color = Color::Rgb(28, 34, 52);
const BG_PANEL_ALT: Color = Color::Rgb(24, 29, 44);
const TEXT_MAIN: Color = Color::Rgb(226, 230, 240);
const TEXT_DIM: Color = Color::Rgb(150, 158, 178);
const ACCENT: Color = Color::Rgb(126, 200, 255);
const ACCENT_GOLD: Color = Color::Rgb(236, 200, 110);
const HIGHLIGHT_TEXT: Color = Color::Rgb(12, 18, 28);
const BORDER_ACCENT: Color = Color::Rgb(70, 84, 112);

const FIELD_SKY: Color = Color::Rgb(40, 52, 76);
const FIELD_GROUND: Color = Color::Rgb(34, 44, 56);

const TILE_GRASS: Color = Color::Rgb(36, 110, 60);
const TILE_PATH: Color = Color::Rgb(158, 134, 82);
const TILE_SAND: Color = Color::Rgb(196, 180, 132);
const TILE_WALL: Color = Color::Rgb(62, 70, 74);
const TILE_WATER: Color = Color::Rgb(44, 90, 150);

// Each map tile spans two columns so tiles come out roughly square.
const COLS_PER_TILE: u16 = 2;

pub fn element_color(element: Element) -> Color {
    match element {
        Element::Normal => Color::Rgb(168, 168, 150),
        Element::Fire => Color::Rgb(235, 110, 60),
        Element::Water => Color::Rgb(90, 150, 240),
        Element::Electric => Color::Rgb(244, 206, 66),
        Element::Grass => Color::Rgb(110, 196, 90),
    }
}

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    frame.render_widget(Block::default().style(Style::default().bg(BG_BASE)), area);
    match state.mode {
        GameMode::Title => render_title(frame, area),
        GameMode::Hatch => render_hatch(frame, area, state),
        GameMode::Overworld => render_overworld(frame, area, state),
        GameMode::Battle => render_battle(frame, area, state),
        GameMode::Result => render_result(frame, area, state),
        GameMode::Clear => render_clear(frame, area, state),
        GameMode::Pet => render_pet(frame, area, state),
    }
}

fn render_title(frame: &mut Frame, area: Rect) {
    let block = panel_block(" VERDANT HOLLOW ", BG_PANEL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            "V E R D A N T   H O L L O W",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Three wardens. One egg. One trail.",
            Style::default().fg(TEXT_DIM),
        )),
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            "Press Enter",
            Style::default().fg(TEXT_MAIN).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Q: quit", Style::default().fg(TEXT_DIM))),
    ];
    let paragraph = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, inner);
}

const EGG_ART: [&str; 5] = [
    "  .-\"\"-.  ",
    " /      \\ ",
    "|  ~  ~  |",
    " \\      / ",
    "  `-..-'  ",
];

fn render_hatch(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = panel_block(" A QUIET CLEARING ", BG_PANEL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![Line::from("")];
    match state.hatch {
        HatchPhase::Egg => {
            lines.push(Line::from(Span::styled(
                "Something stirs inside an egg...",
                Style::default().fg(TEXT_MAIN),
            )));
            lines.push(Line::from(""));
            for row in EGG_ART {
                lines.push(Line::from(Span::styled(row, Style::default().fg(ACCENT_GOLD))));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Enter: crack it open",
                Style::default().fg(TEXT_DIM),
            )));
        }
        HatchPhase::Hatched => {
            lines.push(Line::from(Span::styled(
                "The egg hatched!",
                Style::default().fg(TEXT_MAIN).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));
            for row in pet_art(PetPose::Normal) {
                lines.push(Line::from(Span::styled(row, Style::default().fg(ACCENT))));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("{} looks up at you.", state.partner),
                Style::default().fg(ACCENT_GOLD),
            )));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Enter: set out together",
                Style::default().fg(TEXT_DIM),
            )));
        }
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, inner);
}

fn render_overworld(frame: &mut Frame, area: Rect, state: &AppState) {
    if area.width < 30 || area.height < 14 {
        let warning = Paragraph::new("Terminal too small - expand window.")
            .style(Style::default().fg(TEXT_DIM))
            .alignment(Alignment::Center);
        frame.render_widget(warning, area);
        return;
    }

    let layout = Layout::default()
        .direction(LayoutDir::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(4),
        ])
        .split(area);

    render_overworld_header(frame, layout[0], state);
    render_map(frame, layout[1], state);
    render_overworld_status(frame, layout[2], state);
}

fn render_overworld_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = panel_block(" ROUTE ", BG_PANEL_ALT);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let remaining = state.bosses.iter().filter(|b| !b.defeated).count();
    let line = Line::from(vec![
        Span::styled(
            state.map.name.clone(),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Partner {}", state.partner),
            Style::default().fg(TEXT_MAIN),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Wardens left {}", remaining),
            Style::default().fg(TEXT_MAIN),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Steps {}", state.player.steps),
            Style::default().fg(TEXT_DIM),
        ),
    ]);
    frame.render_widget(Paragraph::new(Text::from(vec![line])), inner);
}

fn tile_color(tile: Tile) -> Color {
    match tile {
        Tile::Grass => TILE_GRASS,
        Tile::Path => TILE_PATH,
        Tile::Sand => TILE_SAND,
        Tile::Wall => TILE_WALL,
        Tile::Water => TILE_WATER,
    }
}

fn tile_texture(tile: Tile) -> (char, i16, u32) {
    // glyph, fg lift, sprinkle density (1 in N cells)
    match tile {
        Tile::Grass => ('\'', 14, 6),
        Tile::Path => ('.', 10, 7),
        Tile::Sand => (':', 10, 6),
        Tile::Wall => ('#', 12, 4),
        Tile::Water => ('~', 16, 5),
    }
}

fn tile_seed(x: u16, y: u16) -> u32 {
    let mut n = x as u32;
    n = n
        .wrapping_mul(374761393)
        .wrapping_add((y as u32).wrapping_mul(668265263));
    n ^= n >> 13;
    n = n.wrapping_mul(1274126177);
    n ^= n >> 16;
    n
}

fn adjust_color(color: Color, delta: i16) -> Color {
    match color {
        Color::Rgb(r, g, b) => {
            let clamp = |v: i16| v.clamp(0, 255) as u8;
            Color::Rgb(
                clamp(r as i16 + delta),
                clamp(g as i16 + delta),
                clamp(b as i16 + delta),
            )
        }
        other => other,
    }
}

fn map_viewport(state: &AppState, view_w: u16, view_h: u16) -> (u16, u16) {
    let max_x = state.map.width.saturating_sub(view_w);
    let max_y = state.map.height.saturating_sub(view_h);
    let start_x = state
        .player
        .x
        .saturating_sub(view_w / 2)
        .min(max_x);
    let start_y = state
        .player
        .y
        .saturating_sub(view_h / 2)
        .min(max_y);
    (start_x, start_y)
}

fn render_map(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = panel_block(state.map.name.as_str(), BG_PANEL_ALT);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width < COLS_PER_TILE || inner.height == 0 {
        return;
    }

    let view_w = (inner.width / COLS_PER_TILE).min(state.map.width);
    let view_h = inner.height.min(state.map.height);
    let used_cols = view_w * COLS_PER_TILE;
    let origin_x = inner.x + (inner.width.saturating_sub(used_cols)) / 2;
    let origin_y = inner.y + (inner.height.saturating_sub(view_h)) / 2;
    let (start_x, start_y) = map_viewport(state, view_w, view_h);

    let buf = frame.buffer_mut();
    for row in 0..view_h {
        for col in 0..view_w {
            let map_x = start_x + col;
            let map_y = start_y + row;
            let tile = state.map.tile(map_x, map_y);
            let base = tile_color(tile);
            let seed = tile_seed(map_x, map_y);
            let bg = if seed % 2 == 0 {
                base
            } else {
                adjust_color(base, 6)
            };
            let (glyph, lift, density) = tile_texture(tile);
            for dx in 0..COLS_PER_TILE {
                let x = origin_x + col * COLS_PER_TILE + dx;
                let y = origin_y + row;
                if let Some(cell) = buf.cell_mut((x, y)) {
                    let sprinkle = tile_seed(map_x.wrapping_add(dx * 131), map_y);
                    if sprinkle % density == 0 {
                        cell.set_bg(bg).set_fg(adjust_color(bg, lift)).set_char(glyph);
                    } else {
                        cell.set_bg(bg).set_fg(bg).set_char(' ');
                    }
                }
            }
        }
    }

    // Live bosses sit on top of their tiles in their element's color.
    for boss in state.bosses.iter().filter(|b| !b.defeated) {
        let (Some(col), Some(row)) = (
            boss.x.checked_sub(start_x),
            boss.y.checked_sub(start_y),
        ) else {
            continue;
        };
        if col >= view_w || row >= view_h {
            continue;
        }
        let x = origin_x + col * COLS_PER_TILE;
        let y = origin_y + row;
        let color = element_color(boss.element);
        for (dx, ch) in [(0u16, '['), (1u16, ']')] {
            if let Some(cell) = buf.cell_mut((x + dx, y)) {
                cell.set_bg(color).set_fg(HIGHLIGHT_TEXT).set_char(ch);
            }
        }
    }

    // Player marker last so nothing draws over it.
    let px = state.player.x.checked_sub(start_x);
    let py = state.player.y.checked_sub(start_y);
    if let (Some(col), Some(row)) = (px, py) {
        if col < view_w && row < view_h {
            let x = origin_x + col * COLS_PER_TILE;
            let y = origin_y + row;
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_fg(TEXT_MAIN).set_char('@');
            }
            if let Some(cell) = buf.cell_mut((x + 1, y)) {
                cell.set_fg(TEXT_DIM).set_char(' ');
            }
        }
    }
}

fn render_overworld_status(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = panel_block("STATUS", BG_PANEL_ALT);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let message = state
        .message
        .as_deref()
        .unwrap_or("The wardens wait on the far side of the pond.");
    let lines = vec![
        Line::from(Span::styled(message, Style::default().fg(TEXT_MAIN))),
        Line::from(Span::styled(
            "Arrows/WASD move  |  F pet  |  Q quit",
            Style::default().fg(TEXT_DIM),
        )),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(lines)).wrap(Wrap { trim: true }),
        inner,
    );
}

fn render_battle(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(battle) = state.battle.as_ref() else {
        return;
    };

    let layout = Layout::default()
        .direction(LayoutDir::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(8)])
        .split(area);

    // The whole composed battle frame shifts by the shake offset; the
    // command box below keeps its own coordinate space.
    let (dx, dy) = battle.shake.offset(state.tick);
    let canvas = shift_rect(layout[0], dx, dy);
    draw_battle_canvas(frame.buffer_mut(), canvas, battle);
    render_battle_command(frame, layout[1], battle);
}

fn shift_rect(rect: Rect, dx: i16, dy: i16) -> Rect {
    let x = (rect.x as i32 + dx as i32).max(0) as u16;
    let y = (rect.y as i32 + dy as i32).max(0) as u16;
    Rect::new(x, y, rect.width, rect.height)
}

/// Draws the full battle scene into the buffer. Pure with respect to the
/// battle state: calling it twice with the same inputs paints the same cells.
pub fn draw_battle_canvas(buf: &mut Buffer, area: Rect, battle: &BattleState) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    // Sky over ground backdrop.
    let horizon = area.y + (area.height as u32 * 3 / 5) as u16;
    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut((x, y)) {
                let bg = if y < horizon { FIELD_SKY } else { FIELD_GROUND };
                cell.set_bg(bg).set_fg(bg).set_char(' ');
            }
        }
    }

    if !battle.enemy.is_down() {
        draw_body(
            buf,
            area,
            ENEMY_BODY_POS,
            ENEMY_BODY_SIZE,
            element_color(battle.enemy.element),
        );
    }
    let player_pos = PLAYER_BODY_POS.add(battle.player_body_offset());
    draw_body(
        buf,
        area,
        player_pos,
        PLAYER_BODY_SIZE,
        ACCENT,
    );

    draw_hp_readout(
        buf,
        area,
        Vec2::new(500.0, 70.0),
        &battle.enemy.name,
        battle.enemy.hp,
        battle.enemy.max_hp,
    );
    draw_hp_readout(
        buf,
        area,
        Vec2::new(60.0, 320.0),
        &battle.player.name,
        battle.player.hp,
        battle.player.max_hp,
    );

    for fx in &battle.fx {
        draw_fx(buf, area, fx);
    }

    for float in &battle.floats {
        let color = Color::Rgb(float.alpha, float.alpha, 0);
        put_string(
            buf,
            area,
            Vec2::new(float.x, float.y),
            &float.text,
            color,
        );
    }

    if let Some(banner) = battle.banner {
        draw_banner(buf, area, banner);
    }
}

fn draw_banner(buf: &mut Buffer, area: Rect, banner: BannerKind) {
    let text = banner.text();
    let row = area.y as i32 + 1;
    let col = area.x as i32 + (area.width as i32 - text.len() as i32) / 2;
    for (i, ch) in text.chars().enumerate() {
        put(buf, area, col + i as i32, row, ch, ACCENT_GOLD);
    }
}

fn draw_fx(buf: &mut Buffer, area: Rect, fx: &AttackFx) {
    match fx {
        // Tackle shows up as body displacement, nothing extra to paint.
        AttackFx::Tackle(_) => {}
        AttackFx::QuickAttack(q) => {
            for path in &q.paths {
                for pair in path.windows(2) {
                    // Fat translucent-looking stroke under a thin bright one.
                    plot_line(buf, area, pair[0], pair[1], 1, '▒', Color::Rgb(255, 255, 120));
                    plot_line(buf, area, pair[0], pair[1], 0, '*', Color::Rgb(255, 255, 255));
                }
            }
        }
        AttackFx::Flamethrower(f) => {
            for p in &f.smoke {
                let ch = if p.life > 20 { '▒' } else { '░' };
                let shade = (60 + (p.life as i32 * 3).clamp(0, 120)) as u8;
                put_virtual(buf, area, p.x, p.y, ch, Color::Rgb(shade, shade, shade));
            }
            for p in &f.flames {
                let ch = if p.life > 23 {
                    '@'
                } else if p.life > 11 {
                    'o'
                } else {
                    '*'
                };
                let g = (100 + (p.life as i32 * 37) % 100) as u8;
                put_virtual(buf, area, p.x, p.y, ch, Color::Rgb(255, g, 45));
            }
        }
        AttackFx::WaterGun(w) => {
            plot_line(buf, area, w.src, w.dst, 1, '═', Color::Rgb(100, 200, 255));
            plot_line(buf, area, w.src, w.dst, 0, '─', Color::Rgb(220, 245, 255));
            for p in &w.drops {
                let ch = if p.life > 16 { 'o' } else { '.' };
                put_virtual(buf, area, p.x, p.y, ch, Color::Rgb(170, 220, 255));
            }
        }
    }
}

fn render_battle_command(frame: &mut Frame, area: Rect, battle: &BattleState) {
    let block = panel_block("COMMAND", BG_PANEL_ALT);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![Line::from(Span::styled(
        battle.message.clone(),
        Style::default().fg(TEXT_MAIN),
    ))];
    match battle.stage {
        BattleStage::Menu => {
            for (index, mv) in MOVES.iter().enumerate() {
                let label = format!("{} ({})", mv.name, mv.element.label());
                lines.push(move_line(&label, mv.element, index == battle.move_index));
            }
            lines.push(Line::from(Span::styled(
                "Up/Down: choose  |  Z/Enter: attack",
                Style::default().fg(TEXT_DIM),
            )));
        }
        BattleStage::EnemyTurn => {
            lines.push(Line::from(Span::styled(
                format!("{} is winding up...", battle.enemy.name),
                Style::default().fg(TEXT_DIM),
            )));
        }
        BattleStage::Victory | BattleStage::Defeat => {
            lines.push(Line::from(Span::styled(
                "Z/Enter: continue",
                Style::default().fg(TEXT_DIM),
            )));
        }
    }

    frame.render_widget(
        Paragraph::new(Text::from(lines)).wrap(Wrap { trim: true }),
        inner,
    );
}

fn render_result(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(result) = state.result else {
        return;
    };
    let (title, body, color) = match result.outcome {
        BattleOutcome::Win => (" VICTORY ", "The warden yields the path.", ACCENT_GOLD),
        BattleOutcome::Lose => (
            " DEFEAT ",
            "Everything goes dark for a moment...",
            Color::Rgb(220, 96, 96),
        ),
    };

    let block = panel_block(title, BG_PANEL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            title.trim().to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(body, Style::default().fg(TEXT_MAIN))),
        Line::from(""),
    ];
    if result.auto_ticks.is_none() {
        lines.push(Line::from(Span::styled(
            "Enter: back to the route",
            Style::default().fg(TEXT_DIM),
        )));
    }

    frame.render_widget(
        Paragraph::new(Text::from(lines)).alignment(Alignment::Center),
        inner,
    );
}

fn render_clear(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = panel_block(" JOURNEY'S END ", BG_PANEL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "All three wardens stand down.",
            Style::default().fg(ACCENT_GOLD).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("You and {} walk out of the hollow together.", state.partner),
            Style::default().fg(TEXT_MAIN),
        )),
        Line::from(""),
        Line::from(Span::styled("*  .  *  '  *  .  *", Style::default().fg(ACCENT))),
        Line::from(""),
        Line::from(Span::styled(
            "Enter: finish",
            Style::default().fg(TEXT_DIM),
        )),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(lines)).alignment(Alignment::Center),
        inner,
    );
}

fn pet_art(pose: PetPose) -> [&'static str; 3] {
    match pose {
        PetPose::Normal => ["  /\\_/\\  ", " ( o.o ) ", "  > ^ <  "],
        PetPose::Pat => ["  /\\_/\\  ", " ( ^.^ ) ", "  > v <  "],
        PetPose::Bonk => ["  /\\_/\\  ", " ( >.< ) ", "  > ~ <  "],
        PetPose::BonkStrong => ["  /\\_/\\  ", " ( x.x ) ", "  > _ <  "],
    }
}

fn render_pet(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = panel_block(" TOGETHER ", Color::Rgb(52, 34, 48));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![Line::from(""), Line::from("")];
    for row in pet_art(state.pet.pose) {
        lines.push(Line::from(Span::styled(
            row,
            Style::default().fg(ACCENT_GOLD).add_modifier(Modifier::BOLD),
        )));
    }
    lines.push(Line::from(""));
    let caption = match state.pet.pose {
        PetPose::Normal => format!("{} sits with you for a while.", state.partner),
        PetPose::Pat => format!("{} leans into the pat.", state.partner),
        PetPose::Bonk => format!("{} squeaks indignantly.", state.partner),
        PetPose::BonkStrong => format!("{} is seeing stars.", state.partner),
    };
    lines.push(Line::from(Span::styled(caption, Style::default().fg(TEXT_MAIN))));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "A: pat  |  S: bonk (again quickly for a wallop)  |  F: back",
        Style::default().fg(TEXT_DIM),
    )));

    frame.render_widget(
        Paragraph::new(Text::from(lines)).alignment(Alignment::Center),
        inner,
    );
}

// ── Battle canvas primitives ────────────────────────────────────────────────

fn project(area: Rect, p: Vec2) -> (i32, i32) {
    let col = area.x as i32 + (p.x / CANVAS_W * area.width as f32) as i32;
    let row = area.y as i32 + (p.y / CANVAS_H * area.height as f32) as i32;
    (col, row)
}

fn put(buf: &mut Buffer, area: Rect, col: i32, row: i32, ch: char, color: Color) {
    if col < area.x as i32
        || row < area.y as i32
        || col >= area.x as i32 + area.width as i32
        || row >= area.y as i32 + area.height as i32
    {
        return;
    }
    if let Some(cell) = buf.cell_mut((col as u16, row as u16)) {
        cell.set_char(ch).set_fg(color);
    }
}

fn put_virtual(buf: &mut Buffer, area: Rect, x: f32, y: f32, ch: char, color: Color) {
    let (col, row) = project(area, Vec2::new(x, y));
    put(buf, area, col, row, ch, color);
}

fn put_string(buf: &mut Buffer, area: Rect, pos: Vec2, text: &str, color: Color) {
    let (col, row) = project(area, pos);
    for (i, ch) in text.chars().enumerate() {
        put(buf, area, col + i as i32, row, ch, color);
    }
}

/// Samples the virtual-space segment densely and paints each covered cell.
/// `spread` widens the stroke by that many rows above and below.
fn plot_line(
    buf: &mut Buffer,
    area: Rect,
    a: Vec2,
    b: Vec2,
    spread: i32,
    ch: char,
    color: Color,
) {
    let steps = (area.width as i32 * 2).max(16);
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        let (col, row) = project(area, Vec2::lerp(a, b, t));
        for dy in -spread..=spread {
            put(buf, area, col, row + dy, ch, color);
        }
    }
}

/// Filled ellipse body with a darker rim, sized in virtual coordinates.
fn draw_body(buf: &mut Buffer, area: Rect, pos: Vec2, size: Vec2, color: Color) {
    let center_x = pos.x + size.x / 2.0;
    let center_y = pos.y + size.y / 2.0;
    let radius_x = (size.x / 2.0).max(1.0);
    let radius_y = (size.y / 2.0).max(1.0);

    let (c0, r0) = project(area, pos);
    let (c1, r1) = project(area, pos.add(size));
    for row in r0..=r1 {
        for col in c0..=c1 {
            // Back-project the cell centre to decide whether it is inside.
            let vx = (col as f32 + 0.5 - area.x as f32) / area.width as f32 * CANVAS_W;
            let vy = (row as f32 + 0.5 - area.y as f32) / area.height as f32 * CANVAS_H;
            let nx = (vx - center_x) / radius_x;
            let ny = (vy - center_y) / radius_y;
            let d = nx * nx + ny * ny;
            if d > 1.0 {
                continue;
            }
            if col < area.x as i32
                || row < area.y as i32
                || col >= area.x as i32 + area.width as i32
                || row >= area.y as i32 + area.height as i32
            {
                continue;
            }
            if let Some(cell) = buf.cell_mut((col as u16, row as u16)) {
                let bg = if d > 0.62 {
                    adjust_color(color, -46)
                } else {
                    color
                };
                cell.set_bg(bg).set_fg(bg).set_char(' ');
            }
        }
    }
}

fn draw_hp_readout(buf: &mut Buffer, area: Rect, pos: Vec2, name: &str, hp: i32, max_hp: i32) {
    const BAR_WIDTH: usize = 14;
    let shown = hp.max(0);
    let ratio = if max_hp > 0 {
        (shown as f32 / max_hp as f32).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = ((ratio * BAR_WIDTH as f32).round() as usize).min(BAR_WIDTH);
    let color = if ratio > 0.5 {
        Color::Rgb(104, 204, 120)
    } else if ratio > 0.2 {
        ACCENT_GOLD
    } else {
        Color::Rgb(220, 96, 96)
    };

    put_string(buf, area, pos, name, TEXT_MAIN);
    let bar_pos = Vec2::new(pos.x, pos.y + CANVAS_H / 30.0);
    let (col, row) = project(area, bar_pos);
    for i in 0..BAR_WIDTH {
        let (ch, fg) = if i < filled {
            ('█', color)
        } else {
            ('░', TEXT_DIM)
        };
        put(buf, area, col + i as i32, row, ch, fg);
    }
    let label = format!(" {}/{}", shown, max_hp);
    for (i, ch) in label.chars().enumerate() {
        put(buf, area, col + (BAR_WIDTH + i) as i32, row, ch, TEXT_DIM);
    }
}

fn panel_block<'a>(title: &'a str, bg: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(title)
        .style(Style::default().bg(bg).fg(TEXT_MAIN))
        .border_style(Style::default().fg(BORDER_ACCENT))
}

fn move_line(label: &str, element: Element, selected: bool) -> Line<'static> {
    let style = if selected {
        Style::default()
            .fg(HIGHLIGHT_TEXT)
            .bg(element_color(element))
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT_MAIN)
    };
    let marker = if selected { "▸ " } else { "  " };
    Line::from(vec![
        Span::styled(marker.to_string(), Style::default().fg(ACCENT)),
        Span::styled(label.to_string(), style),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::{enemy_center, spawn_fx, FxKind};

    fn busy_battle() -> BattleState {
        let mut battle = BattleState::new("Pip", "Tide Warden", Element::Water);
        battle.fx.push(spawn_fx(FxKind::Flamethrower, 77));
        battle.fx.push(spawn_fx(FxKind::WaterGun, 78));
        battle.fx.push(spawn_fx(FxKind::QuickAttack, 79));
        battle.fx.push(spawn_fx(FxKind::Tackle, 80));
        for fx in &mut battle.fx {
            for _ in 0..5 {
                fx.advance();
            }
        }
        battle
            .floats
            .push(crate::fx::FloatingNumber::new("12", enemy_center()));
        battle.banner = Some(BannerKind::NotVeryEffective);
        battle
    }

    #[test]
    fn battle_canvas_render_is_idempotent() {
        let battle = busy_battle();
        let area = Rect::new(0, 0, 80, 20);
        let mut first = Buffer::empty(area);
        let mut second = Buffer::empty(area);

        draw_battle_canvas(&mut first, area, &battle);
        draw_battle_canvas(&mut second, area, &battle);
        assert_eq!(first, second);

        // Rendering twice into the same buffer changes nothing either.
        draw_battle_canvas(&mut first, area, &battle);
        assert_eq!(first, second);
    }

    #[test]
    fn canvas_handles_degenerate_areas() {
        let battle = busy_battle();
        let area = Rect::new(0, 0, 0, 0);
        let mut buf = Buffer::empty(Rect::new(0, 0, 1, 1));
        draw_battle_canvas(&mut buf, area, &battle);
    }

    #[test]
    fn negative_hp_renders_as_an_empty_bar() {
        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(area);
        draw_hp_readout(&mut buf, area, Vec2::new(60.0, 320.0), "Pip", -5, 100);

        let mut found = false;
        for y in 0..area.height {
            let mut line = String::new();
            for x in 0..area.width {
                line.push_str(buf[(x, y)].symbol());
            }
            if line.contains("0/100") {
                found = true;
            }
            assert!(!line.contains("-5"));
        }
        assert!(found);
    }

    #[test]
    fn shift_rect_clamps_at_the_origin() {
        let rect = Rect::new(1, 1, 10, 10);
        assert_eq!(shift_rect(rect, -5, -5), Rect::new(0, 0, 10, 10));
        assert_eq!(shift_rect(rect, 3, 2), Rect::new(4, 3, 10, 10));
    }
}
