use std::f32::consts::TAU;

use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::assets::{AssetKey, Assets, SpriteArt};
use crate::config::Field;
use crate::entities::{Bounds, Player, PlayerSlot, ShipId, Sprite};
use crate::session::{Screen, ShipPicker};
use crate::world::{PlayerCount, World};

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f32 = 2.0;
/// Points sampled around each explosion ring
const RING_SAMPLES: usize = 64;
const HEART_WIDTH: u16 = 2;
const SHIP_TILE_WIDTH: u16 = 12;
const SHIP_TILE_HEIGHT: u16 = 6;

/// View struct that holds all state needed for rendering
pub struct RenderView<'a> {
    pub screen: &'a Screen,
    pub fps: u32,
}

/// A sprite's footprint in terminal cells; may hang off the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellBox {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
}

/// Maps world pixels onto a rectangle of terminal cells
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub area: Rect,
    pub field: Field,
}

impl Viewport {
    /// The largest centred part of `area` with the field's proportions
    pub fn fit(area: Rect, field: Field) -> Self {
        let ratio = field.width as f32 / field.height.max(1) as f32 * CELL_ASPECT;
        let mut width = area.width;
        let mut height = area.height;
        if f32::from(width) > f32::from(height) * ratio {
            width = (f32::from(height) * ratio).round() as u16;
        } else {
            height = (f32::from(width) / ratio).round() as u16;
        }
        let width = width.clamp(1, area.width.max(1)).min(area.width);
        let height = height.clamp(1, area.height.max(1)).min(area.height);
        Self {
            area: Rect {
                x: area.x + (area.width - width) / 2,
                y: area.y + (area.height - height) / 2,
                width,
                height,
            },
            field,
        }
    }

    fn scale(&self) -> (f32, f32) {
        (
            f32::from(self.area.width) / self.field.width.max(1) as f32,
            f32::from(self.area.height) / self.field.height.max(1) as f32,
        )
    }

    pub fn project(&self, bounds: Bounds) -> CellBox {
        let (sx, sy) = self.scale();
        CellBox {
            x: i32::from(self.area.x) + (bounds.x as f32 * sx).floor() as i32,
            y: i32::from(self.area.y) + (bounds.y as f32 * sy).floor() as i32,
            width: ((bounds.width as f32 * sx).round() as u16).max(1),
            height: ((bounds.height as f32 * sy).round() as u16).max(1),
        }
    }

    /// The cell containing a world point, if it is on screen
    pub fn point(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        let (sx, sy) = self.scale();
        let col = i32::from(self.area.x) + (x * sx).floor() as i32;
        let row = i32::from(self.area.y) + (y * sy).floor() as i32;
        contains(self.area, col, row).then_some((col as u16, row as u16))
    }
}

fn contains(area: Rect, x: i32, y: i32) -> bool {
    x >= i32::from(area.x)
        && y >= i32::from(area.y)
        && x < i32::from(area.x) + i32::from(area.width)
        && y < i32::from(area.y) + i32::from(area.height)
}

fn rgb((r, g, b): (u8, u8, u8), dim: bool) -> Color {
    if dim {
        Color::Rgb(r / 2, g / 2, b / 2)
    } else {
        Color::Rgb(r, g, b)
    }
}

/// Copy rasterized art into the buffer, skipping transparent and clipped cells
fn draw_art(buf: &mut Buffer, clip: Rect, target: CellBox, art: &SpriteArt, dim: bool) {
    for row in 0..art.height {
        for col in 0..art.width {
            let Some(cell) = art.cell(col, row) else {
                continue;
            };
            let x = target.x + i32::from(col);
            let y = target.y + i32::from(row);
            if !contains(clip, x, y) {
                continue;
            }
            if let Some(out) = buf.cell_mut((x as u16, y as u16)) {
                out.set_char(cell.symbol).set_fg(rgb(cell.fg, dim));
                if let Some(bg) = cell.bg {
                    out.set_bg(rgb(bg, dim));
                }
            }
        }
    }
}

/// Handles all rendering responsibilities for the game
pub struct GameRenderer {
    assets: Assets,
}

impl GameRenderer {
    pub fn new(assets: Assets) -> Self {
        Self { assets }
    }

    /// Main render method that dispatches to screen-specific renderers
    pub fn render(&mut self, frame: &mut Frame, view: &RenderView) {
        let area = frame.area();
        match view.screen {
            Screen::ChoosePlayerCount { selected, notice } => {
                self.render_player_count(frame, *selected, *notice)
            }
            Screen::ChooseShip { picker, .. } => self.render_ship_choice(frame, picker),
            Screen::Playing(world) => self.render_game(frame, world, view.fps),
            Screen::GameOver(world) => {
                let viewport = self.render_field(frame, area, world.field);
                self.render_stars(frame.buffer_mut(), &viewport, world);
                self.render_game_over(frame, world);
            }
        }
    }

    /// Letterboxed play field with the side borders drawn when there is room
    fn render_field(&self, frame: &mut Frame, area: Rect, field: Field) -> Viewport {
        let viewport = Viewport::fit(area, field);
        if viewport.area.x > area.x {
            let bordered = Rect {
                x: viewport.area.x - 1,
                width: viewport.area.width + 2,
                ..viewport.area
            }
            .intersection(area);
            let block = Block::default()
                .borders(Borders::LEFT | Borders::RIGHT)
                .border_style(Style::default().fg(Color::DarkGray));
            frame.render_widget(block, bordered);
        }
        viewport
    }

    fn render_game(&mut self, frame: &mut Frame, world: &World, fps: u32) {
        let area = frame.area();
        let viewport = self.render_field(frame, area, world.field);
        let clip = viewport.area;
        let buf = frame.buffer_mut();

        self.render_stars(buf, &viewport, world);

        for powerup in &world.powerups {
            let target = viewport.project(powerup.bounds());
            let art = self
                .assets
                .art(powerup.asset(), target.width, target.height, false);
            draw_art(buf, clip, target, art, false);
        }

        // Enemies use the player ship sprites turned to face down
        for enemy in &world.enemies {
            let target = viewport.project(enemy.bounds());
            let art = self
                .assets
                .art(enemy.asset(), target.width, target.height, true);
            draw_art(buf, clip, target, art, false);
        }

        for bullet in &world.bullets {
            let target = viewport.project(bullet.bounds());
            let art = self
                .assets
                .art(bullet.asset(), target.width, target.height, false);
            draw_art(buf, clip, target, art, false);
        }

        for player in world.living_players() {
            let target = viewport.project(player.bounds());
            let art = self
                .assets
                .art(player.asset(), target.width, target.height, false);
            draw_art(buf, clip, target, art, player.is_translucent());
        }

        for explosion in &world.explosions {
            for ripple in explosion.ripples() {
                for step in 0..RING_SAMPLES {
                    let angle = step as f32 / RING_SAMPLES as f32 * TAU;
                    let x = explosion.center_x as f32 + ripple.radius * angle.cos();
                    let y = explosion.center_y as f32 + ripple.radius * angle.sin();
                    if let Some(pos) = viewport.point(x, y) {
                        if let Some(cell) = buf.cell_mut(pos) {
                            cell.set_char('*').set_fg(rgb(ripple.color, false));
                        }
                    }
                }
            }
        }

        self.render_hud(frame, &viewport, world, fps);
    }

    fn render_stars(&self, buf: &mut Buffer, viewport: &Viewport, world: &World) {
        for star in &world.stars {
            if let Some(pos) = viewport.point(star.x, star.y) {
                if let Some(cell) = buf.cell_mut(pos) {
                    let symbol = if star.size > 1 { '•' } else { '·' };
                    cell.set_char(symbol).set_fg(rgb(star.color, false));
                }
            }
        }
    }

    fn render_hud(&mut self, frame: &mut Frame, viewport: &Viewport, world: &World, fps: u32) {
        let area = viewport.area;
        let top = Rect { height: 1, ..area };

        let score = Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}", world.score),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        frame.render_widget(Paragraph::new(score).centered(), top);

        // Player 1 on the right, player 2 on the left
        for player in &world.players {
            let hearts_width = u16::from(player.max_health) * (HEART_WIDTH + 1);
            let x = match player.slot {
                PlayerSlot::One => area.right().saturating_sub(hearts_width),
                PlayerSlot::Two => area.x + 1,
            };
            self.render_hearts(frame.buffer_mut(), area, player, x, area.y);
        }

        let bottom = Rect {
            y: area.bottom().saturating_sub(1),
            height: 1,
            ..area
        };
        let controls = match world.mode {
            PlayerCount::One => "[Arrows: Move] [Space: Fire] [Q: Quit]",
            PlayerCount::Two => "[P1 Arrows + Space] [P2 WASD + Shift] [Q: Quit]",
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                controls,
                Style::default().fg(Color::DarkGray),
            )))
            .centered(),
            bottom,
        );
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(" FPS: ", Style::default().fg(Color::DarkGray)),
                Span::styled(format!("{fps}"), Style::default().fg(Color::White)),
            ])),
            bottom,
        );
    }

    fn render_hearts(&mut self, buf: &mut Buffer, clip: Rect, player: &Player, x: u16, y: u16) {
        for i in 0..player.max_health {
            let key = if i < player.health {
                AssetKey::HealthFull
            } else {
                AssetKey::HealthEmpty
            };
            let target = CellBox {
                x: i32::from(x) + i32::from(i) * i32::from(HEART_WIDTH + 1),
                y: i32::from(y),
                width: HEART_WIDTH,
                height: 1,
            };
            let art = self.assets.art(key, HEART_WIDTH, 1, false);
            draw_art(buf, clip, target, art, false);
        }
    }

    fn render_player_count(
        &self,
        frame: &mut Frame,
        selected: PlayerCount,
        notice: Option<&'static str>,
    ) {
        let option = |count: PlayerCount, label: &'static str| {
            if count == selected {
                Line::from(format!("> {label} <")).centered().yellow().bold()
            } else {
                Line::from(label).centered().white()
            }
        };
        let mut text = vec![
            Line::from(""),
            Line::from("╔═══════════════════════════╗").centered().cyan(),
            Line::from("║       SPACE RAIDERS       ║")
                .centered()
                .cyan()
                .bold(),
            Line::from("╚═══════════════════════════╝").centered().cyan(),
            Line::from(""),
            option(PlayerCount::One, "1 PLAYER"),
            option(PlayerCount::Two, "2 PLAYERS"),
            Line::from(""),
            Line::from("←/→ or A/D to choose, ENTER or SPACE to continue")
                .centered()
                .dark_gray(),
            Line::from("Press Q to quit").centered().dark_gray(),
        ];
        if let Some(notice) = notice {
            text.push(Line::from(""));
            text.push(Line::from(notice).centered().red());
        }
        frame.render_widget(
            Paragraph::new(text)
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Center),
            frame.area(),
        );
    }

    fn render_ship_choice(&mut self, frame: &mut Frame, picker: &ShipPicker) {
        let area = frame.area();
        let text = vec![
            Line::from(""),
            Line::from(format!("PLAYER {}: CHOOSE YOUR SHIP", picker.slot.number()))
                .centered()
                .yellow()
                .bold(),
            Line::from(picker.slot.scheme().hint()).centered().dark_gray(),
        ];
        frame.render_widget(
            Paragraph::new(text)
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Center),
            area,
        );

        // Ships taken by the other player stay in place, faded
        let count = picker.ships().count() as u16;
        let row_width = count * (SHIP_TILE_WIDTH + 1);
        let start_x = area.x + area.width.saturating_sub(row_width) / 2;
        let y = area.y + area.height.saturating_sub(SHIP_TILE_HEIGHT) / 2;
        let current = picker.current();
        for (idx, (ship, available)) in picker.ships().enumerate() {
            let tile = Rect {
                x: start_x + idx as u16 * (SHIP_TILE_WIDTH + 1),
                y,
                width: SHIP_TILE_WIDTH,
                height: SHIP_TILE_HEIGHT,
            }
            .intersection(area);
            self.render_ship_tile(frame, tile, ship, ship == current, !available);
        }
    }

    fn render_ship_tile(
        &mut self,
        frame: &mut Frame,
        tile: Rect,
        ship: ShipId,
        selected: bool,
        taken: bool,
    ) {
        let border = if selected { Color::Yellow } else { Color::DarkGray };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(format!(" {} ", ship.number()));
        let inner = block.inner(tile);
        frame.render_widget(block, tile);

        let target = CellBox {
            x: i32::from(inner.x),
            y: i32::from(inner.y),
            width: inner.width,
            height: inner.height,
        };
        let art = self
            .assets
            .art(AssetKey::Ship(ship), inner.width, inner.height, false);
        draw_art(frame.buffer_mut(), inner, target, art, taken);
    }

    fn render_game_over(&self, frame: &mut Frame, world: &World) {
        let area = frame.area();
        let text = vec![
            Line::from(""),
            Line::from("╔═══════════════════════════╗").centered().red(),
            Line::from("║        GAME OVER!         ║")
                .centered()
                .red()
                .bold(),
            Line::from("╚═══════════════════════════╝").centered().red(),
            Line::from(""),
            Line::from(format!("Final Score: {}", world.score))
                .centered()
                .yellow()
                .bold(),
            Line::from(""),
            Line::from("Press ENTER or SPACE to play again")
                .centered()
                .white(),
            Line::from("Press Q to quit").centered().white(),
        ];

        let width = 44.min(area.width);
        let height = 11.min(area.height);
        let popup = Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        };
        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(text)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Red)),
                )
                .alignment(Alignment::Center),
            popup,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::controls::{Action, Binding, ControlScheme, InputEvent};
    use crate::session::Session;
    use ratatui::{Terminal, backend::TestBackend};

    fn draw(session: &Session, width: u16, height: u16) -> String {
        let mut renderer = GameRenderer::new(Assets::generated(5));
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| {
                let view = RenderView {
                    screen: session.screen(),
                    fps: 60,
                };
                renderer.render(frame, &view);
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn enter(session: &mut Session) {
        session.handle_event(InputEvent::Pressed(Binding::new(
            ControlScheme::Arrows,
            Action::Confirm,
        )));
    }

    fn session() -> Session {
        Session::new(
            GameConfig {
                seed: Some(3),
                ..GameConfig::default()
            },
            true,
        )
    }

    #[test]
    fn test_fit_keeps_field_proportions() {
        let field = Field::new(1366, 768);
        let viewport = Viewport::fit(Rect::new(0, 0, 200, 40), field);
        // 40 rows allow 40 * 1366 / 768 * 2 = 142 columns
        assert_eq!(viewport.area.height, 40);
        assert_eq!(viewport.area.width, 142);
        assert_eq!(viewport.area.x, 29);

        let tall = Viewport::fit(Rect::new(0, 0, 80, 60), field);
        assert_eq!(tall.area.width, 80);
        assert!(tall.area.height < 60);
    }

    #[test]
    fn test_fit_zero_area() {
        let viewport = Viewport::fit(Rect::new(0, 0, 0, 0), Field::default());
        assert_eq!(viewport.area.width, 0);
        assert_eq!(viewport.point(10.0, 10.0), None);
    }

    #[test]
    fn test_project_scales_and_keeps_offscreen_positions() {
        let viewport = Viewport {
            area: Rect::new(10, 5, 100, 50),
            field: Field::new(1000, 500),
        };
        let cells = viewport.project(Bounds::new(500, 250, 64, 64));
        assert_eq!(
            cells,
            CellBox {
                x: 60,
                y: 30,
                width: 6,
                height: 6
            }
        );
        let above = viewport.project(Bounds::new(0, -30, 64, 64));
        assert_eq!(above.y, 2);
        // tiny sprites still get one cell
        assert_eq!(viewport.project(Bounds::new(0, 0, 1, 1)).width, 1);
    }

    #[test]
    fn test_menu_screens_render() {
        let mut session = session();
        let screen = draw(&session, 80, 24);
        assert!(screen.contains("SPACE RAIDERS"));
        assert!(screen.contains("> 1 PLAYER <"));

        enter(&mut session);
        let screen = draw(&session, 80, 24);
        assert!(screen.contains("PLAYER 1: CHOOSE YOUR SHIP"));
    }

    #[test]
    fn test_player_count_notice_renders() {
        let mut session = Session::new(GameConfig::default(), false);
        session.handle_event(InputEvent::Pressed(Binding::new(
            ControlScheme::Arrows,
            Action::Right,
        )));
        let screen = draw(&session, 100, 24);
        assert!(screen.contains("2 PLAYERS needs a terminal"));
        assert!(screen.contains("> 1 PLAYER <"));
    }

    #[test]
    fn test_second_ship_choice_shows_taken_ship_faded() {
        let mut session = session();
        session.handle_event(InputEvent::Pressed(Binding::new(
            ControlScheme::Arrows,
            Action::Right,
        )));
        enter(&mut session);
        enter(&mut session);
        let Screen::ChooseShip { picker, .. } = session.screen() else {
            panic!("expected player 2 ship choice");
        };
        assert_eq!(picker.options.len(), 4);

        let mut renderer = GameRenderer::new(Assets::generated(5));
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal
            .draw(|frame| {
                let view = RenderView {
                    screen: session.screen(),
                    fps: 0,
                };
                renderer.render(frame, &view);
            })
            .unwrap();
        let buffer = terminal.backend().buffer();
        let screen: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        for number in 1..=5 {
            assert!(screen.contains(&format!("┌ {number} ")), "tile {number} missing");
        }

        // 5 tiles of 13 columns centred in 80: ship 1 is the first tile
        let y = (24 - SHIP_TILE_HEIGHT) / 2 + SHIP_TILE_HEIGHT / 2;
        let first = (80 - 5 * (SHIP_TILE_WIDTH + 1)) / 2 + SHIP_TILE_WIDTH / 2;
        let second = first + SHIP_TILE_WIDTH + 1;
        let brightness = |x: u16| match buffer[(x, y)].fg {
            Color::Rgb(r, g, b) => u16::from(r) + u16::from(g) + u16::from(b),
            other => panic!("expected ship art, found {other:?}"),
        };
        assert!(brightness(first) < brightness(second));
    }

    #[test]
    fn test_playing_and_game_over_render() {
        let mut session = session();
        enter(&mut session);
        enter(&mut session);
        let screen = draw(&session, 120, 40);
        assert!(screen.contains("Score: 0"));
        assert!(screen.contains("FPS: 60"));

        // A tiny terminal must not panic
        draw(&session, 10, 3);
    }
}
