//! Terminal UI rendering with ratatui

use crate::settings::Settings;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};
use tetris_core::{Cell, Game, TetrominoType};

const EMPTY: &str = "  ";

/// Width of the side panel with the preview and stats
const PANEL_WIDTH: u16 = 16;
/// Height of the next piece box
const NEXT_HEIGHT: u16 = 6;

/// What the frontend is showing on top of the field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Paused,
    GameOver,
}

fn to_color(color: tetris_core::Color) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

/// Render the whole game screen
pub fn render_game(frame: &mut Frame, game: &Game, settings: &Settings, overlay: Overlay) {
    let area = frame.area();
    let field = game.field();

    // Each cell is two characters wide, plus borders
    let board_width = (field.width() as u16).saturating_mul(2).saturating_add(2);
    let board_height = (field.height() as u16).saturating_add(2);
    let game_area = center_rect(area, board_width + PANEL_WIDTH, board_height);

    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(board_width), Constraint::Length(PANEL_WIDTH)])
        .split(game_area);

    render_board(frame, main_layout[0], game, settings);

    let right_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(NEXT_HEIGHT), Constraint::Min(6)])
        .split(main_layout[1]);

    let (block_char, _) = settings.visual.block_chars();
    render_next(frame, right_layout[0], game.next_piece(), block_char);
    render_stats(frame, right_layout[1], game);

    match overlay {
        Overlay::Paused => render_overlay(frame, area, "PAUSED", "Press P to resume"),
        Overlay::GameOver => render_overlay(frame, area, "GAME OVER", "R restart, Q quit"),
        Overlay::None => {}
    }
}

/// Center a rectangle of the given size in an area
fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the next piece preview
fn render_next(frame: &mut Frame, area: Rect, kind: TetrominoType, block_char: &str) {
    let block = Block::default()
        .title(" NEXT ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height < 1 || inner.width < 4 {
        return;
    }

    // Crop the spawn pattern to its filled bounding box
    let pattern = kind.pattern(0);
    let cells: Vec<(usize, usize)> = pattern.filled().collect();
    let min_col = cells.iter().map(|&(col, _)| col).min().unwrap_or(0);
    let max_col = cells.iter().map(|&(col, _)| col).max().unwrap_or(0);
    let min_row = cells.iter().map(|&(_, row)| row).min().unwrap_or(0);
    let max_row = cells.iter().map(|&(_, row)| row).max().unwrap_or(0);

    let style = Style::default().fg(to_color(kind.color()));
    let lines: Vec<Line> = (min_row..=max_row)
        .map(|row| {
            let spans: Vec<Span> = (min_col..=max_col)
                .map(|col| {
                    if pattern.is_filled(col, row) {
                        Span::styled(block_char, style)
                    } else {
                        Span::raw(EMPTY)
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

/// Render the playing field with the falling piece and its ghost
fn render_board(frame: &mut Frame, area: Rect, game: &Game, settings: &Settings) {
    let (block_char, ghost_char) = settings.visual.block_chars();

    let block = Block::default()
        .title(" TETRIS ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let current = game.current_piece().map(|piece| (piece.cells(), piece.color()));
    let ghost = if settings.visual.show_ghost {
        game.ghost_piece().map(|piece| piece.cells())
    } else {
        None
    };

    let lines: Vec<Line> = game
        .field()
        .rows()
        .enumerate()
        .map(|(row, cells)| {
            let spans: Vec<Span> = cells
                .iter()
                .enumerate()
                .map(|(col, cell)| {
                    let pos = (col as i32, row as i32);
                    if let Some((piece_cells, color)) = &current {
                        if piece_cells.contains(&pos) {
                            return Span::styled(block_char, Style::default().fg(to_color(*color)));
                        }
                        if ghost.is_some_and(|ghost| ghost.contains(&pos)) {
                            return Span::styled(
                                ghost_char,
                                Style::default().fg(to_color(*color)).dim(),
                            );
                        }
                    }
                    match cell {
                        Cell::Filled(color) => {
                            Span::styled(block_char, Style::default().fg(to_color(*color)))
                        }
                        Cell::Empty => Span::raw(EMPTY),
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(lines);
    frame.render_widget(paragraph, inner);
}

/// Render score and line count
fn render_stats(frame: &mut Frame, area: Rect, game: &Game) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(Span::styled("SCORE", Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            game.score().to_string(),
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::raw(""),
        Line::from(Span::styled("LINES", Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            game.lines_cleared().to_string(),
            Style::default().fg(Color::Green),
        )),
        Line::raw(""),
        Line::from(Span::styled("PIECES", Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            game.pieces_locked().to_string(),
            Style::default().fg(Color::Cyan),
        )),
    ];

    let paragraph = Paragraph::new(lines);
    frame.render_widget(paragraph, inner);
}

/// Render an overlay (for pause/game over)
fn render_overlay(frame: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let popup_width = 24u16;
    let popup_height = 5u16;
    let popup_area = center_rect(area, popup_width, popup_height);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = vec![
        Line::styled(title, Style::default().fg(Color::Yellow).bold()),
        Line::raw(""),
        Line::styled(subtitle, Style::default().fg(Color::Gray)),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}
