//! Layout and drawing: playfield, sidebar with next preview and tally, overlays.

use crate::board::Board;
use crate::piece::{Orientation, Piece, PieceKind};
use crate::session::Session;
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

/// Each grid cell is two terminal columns wide so blocks look square.
const CELL_WIDTH: u16 = 2;
const CELL_HEIGHT: u16 = 1;

const SIDEBAR_WIDTH: u16 = 22;

/// Playfield size in terminal cells (border + grid) for the given board.
fn playfield_pixel_size(board: &Board) -> (u16, u16) {
    let gw = board.width as u16 * CELL_WIDTH;
    let gh = board.height as u16 * CELL_HEIGHT;
    (gw + 2, gh + 2)
}

/// Screen position of a grid cell inside the board rect. Grid rows grow
/// upward while terminal rows grow downward, so the row axis flips.
fn cell_to_screen(board_rect: Rect, board_height: i32, col: i32, row: i32) -> (u16, u16) {
    let x = board_rect.x + col as u16 * CELL_WIDTH;
    let y = board_rect.y + (board_height - 1 - row) as u16 * CELL_HEIGHT;
    (x, y)
}

/// Draw one frame: centered playfield plus sidebar, then any overlay.
pub fn draw(frame: &mut Frame, session: &Session, theme: &Theme, area: Rect) {
    let (pw, ph) = playfield_pixel_size(&session.board);
    let total_w = pw + SIDEBAR_WIDTH;

    let horiz_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_w),
            Constraint::Fill(1),
        ])
        .split(area);

    let vert_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(ph),
            Constraint::Fill(1),
        ])
        .split(horiz_chunks[1]);

    let active_area = vert_chunks[1];

    let (playfield_area, sidebar_area) = {
        let inner = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(pw), Constraint::Length(SIDEBAR_WIDTH)])
            .split(active_area);
        (inner[0], inner[1])
    };

    draw_playfield(frame, session, theme, playfield_area);
    draw_sidebar(frame, session, theme, sidebar_area);

    if session.lost {
        draw_overlay(frame, theme, area, " GAME OVER ", " Q — Quit ");
    } else if session.paused {
        draw_overlay(frame, theme, area, " PAUSED ", " P — Resume    Q — Quit ");
    }
}

fn draw_playfield(frame: &mut Frame, session: &Session, theme: &Theme, area: Rect) {
    let board = &session.board;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(
            " Rowfall ",
            Style::default().fg(theme.title),
        ));
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());

    let board_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: (board.width as u16 * CELL_WIDTH).min(inner.width),
        height: (board.height as u16 * CELL_HEIGHT).min(inner.height),
    };

    // Fill the grid background.
    let buf = frame.buffer_mut();
    for y in board_rect.y..board_rect.y + board_rect.height {
        for x in board_rect.x..board_rect.x + board_rect.width {
            buf[(x, y)].set_style(Style::default().bg(theme.bg));
        }
    }

    for piece in board.settled() {
        draw_piece(frame, theme, board_rect, board.height, piece);
    }
    draw_piece(frame, theme, board_rect, board.height, board.falling());
}

/// Draw a piece's cells into the board rect, skipping cells outside the
/// visible grid (the start zone and the off-board preview anchor). The rect
/// may be clamped to a terminal smaller than the playfield, so every cell is
/// also checked against the rect before writing.
fn draw_piece(frame: &mut Frame, theme: &Theme, board_rect: Rect, board_height: i32, piece: &Piece) {
    let color = theme.block_color(piece.kind.color_index());
    let style = Style::default().fg(color).bg(color);
    let buf = frame.buffer_mut();
    for &(col, row) in piece.cells() {
        if col < 0 || row < 0 || row >= board_height {
            continue;
        }
        let (x, y) = cell_to_screen(board_rect, board_height, col, row);
        if x + CELL_WIDTH > board_rect.x + board_rect.width
            || y + CELL_HEIGHT > board_rect.y + board_rect.height
        {
            continue;
        }
        buf.set_string(x, y, "██", style);
    }
}

fn draw_sidebar(frame: &mut Frame, session: &Session, theme: &Theme, area: Rect) {
    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.main_fg);
    let border_style = Style::default().fg(theme.div_line).bg(theme.bg);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // next preview
            Constraint::Length(1), // gap
            Constraint::Length(3), // tally
            Constraint::Length(1), // gap
            Constraint::Length(8), // controls
        ])
        .split(area);

    let next_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(" Next ", title_style));
    let next_inner = next_block.inner(chunks[0]);
    next_block.render(chunks[0], frame.buffer_mut());
    draw_next_preview(frame, theme, next_inner, session.board.next().kind);

    let tally_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);
    let tally_inner = tally_block.inner(chunks[2]);
    tally_block.render(chunks[2], frame.buffer_mut());
    let tally = Line::from(vec![
        Span::styled("Rows: ", title_style),
        Span::styled(session.rows_cleared.to_string(), fg_style),
    ]);
    Paragraph::new(tally).render(tally_inner, frame.buffer_mut());

    let controls = vec![
        Line::from(Span::styled("←/h  →/l  Move", fg_style)),
        Line::from(Span::styled("↑/k       Rotate", fg_style)),
        Line::from(Span::styled("↓/j       Drop", fg_style)),
        Line::from(Span::styled("P/Space   Pause", fg_style)),
        Line::from(Span::styled("Q/Esc     Quit", fg_style)),
    ];
    Paragraph::new(controls).render(chunks[4], frame.buffer_mut());
}

/// Draw the next kind as a small centered block preview in spawn orientation.
fn draw_next_preview(frame: &mut Frame, theme: &Theme, area: Rect, kind: PieceKind) {
    let offsets = kind.offsets(Orientation::Right);
    let (dx_lo, dy_lo) = offsets
        .iter()
        .fold((i8::MAX, i8::MAX), |(ax, ay): (i8, i8), &(dx, dy)| {
            (ax.min(dx), ay.min(dy))
        });
    let (dx_hi, dy_hi) = offsets
        .iter()
        .fold((i8::MIN, i8::MIN), |(ax, ay): (i8, i8), &(dx, dy)| {
            (ax.max(dx), ay.max(dy))
        });

    let bw = (dx_hi - dx_lo + 1) as u16;
    let bh = (dy_hi - dy_lo + 1) as u16;
    let off_x = area.width.saturating_sub(bw * CELL_WIDTH) / 2;
    let off_y = area.height.saturating_sub(bh * CELL_HEIGHT) / 2;

    let color = theme.block_color(kind.color_index());
    let style = Style::default().fg(color).bg(color);
    let buf = frame.buffer_mut();
    for &(dx, dy) in offsets {
        let px = (dx - dx_lo) as u16;
        // row offsets grow upward; terminal rows grow downward
        let py = (dy_hi - dy) as u16;
        let x = area.x + off_x + px * CELL_WIDTH;
        let y = area.y + off_y + py * CELL_HEIGHT;
        if x + CELL_WIDTH <= area.x + area.width && y < area.y + area.height {
            buf.set_string(x, y, "██", style);
        }
    }
}

fn draw_overlay(frame: &mut Frame, theme: &Theme, area: Rect, title: &str, hint: &str) {
    let popup_w = (hint.len() as u16 + 4).max(28);
    let popup_h = 5u16;
    let popup = Rect {
        x: area.x + area.width.saturating_sub(popup_w) / 2,
        y: area.y + area.height.saturating_sub(popup_h) / 2,
        width: popup_w.min(area.width),
        height: popup_h.min(area.height),
    };

    // Clear whatever the playfield left behind the popup.
    let buf = frame.buffer_mut();
    for y in popup.y..popup.y + popup.height {
        for x in popup.x..popup.x + popup.width {
            buf[(x, y)].set_symbol(" ").set_style(Style::default().bg(theme.bg));
        }
    }

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            title.to_string(),
            Style::default()
                .fg(theme.bg)
                .bg(theme.title)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            hint.to_string(),
            Style::default().fg(theme.main_fg),
        )),
    ];
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
    );
    p.render(popup, frame.buffer_mut());
}
