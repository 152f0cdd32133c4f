//! The game renderer functions.

use crate::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    prelude::Frame,
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Row, Table, Widget},
};
use std::cmp;
use sweeper::field::cell::CellContent;
use sweeper::GameStatus;

/// The number of terminal rows that a single cell occupies.
pub const CELL_HEIGHT: u16 = 1;
/// The number of terminal columns that a single cell occupies. The emoji glyphs are two columns wide.
pub const CELL_WIDTH: u16 = 3;

const WRONG_FLAG_SYMBOL: &str = "❌";
const FLAG_SYMBOL: &str = "🚩";
const MINE_SYMBOL: &str = "💣";
const CLOSED_CELL_COLOR: Color = Color::Gray;
const OPEN_CELL_COLOR: Color = Color::White;
const SELECTED_CELL_COLOR: Color = Color::Yellow;
const APP_BG_COLOR: Color = Color::White;
const FIELD_BORDER_COLOR: Color = Color::Yellow;
const OUTCOME_POPUP_VICTORY_BORDER_COLOR: Color = Color::Green;
const OUTCOME_POPUP_LOSS_BORDER_COLOR: Color = Color::Red;
const INFO_WIDGET_BLOCK_COLOR: Color = Color::LightYellow;
const REGULAR_TEXT_COLOR: Color = Color::Black;
const LEGEND_TEXT_COLOR: Color = Color::DarkGray;

const LEGEND_TEXT: [&str; 5] = [
    "[↑][←][↓][→] / [w][a][s][d] / [i][j][k][l]: move the cursor",
    "[SPACE] / [ENTER] / left click: open the selected cell",
    "[f] / right click: toggle flag for the selected cell",
    "[r]: start a new game",
    "[q] / [ESC]: quit",
];
const OUTCOME_POPUP_TEXT: [&str; 4] = [
    "",
    "Use:",
    "[SPACE] / [ENTER] to start a new game",
    "[q] / [ESC] to quit",
];

pub fn render_game(app: &mut App, frame: &mut Frame) {
    let root_container = frame.size();

    // the app layout consists of the status line, the field, the stats and the legend containers
    let (status_container, field_container, (flags_info_container, mines_info_container), legend_container) =
        create_app_layout(&root_container);

    // 1. Render the terminal background
    frame.render_widget(Block::default().bg(APP_BG_COLOR), root_container);

    // 2. Render the status line
    frame.render_widget(build_status_widget(app.state.status()), status_container);

    // 3. Render the border around the field
    let field_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Thick)
        .border_style(Style::default().fg(FIELD_BORDER_COLOR));
    let field_inner = field_block.inner(field_container);
    frame.render_widget(field_block, field_container);

    // 4. Work out which part of the board fits into the field and keep the cursor in it
    let (total_rows_amount, total_columns_amount) = app.state.dimensions();
    let visible_rows_amount = calculate_visible_amount(field_inner.height, CELL_HEIGHT, total_rows_amount);
    let visible_columns_amount = calculate_visible_amount(field_inner.width, CELL_WIDTH, total_columns_amount);

    app.window_offset = (
        window_start(app.cursor_position.0, visible_rows_amount, total_rows_amount),
        window_start(app.cursor_position.1, visible_columns_amount, total_columns_amount),
    );

    let grid_container = centered_rect(
        &field_inner,
        visible_columns_amount as u16 * CELL_WIDTH,
        visible_rows_amount as u16 * CELL_HEIGHT,
    );
    app.grid_area = grid_container;

    // 5. Render the visible cells
    let game_lost = app.state.status() == GameStatus::Lose;
    let grid = build_grid_layout(&grid_container, visible_rows_amount, visible_columns_amount);

    grid.iter().enumerate().for_each(|(row_index, row)| {
        row.iter()
            .enumerate()
            .for_each(|(column_index, cell_container)| {
                // the real indices are those including the window offset
                let position = (
                    row_index as u8 + app.window_offset.0,
                    column_index as u8 + app.window_offset.1,
                );

                if let Some(cell) = app.state.cell(position) {
                    let wrong_flag =
                        game_lost && cell.is_flagged() && !app.state.mine_positions().contains(&position);
                    let grid_cell = build_cell_widget(cell, app.cursor_position == position, wrong_flag);
                    frame.render_widget(grid_cell, *cell_container);
                }
            });
    });

    // 6. Render the stats
    frame.render_widget(build_flags_info_widget(app.state.flag_count()), flags_info_container);
    frame.render_widget(build_mines_info_widget(app.state.mine_count()), mines_info_container);

    // 7. Render the legend
    frame.render_widget(build_legend_widget(), legend_container);

    // 8. Render the outcome (victory/loss) popup in case the game has ended
    let status = app.state.status();
    if status.is_finished() {
        let lines = outcome_popup_lines(status);

        let border_color = if status == GameStatus::Win {
            OUTCOME_POPUP_VICTORY_BORDER_COLOR
        } else {
            OUTCOME_POPUP_LOSS_BORDER_COLOR
        };

        render_popup(frame, lines, border_color);
    }
}

/// The method creates the base grid needed for the application: the status line, the field, some statistics for the
/// ongoing game and the controls-legend.
fn create_app_layout(container: &Rect) -> (Rect, Rect, (Rect, Rect), Rect) {
    // the status and stats containers' heights are 3 rows: 2 for borders and one for the contents
    let status_container_height = 3;
    let stats_container_height = 3;
    let legend_container_height = LEGEND_TEXT.len() as u16;
    // the field container's height is all that's left
    let field_container_height = container
        .height
        .saturating_sub(status_container_height + stats_container_height + legend_container_height);

    let app_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(Constraint::from_lengths([
            status_container_height,
            field_container_height,
            stats_container_height,
            legend_container_height,
        ]))
        .split(*container)
        .to_vec();

    let status_container = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(Constraint::from_percentages([10, 80, 10]))
        .split(app_layout[0])[1];

    let field_container = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(Constraint::from_percentages([10, 80, 10]))
        .split(app_layout[1])[1];

    // the stats row is split into 2 equal sections in its middle part (for the 2 stats-items)
    let stats_container = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(Constraint::from_percentages([30, 40, 30]))
        .split(app_layout[2])[1];

    let flags_and_mines_containers = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(Constraint::from_percentages([50, 50]))
        .split(stats_container)
        .to_vec();

    let legend_container = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(Constraint::from_percentages([5, 90, 5]))
        .split(app_layout[3])[1];

    (
        status_container,
        field_container,
        (flags_and_mines_containers[0], flags_and_mines_containers[1]),
        legend_container,
    )
}

/// The amount of rows (or columns) of the board that can be shown: all of them if they fit into the available space,
/// otherwise as many whole cells as fit.
fn calculate_visible_amount(available_space: u16, cell_size: u16, total_amount: u8) -> u8 {
    cmp::min(available_space / cell_size, total_amount as u16) as u8
}

/// The first row (or column) to show so that the cursor stays visible, roughly in the middle of the visible part.
fn window_start(cursor: u8, visible_amount: u8, total_amount: u8) -> u8 {
    if visible_amount >= total_amount {
        return 0;
    }

    cmp::min(cursor.saturating_sub(visible_amount / 2), total_amount - visible_amount)
}

/// A rectangle of the given size in the middle of the container.
fn centered_rect(container: &Rect, width: u16, height: u16) -> Rect {
    let width = cmp::min(width, container.width);
    let height = cmp::min(height, container.height);

    Rect::new(
        container.x + (container.width - width) / 2,
        container.y + (container.height - height) / 2,
        width,
        height,
    )
}

/// The grid layout is what's used to display the cells of the board.
///
/// The container is first divided into equal rows, and then each row is divided into equal cells.
fn build_grid_layout(container: &Rect, rows_amount: u8, columns_amount: u8) -> Vec<Vec<Rect>> {
    // divide the space vertically into rows
    let vertical_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints((0..rows_amount).map(|_| Constraint::Length(CELL_HEIGHT)))
        .split(*container);

    // divide each row horizontally into cells
    vertical_layout
        .iter()
        .map(|row| {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints((0..columns_amount).map(|_| Constraint::Length(CELL_WIDTH)))
                .split(*row)
                .to_vec()
        })
        .collect::<Vec<_>>()
}

/// Build a popup with the provided contents (lines of a text), set to it the provided border color and render it in the
/// center of the screen.
///
/// The width of the popup is the width of the text's longest line and its height is the number of the lines, both plus
/// the borders.
fn outcome_popup_lines(status: GameStatus) -> Vec<String> {
    [status.message()]
        .iter()
        .chain(OUTCOME_POPUP_TEXT.iter())
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
}

fn render_popup(frame: &mut Frame, lines: impl IntoIterator<Item = String>, border_color: Color) {
    let lines: Vec<String> = lines.into_iter().collect();

    let block = Block::default()
        .bg(APP_BG_COLOR)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color));

    let text = Paragraph::new(lines.join("\n"))
        .fg(REGULAR_TEXT_COLOR)
        .alignment(Alignment::Center)
        .block(block);

    let popup_height = lines.len() as u16 + 2;
    let popup_width = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0) as u16 + 2;
    let container = centered_rect(&frame.size(), popup_width, popup_height);

    // clear the region so that it doesn't contain any old graphics and render the widget in the prepared region
    frame.render_widget(Clear, container);
    frame.render_widget(text, container);
}

/// The digits are color-coded by value, the way the classic game does it.
fn number_color(mines_around_amount: u8) -> Color {
    match mines_around_amount {
        1 => Color::Blue,
        2 => Color::Green,
        3 => Color::Red,
        4 => Color::Magenta,
        5 => Color::LightRed,
        6 => Color::Cyan,
        7 => Color::Black,
        _ => Color::DarkGray,
    }
}

/// The function builds a widget (basically, a paragraph) that represents a single cell.
///
/// Closed cells and open cells with no mines around share the blank glyph, so the background tells them apart. A flag
/// that turned out to be wrong is crossed out once the game is lost.
fn build_cell_widget(cell: CellContent, selected: bool, wrong_flag: bool) -> impl Widget {
    let symbol = match cell {
        CellContent::Flag if wrong_flag => WRONG_FLAG_SYMBOL.to_string(),
        CellContent::Flag => FLAG_SYMBOL.to_string(),
        CellContent::Mine => MINE_SYMBOL.to_string(),
        other => other.to_string(),
    };

    let background = if selected {
        SELECTED_CELL_COLOR
    } else if cell.is_revealed() {
        OPEN_CELL_COLOR
    } else {
        CLOSED_CELL_COLOR
    };

    let foreground = cell
        .get_mines_around_amount()
        .map(number_color)
        .unwrap_or(REGULAR_TEXT_COLOR);

    Paragraph::new(symbol)
        .alignment(Alignment::Center)
        .fg(foreground)
        .bg(background)
}

/// Prepares a paragraph with the status message. The color follows the outcome once the game has ended.
fn build_status_widget(status: GameStatus) -> impl Widget {
    let color = match status {
        GameStatus::Win => OUTCOME_POPUP_VICTORY_BORDER_COLOR,
        GameStatus::Lose => OUTCOME_POPUP_LOSS_BORDER_COLOR,
        GameStatus::Unstarted | GameStatus::Ongoing => INFO_WIDGET_BLOCK_COLOR,
    };

    Paragraph::new(status.message())
        .fg(REGULAR_TEXT_COLOR)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(color)),
        )
}

/// Prepares a paragraph to render as an info-block showing the number of flags placed on the board.
fn build_flags_info_widget(flags_amount: usize) -> impl Widget {
    Paragraph::new(flags_amount.to_string())
        .fg(REGULAR_TEXT_COLOR)
        .alignment(Alignment::Center)
        .block(build_info_widget_block(FLAG_SYMBOL))
}

/// Prepares a paragraph to render as an info-block showing the total number of mines hidden in the board.
fn build_mines_info_widget(mines_amount: usize) -> impl Widget {
    Paragraph::new(mines_amount.to_string())
        .fg(REGULAR_TEXT_COLOR)
        .alignment(Alignment::Center)
        .block(build_info_widget_block(MINE_SYMBOL))
}

fn build_info_widget_block(title: &str) -> Block {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Thick)
        .border_style(Style::default().fg(INFO_WIDGET_BLOCK_COLOR))
}

/// The function builds the ready-to-use legend block (some text that provides information about the in-game controls).
fn build_legend_widget() -> impl Widget {
    let rows = LEGEND_TEXT.map(|legend_row| {
        let (keys, description) = legend_row.split_at(legend_row.find(':').unwrap_or(0));

        Row::new([
            Line::from(keys).alignment(Alignment::Right),
            Line::from(description).alignment(Alignment::Left),
        ])
    });

    Table::new(rows, Constraint::from_percentages([50, 50])).fg(LEGEND_TEXT_COLOR)
}
