//! Card geometry and drawing
//!
//! Cards are centred in the deck area. Deeper cards are shrunk by their
//! layer scale and pushed down one row per level so their lower edges peek
//! out beneath the top card.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use super::utils::{tilt_glyph, truncate_str};
use crate::domain::{Direction, Layer};

/// Pixels per terminal column, for mapping mouse cells onto the deck's pixel space
pub const CELL_WIDTH_PX: f32 = 8.0;
/// Pixels per terminal row
pub const CELL_HEIGHT_PX: f32 = 16.0;

const MAX_CARD_WIDTH: u16 = 44;
const MAX_CARD_HEIGHT: u16 = 12;

/// Screen rectangle of a card at `depth`, shifted by the drag offset
pub fn card_rect(area: Rect, depth: usize, scale: f32, offset_x_px: f32) -> Rect {
    let depth = depth as u16;
    let base_width = MAX_CARD_WIDTH.min(area.width.saturating_sub(4));
    let base_height = MAX_CARD_HEIGHT.min(area.height.saturating_sub(depth + 2));

    let width = ((base_width as f32 * scale).round() as u16).clamp(1, area.width.max(1));
    let height = ((base_height as f32 * scale).round() as u16).max(1);

    let centred = area.x as i32 + (area.width.saturating_sub(width) / 2) as i32;
    let shift = (offset_x_px / CELL_WIDTH_PX).round() as i32;
    let max_x = (area.x + area.width.saturating_sub(width)) as i32;
    let x = (centred + shift).clamp(area.x as i32, max_x.max(area.x as i32)) as u16;

    let y = area.y + 1 + depth + (base_height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height.min(area.bottom().saturating_sub(y)))
}

/// Pixel coordinates of a terminal cell
pub fn cell_to_px(column: u16, row: u16) -> (f32, f32) {
    (column as f32 * CELL_WIDTH_PX, row as f32 * CELL_HEIGHT_PX)
}

/// Draws one layer; `labels` are the (negative, affirmative) verdict names
pub fn draw(frame: &mut Frame, area: Rect, layer: &Layer<'_>, labels: (&str, &str)) {
    let rect = card_rect(area, layer.depth, layer.scale, layer.feedback.offset.x);
    if rect.width < 4 || rect.height < 3 {
        return;
    }

    let hint = layer.feedback.hint;
    let border_color = match hint {
        Some(Direction::Right) => Color::Green,
        Some(Direction::Left) => Color::Red,
        None if layer.is_top() => Color::Cyan,
        None => Color::DarkGray,
    };

    let mut style = Style::default();
    if layer.opacity * layer.feedback.opacity < 0.8 {
        style = style.add_modifier(Modifier::DIM);
    }

    let inner_width = rect.width.saturating_sub(4) as usize;
    let mut lines = vec![Line::from(Span::styled(
        truncate_str(layer.item.display_title(), inner_width),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    if let Some(subtitle) = layer.item.payload.subtitle() {
        lines.push(Line::from(truncate_str(subtitle, inner_width)));
    }

    if layer.is_top() {
        lines.push(Line::from(""));
        let rotation = layer.feedback.rotation_degrees;
        lines.push(Line::from(Span::styled(
            format!("{} {:+.1}°", tilt_glyph(rotation), rotation),
            Style::default().fg(Color::DarkGray),
        )));

        if let Some(direction) = hint {
            let (label, color) = match direction {
                Direction::Right => (labels.1, Color::Green),
                Direction::Left => (labels.0, Color::Red),
            };
            lines.push(Line::from(Span::styled(
                format!("[ {} ]", label.to_uppercase()),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )));
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color))
        .title(format!(" {} ", truncate_str(layer.item.id.as_str(), inner_width)));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(style)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(Clear, rect);
    frame.render_widget(paragraph, rect);
}
