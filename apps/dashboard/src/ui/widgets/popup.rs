use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

/// Rectangle covering `percent_x` by `percent_y` of `area`, centred in it.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let scale = |length: u16, percent: u16| {
        let scaled = u32::from(length) * u32::from(percent.min(100)) / 100;
        u16::try_from(scaled).unwrap_or(length)
    };
    let width = scale(area.width, percent_x);
    let height = scale(area.height, percent_y);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Clears a centred region and draws a bordered popup with a close hint on
/// its last row.
pub fn render_popup(f: &mut Frame<'_>, area: Rect, title: &str, lines: Vec<TextLine<'static>>) {
    let popup_area = centered_rect(80, 80, area);
    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(format!("== {title} =="))
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, popup_area);

    let hint = Paragraph::new(TextLine::from(Span::styled(
        "Press ? or Esc to close",
        Style::default().fg(Color::Gray),
    )))
    .alignment(Alignment::Center);

    let hint_area = Rect {
        x: popup_area.x,
        y: popup_area.y + popup_area.height.saturating_sub(2),
        width: popup_area.width,
        height: 1,
    };
    f.render_widget(hint, hint_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centred_rect_keeps_offset_of_parent() {
        let area = Rect::new(10, 4, 100, 40);
        assert_eq!(centered_rect(80, 50, area), Rect::new(20, 14, 80, 20));
    }

    #[test]
    fn oversized_percentages_fill_parent() {
        let area = Rect::new(0, 0, 30, 12);
        assert_eq!(centered_rect(150, 100, area), area);
    }
}
