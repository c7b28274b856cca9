use crate::app::App;
use crate::ui::widgets::charts::render_history_chart;
use crate::ui::widgets::popup::render_popup;
use crate::ui::widgets::radar::{reflectivity_color, render_mini_radar, render_storm_radar};
use amrt_dashboard::display::{DisplayBoard, DisplayField, UNSET};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

pub fn render_main(app: &App, f: &mut Frame<'_>) {
    let main_layout = build_main_layout(f);

    render_title_section(app, f, main_layout[0]);
    render_content_section(app, f, main_layout[1]);
    render_status_section(app, f, main_layout[2]);
    render_shortcuts(f, main_layout[3]);

    if app.show_help {
        let area = f.area();
        render_popup(f, area, "Help & Keyboard Shortcuts", build_help_lines());
    }
}

fn build_main_layout(f: &Frame<'_>) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Title area
            Constraint::Min(10),   // Scope and panels
            Constraint::Length(3), // Status area
            Constraint::Length(1), // Shortcuts hint
        ])
        .split(f.area().inner(Margin::new(2, 1)))
        .to_vec()
}

fn render_title_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let title_block = Block::default()
        .title("== AMRT Mobile Radar ==")
        .title_style(
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    f.render_widget(title_block, area);

    let title_inner = area.inner(Margin::new(1, 1));
    let title_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(75), Constraint::Percentage(25)])
        .split(title_inner);

    let lines = vec![
        TextLine::from(vec![
            Span::styled(
                "Storm Radar ",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                app.board.get(DisplayField::RadarVehicle).to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        alert_line(&app.board),
    ];

    let title_paragraph = Paragraph::new(Text::from(lines)).alignment(Alignment::Left);
    f.render_widget(title_paragraph, title_chunks[0]);

    render_mini_radar(f, title_chunks[1], app.sweep_phase());
}

fn alert_line(board: &DisplayBoard) -> TextLine<'static> {
    let alerts = board.get(DisplayField::Alerts);
    let style = if alerts == UNSET {
        Style::default().fg(Color::Gray)
    } else {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    };

    TextLine::from(vec![
        Span::styled("Alerts: ", Style::default().fg(Color::Gray)),
        Span::styled(alerts.to_string(), style),
    ])
}

fn render_content_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    if app.sim.is_none() {
        render_waiting_panel(app, f, area);
        return;
    }

    let horizontal_split = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    render_storm_radar(app, f, horizontal_split[0]);

    let right_split = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Min(6),
        ])
        .split(horizontal_split[1]);

    let top_row = split_pair(right_split[0]);
    render_field_panel(
        &app.board,
        f,
        top_row[0],
        " Storm ",
        &[
            DisplayField::RotationSpeed,
            DisplayField::StormDirection,
            DisplayField::StormSpeed,
            DisplayField::HookEcho,
            DisplayField::Mesocyclone,
            DisplayField::Degraded,
        ],
    );
    let velocity_title = app.config.as_ref().map_or_else(
        || " Velocity ".to_string(),
        |config| format!(" Velocity (true {:.1} kt) ", config.true_velocity),
    );
    render_field_panel(
        &app.board,
        f,
        top_row[1],
        &velocity_title,
        &[
            DisplayField::Inbound,
            DisplayField::InboundTimer,
            DisplayField::Outbound,
            DisplayField::OutboundTimer,
        ],
    );

    let middle_row = split_pair(right_split[1]);
    render_field_panel(
        &app.board,
        f,
        middle_row[0],
        " Couplet ",
        &[
            DisplayField::CoupletSize,
            DisplayField::CoupletSizeTimer,
            DisplayField::CoupletStatus,
            DisplayField::CoupletStatusTimer,
            DisplayField::EfRating,
        ],
    );
    render_field_panel(
        &app.board,
        f,
        middle_row[1],
        " Reflectivity ",
        &[
            DisplayField::Reflectivity,
            DisplayField::HighCore,
            DisplayField::HailCore,
            DisplayField::Precipitation,
            DisplayField::Confidence,
        ],
    );

    render_history_chart(app, f, right_split[2]);
}

fn split_pair(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area)
        .to_vec()
}

fn render_field_panel(
    board: &DisplayBoard,
    f: &mut Frame<'_>,
    area: Rect,
    title: &str,
    fields: &[DisplayField],
) {
    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let lines = fields
        .iter()
        .map(|field| field_line(board, *field))
        .collect::<Vec<_>>();

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn field_line(board: &DisplayBoard, field: DisplayField) -> TextLine<'static> {
    let value = board.get(field);
    let label_style = Style::default().fg(Color::Gray);

    let value_text = match field {
        DisplayField::InboundTimer
        | DisplayField::OutboundTimer
        | DisplayField::CoupletSizeTimer
        | DisplayField::CoupletStatusTimer
            if value != UNSET =>
        {
            format!("{value}s")
        }
        _ => value.to_string(),
    };

    TextLine::from(vec![
        Span::styled(format!("{}: ", field.label()), label_style),
        Span::styled(value_text, value_style(field, value)),
    ])
}

fn value_style(field: DisplayField, value: &str) -> Style {
    let base = Style::default().fg(Color::White);
    if value == UNSET {
        return Style::default().fg(Color::DarkGray);
    }

    match field {
        DisplayField::Reflectivity => value
            .parse::<f64>()
            .map_or(base, |dbz| Style::default().fg(reflectivity_color(dbz))),
        DisplayField::HighCore | DisplayField::HailCore if value == "Yes" => {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        }
        DisplayField::CoupletStatus if value == "strengthening" => {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        }
        DisplayField::CoupletStatus if value == "weakening" => Style::default().fg(Color::Green),
        DisplayField::EfRating => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        DisplayField::InboundTimer
        | DisplayField::OutboundTimer
        | DisplayField::CoupletSizeTimer
        | DisplayField::CoupletStatusTimer => Style::default().fg(Color::Gray),
        _ => base,
    }
}

fn render_waiting_panel(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" Radar Config ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let path = app.actions.config_path().display().to_string();
    let mut lines = vec![TextLine::from(vec![
        Span::styled("Config: ", Style::default().fg(Color::Gray)),
        Span::styled(path, Style::default().fg(Color::White)),
    ])];

    match app.load_error.as_deref() {
        Some(error) => {
            lines.push(TextLine::from(""));
            lines.push(TextLine::from(Span::styled(
                format!("Could not load radar config: {error}"),
                Style::default().fg(Color::Red),
            )));
            lines.push(TextLine::from(Span::styled(
                "Fix the file and press r to retry",
                Style::default().fg(Color::Gray),
            )));
        }
        None => {
            lines.push(TextLine::from(Span::styled(
                "Loading radar config...",
                Style::default().fg(Color::Yellow),
            )));
        }
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_status_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let status_block = Block::default()
        .title(" Status ")
        .title_style(Style::default().fg(Color::Yellow))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let message_style = if app.load_error.is_some() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Green)
    };

    let status_text = TextLine::from(vec![
        Span::styled(app.status_message.clone(), message_style),
        Span::styled(scan_summary(app), Style::default().fg(Color::Gray)),
    ]);

    let status_paragraph = Paragraph::new(status_text)
        .block(status_block)
        .wrap(Wrap { trim: true });
    f.render_widget(status_paragraph, area);
}

fn scan_summary(app: &App) -> String {
    let Some(sim) = app.sim.as_ref() else {
        return String::new();
    };

    let last_scan = app
        .last_scan
        .map_or_else(|| "--:--:--".to_string(), |at| at.format("%H:%M:%S").to_string());
    let paused = if app.paused { " | PAUSED" } else { "" };

    format!(
        "  [scan #{} | last {last_scan} | sweep {:.1}s{paused}]",
        sim.ticks(),
        sim.rotation_period()
    )
}

fn render_shortcuts(f: &mut Frame<'_>, area: Rect) {
    let shortcuts_paragraph = Paragraph::new(shortcuts_line()).alignment(Alignment::Center);
    f.render_widget(shortcuts_paragraph, area);
}

fn key_span(key: &'static str) -> Span<'static> {
    Span::styled(
        key,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )
}

fn shortcuts_line() -> TextLine<'static> {
    let hint = |text: &'static str| Span::styled(text, Style::default().fg(Color::Gray));
    TextLine::from(vec![
        key_span("?"),
        hint(": Help | "),
        key_span("Space"),
        hint(": Pause | "),
        key_span("s"),
        hint(": Step | "),
        key_span("r"),
        hint(": Reload config | "),
        key_span("q"),
        hint(": Quit"),
    ])
}

fn build_help_lines() -> Vec<TextLine<'static>> {
    let heading = |text: &'static str| {
        TextLine::from(Span::styled(
            text,
            Style::default().add_modifier(Modifier::BOLD),
        ))
    };
    let shortcut = |key: &'static str, description: &'static str| {
        TextLine::from(vec![key_span(key), Span::raw(description)])
    };

    let mut lines = vec![
        TextLine::from(Span::styled(
            "AMRT Storm Radar",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        TextLine::from(""),
        TextLine::from(
            "Simulated Doppler scan of a rotating storm. Velocities drift inside a band around the configured true velocity; couplet size, trend and reflectivity follow.",
        ),
        TextLine::from(""),
        heading("Keyboard Shortcuts:"),
        shortcut("  ?", " - Toggle this help popup"),
        shortcut("  Space / p", " - Pause or resume the scan clock"),
        shortcut("  s", " - Run a single scan while paused"),
        shortcut("  r", " - Reload the radar config and restart the storm"),
        shortcut("  q / Esc", " - Quit"),
        TextLine::from(""),
        heading("Update cadence:"),
        TextLine::from("  Velocities and couplet size every 2 rotations"),
        TextLine::from("  Couplet status every 6 rotations"),
        TextLine::from("  Reflectivity every scan"),
        TextLine::from(""),
        heading("CLI Options:"),
    ];

    let help_text = crate::cli::CliArgs::help_text();
    for line in help_text.lines() {
        if line.starts_with("Usage") || line.starts_with("Options") || line.trim().is_empty() {
            continue;
        }
        lines.push(TextLine::from(line.to_string()));
    }

    lines
}
