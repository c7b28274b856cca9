use crate::app::App;
use amrt_dashboard::sim::{SimState, VelocityHistory, HISTORY_CAPACITY};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph};
use ratatui::Frame;

/// Oldest sample first, x counted from 1.
pub fn history_points(history: &VelocityHistory) -> Vec<(f64, f64)> {
    history
        .iter()
        .zip(1_u32..)
        .map(|(sample, index)| (f64::from(index), sample))
        .collect()
}

/// Y-axis range covering the velocity band with a little headroom.
pub fn velocity_axis_bounds(sim: &SimState) -> [f64; 2] {
    let (lower, upper) = sim.velocity_bounds();
    [lower - 1.0, upper + 1.0]
}

fn band_line(value: f64) -> [(f64, f64); 2] {
    [(1.0, value), (history_x_max(), value)]
}

fn history_x_max() -> f64 {
    f64::from(u32::try_from(HISTORY_CAPACITY).unwrap_or(5))
}

/// Chart title, with the newest sample once one exists.
pub fn history_title(history: &VelocityHistory) -> String {
    history.latest().map_or_else(
        || " Inbound History (per rotation) ".to_string(),
        |latest| format!(" Inbound History (per rotation, latest {latest:.2} kt) "),
    )
}

pub fn render_history_chart(app: &App, f: &mut Frame<'_>, area: Rect) {
    let title = app
        .sim
        .as_ref()
        .map_or_else(|| history_title(&VelocityHistory::new()), |sim| history_title(sim.history()));
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let Some(sim) = app.sim.as_ref() else {
        f.render_widget(block, area);
        return;
    };

    if sim.history().is_empty() {
        let paragraph = Paragraph::new("Waiting for first full rotation")
            .block(block)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(paragraph, area);
        return;
    }

    let samples = history_points(sim.history());
    let (lower, upper) = sim.velocity_bounds();
    let lower_line = band_line(lower);
    let upper_line = band_line(upper);
    let true_line = band_line(sim.true_velocity());
    let bounds = velocity_axis_bounds(sim);

    let datasets = vec![
        Dataset::default()
            .name("band")
            .marker(Marker::Dot)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::DarkGray))
            .data(&lower_line),
        Dataset::default()
            .marker(Marker::Dot)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::DarkGray))
            .data(&upper_line),
        Dataset::default()
            .name("true")
            .marker(Marker::Dot)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Blue))
            .data(&true_line),
        Dataset::default()
            .name("inbound")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Green))
            .data(&samples),
    ];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title("Sample")
                .style(Style::default().fg(Color::Gray))
                .bounds([1.0, history_x_max()])
                .labels(vec![Span::raw("oldest"), Span::raw("latest")]),
        )
        .y_axis(
            Axis::default()
                .title("kt")
                .style(Style::default().fg(Color::Gray))
                .bounds(bounds)
                .labels(vec![
                    Span::raw(format!("{lower:.0}")),
                    Span::raw(format!("{:.0}", sim.true_velocity())),
                    Span::raw(format!("{upper:.0}")),
                ]),
        );

    f.render_widget(chart, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use amrt_dashboard::config::RadarConfig;

    #[test]
    fn history_points_are_numbered_from_one() {
        let mut history = VelocityHistory::new();
        history.push(20.0);
        history.push(20.5);
        history.push(21.0);

        assert_eq!(
            history_points(&history),
            vec![(1.0, 20.0), (2.0, 20.5), (3.0, 21.0)]
        );
    }

    #[test]
    fn title_reports_latest_sample() {
        let mut history = VelocityHistory::new();
        assert_eq!(history_title(&history), " Inbound History (per rotation) ");

        history.push(24.5);
        history.push(25.25);
        assert_eq!(
            history_title(&history),
            " Inbound History (per rotation, latest 25.25 kt) "
        );
    }

    #[test]
    fn axis_bounds_wrap_velocity_band() {
        let sim = SimState::new(&RadarConfig {
            true_velocity: 40.0,
            ..RadarConfig::default()
        });
        assert_eq!(velocity_axis_bounds(&sim), [29.0, 51.0]);
    }
}
