use crate::app::App;
use amrt_dashboard::sim::SimState;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::canvas::{Canvas, Circle, Context, Line as CanvasLine};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

const DBZ_SCALE_MAX: f64 = 80.0;

/// NWS-style colour ramp for a reflectivity reading in dBZ.
pub fn reflectivity_color(dbz: f64) -> Color {
    if dbz >= 65.0 {
        Color::Magenta
    } else if dbz >= 50.0 {
        Color::Red
    } else if dbz >= 40.0 {
        Color::Yellow
    } else if dbz >= 20.0 {
        Color::Green
    } else {
        Color::DarkGray
    }
}

/// Sweep angle in radians for a fraction of a rotation. Zero points north and
/// the beam turns clockwise.
pub fn sweep_angle(phase: f64) -> f64 {
    FRAC_PI_2 - phase.clamp(0.0, 1.0) * TAU
}

fn square_in(area: Rect) -> Rect {
    let size = area.width.min(area.height);
    Rect {
        x: area.x + (area.width - size) / 2,
        y: area.y + (area.height - size) / 2,
        width: size,
        height: size,
    }
}

fn draw_scope(ctx: &mut Context<'_>, center: (f64, f64), radius: f64, rings: u8) {
    let (center_x, center_y) = center;
    for i in 1..=rings {
        ctx.draw(&Circle {
            x: center_x,
            y: center_y,
            radius: radius * (f64::from(i) / f64::from(rings)),
            color: Color::DarkGray,
        });
    }

    ctx.draw(&CanvasLine {
        x1: center_x,
        y1: center_y - radius,
        x2: center_x,
        y2: center_y + radius,
        color: Color::DarkGray,
    });
    ctx.draw(&CanvasLine {
        x1: center_x - radius,
        y1: center_y,
        x2: center_x + radius,
        y2: center_y,
        color: Color::DarkGray,
    });
}

fn draw_beam(ctx: &mut Context<'_>, center: (f64, f64), radius: f64, angle: f64) {
    let (center_x, center_y) = center;

    // Trailing afterglow sits just behind the beam
    let ghost_angle = angle + PI / 18.0;
    ctx.draw(&CanvasLine {
        x1: center_x,
        y1: center_y,
        x2: ghost_angle.cos().mul_add(radius * 0.92, center_x),
        y2: ghost_angle.sin().mul_add(radius * 0.92, center_y),
        color: Color::DarkGray,
    });

    ctx.draw(&CanvasLine {
        x1: center_x,
        y1: center_y,
        x2: angle.cos().mul_add(radius, center_x),
        y2: angle.sin().mul_add(radius, center_y),
        color: Color::LightGreen,
    });
}

/// Small decorative scope for the title bar.
pub fn render_mini_radar(f: &mut Frame<'_>, area: Rect, phase: f64) {
    if area.width < 4 || area.height < 4 {
        return;
    }

    let square = square_in(area);
    let width = f64::from(square.width);
    let height = f64::from(square.height);

    f.render_widget(
        Canvas::default()
            .paint(|ctx| {
                let center = (width / 2.0, height / 2.0);
                let radius = width.min(height) / 2.0 * 0.8;
                draw_scope(ctx, center, radius, 3);
                draw_beam(ctx, center, radius, sweep_angle(phase));
            })
            .x_bounds([0.0, width])
            .y_bounds([0.0, height]),
        square,
    );
}

/// Main scope: the sweeping beam, an echo sized by reflectivity and the
/// inbound/outbound couplet straddling the storm centre.
pub fn render_storm_radar(app: &App, f: &mut Frame<'_>, area: Rect) {
    if area.width < 8 || area.height < 6 {
        return;
    }

    let block = Block::default()
        .title(" Doppler Scope ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(sim) = app.sim.as_ref() else {
        let paragraph = Paragraph::new("No storm loaded")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(paragraph, inner);
        return;
    };

    let square = square_in(inner);
    let width = f64::from(square.width);
    let height = f64::from(square.height);

    f.render_widget(
        Canvas::default()
            .paint(|ctx| {
                let center = (width / 2.0, height / 2.0);
                let radius = width.min(height) / 2.0 * 0.9;
                draw_scope(ctx, center, radius, 4);
                draw_echo(ctx, center, radius, sim, app.animation_counter);
                draw_couplet(ctx, center, radius, sim);
                draw_beam(ctx, center, radius, sweep_angle(sim.rotation_phase()));
            })
            .x_bounds([0.0, width])
            .y_bounds([0.0, height]),
        square,
    );
}

fn draw_echo(ctx: &mut Context<'_>, center: (f64, f64), radius: f64, sim: &SimState, pulse: f64) {
    let dbz = sim.metrics().reflectivity.max(0.0);
    let echo_radius = radius * (dbz / DBZ_SCALE_MAX).clamp(0.05, 1.0) * 0.6;
    let breathe = pulse.sin().mul_add(0.04, 1.0);

    ctx.draw(&Circle {
        x: center.0,
        y: center.1,
        radius: echo_radius * breathe,
        color: reflectivity_color(dbz),
    });

    if sim.metrics().hail_core {
        ctx.draw(&Circle {
            x: center.0,
            y: center.1,
            radius: echo_radius * 0.35,
            color: Color::White,
        });
    }
}

fn draw_couplet(ctx: &mut Context<'_>, center: (f64, f64), radius: f64, sim: &SimState) {
    let spread = radius * sim.couplet_size().unwrap_or(0.2).clamp(0.05, 1.5) * 0.3;
    let (lower, upper) = sim.velocity_bounds();
    let span = (upper - lower).max(f64::EPSILON);
    let marker = |velocity: f64| radius * 0.03 * (1.0 + (velocity - lower) / span);

    ctx.draw(&Circle {
        x: center.0 - spread,
        y: center.1,
        radius: marker(sim.inbound_velocity()),
        color: Color::Green,
    });
    ctx.draw(&Circle {
        x: center.0 + spread,
        y: center.1,
        radius: marker(sim.outbound_velocity()),
        color: Color::Red,
    });
}
