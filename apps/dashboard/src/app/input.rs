use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_input(app: &mut App, key: KeyCode) {
    if handle_help_toggle(app, key) {
        return;
    }

    match key {
        KeyCode::Char('q') | KeyCode::Esc => {
            app.running = false;
        }
        KeyCode::Char('r') => {
            app.request_reload();
            app.status_message = format!("Reloading {}", app.actions.config_path().display());
        }
        KeyCode::Char('p' | ' ') => {
            app.toggle_pause();
        }
        KeyCode::Char('s') if app.paused => {
            // Single-step while paused
            app.tick();
            app.status_message = "Stepped one scan".to_string();
        }
        _ => {}
    }
}

fn handle_help_toggle(app: &mut App, key: KeyCode) -> bool {
    if matches!(key, KeyCode::Char('?') | KeyCode::F(1)) {
        app.toggle_help();
        return true;
    }

    if app.show_help {
        if key == KeyCode::Esc {
            app.show_help = false;
        }
        return true;
    }

    false
}
