use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use crate::app::state::{App, Focus};
use crossterm::event::KeyCode;
use places_wheel::MinRating;

pub fn handle_main_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Tab => {
            cycle_focus(app, true);
            return;
        }
        KeyCode::BackTab => {
            cycle_focus(app, false);
            return;
        }
        KeyCode::F(5) => {
            app.spin();
            return;
        }
        _ => {}
    }

    match app.focus {
        Focus::Category => handle_category_input(app, key),
        Focus::Distance => handle_distance_input(app, key),
        Focus::Rating => handle_rating_input(app, key),
        Focus::Wheel => handle_wheel_input(app, key),
    }
}

fn cycle_focus(app: &mut App, forward: bool) {
    let len = Focus::ALL.len();
    let index = if forward {
        wrap_increment(app.focus.index(), len)
    } else {
        wrap_decrement(app.focus.index(), len)
    };
    if let Some(focus) = Focus::from_index(index) {
        app.set_focus(focus);
    }
}

fn handle_category_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char(c) => app.category_input.push(c),
        KeyCode::Backspace => {
            app.category_input.pop();
        }
        KeyCode::Right => {
            app.accept_suggestion();
        }
        KeyCode::Enter => {
            app.submit_category();
        }
        KeyCode::Esc => app.set_focus(Focus::Wheel),
        _ => {}
    }
}

fn handle_distance_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Left | KeyCode::Down => app.adjust_distance(false),
        KeyCode::Right | KeyCode::Up => app.adjust_distance(true),
        KeyCode::Enter => app.commit_distance(),
        _ => handle_shared_keys(app, key),
    }
}

fn handle_rating_input(app: &mut App, key: KeyCode) {
    let len = MinRating::ALL.len();
    let index = match key {
        KeyCode::Left | KeyCode::Down => wrap_decrement(app.min_rating.index(), len),
        KeyCode::Right | KeyCode::Up => wrap_increment(app.min_rating.index(), len),
        _ => {
            handle_shared_keys(app, key);
            return;
        }
    };
    if let Some(min_rating) = MinRating::from_index(index) {
        app.set_min_rating(min_rating);
    }
}

fn handle_wheel_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Enter | KeyCode::Char(' ') => app.spin(),
        _ => handle_shared_keys(app, key),
    }
}

/// Keys available whenever no text field has focus.
fn handle_shared_keys(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char('r') => app.open_review(),
        KeyCode::Char('n') => app.open_navigation(),
        KeyCode::Char('+' | '=') => app.candidates.zoom_in(),
        KeyCode::Char('-') => app.candidates.zoom_out(),
        KeyCode::Char('/') => app.set_focus(Focus::Category),
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        _ => {}
    }
}
