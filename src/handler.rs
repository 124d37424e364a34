use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use tracing::debug;

use crate::app::{App, InputMode, Tab};
use crate::input::InputField;
use crate::tui::AppEvent;

const PAGE: u16 = 10;
const WHEEL: u16 = 3;

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => {
            app.poll_requests().await;
            app.tick_animation();
        }
    }
    Ok(())
}

pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => {
                app.should_quit = true;
                return;
            }
            KeyCode::Char('t') => {
                app.toggle_tab();
                return;
            }
            _ => {}
        }
    }

    match key.code {
        KeyCode::PageUp => return app.scroll_up(PAGE),
        KeyCode::PageDown => return app.scroll_down(PAGE),
        _ => {}
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        // Tabs
        KeyCode::Tab | KeyCode::BackTab => app.toggle_tab(),
        KeyCode::Char('1') => app.select_tab(Tab::Chat),
        KeyCode::Char('2') => app.select_tab(Tab::Simulator),

        // Scrolling
        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(1),
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_down(PAGE)
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_up(PAGE)
        }
        KeyCode::Char('G') | KeyCode::End => match app.tab {
            Tab::Chat => app.chat.viewport.pin_to_bottom(),
            Tab::Simulator => app.simulator.viewport.pin_to_bottom(),
        },

        KeyCode::Char('r') => app.check_backend(),

        KeyCode::Char('i') | KeyCode::Char('a') | KeyCode::Enter => {
            app.input_mode = InputMode::Editing;
        }
        _ => {}
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            if app.submit() {
                debug!(tab = app.tab.title(), "request submitted");
            }
        }
        KeyCode::Tab | KeyCode::BackTab if app.tab == Tab::Simulator => {
            app.simulator.toggle_focus();
        }
        _ => {
            if let Some(field) = focused_input(app) {
                edit_field(field, key);
            }
        }
    }
}

/// The input receiving keystrokes, or `None` while it is disabled
fn focused_input(app: &mut App) -> Option<&mut InputField> {
    match app.tab {
        Tab::Chat if app.chat.is_loading() => None,
        Tab::Chat => Some(&mut app.chat.input),
        Tab::Simulator => app.simulator.focused_field_mut(),
    }
}

fn edit_field(field: &mut InputField, key: KeyEvent) {
    match key.code {
        KeyCode::Backspace => field.backspace(),
        KeyCode::Delete => field.delete(),
        KeyCode::Left => field.left(),
        KeyCode::Right => field.right(),
        KeyCode::Home => field.home(),
        KeyCode::End => field.end(),
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => field.clear(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => field.insert(c),
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollUp => app.scroll_up(WHEEL),
        MouseEventKind::ScrollDown => app.scroll_down(WHEEL),
        _ => {}
    }
}
