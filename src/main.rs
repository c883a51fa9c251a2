mod academy;
mod input;
mod logger;
mod time;
mod widgets;

use std::{cell::RefCell, io, rc::Rc};

use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use academy::AcademyGame;
use input::{ClickState, InputEvent};
use time::{GameTime, TICKS_PER_SEC};

/// Wall-clock epoch milliseconds. Economy timestamps and saves use this.
fn wall_clock_ms() -> u64 {
    js_sys::Date::now() as u64
}

/// Monotonic milliseconds for frame pacing.
fn frame_clock_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// Action under a pointer position, measured against the grid container.
fn action_at(mouse_x: u32, mouse_y: u32, cs: &ClickState) -> Option<u16> {
    let document = web_sys::window()?.document()?;

    // DomBackend creates a <div> as the grid container inside <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    cs.hit_test_pixels(
        mouse_x as f64 - rect.left(),
        mouse_y as f64 - rect.top(),
        rect.width(),
        rect.height(),
    )
}

fn key_to_char(code: &KeyCode) -> Option<char> {
    match code {
        KeyCode::Char(c) => Some(c.to_ascii_lowercase()),
        KeyCode::Esc => Some('q'),
        KeyCode::Tab => Some('\t'),
        KeyCode::Enter => Some('\n'),
        _ => None,
    }
}

/// Write a last snapshot when the page goes away.
fn save_on_unload(game: &Rc<RefCell<AcademyGame>>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let game = game.clone();
    let handler = Closure::<dyn FnMut()>::new(move || {
        if let Ok(mut g) = game.try_borrow_mut() {
            g.persist(wall_clock_ms());
        }
    });
    window.set_onbeforeunload(Some(handler.as_ref().unchecked_ref()));
    handler.forget();
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();
    logger::init();

    let now = wall_clock_ms();
    let game = Rc::new(RefCell::new(AcademyGame::new(now, now)));
    let click_state = Rc::new(RefCell::new(ClickState::new()));
    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    save_on_unload(&game);

    // Mouse/touch click handler
    terminal.on_mouse_event({
        let game = game.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed
                || mouse_event.button != MouseButton::Left
            {
                return;
            }

            let cs = click_state.borrow();
            if cs.is_empty_grid() {
                return;
            }
            let action = action_at(mouse_event.x, mouse_event.y, &cs);
            drop(cs);

            if let Some(id) = action {
                game.borrow_mut()
                    .handle_input(&InputEvent::Click(id), wall_clock_ms());
            }
        }
    });

    // Keyboard handler
    terminal.on_key_event({
        let game = game.clone();
        move |key_event| {
            if let Some(c) = key_to_char(&key_event.code) {
                game.borrow_mut()
                    .handle_input(&InputEvent::Key(c), wall_clock_ms());
            }
        }
    });

    let mut clock = GameTime::new(TICKS_PER_SEC);
    terminal.draw_web(move |f| {
        let now = wall_clock_ms();
        let ticks = clock.update(frame_clock_ms());
        game.borrow_mut().tick(ticks, now);

        let area = f.area();
        click_state.borrow_mut().begin_frame(area);
        game.borrow().render(now, f, area, &click_state);
    });

    Ok(())
}
