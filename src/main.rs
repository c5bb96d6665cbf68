use std::time::{Duration, Instant};

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};
use winit::window::{Window, WindowId};

use entrylist::loading;
use entrylist::ui::{
    self, DrawList, EntryList, KeyBindings, KeyCombo, ModifierFlags, SearchQuery, Theme,
};

const WINDOW_W: f32 = 480.0;
const WINDOW_H: f32 = 360.0;
/// Height reserved above the list for the search bar.
const HEADER_H: f32 = 24.0;
/// Entry tick cadence, independent of the redraw rate.
const TICK: Duration = Duration::from_millis(50);

fn build_list(now: Instant) -> EntryList {
    let settings = loading::load_settings("data/list.ron");
    let mut list = EntryList::new(settings, Theme::default(), KeyBindings::defaults(), now);
    let mut specs = loading::load_demo_entries("data/demo_entries.kdl");
    if specs.is_empty() {
        log::warn!("no demo entries loaded, using built-in sample");
        specs = ui::demo::sample();
    }
    ui::demo::populate(&mut list, &specs);
    log::info!("loaded {} entries", list.tree().len());
    list.resize(WINDOW_W, WINDOW_H, HEADER_H, WINDOW_H, now);
    list
}

/// Text rendition of the laid-out rows: one line per row, indented by depth,
/// `>` marking the selection and `*` search matches.
fn snapshot(list: &EntryList, now: Instant) -> String {
    let selected = list.selection().map(|s| s.entry);
    let mut out = format!(
        "scroll {:.0}/{:.0}  search {:?} {:?}\n",
        list.scroll_value(now),
        list.max_scroll(),
        list.search_query().text,
        list.search_result(),
    );
    for row in list.rows() {
        let label = list
            .tree()
            .entry(row.id)
            .and_then(|e| e.search_text())
            .unwrap_or("?");
        let mark = if selected == Some(row.id) { '>' } else { ' ' };
        let hit = if list.search_matches().contains(&row.id) {
            '*'
        } else {
            ' '
        };
        out.push_str(&format!(
            "{}{} {}{}\n",
            mark,
            hit,
            "  ".repeat(row.depth),
            label
        ));
    }
    out
}

/// Drive the list through a fixed key sequence without opening a window.
fn run_script() {
    let t0 = Instant::now();
    let mut list = build_list(t0);
    let mut draw_list = DrawList::new();
    let mut now = t0;
    let mut frame = |list: &mut EntryList, now: Instant| {
        draw_list.clear();
        list.tick(now);
        list.render(now, &mut draw_list);
        println!("{}", snapshot(list, now));
    };

    frame(&mut list, now);
    let keys = [
        KeyCombo::plain(KeyCode::ArrowDown),
        KeyCombo::plain(KeyCode::ArrowDown),
        KeyCombo::plain(KeyCode::ArrowDown),
        KeyCombo::plain(KeyCode::ArrowLeft),
        KeyCombo::plain(KeyCode::ArrowLeft),
        KeyCombo::shift(KeyCode::ArrowRight),
    ];
    for key in keys {
        list.handle_key(key, now);
        now += Duration::from_millis(300);
        frame(&mut list, now);
    }

    list.search(SearchQuery::literal("volume"));
    now += Duration::from_millis(300);
    frame(&mut list, now);
    for _ in 0..3 {
        list.next_match(true);
        now += Duration::from_millis(300);
        frame(&mut list, now);
    }
    list.toggle_filter();
    now += Duration::from_millis(300);
    frame(&mut list, now);
    log::info!(
        "script finished: {} rows laid out, search {:?}",
        list.rows().len(),
        list.search_result()
    );
}

struct App {
    window: Option<Window>,
    list: EntryList,
    draw_list: DrawList,
    cursor_pos: PhysicalPosition<f64>,
    modifiers: ModifiersState,
    last_snapshot: String,
    last_tick: Instant,
}

impl App {
    fn combo(&self, key: KeyCode) -> KeyCombo {
        KeyCombo {
            modifiers: ModifierFlags {
                shift: self.modifiers.shift_key(),
                ctrl: self.modifiers.control_key(),
                alt: self.modifiers.alt_key(),
            },
            key,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attrs = Window::default_attributes()
            .with_title("Entry List")
            .with_inner_size(winit::dpi::LogicalSize::new(WINDOW_W, WINDOW_H));
        match event_loop.create_window(attrs) {
            Ok(window) => {
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                log::warn!("failed to create window: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let now = Instant::now();
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_pos = position;
                self.list
                    .handle_cursor_moved(position.x as f32, position.y as f32, now);
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers.state();
            }
            WindowEvent::MouseWheel { delta, .. } => {
                // winit reports wheel-up as positive; the list scrolls down on positive.
                let dy = match delta {
                    winit::event::MouseScrollDelta::LineDelta(_, y) => -y,
                    winit::event::MouseScrollDelta::PixelDelta(pos) => -(pos.y as f32) / 20.0,
                };
                self.list.handle_scroll(dy, now);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let ui_btn = match button {
                    MouseButton::Right => ui::MouseButton::Right,
                    MouseButton::Middle => ui::MouseButton::Middle,
                    _ => ui::MouseButton::Left,
                };
                self.list.handle_mouse_input(
                    ui_btn,
                    state == ElementState::Pressed,
                    self.cursor_pos.x as f32,
                    self.cursor_pos.y as f32,
                    now,
                );
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed {
                    return;
                }
                let PhysicalKey::Code(kc) = event.physical_key else {
                    return;
                };
                if self.list.handle_key(self.combo(kc), now) {
                    return;
                }
                if kc == KeyCode::Escape {
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(size) => {
                let (w, h) = (size.width as f32, size.height as f32);
                self.list.resize(w, h, HEADER_H, h, now);
            }
            WindowEvent::Focused(false) => {
                self.list.cancel_gestures();
            }
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::RedrawRequested => {
                if now.duration_since(self.last_tick) >= TICK {
                    self.list.tick(now);
                    self.last_tick = now;
                }
                self.draw_list.clear();
                self.list.render(now, &mut self.draw_list);
                let snap = snapshot(&self.list, now);
                if snap != self.last_snapshot {
                    println!("{}", snap);
                    self.last_snapshot = snap;
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

fn main() {
    env_logger::init();

    if std::env::args().any(|a| a == "--script") {
        run_script();
        return;
    }

    let event_loop = EventLoop::new().expect("create event loop");
    let start = Instant::now();
    let mut app = App {
        window: None,
        list: build_list(start),
        draw_list: DrawList::new(),
        cursor_pos: PhysicalPosition::new(0.0, 0.0),
        modifiers: ModifiersState::empty(),
        last_snapshot: String::new(),
        last_tick: start,
    };
    event_loop.run_app(&mut app).expect("run event loop");
}
