mod display;

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::rc::Rc;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::thread_rng;

use flight_shooter::entities::HandleAllocator;
use flight_shooter::input::{key_code, KeySnapshot, KEY_DOWN, KEY_LEFT, KEY_RIGHT, KEY_SPACE, KEY_UP};
use flight_shooter::resources::{ResourceTracker, SceneTracker};
use flight_shooter::{Game, GameConfig, SpawnRequest};

const FRAME: Duration = Duration::from_millis(16); // ≈60 FPS

/// Frames a key stays held after its last press or repeat event.  Terminals
/// without release events rely on OS key repeat (at least 15 Hz) to keep
/// the key alive inside this window.
const HOLD_WINDOW: u64 = 8;

/// Browser-style key code for a terminal key, if the game cares about it.
fn key_code_for(code: &KeyCode) -> Option<u8> {
    match code {
        KeyCode::Up => Some(KEY_UP),
        KeyCode::Down => Some(KEY_DOWN),
        KeyCode::Left => Some(KEY_LEFT),
        KeyCode::Right => Some(KEY_RIGHT),
        KeyCode::Char(' ') => Some(KEY_SPACE),
        KeyCode::Char(c) if c.is_ascii_alphanumeric() => Some(key_code(*c)),
        _ => None,
    }
}

/// Build this frame's snapshot from every key seen within `HOLD_WINDOW`.
fn snapshot(key_frame: &HashMap<KeyCode, u64>, frame: u64) -> KeySnapshot {
    let mut keys = KeySnapshot::new();
    for (code, &last) in key_frame {
        if frame.saturating_sub(last) <= HOLD_WINDOW {
            if let Some(code) = key_code_for(code) {
                keys.set(code, true);
            }
        }
    }
    keys
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Input model: instead of acting on each key event individually, we keep a
/// `key_frame` map recording the frame of the last press/repeat event for
/// every key, and copy the still-fresh keys into one `KeySnapshot` per
/// frame.  Model loading is simulated: requests from one frame are
/// delivered at the start of the next.
fn game_loop<W: Write>(
    out: &mut W,
    game: &mut Game,
    handles: &mut HandleAllocator,
    tracker: &Rc<RefCell<SceneTracker>>,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<()> {
    let mut rng = thread_rng();
    let clock = Instant::now();

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut pending: Vec<SpawnRequest> = Vec::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // input since the last frame
        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            match kind {
                KeyEventKind::Press => {
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(());
                        }
                        _ => {}
                    }
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        // last frame's requests finish loading now
        for request in pending.drain(..) {
            let batch = handles.allocate_many(request.handle_count());
            if let Err(e) = game.deliver(&request, batch, &mut rng) {
                log::error!("could not deliver {}: {}", request.asset(), e);
            }
        }

        let now = clock.elapsed().as_secs_f64() * 1000.0;
        pending = game.frame(now, snapshot(&key_frame, frame), &mut rng);

        let released = tracker.borrow_mut().take_released();
        if !released.is_empty() {
            log::trace!("released {} renderables", released.len());
        }

        display::render(out, game)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Terminal ──────────────────────────────────────────────────────────────────

/// Raw mode on the alternate screen.  Returns whether the terminal accepted
/// the request for release and repeat events.
fn enter_terminal<W: Write>(out: &mut W) -> std::io::Result<bool> {
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    Ok(out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok())
}

fn leave_terminal<W: Write>(out: &mut W, keyboard_enhanced: bool) {
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

/// Blocking event reads run on their own thread; the frame loop polls the
/// channel.  The thread ends when the receiver is dropped.
fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });
    rx
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => GameConfig::load_from_file(path)?,
        None => GameConfig::default(),
    };

    let tracker = SceneTracker::shared();
    let mut handles = HandleAllocator::new();
    let player_handle = handles.allocate();
    tracker.borrow_mut().track(player_handle);
    let mut game = Game::new(config, player_handle, tracker.clone())?;

    let mut out = BufWriter::new(stdout());
    let keyboard_enhanced = enter_terminal(&mut out)?;
    let rx = spawn_input_thread();

    let result = game_loop(&mut out, &mut game, &mut handles, &tracker, &rx);
    leave_terminal(&mut out, keyboard_enhanced);

    log::info!("session over, last score {}", game.player().score);
    result.map_err(Into::into)
}
