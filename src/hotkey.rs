#![cfg_attr(not(windows), allow(dead_code))]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use winit::event_loop::EventLoopProxy;
use winit::keyboard::KeyCode;

/// How often the listener samples key state.
pub const HOTKEY_POLL_INTERVAL: Duration = Duration::from_millis(15);

/// The two global commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Hotkey {
    /// F8: switch between following the cursor and docking.
    ToggleFollow,
    /// F9: exit.
    Quit,
}

impl Hotkey {
    pub const ALL: [Hotkey; 2] = [Self::ToggleFollow, Self::Quit];

    pub fn label(self) -> &'static str {
        match self {
            Self::ToggleFollow => "F8",
            Self::Quit => "F9",
        }
    }

    /// Win32 virtual-key code.
    pub fn virtual_key(self) -> i32 {
        match self {
            Self::ToggleFollow => 0x77, // VK_F8
            Self::Quit => 0x78,         // VK_F9
        }
    }

    /// Map a focused-window key press to a hotkey.
    pub fn from_key_code(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::F8 => Some(Self::ToggleFollow),
            KeyCode::F9 => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Samples whether a hotkey is currently held.
pub trait KeyPoller: Send + 'static {
    fn is_down(&mut self, key: Hotkey) -> bool;
}

/// Where the listener delivers presses. Returns false once the receiving
/// side is gone.
pub trait EventSink: Send + 'static {
    fn send(&self, key: Hotkey) -> bool;
}

impl EventSink for EventLoopProxy<Hotkey> {
    fn send(&self, key: Hotkey) -> bool {
        self.send_event(key).is_ok()
    }
}

impl EventSink for mpsc::Sender<Hotkey> {
    fn send(&self, key: Hotkey) -> bool {
        mpsc::Sender::send(self, key).is_ok()
    }
}

/// Turns held/released samples into single press events.
#[derive(Debug, Default)]
pub struct KeyEdges {
    was_down: [bool; 2],
}

impl KeyEdges {
    /// Record a sample. True only on the released -> held transition.
    pub fn pressed(&mut self, key: Hotkey, down: bool) -> bool {
        let slot = &mut self.was_down[key as usize];
        let fired = down && !*slot;
        *slot = down;
        fired
    }
}

/// Background thread that polls the hotkeys and forwards presses to the
/// event loop. Stops when dropped or when the sink closes.
pub struct HotkeyListener {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl HotkeyListener {
    pub fn start<P, S>(mut poller: P, sink: S, interval: Duration) -> std::io::Result<Self>
    where
        P: KeyPoller,
        S: EventSink,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("hotkeys".into())
            .spawn(move || {
                let mut edges = KeyEdges::default();
                while !stop_flag.load(Ordering::Relaxed) {
                    for key in Hotkey::ALL {
                        if edges.pressed(key, poller.is_down(key)) {
                            log::debug!("Hotkey {} pressed", key.label());
                            if !sink.send(key) {
                                log::debug!("Event loop gone, hotkey listener exiting");
                                return;
                            }
                        }
                    }
                    thread::sleep(interval);
                }
            })?;

        log::info!(
            "Hotkeys: {} toggles follow mode, {} quits",
            Hotkey::ToggleFollow.label(),
            Hotkey::Quit.label()
        );

        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Signal the thread and wait for it to exit.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("Hotkey listener panicked");
            }
        }
    }
}

impl Drop for HotkeyListener {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Global key state via `GetAsyncKeyState`, independent of window focus.
#[cfg(windows)]
pub struct AsyncKeyPoller;

#[cfg(windows)]
impl KeyPoller for AsyncKeyPoller {
    fn is_down(&mut self, key: Hotkey) -> bool {
        crate::platform::win32::is_key_down(key.virtual_key())
    }
}
