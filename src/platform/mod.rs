#[cfg(windows)]
pub mod win32;

use glam::IVec2;
use winit::window::Window;

/// Global cursor position in screen pixels, if the platform can report it
/// without the cursor being over one of our windows.
pub fn global_cursor_pos() -> Option<IVec2> {
    #[cfg(windows)]
    {
        Some(win32::get_mouse_pos())
    }
    #[cfg(not(windows))]
    {
        None
    }
}

/// Make the pet window click-through and keep it out of the taskbar.
///
/// Without a global cursor source the window itself is the only place cursor
/// and key events arrive, so it stays hit-testable there.
pub fn setup_overlay(window: &Window) {
    #[cfg(windows)]
    {
        if let Err(e) = window.set_cursor_hittest(false) {
            log::warn!("Click-through unavailable: {e}");
        }
        win32::setup_overlay(window);
    }
    #[cfg(not(windows))]
    {
        let _ = window;
        log::info!("No global hotkeys on this platform; focus the pet and press F8/F9");
    }
}
