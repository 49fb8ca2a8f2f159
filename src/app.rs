use std::sync::Arc;

use glam::IVec2;
use instant::Instant;
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowAttributes, WindowId, WindowLevel};

use crate::assets::SpriteSheet;
use crate::config::PetConfig;
use crate::hotkey::Hotkey;
#[cfg(windows)]
use crate::hotkey::{AsyncKeyPoller, HotkeyListener, HOTKEY_POLL_INTERVAL};
use crate::pet::animation::AnimState;
use crate::pet::Pet;
use crate::platform;
use crate::render::GpuState;
use crate::timer::Interval;

/// Used when winit cannot report any monitor.
const FALLBACK_SCREEN: (u32, u32) = (1920, 1080);

/// Top-level application state.
struct App {
    config: PetConfig,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    sheet: SpriteSheet,
    pet: Option<Pet>,

    // The two timers
    move_timer: Interval,
    anim_timer: Interval,
    last_frame_time: Option<Instant>,

    /// (state, frame) currently in the texture.
    shown: Option<(AnimState, usize)>,
    /// Last cursor position seen through window events.
    cursor: IVec2,

    #[cfg_attr(not(windows), allow(dead_code))]
    proxy: EventLoopProxy<Hotkey>,
    #[cfg(windows)]
    hotkeys: Option<HotkeyListener>,

    /// Setup failure to hand back out of `run`.
    fatal: Option<Box<dyn std::error::Error>>,
}

impl App {
    fn new(config: PetConfig, proxy: EventLoopProxy<Hotkey>) -> Self {
        let sheet = SpriteSheet::load(&config.asset_dir, config.sprite_size);
        Self {
            move_timer: Interval::new(config.move_interval),
            anim_timer: Interval::new(config.anim_interval),
            config,
            window: None,
            gpu: None,
            sheet,
            pet: None,
            last_frame_time: None,
            shown: None,
            cursor: IVec2::ZERO,
            proxy,
            #[cfg(windows)]
            hotkeys: None,
            fatal: None,
        }
    }

    fn cursor_pos(&self) -> IVec2 {
        platform::global_cursor_pos().unwrap_or(self.cursor)
    }

    fn handle_hotkey(&mut self, event_loop: &ActiveEventLoop, key: Hotkey) {
        match key {
            Hotkey::ToggleFollow => {
                if let Some(pet) = &mut self.pet {
                    pet.toggle_follow();
                }
            }
            Hotkey::Quit => {
                log::info!("{} pressed, exiting", key.label());
                event_loop.exit();
            }
        }
    }

    /// Run whatever timer ticks are due, then push the results to the
    /// window and texture.
    fn run_timers(&mut self, dt: std::time::Duration) {
        let cursor = self.cursor_pos();
        let Some(pet) = &mut self.pet else {
            return;
        };

        let mut moved = false;
        for _ in 0..self.move_timer.advance(dt) {
            moved |= pet.update_position(cursor);
        }
        for _ in 0..self.anim_timer.advance(dt) {
            pet.update_animation(self.sheet.frame_count(pet.state()));
        }

        let Some(window) = &self.window else {
            return;
        };

        if moved {
            window.set_outer_position(PhysicalPosition::new(pet.pos.x, pet.pos.y));
        }

        let current = (pet.state(), pet.frame());
        if self.shown != Some(current) {
            if let Some(gpu) = &self.gpu {
                gpu.set_sprite(self.sheet.get(current.0, current.1));
            }
            self.shown = Some(current);
            window.request_redraw();
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: Box<dyn std::error::Error>) {
        log::error!("Setup failed: {err}");
        self.fatal = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler<Hotkey> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let (screen_w, screen_h) = match event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next())
        {
            Some(monitor) => {
                let size = monitor.size();
                (size.width, size.height)
            }
            None => {
                log::warn!("No monitor reported, assuming {:?}", FALLBACK_SCREEN);
                FALLBACK_SCREEN
            }
        };

        let pet = Pet::spawn(&self.config, screen_w, screen_h);
        let size = self.config.sprite_size;

        // Start hidden so the compositor never shows an unstyled frame.
        let attrs = WindowAttributes::default()
            .with_title("Desktop Cat")
            .with_decorations(false)
            .with_resizable(false)
            .with_transparent(cfg!(not(windows)))
            .with_visible(false)
            .with_window_level(WindowLevel::AlwaysOnTop)
            .with_inner_size(PhysicalSize::new(size, size))
            .with_position(PhysicalPosition::new(pet.pos.x, pet.pos.y));

        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };

        platform::setup_overlay(&window);

        log::info!(
            "Pet window created at ({}, {}) on a {}x{} screen",
            pet.pos.x,
            pet.pos.y,
            screen_w,
            screen_h
        );

        let gpu = match GpuState::new(window.clone(), size) {
            Ok(gpu) => gpu,
            Err(e) => return self.fail(event_loop, e.into()),
        };
        log::info!("wgpu + sprite pipeline initialized");

        let first = (pet.state(), pet.frame());
        gpu.set_sprite(self.sheet.get(first.0, first.1));
        self.shown = Some(first);

        #[cfg(windows)]
        match HotkeyListener::start(AsyncKeyPoller, self.proxy.clone(), HOTKEY_POLL_INTERVAL) {
            Ok(listener) => self.hotkeys = Some(listener),
            Err(e) => log::warn!("Global hotkeys unavailable: {e}"),
        }

        if self.config.start_chasing {
            log::info!("Follow mode on");
        } else {
            log::info!("Starting docked");
        }

        self.cursor = pet.pos;
        self.pet = Some(pet);
        self.gpu = Some(gpu);

        window.set_visible(true);
        window.request_redraw();
        self.window = Some(window);
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, key: Hotkey) {
        self.handle_hotkey(event_loop, key);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        if let Some(last) = self.last_frame_time {
            self.run_timers(now.duration_since(last));
        }
        self.last_frame_time = Some(now);

        let next = self.move_timer.remaining().min(self.anim_timer.remaining());
        event_loop.set_control_flow(ControlFlow::WaitUntil(now + next));
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(Ok(origin)) = self.window.as_ref().map(|w| w.outer_position()) {
                    self.cursor = IVec2::new(origin.x, origin.y)
                        + IVec2::new(position.x as i32, position.y as i32);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if let Some(key) = Hotkey::from_key_code(code) {
                    self.handle_hotkey(event_loop, key);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Some(gpu) = &self.gpu {
                    gpu.render_frame();
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        #[cfg(windows)]
        if let Some(mut listener) = self.hotkeys.take() {
            listener.stop();
        }
        log::info!("Bye");
    }
}

/// Entry point — create event loop and run.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = PetConfig::from_env();
    log::debug!("Config: {config:?}");

    let event_loop = EventLoop::<Hotkey>::with_user_event().build()?;
    let mut app = App::new(config, event_loop.create_proxy());
    event_loop.run_app(&mut app)?;

    match app.fatal.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
