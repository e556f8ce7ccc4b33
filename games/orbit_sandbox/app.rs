use std::ffi::{self, CString};

use anyhow::{Context, Result};
use sokol::{app as sapp, gfx as sg, glue as sglue};
use tracing::{debug, info};

use crate::game::{EngineServices, Game, GameConfig};
use crate::graphics::Renderer;
use crate::input::InputManager;
use crate::text::TextOverlay;
use crate::texture::TextureManager;

pub struct App<T: Game> {
    game: T,
    config: GameConfig,
}

// State structure that will be passed through sokol callbacks
struct AppState<T: Game> {
    game: T,
    config: GameConfig,
    pass_action: sg::PassAction,
    renderer: Renderer,
    textures: TextureManager,
    overlay: TextOverlay,
    input: InputManager,
}

impl<T: Game> AppState<T> {
    fn services(&mut self) -> (&mut T, &mut InputManager, EngineServices<'_>) {
        (
            &mut self.game,
            &mut self.input,
            EngineServices {
                renderer: &mut self.renderer,
                textures: &mut self.textures,
                overlay: &mut self.overlay,
            },
        )
    }
}

impl<T: Game> App<T> {
    pub fn new(game: T) -> Self {
        let config = T::config();
        Self { game, config }
    }

    /// Opens the window and blocks until it is closed.
    pub fn run(self) -> Result<()> {
        let title = CString::new(self.config.window_title.clone())
            .context("window title contains a NUL byte")?;

        let mut pass_action = sg::PassAction::new();
        pass_action.colors[0] = sg::ColorAttachmentAction {
            load_action: sg::LoadAction::Clear,
            clear_value: self.config.background_color,
            ..Default::default()
        };

        let desc = sapp::Desc {
            init_userdata_cb: Some(init::<T>),
            frame_userdata_cb: Some(frame::<T>),
            cleanup_userdata_cb: Some(cleanup::<T>),
            event_userdata_cb: Some(event::<T>),
            window_title: title.as_ptr(),
            width: self.config.window_width,
            height: self.config.window_height,
            sample_count: self.config.sample_count,
            high_dpi: self.config.high_dpi,
            fullscreen: self.config.fullscreen,
            logger: sapp::Logger {
                func: Some(sokol::log::slog_func),
                ..Default::default()
            },
            icon: sapp::IconDesc {
                sokol_default: true,
                ..Default::default()
            },
            ..Default::default()
        };

        let state = Box::new(AppState {
            game: self.game,
            config: self.config,
            pass_action,
            renderer: Renderer::new(),
            textures: TextureManager::new(),
            overlay: TextOverlay::new(),
            input: InputManager::new(),
        });
        let user_data = Box::into_raw(state) as *mut ffi::c_void;

        sapp::run(&sapp::Desc { user_data, ..desc });
        info!("window closed");
        Ok(())
    }
}

extern "C" fn init<T: Game>(user_data: *mut ffi::c_void) {
    let state = unsafe { &mut *(user_data as *mut AppState<T>) };

    sg::setup(&sg::Desc {
        environment: sglue::environment(),
        logger: sg::Logger {
            func: Some(sokol::log::slog_func),
            ..Default::default()
        },
        ..Default::default()
    });
    info!("graphics backend: {:?}", sg::query_backend());
    debug!("framebuffer {}x{}", sapp::width(), sapp::height());

    state.renderer.init();
    state.textures.init();
    state.overlay.init();

    let config = state.config.clone();
    let (game, _, mut services) = state.services();
    game.init(&config, &mut services);
}

extern "C" fn frame<T: Game>(user_data: *mut ffi::c_void) {
    let state = unsafe { &mut *(user_data as *mut AppState<T>) };
    let dt = sapp::frame_duration();

    let (game, input, mut services) = state.services();
    game.update(dt, input, &mut services);

    if state.input.quit_requested() {
        sapp::request_quit();
    }
    if let Some(new_color) = state.game.request_background_color_change() {
        state.pass_action.colors[0].clear_value = new_color;
    }

    sg::begin_pass(&sg::Pass {
        action: state.pass_action,
        swapchain: sglue::swapchain(),
        ..Default::default()
    });

    let (game, _, mut services) = state.services();
    game.render(&mut services);
    state.overlay.draw();

    sg::end_pass();
    sg::commit();

    state.input.new_frame();
}

extern "C" fn cleanup<T: Game>(user_data: *mut ffi::c_void) {
    let mut state = unsafe { Box::from_raw(user_data as *mut AppState<T>) };
    state.overlay.shutdown();
    sg::shutdown();
    // game and simulation state are dropped with the box
}

extern "C" fn event<T: Game>(event: *const sapp::Event, user_data: *mut ffi::c_void) {
    let state = unsafe { &mut *(user_data as *mut AppState<T>) };
    let event = unsafe { &*event };

    state.input.handle_event(event);
    state.game.handle_event(event);
}
