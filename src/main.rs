//! Star Raiders entry point
//!
//! On the web this wires the DOM (canvas, screens, buttons, keyboard) to the
//! game and drives it with `requestAnimationFrame`. Natively it runs a seeded
//! headless game with the autopilot and prints the run metrics as JSON.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, KeyboardEvent};

    use star_raiders::renderer::CanvasSurface;
    use star_raiders::sim::{Direction, GameEvent, GamePhase};
    use star_raiders::{Game, GameConfig};

    const SCREENS: [&str; 7] = [
        "menu-screen",
        "instructions-screen",
        "credits-screen",
        "game-screen",
        "game-over-screen",
        "level-complete-screen",
        "game-complete-screen",
    ];

    /// Game plus the browser pieces it draws on
    struct Host {
        game: Game,
        surface: CanvasSurface,
        document: Document,
        /// An animation frame is scheduled
        looping: bool,
    }

    impl Host {
        fn set_hidden(&self, id: &str, hidden: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let classes = el.class_list();
                let _ = if hidden {
                    classes.add_1("hidden")
                } else {
                    classes.remove_1("hidden")
                };
            }
        }

        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        /// Hide every screen, then show the given ones
        fn show_only(&self, visible: &[&str]) {
            for id in SCREENS {
                self.set_hidden(id, !visible.contains(&id));
            }
        }

        fn update_hud(&self) {
            let hud = self.game.hud();
            self.set_text("score", &hud.score.to_string());
            self.set_text("lives", &hud.lives.to_string());
            self.set_text("level", &hud.level.to_string());
        }

        /// React to what happened during the last frame
        fn handle_events(&mut self) {
            for event in self.game.drain_events() {
                match event {
                    GameEvent::LevelComplete { .. } => {
                        self.set_hidden("level-complete-screen", false);
                    }
                    GameEvent::GameOver { score } => {
                        self.set_text("final-score", &score.to_string());
                        self.set_hidden("game-over-screen", false);
                    }
                    GameEvent::GameComplete { score } => {
                        self.set_text("total-score", &score.to_string());
                        self.set_hidden("game-complete-screen", false);
                    }
                    _ => {}
                }
            }
        }

        fn start(&mut self) {
            let seed = js_sys::Date::now() as u64;
            self.game.start_game(seed);
            self.game.drain_events();
            self.show_only(&["game-screen"]);
            self.update_hud();
            log::info!("Game started with seed: {}", seed);
        }

        fn back_to_menu(&mut self) {
            self.game.return_to_menu();
            self.show_only(&["menu-screen"]);
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        log::info!("Star Raiders starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("game-canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let (width, height) = viewport_size(&window);
        let config = GameConfig {
            width: width as f32,
            height: height as f32,
            ..GameConfig::default()
        };

        let seed = js_sys::Date::now() as u64;
        let game = Game::new(config, seed).map_err(|e| JsValue::from_str(&e.to_string()))?;

        let surface = CanvasSurface::new(canvas, ctx);
        surface.resize(width, height);

        let host = Rc::new(RefCell::new(Host {
            game,
            surface,
            document,
            looping: false,
        }));

        {
            let mut h = host.borrow_mut();
            h.show_only(&["menu-screen"]);
            // Paint the background behind the menu
            let Host { game, surface, .. } = &mut *h;
            game.frame(surface);
        }

        setup_menu_buttons(&host);
        setup_game_buttons(&host);
        setup_touch_controls(&host);
        setup_keyboard(&host);
        setup_resize(&host);

        log::info!("Star Raiders ready");
        Ok(())
    }

    fn viewport_size(window: &web_sys::Window) -> (u32, u32) {
        let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        (dim(window.inner_width()) as u32, dim(window.inner_height()) as u32)
    }

    /// Attach a listener to the element with `id`, if it exists
    fn on<F>(host: &Rc<RefCell<Host>>, id: &str, event: &str, handler: F)
    where
        F: FnMut(web_sys::Event) + 'static,
    {
        let Some(el) = host.borrow().document.get_element_by_id(id) else {
            log::warn!("Missing element #{id}");
            return;
        };
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
        let _ = el.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Schedule animation frames again if they stopped
    fn ensure_loop(host: &Rc<RefCell<Host>>) {
        {
            let mut h = host.borrow_mut();
            if h.looping || !h.game.state().is_running() {
                return;
            }
            h.looping = true;
        }
        request_animation_frame(host.clone());
    }

    fn request_animation_frame(host: Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(host);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(host: Rc<RefCell<Host>>) {
        let running = {
            let mut h = host.borrow_mut();
            let Host { game, surface, .. } = &mut *h;
            let running = game.frame(surface);
            h.update_hud();
            h.handle_events();
            h.looping = running;
            running
        };

        if running {
            request_animation_frame(host);
        }
    }

    fn setup_menu_buttons(host: &Rc<RefCell<Host>>) {
        for id in ["play-btn", "restart-btn", "play-again-btn"] {
            let host_ref = host.clone();
            on(host, id, "click", move |_| {
                host_ref.borrow_mut().start();
                ensure_loop(&host_ref);
            });
        }

        for (button, from, to) in [
            ("how-to-play-btn", "menu-screen", "instructions-screen"),
            ("credits-btn", "menu-screen", "credits-screen"),
            ("back-from-instructions", "instructions-screen", "menu-screen"),
            ("back-from-credits", "credits-screen", "menu-screen"),
        ] {
            let host_ref = host.clone();
            on(host, button, "click", move |_| {
                let h = host_ref.borrow();
                h.set_hidden(from, true);
                h.set_hidden(to, false);
            });
        }

        for id in ["return-to-menu-btn", "back-to-menu-btn"] {
            let host_ref = host.clone();
            on(host, id, "click", move |_| {
                host_ref.borrow_mut().back_to_menu();
            });
        }
    }

    fn setup_game_buttons(host: &Rc<RefCell<Host>>) {
        {
            let host_ref = host.clone();
            on(host, "next-level-btn", "click", move |_| {
                {
                    let mut h = host_ref.borrow_mut();
                    if h.game.advance_level() {
                        h.set_hidden("level-complete-screen", true);
                        h.update_hud();
                    }
                }
                ensure_loop(&host_ref);
            });
        }

        let host_ref = host.clone();
        on(host, "shoot-btn", "click", move |_| {
            host_ref.borrow_mut().game.fire_requested();
        });
    }

    fn setup_touch_controls(host: &Rc<RefCell<Host>>) {
        for (id, direction) in [("move-left", Direction::Left), ("move-right", Direction::Right)] {
            for (event, pressed) in [
                ("mousedown", true),
                ("touchstart", true),
                ("mouseup", false),
                ("mouseleave", false),
                ("touchend", false),
            ] {
                let host_ref = host.clone();
                on(host, id, event, move |_| {
                    host_ref
                        .borrow_mut()
                        .game
                        .set_horizontal_input(direction, pressed);
                });
            }
        }
    }

    fn setup_keyboard(host: &Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        for (kind, pressed) in [("keydown", true), ("keyup", false)] {
            let host_ref = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let handled = {
                    let mut h = host_ref.borrow_mut();
                    let phase = h.game.phase();
                    if phase == GamePhase::Menu {
                        false
                    } else {
                        h.game.handle_key(&event.key(), pressed)
                    }
                };
                if handled {
                    // Keep the space bar from scrolling the page
                    event.prevent_default();
                    ensure_loop(&host_ref);
                }
            });
            let _ = window.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(host: &Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        let host_ref = host.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (width, height) = viewport_size(&window);
            let mut h = host_ref.borrow_mut();
            h.surface.resize(width, height);
            h.game.on_resize(width as f32, height as f32);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::process::ExitCode;

    use anyhow::{Context, Result};
    use clap::Parser;
    use star_raiders::autopilot::{Pilot, run_headless};
    use star_raiders::renderer::MeshSurface;
    use star_raiders::{Game, GameConfig};

    #[derive(Parser, Debug)]
    #[command(name = "star-raiders")]
    #[command(about = "Play a seeded headless Star Raiders game with the autopilot")]
    struct Args {
        /// Seed for the game's RNG
        #[arg(long, default_value_t = 1)]
        seed: u64,

        /// Stop after this many simulated frames
        #[arg(long, default_value_t = 36_000)]
        max_frames: u64,

        /// JSON file with game config overrides
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the effective config and exit
        #[arg(long)]
        print_config: bool,

        /// Pretty-print the metrics JSON
        #[arg(long)]
        pretty: bool,
    }

    fn load_config(path: Option<&Path>) -> Result<GameConfig> {
        let Some(path) = path else {
            return Ok(GameConfig::default());
        };
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config = GameConfig::from_json(&json)
            .with_context(|| format!("invalid config in {}", path.display()))?;
        Ok(config)
    }

    fn run(args: &Args) -> Result<()> {
        let config = load_config(args.config.as_deref())?;

        if args.print_config {
            println!("{}", config.to_json());
            return Ok(());
        }

        let (width, height) = (config.width, config.height);
        let mut game = Game::new(config, args.seed).context("invalid config")?;

        log::info!(
            "Star Raiders (native) running seed {} for up to {} frames",
            args.seed,
            args.max_frames
        );

        let mut surface = MeshSurface::new(width, height);
        let metrics = run_headless(
            &mut game,
            &Pilot::default(),
            args.seed,
            args.max_frames,
            &mut surface,
            MeshSurface::vertices,
        );

        let json = if args.pretty {
            serde_json::to_string_pretty(&metrics)
        } else {
            serde_json::to_string(&metrics)
        }
        .context("failed to encode metrics")?;
        println!("{json}");
        Ok(())
    }

    pub fn main() -> ExitCode {
        env_logger::init();
        let args = Args::parse();

        match run(&args) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                log::error!("{e:#}");
                ExitCode::FAILURE
            }
        }
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    native::main()
}
