pub mod canvas;
pub mod runner;

pub use canvas::CanvasSurface;
pub use runner::GameRunner;
pub use web_sys;

/// Generate all `#[wasm_bindgen]` exports for a game.
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
///
/// mod game;
/// use game::MyGame;
///
/// glade_web::export_game!(MyGame, "my-game");
/// ```
///
/// # Arguments
///
/// - `$game_type`: a type implementing `glade_engine::Game` with a `new()`
///   constructor
/// - `$game_name`: a string literal used in the initialization log message
///
/// The calling crate depends on `wasm-bindgen`, `log`, `console_log` and
/// `console_error_panic_hook`.
#[macro_export]
macro_rules! export_game {
    ($game_type:ty, $game_name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::GameRunner<$game_type>>> = RefCell::new(None);
        }

        fn with_runner<R>(f: impl FnOnce(&mut $crate::GameRunner<$game_type>) -> R) -> Option<R> {
            RUNNER.with(|cell| cell.borrow_mut().as_mut().map(f))
        }

        #[wasm_bindgen]
        pub fn game_init(canvas_id: &str) -> Result<(), JsValue> {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let runner = $crate::GameRunner::new(<$game_type>::new(), canvas_id)?;
            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });

            with_runner(|r| r.init());
            log::info!("{}: initialized", $game_name);
            Ok(())
        }

        #[wasm_bindgen]
        pub fn game_frame(timestamp_ms: f64) {
            with_runner(|r| r.frame(timestamp_ms));
        }

        #[wasm_bindgen]
        pub fn game_button_down(code: u32) {
            with_runner(|r| r.push_button(code, true));
        }

        #[wasm_bindgen]
        pub fn game_button_up(code: u32) {
            with_runner(|r| r.push_button(code, false));
        }

        #[wasm_bindgen]
        pub fn game_register_image(id: u32, image: $crate::web_sys::HtmlImageElement) {
            with_runner(|r| r.register_image(id, image));
        }

        #[wasm_bindgen]
        pub fn game_drain_audio() -> String {
            with_runner(|r| r.drain_audio_json()).unwrap_or_else(|| "[]".to_string())
        }
    };
}
