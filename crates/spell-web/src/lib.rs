pub mod runner;
pub mod speech;
pub mod storage;

pub use runner::GameRunner;
pub use storage::BrowserStore;
pub use spell_engine::Command;

/// Generate all `#[wasm_bindgen]` exports for a game.
///
/// This macro generates:
/// - `thread_local!` storage for the GameRunner
/// - `with_runner()` helper function
/// - All wasm-bindgen exports (game_init, game_tick, player commands, JSON accessors)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
///
/// mod game;
/// use game::MyGame;
///
/// spell_web::export_game!(MyGame, "my-game");
/// ```
///
/// # Arguments
///
/// - `$game_type`: A type implementing `spell_engine::GameContent` with a `new()` constructor
/// - `$game_name`: A string literal used in the initialization log message
#[macro_export]
macro_rules! export_game {
    ($game_type:ty, $game_name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::GameRunner<$crate::BrowserStore>>> =
                RefCell::new(None);
        }

        fn with_runner<R: Default>(
            f: impl FnOnce(&mut $crate::GameRunner<$crate::BrowserStore>) -> R,
        ) -> R {
            RUNNER.with(|cell| match cell.borrow_mut().as_mut() {
                Some(runner) => f(runner),
                None => {
                    log::warn!("{}: call game_init() first", $game_name);
                    R::default()
                }
            })
        }

        #[wasm_bindgen]
        pub fn game_init() {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
            let store = $crate::BrowserStore::open();
            match $crate::GameRunner::new(<$game_type>::new(), store, seed) {
                Ok(runner) => {
                    RUNNER.with(|cell| {
                        *cell.borrow_mut() = Some(runner);
                    });
                    log::info!("{}: initialized", $game_name);
                }
                Err(e) => log::error!("{}: could not load catalog: {}", $game_name, e),
            }
        }

        /// Apply queued commands, speak what they asked for, refresh the event list.
        #[wasm_bindgen]
        pub fn game_tick() {
            with_runner(|r| {
                for request in r.tick() {
                    $crate::speech::speak(&request, r.config());
                }
            });
        }

        // ---- Player commands ----

        /// Returns the refusal reason, or an empty string when logged in.
        #[wasm_bindgen]
        pub fn game_login(name: &str, avatar: &str) -> String {
            with_runner(|r| r.login(name, avatar))
        }

        #[wasm_bindgen]
        pub fn game_logout() {
            with_runner(|r| r.push_command($crate::Command::Logout));
        }

        #[wasm_bindgen]
        pub fn game_start_level(level_id: u32) {
            with_runner(|r| r.start_level(level_id));
        }

        #[wasm_bindgen]
        pub fn game_resume_level(level_id: u32) {
            with_runner(|r| r.resume_level(level_id));
        }

        #[wasm_bindgen]
        pub fn game_select_letter(token: u32) {
            with_runner(|r| r.select_letter(token));
        }

        #[wasm_bindgen]
        pub fn game_deselect_letter(token: u32) {
            with_runner(|r| r.deselect_letter(token));
        }

        #[wasm_bindgen]
        pub fn game_submit() {
            with_runner(|r| r.push_command($crate::Command::Submit));
        }

        #[wasm_bindgen]
        pub fn game_retry() {
            with_runner(|r| r.push_command($crate::Command::Retry));
        }

        #[wasm_bindgen]
        pub fn game_advance() {
            with_runner(|r| r.push_command($crate::Command::Advance));
        }

        #[wasm_bindgen]
        pub fn game_speak(text: &str) {
            with_runner(|r| r.push_command($crate::Command::Speak(text.to_string())));
        }

        #[wasm_bindgen]
        pub fn game_reset() {
            with_runner(|r| r.push_command($crate::Command::Reset));
        }

        // ---- JSON accessors ----

        #[wasm_bindgen]
        pub fn get_events_json() -> String {
            with_runner(|r| r.events_json())
        }

        #[wasm_bindgen]
        pub fn get_profile_json() -> String {
            with_runner(|r| r.profile_json())
        }

        #[wasm_bindgen]
        pub fn get_session_json() -> String {
            with_runner(|r| r.session_json())
        }

        #[wasm_bindgen]
        pub fn get_level_map_json() -> String {
            with_runner(|r| r.level_map_json())
        }

        #[wasm_bindgen]
        pub fn get_dashboard_json() -> String {
            with_runner(|r| r.dashboard_json())
        }

        #[wasm_bindgen]
        pub fn get_pupil_report_json(name: &str) -> String {
            with_runner(|r| r.pupil_report_json(name))
        }

        #[wasm_bindgen]
        pub fn get_avatars_json() -> String {
            with_runner(|r| r.avatars_json())
        }
    };
}
