use crate::app::App;
use crate::logging::init_logging;
use crate::orbit_game::OrbitGame;

pub mod app;
pub mod debug;
pub mod game;
pub mod graphics;
pub mod input;
pub mod logging;
pub mod orbit_game;
pub mod text;
pub mod texture;

fn main() -> anyhow::Result<()> {
    init_logging();

    let game = OrbitGame::new();
    let app = App::new(game);
    app.run()
}
