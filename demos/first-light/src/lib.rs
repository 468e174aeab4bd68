use wasm_bindgen::prelude::*;

mod game;
mod pause;

pub use game::FirstLight;

glade_web::export_game!(FirstLight, "first-light");
