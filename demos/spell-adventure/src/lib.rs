use wasm_bindgen::prelude::*;

mod game;
use game::SpellAdventure;

spell_web::export_game!(SpellAdventure, "spell-adventure");
