use spell_engine::{Catalog, CatalogError, GameConfig, GameContent};

pub struct SpellAdventure;

impl SpellAdventure {
    pub fn new() -> Self {
        Self
    }
}

impl GameContent for SpellAdventure {
    fn config(&self) -> GameConfig {
        GameConfig {
            storage_prefix: "spelladventure".to_string(),
            ..GameConfig::default()
        }
    }

    fn catalog(&self) -> Result<Catalog, CatalogError> {
        Catalog::builtin()
    }
}
