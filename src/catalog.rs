use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// One title in the shop's inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub name: String,
    pub genre: String,
    pub account_level: u32,
    pub price: f64,
    pub price_debatable: bool,
}

/// The shop's inventory, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Catalog {
    games: Vec<Game>,
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
        let games: Vec<Game> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse catalog file: {}", path.display()))?;
        Ok(Self { games })
    }

    #[cfg(test)]
    pub fn from_games(games: Vec<Game>) -> Self {
        Self { games }
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// All games whose genre matches, ignoring ASCII case.
    pub fn games_in_genre(&self, genre: &str) -> Vec<&Game> {
        self.games
            .iter()
            .filter(|game| game.genre.eq_ignore_ascii_case(genre))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample() -> Catalog {
        Catalog::from_games(vec![
            Game {
                name: "Emberfall Chronicles".to_string(),
                genre: "rpg".to_string(),
                account_level: 60,
                price: 49.99,
                price_debatable: true,
            },
            Game {
                name: "Clockwork Gambit".to_string(),
                genre: "strategy".to_string(),
                account_level: 12,
                price: 19.99,
                price_debatable: false,
            },
            Game {
                name: "Runebound Exiles".to_string(),
                genre: "RPG".to_string(),
                account_level: 35,
                price: 44.99,
                price_debatable: false,
            },
        ])
    }

    #[test]
    fn genre_lookup_ignores_case() {
        let catalog = sample();
        let rpgs = catalog.games_in_genre("Rpg");
        assert_eq!(rpgs.len(), 2);
        assert_eq!(rpgs[0].name, "Emberfall Chronicles");
        assert_eq!(rpgs[1].name, "Runebound Exiles");
    }

    #[test]
    fn unknown_genre_returns_nothing() {
        let catalog = sample();
        assert!(catalog.games_in_genre("racing").is_empty());
    }

    #[test]
    fn loads_a_catalog_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"name": "Prism Shift", "genre": "puzzle", "account_level": 1, "price": 9.99, "price_debatable": true}}]"#
        )
        .unwrap();

        let catalog = Catalog::load(file.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.games()[0].name, "Prism Shift");
        assert!(catalog.games()[0].price_debatable);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = Catalog::load(Path::new("/nonexistent/games.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read catalog file"));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = Catalog::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse catalog file"));
    }
}
