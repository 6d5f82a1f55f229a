// src/types.rs

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Steam app id of a game.
pub type GameId = u32;

/// Catalog category of a game.
///
/// The game list tags every entry with one of these; entries without a tag
/// are ordinary games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    Normal,
    Demo,
    Mod,
    Junk,
}

impl GameKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::Normal => "normal",
            GameKind::Demo => "demo",
            GameKind::Mod => "mod",
            GameKind::Junk => "junk",
        }
    }
}

impl Default for GameKind {
    fn default() -> Self {
        GameKind::Normal
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "normal" => Ok(GameKind::Normal),
            "demo" => Ok(GameKind::Demo),
            "mod" => Ok(GameKind::Mod),
            "junk" => Ok(GameKind::Junk),
            other => Err(format!(
                "invalid game kind: {other} (expected \"normal\", \"demo\", \"mod\" or \"junk\")"
            )),
        }
    }
}

/// One unit of work: a game that should get a helper process.
///
/// Work items are handed to the runner as an ordered `Vec`; the order is the
/// start priority. The runner never mutates them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub id: GameId,
    pub name: String,
    pub kind: GameKind,
}

impl WorkItem {
    pub fn new(id: GameId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: GameKind::Normal,
        }
    }

    pub fn with_kind(mut self, kind: GameKind) -> Self {
        self.kind = kind;
        self
    }
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.id)
        } else {
            write!(f, "{} ({})", self.id, self.name)
        }
    }
}
