//! Creature Records
//!
//! The narrow, typed view of the remote payload. The data service returns a
//! large document per creature; only the sprite and cry URLs (plus the name
//! and number, for display) are kept. Unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// Sprite URLs for a creature
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprites {
    /// Front-facing artwork
    #[serde(default)]
    pub front_default: Option<String>,
    /// Back-facing artwork
    #[serde(default)]
    pub back_default: Option<String>,
}

/// Cry (audio clip) URLs for a creature
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cries {
    /// Most recent recording of the cry
    #[serde(default)]
    pub latest: Option<String>,
}

/// One looked-up creature
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureRecord {
    /// National dex number
    #[serde(default)]
    pub id: Option<u32>,
    /// Lowercase species name
    #[serde(default)]
    pub name: Option<String>,
    /// Sprite URLs
    #[serde(default)]
    pub sprites: Sprites,
    /// Cry URLs
    #[serde(default)]
    pub cries: Cries,
}

impl CreatureRecord {
    /// Derive the two-frame animation sequence (front, back).
    ///
    /// A missing sprite is replaced by the one that is present, so a record
    /// with any artwork always yields exactly two frames. Returns `None` when
    /// the record carries no artwork at all.
    #[must_use]
    pub fn animation_frames(&self) -> Option<[String; 2]> {
        let front = non_empty(self.sprites.front_default.as_deref());
        let back = non_empty(self.sprites.back_default.as_deref());

        match (front, back) {
            (Some(f), Some(b)) => Some([f.to_string(), b.to_string()]),
            (Some(only), None) | (None, Some(only)) => Some([only.to_string(), only.to_string()]),
            (None, None) => None,
        }
    }

    /// URL of the cry to play once the record loads
    #[must_use]
    pub fn cry_url(&self) -> Option<&str> {
        non_empty(self.cries.latest.as_deref())
    }

    /// Name for display, falling back to the dex number
    #[must_use]
    pub fn display_name(&self) -> String {
        match (&self.name, self.id) {
            (Some(name), _) if !name.is_empty() => name.clone(),
            (_, Some(id)) => format!("#{id}"),
            _ => "unknown".to_string(),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}
