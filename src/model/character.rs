use serde::{Deserialize, Serialize};

pub const EXPERIENCE_PER_LEVEL: u32 = 100;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ItemSlot {
    Hat,
    Clothes,
    Accessory,
    Character,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CharacterItem {
    pub id: String,
    pub slot: ItemSlot,
    pub name: String,
    pub image: String,
    pub price: u64,
    pub owned: bool,
    pub equipped: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Character {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub level: u32,
    pub experience: u32,
    pub items: Vec<CharacterItem>,
}

impl Default for Character {
    fn default() -> Self {
        Self {
            id: "char_1".to_string(),
            name: "Math Explorer".to_string(),
            avatar: "🙂".to_string(),
            level: 1,
            experience: 0,
            items: vec![],
        }
    }
}

impl Character {
    pub fn level_for(experience: u32) -> u32 {
        experience / EXPERIENCE_PER_LEVEL + 1
    }

    /// Adds experience and recomputes the level; returns `true` on level up.
    pub fn gain_experience(&mut self, amount: u32) -> bool {
        let old_level = self.level;
        self.experience += amount;
        self.level = Self::level_for(self.experience);
        self.level > old_level
    }

    pub fn equipped(&self, slot: ItemSlot) -> Option<&CharacterItem> {
        self.items.iter().find(|item| item.slot == slot && item.equipped)
    }
}
