use log::info;

use crate::model::{CharacterItem, ItemSlot, UserProfile};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShopError {
    #[error("{item} costs {price} coins but only {balance} are available")]
    InsufficientCoins {
        item: String,
        price: u64,
        balance: u64,
    },
    #[error("no item with id {0}")]
    UnknownItem(String),
}

const CATALOGUE: &[(&str, ItemSlot, &str, &str, u64)] = &[
    ("hat_1", ItemSlot::Hat, "Crown", "👑", 100),
    ("hat_2", ItemSlot::Hat, "Top Hat", "🎩", 150),
    ("hat_3", ItemSlot::Hat, "Graduation Cap", "🎓", 200),
    ("hat_4", ItemSlot::Hat, "Party Hat", "🎉", 120),
    ("hat_5", ItemSlot::Hat, "Knight Helmet", "🪖", 350),
    ("hat_6", ItemSlot::Hat, "Pirate Hat", "🏴‍☠️", 280),
    ("clothes_1", ItemSlot::Clothes, "Superhero Cape", "🦸", 250),
    ("clothes_2", ItemSlot::Clothes, "Space Suit", "🚀", 300),
    ("clothes_3", ItemSlot::Clothes, "Ninja Outfit", "🥷", 280),
    ("clothes_4", ItemSlot::Clothes, "Royal Robe", "🤴", 400),
    ("clothes_5", ItemSlot::Clothes, "Lab Coat", "🧑‍🔬", 320),
    ("acc_1", ItemSlot::Accessory, "Star Wand", "⭐", 180),
    ("acc_2", ItemSlot::Accessory, "Spell Book", "📚", 160),
    ("acc_3", ItemSlot::Accessory, "Trophy", "🏆", 220),
    ("acc_4", ItemSlot::Accessory, "Shield of Courage", "🛡️", 260),
    ("acc_5", ItemSlot::Accessory, "Shining Gem", "💎", 320),
    ("char_1", ItemSlot::Character, "Bright Smile", "😀", 350),
    ("char_2", ItemSlot::Character, "Sunglasses Hero", "😎", 400),
    ("char_3", ItemSlot::Character, "Star Struck", "🤩", 420),
    ("char_4", ItemSlot::Character, "Wizard", "🧙", 380),
    ("char_5", ItemSlot::Character, "Astronaut", "👨‍🚀", 450),
];

/// Items for sale, none owned.
pub fn catalogue() -> Vec<CharacterItem> {
    CATALOGUE
        .iter()
        .map(|&(id, slot, name, image, price)| CharacterItem {
            id: id.to_string(),
            slot,
            name: name.to_string(),
            image: image.to_string(),
            price,
            owned: false,
            equipped: false,
        })
        .collect()
}

pub fn find_item(item_id: &str) -> Option<CharacterItem> {
    catalogue().into_iter().find(|item| item.id == item_id)
}

/// Buys `item`, equipping it in place of whatever occupied its slot.
pub fn purchase(profile: &mut UserProfile, item: &CharacterItem) -> Result<(), ShopError> {
    if !profile.spend_coins(item.price) {
        return Err(ShopError::InsufficientCoins {
            item: item.name.clone(),
            price: item.price,
            balance: profile.coins,
        });
    }
    let items = &mut profile.character.items;
    items.retain(|existing| existing.id != item.id);
    for existing in items.iter_mut().filter(|i| i.slot == item.slot) {
        existing.equipped = false;
    }
    items.push(CharacterItem {
        owned: true,
        equipped: true,
        ..item.clone()
    });
    info!(target: "shop", "Purchased {} for {} coins", item.id, item.price);
    Ok(())
}

/// Toggles an owned item. Equipping clears the rest of its slot.
pub fn toggle_equipped(profile: &mut UserProfile, item_id: &str) -> Result<bool, ShopError> {
    let items = &mut profile.character.items;
    let target = items
        .iter()
        .find(|i| i.id == item_id)
        .map(|i| (i.slot, !i.equipped))
        .ok_or_else(|| ShopError::UnknownItem(item_id.to_string()))?;
    let (slot, equipping) = target;
    for item in items.iter_mut() {
        if item.id == item_id {
            item.equipped = equipping;
        } else if equipping && item.slot == slot {
            item.equipped = false;
        }
    }
    profile.touch();
    Ok(equipping)
}
