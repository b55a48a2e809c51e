use std::collections::BTreeMap;

use maze_tracks::{normalize_facing, ItemId, ItemSpawn, Vec3};
use serde::Serialize;

/// Facing units turned on the first update after a hit.
const SPIN_START_RATE: i32 = 64;
/// Rate lost per update until the item comes to rest.
const SPIN_DECAY: i32 = 4;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub id: ItemId,
    pub animation: u32,
    pub position: Vec3,
    pub facing: i32,
    pub height: u32,
    pub width: u32,
    pub targetable: bool,
    /// Shown on screen and blocking paths.
    pub obstacle: bool,
    pub enemy: bool,
    /// Remaining spin rate; zero when the item is at rest.
    pub spin_rate: i32,
}

impl Item {
    pub fn is_spinning(&self) -> bool {
        self.spin_rate > 0
    }
}

/// Items currently placed in the maze set.
#[derive(Debug, Default, Clone)]
pub struct ItemStore {
    records: BTreeMap<ItemId, Item>,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places `spawn` at `position`, replacing any earlier record.
    pub fn add_to_world(&mut self, spawn: &ItemSpawn, position: Vec3) -> bool {
        let item = Item {
            id: spawn.item,
            animation: spawn.animation,
            position,
            facing: normalize_facing(spawn.facing),
            height: spawn.height,
            width: spawn.width,
            targetable: spawn.targetable,
            obstacle: spawn.obstacle,
            enemy: spawn.enemy,
            spin_rate: 0,
        };
        self.records.insert(spawn.item, item).is_some()
    }

    pub fn remove(&mut self, id: ItemId) -> Option<Item> {
        self.records.remove(&id)
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.records.get(&id)
    }

    pub fn is_present(&self, id: ItemId) -> bool {
        self.records.contains_key(&id)
    }

    pub fn is_visible(&self, id: ItemId) -> bool {
        self.get(id).map(|item| item.obstacle).unwrap_or(false)
    }

    pub fn is_target(&self, id: ItemId) -> bool {
        self.get(id).map(|item| item.targetable).unwrap_or(false)
    }

    pub fn is_enemy(&self, id: ItemId) -> bool {
        self.get(id).map(|item| item.enemy).unwrap_or(false)
    }

    pub fn is_spinning(&self, id: ItemId) -> bool {
        self.get(id).map(Item::is_spinning).unwrap_or(false)
    }

    pub fn facing(&self, id: ItemId) -> Option<i32> {
        self.get(id).map(|item| item.facing)
    }

    /// Returns `Some(changed)`, or `None` when the item is not in the world.
    pub fn set_target(&mut self, id: ItemId, targetable: bool) -> Option<bool> {
        let item = self.records.get_mut(&id)?;
        Some(std::mem::replace(&mut item.targetable, targetable) != targetable)
    }

    pub fn set_obstacle(&mut self, id: ItemId, obstacle: bool) -> Option<bool> {
        let item = self.records.get_mut(&id)?;
        Some(std::mem::replace(&mut item.obstacle, obstacle) != obstacle)
    }

    pub fn set_enemy(&mut self, id: ItemId, enemy: bool) -> Option<bool> {
        let item = self.records.get_mut(&id)?;
        Some(std::mem::replace(&mut item.enemy, enemy) != enemy)
    }

    /// Stores `facing` folded onto the circle.
    pub fn set_facing(&mut self, id: ItemId, facing: i32) -> bool {
        match self.records.get_mut(&id) {
            Some(item) => {
                item.facing = normalize_facing(facing);
                true
            }
            None => false,
        }
    }

    pub fn set_position(&mut self, id: ItemId, position: Vec3) -> bool {
        match self.records.get_mut(&id) {
            Some(item) => {
                item.position = position;
                true
            }
            None => false,
        }
    }

    pub fn spin_in_world(&mut self, id: ItemId) -> bool {
        match self.records.get_mut(&id) {
            Some(item) => {
                item.spin_rate = SPIN_START_RATE;
                true
            }
            None => false,
        }
    }

    /// Advances every spinning item by one update and returns the ones that
    /// came to rest.
    pub fn advance_spins(&mut self) -> Vec<ItemId> {
        let mut settled = Vec::new();
        for item in self.records.values_mut().filter(|item| item.is_spinning()) {
            item.facing = normalize_facing(item.facing + item.spin_rate);
            item.spin_rate = (item.spin_rate - SPIN_DECAY).max(0);
            if !item.is_spinning() {
                settled.push(item.id);
            }
        }
        settled
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.records.values()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.records.len()
    }
}
