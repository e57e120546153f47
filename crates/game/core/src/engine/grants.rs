//! Equip and unequip as single-pass transactions.
//!
//! Equipping an item looks up every item it grants, then creates the ones
//! found in one step. Created items carry `granted_by`, so unequipping or
//! deleting the source removes exactly them. Granted items never grant
//! further items through this path.

use crate::env::ItemSource;
use crate::state::{Character, Item, ItemId};

use super::{ActionError, Notice, RulesEngine};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquipOutcome {
    pub item: ItemId,
    pub equipped: bool,
    pub created: Vec<ItemId>,
    pub removed: Vec<ItemId>,
    /// One warning per grant that could not be found.
    pub notices: Vec<Notice>,
}

impl RulesEngine {
    pub fn set_equipped(
        &self,
        owner: &mut Character,
        item: ItemId,
        equipped: bool,
        source: &dyn ItemSource,
    ) -> Result<EquipOutcome, ActionError> {
        let target = owner.item(item).ok_or(ActionError::ItemNotFound(item))?;
        if equipped && !target.equippable {
            return Err(ActionError::NotEquippable(target.name.clone()));
        }

        let mut outcome = EquipOutcome {
            item,
            equipped,
            ..EquipOutcome::default()
        };
        let plan = if equipped {
            plan_grants(owner, target, source, &mut outcome.notices)
        } else {
            Vec::new()
        };

        if let Some(target) = owner.item_mut(item) {
            target.equipped = equipped;
        }
        if equipped {
            for mut granted in plan {
                granted.granted_by = Some(item);
                granted.equipped = false;
                outcome.created.push(owner.add_item(granted));
            }
        } else {
            outcome.removed = remove_granted(owner, item);
        }
        tracing::debug!(
            actor = %owner.id,
            %item,
            equipped,
            created = outcome.created.len(),
            removed = outcome.removed.len(),
            "equip state changed"
        );
        Ok(outcome)
    }

    /// Deletes an item and everything it granted. Returns the deleted ids,
    /// the item itself first.
    pub fn delete_item(
        &self,
        owner: &mut Character,
        item: ItemId,
    ) -> Result<Vec<ItemId>, ActionError> {
        if owner.item(item).is_none() {
            return Err(ActionError::ItemNotFound(item));
        }
        Ok(remove_with_grants(owner, item))
    }
}

/// Templates to create for `source`, skipping grants already present.
fn plan_grants(
    owner: &Character,
    source: &Item,
    items: &dyn ItemSource,
    notices: &mut Vec<Notice>,
) -> Vec<Item> {
    let mut plan: Vec<Item> = Vec::new();
    for spec in source.granted_items.iter().filter(|spec| spec.is_valid()) {
        let Some(template) = items.lookup(spec) else {
            tracing::warn!(source = %source.name, grant = %spec.describe(), "granted item not found");
            notices.push(Notice::warn(format!(
                "Objet accordé introuvable : {}.",
                spec.describe()
            )));
            continue;
        };
        let present = owner
            .granted_by(source.id)
            .chain(plan.iter())
            .any(|existing| existing.name == template.name);
        if !present {
            plan.push(template);
        }
    }
    plan
}

fn remove_granted(owner: &mut Character, source: ItemId) -> Vec<ItemId> {
    let granted: Vec<ItemId> = owner.granted_by(source).map(|item| item.id).collect();
    for id in &granted {
        owner.remove_item(*id);
    }
    granted
}

pub(super) fn remove_with_grants(owner: &mut Character, item: ItemId) -> Vec<ItemId> {
    let mut removed = Vec::new();
    if owner.remove_item(item).is_some() {
        removed.push(item);
    }
    removed.extend(remove_granted(owner, item));
    removed
}
