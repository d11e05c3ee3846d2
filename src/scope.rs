//! Which resources a policy protects.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::calendar::Named;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupType {
    AllSubscriptions,
    SelectedItems,
}

impl Named for BackupType {
    const NAMES: &'static [(&'static str, Self)] = &[
        ("AllSubscriptions", Self::AllSubscriptions),
        ("SelectedItems", Self::SelectedItems),
    ];
}

/// Matches resources carrying tag `name` with value `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagPredicate {
    pub name: String,
    pub value: String,
}

/// Matches resources carrying every tag of the group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagGroup {
    pub name: String,
    #[serde(default)]
    pub tags: Vec<TagPredicate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubscriptionRef {
    subscription_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct IdRef {
    id: String,
}

/// Inclusion or exclusion set. Lists keep the absent/empty distinction so
/// that what was declared is what is sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemSet {
    pub subscriptions: Option<Vec<String>>,
    pub resource_groups: Option<Vec<String>>,
    pub virtual_machines: Option<Vec<String>>,
    pub tags: Option<Vec<TagPredicate>>,
    pub tag_groups: Option<Vec<TagGroup>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawItems {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subscriptions: Option<Vec<SubscriptionRef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    resource_groups: Option<Vec<IdRef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    virtual_machines: Option<Vec<IdRef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tags: Option<Vec<TagPredicate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tag_groups: Option<Vec<TagGroup>>,
}

fn ids(refs: Vec<IdRef>) -> Vec<String> {
    refs.into_iter().map(|r| r.id).collect()
}

fn id_refs(ids: &[String]) -> Vec<IdRef> {
    ids.iter().map(|id| IdRef { id: id.clone() }).collect()
}

impl ItemSet {
    /// True when no list holds a single predicate.
    pub fn is_empty(&self) -> bool {
        fn none<T>(list: &Option<Vec<T>>) -> bool {
            list.as_ref().map_or(true, Vec::is_empty)
        }
        none(&self.subscriptions)
            && none(&self.resource_groups)
            && none(&self.virtual_machines)
            && none(&self.tags)
            && none(&self.tag_groups)
    }

    pub(crate) fn from_raw(raw: RawItems) -> Self {
        Self {
            subscriptions: raw
                .subscriptions
                .map(|s| s.into_iter().map(|s| s.subscription_id).collect()),
            resource_groups: raw.resource_groups.map(ids),
            virtual_machines: raw.virtual_machines.map(ids),
            tags: raw.tags,
            tag_groups: raw.tag_groups,
        }
    }

    pub(crate) fn to_raw(&self) -> RawItems {
        RawItems {
            subscriptions: self.subscriptions.as_ref().map(|s| {
                s.iter()
                    .map(|id| SubscriptionRef {
                        subscription_id: id.clone(),
                    })
                    .collect()
            }),
            resource_groups: self.resource_groups.as_deref().map(id_refs),
            virtual_machines: self.virtual_machines.as_deref().map(id_refs),
            tags: self.tags.clone(),
            tag_groups: self.tag_groups.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionScope {
    AllSubscriptions {
        excluded: Option<ItemSet>,
    },
    SelectedItems {
        included: ItemSet,
        excluded: Option<ItemSet>,
    },
}

impl SelectionScope {
    pub fn backup_type(&self) -> BackupType {
        match self {
            SelectionScope::AllSubscriptions { .. } => BackupType::AllSubscriptions,
            SelectionScope::SelectedItems { .. } => BackupType::SelectedItems,
        }
    }

    pub fn included(&self) -> Option<&ItemSet> {
        match self {
            SelectionScope::AllSubscriptions { .. } => None,
            SelectionScope::SelectedItems { included, .. } => Some(included),
        }
    }

    pub fn excluded(&self) -> Option<&ItemSet> {
        match self {
            SelectionScope::AllSubscriptions { excluded }
            | SelectionScope::SelectedItems { excluded, .. } => excluded.as_ref(),
        }
    }

    /// Builds the scope from the flat `backupType`/`selectedItems`/`excludedItems` triple.
    pub(crate) fn from_parts(
        backup_type: Option<String>,
        selected: Option<RawItems>,
        excluded: Option<RawItems>,
    ) -> Result<Option<Self>> {
        let backup_type = match backup_type {
            Some(t) => BackupType::parse("backup_type", &t)?,
            None => {
                if selected.is_some() || excluded.is_some() {
                    return Err(Error::validation(
                        "backup_type",
                        "required when selected_items or excluded_items is set",
                    ));
                }
                return Ok(None);
            }
        };
        let excluded = excluded.map(ItemSet::from_raw);

        match backup_type {
            BackupType::AllSubscriptions => {
                if selected.is_some() {
                    return Err(Error::validation(
                        "selected_items",
                        "not allowed when backup_type is AllSubscriptions",
                    ));
                }
                Ok(Some(SelectionScope::AllSubscriptions { excluded }))
            }
            BackupType::SelectedItems => {
                let included = selected.map(ItemSet::from_raw).unwrap_or_default();
                if included.is_empty() {
                    return Err(Error::IncompleteScope);
                }
                Ok(Some(SelectionScope::SelectedItems { included, excluded }))
            }
        }
    }

    pub(crate) fn to_parts(&self) -> (String, Option<RawItems>, Option<RawItems>) {
        (
            self.backup_type().name().to_string(),
            self.included().map(ItemSet::to_raw),
            self.excluded().map(ItemSet::to_raw),
        )
    }

    /// Excluded virtual machines that can never match anything included.
    ///
    /// Only decidable when the inclusion names virtual machines and nothing
    /// broader; such exclusions are accepted and have no effect.
    pub fn ineffective_exclusions(&self) -> Vec<String> {
        let (included, excluded) = match self {
            SelectionScope::SelectedItems {
                included,
                excluded: Some(excluded),
            } => (included, excluded),
            _ => return Vec::new(),
        };

        let broader = [
            included.subscriptions.as_ref().map_or(0, Vec::len),
            included.resource_groups.as_ref().map_or(0, Vec::len),
            included.tags.as_ref().map_or(0, Vec::len),
            included.tag_groups.as_ref().map_or(0, Vec::len),
        ];
        if broader.iter().any(|n| *n > 0) {
            return Vec::new();
        }

        let vms = included
            .virtual_machines
            .iter()
            .flatten()
            .collect::<HashSet<_>>();
        excluded
            .virtual_machines
            .iter()
            .flatten()
            .filter(|id| !vms.contains(id))
            .cloned()
            .collect()
    }
}
