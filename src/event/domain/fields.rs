//! Field-level change tracking between card snapshots.

use crate::card::CardSnapshot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Card field whose change is reported on update events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrackedField {
    /// Card title.
    Title,
    /// Card description.
    Description,
    /// Scheduled date.
    ScheduledDate,
    /// Due date.
    DueDate,
    /// Parent column.
    ParentColumn,
    /// Card type.
    TypeId,
    /// Progress tracking mode.
    ProgressType,
}

impl TrackedField {
    /// Every tracked field.
    pub const ALL: [Self; 7] = [
        Self::Title,
        Self::Description,
        Self::ScheduledDate,
        Self::DueDate,
        Self::ParentColumn,
        Self::TypeId,
        Self::ProgressType,
    ];

    /// Returns the field name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::ScheduledDate => "scheduledDate",
            Self::DueDate => "dueDate",
            Self::ParentColumn => "parentColumn",
            Self::TypeId => "typeId",
            Self::ProgressType => "progressType",
        }
    }

    /// Returns `true` for fields mirrored into external systems.
    #[must_use]
    pub const fn affects_external_sync(self) -> bool {
        matches!(
            self,
            Self::Title | Self::Description | Self::ScheduledDate | Self::DueDate
        )
    }

    fn differs(self, current: &CardSnapshot, previous: &CardSnapshot) -> bool {
        match self {
            Self::Title => current.title() != previous.title(),
            Self::Description => current.description() != previous.description(),
            Self::ScheduledDate => current.scheduled_date() != previous.scheduled_date(),
            Self::DueDate => current.due_date() != previous.due_date(),
            Self::ParentColumn => current.column_id() != previous.column_id(),
            Self::TypeId => current.card_type_id() != previous.card_type_id(),
            Self::ProgressType => current.progress_type() != previous.progress_type(),
        }
    }
}

impl fmt::Display for TrackedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of tracked fields that changed between two snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangedFields(BTreeSet<TrackedField>);

impl ChangedFields {
    /// Returns a set containing every tracked field.
    #[must_use]
    pub fn all() -> Self {
        Self(TrackedField::ALL.into_iter().collect())
    }

    /// Diffs `current` against `previous`.
    ///
    /// Absent optional values compare equal to each other. Without a
    /// previous snapshot every tracked field counts as changed.
    #[must_use]
    pub fn between(current: &CardSnapshot, previous: Option<&CardSnapshot>) -> Self {
        let Some(before) = previous else {
            return Self::all();
        };
        Self(
            TrackedField::ALL
                .into_iter()
                .filter(|field| field.differs(current, before))
                .collect(),
        )
    }

    /// Returns `true` when `field` changed.
    #[must_use]
    pub fn contains(&self, field: TrackedField) -> bool {
        self.0.contains(&field)
    }

    /// Returns `true` when nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of changed fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over the changed fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = TrackedField> + '_ {
        self.0.iter().copied()
    }

    /// Returns `true` when a field mirrored into external systems changed.
    #[must_use]
    pub fn requires_external_sync(&self) -> bool {
        self.0.iter().any(|field| field.affects_external_sync())
    }
}

impl FromIterator<TrackedField> for ChangedFields {
    fn from_iter<I: IntoIterator<Item = TrackedField>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
