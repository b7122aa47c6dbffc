//! FILENAME: core/band-report/src/definition.rs
//! Group Definitions - Named groups and the key-based grouping policy.
//!
//! Groups are listed outer to inner, the way a report designer lists them:
//! `groups[0]` is the most general group. With N groups, `groups[i]` is
//! level N - i, so the innermost group is level 1 and level N+1 is the
//! whole report.

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use band_engine::{Aggregate, BandError, GroupingPolicy};
use serde::{Deserialize, Serialize};

use crate::key::GroupKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Ascending
    }
}

pub type KeyFn<R> = Rc<dyn Fn(&R) -> GroupKey>;

// ============================================================================
// GROUP DEFINITION
// ============================================================================

/// One group of a report: a name, a key extracted from each row, and the
/// direction groups are ordered in.
pub struct GroupDef<R> {
    pub name: String,
    pub order: SortOrder,
    key: KeyFn<R>,
}

impl<R> GroupDef<R> {
    pub fn new<K, F>(name: impl Into<String>, key: F) -> Self
    where
        K: Into<GroupKey>,
        F: Fn(&R) -> K + 'static,
    {
        GroupDef {
            name: name.into(),
            order: SortOrder::Ascending,
            key: Rc::new(move |row| key(row).into()),
        }
    }

    pub fn descending(mut self) -> Self {
        self.order = SortOrder::Descending;
        self
    }

    pub fn key(&self, row: &R) -> GroupKey {
        (self.key)(row)
    }

    pub fn compare(&self, a: &R, b: &R) -> Ordering {
        let ord = self.key(a).cmp(&self.key(b));
        match self.order {
            SortOrder::Ascending => ord,
            SortOrder::Descending => ord.reverse(),
        }
    }
}

impl<R> Clone for GroupDef<R> {
    fn clone(&self) -> Self {
        GroupDef {
            name: self.name.clone(),
            order: self.order,
            key: Rc::clone(&self.key),
        }
    }
}

impl<R> fmt::Debug for GroupDef<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupDef")
            .field("name", &self.name)
            .field("order", &self.order)
            .finish()
    }
}

// ============================================================================
// KEYED POLICY
// ============================================================================

/// Grouping policy built from an outer-to-inner list of group definitions
/// and an aggregate factory `(level, level_count) -> A`.
pub struct KeyedPolicy<R, A> {
    groups: Vec<GroupDef<R>>,
    factory: Rc<dyn Fn(usize, usize) -> A>,
}

impl<R, A> KeyedPolicy<R, A> {
    pub fn new(factory: impl Fn(usize, usize) -> A + 'static) -> Self {
        KeyedPolicy {
            groups: Vec::new(),
            factory: Rc::new(factory),
        }
    }

    /// Appends a group inside the ones already added.
    pub fn group(mut self, def: GroupDef<R>) -> Self {
        self.groups.push(def);
        self
    }

    pub fn groups(&self) -> &[GroupDef<R>] {
        &self.groups
    }

    pub fn grand_level(&self) -> usize {
        self.groups.len() + 1
    }

    /// Position of the group at `level` in the outer-to-inner list.
    pub fn group_index(&self, level: usize) -> Result<usize, BandError> {
        let count = self.groups.len();
        if level == 0 || level > count {
            return Err(BandError::LevelOutOfRange { level, max: count });
        }
        Ok(count - level)
    }

    pub fn group_for_level(&self, level: usize) -> Result<&GroupDef<R>, BandError> {
        let index = self.group_index(level)?;
        Ok(&self.groups[index])
    }

    /// Level of the group at `index` in the outer-to-inner list.
    pub fn level_for_group(&self, index: usize) -> Option<usize> {
        (index < self.groups.len()).then(|| self.groups.len() - index)
    }

    /// The key of `row` for the group at `level`.
    pub fn key_at(&self, row: &R, level: usize) -> Result<GroupKey, BandError> {
        Ok(self.group_for_level(level)?.key(row))
    }
}

impl<R, A> Clone for KeyedPolicy<R, A> {
    fn clone(&self) -> Self {
        KeyedPolicy {
            groups: self.groups.clone(),
            factory: Rc::clone(&self.factory),
        }
    }
}

impl<R, A> fmt::Debug for KeyedPolicy<R, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedPolicy")
            .field("groups", &self.groups)
            .finish()
    }
}

impl<R, A: Aggregate<R>> GroupingPolicy for KeyedPolicy<R, A> {
    type Row = R;
    type Aggregate = A;

    fn level_count(&self) -> usize {
        self.groups.len()
    }

    fn compare_level(&self, a: &R, b: &R, level: usize) -> Result<Ordering, BandError> {
        Ok(self.group_for_level(level)?.compare(a, b))
    }

    fn new_aggregate(&self, level: usize) -> Result<A, BandError> {
        let max = self.grand_level();
        if level == 0 || level > max {
            return Err(BandError::LevelOutOfRange { level, max });
        }
        Ok((self.factory)(level, self.groups.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregates::RowCount;

    #[derive(Debug)]
    struct Order {
        country: &'static str,
        year: i64,
    }

    fn policy() -> KeyedPolicy<Order, RowCount> {
        KeyedPolicy::new(RowCount::for_level)
            .group(GroupDef::new("Country", |o: &Order| o.country))
            .group(GroupDef::new("Year", |o: &Order| o.year).descending())
    }

    #[test]
    fn test_outer_group_is_highest_level() {
        let policy = policy();

        assert_eq!(policy.level_count(), 2);
        assert_eq!(policy.group_for_level(2).unwrap().name, "Country");
        assert_eq!(policy.group_for_level(1).unwrap().name, "Year");
        assert_eq!(policy.level_for_group(0), Some(2));
        assert_eq!(policy.level_for_group(1), Some(1));
        assert_eq!(policy.level_for_group(2), None);
    }

    #[test]
    fn test_descending_group_reverses_order() {
        let policy = policy();
        let old = Order { country: "NL", year: 2020 };
        let new = Order { country: "NL", year: 2024 };

        assert_eq!(policy.compare_level(&old, &new, 1), Ok(Ordering::Greater));
        assert_eq!(policy.compare_level(&old, &new, 2), Ok(Ordering::Equal));
    }

    #[test]
    fn test_out_of_range_levels() {
        let policy = policy();
        let row = Order { country: "BE", year: 2021 };

        assert_eq!(
            policy.compare_level(&row, &row, 3),
            Err(BandError::LevelOutOfRange { level: 3, max: 2 })
        );
        assert_eq!(
            policy.key_at(&row, 0),
            Err(BandError::LevelOutOfRange { level: 0, max: 2 })
        );
        assert!(policy.new_aggregate(3).is_ok());
        assert_eq!(
            policy.new_aggregate(4).err(),
            Some(BandError::LevelOutOfRange { level: 4, max: 3 })
        );
    }

    #[test]
    fn test_factory_receives_level_and_count() {
        let agg = policy().new_aggregate(3).unwrap();
        assert_eq!(agg.level(), 3);
        assert!(agg.is_grand_total());
    }

    #[test]
    fn test_key_at_level() {
        let policy = policy();
        let row = Order { country: "FR", year: 2022 };

        assert_eq!(policy.key_at(&row, 2).unwrap(), GroupKey::from("FR"));
        assert_eq!(policy.key_at(&row, 1).unwrap(), GroupKey::from(2022i64));
    }

    #[test]
    fn test_large_integer_keys_form_separate_groups() {
        let policy: KeyedPolicy<i64, RowCount> =
            KeyedPolicy::new(RowCount::for_level).group(GroupDef::new("Id", |id: &i64| *id));
        let a = 9_007_199_254_740_992i64;
        let b = a + 1;

        assert_eq!(policy.compare_level(&a, &b, 1), Ok(Ordering::Less));
        assert_eq!(policy.key_at(&b, 1).unwrap().to_string(), "9007199254740993");
    }
}
