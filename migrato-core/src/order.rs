use parse_display::{Display, FromStr};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::MigrationEntry;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("migration name `{0}` has no timestamp prefix")]
    MissingTimestamp(String),

    #[error("migration name `{0}` has a timestamp component out of range")]
    TimestampOverflow(String),
}

/// Creation order encoded in a migration name.
///
/// The name may start with an ASCII letter prefix (`m`, `V`, `M`), optionally
/// followed by `_`, then a run of digits and any further `_` separated digit
/// groups: `m_001_create_users` → `[1]`, `m190101_120000_init` →
/// `[190101, 120000]`, `M190101120000CreateUser` → `[190101120000]`,
/// `20240101120000-add-email` → `[20240101120000]`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SortKey(Vec<u64>);

fn split_digits(value: &str) -> (&str, &str) {
    let len = value.bytes().take_while(u8::is_ascii_digit).count();
    value.split_at(len)
}

fn to_group(name: &str, digits: &str) -> Result<u64, NameError> {
    digits
        .parse()
        .map_err(|_| NameError::TimestampOverflow(name.to_owned()))
}

impl SortKey {
    pub fn parse(name: &str) -> Result<Self, NameError> {
        let rest = name.trim_start_matches(|c: char| c.is_ascii_alphabetic());
        let rest = rest.strip_prefix('_').unwrap_or(rest);

        let (first, mut rest) = split_digits(rest);
        if first.is_empty() {
            return Err(NameError::MissingTimestamp(name.to_owned()));
        }

        let mut groups = vec![to_group(name, first)?];
        while let Some(tail) = rest.strip_prefix('_') {
            let (group, after) = split_digits(tail);
            if group.is_empty() || !(after.is_empty() || after.starts_with('_')) {
                break;
            }

            groups.push(to_group(name, group)?);
            rest = after;
        }

        Ok(Self(groups))
    }

    pub fn groups(&self) -> &[u64] {
        &self.0
    }
}

/// Display order of migration leaves inside a location.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, FromStr, Serialize, Deserialize,
)]
#[display(style = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    NewestFirst,
    #[default]
    OldestFirst,
}

impl SortOrder {
    pub fn from_newest_first(newest_first: bool) -> Self {
        if newest_first {
            SortOrder::NewestFirst
        } else {
            SortOrder::OldestFirst
        }
    }

    pub fn is_newest_first(self) -> bool {
        self == SortOrder::NewestFirst
    }

    pub fn toggle(self) -> Self {
        match self {
            SortOrder::NewestFirst => SortOrder::OldestFirst,
            SortOrder::OldestFirst => SortOrder::NewestFirst,
        }
    }

    /// Compares two migration names for display.
    ///
    /// Names without a parsable key go last in both orders, ascending by name.
    pub fn compare(self, a: &str, b: &str) -> Ordering {
        match (SortKey::parse(a), SortKey::parse(b)) {
            (Ok(ka), Ok(kb)) => {
                let natural = ka.cmp(&kb).then_with(|| a.cmp(b));
                match self {
                    SortOrder::OldestFirst => natural,
                    SortOrder::NewestFirst => natural.reverse(),
                }
            }
            (Ok(_), Err(_)) => Ordering::Less,
            (Err(_), Ok(_)) => Ordering::Greater,
            (Err(_), Err(_)) => a.cmp(b),
        }
    }

    pub fn sort(self, entries: &mut [&MigrationEntry]) {
        entries.sort_by(|a, b| self.compare(&a.name, &b.name));
    }
}
