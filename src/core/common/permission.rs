use std::{
    fmt::Display,
    ops::{BitOr, BitOrAssign},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

/// Operations a group is allowed to perform inside a group folder.
///
/// Flags combine with `|` and travel over the wire as the plain integer
/// mask (`Permissions::READ | Permissions::UPDATE` is `3`).
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Permissions(u32);

impl Permissions {
    pub const NONE: Permissions = Permissions(0);
    pub const READ: Permissions = Permissions(1);
    pub const UPDATE: Permissions = Permissions(2);
    pub const CREATE: Permissions = Permissions(4);
    pub const DELETE: Permissions = Permissions(8);
    pub const SHARE: Permissions = Permissions(16);
    pub const ALL: Permissions = Permissions(31);

    const NAMED: [(&'static str, Permissions); 5] = [
        ("read", Permissions::READ),
        ("update", Permissions::UPDATE),
        ("create", Permissions::CREATE),
        ("delete", Permissions::DELETE),
        ("share", Permissions::SHARE),
    ];

    /// Raw mask; bits unknown to this client are kept as received.
    pub const fn from_bits(bits: u32) -> Self {
        Permissions(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Permissions) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn insert(&mut self, other: Permissions) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Permissions) {
        self.0 &= !other.0;
    }

    /// Names of the known flags set in this mask
    pub fn names(self) -> Vec<&'static str> {
        Self::NAMED
            .iter()
            .filter(|(_, p)| self.contains(*p))
            .map(|(n, _)| *n)
            .collect()
    }
}

impl BitOr for Permissions {
    type Output = Permissions;

    fn bitor(self, rhs: Self) -> Self::Output {
        Permissions(self.0 | rhs.0)
    }
}

impl BitOrAssign for Permissions {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl Display for Permissions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, PartialEq)]
pub struct ParsePermissionsError {
    pub token: String,
}

impl Display for ParsePermissionsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown permission '{}', expected a mask or read,update,create,delete,share,all",
            self.token
        )
    }
}

impl std::error::Error for ParsePermissionsError {}

/// Accepts either the integer mask (`"3"`) or flag names joined by `,` or `|`
/// (`"read,update"`, `"read|share"`, `"all"`).
impl FromStr for Permissions {
    type Err = ParsePermissionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Ok(bits) = s.parse::<u32>() {
            return Ok(Permissions(bits));
        }

        let mut result = Permissions::NONE;

        for token in s.split([',', '|']).map(str::trim).filter(|t| !t.is_empty()) {
            let lowered = token.to_ascii_lowercase();

            if lowered == "all" {
                result |= Permissions::ALL;
                continue;
            }

            match Self::NAMED.iter().find(|(n, _)| *n == lowered) {
                Some((_, p)) => result |= *p,
                None => {
                    return Err(ParsePermissionsError {
                        token: token.to_string(),
                    })
                }
            }
        }

        Ok(result)
    }
}
