//! Open, string-backed tags for roles, permissions, and groups
//!
//! Each tag is a newtype over `Cow<'static, str>`: well-known values are
//! `const` and borrow a static string, values read from configuration or
//! requests own their text. Both compare, hash, and order by content, so a
//! deserialized `"ADMIN"` is equal to [`RoleCode::ADMIN`].

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

macro_rules! string_tag {
    (
        $(#[$meta:meta])*
        $name:ident {
            $(
                $(#[$konst_meta:meta])*
                $konst:ident = $value:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Cow<'static, str>);

        impl $name {
            $(
                $(#[$konst_meta])*
                pub const $konst: $name = $name(Cow::Borrowed($value));
            )*

            /// Create a tag from any string value
            pub fn new(value: impl Into<String>) -> Self {
                Self(Cow::Owned(value.into()))
            }

            /// The tag as it appears on the wire
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::new(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_tag! {
    /// Role code identifying a role definition
    RoleCode {
        /// Full management role; also gates the management scope
        ADMIN = "ADMIN",
        PERSONAL = "PERSONAL",
        VIEWER = "VIEWER",
    }
}

string_tag! {
    /// Atomic action a role may grant
    Permission {
        CREATE = "CREATE",
        VIEW = "VIEW",
        EDIT = "EDIT",
        DELETE = "DELETE",
    }
}

string_tag! {
    /// Membership group used to scope the management relation
    GroupId {
        GROUP_1 = "GROUP_1",
        GROUP_2 = "GROUP_2",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_const_and_owned_tags_are_equal() {
        let owned = RoleCode::new("ADMIN");
        assert_eq!(owned, RoleCode::ADMIN);

        let mut set = HashSet::new();
        set.insert(RoleCode::ADMIN);
        assert!(set.contains(&owned));
    }

    #[test]
    fn test_open_set_accepts_unknown_values() {
        let auditor = RoleCode::new("AUDITOR");
        assert_eq!(auditor.as_str(), "AUDITOR");
        assert_ne!(auditor, RoleCode::ADMIN);
    }

    #[test]
    fn test_serde_is_transparent() {
        let json = serde_json::to_string(&Permission::CREATE).unwrap();
        assert_eq!(json, "\"CREATE\"");

        let parsed: GroupId = serde_json::from_str("\"GROUP_2\"").unwrap();
        assert_eq!(parsed, GroupId::GROUP_2);
    }

    #[test]
    fn test_display() {
        assert_eq!(Permission::DELETE.to_string(), "DELETE");
        assert_eq!(GroupId::from("GROUP_9").to_string(), "GROUP_9");
    }
}
