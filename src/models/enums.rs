use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        $(#[$meta])*
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(
    /// Discrete outcome assigned to a scan.
    #[serde(rename_all = "lowercase")]
    Verdict {
        Positive => "positive",
        Negative => "negative",
        Uncertain => "uncertain",
    }
);

str_enum!(
    /// UI-managed patient flag, independent of scan history.
    PatientStatus {
        Active => "Active",
        Inactive => "Inactive",
    }
);

str_enum!(
    /// Outbound notification category, carried through to the mailer.
    #[serde(rename_all = "lowercase")]
    NotificationKind {
        Analysis => "analysis",
        Report => "report",
        General => "general",
    }
);
