//! Identifiers of P4 pipeline objects.
//!
//! Each identifier is the fully-qualified P4Info name of the object (for
//! example `PreQosPipe.sessions_uplink`). Identifiers for well-known objects
//! are `const` and borrow a static string; identifiers read from the wire own
//! theirs. Both compare by name.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

macro_rules! define_pi_id {
    ($name:ident, $kind:literal) => {
        #[doc = concat!("Identifier of a P4 ", $kind, ".")]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Cow<'static, str>);

        impl $name {
            /// Creates an identifier from a static P4Info name.
            pub const fn of(name: &'static str) -> Self {
                $name(Cow::Borrowed(name))
            }

            /// Returns the P4Info name.
            pub fn name(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(name: String) -> Self {
                $name(Cow::Owned(name))
            }
        }

        impl From<&'static str> for $name {
            fn from(name: &'static str) -> Self {
                Self::of(name)
            }
        }
    };
}

define_pi_id!(PiTableId, "table");
define_pi_id!(PiMatchFieldId, "match field");
define_pi_id!(PiActionId, "action");
define_pi_id!(PiActionParamId, "action parameter");
define_pi_id!(PiCounterId, "counter");

#[cfg(test)]
mod tests {
    use super::*;

    const SESSIONS: PiTableId = PiTableId::of("PreQosPipe.sessions_uplink");

    #[test]
    fn test_static_and_owned_ids_compare_by_name() {
        let owned = PiTableId::from("PreQosPipe.sessions_uplink".to_string());
        assert_eq!(SESSIONS, owned);
        assert_ne!(SESSIONS, PiTableId::of("PreQosPipe.sessions_downlink"));
    }

    #[test]
    fn test_display() {
        assert_eq!(SESSIONS.to_string(), "PreQosPipe.sessions_uplink");
        assert_eq!(PiActionParamId::of("teid").name(), "teid");
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&PiCounterId::of("PreQosPipe.pre_qos_counter")).unwrap();
        assert_eq!(json, "\"PreQosPipe.pre_qos_counter\"");
        let back: PiCounterId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PiCounterId::of("PreQosPipe.pre_qos_counter"));
    }
}
