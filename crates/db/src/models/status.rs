//! Status helper enums mapping to SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding `*_statuses` database table.

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Return the lookup table name for this status.
            pub fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => $label ),+
                }
            }

            /// Resolve a database status ID back to the enum.
            pub fn from_id(id: StatusId) -> Option<Self> {
                match id {
                    $( $val => Some(Self::$variant), )+
                    _ => None,
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }
    };
}

define_status_enum! {
    /// Lifecycle status of a stand claim.
    ///
    /// A `Held` claim whose deadline has passed is treated as `Available`
    /// by every reader, even before the sweeper reverts the row.
    ClaimStatus {
        Available = 1 => "available",
        Held = 2 => "held",
        PendingApproval = 3 => "pending_approval",
        Occupied = 4 => "occupied",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_match_seed_order() {
        assert_eq!(ClaimStatus::Available.id(), 1);
        assert_eq!(ClaimStatus::Held.id(), 2);
        assert_eq!(ClaimStatus::PendingApproval.id(), 3);
        assert_eq!(ClaimStatus::Occupied.id(), 4);
    }

    #[test]
    fn test_from_id_round_trips() {
        for status in [
            ClaimStatus::Available,
            ClaimStatus::Held,
            ClaimStatus::PendingApproval,
            ClaimStatus::Occupied,
        ] {
            assert_eq!(ClaimStatus::from_id(status.id()), Some(status));
        }
        assert_eq!(ClaimStatus::from_id(0), None);
        assert_eq!(ClaimStatus::from_id(99), None);
    }

    #[test]
    fn test_names() {
        assert_eq!(ClaimStatus::Available.name(), "available");
        assert_eq!(ClaimStatus::PendingApproval.name(), "pending_approval");
    }
}
