//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i32` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `PartialOrd`, `Ord`, `Hash`
/// - Conversion methods: `new()`, `as_i32()`
/// - `From<i32>` and `Into<i32>` implementations
/// - `sqlx` `Type`, `Encode`, and `Decode` implementations (with `postgres` feature)
///
/// # Example
///
/// ```rust
/// # use factory_inventory_core::define_id;
/// define_id!(PalletId);
/// define_id!(ShelfId);
///
/// let pallet_id = PalletId::new(1);
/// let shelf_id = ShelfId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: PalletId = shelf_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Create a new ID from an i32 value.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Get the underlying i32 value.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <i32 as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <i32 as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                let id = <i32 as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                Ok(Self(id))
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <i32 as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

define_id!(FactoryId);
define_id!(ManagerId);
define_id!(StorageAreaId);
define_id!(CoordinateId);
define_id!(InventoryId);
define_id!(StockMovementId);
define_id!(StocktakingId);
define_id!(SelectionOptionId);

/// Errors that can occur when parsing an [`AccountId`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountIdError {
    /// The input string is empty.
    #[error("account id cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("account id must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains whitespace or control characters.
    #[error("account id cannot contain whitespace or control characters")]
    InvalidCharacter,
}

/// Login identifier of an account.
///
/// Accounts are keyed by an operator-chosen string (e.g. an employee number)
/// rather than a surrogate integer.
///
/// ```
/// use factory_inventory_core::AccountId;
///
/// assert!(AccountId::parse("emp-0042").is_ok());
/// assert!(AccountId::parse("").is_err());
/// assert!(AccountId::parse("two words").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    /// Maximum length, matching the `VARCHAR(255)` column.
    pub const MAX_LENGTH: usize = 255;

    /// Parse an `AccountId` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than 255 characters,
    /// or contains whitespace/control characters.
    pub fn parse(s: &str) -> Result<Self, AccountIdError> {
        if s.is_empty() {
            return Err(AccountIdError::Empty);
        }
        if s.chars().count() > Self::MAX_LENGTH {
            return Err(AccountIdError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(AccountIdError::InvalidCharacter);
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for AccountId {
    type Error = AccountIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip_i32() {
        let id = FactoryId::new(7);
        assert_eq!(id.as_i32(), 7);
        assert_eq!(i32::from(id), 7);
        assert_eq!(FactoryId::from(7), id);
        assert_eq!(id.to_string(), "7");
    }

    #[test]
    fn test_id_serializes_transparently() {
        let json = serde_json::to_string(&InventoryId::new(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn test_account_id_rejects_bad_input() {
        assert_eq!(AccountId::parse(""), Err(AccountIdError::Empty));
        assert_eq!(
            AccountId::parse("a b"),
            Err(AccountIdError::InvalidCharacter)
        );
        assert!(matches!(
            AccountId::parse(&"x".repeat(256)),
            Err(AccountIdError::TooLong { max: 255 })
        ));
    }

    #[test]
    fn test_account_id_deserialize_validates() {
        let ok: AccountId = serde_json::from_str("\"test_admin\"").unwrap();
        assert_eq!(ok.as_str(), "test_admin");

        let bad: Result<AccountId, _> = serde_json::from_str("\"\"");
        assert!(bad.is_err());
    }
}
