//! Newtype IDs for type-safe entity references.
//!
//! Identifiers in golinks are opaque strings issued by someone else (the
//! identity provider, or a UUID generator in the server), so the wrappers carry
//! a `String` rather than a number.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `Display`, `AsRef<str>` and `From<String>`/`From<&str>`
///
/// # Example
///
/// ```rust
/// # use golinks_core::define_string_id;
/// define_string_id!(AccountId);
/// define_string_id!(DeviceId);
///
/// let account = AccountId::new("42");
/// let device = DeviceId::new("42");
///
/// // These are different types, so this won't compile:
/// // let _: AccountId = device;
/// assert_eq!(account.as_str(), device.as_str());
/// ```
#[macro_export]
macro_rules! define_string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_string_id!(
    /// Identity issued by the external provider (Google's numeric `sub`/`id`).
    ExternalId
);
define_string_id!(
    /// Datastore key of an audit `UserSession` record.
    SessionRecordId
);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_external_id_display() {
        let id = ExternalId::new("42");
        assert_eq!(id.to_string(), "42");
        assert_eq!(id.as_str(), "42");
    }

    #[test]
    fn test_external_id_serializes_transparently() {
        let id = ExternalId::from("1337");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"1337\"");
        let back: ExternalId = serde_json::from_str("\"1337\"").unwrap();
        assert_eq!(back, id);
    }
}
