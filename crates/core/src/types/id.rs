//! Newtype IDs for type-safe entity references.
//!
//! Gateway identifiers are opaque strings (usually UUIDs), but some tables hand
//! out integer keys. The generated types accept both on the wire and always
//! hold the textual form.

/// Macro to define a type-safe, string-backed ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize` as a plain string, `Deserialize` from a string or an integer
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>`, `AsRef<str>` and `Display`
///
/// # Example
///
/// ```rust
/// # use sweet_dreams_core::define_id;
/// define_id!(BasketId);
/// define_id!(CouponId);
///
/// let basket = BasketId::new("b-1");
/// let coupon = CouponId::new("b-1");
/// assert_eq!(basket.as_str(), coupon.as_str());
///
/// // These are different types, so this won't compile:
/// // let _: BasketId = coupon;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, ::serde::Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from its textual form.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
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

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                struct IdVisitor;

                impl ::serde::de::Visitor<'_> for IdVisitor {
                    type Value = String;

                    fn expecting(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                        f.write_str("a string or integer identifier")
                    }

                    fn visit_str<E: ::serde::de::Error>(self, v: &str) -> Result<String, E> {
                        Ok(v.to_owned())
                    }

                    fn visit_string<E: ::serde::de::Error>(self, v: String) -> Result<String, E> {
                        Ok(v)
                    }

                    fn visit_i64<E: ::serde::de::Error>(self, v: i64) -> Result<String, E> {
                        Ok(v.to_string())
                    }

                    fn visit_u64<E: ::serde::de::Error>(self, v: u64) -> Result<String, E> {
                        Ok(v.to_string())
                    }
                }

                deserializer.deserialize_any(IdVisitor).map(Self)
            }
        }
    };
}

// Define standard entity IDs
define_id!(ProductId);
define_id!(UserId);
define_id!(ReviewId);
define_id!(OrderId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_from_string() {
        let id: ProductId = serde_json::from_str("\"9f1c\"").unwrap();
        assert_eq!(id.as_str(), "9f1c");
    }

    #[test]
    fn test_deserialize_from_integer() {
        let id: ProductId = serde_json::from_str("42").unwrap();
        assert_eq!(id, ProductId::new("42"));
    }

    #[test]
    fn test_serialize_as_plain_string() {
        let json = serde_json::to_string(&UserId::new("u-1")).unwrap();
        assert_eq!(json, "\"u-1\"");
    }

    #[test]
    fn test_rejects_non_scalar() {
        assert!(serde_json::from_str::<OrderId>("{\"id\":1}").is_err());
    }
}
