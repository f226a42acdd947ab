//! Enums the embedding library encodes as numbers on the wire.

/// Declare a fieldless enum that serializes as its numeric code.
///
/// Generates the enum with `#[repr(u8)]`, `code()`/`from_code()` and serde
/// impls that write and read the bare number.
///
/// # Example
///
/// ```ignore
/// wire_enum! {
///     /// How the token was issued.
///     pub enum TokenType {
///         Aad = 0,
///         Embed = 1,
///     }
/// }
/// ```
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident = $code:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #[repr(u8)]
        $vis enum $name {
            $($variant = $code),+
        }

        impl $name {
            /// Numeric code used on the wire.
            pub fn code(self) -> u8 {
                self as u8
            }

            pub fn from_code(code: u8) -> Option<Self> {
                match code {
                    $($code => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_u8(self.code())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let code = <u8 as serde::Deserialize>::deserialize(deserializer)?;
                Self::from_code(code).ok_or_else(|| {
                    serde::de::Error::custom(format!(
                        "unknown {} code {}",
                        stringify!($name),
                        code
                    ))
                })
            }
        }
    };
}

pub(crate) use wire_enum;
