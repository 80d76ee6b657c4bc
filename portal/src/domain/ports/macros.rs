//! Declarative macro for storage port errors.
//!
//! Each variant gets a documented snake_case constructor whose fields accept
//! `impl Into<T>`, so adapters can pass `&str` where the error stores `String`.
//! Attributes on variants and on individual fields are carried through, which
//! keeps generated errors compatible with `missing_docs`.

macro_rules! define_port_error {
    (@constructor $variant:ident) => {
        ::paste::paste! {
            #[doc = "Build [`Self::" $variant "`]."]
            #[must_use]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@constructor $variant:ident { $($field:ident : $ty:ty),* }) => {
        ::paste::paste! {
            #[doc = "Build [`Self::" $variant "`], converting each field with [`Into`]."]
            #[must_use]
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                Self::$variant { $($field: $field.into()),* }
            }
        }
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( {
                    $( $(#[$field_meta:meta])* $field:ident : $ty:ty ),* $(,)?
                } )? => $message:literal
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $( $(#[$field_meta])* $field : $ty ),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@constructor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    define_port_error! {
        pub enum SlotError {
            Missing => "slot is missing",
            Unreadable { key: String } => "slot {key} is unreadable",
            Oversized {
                /// Slot name.
                key: String,
                bytes: usize,
            } => "slot {key} holds {bytes} bytes",
        }
    }

    #[test]
    fn unit_variants_get_zero_argument_constructors() {
        assert_eq!(SlotError::missing(), SlotError::Missing);
        assert_eq!(SlotError::missing().to_string(), "slot is missing");
    }

    #[test]
    fn string_fields_accept_borrowed_input() {
        let err = SlotError::unreadable("user");
        assert_eq!(err.to_string(), "slot user is unreadable");
    }

    #[test]
    fn mixed_fields_keep_their_types() {
        let err = SlotError::oversized("app_users", 5_usize);
        assert_eq!(err.to_string(), "slot app_users holds 5 bytes");
    }
}
