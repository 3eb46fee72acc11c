//! Defines helper macros for generating domain port error enums.
//!
//! `define_port_error!` derives `thiserror::Error` for the enum and adds one
//! snake_case constructor per variant. Field parameters accept `impl Into<T>`
//! so adapters can pass `&str` where the variant stores a `String`.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@constructor $variant $( [$($field : $ty),*] )?);
            )*
        }
    };

    (@constructor $variant:ident) => {
        ::paste::paste! {
            #[must_use]
            pub const fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@constructor $variant:ident [$($field:ident : $ty:ty),*]) => {
        ::paste::paste! {
            #[must_use]
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                Self::$variant {
                    $($field: $field.into()),*
                }
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    define_port_error! {
        pub enum ExampleStoreError {
            Unavailable => "store unavailable",
            Rejected { message: String } => "store rejected write: {message}",
            Throttled { retry_after_secs: u64 } => "store throttled for {retry_after_secs}s",
            Partial { message: String, written: u32 } => "partial write ({written}): {message}",
        }
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(ExampleStoreError::unavailable(), ExampleStoreError::Unavailable);
        assert_eq!(ExampleStoreError::unavailable().to_string(), "store unavailable");
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = ExampleStoreError::rejected("duplicate key");
        assert_eq!(err.to_string(), "store rejected write: duplicate key");
    }

    #[test]
    fn constructors_preserve_non_string_types() {
        let err = ExampleStoreError::throttled(5_u64);
        assert_eq!(err.to_string(), "store throttled for 5s");
    }

    #[test]
    fn constructors_support_mixed_fields() {
        let err = ExampleStoreError::partial("timeout", 3_u32);
        assert_eq!(err.to_string(), "partial write (3): timeout");
    }
}
