/// Configuration macros for zero-repetition config definitions
///
/// `config_struct!` declares a configuration section and its defaults in
/// one place.

/// Define a configuration struct with embedded defaults
///
/// Each field is written as `name: Type = default`. The macro emits the
/// struct with public fields, its `Default` impl and serde support where
/// missing keys fall back to the default.
///
/// # Example
/// ```ignore
/// config_struct! {
///     pub struct PageSourceConfig {
///         enabled: bool = true,
///         timeout_secs: u64 = 15,
///     }
/// }
/// ```
#[macro_export]
macro_rules! config_struct {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_name:ident: $field_type:ty = $default_value:expr
            ),*
            $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(default)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                pub $field_name: $field_type,
            )*
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $(
                        $field_name: $default_value,
                    )*
                }
            }
        }
    };
}
