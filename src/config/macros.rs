/// Configuration macros for single-declaration config sections
///
/// `config_struct!` defines a section struct with public fields, a `Default`
/// impl built from the inline default values, and serde support with
/// `#[serde(default)]` so partial TOML files fill the gaps with defaults.
///
/// # Example
/// ```
/// tokenscreen::config_struct! {
///     pub struct ExampleConfig {
///         per_page: usize = 12,
///         enabled: bool = true,
///     }
/// }
///
/// let cfg = ExampleConfig::default();
/// assert_eq!(cfg.per_page, 12);
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
