/// Macro to create a configuration value group struct.
///
/// Usage:
/// ```rust
/// mod tracking {
///     upload_config::config_group!({
///         ref poll_interval: std::time::Duration = std::time::Duration::from_secs(3);
///     });
/// }
///
/// let mut group = tracking::ConfigValueGroup::new();
/// group.apply_env_overrides();
/// ```
///
/// This creates a `ConfigValueGroup` struct with the specified fields. `apply_env_overrides`
/// reads `UPLOADER_{GROUP}_{FIELD}` where the group name is the enclosing module's name.
#[macro_export]
macro_rules! config_group {
    ({
        $(
            $(#[$meta:meta])*
            ref $name:ident : $type:ty = $value:expr;
        )+
    }) => {
        #[allow(unused_imports)]
        use $crate::ParsableConfigValue;

        /// ConfigValueGroup struct containing all configurable values
        #[derive(Debug, Clone)]
        pub struct ConfigValueGroup {
            $(
                $(#[$meta])*
                #[allow(non_snake_case)]
                pub $name: $type,
            )+
        }

        impl Default for ConfigValueGroup {
            /// Default values only, no environment variable overrides.
            fn default() -> Self {
                Self {
                    $(
                        $name: {
                            let v: $type = $value;
                            v
                        },
                    )+
                }
            }
        }

        impl ConfigValueGroup {
            /// Alias for `Default::default()`.
            pub fn new() -> Self {
                Self::default()
            }

            /// The environment variable name for a field of this group.
            pub fn env_var_name(field: &str) -> String {
                let group_name = module_path!().split("::").last().unwrap_or("unknown");
                format!("{}{}_{}", $crate::ENV_PREFIX, group_name.to_uppercase(), field.to_uppercase())
            }

            /// Apply environment variable overrides to this configuration group.
            pub fn apply_env_overrides(&mut self) {
                $(
                    let env_var_name = Self::env_var_name(stringify!($name));
                    let maybe_env_value = std::env::var(&env_var_name).ok();
                    let default_value: $type = $value;
                    self.$name = <$type>::parse(&env_var_name, maybe_env_value, default_value);
                )+
            }
        }
    };
}
