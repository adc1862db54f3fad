//! Options shared by every stage of a generation pass.

use std::{fs, path::Path};

use serde::Deserialize;

use crate::error::Error;

/// Generation settings, routed to the loaders and platform generators.
///
/// Deserializes from camelCase keys so a `resgen.toml` can be read directly:
///
/// ```rust
/// use resgen::Settings;
/// let settings = Settings::from_toml_str(r#"
///     packageName = "com.example.shared"
///     strictLineBreaks = true
/// "#)?;
/// assert_eq!(settings.package_name, "com.example.shared");
/// assert!(settings.strict_line_breaks);
/// assert_eq!(settings.ios_localization_region, "en");
/// # Ok::<(), resgen::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Keep line breaks in text values verbatim instead of collapsing them.
    pub strict_line_breaks: bool,
    /// Package of the generated accessor class.
    pub package_name: String,
    /// Simple name of the generated accessor class.
    pub class_name: String,
    /// Package of the Android `R` class referenced by Android initializers.
    pub android_r_class_package: String,
    /// Region the Apple base localization is also published under.
    pub ios_localization_region: String,
    /// Package of the runtime resource types the generated code references.
    pub runtime_package: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            strict_line_breaks: false,
            package_name: String::new(),
            class_name: "MR".to_string(),
            android_r_class_package: String::new(),
            ios_localization_region: "en".to_string(),
            runtime_package: "dev.icerock.moko.resources".to_string(),
        }
    }
}

impl Settings {
    /// Creates default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses settings from a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, Error> {
        Ok(toml::from_str(content)?)
    }

    /// Reads settings from a TOML file.
    pub fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Enables/disables strict line breaks.
    pub fn with_strict_line_breaks(mut self, strict_line_breaks: bool) -> Self {
        self.strict_line_breaks = strict_line_breaks;
        self
    }

    /// Sets the package of the generated accessor class.
    pub fn with_package_name(mut self, package_name: impl Into<String>) -> Self {
        self.package_name = package_name.into();
        self
    }

    /// Sets the simple name of the generated accessor class.
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    /// Sets the Android `R` class package.
    pub fn with_android_r_class_package(mut self, package: impl Into<String>) -> Self {
        self.android_r_class_package = package.into();
        self
    }

    /// Sets the Apple base localization region.
    pub fn with_ios_localization_region(mut self, region: impl Into<String>) -> Self {
        self.ios_localization_region = region.into();
        self
    }

    /// Sets the runtime package.
    pub fn with_runtime_package(mut self, package: impl Into<String>) -> Self {
        self.runtime_package = package.into();
        self
    }

    /// `R` class package, falling back to the accessor package.
    pub fn r_class_package(&self) -> &str {
        if self.android_r_class_package.is_empty() {
            &self.package_name
        } else {
            &self.android_r_class_package
        }
    }

    /// File-name prefix derived from the package (`com.example` → `com_example`).
    pub fn file_prefix(&self) -> String {
        if self.package_name.is_empty() {
            self.class_name.clone()
        } else {
            self.package_name.replace('.', "_")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::new();
        assert!(!settings.strict_line_breaks);
        assert_eq!(settings.class_name, "MR");
        assert_eq!(settings.ios_localization_region, "en");
    }

    #[test]
    fn test_from_toml_all_keys() {
        let settings = Settings::from_toml_str(
            r#"
            strictLineBreaks = true
            packageName = "com.example"
            className = "Res"
            androidRClassPackage = "com.example.app"
            iosLocalizationRegion = "ru"
            runtimePackage = "com.example.runtime"
            "#,
        )
        .unwrap();
        assert_eq!(
            settings,
            Settings::new()
                .with_strict_line_breaks(true)
                .with_package_name("com.example")
                .with_class_name("Res")
                .with_android_r_class_package("com.example.app")
                .with_ios_localization_region("ru")
                .with_runtime_package("com.example.runtime")
        );
    }

    #[test]
    fn test_from_toml_rejects_wrong_types() {
        let result = Settings::from_toml_str("strictLineBreaks = \"yes\"");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_r_class_package_fallback() {
        let settings = Settings::new().with_package_name("com.example");
        assert_eq!(settings.r_class_package(), "com.example");
        let settings = settings.with_android_r_class_package("com.example.android");
        assert_eq!(settings.r_class_package(), "com.example.android");
    }

    #[test]
    fn test_file_prefix() {
        assert_eq!(Settings::new().file_prefix(), "MR");
        assert_eq!(
            Settings::new().with_package_name("com.example.shared").file_prefix(),
            "com_example_shared"
        );
    }
}
