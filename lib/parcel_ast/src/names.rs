use serde::{Deserialize, Serialize};

/// Name of a parcel (eg. `Hello`, `Lucy.Analysis`)
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Serialize, Deserialize)]
pub struct ParcelName(pub String);

impl std::fmt::Display for ParcelName {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub fn parcel_name(s: impl Into<String>) -> ParcelName {
    ParcelName(s.into())
}

impl ParcelName {
    /// C symbol prefix (eg. `lucy_analysis_`)
    pub fn prefix(&self) -> String {
        self.0.to_lowercase().replace('.', "_") + "_"
    }

    /// Uppercase C symbol prefix (eg. `LUCY_ANALYSIS_`)
    pub fn upper_prefix(&self) -> String {
        self.prefix().to_uppercase()
    }

    /// The namespace used to qualify class names (eg. `Lucy::Analysis`)
    pub fn namespace(&self) -> String {
        self.0.replace('.', "::")
    }
}

/// Fully qualified class name (eg. `Hello::Dog`)
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Serialize, Deserialize)]
pub struct ClassFullname(pub String);

impl std::fmt::Display for ClassFullname {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub fn class_fullname(s: impl Into<String>) -> ClassFullname {
    let name = s.into();
    debug_assert!(!name.is_empty());
    debug_assert!(!name.starts_with("::"));
    ClassFullname(name)
}

impl ClassFullname {
    /// Qualify `name` with the namespace of `parcel` unless it already
    /// contains `::`.
    pub fn qualify(name: &str, parcel: &ParcelName) -> ClassFullname {
        if name.contains("::") {
            class_fullname(name)
        } else {
            class_fullname(format!("{}::{}", parcel.namespace(), name))
        }
    }

    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.0.split("::")
    }

    /// Returns the last component (eg. `Dog` for `Hello::Dog`)
    pub fn last_component(&self) -> &str {
        self.0.rsplit("::").next().unwrap_or(&self.0)
    }

    /// Returns relative path for the generated files (eg. `Hello/Dog`)
    pub fn path_part(&self) -> String {
        self.components().collect::<Vec<_>>().join("/")
    }
}

/// Name of a method (without class part)
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Serialize, Deserialize)]
pub struct MethodName(pub String);

impl std::fmt::Display for MethodName {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub fn method_name(s: impl Into<String>) -> MethodName {
    MethodName(s.into())
}
