use crate::error::DimensionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Workflow stage of a dimension content
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Draft,
    Live,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Draft => "draft",
            Stage::Live => "live",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = DimensionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Stage::Draft),
            "live" => Ok(Stage::Live),
            other => Err(DimensionError::InvalidStage(other.to_string())),
        }
    }
}

/// The attribute set identifying one slice of a content entity.
/// `locale == None` is the unlocalized slice.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DimensionAttributes {
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub stage: Stage,
}

impl DimensionAttributes {
    pub fn new(locale: Option<&str>, stage: Stage) -> Self {
        Self {
            locale: locale.map(str::to_string),
            stage,
        }
    }

    /// Draft attributes for a locale
    pub fn draft(locale: &str) -> Self {
        Self::new(Some(locale), Stage::Draft)
    }

    /// Live attributes for a locale
    pub fn live(locale: &str) -> Self {
        Self::new(Some(locale), Stage::Live)
    }

    pub fn with_locale(mut self, locale: Option<&str>) -> Self {
        self.locale = locale.map(str::to_string);
        self
    }

    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stage = stage;
        self
    }

    /// The same attributes with the locale removed
    pub fn unlocalized(&self) -> Self {
        Self {
            locale: None,
            stage: self.stage,
        }
    }

    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    pub fn is_localized(&self) -> bool {
        self.locale.is_some()
    }
}

impl fmt::Display for DimensionAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{locale: {}, stage: {}}}",
            self.locale.as_deref().unwrap_or("null"),
            self.stage
        )
    }
}

/// Partial attribute filter.
///
/// Absent keys are unconstrained. `locale: Some(None)` only matches
/// unlocalized records, `locale: None` matches any locale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeFilter {
    pub locale: Option<Option<String>>,
    pub stage: Option<Stage>,
}

impl AttributeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn locale(mut self, locale: Option<&str>) -> Self {
        self.locale = Some(locale.map(str::to_string));
        self
    }

    pub fn unlocalized(self) -> Self {
        self.locale(None)
    }

    pub fn stage(mut self, stage: Stage) -> Self {
        self.stage = Some(stage);
        self
    }

    pub fn matches(&self, attributes: &DimensionAttributes) -> bool {
        if let Some(locale) = &self.locale {
            if locale != &attributes.locale {
                return false;
            }
        }
        if let Some(stage) = self.stage {
            if stage != attributes.stage {
                return false;
            }
        }
        true
    }
}

impl From<&DimensionAttributes> for AttributeFilter {
    fn from(attributes: &DimensionAttributes) -> Self {
        Self {
            locale: Some(attributes.locale.clone()),
            stage: Some(attributes.stage),
        }
    }
}
