use serde::{Deserialize, Serialize};

/// A spending or income category, as returned by the API.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub(crate) id: String,
    pub(crate) name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) icon: Option<String>,
}

impl Category {
    pub fn new(id: impl Into<String>, new: NewCategory) -> Self {
        Self {
            id: id.into(),
            name: new.name,
            color: new.color,
            icon: new.icon,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// The name prefixed by the icon, when there is one.
    pub fn label(&self) -> String {
        match self.icon() {
            Some(icon) if !icon.is_empty() => format!("{icon} {}", self.name),
            _ => self.name.clone(),
        }
    }

    /// Case-insensitive name comparison. This is the only uniqueness rule the client knows about.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// The payload for creating a category.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct NewCategory {
    pub(crate) name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) icon: Option<String>,
}

impl NewCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: None,
            icon: None,
        }
    }

    pub fn with_color(mut self, color: Option<String>) -> Self {
        self.color = color;
        self
    }

    pub fn with_icon(mut self, icon: Option<String>) -> Self {
        self.icon = icon;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_name_ignores_case() {
        let category = Category::new("c1", NewCategory::new("food"));
        assert!(category.has_name("Food"));
        assert!(category.has_name("FOOD"));
        assert!(!category.has_name("Foods"));
    }

    #[test]
    fn test_label_with_icon() {
        let category = Category::new("c1", NewCategory::new("Food").with_icon(Some("🍔".into())));
        assert_eq!(category.label(), "🍔 Food");
        let plain = Category::new("c2", NewCategory::new("Rent"));
        assert_eq!(plain.label(), "Rent");
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let json = serde_json::to_string(&NewCategory::new("Food")).unwrap();
        assert_eq!(json, r#"{"name":"Food"}"#);
        let category: Category = serde_json::from_str(r#"{"id":"1","name":"Food"}"#).unwrap();
        assert_eq!(category.color(), None);
        assert_eq!(category.icon(), None);
    }
}
