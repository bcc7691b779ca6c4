/// Category and tag narrowing the feed query.
///
/// Both are optional and independent. Values are not checked against the
/// vocabularies; an unknown value simply yields an empty page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    category: Option<String>,
    tag: Option<String>,
}

impl FilterState {
    pub fn new(category: Option<String>, tag: Option<String>) -> Self {
        Self {
            category: normalize(category),
            tag: normalize(tag),
        }
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn set_category(&mut self, value: Option<String>) {
        self.category = normalize(value);
    }

    pub fn set_tag(&mut self, value: Option<String>) {
        self.tag = normalize(value);
    }

    pub fn clear_all(&mut self) {
        self.category = None;
        self.tag = None;
    }

    /// True when either filter is set.
    pub fn is_active(&self) -> bool {
        self.category.is_some() || self.tag.is_some()
    }

    /// Short label for headers, e.g. `category: tech · tag: ai`.
    pub fn summary(&self) -> Option<String> {
        match (&self.category, &self.tag) {
            (None, None) => None,
            (Some(c), None) => Some(format!("category: {}", c)),
            (None, Some(t)) => Some(format!("tag: {}", t)),
            (Some(c), Some(t)) => Some(format!("category: {} · tag: {}", c, t)),
        }
    }
}

/// Blank selections mean "no filter".
fn normalize(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_inactive() {
        let filter = FilterState::default();
        assert!(!filter.is_active());
        assert_eq!(filter.summary(), None);
    }

    #[test]
    fn test_category_and_tag_are_independent() {
        let mut filter = FilterState::default();
        filter.set_category(Some("tech".into()));
        assert_eq!(filter.category(), Some("tech"));
        assert_eq!(filter.tag(), None);

        filter.set_tag(Some("ai".into()));
        filter.set_category(None);
        assert_eq!(filter.category(), None);
        assert_eq!(filter.tag(), Some("ai"));
        assert!(filter.is_active());
    }

    #[test]
    fn test_clear_all() {
        let mut filter = FilterState::new(Some("tech".into()), Some("ai".into()));
        assert_eq!(filter.summary().as_deref(), Some("category: tech · tag: ai"));
        filter.clear_all();
        assert_eq!(filter, FilterState::default());
    }

    #[test]
    fn test_blank_value_clears() {
        let mut filter = FilterState::new(Some("tech".into()), None);
        filter.set_category(Some("   ".into()));
        assert!(!filter.is_active());
    }
}
