mod cases;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ProbeError;
use crate::models::Payload;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryId {
    Parameter,
    Header,
    Method,
    Storage,
    Encoding,
    Endpoint,
    Auth,
    Content,
    Race,
    Frontend,
}

impl CategoryId {
    pub const ALL: &'static [CategoryId] = &[
        CategoryId::Parameter,
        CategoryId::Header,
        CategoryId::Method,
        CategoryId::Storage,
        CategoryId::Encoding,
        CategoryId::Endpoint,
        CategoryId::Auth,
        CategoryId::Content,
        CategoryId::Race,
        CategoryId::Frontend,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryId::Parameter => "parameter",
            CategoryId::Header => "header",
            CategoryId::Method => "method",
            CategoryId::Storage => "storage",
            CategoryId::Encoding => "encoding",
            CategoryId::Endpoint => "endpoint",
            CategoryId::Auth => "auth",
            CategoryId::Content => "content",
            CategoryId::Race => "race",
            CategoryId::Frontend => "frontend",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CategoryId::Parameter => "Parameter Manipulation",
            CategoryId::Header => "Header Manipulation",
            CategoryId::Method => "HTTP Method Tampering",
            CategoryId::Storage => "Client Storage Manipulation",
            CategoryId::Encoding => "Encoding Tricks",
            CategoryId::Endpoint => "Endpoint Variants",
            CategoryId::Auth => "Authentication Weaknesses",
            CategoryId::Content => "Content-Type Switching",
            CategoryId::Race => "Race Conditions",
            CategoryId::Frontend => "Frontend Control Tampering",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        CategoryId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s.to_lowercase())
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One concrete parameterized probe within a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub category: CategoryId,
    pub payload: Payload,
    pub description: String,
}

impl TestCase {
    pub fn new(category: CategoryId, payload: Payload, description: &str) -> Self {
        Self {
            category,
            payload,
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Category {
    pub id: CategoryId,
    pub cases: Vec<TestCase>,
}

/// Read-only technique registry, built once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// The full builtin technique set, in canonical category order.
    pub fn builtin() -> Self {
        Self::new(cases::builtin_categories())
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn tests_for(&self, id: CategoryId) -> Result<&[TestCase], ProbeError> {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.cases.as_slice())
            .ok_or_else(|| ProbeError::UnknownCategory(id.to_string()))
    }

    pub fn count_for(&self, id: CategoryId) -> Result<usize, ProbeError> {
        self.tests_for(id).map(|cases| cases.len())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_covers_all_categories() {
        let catalog = Catalog::builtin();
        for id in CategoryId::ALL {
            let cases = catalog.tests_for(*id).unwrap();
            assert!(!cases.is_empty(), "category {} has no cases", id);
            assert!(cases.iter().all(|c| c.category == *id));
        }
    }

    #[test]
    fn test_builtin_case_counts() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.count_for(CategoryId::Parameter).unwrap(), 15);
        assert_eq!(catalog.count_for(CategoryId::Header).unwrap(), 15);
        assert_eq!(catalog.count_for(CategoryId::Method).unwrap(), 20);
    }

    #[test]
    fn test_unknown_category() {
        let catalog = Catalog::new(vec![]);
        let err = catalog.tests_for(CategoryId::Race).unwrap_err();
        assert!(matches!(err, ProbeError::UnknownCategory(_)));
    }

    #[test]
    fn test_category_id_parse() {
        assert_eq!(CategoryId::parse("Header"), Some(CategoryId::Header));
        assert_eq!(CategoryId::parse("dom"), None);
    }
}
