/// Fallback category. Always present in the store; its keywords never drive matching.
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub keywords: Vec<String>,
}

impl Category {
    pub fn new(name: String) -> Self {
        Self {
            name,
            keywords: Vec::new(),
        }
    }

    pub fn with_keywords(name: String, keywords: Vec<String>) -> Self {
        Self { name, keywords }
    }

    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_CATEGORY
    }

    /// Find a category by exact name in a slice. Names are case-sensitive.
    pub fn find_by_name<'a>(categories: &'a [Category], name: &str) -> Option<&'a Category> {
        categories.iter().find(|c| c.name == name)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Normalization shared by keyword matching and keyword removal.
pub fn normalize_keyword(s: &str) -> String {
    s.trim().to_lowercase()
}
