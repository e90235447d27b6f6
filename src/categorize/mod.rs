use crate::models::{normalize_keyword, Category, Transaction, DEFAULT_CATEGORY};

/// Exact keyword matcher built from a snapshot of the category store.
pub(crate) struct Categorizer {
    rules: Vec<CompiledCategory>,
}

struct CompiledCategory {
    name: String,
    keywords: Vec<String>,
}

impl Categorizer {
    /// The default category and categories without keywords never match.
    pub(crate) fn new(categories: &[Category]) -> Self {
        let rules = categories
            .iter()
            .filter(|c| !c.is_default() && !c.keywords.is_empty())
            .map(|c| CompiledCategory {
                name: c.name.clone(),
                keywords: c.keywords.iter().map(|k| normalize_keyword(k)).collect(),
            })
            .collect();

        Self { rules }
    }

    /// Full-string, case- and whitespace-insensitive comparison against every
    /// keyword. When several categories match, the last one in store order wins.
    pub(crate) fn categorize(&self, details: &str) -> &str {
        let key = normalize_keyword(details);

        self.rules
            .iter()
            .rev()
            .find(|rule| rule.keywords.contains(&key))
            .map(|rule| rule.name.as_str())
            .unwrap_or(DEFAULT_CATEGORY)
    }

    /// Reset every row to the default category, then assign matches.
    pub(crate) fn categorize_batch(&self, transactions: &mut [Transaction]) {
        for txn in transactions.iter_mut() {
            txn.category = self.categorize(&txn.details).to_string();
        }
    }
}

#[cfg(test)]
mod tests;
