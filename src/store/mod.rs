use anyhow::{Context, Result};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::{normalize_keyword, Category, DEFAULT_CATEGORY};

/// Category name -> keyword list, backed by a JSON document.
///
/// Iteration order is insertion order and survives a save/load round trip,
/// since the categorizer resolves ties by that order.
#[derive(Debug, Clone)]
pub(crate) struct CategoryStore {
    path: PathBuf,
    categories: Vec<Category>,
}

impl CategoryStore {
    /// In-memory default store that will persist to `path` on first mutation.
    pub(crate) fn new(path: PathBuf) -> Self {
        Self {
            path,
            categories: vec![Category::new(DEFAULT_CATEGORY.to_string())],
        }
    }

    /// Load the document at `path`, or start from the default mapping if it
    /// does not exist. A malformed document is an error.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no category file yet, using defaults");
            return Ok(Self::new(path.to_path_buf()));
        }

        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read category file: {}", path.display()))?;
        let CategoryDocument(mut categories) = serde_json::from_str(&data)
            .with_context(|| format!("Malformed category file: {}", path.display()))?;

        if !categories.iter().any(Category::is_default) {
            categories.insert(0, Category::new(DEFAULT_CATEGORY.to_string()));
        }

        tracing::debug!(
            path = %path.display(),
            categories = categories.len(),
            "loaded category file"
        );
        Ok(Self {
            path: path.to_path_buf(),
            categories,
        })
    }

    /// Overwrite the document with the full mapping.
    pub(crate) fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&CategoryDocumentRef(&self.categories))
            .context("Failed to serialize categories")?;
        write_atomic(&self.path, &json)?;
        tracing::debug!(path = %self.path.display(), "saved category file");
        Ok(())
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub(crate) fn names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        Category::find_by_name(&self.categories, name).is_some()
    }

    pub(crate) fn keywords(&self, name: &str) -> Option<&[String]> {
        Category::find_by_name(&self.categories, name).map(|c| c.keywords.as_slice())
    }

    /// Returns `false` without writing when the name is empty or already taken.
    pub(crate) fn add_category(&mut self, name: &str) -> Result<bool> {
        let name = name.trim();
        if name.is_empty() || self.contains(name) {
            return Ok(false);
        }
        self.categories.push(Category::new(name.to_string()));
        self.save()?;
        tracing::info!(category = name, "added category");
        Ok(true)
    }

    /// The default category cannot be removed.
    pub(crate) fn remove_category(&mut self, name: &str) -> Result<bool> {
        let name = name.trim();
        if name == DEFAULT_CATEGORY {
            return Ok(false);
        }
        let before = self.categories.len();
        self.categories.retain(|c| c.name != name);
        if self.categories.len() == before {
            return Ok(false);
        }
        self.save()?;
        tracing::info!(category = name, "removed category");
        Ok(true)
    }

    /// Append a trimmed keyword. Returns `false` without writing when the
    /// keyword is empty or already listed (exact comparison) in `category`.
    pub(crate) fn add_keyword(&mut self, category: &str, keyword: &str) -> Result<bool> {
        let keyword = keyword.trim();
        let cat = self.category_mut(category)?;
        if keyword.is_empty() || cat.keywords.iter().any(|k| k == keyword) {
            return Ok(false);
        }
        cat.keywords.push(keyword.to_string());
        self.save()?;
        tracing::info!(category, keyword, "added keyword");
        Ok(true)
    }

    /// Make `target` the only category that claims `keyword`: every other
    /// matching keyword (normalized) is dropped and, unless `target` is the
    /// default category, the trimmed keyword is appended to it. Written in
    /// one save; on failure the in-memory document is left unchanged.
    /// Returns `false` when nothing had to change.
    pub(crate) fn reassign_keyword(&mut self, keyword: &str, target: &str) -> Result<bool> {
        let keyword = keyword.trim();
        let normalized = normalize_keyword(keyword);
        if normalized.is_empty() {
            return Ok(false);
        }
        if !self.contains(target) {
            anyhow::bail!("Unknown category: {target}");
        }

        let previous = self.categories.clone();
        let mut changed = false;
        for cat in self.categories.iter_mut() {
            if cat.is_default() {
                continue;
            }
            let claimed = cat
                .keywords
                .iter()
                .any(|k| normalize_keyword(k) == normalized);
            if cat.name == target {
                if !claimed {
                    cat.keywords.push(keyword.to_string());
                    changed = true;
                }
            } else if claimed {
                cat.keywords.retain(|k| normalize_keyword(k) != normalized);
                changed = true;
            }
        }

        if !changed {
            return Ok(false);
        }
        if let Err(e) = self.save() {
            self.categories = previous;
            return Err(e);
        }
        tracing::info!(keyword, category = target, "reassigned keyword");
        Ok(true)
    }

    fn category_mut(&mut self, name: &str) -> Result<&mut Category> {
        self.categories
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| anyhow::anyhow!("Unknown category: {name}"))
    }
}

/// Write to a sibling temp file, then rename over the target.
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, contents)
        .with_context(|| format!("Failed to write category file: {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("Failed to replace category file: {}", path.display()))?;
    Ok(())
}

// ── JSON document ─────────────────────────────────────────────
//
// The document is a plain object `{"Food": ["coffee shop"], ...}`. It is
// (de)serialized by hand so key order is kept in both directions.

struct CategoryDocumentRef<'a>(&'a [Category]);

impl Serialize for CategoryDocumentRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for cat in self.0 {
            map.serialize_entry(&cat.name, &cat.keywords)?;
        }
        map.end()
    }
}

struct CategoryDocument(Vec<Category>);

impl<'de> Deserialize<'de> for CategoryDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CategoryDocumentVisitor)
    }
}

struct CategoryDocumentVisitor;

impl<'de> Visitor<'de> for CategoryDocumentVisitor {
    type Value = CategoryDocument;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("an object mapping category names to keyword lists")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut categories: Vec<Category> = Vec::new();
        while let Some((name, keywords)) = access.next_entry::<String, Vec<String>>()? {
            // Repeated keys: the later value wins, as with any JSON object.
            if let Some(existing) = categories.iter_mut().find(|c| c.name == name) {
                existing.keywords = keywords;
            } else {
                categories.push(Category::with_keywords(name, keywords));
            }
        }
        Ok(CategoryDocument(categories))
    }
}

#[cfg(test)]
mod tests;
