#![allow(clippy::unwrap_used)]

use super::*;

fn temp_store() -> (tempfile::TempDir, CategoryStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = CategoryStore::load(&dir.path().join("categories.json")).unwrap();
    (dir, store)
}

// ── load ──────────────────────────────────────────────────────

#[test]
fn test_load_missing_file_uses_default() {
    let (_dir, store) = temp_store();
    assert_eq!(store.names(), vec![DEFAULT_CATEGORY]);
    assert!(!store.path().exists());
}

#[test]
fn test_load_existing_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("categories.json");
    fs::write(
        &path,
        r#"{"Uncategorized": [], "Food": ["coffee shop", "bakery"], "Rent": ["landlord"]}"#,
    )
    .unwrap();

    let store = CategoryStore::load(&path).unwrap();
    assert_eq!(store.names(), vec!["Uncategorized", "Food", "Rent"]);
    assert_eq!(
        store.keywords("Food").unwrap(),
        &["coffee shop".to_string(), "bakery".to_string()]
    );
}

#[test]
fn test_load_keeps_document_key_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("categories.json");
    fs::write(&path, r#"{"Zoo": [], "Uncategorized": [], "Apples": []}"#).unwrap();

    let store = CategoryStore::load(&path).unwrap();
    assert_eq!(store.names(), vec!["Zoo", "Uncategorized", "Apples"]);
}

#[test]
fn test_load_inserts_missing_default() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("categories.json");
    fs::write(&path, r#"{"Food": ["coffee"]}"#).unwrap();

    let store = CategoryStore::load(&path).unwrap();
    assert_eq!(store.names(), vec![DEFAULT_CATEGORY, "Food"]);
}

#[test]
fn test_load_malformed_document_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("categories.json");
    fs::write(&path, "{not json").unwrap();

    let err = CategoryStore::load(&path).unwrap_err();
    assert!(format!("{err:#}").contains("Malformed category file"));
}

#[test]
fn test_load_wrong_shape_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("categories.json");
    fs::write(&path, r#"["Food", "Rent"]"#).unwrap();
    assert!(CategoryStore::load(&path).is_err());

    fs::write(&path, r#"{"Food": "coffee"}"#).unwrap();
    assert!(CategoryStore::load(&path).is_err());
}

// ── save ──────────────────────────────────────────────────────

#[test]
fn test_save_load_roundtrip() {
    let (_dir, mut store) = temp_store();
    store.add_category("Travel").unwrap();
    store.add_category("Food").unwrap();
    store.add_keyword("Food", "Coffee Shop").unwrap();
    store.add_keyword("Food", "Bakery").unwrap();
    store.add_keyword("Travel", "Airline").unwrap();

    let reloaded = CategoryStore::load(store.path()).unwrap();
    assert_eq!(reloaded.categories(), store.categories());
    assert_eq!(reloaded.names(), vec!["Uncategorized", "Travel", "Food"]);
}

#[test]
fn test_save_writes_plain_object() {
    let (_dir, mut store) = temp_store();
    store.add_category("Food").unwrap();
    store.add_keyword("Food", "coffee").unwrap();

    let raw = fs::read_to_string(store.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        value,
        serde_json::json!({"Uncategorized": [], "Food": ["coffee"]})
    );
}

#[test]
fn test_save_creates_parent_dirs_and_leaves_no_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("deeper").join("categories.json");
    let store = CategoryStore::new(path.clone());
    store.save().unwrap();

    assert!(path.exists());
    assert!(!path.with_extension("json.tmp").exists());
}

// ── add_category ──────────────────────────────────────────────

#[test]
fn test_add_category_persists() {
    let (_dir, mut store) = temp_store();
    assert!(store.add_category("Food").unwrap());
    assert!(store.contains("Food"));
    assert!(store.path().exists());
    assert_eq!(store.keywords("Food").unwrap().len(), 0);
}

#[test]
fn test_add_category_twice_keeps_one_entry() {
    let (_dir, mut store) = temp_store();
    assert!(store.add_category("Food").unwrap());
    assert!(!store.add_category("Food").unwrap());
    assert_eq!(store.names(), vec!["Uncategorized", "Food"]);
}

#[test]
fn test_add_category_is_case_sensitive() {
    let (_dir, mut store) = temp_store();
    assert!(store.add_category("Food").unwrap());
    assert!(store.add_category("food").unwrap());
    assert_eq!(store.categories().len(), 3);
}

#[test]
fn test_add_category_blank_name_rejected() {
    let (_dir, mut store) = temp_store();
    assert!(!store.add_category("   ").unwrap());
    assert!(!store.add_category(DEFAULT_CATEGORY).unwrap());
    assert!(!store.path().exists());
}

// ── add_keyword ───────────────────────────────────────────────

#[test]
fn test_add_keyword_trims() {
    let (_dir, mut store) = temp_store();
    store.add_category("Food").unwrap();
    assert!(store.add_keyword("Food", "  Coffee Shop  ").unwrap());
    assert_eq!(store.keywords("Food").unwrap(), &["Coffee Shop".to_string()]);
}

#[test]
fn test_add_keyword_empty_is_noop() {
    let (_dir, mut store) = temp_store();
    store.add_category("Food").unwrap();
    let before = fs::read_to_string(store.path()).unwrap();

    assert!(!store.add_keyword("Food", "").unwrap());
    assert!(!store.add_keyword("Food", "   ").unwrap());
    assert!(store.keywords("Food").unwrap().is_empty());
    assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
}

#[test]
fn test_add_keyword_duplicate_is_noop() {
    let (_dir, mut store) = temp_store();
    store.add_category("Food").unwrap();
    assert!(store.add_keyword("Food", "coffee").unwrap());
    assert!(!store.add_keyword("Food", "coffee").unwrap());
    assert!(!store.add_keyword("Food", " coffee ").unwrap());
    assert_eq!(store.keywords("Food").unwrap().len(), 1);
}

#[test]
fn test_add_keyword_duplicate_check_is_exact() {
    // Exact comparison: a different casing is a distinct keyword.
    let (_dir, mut store) = temp_store();
    store.add_category("Food").unwrap();
    assert!(store.add_keyword("Food", "coffee").unwrap());
    assert!(store.add_keyword("Food", "Coffee").unwrap());
    assert_eq!(store.keywords("Food").unwrap().len(), 2);
}

#[test]
fn test_same_keyword_in_multiple_categories() {
    let (_dir, mut store) = temp_store();
    store.add_category("Food").unwrap();
    store.add_category("Treats").unwrap();
    assert!(store.add_keyword("Food", "coffee").unwrap());
    assert!(store.add_keyword("Treats", "coffee").unwrap());
}

#[test]
fn test_add_keyword_unknown_category_errors() {
    let (_dir, mut store) = temp_store();
    assert!(store.add_keyword("Nope", "coffee").is_err());
}

// ── reassign_keyword / remove_category ────────────────────────

#[test]
fn test_reassign_keyword_matches_normalized() {
    let (_dir, mut store) = temp_store();
    store.add_category("Food").unwrap();
    store.add_category("Treats").unwrap();
    store.add_keyword("Food", "Coffee Shop").unwrap();
    store.add_keyword("Food", "bakery").unwrap();

    assert!(store.reassign_keyword("  COFFEE shop ", "Treats").unwrap());
    assert_eq!(store.keywords("Food").unwrap(), &["bakery".to_string()]);
    assert_eq!(store.keywords("Treats").unwrap(), &["COFFEE shop".to_string()]);
    assert!(!store.reassign_keyword("coffee shop", "Treats").unwrap());

    let reloaded = CategoryStore::load(store.path()).unwrap();
    assert_eq!(reloaded.keywords("Food").unwrap(), &["bakery".to_string()]);
    assert_eq!(reloaded.keywords("Treats").unwrap(), &["COFFEE shop".to_string()]);
}

#[test]
fn test_reassign_keyword_clears_every_other_category() {
    let (_dir, mut store) = temp_store();
    for name in ["Travel", "Food", "Fun"] {
        store.add_category(name).unwrap();
    }
    store.add_keyword("Food", "coffee shop").unwrap();
    store.add_keyword("Fun", "Coffee Shop").unwrap();

    assert!(store.reassign_keyword("Coffee Shop", "Travel").unwrap());
    assert!(store.keywords("Food").unwrap().is_empty());
    assert!(store.keywords("Fun").unwrap().is_empty());
    assert_eq!(store.keywords("Travel").unwrap(), &["Coffee Shop".to_string()]);
}

#[test]
fn test_reassign_keyword_to_default_only_removes() {
    let (_dir, mut store) = temp_store();
    store.add_category("Food").unwrap();
    store.add_keyword("Food", "coffee shop").unwrap();

    assert!(store.reassign_keyword("coffee shop", DEFAULT_CATEGORY).unwrap());
    assert!(store.keywords("Food").unwrap().is_empty());
    assert!(store.keywords(DEFAULT_CATEGORY).unwrap().is_empty());
}

#[test]
fn test_reassign_keyword_rejects_unknown_and_blank() {
    let (_dir, mut store) = temp_store();
    assert!(store.reassign_keyword("coffee", "Nope").is_err());
    assert!(!store.reassign_keyword("   ", DEFAULT_CATEGORY).unwrap());
}

#[test]
fn test_reassign_keyword_save_failure_keeps_document() {
    let (_dir, mut store) = temp_store();
    store.add_category("Food").unwrap();
    store.add_category("Treats").unwrap();
    store.add_keyword("Food", "coffee shop").unwrap();

    let path = store.path().to_path_buf();
    fs::remove_file(&path).unwrap();
    fs::create_dir(&path).unwrap();

    assert!(store.reassign_keyword("coffee shop", "Treats").is_err());
    assert_eq!(store.keywords("Food").unwrap(), &["coffee shop".to_string()]);
    assert!(store.keywords("Treats").unwrap().is_empty());
}

#[test]
fn test_remove_category() {
    let (_dir, mut store) = temp_store();
    store.add_category("Food").unwrap();
    assert!(store.remove_category("Food").unwrap());
    assert!(!store.contains("Food"));
    assert!(!store.remove_category("Food").unwrap());
}

#[test]
fn test_remove_category_trims_name() {
    let (_dir, mut store) = temp_store();
    store.add_category("Food").unwrap();
    assert!(store.remove_category("  Food ").unwrap());
    assert!(!store.contains("Food"));
}

#[test]
fn test_default_category_cannot_be_removed() {
    let (_dir, mut store) = temp_store();
    assert!(!store.remove_category(DEFAULT_CATEGORY).unwrap());
    assert!(store.contains(DEFAULT_CATEGORY));
}

#[test]
fn test_save_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    // A directory where the file should be makes the rename fail.
    let path = dir.path().join("categories.json");
    fs::create_dir(&path).unwrap();
    let mut store = CategoryStore::new(path);
    assert!(store.add_category("Food").is_err());
}
