use std::collections::HashSet;

/// A store or item name that has no entry in the convert table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UndefinedContentError {
    pub file_name: String,
    pub store_name: String,
    pub item_name: String,
}

impl UndefinedContentError {
    pub fn new(file_name: &str, store_name: &str, item_name: &str) -> Self {
        Self {
            file_name: file_name.to_string(),
            store_name: store_name.to_string(),
            item_name: item_name.to_string(),
        }
    }
}

/// Append-only list of undefined contents, deduplicated on
/// (file, store, item) and kept in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct UndefinedContentErrorHandler {
    errors: Vec<UndefinedContentError>,
    seen: HashSet<UndefinedContentError>,
}

impl UndefinedContentErrorHandler {
    pub fn push(&mut self, error: UndefinedContentError) {
        if self.seen.insert(error.clone()) {
            self.errors.push(error);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &UndefinedContentError> {
        self.errors.iter()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Extend<UndefinedContentError> for UndefinedContentErrorHandler {
    fn extend<I: IntoIterator<Item = UndefinedContentError>>(&mut self, iter: I) {
        for error in iter {
            self.push(error);
        }
    }
}
