//! Favorite and user-authored affirmation lists.
//!
//! Favorites have set semantics over an ordered list; custom affirmations
//! keep insertion order and silently reject exact duplicates.

/// Toggle membership of `text` in the favorites list.
///
/// Returns `true` if the text is a favorite after the call.
pub fn toggle_favorite(favorites: &mut Vec<String>, text: &str) -> bool {
    if let Some(pos) = favorites.iter().position(|f| f == text) {
        favorites.remove(pos);
        false
    } else {
        favorites.push(text.to_string());
        true
    }
}

pub fn is_favorite(favorites: &[String], text: &str) -> bool {
    favorites.iter().any(|f| f == text)
}

/// Append a user-authored affirmation unless the exact text already exists.
///
/// Returns `true` if the list changed.
pub fn add_custom(customs: &mut Vec<String>, text: &str) -> bool {
    if customs.iter().any(|c| c == text) {
        false
    } else {
        customs.push(text.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_adds_then_removes() {
        let mut favs = Vec::new();
        assert!(toggle_favorite(&mut favs, "I am enough"));
        assert!(is_favorite(&favs, "I am enough"));
        assert!(!toggle_favorite(&mut favs, "I am enough"));
        assert!(favs.is_empty());
    }

    #[test]
    fn toggle_preserves_order_of_others() {
        let mut favs = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        toggle_favorite(&mut favs, "b");
        assert_eq!(favs, vec!["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn duplicate_custom_is_ignored() {
        let mut customs = Vec::new();
        assert!(add_custom(&mut customs, "I choose calm"));
        assert!(!add_custom(&mut customs, "I choose calm"));
        assert_eq!(customs.len(), 1);
    }

    #[test]
    fn customs_keep_insertion_order() {
        let mut customs = Vec::new();
        add_custom(&mut customs, "first");
        add_custom(&mut customs, "second");
        assert_eq!(customs, vec!["first".to_string(), "second".to_string()]);
    }
}
