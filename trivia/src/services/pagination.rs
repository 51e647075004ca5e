//! Fixed-size pages over an already ordered selection.

pub const QUESTIONS_PER_PAGE: usize = 10;

/// Items `[(page-1)*10, page*10)`. Pages below 1 and past the end are empty.
pub fn paginate<T: Clone>(items: &[T], page: i64) -> Vec<T> {
    let Ok(index) = usize::try_from(page.saturating_sub(1)) else {
        return Vec::new();
    };
    let start = index.saturating_mul(QUESTIONS_PER_PAGE);
    if start >= items.len() {
        return Vec::new();
    }
    let end = start.saturating_add(QUESTIONS_PER_PAGE).min(items.len());
    items[start..end].to_vec()
}

/// `?page=` value; anything missing or unparsable is page 1.
pub fn page_number(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> Vec<usize> {
        (1..=n).collect()
    }

    #[test]
    fn first_page_holds_ten() {
        assert_eq!(paginate(&items(23), 1), items(10));
    }

    #[test]
    fn last_page_is_partial() {
        assert_eq!(paginate(&items(23), 3), vec![21, 22, 23]);
    }

    #[test]
    fn out_of_range_pages_are_empty() {
        assert!(paginate(&items(23), 4).is_empty());
        assert!(paginate(&items(23), 0).is_empty());
        assert!(paginate(&items(23), -3).is_empty());
        assert!(paginate(&items(23), i64::MAX).is_empty());
    }

    #[test]
    fn page_number_falls_back_to_one() {
        assert_eq!(page_number(None), 1);
        assert_eq!(page_number(Some("abc")), 1);
        assert_eq!(page_number(Some("2")), 2);
        assert_eq!(page_number(Some("-1")), -1);
    }
}
