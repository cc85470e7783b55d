/// One page of `items`, 1-indexed. Pages past the end are empty.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Zero for an empty list, so the pager can be hidden.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_reconstruct_list() {
        let items: Vec<u32> = (0..23).collect();
        for size in [1, 5, 10, 23, 50] {
            let pages = total_pages(items.len(), size);
            let joined: Vec<u32> = (1..=pages)
                .flat_map(|p| paginate(&items, p, size).iter().copied())
                .collect();
            assert_eq!(joined, items, "page size {}", size);
        }
    }

    #[test]
    fn empty_and_out_of_range_are_empty() {
        let empty: Vec<u32> = vec![];
        assert_eq!(total_pages(0, 10), 0);
        for page in [0, 1, 2, 99] {
            assert!(paginate(&empty, page, 10).is_empty());
        }
        let items = [1, 2, 3];
        assert_eq!(total_pages(items.len(), 2), 2);
        assert!(paginate(&items, 3, 2).is_empty());
        assert!(paginate(&items, 0, 2).is_empty());
        assert_eq!(paginate(&items, 2, 2), &[3]);
    }
}
