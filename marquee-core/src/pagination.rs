/// Page buttons to render around the current page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageWindow {
    pub pages: Vec<u32>,
    /// Render a `1` button ahead of the run
    pub show_first: bool,
    /// Render a `last` button after the run
    pub show_last: bool,
    /// Pages are skipped between `1` and the run, so render an ellipsis
    pub leading_gap: bool,
    /// Pages are skipped between the run and `last`
    pub trailing_gap: bool,
    pub has_previous: bool,
    pub has_next: bool,
}

/// Compute a contiguous run of at most `max_visible` pages centred on
/// `current` where possible.
///
/// `current` must already lie in `1..=total`.
pub fn window(current: u32, total: u32, max_visible: u32) -> PageWindow {
    let total = total.max(1);
    let visible = max_visible.clamp(1, total);
    let current = current.clamp(1, total);

    let mut start = current.saturating_sub(visible / 2).max(1);
    let end = (start + visible - 1).min(total);
    // Near the end the window slides left to stay full.
    if end - start + 1 < visible {
        start = end + 1 - visible;
    }

    PageWindow {
        pages: (start..=end).collect(),
        show_first: start > 1,
        show_last: end < total,
        leading_gap: start > 2,
        trailing_gap: end + 1 < total,
        has_previous: current > 1,
        has_next: current < total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centres_on_current_page() {
        let w = window(7, 20, 5);
        assert_eq!(w.pages, vec![5, 6, 7, 8, 9]);
        assert!(w.show_first);
        assert!(w.show_last);
        assert!(w.leading_gap);
        assert!(w.trailing_gap);
    }

    #[test]
    fn adjacent_edge_pages_render_without_ellipsis() {
        // 1 [2 3 4 5 6] 7
        let w = window(4, 7, 5);
        assert_eq!(w.pages, vec![2, 3, 4, 5, 6]);
        assert!(w.show_first && !w.leading_gap);
        assert!(w.show_last && !w.trailing_gap);

        // 1 … [4 5 6 7 8] 9
        let w = window(6, 9, 5);
        assert!(w.leading_gap);
        assert!(w.show_last && !w.trailing_gap);
    }

    #[test]
    fn small_totals_show_everything() {
        let w = window(1, 3, 5);
        assert_eq!(w.pages, vec![1, 2, 3]);
        assert!(!w.show_first);
        assert!(!w.show_last);
        assert!(!w.leading_gap && !w.trailing_gap);
        assert!(!w.has_previous);
        assert!(w.has_next);
    }

    #[test]
    fn clamps_at_both_edges() {
        assert_eq!(window(1, 20, 5).pages, vec![1, 2, 3, 4, 5]);
        assert_eq!(window(2, 20, 5).pages, vec![1, 2, 3, 4, 5]);
        assert_eq!(window(19, 20, 5).pages, vec![16, 17, 18, 19, 20]);

        let last = window(20, 20, 5);
        assert_eq!(last.pages, vec![16, 17, 18, 19, 20]);
        assert!(last.show_first);
        assert!(!last.show_last);
        assert!(!last.has_next);
    }

    #[test]
    fn always_returns_min_of_visible_and_total() {
        for total in 1..=12 {
            for current in 1..=total {
                let w = window(current, total, 5);
                assert_eq!(w.pages.len() as u32, total.min(5));
                assert!(w.pages.contains(&current));
                assert!(w.pages.windows(2).all(|p| p[1] == p[0] + 1));
            }
        }
    }
}
