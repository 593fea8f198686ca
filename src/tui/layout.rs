use ratatui::layout::{Constraint, Direction, Flex, Layout, Rect};

/// Panel layout configuration
pub struct AppLayout {
    pub filters_area: Rect,
    pub disabled_area: Rect,
    pub details_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Create panel layout:
    /// - Filters over disabled: 55% width (left), 70/30 split
    /// - Details / matches: 45% width (right)
    /// - Status bar: bottom row
    pub fn new(area: Rect) -> Self {
        let vertical_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(area);

        let horizontal_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(vertical_chunks[0]);

        let list_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(horizontal_chunks[0]);

        Self {
            filters_area: list_chunks[0],
            disabled_area: list_chunks[1],
            details_area: horizontal_chunks[1],
            status_area: vertical_chunks[1],
        }
    }
}

/// Centered popup of the given size, clamped to `area`
pub fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [popup] =
        Layout::horizontal([Constraint::Length(width.min(area.width))]).flex(Flex::Center).areas(row);
    popup
}

/// Rows available for list items inside a bordered block
pub fn inner_rows(area: Rect) -> usize {
    usize::from(area.height.saturating_sub(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_splits_correctly() {
        let area = Rect::new(0, 0, 100, 31);
        let layout = AppLayout::new(area);

        assert_eq!(layout.status_area.height, 1);
        assert_eq!(layout.status_area.y, 30);

        assert_eq!(layout.filters_area.width, 55);
        assert_eq!(layout.details_area.width, 45);
        assert_eq!(layout.details_area.height, 30);
        assert_eq!(layout.filters_area.height + layout.disabled_area.height, 30);
        assert_eq!(layout.filters_area.height, 21);
    }

    #[test]
    fn test_popup_is_centered_and_clamped() {
        let area = Rect::new(0, 0, 100, 30);
        let popup = popup_area(area, 60, 20);
        assert_eq!(popup, Rect::new(20, 5, 60, 20));

        let small = popup_area(Rect::new(0, 0, 10, 5), 60, 20);
        assert_eq!(small, Rect::new(0, 0, 10, 5));
    }

    #[test]
    fn test_inner_rows() {
        assert_eq!(inner_rows(Rect::new(0, 0, 10, 12)), 10);
        assert_eq!(inner_rows(Rect::new(0, 0, 10, 1)), 0);
    }
}
