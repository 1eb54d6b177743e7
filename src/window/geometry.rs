//! Display geometry.
//!
//! The kiosk window spans every attached display, so its position and size
//! come from the bounding rectangle over all of them.

/// Position and size of one attached display, in virtual-desktop
/// coordinates. Also used for the union rectangle itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayBounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl DisplayBounds {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }
}

/// Bounding rectangle over all displays: min of lefts/tops, max of
/// rights/bottoms. An empty display list yields the zero rectangle.
pub fn virtual_desktop(displays: &[DisplayBounds]) -> DisplayBounds {
    let Some((first, rest)) = displays.split_first() else {
        return DisplayBounds::default();
    };

    let mut left = first.x;
    let mut top = first.y;
    let mut right = first.right();
    let mut bottom = first.bottom();

    for display in rest {
        left = left.min(display.x);
        top = top.min(display.y);
        right = right.max(display.right());
        bottom = bottom.max(display.bottom());
    }

    DisplayBounds::new(left, top, right - left, bottom - top)
}

/// Source of attached-display information.
pub trait Screen: Send + Sync {
    fn displays(&self) -> Vec<DisplayBounds>;
}

/// A fixed display arrangement. Backs the headless backend and tests.
#[derive(Debug, Clone)]
pub struct StaticScreen {
    displays: Vec<DisplayBounds>,
}

impl StaticScreen {
    pub fn new(displays: Vec<DisplayBounds>) -> Self {
        Self { displays }
    }

    /// One display at the origin.
    pub fn single(width: i32, height: i32) -> Self {
        Self::new(vec![DisplayBounds::new(0, 0, width, height)])
    }
}

impl Screen for StaticScreen {
    fn displays(&self) -> Vec<DisplayBounds> {
        self.displays.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_display_is_its_own_union() {
        let bounds = DisplayBounds::new(0, 0, 1920, 1080);
        assert_eq!(virtual_desktop(&[bounds]), bounds);
    }

    #[test]
    fn two_by_two_grid_union() {
        let displays = [
            DisplayBounds::new(0, 0, 1920, 1080),
            DisplayBounds::new(1920, 0, 1920, 1080),
            DisplayBounds::new(0, 1080, 1920, 1080),
            DisplayBounds::new(1920, 1080, 1920, 1080),
        ];
        assert_eq!(
            virtual_desktop(&displays),
            DisplayBounds::new(0, 0, 3840, 2160)
        );
    }

    #[test]
    fn union_handles_negative_origins() {
        let displays = [
            DisplayBounds::new(-1920, 0, 1920, 1080),
            DisplayBounds::new(0, -200, 2560, 1440),
        ];
        let union = virtual_desktop(&displays);
        assert_eq!(union.x, -1920);
        assert_eq!(union.y, -200);
        assert_eq!(union.right(), 2560);
        assert_eq!(union.bottom(), 1240);
    }

    #[test]
    fn empty_display_list_is_zero_rect() {
        assert_eq!(virtual_desktop(&[]), DisplayBounds::default());
    }
}
