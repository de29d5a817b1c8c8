/// Axis-aligned box in world pixels; `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> i32 {
        self.x + self.width / 2
    }

    pub fn center_y(&self) -> i32 {
        self.y + self.height / 2
    }

    /// Strict overlap; boxes that only share an edge do not collide.
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        let b = Bounds::new(10, 20, 64, 32);
        assert_eq!(b.right(), 74);
        assert_eq!(b.bottom(), 52);
        assert_eq!(b.center_x(), 42);
        assert_eq!(b.center_y(), 36);
    }

    #[test]
    fn test_overlap() {
        let a = Bounds::new(0, 0, 10, 10);
        assert!(a.overlaps(&Bounds::new(5, 5, 10, 10)));
        assert!(a.overlaps(&Bounds::new(2, 2, 2, 2)));
        assert!(!a.overlaps(&Bounds::new(20, 0, 10, 10)));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Bounds::new(0, 0, 10, 10);
        assert!(!a.overlaps(&Bounds::new(10, 0, 10, 10)));
        assert!(!a.overlaps(&Bounds::new(0, 10, 10, 10)));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_overlap_is_symmetric(
                ax in -100i32..100, ay in -100i32..100, aw in 1i32..80, ah in 1i32..80,
                bx in -100i32..100, by in -100i32..100, bw in 1i32..80, bh in 1i32..80,
            ) {
                let a = Bounds::new(ax, ay, aw, ah);
                let b = Bounds::new(bx, by, bw, bh);
                prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
            }
        }
    }
}
