//! Image carousel state for the auction detail view.

/// Cursor over an auction's photos that wraps at both ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageCarousel {
    images: Vec<String>,
    index: usize,
}

impl ImageCarousel {
    pub fn new(images: Vec<String>) -> Self {
        Self { images, index: 0 }
    }

    /// Image under the cursor, `None` when there are no images.
    pub fn current(&self) -> Option<&str> {
        self.images.get(self.index).map(String::as_str)
    }

    /// Advances to the next image, wrapping to the first.
    pub fn show_next(&mut self) -> Option<&str> {
        if !self.images.is_empty() {
            self.index = (self.index + 1) % self.images.len();
        }
        self.current()
    }

    /// Steps back to the previous image, wrapping to the last.
    pub fn show_prev(&mut self) -> Option<&str> {
        if !self.images.is_empty() {
            self.index = self
                .index
                .checked_sub(1)
                .unwrap_or(self.images.len() - 1);
        }
        self.current()
    }

    /// 1-based position for "n / total" display; 0 when empty.
    pub fn position(&self) -> usize {
        if self.images.is_empty() { 0 } else { self.index + 1 }
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carousel(n: usize) -> ImageCarousel {
        ImageCarousel::new((1..=n).map(|i| format!("/img/{i}.jpg")).collect())
    }

    #[test]
    fn test_next_wraps_to_first() {
        let mut c = carousel(3);
        assert_eq!(c.current(), Some("/img/1.jpg"));

        c.show_next();
        assert_eq!(c.show_next(), Some("/img/3.jpg"));
        assert_eq!(c.position(), 3);
        assert_eq!(c.show_next(), Some("/img/1.jpg"));
        assert_eq!(c.position(), 1);
    }

    #[test]
    fn test_prev_wraps_to_last() {
        let mut c = carousel(3);

        assert_eq!(c.show_prev(), Some("/img/3.jpg"));
        assert_eq!(c.show_prev(), Some("/img/2.jpg"));
        assert_eq!(c.position(), 2);
    }

    #[test]
    fn test_empty_carousel_is_inert() {
        let mut c = ImageCarousel::default();

        assert_eq!(c.current(), None);
        assert_eq!(c.show_next(), None);
        assert_eq!(c.show_prev(), None);
        assert_eq!(c.position(), 0);
        assert!(c.is_empty());
    }
}
