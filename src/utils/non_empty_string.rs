/// A borrowed, already-trimmed string that is known not to be empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NonEmptyStringRef<'a>(&'a str);

impl<'a> NonEmptyStringRef<'a> {
    /// Trims `data` and returns `None` when nothing is left.
    pub fn new(data: &'a str) -> Option<Self> {
        let data = data.trim();
        if data.is_empty() {
            return None;
        }

        Some(Self(data))
    }

    pub fn as_str(&self) -> &'a str {
        self.0
    }
}
