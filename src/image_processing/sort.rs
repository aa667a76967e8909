use super::bucket::ColorKey;

/// Draw order of the color buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Ascending keys
    Normal,
    /// Descending keys
    #[default]
    Reverse,
}

impl SortOrder {
    pub fn from_normal_flag(normal: bool) -> Self {
        if normal {
            SortOrder::Normal
        } else {
            SortOrder::Reverse
        }
    }
}

/// Sort distinct keys in place. Keys never repeat, so the order is total.
pub fn sort_keys(keys: &mut [ColorKey], order: SortOrder) {
    match order {
        SortOrder::Normal => keys.sort_unstable(),
        SortOrder::Reverse => keys.sort_unstable_by(|a, b| b.cmp(a)),
    }
}
