use std::cmp::Ordering;

/// Sort key for upstream string labels (episode numbers, translation ids).
///
/// Numeric labels order by value and always come before non-numeric ones,
/// which order lexically among themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelKey {
    Numeric(i64),
    Text(String),
}

impl LabelKey {
    pub fn parse(label: &str) -> Self {
        match label.trim().parse::<i64>() {
            Ok(n) => LabelKey::Numeric(n),
            Err(_) => LabelKey::Text(label.to_string()),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, LabelKey::Numeric(_))
    }
}

impl Ord for LabelKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (LabelKey::Numeric(a), LabelKey::Numeric(b)) => a.cmp(b),
            (LabelKey::Numeric(_), LabelKey::Text(_)) => Ordering::Less,
            (LabelKey::Text(_), LabelKey::Numeric(_)) => Ordering::Greater,
            (LabelKey::Text(a), LabelKey::Text(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for LabelKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
