//! Keyword lookups passed to `filter_by`, `exclude_by` and `get_or_404`.

use djq_core::Value;

/// An ordered mapping from lookup keys to values.
///
/// Inserting a key that is already present replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lookups {
    entries: Vec<(String, Value)>,
}

impl Lookups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a lookup.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder form of [`Lookups::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Lookups {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut lookups = Lookups::new();
        for (k, v) in iter {
            lookups.insert(k, v);
        }
        lookups
    }
}

impl IntoIterator for Lookups {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Build [`Lookups`] from `key => value` pairs.
///
/// ```ignore
/// let lookups = lookups! {
///     "blog__name__istartswith" => "e",
///     "pub_date__year" => 2008i64,
/// };
/// ```
#[macro_export]
macro_rules! lookups {
    () => {
        $crate::Lookups::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        {
            let mut lookups = $crate::Lookups::new();
            $(
                lookups.insert($key, $value);
            )+
            lookups
        }
    };
}
