//! Signal addressing: channel references and sample batches.
//!
//! A [`SignalRef`] names one scalar channel inside a multi-channel signal.
//! A [`SampleBatch`] is what the transport delivers once per tick: for every
//! signal key, an ordered list of equal-length channel arrays.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Reference to one channel (`index`) of a named signal (`key`).
///
/// Equality only looks at `key` and `index`; `name` is for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalRef {
    pub key: String,
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl SignalRef {
    pub fn new(key: impl Into<String>, index: usize) -> Self {
        Self {
            key: key.into(),
            index,
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The `"{key}_{index}"` identifier, independent of any display name.
    pub fn id(&self) -> String {
        format!("{}_{}", self.key, self.index)
    }

    /// Display name, falling back to [`SignalRef::id`].
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.id())
    }
}

/// Channel identity check used for duplicate detection and removal lookups.
#[inline]
pub fn compare(a: &SignalRef, b: &SignalRef) -> bool {
    a.key == b.key && a.index == b.index
}

impl PartialEq for SignalRef {
    fn eq(&self, other: &Self) -> bool {
        compare(self, other)
    }
}

impl Eq for SignalRef {}

impl std::hash::Hash for SignalRef {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key.hash(state);
        self.index.hash(state);
    }
}

impl fmt::Display for SignalRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.key, self.index)
    }
}

/// One delivery of new samples: signal key -> channel arrays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SampleBatch {
    signals: HashMap<String, Vec<Vec<f64>>>,
}

impl SampleBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert of all channels for `key`.
    pub fn with(mut self, key: impl Into<String>, channels: Vec<Vec<f64>>) -> Self {
        self.insert(key, channels);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, channels: Vec<Vec<f64>>) {
        self.signals.insert(key.into(), channels);
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.signals.keys().map(String::as_str)
    }

    /// All channel arrays for `key`; empty when the key is absent.
    pub fn channels(&self, key: &str) -> &[Vec<f64>] {
        self.signals.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Samples of the referenced channel.
    ///
    /// An absent key or an out-of-range index yields an empty slice: a plot
    /// configured ahead of its data source simply renders nothing this tick.
    pub fn fetch(&self, sig: &SignalRef) -> &[f64] {
        self.channels(&sig.key)
            .get(sig.index)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl From<HashMap<String, Vec<Vec<f64>>>> for SampleBatch {
    fn from(signals: HashMap<String, Vec<Vec<f64>>>) -> Self {
        Self { signals }
    }
}

/// Index from the end for negative `i`, clamping under-runs to the first element.
///
/// `at(buf, -1)` is the last element; `at(buf, -100)` on a 3-element buffer
/// is `buf[0]`. Non-negative indices are used as-is. Returns `None` only for
/// an empty buffer or a non-negative index past the end.
pub fn at<T>(buffer: &[T], i: isize) -> Option<&T> {
    if i < 0 {
        let idx = (buffer.len() as isize + i).max(0) as usize;
        buffer.get(idx)
    } else {
        buffer.get(i as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_counts_from_end_and_clamps() {
        let v = [1.0, 2.0, 3.0];
        assert_eq!(at(&v, -1), Some(&3.0));
        assert_eq!(at(&v, -3), Some(&1.0));
        assert_eq!(at(&v, -50), Some(&1.0));
        assert_eq!(at(&v, 1), Some(&2.0));
        assert_eq!(at(&v, 3), None);
        assert_eq!(at::<f64>(&[], -1), None);
    }

    #[test]
    fn fetch_missing_key_or_index_is_empty() {
        let batch = SampleBatch::new().with("sig", vec![vec![1.0, 2.0]]);
        assert_eq!(batch.fetch(&SignalRef::new("sig", 0)), &[1.0, 2.0]);
        assert!(batch.fetch(&SignalRef::new("sig", 1)).is_empty());
        assert!(batch.fetch(&SignalRef::new("other", 0)).is_empty());
    }

    #[test]
    fn equality_ignores_display_name() {
        let a = SignalRef::new("acc", 2).with_name("Acc Z");
        let b = SignalRef::new("acc", 2);
        assert_eq!(a, b);
        assert!(compare(&a, &b) && compare(&b, &a));
        assert_ne!(a, SignalRef::new("acc", 1));
        assert_eq!(b.display_name(), "acc_2");
        assert_eq!(a.display_name(), "Acc Z");
    }
}
