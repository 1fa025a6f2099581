/// Source of uniformly chosen indices; `next_index(n)` must return a value in `0..n`.
pub trait IndexSource {
    fn next_index(&mut self, exclusive_upper_bound: usize) -> usize;
}

impl<F> IndexSource for F
where
    F: FnMut(usize) -> usize,
{
    fn next_index(&mut self, exclusive_upper_bound: usize) -> usize {
        self(exclusive_upper_bound)
    }
}

/// Always answers the same index. Handy for reproducible games and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedIndex(pub usize);

impl IndexSource for FixedIndex {
    fn next_index(&mut self, _exclusive_upper_bound: usize) -> usize {
        self.0
    }
}

/// Replays a list of indices in order, wrapping around at the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceIndex {
    values: Vec<usize>,
    cursor: usize,
}

impl SequenceIndex {
    pub fn new(values: impl Into<Vec<usize>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }
}

impl IndexSource for SequenceIndex {
    fn next_index(&mut self, _exclusive_upper_bound: usize) -> usize {
        if self.values.is_empty() {
            return 0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor = self.cursor.wrapping_add(1);
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_wraps_around() {
        let mut source = SequenceIndex::new([7, 5]);
        let picks = (0..5).map(|_| source.next_index(11)).collect::<Vec<_>>();
        assert_eq!(picks, vec![7, 5, 7, 5, 7]);
    }

    #[test]
    fn closures_are_index_sources() {
        let mut calls = Vec::new();
        let mut source = |upper: usize| {
            calls.push(upper);
            upper - 1
        };
        assert_eq!(source.next_index(4), 3);
        assert_eq!(calls, vec![4]);
    }
}
