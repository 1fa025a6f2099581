use house::IndexSource;
use rand::Rng;

/// Hiding-spot draws backed by the thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct ThreadRngIndex;

impl IndexSource for ThreadRngIndex {
    fn next_index(&mut self, exclusive_upper_bound: usize) -> usize {
        if exclusive_upper_bound == 0 {
            return 0;
        }
        rand::thread_rng().gen_range(0..exclusive_upper_bound)
    }
}
