/// Compatibility layer for rayon/sequential execution.
///
/// When the `parallel` feature is enabled, this re-exports rayon's parallel iterators.
/// When disabled, it provides sequential fallbacks for the API surface the
/// wind-shelter scan uses: `par_chunks_mut`, `enumerate` and `for_each_init`.
#[cfg(feature = "parallel")]
pub use rayon::prelude::*;

#[cfg(not(feature = "parallel"))]
mod sequential {
    /// Sequential stand-in for `rayon::slice::ParallelSliceMut`.
    pub trait ParallelSliceMut<T> {
        fn par_chunks_mut(&mut self, chunk_size: usize) -> std::slice::ChunksMut<'_, T>;
    }

    impl<T> ParallelSliceMut<T> for [T] {
        fn par_chunks_mut(&mut self, chunk_size: usize) -> std::slice::ChunksMut<'_, T> {
            self.chunks_mut(chunk_size)
        }
    }

    /// Sequential stand-in for `rayon::iter::ParallelIterator::for_each_init`.
    ///
    /// `init` runs once, so the single "worker" reuses one scratch value.
    pub trait ForEachInit: Iterator + Sized {
        fn for_each_init<S, INIT, OP>(self, init: INIT, op: OP)
        where
            INIT: Fn() -> S,
            OP: Fn(&mut S, Self::Item),
        {
            let mut state = init();
            for item in self {
                op(&mut state, item);
            }
        }
    }

    impl<I: Iterator> ForEachInit for I {}
}

#[cfg(not(feature = "parallel"))]
pub use sequential::*;
