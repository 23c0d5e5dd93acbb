use crate::error::{Error, Result};
use rayon::prelude::*;

/// Fixed-size worker pool for the per-step fan-out.
///
/// Wraps a dedicated `rayon::ThreadPool` so the simulation's thread
/// count is chosen at construction instead of inherited from the global
/// pool. `dispatch` is the only entry point: one contiguous chunk per
/// worker, full barrier on return.
#[derive(Debug)]
pub struct WorkerPool {
    pool: rayon::ThreadPool,
    workers: usize,
}

impl WorkerPool {
    /// Build a pool with exactly `workers` threads.
    ///
    /// Errors:
    /// - `Error::InvalidParam` if `workers` is zero.
    /// - `Error::Pool` if the underlying thread pool cannot be built.
    pub fn new(workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(Error::InvalidParam("worker count must be > 0".into()));
        }
        let pool = rayon::ThreadPoolBuilder::new().num_threads(workers).build()?;
        Ok(Self { pool, workers })
    }

    pub fn worker_count(&self) -> usize {
        self.workers
    }

    /// Split `items` into contiguous chunks, one per worker, and run
    /// `f(start_index, chunk)` on each. Returns only after every chunk
    /// finishes; a panicking chunk propagates and is fatal.
    ///
    /// Chunks are disjoint `&mut` sub-slices, so a chunk function cannot
    /// write outside its assigned index range. Any state it captures by
    /// shared reference must be treated as read-only for the duration of
    /// the call.
    pub fn dispatch<T, F>(&self, items: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Sync,
    {
        if items.is_empty() {
            return;
        }
        let chunk_size = items.len().div_ceil(self.workers);
        self.pool.install(|| {
            items
                .par_chunks_mut(chunk_size)
                .enumerate()
                .for_each(|(chunk_index, chunk)| f(chunk_index * chunk_size, chunk));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_workers_rejected() {
        let err = WorkerPool::new(0).unwrap_err();
        assert!(err.to_string().contains("worker count"));
    }

    #[test]
    fn dispatch_covers_every_index_exactly_once() -> Result<()> {
        let pool = WorkerPool::new(3)?;
        let mut counts = vec![0u32; 100];
        pool.dispatch(&mut counts, |_, chunk| {
            for c in chunk {
                *c += 1;
            }
        });
        assert!(counts.iter().all(|&c| c == 1));
        Ok(())
    }

    #[test]
    fn start_index_matches_slice_position() -> Result<()> {
        let pool = WorkerPool::new(4)?;
        let mut values = vec![0usize; 10];
        pool.dispatch(&mut values, |start, chunk| {
            for (offset, v) in chunk.iter_mut().enumerate() {
                *v = start + offset;
            }
        });
        assert_eq!(values, (0..10).collect::<Vec<_>>());
        Ok(())
    }

    #[test]
    fn empty_slice_is_a_no_op() -> Result<()> {
        let pool = WorkerPool::new(2)?;
        let mut empty: Vec<u32> = Vec::new();
        pool.dispatch(&mut empty, |_, _| unreachable!());
        Ok(())
    }

    #[test]
    fn more_workers_than_items_still_covers_all() -> Result<()> {
        let pool = WorkerPool::new(8)?;
        let mut values = vec![0u32; 3];
        pool.dispatch(&mut values, |_, chunk| {
            for v in chunk {
                *v += 1;
            }
        });
        assert_eq!(values, vec![1, 1, 1]);
        Ok(())
    }
}
