//! Per-slice lane scheduling.
//!
//! `Workers` wraps an optional `scoped_threadpool::Pool` behind the
//! `threaded` feature. With `p == 1` or the feature disabled, `map` just
//! calls the closure in-thread; otherwise it spawns one scoped task per
//! lane and joins them before returning, which is exactly the slice
//! barrier.

#[cfg(feature = "threaded")]
pub use self::threadpool::Workers;

#[cfg(feature = "threaded")]
mod threadpool {
    use crate::block::Matrix;

    pub struct Workers(u32, Option<scoped_threadpool::Pool>);

    impl Workers {
        #[inline(always)]
        pub fn new(lanes: u32) -> Workers {
            match lanes {
                1 => Workers(lanes, None),
                n => Workers(lanes, Some(scoped_threadpool::Pool::new(n))),
            }
        }

        #[inline(always)]
        pub fn map<F>(&mut self, blocks: &mut Matrix, fill_segment: &F)
        where
            F: Fn(&mut Matrix, u32) + Sync,
        {
            match self {
                Workers(1, _) => fill_segment(blocks, 0),
                Workers(lanes, Some(pool)) => {
                    let lanes = *lanes;
                    pool.scoped(|sc| {
                        for lane in 0..lanes {
                            let m = unsafe { blocks.alias_mut() };
                            sc.execute(move || fill_segment(m, lane));
                        }
                    })
                }
                _ => unreachable!(),
            }
        }
    }
}

#[cfg(not(feature = "threaded"))]
pub use self::serial::Workers;

#[cfg(not(feature = "threaded"))]
mod serial {
    use crate::block::Matrix;

    /// Holds the number of lanes; always runs them serially.
    pub struct Workers(u32);

    impl Workers {
        #[inline(always)]
        pub fn new(lanes: u32) -> Workers { Workers(lanes) }

        #[inline(always)]
        pub fn map<F>(&mut self, blocks: &mut Matrix, fill_segment: &F)
        where
            F: Fn(&mut Matrix, u32) + Sync,
        {
            for lane in 0..self.0 {
                fill_segment(blocks, lane);
            }
        }
    }
}

#[cfg(all(test, feature = "threaded"))]
mod test {
    use super::*;
    use crate::block::Matrix;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn map_visits_every_lane_exactly_once() {
        let mut matrix = Matrix::new(4, 4);
        let mut workers = Workers::new(4);
        let seen = [AtomicU32::new(0), AtomicU32::new(0), AtomicU32::new(0), AtomicU32::new(0)];
        workers.map(&mut matrix, &|_m, lane| {
            seen[lane as usize].fetch_add(1, Ordering::SeqCst);
        });
        assert!(seen.iter().all(|c| c.load(Ordering::SeqCst) == 1));
    }
}
