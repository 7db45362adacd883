// ==============================================
// MEMO CONCURRENCY TESTS (integration)
// ==============================================
//
// Races between invocations, resets, and counter reads on a shared Memo.
// These require multi-threaded execution and cannot live inline.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Barrier};
use std::thread;

use memokit::memo::Memo;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ==============================================
// Racing Misses
// ==============================================
//
// The computation runs outside the lock, so every thread that misses on the
// same key computes independently. The store still ends up with one entry.

mod racing_misses {
    use super::*;

    #[test]
    fn same_key_misses_each_compute_and_store_once() {
        let threads = 8;
        let computations = Arc::new(AtomicUsize::new(0));
        // Every thread must be inside the computation at once before any can
        // finish, which only works if no lock is held while computing.
        let inside = Arc::new(Barrier::new(threads));

        let memo = {
            let computations = computations.clone();
            let inside = inside.clone();
            Arc::new(Memo::new(
                move |n: &u64| {
                    computations.fetch_add(1, Ordering::SeqCst);
                    inside.wait();
                    n * 3
                },
                |_: &u64| true,
                true,
            ))
        };

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let memo = memo.clone();
                thread::spawn(move || memo.invoke(7))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 21);
        }

        assert_eq!(computations.load(Ordering::SeqCst), threads);
        assert_eq!(memo.cache_size(), 1);
        assert_eq!(memo.misses(), Some(threads as u64));
        assert_eq!(memo.hits(), Some(0));
        memo.check_invariants().unwrap();

        // Later calls are hits
        assert_eq!(memo.invoke(7), 21);
        assert_eq!(memo.hits(), Some(1));
    }

    #[cfg(feature = "metrics")]
    #[test]
    fn racing_inserts_are_counted_as_overwrites() {
        use memokit::metrics::traits::MetricsSnapshotProvider;

        let threads = 4;
        let inside = Arc::new(Barrier::new(threads));
        let memo = {
            let inside = inside.clone();
            Arc::new(Memo::new(
                move |n: &u32| {
                    inside.wait();
                    *n
                },
                |_: &u32| true,
                true,
            ))
        };

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let memo = memo.clone();
                thread::spawn(move || memo.invoke(1))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = memo.snapshot();
        assert_eq!(snapshot.admitted, threads as u64);
        assert_eq!(snapshot.overwrites, threads as u64 - 1);
        assert_eq!(snapshot.cache_len, 1);
        memo.check_invariants().unwrap();
    }
}

// ==============================================
// Slow Computation Isolation
// ==============================================
//
// A computation blocked on one key must not stall lookups, inserts, or
// resets for other keys.

mod slow_computation {
    use super::*;

    #[test]
    fn blocked_computation_does_not_hold_the_lock() {
        let (started_tx, started_rx) = mpsc::channel::<()>();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let release_rx = Arc::new(parking_lot::Mutex::new(release_rx));

        let memo = {
            let started_tx = parking_lot::Mutex::new(started_tx);
            let release_rx = release_rx.clone();
            Arc::new(Memo::new(
                move |n: &u32| {
                    if *n == 0 {
                        started_tx.lock().send(()).unwrap();
                        release_rx.lock().recv().unwrap();
                    }
                    n + 100
                },
                |_: &u32| true,
                true,
            ))
        };

        let slow = {
            let memo = memo.clone();
            thread::spawn(move || memo.invoke(0))
        };

        started_rx.recv().unwrap();

        // The slow miss is parked inside its computation
        assert_eq!(memo.invoke(1), 101);
        assert_eq!(memo.invoke(1), 101);
        assert!(memo.reset(&1));
        assert_eq!(memo.cache_size(), 0);
        assert_eq!(memo.hits(), Some(1));

        release_tx.send(()).unwrap();
        assert_eq!(slow.join().unwrap(), 100);
        assert!(memo.contains(&0));
        assert_eq!(memo.misses(), Some(2));
    }
}

// ==============================================
// Mixed Workload
// ==============================================

mod mixed_workload {
    use super::*;

    #[test]
    fn counters_account_for_every_call() {
        let threads = 8;
        let calls_per_thread = 2_000;
        let keys = 64u64;

        let memo = Arc::new(Memo::new(|n: &u64| n.wrapping_mul(*n), |_: &u64| true, true));
        let start = Arc::new(Barrier::new(threads));

        let handles: Vec<_> = (0..threads)
            .map(|tid| {
                let memo = memo.clone();
                let start = start.clone();
                thread::spawn(move || {
                    let mut rng = StdRng::seed_from_u64(tid as u64);
                    start.wait();
                    for _ in 0..calls_per_thread {
                        let key = rng.gen_range(0..keys);
                        assert_eq!(memo.invoke(key), key.wrapping_mul(key));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stats = memo.stats().unwrap();
        assert_eq!(stats.total(), (threads * calls_per_thread) as u64);
        assert!(stats.misses >= memo.cache_size() as u64);
        assert!(memo.cache_size() as u64 <= keys);
        memo.check_invariants().unwrap();
    }

    #[test]
    fn resets_interleaved_with_invocations() {
        let threads = 6;
        let iterations = 1_000;

        let memo = Arc::new(Memo::new(
            |n: &u32| n.count_ones(),
            |v: &u32| v % 2 == 0,
            true,
        ));
        let start = Arc::new(Barrier::new(threads + 1));

        let workers: Vec<_> = (0..threads)
            .map(|tid| {
                let memo = memo.clone();
                let start = start.clone();
                thread::spawn(move || {
                    let mut rng = StdRng::seed_from_u64(1_000 + tid as u64);
                    start.wait();
                    for _ in 0..iterations {
                        let key = rng.gen_range(0u32..128);
                        assert_eq!(memo.invoke(key), key.count_ones());
                        if rng.gen_bool(0.1) {
                            memo.reset(&key);
                        }
                    }
                })
            })
            .collect();

        let resetter = {
            let memo = memo.clone();
            let start = start.clone();
            thread::spawn(move || {
                start.wait();
                for round in 0..50 {
                    memo.reset_all(round % 10 == 0);
                    thread::yield_now();
                }
            })
        };

        for worker in workers {
            worker.join().unwrap();
        }
        resetter.join().unwrap();

        memo.check_invariants().unwrap();
        assert!(memo.total().is_some());
    }

    #[test]
    fn uninstrumented_memo_under_contention() {
        let memo = Arc::new(Memo::new(|n: &u16| u32::from(*n) * 2, |_: &u32| true, false));

        let handles: Vec<_> = (0..4u16)
            .map(|tid| {
                let memo = memo.clone();
                thread::spawn(move || {
                    for key in 0..256u16 {
                        assert_eq!(memo.invoke(key ^ tid), u32::from(key ^ tid) * 2);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(memo.cache_size(), 256);
        assert_eq!(memo.hits(), None);
        assert_eq!(memo.misses(), None);
        assert_eq!(memo.total(), None);
    }
}
