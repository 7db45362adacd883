// ==============================================
// END-TO-END MEMO SCENARIOS (integration)
// ==============================================
//
// Exercises the public surface through the prelude the way a caller would:
// decorate a function, call it, invalidate, and read the counters.

use std::convert::Infallible;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use memokit::prelude::*;

// ==============================================
// Decorating Functions
// ==============================================

mod decorating {
    use super::*;

    fn binomial(args: &Args<u64>) -> u64 {
        let (n, k) = (args[0], args[1]);
        (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
    }

    #[test]
    fn variadic_function_behind_memoize() {
        let choose = memoize(binomial);

        assert_eq!(choose.invoke(args![5, 2]), 10);
        assert_eq!(choose.invoke(args![10, 3]), 120);
        assert_eq!(choose.invoke(args![5, 2]), 10);

        assert_eq!(choose.hits(), Some(1));
        assert_eq!(choose.misses(), Some(2));
        assert_eq!(choose.cache_size(), 2);
    }

    #[test]
    fn large_values_shared_through_arc() {
        let allocations = Arc::new(AtomicUsize::new(0));
        let counter = allocations.clone();
        let table = Memo::new(
            move |n: &usize| {
                counter.fetch_add(1, Ordering::SeqCst);
                Arc::new((0..*n).collect::<Vec<usize>>())
            },
            |_: &Arc<Vec<usize>>| true,
            true,
        );

        let first = table.invoke(1_000);
        let second = table.invoke(1_000);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(allocations.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn generic_caller_through_memoized_fn() {
        fn sum_all<M>(f: &M, keys: impl IntoIterator<Item = u32>) -> u32
        where
            M: MemoizedFn<u32, Output = u32, Error = Infallible>,
        {
            keys.into_iter()
                .map(|k| f.try_call(k).unwrap_or_else(|never| match never {}))
                .sum()
        }

        let triple = MemoBuilder::<u32, u32>::new()
            .compute(|n| n * 3)
            .build()
            .unwrap();
        assert_eq!(sum_all(&triple, [1, 2, 3, 1]), 21);
        assert_eq!(triple.hits(), Some(1));
    }
}

// ==============================================
// Admission Policies
// ==============================================

mod admission_policies {
    use super::*;

    #[test]
    fn only_even_results_are_stored() {
        let memo = Memo::new(|n: &u64| n * n, |v: &u64| v % 2 == 0, true);

        assert_eq!(memo.invoke(2), 4);
        assert_eq!(memo.cache_size(), 1);

        assert_eq!(memo.invoke(3), 9);
        assert_eq!(memo.cache_size(), 1);
        let misses_before = memo.misses().unwrap();

        assert_eq!(memo.invoke(3), 9);
        assert_eq!(memo.misses(), Some(misses_before + 1));
    }

    #[test]
    fn never_admitting_memo_still_returns_fresh_values() {
        let memo = MemoBuilder::<u32, String>::new()
            .compute(|n| format!("#{n}"))
            .admit_if(memokit::admission::never::<String>)
            .build()
            .unwrap();

        for n in 0..20 {
            assert_eq!(memo.invoke(n), format!("#{n}"));
        }
        assert_eq!(memo.cache_size(), 0);
        assert_eq!(memo.misses(), Some(20));
    }

    #[test]
    fn none_verdict_rejects() {
        let memo = Memo::new(
            |s: &String| s.trim().to_string(),
            |v: &String| (!v.is_empty()).then_some(true),
            true,
        );
        memo.invoke("   ".to_string());
        memo.invoke(" x ".to_string());
        assert!(!memo.contains("   "));
        assert!(memo.contains(" x "));
    }
}

// ==============================================
// Reset Semantics
// ==============================================

mod reset_semantics {
    use super::*;

    #[test]
    fn reset_all_with_counters_zeroes_everything() {
        let memo = memoize(|n: &i32| n.abs());
        for n in -5..5 {
            memo.invoke(n);
            memo.invoke(n);
        }
        memo.reset_all(true);

        assert_eq!((memo.hits(), memo.misses(), memo.total()), (Some(0), Some(0), Some(0)));
        assert_eq!(memo.cache_size(), 0);
    }

    #[test]
    fn reset_reports_presence() {
        let memo = memoize(|n: &i32| n + 1);
        memo.invoke(1);

        assert!(memo.reset(&1));
        assert!(!memo.reset(&1));
        assert!(!memo.reset(&2));
        assert_eq!(memo.cache_size(), 0);
    }

    #[test]
    fn uninstrumented_memo_signals_not_tracked() {
        let memo = MemoBuilder::<u8, u8>::new()
            .compute(|n| n.wrapping_add(1))
            .instrumentation(Instrumentation::Disabled)
            .build()
            .unwrap();
        memo.invoke(255);
        memo.reset_all(true);

        assert_eq!(memo.hits(), None);
        assert_eq!(memo.misses(), None);
        assert_eq!(memo.total(), None);
        assert!(memo.stats().is_none());
    }
}

// ==============================================
// Monitoring
// ==============================================

#[cfg(feature = "metrics")]
mod monitoring {
    use super::*;

    #[test]
    fn prometheus_export_of_live_memo() {
        let memo = Memo::new(|n: &u32| n % 7, |v: &u32| *v != 0, true);
        for n in 0..14 {
            memo.invoke(n);
        }
        memo.invoke(1);

        let exporter = PrometheusTextExporter::new("mod7", Vec::new());
        exporter.export(&memo.snapshot());
        let text = String::from_utf8(exporter.into_inner()).unwrap();

        assert!(text.contains("mod7_hits_total 1\n"));
        assert!(text.contains("mod7_misses_total 14\n"));
        assert!(text.contains("mod7_rejected_total 2\n"));
        assert!(text.contains("mod7_admitted_total 12\n"));
        assert!(text.contains("mod7_cache_len 12\n"));
    }
}
