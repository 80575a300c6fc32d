//! Property-based tests for history filtering and analysis attachment.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use qchain_core::{
    Address, AnalysisResult, JobFilter, JobPayload, JobRecord, Role, attach_analysis, estimate,
};

/// Small pool of submitters so that collisions are frequent.
fn arb_address() -> impl Strategy<Value = Address> {
    (0_u8..4).prop_map(|n| {
        let mut bytes = [0u8; 20];
        bytes[19] = n;
        Address::from_bytes(bytes)
    })
}

/// Generate a newest-first history of 0-20 records.
fn arb_history() -> impl Strategy<Value = Vec<JobRecord>> {
    prop::collection::vec(arb_address(), 0..=20).prop_map(|submitters| {
        let n = submitters.len() as i64;
        submitters
            .into_iter()
            .enumerate()
            .map(|(i, addr)| {
                JobRecord::new(
                    addr,
                    "IBM Quantum",
                    JobPayload::RawText(format!("job {i}")),
                    Utc.timestamp_opt(1_700_000_000 + (n - i as i64), 0).unwrap(),
                    format!("0x{i:064x}"),
                )
            })
            .collect()
    })
}

fn arb_role() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::Admin), Just(Role::User)]
}

fn analysis() -> AnalysisResult {
    AnalysisResult {
        title: "Bell State Generation".into(),
        complexity: "Low".into(),
        analysis_summary: "Prepares an entangled pair.".into(),
        optimization_suggestion: "None".into(),
    }
}

proptest! {
    /// Filtering returns a subsequence of the input, in input order.
    #[test]
    fn test_filter_preserves_order(
        history in arb_history(),
        role in arb_role(),
        mine_only in any::<bool>(),
        wallet in prop::option::of(arb_address()),
    ) {
        let out = JobFilter::new(role, mine_only, wallet).apply(&history);
        let mut it = history.iter();
        for rec in &out {
            prop_assert!(it.any(|h| h == rec), "filtered output is not a subsequence");
        }
    }

    /// Whenever the address filter is active, only the wallet's records pass.
    #[test]
    fn test_filter_only_matching_submitter(
        history in arb_history(),
        role in arb_role(),
        mine_only in any::<bool>(),
        wallet in prop::option::of(arb_address()),
    ) {
        let filter = JobFilter::new(role, mine_only, wallet.clone());
        let out = filter.apply(&history);
        if filter.restricts_to_address() {
            match wallet {
                Some(w) => {
                    let expected = history.iter().filter(|r| r.submitter == w).count();
                    prop_assert_eq!(out.len(), expected);
                    prop_assert!(out.iter().all(|r| r.submitter == w));
                }
                None => prop_assert!(out.is_empty()),
            }
        } else {
            prop_assert_eq!(out.len(), history.len());
        }
    }

    /// Analysis lands on the first matching record and nowhere else.
    #[test]
    fn test_attach_touches_single_newest_record(
        mut history in arb_history(),
        submitter in arb_address(),
    ) {
        let first = history.iter().position(|r| r.submitter == submitter);
        let touched = attach_analysis(&mut history, &submitter, analysis());
        prop_assert_eq!(touched, first);
        let with_analysis = history.iter().filter(|r| r.analysis.is_some()).count();
        prop_assert_eq!(with_analysis, usize::from(first.is_some()));
    }

    /// The displayed range always spans a factor of 1.5.
    #[test]
    fn test_estimate_range_ratio(len in 0_usize..100_000, priority in 0.1_f64..10.0) {
        let e = estimate("Google Quantum", len, Some(priority));
        prop_assert!((e.high_secs - e.low_secs * 1.5).abs() < 1e-6);
        prop_assert!((e.high_cost - e.low_cost * 1.5).abs() < 1e-6);
        prop_assert!(e.low_secs > 0.0);
    }
}
