//! Property-based tests for the job-logger ABI codec.

use chrono::Utc;
use proptest::prelude::*;
use qchain_core::{Address, JobPayload, JobRecord, JobSubmission, SubmissionType};
use qchain_ledger::abi::{
    JOB_LOGGED_SIGNATURE, JobLoggedEvent, decode_all_jobs, decode_job_logged, encode_all_jobs,
    encode_job_logged_data, event_topic,
};

fn arb_address() -> impl Strategy<Value = Address> {
    any::<[u8; 20]>().prop_map(Address::from_bytes)
}

fn arb_event() -> impl Strategy<Value = JobLoggedEvent> {
    (arb_address(), "\\PC{0,80}", "\\PC{0,200}", any::<u64>()).prop_map(
        |(user, job_type, ipfs_hash, time_submitted)| JobLoggedEvent {
            user,
            job_type,
            ipfs_hash,
            time_submitted,
        },
    )
}

fn topics(user: &Address) -> Vec<String> {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(&user.to_bytes());
    vec![
        event_topic(JOB_LOGGED_SIGNATURE),
        format!("0x{}", hex::encode(word)),
    ]
}

proptest! {
    /// Any event, including multi-byte strings, decodes to what was logged.
    #[test]
    fn job_logged_event_decodes_to_logged_fields(event in arb_event()) {
        let data = encode_job_logged_data(&event.job_type, &event.ipfs_hash, event.time_submitted);
        let decoded = decode_job_logged(&topics(&event.user), &format!("0x{}", hex::encode(data)))
            .unwrap();
        prop_assert_eq!(decoded, event);
    }

    /// `getAllJobs()` output preserves count and order.
    #[test]
    fn all_jobs_decodes_in_order(jobs in prop::collection::vec(arb_event(), 0..8)) {
        let decoded = decode_all_jobs(&encode_all_jobs(&jobs)).unwrap();
        prop_assert_eq!(decoded, jobs);
    }

    /// A submission relayed by the service account is read back as the
    /// wallet's job, with the description intact.
    #[test]
    fn relayed_submission_belongs_to_wallet(
        relayer in arb_address(),
        wallet in arb_address(),
        description in "\\PC{10,120}",
    ) {
        let submission = JobSubmission::new("IBM Quantum", description, SubmissionType::Prompt);
        let data = encode_job_logged_data(
            "Untitled Job",
            &submission.on_chain_payload(&wallet),
            1_700_000_000,
        );
        let event = decode_job_logged(&topics(&relayer), &format!("0x{}", hex::encode(data)))
            .unwrap();

        let record = JobRecord::new(
            event.user,
            event.job_type,
            JobPayload::parse(&event.ipfs_hash),
            Utc::now(),
            "0x01",
        )
        .relayed_by(&relayer);

        prop_assert_eq!(record.submitter, wallet);
        prop_assert_eq!(record.payload.summary(), submission.on_chain_description());
    }
}
