//! Role and address based history filtering.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::address::Address;
use crate::analysis::AnalysisResult;
use crate::job::JobRecord;
use crate::session::Role;

/// Which records of the full history a viewer gets to see.
///
/// A non-admin always sees only the records submitted from the connected
/// address. An admin sees everything unless `mine_only` is set, in which case
/// the same address filter applies. An address filter without a connected
/// address matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobFilter {
    pub role: Role,
    pub mine_only: bool,
    pub address: Option<Address>,
}

impl JobFilter {
    pub fn new(role: Role, mine_only: bool, address: Option<Address>) -> Self {
        Self {
            role,
            mine_only,
            address,
        }
    }

    /// Whether the address filter is in effect.
    pub fn restricts_to_address(&self) -> bool {
        self.role != Role::Admin || self.mine_only
    }

    /// Whether a single record passes the filter.
    pub fn matches(&self, record: &JobRecord) -> bool {
        if !self.restricts_to_address() {
            return true;
        }
        self.address
            .as_ref()
            .is_some_and(|addr| record.submitter == *addr)
    }

    /// Filter `records`, preserving order.
    pub fn apply(&self, records: &[JobRecord]) -> Vec<JobRecord> {
        let out: Vec<JobRecord> = records
            .iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect();
        debug!(
            total = records.len(),
            visible = out.len(),
            role = %self.role,
            mine_only = self.mine_only,
            "Filtered job history"
        );
        out
    }
}

/// Attach `analysis` to the most recent record submitted by `submitter`.
///
/// `records` must be ordered newest first. Only the first match is touched;
/// older records from the same submitter are left alone. Returns the index of
/// the updated record.
pub fn attach_analysis(
    records: &mut [JobRecord],
    submitter: &Address,
    analysis: AnalysisResult,
) -> Option<usize> {
    let index = records.iter().position(|r| r.submitter == *submitter)?;
    records[index].analysis = Some(analysis);
    Some(index)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::job::JobPayload;

    const A: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const B: &str = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

    fn rec(addr: &str, tx: &str) -> JobRecord {
        JobRecord::new(
            Address::parse(addr).unwrap(),
            "IBM Quantum",
            JobPayload::RawText(tx.to_string()),
            Utc::now(),
            tx,
        )
    }

    fn history() -> Vec<JobRecord> {
        vec![rec(A, "0x01"), rec(B, "0x02"), rec(A, "0x03")]
    }

    fn analysis(title: &str) -> AnalysisResult {
        AnalysisResult {
            title: title.to_string(),
            complexity: "Low".to_string(),
            analysis_summary: String::new(),
            optimization_suggestion: "None".to_string(),
        }
    }

    #[test]
    fn test_user_sees_own_jobs_in_order() {
        let filter = JobFilter::new(Role::User, false, Some(Address::parse(A).unwrap()));
        let out = filter.apply(&history());
        let txs: Vec<_> = out.iter().map(|r| r.tx_hash.as_str()).collect();
        assert_eq!(txs, vec!["0x01", "0x03"]);
    }

    #[test]
    fn test_user_toggle_is_irrelevant() {
        let addr = Some(Address::parse(A).unwrap());
        let a = JobFilter::new(Role::User, false, addr.clone()).apply(&history());
        let b = JobFilter::new(Role::User, true, addr).apply(&history());
        assert_eq!(a, b);
    }

    #[test]
    fn test_admin_toggle() {
        let addr = Some(Address::parse(A).unwrap());
        assert_eq!(
            JobFilter::new(Role::Admin, false, addr.clone())
                .apply(&history())
                .len(),
            3
        );
        assert_eq!(JobFilter::new(Role::Admin, true, addr).apply(&history()).len(), 2);
    }

    #[test]
    fn test_no_wallet() {
        assert!(JobFilter::new(Role::User, false, None).apply(&history()).is_empty());
        assert!(JobFilter::new(Role::Admin, true, None).apply(&history()).is_empty());
        assert_eq!(JobFilter::new(Role::Admin, false, None).apply(&history()).len(), 3);
    }

    #[test]
    fn test_case_insensitive_address() {
        let upper = Address::parse(&A.to_uppercase().replace("0X", "0x")).unwrap();
        let filter = JobFilter::new(Role::User, false, Some(upper));
        assert_eq!(filter.apply(&history()).len(), 2);
    }

    #[test]
    fn test_attach_analysis_to_most_recent_only() {
        let mut records = history();
        let idx = attach_analysis(&mut records, &Address::parse(A).unwrap(), analysis("Bell"));
        assert_eq!(idx, Some(0));
        assert_eq!(records[0].analysis.as_ref().unwrap().title, "Bell");
        assert!(records[1].analysis.is_none());
        assert!(records[2].analysis.is_none());
    }

    #[test]
    fn test_attach_analysis_no_match() {
        let mut records = history();
        let other = Address::parse("0xcccccccccccccccccccccccccccccccccccccccc").unwrap();
        assert_eq!(attach_analysis(&mut records, &other, analysis("x")), None);
        assert!(records.iter().all(|r| r.analysis.is_none()));
    }
}
