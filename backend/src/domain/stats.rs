//! Complaint counters shown on the admin dashboard.

use super::{Complaint, ComplaintStatus};

/// Totals by status.
///
/// `in_progress` complaints count toward `total` only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComplaintStats {
    /// Every complaint, whatever its status.
    pub total: u64,
    pub pending: u64,
    pub resolved: u64,
    pub rejected: u64,
}

impl ComplaintStats {
    /// Count a list of complaints.
    pub fn from_complaints<'a>(complaints: impl IntoIterator<Item = &'a Complaint>) -> Self {
        complaints
            .into_iter()
            .fold(Self::default(), |mut stats, complaint| {
                stats.total += 1;
                match complaint.status() {
                    ComplaintStatus::Pending => stats.pending += 1,
                    ComplaintStatus::Resolved => stats.resolved += 1,
                    ComplaintStatus::Rejected => stats.rejected += 1,
                    ComplaintStatus::InProgress => {}
                }
                stats
            })
    }
}
