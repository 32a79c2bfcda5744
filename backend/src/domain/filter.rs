//! Pure filtering over role-scoped complaint lists.

use super::{CategoryId, Complaint, ComplaintId, ComplaintStatus, PrincipalId};

/// Conjunctive filter; an absent predicate matches everything.
///
/// # Examples
/// ```
/// use complaint_desk::domain::{ComplaintFilter, ComplaintStatus};
///
/// let filter = ComplaintFilter::default().with_status(ComplaintStatus::Resolved);
/// assert!(!filter.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplaintFilter {
    /// Exact status match.
    pub status: Option<ComplaintStatus>,
    /// Exact category match.
    pub category: Option<CategoryId>,
    /// Matches the owner or the assignee.
    pub party: Option<PrincipalId>,
}

impl ComplaintFilter {
    /// Keep only complaints in `status`.
    pub fn with_status(mut self, status: ComplaintStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Keep only complaints filed under `category`.
    pub fn with_category(mut self, category: CategoryId) -> Self {
        self.category = Some(category);
        self
    }

    /// Keep only complaints `party` owns or is assigned.
    pub fn with_party(mut self, party: PrincipalId) -> Self {
        self.party = Some(party);
        self
    }

    /// Whether no predicate is set.
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.category.is_none() && self.party.is_none()
    }

    /// Whether `complaint` satisfies every set predicate.
    pub fn matches(&self, complaint: &Complaint) -> bool {
        self.status.is_none_or(|status| complaint.status() == status)
            && self
                .category
                .as_ref()
                .is_none_or(|category| complaint.category() == category)
            && self
                .party
                .as_ref()
                .is_none_or(|party| complaint.involves(party))
    }

    /// Matching subset of `complaints` in source order.
    pub fn apply<'a>(&self, complaints: &'a [Complaint]) -> Vec<&'a Complaint> {
        complaints.iter().filter(|c| self.matches(c)).collect()
    }
}

/// Local view of a role-scoped complaint list with an active filter.
///
/// Mutations never re-fetch: callers merge entities returned by lifecycle
/// operations or replace the whole list after a re-list.
#[derive(Debug, Clone, Default)]
pub struct ComplaintBoard {
    source: Vec<Complaint>,
    filter: ComplaintFilter,
}

impl ComplaintBoard {
    /// Board over an already scoped list.
    pub fn new(source: Vec<Complaint>) -> Self {
        Self {
            source,
            filter: ComplaintFilter::default(),
        }
    }

    /// Active filter.
    pub fn filter(&self) -> &ComplaintFilter {
        &self.filter
    }

    /// Change the active filter; the source list is untouched.
    pub fn set_filter(&mut self, filter: ComplaintFilter) {
        self.filter = filter;
    }

    /// Every complaint held, ignoring the filter.
    pub fn all(&self) -> &[Complaint] {
        &self.source
    }

    /// Complaints passing the active filter, in source order.
    pub fn visible(&self) -> Vec<&Complaint> {
        self.filter.apply(&self.source)
    }

    /// Replace the complaint with the same id in place, or append it.
    pub fn merge(&mut self, complaint: Complaint) {
        match self.source.iter_mut().find(|c| c.id() == complaint.id()) {
            Some(slot) => *slot = complaint,
            None => self.source.push(complaint),
        }
    }

    /// Drop the complaint with `id`; returns whether one was held.
    pub fn remove(&mut self, id: &ComplaintId) -> bool {
        let before = self.source.len();
        self.source.retain(|c| c.id() != id);
        self.source.len() != before
    }

    /// Swap in a freshly listed source.
    pub fn replace_all(&mut self, source: Vec<Complaint>) {
        self.source = source;
    }
}
