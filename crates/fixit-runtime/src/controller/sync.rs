//! Report collection synchronization.

use super::ControllerError;
use crate::gateway::ApiGateway;
use fixit_auth::{SessionReader, SessionWriter};
use fixit_types::{Report, ReportId, ReportStatus};
use std::sync::Arc;
use tracing::{debug, warn};

/// Cached copy of the server's report list, in server order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportCollection {
    reports: Vec<Report>,
}

impl ReportCollection {
    #[must_use]
    pub fn new(reports: Vec<Report>) -> Self {
        Self { reports }
    }

    #[must_use]
    pub fn get(&self, id: ReportId) -> Option<&Report> {
        self.reports.iter().find(|r| r.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: ReportId) -> bool {
        self.get(id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Report> {
        self.reports.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Report] {
        &self.reports
    }

    /// Replaces the whole collection. No merge is attempted.
    pub fn replace_all(&mut self, other: ReportCollection) {
        self.reports = other.reports;
    }

    /// Empties the collection.
    pub fn clear(&mut self) {
        self.reports.clear();
    }

    /// Replaces the status of the entry matching `id`.
    ///
    /// The entry is rebuilt with only `status` changed and written back in
    /// place; order and every other field are preserved. Returns `false` if
    /// no entry matched.
    pub fn patch_status(&mut self, id: ReportId, status: ReportStatus) -> bool {
        match self.reports.iter_mut().find(|r| r.id == id) {
            Some(slot) => {
                *slot = slot.with_status(status);
                true
            }
            None => false,
        }
    }
}

impl<'a> IntoIterator for &'a ReportCollection {
    type Item = &'a Report;
    type IntoIter = std::slice::Iter<'a, Report>;

    fn into_iter(self) -> Self::IntoIter {
        self.reports.iter()
    }
}

/// Loads the report collection and owns the session-expiry path.
///
/// This is the only controller holding a [`SessionWriter`] for failure
/// handling: a 401 from the fetch clears the session.
#[derive(Clone)]
pub struct ReportSynchronizer {
    gateway: Arc<dyn ApiGateway>,
    session: SessionReader,
    writer: SessionWriter,
}

impl ReportSynchronizer {
    pub fn new(gateway: Arc<dyn ApiGateway>, writer: SessionWriter) -> Self {
        Self {
            gateway,
            session: writer.reader(),
            writer,
        }
    }

    /// Fetches the full collection.
    ///
    /// # Errors
    ///
    /// - [`ControllerError::NotAuthenticated`] without a session (no request)
    /// - [`ControllerError::AuthExpired`] on 401, after clearing the session
    /// - any other classified failure otherwise
    pub async fn load_reports(&self) -> Result<ReportCollection, ControllerError> {
        let credential = self.session.require()?;

        match self.gateway.list_reports(&credential).await {
            Ok(reports) => {
                debug!(count = reports.len(), "Reports loaded");
                Ok(ReportCollection::new(reports))
            }
            Err(e) if e.is_unauthorized() => {
                warn!("Report fetch unauthorized, clearing session");
                self.writer.clear_session();
                Err(ControllerError::AuthExpired)
            }
            Err(e) => Err(ControllerError::from_gateway(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_report, FakeGateway};
    use fixit_auth::{Credential, SessionStore};

    fn collection() -> ReportCollection {
        ReportCollection::new(vec![
            sample_report(1, ReportStatus::Pending),
            sample_report(2, ReportStatus::Resolved),
            sample_report(3, ReportStatus::InProgress),
        ])
    }

    #[test]
    fn patch_status_touches_one_entry() {
        let before = collection();
        let mut after = before.clone();

        assert!(after.patch_status(ReportId::new(2), ReportStatus::Pending));

        let ids: Vec<u64> = after.iter().map(|r| r.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        for (old, new) in before.iter().zip(after.iter()) {
            if new.id == ReportId::new(2) {
                assert_eq!(new, &old.with_status(ReportStatus::Pending));
            } else {
                assert_eq!(new, old);
            }
        }
    }

    #[test]
    fn patch_status_unknown_id_is_noop() {
        let mut c = collection();
        assert!(!c.patch_status(ReportId::new(99), ReportStatus::Resolved));
        assert_eq!(c, collection());
    }

    #[test]
    fn replace_all_discards_previous_entries() {
        let mut c = collection();
        c.replace_all(ReportCollection::new(vec![sample_report(7, ReportStatus::Pending)]));
        assert_eq!(c.len(), 1);
        assert!(c.contains(ReportId::new(7)));
        assert!(!c.contains(ReportId::new(1)));
    }

    #[tokio::test]
    async fn load_without_session_is_refused_locally() {
        let fake = Arc::new(FakeGateway::new());
        let (_reader, writer) = SessionStore::new();
        let sync = ReportSynchronizer::new(fake.clone(), writer);

        assert_eq!(
            sync.load_reports().await,
            Err(ControllerError::NotAuthenticated)
        );
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn non_401_failure_keeps_session() {
        let fake = Arc::new(
            FakeGateway::new().fail_list(crate::gateway::GatewayError::status(500, "db down")),
        );
        let (reader, writer) = SessionStore::restored(Credential::new("tok").unwrap());
        let sync = ReportSynchronizer::new(fake, writer);

        let err = sync.load_reports().await.unwrap_err();
        assert!(matches!(err, ControllerError::ServerFailure { status: 500, .. }));
        assert!(reader.is_present());
    }

    // ─── Property-Based Tests ─────────────────────────────────────

    mod proptest_collection {
        use super::*;
        use crate::controller::RoleResolver;
        use proptest::prelude::*;

        fn status_strategy() -> impl Strategy<Value = ReportStatus> {
            prop::sample::select(ReportStatus::ALL.to_vec())
        }

        /// Strategy: collections with distinct ids in arbitrary order.
        fn collection_strategy() -> impl Strategy<Value = ReportCollection> {
            prop::collection::btree_set(1u64..200, 0..16)
                .prop_flat_map(|ids| {
                    let len = ids.len();
                    (
                        Just(ids.into_iter().collect::<Vec<_>>()).prop_shuffle(),
                        prop::collection::vec(status_strategy(), len),
                    )
                })
                .prop_map(|(ids, statuses)| {
                    ReportCollection::new(
                        ids.into_iter()
                            .zip(statuses)
                            .map(|(id, status)| sample_report(id, status))
                            .collect(),
                    )
                })
        }

        fn ids(collection: &ReportCollection) -> Vec<ReportId> {
            collection.iter().map(|r| r.id).collect()
        }

        proptest! {
            /// Patching a present id changes exactly that entry's status.
            #[test]
            fn patch_present_changes_one_entry(
                before in collection_strategy().prop_filter("non-empty", |c| !c.is_empty()),
                pick in any::<prop::sample::Index>(),
                status in status_strategy(),
            ) {
                let target = before.as_slice()[pick.index(before.len())].id;
                let mut after = before.clone();

                prop_assert!(after.patch_status(target, status));
                prop_assert_eq!(ids(&after), ids(&before));
                for (old, new) in before.iter().zip(after.iter()) {
                    if old.id == target {
                        prop_assert_eq!(new, &old.with_status(status));
                    } else {
                        prop_assert_eq!(new, old);
                    }
                }
            }

            /// Patching an absent id leaves the collection untouched.
            #[test]
            fn patch_absent_changes_nothing(
                before in collection_strategy(),
                missing in 200u64..400,
                status in status_strategy(),
            ) {
                let mut after = before.clone();
                prop_assert!(!after.patch_status(ReportId::new(missing), status));
                prop_assert_eq!(after, before);
            }

            /// Two loads agree however many role probes run between them.
            #[test]
            fn load_is_idempotent_across_probes(
                server in collection_strategy(),
                probes in 0usize..4,
                admin in any::<bool>(),
            ) {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .unwrap();
                runtime.block_on(async {
                    let fake = FakeGateway::new().with_reports(server.as_slice().to_vec());
                    let fake = Arc::new(if admin { fake.allow_admin() } else { fake });
                    let (reader, writer) = SessionStore::restored(Credential::new("tok").unwrap());
                    let sync = ReportSynchronizer::new(fake.clone(), writer);
                    let roles = RoleResolver::new(fake, reader);

                    let first = sync.load_reports().await.unwrap();
                    for _ in 0..probes {
                        let _ = roles.resolve_role().await;
                    }
                    let second = sync.load_reports().await.unwrap();

                    assert_eq!(first, second);
                    assert_eq!(first, server);
                });
            }
        }
    }
}
