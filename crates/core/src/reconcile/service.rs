//! Dependency reconciler service - core business logic

use std::sync::Arc;

use mantle_domain::{AppTarget, DependencyOperation, DependencySet, Result};
use tracing::{debug, error, info};

use super::delta::DependencyDelta;
use super::poller::StatusPoller;
use super::ports::DependencyApi;

/// Drives add/remove calls until a target app's installed dependencies match
/// a desired set.
///
/// Operations are strictly serialized: each management call is polled to a
/// terminal state on the shared status channel before the next call is
/// issued, because that channel only answers for the most recent operation.
///
/// There is no rollback. A failure partway through a pass returns
/// immediately and leaves every already-applied operation in place; since
/// per-item work is idempotent, callers converge by re-invoking
/// reconciliation against the new remote state.
pub struct DependencyReconciler {
    api: Arc<dyn DependencyApi>,
    poller: StatusPoller,
}

impl DependencyReconciler {
    /// Create a reconciler with the default 5s/240-attempt poller.
    pub fn new(api: Arc<dyn DependencyApi>) -> Self {
        Self { api, poller: StatusPoller::default() }
    }

    /// Override the poller (tests, or callers with a different patience).
    pub fn with_poller(mut self, poller: StatusPoller) -> Self {
        self.poller = poller;
        self
    }

    /// Reconcile the target from `current` (the caller's recorded set) to
    /// `desired`.
    ///
    /// All additions are issued before any removals so a dependency whose
    /// version changes never passes through a window with zero installed
    /// versions.
    pub async fn reconcile(
        &self,
        target: &AppTarget,
        current: &DependencySet,
        desired: &DependencySet,
    ) -> Result<()> {
        let delta = DependencyDelta::between(current, desired);
        if delta.is_empty() {
            debug!(%target, "dependencies already in sync");
            return Ok(());
        }

        info!(
            %target,
            add = delta.to_add.len(),
            remove = delta.to_remove.len(),
            "reconciling function dependencies"
        );

        for dependency in delta.to_add {
            self.apply(target, DependencyOperation::add(dependency)).await?;
        }
        for dependency in delta.to_remove {
            self.apply(target, DependencyOperation::remove(dependency)).await?;
        }

        Ok(())
    }

    /// Install every desired dependency without diffing (full-replace mode,
    /// used when the target identity itself changed and the previous set
    /// lives in a different remote scope).
    pub async fn install_all(&self, target: &AppTarget, desired: &DependencySet) -> Result<()> {
        info!(%target, count = desired.len(), "installing function dependencies");
        for dependency in desired.iter() {
            self.apply(target, DependencyOperation::add(dependency)).await?;
        }
        Ok(())
    }

    /// Remove every dependency installed on the target.
    ///
    /// The list is re-read from the remote system first; it, not the
    /// caller's cached set, is the source of truth. A read failure aborts
    /// before any deletion is attempted.
    pub async fn remove_all(&self, target: &AppTarget) -> Result<()> {
        let installed = match self.api.installed_dependencies(target).await {
            Ok(installed) => installed,
            Err(err) => {
                error!(%target, error = %err, "unable to read installed dependencies before teardown");
                return Err(err);
            }
        };

        info!(%target, count = installed.len(), "removing function dependencies");
        for dependency in installed.iter() {
            self.apply(target, DependencyOperation::remove(dependency)).await?;
        }
        Ok(())
    }

    /// Full replace across a target change: install `desired` on `new`, then
    /// tear down everything on `old`.
    ///
    /// Additions run first. If they succeed and the teardown then fails, the
    /// dependencies are live in both scopes until the caller re-invokes
    /// teardown on the old target; this mirrors the upstream behavior and is
    /// deliberately not compensated here.
    pub async fn replace_targets(
        &self,
        old: &AppTarget,
        new: &AppTarget,
        desired: &DependencySet,
    ) -> Result<()> {
        self.install_all(new, desired).await?;
        self.remove_all(old).await
    }

    /// Issue one management call, then poll the shared status channel until
    /// that operation settles.
    async fn apply(&self, target: &AppTarget, operation: DependencyOperation) -> Result<()> {
        debug!(%target, %operation, "issuing dependency management call");
        self.api.manage_dependency(target, &operation).await?;

        let api = Arc::clone(&self.api);
        let status_target = target.clone();
        self.poller
            .wait_until_complete(&operation, move || {
                let api = Arc::clone(&api);
                let target = status_target.clone();
                async move { api.management_status(&target).await }
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use mantle_domain::{
        Dependency, ManagementStatus, MantleError, OperationKind,
    };

    use super::*;

    fn dep(name: &str, version: &str) -> Dependency {
        Dependency::new(name, version).unwrap()
    }

    fn set(entries: &[(&str, &str)]) -> DependencySet {
        entries.iter().map(|(name, version)| dep(name, version)).collect()
    }

    fn target() -> AppTarget {
        AppTarget::new("632a41e0f2a45b6e1c1a0000", "632a41e0f2a45b6e1c1a0001")
    }

    /// Records every wire call in order and answers status reads from a
    /// scripted queue (default: successful).
    struct MockDependencyApi {
        calls: Mutex<Vec<String>>,
        statuses: Mutex<VecDeque<ManagementStatus>>,
        installed: Result<DependencySet>,
        fail_manage_after: Option<usize>,
    }

    impl MockDependencyApi {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                statuses: Mutex::new(VecDeque::new()),
                installed: Ok(DependencySet::new()),
                fail_manage_after: None,
            }
        }

        fn with_installed(mut self, installed: DependencySet) -> Self {
            self.installed = Ok(installed);
            self
        }

        fn with_installed_error(mut self, err: MantleError) -> Self {
            self.installed = Err(err);
            self
        }

        fn with_status_script(self, statuses: &[&str]) -> Self {
            {
                let mut queue = self.statuses.lock().unwrap();
                for status in statuses {
                    queue.push_back(ManagementStatus::from_wire(status, ""));
                }
            }
            self
        }

        /// Fail the Nth (0-based) manage call with an unexpected status.
        fn failing_manage_call(mut self, index: usize) -> Self {
            self.fail_manage_after = Some(index);
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn manage_calls_so_far(&self) -> usize {
            self.calls.lock().unwrap().iter().filter(|c| !c.starts_with("status")).count()
        }
    }

    #[async_trait]
    impl DependencyApi for MockDependencyApi {
        async fn installed_dependencies(&self, _target: &AppTarget) -> Result<DependencySet> {
            self.record("list".to_string());
            self.installed.clone()
        }

        async fn management_status(&self, _target: &AppTarget) -> Result<ManagementStatus> {
            self.record("status".to_string());
            Ok(self
                .statuses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| ManagementStatus::from_wire("successful", "")))
        }

        async fn manage_dependency(
            &self,
            _target: &AppTarget,
            operation: &DependencyOperation,
        ) -> Result<()> {
            if self.fail_manage_after == Some(self.manage_calls_so_far()) {
                return Err(MantleError::UnexpectedStatus {
                    got: 500,
                    context: format!("managing dependency {operation}"),
                });
            }
            let verb = match operation.kind() {
                OperationKind::Add => "put",
                OperationKind::Remove => "delete",
            };
            self.record(format!("{verb} {} {}", operation.name(), operation.version()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn identical_sets_issue_zero_remote_calls() {
        let api = Arc::new(MockDependencyApi::new());
        let reconciler = DependencyReconciler::new(Arc::clone(&api) as Arc<dyn DependencyApi>);

        let s = set(&[("uuidv1", "1.6.14"), ("simple-test-package", "0.2.2")]);
        reconciler.reconcile(&target(), &s, &s).await.unwrap();

        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn removal_scenario_issues_one_delete_then_polls() {
        let api = Arc::new(MockDependencyApi::new());
        let reconciler = DependencyReconciler::new(Arc::clone(&api) as Arc<dyn DependencyApi>);

        let current = set(&[("uuidv1", "1.6.14"), ("simple-test-package", "0.2.2")]);
        let desired = set(&[("uuidv1", "1.6.14")]);
        reconciler.reconcile(&target(), &current, &desired).await.unwrap();

        assert_eq!(api.calls(), ["delete simple-test-package 0.2.2", "status"]);
    }

    #[tokio::test(start_paused = true)]
    async fn addition_scenario_polls_through_pending_states() {
        let api = Arc::new(
            MockDependencyApi::new().with_status_script(&["pending", "pending", "successful"]),
        );
        let reconciler = DependencyReconciler::new(Arc::clone(&api) as Arc<dyn DependencyApi>);

        reconciler
            .reconcile(&target(), &DependencySet::new(), &set(&[("uuidv1", "1.6.14")]))
            .await
            .unwrap();

        assert_eq!(api.calls(), ["put uuidv1 1.6.14", "status", "status", "status"]);
    }

    #[tokio::test]
    async fn version_change_adds_new_pair_before_removing_old() {
        let api = Arc::new(MockDependencyApi::new());
        let reconciler = DependencyReconciler::new(Arc::clone(&api) as Arc<dyn DependencyApi>);

        let current = set(&[("uuidv1", "1.6.14")]);
        let desired = set(&[("uuidv1", "1.6.15")]);
        reconciler.reconcile(&target(), &current, &desired).await.unwrap();

        assert_eq!(
            api.calls(),
            ["put uuidv1 1.6.15", "status", "delete uuidv1 1.6.14", "status"]
        );
    }

    #[tokio::test]
    async fn first_failed_operation_aborts_the_pass() {
        // Two additions; the second manage call answers 500.
        let api = Arc::new(MockDependencyApi::new().failing_manage_call(1));
        let reconciler = DependencyReconciler::new(Arc::clone(&api) as Arc<dyn DependencyApi>);

        let desired = set(&[("axios", "0.27.2"), ("uuidv1", "1.6.14")]);
        let err = reconciler
            .reconcile(&target(), &DependencySet::new(), &desired)
            .await
            .unwrap_err();

        assert!(matches!(err, MantleError::UnexpectedStatus { got: 500, .. }));
        // The first addition was applied and polled; nothing ran after the
        // failure.
        assert_eq!(api.calls(), ["put axios 0.27.2", "status"]);
    }

    #[tokio::test]
    async fn failed_management_status_carries_remote_message() {
        let api = Arc::new(MockDependencyApi::new().with_status_script(&["failed"]));
        let reconciler = DependencyReconciler::new(Arc::clone(&api) as Arc<dyn DependencyApi>);

        let err = reconciler
            .reconcile(&target(), &DependencySet::new(), &set(&[("uuidv1", "1.6.14")]))
            .await
            .unwrap_err();

        assert!(matches!(err, MantleError::ManagementFailed { .. }));
    }

    #[tokio::test]
    async fn remove_all_tears_down_the_remote_list() {
        let api = Arc::new(
            MockDependencyApi::new()
                .with_installed(set(&[("axios", "0.27.2"), ("uuidv1", "1.6.14")])),
        );
        let reconciler = DependencyReconciler::new(Arc::clone(&api) as Arc<dyn DependencyApi>);

        reconciler.remove_all(&target()).await.unwrap();

        assert_eq!(
            api.calls(),
            ["list", "delete axios 0.27.2", "status", "delete uuidv1 1.6.14", "status"]
        );
    }

    #[tokio::test]
    async fn remove_all_never_deletes_blind_when_the_read_fails() {
        let api = Arc::new(
            MockDependencyApi::new()
                .with_installed_error(MantleError::Network("connection refused".to_string())),
        );
        let reconciler = DependencyReconciler::new(Arc::clone(&api) as Arc<dyn DependencyApi>);

        let err = reconciler.remove_all(&target()).await.unwrap_err();

        assert!(matches!(err, MantleError::Network(_)));
        assert_eq!(api.calls(), ["list"]);
    }

    #[tokio::test]
    async fn replace_targets_installs_on_new_before_old_teardown() {
        let api = Arc::new(
            MockDependencyApi::new().with_installed(set(&[("moment", "2.29.4")])),
        );
        let reconciler = DependencyReconciler::new(Arc::clone(&api) as Arc<dyn DependencyApi>);

        let old = AppTarget::new("632a41e0f2a45b6e1c1a0000", "632a41e0f2a45b6e1c1a0001");
        let new = AppTarget::new("632a41e0f2a45b6e1c1abeef", "632a41e0f2a45b6e1c1acafe");
        reconciler.replace_targets(&old, &new, &set(&[("uuidv1", "1.6.14")])).await.unwrap();

        assert_eq!(
            api.calls(),
            ["put uuidv1 1.6.14", "status", "list", "delete moment 2.29.4", "status"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn custom_poller_budget_is_honored() {
        let api = Arc::new(MockDependencyApi::new().with_status_script(&[
            "pending", "pending", "pending", "pending", "pending",
        ]));
        let reconciler = DependencyReconciler::new(Arc::clone(&api) as Arc<dyn DependencyApi>)
            .with_poller(StatusPoller::new(Duration::from_secs(5), 3));

        let err = reconciler
            .reconcile(&target(), &DependencySet::new(), &set(&[("uuidv1", "1.6.14")]))
            .await
            .unwrap_err();

        assert!(matches!(err, MantleError::ManagementTimeout { .. }));
        assert_eq!(api.calls(), ["put uuidv1 1.6.14", "status", "status", "status"]);
    }
}
