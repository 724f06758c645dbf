use std::future::Future;

use serde_json::Value;

use crate::key::{encode, RequestKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    Pending,
    Success,
    Error,
}

/// Outcome of [`RequestCoordinator::begin`]. When `ok` is false the caller
/// must not start its action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    pub ok: bool,
    pub key: RequestKey,
}

/// Gates one call site's fetches: at most one in-flight key, and no refetch of
/// the last key that succeeded.
///
/// An instance belongs to a single call site. A `begin` with a different key
/// replaces the pending one; callers needing several distinct requests in
/// flight use several coordinators.
#[derive(Debug, Default)]
pub struct RequestCoordinator {
    pending_key: Option<RequestKey>,
    last_success_key: Option<RequestKey>,
    status: Status,
}

impl RequestCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn pending_key(&self) -> Option<&RequestKey> {
        self.pending_key.as_ref()
    }

    pub fn last_success_key(&self) -> Option<&RequestKey> {
        self.last_success_key.as_ref()
    }

    pub fn begin(&mut self, params: &Value, force: bool) -> Admission {
        let key = encode(params);

        if !force {
            if self.status == Status::Pending && self.pending_key.as_ref() == Some(&key) {
                log::debug!("request {key} already in flight");
                return Admission { ok: false, key };
            }
            if self.last_success_key.as_ref() == Some(&key) {
                log::debug!("request {key} already succeeded");
                return Admission { ok: false, key };
            }
        }

        log::debug!("request {key} started (force={force})");
        self.pending_key = Some(key.clone());
        self.status = Status::Pending;
        Admission { ok: true, key }
    }

    pub fn commit(&mut self, key: RequestKey) {
        log::debug!("request {key} committed");
        self.last_success_key = Some(key);
        self.pending_key = None;
        self.status = Status::Success;
    }

    pub fn rollback(&mut self) {
        if let Some(key) = &self.pending_key {
            log::debug!("request {key} rolled back");
        }
        self.pending_key = None;
        self.status = Status::Error;
    }

    pub fn reset(&mut self) {
        self.pending_key = None;
        self.last_success_key = None;
        self.status = Status::Idle;
    }

    /// Runs `action` only if `begin` admits it, then commits on `Ok` and rolls
    /// back on `Err`. Returns `None` when the request was suppressed.
    pub async fn run<F, Fut, T, E>(
        &mut self,
        params: &Value,
        force: bool,
        action: F,
    ) -> Option<Result<T, E>>
    where
        F: FnOnce(RequestKey) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let Admission { ok, key } = self.begin(params, force);
        if !ok {
            return None;
        }

        let result = action(key.clone()).await;
        match &result {
            Ok(_) => self.commit(key),
            Err(_) => self.rollback(),
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_duplicate_begin_suppressed() {
        let mut coord = RequestCoordinator::new();
        let first = coord.begin(&json!({"a": 1}), false);
        let second = coord.begin(&json!({"a": 1}), false);
        assert!(first.ok);
        assert!(!second.ok);
        assert_eq!(first.key, second.key);
        assert_eq!(coord.status(), Status::Pending);
    }

    #[test]
    fn test_commit_memoizes_then_reset_clears() {
        let mut coord = RequestCoordinator::new();
        let adm = coord.begin(&json!({"a": 1}), false);
        assert!(!coord.begin(&json!({"a": 1}), false).ok);

        coord.commit(adm.key);
        assert_eq!(coord.status(), Status::Success);
        assert!(coord.pending_key().is_none());
        assert!(!coord.begin(&json!({"a": 1}), false).ok);

        coord.reset();
        assert_eq!(coord.status(), Status::Idle);
        assert!(coord.last_success_key().is_none());
        assert!(coord.begin(&json!({"a": 1}), false).ok);
    }

    #[test]
    fn test_key_order_does_not_defeat_dedup() {
        let mut coord = RequestCoordinator::new();
        assert!(coord.begin(&json!({"round": 5, "size": 10}), false).ok);
        let again: Value = serde_json::from_str(r#"{"size": 10, "round": 5}"#).unwrap();
        assert!(!coord.begin(&again, false).ok);
    }

    #[test]
    fn test_rollback_permits_retry() {
        let mut coord = RequestCoordinator::new();
        assert!(coord.begin(&json!({"a": 1}), false).ok);
        coord.rollback();
        assert_eq!(coord.status(), Status::Error);
        assert!(coord.pending_key().is_none());
        assert!(coord.begin(&json!({"a": 1}), false).ok);
    }

    #[test]
    fn test_force_bypasses_dedup_and_memo() {
        let mut coord = RequestCoordinator::new();
        let adm = coord.begin(&json!({"a": 1}), false);
        assert!(coord.begin(&json!({"a": 1}), true).ok);

        coord.commit(adm.key);
        let forced = coord.begin(&json!({"a": 1}), true);
        assert!(forced.ok);
        assert_eq!(coord.status(), Status::Pending);
        assert_eq!(coord.pending_key(), Some(&forced.key));
    }

    #[test]
    fn test_different_key_overwrites_pending() {
        let mut coord = RequestCoordinator::new();
        assert!(coord.begin(&json!({"a": 1}), false).ok);
        let b = coord.begin(&json!({"a": 2}), false);
        assert!(b.ok);
        assert_eq!(coord.pending_key(), Some(&b.key));
        // the first key is no longer tracked as in flight
        assert!(coord.begin(&json!({"a": 1}), false).ok);
    }

    #[test]
    fn test_success_on_one_key_does_not_block_another() {
        let mut coord = RequestCoordinator::new();
        let a = coord.begin(&json!({"a": 1}), false);
        coord.commit(a.key);
        assert!(coord.begin(&json!({"a": 2}), false).ok);
    }

    #[tokio::test]
    async fn test_run_commits_on_success() {
        let mut coord = RequestCoordinator::new();
        let params = json!({"round": 1100});

        let out = coord.run(&params, false, |_| async { Ok::<_, String>(7) }).await;
        assert_eq!(out, Some(Ok(7)));
        assert_eq!(coord.status(), Status::Success);

        let again = coord.run(&params, false, |_| async { Ok::<_, String>(8) }).await;
        assert_eq!(again, None);
    }

    #[tokio::test]
    async fn test_run_rolls_back_on_error() {
        let mut coord = RequestCoordinator::new();
        let params = json!({"round": 1100});

        let out = coord
            .run(&params, false, |_| async { Err::<u32, _>("timeout".to_string()) })
            .await;
        assert_eq!(out, Some(Err("timeout".to_string())));
        assert_eq!(coord.status(), Status::Error);

        let retry = coord.run(&params, false, |_| async { Ok::<_, String>(1) }).await;
        assert_eq!(retry, Some(Ok(1)));
    }

    #[tokio::test]
    async fn test_run_passes_key_to_action() {
        let mut coord = RequestCoordinator::new();
        let params = json!({"b": 2, "a": 1});

        let out = coord
            .run(&params, false, |key| async move { Ok::<_, ()>(key.to_string()) })
            .await;
        assert_eq!(out, Some(Ok(r#"{"a":1,"b":2}"#.to_string())));
    }
}
