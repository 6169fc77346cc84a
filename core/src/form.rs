//! One form instance: validate, then submit at most one request at a time.
//!
//! A UI disables its submit control while a request is outstanding; `Form`
//! is the headless equivalent. A second `submit` on the same instance while
//! the first is in flight fails fast with `SubmissionInProgress`, and the
//! flag is released on every exit path, including errors.

use std::future::Future;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::schema::Schema;

pub struct Form<S> {
    in_flight: AtomicBool,
    _schema: PhantomData<fn() -> S>,
}

impl<S: Schema> Form<S> {
    pub fn new() -> Self {
        Self {
            in_flight: AtomicBool::new(false),
            _schema: PhantomData,
        }
    }

    /// Whether a submission is outstanding; the submit control should be disabled.
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Validate `raw` into `S` and hand it to `send`. Validation errors are
    /// returned as `ApiError::Validation` and `send` is never called.
    pub async fn submit<R, F, Fut>(&self, raw: &Value, send: F) -> ApiResult<R>
    where
        F: FnOnce(S) -> Fut,
        Fut: Future<Output = ApiResult<R>>,
    {
        let _guard = InFlight::acquire(&self.in_flight).ok_or(ApiError::SubmissionInProgress)?;
        let payload = S::validate(raw)?;
        send(payload).await
    }
}

impl<S: Schema> Default for Form<S> {
    fn default() -> Self {
        Self::new()
    }
}

struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use serde_json::json;
    use tokio::sync::Notify;

    use super::*;
    use crate::types::{BookFields, LoginCredentials};

    fn login() -> Value {
        json!({ "username": "alice", "password": "secret" })
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_send() {
        let form: Form<BookFields> = Form::new();
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let err = form
            .submit(&json!({ "title": "" }), |_book| async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .await
            .unwrap_err();
        assert!(err.validation_errors().unwrap().contains("title"));
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert!(!form.is_submitting());
    }

    #[tokio::test]
    async fn valid_input_is_sent_normalized() {
        let form: Form<LoginCredentials> = Form::new();
        let username = form
            .submit(&login(), |creds| async move { Ok(creds.username) })
            .await
            .unwrap();
        assert_eq!(username, "alice");
    }

    #[tokio::test]
    async fn overlapping_submission_is_rejected() {
        let form: Form<LoginCredentials> = Form::new();
        let notify = Notify::new();
        let release = &notify;
        let raw = login();

        let first = form.submit(&raw, |_| async move {
            release.notified().await;
            Ok("sent")
        });
        let second = async {
            assert!(form.is_submitting());
            let result = form.submit(&login(), |_| async { Ok("sent") }).await;
            release.notify_one();
            result
        };

        let (first, second) = tokio::join!(first, second);
        assert_eq!(first.unwrap(), "sent");
        assert!(matches!(second, Err(ApiError::SubmissionInProgress)));
        assert!(!form.is_submitting());
    }

    #[tokio::test]
    async fn flag_is_released_after_failed_request() {
        let form: Form<LoginCredentials> = Form::new();
        let err = form
            .submit(&login(), |_| async {
                Err::<(), _>(ApiError::Request {
                    status: 500,
                    message: "Login Failed.".to_string(),
                })
            })
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Login Failed.");
        assert!(!form.is_submitting());

        let again = form.submit(&login(), |_| async { Ok(1) }).await;
        assert_eq!(again.unwrap(), 1);
    }
}
