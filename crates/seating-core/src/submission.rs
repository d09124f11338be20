//! Cart submission: validation, the cart call, and navigation on success.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::SourceError;
use crate::ids::ConfigId;
use crate::selection::ConfigurationSelection;

/// Message surfaced when a field is missing.
pub const SELECT_BOTH_MESSAGE: &str = "Please select both a color and a seating option";

/// Message surfaced when the cart call fails.
pub const ADD_TO_CART_FAILED_MESSAGE: &str = "Failed to add item to cart";

/// Where the shopper is sent after a successful addition.
pub const DEFAULT_CART_PATH: &str = "/cart";

/// Default bound on the cart call.
pub const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Option values sent with a cart addition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartOptions {
    pub color: String,
    pub seating: String,
}

/// Payload of a cart mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartAddition {
    pub quantity: u32,
    pub variant_id: ConfigId,
    pub options: CartOptions,
}

impl CartAddition {
    /// A single unit of the configured variant.
    pub fn single(
        variant_id: ConfigId,
        color: impl Into<String>,
        seating: impl Into<String>,
    ) -> Self {
        Self {
            quantity: 1,
            variant_id,
            options: CartOptions {
                color: color.into(),
                seating: seating.into(),
            },
        }
    }
}

/// Cart mutation collaborator.
#[async_trait]
pub trait CartService: Send + Sync {
    async fn add_to_cart(&self, addition: CartAddition) -> Result<(), SourceError>;
}

/// Navigation collaborator. Fire-and-forget.
pub trait Navigator: Send + Sync {
    fn navigate_to(&self, path: &str);
}

/// Controller state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Ready,
    Submitting,
    Succeeded,
    Failed { reason: String },
}

impl SubmissionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionState::Ready => "ready",
            SubmissionState::Submitting => "submitting",
            SubmissionState::Succeeded => "succeeded",
            SubmissionState::Failed { .. } => "failed",
        }
    }

    /// Outcome visible to the shopper; `None` before any submission.
    pub fn outcome(&self) -> Option<SubmissionOutcome> {
        match self {
            SubmissionState::Ready => None,
            SubmissionState::Submitting => Some(SubmissionOutcome::Pending),
            SubmissionState::Succeeded => Some(SubmissionOutcome::Succeeded),
            SubmissionState::Failed { reason } => Some(SubmissionOutcome::Failed {
                reason: reason.clone(),
            }),
        }
    }
}

/// Why a submission never reached the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Color or seating option missing.
    Incomplete { missing: Vec<&'static str> },
    /// Another submission is in flight.
    InFlight,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Incomplete { .. } => write!(f, "{}", SELECT_BOTH_MESSAGE),
            Rejection::InFlight => write!(f, "A cart submission is already in progress"),
        }
    }
}

/// Result of a submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Pending,
    Succeeded,
    Failed { reason: String },
    Rejected(Rejection),
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Succeeded)
    }
}

#[derive(Debug, Default)]
struct Inner {
    state: SubmissionState,
    message: Option<String>,
}

/// Validates the selection and drives the cart call.
///
/// Shared by reference: `submit` takes `&self` so a second call can observe
/// the in-flight one and be refused.
pub struct SubmissionController {
    cart: Arc<dyn CartService>,
    navigator: Arc<dyn Navigator>,
    cart_path: String,
    timeout: Duration,
    busy: AtomicBool,
    inner: Mutex<Inner>,
}

impl fmt::Debug for SubmissionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmissionController")
            .field("cart_path", &self.cart_path)
            .field("timeout", &self.timeout)
            .field("busy", &self.busy)
            .field("inner", &self.inner)
            .finish()
    }
}

impl SubmissionController {
    pub fn new(cart: Arc<dyn CartService>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            cart,
            navigator,
            cart_path: DEFAULT_CART_PATH.to_string(),
            timeout: DEFAULT_SUBMIT_TIMEOUT,
            busy: AtomicBool::new(false),
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn with_cart_path(mut self, path: impl Into<String>) -> Self {
        self.cart_path = path.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn state(&self) -> SubmissionState {
        self.lock().state.clone()
    }

    /// Message to surface to the shopper, if any.
    pub fn message(&self) -> Option<String> {
        self.lock().message.clone()
    }

    /// A submission is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Validate `selection` and add one unit of `config_id` to the cart.
    ///
    /// The selection is only read, so a failed submission can be retried
    /// without re-selecting.
    pub async fn submit(
        &self,
        selection: &ConfigurationSelection,
        config_id: &ConfigId,
    ) -> SubmissionOutcome {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!(config_id = %config_id, "submission already in flight");
            return SubmissionOutcome::Rejected(Rejection::InFlight);
        }
        let _guard = BusyGuard(self);

        let (color, seating) = match (selection.color(), selection.seating_option()) {
            (Some(color), Some(seating)) => (color, seating),
            _ => {
                let missing = selection.missing_fields();
                info!(config_id = %config_id, ?missing, "submission rejected");
                self.set(SubmissionState::Ready, Some(SELECT_BOTH_MESSAGE));
                return SubmissionOutcome::Rejected(Rejection::Incomplete { missing });
            }
        };

        self.set(SubmissionState::Submitting, None);
        let addition = CartAddition::single(config_id.clone(), color, seating);
        info!(config_id = %config_id, color, seating, "adding to cart");

        let result = match tokio::time::timeout(self.timeout, self.cart.add_to_cart(addition)).await
        {
            Ok(result) => result,
            Err(_) => Err(SourceError::Timeout(self.timeout)),
        };

        match result {
            Ok(()) => {
                self.set(SubmissionState::Succeeded, None);
                info!(config_id = %config_id, path = %self.cart_path, "added to cart");
                self.navigator.navigate_to(&self.cart_path);
                SubmissionOutcome::Succeeded
            }
            Err(e) => {
                warn!(config_id = %config_id, error = %e, "add to cart failed");
                self.set(
                    SubmissionState::Failed {
                        reason: ADD_TO_CART_FAILED_MESSAGE.to_string(),
                    },
                    Some(ADD_TO_CART_FAILED_MESSAGE),
                );
                SubmissionOutcome::Failed {
                    reason: ADD_TO_CART_FAILED_MESSAGE.to_string(),
                }
            }
        }
    }

    fn set(&self, state: SubmissionState, message: Option<&str>) {
        let mut inner = self.lock();
        inner.state = state;
        inner.message = message.map(str::to_string);
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clears the busy flag when a submission ends, including when its future
/// is dropped mid-flight.
struct BusyGuard<'a>(&'a SubmissionController);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        {
            let mut inner = self.0.lock();
            if inner.state == SubmissionState::Submitting {
                inner.state = SubmissionState::Ready;
            }
        }
        self.0.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{RecordingCart, RecordingNavigator};
    use tokio::sync::oneshot;

    fn controller(cart: Arc<dyn CartService>, nav: Arc<RecordingNavigator>) -> SubmissionController {
        SubmissionController::new(cart, nav)
    }

    fn cfg1() -> ConfigId {
        ConfigId::new("cfg1")
    }

    /// Cart call that waits for the test to release it.
    struct HeldCart {
        release: Mutex<Option<oneshot::Receiver<()>>>,
        calls: Mutex<Vec<CartAddition>>,
    }

    #[async_trait]
    impl CartService for HeldCart {
        async fn add_to_cart(&self, addition: CartAddition) -> Result<(), SourceError> {
            self.calls.lock().unwrap().push(addition);
            let release = self.release.lock().unwrap().take();
            if let Some(rx) = release {
                let _ = rx.await;
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_incomplete_selection_is_rejected() {
        let cart = Arc::new(RecordingCart::succeeding());
        let nav = Arc::new(RecordingNavigator::default());
        let controller = controller(cart.clone(), nav.clone());

        let selection = ConfigurationSelection {
            color: Some("red".to_string()),
            seating_option: None,
        };
        let outcome = controller.submit(&selection, &cfg1()).await;

        assert_eq!(
            outcome,
            SubmissionOutcome::Rejected(Rejection::Incomplete {
                missing: vec!["seating option"]
            })
        );
        assert_eq!(controller.message().as_deref(), Some(SELECT_BOTH_MESSAGE));
        assert_eq!(controller.state(), SubmissionState::Ready);
        assert!(cart.additions().is_empty());
        assert!(nav.paths().is_empty());
    }

    #[tokio::test]
    async fn test_one_field_present_is_not_enough() {
        let cart = Arc::new(RecordingCart::succeeding());
        let nav = Arc::new(RecordingNavigator::default());
        let controller = controller(cart.clone(), nav);

        let selection = ConfigurationSelection {
            color: None,
            seating_option: Some("sofa-a".to_string()),
        };
        assert!(matches!(
            controller.submit(&selection, &cfg1()).await,
            SubmissionOutcome::Rejected(Rejection::Incomplete { .. })
        ));
        assert_eq!(cart.calls(), 0);
    }

    #[tokio::test]
    async fn test_successful_submission_navigates_once() {
        let cart = Arc::new(RecordingCart::succeeding());
        let nav = Arc::new(RecordingNavigator::default());
        let controller = controller(cart.clone(), nav.clone());

        let outcome = controller
            .submit(&ConfigurationSelection::new("red", "sofa-a"), &cfg1())
            .await;

        assert_eq!(outcome, SubmissionOutcome::Succeeded);
        assert_eq!(controller.state(), SubmissionState::Succeeded);
        assert_eq!(controller.message(), None);
        assert_eq!(nav.paths(), vec![DEFAULT_CART_PATH.to_string()]);
        assert_eq!(
            cart.additions(),
            vec![CartAddition::single(cfg1(), "red", "sofa-a")]
        );
        assert!(!controller.is_busy());
    }

    #[tokio::test]
    async fn test_failed_submission_allows_retry() {
        let cart = Arc::new(RecordingCart::failing());
        let nav = Arc::new(RecordingNavigator::default());
        let controller = controller(cart.clone(), nav.clone());
        let selection = ConfigurationSelection::new("red", "sofa-a");

        let outcome = controller.submit(&selection, &cfg1()).await;
        assert_eq!(
            outcome,
            SubmissionOutcome::Failed {
                reason: ADD_TO_CART_FAILED_MESSAGE.to_string()
            }
        );
        assert_eq!(controller.message().as_deref(), Some(ADD_TO_CART_FAILED_MESSAGE));
        assert!(nav.paths().is_empty());
        assert_eq!(selection, ConfigurationSelection::new("red", "sofa-a"));

        cart.set_failing(false);
        assert!(controller.submit(&selection, &cfg1()).await.is_success());
        assert_eq!(controller.message(), None);
        assert_eq!(cart.calls(), 2);
        assert_eq!(nav.paths().len(), 1);
    }

    #[tokio::test]
    async fn test_double_submit_is_refused() {
        let (release, rx) = oneshot::channel();
        let cart = Arc::new(HeldCart {
            release: Mutex::new(Some(rx)),
            calls: Mutex::new(Vec::new()),
        });
        let nav = Arc::new(RecordingNavigator::default());
        let controller = controller(cart.clone(), nav.clone());
        let selection = ConfigurationSelection::new("red", "sofa-a");
        let id = cfg1();

        let (first, second) = tokio::join!(controller.submit(&selection, &id), async {
            assert!(controller.is_busy());
            assert_eq!(controller.state(), SubmissionState::Submitting);
            assert_eq!(controller.state().outcome(), Some(SubmissionOutcome::Pending));
            let outcome = controller.submit(&selection, &id).await;
            release.send(()).unwrap();
            outcome
        });

        assert_eq!(first, SubmissionOutcome::Succeeded);
        assert_eq!(second, SubmissionOutcome::Rejected(Rejection::InFlight));
        assert_eq!(cart.calls.lock().unwrap().len(), 1);
        assert_eq!(nav.paths().len(), 1);
        assert!(!controller.is_busy());
    }

    #[tokio::test]
    async fn test_dropped_submission_releases_guard() {
        let (_release, rx) = oneshot::channel::<()>();
        let cart = Arc::new(HeldCart {
            release: Mutex::new(Some(rx)),
            calls: Mutex::new(Vec::new()),
        });
        let nav = Arc::new(RecordingNavigator::default());
        let controller = controller(cart, nav);
        let selection = ConfigurationSelection::new("red", "sofa-a");
        let id = cfg1();

        {
            let pending = controller.submit(&selection, &id);
            tokio::pin!(pending);
            assert!(futures::poll!(pending.as_mut()).is_pending());
            assert!(controller.is_busy());
        }

        assert!(!controller.is_busy());
        assert_eq!(controller.state(), SubmissionState::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cart_timeout_is_a_failure() {
        struct StuckCart;

        #[async_trait]
        impl CartService for StuckCart {
            async fn add_to_cart(&self, _: CartAddition) -> Result<(), SourceError> {
                std::future::pending().await
            }
        }

        let nav = Arc::new(RecordingNavigator::default());
        let controller = SubmissionController::new(Arc::new(StuckCart), nav.clone())
            .with_timeout(Duration::from_secs(3));

        let outcome = controller
            .submit(&ConfigurationSelection::new("red", "sofa-a"), &cfg1())
            .await;
        assert_eq!(
            outcome,
            SubmissionOutcome::Failed {
                reason: ADD_TO_CART_FAILED_MESSAGE.to_string()
            }
        );
        assert!(nav.paths().is_empty());
    }

    #[tokio::test]
    async fn test_custom_cart_path() {
        let nav = Arc::new(RecordingNavigator::default());
        let controller = SubmissionController::new(Arc::new(RecordingCart::succeeding()), nav.clone())
            .with_cart_path("/checkout/cart");

        controller
            .submit(&ConfigurationSelection::new("red", "sofa-a"), &cfg1())
            .await;
        assert_eq!(nav.paths(), vec!["/checkout/cart".to_string()]);
    }

    #[test]
    fn test_cart_addition_wire_format() {
        let addition = CartAddition::single(cfg1(), "red", "sofa-a");
        let json = serde_json::to_value(&addition).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "quantity": 1,
                "variantId": "cfg1",
                "options": {"color": "red", "seating": "sofa-a"}
            })
        );
    }
}
