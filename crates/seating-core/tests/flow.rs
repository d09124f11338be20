//! End-to-end configurator flow against in-memory collaborators.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use seating_core::catalog::FETCH_FAILED_MESSAGE;
use seating_core::configurator::ADDING_TO_CART_LABEL;
use seating_core::memory::{RecordingCart, RecordingNavigator, StaticCatalogSource};
use seating_core::prelude::*;
use seating_core::submission::{ADD_TO_CART_FAILED_MESSAGE, SELECT_BOTH_MESSAGE};
use tokio::sync::oneshot;

const PROPS: &str = r#"{
    "collectionTitle": "Ciello",
    "seating": {
        "option1OptionsCollection": [{"value": "red"}, {"value": "oat"}],
        "sofa": {"option2OptionsCollection": [{"value": "sofa-a"}, {"value": "sofa-b"}]}
    },
    "config": {"priceUsd": 0},
    "price": {"currency": "USD", "value": 100},
    "colorsData": [{"value": "red", "title": "Red"}, {"value": "oat", "title": "Oat"}],
    "configId": "cfg1"
}"#;

fn catalog(values: &[&str]) -> SupplementalConfig {
    SupplementalConfig::new(
        values
            .iter()
            .map(|v| SeatingOption::new(*v, v.to_uppercase()))
            .collect(),
    )
}

fn build(cart: Arc<dyn CartService>, nav: Arc<RecordingNavigator>) -> Configurator {
    let source = StaticCatalogSource::new().with_config("cfg1", catalog(&["sofa-a", "sofa-b"]));
    Configurator::new(
        ConfiguratorProps::from_json(PROPS).unwrap(),
        Services {
            catalog: Arc::new(source),
            cart,
            navigator: nav,
        },
        ConfiguratorSettings::default(),
    )
    .unwrap()
}

/// Cart that blocks until released, to observe the in-flight state.
struct HeldCart {
    release: Mutex<Option<oneshot::Receiver<()>>>,
}

#[async_trait]
impl CartService for HeldCart {
    async fn add_to_cart(&self, _addition: CartAddition) -> Result<(), SourceError> {
        let release = self.release.lock().unwrap().take();
        if let Some(rx) = release {
            let _ = rx.await;
        }
        Ok(())
    }
}

#[tokio::test]
async fn shopper_configures_and_adds_to_cart() {
    let cart = Arc::new(RecordingCart::succeeding());
    let nav = Arc::new(RecordingNavigator::default());
    let configurator = build(cart.clone(), nav.clone());

    assert!(configurator.load_catalog().await);
    configurator.seed_defaults();
    assert_eq!(
        configurator.selection(),
        ConfigurationSelection::new("red", "sofa-a")
    );

    configurator.update_selection(SelectionUpdate {
        color: None,
        seating_option: Some("sofa-b".to_string()),
    });
    assert_eq!(
        configurator.selection(),
        ConfigurationSelection::new("red", "sofa-b")
    );

    // Zero fee basis: the total is the base price alone.
    let quote = configurator.quote().unwrap();
    assert_eq!(quote.total().unwrap(), Money::new(10_000, Currency::USD));

    assert_eq!(configurator.add_to_cart().await, SubmissionOutcome::Succeeded);
    assert_eq!(
        cart.additions(),
        vec![CartAddition::single(ConfigId::new("cfg1"), "red", "sofa-b")]
    );
    assert_eq!(nav.paths(), vec!["/cart".to_string()]);
}

#[tokio::test]
async fn failed_cart_call_keeps_selection_for_retry() {
    let cart = Arc::new(RecordingCart::failing());
    let nav = Arc::new(RecordingNavigator::default());
    let configurator = build(cart.clone(), nav.clone());
    configurator.load_catalog().await;
    configurator.seed_defaults();

    let outcome = configurator.add_to_cart().await;
    assert_eq!(
        outcome,
        SubmissionOutcome::Failed {
            reason: ADD_TO_CART_FAILED_MESSAGE.to_string()
        }
    );
    assert_eq!(
        configurator.selection(),
        ConfigurationSelection::new("red", "sofa-a")
    );
    match configurator.view() {
        ConfiguratorView::Ready(view) => {
            assert_eq!(view.error.as_deref(), Some(ADD_TO_CART_FAILED_MESSAGE));
            assert!(!view.busy);
        }
        other => panic!("unexpected view: {:?}", other),
    }

    cart.set_failing(false);
    assert!(configurator.add_to_cart().await.is_success());
    assert_eq!(nav.paths().len(), 1);
}

#[tokio::test]
async fn unseeded_selection_never_reaches_the_cart() {
    let cart = Arc::new(RecordingCart::succeeding());
    let nav = Arc::new(RecordingNavigator::default());
    let configurator = build(cart.clone(), nav.clone());
    configurator.load_catalog().await;
    configurator.select_color("red");

    let outcome = configurator.add_to_cart().await;
    assert!(matches!(
        outcome,
        SubmissionOutcome::Rejected(Rejection::Incomplete { .. })
    ));
    assert_eq!(
        configurator.submission().message().as_deref(),
        Some(SELECT_BOTH_MESSAGE)
    );
    assert_eq!(cart.calls(), 0);
    assert!(nav.paths().is_empty());
}

#[tokio::test]
async fn view_shows_busy_label_while_submitting() {
    let (release, rx) = oneshot::channel();
    let cart = Arc::new(HeldCart {
        release: Mutex::new(Some(rx)),
    });
    let nav = Arc::new(RecordingNavigator::default());
    let configurator = build(cart, nav.clone());
    configurator.load_catalog().await;
    configurator.seed_defaults();

    let (outcome, busy_view) = tokio::join!(configurator.add_to_cart(), async {
        let view = configurator.view();
        release.send(()).unwrap();
        view
    });

    match busy_view {
        ConfiguratorView::Ready(view) => {
            assert!(view.busy);
            assert_eq!(view.button_label, ADDING_TO_CART_LABEL);
        }
        other => panic!("unexpected view: {:?}", other),
    }
    assert_eq!(outcome, SubmissionOutcome::Succeeded);
    assert_eq!(nav.paths().len(), 1);
}

#[tokio::test]
async fn late_response_for_previous_id_is_ignored() {
    let nav = Arc::new(RecordingNavigator::default());
    let configurator = build(Arc::new(RecordingCart::succeeding()), nav);
    let source = StaticCatalogSource::new()
        .with_config("A", catalog(&["a-1"]))
        .with_config("B", catalog(&["b-1"]));

    let ticket_a = configurator.set_config_id(ConfigId::new("A")).unwrap();
    let ticket_b = configurator.set_config_id(ConfigId::new("B")).unwrap();

    let timeout = configurator.settings().fetch_timeout;
    let (result_a, result_b) =
        tokio::join!(ticket_a.fetch(&source, timeout), ticket_b.fetch(&source, timeout));

    assert!(configurator.apply_catalog(ticket_b, result_b));
    assert!(!configurator.apply_catalog(ticket_a, result_a));
    assert_eq!(configurator.catalog(), Some(catalog(&["b-1"])));
}

#[tokio::test]
async fn failed_fetch_can_be_retried_explicitly() {
    let nav = Arc::new(RecordingNavigator::default());
    let configurator = build(Arc::new(RecordingCart::succeeding()), nav);

    let ticket = configurator.set_config_id(ConfigId::new("cfg1")).unwrap();
    configurator.apply_catalog(ticket, Err(SourceError::Transport("reset".to_string())));
    assert_eq!(
        configurator.view(),
        ConfiguratorView::Unavailable {
            title: Some("Ciello".to_string()),
            message: FETCH_FAILED_MESSAGE.to_string(),
        }
    );

    assert!(!configurator.load_catalog().await);
    assert!(configurator.retry_catalog().await);
    assert!(matches!(configurator.view(), ConfiguratorView::Ready(_)));
}

#[tokio::test]
async fn config_id_change_while_cart_call_is_pending() {
    let (release, rx) = oneshot::channel();
    let cart = Arc::new(HeldCart {
        release: Mutex::new(Some(rx)),
    });
    let nav = Arc::new(RecordingNavigator::default());
    let configurator = build(cart, nav.clone());
    configurator.load_catalog().await;
    configurator.seed_defaults();

    let (outcome, switched) = tokio::join!(configurator.add_to_cart(), async {
        assert!(configurator.submission().is_busy());
        let ticket = configurator.set_config_id(ConfigId::new("B")).unwrap();
        let applied = configurator.apply_catalog(ticket, Ok(catalog(&["b-1"])));
        configurator.select_seating("b-1");
        release.send(()).unwrap();
        applied
    });

    assert!(switched);
    assert_eq!(outcome, SubmissionOutcome::Succeeded);
    assert_eq!(configurator.config_id(), ConfigId::new("B"));
    assert_eq!(configurator.catalog(), Some(catalog(&["b-1"])));
    assert_eq!(
        configurator.selection(),
        ConfigurationSelection::new("red", "b-1")
    );
    assert_eq!(nav.paths().len(), 1);
}
