//! End-to-end patch flow scenarios driven through the public engine API.

use graft_engine::{Engine, EngineConfig, InstanceId, TypeTag};
use graft_reflect::element_key;
use graft_test_utils::{
    slot_class, slot_collection, trigger_component, FakeFactory, FakeRegistry, FakeTarget,
};
use pretty_assertions::assert_eq;
use std::time::Duration;

const SAMPLE: TypeTag = TypeTag(786);
const TARGET: TypeTag = TypeTag(787);

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn config() -> EngineConfig {
    EngineConfig::new(SAMPLE, TARGET)
        .with_startup_delay(Duration::from_millis(5))
        .with_tick_interval(Duration::from_millis(10))
}

fn reference_factory() -> FakeFactory {
    let reference = slot_collection(&slot_class(), &[("Stock", 4), ("Tec", 2), ("Other", 1)]);
    FakeFactory::serving("Slots", reference)
}

fn keys_of(collection: &graft_reflect::CollectionHandle) -> Vec<String> {
    collection.elements().iter().filter_map(element_key).collect()
}

#[test]
fn slots_completed_once_and_never_duplicated() {
    init_tracing();

    let registry = FakeRegistry::new();
    let own = slot_collection(&slot_class(), &[("Other", 9)]);
    registry.add(FakeTarget::new(1, TARGET).with_collection("Slots", own.clone()));

    let mut engine = Engine::new(
        config(),
        Box::new(reference_factory()),
        Box::new(registry),
    )
    .unwrap();

    engine.capture_once();
    // Only the allow-listed keys were learned.
    assert!(engine.store().contains("Stock"));
    assert!(engine.store().contains("Tec"));
    assert!(!engine.store().contains("Other"));

    let first = engine.tick();
    assert_eq!(first.slots_added, 2);
    assert_eq!(keys_of(&own), vec!["Other", "Stock", "Tec"]);

    let second = engine.tick();
    assert_eq!(second.slots_added, 0);
    assert_eq!(second.newly_processed, 0);
    assert_eq!(keys_of(&own), vec!["Other", "Stock", "Tec"]);
}

#[test]
fn trigger_mode_patched_to_auto() {
    init_tracing();

    let registry = FakeRegistry::new();
    let component = trigger_component(&["Semi", "Auto"], "Semi");
    registry.add(
        FakeTarget::new(1, TARGET)
            .with_component(component.clone())
            .with_collection("Slots", slot_collection(&slot_class(), &[])),
    );

    let mut engine = Engine::new(
        config(),
        Box::new(reference_factory()),
        Box::new(registry),
    )
    .unwrap();
    engine.capture_once();

    let report = engine.tick();
    assert_eq!(report.triggers_patched, 1);
    assert_eq!(
        component
            .get("triggerMode")
            .unwrap()
            .as_enum()
            .unwrap()
            .variant,
        "Auto"
    );
}

#[test]
fn no_reference_object_means_noop_forever() {
    init_tracing();

    let registry = FakeRegistry::new();
    registry.add(
        FakeTarget::new(1, TARGET)
            .with_collection("Slots", slot_collection(&slot_class(), &[])),
    );

    let mut engine = Engine::new(
        config(),
        Box::new(FakeFactory::unavailable()),
        Box::new(registry),
    )
    .unwrap();

    let scan = engine.capture_once();
    assert!(scan.is_empty());
    assert_eq!(engine.stats().templates, 0);

    for _ in 0..5 {
        let report = engine.tick();
        assert!(!report.ran);
    }
    assert_eq!(engine.stats().processed, 0);
}

#[test]
fn late_joining_target_is_patched_on_a_later_tick() {
    init_tracing();

    let registry = FakeRegistry::new();
    let mut engine = Engine::new(
        config(),
        Box::new(reference_factory()),
        Box::new(registry.clone()),
    )
    .unwrap();
    engine.capture_once();

    let idle = engine.tick();
    assert_eq!(idle.live, 0);

    let own = slot_collection(&slot_class(), &[]);
    registry.add(FakeTarget::new(7, TARGET).with_collection("Slots", own.clone()));

    let report = engine.tick();
    assert_eq!(report.newly_processed, 1);
    assert_eq!(keys_of(&own), vec!["Stock", "Tec"]);
}

#[test]
fn despawned_identifier_is_pruned_and_repatch_on_reuse() {
    init_tracing();

    let registry = FakeRegistry::new();
    let first = slot_collection(&slot_class(), &[]);
    registry.add(FakeTarget::new(3, TARGET).with_collection("Slots", first.clone()));

    let mut engine = Engine::new(
        config(),
        Box::new(reference_factory()),
        Box::new(registry.clone()),
    )
    .unwrap();
    engine.capture_once();
    engine.tick();
    assert_eq!(engine.stats().processed, 1);

    registry.remove(InstanceId(3));
    let report = engine.tick();
    assert_eq!(report.pruned, 1);
    assert_eq!(engine.stats().processed, 0);

    // The host reusing the identifier looks like a brand-new object.
    let second = slot_collection(&slot_class(), &[]);
    registry.add(FakeTarget::new(3, TARGET).with_collection("Slots", second.clone()));
    let report = engine.tick();
    assert_eq!(report.newly_processed, 1);
    assert_eq!(keys_of(&second), vec!["Stock", "Tec"]);
}

#[tokio::test]
async fn run_loop_scans_ticks_and_tears_down() {
    init_tracing();

    let registry = FakeRegistry::new();
    let own = slot_collection(&slot_class(), &[("Other", 9)]);
    registry.add(FakeTarget::new(1, TARGET).with_collection("Slots", own.clone()));

    let factory = reference_factory();
    let mut engine = Engine::new(
        config(),
        Box::new(factory.clone()),
        Box::new(registry),
    )
    .unwrap();

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let handle = tokio::spawn(async move {
        engine.run(shutdown_rx).await;
        engine
    });

    // Startup delay (5ms) plus a few 10ms ticks.
    tokio::time::sleep(Duration::from_millis(80)).await;
    shutdown_tx.send(true).unwrap();
    let engine = handle.await.unwrap();

    assert_eq!(factory.instantiated(), 1);
    assert_eq!(factory.disposed(), 1);
    assert_eq!(keys_of(&own), vec!["Other", "Stock", "Tec"]);

    let stats = engine.stats();
    assert_eq!(stats.templates, 2);
    assert!(stats.ticks >= 1);
    // Teardown cleared the processed set.
    assert_eq!(stats.processed, 0);
}

#[tokio::test]
async fn shutdown_during_startup_delay_skips_the_scan() {
    init_tracing();

    let factory = reference_factory();
    let mut engine = Engine::new(
        EngineConfig::new(SAMPLE, TARGET)
            .with_startup_delay(Duration::from_secs(60))
            .with_tick_interval(Duration::from_millis(10)),
        Box::new(factory.clone()),
        Box::new(FakeRegistry::new()),
    )
    .unwrap();

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let handle = tokio::spawn(async move {
        engine.run(shutdown_rx).await;
        engine
    });

    shutdown_tx.send(true).unwrap();
    let engine = handle.await.unwrap();

    assert_eq!(factory.instantiated(), 0);
    assert_eq!(engine.stats().templates, 0);
}
