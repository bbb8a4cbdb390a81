//! Unit tests for the service collection

use std::sync::Arc;

use cqx_domain::{
    Binding, BindingRegistry, ContractKey, Error, Instance, Lifetime, ProviderKind, Resolver,
    TypeIdentity, TypeInfo,
};
use cqx_infrastructure::di::ServiceCollection;

trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

struct FixedClock(u64);

impl Clock for FixedClock {
    fn now(&self) -> u64 {
        self.0
    }
}

fn clock_key() -> ContractKey {
    ContractKey::fixed(TypeIdentity::new("Clock"))
}

fn clock_binding(value: u64) -> Binding {
    Binding::factory(
        clock_key(),
        Lifetime::Transient,
        &format!("FixedClock{value}"),
        move |_: &dyn Resolver| Ok(Instance::new::<dyn Clock>(Arc::new(FixedClock(value)))),
    )
}

#[test]
fn test_add_keeps_registration_order() {
    let mut services = ServiceCollection::new();
    services.add(clock_binding(1));
    services.add(clock_binding(2));

    let providers: Vec<String> = services
        .bindings_for(&clock_key())
        .iter()
        .map(|b| b.provider().to_string())
        .collect();
    assert_eq!(providers, vec!["FixedClock1", "FixedClock2"]);
    assert_eq!(services.len(), 2);
    assert!(services.contains(&clock_key()));
}

#[test]
fn test_typed_helpers_set_lifetimes() {
    let mut services = ServiceCollection::new();
    services
        .add_transient::<dyn Clock, _>(clock_key(), |_| Ok(Arc::new(FixedClock(1))))
        .add_scoped::<dyn Clock, _>(clock_key(), |_| Ok(Arc::new(FixedClock(2))))
        .add_singleton::<dyn Clock, _>(clock_key(), |_| Ok(Arc::new(FixedClock(3))));

    let lifetimes: Vec<Lifetime> = services.iter().map(Binding::lifetime).collect();
    assert_eq!(
        lifetimes,
        vec![Lifetime::Transient, Lifetime::Scoped, Lifetime::Singleton]
    );
    assert!(services.iter().all(|b| b.kind() == ProviderKind::Factory));
}

#[test]
fn test_add_instance_is_singleton() {
    let mut services = ServiceCollection::new();
    services.add_instance::<dyn Clock>(clock_key(), Arc::new(FixedClock(9)));

    let binding = &services.bindings_for(&clock_key())[0];
    assert_eq!(binding.kind(), ProviderKind::Instance);
    assert_eq!(binding.lifetime(), Lifetime::Singleton);
}

#[test]
fn test_add_type_uses_implementation_identity() {
    let mut services = ServiceCollection::new();
    let implementation = TypeInfo::concrete("FixedClock");
    services.add_type(
        clock_key(),
        Lifetime::Singleton,
        implementation.identity(),
        Arc::new(|_: &dyn Resolver| Ok(Instance::new::<dyn Clock>(Arc::new(FixedClock(0))))),
    );

    let snapshot = services.snapshot();
    assert_eq!(snapshot[0].provider.name(), "FixedClock");
    assert_eq!(snapshot[0].kind, ProviderKind::ConcreteType);
}

#[test]
fn test_try_add_skips_existing_key() {
    let mut services = ServiceCollection::new();
    assert!(services.try_add(clock_binding(1)));
    assert!(!services.try_add(clock_binding(2)));
    assert_eq!(services.len(), 1);
}

#[test]
fn test_replace_by_key_keeps_positions() {
    let other = ContractKey::fixed(TypeIdentity::new("Other"));
    let mut services = ServiceCollection::new();
    services.add(clock_binding(1));
    services.add(Binding::instance(
        other.clone(),
        Instance::new::<dyn Clock>(Arc::new(FixedClock(0))),
    ));
    services.add(clock_binding(2));

    services
        .replace_by_key(&clock_key(), vec![clock_binding(10), clock_binding(20)])
        .unwrap();

    let providers: Vec<String> = services.iter().map(|b| b.provider().to_string()).collect();
    assert_eq!(providers[0], "FixedClock10");
    assert_eq!(services.iter().nth(1).unwrap().key(), &other);
    assert_eq!(providers[2], "FixedClock20");
}

#[test]
fn test_replace_by_key_rejects_count_change() {
    let mut services = ServiceCollection::new();
    services.add(clock_binding(1));
    let before = services.snapshot();

    let err = services
        .replace_by_key(&clock_key(), vec![clock_binding(2), clock_binding(3)])
        .unwrap_err();

    assert!(matches!(err, Error::Registry { .. }));
    assert_eq!(services.snapshot(), before);
}

#[test]
fn test_replace_by_key_rejects_foreign_key() {
    let mut services = ServiceCollection::new();
    services.add(clock_binding(1));

    let foreign = Binding::instance(
        ContractKey::fixed(TypeIdentity::new("Other")),
        Instance::new::<dyn Clock>(Arc::new(FixedClock(0))),
    );
    assert!(services.replace_by_key(&clock_key(), vec![foreign]).is_err());
    assert_eq!(services.bindings_for(&clock_key()).len(), 1);
}

#[test]
fn test_keys_for_base_is_distinct_and_ordered() {
    let handler = TypeIdentity::new("Handler");
    let ping = TypeInfo::concrete("Ping").into_ref();
    let open = TypeInfo::concrete("Open").into_ref();
    let ping_key = ContractKey::closed(handler.clone(), vec![ping]);
    let open_key = ContractKey::closed(handler.clone(), vec![open]);

    let mut services = ServiceCollection::new();
    for key in [&ping_key, &open_key, &ping_key] {
        services.add(Binding::instance(
            key.clone(),
            Instance::new::<dyn Clock>(Arc::new(FixedClock(0))),
        ));
    }
    services.add(clock_binding(1));

    assert_eq!(services.keys_for_base(&handler), vec![ping_key, open_key]);
}
