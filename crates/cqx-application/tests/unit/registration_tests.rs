//! Tests for scan-and-register dispatch

use std::sync::Arc;

use cqx_application::{RegistrationDispatcher, RegistrationOp, RegistrationTable, ShapeFamily};
use cqx_domain::{
    Binding, BindingRegistry, Component, ContractKey, ContractShape, Error, Lifetime,
    ModuleSource, ProviderKind, ResolverExt, TypeIdentity, TypeInfo,
};

use crate::support::{
    BrokenModule, DirectResolver, Original, Service, TestModule, VecRegistry, message,
    service_instance,
};

fn one() -> ContractShape {
    ContractShape::parameterized("Handler", &["T"])
}

fn two() -> ContractShape {
    ContractShape::parameterized("Handler", &["T", "R"])
}

fn handler(args: &[&str]) -> ContractKey {
    ContractKey::closed(
        TypeIdentity::new("Handler"),
        args.iter().map(|a| message(a)).collect(),
    )
}

fn handler_module() -> Arc<dyn ModuleSource> {
    let ping_handler = Component::builder(TypeInfo::concrete("PingHandler"))
        .provides_as::<dyn Service, _>(handler(&["Ping"]), |_| Ok(Arc::new(Original("ping"))))
        .build();
    let open_handler = Component::builder(TypeInfo::parameterized("OpenHandler", 1))
        .implements(ContractKey::closed(
            TypeIdentity::new("Handler"),
            vec![TypeInfo::parameterized("T", 0).into_ref()],
        ))
        .build();
    let dual_handler = Component::builder(TypeInfo::concrete("DualHandler"))
        .provides_as::<dyn Service, _>(handler(&["Ping"]), |_| Ok(Arc::new(Original("dual"))))
        .provides_as::<dyn Service, _>(handler(&["Ping", "Pong"]), |_| {
            Ok(Arc::new(Original("dual-pair")))
        })
        .build();
    TestModule::new("handlers", vec![ping_handler, open_handler, dual_handler])
}

fn table(lifetime: Lifetime) -> RegistrationTable {
    RegistrationTable::new()
        .bind(&one(), RegistrationOp::with_lifetime(lifetime))
        .bind(&two(), RegistrationOp::with_lifetime(lifetime))
}

fn family() -> ShapeFamily {
    ShapeFamily::new().with(one()).with(two())
}

fn registrations_of(registry: &VecRegistry, implementation: &str) -> usize {
    registry
        .snapshot()
        .iter()
        .filter(|s| s.provider.name() == implementation)
        .count()
}

#[test]
fn test_scan_registers_per_implementation_shape_and_tuple() {
    let mut registry = VecRegistry::default();
    let report = RegistrationDispatcher::new(&mut registry)
        .scan_and_register(&family(), &[handler_module()], &table(Lifetime::Transient))
        .expect("scan");

    assert_eq!(registrations_of(&registry, "PingHandler"), 1);
    assert_eq!(registrations_of(&registry, "OpenHandler"), 0);
    assert_eq!(registrations_of(&registry, "DualHandler"), 2);
    assert_eq!(report.total(), 3);
    assert_eq!(report.count_for(&one()), 2);
    assert_eq!(report.count_for(&two()), 1);
}

#[test]
fn test_scanned_bindings_resolve_through_component_constructors() {
    let mut registry = VecRegistry::default();
    RegistrationDispatcher::new(&mut registry)
        .scan_and_register(&family(), &[handler_module()], &table(Lifetime::Scoped))
        .expect("scan");

    for snapshot in registry.snapshot() {
        assert_eq!(snapshot.kind, ProviderKind::ConcreteType);
        assert_eq!(snapshot.lifetime, Lifetime::Scoped);
    }

    let resolver = DirectResolver(&registry);
    let all = resolver
        .resolve_all_as::<dyn Service>(&handler(&["Ping"]))
        .expect("resolve");
    assert_eq!(all.len(), 2);
    assert!(
        resolver
            .resolve_as::<dyn Service>(&handler(&["Ping", "Pong"]))
            .is_ok()
    );
}

#[test]
fn test_shape_without_operation_fails_before_scanning() {
    let mut registry = VecRegistry::default();
    let partial = RegistrationTable::new().bind(&one(), RegistrationOp::transient());

    let result = RegistrationDispatcher::new(&mut registry).scan_and_register(
        &family(),
        &[handler_module()],
        &partial,
    );
    assert!(matches!(result, Err(Error::Configuration { .. })));
    assert!(registry.is_empty());
}

#[test]
fn test_introspection_failure_adds_nothing() {
    let mut registry = VecRegistry::default();
    let modules: Vec<Arc<dyn ModuleSource>> = vec![handler_module(), Arc::new(BrokenModule)];

    let result = RegistrationDispatcher::new(&mut registry).scan_and_register(
        &family(),
        &modules,
        &table(Lifetime::Transient),
    );
    assert!(matches!(
        result,
        Err(Error::ModuleIntrospectionFailure { .. })
    ));
    assert!(registry.is_empty());
}

#[test]
fn test_custom_operation_receives_discovery() {
    let mut registry = VecRegistry::default();
    let custom = RegistrationOp::new(|discovery| {
        let name = format!("{}:{}", discovery.implementation.identity(), discovery.arguments().len());
        Ok(Binding::factory(
            discovery.contract.clone(),
            Lifetime::Singleton,
            &name,
            |_| Ok(service_instance("custom")),
        ))
    });
    let table = RegistrationTable::new().bind(&two(), custom);

    RegistrationDispatcher::new(&mut registry)
        .scan_and_register(&ShapeFamily::new().with(two()), &[handler_module()], &table)
        .expect("scan");

    let snapshot = registry.snapshot();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].provider.name(), "DualHandler:2");
    assert_eq!(snapshot[0].kind, ProviderKind::Factory);
}

#[test]
fn test_family_deduplicates_shapes() {
    let family: ShapeFamily = vec![one(), two(), one()].into_iter().collect();
    assert_eq!(family.len(), 2);
}

#[test]
fn test_missing_constructor_is_reported() {
    let marker_only = Component::builder(TypeInfo::concrete("Declared"))
        .implements(handler(&["Ping"]))
        .build();
    let mut registry = VecRegistry::default();

    let result = RegistrationDispatcher::new(&mut registry).scan_and_register(
        &ShapeFamily::new().with(one()),
        &[TestModule::new("m", vec![marker_only])],
        &table(Lifetime::Transient),
    );
    match result {
        Err(Error::Registry { message }) => {
            assert!(message.contains("Declared declares Handler<Ping>"));
            assert!(message.contains("provides no constructor"));
        }
        other => panic!("Expected Registry error, got {other:?}"),
    }
    assert!(registry.is_empty());
}
