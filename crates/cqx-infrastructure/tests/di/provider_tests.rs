//! Service provider resolution and lifetime tests

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use cqx_application::use_cases::{DecorationComposer, Decorator};
use cqx_domain::{ContractKey, Error, Lifetime, Resolver, ResolverExt, TypeIdentity};
use cqx_infrastructure::di::ServiceCollection;

trait Greeter: Send + Sync {
    fn greet(&self, name: &str) -> String;
}

struct EnglishGreeter;

impl Greeter for EnglishGreeter {
    fn greet(&self, name: &str) -> String {
        format!("Hello, {name}")
    }
}

struct LoggingGreeter {
    inner: Arc<dyn Greeter>,
}

impl Greeter for LoggingGreeter {
    fn greet(&self, name: &str) -> String {
        format!("[log] {}", self.inner.greet(name))
    }
}

fn greeter_key() -> ContractKey {
    ContractKey::fixed(TypeIdentity::new("Greeter"))
}

fn counting_greeter(
    services: &mut ServiceCollection,
    lifetime: Lifetime,
) -> Arc<AtomicUsize> {
    let built = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&built);
    services.add_typed::<dyn Greeter, _>(greeter_key(), lifetime, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(EnglishGreeter))
    });
    built
}

fn logging_decorator() -> Decorator {
    Decorator::typed::<dyn Greeter, _>("LoggingGreeter", |inner, _| {
        Ok(Arc::new(LoggingGreeter { inner }))
    })
}

#[test]
fn test_singleton_through_decoration_is_shared() {
    let mut services = ServiceCollection::new();
    services.add_singleton::<dyn Greeter, _>(greeter_key(), |_| Ok(Arc::new(EnglishGreeter)));
    DecorationComposer::new(&mut services)
        .decorate_fixed(&greeter_key(), &logging_decorator())
        .unwrap();

    let provider = services.build_provider();
    let first = provider.resolve_as::<dyn Greeter>(&greeter_key()).unwrap();
    let second = provider.resolve_as::<dyn Greeter>(&greeter_key()).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.greet("Ada"), "[log] Hello, Ada");
    assert_eq!(provider.snapshot()[0].lifetime, Lifetime::Singleton);
    assert_eq!(
        provider.snapshot()[0].provider.name(),
        format!("LoggingGreeter({})", std::any::type_name::<dyn Greeter>())
    );
}

#[test]
fn test_singleton_shared_across_scopes() {
    let mut services = ServiceCollection::new();
    let built = counting_greeter(&mut services, Lifetime::Singleton);
    let provider = services.build_provider();

    let root = provider.resolve(&greeter_key()).unwrap();
    let scope = provider.create_scope();
    let scoped = scope.resolve(&greeter_key()).unwrap();

    assert!(root.ptr_eq(&scoped));
    assert_eq!(built.load(Ordering::SeqCst), 1);
}

#[test]
fn test_scoped_instance_per_scope() {
    let mut services = ServiceCollection::new();
    let built = counting_greeter(&mut services, Lifetime::Scoped);
    let provider = services.build_provider();

    let scope_a = provider.create_scope();
    let scope_b = provider.create_scope();
    let a1 = scope_a.resolve(&greeter_key()).unwrap();
    let a2 = scope_a.resolve(&greeter_key()).unwrap();
    let b1 = scope_b.resolve(&greeter_key()).unwrap();

    assert!(a1.ptr_eq(&a2));
    assert!(!a1.ptr_eq(&b1));
    assert_eq!(built.load(Ordering::SeqCst), 2);
}

#[test]
fn test_root_provider_is_its_own_scope() {
    let mut services = ServiceCollection::new();
    counting_greeter(&mut services, Lifetime::Scoped);
    let provider = services.build_provider();

    let first = provider.resolve(&greeter_key()).unwrap();
    let second = provider.resolve(&greeter_key()).unwrap();
    let in_scope = provider.create_scope().resolve(&greeter_key()).unwrap();

    assert!(first.ptr_eq(&second));
    assert!(!first.ptr_eq(&in_scope));
}

#[test]
fn test_transient_builds_every_time() {
    let mut services = ServiceCollection::new();
    let built = counting_greeter(&mut services, Lifetime::Transient);
    let provider = services.build_provider();

    let first = provider.resolve(&greeter_key()).unwrap();
    let second = provider.resolve(&greeter_key()).unwrap();

    assert!(!first.ptr_eq(&second));
    assert_eq!(built.load(Ordering::SeqCst), 2);
}

#[test]
fn test_resolve_returns_last_and_resolve_all_keeps_order() {
    struct Named(&'static str);
    impl Greeter for Named {
        fn greet(&self, _: &str) -> String {
            self.0.to_string()
        }
    }

    let mut services = ServiceCollection::new();
    services
        .add_transient::<dyn Greeter, _>(greeter_key(), |_| Ok(Arc::new(Named("first"))))
        .add_transient::<dyn Greeter, _>(greeter_key(), |_| Ok(Arc::new(Named("second"))));
    let provider = services.build_provider();

    let last = provider.resolve_as::<dyn Greeter>(&greeter_key()).unwrap();
    assert_eq!(last.greet(""), "second");

    let all: Vec<String> = provider
        .resolve_all_as::<dyn Greeter>(&greeter_key())
        .unwrap()
        .iter()
        .map(|g| g.greet(""))
        .collect();
    assert_eq!(all, vec!["first", "second"]);
}

#[test]
fn test_resolve_unregistered_key() {
    let provider = ServiceCollection::new().build_provider();

    let err = provider.resolve(&greeter_key()).unwrap_err();
    assert!(matches!(err, Error::NotRegistered { .. }));
    assert!(provider.resolve_all(&greeter_key()).unwrap().is_empty());
    assert!(!provider.contains(&greeter_key()));
}

#[test]
fn test_resolve_as_wrong_type() {
    let mut services = ServiceCollection::new();
    services.add_instance::<str>(greeter_key(), Arc::from("not a greeter"));
    let provider = services.build_provider();

    let err = provider
        .resolve_as::<dyn Greeter>(&greeter_key())
        .err()
        .unwrap();
    assert!(matches!(err, Error::TypeMismatch { .. }));
}

#[test]
fn test_constructor_resolves_dependencies() {
    let prefix_key = ContractKey::fixed(TypeIdentity::new("Prefix"));
    let mut services = ServiceCollection::new();
    services.add_instance::<str>(prefix_key.clone(), Arc::from("Hi"));
    services.add_singleton::<dyn Greeter, _>(greeter_key(), move |resolver| {
        struct Prefixed(Arc<str>);
        impl Greeter for Prefixed {
            fn greet(&self, name: &str) -> String {
                format!("{}, {name}", self.0)
            }
        }
        let prefix = resolver.resolve_as::<str>(&prefix_key)?;
        Ok(Arc::new(Prefixed(prefix)))
    });
    let provider = services.build_provider();

    let greeter = provider.resolve_as::<dyn Greeter>(&greeter_key()).unwrap();
    assert_eq!(greeter.greet("Bob"), "Hi, Bob");
}

#[test]
fn test_singleton_dependencies_come_from_root_scope() {
    let counter_key = ContractKey::fixed(TypeIdentity::new("Counter"));
    let mut services = ServiceCollection::new();
    services.add_scoped::<AtomicUsize, _>(counter_key.clone(), |_| Ok(Arc::new(AtomicUsize::new(0))));
    let shared_key = ContractKey::fixed(TypeIdentity::new("SharedCounter"));
    let dependency_key = counter_key.clone();
    services.add_singleton::<AtomicUsize, _>(shared_key.clone(), move |resolver| {
        resolver.resolve_as::<AtomicUsize>(&dependency_key)
    });
    let provider = services.build_provider();

    let scope = provider.create_scope();
    let from_singleton = scope.resolve_as::<AtomicUsize>(&shared_key).unwrap();
    let from_scope = scope.resolve_as::<AtomicUsize>(&counter_key).unwrap();
    let from_root = provider.resolve_as::<AtomicUsize>(&counter_key).unwrap();

    assert!(Arc::ptr_eq(&from_singleton, &from_root));
    assert!(!Arc::ptr_eq(&from_singleton, &from_scope));
}

#[test]
fn test_validate_singletons_surfaces_faults() {
    let mut services = ServiceCollection::new();
    counting_greeter(&mut services, Lifetime::Transient);
    services.add_singleton::<dyn Greeter, _>(ContractKey::fixed(TypeIdentity::new("Broken")), |_| {
        Err(Error::infrastructure("greeter backend unavailable"))
    });
    let provider = services.build_provider();

    let err = provider.validate_singletons().unwrap_err();
    assert!(err.to_string().contains("greeter backend unavailable"));
}

#[test]
fn test_validate_singletons_counts_and_caches() {
    let mut services = ServiceCollection::new();
    let built = counting_greeter(&mut services, Lifetime::Singleton);
    let provider = services.build_provider();

    assert_eq!(provider.validate_singletons().unwrap(), 1);
    provider.resolve(&greeter_key()).unwrap();
    assert_eq!(built.load(Ordering::SeqCst), 1);
}

#[test]
fn test_decorated_scoped_binding_stays_scoped() {
    let mut services = ServiceCollection::new();
    counting_greeter(&mut services, Lifetime::Scoped);
    DecorationComposer::new(&mut services)
        .decorate_fixed(&greeter_key(), &logging_decorator())
        .unwrap();
    let provider = services.build_provider();

    let scope_a = provider.create_scope();
    let scope_b = provider.create_scope();
    let a1 = scope_a.resolve(&greeter_key()).unwrap();
    let a2 = scope_a.resolve(&greeter_key()).unwrap();
    let b1 = scope_b.resolve(&greeter_key()).unwrap();

    assert!(a1.ptr_eq(&a2));
    assert!(!a1.ptr_eq(&b1));
}

#[test]
fn test_self_dependent_singleton_fails_validation() {
    let mut services = ServiceCollection::new();
    services.add_singleton::<dyn Greeter, _>(greeter_key(), |resolver| {
        resolver.resolve_as::<dyn Greeter>(&greeter_key())
    });
    let provider = services.build_provider();

    let err = provider.validate_singletons().unwrap_err();
    assert!(matches!(err, Error::Registry { .. }));
    assert!(err.to_string().contains("Circular dependency: Greeter -> Greeter"));

    let again = provider.resolve(&greeter_key()).unwrap_err();
    assert!(matches!(again, Error::Registry { .. }));
}

#[test]
fn test_transient_cycle_reports_path() {
    let echo_key = ContractKey::fixed(TypeIdentity::new("Echo"));
    let mut services = ServiceCollection::new();
    let echo = echo_key.clone();
    services.add_transient::<dyn Greeter, _>(greeter_key(), move |resolver| {
        resolver.resolve_as::<dyn Greeter>(&echo)
    });
    services.add_transient::<dyn Greeter, _>(echo_key, |resolver| {
        resolver.resolve_as::<dyn Greeter>(&greeter_key())
    });
    let provider = services.build_provider();

    let err = provider.resolve(&greeter_key()).unwrap_err();
    assert!(matches!(err, Error::Registry { .. }));
    assert!(err.to_string().contains("Greeter -> Echo -> Greeter"));
}

#[test]
fn test_scoped_cycle_fails_inside_scope() {
    let mut services = ServiceCollection::new();
    services.add_scoped::<dyn Greeter, _>(greeter_key(), |resolver| {
        resolver.resolve_as::<dyn Greeter>(&greeter_key())
    });
    let provider = services.build_provider();

    let err = provider.create_scope().resolve(&greeter_key()).unwrap_err();
    assert!(matches!(err, Error::Registry { .. }));
}

#[test]
fn test_shared_dependency_is_not_a_cycle() {
    let prefix_key = ContractKey::fixed(TypeIdentity::new("Prefix"));
    let mut services = ServiceCollection::new();
    services.add_transient::<str, _>(prefix_key.clone(), |_| Ok(Arc::from("Hi")));
    let dependency = prefix_key.clone();
    services.add_transient::<dyn Greeter, _>(greeter_key(), move |resolver| {
        resolver.resolve_as::<str>(&dependency)?;
        resolver.resolve_as::<str>(&dependency)?;
        Ok(Arc::new(EnglishGreeter))
    });
    let provider = services.build_provider();

    assert!(provider.resolve(&greeter_key()).is_ok());
    assert!(provider.resolve(&greeter_key()).is_ok());
}
