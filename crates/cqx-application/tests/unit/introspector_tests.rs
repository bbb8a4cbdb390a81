//! Tests for component discovery

use std::sync::Arc;

use cqx_application::ContractIntrospector;
use cqx_domain::{
    Component, ContractKey, ContractShape, Error, Instance, ModuleSource, TypeIdentity, TypeInfo,
};

use crate::support::{BrokenModule, Original, Service, TestModule, message};

fn handler_key(args: &[&str]) -> ContractKey {
    ContractKey::closed(
        TypeIdentity::new("Handler"),
        args.iter().map(|a| message(a)).collect(),
    )
}

fn concrete(name: &'static str, contracts: Vec<ContractKey>) -> Component {
    contracts
        .into_iter()
        .fold(Component::builder(TypeInfo::concrete(name)), |builder, key| {
            builder.provides(key, move |_| {
                Ok(Instance::new::<dyn Service>(Arc::new(Original(name))))
            })
        })
        .build()
}

fn modules() -> Vec<Arc<dyn ModuleSource>> {
    let generic_param = TypeInfo::parameterized("T", 0).into_ref();
    let open_handler = Component::builder(TypeInfo::parameterized("GenericHandler", 1))
        .implements(ContractKey::closed(TypeIdentity::new("Handler"), vec![generic_param]))
        .build();
    let abstract_greeter = Component::builder(TypeInfo::abstract_type("BaseGreeter"))
        .implements(ContractKey::fixed(TypeIdentity::new("Greeter")))
        .build();

    vec![
        TestModule::new(
            "first",
            vec![
                concrete("PingHandler", vec![handler_key(&["Ping"])]),
                open_handler,
                concrete(
                    "MultiHandler",
                    vec![handler_key(&["Ping"]), handler_key(&["Pong"])],
                ),
            ],
        ),
        TestModule::new(
            "second",
            vec![
                abstract_greeter,
                concrete("EnglishGreeter", vec![ContractKey::fixed(TypeIdentity::new("Greeter"))]),
                concrete("PongHandler", vec![handler_key(&["Pong"])]),
            ],
        ),
    ]
}

fn names(shape: &ContractShape, modules: &[Arc<dyn ModuleSource>]) -> Vec<String> {
    ContractIntrospector::discover(shape, modules)
        .map(|d| {
            let d = d.expect("discovery");
            format!("{} -> {}", d.implementation.identity(), d.contract)
        })
        .collect()
}

#[test]
fn test_parameterized_shape_skips_non_concrete_and_fans_out_per_tuple() {
    let modules = modules();
    let found = names(&ContractShape::parameterized("Handler", &["T"]), &modules);

    assert_eq!(
        found,
        vec![
            "PingHandler -> Handler<Ping>",
            "MultiHandler -> Handler<Ping>",
            "MultiHandler -> Handler<Pong>",
            "PongHandler -> Handler<Pong>",
        ]
    );
}

#[test]
fn test_fixed_shape_yields_empty_tuple_for_direct_implementations() {
    let modules = modules();
    let shape = ContractShape::fixed("Greeter");
    let found: Vec<_> = ContractIntrospector::discover(&shape, &modules)
        .collect::<Result<_, _>>()
        .expect("discover");

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].implementation.identity().name(), "EnglishGreeter");
    assert!(found[0].arguments().is_empty());
}

#[test]
fn test_shape_with_other_arity_finds_nothing() {
    let modules = modules();
    let found = names(&ContractShape::parameterized("Handler", &["T", "R"]), &modules);
    assert!(found.is_empty());
}

#[test]
fn test_discovery_is_restartable() {
    let modules = modules();
    let shape = ContractShape::parameterized("Handler", &["T"]);
    assert_eq!(names(&shape, &modules), names(&shape, &modules));
}

#[test]
fn test_unreadable_module_yields_introspection_failure() {
    let mut modules = modules();
    modules.insert(1, Arc::new(BrokenModule));
    let shape = ContractShape::parameterized("Handler", &["T"]);

    let results: Vec<_> = ContractIntrospector::discover(&shape, &modules).collect();
    let failure = results
        .iter()
        .find_map(|r| r.as_ref().err())
        .expect("failure surfaced");
    match failure {
        Error::ModuleIntrospectionFailure { module, message } => {
            assert_eq!(module, "broken");
            assert!(message.contains("metadata unreadable"));
        }
        other => panic!("Expected ModuleIntrospectionFailure, got {other:?}"),
    }
}

#[test]
fn test_discovery_is_lazy_per_module() {
    let modules: Vec<Arc<dyn ModuleSource>> = vec![
        TestModule::new("ok", vec![concrete("PingHandler", vec![handler_key(&["Ping"])])]),
        Arc::new(BrokenModule),
    ];
    let shape = ContractShape::parameterized("Handler", &["T"]);

    let first = ContractIntrospector::discover(&shape, &modules).next();
    assert!(matches!(first, Some(Ok(_))));
}
