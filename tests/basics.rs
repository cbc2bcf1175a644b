use ferrous_services::key::{RESOLVER_TYPE, SERVICE_TYPE};
use ferrous_services::{
    Config, DataAccessRegistry, DiError, ParamDescriptor, ServiceDescriptor, ServiceFactory,
    TypeRegistry, Value,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct Counter;

#[test]
fn test_get_twice_returns_cached_instance() {
    let calls = Arc::new(AtomicUsize::new(0));
    let calls_clone = calls.clone();

    let mut registry = TypeRegistry::new();
    registry.register(ServiceDescriptor::new("CounterService", move |_| {
        calls_clone.fetch_add(1, Ordering::SeqCst);
        Ok(Counter)
    }));

    let factory = ServiceFactory::builder(registry).build();
    let first = factory.get("CounterService").unwrap();
    let second = factory.get("CounterService").unwrap();

    assert!(Arc::ptr_eq(&first, &second)); // Same instance
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(factory.is_cached("CounterService"));
}

#[test]
fn test_unknown_type_leaves_cache_untouched() {
    let factory = ServiceFactory::builder(TypeRegistry::new()).build();

    match factory.get("DoesNotExist") {
        Err(DiError::UnknownType(name)) => assert_eq!(name, "DoesNotExist"),
        other => panic!("Expected UnknownType, got {:?}", other.map(|_| ())),
    }
    assert!(factory.cached_types().is_empty());
}

#[test]
fn test_declared_non_service_cannot_be_requested() {
    let mut registry = TypeRegistry::new();
    registry.declare_data_access("WidgetDAO");

    let factory = ServiceFactory::builder(registry).build();
    assert!(matches!(factory.get("WidgetDAO"), Err(DiError::UnknownType(_))));
}

#[test]
fn test_required_config_without_configuration() {
    let mut registry = TypeRegistry::new();
    registry.register(
        ServiceDescriptor::new("ReportService", |_| Ok(())).param(ParamDescriptor::new("config")),
    );

    let factory = ServiceFactory::builder(registry).build();
    match factory.get("ReportService") {
        Err(DiError::MissingConfiguration { parameter }) => assert_eq!(parameter, "config"),
        other => panic!("Expected MissingConfiguration, got {:?}", other.map(|_| ())),
    }
    assert!(!factory.is_cached("ReportService"));
}

#[test]
fn test_optional_config_without_configuration_uses_default() {
    struct Report {
        has_config: bool,
    }

    let mut registry = TypeRegistry::new();
    registry.register(
        ServiceDescriptor::new("ReportService", |args| {
            Ok(Report { has_config: args.config(0)?.is_some() })
        })
        .param(ParamDescriptor::new("config").optional()),
    );

    let factory = ServiceFactory::builder(registry).build();
    let report = factory.get_as::<Report>("ReportService").unwrap();
    assert!(!report.has_config);
}

#[test]
fn test_config_parameter_receives_application_section() {
    struct Paging {
        page_size: String,
    }

    let mut registry = TypeRegistry::new();
    registry.register(
        ServiceDescriptor::new("PagingService", |args| {
            let config = args.config(0)?.unwrap_or_default();
            Ok(Paging { page_size: config.value("page_size").unwrap_or_default() })
        })
        .param(ParamDescriptor::typed("settings", "Config")),
    );

    let config = Config::from_value(json!({
        "application": { "page_size": 50 },
        "page_size": 10,
    }))
    .unwrap();

    let factory = ServiceFactory::builder(registry).config(config).build();
    let paging = factory.get_as::<Paging>("PagingService").unwrap();
    assert_eq!(paging.page_size, "50");
}

#[test]
fn test_missing_application_section_yields_empty_config() {
    let mut registry = TypeRegistry::new();
    registry.register(
        ServiceDescriptor::new("EmptyService", |args| Ok(args.config(0)?.map(|c| c.is_empty())))
            .param(ParamDescriptor::new("config")),
    );

    let config = Config::from_value(json!({ "utility": {} })).unwrap();
    let factory = ServiceFactory::builder(registry).config(config).build();
    let empty = factory.get_as::<Option<bool>>("EmptyService").unwrap();
    assert_eq!(*empty, Some(true));
}

#[test]
fn test_resolver_parameter_receives_shared_factory() {
    struct Lazy {
        factory: ServiceFactory,
    }

    let mut registry = TypeRegistry::new();
    registry
        .register(
            ServiceDescriptor::new("LazyService", |args| Ok(Lazy { factory: args.resolver(0)? }))
                .param(ParamDescriptor::typed("services", RESOLVER_TYPE)),
        )
        .register(ServiceDescriptor::new("CounterService", |_| Ok(Counter)));

    let factory = ServiceFactory::builder(registry).build();
    let lazy = factory.get_as::<Lazy>("LazyService").unwrap();

    let through_handle = lazy.factory.get("CounterService").unwrap();
    let direct = factory.get("CounterService").unwrap();
    assert!(Arc::ptr_eq(&through_handle, &direct));
}

#[test]
fn test_concrete_data_access_by_exact_type() {
    struct AuditDao;
    struct Audit {
        dao: Arc<AuditDao>,
    }

    let mut registry = TypeRegistry::new();
    registry.declare_data_access("app::AuditDAO").register(
        ServiceDescriptor::new("app::ReportService", |args| Ok(Audit { dao: args.get(0)? }))
            .param(ParamDescriptor::typed("audit", "app::AuditDAO")),
    );

    let mut daos = DataAccessRegistry::new();
    daos.register("app::AuditDAO", || AuditDao);
    let daos = Arc::new(daos);

    let factory = ServiceFactory::new(registry, daos.clone(), None, None);
    let audit = factory.get_as::<Audit>("app::ReportService").unwrap();
    let direct = ferrous_services::DataAccessFactory::get(&*daos, "app::AuditDAO")
        .unwrap()
        .downcast::<AuditDao>()
        .unwrap();
    assert!(Arc::ptr_eq(&audit.dao, &direct));
}

#[test]
fn test_data_access_factory_failure_propagates() {
    let mut registry = TypeRegistry::new();
    registry.declare_data_access("app::GhostDAO").register(
        ServiceDescriptor::new("app::GhostService", |_| Ok(()))
            .param(ParamDescriptor::typed("ghost", "app::GhostDAO")),
    );

    let factory = ServiceFactory::builder(registry).build();
    assert!(matches!(
        factory.get("app::GhostService"),
        Err(DiError::DataAccess { ref type_name, .. }) if type_name == "app::GhostDAO"
    ));
}

#[test]
fn test_diamond_dependencies_share_instances() {
    struct Leaf;
    struct Branch {
        leaf: Arc<Leaf>,
    }
    struct Root {
        left: Arc<Branch>,
        right: Arc<Branch>,
    }

    let leaf_calls = Arc::new(AtomicUsize::new(0));
    let leaf_calls_clone = leaf_calls.clone();

    let mut registry = TypeRegistry::new();
    registry
        .register(ServiceDescriptor::new("LeafService", move |_| {
            leaf_calls_clone.fetch_add(1, Ordering::SeqCst);
            Ok(Leaf)
        }))
        .register(
            ServiceDescriptor::new("LeftService", |args| Ok(Branch { leaf: args.get(0)? }))
                .param(ParamDescriptor::typed("leaf", "LeafService")),
        )
        .register(
            ServiceDescriptor::new("RightService", |args| Ok(Branch { leaf: args.get(0)? }))
                .param(ParamDescriptor::typed("leaf", "LeafService")),
        )
        .register(
            ServiceDescriptor::new("RootService", |args| {
                Ok(Root { left: args.get(0)?, right: args.get(1)? })
            })
            .param(ParamDescriptor::typed("left", "LeftService"))
            .param(ParamDescriptor::typed("right", "RightService")),
        );

    let factory = ServiceFactory::builder(registry).build();
    let root = factory.get_as::<Root>("RootService").unwrap();

    assert!(Arc::ptr_eq(&root.left.leaf, &root.right.leaf));
    assert!(!Arc::ptr_eq(&root.left, &root.right));
    assert_eq!(leaf_calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        factory.cached_types(),
        vec!["LeafService", "LeftService", "RightService", "RootService"]
    );
}

#[test]
fn test_unresolvable_parameter_uses_literal_default() {
    let mut registry = TypeRegistry::new();
    registry.register(
        ServiceDescriptor::new("PagerService", |args| Ok(*args.get::<u32>(0)?))
            .param(ParamDescriptor::new("limit").with_default(Value::instance(25u32))),
    );

    let factory = ServiceFactory::builder(registry).build();
    assert_eq!(*factory.get_as::<u32>("PagerService").unwrap(), 25);
}

#[test]
fn test_unresolvable_required_parameter_is_invalid_property() {
    let mut registry = TypeRegistry::new();
    registry.register(
        ServiceDescriptor::new("PagerService", |_| Ok(())).param(ParamDescriptor::new("limit")),
    );

    let factory = ServiceFactory::builder(registry).build();
    match factory.get("PagerService") {
        Err(DiError::InvalidProperty { parameter, source }) => {
            assert_eq!(parameter, "limit");
            assert!(source.is_none());
        }
        other => panic!("Expected InvalidProperty, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_failed_dependency_caches_nothing() {
    let mut registry = TypeRegistry::new();
    registry
        .register(
            ServiceDescriptor::new("BrokenService", |_| Ok(())).param(ParamDescriptor::new("limit")),
        )
        .register(
            ServiceDescriptor::new("OuterService", |_| Ok(()))
                .param(ParamDescriptor::typed("broken", "BrokenService")),
        );

    let factory = ServiceFactory::builder(registry).build();
    assert!(factory.get("OuterService").is_err());
    assert!(factory.cached_types().is_empty());
}

#[test]
fn test_constructor_error_propagates() {
    let mut registry = TypeRegistry::new();
    registry.register(ServiceDescriptor::new("FlakyService", |args| {
        Err::<(), _>(DiError::construction(args.owner(), "backend offline"))
    }));

    let factory = ServiceFactory::builder(registry).build();
    let err = factory.get("FlakyService").unwrap_err();
    assert_eq!(err.to_string(), "Failed to construct FlakyService: backend offline");
    assert!(!factory.is_cached("FlakyService"));
}

#[test]
fn test_get_as_wrong_type() {
    let mut registry = TypeRegistry::new();
    registry.register(ServiceDescriptor::new("CounterService", |_| Ok(Counter)));

    let factory = ServiceFactory::builder(registry).build();
    match factory.get_as::<String>("CounterService") {
        Err(DiError::TypeMismatch { name, expected }) => {
            assert_eq!(name, "CounterService");
            assert!(expected.contains("String"));
        }
        other => panic!("Expected TypeMismatch, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_concurrent_gets_share_one_instance() {
    let mut registry = TypeRegistry::new();
    registry.register(ServiceDescriptor::new("CounterService", |_| Ok(Counter)));
    let factory = ServiceFactory::builder(registry).build();

    let results: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let factory = factory.clone();
                s.spawn(move || factory.get("CounterService").unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for instance in &results[1..] {
        assert!(Arc::ptr_eq(&results[0], instance));
    }
}

fn service_chain(len: usize) -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    for i in 0..len {
        let mut descriptor = ServiceDescriptor::new(format!("S{}", i), |_| Ok(()));
        if i + 1 < len {
            descriptor = descriptor.param(ParamDescriptor::typed("next", format!("S{}", i + 1)));
        }
        registry.register(descriptor);
    }
    registry
}

#[test]
fn test_deep_chain_hits_depth_limit() {
    let factory = ServiceFactory::builder(service_chain(300)).build();

    match factory.get("S0") {
        Err(DiError::DepthExceeded(depth)) => assert_eq!(depth, 128),
        other => panic!("Expected DepthExceeded, got {:?}", other.map(|_| ())),
    }
    assert!(factory.cached_types().is_empty());

    // Entering lower down keeps the remaining chain within the limit
    assert!(factory.get("S200").is_ok());
}

#[test]
fn test_chain_at_depth_limit_resolves() {
    let factory = ServiceFactory::builder(service_chain(128)).build();
    assert!(factory.get("S0").is_ok());
    assert_eq!(factory.cached_types().len(), 128);
}

#[test]
fn test_service_base_type_parameter_uses_default() {
    let mut registry = TypeRegistry::new();
    registry.register(
        ServiceDescriptor::new("HolderService", |args| Ok(*args.get::<u8>(0)?))
            .param(ParamDescriptor::typed("peer", SERVICE_TYPE).with_default(Value::instance(1u8))),
    );

    let factory = ServiceFactory::builder(registry).without_utilities().build();
    assert_eq!(*factory.get_as::<u8>("HolderService").unwrap(), 1);
}

#[test]
fn test_service_base_type_parameter_is_not_unknown_type() {
    let mut registry = TypeRegistry::new();
    registry.register(
        ServiceDescriptor::new("HolderService", |_| Ok(()))
            .param(ParamDescriptor::typed("peer", SERVICE_TYPE).with_default(Value::instance(1u8))),
    );

    // The base type falls through to the utility rule, which has nothing for it
    let factory = ServiceFactory::builder(registry).build();
    match factory.get("HolderService") {
        Err(DiError::InvalidProperty { parameter, source }) => {
            assert_eq!(parameter, "peer");
            assert!(source.is_some());
        }
        other => panic!("Expected InvalidProperty, got {:?}", other.map(|_| ())),
    }
}
