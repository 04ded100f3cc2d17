mod common;

use std::sync::Arc;

use parqlab::engine::{EngineConfig, EngineProvisioner};
use parqlab::error::WorkbenchError;
use parqlab::session::load_remote_table;

use common::offline_provisioner;

#[test]
fn get_engine_is_memoized() {
    let provisioner = offline_provisioner();
    assert!(!provisioner.initialized());

    let first = provisioner.get_engine().expect("first bootstrap");
    let second = provisioner.get_engine().expect("cached lookup");
    assert!(Arc::ptr_eq(&first, &second));
    assert!(provisioner.initialized());
}

#[test]
fn concurrent_calls_resolve_to_the_same_engine() {
    let provisioner = Arc::new(offline_provisioner());

    let engines: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let provisioner = Arc::clone(&provisioner);
                scope.spawn(move || provisioner.get_engine().expect("bootstrap"))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let first = &engines[0];
    for engine in &engines[1..] {
        assert!(Arc::ptr_eq(first, engine));
    }
}

#[test]
fn failed_bootstrap_leaves_cache_empty() {
    let provisioner = EngineProvisioner::new(EngineConfig {
        httpfs_enable: false,
        init_sql: Some("DEFINITELY NOT SQL".to_string()),
    });

    let err = provisioner.get_engine().expect_err("bootstrap should fail");
    assert!(matches!(err, WorkbenchError::EngineInit(_)));
    assert!(!provisioner.initialized());
}

#[test]
fn empty_url_fails_validation_before_touching_the_engine() {
    let provisioner = offline_provisioner();

    let err = load_remote_table(&provisioner, "", "t").expect_err("empty url must fail");
    assert!(matches!(err, WorkbenchError::Validation(_)));
    assert_eq!(err.to_string(), "URL is required");
    // Validation short-circuits: no bootstrap, no connection.
    assert!(!provisioner.initialized());

    let err = load_remote_table(&provisioner, "   ", "t").expect_err("blank url must fail");
    assert!(matches!(err, WorkbenchError::Validation(_)));
    assert!(!provisioner.initialized());
}
