use gas_price_editor::editor::{EditorLimits, EditorSession, SessionOptions};
use gas_price_editor::{
    FieldError, GasPriceEditorStore, StoreOptions, TransactionRecord, ValidationError,
};
use num_bigint::BigInt;

const GAS_LIMIT: i64 = 100_000;

fn store() -> GasPriceEditorStore {
    GasPriceEditorStore::new(StoreOptions::new(GAS_LIMIT))
}

#[test]
fn negative_gas_and_price_are_always_flagged() {
    let mut store = store();
    for v in [-1i64, -123, -GAS_LIMIT, i64::MIN] {
        store.set_gas(v);
        store.set_price(v);
        assert_eq!(
            store.error_gas(),
            Some(&FieldError::Validation(ValidationError::NegativeValue))
        );
        assert!(store.error_price().is_some());
    }
}

#[test]
fn gas_below_limit_clears_error_and_at_limit_flags_it() {
    let mut store = store();
    for v in [0, 1, 21_000, GAS_LIMIT - 1] {
        store.set_gas(-1i64);
        store.set_gas(v);
        assert!(store.error_gas().is_none(), "gas {} should be valid", v);
    }
    for v in [GAS_LIMIT, GAS_LIMIT + 1, 10 * GAS_LIMIT] {
        store.set_gas(v);
        assert_eq!(
            store.error_gas(),
            Some(&FieldError::Validation(ValidationError::ExceedsBlockLimit))
        );
    }
}

#[test]
fn estimation_bound_takes_precedence_over_block_limit() {
    let limits = EditorLimits {
        max_gas_estimation: BigInt::from(50_000),
    };
    let mut store = GasPriceEditorStore::new(StoreOptions::new(GAS_LIMIT).with_limits(limits));
    for v in [50_000, 75_000, GAS_LIMIT, 2 * GAS_LIMIT] {
        store.set_estimated(v);
        assert_eq!(
            store.error_estimated(),
            Some(&FieldError::Validation(ValidationError::GasEstimationException))
        );
    }
}

#[test]
fn total_value_uses_arbitrary_precision() {
    let mut store = store();
    store.set_price("123");
    store.set_gas("123");
    store.set_eth_value("123");
    assert_eq!(store.total_value(), BigInt::from(15_252));

    // Well past u64 and u128
    store.set_eth_value("340282366920938463463374607431768211456000");
    store.set_price("1000000000000000000000000");
    let expected = BigInt::parse_bytes(b"340282366920938463463374607431768211456000", 10).unwrap()
        + BigInt::from(123) * BigInt::parse_bytes(b"1000000000000000000000000", 10).unwrap();
    assert_eq!(store.total_value(), expected);
}

#[test]
fn override_is_all_or_nothing() {
    let transaction = TransactionRecord {
        gas: Some(BigInt::from(123)),
        gas_price: Some(BigInt::from(456)),
        ..Default::default()
    };

    let mut store = store();
    store.set_gas(21_000u64);
    assert_eq!(store.override_transaction(&transaction), transaction);

    store.set_price("20000000000");
    let overridden = store.override_transaction(&transaction);
    assert_eq!(overridden.gas, Some(BigInt::from(21_000)));
    assert_eq!(overridden.gas_price, Some(BigInt::from(20_000_000_000u64)));

    store.set_gas(GAS_LIMIT);
    assert_eq!(store.override_transaction(&transaction), transaction);
}

#[test]
fn estimated_error_defaults_and_clears() {
    let mut store = store();
    store.set_default_estimated_error();
    assert_eq!(
        store.error_estimated().map(FieldError::message),
        Some(ValidationError::GasEstimationException.to_string())
    );
    store.set_estimated_error(None);
    assert!(store.error_estimated().is_none());
}

#[tokio::test]
async fn session_without_api_keeps_defaults() {
    let mut session =
        EditorSession::open(None, StoreOptions::new(GAS_LIMIT), SessionOptions::default());
    session.settle().await;

    let store = session.read().await;
    assert!(store.histogram().is_empty());
    assert!(store.price().is_none());
    assert!(store.price_default().is_none());
    assert_eq!(store.gas_limit(), &BigInt::from(GAS_LIMIT));
}
