//! End-to-end list iteration through resource clients over an in-memory backend

mod common;

use std::sync::Arc;
use std::thread;

use common::{charges, plan_json, FakeBackend};
use stripe_client::list::params::{ENDING_BEFORE, STARTING_AFTER};
use stripe_client::resource::{balance, charge, plan};
use stripe_client::{Api, Error, ListParams};

fn ids(iter: charge::Iter) -> Vec<String> {
    iter.map(|c| c.expect("charge should decode").id).collect()
}

#[test]
fn test_three_pages_of_two_two_one() {
    let backend = Arc::new(FakeBackend::new("/charges", charges(5)));
    let api = Api::new("sk_test_123", backend.clone());

    let params = charge::ChargeListParams {
        list: ListParams::new().limit(2),
        ..Default::default()
    };
    let mut iter = api.charges.list(Some(&params));

    let mut seen = Vec::new();
    while !iter.stopped() {
        let c = iter.next().expect("not stopped").expect("no error");
        seen.push(c.id);
    }

    assert_eq!(seen, vec!["ch_1", "ch_2", "ch_3", "ch_4", "ch_5"]);
    assert!(iter.stopped());
    assert!(iter.next().is_none());

    let calls = backend.calls();
    assert_eq!(calls.len(), 3);
    assert!(calls.iter().all(|c| c.key == "sk_test_123"));
    assert_eq!(calls[0].form.as_ref().unwrap().get(STARTING_AFTER), None);
    assert_eq!(calls[1].form.as_ref().unwrap().get(STARTING_AFTER), Some("ch_2"));
    assert_eq!(calls[2].form.as_ref().unwrap().get(STARTING_AFTER), Some("ch_4"));
}

#[test]
fn test_resource_filters_ride_along_every_page() {
    let backend = Arc::new(FakeBackend::new("/charges", charges(3)));
    let api = Api::new("sk_test_123", backend.clone());

    let params = charge::ChargeListParams {
        list: ListParams::new().limit(2),
        customer: "cus_1".into(),
        created: 1400000000,
    };
    let all = ids(api.charges.list(Some(&params)));
    assert_eq!(all.len(), 3);

    for call in backend.calls() {
        let form = call.form.unwrap();
        assert_eq!(form.get("customer"), Some("cus_1"));
        assert_eq!(form.get("created"), Some("1400000000"));
        assert_eq!(form.get("limit"), Some("2"));
    }
}

#[test]
fn test_error_on_second_page_is_sticky() {
    let backend = Arc::new(FakeBackend::new("/charges", charges(5)).failing_on(2));
    let api = Api::new("sk_test_123", backend.clone());

    let params = charge::ChargeListParams {
        list: ListParams::new().limit(2),
        ..Default::default()
    };
    let mut iter = api.charges.list(Some(&params));

    assert_eq!(iter.next().unwrap().unwrap().id, "ch_1");
    assert_eq!(iter.next().unwrap().unwrap().id, "ch_2");

    let expected = Error::transport("connection reset by peer");
    assert_eq!(iter.next(), Some(Err(expected.clone())));
    assert!(iter.stopped());
    assert_eq!(iter.next(), Some(Err(expected.clone())));
    assert_eq!(iter.next(), Some(Err(expected)));
    assert_eq!(backend.calls().len(), 2);
}

#[test]
fn test_single_page_mode_stops_after_first_page() {
    let backend = Arc::new(FakeBackend::new("/charges", charges(5)));
    let api = Api::new("sk_test_123", backend.clone());

    let params = charge::ChargeListParams {
        list: ListParams::new().limit(2).single(),
        ..Default::default()
    };
    let iter = api.charges.list(Some(&params));
    assert!(iter.meta().has_more);

    assert_eq!(ids(iter), vec!["ch_1", "ch_2"]);
    assert_eq!(backend.calls().len(), 1);
}

#[test]
fn test_no_params_fetches_one_default_page() {
    let backend = Arc::new(FakeBackend::new("/charges", charges(12)));
    let api = Api::new("sk_test_123", backend.clone());

    let all = ids(api.charges.list(None));
    assert_eq!(all.len(), 10);
    assert_eq!(backend.calls().len(), 1);
    assert!(backend.calls()[0].form.as_ref().unwrap().is_empty());
}

#[test]
fn test_meta_tracks_current_page() {
    let backend = Arc::new(FakeBackend::new("/charges", charges(3)));
    let api = Api::new("sk_test_123", backend);

    let params = charge::ChargeListParams {
        list: ListParams::new().limit(2),
        ..Default::default()
    };
    let mut iter = api.charges.list(Some(&params));
    assert!(iter.meta().has_more);
    assert_eq!(iter.meta().total_count, Some(3));
    assert_eq!(iter.meta().url.as_deref(), Some("/v1/charges"));

    iter.next();
    iter.next();
    assert!(iter.meta().has_more);

    iter.next();
    assert!(!iter.meta().has_more);
}

#[test]
fn test_ending_before_walks_backward() {
    let backend = Arc::new(FakeBackend::new("/charges", charges(5)));
    let api = Api::new("sk_test_123", backend.clone());

    let params = charge::ChargeListParams {
        list: ListParams::new().limit(2).ending_before("ch_5"),
        ..Default::default()
    };
    assert_eq!(
        ids(api.charges.list(Some(&params))),
        vec!["ch_4", "ch_3", "ch_2", "ch_1"]
    );

    let calls = backend.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].form.as_ref().unwrap().get(ENDING_BEFORE), Some("ch_3"));
}

#[test]
fn test_independent_iterators_on_separate_threads() {
    let backend = Arc::new(FakeBackend::new("/charges", charges(25)));
    let api = Api::new("sk_test_123", backend.clone());
    let expected: Vec<String> = (1..=25).map(|i| format!("ch_{i}")).collect();

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let api = api.clone();
            thread::spawn(move || {
                let params = charge::ChargeListParams {
                    list: ListParams::new().limit(3),
                    ..Default::default()
                };
                ids(api.charges.list(Some(&params)))
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
    // 9 pages of 3 per iterator
    assert_eq!(backend.calls().len(), 18);
}

#[test]
fn test_correctly_typed_items_always_decode() {
    let plans = (1..=4).map(|i| plan_json(&format!("gold_{i}"))).collect();
    let backend = Arc::new(FakeBackend::new("/plans", plans));
    let api = Api::new("sk_test_123", backend);

    let params = plan::PlanListParams {
        list: ListParams::new().limit(3),
    };
    let all: Vec<_> = api
        .plans
        .list(Some(&params))
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(all.len(), 4);
    assert!(all.iter().all(|p| p.interval == plan::Interval::Month));
}

#[test]
fn test_mistyped_items_fail_at_first_next() {
    // plans have no status/type, so they can't be balance transactions
    let backend = Arc::new(FakeBackend::new(
        "/balance/history",
        vec![plan_json("gold"), plan_json("silver")],
    ));
    let api = Api::new("sk_test_123", backend);

    let mut iter = api.balance.list(Some(&balance::TransactionListParams::default()));
    assert!(iter.stopped());
    match iter.next() {
        Some(Err(Error::Decode { .. })) => {}
        other => panic!("expected decode error, got {other:?}"),
    }
}

#[test]
fn test_refunds_list_under_charge_path() {
    let refunds = vec![
        serde_json::json!({"id": "re_1", "amount": 50, "currency": "usd", "charge": "ch_1"}),
        serde_json::json!({"id": "re_2", "amount": 25, "currency": "usd", "charge": "ch_1"}),
    ];
    let backend = Arc::new(FakeBackend::new("/charges/ch_1/refunds", refunds));
    let api = Api::new("sk_test_123", backend.clone());

    let params = stripe_client::resource::refund::RefundListParams {
        list: ListParams::new().limit(1),
        charge: "ch_1".into(),
    };
    let all: Vec<_> = api
        .refunds
        .list(&params)
        .collect::<Result<Vec<_>, _>>()
        .unwrap();

    assert_eq!(all.len(), 2);
    assert_eq!(all[1].charge.as_ref().map(|c| c.id()), Some("ch_1"));
    assert_eq!(backend.calls().len(), 2);
}
