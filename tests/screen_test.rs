#[path = "common/mod.rs"]
mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{ScriptedGateway, created, order, page, product, status};
use http::Method;
use serde_json::json;

use pasteleria::gateway::Gateway;
use pasteleria::query::build;
use pasteleria::resource::{delivery, product as product_writes};
use pasteleria::screen::Notice;
use pasteleria::{
    FilterState, Order, Page, PasteleriaError, Product, Reconciliation, Screen, ScreenEvent,
};

fn orders_screen(gateway: &Arc<ScriptedGateway>, filter: FilterState) -> Screen<Order> {
    Screen::new(gateway.clone() as Arc<dyn Gateway>, filter)
}

fn products_screen(gateway: &Arc<ScriptedGateway>, filter: FilterState) -> Screen<Product> {
    Screen::new(gateway.clone() as Arc<dyn Gateway>, filter)
}

fn twenty_orders() -> serde_json::Value {
    json!((1..=20).map(|id| order(id, "Ana", "Quispe", "APROBADO")).collect::<Vec<_>>())
}

// ============================================================================
// Fetching and paging
// ============================================================================

#[tokio::test]
async fn test_first_page_with_reported_total() {
    let gateway = ScriptedGateway::new();
    gateway.respond(page(twenty_orders(), 45));

    let mut screen = orders_screen(&gateway, FilterState::new(20).with_statuses(["APROBADO"]));
    screen.refresh().unwrap();
    assert!(screen.is_loading());
    let notices = screen.settle().await;

    assert!(matches!(
        notices.as_slice(),
        [Notice::Loaded { shown: 20, total: 45, .. }]
    ));
    assert!(!screen.is_loading());
    let state = screen.state();
    assert_eq!(state.total(), 45);
    assert!(state.has_next());
    assert!(!state.has_previous());
    assert_eq!(state.range().to_string(), "Showing 1-20 of 45");

    let paths = gateway.paths();
    assert_eq!(paths.len(), 1);
    assert!(paths[0].contains("estado=in.(APROBADO)"));
    assert!(paths[0].contains("limit=20"));
    assert!(paths[0].contains("offset=0"));
}

#[tokio::test]
async fn test_count_is_requested_on_reads() {
    let gateway = ScriptedGateway::new();
    gateway.respond(page(json!([]), 0));

    let mut screen = orders_screen(&gateway, FilterState::new(20));
    screen.refresh().unwrap();
    screen.settle().await;

    let request = &gateway.requests()[0];
    assert_eq!(request.method, Method::GET);
    assert_eq!(
        request.prefer.map(|p| p.header_value()),
        Some("count=exact")
    );
}

#[tokio::test]
async fn test_next_page_then_filter_change_resets_offset() {
    let gateway = ScriptedGateway::new();
    gateway.respond(page(twenty_orders(), 45));
    gateway.respond(page(twenty_orders(), 45));
    gateway.respond(page(twenty_orders(), 45));

    let mut screen = orders_screen(&gateway, FilterState::new(20));
    screen.refresh().unwrap();
    screen.settle().await;

    assert!(screen.next_page().unwrap().is_some());
    screen.settle().await;
    assert_eq!(screen.filter().offset(), 20);
    assert!(screen.state().has_previous());

    screen.set_statuses(["SERVIDO"]).unwrap();
    screen.settle().await;
    assert_eq!(screen.filter().offset(), 0);

    let paths = gateway.paths();
    assert!(paths[1].contains("offset=20"));
    assert!(paths[2].contains("offset=0"));
    assert!(paths[2].contains("estado=in.(SERVIDO)"));
}

#[tokio::test]
async fn test_last_page_has_no_next() {
    let gateway = ScriptedGateway::new();
    gateway.respond(page(json!([order(41, "Ana", "Quispe", "SERVIDO")]), 41));

    let filter = FilterState::new(20).with_page(2);
    let mut screen = orders_screen(&gateway, filter);
    screen.refresh().unwrap();
    screen.settle().await;

    assert!(!screen.state().has_next());
    assert_eq!(screen.next_page().unwrap(), None);
    assert_eq!(gateway.requests().len(), 1);
}

#[tokio::test]
async fn test_numeric_term_is_exact_id_match() {
    let gateway = ScriptedGateway::new();
    gateway.respond(page(json!([order(1024, "Ana", "Quispe", "SERVIDO")]), 1));

    let mut screen = orders_screen(&gateway, FilterState::new(20));
    screen.search("1024").unwrap();
    screen.settle().await;

    let path = &gateway.paths()[0];
    assert!(path.contains("id_pedido=eq.1024"));
    assert!(!path.contains("ilike"));
    assert_eq!(screen.state().visible().len(), 1);
}

#[tokio::test]
async fn test_customer_name_filter_is_applied_after_fetch() {
    let gateway = ScriptedGateway::new();
    gateway.respond(page(
        json!([
            order(1, "Ana", "Quispe", "APROBADO"),
            order(2, "Pedro", "Rojas", "APROBADO"),
            order(3, "Mariana", "Luna", "APROBADO"),
        ]),
        3,
    ));

    let mut screen = orders_screen(&gateway, FilterState::new(20));
    screen.search("ana").unwrap();
    screen.settle().await;

    let ids: Vec<i64> = screen.state().visible().iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![1, 3]);
    assert_eq!(screen.state().total(), 3);
    assert_eq!(screen.state().range().to_string(), "Showing 1-2 of 2");
    assert!(!gateway.paths()[0].contains("ana"));
}

// ============================================================================
// Last issued wins
// ============================================================================

#[tokio::test]
async fn test_only_latest_fetch_is_applied() {
    let gateway = ScriptedGateway::new();
    let first = gateway.hold();
    let second = gateway.hold();

    let mut screen = orders_screen(&gateway, FilterState::new(20));
    screen.search("ana").unwrap();
    gateway.wait_for_requests(1).await;
    screen.search("pedro").unwrap();
    gateway.wait_for_requests(2).await;

    // The newer request completes first, the older one afterwards
    second.release(page(json!([order(2, "Pedro", "Rojas", "APROBADO")]), 1));
    first.release(page(json!([order(1, "Ana", "Quispe", "APROBADO")]), 1));
    let notices = screen.settle().await;

    assert_eq!(notices.len(), 1);
    let ids: Vec<i64> = screen.state().records().iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![2]);
    assert_eq!(screen.filter().term(), "pedro");
    assert!(!screen.is_loading());
}

#[tokio::test]
async fn test_stale_outcome_is_discarded() {
    let gateway = ScriptedGateway::new();
    let _first = gateway.hold();
    let _second = gateway.hold();

    let mut screen = orders_screen(&gateway, FilterState::new(20));
    let stale = screen.refresh().unwrap();
    let current = screen.search("pedro").unwrap();
    assert!(current > stale);

    let late = ScreenEvent::Fetched {
        generation: stale,
        outcome: Ok(Page::new(
            vec![serde_json::from_value(order(9, "Ana", "Quispe", "APROBADO")).unwrap()],
            Some(1),
            0,
            20,
        )),
    };
    assert_eq!(screen.handle(late), None);
    assert!(screen.state().records().is_empty());
    assert!(screen.is_loading());
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_server_error_leaves_list_unchanged() {
    let gateway = ScriptedGateway::new();
    gateway.respond(page(twenty_orders(), 45));
    gateway.respond(status(500, "db down"));

    let mut screen = orders_screen(&gateway, FilterState::new(20));
    screen.refresh().unwrap();
    screen.settle().await;

    screen.refresh().unwrap();
    let notices = screen.settle().await;

    match notices.as_slice() {
        [Notice::FetchFailed { message, status }] => {
            assert_eq!(*status, Some(500));
            assert!(message.contains("db down"));
        }
        other => panic!("unexpected notices {other:?}"),
    }
    assert!(notices[0].to_string().starts_with("fetch failed: "));
    assert!(!screen.is_loading());
    assert_eq!(screen.state().records().len(), 20);
    assert_eq!(screen.state().total(), 45);
    assert!(matches!(
        screen.last_error(),
        Some(PasteleriaError::HttpStatus { status: 500, .. })
    ));
}

#[tokio::test]
async fn test_decode_failure_is_reported_as_decode() {
    let gateway = ScriptedGateway::new();
    gateway.respond(page(json!([{"unexpected": true}]), 1));

    let mut screen = orders_screen(&gateway, FilterState::new(20));
    screen.refresh().unwrap();
    let notices = screen.settle().await;

    assert!(matches!(
        notices.as_slice(),
        [Notice::FetchFailed { status: None, .. }]
    ));
    assert!(matches!(
        screen.last_error(),
        Some(PasteleriaError::Decode { .. })
    ));
}

#[tokio::test]
async fn test_transport_failure_is_reported() {
    let gateway = ScriptedGateway::new();
    gateway.fail(PasteleriaError::Transport("connection refused".into()));

    let mut screen = orders_screen(&gateway, FilterState::new(20));
    screen.refresh().unwrap();
    screen.settle().await;

    assert!(matches!(
        screen.last_error(),
        Some(PasteleriaError::Transport(_))
    ));
}

// ============================================================================
// Selection
// ============================================================================

#[tokio::test]
async fn test_selection_survives_refresh_when_record_remains() {
    let gateway = ScriptedGateway::new();
    gateway.respond(page(json!([product(5, "Alfajor", 4), product(6, "Keke", 2)]), 2));
    gateway.respond(page(json!([product(6, "Keke", 2), product(5, "Alfajor", 4)]), 2));
    gateway.respond(page(json!([product(6, "Keke", 2)]), 1));

    let mut screen = products_screen(&gateway, FilterState::new(20));
    screen.refresh().unwrap();
    screen.settle().await;
    screen.select(5).unwrap();

    screen.refresh().unwrap();
    let notices = screen.settle().await;
    assert!(matches!(
        notices.as_slice(),
        [Notice::Loaded { reconciliation: Reconciliation::Kept(5), .. }]
    ));
    assert_eq!(screen.selected().map(|p| p.id), Some(5));

    screen.refresh().unwrap();
    let notices = screen.settle().await;
    assert!(matches!(
        notices.as_slice(),
        [Notice::Loaded { reconciliation: Reconciliation::Cleared(5), .. }]
    ));
    assert!(screen.selected().is_none());
}

#[tokio::test]
async fn test_selection_hidden_by_customer_filter_is_cleared() {
    let gateway = ScriptedGateway::new();
    let rows = json!([
        order(1, "Ana", "Quispe", "APROBADO"),
        order(2, "Luis", "Rojas", "APROBADO"),
        order(3, "Mariana", "Paz", "APROBADO"),
    ]);
    gateway.respond(page(rows.clone(), 3));
    gateway.respond(page(rows, 3));

    let mut screen = orders_screen(&gateway, FilterState::new(20));
    screen.refresh().unwrap();
    screen.settle().await;
    screen.select(2).unwrap();

    screen.search("ana").unwrap();
    let notices = screen.settle().await;
    assert!(matches!(
        notices.as_slice(),
        [Notice::Loaded { reconciliation: Reconciliation::Cleared(2), .. }]
    ));
    assert!(screen.selected().is_none());
    assert!(matches!(screen.select(2), Err(PasteleriaError::NotFound(_))));
    assert_eq!(screen.select(3).unwrap().id, 3);
}

#[tokio::test]
async fn test_select_unknown_id_is_not_found() {
    let gateway = ScriptedGateway::new();
    gateway.respond(page(json!([product(5, "Alfajor", 4)]), 1));

    let mut screen = products_screen(&gateway, FilterState::new(20));
    screen.refresh().unwrap();
    screen.settle().await;

    assert!(matches!(screen.select(99), Err(PasteleriaError::NotFound(_))));
}

// ============================================================================
// Mutations
// ============================================================================

#[tokio::test]
async fn test_mutation_success_refreshes_exactly_once() {
    let gateway = ScriptedGateway::new();
    gateway.respond(page(json!([product(5, "Alfajor", 4)]), 1));
    // The write response claims a stock that the list must not pick up
    gateway.respond(common::status(200, &json!([product(5, "Alfajor", 99)]).to_string()));
    gateway.respond(page(json!([product(5, "Alfajor", 10)]), 1));

    let filter = FilterState::new(20).with_term("alfajor");
    let mut screen = products_screen(&gateway, filter.clone());
    screen.refresh().unwrap();
    screen.settle().await;

    screen.mutate(product_writes::add_stock(5, 4, 6));
    let notices = screen.settle().await;

    assert!(matches!(notices.first(), Some(Notice::Saved { .. })));
    assert!(matches!(notices.get(1), Some(Notice::Loaded { .. })));
    assert_eq!(notices.len(), 2);

    let requests = gateway.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[1].method, Method::PATCH);
    assert_eq!(requests[1].body, Some(json!({"stock": 10})));
    assert_eq!(requests[2].method, Method::GET);
    assert_eq!(requests[2].path, build::<Product>(&filter).path());
    assert_eq!(screen.state().records()[0].stock, Some(10));
}

#[tokio::test]
async fn test_mutation_failure_does_not_refresh() {
    let gateway = ScriptedGateway::new();
    gateway.respond(page(json!([product(5, "Alfajor", 4)]), 1));
    gateway.respond(status(409, "conflict"));

    let mut screen = products_screen(&gateway, FilterState::new(20));
    screen.refresh().unwrap();
    screen.settle().await;

    screen.mutate(product_writes::delete(5));
    let notices = screen.settle().await;

    match notices.as_slice() {
        [Notice::MutationFailed { status, message, .. }] => {
            assert_eq!(*status, Some(409));
            assert!(message.contains("conflict"));
        }
        other => panic!("unexpected notices {other:?}"),
    }
    assert_eq!(gateway.requests().len(), 2);
    assert_eq!(screen.state().records().len(), 1);
    assert!(!screen.is_loading());
}

#[tokio::test]
async fn test_filter_and_paging_are_busy_during_mutation() {
    let gateway = ScriptedGateway::new();
    gateway.respond(page(json!([product(5, "Alfajor", 4)]), 1));
    let write = gateway.hold();
    gateway.respond(page(json!([product(5, "Alfajor", 4)]), 1));

    let mut screen = products_screen(&gateway, FilterState::new(20));
    screen.refresh().unwrap();
    screen.settle().await;

    screen.mutate(product_writes::set_status(5, &pasteleria::ProductStatus::Inactive));
    assert!(screen.is_mutating());
    assert!(matches!(screen.search("keke"), Err(PasteleriaError::Busy)));
    assert!(matches!(screen.refresh(), Err(PasteleriaError::Busy)));
    assert!(matches!(screen.next_page(), Err(PasteleriaError::Busy)));
    assert!(matches!(screen.set_category(Some(2)), Err(PasteleriaError::Busy)));
    assert_eq!(screen.filter().term(), "");

    // Ticks are skipped, not queued
    assert_eq!(screen.handle(ScreenEvent::Tick), None);

    write.release(created());
    screen.settle().await;
    assert!(!screen.is_mutating());
    assert_eq!(gateway.count(Method::GET), 2);
}

#[tokio::test]
async fn test_multi_step_mutation_stops_at_first_failure() {
    let gateway = ScriptedGateway::new();
    gateway.respond(page(json!([order(12, "Ana", "Quispe", "SERVIDO")]), 1));
    gateway.respond(status(400, "bad departure"));

    let mut screen = orders_screen(&gateway, FilterState::new(20));
    screen.refresh().unwrap();
    screen.settle().await;

    screen.mutate(delivery::assign(12, 4, "16:30:00"));
    let notices = screen.settle().await;

    assert!(matches!(notices.as_slice(), [Notice::MutationFailed { .. }]));
    let requests = gateway.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].method, Method::POST);
    assert_eq!(gateway.count(Method::PATCH), 0);
}

#[tokio::test]
async fn test_multi_step_mutation_runs_in_order() {
    let gateway = ScriptedGateway::new();
    gateway.respond(page(json!([order(12, "Ana", "Quispe", "SERVIDO")]), 1));
    gateway.respond(created());
    gateway.respond(common::no_content());
    gateway.respond(page(json!([order(12, "Ana", "Quispe", "ASIGNADO")]), 1));

    let mut screen = orders_screen(&gateway, FilterState::new(20).with_term("12"));
    screen.refresh().unwrap();
    screen.settle().await;

    screen.mutate(delivery::assign(12, 4, "16:30:00"));
    screen.settle().await;

    let methods: Vec<Method> = gateway.requests().into_iter().map(|r| r.method).collect();
    assert_eq!(
        methods,
        vec![Method::GET, Method::POST, Method::PATCH, Method::GET]
    );
    let paths = gateway.paths();
    assert_eq!(paths[1], "delivery_asignacion");
    assert_eq!(paths[2], "pedidos?id_pedido=eq.12");
    assert_eq!(
        screen.state().records()[0].status,
        Some(pasteleria::OrderStatus::Assigned)
    );
}

// ============================================================================
// Auto-refresh
// ============================================================================

#[tokio::test]
async fn test_ticker_posts_ticks_that_refresh() {
    let gateway = ScriptedGateway::new();
    gateway.respond(page(json!([]), 0));

    let mut screen = orders_screen(&gateway, FilterState::new(20));
    screen.start_auto_refresh(Duration::from_millis(20));

    let event = tokio::time::timeout(Duration::from_secs(2), screen.next_event())
        .await
        .expect("tick within two seconds")
        .expect("channel open");
    assert!(matches!(event, ScreenEvent::Tick));
    assert!(matches!(screen.handle(event), Some(Notice::Refreshing(_))));

    screen.stop_auto_refresh();
    screen.settle().await;
    assert_eq!(gateway.count(Method::GET), 1);
}

#[tokio::test]
async fn test_tick_skipped_while_fetch_pending() {
    let gateway = ScriptedGateway::new();
    let _held = gateway.hold();

    let mut screen = orders_screen(&gateway, FilterState::new(20));
    screen.refresh().unwrap();
    assert_eq!(screen.handle(ScreenEvent::Tick), None);
    assert_eq!(screen.fetches_issued(), 1);
}

#[tokio::test]
async fn test_close_aborts_outstanding_work() {
    let gateway = ScriptedGateway::new();
    let _held = gateway.hold();

    let mut screen = orders_screen(&gateway, FilterState::new(20));
    screen.refresh().unwrap();
    screen.close();
    assert!(!screen.is_loading());
}
