use std::sync::Arc;
use std::time::Duration;

use chrono::Duration as ChronoDuration;
use serde_json::json;

use secretaria_cache::{CacheConfig, TtlCache};
use secretaria_client::{ClientError, CourseResource, Method, TeacherResource, TransportError};
use secretaria_core::{
    teacher_form_to_dto, Clock, CourseId, CourseUpdate, FixedClock, ManualClock, Status,
    TeacherId, TeacherUpdate,
};
use secretaria_test_utils::fixtures::{
    course, list_body, other_tenant, teacher, tenant, valid_teacher_form,
};
use secretaria_test_utils::MockBackend;

fn setup() -> (MockBackend, Arc<TtlCache>, ManualClock) {
    let clock = ManualClock::new(FixedClock::from_epoch_secs(1_718_000_000).now());
    let cache = Arc::new(TtlCache::new(CacheConfig::default(), Arc::new(clock.clone())));
    (MockBackend::new(), cache, clock)
}

fn teachers(mock: &MockBackend, cache: &Arc<TtlCache>) -> TeacherResource {
    TeacherResource::new(Arc::new(mock.clone()), Arc::clone(cache))
}

fn courses(mock: &MockBackend, cache: &Arc<TtlCache>) -> CourseResource {
    CourseResource::new(Arc::new(mock.clone()), Arc::clone(cache))
}

#[tokio::test]
async fn list_within_ttl_returns_same_payload_without_network() {
    let (mock, cache, clock) = setup();
    mock.on_json(Method::Get, "/professor/sec-1", list_body(&[teacher("p1"), teacher("p2")]));
    let resource = teachers(&mock, &cache);

    let first = resource.list(&tenant()).await.unwrap();
    clock.advance(ChronoDuration::seconds(299));
    let second = resource.list(&tenant()).await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.len(), 2);
    assert_eq!(mock.calls_to(Method::Get, "/professor/sec-1"), 1);

    clock.advance(ChronoDuration::seconds(1));
    let third = resource.list(&tenant()).await.unwrap();
    assert!(!Arc::ptr_eq(&first, &third));
    assert_eq!(mock.calls_to(Method::Get, "/professor/sec-1"), 2);
}

#[tokio::test]
async fn every_write_forces_next_list_to_fetch() {
    let (mock, cache, _) = setup();
    mock.on_json(Method::Get, "/professor/sec-1", list_body(&[teacher("p1")]))
        .on_json(Method::Post, "/professor/sec-1", json!({ "message": "ok" }))
        .on_json(Method::Put, "/professor/p1", json!(null))
        .on_json(Method::Delete, "/professor/p1", json!(null));
    let resource = teachers(&mock, &cache);
    let dto = teacher_form_to_dto(&valid_teacher_form(), &tenant()).unwrap();

    resource.list(&tenant()).await.unwrap();
    assert_eq!(resource.create(&dto).await.unwrap(), None);
    resource.list(&tenant()).await.unwrap();
    assert_eq!(mock.calls_to(Method::Get, "/professor/sec-1"), 2);

    let update = TeacherUpdate {
        nome: Some("Maria S. Oliveira".to_string()),
        id_secretaria: Some(tenant()),
        ..Default::default()
    };
    resource.update(&TeacherId::new("p1"), &update).await.unwrap();
    resource.list(&tenant()).await.unwrap();
    assert_eq!(mock.calls_to(Method::Get, "/professor/sec-1"), 3);

    resource.delete(&TeacherId::new("p1"), &tenant()).await.unwrap();
    resource.list(&tenant()).await.unwrap();
    assert_eq!(mock.calls_to(Method::Get, "/professor/sec-1"), 4);

    let posted = mock
        .calls()
        .into_iter()
        .find(|call| call.method == Method::Post)
        .and_then(|call| call.body)
        .unwrap();
    assert_eq!(posted["CPF"], "52998224725");
    assert_eq!(posted["telefone"], "11988887777");
    assert_eq!(posted["numero"], 10);
    assert_eq!(posted["situacao"], "ATIVO");
    assert_eq!(posted["id_secretaria"], "sec-1");
}

#[tokio::test]
async fn tenants_do_not_share_entries() {
    let (mock, cache, _) = setup();
    mock.on_json(
        Method::Get,
        "/curso/sec-1/secretaria",
        list_body(&[course("c1", &tenant(), 12, Status::Active)]),
    )
        .on_json(Method::Get, "/curso/sec-2/secretaria", json!(null))
        .on_json(Method::Delete, "/curso/c1", json!(null));
    let resource = courses(&mock, &cache);

    assert_eq!(resource.list(&tenant()).await.unwrap().len(), 1);
    assert!(resource.list(&other_tenant()).await.unwrap().is_empty());

    resource.delete(&CourseId::new("c1"), &other_tenant()).await.unwrap();
    resource.list(&tenant()).await.unwrap();
    assert_eq!(mock.calls_to(Method::Get, "/curso/sec-1/secretaria"), 1);
    resource.list(&other_tenant()).await.unwrap();
    assert_eq!(mock.calls_to(Method::Get, "/curso/sec-2/secretaria"), 2);
}

#[tokio::test]
async fn duplicate_create_surfaces_friendly_message() {
    let (mock, cache, _) = setup();
    mock.on_status(
        Method::Post,
        "/professor/sec-1",
        400,
        r#"{"message":"Professor já cadastrado com este CPF"}"#,
    );
    let resource = teachers(&mock, &cache);
    let dto = teacher_form_to_dto(&valid_teacher_form(), &tenant()).unwrap();

    let err = resource.create(&dto).await.unwrap_err();
    assert!(matches!(err, ClientError::Duplicate { .. }));
    assert_eq!(
        resource.last_error().as_deref(),
        Some("Este professor já está cadastrado no sistema.")
    );
    assert!(!resource.is_loading());
}

#[tokio::test]
async fn status_codes_map_to_entity_messages() {
    let (mock, cache, _) = setup();
    mock.on_status(Method::Get, "/curso/sec-1/secretaria", 404, "")
        .on_status(Method::Get, "/curso/sec-2/secretaria", 403, "forbidden")
        .on_status(Method::Delete, "/curso/c9", 500, r#"{"error":"Falha interna"}"#);
    let resource = courses(&mock, &cache);

    let not_found = resource.list(&tenant()).await.unwrap_err();
    assert_eq!(not_found.user_message(), "Nenhum curso encontrado.");

    let forbidden = resource.list(&other_tenant()).await.unwrap_err();
    assert_eq!(forbidden.user_message(), "Sem permissão para visualizar cursos.");

    let server = resource.delete(&CourseId::new("c9"), &tenant()).await.unwrap_err();
    assert_eq!(server, ClientError::Backend { status: 500, message: "Falha interna".to_string() });
    assert_eq!(resource.last_error().as_deref(), Some("Falha interna"));

    // failures are not cached
    assert_eq!(cache.len(), 0);
}

#[tokio::test]
async fn empty_update_is_rejected_before_the_network() {
    let (mock, cache, _) = setup();
    let resource = courses(&mock, &cache);

    let only_tenant = CourseUpdate {
        id_secretaria: Some(tenant()),
        ..Default::default()
    };
    let err = resource.update(&CourseId::new("c1"), &only_tenant).await.unwrap_err();
    assert_eq!(err, ClientError::EmptyUpdate);
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn placeholder_tenant_never_reaches_a_url() {
    let (mock, cache, _) = setup();
    let resource = teachers(&mock, &cache);
    let mut dto = teacher_form_to_dto(&valid_teacher_form(), &tenant()).unwrap();
    dto.id_secretaria = serde_json::from_value(json!("undefined")).unwrap();

    let err = resource.create(&dto).await.unwrap_err();
    assert!(matches!(err, ClientError::Session(_)));
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn loading_clears_on_every_exit_path() {
    let (mock, cache, _) = setup();
    mock.on_json(Method::Get, "/professor/sec-1", list_body(&[teacher("p1")]))
        .on(
            Method::Get,
            "/professor/sec-2",
            Err(TransportError::Network("connection reset".into())),
        );
    let resource = teachers(&mock, &cache);

    resource.list(&tenant()).await.unwrap();
    assert!(!resource.is_loading());

    resource.list(&other_tenant()).await.unwrap_err();
    assert!(!resource.is_loading());
    assert_eq!(resource.last_error().as_deref(), Some("connection reset"));
}

#[tokio::test]
async fn loading_clears_when_the_call_is_abandoned() {
    let (mock, cache, _) = setup();
    let slow = mock.clone().with_delay(Duration::from_secs(5));
    slow.on_json(Method::Get, "/professor/sec-1", json!([]));
    let resource = teachers(&slow, &cache);

    let abandoned = tokio::time::timeout(Duration::from_millis(20), resource.list(&tenant())).await;
    assert!(abandoned.is_err());
    assert!(!resource.is_loading());
    assert_eq!(cache.len(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_lists_share_one_request() {
    let (mock, cache, _) = setup();
    let slow = mock.with_delay(Duration::from_millis(30));
    slow.on_json(Method::Get, "/professor/sec-1", list_body(&[teacher("p1")]));
    let resource = Arc::new(teachers(&slow, &cache));

    let mut handles = Vec::new();
    for _ in 0..6 {
        let resource = Arc::clone(&resource);
        handles.push(tokio::spawn(async move { resource.list(&tenant()).await }));
    }
    let mut lists = Vec::new();
    for handle in handles {
        lists.push(handle.await.unwrap().unwrap());
    }

    assert_eq!(slow.calls_to(Method::Get, "/professor/sec-1"), 1);
    assert!(lists.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
    assert!(!resource.is_loading());
}
