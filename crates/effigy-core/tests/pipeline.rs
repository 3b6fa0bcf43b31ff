use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::StatusCode;
use url::Url;

use effigy_client::{AdvisoryClient, ClientError, HttpResponse, HttpTransport, MemorySink};
use effigy_core::*;
use effigy_inventory::{FactQuery, InventoryError, InventorySource, Query, Row};

const ADVISORY: &str = r#"{"latest_efi_version":{"msg":"1.2.3"}, "latest_os_version":{"msg":"10.1"}, "latest_build_number":{"msg":"B100"}}"#;

// Mock implementations
struct MockInventory {
    tables: HashMap<&'static str, Row>,
}

impl MockInventory {
    fn macbook() -> Self {
        let mut tables = HashMap::new();
        tables.insert("system_info", row(&[("hardware_model", "MacBookPro15,1")]));
        tables.insert("os_version", row(&[("build", "19H2"), ("version", "10.15.7")]));
        tables.insert("smc_keys", row(&[("value", "1.23")]));
        tables.insert("platform_info", row(&[("version", "426.0.0.0.0")]));
        Self { tables }
    }

    fn without(mut self, table: &str) -> Self {
        self.tables.remove(table);
        self
    }
}

fn row(pairs: &[(&str, &str)]) -> Row {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

#[async_trait]
impl InventorySource for MockInventory {
    async fn query_row(&self, query: &Query) -> Result<Row, InventoryError> {
        self.tables
            .get(query.table())
            .cloned()
            .ok_or_else(|| InventoryError::QueryFailed(format!("{} unavailable", query.table())))
    }
}

struct MockTransport {
    status: StatusCode,
    body: &'static str,
    calls: AtomicUsize,
    last_body: Mutex<Option<serde_json::Value>>,
}

impl MockTransport {
    fn new(status: StatusCode, body: &'static str) -> Arc<Self> {
        Arc::new(Self {
            status,
            body,
            calls: AtomicUsize::new(0),
            last_body: Mutex::new(None),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn post(
        &self,
        _url: &Url,
        _content_type: &str,
        body: Vec<u8>,
    ) -> effigy_client::Result<HttpResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_body.lock().unwrap() = serde_json::from_slice(&body).ok();
        Ok(HttpResponse {
            status: self.status,
            body: self.body.as_bytes().to_vec(),
        })
    }
}

fn effigy(inventory: MockInventory, transport: Arc<MockTransport>, sink: &MemorySink) -> Effigy {
    let client = AdvisoryClient::with_transport(transport)
        .unwrap()
        .with_diagnostics(Arc::new(sink.clone()));
    Effigy::new(Arc::new(inventory), client)
}

#[tokio::test]
async fn test_end_to_end_row() {
    let transport = MockTransport::new(StatusCode::OK, ADVISORY);
    let sink = MemorySink::new();
    let table = effigy(MockInventory::macbook(), transport.clone(), &sink);

    let rows = table.generate(&QueryContext::default()).await.unwrap();
    assert_eq!(rows.len(), 1);

    let expected: TableRow = [
        ("latest_efi_version", "1.2.3"),
        ("efi_version", "426.0.0.0.0"),
        ("efi_version_status", "success"),
        ("latest_os_version", "10.1"),
        ("os_version", "10.15.7"),
        ("os_version_status", "success"),
        ("latest_build_number", "B100"),
        ("build_number", "19H2"),
        ("build_number_status", "success"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    assert_eq!(rows[0], expected);

    assert_eq!(transport.calls(), 1);
    assert!(sink.contents().is_empty());
}

#[tokio::test]
async fn test_request_carries_facts_and_placeholders() {
    let transport = MockTransport::new(StatusCode::OK, ADVISORY);
    let sink = MemorySink::new();
    let table = effigy(MockInventory::macbook(), transport.clone(), &sink);

    table.generate_row().await.unwrap();

    let sent = transport.last_body.lock().unwrap().clone().unwrap();
    assert_eq!(
        sent,
        serde_json::json!({
            "board_id": "Mac-66E35819EE2D0D05",
            "smc_ver": "1.23",
            "build_num": "19H2",
            "rom_ver": "426.0.0.0.0",
            "hw_ver": "MacBookPro15,1",
            "os_ver": "10.15.7",
            "sys_uuid": "12345678-1234-1234-1234-1234567890AB",
            "mac_addr": "b4:bf:b4:b1:b6:bc",
            "hashed_uuid": "foobar"
        })
    );
}

#[tokio::test]
async fn test_custom_unsourced_fields() {
    let transport = MockTransport::new(StatusCode::OK, ADVISORY);
    let sink = MemorySink::new();
    let fields = UnsourcedFields {
        board_id: "Mac-AA95B1DDAB278B95".into(),
        system_uuid: "00000000-0000-0000-0000-000000000001".into(),
        mac_address: "00:11:22:33:44:55".into(),
        hashed_uuid: "abc123".into(),
    };
    let table = effigy(MockInventory::macbook(), transport.clone(), &sink)
        .with_unsourced_fields(Arc::new(fields));

    table.generate_row().await.unwrap();

    let sent = transport.last_body.lock().unwrap().clone().unwrap();
    assert_eq!(sent["board_id"], "Mac-AA95B1DDAB278B95");
    assert_eq!(sent["mac_addr"], "00:11:22:33:44:55");
    assert_eq!(sent["hashed_uuid"], "abc123");
}

#[tokio::test]
async fn test_inventory_failure_skips_advisory_call() {
    for query in FactQuery::ALL {
        let transport = MockTransport::new(StatusCode::OK, ADVISORY);
        let sink = MemorySink::new();
        let table = effigy(
            MockInventory::macbook().without(query.name()),
            transport.clone(),
            &sink,
        );

        let err = table.generate(&QueryContext::default()).await.unwrap_err();
        match err {
            CoreError::Inventory(e) => assert_eq!(e.fact_query(), Some(query)),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(transport.calls(), 0, "advisory called after {query} failed");
    }
}

#[tokio::test]
async fn test_service_unavailable() {
    let transport = MockTransport::new(StatusCode::SERVICE_UNAVAILABLE, "try again later");
    let sink = MemorySink::new();
    let table = effigy(MockInventory::macbook(), transport, &sink);

    let err = table.generate(&QueryContext::default()).await.unwrap_err();

    assert!(matches!(
        err,
        CoreError::Advisory(ClientError::Status(StatusCode::SERVICE_UNAVAILABLE))
    ));
    assert!(err.to_string().contains("503"));
    assert_eq!(sink.contents(), b"try again later");
}

#[tokio::test]
async fn test_malformed_advisory_fails() {
    let transport = MockTransport::new(StatusCode::OK, "not json");
    let sink = MemorySink::new();
    let table = effigy(MockInventory::macbook(), transport, &sink);

    let err = table.generate_row().await.unwrap_err();
    assert!(matches!(err, CoreError::Advisory(ClientError::Decode(_))));
}

#[tokio::test]
async fn test_repeated_queries_are_identical() {
    let transport = MockTransport::new(StatusCode::OK, ADVISORY);
    let sink = MemorySink::new();
    let table = effigy(MockInventory::macbook(), transport.clone(), &sink);

    let first = table.generate(&QueryContext::default()).await.unwrap();
    let second = table.generate(&QueryContext::default()).await.unwrap();

    assert_eq!(
        serde_json::to_vec(&first).unwrap(),
        serde_json::to_vec(&second).unwrap()
    );
    assert_eq!(transport.calls(), 2);
}

#[tokio::test]
async fn test_schema() {
    let transport = MockTransport::new(StatusCode::OK, ADVISORY);
    let sink = MemorySink::new();
    let table = effigy(MockInventory::macbook(), transport, &sink);

    assert_eq!(table.name(), "effigy");

    let columns = table.columns();
    let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "latest_efi_version",
            "efi_version",
            "efi_version_status",
            "latest_os_version",
            "os_version",
            "os_version_status",
            "latest_build_number",
            "build_number",
            "build_number_status",
        ]
    );
    assert!(columns.iter().all(|c| c.column_type == ColumnType::Text));
}

#[tokio::test]
async fn test_advise_without_host() {
    let transport = MockTransport::new(StatusCode::OK, ADVISORY);
    let client = AdvisoryClient::with_transport(transport).unwrap();

    let facts = effigy_inventory::HostFacts::default();
    let row = advise(&facts, UnsourcedFields::default(), &client).await.unwrap();

    assert_eq!(row.latest_build_number, "B100");
    assert_eq!(row.build_number, "");
    assert_eq!(row.build_number_status, STATUS_SUCCESS);
}
