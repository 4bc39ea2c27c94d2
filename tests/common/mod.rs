#![allow(dead_code)]

use std::collections::VecDeque;
use std::process::{Command, Output};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use http::{HeaderValue, Method, StatusCode};
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::sync::{Notify, oneshot};

use pasteleria::gateway::{CONTENT_RANGE, Gateway, GatewayRequest, GatewayResponse};
use pasteleria::{PasteleriaError, Result};

// ============================================================================
// Scripted gateway
// ============================================================================

enum Reply {
    Now(Result<GatewayResponse>),
    Held(oneshot::Receiver<Result<GatewayResponse>>),
}

/// Handle for a held reply. Dropping it without releasing fails the request.
pub struct Release(oneshot::Sender<Result<GatewayResponse>>);

impl Release {
    pub fn release(self, response: GatewayResponse) {
        let _ = self.0.send(Ok(response));
    }

    pub fn fail(self, error: PasteleriaError) {
        let _ = self.0.send(Err(error));
    }
}

/// In-memory gateway answering requests from a script, in call order.
///
/// Every request is logged before it is answered. Held replies stay pending
/// until released, which lets a test decide the completion order.
#[derive(Default)]
pub struct ScriptedGateway {
    script: Mutex<VecDeque<Reply>>,
    log: Mutex<Vec<GatewayRequest>>,
    sent: Notify,
}

impl ScriptedGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(ScriptedGateway::default())
    }

    pub fn respond(&self, response: GatewayResponse) {
        self.push(Reply::Now(Ok(response)));
    }

    pub fn fail(&self, error: PasteleriaError) {
        self.push(Reply::Now(Err(error)));
    }

    pub fn hold(&self) -> Release {
        let (tx, rx) = oneshot::channel();
        self.push(Reply::Held(rx));
        Release(tx)
    }

    fn push(&self, reply: Reply) {
        self.script.lock().unwrap().push_back(reply);
    }

    pub fn requests(&self) -> Vec<GatewayRequest> {
        self.log.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }

    pub fn count(&self, method: Method) -> usize {
        self.requests().iter().filter(|r| r.method == method).count()
    }

    /// Wait until at least `n` requests have been sent.
    pub async fn wait_for_requests(&self, n: usize) {
        let wait = async {
            loop {
                let notified = self.sent.notified();
                if self.log.lock().unwrap().len() >= n {
                    return;
                }
                notified.await;
            }
        };
        tokio::time::timeout(Duration::from_secs(5), wait)
            .await
            .unwrap_or_else(|_| panic!("timed out waiting for {n} requests"));
    }
}

#[async_trait]
impl Gateway for ScriptedGateway {
    async fn send(&self, request: GatewayRequest) -> Result<GatewayResponse> {
        let reply = {
            self.log.lock().unwrap().push(request.clone());
            self.script.lock().unwrap().pop_front()
        };
        self.sent.notify_waiters();
        match reply {
            Some(Reply::Now(outcome)) => outcome,
            Some(Reply::Held(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(PasteleriaError::Transport("reply dropped".into()))),
            None => Err(PasteleriaError::Transport(format!(
                "no scripted reply for {} {}",
                request.method, request.path
            ))),
        }
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// A 200 page of `rows` with a `Content-Range` total.
pub fn page(rows: Value, total: u64) -> GatewayResponse {
    let len = rows.as_array().map_or(0, Vec::len) as u64;
    let mut response = GatewayResponse::new(StatusCode::OK, rows.to_string());
    let range = if len == 0 {
        format!("*/{total}")
    } else {
        format!("0-{}/{total}", len - 1)
    };
    response.headers.insert(
        CONTENT_RANGE,
        HeaderValue::from_str(&range).expect("valid header"),
    );
    response
}

pub fn created() -> GatewayResponse {
    GatewayResponse::new(StatusCode::CREATED, "[]")
}

pub fn no_content() -> GatewayResponse {
    GatewayResponse::new(StatusCode::NO_CONTENT, "")
}

pub fn status(code: u16, body: &str) -> GatewayResponse {
    GatewayResponse::new(StatusCode::from_u16(code).expect("valid status"), body)
}

pub fn order(id: i64, first: &str, last: &str, status: &str) -> Value {
    json!({
        "id_pedido": id,
        "fecha_pedido": "2024-10-12T08:30:00",
        "fecha_entrega": "2024-10-13",
        "hora_entrega": "15:00:00",
        "estado": status,
        "total": "45.50",
        "direccion": "Av. Sol 123",
        "distrito": "Miraflores",
        "referencia": null,
        "cliente": {"nombre": first, "apellido": last, "telefono": "999888777"}
    })
}

pub fn product(id: i64, name: &str, stock: i64) -> Value {
    json!({
        "id_producto": id,
        "nombre": name,
        "descripcion": null,
        "precio": "12.50",
        "stock": stock,
        "id_categoria": 2,
        "estado": "ACTIVO",
        "imagen_url": null,
        "categoria": {"nombre": "Tortas"}
    })
}

pub fn payment(id: i64, order_id: i64, amount: &str, order_status: &str) -> Value {
    json!({
        "id_pago": id,
        "id_pedido": order_id,
        "metodo": "yape",
        "comprobante_url": null,
        "fecha_registro": "2024-10-12T09:00:00",
        "monto": amount,
        "pedido": {"total": "45.50", "estado": order_status}
    })
}

// ============================================================================
// Binary runner
// ============================================================================

pub fn pasteleria_binary() -> &'static str {
    env!("CARGO_BIN_EXE_pasteleria")
}

/// Runs the `pasteleria` binary against a config file in a temp directory.
pub struct PasteleriaTest {
    pub temp_dir: TempDir,
}

impl PasteleriaTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        PasteleriaTest { temp_dir }
    }

    pub fn config_path(&self) -> std::path::PathBuf {
        self.temp_dir.path().join("config.yaml")
    }

    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(pasteleria_binary())
            .args(args)
            .current_dir(self.temp_dir.path())
            .env("PASTELERIA_CONFIG", self.config_path())
            .env("NO_COLOR", "1")
            .env_remove("SUPABASE_URL")
            .env_remove("SUPABASE_ANON_KEY")
            .env_remove("SUPABASE_BEARER_TOKEN")
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to execute pasteleria command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded",
            args
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    pub fn write_config(&self, content: &str) {
        std::fs::write(self.config_path(), content).expect("Failed to write config file");
    }

    pub fn read_config(&self) -> String {
        std::fs::read_to_string(self.config_path()).expect("Failed to read config file")
    }
}
