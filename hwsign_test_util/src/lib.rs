#![allow(clippy::unwrap_used)]

//! Test utilities for the workspace.
//!
//! The main item is [`MockDevice`], an in-process stand-in for the signer:
//! a TCP listener speaking the CBOR wire protocol with a deterministic fake
//! wallet, so the whole stack can be exercised without hardware. It is
//! implemented directly against [`serde_cbor::Value`] to keep this crate
//! free of dependencies on the rest of the workspace.

use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread;

use serde_cbor::Value;

/// A valid testnet P2PKH address, used as the planted search target.
pub const TEST_TESTNET_ADDRESS: &str = "mipcBbFg9gMiCh81Kj8tqqdgoZub1ZJRfn";

/// The base64 signature the mock returns for every sign_message request.
pub const TEST_MESSAGE_SIGNATURE: &str =
    "H9L5yLFjti+QU2dh1c+npcRnMoCCF0RSxSss2nRznrFwQLBOs1O3lcQ5MHuyPsLXphGVLfPROjzQXTNOBU4yvEY=";

/// The signature bytes the mock returns for every transaction input.
pub const TEST_INPUT_SIGNATURE: &[u8] = &[0x30, 0x44, 0x02, 0x20, 0x0a, 0x0b, 0x0c, 0x0d];

/// The signed transaction bytes the mock returns for every sign_tx request.
pub const TEST_SIGNED_TX: &[u8] = &[0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];

/// The address the mock derives for a path nothing was planted at.
pub fn mock_address(path: &[u32]) -> String {
    let joined = path
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join("/");
    format!("mock:{joined}")
}

/// An in-process signer device listening on a local TCP port.
#[derive(Clone, Default)]
pub struct MockDevice {
    planted: Option<(Vec<u32>, String)>,
    decline_signing: bool,
}

impl MockDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive `address` at `path` instead of the deterministic fake one.
    pub fn with_address(mut self, path: Vec<u32>, address: &str) -> Self {
        self.planted = Some((path, address.to_string()));
        self
    }

    /// Answer every signing request with a user-declined error.
    pub fn decline_signing(mut self) -> Self {
        self.decline_signing = true;
        self
    }

    /// Bind an ephemeral port and serve clients on a background thread for
    /// the rest of the process lifetime.
    pub fn spawn(self) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                let device = self.clone();
                thread::spawn(move || device.serve(stream));
            }
        });
        addr
    }

    fn serve(&self, mut stream: TcpStream) {
        let mut buf = [0u8; 4096];
        let mut pending: Vec<u8> = Vec::new();
        loop {
            let n = match stream.read(&mut buf) {
                Ok(0) | Err(_) => return, // client hung up
                Ok(n) => n,
            };
            pending.extend_from_slice(&buf[..n]);
            let request: Value = match serde_cbor::from_slice(&pending) {
                Ok(value) => {
                    pending.clear();
                    value
                }
                Err(_) => continue, // request not complete yet
            };

            let Value::Map(envelope) = request else { return };
            let Some(id) = envelope.get(&key("id")).cloned() else {
                return;
            };
            let method = match envelope.get(&key("method")) {
                Some(Value::Text(method)) => method.clone(),
                _ => return,
            };
            let params = envelope.get(&key("params")).cloned().unwrap_or(Value::Null);

            let response = self.respond(id, &method, &params);
            if serde_cbor::to_writer(&mut stream, &response).is_err() {
                return;
            }
        }
    }

    fn respond(&self, id: Value, method: &str, params: &Value) -> Value {
        if self.decline_signing && (method == "sign_message" || method == "sign_tx") {
            return err_response(id, -32000, "user declined on device");
        }
        match method {
            "ping" => ok_response(id, Value::Integer(0)),
            "logout" => ok_response(id, Value::Bool(true)),
            "get_version_info" => ok_response(id, version_info()),
            "get_receive_address" => {
                let path = path_from_params(params);
                let address = match &self.planted {
                    Some((planted, address)) if *planted == path => address.clone(),
                    _ => mock_address(&path),
                };
                ok_response(id, Value::Text(address))
            }
            "sign_message" => ok_response(id, Value::Text(TEST_MESSAGE_SIGNATURE.to_string())),
            "sign_tx" => {
                let inputs = inputs_from_params(params);
                let signatures = vec![Value::Bytes(TEST_INPUT_SIGNATURE.to_vec()); inputs];
                let mut result = BTreeMap::new();
                result.insert(key("signatures"), Value::Array(signatures));
                result.insert(key("tx"), Value::Bytes(TEST_SIGNED_TX.to_vec()));
                ok_response(id, Value::Map(result))
            }
            _ => err_response(id, -32601, "unknown method"),
        }
    }
}

/// Spawn a stub chain api answering every request with `body`.
pub fn spawn_chain_stub(body: String) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { break };
            let body = body.clone();
            thread::spawn(move || {
                let mut buf = [0u8; 1024];
                let mut seen = Vec::new();
                loop {
                    match stream.read(&mut buf) {
                        Ok(0) | Err(_) => return,
                        Ok(n) => {
                            seen.extend_from_slice(&buf[..n]);
                            if seen.windows(4).any(|w| w == b"\r\n\r\n") {
                                break;
                            }
                        }
                    }
                }
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
            });
        }
    });
    addr
}

fn key(s: &str) -> Value {
    Value::Text(s.to_string())
}

fn ok_response(id: Value, result: Value) -> Value {
    let mut map = BTreeMap::new();
    map.insert(key("id"), id);
    map.insert(key("result"), result);
    Value::Map(map)
}

fn err_response(id: Value, code: i64, message: &str) -> Value {
    let mut details = BTreeMap::new();
    details.insert(key("code"), Value::Integer(code as i128));
    details.insert(key("message"), Value::Text(message.to_string()));
    let mut map = BTreeMap::new();
    map.insert(key("id"), id);
    map.insert(key("error"), Value::Map(details));
    Value::Map(map)
}

fn version_info() -> Value {
    let mut map = BTreeMap::new();
    map.insert(key("firmware_version"), Value::Text("0.1.0".to_string()));
    map.insert(key("board_type"), Value::Text("mock".to_string()));
    map.insert(key("state"), Value::Text("READY".to_string()));
    map.insert(key("networks"), Value::Text("TEST".to_string()));
    map.insert(key("has_pin"), Value::Bool(true));
    Value::Map(map)
}

fn path_from_params(params: &Value) -> Vec<u32> {
    let Value::Map(map) = params else { return vec![] };
    let Some(Value::Array(path)) = map.get(&key("path")) else {
        return vec![];
    };
    path.iter()
        .filter_map(|v| match v {
            Value::Integer(i) => Some(*i as u32),
            _ => None,
        })
        .collect()
}

fn inputs_from_params(params: &Value) -> usize {
    let Value::Map(map) = params else { return 0 };
    match map.get(&key("inputs")) {
        Some(Value::Array(inputs)) => inputs.len(),
        _ => 0,
    }
}
