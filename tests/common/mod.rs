//! Mock Ayd backend: a blocking HTTP server on a random local port

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

/// Canned response for one path
#[derive(Clone)]
pub struct Route {
    pub status: u16,
    pub body: String,
}

impl Route {
    pub fn json(body: &str) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: String::new(),
        }
    }
}

pub struct MockAyd {
    pub base_url: String,
    /// Request targets (path + query) in arrival order
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl MockAyd {
    /// Serve `routes` (keyed by path without query) until the test exits
    pub fn start(routes: Vec<(&str, Route)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock server");
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let routes: HashMap<String, Route> = routes
            .into_iter()
            .map(|(path, route)| (path.to_string(), route))
            .collect();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let seen = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                handle(stream, &routes, &seen);
            }
        });

        Self { base_url, requests }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn handle(mut stream: TcpStream, routes: &HashMap<String, Route>, seen: &Mutex<Vec<String>>) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    let target = loop {
        let n = match stream.read(&mut chunk) {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);

        let mut headers = [httparse::EMPTY_HEADER; 32];
        let mut req = httparse::Request::new(&mut headers);
        match req.parse(&buf) {
            Ok(httparse::Status::Complete(_)) => break req.path.unwrap_or("/").to_string(),
            Ok(httparse::Status::Partial) => continue,
            Err(_) => return,
        }
    };
    seen.lock().unwrap().push(target.clone());

    let path = target.split('?').next().unwrap_or("/");
    let route = routes.get(path).cloned().unwrap_or(Route {
        status: 404,
        body: "not found".to_string(),
    });

    let reply = format!(
        "HTTP/1.1 {} MOCK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        route.status,
        route.body.len(),
        route.body
    );
    let _ = stream.write_all(reply.as_bytes());
    let _ = stream.flush();
}

pub const TARGETS: &str = r#"["https://b.example","ping:a.example"]"#;

pub const STATUS: &str = r#"{
    "probe_history": {
        "https://b.example": {
            "target": "https://b.example",
            "status": "HEALTHY",
            "updated": "2024-05-01T10:00:00Z",
            "records": [
                {"time":"2024-05-01T10:00:00Z","status":"HEALTHY","latency":12.5,"target":"https://b.example","message":"200 OK"}
            ]
        },
        "ping:a.example": {
            "target": "ping:a.example",
            "status": "FAILURE",
            "updated": "2024-05-01T10:00:00Z",
            "records": [
                {"time":"2024-05-01T10:00:00Z","status":"FAILURE","latency":1000,"target":"ping:a.example","message":"all packets lost"}
            ]
        }
    },
    "current_incidents": [],
    "incident_history": [],
    "reported_at": "2024-05-01T10:00:05Z"
}"#;

pub const LOG: &str = r#"{"records":[
    {"time":"2024-05-01T09:59:00Z","status":"HEALTHY","latency":11,"target":"https://b.example","message":"200 OK"},
    {"time":"2024-05-01T10:00:00Z","status":"HEALTHY","latency":12.5,"target":"https://b.example","message":"200 OK"}
]}"#;
