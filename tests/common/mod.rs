#![allow(dead_code)]

use async_trait::async_trait;
use kado_relay::hardware::HardwareChannel;
use kado_relay::llm::{CompletionError, CompletionProvider, GenerateRequest};
use kado_relay::models::ServerEvent;
use kado_relay::relay::{EventReceiver, RelayServer};
use std::collections::{HashMap, VecDeque};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

/// Completion provider that replays scripted results and records requests
#[derive(Default)]
pub struct ScriptedCompletion {
    responses: Mutex<VecDeque<Result<String, CompletionError>>>,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl ScriptedCompletion {
    pub fn new(responses: Vec<Result<String, CompletionError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn answering(answer: &str) -> Self {
        Self::new(vec![Ok(answer.to_string())])
    }

    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedCompletion {
    async fn generate(&self, request: GenerateRequest) -> Result<String, CompletionError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CompletionError::EmptyResponse("script exhausted".to_string())))
    }
}

/// Answers `"answer: <question>"`, holding back questions listed as gated
/// until `release` is called for them
#[derive(Default)]
pub struct GatedCompletion {
    gates: Mutex<HashMap<String, Arc<Notify>>>,
}

impl GatedCompletion {
    pub fn gate(&self, question: &str) {
        self.gates
            .lock()
            .unwrap()
            .insert(question.to_string(), Arc::new(Notify::new()));
    }

    pub fn release(&self, question: &str) {
        if let Some(gate) = self.gates.lock().unwrap().get(question) {
            gate.notify_one();
        }
    }
}

#[async_trait]
impl CompletionProvider for GatedCompletion {
    async fn generate(&self, request: GenerateRequest) -> Result<String, CompletionError> {
        let question = request
            .messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        let gate = self.gates.lock().unwrap().get(&question).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        Ok(format!("answer: {}", question))
    }
}

/// Serial stand-in that records each write call
#[derive(Clone, Default)]
pub struct RecordingSerial {
    writes: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl RecordingSerial {
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.writes.lock().unwrap().clone()
    }
}

impl Write for RecordingSerial {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writes.lock().unwrap().push(buf.to_vec());
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Serial stand-in whose every write fails, counting the attempts
#[derive(Clone, Default)]
pub struct BrokenSerial {
    attempts: Arc<Mutex<usize>>,
}

impl BrokenSerial {
    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

impl Write for BrokenSerial {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        *self.attempts.lock().unwrap() += 1;
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "device unplugged"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Serial stand-in that takes `delay` to accept each write
#[derive(Clone)]
pub struct SlowSerial {
    pub delay: Duration,
    pub inner: RecordingSerial,
}

impl Write for SlowSerial {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        std::thread::sleep(self.delay);
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn relay_with(
    completion: Arc<dyn CompletionProvider>,
    hardware: HardwareChannel,
) -> Arc<RelayServer> {
    Arc::new(RelayServer::new(completion, Arc::new(hardware)))
}

/// Next event on a client's queue, failing the test after a second
pub async fn next_event(rx: &mut EventReceiver) -> ServerEvent {
    tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("timed out waiting for broadcast")
        .expect("connection queue closed")
}
