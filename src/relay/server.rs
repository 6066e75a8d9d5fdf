//! The relay hub: visitor questions in, broadcasts and pump commands out.

use std::sync::Arc;
use tracing::{error, info, warn};

use super::broadcast::{Broadcaster, ConnectionId, EventReceiver};
use crate::hardware::HardwareChannel;
use crate::llm::{persona, CompletionProvider};
use crate::models::{ClientEvent, ServerEvent};

/// Sent as the answer whenever the completion call fails
pub const FALLBACK_ANSWER: &str = "죄송합니다. 답변을 생성하는 중 오류가 발생했습니다.";

/// Shared hub owning the two long-lived collaborators
pub struct RelayServer {
    broadcaster: Broadcaster,
    completion: Arc<dyn CompletionProvider>,
    hardware: Arc<HardwareChannel>,
}

impl RelayServer {
    pub fn new(completion: Arc<dyn CompletionProvider>, hardware: Arc<HardwareChannel>) -> Self {
        Self {
            broadcaster: Broadcaster::new(),
            completion,
            hardware,
        }
    }

    pub fn hardware(&self) -> &HardwareChannel {
        &self.hardware
    }

    /// Attach a new client
    pub async fn connect(&self) -> (ConnectionId, EventReceiver) {
        let (id, rx) = self.broadcaster.register().await;
        info!(connection_id = %id, "client connected");
        (id, rx)
    }

    /// Detach a client
    pub async fn disconnect(&self, id: ConnectionId) {
        self.broadcaster.unregister(id).await;
        info!(connection_id = %id, "client disconnected");
    }

    pub async fn connection_count(&self) -> usize {
        self.broadcaster.connection_count().await
    }

    /// Handle one decoded client event to completion
    pub async fn dispatch(&self, event: ClientEvent) {
        match event {
            ClientEvent::AskQuestion(question) => self.submit_question(question).await,
            ClientEvent::PumpWater => self.request_pump().await,
        }
    }

    /// Broadcast the question, ask the model, broadcast its answer.
    ///
    /// Completion failures never reach the clients; they get
    /// [`FALLBACK_ANSWER`] instead.
    pub async fn submit_question(&self, question: String) {
        info!(question = %question, "question received");

        self.broadcaster
            .broadcast(ServerEvent::UserQuestion(question.clone()))
            .await;

        let answer = match self
            .completion
            .generate(persona::question_request(question))
            .await
        {
            Ok(answer) => {
                info!(answer = %answer, "answer generated");
                answer
            }
            Err(e) => {
                error!(error = %e, "completion request failed; sending fallback answer");
                FALLBACK_ANSWER.to_string()
            }
        };

        self.broadcaster
            .broadcast(ServerEvent::GptAnswer(answer))
            .await;
    }

    /// Fire the pump if the device is there. The outcome is only logged.
    ///
    /// The serial write runs on the blocking pool so a slow device never
    /// stalls the runtime.
    pub async fn request_pump(&self) {
        info!("pump requested");

        if !self.hardware.is_available() {
            warn!(device = %self.hardware.label(), "hardware channel unavailable; pump request dropped");
            return;
        }

        let hardware = Arc::clone(&self.hardware);
        match tokio::task::spawn_blocking(move || hardware.pump()).await {
            Ok(Ok(())) => info!(device = %self.hardware.label(), "pump command sent"),
            Ok(Err(e)) => warn!(device = %self.hardware.label(), error = %e, "pump command failed"),
            Err(e) => warn!(device = %self.hardware.label(), error = %e, "pump task panicked"),
        }
    }
}
