//! The orchestrator-facing dispatcher implementation.

use crate::{EmailClient, LetterApiClient, LetterItem};
use async_trait::async_trait;
use request_orchestrator::{DispatchError, LetterDispatcher, LetterInstruction};

/// Bundles the letter API and email clients behind the
/// [`LetterDispatcher`] seam.
#[derive(Clone)]
pub struct DispatchService {
    letter_client: LetterApiClient,
    email_client: EmailClient,
}

impl DispatchService {
    pub fn new(letter_client: LetterApiClient, email_client: EmailClient) -> Self {
        Self {
            letter_client,
            email_client,
        }
    }
}

#[async_trait]
impl LetterDispatcher for DispatchService {
    async fn send_letter_instruction(
        &self,
        instruction: &LetterInstruction,
        idempotency_key: &str,
    ) -> Result<(), DispatchError> {
        let item = LetterItem::from_instruction(instruction);
        self.letter_client
            .send_letter_item(&item, idempotency_key)
            .await
    }

    async fn send_confirmation_email(&self, recipient: &str) -> Result<(), DispatchError> {
        self.email_client.send_confirmation(recipient).await
    }
}
