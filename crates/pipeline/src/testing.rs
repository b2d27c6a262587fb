//! In-memory port implementations that record every call.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    ChatMessage, DispatchError, LookupError, MessageDispatcher, ProjectId, TriggerId,
    TriggerLookup, TriggerMetadata,
};

/// What [`FakeLookup`] answers with.
pub(crate) enum LookupReply {
    Found(TriggerMetadata),
    NotFound,
    Unavailable,
}

pub(crate) struct FakeLookup {
    reply: LookupReply,
    pub(crate) calls: Mutex<Vec<(String, String)>>,
}

impl FakeLookup {
    pub(crate) fn new(reply: LookupReply) -> Self {
        Self {
            reply,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn found(name: &str, branch_name: &str) -> Self {
        Self::new(LookupReply::Found(TriggerMetadata {
            name: Some(name.to_string()),
            branch_name: Some(branch_name.to_string()),
        }))
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl TriggerLookup for FakeLookup {
    async fn get_trigger(
        &self,
        project_id: &ProjectId,
        trigger_id: &TriggerId,
    ) -> Result<TriggerMetadata, LookupError> {
        self.calls
            .lock()
            .unwrap()
            .push((project_id.to_string(), trigger_id.to_string()));

        match &self.reply {
            LookupReply::Found(metadata) => Ok(metadata.clone()),
            LookupReply::NotFound => Err(LookupError::NotFound {
                project_id: project_id.to_string(),
                trigger_id: trigger_id.to_string(),
            }),
            LookupReply::Unavailable => Err(LookupError::Status {
                status: 503,
                body: "unavailable".to_string(),
            }),
        }
    }
}

#[derive(Default)]
pub(crate) struct RecordingDispatcher {
    pub(crate) fail_with_status: Option<u16>,
    pub(crate) sent: Mutex<Vec<ChatMessage>>,
}

impl RecordingDispatcher {
    pub(crate) fn failing(status: u16) -> Self {
        Self {
            fail_with_status: Some(status),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl MessageDispatcher for RecordingDispatcher {
    async fn dispatch(&self, message: &ChatMessage) -> Result<(), DispatchError> {
        self.sent.lock().unwrap().push(message.clone());
        match self.fail_with_status {
            Some(status) => Err(DispatchError::Status {
                status,
                body: String::new(),
            }),
            None => Ok(()),
        }
    }
}
