//! Scripted provider for unit tests.

use super::traits::Provider;
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

/// Replies with queued responses in order; an exhausted queue is an error.
/// Every prompt it receives is recorded.
pub(crate) struct ScriptedProvider {
    replies: Mutex<VecDeque<anyhow::Result<String>>>,
    pub(crate) prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub(crate) fn new(replies: Vec<anyhow::Result<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn replying(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string())])
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self::new(vec![Err(anyhow::anyhow!(message.to_string()))])
    }

    pub(crate) fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn chat_with_system<'a>(
        &'a self,
        _system_prompt: Option<&'a str>,
        message: &'a str,
        _model: &'a str,
        _temperature: f64,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send + 'a>> {
        Box::pin(async move {
            self.prompts.lock().unwrap().push(message.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(anyhow::anyhow!("no scripted reply left")))
        })
    }
}
