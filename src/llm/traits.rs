use std::future::Future;
use std::pin::Pin;

pub trait Provider: Send + Sync {
    /// Provider identifier (e.g. "groq", "openai").
    fn name(&self) -> &str;

    /// Send one system + user exchange and return the assistant's text.
    fn chat_with_system<'a>(
        &'a self,
        system_prompt: Option<&'a str>,
        message: &'a str,
        model: &'a str,
        temperature: f64,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send + 'a>>;

    fn chat<'a>(
        &'a self,
        message: &'a str,
        model: &'a str,
        temperature: f64,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send + 'a>> {
        Box::pin(async move {
            self.chat_with_system(None, message, model, temperature)
                .await
        })
    }
}
