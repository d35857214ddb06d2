//! Streaming-text interface for external assistant providers.
//!
//! Hint and review collaborators live outside the core; they hand back a
//! lazy finite sequence of text chunks.  The core never interprets the
//! chunks; it only aggregates them into a single string when rendering.

use std::pin::Pin;

use futures_util::StreamExt;

use crate::error::Result;

/// A boxed async stream, used for provider text responses.
pub type BoxStream<'a, T> = Pin<Box<dyn futures_core::Stream<Item = T> + Send + 'a>>;

/// An external provider of streamed assistant text (hints, reviews).
#[async_trait::async_trait]
pub trait TextSource: Send + Sync {
    async fn stream_text(&self, prompt: &str) -> Result<BoxStream<'static, Result<String>>>;
}

/// Drain a finite chunk stream into one string, propagating the first error.
pub async fn collect_text(mut stream: BoxStream<'_, Result<String>>) -> Result<String> {
    let mut out = String::new();
    while let Some(chunk) = stream.next().await {
        out.push_str(&chunk?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn collects_chunks_in_order() {
        let stream: BoxStream<'static, Result<String>> = Box::pin(futures_util::stream::iter(
            vec![Ok("two ".to_string()), Ok("pointers".to_string())],
        ));
        assert_eq!(collect_text(stream).await.unwrap(), "two pointers");
    }

    #[tokio::test]
    async fn first_error_propagates() {
        let stream: BoxStream<'static, Result<String>> = Box::pin(futures_util::stream::iter(vec![
            Ok("partial".to_string()),
            Err(crate::error::Error::Other("provider closed".into())),
        ]));
        assert!(collect_text(stream).await.is_err());
    }
}
