// src/crawl/extract.rs
// =============================================================================
// Extracts resource URLs from an HTML byte stream.
//
// We drive html5ever's tokenizer directly (no DOM, no CSS selectors):
// - Bytes are fed to the tokenizer as they arrive from the network
// - Only start tags are looked at
// - <a>, <link>, <script>, <img> with an href/src attribute produce a URL
// - Every value is resolved against the page URL; values that fail to
//   resolve are skipped, they never abort the page
//
// Output keeps document order and may contain duplicates. Deduplication is
// the orchestrator's job.
// =============================================================================

use futures::StreamExt;
use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use url::Url;

use super::fetch::PageBody;
use super::resolve::resolve_against;
use crate::error::Result;

/// Tags whose href/src attributes we collect
const LINK_TAGS: [&str; 4] = ["a", "link", "script", "img"];

/// Attributes that carry a URL on those tags
const LINK_ATTRIBUTES: [&str; 2] = ["href", "src"];

/// Reads a whole page body and returns every URL found in it.
///
/// A failing chunk (the connection dropped mid-body, ...) aborts the page
/// with the error carried by the stream. Reaching the end of the stream is
/// the normal way out.
pub async fn extract_links(mut body: PageBody, base: &Url) -> Result<Vec<String>> {
    let mut extractor = LinkExtractor::new(base.clone());

    while let Some(chunk) = body.next().await {
        extractor.feed(&chunk?);
    }

    Ok(extractor.finish())
}

/// Incremental link extractor. Feed it byte chunks in order, then `finish`.
pub struct LinkExtractor {
    tokenizer: Tokenizer<LinkSink>,
    input: BufferQueue,
    decoder: Utf8Decoder,
}

impl LinkExtractor {
    pub fn new(base: Url) -> Self {
        let sink = LinkSink {
            base,
            urls: Vec::new(),
        };
        Self {
            tokenizer: Tokenizer::new(sink, TokenizerOpts::default()),
            input: BufferQueue::default(),
            decoder: Utf8Decoder::default(),
        }
    }

    /// Tokenizes as much of `bytes` as possible. Tags cut in half by a chunk
    /// boundary are completed by the next call.
    pub fn feed(&mut self, bytes: &[u8]) {
        let text = self.decoder.decode(bytes);
        self.push(&text);
    }

    /// Flushes the tokenizer and returns the URLs in document order.
    pub fn finish(mut self) -> Vec<String> {
        let rest = self.decoder.flush();
        self.push(&rest);
        self.tokenizer.end();
        self.tokenizer.sink.urls
    }

    fn push(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.input.push_back(StrTendril::from_slice(text));
        // Our sink never returns a script handle, so one call drains the
        // queue; the result only tells us that.
        let _ = self.tokenizer.feed(&mut self.input);
    }
}

/// Convenience wrapper for documents already in memory.
pub fn extract_from_str(html: &str, base: &Url) -> Vec<String> {
    let mut extractor = LinkExtractor::new(base.clone());
    extractor.feed(html.as_bytes());
    extractor.finish()
}

struct LinkSink {
    base: Url,
    urls: Vec<String>,
}

impl LinkSink {
    fn collect(&mut self, tag: &Tag) {
        if !LINK_TAGS.contains(&&*tag.name) {
            return;
        }

        for attr in &tag.attrs {
            if !LINK_ATTRIBUTES.contains(&&*attr.name.local) || attr.value.is_empty() {
                continue;
            }
            match resolve_against(&self.base, &attr.value) {
                Ok(url) => self.urls.push(url),
                Err(e) => log::debug!("skipping {}: {}", attr.value, e),
            }
        }
    }
}

impl TokenSink for LinkSink {
    type Handle = ();

    fn process_token(&mut self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::TagToken(tag) if tag.kind == TagKind::StartTag => {
                self.collect(&tag);

                // Without a tree builder the tokenizer does not know that
                // <script> and friends hold raw text; tell it, so markup
                // inside them is not mistaken for tags.
                if tag.self_closing {
                    return TokenSinkResult::Continue;
                }
                match &*tag.name {
                    "script" => TokenSinkResult::RawData(RawKind::ScriptData),
                    "style" | "xmp" | "iframe" | "noembed" | "noframes" => {
                        TokenSinkResult::RawData(RawKind::Rawtext)
                    }
                    "title" | "textarea" => TokenSinkResult::RawData(RawKind::Rcdata),
                    _ => TokenSinkResult::Continue,
                }
            }
            Token::ParseError(message) => {
                // Browsers recover from these and so does the tokenizer
                log::trace!("HTML syntax error (recovered): {}", message);
                TokenSinkResult::Continue
            }
            _ => TokenSinkResult::Continue,
        }
    }
}

/// Turns a sequence of byte chunks into UTF-8 text. A multi-byte character
/// split across two chunks is held back until its tail arrives; invalid
/// bytes become U+FFFD.
#[derive(Default)]
struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    fn decode(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);
        let mut out = String::with_capacity(self.pending.len());

        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(text) => {
                    out.push_str(text);
                    self.pending.clear();
                    return out;
                }
                Err(e) => {
                    let valid = e.valid_up_to();
                    // The prefix up to `valid` is known good
                    out.push_str(&String::from_utf8_lossy(&self.pending[..valid]));
                    match e.error_len() {
                        Some(bad) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid + bad);
                        }
                        None => {
                            // Incomplete sequence at the end: wait for more
                            self.pending.drain(..valid);
                            return out;
                        }
                    }
                }
            }
        }
    }

    fn flush(&mut self) -> String {
        let rest = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        rest
    }
}
