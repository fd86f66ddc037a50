use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use html5ever::TokenizerResult;
use std::cell::RefCell;
use tracing::trace;

/// Incremental anchor href extractor.
///
/// Bytes are pushed in as they arrive from the network with [`feed`], and
/// every call hands back the hrefs of the `<a>` tags completed so far, in
/// document order. Tags split across chunk boundaries are held by the
/// tokenizer until the rest of the tag arrives, so the whole document is
/// never buffered.
///
/// [`feed`]: LinkExtractor::feed
pub struct LinkExtractor {
    tokenizer: Tokenizer<HrefSink>,
    input: BufferQueue,
    decoder: Utf8Decoder,
    finished: bool,
}

impl LinkExtractor {
    pub fn new() -> Self {
        Self {
            tokenizer: Tokenizer::new(HrefSink::default(), TokenizerOpts::default()),
            input: BufferQueue::default(),
            decoder: Utf8Decoder::default(),
            finished: false,
        }
    }

    /// Tokenizes the next chunk of the document.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        if self.finished {
            return Vec::new();
        }

        let text = self.decoder.decode(chunk);
        if !text.is_empty() {
            self.input.push_back(StrTendril::from(text));
            self.pump();
        }
        self.tokenizer.sink.hrefs.take()
    }

    /// Flushes any buffered input and closes the tokenizer.
    pub fn finish(&mut self) -> Vec<String> {
        if self.finished {
            return Vec::new();
        }
        self.finished = true;

        let tail = self.decoder.finish();
        if !tail.is_empty() {
            self.input.push_back(StrTendril::from(tail));
            self.pump();
        }
        self.tokenizer.end();
        self.tokenizer.sink.hrefs.take()
    }

    // HrefSink never answers with `TokenSinkResult::Script`, so the
    // tokenizer only stops once the queued input is consumed.
    fn pump(&mut self) {
        match self.tokenizer.feed(&self.input) {
            TokenizerResult::Done => {}
            TokenizerResult::Script(_) => trace!("Tokenizer paused on a script element"),
        }
    }
}

impl Default for LinkExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default)]
struct HrefSink {
    hrefs: RefCell<Vec<String>>,
}

impl TokenSink for HrefSink {
    type Handle = ();

    fn process_token(&self, token: Token, line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::TagToken(tag) if matches!(tag.kind, TagKind::StartTag) => {
                if &*tag.name == "a" {
                    self.hrefs.borrow_mut().extend(
                        tag.attrs
                            .iter()
                            .filter(|attr| &*attr.name.local == "href")
                            .map(|attr| attr.value.to_string()),
                    );
                }

                if !tag.self_closing
                    && let Some(state) = raw_text_state(&tag.name)
                {
                    return state;
                }
            }
            Token::ParseError(err) => {
                trace!("HTML parse error on line {}: {}", line_number, err);
            }
            _ => {}
        }
        TokenSinkResult::Continue
    }
}

// Without a tree builder the tokenizer has to be told when element content
// is raw text, otherwise markup inside <script> would be read as tags.
fn raw_text_state(name: &str) -> Option<TokenSinkResult<()>> {
    match name {
        "script" => Some(TokenSinkResult::RawData(RawKind::ScriptData)),
        "style" | "xmp" | "iframe" | "noembed" | "noframes" | "noscript" => {
            Some(TokenSinkResult::RawData(RawKind::Rawtext))
        }
        "title" | "textarea" => Some(TokenSinkResult::RawData(RawKind::Rcdata)),
        "plaintext" => Some(TokenSinkResult::Plaintext),
        _ => None,
    }
}

/// Lossy UTF-8 decoding that tolerates code points split between chunks.
#[derive(Default)]
struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    fn decode(&mut self, chunk: &[u8]) -> String {
        self.pending.extend_from_slice(chunk);

        let mut out = String::new();
        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(valid) => {
                    out.push_str(valid);
                    self.pending.clear();
                    break;
                }
                Err(e) => {
                    let valid_up_to = e.valid_up_to();
                    out.push_str(&String::from_utf8_lossy(&self.pending[..valid_up_to]));
                    match e.error_len() {
                        // Incomplete sequence at the end: wait for more bytes
                        None => {
                            self.pending.drain(..valid_up_to);
                            break;
                        }
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid_up_to + len);
                        }
                    }
                }
            }
        }
        out
    }

    fn finish(&mut self) -> String {
        let tail = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        tail
    }
}
