/*!
 * Protected span masking.
 *
 * Placeholders (`{name}`), markup tags (`<b>`) and brand names must survive a
 * round trip through a translation service verbatim. Before a value is sent,
 * every such span is swapped for an opaque token; after the response comes
 * back the tokens are swapped back.
 *
 * Spans are masked in a fixed order: placeholders, then markup, then brand
 * terms. Brand terms are only searched for in the text that is left after
 * the first two passes, so a term that only appears inside a placeholder or
 * tag body is protected by the outer token and never tokenized on its own.
 *
 * Tokens are wrapped in a run of underscores that is longer than any run in
 * the input, so text that merely looks like a token is never mistaken for one.
 */

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashSet;
use std::fmt;
use std::ops::Range;

/// Brace-delimited placeholder without nested braces
static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{[^{}]+\}").expect("Invalid placeholder regex")
});

/// Angle-bracket markup tag
static MARKUP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<[^>]+>").expect("Invalid markup regex")
});

/// Underscores on each side of a token when the input has no `__` of its own
pub const DEFAULT_DELIMITER_WIDTH: usize = 2;

/// What a token stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `{placeholder}`
    Placeholder,
    /// `<tag>`
    Markup,
    /// Brand or product name
    Brand,
}

impl TokenKind {
    /// Single-letter tag used in the serialized token
    pub fn tag(self) -> char {
        match self {
            Self::Placeholder => 'P',
            Self::Markup => 'H',
            Self::Brand => 'B',
        }
    }

    fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            b'P' => Some(Self::Placeholder),
            b'H' => Some(Self::Markup),
            b'B' => Some(Self::Brand),
            _ => None,
        }
    }
}

/// Opaque stand-in for one protected span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    /// Span kind
    pub kind: TokenKind,
    /// Position in the sequence of tokens issued by one `mask` call
    pub index: usize,
    /// Underscores on each side of the serialized token
    pub delimiter_width: usize,
}

impl Token {
    /// Create a token with the default `__` delimiter
    pub fn new(kind: TokenKind, index: usize) -> Self {
        Self::with_delimiter_width(kind, index, DEFAULT_DELIMITER_WIDTH)
    }

    /// Create a token wrapped in `delimiter_width` underscores on each side
    pub fn with_delimiter_width(kind: TokenKind, index: usize, delimiter_width: usize) -> Self {
        Self { kind, index, delimiter_width }
    }
}

// The trailing delimiter keeps `__P1__` from matching inside `__P10__`.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let delimiter = "_".repeat(self.delimiter_width);
        write!(f, "{delimiter}{}{}{delimiter}", self.kind.tag(), self.index)
    }
}

/// Smallest delimiter width that cannot occur inside `text`
fn delimiter_width_for(text: &str) -> usize {
    let longest_run = text.split(|c: char| c != '_').map(str::len).max().unwrap_or(0);
    (longest_run + 1).max(DEFAULT_DELIMITER_WIDTH)
}

/// Tokens serialized with `width` underscores, left to right, without overlap
fn find_tokens(text: &str, width: usize) -> Vec<(Range<usize>, Token)> {
    let bytes = text.as_bytes();
    let mut found = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        match parse_token_at(bytes, pos, width) {
            Some((token, end)) => {
                found.push((pos..end, token));
                pos = end;
            }
            None => pos += 1,
        }
    }

    found
}

// Every byte of a token is ASCII, so a match never splits a UTF-8 sequence.
fn parse_token_at(bytes: &[u8], start: usize, width: usize) -> Option<(Token, usize)> {
    let is_delimiter = |from: usize| {
        bytes.get(from..from + width)
            .is_some_and(|run| run.iter().all(|&b| b == b'_'))
    };

    if !is_delimiter(start) {
        return None;
    }
    let kind = TokenKind::from_tag(*bytes.get(start + width)?)?;

    let digits_start = start + width + 1;
    let digit_count = bytes[digits_start..].iter().take_while(|b| b.is_ascii_digit()).count();
    if digit_count == 0 {
        return None;
    }
    let digits_end = digits_start + digit_count;
    if !is_delimiter(digits_end) {
        return None;
    }

    let index = std::str::from_utf8(&bytes[digits_start..digits_end]).ok()?.parse().ok()?;
    Some((Token::with_delimiter_width(kind, index, width), digits_end + width))
}

/// Tokens issued for one value, in issue order, with the raw text they replace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMap {
    entries: Vec<(Token, String)>,
    delimiter_width: usize,
}

impl Default for TokenMap {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            delimiter_width: DEFAULT_DELIMITER_WIDTH,
        }
    }
}

impl TokenMap {
    /// Empty map whose tokens cannot collide with anything in `input`
    fn for_input(input: &str) -> Self {
        Self {
            entries: Vec::new(),
            delimiter_width: delimiter_width_for(input),
        }
    }

    /// Issue the next token for `raw`
    fn issue(&mut self, kind: TokenKind, raw: &str) -> Token {
        let token = Token::with_delimiter_width(kind, self.entries.len(), self.delimiter_width);
        self.entries.push((token, raw.to_string()));
        token
    }

    /// Replace `term` with one brand token, leaving already issued tokens alone
    fn mask_term(&mut self, text: &str, term: &str) -> String {
        let mut bounds: Vec<Range<usize>> = find_tokens(text, self.delimiter_width)
            .into_iter()
            .map(|(range, _)| range)
            .collect();
        bounds.push(text.len()..text.len());

        let mut brand_token: Option<Token> = None;
        let mut masked = String::with_capacity(text.len());
        let mut last = 0;

        for range in bounds {
            let literal = &text[last..range.start];
            if literal.contains(term) {
                let token = match brand_token {
                    Some(token) => token,
                    None => *brand_token.insert(self.issue(TokenKind::Brand, term)),
                };
                masked.push_str(&literal.replace(term, &token.to_string()));
            } else {
                masked.push_str(literal);
            }
            masked.push_str(&text[range.clone()]);
            last = range.end;
        }

        masked
    }

    /// Replace every known token in `text` with its raw text, including
    /// tokens nested inside that raw text
    fn restore(&self, text: &str) -> String {
        let mut restored = String::with_capacity(text.len());
        let mut last = 0;

        for (range, token) in find_tokens(text, self.delimiter_width) {
            if let Some(raw) = self.raw(&token) {
                restored.push_str(&text[last..range.start]);
                restored.push_str(&self.restore(raw));
                last = range.end;
            }
        }
        restored.push_str(&text[last..]);

        restored
    }

    /// Number of tokens issued
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was masked
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Underscores on each side of the tokens in this map
    pub fn delimiter_width(&self) -> usize {
        self.delimiter_width
    }

    /// Raw text behind a token
    pub fn raw(&self, token: &Token) -> Option<&str> {
        self.entries.iter()
            .find(|(issued, _)| issued == token)
            .map(|(_, raw)| raw.as_str())
    }

    /// Tokens and raw text in issue order
    pub fn iter(&self) -> impl Iterator<Item = (&Token, &str)> {
        self.entries.iter().map(|(token, raw)| (token, raw.as_str()))
    }
}

/// A value with its protected spans replaced by tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskedText {
    /// Text to hand to the translation service
    pub text: String,
    /// Tokens issued while masking
    pub tokens: TokenMap,
}

impl MaskedText {
    /// Replace every token in `translated` with its raw text
    ///
    /// A markup token may carry an earlier placeholder token in its raw text
    /// (`<a href="{url}">`); that one is restored as well.
    pub fn unmask(&self, translated: &str) -> String {
        self.tokens.restore(translated)
    }

    /// Tokens from the masked text that are absent in `translated`
    ///
    /// Tokens nested inside another token's raw text are not expected in the
    /// translated text and are skipped.
    pub fn missing_tokens(&self, translated: &str) -> Vec<Token> {
        let width = self.tokens.delimiter_width;
        let sent: HashSet<Token> = find_tokens(&self.text, width).into_iter().map(|(_, t)| t).collect();
        let returned: HashSet<Token> = find_tokens(translated, width).into_iter().map(|(_, t)| t).collect();

        self.tokens.entries.iter()
            .map(|(token, _)| *token)
            .filter(|token| sent.contains(token) && !returned.contains(token))
            .collect()
    }
}

/// Masks protected spans for one run
#[derive(Debug, Clone, Default)]
pub struct Masker {
    brand_terms: Vec<String>,
}

impl Masker {
    /// Create a masker protecting the given brand terms, checked in order
    pub fn new<I, S>(brand_terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            brand_terms: brand_terms.into_iter()
                .map(Into::into)
                .filter(|term: &String| !term.is_empty())
                .collect(),
        }
    }

    /// Brand terms in check order
    pub fn brand_terms(&self) -> &[String] {
        &self.brand_terms
    }

    /// Replace placeholders, markup and brand terms with tokens
    pub fn mask(&self, text: &str) -> MaskedText {
        let mut tokens = TokenMap::for_input(text);

        let text = PLACEHOLDER_REGEX
            .replace_all(text, |caps: &Captures<'_>| {
                tokens.issue(TokenKind::Placeholder, &caps[0]).to_string()
            })
            .into_owned();

        let mut text = MARKUP_REGEX
            .replace_all(&text, |caps: &Captures<'_>| {
                tokens.issue(TokenKind::Markup, &caps[0]).to_string()
            })
            .into_owned();

        for term in &self.brand_terms {
            text = tokens.mask_term(&text, term);
        }

        MaskedText { text, tokens }
    }
}
