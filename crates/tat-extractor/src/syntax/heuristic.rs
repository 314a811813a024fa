//! Built-in rule-based syntactic source
//!
//! Tokenizes on whitespace, peels punctuation, segments sentences and then
//! claims spans per sentence in a fixed order: dates, names (people,
//! organizations, places), values, verbs. A token claimed by an earlier pass is
//! invisible to later ones.

use chrono::NaiveDate;
use tat_core::Result;

use super::dates::{self, DateParse};
use super::lexicon;
use super::{Document, DocumentBuilder, SpanCategory, SyntacticSource};

const OPENERS: &[char] = &['"', '\'', '(', '[', '{', '“', '‘'];
const CLOSERS: &[char] = &['"', '\'', ')', ']', '}', '”', '’'];
const CLAUSE_PUNCT: &[char] = &['.', ',', '!', '?', ';', ':'];
const SENTENCE_END: &[char] = &['.', '!', '?'];
const POSSESSIVES: &[&str] = &["'s", "’s"];
const CURRENCY: &[char] = &['$', '€', '£', '¥'];
const SUBJECT_PRONOUNS: &[&str] = &["i", "you", "we", "they"];

/// Lexicon and rule based parser
#[derive(Debug, Clone, Default)]
pub struct HeuristicParser {
    reference_date: Option<NaiveDate>,
}

impl HeuristicParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative phrases ("next month") against this date
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }
}

impl SyntacticSource for HeuristicParser {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn parse(&self, text: &str) -> Result<Document> {
        let tokens = tokenize(text);
        let mut builder = DocumentBuilder::new(text);
        let mut parses: Vec<DateParse> = Vec::new();

        for token in &tokens {
            builder.term(token.start, token.end);
        }

        for (from, to) in sentence_bounds(text, &tokens) {
            let slice = &tokens[from..to];
            let (Some(first), Some(last)) = (slice.first(), slice.last()) else {
                continue;
            };
            let index = builder.sentence(first.start, last.end);
            let mut scan = SentenceScan::new(text, slice);

            for (start, end, kind) in scan.dates() {
                builder.span(index, SpanCategory::Date, start, end);
                parses.push(dates::parse_date(&text[start..end], kind, self.reference_date));
            }
            for (category, start, end) in scan.names() {
                builder.span(index, category, start, end);
            }
            for (start, end) in scan.values() {
                builder.span(index, SpanCategory::Value, start, end);
            }
            for (start, end) in scan.verbs() {
                builder.span(index, SpanCategory::Verb, start, end);
            }
        }

        builder.date_parses(parses);
        let document = builder.build()?;

        tracing::debug!(
            parser = self.name(),
            sentences = document.sentences().len(),
            terms = document.terms().len(),
            "Parsed text"
        );
        Ok(document)
    }

    fn supports_dates(&self) -> bool {
        true
    }
}

// ============================================================================
// Tokens
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Word,
    Punct,
}

#[derive(Debug, Clone, Copy)]
struct Token {
    start: usize,
    end: usize,
    /// End of the token without a possessive suffix
    core_end: usize,
    kind: TokenKind,
}

impl Token {
    fn new(text: &str, start: usize, end: usize) -> Self {
        let surface = &text[start..end];
        let kind = if surface.chars().any(char::is_alphanumeric) {
            TokenKind::Word
        } else {
            TokenKind::Punct
        };
        let core_end = match kind {
            TokenKind::Word => POSSESSIVES
                .iter()
                .find_map(|suffix| surface.strip_suffix(suffix).filter(|rest| !rest.is_empty()))
                .map_or(end, |rest| start + rest.len()),
            TokenKind::Punct => end,
        };
        Self {
            start,
            end,
            core_end,
            kind,
        }
    }

    fn core<'t>(&self, text: &'t str) -> &'t str {
        &text[self.start..self.core_end]
    }

    fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }

    fn is_possessive(&self) -> bool {
        self.core_end < self.end
    }

    fn overlaps(&self, start: usize, end: usize) -> bool {
        self.start < end && start < self.end
    }
}

fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    for (start, end) in chunks(text) {
        split_chunk(text, start, end, &mut tokens);
    }
    tokens
}

/// Byte ranges of whitespace-separated chunks
fn chunks(text: &str) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    let mut open = None;
    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if let Some(start) = open.take() {
                out.push((start, i));
            }
        } else if open.is_none() {
            open = Some(i);
        }
    }
    if let Some(start) = open {
        out.push((start, text.len()));
    }
    out
}

fn split_chunk(text: &str, mut start: usize, mut end: usize, tokens: &mut Vec<Token>) {
    while let Some(c) = text[start..end].chars().next() {
        if !OPENERS.contains(&c) {
            break;
        }
        tokens.push(Token::new(text, start, start + c.len_utf8()));
        start += c.len_utf8();
    }

    // Peeled right to left; adjacent clause marks merge ("?!", "...")
    let mut trailing: Vec<(usize, usize)> = Vec::new();
    while let Some(c) = text[start..end].chars().next_back() {
        let width = c.len_utf8();
        let clause = CLAUSE_PUNCT.contains(&c);
        if clause && c == '.' && lexicon::is_abbreviation(&text[start..end]) {
            break;
        }
        if !clause && !CLOSERS.contains(&c) {
            break;
        }

        let merges = clause
            && trailing.last().is_some_and(|&(s, e)| {
                s == end && text[s..e].chars().all(|p| CLAUSE_PUNCT.contains(&p))
            });
        match trailing.last_mut() {
            Some(last) if merges => last.0 -= width,
            _ => trailing.push((end - width, end)),
        }
        end -= width;
    }

    if start < end {
        tokens.push(Token::new(text, start, end));
    }
    for &(s, e) in trailing.iter().rev() {
        tokens.push(Token::new(text, s, e));
    }
}

/// Token index ranges of sentences
fn sentence_bounds(text: &str, tokens: &[Token]) -> Vec<(usize, usize)> {
    let mut bounds = Vec::new();
    let mut begin = 0;
    let mut i = 0;

    while i < tokens.len() {
        let token = tokens[i];
        let terminal = token.kind == TokenKind::Punct && text[token.start..token.end].contains(SENTENCE_END);
        let paragraph = tokens
            .get(i + 1)
            .is_some_and(|next| text[token.end..next.start].matches('\n').count() >= 2);
        i += 1;

        if terminal {
            // Closing quotes and brackets stay with their sentence
            while let Some(next) = tokens.get(i) {
                let attached = next.start == tokens[i - 1].end;
                let closer = text[next.start..next.end].chars().all(|c| CLOSERS.contains(&c));
                if !(attached && closer && next.kind == TokenKind::Punct) {
                    break;
                }
                i += 1;
            }
        }

        if terminal || paragraph {
            bounds.push((begin, i));
            begin = i;
        }
    }

    if begin < tokens.len() {
        bounds.push((begin, tokens.len()));
    }
    bounds
}

// ============================================================================
// Sentence scan
// ============================================================================

struct SentenceScan<'a> {
    text: &'a str,
    tokens: &'a [Token],
    claimed: Vec<bool>,
}

impl<'a> SentenceScan<'a> {
    fn new(text: &'a str, tokens: &'a [Token]) -> Self {
        Self {
            text,
            tokens,
            claimed: vec![false; tokens.len()],
        }
    }

    fn claim(&mut self, start: usize, end: usize) {
        for (claimed, token) in self.claimed.iter_mut().zip(self.tokens) {
            if token.overlaps(start, end) {
                *claimed = true;
            }
        }
    }

    /// Core text of an unclaimed word token
    fn free_word(&self, i: usize) -> Option<&'a str> {
        let token = self.tokens.get(i)?;
        (token.is_word() && !self.claimed[i]).then(|| token.core(self.text))
    }

    fn previous_word(&self, i: usize) -> Option<&'a str> {
        let token = self.tokens.get(i.checked_sub(1)?)?;
        token.is_word().then(|| token.core(self.text))
    }

    fn dates(&mut self) -> Vec<(usize, usize, dates::DateKind)> {
        let (Some(first), Some(last)) = (self.tokens.first(), self.tokens.last()) else {
            return Vec::new();
        };
        let offset = first.start;
        let found: Vec<_> = dates::find_dates(&self.text[offset..last.end])
            .into_iter()
            .map(|(start, end, kind)| (offset + start, offset + end, kind))
            .collect();
        for &(start, end, _) in &found {
            self.claim(start, end);
        }
        found
    }

    // ------------------------------------------------------------------
    // Names
    // ------------------------------------------------------------------

    fn starts_run(&self, i: usize) -> bool {
        self.free_word(i).is_some_and(|word| {
            word.chars().next().is_some_and(char::is_uppercase) && !lexicon::is_capitalized_stopword(word)
        })
    }

    fn joins_run(&self, i: usize) -> bool {
        self.starts_run(i) && !self.free_word(i).is_some_and(lexicon::is_honorific)
    }

    fn names(&mut self) -> Vec<(SpanCategory, usize, usize)> {
        let mut found = Vec::new();
        let mut i = 0;

        while i < self.tokens.len() {
            if !self.starts_run(i) {
                i += 1;
                continue;
            }

            let mut run = vec![i];
            let mut j = i + 1;
            while j < self.tokens.len() {
                let last = self.tokens[run[run.len() - 1]];
                if last.is_possessive() || (run.len() >= 2 && lexicon::is_org_suffix(last.core(self.text))) {
                    break;
                }
                if self.joins_run(j) {
                    run.push(j);
                    j += 1;
                } else if self
                    .tokens
                    .get(j)
                    .is_some_and(|t| lexicon::is_name_connector(t.core(self.text)))
                    && self.joins_run(j + 1)
                {
                    run.extend([j, j + 1]);
                    j += 2;
                } else {
                    break;
                }
            }

            if let Some(name) = self.classify(&run) {
                found.push(name);
                for &k in &run {
                    self.claimed[k] = true;
                }
            }
            i = j;
        }

        found
    }

    fn classify(&self, run: &[usize]) -> Option<(SpanCategory, usize, usize)> {
        let words: Vec<&str> = run.iter().map(|&k| self.tokens[k].core(self.text)).collect();
        let (first, last) = (*words.first()?, *words.last()?);
        let start = self.tokens[run[0]].start;
        let end = self.tokens[run[run.len() - 1]].core_end;
        let full = &self.text[start..end];
        let n = words.len();

        if n >= 2 && (lexicon::is_org_suffix(last) || lexicon::is_org_head(first)) {
            return Some((SpanCategory::Organization, start, end));
        }
        if lexicon::is_organization(full) || lexicon::is_organization(first) {
            return Some((SpanCategory::Organization, start, end));
        }
        if lexicon::is_honorific(first) {
            return (n >= 2).then(|| (SpanCategory::Person, self.tokens[run[1]].start, end));
        }
        if lexicon::is_first_name(first) {
            return Some((SpanCategory::Person, start, end));
        }
        if lexicon::is_place(full) || self.previous_word(run[0]).is_some_and(lexicon::is_place_preposition) {
            return Some((SpanCategory::Place, start, end));
        }
        None
    }

    // ------------------------------------------------------------------
    // Values
    // ------------------------------------------------------------------

    fn is_number(&self, i: usize) -> bool {
        self.free_word(i).is_some_and(|word| {
            let digits = word.trim_start_matches(CURRENCY);
            let numeric = digits.chars().next().is_some_and(|c| c.is_ascii_digit())
                && digits.chars().all(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '%'));
            numeric || lexicon::is_number_word(word)
        })
    }

    fn values(&mut self) -> Vec<(usize, usize)> {
        let mut found = Vec::new();
        let mut i = 0;

        while i < self.tokens.len() {
            if !self.is_number(i) {
                i += 1;
                continue;
            }
            let mut j = i + 1;
            while self
                .free_word(j)
                .is_some_and(|w| lexicon::is_scale_word(w) || lexicon::is_number_word(w))
            {
                j += 1;
            }
            let (start, end) = (self.tokens[i].start, self.tokens[j - 1].core_end);
            found.push((start, end));
            self.claim(start, end);
            i = j;
        }

        found
    }

    // ------------------------------------------------------------------
    // Verbs
    // ------------------------------------------------------------------

    fn is_group_verb(word: &str) -> bool {
        let lower = word.to_lowercase();
        lexicon::is_verb_form(word)
            || lexicon::looks_past_tense(&lower)
            || (lower.len() > 4 && lower.ends_with("ing") && word.chars().all(char::is_lowercase))
    }

    fn verbs(&mut self) -> Vec<(usize, usize)> {
        let mut found = Vec::new();
        let mut i = 0;

        while i < self.tokens.len() {
            let Some(word) = self.free_word(i) else {
                i += 1;
                continue;
            };

            if lexicon::is_auxiliary(word) {
                let mut last = i;
                let mut j = i + 1;
                while let Some(next) = self.free_word(j) {
                    if lexicon::is_auxiliary(next) {
                        last = j;
                    } else if !lexicon::is_verb_group_filler(next) {
                        break;
                    }
                    j += 1;
                }
                if self.free_word(j).is_some_and(Self::is_group_verb) {
                    last = j;
                    j += 1;
                }
                found.push((self.tokens[i].start, self.tokens[last].core_end));
                i = j;
                continue;
            }

            let after_determiner = self.previous_word(i).is_some_and(lexicon::is_determiner);
            let after_subject = self
                .previous_word(i)
                .is_some_and(|w| SUBJECT_PRONOUNS.contains(&w.to_lowercase().as_str()));
            let verb = lexicon::is_finite_verb_form(word)
                || lexicon::looks_past_tense(word)
                || (after_subject && lexicon::is_verb_form(word));

            if verb && !after_determiner {
                found.push((self.tokens[i].start, self.tokens[i].core_end));
            }
            i += 1;
        }

        found
    }
}
