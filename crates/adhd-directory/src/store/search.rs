//! Web-search style full-text queries.
//!
//! Mirrors the `websearch_to_tsquery` grammar: bare words are ANDed,
//! `"quoted text"` is a phrase, a leading `-` excludes the following word or
//! phrase, and `or` between two terms makes them alternatives. Matching runs
//! against a lowercased, lightly stemmed token stream.

const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "in", "is", "it", "of",
    "on", "the", "to", "with",
];

#[derive(Debug, Clone, PartialEq, Eq)]
struct Term {
    tokens: Vec<String>,
    negated: bool,
}

/// Parsed search expression: every clause must hold, a clause holds when any of
/// its alternatives does.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WebSearchQuery {
    clauses: Vec<Vec<Term>>,
}

impl WebSearchQuery {
    pub fn parse(raw: &str) -> Self {
        let mut clauses: Vec<Vec<Term>> = Vec::new();
        let mut pending_or = false;
        let mut chars = raw.chars().peekable();

        while let Some(&ch) = chars.peek() {
            if ch.is_whitespace() {
                chars.next();
                continue;
            }

            let mut negated = false;
            if ch == '-' {
                chars.next();
                match chars.peek() {
                    Some(next) if !next.is_whitespace() => negated = true,
                    _ => continue,
                }
            }

            let text = if chars.peek() == Some(&'"') {
                chars.next();
                let mut phrase = String::new();
                for next in chars.by_ref() {
                    if next == '"' {
                        break;
                    }
                    phrase.push(next);
                }
                phrase
            } else {
                let mut word = String::new();
                while let Some(&next) = chars.peek() {
                    if next.is_whitespace() || next == '"' {
                        break;
                    }
                    word.push(next);
                    chars.next();
                }
                if !negated && word.eq_ignore_ascii_case("or") {
                    pending_or = !clauses.is_empty();
                    continue;
                }
                word
            };

            let tokens: Vec<String> = tokenize(&text)
                .filter(|token| !STOP_WORDS.contains(&token.as_str()))
                .map(|token| stem(&token))
                .collect();
            if tokens.is_empty() {
                continue;
            }

            let term = Term { tokens, negated };
            match clauses.last_mut() {
                Some(clause) if pending_or => clause.push(term),
                _ => clauses.push(vec![term]),
            }
            pending_or = false;
        }

        Self { clauses }
    }

    /// True when nothing searchable survived parsing (blank input, only stop words).
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn matches(&self, document: &str) -> bool {
        let tokens = document_tokens(document);
        self.clauses
            .iter()
            .all(|clause| clause.iter().any(|term| term_holds(term, &tokens)))
    }

    /// Occurrence count of the positive terms; zero when the document does not match.
    pub fn rank(&self, document: &str) -> u32 {
        let tokens = document_tokens(document);
        let matched = self
            .clauses
            .iter()
            .all(|clause| clause.iter().any(|term| term_holds(term, &tokens)));
        if !matched {
            return 0;
        }

        self.clauses
            .iter()
            .flatten()
            .filter(|term| !term.negated)
            .map(|term| occurrences(&term.tokens, &tokens))
            .sum()
    }
}

fn term_holds(term: &Term, document: &[String]) -> bool {
    let present = occurrences(&term.tokens, document) > 0;
    present != term.negated
}

fn occurrences(needle: &[String], haystack: &[String]) -> u32 {
    if needle.is_empty() || needle.len() > haystack.len() {
        return 0;
    }
    haystack
        .windows(needle.len())
        .filter(|window| *window == needle)
        .count() as u32
}

fn document_tokens(document: &str) -> Vec<String> {
    tokenize(document).map(|token| stem(&token)).collect()
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|ch: char| !ch.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}

fn stem(token: &str) -> String {
    let len = token.chars().count();
    if len > 4 && token.ends_with("ies") {
        return format!("{}y", &token[..token.len() - 3]);
    }
    if len > 5 && token.ends_with("ing") {
        return token[..token.len() - 3].to_string();
    }
    if len > 3 && token.ends_with('s') && !token.ends_with("ss") {
        return token[..token.len() - 1].to_string();
    }
    token.to_string()
}
