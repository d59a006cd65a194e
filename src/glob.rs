//! EditorConfig-style glob matching for section headers
//!
//! A pattern is parsed once into a table of node sequences and matched with
//! backtracking against the full absolute path of the target file. Branching
//! states that already failed are remembered, so matching stays polynomial in
//! the pattern and path lengths. Malformed constructs never fail compilation;
//! they degrade to literal text.

use std::borrow::Cow;
use std::collections::HashSet;
use std::path::{Path, MAIN_SEPARATOR};

#[derive(Debug, Clone, PartialEq, Eq)]
enum ClassItem {
    Char(char),
    Range(char, char),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Literal(char),
    /// `*`: any run of characters except `/`
    Star,
    /// `**`: any run of characters
    DoubleStar,
    /// `/**/`: a single `/` or `/`, anything, `/`
    AnyDirs,
    /// `?`
    AnyChar,
    Class {
        negated: bool,
        items: Vec<ClassItem>,
    },
    /// Indices of the alternative sequences
    Alternation(Vec<usize>),
    /// `{lo..hi}`, bounds already ordered
    Range {
        lo: i64,
        hi: i64,
    },
}

/// Where matching resumes once a sequence is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Continuation {
    seq: usize,
    index: usize,
}

#[derive(Debug, Clone)]
struct Sequence {
    nodes: Vec<Node>,
    /// `None` only for the top-level sequence, which must consume the path.
    parent: Option<Continuation>,
}

/// A compiled section pattern, anchored at the directory of the file that
/// declared it.
#[derive(Debug, Clone)]
pub struct GlobMatcher {
    pattern: String,
    /// `sequences[0]` is the top level
    sequences: Vec<Sequence>,
}

impl GlobMatcher {
    /// Compile `pattern` as declared by a config file living in `anchor_dir`.
    ///
    /// Patterns without a `/` match at any depth below `anchor_dir`; patterns
    /// with one are relative to `anchor_dir` (a leading `/` is dropped).
    pub fn compile(anchor_dir: &Path, pattern: &str) -> Self {
        let glob = pattern.replace("\\#", "#").replace("\\;", ";");

        let relative = if glob.contains('/') {
            glob.strip_prefix('/').unwrap_or(&glob).to_string()
        } else {
            format!("**/{glob}")
        };

        let anchor_text = anchor_dir.to_string_lossy();
        let anchor = normalize_separators(&anchor_text);
        let mut nodes: Vec<Node> = anchor
            .trim_end_matches('/')
            .chars()
            .map(Node::Literal)
            .collect();

        let mut parser = Parser::default();
        parser.sequences.push(Sequence {
            nodes: Vec::new(),
            parent: None,
        });
        let chars: Vec<char> = format!("/{relative}").chars().collect();
        parser.parse_into(&chars, 0, &mut nodes);
        parser.sequences[0].nodes = nodes;

        Self {
            pattern: pattern.to_string(),
            sequences: parser.sequences,
        }
    }

    /// The header text this matcher was compiled from.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Test an absolute target path. Matching is case-sensitive.
    pub fn is_match(&self, path: &Path) -> bool {
        let text = path.to_string_lossy();
        let chars: Vec<char> = normalize_separators(&text).chars().collect();
        Matcher {
            sequences: &self.sequences,
            text: &chars,
            failed: HashSet::new(),
        }
        .matches(0, 0, 0)
    }
}

fn normalize_separators(path: &str) -> Cow<'_, str> {
    if MAIN_SEPARATOR == '/' {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(path.replace(MAIN_SEPARATOR, "/"))
    }
}

#[derive(Default)]
struct Parser {
    sequences: Vec<Sequence>,
}

impl Parser {
    /// Parse `chars` as a new sequence that continues at `parent`.
    fn parse_sequence(&mut self, chars: &[char], parent: Continuation) -> usize {
        let seq = self.sequences.len();
        self.sequences.push(Sequence {
            nodes: Vec::new(),
            parent: Some(parent),
        });
        let mut nodes = Vec::new();
        self.parse_into(chars, seq, &mut nodes);
        self.sequences[seq].nodes = nodes;
        seq
    }

    /// Append the nodes for `chars` to `nodes`, which belong to sequence `seq`.
    fn parse_into(&mut self, chars: &[char], seq: usize, nodes: &mut Vec<Node>) {
        let mut pos = 0;

        while pos < chars.len() {
            match chars[pos] {
                '\\' => {
                    match chars.get(pos + 1) {
                        Some(&c) => nodes.push(Node::Literal(c)),
                        None => nodes.push(Node::Literal('\\')),
                    }
                    pos += 2;
                }
                '*' => {
                    if chars.get(pos + 1) == Some(&'*') {
                        nodes.push(Node::DoubleStar);
                        pos += 2;
                    } else {
                        nodes.push(Node::Star);
                        pos += 1;
                    }
                }
                '?' => {
                    nodes.push(Node::AnyChar);
                    pos += 1;
                }
                '/' if chars[pos..].starts_with(&['/', '*', '*', '/']) => {
                    nodes.push(Node::AnyDirs);
                    pos += 4;
                }
                '[' => match parse_class(chars, pos) {
                    Some((node, next)) => {
                        nodes.push(node);
                        pos = next;
                    }
                    None => {
                        nodes.push(Node::Literal('['));
                        pos += 1;
                    }
                },
                '{' => match find_closing_brace(chars, pos) {
                    Some(close) => {
                        self.parse_braces(&chars[pos + 1..close], seq, nodes);
                        pos = close + 1;
                    }
                    None => {
                        nodes.push(Node::Literal('{'));
                        pos += 1;
                    }
                },
                c => {
                    nodes.push(Node::Literal(c));
                    pos += 1;
                }
            }
        }
    }

    fn parse_braces(&mut self, inner: &[char], seq: usize, nodes: &mut Vec<Node>) {
        let text: String = inner.iter().collect();
        if let Some((lo, hi)) = parse_range(&text) {
            nodes.push(Node::Range {
                lo: lo.min(hi),
                hi: lo.max(hi),
            });
            return;
        }

        let alternatives = split_alternatives(inner);
        if alternatives.len() < 2 {
            nodes.push(Node::Literal('{'));
            self.parse_into(inner, seq, nodes);
            nodes.push(Node::Literal('}'));
            return;
        }

        let after = Continuation {
            seq,
            index: nodes.len() + 1,
        };
        let alternatives = alternatives
            .into_iter()
            .map(|alt| self.parse_sequence(alt, after))
            .collect();
        nodes.push(Node::Alternation(alternatives));
    }
}

/// Parse `[...]` starting at `open`. Returns the node and the index after `]`,
/// or `None` when the bracket must be taken literally.
fn parse_class(chars: &[char], open: usize) -> Option<(Node, usize)> {
    let mut pos = open + 1;
    let negated = matches!(chars.get(pos), Some('!') | Some('^'));
    if negated {
        pos += 1;
    }

    // (character, was escaped)
    let mut members = Vec::new();
    let close = loop {
        match *chars.get(pos)? {
            '\\' => {
                members.push((*chars.get(pos + 1)?, true));
                pos += 2;
            }
            '/' => return None,
            ']' => break pos,
            c => {
                members.push((c, false));
                pos += 1;
            }
        }
    };

    if members.is_empty() {
        return None;
    }

    // `a-z` forms a range; a `-` at either end or escaped is literal.
    let mut items = Vec::new();
    let mut i = 0;
    while i < members.len() {
        if i + 2 < members.len() && members[i + 1] == ('-', false) {
            items.push(ClassItem::Range(members[i].0, members[i + 2].0));
            i += 3;
        } else {
            items.push(ClassItem::Char(members[i].0));
            i += 1;
        }
    }

    Some((Node::Class { negated, items }, close + 1))
}

fn find_closing_brace(chars: &[char], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut pos = open;
    while pos < chars.len() {
        match chars[pos] {
            '\\' => pos += 1,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(pos);
                }
            }
            _ => {}
        }
        pos += 1;
    }
    None
}

fn parse_range(text: &str) -> Option<(i64, i64)> {
    let (lo, hi) = text.split_once("..")?;
    let is_number = |s: &str| {
        let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
        !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
    };
    if !is_number(lo) || !is_number(hi) {
        return None;
    }
    Some((lo.parse().ok()?, hi.parse().ok()?))
}

/// Split brace contents on top-level, unescaped commas.
fn split_alternatives(inner: &[char]) -> Vec<&[char]> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut pos = 0;
    while pos < inner.len() {
        match inner[pos] {
            '\\' => pos += 1,
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&inner[start..pos]);
                start = pos + 1;
            }
            _ => {}
        }
        pos += 1;
    }
    parts.push(&inner[start.min(inner.len())..]);
    parts
}

fn class_contains(items: &[ClassItem], c: char) -> bool {
    items.iter().any(|item| match *item {
        ClassItem::Char(m) => m == c,
        ClassItem::Range(lo, hi) => lo <= c && c <= hi,
    })
}

/// Length of every prefix of `text` that spells a canonical decimal integer.
fn number_prefixes(text: &[char]) -> impl Iterator<Item = (usize, i64)> + '_ {
    let sign = usize::from(text.first() == Some(&'-'));
    let digits = text[sign..].iter().take_while(|c| c.is_ascii_digit()).count();

    (1..=digits).filter_map(move |n| {
        let candidate: String = text[..sign + n].iter().collect();
        let body = &candidate[sign..];
        if body.len() > 1 && body.starts_with('0') {
            return None;
        }
        if sign == 1 && body == "0" {
            return None;
        }
        candidate.parse::<i64>().ok().map(|value| (sign + n, value))
    })
}

/// One `is_match` call. A state is (sequence, node index, text offset); the
/// rest of the match from a state never depends on how it was reached.
struct Matcher<'a> {
    sequences: &'a [Sequence],
    text: &'a [char],
    /// Branching states known not to lead to a match
    failed: HashSet<(usize, usize, usize)>,
}

impl<'a> Matcher<'a> {
    fn matches(&mut self, mut seq: usize, mut index: usize, mut pos: usize) -> bool {
        let sequences = self.sequences;
        let text = self.text;

        loop {
            let sequence = &sequences[seq];
            let Some(node) = sequence.nodes.get(index) else {
                match sequence.parent {
                    Some(next) => {
                        seq = next.seq;
                        index = next.index;
                        continue;
                    }
                    None => return pos == text.len(),
                }
            };

            let single = match node {
                Node::Literal(c) => text.get(pos) == Some(c),
                Node::AnyChar => matches!(text.get(pos), Some(&c) if c != '/'),
                Node::Class { negated, items } => matches!(
                    text.get(pos),
                    Some(&c) if c != '/' && class_contains(items, c) != *negated
                ),
                _ => return self.branch(node, seq, index, pos),
            };
            if !single {
                return false;
            }
            index += 1;
            pos += 1;
        }
    }

    fn branch(&mut self, node: &'a Node, seq: usize, index: usize, pos: usize) -> bool {
        let state = (seq, index, pos);
        if self.failed.contains(&state) {
            return false;
        }

        let text = self.text;
        let next = index + 1;
        let matched = match node {
            Node::Star => {
                let run = text[pos..].iter().take_while(|&&c| c != '/').count();
                (0..=run).any(|n| self.matches(seq, next, pos + n))
            }
            Node::DoubleStar => (pos..=text.len()).any(|p| self.matches(seq, next, p)),
            Node::AnyDirs => {
                text.get(pos) == Some(&'/')
                    && (pos + 1..=text.len())
                        .filter(|&p| text[p - 1] == '/')
                        .any(|p| self.matches(seq, next, p))
            }
            Node::Alternation(alternatives) => {
                alternatives.iter().any(|&alt| self.matches(alt, 0, pos))
            }
            Node::Range { lo, hi } => number_prefixes(&text[pos..]).any(|(len, value)| {
                (*lo..=*hi).contains(&value) && self.matches(seq, next, pos + len)
            }),
            Node::Literal(_) | Node::AnyChar | Node::Class { .. } => {
                self.matches(seq, index, pos)
            }
        };

        if !matched {
            self.failed.insert(state);
        }
        matched
    }
}
