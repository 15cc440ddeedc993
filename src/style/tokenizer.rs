//! Structural tokenizer for style block text.
//!
//! Splits a stylesheet into selectors, block delimiters and `key: value`
//! declarations without interpreting values, then rebuilds it minified.
//! Lexing is done by `cssparser`; declaration values are sliced straight out
//! of the source, so anything that is not recolored is written back as-is.

use cssparser::{ParseError, Parser, ParserInput, SourcePosition, Token};

/// A single `key: value` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    pub key: String,
    /// The value without its `!important` flag.
    pub value: String,
    pub important: bool,
}

impl StyleRule {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            important: false,
        }
    }

    /// Marks the declaration `!important`.
    pub fn important(mut self) -> Self {
        self.important = true;
        self
    }
}

/// A piece of a tokenized stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleToken {
    /// Block prelude: a selector list or an at-rule such as `@media screen`.
    Selector(String),
    BlockStart,
    BlockEnd,
    Rule(StyleRule),
    /// A semicolon-terminated statement outside a declaration list, e.g. `@import`.
    Statement(String),
}

/// Splits style text into tokens.
///
/// Strings, `url(...)` and function arguments are kept intact, so a `;` inside
/// `url(data:...)` does not end a declaration. Comments between declarations
/// and rules are dropped.
pub fn tokenize(text: &str) -> Vec<StyleToken> {
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    let mut tokens = Vec::new();
    block_contents(&mut parser, &mut tokens, Contents::Rules);
    tokens
}

/// Rebuilds minified style text from tokens.
pub fn build(tokens: &[StyleToken]) -> String {
    let mut output = String::new();
    for token in tokens {
        match token {
            StyleToken::Selector(selector) => output.push_str(selector),
            StyleToken::BlockStart => output.push('{'),
            StyleToken::BlockEnd => output.push('}'),
            StyleToken::Rule(rule) => {
                output.push_str(&rule.key);
                output.push(':');
                output.push_str(&rule.value);
                if rule.important {
                    output.push_str(" !important");
                }
                output.push(';');
            }
            StyleToken::Statement(statement) => {
                output.push_str(statement);
                output.push(';');
            }
        }
    }
    output
}

// ============================================================================
// Parsing
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Contents {
    /// A stylesheet or the body of `@media`-like rules.
    Rules,
    /// A style rule body, which may also hold nested rules.
    Declarations,
}

/// How a prelude ended.
enum Terminator {
    Block,
    Semicolon,
    End,
}

fn block_contents(
    parser: &mut Parser<'_, '_>,
    tokens: &mut Vec<StyleToken>,
    contents: Contents,
) {
    loop {
        if contents == Contents::Declarations {
            let state = parser.state();
            if let Some(rule) = declaration(parser) {
                tokens.push(StyleToken::Rule(rule));
                continue;
            }
            parser.reset(&state);
        }

        let mut prelude = Prelude::default();
        match prelude.read(parser) {
            Terminator::Block => {
                let inner = if contents == Contents::Rules && prelude.groups_rules() {
                    Contents::Rules
                } else {
                    Contents::Declarations
                };
                tokens.push(StyleToken::Selector(prelude.text));
                tokens.push(StyleToken::BlockStart);
                nested_block(parser, |p| block_contents(p, tokens, inner));
                tokens.push(StyleToken::BlockEnd);
            }
            Terminator::Semicolon => {
                if !prelude.text.is_empty() {
                    tokens.push(StyleToken::Statement(prelude.text));
                }
            }
            Terminator::End => {
                if !prelude.text.is_empty() {
                    tokens.push(StyleToken::Statement(prelude.text));
                }
                break;
            }
        }
    }
}

/// Reads `key: value [!important]` through the next `;` or the end of the block.
///
/// Returns `None` without a usable declaration, e.g. for a nested rule such as
/// `a:hover { ... }`, in which case the caller rewinds.
fn declaration(parser: &mut Parser<'_, '_>) -> Option<StyleRule> {
    let key = loop {
        let (start, token) = next_token(parser)?;
        match token {
            Token::WhiteSpace(_) | Token::Comment(_) => continue,
            Token::Ident(_) => break parser.slice_from(start),
            _ => return None,
        }
    };

    loop {
        match next_token(parser)?.1 {
            Token::WhiteSpace(_) | Token::Comment(_) => continue,
            Token::Colon => break,
            _ => return None,
        }
    }

    let mut value: Option<(SourcePosition, SourcePosition)> = None;
    let mut important = false;
    while let Some((start, token)) = next_token(parser) {
        match token {
            Token::Semicolon => break,
            Token::CurlyBracketBlock => return None,
            _ if important => {}
            Token::WhiteSpace(_) | Token::Comment(_) => {}
            token => {
                if matches!(token, Token::Delim('!')) && important_follows(parser) {
                    important = true;
                    continue;
                }
                skip_block_of(parser, &token);
                let first = value.map_or(start, |(first, _)| first);
                value = Some((first, parser.position()));
            }
        }
    }

    let value = value.map_or("", |(start, end)| parser.slice(start..end));
    Some(StyleRule {
        key: key.to_string(),
        value: value.to_string(),
        important,
    })
}

/// Consumes `important` after a `!`, rewinding if something else follows.
fn important_follows(parser: &mut Parser<'_, '_>) -> bool {
    let state = parser.state();
    while let Some((_, token)) = next_token(parser) {
        match token {
            Token::WhiteSpace(_) | Token::Comment(_) => continue,
            Token::Ident(name) if name.eq_ignore_ascii_case("important") => return true,
            _ => break,
        }
    }
    parser.reset(&state);
    false
}

/// Selector list or at-rule prelude text.
///
/// Whitespace runs collapse to one space and leading or trailing comments are
/// dropped; everything else is copied from the source.
#[derive(Default)]
struct Prelude {
    text: String,
    gap: String,
    at_rule: Option<String>,
}

impl Prelude {
    fn read(&mut self, parser: &mut Parser<'_, '_>) -> Terminator {
        while let Some((start, token)) = next_token(parser) {
            match token {
                Token::CurlyBracketBlock => return Terminator::Block,
                Token::Semicolon => return Terminator::Semicolon,
                Token::WhiteSpace(_) => self.space(" "),
                Token::Comment(_) => self.space(parser.slice_from(start)),
                Token::CDO | Token::CDC | Token::CloseCurlyBracket => {}
                token => {
                    if let Token::AtKeyword(name) = &token {
                        if self.text.is_empty() {
                            self.at_rule = Some(name.to_ascii_lowercase());
                        }
                    }
                    skip_block_of(parser, &token);
                    self.push(parser.slice_from(start));
                }
            }
        }
        Terminator::End
    }

    fn space(&mut self, piece: &str) {
        if !self.text.is_empty() && !(piece == " " && self.gap.ends_with(' ')) {
            self.gap.push_str(piece);
        }
    }

    fn push(&mut self, piece: &str) {
        self.text.push_str(&self.gap);
        self.gap.clear();
        self.text.push_str(piece);
    }

    /// At-rules whose block holds rules rather than declarations.
    fn groups_rules(&self) -> bool {
        match self.at_rule.as_deref() {
            Some(name) => {
                matches!(
                    name,
                    "media" | "supports" | "container" | "layer" | "document" | "scope"
                ) || name.ends_with("keyframes")
            }
            None => false,
        }
    }
}

/// Returns the next token, including whitespace and comments, and the
/// position it starts at.
fn next_token<'i>(parser: &mut Parser<'i, '_>) -> Option<(SourcePosition, Token<'i>)> {
    let start = parser.position();
    let token = parser.next_including_whitespace_and_comments().ok()?.clone();
    Some((start, token))
}

/// Consumes the rest of a `(`, `[` or function block so the parser position
/// lands after its closing bracket.
fn skip_block_of(parser: &mut Parser<'_, '_>, token: &Token<'_>) {
    if matches!(
        token,
        Token::Function(_) | Token::ParenthesisBlock | Token::SquareBracketBlock
    ) {
        nested_block(parser, |p| while p.next_including_whitespace_and_comments().is_ok() {});
    }
}

fn nested_block<'i>(parser: &mut Parser<'i, '_>, body: impl FnOnce(&mut Parser<'i, '_>)) {
    let _ = parser.parse_nested_block(|p| {
        body(p);
        Ok::<(), ParseError<'i, ()>>(())
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_simple_block() {
        let tokens = tokenize("path { fill: #D9D9D9; stroke-width : 2 }");
        assert_eq!(
            tokens,
            vec![
                StyleToken::Selector("path".into()),
                StyleToken::BlockStart,
                StyleToken::Rule(StyleRule::new("fill", "#D9D9D9")),
                StyleToken::Rule(StyleRule::new("stroke-width", "2")),
                StyleToken::BlockEnd,
            ]
        );
    }

    #[test]
    fn build_minifies() {
        let tokens = tokenize(
            "path { fill: #D9D9D9; } g { stroke: #000; fill-opacity: .5; fill: gray;} ",
        );
        assert_eq!(
            build(&tokens),
            "path{fill:#D9D9D9;}g{stroke:#000;fill-opacity:.5;fill:gray;}"
        );
    }

    #[test]
    fn selectors_with_pseudo_classes() {
        let tokens = tokenize("a:hover,\n  .icon   > path{fill:red}");
        assert_eq!(tokens[0], StyleToken::Selector("a:hover, .icon > path".into()));
        assert_eq!(tokens[2], StyleToken::Rule(StyleRule::new("fill", "red")));
    }

    #[test]
    fn quoted_and_parenthesized_values_stay_whole() {
        let css = r#"g{background:url(data:image/png;base64,AAA=);content:"a;b}"}"#;
        let tokens = tokenize(css);
        assert_eq!(
            tokens[2],
            StyleToken::Rule(StyleRule::new("background", "url(data:image/png;base64,AAA=)"))
        );
        assert_eq!(tokens[3], StyleToken::Rule(StyleRule::new("content", "\"a;b}\"")));
        assert_eq!(build(&tokens), css.replace("\"}", "\";}"));
    }

    #[test]
    fn values_are_copied_from_source() {
        let css = "g{fill:url(a/*b*/x.svg#g)}path{fill:var(--c,  rgb(0 0 0 / 50%))}";
        assert_eq!(
            build(&tokenize(css)),
            "g{fill:url(a/*b*/x.svg#g);}path{fill:var(--c,  rgb(0 0 0 / 50%));}"
        );
    }

    #[test]
    fn important_is_split_from_value() {
        let tokens = tokenize("path{fill:#D9D9D9 ! IMPORTANT;stroke:red!important}");
        assert_eq!(
            tokens[2],
            StyleToken::Rule(StyleRule::new("fill", "#D9D9D9").important())
        );
        assert_eq!(tokens[3], StyleToken::Rule(StyleRule::new("stroke", "red").important()));
        assert_eq!(
            build(&tokens),
            "path{fill:#D9D9D9 !important;stroke:red !important;}"
        );
    }

    #[test]
    fn comments_are_dropped() {
        let tokens = tokenize("/* colors */ path { /* base */ fill: red; }");
        assert_eq!(build(&tokens), "path{fill:red;}");
    }

    #[test]
    fn nested_at_rules() {
        let css = "@import url(a.css); @media (max-width: 10px) { path { fill: red } }";
        assert_eq!(
            build(&tokenize(css)),
            "@import url(a.css);@media (max-width: 10px){path{fill:red;}}"
        );
    }

    #[test]
    fn nested_style_rules() {
        let css = "g { fill: red; &:hover { fill: blue } a:focus{stroke:#000} }";
        let tokens = tokenize(css);
        assert_eq!(tokens[3], StyleToken::Selector("&:hover".into()));
        assert_eq!(tokens[9], StyleToken::Rule(StyleRule::new("stroke", "#000")));
        assert_eq!(build(&tokens), "g{fill:red;&:hover{fill:blue;}a:focus{stroke:#000;}}");
    }

    #[test]
    fn empty_text() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  \n ").is_empty());
        assert_eq!(build(&[]), "");
    }
}
