//! Token types and the process-wide dynamic keyword registry.
//!
//! The token tag space is open: a fixed, densely numbered built-in range
//! covers operators, punctuation, and the ANSI keywords, while dialects
//! allocate additional tags above [`TokenType::DYNAMIC_START`] at startup
//! (e.g. `QUALIFY`, `ILIKE`, `ASOF`). Dynamic tags live in a global
//! name-deduplicated registry: registering the same name twice, even from
//! two different dialects, returns the same tag.

use std::collections::HashMap;
use std::fmt;
use std::sync::{OnceLock, PoisonError, RwLock};

use super::position::{Position, Span};

/// A token tag.
///
/// Not a closed enum: dialects must be able to add tags without touching
/// this crate, so the tag is a plain integer newtype with a reserved
/// dynamic range. Use the associated constants for built-in tags and
/// [`register_keyword`] for dialect extensions.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenType(u16);

impl TokenType {
    // Special tokens.
    /// An unrecognized character. The parser reports it; lexing continues.
    pub const ILLEGAL: Self = Self(0);
    /// End of input.
    pub const EOF: Self = Self(1);
    /// A bare or quoted identifier.
    pub const IDENT: Self = Self(2);
    /// A numeric literal (integer, decimal, or exponent form).
    pub const NUMBER: Self = Self(3);
    /// A single-quoted string literal, quotes included in the text.
    pub const STRING: Self = Self(4);
    /// A `{{ ... }}` template-macro literal, delimiters included.
    pub const MACRO: Self = Self(5);
    /// A `$1`-style numbered placeholder.
    pub const PARAM: Self = Self(6);

    // Operators.
    /// `=`
    pub const EQ: Self = Self(10);
    /// `<>` or `!=`
    pub const NEQ: Self = Self(11);
    /// `<`
    pub const LT: Self = Self(12);
    /// `<=`
    pub const LTE: Self = Self(13);
    /// `>`
    pub const GT: Self = Self(14);
    /// `>=`
    pub const GTE: Self = Self(15);
    /// `+`
    pub const PLUS: Self = Self(16);
    /// `-`
    pub const MINUS: Self = Self(17);
    /// `*`
    pub const ASTERISK: Self = Self(18);
    /// `/`
    pub const SLASH: Self = Self(19);
    /// `%`
    pub const PERCENT: Self = Self(20);
    /// `||`
    pub const CONCAT: Self = Self(21);

    // Punctuation.
    /// `,`
    pub const COMMA: Self = Self(25);
    /// `;`
    pub const SEMICOLON: Self = Self(26);
    /// `:`
    pub const COLON: Self = Self(27);
    /// `::`
    pub const DOUBLE_COLON: Self = Self(28);
    /// `.`
    pub const DOT: Self = Self(29);
    /// `(`
    pub const LPAREN: Self = Self(30);
    /// `)`
    pub const RPAREN: Self = Self(31);
    /// `[`
    pub const LBRACKET: Self = Self(32);
    /// `]`
    pub const RBRACKET: Self = Self(33);
    /// `{`
    pub const LBRACE: Self = Self(34);
    /// `}`
    pub const RBRACE: Self = Self(35);
    /// `?`
    pub const QUESTION: Self = Self(36);

    // ANSI keywords.
    pub const SELECT: Self = Self(40);
    pub const FROM: Self = Self(41);
    pub const WHERE: Self = Self(42);
    pub const GROUP: Self = Self(43);
    pub const BY: Self = Self(44);
    pub const HAVING: Self = Self(45);
    pub const ORDER: Self = Self(46);
    pub const LIMIT: Self = Self(47);
    pub const OFFSET: Self = Self(48);
    pub const FETCH: Self = Self(49);
    pub const DISTINCT: Self = Self(50);
    pub const ALL: Self = Self(51);
    pub const AS: Self = Self(52);
    pub const AND: Self = Self(53);
    pub const OR: Self = Self(54);
    pub const NOT: Self = Self(55);
    pub const IN: Self = Self(56);
    pub const BETWEEN: Self = Self(57);
    pub const LIKE: Self = Self(58);
    pub const IS: Self = Self(59);
    pub const NULL: Self = Self(60);
    pub const TRUE: Self = Self(61);
    pub const FALSE: Self = Self(62);
    pub const CASE: Self = Self(63);
    pub const WHEN: Self = Self(64);
    pub const THEN: Self = Self(65);
    pub const ELSE: Self = Self(66);
    pub const END: Self = Self(67);
    pub const CAST: Self = Self(68);
    pub const EXISTS: Self = Self(69);
    pub const UNION: Self = Self(70);
    pub const INTERSECT: Self = Self(71);
    pub const EXCEPT: Self = Self(72);
    pub const JOIN: Self = Self(73);
    pub const INNER: Self = Self(74);
    pub const LEFT: Self = Self(75);
    pub const RIGHT: Self = Self(76);
    pub const FULL: Self = Self(77);
    pub const OUTER: Self = Self(78);
    pub const CROSS: Self = Self(79);
    pub const NATURAL: Self = Self(80);
    pub const ON: Self = Self(81);
    pub const USING: Self = Self(82);
    pub const WITH: Self = Self(83);
    pub const RECURSIVE: Self = Self(84);
    pub const OVER: Self = Self(85);
    pub const PARTITION: Self = Self(86);
    pub const WINDOW: Self = Self(87);
    pub const ROWS: Self = Self(88);
    pub const RANGE: Self = Self(89);
    pub const GROUPS: Self = Self(90);
    pub const UNBOUNDED: Self = Self(91);
    pub const PRECEDING: Self = Self(92);
    pub const FOLLOWING: Self = Self(93);
    pub const CURRENT: Self = Self(94);
    pub const ROW: Self = Self(95);
    pub const FILTER: Self = Self(96);
    pub const LATERAL: Self = Self(97);
    pub const ASC: Self = Self(98);
    pub const DESC: Self = Self(99);
    pub const NULLS: Self = Self(100);
    pub const FIRST: Self = Self(101);
    pub const LAST: Self = Self(102);
    pub const NEXT: Self = Self(103);
    pub const ONLY: Self = Self(104);

    /// First tag value available to dynamically registered keywords.
    pub const DYNAMIC_START: u16 = 1000;

    /// Returns the raw tag value.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Returns true if this tag was allocated by the dynamic registry.
    #[must_use]
    pub const fn is_dynamic(self) -> bool {
        self.0 >= Self::DYNAMIC_START
    }

    /// Returns true if this tag is a built-in ANSI keyword.
    #[must_use]
    pub const fn is_builtin_keyword(self) -> bool {
        self.0 >= Self::SELECT.0 && self.0 <= Self::ONLY.0
    }

    /// Returns true if this tag is a keyword of any origin.
    #[must_use]
    pub const fn is_keyword(self) -> bool {
        self.is_builtin_keyword() || self.is_dynamic()
    }

    /// Returns the display name of this tag.
    ///
    /// Built-in tags have fixed names; dynamic tags resolve through the
    /// registry with the spelling from their first registration. Unknown
    /// tags render as `token#N`.
    #[must_use]
    pub fn name(self) -> String {
        if let Some(name) = builtin_name(self) {
            return String::from(name);
        }
        registered_name(self).unwrap_or_else(|| format!("token#{}", self.0))
    }
}

impl fmt::Debug for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Returns the fixed name of a built-in tag.
fn builtin_name(ty: TokenType) -> Option<&'static str> {
    let name = match ty {
        TokenType::ILLEGAL => "ILLEGAL",
        TokenType::EOF => "EOF",
        TokenType::IDENT => "IDENT",
        TokenType::NUMBER => "NUMBER",
        TokenType::STRING => "STRING",
        TokenType::MACRO => "MACRO",
        TokenType::PARAM => "PARAM",
        TokenType::EQ => "=",
        TokenType::NEQ => "<>",
        TokenType::LT => "<",
        TokenType::LTE => "<=",
        TokenType::GT => ">",
        TokenType::GTE => ">=",
        TokenType::PLUS => "+",
        TokenType::MINUS => "-",
        TokenType::ASTERISK => "*",
        TokenType::SLASH => "/",
        TokenType::PERCENT => "%",
        TokenType::CONCAT => "||",
        TokenType::COMMA => ",",
        TokenType::SEMICOLON => ";",
        TokenType::COLON => ":",
        TokenType::DOUBLE_COLON => "::",
        TokenType::DOT => ".",
        TokenType::LPAREN => "(",
        TokenType::RPAREN => ")",
        TokenType::LBRACKET => "[",
        TokenType::RBRACKET => "]",
        TokenType::LBRACE => "{",
        TokenType::RBRACE => "}",
        TokenType::QUESTION => "?",
        TokenType::SELECT => "SELECT",
        TokenType::FROM => "FROM",
        TokenType::WHERE => "WHERE",
        TokenType::GROUP => "GROUP",
        TokenType::BY => "BY",
        TokenType::HAVING => "HAVING",
        TokenType::ORDER => "ORDER",
        TokenType::LIMIT => "LIMIT",
        TokenType::OFFSET => "OFFSET",
        TokenType::FETCH => "FETCH",
        TokenType::DISTINCT => "DISTINCT",
        TokenType::ALL => "ALL",
        TokenType::AS => "AS",
        TokenType::AND => "AND",
        TokenType::OR => "OR",
        TokenType::NOT => "NOT",
        TokenType::IN => "IN",
        TokenType::BETWEEN => "BETWEEN",
        TokenType::LIKE => "LIKE",
        TokenType::IS => "IS",
        TokenType::NULL => "NULL",
        TokenType::TRUE => "TRUE",
        TokenType::FALSE => "FALSE",
        TokenType::CASE => "CASE",
        TokenType::WHEN => "WHEN",
        TokenType::THEN => "THEN",
        TokenType::ELSE => "ELSE",
        TokenType::END => "END",
        TokenType::CAST => "CAST",
        TokenType::EXISTS => "EXISTS",
        TokenType::UNION => "UNION",
        TokenType::INTERSECT => "INTERSECT",
        TokenType::EXCEPT => "EXCEPT",
        TokenType::JOIN => "JOIN",
        TokenType::INNER => "INNER",
        TokenType::LEFT => "LEFT",
        TokenType::RIGHT => "RIGHT",
        TokenType::FULL => "FULL",
        TokenType::OUTER => "OUTER",
        TokenType::CROSS => "CROSS",
        TokenType::NATURAL => "NATURAL",
        TokenType::ON => "ON",
        TokenType::USING => "USING",
        TokenType::WITH => "WITH",
        TokenType::RECURSIVE => "RECURSIVE",
        TokenType::OVER => "OVER",
        TokenType::PARTITION => "PARTITION",
        TokenType::WINDOW => "WINDOW",
        TokenType::ROWS => "ROWS",
        TokenType::RANGE => "RANGE",
        TokenType::GROUPS => "GROUPS",
        TokenType::UNBOUNDED => "UNBOUNDED",
        TokenType::PRECEDING => "PRECEDING",
        TokenType::FOLLOWING => "FOLLOWING",
        TokenType::CURRENT => "CURRENT",
        TokenType::ROW => "ROW",
        TokenType::FILTER => "FILTER",
        TokenType::LATERAL => "LATERAL",
        TokenType::ASC => "ASC",
        TokenType::DESC => "DESC",
        TokenType::NULLS => "NULLS",
        TokenType::FIRST => "FIRST",
        TokenType::LAST => "LAST",
        TokenType::NEXT => "NEXT",
        TokenType::ONLY => "ONLY",
        _ => return None,
    };
    Some(name)
}

/// Attempts to match an already-uppercased word against the built-in
/// keyword table.
pub(crate) fn builtin_keyword(upper: &str) -> Option<TokenType> {
    let ty = match upper {
        "SELECT" => TokenType::SELECT,
        "FROM" => TokenType::FROM,
        "WHERE" => TokenType::WHERE,
        "GROUP" => TokenType::GROUP,
        "BY" => TokenType::BY,
        "HAVING" => TokenType::HAVING,
        "ORDER" => TokenType::ORDER,
        "LIMIT" => TokenType::LIMIT,
        "OFFSET" => TokenType::OFFSET,
        "FETCH" => TokenType::FETCH,
        "DISTINCT" => TokenType::DISTINCT,
        "ALL" => TokenType::ALL,
        "AS" => TokenType::AS,
        "AND" => TokenType::AND,
        "OR" => TokenType::OR,
        "NOT" => TokenType::NOT,
        "IN" => TokenType::IN,
        "BETWEEN" => TokenType::BETWEEN,
        "LIKE" => TokenType::LIKE,
        "IS" => TokenType::IS,
        "NULL" => TokenType::NULL,
        "TRUE" => TokenType::TRUE,
        "FALSE" => TokenType::FALSE,
        "CASE" => TokenType::CASE,
        "WHEN" => TokenType::WHEN,
        "THEN" => TokenType::THEN,
        "ELSE" => TokenType::ELSE,
        "END" => TokenType::END,
        "CAST" => TokenType::CAST,
        "EXISTS" => TokenType::EXISTS,
        "UNION" => TokenType::UNION,
        "INTERSECT" => TokenType::INTERSECT,
        "EXCEPT" => TokenType::EXCEPT,
        "JOIN" => TokenType::JOIN,
        "INNER" => TokenType::INNER,
        "LEFT" => TokenType::LEFT,
        "RIGHT" => TokenType::RIGHT,
        "FULL" => TokenType::FULL,
        "OUTER" => TokenType::OUTER,
        "CROSS" => TokenType::CROSS,
        "NATURAL" => TokenType::NATURAL,
        "ON" => TokenType::ON,
        "USING" => TokenType::USING,
        "WITH" => TokenType::WITH,
        "RECURSIVE" => TokenType::RECURSIVE,
        "OVER" => TokenType::OVER,
        "PARTITION" => TokenType::PARTITION,
        "WINDOW" => TokenType::WINDOW,
        "ROWS" => TokenType::ROWS,
        "RANGE" => TokenType::RANGE,
        "GROUPS" => TokenType::GROUPS,
        "UNBOUNDED" => TokenType::UNBOUNDED,
        "PRECEDING" => TokenType::PRECEDING,
        "FOLLOWING" => TokenType::FOLLOWING,
        "CURRENT" => TokenType::CURRENT,
        "ROW" => TokenType::ROW,
        "FILTER" => TokenType::FILTER,
        "LATERAL" => TokenType::LATERAL,
        "ASC" => TokenType::ASC,
        "DESC" => TokenType::DESC,
        "NULLS" => TokenType::NULLS,
        "FIRST" => TokenType::FIRST,
        "LAST" => TokenType::LAST,
        "NEXT" => TokenType::NEXT,
        "ONLY" => TokenType::ONLY,
        _ => return None,
    };
    Some(ty)
}

// ---------------------------------------------------------------------------
// Dynamic keyword registry
// ---------------------------------------------------------------------------

/// Name↔tag bijection for dynamically registered keywords.
///
/// Writes happen once per distinct name at dialect-registration time; reads
/// run concurrently during every lex, so the map sits behind a
/// reader/writer lock rather than a mutex.
struct KeywordRegistry {
    /// Uppercased name → tag.
    by_name: HashMap<String, TokenType>,
    /// Tag → display spelling from the first registration.
    by_tag: HashMap<u16, String>,
    next: u16,
}

impl KeywordRegistry {
    fn new() -> Self {
        Self {
            by_name: HashMap::new(),
            by_tag: HashMap::new(),
            next: TokenType::DYNAMIC_START,
        }
    }
}

fn registry() -> &'static RwLock<KeywordRegistry> {
    static REGISTRY: OnceLock<RwLock<KeywordRegistry>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(KeywordRegistry::new()))
}

/// Registers a dynamic keyword, returning its tag.
///
/// Idempotent: the same name (case-insensitive) always yields the same tag,
/// no matter which dialect registers it or how often. Names that collide
/// with a built-in keyword return the built-in tag. The spelling of the
/// first registration is kept for display.
pub fn register_keyword(name: &str) -> TokenType {
    let upper = name.to_ascii_uppercase();
    if let Some(ty) = builtin_keyword(&upper) {
        return ty;
    }
    {
        let reg = registry().read().unwrap_or_else(PoisonError::into_inner);
        if let Some(&ty) = reg.by_name.get(&upper) {
            return ty;
        }
    }
    let mut reg = registry().write().unwrap_or_else(PoisonError::into_inner);
    // Re-check: another thread may have registered between the locks.
    if let Some(&ty) = reg.by_name.get(&upper) {
        return ty;
    }
    let ty = TokenType(reg.next);
    reg.next += 1;
    reg.by_name.insert(upper, ty);
    reg.by_tag.insert(ty.raw(), String::from(name));
    tracing::debug!(keyword = name, tag = ty.raw(), "registered dynamic keyword");
    ty
}

/// Looks up a keyword by name, built-in table first, then the registry.
#[must_use]
pub fn lookup_keyword(name: &str) -> Option<TokenType> {
    let upper = name.to_ascii_uppercase();
    if let Some(ty) = builtin_keyword(&upper) {
        return Some(ty);
    }
    let reg = registry().read().unwrap_or_else(PoisonError::into_inner);
    reg.by_name.get(&upper).copied()
}

/// Returns the registered display spelling for a dynamic tag.
#[must_use]
pub fn registered_name(ty: TokenType) -> Option<String> {
    let reg = registry().read().unwrap_or_else(PoisonError::into_inner);
    reg.by_tag.get(&ty.raw()).cloned()
}

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

/// A single token with its literal text and source location.
///
/// `text` holds the semantic text of the token: keywords and identifiers as
/// written (quoted identifiers hold the unescaped inner content), numbers as
/// written, strings including their quotes, macro literals including the
/// `{{ }}` delimiters. `end` is carried explicitly because escape sequences
/// make the end position underivable from `text` alone.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The token tag.
    pub ty: TokenType,
    /// The literal text.
    pub text: String,
    /// Position of the first byte.
    pub pos: Position,
    /// Position just past the last byte.
    pub end: Position,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(ty: TokenType, text: String, pos: Position, end: Position) -> Self {
        Self { ty, text, pos, end }
    }

    /// Returns the source span this token covers.
    #[must_use]
    pub const fn span(&self) -> Span {
        Span::new(self.pos, self.end)
    }

    /// Returns true if this is the EOF token.
    #[must_use]
    pub fn is_eof(&self) -> bool {
        self.ty == TokenType::EOF
    }

    /// Returns true if the token's text matches `word` case-insensitively.
    ///
    /// Used for soft keywords that stay ordinary identifiers everywhere
    /// else (e.g. the `NAME` in `UNION BY NAME`).
    #[must_use]
    pub fn text_is(&self, word: &str) -> bool {
        self.text.eq_ignore_ascii_case(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_keyword_lookup() {
        assert_eq!(builtin_keyword("SELECT"), Some(TokenType::SELECT));
        assert_eq!(builtin_keyword("LATERAL"), Some(TokenType::LATERAL));
        assert_eq!(builtin_keyword("QUALIFY"), None);
    }

    #[test]
    fn test_builtin_names() {
        assert_eq!(TokenType::SELECT.name(), "SELECT");
        assert_eq!(TokenType::CONCAT.name(), "||");
        assert_eq!(TokenType::EOF.name(), "EOF");
    }

    #[test]
    fn test_register_is_idempotent() {
        let a = register_keyword("Qualify");
        let b = register_keyword("QUALIFY");
        let c = register_keyword("qualify");
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert!(a.is_dynamic());
    }

    #[test]
    fn test_register_builtin_returns_builtin() {
        assert_eq!(register_keyword("select"), TokenType::SELECT);
        assert!(!register_keyword("AND").is_dynamic());
    }

    #[test]
    fn test_registered_spelling_preserved() {
        let ty = register_keyword("AsOf_SpellingProbe");
        assert_eq!(ty.name(), "AsOf_SpellingProbe");
        // A later registration under different case does not change it.
        let again = register_keyword("ASOF_SPELLINGPROBE");
        assert_eq!(again, ty);
        assert_eq!(ty.name(), "AsOf_SpellingProbe");
    }

    #[test]
    fn test_lookup_crosses_case() {
        let ty = register_keyword("PiVoT_probe");
        assert_eq!(lookup_keyword("pivot_PROBE"), Some(ty));
        assert_eq!(lookup_keyword("no_such_keyword_xyz"), None);
    }

    #[test]
    fn test_token_span() {
        let tok = Token::new(
            TokenType::IDENT,
            String::from("users"),
            Position::new(1, 8, 7),
            Position::new(1, 13, 12),
        );
        assert_eq!(tok.span().len(), 5);
        assert!(!tok.is_eof());
        assert!(tok.text_is("USERS"));
    }

    #[test]
    fn test_concurrent_registration_single_tag() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| register_keyword("concurrent_probe")))
            .collect();
        let tags: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(tags.windows(2).all(|w| w[0] == w[1]));
    }
}
