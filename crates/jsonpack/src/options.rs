/// Configuration options for the parser.
///
/// # Examples
///
/// ```rust
/// use jsonpack::{Parser, ParserOptions};
///
/// let options = ParserOptions {
///     strict_escapes: true,
///     ..Default::default()
/// };
/// let err = Parser::with_options(br#"{"a":"\x"}"#, options)
///     .parse()
///     .unwrap_err();
/// assert_eq!(err.kind, jsonpack::ErrorKind::StringEscapeSequence);
/// ```
///
/// # Default
///
/// All options default to `false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParserOptions {
    /// Whether to reject escape sequences outside the JSON grammar.
    ///
    /// By default an unrecognized escape letter is taken verbatim (`"\q"`
    /// decodes to `q`), which tolerates informally escaped input. Setting
    /// this makes such an escape a [`StringEscapeSequence`] error.
    ///
    /// [`StringEscapeSequence`]: crate::ErrorKind::StringEscapeSequence
    ///
    /// # Default
    ///
    /// `false`
    pub strict_escapes: bool,
}
