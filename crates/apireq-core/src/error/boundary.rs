/// Declares how one error type converts into another at a crate boundary.
///
/// Expands to a `From` implementation, so `?` converts the inner error
/// without a `map_err()` at every call site.
///
/// # Syntax
///
/// ```ignore
/// error_boundary!(SourceError => TargetError, |err_var| {
///     // conversion logic returning TargetError
/// });
/// ```
///
/// # Example
///
/// ```
/// use apireq_core::error_boundary;
///
/// #[derive(Debug, thiserror::Error)]
/// enum HeaderError {
///     #[error("header value is not UTF-8: {0}")]
///     Encoding(String),
/// }
///
/// error_boundary!(std::str::Utf8Error => HeaderError, |e| {
///     HeaderError::Encoding(e.to_string())
/// });
///
/// fn header_text(raw: &[u8]) -> Result<&str, HeaderError> {
///     Ok(std::str::from_utf8(raw)?)
/// }
///
/// assert!(header_text(&[0xff, 0xfe]).is_err());
/// ```
#[macro_export]
macro_rules! error_boundary {
    ($inner:ty => $outer:ty, |$err:ident| $body:expr) => {
        impl ::std::convert::From<$inner> for $outer {
            fn from($err: $inner) -> $outer {
                $body
            }
        }
    };
}
