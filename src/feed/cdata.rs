use std::borrow::Cow;

const CDATA_OPEN: &str = "<![CDATA[";
const CDATA_CLOSE: &str = "]]>";

/// Unwraps the first `<![CDATA[ ... ]]>` section found in `raw`.
///
/// The payload runs from the opener to the first literal `]]>` after it, so
/// stray `]` or `]]` inside the payload are kept. Text without a complete
/// CDATA section is returned unchanged. Never fails and never allocates.
///
/// Real CDATA sections are already unwrapped by the XML reader; this handles
/// feeds that escape the wrapper into plain text (`&lt;![CDATA[...]]&gt;`).
///
/// # Examples
///
/// ```
/// use feedwatch::feed::extract_cdata;
///
/// assert_eq!(extract_cdata("<![CDATA[hello]]>"), "hello");
/// assert_eq!(extract_cdata("plain text"), "plain text");
/// ```
pub fn extract_cdata(raw: &str) -> Cow<'_, str> {
    let Some(open) = raw.find(CDATA_OPEN) else {
        return Cow::Borrowed(raw);
    };
    let payload_start = open + CDATA_OPEN.len();

    match raw[payload_start..].find(CDATA_CLOSE) {
        Some(len) => Cow::Borrowed(&raw[payload_start..payload_start + len]),
        None => Cow::Borrowed(raw),
    }
}
