//! Extraction of inline script constants from the FUT iframe page.
//!
//! The iframe HTML assigns session constants in a `<script>` block:
//!
//! ```text
//! var HOST_DOMAIN = 'http://www.easports.com/';
//! var EASW_ID = '1234567890';
//! ```
//!
//! This is the most version-coupled part of the client; keep all pattern
//! matching here.

use std::sync::LazyLock;

use regex::Regex;

static HOST_DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bHOST_DOMAIN\s*=\s*(?:'([^'\n]*)'|"([^"\n]*)")"#)
        .expect("static regex is valid")
});

static EASW_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bEASW_ID\s*=\s*(?:'([^'\n]*)'|"([^"\n]*)")"#).expect("static regex is valid")
});

/// Extract the `HOST_DOMAIN` string. Returns `None` if absent or empty.
pub fn extract_host_domain(html: &str) -> Option<&str> {
    capture(&HOST_DOMAIN_RE, html)
}

/// Extract the `EASW_ID` application id. Returns `None` if absent or empty.
pub fn extract_app_id(html: &str) -> Option<&str> {
    capture(&EASW_ID_RE, html)
}

fn capture<'h>(re: &Regex, html: &'h str) -> Option<&'h str> {
    let caps = re.captures(html)?;
    let value = caps.get(1).or_else(|| caps.get(2))?.as_str().trim();
    (!value.is_empty()).then_some(value)
}
