//! Host extraction and allow-list matching for URLs found in drafts.

/// Characters that commonly trail a URL in prose without being part of it.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '}', '\'', '"'];

/// Strip punctuation that prose wraps around a URL.
pub(crate) fn trim_prose(url: &str) -> &str {
    url.trim_end_matches(TRAILING_PUNCTUATION)
}

/// Lowercase a host and drop a leading `www.` and trailing dot.
pub(crate) fn normalize_host(host: &str) -> Option<String> {
    let host = host.trim().trim_end_matches('.').to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);

    let valid = !host.is_empty()
        && !host.starts_with('.')
        && !host.contains("..")
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.');

    valid.then(|| host.to_string())
}

/// Extract the host of `url`, or `None` if it cannot be determined.
///
/// Accepts URLs with or without a scheme. Userinfo and port are ignored.
pub(crate) fn host_of(url: &str) -> Option<String> {
    let url = url.trim();
    let rest = match url.find("://") {
        Some(idx) => {
            let scheme = &url[..idx];
            let valid_scheme = !scheme.is_empty()
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
            if !valid_scheme {
                return None;
            }
            &url[idx + 3..]
        }
        None => url,
    };

    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = authority.rsplit('@').next().unwrap_or_default();
    let host = match host_port.rsplit_once(':') {
        Some((host, port)) if port.chars().all(|c| c.is_ascii_digit()) => host,
        Some(_) => return None,
        None => host_port,
    };

    normalize_host(host)
}

/// Whether `host` equals an allow-listed domain or is a subdomain of one.
pub(crate) fn is_allowed(host: &str, allowed: &[String]) -> bool {
    allowed.iter().any(|domain| {
        host == domain
            || host
                .strip_suffix(domain.as_str())
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}
