//! Browser engine version detection.

use super::env::Environment;

/// Extracts the Chromium major version from a user agent string.
///
/// The first `Chrome/<major>.` or `Chromium/<major>.` from the left wins;
/// anything else is treated as an untested browser and yields `None`.
pub fn parse_browser_version(user_agent: &str) -> Option<u32> {
    user_agent.match_indices("Chrom").find_map(|(idx, _)| {
        let rest = &user_agent[idx + "Chrom".len()..];
        let tail = rest
            .strip_prefix("e/")
            .or_else(|| rest.strip_prefix("ium/"))?;
        let digits_end = tail
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(tail.len());
        if digits_end > 0 && tail[digits_end..].starts_with('.') {
            tail[..digits_end].parse().ok()
        } else {
            None
        }
    })
}

/// Detects the browser major version, logging when the engine is untested.
pub fn browser_major_version<E: Environment + ?Sized>(env: &E) -> Option<u32> {
    let user_agent = match env.user_agent() {
        Ok(ua) => ua,
        Err(e) => {
            tracing::warn!(error = %e, "unable to read user agent - using more modern defaults");
            return None;
        }
    };
    let version = parse_browser_version(&user_agent);
    if version.is_none() {
        tracing::warn!(
            user_agent = %user_agent,
            "unsupported / untested browser detected - using more modern defaults"
        );
    }
    version
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chrome() {
        let ua = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/136.0.0.0 Safari/537.36";
        assert_eq!(parse_browser_version(ua), Some(136));
    }

    #[test]
    fn test_parse_chromium() {
        let ua = "Mozilla/5.0 (X11; Linux x86_64) Chromium/129.0.6668.58 Safari/537.36";
        assert_eq!(parse_browser_version(ua), Some(129));
    }

    #[test]
    fn test_parse_leftmost_marker_wins() {
        let ua = "Mozilla/5.0 (X11; Linux x86_64) Chromium/120.0.6099.71 Chrome/138.0.0.0 Safari/537.36";
        assert_eq!(parse_browser_version(ua), Some(120));
        let ua = "Mozilla/5.0 Chrome/ Chromium/131.0.0.0";
        assert_eq!(parse_browser_version(ua), Some(131));
    }

    #[test]
    fn test_parse_edge_reports_chrome_version() {
        let ua = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/138.0.0.0 Safari/537.36 Edg/138.0.0.0";
        assert_eq!(parse_browser_version(ua), Some(138));
    }

    #[test]
    fn test_parse_other_browsers() {
        let firefox = "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";
        assert_eq!(parse_browser_version(firefox), None);
        assert_eq!(parse_browser_version(""), None);
        assert_eq!(parse_browser_version("Chrome/"), None);
        assert_eq!(parse_browser_version("Chrome/12"), None);
    }
}
