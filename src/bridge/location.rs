use parking_lot::Mutex;
use url::Url;

/// The page's address bar.
pub trait PageLocation: Send + Sync {
    fn url(&self) -> Url;
    /// Swaps the visible address without navigating or adding a history entry.
    fn replace_url(&self, url: Url);
}

/// An address bar held in memory, used outside a browser and in tests.
#[derive(Debug)]
pub struct MemoryLocation {
    current: Mutex<Url>,
    replacements: Mutex<usize>,
}

impl MemoryLocation {
    pub fn new(url: Url) -> Self {
        MemoryLocation {
            current: Mutex::new(url),
            replacements: Mutex::new(0),
        }
    }

    pub fn parse(url: &str) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(url)?))
    }

    /// How many times the address has been replaced.
    pub fn replacements(&self) -> usize {
        *self.replacements.lock()
    }
}

impl PageLocation for MemoryLocation {
    fn url(&self) -> Url {
        self.current.lock().clone()
    }

    fn replace_url(&self, url: Url) {
        *self.current.lock() = url;
        *self.replacements.lock() += 1;
    }
}

/// Value of the first occurrence of query parameter `name`, or `None` if
/// the parameter is missing or that first value is empty.
pub fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// `url` with every occurrence of query parameter `name` removed. Other
/// parameters and the fragment are kept; an empty query is dropped.
pub fn without_param(url: &Url, name: &str) -> Url {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != name)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut stripped = url.clone();
    if kept.is_empty() {
        stripped.set_query(None);
    } else {
        stripped.query_pairs_mut().clear().extend_pairs(kept);
    }
    stripped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_query_param_ignores_empty_values() {
        assert_eq!(
            query_param(&url("https://x.io/?credential=abc"), "credential").as_deref(),
            Some("abc")
        );
        assert_eq!(query_param(&url("https://x.io/?credential="), "credential"), None);
        assert_eq!(query_param(&url("https://x.io/"), "credential"), None);
    }

    #[test]
    fn test_query_param_only_considers_first_occurrence() {
        assert_eq!(
            query_param(&url("https://x.io/?credential=&credential=abc"), "credential"),
            None
        );
        assert_eq!(
            query_param(&url("https://x.io/?credential=abc&credential=def"), "credential")
                .as_deref(),
            Some("abc")
        );
    }

    #[test]
    fn test_without_param_drops_empty_query() {
        let stripped = without_param(&url("https://x.io/page?credential=abc"), "credential");
        assert_eq!(stripped.as_str(), "https://x.io/page");
    }

    #[test]
    fn test_without_param_keeps_other_params_and_fragment() {
        let stripped = without_param(
            &url("https://x.io/?utm_source=ad&credential=abc#beta-signup"),
            "credential",
        );
        assert_eq!(stripped.as_str(), "https://x.io/?utm_source=ad#beta-signup");
    }

    #[test]
    fn test_memory_location_counts_replacements() {
        let location = MemoryLocation::parse("https://x.io/?a=1").unwrap();
        location.replace_url(url("https://x.io/"));
        assert_eq!(location.url().as_str(), "https://x.io/");
        assert_eq!(location.replacements(), 1);
    }
}
