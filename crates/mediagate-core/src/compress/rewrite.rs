//! Template URL rewrite

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Per-call image options: the template URL and its overrides.
///
/// ```json
/// {
///   "url": "http://static.thefair.net.cn/product/{$id}/{$name}.jpg",
///   "rules": { "id": "42", "name": "cover" },
///   "custom": { "640": "http://static.thefair.net.cn/special/url.jpg" },
///   "custom_compress_rate": 0.5
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressOptions {
    /// Template containing `{$name}` placeholders
    pub url: String,
    /// Placeholder name -> replacement value
    pub rules: BTreeMap<String, String>,
    /// Breakpoint -> literal URL used instead of the template
    pub custom: BTreeMap<u32, String>,
    /// Multiplier applied on top of the configured ratio
    pub custom_compress_rate: Option<f64>,
}

impl CompressOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn rule(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.rules.insert(name.into(), value.into());
        self
    }

    pub fn custom(mut self, breakpoint: u32, url: impl Into<String>) -> Self {
        self.custom.insert(breakpoint, url.into());
        self
    }

    pub fn compress_rate(mut self, rate: f64) -> Self {
        self.custom_compress_rate = Some(rate);
        self
    }

    /// The uniform multiplier; absent or zero means no extra compression.
    pub fn rate(&self) -> f64 {
        match self.custom_compress_rate {
            Some(rate) if rate != 0.0 => rate,
            _ => 1.0,
        }
    }

    /// The URL to transform for `breakpoint`, or an empty string when neither a
    /// custom override nor a template is available.
    pub fn base_url(&self, breakpoint: u32) -> String {
        match self.custom.get(&breakpoint) {
            Some(url) if !url.is_empty() => url.clone(),
            _ => replace_placeholders(&self.url, &self.rules),
        }
    }
}

/// Replace every `{$name}` token with its value. Unknown tokens stay as they are.
pub fn replace_placeholders(template: &str, rules: &BTreeMap<String, String>) -> String {
    rules.iter().fold(template.to_string(), |url, (name, value)| {
        url.replace(&format!("{{${}}}", name), value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_placeholders() {
        let rules = BTreeMap::from([
            ("key1".to_string(), "value1".to_string()),
            ("key2".to_string(), "value2".to_string()),
        ]);
        assert_eq!(
            replace_placeholders("http://demo.host/{$key1}/{$key2}/{$key1}_{$key3}.jpg", &rules),
            "http://demo.host/value1/value2/value1_{$key3}.jpg"
        );
    }

    #[test]
    fn test_custom_override_takes_precedence() {
        let options = CompressOptions::new("http://demo.host/{$id}.jpg")
            .rule("id", "7")
            .custom(640, "http://demo.host/special.jpg")
            .custom(750, "");

        assert_eq!(options.base_url(640), "http://demo.host/special.jpg");
        assert_eq!(options.base_url(750), "http://demo.host/7.jpg");
        assert_eq!(options.base_url(320), "http://demo.host/7.jpg");
    }

    #[test]
    fn test_empty_template() {
        assert_eq!(CompressOptions::default().base_url(640), "");
    }

    #[test]
    fn test_rate_defaults() {
        assert_eq!(CompressOptions::default().rate(), 1.0);
        assert_eq!(CompressOptions::default().compress_rate(0.0).rate(), 1.0);
        assert_eq!(CompressOptions::default().compress_rate(0.5).rate(), 0.5);
    }

    #[test]
    fn test_options_from_json() {
        let options: CompressOptions = serde_json::from_str(
            r#"{ "url": "http://a/{$x}.jpg", "rules": { "x": "1" }, "custom": { "640": "http://b.jpg" } }"#,
        )
        .unwrap();
        assert_eq!(options.custom.get(&640).map(String::as_str), Some("http://b.jpg"));
        assert_eq!(options.rate(), 1.0);
    }
}
