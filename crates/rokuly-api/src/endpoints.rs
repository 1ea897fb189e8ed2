// ECP endpoint table and query-string encoding
//
// Templates use positional `%s` placeholders filled left to right. The
// table is built once and handed to the client; nothing mutates it later.

use std::fmt;

use indexmap::IndexMap;
use strum::{Display, EnumIter, IntoEnumIterator};
use url::form_urlencoded;

/// Symbolic name for every ECP operation the client knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum Endpoint {
    AppUi,
    ActiveApp,
    Apps,
    ChannelState,
    DeviceInfo,
    Exit,
    FrameRate,
    Icon,
    Input,
    Install,
    KeyDown,
    KeyPress,
    KeyUp,
    Launch,
    PluginInstall,
    Performance,
    MediaPlayer,
    PluginInspect,
    SgNodes,
    SgNodeRoots,
    TextureMemory,
}

impl Endpoint {
    /// The stock Roku path template for this endpoint.
    pub fn standard_template(self) -> &'static str {
        match self {
            Self::AppUi => "query/app-ui",
            Self::ActiveApp => "query/active-app",
            Self::Apps => "query/apps",
            Self::ChannelState => "query/channel-state/%s",
            Self::DeviceInfo => "query/device-info",
            Self::Exit => "exit-app",
            Self::FrameRate => "query/graphics-frame-rate",
            Self::Icon => "query/icon/%s",
            Self::Input => "input?",
            Self::Install => "install/%s",
            Self::KeyDown => "keydown/%s",
            Self::KeyPress => "keypress/%s",
            Self::KeyUp => "keyup/%s",
            Self::Launch => "launch/%s?contentId=%s&mediaType=%s",
            Self::PluginInstall => "plugin_install",
            Self::Performance => "query/chanperf",
            Self::MediaPlayer => "query/media-player",
            Self::PluginInspect => "plugin_inspect",
            Self::SgNodes => "query/sgnodes/all",
            Self::SgNodeRoots => "query/sgnodes/roots",
            Self::TextureMemory => "query/r2d2-bitmaps",
        }
    }
}

/// Immutable mapping from [`Endpoint`] to URI template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointTable {
    templates: IndexMap<Endpoint, String>,
}

impl EndpointTable {
    /// The templates used by retail and developer-mode Roku firmware.
    pub fn standard() -> Self {
        Self {
            templates: Endpoint::iter()
                .map(|e| (e, e.standard_template().to_owned()))
                .collect(),
        }
    }

    /// Build a table with some templates replaced, e.g. for firmware that
    /// moved an endpoint. Unlisted endpoints keep their standard template.
    pub fn with_overrides(overrides: impl IntoIterator<Item = (Endpoint, String)>) -> Self {
        let mut table = Self::standard();
        for (endpoint, template) in overrides {
            table.templates.insert(endpoint, template);
        }
        table
    }

    /// The raw template for an endpoint.
    pub fn template(&self, endpoint: Endpoint) -> &str {
        self.templates
            .get(&endpoint)
            .map_or_else(|| endpoint.standard_template(), String::as_str)
    }

    /// Render an endpoint's template with positional arguments.
    pub fn render(&self, endpoint: Endpoint, args: &[&str]) -> String {
        format_template(self.template(endpoint), args)
    }

    /// `input?k=v&...`, or plain `input` when there are no params.
    pub fn input_path(&self, params: &QueryParams) -> String {
        let base = self.template(Endpoint::Input);
        let query = params.encode();
        if query.is_empty() {
            base.trim_end_matches(['?', '&']).to_owned()
        } else {
            format!("{base}{query}")
        }
    }

    /// Launch path with the content deeplink plus any extra params appended.
    pub fn launch_path(
        &self,
        channel_id: &str,
        content_id: &str,
        media_type: &str,
        extra: &QueryParams,
    ) -> String {
        let content_id = encode_component(content_id);
        let media_type = encode_component(media_type);
        let mut path = self.render(Endpoint::Launch, &[channel_id, &content_id, &media_type]);
        let query = extra.encode();
        if !query.is_empty() {
            path.push(if path.contains('?') { '&' } else { '?' });
            path.push_str(&query);
        }
        path
    }
}

impl Default for EndpointTable {
    fn default() -> Self {
        Self::standard()
    }
}

fn encode_component(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Replace each `%s` in `template` with the next argument.
///
/// Missing arguments render as the empty string; surplus arguments are dropped.
pub fn format_template(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut rest = template;
    while let Some(idx) = rest.find("%s") {
        out.push_str(&rest[..idx]);
        out.push_str(args.next().copied().unwrap_or(""));
        rest = &rest[idx + 2..];
    }
    out.push_str(rest);
    out
}

// ── Query parameters ─────────────────────────────────────────────────

/// Scalar value carried by a custom input or deeplink parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Ordered key → scalar map serialized as a percent-encoded query string.
///
/// Inserting an existing key replaces its value but keeps its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    entries: IndexMap<String, ParamValue>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> &mut Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// `k=v` pairs joined by `&`, percent-encoded, no trailing separator.
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.entries {
            serializer.append_pair(key, &value.to_string());
        }
        serializer.finish()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn format_fills_placeholders_in_order() {
        assert_eq!(
            format_template("launch/%s?contentId=%s&mediaType=%s", &["dev", "", "movie"]),
            "launch/dev?contentId=&mediaType=movie"
        );
    }

    #[test]
    fn format_drops_extra_args() {
        assert_eq!(format_template("keypress/%s", &["Home", "Up"]), "keypress/Home");
    }

    #[test]
    fn format_renders_missing_args_empty() {
        assert_eq!(
            format_template("launch/%s?contentId=%s&mediaType=%s", &["dev"]),
            "launch/dev?contentId=&mediaType="
        );
    }

    #[test]
    fn format_without_placeholders_is_identity() {
        assert_eq!(format_template("query/apps", &["x"]), "query/apps");
    }

    #[test]
    fn input_path_without_params_strips_separator() {
        let table = EndpointTable::standard();
        assert_eq!(table.input_path(&QueryParams::new()), "input");
    }

    #[test]
    fn input_path_encodes_pairs() {
        let table = EndpointTable::standard();
        let params = QueryParams::new()
            .with("acceleration.x", 0.5)
            .with("touch", true)
            .with("note", "a b&c");
        assert_eq!(
            table.input_path(&params),
            "input?acceleration.x=0.5&touch=true&note=a+b%26c"
        );
    }

    #[test]
    fn encoded_params_decode_to_original_pairs() {
        let params: QueryParams = [
            ("title", "Café & Bar"),
            ("path", "/a/b?c=d"),
            ("empty", ""),
            ("emoji", "🎬"),
        ]
        .into_iter()
        .collect();

        let encoded = params.encode();
        assert!(!encoded.ends_with('&'));

        let decoded: Vec<(String, String)> = form_urlencoded::parse(encoded.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        let original: Vec<(String, String)> = params
            .iter()
            .map(|(k, v)| (k.to_owned(), v.to_string()))
            .collect();
        assert_eq!(decoded, original);
    }

    #[test]
    fn launch_path_appends_extra_params() {
        let table = EndpointTable::standard();
        let extra = QueryParams::new().with("episode", 4_i64).with("resume", false);
        assert_eq!(
            table.launch_path("12", "abc", "episode", &extra),
            "launch/12?contentId=abc&mediaType=episode&episode=4&resume=false"
        );
    }

    #[test]
    fn overrides_replace_only_named_endpoints() {
        let table = EndpointTable::with_overrides([(Endpoint::Apps, "query/apps-v2".to_owned())]);
        assert_eq!(table.template(Endpoint::Apps), "query/apps-v2");
        assert_eq!(table.template(Endpoint::AppUi), "query/app-ui");
    }

    #[test]
    fn reinserting_key_keeps_position() {
        let mut params = QueryParams::new();
        params.insert("a", 1).insert("b", 2).insert("a", 3);
        assert_eq!(params.encode(), "a=3&b=2");
    }
}
