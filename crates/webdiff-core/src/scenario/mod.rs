//! Scenario construction: merge the default template with per-page fields.

mod backstop;

pub use backstop::BackstopConfig;

use std::collections::HashSet;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::headers::Headers;
use crate::label::{relabel, truncate_middle_unique, LabelCounter, DEFAULT_LABEL_MAX_LEN};

/// Keys set per page; they always win over template fields of the same name.
const COMPUTED_KEYS: [&str; 4] = ["label", "url", "referenceUrl", "headers"];

/// One page comparison, in the shape the engine reads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scenario {
    /// Template fields other than the computed ones.
    #[serde(flatten)]
    pub template: Map<String, Value>,
    pub label: String,
    pub url: String,
    #[serde(rename = "referenceUrl")]
    pub reference_url: String,
    /// Extra request headers; serialized as `false` when absent.
    #[serde(serialize_with = "headers_or_false")]
    pub headers: Option<Headers>,
}

fn headers_or_false<S: Serializer>(headers: &Option<Headers>, s: S) -> Result<S::Ok, S::Error> {
    match headers {
        Some(h) => h.serialize(s),
        None => s.serialize_bool(false),
    }
}

/// Builds scenarios for one run. Owns the label counter and the set of labels
/// already issued, so no two scenarios it builds share a label.
#[derive(Debug)]
pub struct ScenarioBuilder<'a> {
    template: &'a Map<String, Value>,
    test_origin: &'a str,
    reference_origin: &'a str,
    headers: Option<&'a Headers>,
    label_max_len: usize,
    counter: LabelCounter,
    issued: HashSet<String>,
}

impl<'a> ScenarioBuilder<'a> {
    /// A skipped environment is passed as an empty origin, so its URLs are
    /// the bare page paths.
    pub fn new(
        template: &'a Map<String, Value>,
        test_origin: &'a str,
        reference_origin: &'a str,
    ) -> Self {
        Self {
            template,
            test_origin,
            reference_origin,
            headers: None,
            label_max_len: DEFAULT_LABEL_MAX_LEN,
            counter: LabelCounter::new(),
            issued: HashSet::new(),
        }
    }

    pub fn headers(mut self, headers: Option<&'a Headers>) -> Self {
        self.headers = headers;
        self
    }

    pub fn label_max_len(mut self, max_len: usize) -> Self {
        self.label_max_len = max_len;
        self
    }

    /// Bounded label for `path`, re-marked until it differs from every label
    /// issued so far (the same path on two hosts, or a short path that looks
    /// like an earlier truncation).
    fn unique_label(&mut self, path: &str) -> String {
        let mut label = truncate_middle_unique(path, self.label_max_len, &mut self.counter);
        while self.issued.contains(&label) {
            label = relabel(path, self.label_max_len, &mut self.counter);
        }
        if label != path {
            tracing::debug!(path, %label, "label differs from path");
        }
        self.issued.insert(label.clone());
        label
    }

    /// Builds the scenario for a single page path.
    pub fn build(&mut self, path: &str) -> Scenario {
        let mut template = self.template.clone();
        for key in COMPUTED_KEYS {
            template.remove(key);
        }
        Scenario {
            template,
            label: self.unique_label(path),
            url: format!("{}{}", self.test_origin, path),
            reference_url: format!("{}{}", self.reference_origin, path),
            headers: self.headers.cloned(),
        }
    }

    /// One scenario per path, in order.
    pub fn build_all<S: AsRef<str>>(&mut self, paths: &[S]) -> Vec<Scenario> {
        paths.iter().map(|p| self.build(p.as_ref())).collect()
    }
}
