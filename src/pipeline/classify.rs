//! Content classification (tool-log scrubbing + reasoning/answer routing)
//!
//! Engines interleave tool-execution log lines into content text; those are
//! extracted with a single compiled pattern and forwarded as reasoning. The
//! remaining clean text is routed by an ordered keyword rule table: the
//! reasoning markers are checked strictly before the answer markers, and the
//! answer class doubles as the no-match fallback — keyword matching only
//! ever promotes text to reasoning, it never demotes.

use once_cell::sync::Lazy;
use regex::Regex;

/// Tool-execution log lines: `<identifier>(<args>) completed in <float>s.`
pub static TOOL_EXECUTION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z_]+\([^)]*\)\s+completed\s+in\s+[\d.]+\s*s\.")
        .expect("tool execution pattern is valid")
});

/// Markers promoting a fragment to the reasoning stream.
pub const REASONING_MARKERS: &[&str] = &[
    "**Initial Analysis**",
    "**Approach Planning**",
    "**Information Gathering**",
    "**Validation**",
    "**思考**",
    "**推論**",
    "**分析**",
];

/// Markers identifying answer text. Behaviorally identical to the no-match
/// fallback; kept explicit so the rule order stays observable.
pub const ANSWER_MARKERS: &[&str] = &[
    "**Final Synthesis**",
    "**Answer**",
    "**Conclusion**",
    "**回答**",
    "**結論**",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentClass {
    Reasoning,
    Answer,
}

/// Ordered rule table; first containment match wins.
const RULES: &[(&[&str], ContentClass)] = &[
    (REASONING_MARKERS, ContentClass::Reasoning),
    (ANSWER_MARKERS, ContentClass::Answer),
];

/// Classify clean content. With reasoning mode off, everything is answer
/// text; with it on, the rule table applies and `Answer` is the fallback.
pub fn classify(clean_content: &str, reasoning_mode: bool) -> ContentClass {
    if !reasoning_mode {
        return ContentClass::Answer;
    }
    for (markers, class) in RULES {
        if markers.iter().any(|marker| clean_content.contains(marker)) {
            return *class;
        }
    }
    ContentClass::Answer
}

/// Result of scrubbing one content fragment.
#[derive(Debug, Clone)]
pub struct ScrubbedContent {
    /// Every tool-execution log line, in left-to-right order.
    pub fragments: Vec<String>,
    /// The content with all log lines removed.
    pub clean: String,
}

/// Extract tool-execution log lines and remove them from the content.
/// Applying this to already-cleaned content is a no-op.
pub fn scrub_tool_logs(content: &str) -> ScrubbedContent {
    let fragments = TOOL_EXECUTION_PATTERN
        .find_iter(content)
        .map(|m| m.as_str().to_string())
        .collect();
    let clean = TOOL_EXECUTION_PATTERN.replace_all(content, "").into_owned();
    ScrubbedContent { fragments, clean }
}
