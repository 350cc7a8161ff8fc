use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// What kind of content a slide carries. Only `Video` changes engine
/// behavior (playback can wait for the video's end instead of a timer);
/// the rest is informational for the host renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlideKind {
    #[default]
    Text,
    Image,
    Mixed,
    Video,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slide {
    /// Immutable once created. The host generates ids; the engine never does.
    pub id: String,

    /// Stable sort key within its container. Renumbered contiguously from 0
    /// after every reorder.
    pub order: usize,

    #[serde(default)]
    pub kind: SlideKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Hidden slides are skipped by the visibility filter regardless of
    /// conditions.
    #[serde(default = "default_true")]
    pub visible: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timing: Option<TimingConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional: Option<ConditionalConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoConfig>,
}

fn default_true() -> bool {
    true
}

impl Slide {
    pub fn new(id: impl Into<String>, order: usize) -> Self {
        Self {
            id: id.into(),
            order,
            kind: SlideKind::Text,
            title: None,
            subtitle: None,
            content: None,
            visible: true,
            timing: None,
            conditional: None,
            group_id: None,
            video: None,
        }
    }

    /// Rough reading-time weight used by the "auto" duration heuristic:
    /// body text counts once, the title twice.
    pub fn content_length_estimate(&self) -> usize {
        let content = self.content.as_deref().map_or(0, str::len);
        let title = self.title.as_deref().map_or(0, str::len);
        content + title * 2
    }
}

/// Per-slide (or global) autoplay timing. `duration` stores raw user intent;
/// clamping into the legal range happens at resolution time only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    pub duration: SlideDuration,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_duration: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_duration: Option<f64>,

    #[serde(default)]
    pub transition_policy: TransitionPolicy,

    #[serde(default = "default_true")]
    pub pause_on_hover: bool,

    #[serde(default = "default_true")]
    pub pause_on_interaction: bool,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            duration: SlideDuration::Seconds(5.0),
            min_duration: None,
            max_duration: None,
            transition_policy: TransitionPolicy::Immediate,
            pause_on_hover: true,
            pause_on_interaction: true,
        }
    }
}

/// Either a fixed number of seconds or `"auto"` (content-length driven).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SlideDuration {
    Seconds(f64),
    Auto(AutoMarker),
}

/// Serializes as the literal string `"auto"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AutoMarker {
    Auto,
}

impl SlideDuration {
    pub const AUTO: SlideDuration = SlideDuration::Auto(AutoMarker::Auto);

    pub fn is_auto(&self) -> bool {
        matches!(self, SlideDuration::Auto(_))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionPolicy {
    #[default]
    Immediate,
    AfterTransition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoConfig {
    pub url: String,

    /// `Full` makes playback wait for the video's `ended` signal instead of
    /// arming a timer.
    #[serde(default)]
    pub duration: VideoDuration,

    #[serde(default = "default_true")]
    pub muted: bool,

    #[serde(default)]
    pub loop_video: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VideoDuration {
    #[default]
    Timed,
    Full,
}

/// Runtime visibility rules for a slide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionalConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub conditions: Vec<Condition>,

    /// When false, a failing slide is replaced by its fallback (if any)
    /// instead of being dropped from the sequence.
    #[serde(default = "default_true")]
    pub hide_when_false: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_slide_id: Option<String>,
}

/// One rule in a conditional chain. `logic` combines this condition with the
/// accumulated result of everything to its left; the first condition's
/// `logic` is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(rename = "type")]
    pub kind: ConditionKind,

    pub operator: ConditionOperator,

    #[serde(with = "serde_yaml::with::singleton_map")]
    pub value: ConditionValue,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logic: Option<LogicOp>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConditionKind {
    DateRange,
    TimeRange,
    DeviceType,
    ScreenSize,
    UserRole,
    Language,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConditionOperator {
    Is,
    IsNot,
    Contains,
    Within,
    Outside,
    AtLeast,
    AtMost,
}

/// Type-dependent payload for a condition. A payload that does not match its
/// condition's `type` makes that single condition evaluate to false; it never
/// aborts the whole chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConditionValue {
    DateRange {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start: Option<NaiveDate>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        end: Option<NaiveDate>,
    },
    TimeRange {
        start: NaiveTime,
        end: NaiveTime,
    },
    Device(DeviceType),
    ScreenWidth(u32),
    Role(String),
    Language(String),
    Custom {
        key: String,
        value: serde_json::Value,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogicOp {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceType {
    Desktop,
    Tablet,
    Mobile,
}

/// Named, colored, collapsible bucket of slides. Membership here and
/// `Slide::group_id` are kept in sync by every store mutation, never
/// independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideGroup {
    pub id: String,
    pub name: String,
    pub color: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub slides: Vec<String>,

    pub order: usize,

    #[serde(default)]
    pub collapsed: bool,
}

impl SlideGroup {
    pub fn new(id: impl Into<String>, name: impl Into<String>, order: usize) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: "#8890a0".to_string(),
            description: None,
            slides: Vec::new(),
            order,
            collapsed: false,
        }
    }
}
