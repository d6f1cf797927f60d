//! Pure rendering of diagnosis results.

use serde::{Deserialize, Serialize};

use crate::model::DiagnosisResult;

pub const HIGH_SEVERITY_MIN: f64 = 90.0;
pub const MODERATE_SEVERITY_MIN: f64 = 75.0;
pub const MILD_SEVERITY_MIN: f64 = 60.0;

const GENERIC_ADVICE: &str = "This is an AI-generated result. Please consult a medical professional to interpret the findings and receive appropriate care.";

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    Normal,
    DiabeticRetinopathy,
    Glaucoma,
    Cataract,
    Amd,
    Other(String),
}

impl Condition {
    /// Exact match on the labels the classifier emits; anything else is `Other`.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            "Normal" => Self::Normal,
            "Diabetic Retinopathy" => Self::DiabeticRetinopathy,
            "Glaucoma" => Self::Glaucoma,
            "Cataract" => Self::Cataract,
            "AMD" => Self::Amd,
            other => Self::Other(other.to_string()),
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Normal => "Normal",
            Self::DiabeticRetinopathy => "Diabetic Retinopathy",
            Self::Glaucoma => "Glaucoma",
            Self::Cataract => "Cataract",
            Self::Amd => "AMD",
            Self::Other(label) => label,
        }
    }

    #[must_use]
    pub const fn tone(&self) -> Tone {
        match self {
            Self::Normal => Tone::Green,
            Self::DiabeticRetinopathy => Tone::Red,
            Self::Glaucoma => Tone::Yellow,
            Self::Cataract => Tone::Blue,
            Self::Amd => Tone::Purple,
            Self::Other(_) => Tone::Gray,
        }
    }

    #[must_use]
    pub const fn icon(&self) -> ConditionIcon {
        match self {
            Self::Normal => ConditionIcon::Check,
            Self::DiabeticRetinopathy | Self::Glaucoma | Self::Cataract | Self::Amd => {
                ConditionIcon::Warning
            }
            Self::Other(_) => ConditionIcon::Unknown,
        }
    }

    #[must_use]
    pub const fn is_normal(&self) -> bool {
        matches!(self, Self::Normal)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Green,
    Red,
    Yellow,
    Blue,
    Purple,
    Gray,
}

impl Tone {
    /// Badge classes used by the result card and history rows.
    #[must_use]
    pub const fn badge_class(self) -> &'static str {
        match self {
            Self::Green => "bg-green-100 text-green-800 border-green-200",
            Self::Red => "bg-red-100 text-red-800 border-red-200",
            Self::Yellow => "bg-yellow-100 text-yellow-800 border-yellow-200",
            Self::Blue => "bg-blue-100 text-blue-800 border-blue-200",
            Self::Purple => "bg-purple-100 text-purple-800 border-purple-200",
            Self::Gray => "bg-gray-100 text-gray-800 border-gray-200",
        }
    }

    /// Chart colour on the dashboard.
    #[must_use]
    pub const fn hex(self) -> &'static str {
        match self {
            Self::Green => "#10B981",
            Self::Red => "#EF4444",
            Self::Yellow => "#F59E0B",
            Self::Blue => "#3B82F6",
            Self::Purple => "#8B5CF6",
            Self::Gray => "#6B7280",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionIcon {
    Check,
    Warning,
    Unknown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    High,
    Moderate,
    Mild,
    VeryMild,
}

impl Severity {
    /// Unparseable confidence lands in the lowest bucket.
    #[must_use]
    pub fn from_confidence(confidence: &str) -> Self {
        match parse_percentage(confidence) {
            Some(v) if v >= HIGH_SEVERITY_MIN => Self::High,
            Some(v) if v >= MODERATE_SEVERITY_MIN => Self::Moderate,
            Some(v) if v >= MILD_SEVERITY_MIN => Self::Mild,
            _ => Self::VeryMild,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High severity",
            Self::Moderate => "Moderate severity",
            Self::Mild => "Mild severity",
            Self::VeryMild => "Very mild severity",
        }
    }
}

/// Reads the leading decimal number of a percentage-like string ("82.50%" -> 82.5).
#[must_use]
pub fn parse_percentage(text: &str) -> Option<f64> {
    let trimmed = text.trim_start();
    let end = trimmed
        .char_indices()
        .take_while(|&(i, c)| {
            c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+'))
        })
        .map(|(i, c)| i + c.len_utf8())
        .last()?;

    let mut candidate = &trimmed[..end];
    // "12.5.3" reads as 12.5, like a float literal prefix.
    while !candidate.is_empty() {
        if let Ok(v) = candidate.parse::<f64>() {
            return v.is_finite().then_some(v);
        }
        candidate = &candidate[..candidate.len() - 1];
    }
    None
}

// The advisory table predates the current label set: the severity-style keys
// below are what an earlier classifier emitted and never match the five
// retinal labels. Both are kept; see DESIGN.md.
fn advisory_for_key(key: &str) -> Option<&'static str> {
    let text = match key {
        "normal" => "No signs of retinal disease were detected. Keep up routine eye examinations, ideally once a year, to catch any changes early.",
        "diabeticretinopathy" => "Signs of diabetic retinopathy were detected. Please see an ophthalmologist soon and keep blood sugar, blood pressure and cholesterol under close control.",
        "glaucoma" => "Signs consistent with glaucoma were detected. Schedule an eye-pressure and optic nerve assessment with an ophthalmologist; early treatment helps preserve vision.",
        "cataract" => "Signs of cataract were detected. Consult an eye specialist to assess how it affects your vision and whether surgery should be considered.",
        "amd" => "Signs of age-related macular degeneration were detected. Please arrange a specialist retinal examination promptly and report any sudden change in central vision.",
        "healthy" => "Great news! No signs of disease were detected. Continue maintaining a healthy lifestyle, balanced diet, and regular health check-ups to stay on track.",
        "milddisease" => "Mild abnormalities were detected. While it’s not urgent, you should consult your doctor to understand the cause and prevent any future complications.",
        "moderatedisease" => "Moderate health indicators have been found. It’s important to consult a healthcare provider soon for a proper diagnosis, management plan, and lifestyle guidance.",
        "severedisease" => "Serious signs of disease have been detected. Please schedule an appointment with a specialist immediately for a thorough examination and timely treatment.",
        "heartattack" => "⚠️ Urgent: Signs consistent with a possible heart attack have been identified. Seek **emergency medical attention** without delay — call your local emergency number or go to the nearest hospital.",
        _ => return None,
    };
    Some(text)
}

/// Lower-cased with whitespace removed, so "Diabetic Retinopathy" keys as
/// `diabeticretinopathy`.
#[must_use]
pub fn advisory_key(prediction: &str) -> String {
    prediction
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

#[must_use]
pub fn advisory(prediction: &str) -> &'static str {
    advisory_for_key(&advisory_key(prediction)).unwrap_or(GENERIC_ADVICE)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultCard {
    pub prediction: String,
    pub confidence: String,
    /// CSS width for the confidence bar, clamped to 0..=100 percent.
    pub confidence_bar_percent: f64,
    pub tone: Tone,
    pub badge_class: String,
    pub icon: ConditionIcon,
    /// Absent for a Normal prediction.
    pub severity: Option<String>,
    pub advisory: String,
}

#[must_use]
pub fn present(result: &DiagnosisResult) -> ResultCard {
    let condition = Condition::from_label(&result.prediction);
    let tone = condition.tone();

    ResultCard {
        prediction: result.prediction.clone(),
        confidence: result.confidence.clone(),
        confidence_bar_percent: parse_percentage(&result.confidence)
            .map_or(0.0, |v| v.clamp(0.0, 100.0)),
        tone,
        badge_class: tone.badge_class().to_string(),
        icon: condition.icon(),
        severity: (!condition.is_normal())
            .then(|| Severity::from_confidence(&result.confidence).label().to_string()),
        advisory: advisory(&result.prediction).to_string(),
    }
}
