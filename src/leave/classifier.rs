use crate::model::leave_request::LeaveCategory;

const MEDICAL_KEYWORDS: &[&str] = &[
    "fever", "doctor", "sick", "ill", "illness", "hospital", "headache", "cold", "covid",
    "infection",
];

const PERSONAL_KEYWORDS: &[&str] = &[
    "marriage", "function", "festival", "personal", "family", "ceremony", "travel",
    "out of station", "hometown",
];

const ACADEMIC_KEYWORDS: &[&str] = &[
    "seminar", "project", "internship", "exam", "examination", "lab", "viva", "workshop",
    "presentation", "hackathon", "hackthon", "coding contest", "coding competition",
    "technical fest", "tech fest",
];

/// Tags a free-text reason. Keyword sets are checked in priority order
/// medical, personal, academic; anything else is `Other`.
///
/// Matching is plain substring matching, so "ill" also hits "skill".
pub fn classify_reason(reason: &str) -> LeaveCategory {
    let text = reason.to_lowercase();
    let hits = |keywords: &[&str]| keywords.iter().any(|k| text.contains(k));

    if hits(MEDICAL_KEYWORDS) {
        LeaveCategory::Medical
    } else if hits(PERSONAL_KEYWORDS) {
        LeaveCategory::Personal
    } else if hits(ACADEMIC_KEYWORDS) {
        LeaveCategory::Academic
    } else {
        LeaveCategory::Other
    }
}
