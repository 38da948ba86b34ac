//! Static suggestion lookup: maps detected issue labels to recommended
//! municipal actions. Pure, no side effects.

use crate::types::{Detection, IssueLabel};

/// Recommended action for a single issue category.
pub fn action_for(label: IssueLabel) -> &'static str {
    match label {
        IssueLabel::Pothole => {
            "Schedule road maintenance to fill the pothole and inspect the surrounding asphalt."
        }
        IssueLabel::Graffiti => {
            "Dispatch a cleaning crew to remove the graffiti and assess the wall surface."
        }
    }
}

/// Combined suggestion text for one upload's detections.
///
/// Repeated labels contribute their action once; order follows first
/// occurrence in the detection list.
pub fn suggestions_for(detections: &[Detection]) -> String {
    if detections.is_empty() {
        return "No issues detected.".to_string();
    }
    let mut seen: Vec<IssueLabel> = Vec::new();
    let mut parts: Vec<&str> = Vec::new();
    for d in detections {
        if !seen.contains(&d.label) {
            seen.push(d.label);
            parts.push(action_for(d.label));
        }
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_detections_yield_placeholder() {
        assert_eq!(suggestions_for(&[]), "No issues detected.");
    }

    #[test]
    fn repeated_labels_are_deduplicated() {
        let detections = vec![
            Detection {
                label: IssueLabel::Pothole,
                confidence: 0.9,
            },
            Detection {
                label: IssueLabel::Pothole,
                confidence: 0.7,
            },
            Detection {
                label: IssueLabel::Graffiti,
                confidence: 0.6,
            },
        ];
        let text = suggestions_for(&detections);
        assert_eq!(text.matches("pothole").count(), 1);
        assert!(text.contains("graffiti"));
    }
}
