//! Result generator - synthesizes the output document for a task record
//!
//! Pure function of the record and the assigned agent's definition: no
//! clock reads, no randomness, so regenerating for the same task produces
//! an identical artifact. The quality/efficiency numbers are an explicit
//! heuristic (payload completeness plus specialization fit), labelled as
//! such on the artifact.

use crate::agents::{AgentRecord, Archetype};
use crate::artifacts::{OutputArtifact, SCORE_METHOD};
use crate::tasks::types::TaskRecord;

pub fn generate(record: &TaskRecord, agent: Option<&AgentRecord>) -> OutputArtifact {
    let (quality_score, efficiency_score) = heuristic_scores(record, agent);

    OutputArtifact {
        task_id: record.id,
        task_type: record.task_type.clone(),
        archetype: record.archetype,
        agent_id: record.assigned_agent_id.clone(),
        title: format!("{} report for task {}", record.archetype, record.id),
        insights: insights_for(record, agent),
        recommendations: recommendations_for(record),
        quality_score,
        efficiency_score,
        score_method: SCORE_METHOD.to_string(),
        generated_at: record.created_at,
    }
}

/// Deterministic placeholder scoring: payload completeness plus how well
/// the assigned agent fits the work. Capped below 100 on purpose.
fn heuristic_scores(record: &TaskRecord, agent: Option<&AgentRecord>) -> (u32, u32) {
    let payload_fields = record
        .payload
        .as_object()
        .map(|o| o.len())
        .unwrap_or(0);
    let payload_bonus = (payload_fields.min(5) * 4) as u32;

    let archetype_match = agent.map(|a| a.archetype == record.archetype).unwrap_or(false);
    let specialization_hits = agent
        .map(|a| {
            a.specialization
                .iter()
                .filter(|s| {
                    let s = s.to_lowercase();
                    let t = record.task_type.to_lowercase();
                    s.contains(&t) || t.contains(s.as_str())
                })
                .count()
        })
        .unwrap_or(0);

    let quality = 58
        + payload_bonus
        + if archetype_match { 12 } else { 0 }
        + (specialization_hits.min(2) as u32) * 4;

    let efficiency = 64
        + if agent.is_some() { 10 } else { 0 }
        + payload_bonus.min(12)
        + if archetype_match { 8 } else { 0 };

    (quality.min(98), efficiency.min(98))
}

fn insights_for(record: &TaskRecord, agent: Option<&AgentRecord>) -> Vec<String> {
    let fields = record
        .payload
        .as_object()
        .map(|o| o.len())
        .unwrap_or(0);

    let mut insights = vec![match record.archetype {
        Archetype::Auditor => format!(
            "Reviewed the {} request against {} supplied input field(s)",
            record.task_type, fields
        ),
        Archetype::Builder => format!(
            "Assembled a deliverable outline for the {} request from {} input field(s)",
            record.task_type, fields
        ),
        Archetype::Caretaker => format!(
            "Checked operational health for the {} request; {} parameter(s) inspected",
            record.task_type, fields
        ),
        Archetype::Director => format!(
            "Sequenced the {} request into an execution order across {} input field(s)",
            record.task_type, fields
        ),
        Archetype::Negotiator => format!(
            "Mapped stakeholder positions for the {} request using {} input field(s)",
            record.task_type, fields
        ),
        Archetype::Scout => format!(
            "Surveyed the landscape for the {} request; {} lead(s) taken from the input",
            record.task_type, fields
        ),
        Archetype::Synthesizer => format!(
            "Combined {} input field(s) into a unified view of the {} request",
            fields, record.task_type
        ),
    }];

    match agent {
        Some(agent) if !agent.specialization.is_empty() => {
            insights.push(format!(
                "Handled by {} (focus: {})",
                agent.id,
                agent.specialization.join(", ")
            ));
        }
        Some(agent) => insights.push(format!("Handled by {}", agent.id)),
        None => insights.push("No agent definition was available for attribution".to_string()),
    }

    insights
}

fn recommendations_for(record: &TaskRecord) -> Vec<String> {
    let mut recs = vec![format!(
        "Route follow-up {} work through the {} pool",
        record.task_type, record.archetype
    )];
    if record
        .payload
        .as_object()
        .map(|o| o.is_empty())
        .unwrap_or(true)
    {
        recs.push("Supply request parameters next time to sharpen the output".to_string());
    }
    recs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::types::TaskStatus;
    use chrono::Utc;
    use serde_json::json;

    fn record(task_type: &str, archetype: Archetype, payload: serde_json::Value) -> TaskRecord {
        TaskRecord {
            id: 7,
            task_type: task_type.to_string(),
            archetype,
            assigned_agent_id: Some("auditor-01".to_string()),
            status: TaskStatus::Assigned,
            payload,
            result: None,
            error: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    fn auditor() -> AgentRecord {
        AgentRecord {
            id: "auditor-01".to_string(),
            archetype: Archetype::Auditor,
            specialization: vec!["analysis".to_string(), "risk review".to_string()],
            status: "Active".to_string(),
        }
    }

    #[test]
    fn test_generate_is_deterministic() {
        let record = record("analysis", Archetype::Auditor, json!({"scope": "q3"}));
        let agent = auditor();

        let first = generate(&record, Some(&agent));
        let second = generate(&record, Some(&agent));
        assert_eq!(first, second);
    }

    #[test]
    fn test_artifact_echoes_record_fields() {
        let record = record("analysis", Archetype::Auditor, json!({"scope": "q3"}));
        let artifact = generate(&record, Some(&auditor()));

        assert_eq!(artifact.task_id, 7);
        assert_eq!(artifact.task_type, "analysis");
        assert_eq!(artifact.archetype, Archetype::Auditor);
        assert_eq!(artifact.agent_id.as_deref(), Some("auditor-01"));
        assert_eq!(artifact.generated_at, record.created_at);
        assert_eq!(artifact.score_method, SCORE_METHOD);
    }

    #[test]
    fn test_scores_stay_in_range() {
        let rich = record(
            "analysis",
            Archetype::Auditor,
            json!({"a":1,"b":2,"c":3,"d":4,"e":5,"f":6,"g":7}),
        );
        let bare = record("mystery", Archetype::Synthesizer, json!({}));

        for (rec, agent) in [(rich, Some(auditor())), (bare, None)] {
            let artifact = generate(&rec, agent.as_ref());
            assert!(artifact.quality_score <= 100);
            assert!(artifact.efficiency_score <= 100);
            assert!(artifact.quality_score >= 50);
            assert!(artifact.efficiency_score >= 50);
        }
    }

    #[test]
    fn test_matched_specialist_scores_higher_than_fallback() {
        let rec = record("analysis", Archetype::Auditor, json!({"scope": "q3"}));
        let specialist = generate(&rec, Some(&auditor()));

        let outsider = AgentRecord {
            id: "builder-01".to_string(),
            archetype: Archetype::Builder,
            specialization: vec!["content assembly".to_string()],
            status: "Active".to_string(),
        };
        let borrowed = generate(&rec, Some(&outsider));

        assert!(specialist.quality_score > borrowed.quality_score);
    }

    #[test]
    fn test_empty_payload_prompts_recommendation() {
        let rec = record("sales", Archetype::Negotiator, json!({}));
        let artifact = generate(&rec, None);
        assert!(
            artifact
                .recommendations
                .iter()
                .any(|r| r.contains("Supply request parameters"))
        );
    }
}
