//! Household-explainer prompt assembly.

use fisc_core::EntityDescription;

/// System line sent with every call. The per-request instructions live in the user
/// prompt template below.
pub const SYSTEM_PROMPT: &str =
    "You are an AI assistant explaining tax and benefit policy calculations.";

/// Render the household-explainer prompt.
///
/// Substitutes the target variable, the annotated computation-tree segment (one line
/// per row), the entity description (as JSON, so the model can align vectorized
/// values with entity names), and the specific entity the user cares about.
#[must_use]
pub fn render_prompt(
    variable: &str,
    segment: &[String],
    entity_description: &EntityDescription,
    entity: &str,
) -> String {
    let segment = segment.join("\n");
    let entity_description =
        serde_json::to_string(entity_description).unwrap_or_else(|_| String::from("{}"));
    format!(
        "The user has run a simulation for the variable '{variable}'.\n\
         Here's the computation tree of the calculation:\n\
         {segment}\n\
         Here's an ordered list of the entities in the simulation:\n\
         {entity_description}\n\
         Note that the user is interested in the value associated with entity '{entity}'.\n\
         \n\
         Please explain this result in simple terms. Your explanation should:\n\
         1. Briefly describe what {variable} is.\n\
         2. Explain the main factors that led to this result.\n\
         3. Mention any key thresholds or rules that affected the calculation.\n\
         4. If relevant, suggest how changes in inputs might affect this result.\n\
         \n\
         Keep your explanation concise but informative, suitable for a general \
         audience. Do not start with phrases like \"Certainly!\" or \"Here's an \
         explanation\". It will be rendered as markdown, so preface $ with \\."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_substitutes_all_context() {
        let segment = vec![
            "snap <200> entity_group: spm_units".to_string(),
            "  snap_gross_income <1000> entity_group: spm_units".to_string(),
        ];
        let desc = EntityDescription::from([("spm_units", vec!["your household"])]);
        let prompt = render_prompt("snap", &segment, &desc, "your household");

        assert!(prompt.contains("variable 'snap'"));
        assert!(prompt.contains("snap <200> entity_group: spm_units"));
        assert!(prompt.contains("  snap_gross_income <1000> entity_group: spm_units"));
        assert!(prompt.contains(r#"{"spm_units":["your household"]}"#));
        assert!(prompt.contains("entity 'your household'"));
    }

    #[test]
    fn empty_segment_still_renders() {
        let prompt = render_prompt("age", &[], &EntityDescription::default(), "you");
        assert!(prompt.contains("variable 'age'"));
        assert!(prompt.contains("{}"));
    }
}
