//! Prompt text sent to the text-generation service.

use super::BriefingSnapshot;

/// The sandbox project the creative assistant is asked about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreativeProject {
    pub name: String,
    pub kind: String,
}

impl Default for CreativeProject {
    fn default() -> Self {
        Self {
            name: "New Sandbox Map".to_string(),
            kind: "Environment".to_string(),
        }
    }
}

impl CreativeProject {
    /// Context line passed alongside the user's prompt.
    pub fn context(&self) -> String {
        format!("Project: {}, Type: {}", self.name, self.kind)
    }
}

pub fn briefing_prompt(snapshot: &BriefingSnapshot) -> String {
    let (top_skill, _) = snapshot.skills.top();
    format!(
        "Generate a short, 2-sentence immersive \"Daily Briefing\" for a player in the Aetheria universe.\n\
         Player Data:\n\
         Name: {}\n\
         Level: {}\n\
         Top Skill: {}\n\
         Currency: {}\n\n\
         The tone should be futuristic and authoritative. Reference their specific stats.",
        snapshot.name, snapshot.level, top_skill, snapshot.currency
    )
}

pub fn creative_prompt(prompt: &str, context: &str) -> String {
    format!(
        "You are the Aetheria AI Creative Assistant. Help the user build in our persistent virtual world.\n\n\
         User Prompt: {}\n\
         Current Project Context: {}\n\n\
         Provide creative ideas, pseudo-code for game logic, or visual descriptions for their creation. \
         Keep it inspiring and technical where needed.",
        prompt, context
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::types::Skills;

    #[test]
    fn briefing_prompt_names_top_skill() {
        let snapshot = BriefingSnapshot {
            name: "Nova".into(),
            level: 3,
            skills: Skills { agility: 5, combat: 5, creativity: 30, social: 10 },
            currency: 420,
        };
        let text = briefing_prompt(&snapshot);
        assert!(text.contains("Top Skill: creativity"));
        assert!(text.contains("Level: 3"));
        assert!(text.contains("Currency: 420"));
    }

    #[test]
    fn creative_prompt_embeds_context() {
        let context = CreativeProject::default().context();
        assert_eq!(context, "Project: New Sandbox Map, Type: Environment");
        let text = creative_prompt("floating market", &context);
        assert!(text.contains("User Prompt: floating market"));
        assert!(text.contains("Current Project Context: Project: New Sandbox Map"));
    }
}
