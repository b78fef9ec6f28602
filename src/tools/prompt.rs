// src/tools/prompt.rs

use crate::config::{AgentMode, Context};

/// Builds the text embedded in every tool description.
pub struct PromptGenerator;

impl PromptGenerator {
    /// Describes the session the tool runs in.
    pub fn context_snippet(context: &Context) -> String {
        let mut lines = vec!["Context:".to_string()];
        match context.account_id {
            Some(account) => lines.push(format!(
                "- Default account: {} (used when an account is not specified)",
                account
            )),
            None => lines.push(
                "- Default account: the operator account (used when an account is not specified)".to_string(),
            ),
        }
        match context.mode {
            AgentMode::Autonomous => {
                lines.push("- Mode: autonomous; transactions are signed and submitted".to_string())
            }
            AgentMode::ReturnBytes => lines.push(
                "- Mode: return bytes; transactions are returned unsigned for the user to sign".to_string(),
            ),
        }
        lines.join("\n")
    }

    pub fn account_parameter_description(param: &str, context: &Context) -> String {
        let fallback = match context.account_id {
            Some(account) => account.to_string(),
            None => "the operator account".to_string(),
        };
        format!(
            "{} (str, optional): Account ID or EVM address. If not provided, defaults to {}",
            param, fallback
        )
    }

    pub fn usage_instructions() -> &'static str {
        "Important:\n\
         - Only include optional parameters if the user explicitly provides them\n\
         - Do not invent values for optional parameters\n\
         - Amounts are in display units (e.g. 1.5 HBAR, not tinybars)"
    }

    /// Assembles a description: context, summary, parameter list and usage rules.
    pub fn tool_prompt(context: &Context, summary: &str, parameters: &[&str]) -> String {
        let mut out = String::new();
        out.push_str(&Self::context_snippet(context));
        out.push_str("\n\n");
        out.push_str(summary);
        if !parameters.is_empty() {
            out.push_str("\n\nParameters:\n");
            for p in parameters {
                out.push_str("- ");
                out.push_str(p);
                out.push('\n');
            }
        } else {
            out.push('\n');
        }
        out.push_str(Self::usage_instructions());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::models::AccountId;

    #[test]
    fn snippet_names_the_context_account() {
        let context = Context {
            mode: AgentMode::ReturnBytes,
            account_id: Some(AccountId::from_num(1001)),
            mirrornode_service: None,
        };
        let snippet = PromptGenerator::context_snippet(&context);
        assert!(snippet.contains("0.0.1001"));
        assert!(snippet.contains("return bytes"));
        assert!(PromptGenerator::account_parameter_description("sourceAccountId", &context).contains("0.0.1001"));
    }
}
