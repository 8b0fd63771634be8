use std::fmt::Write;

use super::language::Language;
use super::message::ChatMessage;

const SYSTEM_PROMPT_EN: &str = "You are the illunare 4.0 AI Assistant, an expert in enterprise technology platforms. \
     You help users with: platform architecture and technical implementation; \
     AI/ML integration with DeepSeek R1/R3 and Ollama; \
     industrial connectivity (Profibus, Profinet, OPC-UA); \
     automotive integration (OBD-II, fleet management); \
     hot reloading with Elixir and zero-downtime deployments; \
     Brazilian/LATAM compliance (LGPD, FenSeg, E-Social); \
     security, fraud detection and threat intelligence. \
     Always answer in English. Include code examples when relevant. Be concise but comprehensive.";

const SYSTEM_PROMPT_PT: &str = "Você é o Assistente de IA do illunare 4.0, especialista em plataformas tecnológicas empresariais. \
     Você ajuda usuários com: arquitetura da plataforma e implementação técnica; \
     integração de IA/ML com DeepSeek R1/R3 e Ollama; \
     conectividade industrial (Profibus, Profinet, OPC-UA); \
     integração automotiva (OBD-II, gestão de frotas); \
     hot reloading com Elixir e deployments sem downtime; \
     conformidade brasileira/LATAM (LGPD, FenSeg, E-Social); \
     segurança, detecção de fraudes e inteligência de ameaças. \
     Responda sempre em português do Brasil. Inclua exemplos de código quando relevante. \
     Seja conciso mas abrangente.";

/// Fixed instruction describing the assistant's scope.
pub const fn system_prompt(language: Language) -> &'static str {
    match language {
        Language::English => SYSTEM_PROMPT_EN,
        Language::Portuguese => SYSTEM_PROMPT_PT,
    }
}

/// Flattens recent conversation plus the new question into a single prompt,
/// for endpoints that take a prompt string instead of a message list.
pub fn build_prompt(context: &[ChatMessage], question: &str) -> String {
    let mut prompt = String::new();

    if !context.is_empty() {
        prompt.push_str("RECENT CONVERSATION:\n");
        for message in context {
            // Writing to a String cannot fail
            let _ = writeln!(prompt, "{}: {}", message.role(), message.text());
        }
        prompt.push('\n');
    }

    let _ = write!(prompt, "USER QUESTION: {question}");
    prompt
}
